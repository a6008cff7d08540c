use metrics::{counter, gauge, histogram};

/// Metrics collector for hub, room and connection activity
#[derive(Debug, Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            prefix: "collab_hub",
        }
    }

    /// Record new connection established
    pub fn connection_established(&self) {
        counter!(format!("{}_connections_established", self.prefix)).increment(1);
        gauge!(format!("{}_connections_active", self.prefix)).increment(1.0);
    }

    /// Record connection closed
    pub fn connection_closed(&self, reason: &'static str) {
        counter!(format!("{}_connections_closed", self.prefix), "reason" => reason).increment(1);
        gauge!(format!("{}_connections_active", self.prefix)).decrement(1.0);
    }

    /// Record message received from client
    pub fn message_received(&self, message_type: &str) {
        counter!(
            format!("{}_messages_received", self.prefix),
            "type" => message_type.to_string()
        )
        .increment(1);
    }

    /// Record frames dropped because they did not parse or validate
    pub fn message_rejected(&self) {
        counter!(format!("{}_messages_rejected", self.prefix)).increment(1);
    }

    /// Record message written to a client
    pub fn message_sent(&self, message_type: &str) {
        counter!(
            format!("{}_messages_sent", self.prefix),
            "type" => message_type.to_string()
        )
        .increment(1);
    }

    /// Record a room fan-out
    pub fn broadcast_published(&self, message_type: &str, recipients: usize) {
        counter!(
            format!("{}_broadcasts_published", self.prefix),
            "type" => message_type.to_string()
        )
        .increment(1);
        histogram!(format!("{}_broadcast_recipients", self.prefix)).record(recipients as f64);
    }

    pub fn member_admitted(&self) {
        counter!(format!("{}_members_admitted", self.prefix)).increment(1);
    }

    pub fn member_rejected(&self) {
        counter!(format!("{}_members_rejected", self.prefix)).increment(1);
    }

    /// Slow consumer dropped from its room
    pub fn member_evicted(&self) {
        counter!(format!("{}_members_evicted", self.prefix)).increment(1);
    }

    pub fn room_created(&self) {
        counter!(format!("{}_rooms_created", self.prefix)).increment(1);
        gauge!(format!("{}_rooms_active", self.prefix)).increment(1.0);
    }

    pub fn room_removed(&self) {
        counter!(format!("{}_rooms_removed", self.prefix)).increment(1);
        gauge!(format!("{}_rooms_active", self.prefix)).decrement(1.0);
    }

    /// Record error occurrence
    pub fn error_occurred(&self, error_type: &'static str) {
        counter!(format!("{}_errors_total", self.prefix), "type" => error_type).increment(1);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
