
use crate::{BroadcastMessage, ConnectionId, Envelope, Member, MemberIdentity};

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

/// A member wired to a queue the test can read from
pub(crate) fn test_member(
    project_id: &str,
    user_id: &str,
    capacity: usize,
) -> (Member, mpsc::Receiver<BroadcastMessage>) {
    let (tx, rx) = mpsc::channel(capacity);
    let identity = MemberIdentity::new(project_id, user_id, format!("{user_id}-name"));
    (Member::new(ConnectionId::new(), identity, tx), rx)
}

/// Next queued envelope, failing the test if none arrives
pub(crate) async fn next_envelope(rx: &mut mpsc::Receiver<BroadcastMessage>) -> Envelope {
    let message = timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("Timed out waiting for envelope")
        .expect("Queue closed");
    Envelope::from_json(message.payload.as_str()).expect("Queued payload should be an envelope")
}

/// True if nothing arrives within a short grace period
pub(crate) async fn stays_quiet(rx: &mut mpsc::Receiver<BroadcastMessage>) -> bool {
    matches!(
        timeout(Duration::from_millis(50), rx.recv()).await,
        Err(_) | Ok(None)
    )
}
