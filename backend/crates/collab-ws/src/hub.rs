use crate::{
    Admission, ConnectionId, Member, Metrics, Removal, Result as WsErrorResult, Room, RoomHandle,
    RoomSettings, RoomSummary,
};

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};
use tokio::sync::RwLock;

/// Directory of live rooms keyed by project id.
///
/// The directory lock only guards the map itself. It is never held while
/// waiting on a room, so a busy room cannot stall lookups for other projects.
pub struct Hub {
    inner: Arc<RwLock<HubInner>>,
    settings: RoomSettings,
    metrics: Metrics,
}

struct HubInner {
    rooms: HashMap<String, RoomHandle>,
}

/// Where a registered connection ended up
#[derive(Debug, Clone)]
pub struct Registration {
    pub room: RoomHandle,
    pub admission: Admission,
}

impl Hub {
    pub fn new(settings: RoomSettings, metrics: Metrics) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HubInner {
                rooms: HashMap::new(),
            })),
            settings,
            metrics,
        }
    }

    pub fn settings(&self) -> &RoomSettings {
        &self.settings
    }

    /// Return the room for `project_id`, starting one if none exists
    pub async fn get_or_create_room(&self, project_id: &str) -> RoomHandle {
        if let Some(room) = self.get_room(project_id).await {
            return room;
        }

        let mut inner = self.inner.write().await;
        self.get_or_create_locked(&mut inner, project_id)
    }

    /// Lookup only; `None` means no room, not an empty one
    pub async fn get_room(&self, project_id: &str) -> Option<RoomHandle> {
        let inner = self.inner.read().await;
        inner.rooms.get(project_id).cloned()
    }

    /// Drop the room from the directory and stop its loop, but only while it
    /// has no members and no admission in flight. Returns whether it was removed.
    pub async fn remove_room(&self, project_id: &str) -> bool {
        let mut inner = self.inner.write().await;

        let Some(room) = inner.rooms.get(project_id) else {
            return false;
        };

        if !room.is_idle() {
            debug!(
                "Room {} not removed: {} members or admissions pending",
                project_id,
                room.member_count()
            );
            return false;
        }

        if let Some(room) = inner.rooms.remove(project_id) {
            room.stop();
        }
        self.metrics.room_removed();
        info!(
            "Removed empty room {} ({} rooms active)",
            project_id,
            inner.rooms.len()
        );

        true
    }

    /// Route a new member to its project's room and wait for the admission decision
    pub async fn register(&self, member: Member) -> WsErrorResult<Registration> {
        let room = self.reserve_room(&member.identity.project_id).await;
        let admission = room.admit_reserved(member).await?;

        Ok(Registration { room, admission })
    }

    /// Remove a connection from its room; reclaims the room once it is empty.
    ///
    /// Idempotent: unknown rooms and non-members yield `removed: false`.
    pub async fn unregister(&self, project_id: &str, connection_id: ConnectionId) -> Removal {
        let Some(room) = self.get_room(project_id).await else {
            debug!(
                "Unregister of connection {}: room {} not found",
                connection_id, project_id
            );
            return Removal {
                removed: false,
                remaining: 0,
            };
        };

        match room.remove(connection_id).await {
            Ok(removal) => {
                if removal.remaining == 0 {
                    self.remove_room(project_id).await;
                }
                removal
            }
            Err(e) => {
                debug!("Unregister of connection {connection_id}: {e}");
                Removal {
                    removed: false,
                    remaining: 0,
                }
            }
        }
    }

    /// Number of rooms in the directory
    pub async fn room_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.rooms.len()
    }

    /// Members across all rooms (snapshot)
    pub async fn member_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.rooms.values().map(RoomHandle::member_count).sum()
    }

    /// Summaries of all rooms, ordered by project id
    pub async fn rooms(&self) -> Vec<RoomSummary> {
        let inner = self.inner.read().await;
        let mut rooms: Vec<RoomSummary> = inner
            .rooms
            .values()
            .map(|room| RoomSummary {
                id: room.project_id().to_string(),
                users_count: room.member_count(),
                max_users: room.max_members(),
            })
            .collect();
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        rooms
    }

    /// Stop every room and empty the directory
    pub async fn shutdown(&self) {
        let mut inner = self.inner.write().await;
        let count = inner.rooms.len();

        for (_, room) in inner.rooms.drain() {
            room.stop();
        }

        info!("Hub shut down, stopped {} rooms", count);
    }

    async fn reserve_room(&self, project_id: &str) -> RoomHandle {
        {
            let inner = self.inner.read().await;
            if let Some(room) = inner.rooms.get(project_id) {
                // Reserved under the lock so remove_room cannot slip in before the Admit lands
                room.reserve_admission();
                return room.clone();
            }
        }

        let mut inner = self.inner.write().await;
        let room = self.get_or_create_locked(&mut inner, project_id);
        room.reserve_admission();
        room
    }

    fn get_or_create_locked(&self, inner: &mut HubInner, project_id: &str) -> RoomHandle {
        inner
            .rooms
            .entry(project_id.to_string())
            .or_insert_with(|| {
                self.metrics.room_created();
                info!("Created room {}", project_id);
                Room::spawn(project_id, self.settings.clone(), self.metrics.clone())
            })
            .clone()
    }
}

impl Clone for Hub {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            settings: self.settings.clone(),
            metrics: self.metrics.clone(),
        }
    }
}
