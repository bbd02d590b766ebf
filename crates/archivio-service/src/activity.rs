//! Activity feed access.

use std::sync::Arc;

use archivio_core::result::AppResult;
use archivio_database::store::ActivityStore;
use archivio_entity::activity::ActivityEvent;

/// Default number of entries in the activity feed.
const DEFAULT_LIMIT: u64 = 10;
/// Hard cap on one feed request.
const MAX_LIMIT: u64 = 100;

/// Read access to the recent activity feed.
#[derive(Clone)]
pub struct ActivityService {
    activity: Arc<dyn ActivityStore>,
}

impl ActivityService {
    /// Create a new activity service.
    pub fn new(activity: Arc<dyn ActivityStore>) -> Self {
        Self { activity }
    }

    /// Fetch the most recent entries, newest first.
    pub async fn recent(&self, limit: Option<u64>) -> AppResult<Vec<ActivityEvent>> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        self.activity.recent(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archivio_database::memory::MemoryStore;
    use archivio_entity::activity::{CreateActivityEvent, action};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_recent_is_limited_and_newest_first() {
        let store = MemoryStore::new();
        for _ in 0..15 {
            store
                .record(&CreateActivityEvent::new(
                    Uuid::new_v4(),
                    action::FILE_UPLOAD,
                    "file",
                    None,
                ))
                .await
                .unwrap();
        }

        let svc = ActivityService::new(Arc::new(store));
        let events = svc.recent(None).await.unwrap();
        assert_eq!(events.len(), 10);
        for pair in events.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }
}
