//! Retry wrapper for room saves.

use std::time::Duration;

use crate::{RoomDocument, RoomStore, StoreError};

/// Saves a room document, retrying transient failures with exponential
/// backoff (`base_delay`, doubled per attempt). Permanent failures are
/// returned immediately.
///
/// Room actors treat the final error as "resync later", never as a
/// reason to stop serving the room.
pub async fn save_with_retry<S: RoomStore>(
    store: &S,
    doc: &RoomDocument,
    attempts: u32,
    base_delay: Duration,
) -> Result<(), StoreError> {
    let mut delay = base_delay;
    let mut last_err = StoreError::Unavailable("no attempts configured".into());

    for attempt in 1..=attempts.max(1) {
        match store.save(doc).await {
            Ok(()) => return Ok(()),
            Err(e) if e.is_transient() && attempt < attempts => {
                tracing::warn!(
                    room_id = %doc.room_id,
                    attempt,
                    error = %e,
                    "room save failed, retrying"
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
                last_err = e;
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_protocol::{RoomId, RoomStatus, UserId};
    use parlor_rules::GameType;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails the first `failures` saves with a transient error, then
    /// succeeds. Counts every attempt.
    struct FlakyStore {
        failures: u32,
        attempts: AtomicU32,
        transient: bool,
    }

    impl FlakyStore {
        fn transient(failures: u32) -> Self {
            Self {
                failures,
                attempts: AtomicU32::new(0),
                transient: true,
            }
        }

        fn permanent() -> Self {
            Self {
                failures: u32::MAX,
                attempts: AtomicU32::new(0),
                transient: false,
            }
        }
    }

    impl RoomStore for FlakyStore {
        async fn save(&self, _doc: &RoomDocument) -> Result<(), StoreError> {
            let n = self.attempts.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                if self.transient {
                    Err(StoreError::Unavailable("simulated outage".into()))
                } else {
                    Err(StoreError::Corrupt("simulated corruption".into()))
                }
            } else {
                Ok(())
            }
        }

        async fn load(&self, _room_id: RoomId) -> Result<Option<RoomDocument>, StoreError> {
            Ok(None)
        }

        async fn delete(&self, _room_id: RoomId) -> Result<(), StoreError> {
            Ok(())
        }

        async fn load_all(&self) -> Result<Vec<RoomDocument>, StoreError> {
            Ok(vec![])
        }
    }

    fn doc() -> RoomDocument {
        RoomDocument {
            room_id: RoomId(1),
            game_type: GameType::Card,
            status: RoomStatus::Waiting,
            max_players: 2,
            owner_user_id: UserId::from("u-owner"),
            seats: vec![],
            game_state: None,
            created_at: 1,
            updated_at: 1,
        }
    }

    #[tokio::test]
    async fn test_save_with_retry_recovers_from_transient_failures() {
        let store = FlakyStore::transient(2);
        save_with_retry(&store, &doc(), 3, Duration::from_millis(1))
            .await
            .expect("third attempt should succeed");
        assert_eq!(store.attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_save_with_retry_gives_up_after_attempts() {
        let store = FlakyStore::transient(10);
        let result = save_with_retry(&store, &doc(), 3, Duration::from_millis(1)).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(store.attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_save_with_retry_does_not_retry_permanent_errors() {
        let store = FlakyStore::permanent();
        let result = save_with_retry(&store, &doc(), 3, Duration::from_millis(1)).await;
        assert!(matches!(result, Err(StoreError::Corrupt(_))));
        assert_eq!(store.attempts.load(Ordering::SeqCst), 1);
    }
}
