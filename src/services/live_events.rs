use std::sync::Arc;

use chrono::Utc;

use crate::db::PersistenceGateway;
use crate::error::AppResult;
use crate::models::{AddLiveEvent, LiveEvent};

/// Manages ephemeral, time-bounded events published by users
pub struct LiveEventService {
    gateway: Arc<dyn PersistenceGateway>,
}

impl LiveEventService {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self { gateway }
    }

    /// Events visible to `user`: their own plus their friends', minus
    /// anything already expired.
    pub async fn live_events_for(&self, user: &str) -> AppResult<Vec<LiveEvent>> {
        let now = Utc::now().timestamp();

        let mut events = self.gateway.personal_live_events(user).await?;
        events.extend(self.gateway.friends_live_events(user).await?);
        events.retain(|event| event.is_active(now));

        Ok(events)
    }

    /// Publishes a new live event and notifies the owner's friends
    pub async fn add_live_event(&self, request: &AddLiveEvent) -> AppResult<String> {
        let event = LiveEvent::from_request(request, Utc::now().timestamp())?;

        let event_id = self.gateway.add_live_event(&event).await?;
        tracing::info!(
            event_id = %event_id,
            owner = %event.owner,
            expiration_date = event.expiration_date,
            "Published live event"
        );

        self.gateway.push_live_event(&event).await?;

        Ok(event_id)
    }

    /// Deletes expired events from every user's personal and friends' feeds.
    /// Per-user and per-record failures are logged and the sweep continues.
    pub async fn clear_expired_live_events(&self) -> AppResult<()> {
        let users = self.gateway.users().await?;
        let now = Utc::now().timestamp();

        for user in &users {
            self.sweep_feed(user, now, true).await;
            self.sweep_feed(user, now, false).await;
        }

        Ok(())
    }

    async fn sweep_feed(&self, user: &str, now: i64, personal: bool) {
        let events = if personal {
            self.gateway.personal_live_events(user).await
        } else {
            self.gateway.friends_live_events(user).await
        };

        let events = match events {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(user = %user, error = %e, "Skipping feed during live event sweep");
                return;
            }
        };

        for event in events {
            if event.expiration_date >= now {
                continue;
            }
            let removed = if personal {
                self.gateway.remove_personal_live_event(user, &event.id).await
            } else {
                self.gateway.remove_friend_live_event(user, &event.id).await
            };
            if let Err(e) = removed {
                tracing::warn!(
                    user = %user,
                    event_id = %event.id,
                    error = %e,
                    "Failed to remove expired live event"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::gateway::MockPersistenceGateway;
    use crate::error::AppError;

    fn event(id: &str, owner: &str, expiration_date: i64) -> LiveEvent {
        LiveEvent {
            id: id.to_string(),
            expiration_date,
            owner: owner.to_string(),
            name: "event".to_string(),
            address: "somewhere".to_string(),
        }
    }

    #[tokio::test]
    async fn test_listing_filters_expired_events() {
        let now = Utc::now().timestamp();

        let mut gateway = MockPersistenceGateway::new();
        gateway.expect_personal_live_events().returning(move |_| {
            Ok(vec![
                event("active", "alice", now + 600),
                event("expired", "alice", now - 600),
            ])
        });
        gateway
            .expect_friends_live_events()
            .returning(move |_| Ok(vec![event("friend-active", "bob", now + 600)]));

        let events = LiveEventService::new(Arc::new(gateway))
            .live_events_for("alice")
            .await
            .unwrap();

        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["active", "friend-active"]);
    }

    #[tokio::test]
    async fn test_add_stores_then_notifies() {
        let mut gateway = MockPersistenceGateway::new();
        gateway
            .expect_add_live_event()
            .withf(|event| event.owner == "bob" && event.name == "Open mic")
            .times(1)
            .returning(|event| Ok(event.id.clone()));
        gateway
            .expect_push_live_event()
            .times(1)
            .returning(|_| Ok(()));

        let request = AddLiveEvent {
            expires_after: 60,
            owner: "bob".to_string(),
            name: "Open mic".to_string(),
            address: "Via Roma 1".to_string(),
        };

        let id = LiveEventService::new(Arc::new(gateway))
            .add_live_event(&request)
            .await
            .unwrap();
        assert!(!id.is_empty());
    }

    #[tokio::test]
    async fn test_sweep_removes_expired_from_both_feeds() {
        let now = Utc::now().timestamp();

        let mut gateway = MockPersistenceGateway::new();
        gateway
            .expect_users()
            .returning(|| Ok(vec!["alice".to_string()]));
        gateway.expect_personal_live_events().returning(move |_| {
            Ok(vec![
                event("own-expired", "alice", now - 60),
                event("own-active", "alice", now + 60),
            ])
        });
        gateway
            .expect_friends_live_events()
            .returning(move |_| Ok(vec![event("feed-expired", "bob", now - 60)]));
        gateway
            .expect_remove_personal_live_event()
            .withf(|user, event_id| user == "alice" && event_id == "own-expired")
            .times(1)
            .returning(|_, _| Ok(()));
        gateway
            .expect_remove_friend_live_event()
            .withf(|user, event_id| user == "alice" && event_id == "feed-expired")
            .times(1)
            .returning(|_, _| Ok(()));

        LiveEventService::new(Arc::new(gateway))
            .clear_expired_live_events()
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_sweep_continues_past_feed_failure() {
        let now = Utc::now().timestamp();

        let mut gateway = MockPersistenceGateway::new();
        gateway
            .expect_users()
            .returning(|| Ok(vec!["alice".to_string(), "bob".to_string()]));
        gateway
            .expect_personal_live_events()
            .returning(move |user| match user {
                "alice" => Err(AppError::Internal("feed unavailable".to_string())),
                _ => Ok(vec![event("bob-expired", "bob", now - 60)]),
            });
        gateway
            .expect_friends_live_events()
            .returning(|_| Ok(vec![]));
        gateway
            .expect_remove_personal_live_event()
            .withf(|user, event_id| user == "bob" && event_id == "bob-expired")
            .times(1)
            .returning(|_, _| Ok(()));

        LiveEventService::new(Arc::new(gateway))
            .clear_expired_live_events()
            .await
            .unwrap();
    }
}
