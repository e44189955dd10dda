use std::fmt::Display;

use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use serde::de::DeserializeOwned;
use serde_json::json;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    AddRecommendedPoi, Friend, LiveEvent, PointOfInterest, RecommendationAccuracy, RecommendedPoi,
};

use super::gateway::PersistenceGateway;

/// Creates a Redis client for the document store
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Key layout of the document store
enum StoreKey<'a> {
    Users,
    Pois(&'a str),
    Friends(&'a str),
    PendingRequests(&'a str),
    History(&'a str),
    PersonalEvents(&'a str),
    FriendEvents(&'a str),
    Notifications(&'a str),
}

impl Display for StoreKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKey::Users => write!(f, "users"),
            StoreKey::Pois(user) => write!(f, "poi:{}", user),
            StoreKey::Friends(user) => write!(f, "friends:{}", user),
            StoreKey::PendingRequests(user) => write!(f, "friendreq:{}", user),
            StoreKey::History(user) => write!(f, "history:{}", user),
            StoreKey::PersonalEvents(user) => write!(f, "live:personal:{}", user),
            StoreKey::FriendEvents(user) => write!(f, "live:friends:{}", user),
            StoreKey::Notifications(user) => write!(f, "notify:{}", user),
        }
    }
}

/// Redis-backed persistence gateway.
///
/// Documents live in per-user hashes keyed by record id, the social graph in
/// sets, and push notifications fan out over pub/sub channels that the
/// delivery workers subscribe to.
pub struct RedisGateway {
    client: Client,
}

impl RedisGateway {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }

    async fn hash_documents<T: DeserializeOwned>(&self, key: String) -> AppResult<Vec<T>> {
        let mut conn = self.connection().await?;
        let raw: Vec<String> = conn.hvals(&key).await?;

        raw.iter()
            .map(|doc| {
                serde_json::from_str(doc).map_err(|e| {
                    AppError::Internal(format!("Corrupt document under {}: {}", key, e))
                })
            })
            .collect()
    }

    async fn publish(&self, user: &str, payload: serde_json::Value) -> AppResult<()> {
        let mut conn = self.connection().await?;
        let channel = StoreKey::Notifications(user).to_string();
        let _: i64 = conn.publish(&channel, payload.to_string()).await?;
        tracing::debug!(user = %user, "Notification published");
        Ok(())
    }
}

#[async_trait]
impl PersistenceGateway for RedisGateway {
    async fn pois_of_user(&self, user: &str) -> AppResult<Vec<PointOfInterest>> {
        self.hash_documents(StoreKey::Pois(user).to_string()).await
    }

    async fn friends_of_user(&self, user: &str) -> AppResult<Vec<Friend>> {
        let mut conn = self.connection().await?;
        let usernames: Vec<String> = conn.smembers(StoreKey::Friends(user).to_string()).await?;

        Ok(usernames
            .into_iter()
            .map(|friend_username| Friend { friend_username })
            .collect())
    }

    async fn users(&self) -> AppResult<Vec<String>> {
        let mut conn = self.connection().await?;
        Ok(conn.smembers(StoreKey::Users.to_string()).await?)
    }

    async fn recommendation_history(&self, user: &str) -> AppResult<Vec<RecommendedPoi>> {
        self.hash_documents(StoreKey::History(user).to_string())
            .await
    }

    async fn add_history_record(
        &self,
        user: &str,
        record: &AddRecommendedPoi,
    ) -> AppResult<String> {
        let stored = RecommendedPoi::from_request(Uuid::new_v4().to_string(), record);
        let doc = serde_json::to_string(&stored)
            .map_err(|e| AppError::Internal(format!("History serialization error: {}", e)))?;

        let mut conn = self.connection().await?;
        let _: () = conn
            .hset(StoreKey::History(user).to_string(), &stored.id, doc)
            .await?;

        Ok(stored.id)
    }

    async fn remove_history_record(&self, user: &str, record_id: &str) -> AppResult<()> {
        let mut conn = self.connection().await?;
        let _: () = conn
            .hdel(StoreKey::History(user).to_string(), record_id)
            .await?;
        Ok(())
    }

    async fn personal_live_events(&self, user: &str) -> AppResult<Vec<LiveEvent>> {
        self.hash_documents(StoreKey::PersonalEvents(user).to_string())
            .await
    }

    async fn friends_live_events(&self, user: &str) -> AppResult<Vec<LiveEvent>> {
        self.hash_documents(StoreKey::FriendEvents(user).to_string())
            .await
    }

    async fn add_live_event(&self, event: &LiveEvent) -> AppResult<String> {
        let doc = serde_json::to_string(event)
            .map_err(|e| AppError::Internal(format!("Live event serialization error: {}", e)))?;

        let mut conn = self.connection().await?;
        let _: () = conn
            .hset(
                StoreKey::PersonalEvents(&event.owner).to_string(),
                &event.id,
                &doc,
            )
            .await?;
        let _: () = conn.sadd(StoreKey::Users.to_string(), &event.owner).await?;

        // Materialize the event into each friend's feed
        let friends: Vec<String> = conn
            .smembers(StoreKey::Friends(&event.owner).to_string())
            .await?;
        for friend in &friends {
            let _: () = conn
                .hset(StoreKey::FriendEvents(friend).to_string(), &event.id, &doc)
                .await?;
        }

        Ok(event.id.clone())
    }

    async fn remove_personal_live_event(&self, user: &str, event_id: &str) -> AppResult<()> {
        let mut conn = self.connection().await?;
        let _: () = conn
            .hdel(StoreKey::PersonalEvents(user).to_string(), event_id)
            .await?;
        Ok(())
    }

    async fn remove_friend_live_event(&self, user: &str, event_id: &str) -> AppResult<()> {
        let mut conn = self.connection().await?;
        let _: () = conn
            .hdel(StoreKey::FriendEvents(user).to_string(), event_id)
            .await?;
        Ok(())
    }

    async fn add_friendship_request(&self, receiver: &str, sender: &str) -> AppResult<()> {
        let mut conn = self.connection().await?;
        let _: () = conn
            .sadd(StoreKey::PendingRequests(receiver).to_string(), sender)
            .await?;
        Ok(())
    }

    async fn confirm_friendship(&self, receiver: &str, sender: &str) -> AppResult<()> {
        let mut conn = self.connection().await?;
        let _: () = conn
            .srem(StoreKey::PendingRequests(receiver).to_string(), sender)
            .await?;
        let _: () = conn
            .sadd(StoreKey::Friends(receiver).to_string(), sender)
            .await?;
        let _: () = conn
            .sadd(StoreKey::Friends(sender).to_string(), receiver)
            .await?;
        let _: () = conn.sadd(StoreKey::Users.to_string(), receiver).await?;
        let _: () = conn.sadd(StoreKey::Users.to_string(), sender).await?;
        Ok(())
    }

    async fn remove_friendship(&self, receiver: &str, sender: &str) -> AppResult<()> {
        let mut conn = self.connection().await?;
        let _: () = conn
            .srem(StoreKey::Friends(receiver).to_string(), sender)
            .await?;
        let _: () = conn
            .srem(StoreKey::Friends(sender).to_string(), receiver)
            .await?;
        Ok(())
    }

    async fn push_place_suggestion(
        &self,
        poi: &PointOfInterest,
        user: &str,
        title: &str,
        channel: &str,
    ) -> AppResult<()> {
        self.publish(
            user,
            json!({
                "kind": channel,
                "title": title,
                "poi": poi,
            }),
        )
        .await
    }

    async fn push_live_event(&self, event: &LiveEvent) -> AppResult<()> {
        let mut conn = self.connection().await?;
        let friends: Vec<String> = conn
            .smembers(StoreKey::Friends(&event.owner).to_string())
            .await?;
        drop(conn);

        for friend in &friends {
            self.publish(
                friend,
                json!({
                    "kind": "live-event",
                    "event": event,
                }),
            )
            .await?;
        }
        Ok(())
    }

    async fn push_friendship_event(&self, user: &str, message: &str) -> AppResult<()> {
        self.publish(
            user,
            json!({
                "kind": "friendship",
                "message": message,
            }),
        )
        .await
    }

    async fn push_model_accuracy(
        &self,
        accuracy: &RecommendationAccuracy,
        user: &str,
    ) -> AppResult<()> {
        self.publish(
            user,
            json!({
                "kind": "model-retrained",
                "accuracy": accuracy.accuracy,
                "correct_samples": accuracy.correct_samples,
            }),
        )
        .await
    }
}
