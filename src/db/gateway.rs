use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{
    AddRecommendedPoi, Friend, LiveEvent, PointOfInterest, RecommendationAccuracy, RecommendedPoi,
};

/// Remote document store and push-notification backend.
///
/// The services only ever talk to this trait; the shipped implementation is
/// Redis-backed (`RedisGateway`), but nothing above this layer assumes a
/// particular store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Points of interest owned by `user`
    async fn pois_of_user(&self, user: &str) -> AppResult<Vec<PointOfInterest>>;

    /// Friend list of `user`
    async fn friends_of_user(&self, user: &str) -> AppResult<Vec<Friend>>;

    /// Every known username; drives the expiry sweepers
    async fn users(&self) -> AppResult<Vec<String>>;

    /// Recommendation-history records of `user`
    async fn recommendation_history(&self, user: &str) -> AppResult<Vec<RecommendedPoi>>;

    /// Stores a new history record and returns its id
    async fn add_history_record(&self, user: &str, record: &AddRecommendedPoi)
        -> AppResult<String>;

    /// Deletes one history record of `user` by record id
    async fn remove_history_record(&self, user: &str, record_id: &str) -> AppResult<()>;

    /// Live events published by `user`
    async fn personal_live_events(&self, user: &str) -> AppResult<Vec<LiveEvent>>;

    /// Live events that reached `user` through the friend graph
    async fn friends_live_events(&self, user: &str) -> AppResult<Vec<LiveEvent>>;

    /// Stores a live event and materializes it into the owner's friends'
    /// feeds. Returns the event id.
    async fn add_live_event(&self, event: &LiveEvent) -> AppResult<String>;

    async fn remove_personal_live_event(&self, user: &str, event_id: &str) -> AppResult<()>;

    async fn remove_friend_live_event(&self, user: &str, event_id: &str) -> AppResult<()>;

    /// Records a pending friendship request from `sender` in `receiver`'s inbox
    async fn add_friendship_request(&self, receiver: &str, sender: &str) -> AppResult<()>;

    /// Materializes the friendship edge in both directions and clears the
    /// pending request
    async fn confirm_friendship(&self, receiver: &str, sender: &str) -> AppResult<()>;

    /// Removes the friendship edge in both directions
    async fn remove_friendship(&self, receiver: &str, sender: &str) -> AppResult<()>;

    /// Pushes a place-suggestion notification to `user`
    async fn push_place_suggestion(
        &self,
        poi: &PointOfInterest,
        user: &str,
        title: &str,
        channel: &str,
    ) -> AppResult<()>;

    /// Pushes a new live event to the owner's friends
    async fn push_live_event(&self, event: &LiveEvent) -> AppResult<()>;

    /// Pushes a friendship notification to `user`
    async fn push_friendship_event(&self, user: &str, message: &str) -> AppResult<()>;

    /// Reports retrained-model accuracy back to `user`
    async fn push_model_accuracy(
        &self,
        accuracy: &RecommendationAccuracy,
        user: &str,
    ) -> AppResult<()>;
}
