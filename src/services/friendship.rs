use std::sync::Arc;

use crate::db::PersistenceGateway;
use crate::error::AppResult;
use crate::models::{FriendshipConfirmation, FriendshipRequest};

/// Manages the friendship graph: pending requests, confirmations, removals
pub struct FriendshipService {
    gateway: Arc<dyn PersistenceGateway>,
}

impl FriendshipService {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self { gateway }
    }

    /// Records a pending request and notifies the receiver
    pub async fn send_friendship_request(&self, request: &FriendshipRequest) -> AppResult<()> {
        self.gateway
            .add_friendship_request(&request.receiver, &request.sender)
            .await?;

        self.gateway
            .push_friendship_event(
                &request.receiver,
                &format!("{} wants to add you as a friend.", request.sender),
            )
            .await
    }

    /// Materializes the friendship edge and notifies the original sender
    pub async fn confirm_friendship(
        &self,
        confirmation: &FriendshipConfirmation,
    ) -> AppResult<()> {
        self.gateway
            .confirm_friendship(&confirmation.receiver, &confirmation.sender)
            .await?;

        self.gateway
            .push_friendship_event(
                &confirmation.sender,
                &format!("{} accepted your friendship request.", confirmation.receiver),
            )
            .await
    }

    /// Removes the friendship edge in both directions
    pub async fn remove_friendship(&self, request: &FriendshipRequest) -> AppResult<()> {
        self.gateway
            .remove_friendship(&request.receiver, &request.sender)
            .await
    }
}
