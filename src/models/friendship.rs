use serde::{Deserialize, Serialize};

/// Request to create (or remove) a friendship edge between two users
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FriendshipRequest {
    pub receiver: String,
    pub sender: String,
}

/// Confirmation of a previously sent friendship request.
///
/// Field names mirror the client payload, which spells both roles out in full.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FriendshipConfirmation {
    #[serde(rename = "receiverOfTheFriendshipRequest")]
    pub receiver: String,
    #[serde(rename = "senderOfTheFriendshipRequest")]
    pub sender: String,
}
