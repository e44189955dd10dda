use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// A time-bounded event published by a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LiveEvent {
    pub id: String,
    /// Epoch seconds after which the event is no longer shown
    pub expiration_date: i64,
    pub owner: String,
    pub name: String,
    pub address: String,
}

impl LiveEvent {
    /// Builds a stored event from a creation request, stamping a fresh id.
    /// Rejects an `expires_after` whose expiry does not fit an epoch timestamp.
    pub fn from_request(request: &AddLiveEvent, now: i64) -> AppResult<Self> {
        let expiration_date = request
            .expires_after
            .checked_mul(60)
            .and_then(|seconds| now.checked_add(seconds))
            .ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "Expiry of {} minutes is out of range",
                    request.expires_after
                ))
            })?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            expiration_date,
            owner: request.owner.clone(),
            name: request.name.clone(),
            address: request.address.clone(),
        })
    }

    pub fn is_active(&self, now: i64) -> bool {
        self.expiration_date > now
    }
}

/// Live-event creation request body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddLiveEvent {
    /// Minutes after which the event expires
    pub expires_after: i64,
    pub owner: String,
    pub name: String,
    pub address: String,
}
