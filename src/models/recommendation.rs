use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;

/// Context snapshot sent by a client asking for a place-category recommendation.
///
/// Serializes snake_case, matching the query parameters the context-aware
/// model server expects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationRequest {
    pub user: String,
    pub latitude: f64,
    pub longitude: f64,
    pub human_activity: String,
    pub seconds_in_day: u32,
    pub week_day: u32,
}

impl RecommendationRequest {
    pub fn position(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// A recommendation request extended with the category proposed by the client
/// (geofencing validation and model retraining).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationRequest {
    pub user: String,
    pub latitude: f64,
    pub longitude: f64,
    pub human_activity: String,
    pub seconds_in_day: u32,
    pub week_day: u32,
    pub place_category: String,
}

impl ValidationRequest {
    /// The context fields without the proposed category
    pub fn recommendation(&self) -> RecommendationRequest {
        RecommendationRequest {
            user: self.user.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            human_activity: self.human_activity.clone(),
            seconds_in_day: self.seconds_in_day,
            week_day: self.week_day,
        }
    }
}

/// Place category produced by the model (or echoed from a validation request)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendedCategory {
    pub place_category: String,
}

/// History record marking that a point of interest was already suggested to a
/// user. At most one active record exists per (user, markId) pair; the dedup
/// check enforces this, not the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedPoi {
    pub id: String,
    pub mark_id: String,
    /// Epoch seconds of the notification that created this record
    pub notificated_date: i64,
}

impl RecommendedPoi {
    pub fn from_request(id: String, request: &AddRecommendedPoi) -> Self {
        Self {
            id,
            mark_id: request.mark_id.clone(),
            notificated_date: request.notificated_date,
        }
    }
}

/// Creation payload for a history record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddRecommendedPoi {
    pub mark_id: String,
    pub notificated_date: i64,
}

/// Accuracy statistics reported by the model after retraining
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationAccuracy {
    pub accuracy: f64,
    pub correct_samples: u32,
}
