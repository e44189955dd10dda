use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;

/// A place record owned by a user.
///
/// Stored documents use camelCase field names; the store schema predates this
/// service and is shared with the mobile clients. Immutable once stored and
/// read-only from this service's perspective.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterest {
    pub mark_id: String,
    /// Address reverse geocoded from the coordinates
    pub address: String,
    /// Place category (e.g. "cafe", "museum")
    #[serde(rename = "type")]
    pub category: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Name chosen by the owner
    pub name: String,
    pub phone_number: String,
    pub visibility: String,
    pub url: String,
}

impl PointOfInterest {
    pub fn position(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// Category match is case-insensitive exact
    pub fn matches_category(&self, category: &str) -> bool {
        self.category.eq_ignore_ascii_case(category)
    }
}

/// An entry of a user's friend list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub friend_username: String,
}
