use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::crypto::BodyCipher;
use crate::services::{FriendshipService, LiveEventService, RecommendationService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub recommendations: Arc<RecommendationService>,
    pub live_events: Arc<LiveEventService>,
    pub friendships: Arc<FriendshipService>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub cipher: Arc<dyn BodyCipher>,
}

impl AppState {
    pub fn new(
        recommendations: Arc<RecommendationService>,
        live_events: Arc<LiveEventService>,
        friendships: Arc<FriendshipService>,
        verifier: Arc<dyn TokenVerifier>,
        cipher: Arc<dyn BodyCipher>,
    ) -> Self {
        Self {
            recommendations,
            live_events,
            friendships,
            verifier,
            cipher,
        }
    }
}
