pub mod context_api;
pub mod friendship;
pub mod live_events;
pub mod recommendation;
pub mod sweeper;

pub use context_api::{ContextAwareApi, HttpContextApi};
pub use friendship::FriendshipService;
pub use live_events::LiveEventService;
pub use recommendation::RecommendationService;
