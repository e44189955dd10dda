pub mod friendship;
pub mod live_event;
pub mod poi;
pub mod recommendation;

pub use friendship::{FriendshipConfirmation, FriendshipRequest};
pub use live_event::{AddLiveEvent, LiveEvent};
pub use poi::{Friend, PointOfInterest};
pub use recommendation::{
    AddRecommendedPoi, RecommendationAccuracy, RecommendationRequest, RecommendedCategory,
    RecommendedPoi, ValidationRequest,
};
