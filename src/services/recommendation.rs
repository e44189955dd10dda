use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use crate::db::PersistenceGateway;
use crate::error::AppResult;
use crate::geo::{self, Coordinates};
use crate::models::{
    AddRecommendedPoi, PointOfInterest, RecommendationAccuracy, RecommendationRequest,
    RecommendedCategory, ValidationRequest,
};
use crate::services::context_api::ContextAwareApi;

/// A point of interest farther than this is never suggested
pub const MAX_SUGGESTION_DISTANCE_METERS: f64 = 3000.0;

/// Sliding per-(user, point) cooldown before the same place may be notified again
pub const RENOTIFY_COOLDOWN_SECS: i64 = 3600;

const PLACE_RECOMMENDATION_CHANNEL: &str = "place-recommendation";
const VALIDITY_RECOMMENDATION_CHANNEL: &str = "validity-recommendation";

/// Orchestrates the context-aware model, nearest-point selection, and the
/// notification cooldown.
///
/// Model-API failures are logged and collapse to a `None` outcome; persistence
/// failures propagate. The dedup-check/notify/record sequence is not atomic,
/// so delivery is best-effort rather than exactly-once under concurrent
/// requests for the same user.
pub struct RecommendationService {
    gateway: Arc<dyn PersistenceGateway>,
    context_api: Arc<dyn ContextAwareApi>,
}

impl RecommendationService {
    pub fn new(gateway: Arc<dyn PersistenceGateway>, context_api: Arc<dyn ContextAwareApi>) -> Self {
        Self {
            gateway,
            context_api,
        }
    }

    /// Asks the model for a place category and, when a matching point of
    /// interest is close enough and outside its cooldown, notifies the user.
    ///
    /// The recommended category is returned whether or not anything was
    /// notified; `None` only signals that the model call failed.
    pub async fn recommend_place_of_category(
        &self,
        request: &RecommendationRequest,
    ) -> AppResult<Option<RecommendedCategory>> {
        let category = match self.context_api.recommend_category(request).await {
            Ok(category) => category,
            Err(e) => {
                tracing::error!(error = %e, "The call to the context-aware places API failed");
                return Ok(None);
            }
        };

        tracing::info!(
            user = %request.user,
            category = %category.place_category,
            "Found category"
        );

        match self.nearest_poi_social(&category, request).await? {
            Some(poi) => {
                self.notify_if_allowed(
                    &poi,
                    &request.user,
                    "You may be interested to this place:",
                    PLACE_RECOMMENDATION_CHANNEL,
                )
                .await?;
            }
            None => {
                tracing::warn!(
                    user = %request.user,
                    category = %category.place_category,
                    "No point of interest of the recommended category near the user"
                );
            }
        }

        Ok(Some(category))
    }

    /// Checks the client-proposed category against the model and, when valid,
    /// runs the personal-scope suggestion flow with that category.
    ///
    /// Returns the model's verdict; `None` only signals that the model call
    /// failed.
    pub async fn should_advise_place_category(
        &self,
        request: &ValidationRequest,
    ) -> AppResult<Option<bool>> {
        let valid = match self.context_api.check_validity(request).await {
            Ok(valid) => valid,
            Err(e) => {
                tracing::error!(error = %e, "The call to the context-aware validity API failed");
                return Ok(None);
            }
        };

        if !valid {
            tracing::warn!(
                category = %request.place_category,
                "Not recommending anything since the category is not advisable now"
            );
            return Ok(Some(false));
        }

        let recommendation = request.recommendation();
        let category = RecommendedCategory {
            place_category: request.place_category.clone(),
        };

        match self.nearest_poi_personal(&category, &recommendation).await? {
            Some(poi) => {
                self.notify_if_allowed(
                    &poi,
                    &recommendation.user,
                    "You are near to this place:",
                    VALIDITY_RECOMMENDATION_CHANNEL,
                )
                .await?;
            }
            None => {
                tracing::warn!(
                    user = %recommendation.user,
                    latitude = recommendation.latitude,
                    longitude = recommendation.longitude,
                    "The area around the user has no matching points of interest"
                );
            }
        }

        Ok(Some(true))
    }

    /// Submits a new training record and forwards the reported accuracy to
    /// the user. `None` signals that the model call failed.
    pub async fn train_again_model(
        &self,
        request: &ValidationRequest,
    ) -> AppResult<Option<RecommendationAccuracy>> {
        let accuracy = match self.context_api.train_model(request).await {
            Ok(accuracy) => accuracy,
            Err(e) => {
                tracing::error!(error = %e, "The call to the context-aware train API failed");
                return Ok(None);
            }
        };

        self.gateway
            .push_model_accuracy(&accuracy, &request.user)
            .await?;

        Ok(Some(accuracy))
    }

    /// Deletes recommendation-history records older than the cooldown for
    /// every known user. Per-user and per-record failures are logged and the
    /// sweep continues.
    pub async fn clean_expired_history(&self) -> AppResult<()> {
        let users = self.gateway.users().await?;
        let now = Utc::now().timestamp();

        for user in &users {
            let records = match self.gateway.recommendation_history(user).await {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!(user = %user, error = %e, "Skipping user during history sweep");
                    continue;
                }
            };

            for record in records {
                if record.notificated_date + RENOTIFY_COOLDOWN_SECS < now {
                    if let Err(e) = self.gateway.remove_history_record(user, &record.id).await {
                        tracing::warn!(
                            user = %user,
                            record_id = %record.id,
                            error = %e,
                            "Failed to remove stale history record"
                        );
                    }
                }
            }
        }

        Ok(())
    }

    /// Applies the cooldown policy and, when allowed, pushes the notification
    /// and records it. The two steps are deliberately not atomic.
    async fn notify_if_allowed(
        &self,
        poi: &PointOfInterest,
        user: &str,
        title: &str,
        channel: &str,
    ) -> AppResult<()> {
        let now = Utc::now().timestamp();
        if !self.can_notify(poi, user, now).await? {
            tracing::warn!(
                mark_id = %poi.mark_id,
                user = %user,
                "Point of interest has already been recommended less than an hour ago"
            );
            return Ok(());
        }

        self.gateway
            .push_place_suggestion(poi, user, title, channel)
            .await?;

        let record = AddRecommendedPoi {
            mark_id: poi.mark_id.clone(),
            notificated_date: now,
        };
        let record_id = self.gateway.add_history_record(user, &record).await?;
        tracing::debug!(
            mark_id = %poi.mark_id,
            record_id = %record_id,
            user = %user,
            "Notification recorded"
        );

        Ok(())
    }

    /// Whether `poi` may be notified to `user` under the sliding cooldown.
    ///
    /// A stale record is deleted here, as a side effect of the check; the
    /// caller creates the fresh record after a successful notify.
    pub(crate) async fn can_notify(
        &self,
        poi: &PointOfInterest,
        user: &str,
        now: i64,
    ) -> AppResult<bool> {
        let history = self.gateway.recommendation_history(user).await?;

        let Some(record) = history.iter().find(|r| r.mark_id == poi.mark_id) else {
            return Ok(true);
        };

        if record.notificated_date + RENOTIFY_COOLDOWN_SECS < now {
            self.gateway.remove_history_record(user, &record.id).await?;
            return Ok(true);
        }

        Ok(false)
    }

    /// Personal scope: only the requesting user's own points of interest
    async fn nearest_poi_personal(
        &self,
        category: &RecommendedCategory,
        request: &RecommendationRequest,
    ) -> AppResult<Option<PointOfInterest>> {
        let pois = self.gateway.pois_of_user(&request.user).await?;

        Ok(select_nearest(
            request.position(),
            pois,
            &category.place_category,
            &HashSet::new(),
        ))
    }

    /// Social scope: friends' points of interest plus the user's own, minus
    /// anything still inside its cooldown window.
    ///
    /// A friend whose points cannot be fetched is skipped rather than failing
    /// the whole selection.
    async fn nearest_poi_social(
        &self,
        category: &RecommendedCategory,
        request: &RecommendationRequest,
    ) -> AppResult<Option<PointOfInterest>> {
        let friends = self.gateway.friends_of_user(&request.user).await?;

        let mut pois = Vec::new();
        for friend in &friends {
            match self.gateway.pois_of_user(&friend.friend_username).await {
                Ok(friend_pois) => pois.extend(friend_pois),
                Err(e) => {
                    tracing::warn!(
                        friend = %friend.friend_username,
                        error = %e,
                        "Skipping friend whose points of interest could not be fetched"
                    );
                }
            }
        }
        pois.extend(self.gateway.pois_of_user(&request.user).await?);

        let now = Utc::now().timestamp();
        let excluded: HashSet<String> = self
            .gateway
            .recommendation_history(&request.user)
            .await?
            .into_iter()
            .filter(|record| record.notificated_date + RENOTIFY_COOLDOWN_SECS >= now)
            .map(|record| record.mark_id)
            .collect();

        Ok(select_nearest(
            request.position(),
            pois,
            &category.place_category,
            &excluded,
        ))
    }
}

/// Nearest candidate of the given category, excluding `excluded` mark ids.
///
/// Ties keep the earlier candidate in input order. Returns `None` for an
/// empty candidate set or when even the nearest match is out of range.
fn select_nearest(
    origin: Coordinates,
    pois: Vec<PointOfInterest>,
    category: &str,
    excluded: &HashSet<String>,
) -> Option<PointOfInterest> {
    let mut candidates: Vec<PointOfInterest> = pois
        .into_iter()
        .filter(|poi| poi.matches_category(category) && !excluded.contains(&poi.mark_id))
        .collect();

    let positions: Vec<Coordinates> = candidates.iter().map(PointOfInterest::position).collect();
    let (index, distance) = geo::find_nearest(origin, &positions)?;

    if distance < MAX_SUGGESTION_DISTANCE_METERS {
        Some(candidates.swap_remove(index))
    } else {
        None
    }
}
