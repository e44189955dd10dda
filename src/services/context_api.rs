use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::{
    RecommendationAccuracy, RecommendationRequest, RecommendedCategory, ValidationRequest,
};

/// Client for the external context-aware recommendation model.
///
/// The model maps (location, activity, time-of-day) to a place category and
/// exposes validity checking and retraining. It is a black box queried over
/// HTTP; this trait is the seam the recommendation service is tested through.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContextAwareApi: Send + Sync {
    /// Asks the model for a place category matching the request context
    async fn recommend_category(
        &self,
        request: &RecommendationRequest,
    ) -> AppResult<RecommendedCategory>;

    /// Asks the model whether the client-proposed category is valid now
    async fn check_validity(&self, request: &ValidationRequest) -> AppResult<bool>;

    /// Submits a new training record and returns the updated accuracy
    async fn train_model(&self, request: &ValidationRequest) -> AppResult<RecommendationAccuracy>;
}

/// reqwest-based implementation against the model server
pub struct HttpContextApi {
    http_client: HttpClient,
    api_url: String,
}

impl HttpContextApi {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
        }
    }

    async fn ensure_success(response: reqwest::Response) -> AppResult<reqwest::Response> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Context-aware API returned status {}: {}",
                status, body
            )));
        }
        Ok(response)
    }
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    place_category: String,
}

#[derive(Debug, Deserialize)]
struct ValidityResponse {
    /// 1 means the proposed category is valid, 0 means it is not
    result: u8,
}

#[derive(Debug, Deserialize)]
struct TrainResponse {
    accuracy: f64,
    correct_samples: u32,
}

#[async_trait]
impl ContextAwareApi for HttpContextApi {
    async fn recommend_category(
        &self,
        request: &RecommendationRequest,
    ) -> AppResult<RecommendedCategory> {
        let url = format!("{}/recommendation/places", self.api_url);

        let response = self.http_client.get(&url).query(request).send().await?;
        let response = Self::ensure_success(response).await?;

        let places: PlacesResponse = response.json().await?;
        tracing::debug!(
            user = %request.user,
            category = %places.place_category,
            "Model recommended a place category"
        );

        Ok(RecommendedCategory {
            place_category: places.place_category,
        })
    }

    async fn check_validity(&self, request: &ValidationRequest) -> AppResult<bool> {
        let url = format!("{}/recommendation/validity", self.api_url);

        let response = self.http_client.get(&url).query(request).send().await?;
        let response = Self::ensure_success(response).await?;

        let validity: ValidityResponse = response.json().await?;
        Ok(validity.result == 1)
    }

    async fn train_model(&self, request: &ValidationRequest) -> AppResult<RecommendationAccuracy> {
        let url = format!("{}/recommendation/train", self.api_url);

        let response = self.http_client.post(&url).json(request).send().await?;
        let response = Self::ensure_success(response).await?;

        let trained: TrainResponse = response.json().await?;
        tracing::info!(
            user = %request.user,
            accuracy = trained.accuracy,
            correct_samples = trained.correct_samples,
            "Model retrained"
        );

        Ok(RecommendationAccuracy {
            accuracy: trained.accuracy,
            correct_samples: trained.correct_samples,
        })
    }
}
