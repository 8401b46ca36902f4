use crate::models::{Candidate, Restaurant, Review};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the restaurant API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Source of the candidate list fed to the radius filter
pub trait CandidateProvider {
    fn fetch_candidates(&self) -> impl Future<Output = Result<Vec<Candidate>, ApiError>> + Send;
}

/// Client for the remote restaurant API
///
/// Covers the read endpoints the map and restaurant pages use:
/// - Listing all restaurants
/// - Fetching one restaurant
/// - Fetching a restaurant's reviews
#[derive(Debug, Clone)]
pub struct RestaurantApiClient {
    base_url: String,
    client: Client,
}

impl RestaurantApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!("Fetching {} from: {}", what, url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(format!("{} at {}", what, path)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Failed to fetch {}: {} - {}", what, status, body);
            return Err(ApiError::ApiError(format!("Failed to fetch {}: {}", what, status)));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse {}: {}", what, e)))
    }

    /// List every restaurant
    pub async fn list_restaurants(&self) -> Result<Vec<Restaurant>, ApiError> {
        let restaurants: Vec<Restaurant> = self.get_json("restaurants/", "restaurants").await?;
        tracing::debug!("Fetched {} restaurants", restaurants.len());
        Ok(restaurants)
    }

    /// Fetch a single restaurant by ID
    pub async fn get_restaurant(&self, id: i64) -> Result<Restaurant, ApiError> {
        self.get_json(&format!("restaurants/{}", id), "restaurant").await
    }

    /// Fetch the reviews of a restaurant
    pub async fn get_reviews(&self, id: i64) -> Result<Vec<Review>, ApiError> {
        self.get_json(&format!("restaurants/{}/reviews", id), "reviews").await
    }
}

impl CandidateProvider for RestaurantApiClient {
    async fn fetch_candidates(&self) -> Result<Vec<Candidate>, ApiError> {
        let restaurants = self.list_restaurants().await?;
        Ok(restaurants.into_iter().map(Candidate::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_client_creation() {
        let client = RestaurantApiClient::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();

        assert_eq!(client.base_url(), "http://localhost:8000/");
        assert_eq!(client.url("/restaurants/"), "http://localhost:8000/restaurants/");
        assert_eq!(client.url("restaurants/3/reviews"), "http://localhost:8000/restaurants/3/reviews");
    }
}
