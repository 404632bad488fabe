pub mod endpoints;
mod error;
mod macros;
pub mod repositories;

pub use crate::error::DirectoryApiError;
use endpoints::cities::CityRecord;
use repositories::*;
use secrecy::{ExposeSecret, SecretString};
pub use tower_api_client::StatusCode;
use tower_api_client::{Client as ApiClient, Request as ApiRequest};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const CITY_DATASET_URL: &str = "https://data.gov.il/api/3/action";
pub const CITY_RESOURCE_ID: &str = "5c78e9fa-c2e2-4771-93ff-7f400a12f7ba";

pub struct Client {
    inner: ApiClient,
}

impl Client {
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: ApiClient::new(base_url),
        }
    }

    /// Client for admin-only endpoints; every request carries the bearer token.
    pub fn with_token(base_url: &str, token: &SecretString) -> Self {
        Self {
            inner: ApiClient::new(base_url).bearer_auth(token.expose_secret()),
        }
    }

    pub async fn send<R>(&self, request: R) -> Result<R::Response, DirectoryApiError>
    where
        R: ApiRequest,
    {
        self.inner.send(request).await.map_err(From::from)
    }
}

/// Client for the public localities dataset that feeds city suggestions.
pub struct CityDatasetClient {
    inner: ApiClient,
}

impl Default for CityDatasetClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CityDatasetClient {
    pub fn new() -> Self {
        Self::with_base_url(CITY_DATASET_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            inner: ApiClient::new(base_url),
        }
    }

    /// Fetches the first page of the dataset and normalizes it, skipping
    /// records that have no usable name.
    pub async fn fetch_cities(&self, resource_id: &str) -> Result<Vec<CityRecord>, DirectoryApiError> {
        let response = self
            .inner
            .send(Request::cities().search(resource_id))
            .await
            .map_err(DirectoryApiError::from)?;

        if !response.success {
            return Err(DirectoryApiError::Dataset(
                "datastore_search reported failure".to_string(),
            ));
        }

        Ok(response
            .result
            .records
            .iter()
            .filter_map(CityRecord::from_value)
            .collect())
    }
}

pub struct Request;

impl Request {
    pub fn new() -> Self {
        Self {}
    }

    pub fn businesses() -> BusinessRepository {
        BusinessRepository::new()
    }

    pub fn admin() -> AdminRepository {
        AdminRepository::new()
    }

    pub fn cities() -> CityRepository {
        CityRepository::new()
    }

    pub fn health() -> endpoints::Health {
        endpoints::Health
    }
}
