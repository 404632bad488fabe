use crate::events::{BlurTarget, DataEvent};
use crate::session::{AdminSession, SessionStore};
use crate::state::autocomplete::SuggestionField;
use crate::suggestions::cities::{CitySource, RemoteCityDataset};
use crate::suggestions::filter_candidates;
use directory_api::{
    endpoints::{
        businesses::{BusinessUpdate, NewBusiness, UpdateBusiness},
        BusinessId,
    },
    Client, Request,
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Runs API calls and suggestion lookups off the UI loop and reports back
/// through `DataEvent`s.
#[derive(Clone)]
pub struct DataLoader {
    pub api_client: Arc<Client>,
    pub api_url: Arc<str>,
    pub cities: Arc<CitySource<RemoteCityDataset>>,
    pub sessions: Arc<SessionStore>,
    pub data_tx: mpsc::UnboundedSender<DataEvent>,
}

impl DataLoader {
    pub fn new(
        api_url: &str,
        cities: Arc<CitySource<RemoteCityDataset>>,
        sessions: Arc<SessionStore>,
        data_tx: mpsc::UnboundedSender<DataEvent>,
    ) -> Self {
        Self {
            api_client: Arc::new(Client::new(api_url)),
            api_url: Arc::from(api_url),
            cities,
            sessions,
            data_tx,
        }
    }

    fn admin_client(&self, token: &SecretString) -> Client {
        Client::with_token(&self.api_url, token)
    }

    pub async fn load_businesses(&self) {
        tracing::info!("Loading businesses");
        match self.api_client.send(Request::businesses().list()).await {
            Ok(businesses) => {
                tracing::info!("Loaded {} businesses from API", businesses.len());
                let _ = self.data_tx.send(DataEvent::BusinessesLoaded { businesses });
            }
            Err(e) => {
                tracing::error!("Failed to load businesses from API: {}", e);
                let _ = self.data_tx.send(DataEvent::LoadError {
                    error: e.to_string(),
                });
            }
        }
    }

    /// Public submission; no token needed
    pub async fn create_business(&self, business: NewBusiness) {
        tracing::info!("Submitting business {:?}", business.name);
        match self.api_client.send(Request::businesses().create(business)).await {
            Ok(business) => {
                let _ = self.data_tx.send(DataEvent::BusinessCreated { business });
            }
            Err(e) => {
                let _ = self.data_tx.send(DataEvent::BusinessCreateFailed {
                    error: e.to_string(),
                });
            }
        }
    }

    pub async fn update_business(
        &self,
        token: SecretString,
        business_id: BusinessId,
        update: BusinessUpdate,
    ) {
        tracing::info!("Updating business {}", business_id);
        let request = UpdateBusiness::with_update(business_id, update);
        match self.admin_client(&token).send(request).await {
            Ok(business) => {
                let _ = self.data_tx.send(DataEvent::BusinessUpdated { business });
            }
            Err(e) if e.is_unauthorized() => self.expire_session(&e),
            Err(e) => {
                let _ = self.data_tx.send(DataEvent::BusinessUpdateFailed {
                    business_id,
                    error: e.to_string(),
                });
            }
        }
    }

    pub async fn delete_business(&self, token: SecretString, business_id: BusinessId) {
        tracing::info!("Deleting business {}", business_id);
        match self
            .admin_client(&token)
            .send(Request::businesses().delete(business_id))
            .await
        {
            Ok(response) => {
                tracing::debug!("Delete response: {}", response.message);
                let _ = self.data_tx.send(DataEvent::BusinessDeleted { business_id });
            }
            Err(e) if e.is_unauthorized() => self.expire_session(&e),
            Err(e) => {
                let _ = self.data_tx.send(DataEvent::BusinessDeleteFailed {
                    business_id,
                    error: e.to_string(),
                });
            }
        }
    }

    /// Logs in, remembers the token on disk and loads the admin list.
    pub async fn login(&self, email: String, password: SecretString) {
        tracing::info!("Logging in as {}", email);
        let request = Request::admin().login(email.clone(), password.expose_secret());
        match self.api_client.send(request).await {
            Ok(response) => {
                let session = AdminSession::new(email, response.token);
                if let Err(e) = self.sessions.save(&session) {
                    tracing::warn!("Failed to save admin session: {}", e);
                }
                let _ = self.data_tx.send(DataEvent::LoggedIn { session });
                self.load_businesses().await;
            }
            Err(e) => {
                tracing::warn!("Login failed: {}", e);
                let error = if e.is_unauthorized() {
                    "Invalid email or password".to_string()
                } else {
                    e.to_string()
                };
                let _ = self.data_tx.send(DataEvent::LoginFailed { error });
            }
        }
    }

    /// Checks a stored token against the server
    pub async fn verify_session(&self, session: AdminSession) {
        match self.admin_client(&session.token).send(Request::admin().verify()).await {
            Ok(response) if response.valid => {
                let _ = self.data_tx.send(DataEvent::SessionVerified { session });
            }
            Ok(_) => self.expire_session(&"token reported invalid"),
            Err(e) => self.expire_session(&e),
        }
    }

    pub fn clear_session(&self) {
        if let Err(e) = self.sessions.clear() {
            tracing::warn!("Failed to clear admin session: {}", e);
        }
    }

    fn expire_session(&self, reason: &dyn std::fmt::Display) {
        tracing::warn!("Admin session rejected: {}", reason);
        self.clear_session();
        let _ = self.data_tx.send(DataEvent::SessionExpired);
    }

    /// Debounced city pass: loads (or joins the load of) the city pool and
    /// filters it. A failed load yields no suggestions.
    pub async fn city_suggestions(&self, generation: u64, query: String) {
        if !self.cities.is_cached() {
            let _ = self.data_tx.send(DataEvent::CityLookupStarted { generation });
        }

        let (candidates, pool_loaded) = match self.cities.load().await {
            Ok(pool) => (filter_candidates(&pool, &query), true),
            Err(e) => {
                tracing::debug!("No city suggestions for {:?}: {}", query, e);
                (Vec::new(), false)
            }
        };

        let _ = self.data_tx.send(DataEvent::SuggestionsReady {
            field: SuggestionField::City,
            generation,
            candidates,
            pool_loaded,
        });
    }

    /// Debounced pass over an in-memory pool; the filtering happens in the reducer.
    pub fn suggestion_pass_due(&self, field: SuggestionField, generation: u64) {
        let _ = self
            .data_tx
            .send(DataEvent::SuggestionPassDue { field, generation });
    }

    pub fn blur_elapsed(&self, target: BlurTarget, token: u64) {
        let _ = self.data_tx.send(DataEvent::BlurGraceElapsed { target, token });
    }
}

impl std::fmt::Debug for DataLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataLoader")
            .field("api_url", &self.api_url)
            .field("cities_cached", &self.cities.is_cached())
            .finish()
    }
}
