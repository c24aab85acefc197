use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::provider::session::{SessionSlot, SessionToken};
use crate::provider::{ManagedClient, ResourceProvider};
use async_trait::async_trait;
use config::ConfigError;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use zeroize::Zeroizing;

/// Upper bound for every call made to wg-easy, login included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Resource segment of the wg-easy client API
const RESOURCE: &str = "wireguard";

/// Request body for session login
#[derive(Serialize)]
struct LoginRequest<'a> {
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    #[serde(default)]
    session_token: Option<String>,
}

/// Request body for client creation
#[derive(Debug, Serialize)]
struct CreateClientRequest<'a> {
    name: &'a str,
}

/// Client entry as returned by wg-easy
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClientRecord {
    id: String,
    name: String,
    address: String,
    public_key: String,
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl ClientRecord {
    fn into_managed(self, configuration: String) -> ManagedClient {
        ManagedClient {
            id: self.id,
            name: self.name,
            address: self.address,
            public_key: self.public_key,
            configuration,
            enabled: self.enabled,
        }
    }
}

/// Client for the wg-easy web API.
///
/// Holds one bearer session, created on first use. Any authenticated call
/// answered with 401 drops that session, logs in again and is retried
/// exactly once; the second answer is final.
pub struct WgEasyClient {
    http: Client,
    base_url: Url,
    password: Zeroizing<String>,
    session: SessionSlot,
}

impl std::fmt::Debug for WgEasyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WgEasyClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl WgEasyClient {
    /// Create a client for the wg-easy instance at `base_url`.
    pub fn new(base_url: &str, password: &str) -> AppResult<Self> {
        Self::with_timeout(base_url, password, REQUEST_TIMEOUT)
    }

    /// Like [`WgEasyClient::new`] with a custom per-call timeout.
    pub(crate) fn with_timeout(base_url: &str, password: &str, timeout: Duration) -> AppResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            AppError::Config(ConfigError::Message(format!(
                "invalid wg-easy URL {}: {}",
                base_url, e
            )))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(ConfigError::Message(format!(
                "wg-easy URL {} cannot carry a path",
                base_url
            ))));
        }

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url,
            password: Zeroizing::new(password.to_string()),
            session: SessionSlot::new(),
        })
    }

    /// Create a client from the application config
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        Self::new(&config.wg_easy_url(), &config.wg_password)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Build an API URL, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// POST /api/session. Failures are logged and yield `None`.
    async fn login(&self) -> Option<SessionToken> {
        let url = self.endpoint(&["api", "session"]);
        let request = LoginRequest {
            password: self.password.as_str(),
        };

        let response = match self.http.post(url).json(&request).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("wg-easy session create failed: {}", e);
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            error!("wg-easy auth failed: {}", response.status());
            return None;
        }

        match response.json::<LoginResponse>().await {
            Ok(LoginResponse {
                session_token: Some(token),
            }) if !token.is_empty() => {
                debug!("wg-easy session established");
                Some(SessionToken::new(token))
            }
            Ok(_) => {
                error!("wg-easy session response carried no token");
                None
            }
            Err(e) => {
                error!("Failed to parse wg-easy session response: {}", e);
                None
            }
        }
    }

    async fn ensure_session(&self) -> Option<SessionToken> {
        self.session.get_or_login(|| self.login()).await
    }

    /// Send an authenticated request with one-shot session renewal.
    ///
    /// `build` is called once per attempt.
    async fn send_authorized<F>(&self, build: F) -> AppResult<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let token = self.ensure_session().await;
        let response = authorize(build(), token.as_ref()).send().await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        warn!("wg-easy rejected the session, logging in again");
        self.session.invalidate(token.as_ref()).await;
        let token = self.ensure_session().await;
        Ok(authorize(build(), token.as_ref()).send().await?)
    }

    /// GET /api/wireguard/client/{id}/configuration
    async fn fetch_configuration(&self, client_id: &str) -> AppResult<String> {
        let url = self.endpoint(&["api", RESOURCE, "client", client_id, "configuration"]);
        let response = self.send_authorized(|| self.http.get(url.clone())).await?;

        if response.status() != StatusCode::OK {
            error!(
                "wg-easy configuration fetch for {} failed: {}",
                client_id,
                response.status()
            );
            return Err(AppError::provider("configuration fetch", response.status()));
        }

        Ok(response.text().await?)
    }
}

fn authorize(request: RequestBuilder, token: Option<&SessionToken>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token.as_str()),
        None => request,
    }
}

async fn decode<T: DeserializeOwned>(response: Response, operation: &str) -> AppResult<T> {
    response.json::<T>().await.map_err(|e| {
        error!("Failed to parse wg-easy {} response: {}", operation, e);
        AppError::InvalidResponse(format!("{}: {}", operation, e))
    })
}

#[async_trait]
impl ResourceProvider for WgEasyClient {
    async fn create_client(&self, name: &str) -> AppResult<ManagedClient> {
        if name.trim().is_empty() {
            error!("Refusing to create client with empty name");
            return Err(AppError::validation("client name required"));
        }

        let url = self.endpoint(&["api", RESOURCE, "client"]);
        let body = CreateClientRequest { name };

        let response = self
            .send_authorized(|| self.http.post(url.clone()).json(&body))
            .await
            .inspect_err(|e| error!("wg-easy create client failed: {}", e))?;

        if response.status() != StatusCode::CREATED {
            error!("wg-easy client create failed: {}", response.status());
            return Err(AppError::provider("create", response.status()));
        }

        let record: ClientRecord = decode(response, "create").await?;
        let configuration = self.fetch_configuration(&record.id).await?;
        info!("wg-easy client {} created with id {}", record.name, record.id);

        Ok(record.into_managed(configuration))
    }

    async fn delete_client(&self, client_id: &str) -> bool {
        if client_id.trim().is_empty() {
            error!("Refusing to delete client with empty id");
            return false;
        }

        let url = self.endpoint(&["api", RESOURCE, "client", client_id]);
        match self.send_authorized(|| self.http.delete(url.clone())).await {
            Ok(response) if response.status().is_success() => {
                info!("wg-easy client {} deleted", client_id);
                true
            }
            Ok(response) => {
                error!("wg-easy delete of {} failed: {}", client_id, response.status());
                false
            }
            Err(e) => {
                error!("wg-easy delete of {} failed: {}", client_id, e);
                false
            }
        }
    }

    async fn get_client(&self, client_id: &str) -> AppResult<ManagedClient> {
        if client_id.trim().is_empty() {
            error!("Refusing to fetch client with empty id");
            return Err(AppError::validation("client id required"));
        }

        let url = self.endpoint(&["api", RESOURCE, "client", client_id]);
        let response = self
            .send_authorized(|| self.http.get(url.clone()))
            .await
            .inspect_err(|e| error!("wg-easy get client failed: {}", e))?;

        if response.status() != StatusCode::OK {
            error!("wg-easy get client {} failed: {}", client_id, response.status());
            return Err(AppError::provider("get", response.status()));
        }

        let record: ClientRecord = decode(response, "get").await?;
        let configuration = self.fetch_configuration(client_id).await?;

        Ok(record.into_managed(configuration))
    }

    async fn list_clients(&self) -> Vec<ManagedClient> {
        let url = self.endpoint(&["api", RESOURCE, "client"]);
        let response = match self.send_authorized(|| self.http.get(url.clone())).await {
            Ok(response) => response,
            Err(e) => {
                error!("wg-easy list clients failed: {}", e);
                return Vec::new();
            }
        };

        if response.status() != StatusCode::OK {
            error!("wg-easy list clients failed: {}", response.status());
            return Vec::new();
        }

        match decode::<Vec<ClientRecord>>(response, "list").await {
            // Bulk responses carry no configuration
            Ok(records) => records
                .into_iter()
                .map(|record| record.into_managed(String::new()))
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}
