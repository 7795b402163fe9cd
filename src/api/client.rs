use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use super::envelope::{error_message, Envelope};
use super::{fallback, AuthApi, UserApi, LOGIN_PATH, REGISTER_PATH, USERS_PATH};
use crate::config::ApiConfig;
use crate::error::ClientError;
use crate::models::{AccessToken, LoginRequest, NewUser, RegisterRequest, User, UserUpdate};

const MISSING_DATA: &str = "Malformed response from server: missing data.";

/// reqwest-backed client for the admin backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Self::with_client(&config.base_url, http)
    }

    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url)?;

        // Url::join replaces the last segment unless the path ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path)?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(%method, %url, "api request");
        self.http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
    }

    fn authorized(&self, method: Method, url: Url, token: &str) -> RequestBuilder {
        self.request(method, url).bearer_auth(token)
    }

    /// Passes 2xx responses through; otherwise builds an `Api` error from the
    /// body's `message` or `fallback`.
    async fn ensure_success(response: Response, fallback: &str) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = error_message(&body, fallback);
        tracing::warn!(status = status.as_u16(), %message, "api request failed");
        Err(ClientError::api(status.as_u16(), message))
    }

    async fn read_envelope<T: DeserializeOwned>(
        response: Response,
    ) -> Result<Envelope<T>, ClientError> {
        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| ClientError::contract(format!("Malformed response from server: {e}")))
    }

    async fn read_data<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        Self::read_envelope::<T>(response)
            .await?
            .data
            .ok_or_else(|| ClientError::contract(MISSING_DATA))
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<AccessToken, ClientError> {
        let url = self.endpoint(LOGIN_PATH)?;
        let response = self.request(Method::POST, url).json(request).send().await?;

        // The login form never shows the server's reason
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "login rejected");
            return Err(ClientError::api(status.as_u16(), fallback::LOGIN_FAILED));
        }

        let envelope = Self::read_envelope::<AccessToken>(response).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    async fn register(&self, request: &RegisterRequest) -> Result<Option<String>, ClientError> {
        let url = self.endpoint(REGISTER_PATH)?;
        let response = self.request(Method::POST, url).json(request).send().await?;
        let response = Self::ensure_success(response, fallback::REGISTER_FAILED).await?;

        let envelope = Self::read_envelope::<serde_json::Value>(response).await?;
        Ok(envelope.message)
    }
}

#[async_trait]
impl UserApi for ApiClient {
    async fn list_users(&self, token: &str) -> Result<Vec<User>, ClientError> {
        let url = self.endpoint(USERS_PATH)?;
        let response = self.authorized(Method::GET, url, token).send().await?;
        let response = Self::ensure_success(response, fallback::FETCH_USERS_FAILED).await?;
        Self::read_data(response).await
    }

    async fn create_user(&self, token: &str, user: &NewUser) -> Result<User, ClientError> {
        let url = self.endpoint(USERS_PATH)?;
        let response = self
            .authorized(Method::POST, url, token)
            .json(user)
            .send()
            .await?;
        let response = Self::ensure_success(response, fallback::ADD_USER_FAILED).await?;
        Self::read_data(response).await
    }

    async fn update_user(
        &self,
        token: &str,
        id: i64,
        update: &UserUpdate,
    ) -> Result<User, ClientError> {
        let url = self.endpoint(&format!("{USERS_PATH}/{id}"))?;
        let response = self
            .authorized(Method::PUT, url, token)
            .json(update)
            .send()
            .await?;
        let response = Self::ensure_success(response, fallback::UPDATE_USER_FAILED).await?;
        Self::read_data(response).await
    }

    async fn delete_user(&self, token: &str, id: i64) -> Result<(), ClientError> {
        let url = self.endpoint(&format!("{USERS_PATH}/{id}"))?;
        let response = self.authorized(Method::DELETE, url, token).send().await?;
        Self::ensure_success(response, fallback::DELETE_USER_FAILED).await?;
        Ok(())
    }
}
