//! HTTP client for communicating with the gym membership API

use async_trait::async_trait;
use chrono::NaiveDate;
use gymdesk_core::{
    Credentials, Error, LoginResponse, Member, MemberDetails, MemberFilter, MemberId,
    MemberUpdate, RenewRequest, Result, config::ApiConfig,
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::service::{Authenticator, MemberMutation, MemberQuery};
use crate::session::Session;

/// API client for making HTTP requests to the membership API
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Option<Session>,
}

impl ApiClient {
    /// Create a new API client with the default request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// Create a new API client with an explicit request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::configuration(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session: None,
        })
    }

    /// Create a client from the `[api]` configuration section
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::with_timeout(
            config.base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Attach a session; its token is sent as a bearer token
    #[must_use]
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// The attached session, if any
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Base URL all paths are appended to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn member_path(member_id: &MemberId, suffix: &str) -> String {
        format!("/members/{}{suffix}", urlencoding::encode(member_id.as_str()))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let request = self.client.request(method, url);

        match &self.session {
            Some(session) => request.bearer_auth(session.token()),
            None => request,
        }
    }

    /// Send a request and turn transport failures and non-2xx answers into errors
    async fn send(request: RequestBuilder, endpoint: &str) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::http(format!("{endpoint}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint, status = status.as_u16(), "API returned error status");
            return Err(Error::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        Ok(response)
    }

    /// Read the body as JSON without trusting its shape yet
    async fn read_json(response: Response, endpoint: &str) -> Result<serde_json::Value> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::http(format!("{endpoint}: failed to read body: {e}")))?;

        serde_json::from_slice(&bytes).map_err(|e| Error::malformed(endpoint, e.to_string()))
    }

    fn decode<T: DeserializeOwned>(value: serde_json::Value, endpoint: &str) -> Result<T> {
        serde_json::from_value(value).map_err(|e| Error::malformed(endpoint, e.to_string()))
    }
}

#[async_trait]
impl MemberQuery for ApiClient {
    async fn list_members(&self, filter: &MemberFilter) -> Result<Vec<Member>> {
        let endpoint = "/members";
        let params = filter.query_pairs();
        debug!(endpoint, ?params, "listing members");

        let mut request = self.request(Method::GET, endpoint);
        if !params.is_empty() {
            request = request.query(&params);
        }

        let response = Self::send(request, endpoint).await?;
        let body = Self::read_json(response, endpoint).await?;

        if !body.is_array() {
            return Err(Error::malformed(endpoint, "expected an array of members"));
        }
        Self::decode(body, endpoint)
    }

    async fn member_details(&self, member_id: &MemberId) -> Result<Option<MemberDetails>> {
        let endpoint = Self::member_path(member_id, "/details");
        debug!(%member_id, "fetching member details");

        let request = self.request(Method::GET, &endpoint);
        let response = match Self::send(request, &endpoint).await {
            Ok(response) => response,
            Err(Error::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let body = Self::read_json(response, &endpoint).await?;
        if !body.is_object() {
            return Err(Error::malformed(&endpoint, "expected a details object"));
        }

        let details: MemberDetails = Self::decode(body, &endpoint)?;
        Ok(details.member.is_some().then_some(details))
    }
}

#[async_trait]
impl MemberMutation for ApiClient {
    async fn update_member(&self, member_id: &MemberId, update: &MemberUpdate) -> Result<()> {
        update.check()?;

        let endpoint = format!("/members/update/{}", urlencoding::encode(member_id.as_str()));
        let request = self.request(Method::PUT, &endpoint).json(update);
        Self::send(request, &endpoint).await?;

        info!(%member_id, "member updated");
        Ok(())
    }

    async fn delete_member(&self, member_id: &MemberId) -> Result<()> {
        let endpoint = Self::member_path(member_id, "");
        let request = self.request(Method::DELETE, &endpoint);
        Self::send(request, &endpoint).await?;

        info!(%member_id, "member deleted");
        Ok(())
    }

    async fn renew_member(&self, member_id: &MemberId, new_end_date: NaiveDate) -> Result<()> {
        let endpoint = Self::member_path(member_id, "/renew");
        let request = self
            .request(Method::POST, &endpoint)
            .json(&RenewRequest { new_end_date });
        Self::send(request, &endpoint).await?;

        info!(%member_id, %new_end_date, "membership renewed");
        Ok(())
    }
}

#[async_trait]
impl Authenticator for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let endpoint = "/auth/login";
        let request = self.request(Method::POST, endpoint).json(credentials);

        let response = match Self::send(request, endpoint).await {
            Ok(response) => response,
            Err(Error::Status { status, .. })
                if status == StatusCode::UNAUTHORIZED.as_u16()
                    || status == StatusCode::BAD_REQUEST.as_u16() =>
            {
                return Err(Error::Authentication("invalid credentials".to_string()));
            }
            Err(e) => return Err(e),
        };

        let body = Self::read_json(response, endpoint).await?;
        let LoginResponse { token } = Self::decode(body, endpoint)?;
        let session = Session::new(token).map_err(|e| Error::malformed(endpoint, e.to_string()))?;

        info!(username = %credentials.username, "logged in");
        Ok(session)
    }
}
