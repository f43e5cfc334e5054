//! # Backend API
//!
//! Typed client for the external poll service. Every response body is
//! decoded into the types in [`crate::models`]; a body that does not match
//! fails with [`ApiError::Decode`] instead of rendering half a poll.
//!
//! ## Status mapping
//! - 404: [`ApiError::NotFound`]
//! - 409: [`ApiError::Conflict`]
//! - 401, 403: [`ApiError::Unauthorized`]
//! - anything else outside 2xx: [`ApiError::Status`]
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{
    error::ApiError,
    models::{
        Ballot, CodeRequest, CodeVerification, CreatedPoll, Credentials, LoginResponse, NewPoll,
        Poll, Results, VoteRecord,
    },
    session::AdminSession,
    utils::trim_base_url,
    voter::Voter,
};

/// The operations the voter wizard needs from the backend.
#[async_trait]
pub trait PollBackend: Send + Sync {
    async fn fetch_poll(&self, poll_id: &str) -> Result<Poll, ApiError>;

    async fn request_code(&self, voter: &Voter) -> Result<(), ApiError>;

    async fn verify_code(&self, code: &str, email: &str) -> Result<(), ApiError>;

    async fn cast_vote(&self, ballot: &Ballot) -> Result<(), ApiError>;

    async fn fetch_results(&self, poll_id: &str) -> Result<Results, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = trim_base_url(base_url);
        Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;

        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Appends each segment percent-encoded, so an id never adds a path
    /// level, a query or a fragment.
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let invalid =
            |reason: String| ApiError::InvalidUrl(format!("{}: {reason}", self.base_url));

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response, ApiError> {
        let path = url.path();
        let response = request.send().await?;
        let status = response.status();

        debug!("{path} -> {status}");

        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        warn!("{path} rejected with {status}: {message}");

        Err(match status {
            StatusCode::NOT_FOUND => ApiError::NotFound,
            StatusCode::CONFLICT => ApiError::Conflict,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized,
            _ => ApiError::Status {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let json_string = response.text().await?;

        Ok(serde_json::from_str(&json_string)?)
    }

    fn authorized(&self, request: RequestBuilder, session: &AdminSession) -> RequestBuilder {
        request.bearer_auth(session.token())
    }

    /// Exchanges admin credentials for a bearer token.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let url = self.url(&["admin", "login"])?;
        let request = self
            .http
            .post(url.clone())
            .json(&Credentials { email, password });

        Self::decode(self.send(request, &url).await?).await
    }

    pub async fn create_admin(
        &self,
        session: &AdminSession,
        email: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        let url = self.url(&["admin"])?;
        let request = self
            .http
            .post(url.clone())
            .json(&Credentials { email, password });

        self.send(self.authorized(request, session), &url).await?;
        Ok(())
    }

    pub async fn list_polls(&self, session: &AdminSession) -> Result<Vec<Poll>, ApiError> {
        let url = self.url(&["poll"])?;
        let request = self.authorized(self.http.get(url.clone()), session);

        Self::decode(self.send(request, &url).await?).await
    }

    pub async fn poll_detail(
        &self,
        session: &AdminSession,
        poll_id: &str,
    ) -> Result<Poll, ApiError> {
        let url = self.url(&["poll", poll_id])?;
        let request = self.authorized(self.http.get(url.clone()), session);

        Self::decode(self.send(request, &url).await?).await
    }

    pub async fn create_poll(
        &self,
        session: &AdminSession,
        poll: &NewPoll,
    ) -> Result<CreatedPoll, ApiError> {
        let url = self.url(&["poll", ""])?;
        let request = self.authorized(self.http.post(url.clone()).json(poll), session);

        Self::decode(self.send(request, &url).await?).await
    }

    pub async fn delete_poll(&self, session: &AdminSession, poll_id: &str) -> Result<(), ApiError> {
        let url = self.url(&["poll", poll_id])?;
        let request = self.authorized(self.http.delete(url.clone()), session);

        self.send(request, &url).await?;
        Ok(())
    }

    pub async fn toggle_poll(&self, session: &AdminSession, poll_id: &str) -> Result<(), ApiError> {
        let url = self.url(&["poll", poll_id, "toggle"])?;
        let request = self.authorized(self.http.patch(url.clone()), session);

        self.send(request, &url).await?;
        Ok(())
    }

    pub async fn list_votes(
        &self,
        session: &AdminSession,
        poll_id: &str,
    ) -> Result<Vec<VoteRecord>, ApiError> {
        let url = self.url(&["votes", "poll", poll_id])?;
        let request = self.authorized(self.http.get(url.clone()), session);

        Self::decode(self.send(request, &url).await?).await
    }

    pub async fn delete_vote(&self, session: &AdminSession, vote_id: &str) -> Result<(), ApiError> {
        let url = self.url(&["votes", vote_id])?;
        let request = self.authorized(self.http.delete(url.clone()), session);

        self.send(request, &url).await?;
        Ok(())
    }
}

#[async_trait]
impl PollBackend for ApiClient {
    async fn fetch_poll(&self, poll_id: &str) -> Result<Poll, ApiError> {
        let url = self.url(&["poll", poll_id])?;
        let request = self.http.get(url.clone());

        Self::decode(self.send(request, &url).await?).await
    }

    async fn request_code(&self, voter: &Voter) -> Result<(), ApiError> {
        let url = self.url(&["otp", "request"])?;
        let request = self.http.post(url.clone()).json(&CodeRequest {
            name: &voter.name,
            email: &voter.email,
        });

        self.send(request, &url).await?;
        Ok(())
    }

    async fn verify_code(&self, code: &str, email: &str) -> Result<(), ApiError> {
        let url = self.url(&["otp", "verify"])?;
        let request = self
            .http
            .post(url.clone())
            .json(&CodeVerification { otp: code, email });

        self.send(request, &url).await?;
        Ok(())
    }

    async fn cast_vote(&self, ballot: &Ballot) -> Result<(), ApiError> {
        let url = self.url(&["vote"])?;
        let request = self.http.post(url.clone()).json(ballot);

        self.send(request, &url).await?;
        Ok(())
    }

    async fn fetch_results(&self, poll_id: &str) -> Result<Results, ApiError> {
        let url = self.url(&["poll", poll_id, "results"])?;
        let request = self.http.get(url.clone());

        Self::decode(self.send(request, &url).await?).await
    }
}
