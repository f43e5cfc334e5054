//! # Admin Session
//!
//! An [`AdminSession`] only exists after the backend accepted a login. Every
//! admin call takes one explicitly and forwards its bearer token, so the
//! backend re-checks authorization on each request. Dropping the value is
//! the logout.
use tracing::info;

use crate::{api::ApiClient, error::AdminError, error::ApiError};

pub const MISSING_ADMIN_FIELDS: &str = "Email and password are required";

#[derive(Debug, Clone)]
pub struct AdminSession {
    email: String,
    token: String,
}

impl AdminSession {
    pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<Self, AdminError> {
        let email = email.trim();

        if email.is_empty() || password.is_empty() {
            return Err(AdminError::InvalidCredentials);
        }

        let response = client.login(email, password).await.map_err(|e| match e {
            ApiError::Unauthorized => AdminError::InvalidCredentials,
            other => AdminError::Api(other),
        })?;

        info!("Admin {email} logged in");

        Ok(Self {
            email: email.to_string(),
            token: response.token,
        })
    }

    /// Picks up a token handed out by an earlier login. Nothing is checked
    /// here, the backend accepts or rejects it on the first admin call.
    pub fn resume(email: &str, token: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            token: token.trim().to_string(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub(crate) fn token(&self) -> &str {
        &self.token
    }

    /// Registers another administrator under this session.
    pub async fn create_admin(
        &self,
        client: &ApiClient,
        email: &str,
        password: &str,
    ) -> Result<(), AdminError> {
        let email = email.trim();

        if email.is_empty() || password.is_empty() {
            return Err(AdminError::Validation(MISSING_ADMIN_FIELDS.to_string()));
        }

        client.create_admin(self, email, password).await?;
        info!("Admin {} created {email}", self.email);

        Ok(())
    }
}
