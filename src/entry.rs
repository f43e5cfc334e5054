//! Gate in front of the wizard: the poll has to exist and be active.
use tracing::{info, warn};

use crate::{api::PollBackend, error::ApiError, models::Poll, wizard::Wizard};

pub const LOAD_FAILED: &str = "Could not load this poll. Please try again.";

#[derive(Debug, Clone)]
pub enum Entry {
    NotFound,
    Inactive(Poll),
    Ready(Wizard),
    /// Neither found nor missing; the caller may retry.
    Failed(String),
}

impl Entry {
    pub async fn load<B: PollBackend + ?Sized>(backend: &B, poll_id: &str) -> Self {
        info!("Loading poll {poll_id}");

        Self::from_fetch(backend.fetch_poll(poll_id).await)
    }

    pub fn from_fetch(result: Result<Poll, ApiError>) -> Self {
        match result {
            Ok(poll) if poll.active => Entry::Ready(Wizard::new(poll)),
            Ok(poll) => Entry::Inactive(poll),
            Err(ApiError::NotFound) => Entry::NotFound,
            Err(e) => {
                warn!("Fetching poll failed: {e}");
                Entry::Failed(LOAD_FAILED.to_string())
            }
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Entry::Failed(_))
    }
}
