//! # Admin Poll Listing
//!
//! Everything the poll dashboard shows is derived here from the raw poll
//! records the backend returns: search, status filter, sorting, pages,
//! the leading option per poll and the analytics summary.
//!
//! ## Leading option
//! - Count raw vote records per option
//! - Highest count wins, ties go to the option listed first in the poll
//! - No votes at all: "No votes yet" with a count of 0
use std::{cmp::Reverse, collections::HashMap, collections::HashSet, str::FromStr};

use tracing::{info, warn};

use crate::{
    api::ApiClient,
    error::{AdminError, ApiError},
    models::Poll,
    session::AdminSession,
    utils::{Page, contains_ignore_case, paginate, percentage, truncate},
};

pub const POLLS_PER_PAGE: usize = 10;
pub const NO_VOTES_YET: &str = "No votes yet";
pub const LOAD_FAILED: &str = "Failed to load polls. Please try again.";
pub const TOGGLE_FAILED: &str = "Failed to update poll status. Please try again.";
pub const DELETE_FAILED: &str = "Failed to delete poll. Please try again.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    fn matches(self, poll: &Poll) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => poll.active,
            StatusFilter::Inactive => !poll.active,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "inactive" => Ok(StatusFilter::Inactive),
            other => Err(format!("unknown status filter: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    Newest,
    Votes,
    Title,
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newest" => Ok(SortBy::Newest),
            "votes" => Ok(SortBy::Votes),
            "title" => Ok(SortBy::Title),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollFilter {
    pub search: String,
    pub status: StatusFilter,
    pub sort: SortBy,
    pub page: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadingOption {
    pub option_id: Option<String>,
    pub text: String,
    pub votes: usize,
    pub total_votes: usize,
}

impl LeadingOption {
    pub fn percentage(&self) -> u32 {
        percentage(self.votes, self.total_votes)
    }
}

pub fn leading_option(poll: &Poll) -> LeadingOption {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for vote in &poll.votes {
        *counts.entry(vote.option_id.as_str()).or_default() += 1;
    }

    let mut leader: Option<(&str, usize)> = None;
    for option in &poll.options {
        let votes = counts.get(option.id.as_str()).copied().unwrap_or(0);
        if votes > 0 && leader.is_none_or(|(_, best)| votes > best) {
            leader = Some((option.id.as_str(), votes));
        }
    }

    match leader {
        Some((option_id, votes)) => LeadingOption {
            option_id: Some(option_id.to_string()),
            text: poll
                .option(option_id)
                .map(|option| option.text.clone())
                .unwrap_or_default(),
            votes,
            total_votes: poll.votes.len(),
        },
        None => LeadingOption {
            option_id: None,
            text: NO_VOTES_YET.to_string(),
            votes: 0,
            total_votes: poll.votes.len(),
        },
    }
}

#[derive(Debug, Default)]
pub struct PollList {
    polls: Vec<Poll>,
    toggling: HashSet<String>,
    error: Option<String>,
}

impl PollList {
    pub fn new(polls: Vec<Poll>) -> Self {
        Self {
            polls,
            ..Default::default()
        }
    }

    pub async fn load(client: &ApiClient, session: &AdminSession) -> Result<Self, AdminError> {
        let polls = client.list_polls(session).await.map_err(|e| {
            warn!("{LOAD_FAILED} {e}");
            e
        })?;

        info!("Loaded {} polls", polls.len());
        Ok(Self::new(polls))
    }

    pub fn polls(&self) -> &[Poll] {
        &self.polls
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn is_toggling(&self, poll_id: &str) -> bool {
        self.toggling.contains(poll_id)
    }

    pub fn visible(&self, filter: &PollFilter) -> Page<&Poll> {
        let mut polls: Vec<&Poll> = self
            .polls
            .iter()
            .filter(|poll| contains_ignore_case(&poll.title, &filter.search))
            .filter(|poll| filter.status.matches(poll))
            .collect();

        match filter.sort {
            SortBy::Newest => polls.sort_by_key(|poll| Reverse(poll.created_at)),
            SortBy::Votes => polls.sort_by_key(|poll| Reverse(poll.votes.len())),
            SortBy::Title => polls.sort_by_key(|poll| poll.title.to_lowercase()),
        }

        paginate(polls, filter.page, POLLS_PER_PAGE)
    }

    pub fn begin_toggle(&mut self, poll_id: &str) -> Result<(), AdminError> {
        if !self.toggling.insert(poll_id.to_string()) {
            return Err(AdminError::Pending(poll_id.to_string()));
        }

        self.error = None;
        Ok(())
    }

    /// Flips `active` only once the backend has confirmed. A rejected
    /// session is returned instead of becoming the banner.
    pub fn finish_toggle(
        &mut self,
        poll_id: &str,
        outcome: Result<(), ApiError>,
    ) -> Result<(), AdminError> {
        self.toggling.remove(poll_id);

        match outcome {
            Ok(()) => {
                if let Some(poll) = self.polls.iter_mut().find(|poll| poll.id == poll_id) {
                    poll.active = !poll.active;
                    info!("Poll {poll_id} is now {}", status_label(poll.active));
                }
            }
            Err(ApiError::Unauthorized) => return Err(ApiError::Unauthorized.into()),
            Err(e) => {
                warn!("Toggling poll {poll_id} failed: {e}");
                self.error = Some(TOGGLE_FAILED.to_string());
            }
        }

        Ok(())
    }

    pub async fn toggle(
        &mut self,
        client: &ApiClient,
        session: &AdminSession,
        poll_id: &str,
    ) -> Result<(), AdminError> {
        self.begin_toggle(poll_id)?;
        let outcome = client.toggle_poll(session, poll_id).await;

        self.finish_toggle(poll_id, outcome)
    }

    pub fn finish_delete(
        &mut self,
        poll_id: &str,
        outcome: Result<(), ApiError>,
    ) -> Result<(), AdminError> {
        match outcome {
            Ok(()) => {
                self.polls.retain(|poll| poll.id != poll_id);
                info!("Deleted poll {poll_id}");
            }
            Err(ApiError::Unauthorized) => return Err(ApiError::Unauthorized.into()),
            Err(e) => {
                warn!("Deleting poll {poll_id} failed: {e}");
                self.error = Some(DELETE_FAILED.to_string());
            }
        }

        Ok(())
    }

    pub async fn delete(
        &mut self,
        client: &ApiClient,
        session: &AdminSession,
        poll_id: &str,
    ) -> Result<(), AdminError> {
        self.error = None;
        let outcome = client.delete_poll(session, poll_id).await;

        self.finish_delete(poll_id, outcome)
    }
}

pub fn status_label(active: bool) -> &'static str {
    if active { "Active" } else { "Inactive" }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analytics {
    pub total_polls: usize,
    pub active_polls: usize,
    pub total_votes: usize,
    pub average_votes: usize,
    pub active_percentage: u32,
    /// Truncated title and vote count per poll, in listing order.
    pub bars: Vec<(String, usize)>,
}

impl Analytics {
    pub fn from_polls(polls: &[Poll]) -> Self {
        let total_polls = polls.len();
        let active_polls = polls.iter().filter(|poll| poll.active).count();
        let total_votes = polls.iter().map(|poll| poll.votes.len()).sum();

        let average_votes = if total_polls == 0 {
            0
        } else {
            (total_votes as f64 / total_polls as f64).round() as usize
        };

        Self {
            total_polls,
            active_polls,
            total_votes,
            average_votes,
            active_percentage: percentage(active_polls, total_polls),
            bars: polls
                .iter()
                .map(|poll| (truncate(&poll.title, 20), poll.votes.len()))
                .collect(),
        }
    }
}
