//! Single poll as the admin sees it: per-option breakdown and the voter list.
use tracing::{info, warn};

use crate::{
    api::ApiClient,
    error::{AdminError, ApiError},
    models::{Poll, VoteRecord},
    session::AdminSession,
    utils::{Page, contains_ignore_case, paginate, percentage},
};

pub const VOTERS_PER_PAGE: usize = 100;
pub const DELETE_VOTE_FAILED: &str = "Failed to delete vote. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionBreakdown {
    pub option_id: String,
    pub text: String,
    pub votes: usize,
    /// Share of all voters of this poll, rounded.
    pub percentage: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoterFilter {
    /// Matches voter name or email, case-insensitive.
    pub search: String,
    /// Option text to keep, `None` for every option.
    pub option: Option<String>,
    pub page: usize,
}

#[derive(Debug, Clone)]
pub struct PollDetail {
    poll: Poll,
    voters: Vec<VoteRecord>,
    page: usize,
    error: Option<String>,
}

impl PollDetail {
    pub fn new(poll: Poll, voters: Vec<VoteRecord>) -> Self {
        Self {
            poll,
            voters,
            page: 1,
            error: None,
        }
    }

    pub async fn load(
        client: &ApiClient,
        session: &AdminSession,
        poll_id: &str,
    ) -> Result<Self, AdminError> {
        let poll = client.poll_detail(session, poll_id).await?;
        let voters = client.list_votes(session, poll_id).await?;

        info!("Loaded poll {poll_id} with {} voters", voters.len());
        Ok(Self::new(poll, voters))
    }

    pub fn poll(&self) -> &Poll {
        &self.poll
    }

    pub fn voters(&self) -> &[VoteRecord] {
        &self.voters
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn breakdown(&self) -> Vec<OptionBreakdown> {
        let total = self.voters.len();

        self.poll
            .options
            .iter()
            .map(|option| {
                let votes = self
                    .voters
                    .iter()
                    .filter(|vote| vote.option_id == option.id)
                    .count();

                OptionBreakdown {
                    option_id: option.id.clone(),
                    text: option.text.clone(),
                    votes,
                    percentage: percentage(votes, total),
                }
            })
            .collect()
    }

    /// Distinct option texts for the voter filter, in poll order.
    pub fn option_texts(&self) -> Vec<&str> {
        let mut texts: Vec<&str> = Vec::new();
        for option in &self.poll.options {
            if !texts.contains(&option.text.as_str()) {
                texts.push(&option.text);
            }
        }
        texts
    }

    fn option_text<'a>(&'a self, vote: &'a VoteRecord) -> Option<&'a str> {
        vote.option
            .as_ref()
            .map(|option| option.text.as_str())
            .or_else(|| self.poll.option(&vote.option_id).map(|option| option.text.as_str()))
    }

    pub fn filtered_voters(&self, filter: &VoterFilter) -> Page<&VoteRecord> {
        let voters = self
            .voters
            .iter()
            .filter(|vote| {
                let Some(voter) = &vote.voter else {
                    return filter.search.trim().is_empty();
                };
                contains_ignore_case(&voter.name, &filter.search)
                    || contains_ignore_case(&voter.email, &filter.search)
            })
            .filter(|vote| match &filter.option {
                Some(text) => self.option_text(vote) == Some(text.as_str()),
                None => true,
            })
            .collect();

        paginate(voters, filter.page, VOTERS_PER_PAGE)
    }

    pub fn option_label<'a>(&'a self, vote: &'a VoteRecord) -> &'a str {
        self.option_text(vote).unwrap_or("Unknown option")
    }

    /// Drops the row once the backend confirmed and goes back to page 1.
    pub fn finish_delete_vote(
        &mut self,
        vote_id: &str,
        outcome: Result<(), ApiError>,
    ) -> Result<(), AdminError> {
        match outcome {
            Ok(()) => {
                self.voters.retain(|vote| vote.id != vote_id);
                self.page = 1;
                self.error = None;
                info!("Deleted vote {vote_id}");
            }
            Err(ApiError::Unauthorized) => return Err(ApiError::Unauthorized.into()),
            Err(e) => {
                warn!("Deleting vote {vote_id} failed: {e}");
                self.error = Some(DELETE_VOTE_FAILED.to_string());
            }
        }

        Ok(())
    }

    pub async fn delete_vote(
        &mut self,
        client: &ApiClient,
        session: &AdminSession,
        vote_id: &str,
    ) -> Result<(), AdminError> {
        let outcome = client.delete_vote(session, vote_id).await;

        self.finish_delete_vote(vote_id, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OptionRef, PollOption, VoterRecord};

    fn vote(id: &str, option_id: &str, name: &str, email: &str) -> VoteRecord {
        VoteRecord {
            id: id.into(),
            voter_id: None,
            option_id: option_id.into(),
            poll_id: Some("p".into()),
            created_at: None,
            voter: Some(VoterRecord {
                name: name.into(),
                email: email.into(),
                verified: true,
            }),
            option: None,
        }
    }

    fn detail() -> PollDetail {
        let poll = Poll {
            id: "p".into(),
            title: "Framework".into(),
            active: true,
            options: vec![
                PollOption {
                    id: "r".into(),
                    poll_id: None,
                    text: "React".into(),
                },
                PollOption {
                    id: "s".into(),
                    poll_id: None,
                    text: "Svelte".into(),
                },
                PollOption {
                    id: "v".into(),
                    poll_id: None,
                    text: "Vue".into(),
                },
            ],
            created_at: None,
            votes: Vec::new(),
        };

        PollDetail::new(
            poll,
            vec![
                vote("1", "r", "Ada Lovelace", "ada@example.com"),
                vote("2", "r", "Grace Hopper", "grace@navy.mil"),
                vote("3", "s", "Alan Turing", "alan@example.com"),
            ],
        )
    }

    #[test]
    fn test_breakdown() {
        let breakdown = detail().breakdown();

        assert_eq!(breakdown.len(), 3);
        assert_eq!(breakdown[0].votes, 2);
        assert_eq!(breakdown[0].percentage, 67);
        assert_eq!(breakdown[1].percentage, 33);
        assert_eq!(breakdown[2].votes, 0);
        assert_eq!(breakdown[2].percentage, 0);
    }

    #[test]
    fn test_search_by_name_or_email() {
        let detail = detail();

        let by_name = detail.filtered_voters(&VoterFilter {
            search: "grace".into(),
            ..Default::default()
        });
        let by_email = detail.filtered_voters(&VoterFilter {
            search: "EXAMPLE.COM".into(),
            ..Default::default()
        });

        assert_eq!(by_name.items.len(), 1);
        assert_eq!(by_name.items[0].id, "2");
        assert_eq!(by_email.items.len(), 2);
    }

    #[test]
    fn test_filter_by_option_text() {
        let mut detail = detail();
        detail.voters[2].option = Some(OptionRef {
            id: "s".into(),
            text: "Svelte".into(),
        });

        let react = detail.filtered_voters(&VoterFilter {
            option: Some("React".into()),
            ..Default::default()
        });
        let svelte = detail.filtered_voters(&VoterFilter {
            option: Some("Svelte".into()),
            ..Default::default()
        });

        assert_eq!(react.items.len(), 2);
        assert_eq!(svelte.items.len(), 1);
        assert_eq!(detail.option_label(svelte.items[0]), "Svelte");
    }

    #[test]
    fn test_delete_vote_resets_page() {
        let mut detail = detail();
        detail.set_page(4);

        detail.finish_delete_vote("2", Ok(())).unwrap();

        assert_eq!(detail.voters().len(), 2);
        assert_eq!(detail.page(), 1);
        assert_eq!(detail.breakdown()[0].votes, 1);
    }

    #[test]
    fn test_delete_vote_failure_keeps_row() {
        let mut detail = detail();

        detail.finish_delete_vote("2", Err(ApiError::NotFound)).unwrap();

        assert_eq!(detail.voters().len(), 3);
        assert_eq!(detail.error(), Some(DELETE_VOTE_FAILED));
    }

    #[test]
    fn test_delete_vote_with_rejected_session() {
        let mut detail = detail();

        let result = detail.finish_delete_vote("2", Err(ApiError::Unauthorized));

        assert!(matches!(result, Err(AdminError::Api(ApiError::Unauthorized))));
        assert_eq!(detail.voters().len(), 3);
        assert_eq!(detail.error(), None);
    }

    #[test]
    fn test_option_texts() {
        assert_eq!(detail().option_texts(), vec!["React", "Svelte", "Vue"]);
    }
}
