//! # In-memory Store
//!
//! Everything the stub backend knows lives in one [`Store`] behind a mutex.
//!
//! ## Rules
//! - Codes are issued per email and are always [`Config::code`]
//! - Verified emails stay verified for the life of the process
//! - One vote per email per poll, a second one is a conflict
//! - Inactive polls reject votes
//! - Admin routes need a token handed out by a successful login
use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::{config::Config, error::AppError};

pub struct State {
    pub config: Config,
    store: Mutex<Store>,
}

impl State {
    pub fn new(config: Config) -> Arc<Self> {
        let store = Store {
            admins: vec![(config.admin_email.clone(), config.admin_password.clone())],
            ..Default::default()
        };

        Arc::new(Self {
            config,
            store: Mutex::new(store),
        })
    }

    pub fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Clone)]
struct StoredPoll {
    id: u64,
    title: String,
    active: bool,
    created_at: DateTime<Utc>,
    options: Vec<(u64, String)>,
}

#[derive(Clone)]
struct StoredVote {
    id: u64,
    poll_id: u64,
    option_id: u64,
    email: String,
    created_at: DateTime<Utc>,
}

#[derive(Clone)]
struct StoredVoter {
    id: u64,
    name: String,
    verified: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionBody {
    pub id: u64,
    pub poll_id: u64,
    pub text: String,
}

#[derive(Serialize)]
pub struct VoterBody {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub verified: bool,
}

#[derive(Serialize)]
pub struct OptionRefBody {
    pub id: u64,
    pub text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteBody {
    pub id: u64,
    pub voter_id: u64,
    pub option_id: u64,
    pub poll_id: u64,
    pub created_at: DateTime<Utc>,
    pub voter: VoterBody,
    pub option: OptionRefBody,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollBody {
    pub id: u64,
    pub title: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub options: Vec<OptionBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub votes: Option<Vec<VoteBody>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultBody {
    pub option_id: u64,
    pub text: String,
    pub votes: u64,
    pub percentage: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsBody {
    pub options: Vec<ResultBody>,
    pub total_votes: u64,
}

#[derive(Default)]
pub struct Store {
    next_id: u64,
    polls: Vec<StoredPoll>,
    codes: HashMap<String, String>,
    voters: HashMap<String, StoredVoter>,
    votes: Vec<StoredVote>,
    admins: Vec<(String, String)>,
    tokens: HashSet<String>,
}

fn parse_id(raw: &str) -> Result<u64, AppError> {
    raw.trim().parse().map_err(|_| AppError::NotFound)
}

impl Store {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn poll(&self, raw_id: &str) -> Result<&StoredPoll, AppError> {
        let id = parse_id(raw_id)?;
        self.polls
            .iter()
            .find(|poll| poll.id == id)
            .ok_or(AppError::NotFound)
    }

    fn vote_body(&self, vote: &StoredVote) -> VoteBody {
        let voter = self.voters.get(&vote.email);
        let text = self
            .polls
            .iter()
            .find(|poll| poll.id == vote.poll_id)
            .and_then(|poll| poll.options.iter().find(|(id, _)| *id == vote.option_id))
            .map(|(_, text)| text.clone())
            .unwrap_or_default();

        VoteBody {
            id: vote.id,
            voter_id: voter.map(|voter| voter.id).unwrap_or_default(),
            option_id: vote.option_id,
            poll_id: vote.poll_id,
            created_at: vote.created_at,
            voter: VoterBody {
                id: voter.map(|voter| voter.id).unwrap_or_default(),
                name: voter.map(|voter| voter.name.clone()).unwrap_or_default(),
                email: vote.email.clone(),
                verified: voter.is_some_and(|voter| voter.verified),
            },
            option: OptionRefBody {
                id: vote.option_id,
                text,
            },
        }
    }

    fn poll_body(&self, poll: &StoredPoll, with_votes: bool) -> PollBody {
        PollBody {
            id: poll.id,
            title: poll.title.clone(),
            active: poll.active,
            created_at: poll.created_at,
            options: poll
                .options
                .iter()
                .map(|(id, text)| OptionBody {
                    id: *id,
                    poll_id: poll.id,
                    text: text.clone(),
                })
                .collect(),
            votes: with_votes.then(|| {
                self.votes
                    .iter()
                    .filter(|vote| vote.poll_id == poll.id)
                    .map(|vote| self.vote_body(vote))
                    .collect()
            }),
        }
    }

    pub fn public_poll(&self, raw_id: &str) -> Result<PollBody, AppError> {
        Ok(self.poll_body(self.poll(raw_id)?, false))
    }

    pub fn results(&self, raw_id: &str) -> Result<ResultsBody, AppError> {
        let poll = self.poll(raw_id)?;
        let total_votes = self.votes.iter().filter(|vote| vote.poll_id == poll.id).count() as u64;

        let options = poll
            .options
            .iter()
            .map(|(id, text)| {
                let votes = self.votes.iter().filter(|vote| vote.option_id == *id).count() as u64;
                let percentage = if total_votes == 0 {
                    0.0
                } else {
                    votes as f64 / total_votes as f64 * 100.0
                };

                ResultBody {
                    option_id: *id,
                    text: text.clone(),
                    votes,
                    percentage,
                }
            })
            .collect();

        Ok(ResultsBody {
            options,
            total_votes,
        })
    }

    pub fn request_code(&mut self, name: &str, email: &str, code: &str) -> Result<(), AppError> {
        let (name, email) = (name.trim(), email.trim());
        if name.is_empty() || email.is_empty() {
            return Err(AppError::MalformedPayload);
        }

        if !self.voters.contains_key(email) {
            let id = self.next_id();
            self.voters.insert(
                email.to_string(),
                StoredVoter {
                    id,
                    name: name.to_string(),
                    verified: false,
                },
            );
        }

        self.codes.insert(email.to_string(), code.to_string());
        info!("Issued code for {email}");
        Ok(())
    }

    pub fn verify_code(&mut self, otp: &str, email: &str) -> Result<(), AppError> {
        let email = email.trim();
        if self.codes.get(email).map(String::as_str) != Some(otp) {
            return Err(AppError::InvalidCode);
        }

        self.codes.remove(email);
        if let Some(voter) = self.voters.get_mut(email) {
            voter.verified = true;
        }

        Ok(())
    }

    pub fn vote(&mut self, poll_id: &str, option_id: &str, email: &str) -> Result<(), AppError> {
        let poll = self.poll(poll_id)?;
        let (poll_id, active) = (poll.id, poll.active);
        let option_id = parse_id(option_id).map_err(|_| AppError::MalformedPayload)?;

        if !poll.options.iter().any(|(id, _)| *id == option_id) {
            return Err(AppError::MalformedPayload);
        }

        if !active {
            return Err(AppError::Inactive);
        }

        let email = email.trim();
        if !self.voters.get(email).is_some_and(|voter| voter.verified) {
            return Err(AppError::Unverified);
        }

        if self
            .votes
            .iter()
            .any(|vote| vote.poll_id == poll_id && vote.email == email)
        {
            return Err(AppError::AlreadyVoted);
        }

        let id = self.next_id();
        self.votes.push(StoredVote {
            id,
            poll_id,
            option_id,
            email: email.to_string(),
            created_at: Utc::now(),
        });

        info!("Recorded vote {id} in poll {poll_id}");
        Ok(())
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<String, AppError> {
        if !self
            .admins
            .iter()
            .any(|(known, secret)| known == email.trim() && secret == password)
        {
            return Err(AppError::Unauthorized);
        }

        let token = format!("admin-token-{}", self.next_id());
        self.tokens.insert(token.clone());
        Ok(token)
    }

    pub fn authorize(&self, token: Option<&str>) -> Result<(), AppError> {
        match token {
            Some(token) if self.tokens.contains(token) => Ok(()),
            _ => Err(AppError::Unauthorized),
        }
    }

    pub fn create_admin(&mut self, email: &str, password: &str) -> Result<(), AppError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::MalformedPayload);
        }

        self.admins.push((email.trim().to_string(), password.to_string()));
        Ok(())
    }

    pub fn list_polls(&self) -> Vec<PollBody> {
        self.polls
            .iter()
            .map(|poll| self.poll_body(poll, true))
            .collect()
    }

    pub fn create_poll(&mut self, title: &str, options: &[String]) -> Result<u64, AppError> {
        let options: Vec<&str> = options.iter().map(|option| option.trim()).collect();
        if title.trim().is_empty()
            || options.len() < 2
            || options.iter().any(|option| option.is_empty())
        {
            return Err(AppError::MalformedPayload);
        }

        let id = self.next_id();
        let options = options
            .into_iter()
            .map(|text| (self.next_id(), text.to_string()))
            .collect();

        self.polls.push(StoredPoll {
            id,
            title: title.trim().to_string(),
            active: true,
            created_at: Utc::now(),
            options,
        });

        info!("Created poll {id}");
        Ok(id)
    }

    pub fn delete_poll(&mut self, raw_id: &str) -> Result<(), AppError> {
        let id = self.poll(raw_id)?.id;

        self.polls.retain(|poll| poll.id != id);
        self.votes.retain(|vote| vote.poll_id != id);
        Ok(())
    }

    pub fn toggle_poll(&mut self, raw_id: &str) -> Result<bool, AppError> {
        let id = self.poll(raw_id)?.id;
        let poll = self
            .polls
            .iter_mut()
            .find(|poll| poll.id == id)
            .ok_or(AppError::NotFound)?;

        poll.active = !poll.active;
        Ok(poll.active)
    }

    pub fn poll_votes(&self, raw_id: &str) -> Result<Vec<VoteBody>, AppError> {
        let id = self.poll(raw_id)?.id;

        Ok(self
            .votes
            .iter()
            .filter(|vote| vote.poll_id == id)
            .map(|vote| self.vote_body(vote))
            .collect())
    }

    pub fn delete_vote(&mut self, raw_id: &str) -> Result<(), AppError> {
        let id = parse_id(raw_id)?;
        let before = self.votes.len();

        self.votes.retain(|vote| vote.id != id);

        if self.votes.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_poll() -> (Store, String, String) {
        let mut store = Store::default();
        let poll_id = store
            .create_poll("Lunch?", &["Tacos".to_string(), "Ramen".to_string()])
            .unwrap();
        let option_id = store.public_poll(&poll_id.to_string()).unwrap().options[0].id;

        (store, poll_id.to_string(), option_id.to_string())
    }

    fn verified(store: &mut Store, email: &str) {
        store.request_code("Ada", email, "123456").unwrap();
        store.verify_code("123456", email).unwrap();
    }

    #[test]
    fn test_vote_once() {
        let (mut store, poll_id, option_id) = store_with_poll();
        verified(&mut store, "ada@example.com");

        store.vote(&poll_id, &option_id, "ada@example.com").unwrap();
        let second = store.vote(&poll_id, &option_id, "ada@example.com");

        assert!(matches!(second, Err(AppError::AlreadyVoted)));
        assert_eq!(store.results(&poll_id).unwrap().total_votes, 1);
    }

    #[test]
    fn test_unverified_cannot_vote() {
        let (mut store, poll_id, option_id) = store_with_poll();
        store.request_code("Ada", "ada@example.com", "123456").unwrap();

        let result = store.vote(&poll_id, &option_id, "ada@example.com");

        assert!(matches!(result, Err(AppError::Unverified)));
    }

    #[test]
    fn test_wrong_code() {
        let mut store = Store::default();
        store.request_code("Ada", "ada@example.com", "123456").unwrap();

        assert!(matches!(
            store.verify_code("654321", "ada@example.com"),
            Err(AppError::InvalidCode)
        ));
    }

    #[test]
    fn test_inactive_rejects_votes() {
        let (mut store, poll_id, option_id) = store_with_poll();
        verified(&mut store, "ada@example.com");
        store.toggle_poll(&poll_id).unwrap();

        let result = store.vote(&poll_id, &option_id, "ada@example.com");

        assert!(matches!(result, Err(AppError::Inactive)));
    }

    #[test]
    fn test_unknown_poll() {
        let store = Store::default();

        assert!(matches!(store.public_poll("abc"), Err(AppError::NotFound)));
        assert!(matches!(store.public_poll("99"), Err(AppError::NotFound)));
    }

    #[test]
    fn test_tokens() {
        let mut store = Store {
            admins: vec![("admin@example.com".into(), "password".into())],
            ..Default::default()
        };

        assert!(matches!(
            store.login("admin@example.com", "nope"),
            Err(AppError::Unauthorized)
        ));

        let token = store.login("admin@example.com", "password").unwrap();
        assert!(store.authorize(Some(&token)).is_ok());
        assert!(store.authorize(Some("forged")).is_err());
        assert!(store.authorize(None).is_err());
    }

    #[test]
    fn test_delete_poll_drops_votes() {
        let (mut store, poll_id, option_id) = store_with_poll();
        verified(&mut store, "ada@example.com");
        store.vote(&poll_id, &option_id, "ada@example.com").unwrap();

        store.delete_poll(&poll_id).unwrap();

        assert!(store.list_polls().is_empty());
        assert!(store.votes.is_empty());
    }
}
