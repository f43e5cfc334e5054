//! # Voter Wizard
//!
//! Four steps, strictly in order: `info -> otp -> vote -> results`.
//!
//! ## Transitions
//! - `info -> otp`: name and email present, code request accepted
//! - `otp -> vote`: exactly 6 characters entered, code verified
//! - `vote -> results`: an option selected, vote recorded
//! - `results -> info`: reset
//! - back moves one step from `otp` or `vote`, never touches the network
//!
//! ## Requests
//! Every network-backed action is split into `begin_*` and `finish_*`. The
//! begin half checks the step, refuses to start while another request is in
//! flight, clears the error and hands out a [`Ticket`]. The finish half only
//! applies a response whose ticket still matches: reset and back bump the
//! session generation, so anything that arrives afterwards is dropped.
use tracing::{debug, info, warn};

use crate::{
    error::{ApiError, WizardError},
    models::{Ballot, Poll, Results},
    voter::{VerificationCode, Voter},
};

pub const MISSING_IDENTITY: &str = "Please enter your name and email.";
pub const REQUEST_CODE_FAILED: &str = "Failed to send verification code. Please try again.";
pub const CODE_INCOMPLETE: &str = "Enter the 6-digit code.";
pub const VERIFY_CODE_FAILED: &str = "Invalid verification code. Please try again.";
pub const NO_OPTION_SELECTED: &str = "Please select an option.";
pub const UNKNOWN_OPTION: &str = "That option is not part of this poll.";
pub const ALREADY_VOTED: &str = "You have already voted in this poll.";
pub const VOTE_FAILED: &str = "Failed to submit vote. Please try again.";
pub const RESULTS_FAILED: &str = "Your vote was recorded, but results could not be loaded.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Info,
    Otp,
    Vote,
    Results,
}

impl Step {
    pub const COUNT: usize = 4;

    pub fn number(self) -> usize {
        match self {
            Step::Info => 1,
            Step::Otp => 2,
            Step::Vote => 3,
            Step::Results => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Step::Info => "Your Info",
            Step::Otp => "Verification",
            Step::Vote => "Vote",
            Step::Results => "Results",
        }
    }

    /// Percent complete shown in the progress bar.
    pub fn progress(self) -> u8 {
        (self.number() * 100 / Self::COUNT) as u8
    }

    fn previous(self) -> Option<Step> {
        match self {
            Step::Otp => Some(Step::Info),
            Step::Vote => Some(Step::Otp),
            Step::Info | Step::Results => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    RequestCode,
    VerifyCode,
    CastVote,
    LoadResults,
}

impl Action {
    fn step(self) -> Step {
        match self {
            Action::RequestCode => Step::Info,
            Action::VerifyCode => Step::Otp,
            Action::CastVote => Step::Vote,
            Action::LoadResults => Step::Results,
        }
    }
}

/// Proof that a request was started by this wizard session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    action: Action,
}

impl Ticket {
    pub fn action(&self) -> Action {
        self.action
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeCheck {
    pub code: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct Wizard {
    poll: Poll,
    step: Step,
    voter: Voter,
    code: VerificationCode,
    selected_option: String,
    results: Option<Results>,
    error: Option<String>,
    in_flight: Option<Action>,
    generation: u64,
    already_voted: bool,
}

impl Wizard {
    pub fn new(poll: Poll) -> Self {
        Self {
            poll,
            step: Step::Info,
            voter: Voter::default(),
            code: VerificationCode::default(),
            selected_option: String::new(),
            results: None,
            error: None,
            in_flight: None,
            generation: 0,
            already_voted: false,
        }
    }

    pub fn poll(&self) -> &Poll {
        &self.poll
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn voter(&self) -> &Voter {
        &self.voter
    }

    pub fn code(&self) -> &VerificationCode {
        &self.code
    }

    pub fn selected_option(&self) -> &str {
        &self.selected_option
    }

    pub fn results(&self) -> Option<&Results> {
        self.results.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn in_flight(&self) -> Option<Action> {
        self.in_flight
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight == Some(Action::RequestCode)
    }

    pub fn is_verifying(&self) -> bool {
        self.in_flight == Some(Action::VerifyCode)
    }

    pub fn is_voting(&self) -> bool {
        self.in_flight == Some(Action::CastVote)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight == Some(Action::LoadResults)
    }

    pub fn has_voted_conflict(&self) -> bool {
        self.already_voted
    }

    pub fn can_request_code(&self) -> bool {
        self.step == Step::Info && self.in_flight.is_none()
    }

    /// The verify control: enabled only for exactly 6 characters.
    pub fn can_verify(&self) -> bool {
        self.step == Step::Otp && self.in_flight.is_none() && self.code.is_complete()
    }

    pub fn can_vote(&self) -> bool {
        self.step == Step::Vote
            && self.in_flight.is_none()
            && !self.selected_option.is_empty()
            && !self.already_voted
    }

    fn editable(&self, step: Step) -> Result<(), WizardError> {
        if self.step != step {
            return Err(WizardError::WrongStep);
        }

        if self.in_flight.is_some() {
            return Err(WizardError::Busy);
        }

        Ok(())
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), WizardError> {
        self.editable(Step::Info)?;
        self.voter.name = name.to_string();
        Ok(())
    }

    pub fn set_email(&mut self, email: &str) -> Result<(), WizardError> {
        self.editable(Step::Info)?;
        self.voter.email = email.to_string();
        Ok(())
    }

    pub fn set_code(&mut self, code: &str) -> Result<(), WizardError> {
        self.editable(Step::Otp)?;
        self.code = VerificationCode::new(code);
        Ok(())
    }

    pub fn select_option(&mut self, option_id: &str) -> Result<(), WizardError> {
        self.editable(Step::Vote)?;

        if self.poll.option(option_id).is_none() {
            return Err(WizardError::Validation(UNKNOWN_OPTION.to_string()));
        }

        self.selected_option = option_id.to_string();
        Ok(())
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    fn fail(&mut self, message: &str) -> WizardError {
        self.error = Some(message.to_string());
        WizardError::Validation(message.to_string())
    }

    fn start(&mut self, action: Action) -> Result<Ticket, WizardError> {
        if self.step != action.step() {
            return Err(WizardError::WrongStep);
        }

        if self.in_flight.is_some() {
            return Err(WizardError::Busy);
        }

        self.error = None;
        self.in_flight = Some(action);

        Ok(Ticket {
            generation: self.generation,
            action,
        })
    }

    /// Takes the in-flight slot back if `ticket` is still current.
    fn settle(&mut self, ticket: Ticket, action: Action) -> bool {
        if ticket.action != action
            || ticket.generation != self.generation
            || self.in_flight != Some(action)
        {
            debug!("Discarding stale {:?} response", ticket.action);
            return false;
        }

        self.in_flight = None;
        true
    }

    pub fn begin_request_code(&mut self) -> Result<(Ticket, Voter), WizardError> {
        self.editable(Step::Info)?;
        self.error = None;

        if !self.voter.is_complete() {
            return Err(self.fail(MISSING_IDENTITY));
        }

        let ticket = self.start(Action::RequestCode)?;
        Ok((ticket, self.voter.trimmed()))
    }

    pub fn finish_request_code(&mut self, ticket: Ticket, outcome: Result<(), ApiError>) -> bool {
        if !self.settle(ticket, Action::RequestCode) {
            return false;
        }

        match outcome {
            Ok(()) => {
                info!("Verification code requested for {}", self.voter.email.trim());
                self.step = Step::Otp;
            }
            Err(e) => {
                warn!("Code request failed: {e}");
                self.error = Some(REQUEST_CODE_FAILED.to_string());
            }
        }

        true
    }

    pub fn begin_verify_code(&mut self) -> Result<(Ticket, CodeCheck), WizardError> {
        self.editable(Step::Otp)?;
        self.error = None;

        // The control is disabled below 6 characters, no banner for this.
        if !self.code.is_complete() {
            return Err(WizardError::Validation(CODE_INCOMPLETE.to_string()));
        }

        let ticket = self.start(Action::VerifyCode)?;
        Ok((
            ticket,
            CodeCheck {
                code: self.code.as_str().to_string(),
                email: self.voter.email.trim().to_string(),
            },
        ))
    }

    pub fn finish_verify_code(&mut self, ticket: Ticket, outcome: Result<(), ApiError>) -> bool {
        if !self.settle(ticket, Action::VerifyCode) {
            return false;
        }

        match outcome {
            Ok(()) => self.step = Step::Vote,
            Err(e) => {
                warn!("Code verification failed: {e}");
                self.error = Some(VERIFY_CODE_FAILED.to_string());
            }
        }

        true
    }

    pub fn begin_cast_vote(&mut self) -> Result<(Ticket, Ballot), WizardError> {
        self.editable(Step::Vote)?;

        if self.already_voted {
            self.error = Some(ALREADY_VOTED.to_string());
            return Err(WizardError::AlreadyVoted);
        }

        self.error = None;

        if self.selected_option.is_empty() {
            return Err(self.fail(NO_OPTION_SELECTED));
        }

        let ticket = self.start(Action::CastVote)?;
        let voter = self.voter.trimmed();

        Ok((
            ticket,
            Ballot {
                poll_id: self.poll.id.clone(),
                option_id: self.selected_option.clone(),
                voter_email: voter.email,
                voter_name: voter.name,
            },
        ))
    }

    pub fn finish_cast_vote(&mut self, ticket: Ticket, outcome: Result<(), ApiError>) -> bool {
        if !self.settle(ticket, Action::CastVote) {
            return false;
        }

        match outcome {
            Ok(()) => {
                info!("Vote recorded for poll {}", self.poll.id);
                self.step = Step::Results;
            }
            Err(ApiError::Conflict) => {
                self.already_voted = true;
                self.error = Some(ALREADY_VOTED.to_string());
            }
            Err(e) => {
                warn!("Vote submission failed: {e}");
                self.error = Some(VOTE_FAILED.to_string());
            }
        }

        true
    }

    pub fn begin_load_results(&mut self) -> Result<(Ticket, String), WizardError> {
        let ticket = self.start(Action::LoadResults)?;
        Ok((ticket, self.poll.id.clone()))
    }

    pub fn finish_load_results(
        &mut self,
        ticket: Ticket,
        outcome: Result<Results, ApiError>,
    ) -> bool {
        if !self.settle(ticket, Action::LoadResults) {
            return false;
        }

        match outcome {
            Ok(results) => {
                if !results.is_consistent() {
                    warn!(
                        "Backend total {:?} does not match per-option sum {}",
                        results.total_votes,
                        results.total()
                    );
                }
                self.results = Some(results);
            }
            Err(e) => {
                warn!("Loading results failed: {e}");
                self.error = Some(RESULTS_FAILED.to_string());
            }
        }

        true
    }

    /// One step back, keeping everything entered so far.
    pub fn back(&mut self) -> Result<Step, WizardError> {
        let previous = self.step.previous().ok_or(WizardError::WrongStep)?;

        self.generation += 1;
        self.in_flight = None;
        self.error = None;
        self.step = previous;

        Ok(previous)
    }

    /// Back to `info` with nothing remembered but the poll.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.step = Step::Info;
        self.voter = Voter::default();
        self.code = VerificationCode::default();
        self.selected_option.clear();
        self.results = None;
        self.error = None;
        self.in_flight = None;
        self.already_voted = false;
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::models::{PollOption, VoteResult};

    fn poll() -> Poll {
        Poll {
            id: "p1".into(),
            title: "Favorite language?".into(),
            active: true,
            options: vec![
                PollOption {
                    id: "rs".into(),
                    poll_id: Some("p1".into()),
                    text: "Rust".into(),
                },
                PollOption {
                    id: "go".into(),
                    poll_id: Some("p1".into()),
                    text: "Go".into(),
                },
            ],
            created_at: None,
            votes: Vec::new(),
        }
    }

    fn at_vote() -> Wizard {
        let mut wizard = Wizard::new(poll());
        wizard.set_name("Ada").unwrap();
        wizard.set_email("ada@example.com").unwrap();
        let (ticket, _) = wizard.begin_request_code().unwrap();
        wizard.finish_request_code(ticket, Ok(()));
        wizard.set_code("123456").unwrap();
        let (ticket, _) = wizard.begin_verify_code().unwrap();
        wizard.finish_verify_code(ticket, Ok(()));
        wizard
    }

    #[test]
    fn test_step_labels() {
        assert_eq!(Step::Info.number(), 1);
        assert_eq!(Step::Otp.label(), "Verification");
        assert_eq!(Step::Vote.progress(), 75);
        assert_eq!(Step::Results.progress(), 100);
    }

    #[test]
    fn test_info_requires_name_and_email() {
        let mut wizard = Wizard::new(poll());
        wizard.set_name("  ").unwrap();
        wizard.set_email("ada@example.com").unwrap();

        let result = wizard.begin_request_code();

        assert!(matches!(result, Err(WizardError::Validation(_))));
        assert_eq!(wizard.error(), Some(MISSING_IDENTITY));
        assert_eq!(wizard.step(), Step::Info);
        assert!(wizard.in_flight().is_none());
    }

    #[test]
    fn test_request_code_success_moves_to_otp() {
        let mut wizard = Wizard::new(poll());
        wizard.set_name(" Ada ").unwrap();
        wizard.set_email("ada@example.com ").unwrap();

        let (ticket, voter) = wizard.begin_request_code().unwrap();
        assert!(wizard.is_submitting());
        assert_eq!(voter.name, "Ada");
        assert_eq!(voter.email, "ada@example.com");

        assert!(wizard.finish_request_code(ticket, Ok(())));
        assert_eq!(wizard.step(), Step::Otp);
        assert!(!wizard.is_submitting());
    }

    #[test]
    fn test_request_code_failure_stays_on_info() {
        let mut wizard = Wizard::new(poll());
        wizard.set_name("Ada").unwrap();
        wizard.set_email("ada@example.com").unwrap();

        let (ticket, _) = wizard.begin_request_code().unwrap();
        wizard.finish_request_code(ticket, Err(ApiError::NotFound));

        assert_eq!(wizard.step(), Step::Info);
        assert_eq!(wizard.error(), Some(REQUEST_CODE_FAILED));
        assert!(!wizard.is_submitting());
    }

    #[test]
    fn test_identity_frozen_while_requesting() {
        let mut wizard = Wizard::new(poll());
        wizard.set_name("Ada").unwrap();
        wizard.set_email("ada@example.com").unwrap();
        let _ = wizard.begin_request_code().unwrap();

        assert_eq!(wizard.set_name("Grace"), Err(WizardError::Busy));
        assert_eq!(wizard.begin_request_code().unwrap_err(), WizardError::Busy);
        assert_eq!(wizard.voter().name, "Ada");
    }

    #[test]
    fn test_verify_failure_stays_on_otp() {
        let mut wizard = Wizard::new(poll());
        wizard.set_name("Ada").unwrap();
        wizard.set_email("ada@example.com").unwrap();
        let (ticket, _) = wizard.begin_request_code().unwrap();
        wizard.finish_request_code(ticket, Ok(()));

        wizard.set_code("000000").unwrap();
        let (ticket, check) = wizard.begin_verify_code().unwrap();
        assert_eq!(check.email, "ada@example.com");
        assert!(wizard.is_verifying());

        wizard.finish_verify_code(
            ticket,
            Err(ApiError::Status {
                status: 400,
                message: "bad code".into(),
            }),
        );

        assert_eq!(wizard.step(), Step::Otp);
        assert_eq!(wizard.error(), Some(VERIFY_CODE_FAILED));
        assert!(wizard.can_verify());
    }

    #[test]
    fn test_short_code_clears_stale_error() {
        let mut wizard = Wizard::new(poll());
        wizard.set_name("Ada").unwrap();
        wizard.set_email("ada@example.com").unwrap();
        let (ticket, _) = wizard.begin_request_code().unwrap();
        wizard.finish_request_code(ticket, Ok(()));
        wizard.set_code("000000").unwrap();
        let (ticket, _) = wizard.begin_verify_code().unwrap();
        wizard.finish_verify_code(ticket, Err(ApiError::NotFound));
        assert_eq!(wizard.error(), Some(VERIFY_CODE_FAILED));

        wizard.set_code("123").unwrap();

        assert!(matches!(wizard.begin_verify_code(), Err(WizardError::Validation(_))));
        assert_eq!(wizard.error(), None);
        assert!(wizard.in_flight().is_none());
    }

    #[test]
    fn test_short_code_never_dispatches() {
        let mut wizard = Wizard::new(poll());
        wizard.set_name("Ada").unwrap();
        wizard.set_email("ada@example.com").unwrap();
        let (ticket, _) = wizard.begin_request_code().unwrap();
        wizard.finish_request_code(ticket, Ok(()));

        wizard.set_code("12345").unwrap();

        assert!(!wizard.can_verify());
        assert!(wizard.begin_verify_code().is_err());
        assert!(wizard.in_flight().is_none());
    }

    #[test]
    fn test_vote_requires_selection() {
        let mut wizard = at_vote();

        assert!(!wizard.can_vote());
        assert!(matches!(wizard.begin_cast_vote(), Err(WizardError::Validation(_))));
        assert_eq!(wizard.error(), Some(NO_OPTION_SELECTED));
    }

    #[test]
    fn test_unknown_option_rejected() {
        let mut wizard = at_vote();

        assert!(wizard.select_option("java").is_err());
        assert_eq!(wizard.selected_option(), "");
    }

    #[test]
    fn test_vote_conflict_is_terminal_for_session() {
        let mut wizard = at_vote();
        wizard.select_option("rs").unwrap();

        let (ticket, ballot) = wizard.begin_cast_vote().unwrap();
        assert_eq!(ballot.poll_id, "p1");
        assert_eq!(ballot.option_id, "rs");
        assert_eq!(ballot.voter_name, "Ada");

        wizard.finish_cast_vote(ticket, Err(ApiError::Conflict));

        assert_eq!(wizard.step(), Step::Vote);
        assert_eq!(wizard.error(), Some(ALREADY_VOTED));
        assert!(!wizard.can_vote());
        assert_eq!(wizard.begin_cast_vote().unwrap_err(), WizardError::AlreadyVoted);
        assert!(wizard.in_flight().is_none());

        wizard.reset();
        assert!(!wizard.has_voted_conflict());
    }

    #[test]
    fn test_vote_generic_failure_allows_retry() {
        let mut wizard = at_vote();
        wizard.select_option("go").unwrap();

        let (ticket, _) = wizard.begin_cast_vote().unwrap();
        wizard.finish_cast_vote(
            ticket,
            Err(ApiError::Status {
                status: 500,
                message: String::new(),
            }),
        );

        assert_eq!(wizard.step(), Step::Vote);
        assert_eq!(wizard.error(), Some(VOTE_FAILED));
        assert!(wizard.can_vote());

        let (ticket, _) = wizard.begin_cast_vote().unwrap();
        assert!(wizard.error().is_none());
        wizard.finish_cast_vote(ticket, Ok(()));
        assert_eq!(wizard.step(), Step::Results);
    }

    #[test]
    fn test_results_loaded() {
        let mut wizard = at_vote();
        wizard.select_option("rs").unwrap();
        let (ticket, _) = wizard.begin_cast_vote().unwrap();
        wizard.finish_cast_vote(ticket, Ok(()));

        let (ticket, poll_id) = wizard.begin_load_results().unwrap();
        assert_eq!(poll_id, "p1");
        assert!(wizard.is_loading());

        wizard.finish_load_results(
            ticket,
            Ok(Results {
                options: vec![
                    VoteResult {
                        option_id: "rs".into(),
                        text: "Rust".into(),
                        votes: 3,
                        percentage: None,
                    },
                    VoteResult {
                        option_id: "go".into(),
                        text: "Go".into(),
                        votes: 7,
                        percentage: None,
                    },
                ],
                total_votes: Some(10),
            }),
        );

        assert_eq!(wizard.results().unwrap().total(), 10);
        assert!(!wizard.is_loading());
    }

    #[test]
    fn test_results_failure_keeps_results_step() {
        let mut wizard = at_vote();
        wizard.select_option("rs").unwrap();
        let (ticket, _) = wizard.begin_cast_vote().unwrap();
        wizard.finish_cast_vote(ticket, Ok(()));

        let (ticket, _) = wizard.begin_load_results().unwrap();
        wizard.finish_load_results(ticket, Err(ApiError::NotFound));

        assert_eq!(wizard.step(), Step::Results);
        assert_eq!(wizard.error(), Some(RESULTS_FAILED));
        assert!(wizard.results().is_none());
    }

    #[test]
    fn test_back_from_vote_keeps_code_and_identity() {
        let mut wizard = at_vote();

        assert_eq!(wizard.back(), Ok(Step::Otp));
        assert_eq!(wizard.code().as_str(), "123456");
        assert_eq!(wizard.voter().name, "Ada");
        assert_eq!(wizard.voter().email, "ada@example.com");

        assert_eq!(wizard.back(), Ok(Step::Info));
        assert_eq!(wizard.voter().name, "Ada");
        assert_eq!(wizard.back(), Err(WizardError::WrongStep));
    }

    #[test]
    fn test_back_discards_late_response() {
        let mut wizard = Wizard::new(poll());
        wizard.set_name("Ada").unwrap();
        wizard.set_email("ada@example.com").unwrap();
        let (ticket, _) = wizard.begin_request_code().unwrap();
        wizard.finish_request_code(ticket, Ok(()));
        wizard.set_code("123456").unwrap();

        let (ticket, _) = wizard.begin_verify_code().unwrap();
        wizard.back().unwrap();

        assert!(!wizard.finish_verify_code(ticket, Ok(())));
        assert_eq!(wizard.step(), Step::Info);
        assert!(wizard.in_flight().is_none());
    }

    #[test]
    fn test_reset_discards_late_response() {
        let mut wizard = at_vote();
        wizard.select_option("rs").unwrap();
        let (ticket, _) = wizard.begin_cast_vote().unwrap();

        wizard.reset();

        assert!(!wizard.finish_cast_vote(ticket, Ok(())));
        assert_eq!(wizard.step(), Step::Info);
        assert_eq!(wizard.poll().id, "p1");
    }

    #[test]
    fn test_dismiss_error() {
        let mut wizard = Wizard::new(poll());
        let _ = wizard.begin_request_code();
        assert!(wizard.error().is_some());

        wizard.dismiss_error();

        assert!(wizard.error().is_none());
        assert_eq!(wizard.step(), Step::Info);
    }

    #[test]
    fn test_wrong_step_actions() {
        let mut wizard = Wizard::new(poll());

        assert_eq!(wizard.set_code("123456"), Err(WizardError::WrongStep));
        assert_eq!(wizard.select_option("rs"), Err(WizardError::WrongStep));
        assert!(wizard.begin_cast_vote().is_err());
        assert!(wizard.begin_load_results().is_err());
    }

    proptest! {
        #[test]
        fn verify_enabled_only_for_six_characters(code in "\\PC{0,10}") {
            let mut wizard = Wizard::new(poll());
            wizard.set_name("Ada").unwrap();
            wizard.set_email("ada@example.com").unwrap();
            let (ticket, _) = wizard.begin_request_code().unwrap();
            wizard.finish_request_code(ticket, Ok(()));

            wizard.set_code(&code).unwrap();

            prop_assert_eq!(wizard.can_verify(), code.chars().count() == 6);
        }

        #[test]
        fn reset_always_clears(
            name in "[a-zA-Z ]{0,12}",
            email in "[a-z@.]{0,12}",
            code in "[0-9]{0,8}",
            steps in 0usize..4,
        ) {
            let mut wizard = Wizard::new(poll());
            wizard.set_name(&name).unwrap();
            wizard.set_email(&email).unwrap();

            if steps > 0 {
                if let Ok((ticket, _)) = wizard.begin_request_code() {
                    wizard.finish_request_code(ticket, Ok(()));
                    wizard.set_code(&code).unwrap();
                    if steps > 1 {
                        if let Ok((ticket, _)) = wizard.begin_verify_code() {
                            wizard.finish_verify_code(ticket, Ok(()));
                            wizard.select_option("go").unwrap();
                            if steps > 2 {
                                let _ = wizard.begin_cast_vote();
                            }
                        }
                    }
                }
            }

            wizard.reset();

            prop_assert_eq!(wizard.step(), Step::Info);
            prop_assert_eq!(wizard.voter(), &Voter::default());
            prop_assert_eq!(wizard.code().as_str(), "");
            prop_assert_eq!(wizard.selected_option(), "");
            prop_assert!(wizard.error().is_none());
            prop_assert!(wizard.in_flight().is_none());
        }
    }
}
