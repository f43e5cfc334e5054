//! Runs wizard actions against a backend.
//!
//! The wizard lock is only held to begin and to finish an action, never
//! across the network call, so reset and back stay responsive while a
//! request is pending and the late response is discarded by its ticket.
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    api::PollBackend,
    error::WizardError,
    wizard::{Step, Ticket, Wizard},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The wizard was reset or moved back while the request was pending.
    Discarded,
}

impl From<bool> for Outcome {
    fn from(applied: bool) -> Self {
        if applied {
            Outcome::Applied
        } else {
            Outcome::Discarded
        }
    }
}

pub struct Controller<B: ?Sized> {
    wizard: Arc<Mutex<Wizard>>,
    backend: Arc<B>,
}

impl<B: ?Sized> Clone for Controller<B> {
    fn clone(&self) -> Self {
        Self {
            wizard: self.wizard.clone(),
            backend: self.backend.clone(),
        }
    }
}

impl<B: PollBackend + ?Sized> Controller<B> {
    pub fn new(wizard: Wizard, backend: Arc<B>) -> Self {
        Self {
            wizard: Arc::new(Mutex::new(wizard)),
            backend,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Wizard> {
        self.wizard.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Wizard {
        self.lock().clone()
    }

    /// Synchronous edits: form fields, option choice, dismissing the error.
    pub fn update<R>(&self, edit: impl FnOnce(&mut Wizard) -> R) -> R {
        edit(&mut self.lock())
    }

    pub fn back(&self) -> Result<Step, WizardError> {
        self.lock().back()
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    pub async fn submit_info(&self) -> Result<Outcome, WizardError> {
        let (ticket, voter) = self.lock().begin_request_code()?;
        let outcome = self.backend.request_code(&voter).await;

        Ok(self.lock().finish_request_code(ticket, outcome).into())
    }

    pub async fn submit_code(&self) -> Result<Outcome, WizardError> {
        let (ticket, check) = self.lock().begin_verify_code()?;
        let outcome = self.backend.verify_code(&check.code, &check.email).await;

        Ok(self.lock().finish_verify_code(ticket, outcome).into())
    }

    /// Casts the vote and, once it is recorded, loads the results.
    pub async fn submit_vote(&self) -> Result<Outcome, WizardError> {
        let (ticket, ballot) = self.lock().begin_cast_vote()?;
        let outcome = self.backend.cast_vote(&ballot).await;

        // Settling the vote and starting the results fetch share one lock,
        // a reset cannot slip in between.
        let (ticket, poll_id) = {
            let mut wizard = self.lock();
            if !wizard.finish_cast_vote(ticket, outcome) {
                return Ok(Outcome::Discarded);
            }
            if wizard.step() != Step::Results {
                return Ok(Outcome::Applied);
            }
            wizard.begin_load_results()?
        };

        self.load_results(ticket, poll_id).await
    }

    pub async fn reload_results(&self) -> Result<Outcome, WizardError> {
        let (ticket, poll_id) = self.lock().begin_load_results()?;

        self.load_results(ticket, poll_id).await
    }

    async fn load_results(&self, ticket: Ticket, poll_id: String) -> Result<Outcome, WizardError> {
        let outcome = self.backend.fetch_results(&poll_id).await;

        Ok(self.lock().finish_load_results(ticket, outcome).into())
    }
}
