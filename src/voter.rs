//! # Voter Identity
//!
//! What a respondent hands over before voting.
//!
//! ## Payloads
//!
//! ### Request code
//! - JSON `{ name, email }` to `/otp/request`
//! - Backend mails a 6 character code to the email
//!
//! ### Verify code
//! - JSON `{ otp, email }` to `/otp/verify`
//! - Any 2xx means the email is verified for this poll session
//!
//! ### Cast vote
//! - JSON `{ pollId, optionId, voterEmail, voterName }` to `/vote`
//! - 409 means this email already voted in the poll
//!
//!
//!
//! ## Flow
//!
//! - Name and email are required, checked locally after trimming
//! - Identity is frozen while the code request is in flight
//! - The code is only checked for length locally, the backend owns its content
//! - Nothing here is persisted, a reset forgets everything

pub const CODE_LENGTH: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Voter {
    pub name: String,
    pub email: String,
}

impl Voter {
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.email.trim().is_empty()
    }

    pub fn trimmed(&self) -> Voter {
        Voter {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationCode(String);

impl VerificationCode {
    pub fn new(value: &str) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.len() == CODE_LENGTH
    }
}
