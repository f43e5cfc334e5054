use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,

    #[error("Conflict")]
    Conflict,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid base url: {0}")]
    InvalidUrl(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("Another request is still in progress")]
    Busy,

    #[error("Action not available at this step")]
    WrongStep,

    #[error("{0}")]
    Validation(String),

    #[error("You have already voted in this poll.")]
    AlreadyVoted,
}

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Validation(String),

    #[error("Poll {0} is already being updated")]
    Pending(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}
