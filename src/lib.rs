//! Client side of a polling application.
//!
//! Respondents open a poll, prove they own an email with a one-time code,
//! vote once and see the totals. Administrators log in, create polls, switch
//! them on and off and look at who voted for what. Counting, codes,
//! persistence and duplicate-vote checks all live in the backend service;
//! this crate drives its HTTP API and keeps the view state.
//!
//!
//!
//! # Voter Flow
//! - [`entry::Entry`] fetches the poll first: not found, inactive, ready or a
//!   retryable failure
//! - [`wizard::Wizard`] is the `info -> otp -> vote -> results` state machine
//! - [`controller::Controller`] runs each step against a [`api::PollBackend`]
//!
//!
//!
//! # Admin
//! - [`session::AdminSession`] comes out of a successful login and is passed
//!   to every admin call, the backend re-checks its token each time
//! - [`admin`] lists polls with the leading option and analytics
//! - [`detail`] breaks a poll down per option with its voter list
//! - [`draft`] validates and submits new polls
//!
//!
//!
//! # Setup
//!
//! Point the client at a backend.
//! ```sh
//! export POLL_API_URL=http://localhost:8000
//! export POLL_PUBLIC_URL=http://localhost:3000
//! ```
//!
//! Run the stub backend locally.
//! ```sh
//! cargo run -p poll-tester
//! ```
//!
//! Vote from the terminal.
//! ```sh
//! cargo run -p poll-cli -- vote 1
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
pub mod admin;
pub mod api;
pub mod config;
pub mod controller;
pub mod detail;
pub mod draft;
pub mod entry;
pub mod error;
pub mod models;
pub mod session;
pub mod state;
pub mod utils;
pub mod views;
pub mod voter;
pub mod wizard;
