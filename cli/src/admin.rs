use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use poll::{
    admin::{Analytics, PollFilter, PollList, SortBy, StatusFilter},
    detail::{PollDetail, VoterFilter},
    draft::PollDraft,
    error::{AdminError, ApiError},
    session::AdminSession,
    state::State,
    views,
};
use tracing::info;

use crate::prompt::with_spinner;

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// List polls with search, status filter and sorting
    Polls {
        #[arg(short, long, default_value = "")]
        search: String,

        #[arg(long, default_value = "all")]
        status: StatusFilter,

        #[arg(long, default_value = "newest")]
        sort: SortBy,

        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Show per-option results and the voters of one poll
    Show {
        poll_id: String,

        #[arg(short, long, default_value = "")]
        search: String,

        /// Only voters who picked this option text
        #[arg(short, long)]
        option: Option<String>,

        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Create a poll and print its share link
    Create {
        title: String,

        #[arg(short, long = "option", required = true)]
        options: Vec<String>,
    },

    /// Flip a poll between active and inactive
    Toggle { poll_id: String },

    /// Delete a poll with all its votes
    Delete { poll_id: String },

    /// Delete a single vote
    DeleteVote { poll_id: String, vote_id: String },

    /// Totals across all polls
    Analytics,

    /// Register another administrator
    CreateAdmin { email: String, password: String },
}

pub async fn login(
    state: &State,
    email: Option<String>,
    password: Option<String>,
) -> Result<AdminSession> {
    let email = email
        .or_else(|| state.config.admin_email.clone())
        .context("Admin email missing: pass --email or set POLL_ADMIN_EMAIL")?;
    let password = password
        .or_else(|| state.config.admin_password.clone())
        .context("Admin password missing: pass --password or set POLL_ADMIN_PASSWORD")?;

    match with_spinner("Logging in...", AdminSession::login(&state.client, &email, &password)).await
    {
        Ok(session) => Ok(session),
        Err(AdminError::InvalidCredentials) => bail!("Invalid email or password"),
        Err(e) => Err(e.into()),
    }
}

pub fn resume(state: &State, email: Option<String>, token: &str) -> AdminSession {
    let email = email
        .or_else(|| state.config.admin_email.clone())
        .unwrap_or_else(|| "admin".to_string());

    AdminSession::resume(&email, token)
}

pub async fn run(state: Arc<State>, session: AdminSession, command: AdminCommand) -> Result<()> {
    execute(&state, &session, command).await.map_err(|e| {
        let expired = matches!(
            e.downcast_ref::<AdminError>(),
            Some(AdminError::Api(ApiError::Unauthorized))
        ) || matches!(e.downcast_ref::<ApiError>(), Some(ApiError::Unauthorized));

        if expired {
            e.context("Session expired, log in again")
        } else {
            e
        }
    })
}

async fn execute(state: &State, session: &AdminSession, command: AdminCommand) -> Result<()> {
    let client = &state.client;
    info!("Running admin command as {}", session.email());

    match command {
        AdminCommand::Polls {
            search,
            status,
            sort,
            page,
        } => {
            let list = with_spinner("Loading polls...", PollList::load(client, session)).await?;
            let filter = PollFilter {
                search,
                status,
                sort,
                page,
            };

            println!("{}", views::poll_table(&list.visible(&filter)));
        }
        AdminCommand::Show {
            poll_id,
            search,
            option,
            page,
        } => {
            let detail =
                with_spinner("Loading poll...", PollDetail::load(client, session, &poll_id))
                    .await?;
            let filter = VoterFilter {
                search,
                option,
                page,
            };

            println!("{}", views::poll_detail(&detail, &detail.filtered_voters(&filter)));
            println!(
                "Share link: {}",
                poll::utils::share_url(&state.config.public_url, &detail.poll().id)
            );
        }
        AdminCommand::Create { title, options } => {
            let mut draft = PollDraft::new(&title, &options);
            let created = with_spinner(
                "Creating poll...",
                draft.submit(client, session, &state.config.public_url),
            )
            .await?;

            println!("Poll created successfully!");
            println!("Share link: {}", created.url);
        }
        AdminCommand::Toggle { poll_id } => {
            let mut list =
                with_spinner("Loading polls...", PollList::load(client, session)).await?;
            list.toggle(client, session, &poll_id).await?;

            match list.error() {
                Some(message) => bail!("{message}"),
                None => {
                    let active = list
                        .polls()
                        .iter()
                        .find(|poll| poll.id == poll_id)
                        .map(|poll| poll.active);
                    match active {
                        Some(active) => println!(
                            "Poll {poll_id} is now {}",
                            poll::admin::status_label(active)
                        ),
                        None => println!("Poll {poll_id} updated"),
                    }
                }
            }
        }
        AdminCommand::Delete { poll_id } => {
            let mut list =
                with_spinner("Loading polls...", PollList::load(client, session)).await?;
            list.delete(client, session, &poll_id).await?;

            if let Some(message) = list.error() {
                bail!("{message}");
            }
            println!("Poll {poll_id} deleted");
        }
        AdminCommand::DeleteVote { poll_id, vote_id } => {
            let mut detail =
                with_spinner("Loading poll...", PollDetail::load(client, session, &poll_id))
                    .await?;
            detail.delete_vote(client, session, &vote_id).await?;

            if let Some(message) = detail.error() {
                bail!("{message}");
            }
            let filter = VoterFilter {
                page: detail.page(),
                ..Default::default()
            };
            println!("{}", views::poll_detail(&detail, &detail.filtered_voters(&filter)));
        }
        AdminCommand::Analytics => {
            let list = with_spinner("Loading polls...", PollList::load(client, session)).await?;

            print!("{}", views::analytics(&Analytics::from_polls(list.polls())));
        }
        AdminCommand::CreateAdmin { email, password } => {
            with_spinner(
                "Creating admin...",
                session.create_admin(client, &email, &password),
            )
            .await?;

            println!("Admin {email} created");
        }
    }

    Ok(())
}
