use anyhow::Result;
use clap::{Parser, Subcommand};
use poll::{config::Config, state::State};
use tracing_subscriber::{EnvFilter, fmt};

mod admin;
mod prompt;
mod vote;

use admin::AdminCommand;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Base url of the poll backend, overrides POLL_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Vote in a poll through the step-by-step wizard
    Vote { poll_id: String },

    /// Manage polls
    Admin {
        #[arg(long, env = "POLL_ADMIN_EMAIL")]
        email: Option<String>,

        #[arg(long, env = "POLL_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Token from an earlier login, used instead of email and password
        #[arg(long, env = "POLL_ADMIN_TOKEN", hide_env_values = true)]
        token: Option<String>,

        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let state = State::new(Config::load().with_api_url(args.api_url))?;

    match args.command {
        Command::Vote { poll_id } => vote::run(state, &poll_id).await,
        Command::Admin {
            email,
            password,
            token,
            command,
        } => {
            let session = match token {
                Some(token) => admin::resume(&state, email, &token),
                None => admin::login(&state, email, password).await?,
            };
            admin::run(state, session, command).await
        }
    }
}
