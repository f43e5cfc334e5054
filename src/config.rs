use std::{env, fs::read_to_string};

use tracing::{debug, info, warn};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub public_url: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            api_url: try_load("POLL_API_URL", DEFAULT_API_URL),
            public_url: try_load("POLL_PUBLIC_URL", DEFAULT_PUBLIC_URL),
            admin_email: var("POLL_ADMIN_EMAIL").ok(),
            admin_password: var("POLL_ADMIN_PASSWORD")
                .ok()
                .or_else(|| read_secret("POLL_ADMIN_PASSWORD")),
        }
    }

    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(api_url) = api_url {
            self.api_url = api_url;
        }

        self
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        debug!("Environment variable {key} not found");
    })
}

fn try_load(key: &str, default: &str) -> String {
    var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
        })
        .ok()
}
