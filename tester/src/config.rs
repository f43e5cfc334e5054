use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Every requested code is this value, so scripts and tests can verify.
    pub code: String,
    pub admin_email: String,
    pub admin_password: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            code: "123456".to_string(),
            admin_email: "admin@example.com".to_string(),
            admin_password: "password".to_string(),
        }
    }
}

impl Config {
    /// Environment overrides on top of [`Config::default`]. A malformed port
    /// falls back to the default instead of stopping the stub.
    pub fn load() -> Self {
        let defaults = Self::default();

        Self {
            port: parse_or("RUST_PORT", defaults.port),
            code: env_or("POLL_TEST_CODE", defaults.code),
            admin_email: env_or("POLL_ADMIN_EMAIL", defaults.admin_email),
            admin_password: env_or("POLL_ADMIN_PASSWORD", defaults.admin_password),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default");
        default
    })
}

fn parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?} ({e}), using {default}");
            default
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_keeps_default_for_garbage() {
        // Only this test touches the variable.
        unsafe { env::set_var("POLL_TESTER_PORT_CHECK", "eighty") };

        assert_eq!(parse_or("POLL_TESTER_PORT_CHECK", 8000u16), 8000);
        assert_eq!(parse_or("POLL_TESTER_UNSET_PORT", 9000u16), 9000);
    }
}
