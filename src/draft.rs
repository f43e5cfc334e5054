//! Poll creation form.
use tracing::{info, warn};

use crate::{
    api::ApiClient,
    error::AdminError,
    models::NewPoll,
    session::AdminSession,
    utils::share_url,
};

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 10;

pub const MISSING_TITLE: &str = "Please enter a poll title";
pub const TOO_FEW_OPTIONS: &str = "Please enter at least 2 options";
pub const EMPTY_OPTIONS: &str = "Please fill in all options or remove empty ones";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollDraft {
    pub title: String,
    options: Vec<String>,
}

impl Default for PollDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            options: vec![String::new(); MIN_OPTIONS],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedLink {
    pub poll_id: String,
    pub url: String,
}

impl PollDraft {
    pub fn new(title: &str, options: &[String]) -> Self {
        let mut draft = Self {
            title: title.to_string(),
            ..Default::default()
        };

        for (index, option) in options.iter().enumerate() {
            if index >= draft.options.len() && !draft.add_option() {
                break;
            }
            draft.options[index] = option.clone();
        }

        draft
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn add_option(&mut self) -> bool {
        if self.options.len() >= MAX_OPTIONS {
            return false;
        }

        self.options.push(String::new());
        true
    }

    pub fn remove_option(&mut self, index: usize) -> bool {
        if self.options.len() <= MIN_OPTIONS || index >= self.options.len() {
            return false;
        }

        self.options.remove(index);
        true
    }

    pub fn set_option(&mut self, index: usize, text: &str) -> bool {
        match self.options.get_mut(index) {
            Some(option) => {
                *option = text.to_string();
                true
            }
            None => false,
        }
    }

    pub fn validate(&self) -> Result<NewPoll, String> {
        if self.title.trim().is_empty() {
            return Err(MISSING_TITLE.to_string());
        }

        let filled: Vec<String> = self
            .options
            .iter()
            .map(|option| option.trim())
            .filter(|option| !option.is_empty())
            .map(str::to_string)
            .collect();

        if filled.len() < MIN_OPTIONS {
            return Err(TOO_FEW_OPTIONS.to_string());
        }

        if filled.len() != self.options.len() {
            return Err(EMPTY_OPTIONS.to_string());
        }

        Ok(NewPoll {
            title: self.title.trim().to_string(),
            options: filled,
        })
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Submits the draft and clears it on success.
    pub async fn submit(
        &mut self,
        client: &ApiClient,
        session: &AdminSession,
        public_url: &str,
    ) -> Result<CreatedLink, AdminError> {
        let poll = self.validate().map_err(AdminError::Validation)?;

        let created = client.create_poll(session, &poll).await.map_err(|e| {
            warn!("Creating poll failed: {e}");
            e
        })?;

        info!("Created poll {}", created.poll_id);
        *self = Self::default();

        Ok(CreatedLink {
            url: share_url(public_url, &created.poll_id),
            poll_id: created.poll_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_two_empty_options() {
        let draft = PollDraft::default();

        assert_eq!(draft.options().len(), 2);
        assert!(!draft.is_valid());
    }

    #[test]
    fn test_option_bounds() {
        let mut draft = PollDraft::default();

        assert!(!draft.remove_option(0));
        for _ in 0..8 {
            assert!(draft.add_option());
        }
        assert!(!draft.add_option());
        assert_eq!(draft.options().len(), MAX_OPTIONS);
        assert!(draft.remove_option(9));
        assert!(!draft.remove_option(42));
    }

    #[test]
    fn test_validation_order() {
        let mut draft = PollDraft::default();
        assert_eq!(draft.validate(), Err(MISSING_TITLE.to_string()));

        draft.title = "Lunch?".into();
        draft.set_option(0, "Tacos");
        assert_eq!(draft.validate(), Err(TOO_FEW_OPTIONS.to_string()));

        draft.add_option();
        draft.set_option(1, "Ramen");
        assert_eq!(draft.validate(), Err(EMPTY_OPTIONS.to_string()));

        draft.remove_option(2);
        assert_eq!(
            draft.validate(),
            Ok(NewPoll {
                title: "Lunch?".into(),
                options: vec!["Tacos".into(), "Ramen".into()],
            })
        );
    }

    #[test]
    fn test_new_caps_options() {
        let options: Vec<String> = (0..12).map(|i| format!("Option {i}")).collect();

        let draft = PollDraft::new(" Many ", &options);

        assert_eq!(draft.options().len(), MAX_OPTIONS);
        assert_eq!(draft.validate().unwrap().title, "Many");
    }

    #[test]
    fn test_new_with_single_option_keeps_minimum() {
        let draft = PollDraft::new("Solo", &["Only".to_string()]);

        assert_eq!(draft.options(), &["Only".to_string(), String::new()]);
        assert_eq!(draft.validate(), Err(TOO_FEW_OPTIONS.to_string()));
    }
}
