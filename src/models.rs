use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

/// Backend ids arrive as either JSON strings or integers.
fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

fn optional_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    #[serde(deserialize_with = "id")]
    pub id: String,
    pub title: String,
    pub active: bool,
    #[serde(default)]
    pub options: Vec<PollOption>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Raw vote records, only present on the admin poll listing.
    #[serde(default)]
    pub votes: Vec<VoteRecord>,
}

impl Poll {
    pub fn option(&self, option_id: &str) -> Option<&PollOption> {
        self.options.iter().find(|option| option.id == option_id)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollOption {
    #[serde(deserialize_with = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "optional_id")]
    pub poll_id: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    #[serde(deserialize_with = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "optional_id")]
    pub voter_id: Option<String>,
    #[serde(deserialize_with = "id")]
    pub option_id: String,
    #[serde(default, deserialize_with = "optional_id")]
    pub poll_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub voter: Option<VoterRecord>,
    #[serde(default)]
    pub option: Option<OptionRef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VoterRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OptionRef {
    #[serde(deserialize_with = "id")]
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResult {
    #[serde(deserialize_with = "id")]
    pub option_id: String,
    pub text: String,
    #[serde(default)]
    pub votes: u64,
    #[serde(default)]
    pub percentage: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Results {
    #[serde(default)]
    pub options: Vec<VoteResult>,
    #[serde(default)]
    pub total_votes: Option<u64>,
}

impl Results {
    /// Sum of per-option votes. This is what gets displayed, whatever
    /// `totalVotes` the backend reported.
    pub fn total(&self) -> u64 {
        self.options.iter().map(|option| option.votes).sum()
    }

    pub fn is_consistent(&self) -> bool {
        self.total_votes.is_none_or(|reported| reported == self.total())
    }

    pub fn percentage(&self, result: &VoteResult) -> f64 {
        result.percentage.unwrap_or_else(|| {
            let total = self.total();
            if total == 0 {
                0.0
            } else {
                result.votes as f64 / total as f64 * 100.0
            }
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CodeRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CodeVerification<'a> {
    pub otp: &'a str,
    pub email: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ballot {
    pub poll_id: String,
    pub option_id: String,
    pub voter_email: String,
    pub voter_name: String,
}

#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPoll {
    pub title: String,
    pub options: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPoll {
    #[serde(deserialize_with = "id")]
    pub poll_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_string_ids() {
        let poll: Poll = serde_json::from_str(
            r#"{"id": 11, "title": "Lunch", "active": true,
                "options": [{"id": "a", "pollId": 11, "text": "Pizza"}]}"#,
        )
        .unwrap();

        assert_eq!(poll.id, "11");
        assert_eq!(poll.options[0].id, "a");
        assert_eq!(poll.options[0].poll_id.as_deref(), Some("11"));
        assert!(poll.votes.is_empty());
        assert!(poll.created_at.is_none());
    }

    #[test]
    fn test_missing_options_default_to_empty() {
        let poll: Poll = serde_json::from_str(r#"{"id": "x", "title": "T", "active": false}"#).unwrap();

        assert!(poll.options.is_empty());
    }

    #[test]
    fn test_missing_required_field_fails() {
        let missing_active = serde_json::from_str::<Poll>(r#"{"id": "x", "title": "T"}"#);
        let missing_title = serde_json::from_str::<Poll>(r#"{"id": "x", "active": true}"#);

        assert!(missing_active.is_err());
        assert!(missing_title.is_err());
    }

    #[test]
    fn test_created_at_parses() {
        let poll: Poll = serde_json::from_str(
            r#"{"id": "x", "title": "T", "active": true, "createdAt": "2025-03-01T12:00:00.000Z"}"#,
        )
        .unwrap();

        assert_eq!(poll.created_at.unwrap().to_rfc3339(), "2025-03-01T12:00:00+00:00");
    }

    #[test]
    fn test_results_total_is_sum_of_options() {
        let results: Results = serde_json::from_str(
            r#"{"options": [
                {"optionId": 1, "text": "A", "votes": 3},
                {"optionId": 2, "text": "B", "votes": 7}
            ], "totalVotes": 12}"#,
        )
        .unwrap();

        assert_eq!(results.total(), 10);
        assert!(!results.is_consistent());
    }

    #[test]
    fn test_results_percentage_fallback() {
        let results = Results {
            options: vec![
                VoteResult {
                    option_id: "a".into(),
                    text: "A".into(),
                    votes: 1,
                    percentage: None,
                },
                VoteResult {
                    option_id: "b".into(),
                    text: "B".into(),
                    votes: 3,
                    percentage: Some(80.0),
                },
            ],
            total_votes: None,
        };

        assert_eq!(results.percentage(&results.options[0]), 25.0);
        assert_eq!(results.percentage(&results.options[1]), 80.0);
        assert!(results.is_consistent());
    }

    #[test]
    fn test_ballot_wire_names() {
        let ballot = Ballot {
            poll_id: "p".into(),
            option_id: "o".into(),
            voter_email: "e@x.io".into(),
            voter_name: "Ada".into(),
        };

        let json = serde_json::to_value(&ballot).unwrap();
        assert_eq!(json["pollId"], "p");
        assert_eq!(json["optionId"], "o");
        assert_eq!(json["voterEmail"], "e@x.io");
        assert_eq!(json["voterName"], "Ada");
    }
}
