use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body accepted by every ingestion entry point. The store assigns the
/// timestamp; a `timestamp` key sent by the client is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Submission {
    pub player_name: String,
    pub dialog_text: String,
    #[serde(rename = "data_type")]
    pub category: String,
}

impl Submission {
    pub fn new(
        player_name: impl Into<String>,
        dialog_text: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            player_name: player_name.into(),
            dialog_text: dialog_text.into(),
            category: category.into(),
        }
    }
}

/// Store-level append input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitEventInput {
    pub player_name: String,
    pub dialog_text: String,
    pub category: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl SubmitEventInput {
    pub fn new(
        player_name: impl Into<String>,
        dialog_text: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            player_name: player_name.into(),
            dialog_text: dialog_text.into(),
            category: category.into(),
            timestamp: None,
        }
    }

    #[must_use]
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

impl From<Submission> for SubmitEventInput {
    fn from(submission: Submission) -> Self {
        Self::new(
            submission.player_name,
            submission.dialog_text,
            submission.category,
        )
    }
}
