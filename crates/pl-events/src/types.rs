use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Sentinel accepted wherever a category filter is expected.
pub const ALL_CATEGORIES: &str = "all";

/// One recorded player action. Never mutated after the store assigns `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PlayerEvent {
    pub id: i64,
    pub player_name: String,
    pub dialog_text: String,
    #[serde(rename = "data_type")]
    pub category: String,
    pub timestamp: DateTime<Utc>,
}

/// Which events a push connection (or a query) wants to see.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// A missing value, an empty string and `"all"` all mean "every category".
    /// Anything else is kept verbatim; categories are open-ended.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None => Self::All,
            Some(value) if value.is_empty() || value == ALL_CATEGORIES => Self::All,
            Some(value) => Self::Category(value.to_string()),
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Category(expected) => expected == category,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Category(value) => Some(value.as_str()),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_CATEGORIES),
            Self::Category(value) => f.write_str(value),
        }
    }
}

/// Message pushed to every matching connection when an event is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub players: Vec<String>,
    pub new_data: NotificationData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NotificationData {
    pub player_name: String,
    pub dialog_text: String,
    pub data_type: String,
    pub timestamp: String,
}

impl Notification {
    pub fn new(event: &PlayerEvent, players: Vec<String>) -> Self {
        Self {
            players,
            new_data: NotificationData {
                player_name: event.player_name.clone(),
                dialog_text: event.dialog_text.clone(),
                data_type: event.category.clone(),
                timestamp: event.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            },
        }
    }
}
