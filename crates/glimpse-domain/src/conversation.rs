//! Conversation module - durable records of conversational turns

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human side of the conversation
    User,
    /// The assistant side of the conversation
    Assistant,
}

impl Role {
    /// Stable string form used by the storage layer.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Parse the storage-layer string form.
    ///
    /// # Examples
    ///
    /// ```
    /// use glimpse_domain::Role;
    ///
    /// assert_eq!(Role::parse("user"), Some(Role::User));
    /// assert_eq!(Role::parse("narrator"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable record in the conversation log.
///
/// Turns for a session are retrievable in non-decreasing timestamp order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationTurn {
    /// Auto-assigned row identity
    pub id: i64,

    /// Groups turns belonging to one conversation
    pub session_id: String,

    /// When the turn was recorded
    pub timestamp: DateTime<Utc>,

    /// Who spoke
    pub role: Role,

    /// Turn content
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::User, Role::Assistant] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_role_parse_rejects_unknown() {
        assert_eq!(Role::parse("system"), None);
        assert_eq!(Role::parse(""), None);
        assert_eq!(Role::parse("User"), None);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }
}
