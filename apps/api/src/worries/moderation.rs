//! Moderation Filter — pure accept/reject predicate shared by worries and cheers.
//!
//! Policy: over-long text is rejected, never truncated.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length of a worry or cheer, in characters.
pub const MAX_CONTENT_CHARS: usize = 400;

/// Maximum length of a worry author's nickname, in characters.
pub const MAX_NICKNAME_CHARS: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Content must not be empty")]
    Empty,

    #[error("Content is too long ({chars} characters, maximum {max})")]
    TooLong { chars: usize, max: usize },

    #[error("Content contains a blocked term")]
    BlockedTerm,
}

/// Serializable form of a moderation decision: `{accepted, reason?}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModerationVerdict {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ModerationFilter {
    blocked_terms: Vec<String>,
}

impl ModerationFilter {
    pub fn new(blocked_terms: Vec<String>) -> Self {
        Self { blocked_terms }
    }

    /// Validates worry or cheer text. Returns the trimmed text to store.
    pub fn validate<'a>(&self, text: &'a str) -> Result<&'a str, Rejection> {
        self.check(text, MAX_CONTENT_CHARS)
    }

    /// Same rules as `validate` with the tighter nickname limit.
    pub fn validate_nickname<'a>(&self, nickname: &'a str) -> Result<&'a str, Rejection> {
        self.check(nickname, MAX_NICKNAME_CHARS)
    }

    pub fn verdict(&self, text: &str) -> ModerationVerdict {
        match self.validate(text) {
            Ok(_) => ModerationVerdict {
                accepted: true,
                reason: None,
            },
            Err(rejection) => ModerationVerdict {
                accepted: false,
                reason: Some(rejection.to_string()),
            },
        }
    }

    fn check<'a>(&self, text: &'a str, max: usize) -> Result<&'a str, Rejection> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Rejection::Empty);
        }

        // Characters, not bytes: most content is multi-byte Hangul.
        let chars = trimmed.chars().count();
        if chars > max {
            return Err(Rejection::TooLong { chars, max });
        }

        if self
            .blocked_terms
            .iter()
            .any(|term| trimmed.contains(term.as_str()))
        {
            return Err(Rejection::BlockedTerm);
        }

        Ok(trimmed)
    }
}
