//! Wire and domain types for generation and feedback.
//!
//! DESIGN
//! ======
//! `GenerationResult` mirrors the backend JSON contract field-for-field and is
//! lenient: every field except `success` may be missing. `matching_users` is
//! decoded into [`MatchingUsers`] so the `"null"` sentinel, a JSON null, and
//! an absent field stay distinguishable even though they render the same.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// =============================================================================
// GENERATION
// =============================================================================

/// Body of `POST /submit_question/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    pub attribute_goal: String,
}

impl GenerationRequest {
    /// Build a request from raw operator input. Returns `None` when the input
    /// is empty after trimming.
    #[must_use]
    pub fn from_input(raw: &str) -> Option<Self> {
        let goal = raw.trim();
        if goal.is_empty() {
            return None;
        }
        Some(Self { attribute_goal: goal.to_owned() })
    }
}

/// Response of `POST /submit_question/`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GenerationResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub attribute_name: Option<String>,
    #[serde(default)]
    pub attribute_description: Option<String>,
    #[serde(default)]
    pub filter_clause: Option<String>,
    #[serde(default)]
    pub columns_used: Option<Vec<String>>,
    #[serde(default)]
    pub matching_users: MatchingUsers,
    #[serde(default)]
    pub error: Option<String>,
}

impl GenerationResult {
    /// Columns referenced by the filter clause, empty when the field is absent.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        self.columns_used.as_deref().unwrap_or_default()
    }
}

/// Audience size as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MatchingUsers {
    /// Field missing from the response.
    #[default]
    Absent,
    /// Field present as JSON `null`.
    Null,
    /// Field present as the literal string `"null"`, the backend's
    /// "count query failed" marker.
    NullSentinel,
    Count(serde_json::Number),
    /// Any other string value, shown verbatim.
    Text(String),
}

impl MatchingUsers {
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Number(n) => Self::Count(n),
            Value::String(s) if s == "null" => Self::NullSentinel,
            Value::String(s) => Self::Text(s),
            other => Self::Text(other.to_string()),
        }
    }

    /// The value to print after "is", or `None` when no count is available.
    #[must_use]
    pub fn display_value(&self) -> Option<String> {
        match self {
            Self::Absent | Self::Null | Self::NullSentinel => None,
            Self::Count(n) => Some(n.to_string()),
            Self::Text(s) => Some(s.clone()),
        }
    }
}

impl<'de> Deserialize<'de> for MatchingUsers {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

// =============================================================================
// LAST GENERATION
// =============================================================================

/// Parameters of the most recently displayed successful generation.
///
/// Replaced wholesale, never merged. Starts empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastGeneration {
    pub attribute_goal: String,
    pub filter_clause: String,
    pub columns_used: Vec<String>,
}

impl LastGeneration {
    #[must_use]
    pub fn from_result(attribute_goal: &str, result: &GenerationResult) -> Self {
        Self {
            attribute_goal: attribute_goal.to_owned(),
            filter_clause: result.filter_clause.clone().unwrap_or_default(),
            columns_used: result.columns().to_vec(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attribute_goal.is_empty() && self.filter_clause.is_empty() && self.columns_used.is_empty()
    }
}

// =============================================================================
// FEEDBACK
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackKind {
    #[serde(rename = "thumbs_up")]
    Positive,
    #[serde(rename = "thumbs_down")]
    Negative,
}

impl FeedbackKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "thumbs_up",
            Self::Negative => "thumbs_down",
        }
    }
}

/// Body of `POST /submit_feedback/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackEvent {
    pub feedback: FeedbackKind,
    pub feedback_text: String,
    pub attribute_goal: String,
    pub filter_clause: String,
    pub columns_used: Vec<String>,
}

impl FeedbackEvent {
    #[must_use]
    pub fn new(feedback: FeedbackKind, feedback_text: String, last: &LastGeneration) -> Self {
        Self {
            feedback,
            feedback_text,
            attribute_goal: last.attribute_goal.clone(),
            filter_clause: last.filter_clause.clone(),
            columns_used: last.columns_used.clone(),
        }
    }
}

/// Response of `POST /submit_feedback/`. Only logged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FeedbackReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
