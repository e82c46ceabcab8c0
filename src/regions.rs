//! Display regions: the four result panes and their reset/populate contract.
//!
//! DESIGN
//! ======
//! Each region is a small view model implementing [`DisplayRegion`]:
//! `reset` returns it to its empty or placeholder state before a request is
//! issued, `populate` refreshes it from a backend response. Regions never
//! read each other; the orchestrator drives them as a group through
//! [`Regions`].

use crate::types::{GenerationResult, MatchingUsers};

pub const NO_DESCRIPTION: &str = "No description generated.";
pub const GENERATION_FAILED: &str = "Failed to generate attribute.";
pub const USER_COUNT_FAILED: &str = "❌ Failed to retrieve the number of users in the audience.";
pub const NO_COLUMNS: &str = "No columns used in this query.";

/// Number of empty cards shown by the source-columns placeholder.
pub const PLACEHOLDER_SLOTS: usize = 4;

/// Reset/populate contract shared by every result pane.
pub trait DisplayRegion {
    /// Return to the empty or placeholder state.
    fn reset(&mut self);

    /// Refresh from a backend response. Missing fields degrade to the empty
    /// or placeholder state.
    fn populate(&mut self, result: &GenerationResult);

    /// Plain-text content, as a reader of the pane would see it.
    fn text(&self) -> String;
}

// =============================================================================
// EXPLANATION
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Explanation {
    #[default]
    Empty,
    Attribute {
        name: String,
        description: String,
    },
    Error(String),
}

impl Explanation {
    /// Show an inline error, e.g. after a transport failure.
    pub fn show_error(&mut self, message: impl Into<String>) {
        *self = Self::Error(message.into());
    }
}

impl DisplayRegion for Explanation {
    fn reset(&mut self) {
        *self = Self::Empty;
    }

    fn populate(&mut self, result: &GenerationResult) {
        if result.success {
            *self = Self::Attribute {
                name: result.attribute_name.clone().unwrap_or_default(),
                description: result
                    .attribute_description
                    .clone()
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| NO_DESCRIPTION.to_owned()),
            };
        } else {
            let message = result
                .error
                .as_deref()
                .filter(|e| !e.is_empty())
                .unwrap_or(GENERATION_FAILED);
            self.show_error(message);
        }
    }

    fn text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Attribute { name, description } => format!("{name}\n{description}"),
            Self::Error(message) => format!("Error: {message}"),
        }
    }
}

// =============================================================================
// QUERY TEXT
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryText(pub String);

impl DisplayRegion for QueryText {
    fn reset(&mut self) {
        self.0.clear();
    }

    fn populate(&mut self, result: &GenerationResult) {
        self.0 = result.filter_clause.clone().unwrap_or_default();
    }

    fn text(&self) -> String {
        self.0.clone()
    }
}

// =============================================================================
// ROW COUNT
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RowCount {
    #[default]
    Empty,
    Count(String),
    /// No count available; keeps which of the null shapes the backend sent.
    Unavailable(MatchingUsers),
}

impl DisplayRegion for RowCount {
    fn reset(&mut self) {
        *self = Self::Empty;
    }

    fn populate(&mut self, result: &GenerationResult) {
        *self = match result.matching_users.display_value() {
            Some(value) => Self::Count(value),
            None => Self::Unavailable(result.matching_users.clone()),
        };
    }

    fn text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Count(value) => format!("The number of users in the audience is {value}."),
            Self::Unavailable(_) => USER_COUNT_FAILED.to_owned(),
        }
    }
}

// =============================================================================
// SOURCE COLUMNS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SourceColumns {
    /// Empty "unused" cards shown while nothing has been generated.
    #[default]
    Placeholder,
    NoColumns,
    /// A single table grouping, columns in response order.
    Table { name: String, columns: Vec<String> },
}

/// Source-columns pane. Owns the table name used as the grouping heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceColumnsRegion {
    table: String,
    pub view: SourceColumns,
}

impl SourceColumnsRegion {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self { table: table.into(), view: SourceColumns::Placeholder }
    }

    /// Column list items currently shown, empty unless a table is rendered.
    #[must_use]
    pub fn items(&self) -> &[String] {
        match &self.view {
            SourceColumns::Table { columns, .. } => columns,
            SourceColumns::Placeholder | SourceColumns::NoColumns => &[],
        }
    }
}

impl DisplayRegion for SourceColumnsRegion {
    fn reset(&mut self) {
        self.view = SourceColumns::Placeholder;
    }

    fn populate(&mut self, result: &GenerationResult) {
        let columns = result.columns();
        self.view = if columns.is_empty() {
            SourceColumns::NoColumns
        } else {
            SourceColumns::Table { name: self.table.clone(), columns: columns.to_vec() }
        };
    }

    fn text(&self) -> String {
        match &self.view {
            SourceColumns::Placeholder => String::new(),
            SourceColumns::NoColumns => NO_COLUMNS.to_owned(),
            SourceColumns::Table { name, columns } => {
                let mut out = name.clone();
                for column in columns {
                    out.push_str("\n- ");
                    out.push_str(column);
                }
                out
            }
        }
    }
}

// =============================================================================
// REGION GROUP
// =============================================================================

/// The four result panes, driven together by the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct Regions {
    pub explanation: Explanation,
    pub query_text: QueryText,
    pub row_count: RowCount,
    pub source_columns: SourceColumnsRegion,
}

impl Regions {
    #[must_use]
    pub fn new(source_table: impl Into<String>) -> Self {
        Self {
            explanation: Explanation::default(),
            query_text: QueryText::default(),
            row_count: RowCount::default(),
            source_columns: SourceColumnsRegion::new(source_table),
        }
    }

    pub fn reset(&mut self) {
        self.explanation.reset();
        self.query_text.reset();
        self.row_count.reset();
        self.source_columns.reset();
    }

    /// Fan one response out to every pane.
    pub fn populate(&mut self, result: &GenerationResult) {
        self.explanation.populate(result);
        self.row_count.populate(result);
        self.source_columns.populate(result);
        self.query_text.populate(result);
    }
}

#[cfg(test)]
#[path = "regions_test.rs"]
mod tests;
