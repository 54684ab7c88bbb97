//! Core types for Quotebox

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A quote and the category it is filed under.
///
/// Equality is structural: two quotes with the same text and category are
/// the same quote. There is no identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub category: String,
}

impl Quote {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Read a quote out of an arbitrary JSON value without rejecting it.
    ///
    /// Missing or non-string fields read as empty strings; a value that is
    /// not an object reads as an empty quote.
    pub fn from_value_lossy(value: &Value) -> Self {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            text: field("text"),
            category: field("category"),
        }
    }
}

impl std::fmt::Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" - {}", self.text, self.category)
    }
}

/// The collection seeded on first run.
pub fn default_quotes() -> Vec<Quote> {
    vec![
        Quote::new("The only way to do great work is to love what you do.", "Work"),
        Quote::new("Innovation distinguishes between a leader and a follower.", "Innovation"),
        Quote::new(
            "The best time to plant a tree was 20 years ago. The second best time is now.",
            "Life",
        ),
        Quote::new("Don't watch the clock; do what it does. Keep going.", "Motivation"),
        Quote::new(
            "Your time is limited, so don't waste it living someone else's life.",
            "Life",
        ),
        Quote::new("Believe you can and you're halfway there.", "Belief"),
    ]
}

/// Category selection: every quote, or one category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Stored and displayed name of the "every category" option
    pub const ALL: &'static str = "all";

    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(category) => quote.category == *category,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => Self::ALL,
            CategoryFilter::Category(category) => category,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        if s == Self::ALL {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(s.to_string())
        }
    }
}

impl From<Option<&str>> for CategoryFilter {
    fn from(s: Option<&str>) -> Self {
        s.map(CategoryFilter::from).unwrap_or_default()
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity of a user-facing status message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Success => write!(f, "success"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A status line for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub severity: Severity,
    pub message: String,
}

impl StatusMessage {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quote_structural_equality() {
        let a = Quote::new("Keep going.", "Motivation");
        let b = Quote::new("Keep going.", "Motivation");
        let c = Quote::new("Keep going.", "Life");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_default_quotes() {
        let quotes = default_quotes();
        assert_eq!(quotes.len(), 6);
        assert_eq!(quotes[0].category, "Work");
        assert_eq!(quotes[5].text, "Believe you can and you're halfway there.");
    }

    #[test]
    fn test_from_value_lossy_missing_category() {
        let quote = Quote::from_value_lossy(&json!({ "text": "Only text" }));
        assert_eq!(quote, Quote::new("Only text", ""));
    }

    #[test]
    fn test_from_value_lossy_non_object() {
        assert_eq!(Quote::from_value_lossy(&json!(42)), Quote::new("", ""));
        assert_eq!(Quote::from_value_lossy(&json!("text")), Quote::new("", ""));
    }

    #[test]
    fn test_from_value_lossy_ignores_extra_fields() {
        let quote = Quote::from_value_lossy(&json!({
            "text": "A",
            "category": "X",
            "author": "Someone"
        }));
        assert_eq!(quote, Quote::new("A", "X"));
    }

    #[test]
    fn test_quote_deserialize_defaults_missing_fields() {
        let quote: Quote = serde_json::from_str(r#"{"category":"Life"}"#).unwrap();
        assert_eq!(quote.text, "");
        assert_eq!(quote.category, "Life");
    }

    #[test]
    fn test_category_filter_from_str() {
        assert_eq!(CategoryFilter::from("all"), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from("Life"),
            CategoryFilter::Category("Life".to_string())
        );
        assert_eq!(CategoryFilter::from(None), CategoryFilter::All);
    }

    #[test]
    fn test_category_filter_matches() {
        let quote = Quote::new("A", "X");
        assert!(CategoryFilter::All.matches(&quote));
        assert!(CategoryFilter::from("X").matches(&quote));
        assert!(!CategoryFilter::from("Y").matches(&quote));
    }

    #[test]
    fn test_category_filter_display() {
        assert_eq!(CategoryFilter::All.to_string(), "all");
        assert_eq!(CategoryFilter::from("Work").to_string(), "Work");
    }

    #[test]
    fn test_status_message_constructors() {
        assert_eq!(StatusMessage::info("a").severity, Severity::Info);
        assert_eq!(StatusMessage::success("b").severity, Severity::Success);
        assert_eq!(StatusMessage::error("c").severity, Severity::Error);
        assert_eq!(Severity::Success.to_string(), "success");
    }
}
