//! Validation of user-submitted quotes

use crate::error::{QuoteboxError, Result};
use crate::types::Quote;

pub const MISSING_FIELDS_MESSAGE: &str = "Please enter both a quote and a category.";

/// Trim both fields and build a quote, rejecting blanks
pub fn validate_new_quote(text: &str, category: &str) -> Result<Quote> {
    let text = text.trim();
    let category = category.trim();

    if text.is_empty() || category.is_empty() {
        return Err(QuoteboxError::InvalidInput(MISSING_FIELDS_MESSAGE.to_string()));
    }

    Ok(Quote::new(text, category))
}
