//! umbra CSS - Simple selector engine
//!
//! Parses and matches the selector subset allowed in `<content select="...">`:
//! lists of compound simple selectors. Invalid selector text never errors at
//! match time; it matches nothing.

mod selector;

pub use selector::{AttrMatcher, Compound, ElementContext, Selector, SimpleSelector};

/// Selector parsing error
#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    #[error("Empty selector")]
    Empty,

    #[error("Unsupported selector syntax at offset {offset}: {message}")]
    Unsupported { offset: usize, message: String },

    #[error("Unterminated attribute selector")]
    UnterminatedAttribute,
}

/// Parse `text` and match it against `element`.
///
/// Failing closed is part of the distribution contract: a selector the
/// engine cannot parse matches nothing rather than raising an error.
pub fn matches_selector(text: &str, element: &ElementContext<'_>) -> bool {
    match Selector::parse(text) {
        Ok(selector) => selector.matches(element),
        Err(err) => {
            tracing::debug!("selector {:?} rejected: {}", text, err);
            false
        }
    }
}
