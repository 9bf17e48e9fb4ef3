//! Error types.
//!
//! None of these abort an inspection: callers skip the sheet, rule or copy
//! that failed and carry on with what they have.

/// A stylesheet whose rule list cannot be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("cross-origin stylesheet {href} is not readable")]
    CrossOrigin { href: String },

    #[error("stylesheet {href} could not be loaded")]
    Unavailable { href: String },
}

/// A selector the matcher cannot evaluate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unsupported selector syntax: {0}")]
    Unsupported(String),

    #[error("invalid selector: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("clipboard write failed: {0}")]
pub struct ClipboardError(pub String);

/// Errors surfaced while building a page.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    /// lightningcss rejected the stylesheet outright.
    #[error("css parse error: {0}")]
    Parse(String),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}
