//! Element style inspection over a parsed HTML page: matched authored rules,
//! `@media` and `:hover` rules, a filtered computed-style snapshot and the
//! copy text built from them, plus the interactive hover/pause/pin session
//! around it.

pub mod config;
pub mod dom;
pub mod error;
pub mod inspect;
pub mod page;
pub mod parser;
pub mod session;
pub mod style;

pub use config::{InspectorConfig, InspectorTab};
pub use error::{AccessDenied, ClipboardError, SelectorError, StyleError};
pub use inspect::{inspect_element, InspectionResult, StyleInspector};
pub use page::{NoLoader, Page, StylesheetLoader};
pub use session::{Inspector, InspectorHandle};
