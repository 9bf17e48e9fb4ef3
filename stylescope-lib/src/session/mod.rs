//! Interactive inspector session driven by host input events.

pub mod clipboard;
pub mod host;
pub mod inspector;
pub mod state;
pub mod view;

pub use clipboard::{Clipboard, MemoryClipboard, Notification};
pub use host::{InspectorHandle, TabId, TabRegistry};
pub use inspector::Inspector;
pub use state::{Effect, InputEvent, InspectorState, PointerTarget};
pub use view::InspectorView;
