//! Starting and stopping inspectors, per tab.

use crate::config::InspectorConfig;
use crate::page::Page;
use crate::session::clipboard::Clipboard;
use crate::session::inspector::Inspector;
use crate::session::state::{Effect, InputEvent};
use crate::session::view::InspectorView;
use std::collections::HashMap;

/// Status line shown by the host while an inspector runs.
pub const ACTIVE_STATUS: &str = "Inspector active - hover to see CSS";

impl Inspector {
    /// Attaches a fresh inspector to `page`.
    pub fn activate(page: Page, config: InspectorConfig) -> InspectorHandle {
        log::debug!("inspector activated");
        InspectorHandle {
            inspector: Some(Inspector::new(page, config)),
        }
    }
}

/// An activated inspector. Once deactivated it ignores every event.
pub struct InspectorHandle {
    inspector: Option<Inspector>,
}

impl InspectorHandle {
    pub fn is_active(&self) -> bool {
        self.inspector.is_some()
    }

    /// Detaches the inspector. Returns false when it was already inactive.
    pub fn deactivate(&mut self) -> bool {
        let was_active = self.inspector.take().is_some();
        if was_active {
            log::debug!("inspector deactivated");
        }
        was_active
    }

    pub fn inspector(&self) -> Option<&Inspector> {
        self.inspector.as_ref()
    }

    pub fn handle_event(&mut self, event: InputEvent, clipboard: &mut dyn Clipboard) -> Vec<Effect> {
        let Some(inspector) = self.inspector.as_mut() else {
            return Vec::new();
        };
        let effects = inspector.handle_event(event, clipboard);
        if effects.contains(&Effect::Detach) {
            self.deactivate();
        }
        effects
    }

    pub fn view(&self) -> Option<InspectorView> {
        self.inspector.as_ref().map(Inspector::view)
    }
}

pub type TabId = u32;

/// The host's start/stop control over browser tabs.
pub struct TabRegistry {
    config: InspectorConfig,
    tabs: HashMap<TabId, InspectorHandle>,
}

impl TabRegistry {
    pub fn new(config: InspectorConfig) -> Self {
        TabRegistry {
            config,
            tabs: HashMap::new(),
        }
    }

    /// Starts an inspector on `tab_id`. A tab that already runs one keeps it
    /// and `false` is returned.
    pub fn start(&mut self, tab_id: TabId, page: Page) -> bool {
        if self.is_active(tab_id) {
            log::debug!("tab {} already inspected", tab_id);
            return false;
        }
        self.tabs
            .insert(tab_id, Inspector::activate(page, self.config.clone()));
        true
    }

    /// Stops the inspector on `tab_id`, if any.
    pub fn stop(&mut self, tab_id: TabId) -> bool {
        self.tabs
            .remove(&tab_id)
            .is_some_and(|mut handle| handle.deactivate())
    }

    pub fn is_active(&self, tab_id: TabId) -> bool {
        self.tabs.get(&tab_id).is_some_and(InspectorHandle::is_active)
    }

    pub fn status(&self, tab_id: TabId) -> Option<&'static str> {
        self.is_active(tab_id).then_some(ACTIVE_STATUS)
    }

    pub fn handle_mut(&mut self, tab_id: TabId) -> Option<&mut InspectorHandle> {
        self.tabs.get_mut(&tab_id)
    }

    /// Routes an event to the tab's inspector; a stopped inspector is dropped.
    pub fn dispatch(
        &mut self,
        tab_id: TabId,
        event: InputEvent,
        clipboard: &mut dyn Clipboard,
    ) -> Vec<Effect> {
        let Some(handle) = self.tabs.get_mut(&tab_id) else {
            return Vec::new();
        };
        let effects = handle.handle_event(event, clipboard);
        if !handle.is_active() {
            self.tabs.remove(&tab_id);
        }
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::NoLoader;
    use crate::session::clipboard::MemoryClipboard;

    fn page() -> Page {
        Page::parse("<p>hi</p>", None, &NoLoader).unwrap()
    }

    #[test]
    fn test_handle_deactivates_once() {
        let mut handle = Inspector::activate(page(), InspectorConfig::default());
        assert!(handle.is_active());
        assert!(handle.deactivate());
        assert!(!handle.deactivate());
        assert!(handle.view().is_none());

        let mut clipboard = MemoryClipboard::new();
        assert!(handle
            .handle_event(InputEvent::PauseClicked, &mut clipboard)
            .is_empty());
    }

    #[test]
    fn test_registry_start_is_idempotent() {
        let mut registry = TabRegistry::new(InspectorConfig::default());
        assert!(registry.start(7, page()));
        assert!(!registry.start(7, page()));
        assert_eq!(registry.status(7), Some(ACTIVE_STATUS));

        assert!(registry.stop(7));
        assert!(!registry.is_active(7));
        assert!(!registry.stop(7));
        assert!(registry.start(7, page()));
    }

    #[test]
    fn test_stop_button_detaches() {
        let mut registry = TabRegistry::new(InspectorConfig::default());
        registry.start(1, page());
        let mut clipboard = MemoryClipboard::new();
        let effects = registry.dispatch(1, InputEvent::StopClicked, &mut clipboard);
        assert_eq!(effects, vec![Effect::Detach]);
        assert!(!registry.is_active(1));
    }
}
