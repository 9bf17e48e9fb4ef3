//! Inspector states, the input events that drive them and the effects the
//! host carries out in response.

use crate::config::InspectorTab;
use crate::dom::dom_tree::NodeRef;
use crate::session::clipboard::Notification;
use serde::Serialize;
use std::time::Duration;

/// Key code that toggles pinning.
pub const PIN_KEY: &str = "Space";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InspectorState {
    /// Following the pointer, popup hidden.
    #[default]
    Idle,
    /// Following the pointer, popup showing the element under it.
    Hovering,
    /// Not following the pointer. The popup may still be up.
    Paused,
    /// Frozen on the current element until unpinned or closed.
    Pinned,
}

impl InspectorState {
    /// Whether pointer movement selects new elements.
    pub fn follows_pointer(self) -> bool {
        matches!(self, InspectorState::Idle | InspectorState::Hovering)
    }
}

/// What is under the pointer.
#[derive(Debug, Clone)]
pub enum PointerTarget {
    /// A page element.
    Element(NodeRef),
    /// The inspector's own popup, overlay, controls or notification.
    InspectorUi,
    /// Nothing hit-tests at the position.
    Nothing,
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    PointerMoved {
        x: i32,
        y: i32,
        target: PointerTarget,
    },
    KeyDown {
        code: String,
        /// The key went to an input, textarea or contenteditable element.
        in_editable: bool,
    },
    PopupEntered,
    PopupLeft {
        /// The pointer moved onto the control bar or back into the popup.
        to_inspector_ui: bool,
    },
    PauseClicked,
    CloseClicked,
    StopClicked,
    PopupClicked {
        x: i32,
        y: i32,
    },
    TabSelected(InspectorTab),
    /// The timer from the last `Effect::ScheduleHide` ran out.
    HideTimerFired,
    NotificationExpired,
    ViewportResized {
        width: u32,
        height: u32,
    },
    /// The popup has been laid out at this size.
    PopupMeasured {
        width: u32,
        height: u32,
    },
}

/// Side effects requested by the inspector. Timers are owned by the host and
/// reported back as events.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// The view changed; re-read `Inspector::view`.
    Render,
    /// Start (or restart) the hide timer; send `HideTimerFired` when it ends.
    ScheduleHide(Duration),
    CancelHide,
    ShowNotification(Notification),
    /// Send `NotificationExpired` after this long.
    ExpireNotification(Duration),
    /// Stop the browser's default handling of the key.
    PreventDefault,
    /// Remove every listener and UI element; the inspector is finished.
    Detach,
}
