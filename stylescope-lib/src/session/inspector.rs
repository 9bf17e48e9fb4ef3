//! The interactive inspector: current element, popup visibility and the
//! hover / pause / pin state machine.

use crate::config::{InspectorConfig, InspectorTab};
use crate::dom::dom_tree::NodeRef;
use crate::inspect::result::{selector_label, InspectionResult};
use crate::inspect::serializer;
use crate::inspect::StyleInspector;
use crate::page::Page;
use crate::session::clipboard::{Clipboard, Notification, COPIED_MESSAGE, COPY_FAILED_MESSAGE};
use crate::session::state::{Effect, InputEvent, InspectorState, PointerTarget, PIN_KEY};
use crate::session::view::{self, InspectorView, TabContent, PLACEHOLDER_TEXT};
use crate::style::computed::{CascadeResolver, ComputedStyleSource};
use crate::style::css_matcher::DomSelectorMatcher;

/// Last pointer position and what was under it, replayed on resume and unpin.
#[derive(Debug, Clone)]
struct PointerSample {
    x: i32,
    y: i32,
    target: PointerTarget,
}

pub struct Inspector {
    page: Page,
    config: InspectorConfig,
    state: InspectorState,
    current: Option<NodeRef>,
    popup_visible: bool,
    overlay_visible: bool,
    hide_pending: bool,
    active_tab: InspectorTab,
    last_pointer: Option<PointerSample>,
    popup_position: (i32, i32),
    viewport: (u32, u32),
    popup_size: Option<(u32, u32)>,
    notification: Option<Notification>,
}

impl Inspector {
    pub fn new(page: Page, config: InspectorConfig) -> Self {
        Inspector {
            page,
            state: InspectorState::Idle,
            current: None,
            popup_visible: false,
            overlay_visible: false,
            hide_pending: false,
            active_tab: config.initial_tab,
            last_pointer: None,
            popup_position: (0, 0),
            viewport: config.viewport_size,
            popup_size: None,
            notification: None,
            config,
        }
    }

    pub fn state(&self) -> InspectorState {
        self.state
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    pub fn current_element(&self) -> Option<&NodeRef> {
        self.current.as_ref()
    }

    pub fn active_tab(&self) -> InspectorTab {
        self.active_tab
    }

    pub fn popup_visible(&self) -> bool {
        self.popup_visible
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    /// Runs one event to completion and returns what the host must do.
    pub fn handle_event(&mut self, event: InputEvent, clipboard: &mut dyn Clipboard) -> Vec<Effect> {
        let before = self.state;
        let effects = match event {
            InputEvent::PointerMoved { x, y, target } => {
                self.last_pointer = Some(PointerSample {
                    x,
                    y,
                    target: target.clone(),
                });
                self.follow_pointer(x, y, target)
            }
            InputEvent::KeyDown { code, in_editable } => self.on_key_down(&code, in_editable),
            InputEvent::PopupEntered => self.cancel_hide(),
            InputEvent::PopupLeft { to_inspector_ui } => {
                if self.state == InspectorState::Pinned || to_inspector_ui {
                    Vec::new()
                } else {
                    self.schedule_hide()
                }
            }
            InputEvent::PauseClicked => self.on_pause_clicked(),
            InputEvent::CloseClicked => self.on_close_clicked(),
            InputEvent::StopClicked => vec![Effect::Detach],
            InputEvent::PopupClicked { x, y } => self.on_popup_clicked(x, y, clipboard),
            InputEvent::TabSelected(tab) => {
                self.active_tab = tab;
                vec![Effect::Render]
            }
            InputEvent::HideTimerFired => self.on_hide_timer(),
            InputEvent::NotificationExpired => match self.notification.take() {
                Some(_) => vec![Effect::Render],
                None => Vec::new(),
            },
            InputEvent::ViewportResized { width, height } => {
                self.viewport = (width, height);
                Vec::new()
            }
            InputEvent::PopupMeasured { width, height } => {
                self.popup_size = Some((width, height));
                Vec::new()
            }
        };
        if before != self.state {
            log::debug!("inspector {:?} -> {:?}", before, self.state);
        }
        effects
    }

    fn classify(&self, target: PointerTarget) -> PointerTarget {
        let PointerTarget::Element(element) = &target else {
            return target;
        };
        let is_ui = element
            .borrow()
            .as_element()
            .and_then(|elem| elem.id())
            .is_some_and(|id| !self.config.ui_prefix.is_empty() && id.starts_with(&self.config.ui_prefix));
        if is_ui {
            PointerTarget::InspectorUi
        } else {
            target
        }
    }

    fn follow_pointer(&mut self, x: i32, y: i32, target: PointerTarget) -> Vec<Effect> {
        let target = self.classify(target);
        match self.state {
            InspectorState::Pinned => Vec::new(),
            InspectorState::Paused => match target {
                PointerTarget::InspectorUi => Vec::new(),
                _ => self.schedule_hide(),
            },
            InspectorState::Idle | InspectorState::Hovering => match target {
                PointerTarget::Element(element) => {
                    self.current = Some(element);
                    self.state = InspectorState::Hovering;
                    self.popup_visible = true;
                    self.overlay_visible = true;
                    let popup_size = self.popup_size.unwrap_or(self.config.popup_size);
                    self.popup_position =
                        view::popup_position((x, y), self.viewport, popup_size, self.config.popup_gap);

                    let mut effects = self.cancel_hide();
                    effects.push(Effect::Render);
                    effects
                }
                PointerTarget::InspectorUi => Vec::new(),
                PointerTarget::Nothing => self.schedule_hide(),
            },
        }
    }

    fn replay_pointer(&mut self) -> Vec<Effect> {
        match self.last_pointer.clone() {
            Some(sample) => self.follow_pointer(sample.x, sample.y, sample.target),
            None => Vec::new(),
        }
    }

    fn schedule_hide(&mut self) -> Vec<Effect> {
        self.hide_pending = true;
        vec![Effect::ScheduleHide(self.config.hide_delay)]
    }

    fn cancel_hide(&mut self) -> Vec<Effect> {
        if std::mem::take(&mut self.hide_pending) {
            vec![Effect::CancelHide]
        } else {
            Vec::new()
        }
    }

    fn on_hide_timer(&mut self) -> Vec<Effect> {
        if !std::mem::take(&mut self.hide_pending) || self.state == InspectorState::Pinned {
            return Vec::new();
        }
        if !self.popup_visible && !self.overlay_visible {
            return Vec::new();
        }
        self.popup_visible = false;
        self.overlay_visible = false;
        if self.state == InspectorState::Hovering {
            self.state = InspectorState::Idle;
        }
        vec![Effect::Render]
    }

    /// State after leaving Paused or Pinned, before the pointer is replayed.
    fn following_state(&self) -> InspectorState {
        if self.popup_visible {
            InspectorState::Hovering
        } else {
            InspectorState::Idle
        }
    }

    fn on_key_down(&mut self, code: &str, in_editable: bool) -> Vec<Effect> {
        if in_editable || code != PIN_KEY {
            return Vec::new();
        }
        if !self.popup_visible && self.state != InspectorState::Pinned {
            return Vec::new();
        }

        let mut effects = vec![Effect::PreventDefault];
        if self.state == InspectorState::Pinned {
            self.state = self.following_state();
            effects.extend(self.replay_pointer());
        } else {
            self.state = InspectorState::Pinned;
            self.popup_visible = true;
            self.overlay_visible = self.current.is_some();
            effects.extend(self.cancel_hide());
        }
        effects.push(Effect::Render);
        effects
    }

    fn on_pause_clicked(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        match self.state {
            InspectorState::Pinned => {
                if self.last_pointer.is_some() {
                    self.state = self.following_state();
                    effects.extend(self.replay_pointer());
                } else {
                    self.state = InspectorState::Idle;
                    self.popup_visible = false;
                    self.overlay_visible = false;
                }
            }
            InspectorState::Paused => {
                self.state = self.following_state();
                if self.current.is_some() && self.last_pointer.is_some() {
                    effects.extend(self.replay_pointer());
                    self.state = InspectorState::Hovering;
                    self.popup_visible = true;
                    self.overlay_visible = true;
                }
            }
            InspectorState::Idle | InspectorState::Hovering => {
                self.state = InspectorState::Paused;
                self.overlay_visible = false;
            }
        }
        effects.push(Effect::Render);
        effects
    }

    fn on_close_clicked(&mut self) -> Vec<Effect> {
        self.state = InspectorState::Idle;
        self.popup_visible = false;
        self.overlay_visible = false;
        let mut effects = self.cancel_hide();
        effects.push(Effect::Render);
        effects
    }

    fn on_popup_clicked(&mut self, x: i32, y: i32, clipboard: &mut dyn Clipboard) -> Vec<Effect> {
        let Some(text) = self.copy_text() else {
            return Vec::new();
        };
        let (message, failed) = match clipboard.write_text(&text) {
            Ok(()) => (COPIED_MESSAGE, false),
            Err(err) => {
                log::warn!("{}", err);
                (COPY_FAILED_MESSAGE, true)
            }
        };
        let notification = Notification {
            message: message.to_string(),
            x: x + self.config.notification_offset.0,
            y: y + self.config.notification_offset.1,
            failed,
        };
        self.notification = Some(notification.clone());
        vec![
            Effect::ShowNotification(notification),
            Effect::ExpireNotification(self.config.notification_duration),
            Effect::Render,
        ]
    }

    /// Inspects the current element with the page's sheets.
    pub fn inspect_current(&self) -> Option<InspectionResult> {
        let element = self.current.as_ref()?;
        let matcher = DomSelectorMatcher;
        let resolver = CascadeResolver::new(self.page.stylesheets(), &matcher);
        let inspector = StyleInspector::new(self.page.stylesheets(), &matcher, &resolver, &self.config);
        Some(inspector.inspect(element))
    }

    /// What a popup click copies. `None` when there is nothing to show, as
    /// the popup then carries no copy text.
    pub fn copy_text(&self) -> Option<String> {
        self.copy_text_for(self.inspect_current().as_ref())
    }

    fn copy_text_for(&self, result: Option<&InspectionResult>) -> Option<String> {
        if self.current.is_none() && self.active_tab != InspectorTab::Sources {
            return None;
        }
        Some(serializer::copy_text(self.active_tab, result))
    }

    pub fn view(&self) -> InspectorView {
        let result = self.inspect_current();
        let content = match (self.active_tab, &result) {
            (InspectorTab::Sources, _) => TabContent::Sources(view::source_entries(self.page.stylesheets())),
            (_, None) => TabContent::Placeholder(PLACEHOLDER_TEXT.to_string()),
            (InspectorTab::Styles, Some(result)) => view::styles_content(result),
            (InspectorTab::Computed, Some(result)) => view::computed_content(result),
        };

        let font_info = self.current.as_ref().map(|element| {
            let matcher = DomSelectorMatcher;
            let resolver = CascadeResolver::new(self.page.stylesheets(), &matcher);
            view::font_info(&resolver.computed_style(element))
        });

        InspectorView {
            state: self.state,
            popup_visible: self.popup_visible,
            overlay_visible: self.overlay_visible,
            close_button_visible: self.state == InspectorState::Pinned,
            pause_button_label: view::pause_button_label(self.state),
            popup_position: self.popup_position,
            tabs: view::tab_buttons(self.active_tab),
            selector_label: selector_label(self.current.as_ref(), &self.config.ui_prefix),
            font_info,
            content,
            copy_text: self.copy_text_for(result.as_ref()),
            notification: self.notification.clone(),
        }
    }
}
