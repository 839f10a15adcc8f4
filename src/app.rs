//! App shell for FuzzyTabber.
//!
//! Wires the overlay controller to key bindings and to a bridge handle.
//! Bridge commands produced by the overlay are sent fire-and-forget; the
//! remaining effects are handed back for the view layer to apply.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::bridge::channel::BridgeHandle;
use crate::managers::shortcut_manager::{ShortcutManager, ShortcutManagerTrait};
use crate::overlay::{OverlayController, OverlayEffect};
use crate::types::errors::{BridgeError, ShortcutError};
use crate::types::rpc::{BridgeRequest, RequestContext};
use crate::types::settings::TabberSettings;
use crate::types::tab::{Tab, TabGroup, Window};

pub struct App {
    pub settings: TabberSettings,
    pub shortcuts: ShortcutManager,
    pub overlay: OverlayController,
    bridge: BridgeHandle,
    ctx: RequestContext,
}

impl App {
    /// `window_id` is the window hosting the overlay, if known.
    pub fn new(
        settings: TabberSettings,
        bridge: BridgeHandle,
        window_id: Option<i64>,
    ) -> Result<Self, ShortcutError> {
        let shortcuts = ShortcutManager::from_bindings(&settings.shortcuts)?;
        let overlay = OverlayController::from_settings(&settings);
        Ok(Self {
            settings,
            shortcuts,
            overlay,
            bridge,
            ctx: RequestContext { window_id },
        })
    }

    /// Fetches tabs, tab groups and the hosting window from the bridge.
    ///
    /// Stops at the first failure; whatever was already fetched (and any
    /// older data) stays in place.
    pub async fn refresh(&mut self) -> Result<(), BridgeError> {
        let tabs: Vec<Tab> = self.fetch(BridgeRequest::get_tabs()).await?;
        self.overlay.set_snapshot(tabs);

        let groups: Vec<TabGroup> = self.fetch(BridgeRequest::get_tab_groups()).await?;
        self.overlay.set_tab_groups(groups);

        let window: Window = self.fetch(BridgeRequest::get_current_window()).await?;
        if self.ctx.window_id.is_none() {
            self.ctx.window_id = Some(window.id);
        }
        self.overlay.set_current_window(window.id);
        Ok(())
    }

    async fn fetch<T: DeserializeOwned>(&self, request: BridgeRequest) -> Result<T, BridgeError> {
        let method = request.method.clone();
        let value: Value = self.bridge.call(request, self.ctx).await?;
        serde_json::from_value(value)
            .map_err(|e| BridgeError::InvalidResponse(format!("{}: {}", method, e)))
    }

    pub fn toggle(&mut self) -> Vec<OverlayEffect> {
        let effects = self.overlay.toggle();
        self.dispatch(effects)
    }

    /// Handles a key chord. Unbound chords are ignored.
    pub fn key(&mut self, keys: &str) -> Vec<OverlayEffect> {
        match self.shortcuts.resolve(keys) {
            Some(action) => {
                let effects = self.overlay.handle_action(action);
                self.dispatch(effects)
            }
            None => Vec::new(),
        }
    }

    pub fn input(&mut self, text: &str) -> Vec<OverlayEffect> {
        self.overlay.set_query(text)
    }

    pub fn hover(&mut self, row: usize) -> Vec<OverlayEffect> {
        self.overlay.hover(row)
    }

    pub fn click(&mut self, row: usize) -> Vec<OverlayEffect> {
        let effects = self.overlay.click(row);
        self.dispatch(effects)
    }

    pub fn background_click(&mut self) -> Vec<OverlayEffect> {
        self.overlay.background_click()
    }

    fn dispatch(&self, effects: Vec<OverlayEffect>) -> Vec<OverlayEffect> {
        effects
            .into_iter()
            .filter_map(|effect| match effect {
                OverlayEffect::Dispatch(command) => {
                    if let Err(e) = self.bridge.send(command.to_request(), self.ctx) {
                        warn!(error = %e, "dropping bridge command");
                    }
                    None
                }
                other => Some(other),
            })
            .collect()
    }
}
