//! Command Bridge for FuzzyTabber.
//!
//! The privileged side of the switcher: it alone talks to the host's tab
//! primitives, keeps the tab snapshot cache, and answers method-table calls
//! from the overlay. `handle_method` dispatches a call by name with
//! positional JSON arguments; `handle_request` flattens any failure into the
//! `{"error": "Fail"}` marker.

pub mod channel;
pub mod snapshot;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::managers::tab_manager::{HostEvent, TabHost};
use crate::types::errors::{BridgeError, HostError};
use crate::types::rpc::{
    error_marker, BridgeRequest, OpenTabOptions, RequestContext, CLOSE_TAB, GET_CURRENT_WINDOW,
    GET_TABS, GET_TAB_GROUPS, OPEN_TAB,
};
use crate::types::settings::RefreshPolicy;
use crate::types::tab::{MoveIndex, Tab, TabGroup, TabUpdate, Window, WindowUpdate};

use self::snapshot::SnapshotCache;

pub struct CommandBridge<H: TabHost> {
    host: H,
    cache: SnapshotCache,
    policy: RefreshPolicy,
}

impl<H: TabHost> CommandBridge<H> {
    pub fn new(host: H, policy: RefreshPolicy) -> Self {
        Self {
            host,
            cache: SnapshotCache::new(),
            policy,
        }
    }

    /// Primes the snapshot cache. A host failure leaves it empty.
    pub fn start(&mut self) {
        if let Err(e) = self.refresh() {
            warn!(error = %e, "initial tab snapshot failed");
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    pub fn policy(&self) -> RefreshPolicy {
        self.policy
    }

    fn refresh(&mut self) -> Result<(), HostError> {
        let tabs = self.host.query_tabs()?;
        info!(count = tabs.len(), "tab snapshot refreshed");
        self.cache.replace(tabs);
        Ok(())
    }

    /// Listener for host lifecycle events. Under the push policy a
    /// created/removed/attached/updated event re-queries the full tab list.
    pub fn on_host_event(&mut self, event: HostEvent) {
        match self.policy {
            RefreshPolicy::Push if event.triggers_refresh() => {
                debug!(?event, "refreshing snapshot");
                if let Err(e) = self.refresh() {
                    warn!(error = %e, "snapshot refresh failed, keeping previous tabs");
                }
            }
            _ => debug!(?event, "event does not refresh snapshot"),
        }
    }

    // ─── Method table ───

    /// Current tabs: the cache under push, a fresh query under pull.
    pub fn get_tabs(&mut self) -> Result<Vec<Tab>, HostError> {
        if self.policy == RefreshPolicy::Pull {
            self.refresh()?;
        }
        Ok(self.cache.tabs().to_vec())
    }

    /// Activates a tab. With `bring_tab_to_window` the tab is first moved to
    /// the end of the requesting window; otherwise its own window is focused.
    /// A missing id does nothing.
    pub fn open_tab(
        &mut self,
        tab_id: Option<i64>,
        options: OpenTabOptions,
        ctx: RequestContext,
    ) -> Result<(), HostError> {
        let tab_id = match tab_id {
            Some(id) => id,
            None => return Ok(()),
        };
        let activate = TabUpdate {
            active: Some(true),
            highlighted: Some(true),
        };

        if options.bring_tab_to_window {
            let window_id = match ctx.window_id {
                Some(id) => id,
                None => self.host.current_window()?.id,
            };
            self.host.move_tab(tab_id, window_id, MoveIndex::Last)?;
            self.host.update_tab(tab_id, activate)?;
        } else {
            self.host.update_tab(tab_id, activate)?;
            let tab = self.host.get_tab(tab_id)?;
            self.host.update_window(
                tab.window_id,
                WindowUpdate {
                    focused: Some(true),
                },
            )?;
        }
        Ok(())
    }

    /// Removes the tab. Returns `false` without touching the host when the
    /// tab has no id.
    pub fn close_tab(&mut self, tab: &Tab) -> Result<bool, HostError> {
        match tab.id {
            Some(id) => {
                self.host.remove_tab(id)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn get_tab_groups(&self) -> Result<Vec<TabGroup>, HostError> {
        self.host.query_tab_groups()
    }

    /// The requesting window when known, else the host's current window.
    /// A requesting window the host does not know is `WindowNotFound`.
    pub fn get_current_window(&self, ctx: RequestContext) -> Result<Window, HostError> {
        match ctx.window_id {
            Some(id) => self.host.get_window(id),
            None => self.host.current_window(),
        }
    }

    // ─── Dispatch ───

    /// Dispatch a method call to the matching table entry.
    pub fn handle_method(
        &mut self,
        method: &str,
        args: &[Value],
        ctx: RequestContext,
    ) -> Result<Value, BridgeError> {
        debug!(method, args = args.len(), "bridge got request");
        match method {
            GET_TABS => Ok(json!(self.get_tabs()?)),
            OPEN_TAB => {
                let tab_id: Option<i64> = arg(args, 0, "tabId")?;
                let options: Option<OpenTabOptions> = arg(args, 1, "options")?;
                self.open_tab(tab_id, options.unwrap_or_default(), ctx)?;
                Ok(Value::Null)
            }
            CLOSE_TAB => {
                let tab: Tab = arg(args, 0, "tab")?;
                Ok(json!(self.close_tab(&tab)?))
            }
            GET_TAB_GROUPS => Ok(json!(self.get_tab_groups()?)),
            GET_CURRENT_WINDOW => Ok(json!(self.get_current_window(ctx)?)),
            _ => Err(BridgeError::UnknownMethod(method.to_string())),
        }
    }

    /// Resolved value of the call, or the error marker if it rejected.
    pub fn handle_request(&mut self, request: &BridgeRequest, ctx: RequestContext) -> Value {
        match self.handle_method(&request.method, &request.args, ctx) {
            Ok(value) => value,
            Err(e) => {
                warn!(method = %request.method, error = %e, "bridge call failed");
                error_marker()
            }
        }
    }
}

/// Decodes positional argument `index`; a missing argument decodes as null.
fn arg<T: DeserializeOwned>(args: &[Value], index: usize, name: &str) -> Result<T, BridgeError> {
    let value = args.get(index).cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|e| BridgeError::InvalidArgs(format!("{}: {}", name, e)))
}
