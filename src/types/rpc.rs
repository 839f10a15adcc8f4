use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::errors::BridgeError;
use super::tab::Tab;

pub const GET_TABS: &str = "getTabs";
pub const OPEN_TAB: &str = "openTab";
pub const CLOSE_TAB: &str = "closeTab";
pub const GET_TAB_GROUPS: &str = "getTabGroups";
pub const GET_CURRENT_WINDOW: &str = "getCurrentWindow";

/// Payload of the error marker returned for any rejected call.
pub const FAILURE_MARKER: &str = "Fail";

/// A cross-context method call: a method name plus positional arguments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BridgeRequest {
    pub method: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl BridgeRequest {
    pub fn new(method: &str, args: Vec<Value>) -> Self {
        Self {
            method: method.to_string(),
            args,
        }
    }

    pub fn get_tabs() -> Self {
        Self::new(GET_TABS, Vec::new())
    }

    pub fn get_tab_groups() -> Self {
        Self::new(GET_TAB_GROUPS, Vec::new())
    }

    pub fn get_current_window() -> Self {
        Self::new(GET_CURRENT_WINDOW, Vec::new())
    }

    pub fn open_tab(tab_id: Option<i64>, options: OpenTabOptions) -> Self {
        Self::new(OPEN_TAB, vec![json!(tab_id), json!(options)])
    }

    pub fn close_tab(tab: &Tab) -> Self {
        Self::new(CLOSE_TAB, vec![json!(tab)])
    }
}

/// Who issued a request. The bridge uses the window to resolve
/// "bring to this window" and "current window".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub window_id: Option<i64>,
}

impl RequestContext {
    pub fn from_window(window_id: i64) -> Self {
        Self {
            window_id: Some(window_id),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OpenTabOptions {
    #[serde(default)]
    pub bring_tab_to_window: bool,
}

/// The `{"error": ...}` value sent back in place of a result.
pub fn error_marker() -> Value {
    json!({ "error": FAILURE_MARKER })
}

/// Splits a bridge response into the resolved value or a rejection.
pub fn into_result(response: Value) -> Result<Value, BridgeError> {
    match response.get("error").and_then(|e| e.as_str()) {
        Some(msg) if response.as_object().map(|o| o.len() == 1).unwrap_or(false) => {
            Err(BridgeError::Rejected(msg.to_string()))
        }
        _ => Ok(response),
    }
}
