//! orderlens-view — the order lookup view
//!
//! Holds the two pieces of view state (current input text, last rendered
//! result), maps wire actions onto state changes, and builds the DOM
//! snapshot the server broadcasts. Pure: no I/O lives here — the server
//! crate performs the actual backend lookup and writes the result back
//! through [`ViewState::set_result`].

mod dom;
mod format;
mod state;

pub use dom::render_snapshot;
pub use format::{encode_query_value, format_response};
pub use state::ViewState;

/// Supported actions.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace the input text with the given value (one per keystroke).
    SetOrderUid { value: String },
    /// Start a backend lookup for the current input text.
    FetchOrder,
    Unknown,
}

impl Action {
    /// Map an action name + JSON payload from the wire onto an Action.
    /// Unknown names and malformed payloads fall through to `Unknown`.
    pub fn parse(name: &str, payload: &serde_json::Value) -> Action {
        match name {
            "set_order_uid" => {
                let value = payload
                    .get("value")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string();
                Action::SetOrderUid { value }
            }
            "fetch_order" => Action::FetchOrder,
            _ => Action::Unknown,
        }
    }
}

/// Pure reducer: mutate state based on action.
///
/// `FetchOrder` intentionally leaves state untouched — no loading flag is
/// modeled, and the result only changes when a lookup completes.
pub fn reduce(state: &mut ViewState, action: &Action) {
    match action {
        Action::SetOrderUid { value } => state.set_input(value),
        Action::FetchOrder => {}
        Action::Unknown => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_echo() {
        // Whatever is typed is stored verbatim: no trimming, no validation.
        let mut state = ViewState::new();
        for s in ["b563feb7b2b84b6test", "  spaced  ", "", "a&b=c"] {
            reduce(
                &mut state,
                &Action::SetOrderUid {
                    value: s.to_string(),
                },
            );
            assert_eq!(state.input_text(), s);
        }
    }

    #[test]
    fn test_fetch_leaves_state_untouched() {
        let mut state = ViewState::new();
        state.set_input("abc");
        state.set_result("old result".to_string());
        reduce(&mut state, &Action::FetchOrder);
        assert_eq!(state.input_text(), "abc");
        assert_eq!(state.result_text(), "old result");
    }

    #[test]
    fn test_parse_actions() {
        let payload = serde_json::json!({ "value": "order-1" });
        assert_eq!(
            Action::parse("set_order_uid", &payload),
            Action::SetOrderUid {
                value: "order-1".to_string()
            }
        );
        assert_eq!(
            Action::parse("fetch_order", &serde_json::json!({})),
            Action::FetchOrder
        );
        assert_eq!(
            Action::parse("navigate", &serde_json::json!({})),
            Action::Unknown
        );
        // Missing value field degrades to an empty input, not an error
        assert_eq!(
            Action::parse("set_order_uid", &serde_json::json!({})),
            Action::SetOrderUid {
                value: String::new()
            }
        );
    }
}
