use crate::state::ViewState;
use orderlens_dom::{DomNode, Snapshot};

/// Build the full DOM snapshot for the current view state.
///
/// Structure: heading, controlled text input bound to the input text, a
/// fetch button, and the result panel. The result is rendered in a `pre`
/// so pretty-printed JSON keeps its indentation and newlines.
pub fn render_snapshot(state: &ViewState) -> Snapshot {
    let root = DomNode::elem("div")
        .with_key("app")
        .with_attr("class", "lookup-card")
        .with_child(DomNode::text("h1", "Order data").with_key("title"))
        .with_child(
            DomNode::elem("input")
                .with_key("order-input")
                .with_attr("type", "text")
                .with_attr("class", "order-input")
                .with_attr("placeholder", "Enter order id")
                .with_attr("autocomplete", "off")
                .with_attr("value", state.input_text())
                .with_event("input", "set_order_uid"),
        )
        .with_child(
            DomNode::text("button", "Fetch data")
                .with_key("fetch-btn")
                .with_attr("class", "fetch-btn")
                .with_event("click", "fetch_order"),
        )
        .with_child(
            DomNode::elem("div")
                .with_key("result")
                .with_attr("class", "result-panel")
                .with_child(DomNode::text("strong", "Result:").with_key("result-label"))
                .with_child(
                    DomNode::text("pre", state.result_text())
                        .with_key("result-text")
                        .with_attr("class", "result-text"),
                ),
        );

    Snapshot::new(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_value_reflects_state() {
        let mut state = ViewState::new();
        state.set_input("b563feb7b2b84b6test");
        let snap = render_snapshot(&state);
        let input = snap.root.find_key("order-input").unwrap();
        assert_eq!(input.attr("value"), Some("b563feb7b2b84b6test"));
        assert_eq!(input.event("input"), Some("set_order_uid"));
    }

    #[test]
    fn test_result_panel_verbatim() {
        let mut state = ViewState::new();
        state.set_result("{\n  \"a\": 1\n}".to_string());
        let snap = render_snapshot(&state);
        let pre = snap.root.find_key("result-text").unwrap();
        assert_eq!(pre.tag, "pre");
        assert_eq!(pre.text.as_deref(), Some("{\n  \"a\": 1\n}"));
    }

    #[test]
    fn test_fetch_button_wired() {
        let snap = render_snapshot(&ViewState::new());
        let btn = snap.root.find_key("fetch-btn").unwrap();
        assert_eq!(btn.event("click"), Some("fetch_order"));
        assert_eq!(btn.text.as_deref(), Some("Fetch data"));
    }
}
