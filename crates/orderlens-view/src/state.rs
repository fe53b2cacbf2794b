/// View-local state of the order lookup page.
///
/// Both fields start empty and live for the life of the view. The input is
/// replaced on every keystroke; the result is replaced once per completed
/// lookup and is never cleared while a new lookup is in flight.
pub struct ViewState {
    input_text: String,
    result_text: String,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            input_text: String::new(),
            result_text: String::new(),
        }
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn result_text(&self) -> &str {
        &self.result_text
    }

    pub fn set_input(&mut self, value: &str) {
        self.input_text = value.to_string();
    }

    /// Completion write for a finished lookup. Callers apply results in
    /// arrival order, so with overlapping lookups the last response wins.
    pub fn set_result(&mut self, text: String) {
        self.result_text = text;
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}
