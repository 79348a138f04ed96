//! What a command prints on stdout.

/// Result of a command, rendered by [`Output::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// An API response body, untouched.
    Body(Vec<u8>),
    /// Human-readable report lines.
    Lines(Vec<String>),
}

impl Output {
    pub fn body(bytes: impl AsRef<[u8]>) -> Self {
        Output::Body(bytes.as_ref().to_vec())
    }

    pub fn line(line: impl Into<String>) -> Self {
        Output::Lines(vec![line.into()])
    }

    /// Text to print. Bodies are pretty-printed JSON unless `raw` is set or
    /// the body does not parse, in which case it is printed as received.
    pub fn render(&self, raw: bool) -> String {
        match self {
            Output::Lines(lines) => lines.join("\n"),
            Output::Body(body) if raw => String::from_utf8_lossy(body).into_owned(),
            Output::Body(body) => pretty_json(body),
        }
    }
}

fn pretty_json(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned())
}
