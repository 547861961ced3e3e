use std::collections::HashMap;

pub const URI_LIST: &str = "text/uri-list";
pub const PLAIN_TEXT: &str = "text/plain";

/// The data representations carried by a drop, keyed by MIME type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropPayload {
    representations: HashMap<String, String>,
}

impl DropPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, mime: impl Into<String>, data: impl Into<String>) -> Self {
        self.representations.insert(mime.into(), data.into());
        self
    }

    pub fn uri_list(data: impl Into<String>) -> Self {
        Self::new().with(URI_LIST, data)
    }

    pub fn plain_text(data: impl Into<String>) -> Self {
        Self::new().with(PLAIN_TEXT, data)
    }

    pub fn get(&self, mime: &str) -> Option<&str> {
        self.representations
            .get(mime)
            .map(String::as_str)
            .filter(|data| !data.is_empty())
    }
}

/// Recovers the dragged URL, preferring the URI list over plain text.
pub fn extract_url(payload: &DropPayload) -> Option<String> {
    if let Some(uri_list) = payload.get(URI_LIST) {
        let first = uri_list
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.starts_with('#'));
        if let Some(url) = first {
            return Some(url.to_string());
        }
    }

    payload
        .get(PLAIN_TEXT)
        .filter(|text| text.starts_with("http"))
        .map(|text| text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::{extract_url, DropPayload, PLAIN_TEXT, URI_LIST};

    #[test]
    fn uri_list_skips_comments() {
        let payload = DropPayload::uri_list("# comment\nhttp://a.com\nhttp://b.com");
        assert_eq!(extract_url(&payload).as_deref(), Some("http://a.com"));
    }

    #[test]
    fn uri_list_handles_crlf_and_blank_lines() {
        let payload = DropPayload::uri_list("\r\n  \r\n#x\r\n  https://rust-lang.org  \r\n");
        assert_eq!(extract_url(&payload).as_deref(), Some("https://rust-lang.org"));
    }

    #[test]
    fn plain_text_must_look_like_http() {
        assert_eq!(extract_url(&DropPayload::plain_text("hello")), None);
        assert_eq!(
            extract_url(&DropPayload::plain_text("http://x.com")).as_deref(),
            Some("http://x.com")
        );
        assert_eq!(
            extract_url(&DropPayload::plain_text("https://x.com/path \n")).as_deref(),
            Some("https://x.com/path")
        );
    }

    #[test]
    fn comment_only_uri_list_falls_back_to_plain_text() {
        let payload = DropPayload::new()
            .with(URI_LIST, "# nothing here")
            .with(PLAIN_TEXT, "http://fallback.dev");
        assert_eq!(extract_url(&payload).as_deref(), Some("http://fallback.dev"));
    }

    #[test]
    fn empty_payload_yields_nothing() {
        assert_eq!(extract_url(&DropPayload::new()), None);
        assert_eq!(extract_url(&DropPayload::uri_list("")), None);
    }
}
