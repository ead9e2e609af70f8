//! Escaping for untrusted text.
//!
//! Post titles/bodies and comment bodies are escaped once, before
//! storage. This defends against stored markup injection, not against
//! malformed structure.

/// Escape HTML special characters.
#[must_use]
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<b>Hi</b>"), "&lt;b&gt;Hi&lt;/b&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape(r#"say "hi""#), "say &quot;hi&quot;");
        assert_eq!(html_escape("it's"), "it&#x27;s");
        assert_eq!(html_escape("plain text"), "plain text");
    }

    #[test]
    fn test_html_escape_amp_first() {
        // Ampersand must be escaped before the other entities are introduced.
        assert_eq!(html_escape("&lt;"), "&amp;lt;");
    }
}
