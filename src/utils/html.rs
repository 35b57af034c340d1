//! Escaping for text interpolated into HTML and XML.

use std::borrow::Cow;

/// Escape `& < > " '`. Safe for element text and quoted attribute values.
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// XML flavour of [`escape`], using `&apos;`.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Serialize JSON for an inline `<script>` block.
///
/// `</` is written as `<\/` so a string value cannot close the element.
pub fn script_json(value: &serde_json::Value) -> String {
    value.to_string().replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("AI & Agents"), "AI &amp; Agents");
        assert_eq!(
            escape(r#"<a href="x">'q'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;q&#39;&lt;/a&gt;"
        );
        assert!(matches!(escape("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a & b < c"), "a &amp; b &lt; c");
        assert_eq!(escape_xml("it's \"x\""), "it&apos;s &quot;x&quot;");
        // ampersand replaced first, so entities are not double-escaped wrongly
        assert_eq!(escape_xml("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_script_json() {
        let value = serde_json::json!({ "name": "</script><script>alert(1)" });
        let json = script_json(&value);
        assert!(!json.contains("</script>"));
        assert!(json.contains("<\\/script>"));
        let back: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
