use ammonia::{Builder, UrlRelative};

/// Cleans editor HTML (job descriptions) down to a safe subset.
pub fn sanitize_rich_text(content: &str) -> String {
    Builder::default()
        .link_rel(Some("nofollow noopener noreferrer"))
        .url_relative(UrlRelative::Deny)
        .clean(content)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_formatting_and_drops_scripts() {
        let cleaned = sanitize_rich_text(r#"<p onclick="x()">Hi <em>there</em></p><script>alert(1)</script>"#);
        assert_eq!(cleaned, "<p>Hi <em>there</em></p>");
    }

    #[test]
    fn links_are_marked_nofollow() {
        let cleaned = sanitize_rich_text(r#"<a href="https://example.com">apply</a>"#);
        assert!(cleaned.contains(r#"rel="nofollow noopener noreferrer""#));
    }
}
