use std::collections::{HashMap, HashSet};

/// Render lesson markdown to sanitized HTML.
#[must_use]
pub fn markdown_to_html(input: &str) -> String {
    let mut options = pulldown_cmark::Options::empty();
    options.insert(pulldown_cmark::Options::ENABLE_STRIKETHROUGH);
    options.insert(pulldown_cmark::Options::ENABLE_TABLES);

    let parser = pulldown_cmark::Parser::new_ext(input, options);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    sanitize_html(&html)
}

/// Inline variant for short strings such as option labels: no wrapping `<p>`.
#[must_use]
pub fn inline_markdown_to_html(input: &str) -> String {
    let html = markdown_to_html(input);
    let trimmed = html.trim();
    trimmed
        .strip_prefix("<p>")
        .and_then(|rest| rest.strip_suffix("</p>"))
        .filter(|inner| !inner.contains("<p>"))
        .map_or_else(|| trimmed.to_string(), str::to_string)
}

#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let tags: HashSet<&str> = [
        "p", "div", "span", "br", "em", "strong", "b", "i", "del", "code", "pre", "blockquote",
        "ul", "ol", "li", "a", "h1", "h2", "h3", "h4", "table", "thead", "tbody", "tr", "th",
        "td",
    ]
    .into_iter()
    .collect();

    let mut attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
    attributes.insert("a", ["href"].into_iter().collect());

    ammonia::Builder::new()
        .tags(tags)
        .tag_attributes(attributes)
        .clean(html)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{inline_markdown_to_html, markdown_to_html, sanitize_html};

    #[test]
    fn markdown_to_html_sanitizes_links() {
        let html = markdown_to_html("[Link](javascript:alert(1))");
        assert!(html.contains("Link"));
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn lesson_markdown_keeps_structure() {
        let html = markdown_to_html("## Borrowing\n\n- `&T` shared\n- `&mut T` unique");
        assert!(html.contains("<h2>Borrowing</h2>"), "{html}");
        assert!(html.contains("<code>&amp;mut T</code>"), "{html}");
    }

    #[test]
    fn script_tags_are_stripped() {
        let html = sanitize_html("<p>ok</p><script>alert(1)</script>");
        assert_eq!(html, "<p>ok</p>");
    }

    #[test]
    fn inline_markdown_drops_paragraph_wrapper() {
        assert_eq!(inline_markdown_to_html("use `mut`"), "use <code>mut</code>");
        assert_eq!(inline_markdown_to_html("a\n\nb"), "<p>a</p>\n<p>b</p>");
    }
}
