use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Collapse every whitespace run, newlines included, to a single space.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text.trim(), " ").into_owned()
}

/// All text beneath `element`, one space between text nodes, no markup.
pub fn flatten_text(element: ElementRef<'_>) -> String {
    let joined = element.text().collect::<Vec<_>>().join(" ");
    normalize_whitespace(&joined)
}

/// Flattened text, or `None` when the element holds nothing readable.
pub fn non_empty_text(element: ElementRef<'_>) -> Option<String> {
    Some(flatten_text(element)).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_normalize_whitespace() {
        let text = "  Motion    Designer \n\n\t (m/w/d)  ";
        assert_eq!(normalize_whitespace(text), "Motion Designer (m/w/d)");
    }

    #[test]
    fn flatten_joins_nested_nodes_with_spaces() {
        let html = Html::parse_fragment("<div><p>Wir suchen</p><ul><li>After Effects</li><li>Cinema 4D</li></ul></div>");
        let selector = Selector::parse("div").unwrap();
        let div = html.select(&selector).next().unwrap();
        assert_eq!(flatten_text(div), "Wir suchen After Effects Cinema 4D");
    }

    #[test]
    fn whitespace_only_element_is_empty() {
        let html = Html::parse_fragment("<span>  \n </span>");
        let selector = Selector::parse("span").unwrap();
        let span = html.select(&selector).next().unwrap();
        assert_eq!(non_empty_text(span), None);
    }
}
