use regex::Regex;
use scraper::ElementRef;
use std::fmt;

/// One attribute requirement: an exact value or a regex over the value.
#[derive(Debug, Clone)]
pub enum AttrConstraint {
    Exact(String),
    Pattern(Regex),
}

/// A tag name plus attribute constraints, used to query a document tree.
/// Never persisted; built per lookup.
#[derive(Debug, Clone)]
pub struct TagFilter {
    name: String,
    attrs: Vec<(String, AttrConstraint)>,
}

impl TagFilter {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
        }
    }

    pub fn with_attr<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.attrs
            .push((key.into(), AttrConstraint::Exact(value.into())));
        self
    }

    pub fn with_attr_pattern<K: Into<String>>(mut self, key: K, pattern: Regex) -> Self {
        self.attrs.push((key.into(), AttrConstraint::Pattern(pattern)));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute constraints rendered the way they appear in errors.
    pub fn attrs_description(&self) -> String {
        self.attrs
            .iter()
            .map(|(key, constraint)| match constraint {
                AttrConstraint::Exact(value) => format!("{}=\"{}\"", key, value),
                AttrConstraint::Pattern(pattern) => format!("{}~/{}/", key, pattern.as_str()),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn matches(&self, element: ElementRef<'_>) -> bool {
        if element.value().name() != self.name {
            return false;
        }

        self.attrs.iter().all(|(key, constraint)| {
            let Some(value) = element.value().attr(key) else {
                return false;
            };
            match constraint {
                AttrConstraint::Exact(expected) => {
                    if key == "class" {
                        // Class is multi-valued; match any token.
                        value.split_whitespace().any(|token| token == expected)
                    } else {
                        value == expected
                    }
                }
                AttrConstraint::Pattern(pattern) => pattern.is_match(value),
            }
        })
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.attrs.is_empty() {
            write!(f, "<{}>", self.name)
        } else {
            write!(f, "<{}> {}", self.name, self.attrs_description())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first_element<'a>(document: &'a Html, css: &str) -> ElementRef<'a> {
        let selector = Selector::parse(css).unwrap();
        document.select(&selector).next().unwrap()
    }

    #[test]
    fn test_exact_attr_match() {
        let document = Html::parse_document(r#"<div id="main" role="main"></div>"#);
        let div = first_element(&document, "div");

        assert!(TagFilter::new("div").matches(div));
        assert!(TagFilter::new("div").with_attr("role", "main").matches(div));
        assert!(!TagFilter::new("div").with_attr("role", "nav").matches(div));
        assert!(!TagFilter::new("span").matches(div));
        assert!(!TagFilter::new("div").with_attr("missing", "x").matches(div));
    }

    #[test]
    fn test_class_matches_any_token() {
        let document = Html::parse_document(r#"<li class="toctree-l1 current"></li>"#);
        let li = first_element(&document, "li");

        assert!(TagFilter::new("li")
            .with_attr("class", "toctree-l1")
            .matches(li));
        assert!(TagFilter::new("li").with_attr("class", "current").matches(li));
        assert!(!TagFilter::new("li").with_attr("class", "toctree").matches(li));
    }

    #[test]
    fn test_pattern_attr_match() {
        let document = Html::parse_document(
            r#"<a href="archives/python-3.12-docs-pdf-a4.zip">pdf</a>"#,
        );
        let anchor = first_element(&document, "a");
        let pattern = Regex::new(r".+pdf-a4\.zip$").unwrap();

        assert!(TagFilter::new("a")
            .with_attr_pattern("href", pattern.clone())
            .matches(anchor));

        let other = Regex::new(r".+\.tar\.bz2$").unwrap();
        assert!(!TagFilter::new("a").with_attr_pattern("href", other).matches(anchor));
    }

    #[test]
    fn test_display_names_constraints() {
        let filter = TagFilter::new("section").with_attr("id", "what-s-new-in-python");
        assert_eq!(filter.to_string(), r#"<section> id="what-s-new-in-python""#);

        let filter = TagFilter::new("h1");
        assert_eq!(filter.to_string(), "<h1>");
    }
}
