use serde::{Deserialize, Serialize};
use std::fmt;

/// Declarative element selector. Serialized as JSON and handed to the
/// in-page resolver, or resolved in Rust by [`crate::dom::Document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selector {
    Css {
        css: String,
    },
    Role {
        role: String,
        name: Option<String>,
        exact: bool,
    },
    Filter {
        base: Box<Selector>,
        has: Option<Box<Selector>>,
        has_text: Option<TextMatch>,
    },
    Chain {
        scope: Box<Selector>,
        inner: Box<Selector>,
    },
    Nth {
        base: Box<Selector>,
        index: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum TextMatch {
    /// Case-insensitive substring.
    Contains(String),
    /// Whole text, whitespace-normalized.
    Exact(String),
}

impl Selector {
    pub fn css(css: impl Into<String>) -> Self {
        Selector::Css { css: css.into() }
    }

    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Selector::Role {
            role: role.into(),
            name: Some(name.into()),
            exact: false,
        }
    }

    pub fn has(self, inner: Selector) -> Self {
        Selector::Filter {
            base: Box::new(self),
            has: Some(Box::new(inner)),
            has_text: None,
        }
    }

    pub fn has_text(self, text: TextMatch) -> Self {
        Selector::Filter {
            base: Box::new(self),
            has: None,
            has_text: Some(text),
        }
    }

    pub fn within(self, scope: Selector) -> Self {
        Selector::Chain {
            scope: Box::new(scope),
            inner: Box::new(self),
        }
    }

    pub fn nth(self, index: usize) -> Self {
        Selector::Nth {
            base: Box::new(self),
            index,
        }
    }
}

impl TextMatch {
    pub fn matches(&self, text: &str) -> bool {
        let text = normalize_whitespace(text);
        match self {
            TextMatch::Contains(needle) => text
                .to_lowercase()
                .contains(&normalize_whitespace(needle).to_lowercase()),
            TextMatch::Exact(expected) => text == normalize_whitespace(expected),
        }
    }

    fn suffix(&self) -> char {
        match self {
            TextMatch::Contains(_) => 'i',
            TextMatch::Exact(_) => 's',
        }
    }

    fn value(&self) -> &str {
        match self {
            TextMatch::Contains(value) | TextMatch::Exact(value) => value,
        }
    }
}

/// Accessible-name comparison used by role selectors.
pub fn name_matches(actual: &str, expected: &str, exact: bool) -> bool {
    let actual = normalize_whitespace(actual);
    let expected = normalize_whitespace(expected);
    if exact {
        actual == expected
    } else {
        actual.to_lowercase().contains(&expected.to_lowercase())
    }
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn quoted(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Css { css } => write!(f, "{}", css),
            Selector::Role { role, name, exact } => {
                write!(f, "internal:role={}", role)?;
                if let Some(name) = name {
                    let flag = if *exact { 's' } else { 'i' };
                    write!(f, "[name={}{}]", quoted(name), flag)?;
                }
                Ok(())
            }
            Selector::Filter {
                base,
                has,
                has_text,
            } => {
                write!(f, "{}", base)?;
                if let Some(text) = has_text {
                    write!(f, " >> internal:has-text={}{}", quoted(text.value()), text.suffix())?;
                }
                if let Some(inner) = has {
                    write!(f, " >> internal:has={}", quoted(&inner.to_string()))?;
                }
                Ok(())
            }
            Selector::Chain { scope, inner } => write!(f, "{} >> {}", scope, inner),
            Selector::Nth { base, index } => write!(f, "{} >> nth={}", base, index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_form_of_css_and_role() {
        assert_eq!(
            Selector::css("[data-test='title']").to_string(),
            "[data-test='title']"
        );
        assert_eq!(
            Selector::role("button", "Login").to_string(),
            r#"internal:role=button[name="Login"i]"#
        );
    }

    #[test]
    fn canonical_form_of_composed_selectors() {
        let card = Selector::css(".card").has(
            Selector::css(".name").has_text(TextMatch::Exact("Sauce Labs Onesie".into())),
        );
        let button = Selector::role("button", "Add to cart").within(card);

        assert_eq!(
            button.to_string(),
            r#".card >> internal:has=".name >> internal:has-text=\"Sauce Labs Onesie\"s" >> internal:role=button[name="Add to cart"i]"#
        );
        assert_eq!(
            Selector::css("div").nth(0).to_string(),
            "div >> nth=0"
        );
    }

    #[test]
    fn serializes_with_kind_tags() {
        let selector = Selector::css("div").has_text(TextMatch::Contains("Login".into()));
        let json = serde_json::to_value(&selector).unwrap();

        assert_eq!(json["kind"], "filter");
        assert_eq!(json["base"]["kind"], "css");
        assert_eq!(json["has_text"]["mode"], "contains");
        assert_eq!(json["has_text"]["value"], "Login");
    }

    #[test]
    fn exact_text_does_not_accept_supersets() {
        let exact = TextMatch::Exact("Sauce Labs Onesie".into());
        assert!(exact.matches("  Sauce Labs   Onesie "));
        assert!(!exact.matches("Sauce Labs Onesie XL"));
        assert!(!exact.matches("Onesie"));

        let contains = TextMatch::Contains("onesie".into());
        assert!(contains.matches("Sauce Labs Onesie"));
    }

    #[test]
    fn accessible_names() {
        assert!(name_matches("Open Menu", "open menu", false));
        assert!(name_matches("Add to cart", "Add", false));
        assert!(!name_matches("Add to cart", "Add", true));
    }
}
