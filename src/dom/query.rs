//! Selector resolution over a parsed HTML document.
//!
//! Same matching rules as the in-page resolver in
//! `utils::javascript::RESOLVER_PRELUDE`: element text is the concatenation
//! of descendant text nodes plus the value of button-like inputs, with
//! whitespace collapsed. A blank `aria-label` is ignored by both. Probed
//! `<textarea>` text is the control's value; here that is the markup the
//! document was rendered with. Layout is not available here, so visibility only
//! looks at `hidden`, inline `display`/`visibility` and hidden inputs.

use crate::core::selector::{name_matches, normalize_whitespace};
use crate::core::{ElementProbe, Selector};
use crate::errors::{E2eError, Result};
use scraper::node::Element;
use scraper::{ElementRef, Html, Node};

pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    pub fn resolve(&self, selector: &Selector) -> Result<Vec<ElementRef<'_>>> {
        resolve_in(self.html.root_element(), selector)
    }

    /// Strict resolution: exactly one match or an error.
    pub fn resolve_one(&self, selector: &Selector) -> Result<ElementRef<'_>> {
        let matches = self.resolve(selector)?;
        match matches.as_slice() {
            [single] => Ok(*single),
            [] => Err(E2eError::ElementNotFound(selector.to_string())),
            many => Err(E2eError::StrictModeViolation {
                selector: selector.to_string(),
                count: many.len(),
            }),
        }
    }

    pub fn probe(&self, selector: &Selector) -> Result<ElementProbe> {
        let matches = self.resolve(selector)?;
        if matches.len() != 1 {
            return Ok(ElementProbe {
                count: matches.len(),
                ..ElementProbe::missing()
            });
        }

        let el = matches[0];
        Ok(ElementProbe {
            count: 1,
            visible: is_visible(el),
            enabled: el.value().attr("disabled").is_none(),
            editable: is_editable(el.value()),
            text: Some(probe_text(el)),
        })
    }
}

fn resolve_in<'a>(root: ElementRef<'a>, selector: &Selector) -> Result<Vec<ElementRef<'a>>> {
    match selector {
        Selector::Css { css } => {
            let parsed = parse_css(css)?;
            Ok(root.select(&parsed).collect())
        }
        Selector::Role { role, name, exact } => {
            let parsed = parse_css(&role_css(role))?;
            Ok(root
                .select(&parsed)
                .filter(|el| {
                    name.as_deref()
                        .map_or(true, |name| name_matches(&accessible_name(*el), name, *exact))
                })
                .collect())
        }
        Selector::Filter {
            base,
            has,
            has_text,
        } => {
            let mut out = Vec::new();
            for el in resolve_in(root, base)? {
                if let Some(inner) = has {
                    if resolve_in(el, inner)?.is_empty() {
                        continue;
                    }
                }
                if let Some(text) = has_text {
                    if !text.matches(&element_text(el)) {
                        continue;
                    }
                }
                out.push(el);
            }
            Ok(out)
        }
        Selector::Chain { scope, inner } => {
            let mut out: Vec<ElementRef<'a>> = Vec::new();
            for scope_el in resolve_in(root, scope)? {
                for el in resolve_in(scope_el, inner)? {
                    if !out.iter().any(|seen| seen.id() == el.id()) {
                        out.push(el);
                    }
                }
            }
            Ok(out)
        }
        Selector::Nth { base, index } => Ok(resolve_in(root, base)?
            .into_iter()
            .nth(*index)
            .into_iter()
            .collect()),
    }
}

fn parse_css(css: &str) -> Result<scraper::Selector> {
    scraper::Selector::parse(css)
        .map_err(|e| E2eError::InvalidSelector(format!("{}: {:?}", css, e)))
}

fn role_css(role: &str) -> String {
    match role {
        "button" => r#"button, input[type="button"], input[type="submit"], input[type="reset"], [role="button"]"#.to_string(),
        "link" => r#"a[href], [role="link"]"#.to_string(),
        "textbox" => r#"input:not([type]), input[type="text"], input[type="password"], input[type="email"], input[type="search"], input[type="tel"], input[type="url"], input[type="number"], textarea, [role="textbox"]"#.to_string(),
        "heading" => r#"h1, h2, h3, h4, h5, h6, [role="heading"]"#.to_string(),
        other => format!(r#"[role="{}"]"#, other),
    }
}

fn is_button_input(element: &Element) -> bool {
    element.name() == "input"
        && matches!(
            element.attr("type").map(|t| t.to_ascii_lowercase()).as_deref(),
            Some("submit" | "button" | "reset")
        )
}

fn is_editable(element: &Element) -> bool {
    let editable_tag = match element.name() {
        "input" => !is_button_input(element) && element.attr("type") != Some("hidden"),
        "textarea" => true,
        _ => element.attr("contenteditable") == Some("true"),
    };
    editable_tag && element.attr("readonly").is_none()
}

pub fn element_text(el: ElementRef<'_>) -> String {
    let mut out = String::new();

    for node in el.descendants() {
        match node.value() {
            Node::Text(text) => {
                let in_script = node
                    .parent()
                    .and_then(ElementRef::wrap)
                    .map_or(false, |parent| matches!(parent.value().name(), "script" | "style"));
                if !in_script {
                    out.push_str(text);
                }
            }
            Node::Element(element) if is_button_input(element) => {
                out.push(' ');
                out.push_str(element.attr("value").unwrap_or_default());
                out.push(' ');
            }
            _ => {}
        }
    }

    normalize_whitespace(&out)
}

/// Text reported by a probe. Form controls report their value; a parsed
/// `<textarea>` holds its value as raw child text.
fn probe_text(el: ElementRef<'_>) -> String {
    let element = el.value();
    if is_button_input(element) {
        normalize_whitespace(element.attr("value").unwrap_or_default())
    } else if element.name() == "textarea" {
        normalize_whitespace(&el.text().collect::<String>())
    } else {
        element_text(el)
    }
}

pub fn accessible_name(el: ElementRef<'_>) -> String {
    let element = el.value();

    if let Some(aria) = element.attr("aria-label").filter(|a| !a.trim().is_empty()) {
        return normalize_whitespace(aria);
    }
    if is_button_input(element) {
        return normalize_whitespace(element.attr("value").unwrap_or_default());
    }
    if matches!(element.name(), "input" | "textarea") {
        let hint = element.attr("placeholder").or_else(|| element.attr("title"));
        return normalize_whitespace(hint.unwrap_or_default());
    }
    element_text(el)
}

/// Visible unless the element or an ancestor is hidden by attribute or
/// inline style.
pub fn is_visible(el: ElementRef<'_>) -> bool {
    if el.value().name() == "input" && el.value().attr("type") == Some("hidden") {
        return false;
    }

    std::iter::successors(Some(el), |current| current.parent().and_then(ElementRef::wrap)).all(
        |current| {
            let element = current.value();
            let style = element
                .attr("style")
                .map(|s| s.replace(' ', "").to_ascii_lowercase())
                .unwrap_or_default();
            element.attr("hidden").is_none()
                && !style.contains("display:none")
                && !style.contains("visibility:hidden")
        },
    )
}
