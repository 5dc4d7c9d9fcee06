use crate::core::Selector;
use crate::errors::Result;

/// In-page selector resolver. Mirrors `crate::dom` so that the Chrome
/// driver and the in-memory storefront agree on what a selector matches.
pub const RESOLVER_PRELUDE: &str = r#"
const __e2eNormalize = (s) => (s || '').replace(/\s+/g, ' ').trim();
const __e2eIsButtonInput = (el) =>
    el.tagName === 'INPUT' && ['submit', 'button', 'reset'].includes((el.getAttribute('type') || '').toLowerCase());
const __e2eText = (root) => {
    let out = '';
    const walk = (node) => {
        if (node.nodeType === Node.TEXT_NODE) { out += node.nodeValue; return; }
        if (node.nodeType !== Node.ELEMENT_NODE) return;
        if (node.tagName === 'SCRIPT' || node.tagName === 'STYLE') return;
        if (__e2eIsButtonInput(node)) { out += ' ' + (node.value || '') + ' '; return; }
        node.childNodes.forEach(walk);
    };
    walk(root);
    return __e2eNormalize(out);
};
const __e2eRoleCss = {
    button: 'button, input[type="button"], input[type="submit"], input[type="reset"], [role="button"]',
    link: 'a[href], [role="link"]',
    textbox: 'input:not([type]), input[type="text"], input[type="password"], input[type="email"], input[type="search"], input[type="tel"], input[type="url"], input[type="number"], textarea, [role="textbox"]',
    heading: 'h1, h2, h3, h4, h5, h6, [role="heading"]',
};
const __e2eAccessibleName = (el) => {
    const aria = __e2eNormalize(el.getAttribute('aria-label'));
    if (aria) return aria;
    if (__e2eIsButtonInput(el)) return __e2eNormalize(el.value);
    if (el.tagName === 'INPUT' || el.tagName === 'TEXTAREA') {
        return __e2eNormalize(el.getAttribute('placeholder') || el.getAttribute('title'));
    }
    return __e2eText(el);
};
const __e2eNameMatches = (actual, expected, exact) => {
    const want = __e2eNormalize(expected);
    return exact ? actual === want : actual.toLowerCase().includes(want.toLowerCase());
};
const __e2eTextMatches = (text, m) => m.mode === 'exact'
    ? text === __e2eNormalize(m.value)
    : text.toLowerCase().includes(__e2eNormalize(m.value).toLowerCase());
const __e2eResolve = (root, sel) => {
    switch (sel.kind) {
        case 'css':
            return Array.from(root.querySelectorAll(sel.css));
        case 'role': {
            const css = __e2eRoleCss[sel.role] || `[role="${sel.role}"]`;
            return Array.from(root.querySelectorAll(css)).filter((el) =>
                sel.name == null || __e2eNameMatches(__e2eAccessibleName(el), sel.name, sel.exact));
        }
        case 'filter':
            return __e2eResolve(root, sel.base).filter((el) =>
                (!sel.has || __e2eResolve(el, sel.has).length > 0) &&
                (!sel.has_text || __e2eTextMatches(__e2eText(el), sel.has_text)));
        case 'chain': {
            const out = [];
            for (const scope of __e2eResolve(root, sel.scope)) {
                for (const el of __e2eResolve(scope, sel.inner)) {
                    if (!out.includes(el)) out.push(el);
                }
            }
            return out;
        }
        case 'nth': {
            const all = __e2eResolve(root, sel.base);
            return sel.index < all.length ? [all[sel.index]] : [];
        }
    }
    throw new Error('unknown selector kind: ' + sel.kind);
};
const __e2eVisible = (el) => {
    const style = window.getComputedStyle(el);
    if (style.visibility === 'hidden' || style.display === 'none') return false;
    const rect = el.getBoundingClientRect();
    return rect.width > 0 && rect.height > 0;
};
const __e2eEditable = (el) =>
    (el.tagName === 'INPUT' && !__e2eIsButtonInput(el)) || el.tagName === 'TEXTAREA' || el.isContentEditable
        ? !el.readOnly
        : false;
"#;

/// Probe body: reports on the resolved `matches`.
pub const PROBE_BODY: &str = r#"
const one = matches.length === 1 ? matches[0] : null;
return JSON.stringify({
    count: matches.length,
    visible: !!one && __e2eVisible(one),
    enabled: !!one && !one.disabled,
    editable: !!one && __e2eEditable(one),
    text: one ? (__e2eIsButtonInput(one) || one.tagName === 'TEXTAREA' ? __e2eNormalize(one.value) : __e2eText(one)) : null,
});
"#;

pub const CLICK_BODY: &str = r#"
if (matches.length !== 1) return JSON.stringify({ count: matches.length });
matches[0].scrollIntoView({ block: 'center', inline: 'center' });
matches[0].click();
return JSON.stringify({ count: 1 });
"#;

pub const FOCUS_BODY: &str = r#"
if (matches.length !== 1) return JSON.stringify({ count: matches.length });
matches[0].focus();
return JSON.stringify({ count: 1 });
"#;

/// Sets the value through the native setter so framework-managed inputs see
/// the change, then fires `input`/`change`.
pub fn set_value_body(text: &str) -> Result<String> {
    let text = serde_json::to_string(text)?;
    Ok(format!(
        r#"
if (matches.length !== 1) return JSON.stringify({{ count: matches.length }});
const el = matches[0];
el.focus();
const proto = Object.getPrototypeOf(el);
const descriptor = Object.getOwnPropertyDescriptor(proto, 'value');
if (descriptor && descriptor.set) {{ descriptor.set.call(el, {text}); }} else {{ el.value = {text}; }}
el.dispatchEvent(new Event('input', {{ bubbles: true }}));
el.dispatchEvent(new Event('change', {{ bubbles: true }}));
return JSON.stringify({{ count: 1 }});
"#
    ))
}

/// Wrap `body` in an IIFE that has `matches` bound to the selector's
/// resolution against `document`.
pub fn element_script(selector: &Selector, body: &str) -> Result<String> {
    let selector = serde_json::to_string(selector)?;
    Ok(format!(
        "(function() {{\n{prelude}\nconst matches = __e2eResolve(document, {selector});\n{body}\n}})()",
        prelude = RESOLVER_PRELUDE,
        selector = selector,
        body = body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TextMatch;

    #[test]
    fn element_script_embeds_selector_json() {
        let selector = Selector::css("[data-test='title']").has_text(TextMatch::Exact("Products".into()));
        let script = element_script(&selector, PROBE_BODY).unwrap();

        assert!(script.starts_with("(function() {"));
        assert!(script.ends_with("})()"));
        assert!(script.contains(r#""kind":"filter""#));
        assert!(script.contains(r#""mode":"exact""#));
    }

    #[test]
    fn resolver_normalizes_labels_and_control_values() {
        assert!(RESOLVER_PRELUDE.contains("const aria = __e2eNormalize(el.getAttribute('aria-label'));"));
        assert!(PROBE_BODY.contains("__e2eNormalize(one.value)"));
    }

    #[test]
    fn set_value_escapes_text() {
        let body = set_value_body("it's \"quoted\"\n").unwrap();
        assert!(body.contains(r#""it's \"quoted\"\n""#));
    }
}
