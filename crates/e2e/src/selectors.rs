//! Selector builders

/// `tag[attr='value']`, with quotes and backslashes in `value` escaped
pub fn attr_equals(tag: &str, attr: &str, value: &str) -> String {
    format!("{}[{}='{}']", tag, attr, quote(value))
}

/// Playwright `:has-text()` selector for a button
pub fn button_with_text(label: &str) -> String {
    format!("button:has-text('{}')", quote(label))
}

fn quote(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
