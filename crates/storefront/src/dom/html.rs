//! HTML serialization of the display tree.

use std::fmt::Write;

use super::Node;

const VOID_TAGS: &[&str] = &["img", "input", "br", "hr"];

pub(super) fn write_node(node: &Node, out: &mut String) {
    let data = node.0.borrow();
    out.push('<');
    out.push_str(&data.tag);

    if let Some(id) = &data.id {
        write_attr(out, "id", id);
    }
    if !data.classes.is_empty() {
        write_attr(out, "class", &data.classes.join(" "));
    }
    for (name, value) in &data.attrs {
        write_attr(out, name, value);
    }
    if data.tag == "input" && !data.value.is_empty() {
        write_attr(out, "value", &data.value);
    }
    if data.disabled {
        out.push_str(" disabled");
    }
    if data.hidden {
        write_attr(out, "style", "display: none");
    }
    out.push('>');

    if VOID_TAGS.contains(&data.tag.as_str()) {
        return;
    }

    escape_into(out, &data.text);
    for child in &data.children {
        write_node(child, out);
    }
    let _ = write!(out, "</{}>", data.tag);
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    escape_into(out, value);
    out.push('"');
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
