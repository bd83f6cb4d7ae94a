//! Small output helpers shared by the block and inline layers.

/// One level of output indentation.
pub const INDENT_UNIT: &str = "    ";

/// Append `depth` indentation units.
pub fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT_UNIT);
    }
}

/// Append text with `<`, `>` and `&` escaped.
pub fn push_text(out: &mut String, text: &str) {
    html_escape::encode_text_to_string(text, out);
}

/// Append a single character with `<`, `>` and `&` escaped.
pub fn push_char(out: &mut String, c: char) {
    let mut buf = [0u8; 4];
    push_text(out, c.encode_utf8(&mut buf));
}

/// Append a value destined for a double-quoted attribute.
pub fn push_attribute_value(out: &mut String, value: &str) {
    html_escape::encode_double_quoted_attribute_to_string(value, out);
}
