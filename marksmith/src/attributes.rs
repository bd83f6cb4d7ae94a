use std::fmt;

use crate::html;

/// `id`, `class` and `style` attached to a block's opening tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeSet {
    pub id: Option<String>,
    pub class: Option<String>,
    pub style: Option<String>,
}

impl AttributeSet {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.class.is_none() && self.style.is_none()
    }
}

/// Renders as the attribute list of an opening tag, each entry prefixed by a
/// space, e.g. ` id="intro" class="lead"`.
impl fmt::Display for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = [
            ("id", &self.id),
            ("class", &self.class),
            ("style", &self.style),
        ];
        for (name, value) in entries {
            if let Some(value) = value {
                let mut escaped = String::new();
                html::push_attribute_value(&mut escaped, value);
                write!(f, " {}=\"{}\"", name, escaped)?;
            }
        }
        Ok(())
    }
}

/// Result of scanning for attribute tokens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extracted {
    pub attributes: AttributeSet,
    /// Content offset after the tokens and the separating space.
    pub content_start: usize,
}

/// Scan `line` for `^id^`, `$class$` and `{style}` tokens, in that order,
/// starting at `start`. Unterminated tokens are left alone.
pub fn extract(line: &str, start: usize) -> Extracted {
    let mut attributes = AttributeSet::default();
    let mut pos = start;

    if let Some((value, end)) = delimited(line, pos, '^', '^') {
        attributes.id = Some(value.to_string());
        pos = end;
    }
    if let Some((value, end)) = delimited(line, pos, '$', '$') {
        // `$name$[` opens an inline custom span instead
        if !line[end..].starts_with('[') {
            attributes.class = Some(value.to_string());
            pos = end;
        }
    }
    if let Some((value, end)) = delimited(line, pos, '{', '}') {
        attributes.style = Some(value.to_string());
        pos = end;
    }

    Extracted {
        attributes,
        content_start: skip_separator(line, pos),
    }
}

/// Consume the single space separating a marker or token from the content.
/// Nothing is consumed at offset 0, and a run of spaces is kept intact so it
/// can still become an em space.
pub fn skip_separator(line: &str, pos: usize) -> usize {
    let rest = line.as_bytes().get(pos..).unwrap_or_default();
    if pos > 0 && rest.first() == Some(&b' ') && rest.get(1) != Some(&b' ') {
        pos + 1
    } else {
        pos
    }
}

/// `open value close` at `pos`; returns the value and the offset after `close`.
fn delimited(line: &str, pos: usize, open: char, close: char) -> Option<(&str, usize)> {
    let rest = line.get(pos..)?.strip_prefix(open)?;
    let len = rest.find(close)?;
    let value_start = pos + open.len_utf8();
    Some((&rest[..len], value_start + len + close.len_utf8()))
}
