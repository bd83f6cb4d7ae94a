/// `[name](url)` found at the start of a slice.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkToken<'a> {
    pub name: &'a str,
    pub url: &'a str,
    /// Bytes consumed, from `[` through `)`.
    pub len: usize,
}

/// `$selector$[` found at the start of a slice.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanToken<'a> {
    pub selector: &'a str,
    /// Bytes consumed, from the first `$` through `[`.
    pub len: usize,
}

/// Match `[name](url)` at the start of `text`. The name ends at the first
/// `]`, which must be followed directly by `(`. The url must not be empty.
pub fn link(text: &str) -> Option<LinkToken<'_>> {
    let rest = text.strip_prefix('[')?;
    let name_end = rest.find(']')?;
    let after = rest[name_end + 1..].strip_prefix('(')?;
    let url_end = after.find(')')?;
    let url = &after[..url_end];
    if url.is_empty() {
        return None;
    }
    Some(LinkToken {
        name: &rest[..name_end],
        url,
        len: 1 + name_end + 2 + url_end + 1,
    })
}

/// Match the opening of a custom span, `$selector$[`, at the start of `text`.
///
/// The bracket group is accepted only if the rest of the line closes at least
/// as many unescaped brackets as it opens, counting the `[` of the token.
pub fn custom_span(text: &str) -> Option<SpanToken<'_>> {
    let rest = text.strip_prefix('$')?;
    let selector_end = rest.find('$')?;
    let body = rest[selector_end + 1..].strip_prefix('[')?;

    let mut opened = 1usize;
    let mut closed = 0usize;
    let mut prev = '[';
    for c in body.chars() {
        match c {
            '[' if prev != '\\' => opened += 1,
            ']' if prev != '\\' => closed += 1,
            _ => {}
        }
        prev = c;
    }
    if closed < opened {
        return None;
    }

    Some(SpanToken {
        selector: &rest[..selector_end],
        len: 1 + selector_end + 1 + 1,
    })
}
