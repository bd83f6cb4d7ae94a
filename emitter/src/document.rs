//! Whole-document rendering: the HTML skeleton around the body that the
//! block stack machine produces.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use marksmith::source::LineSource;
use marksmith::{MarkupError, Parser, TemplateBlock};

use crate::error::EmitError;
use crate::options::{RenderOptions, StylesheetMode};

const DOCTYPE: &str = "<!DOCTYPE html>\n";
const TITLE_PREFIX: &str = "@@ ";
const HEAD_OPEN: &str = "@$";
const HEAD_CLOSE: &str = "$@";

/// Render a full document from `input` into `output`.
///
/// Returns the diagnostics collected along the way; only I/O failures are
/// errors.
pub fn render_document<R: BufRead>(
    input: R,
    output: &mut dyn Write,
    options: &RenderOptions,
    file_id: usize,
) -> Result<Vec<MarkupError>, EmitError> {
    let mut lines = LineSource::new(input);
    let mut parser = Parser::new(file_id);

    emit(output, DOCTYPE)?;
    emit(output, &parser.enter_template(TemplateBlock::Html))?;
    emit(output, &parser.enter_template(TemplateBlock::Head))?;

    let title = match lines.peek_line().map_err(EmitError::Read)? {
        Some(line) => line.content().strip_prefix(TITLE_PREFIX).map(str::to_owned),
        None => None,
    };
    if title.is_some() {
        lines.next_line().map_err(EmitError::Read)?;
    }
    let title = title.unwrap_or_else(|| options.default_title.clone());
    tracing::debug!(title = %title, "document title");
    emit(
        output,
        &parser.indented(&format!("<title>{}</title>", html_escape::encode_text(&title))),
    )?;

    for path in &options.stylesheets {
        write_stylesheet(&mut parser, output, path, options.stylesheet_mode)?;
    }

    let head_block = lines
        .peek_line()
        .map_err(EmitError::Read)?
        .is_some_and(|line| line.content() == HEAD_OPEN);
    if head_block {
        write_head_block(&mut parser, &mut lines, output)?;
    }

    emit(output, &parser.leave_template())?;
    emit(output, &parser.enter_template(TemplateBlock::Body))?;

    while let Some(line) = lines.next_line().map_err(EmitError::Read)? {
        let lookahead = lines.peek_line().map_err(EmitError::Read)?;
        let html = parser.process_line(&line, lookahead);
        emit(output, &html)?;
    }

    emit(output, &parser.drain())?;
    output.flush().map_err(EmitError::Write)?;

    let diagnostics = parser.take_diagnostics();
    tracing::debug!(diagnostics = diagnostics.len(), "document rendered");
    Ok(diagnostics)
}

/// Render an in-memory document, returning the HTML as a string.
pub fn render_str(
    source: &str,
    options: &RenderOptions,
) -> Result<(String, Vec<MarkupError>), EmitError> {
    let mut output = Vec::new();
    let diagnostics = render_document(source.as_bytes(), &mut output, options, 0)?;
    let html = String::from_utf8(output)
        .map_err(|err| EmitError::Write(io::Error::new(io::ErrorKind::InvalidData, err)))?;
    Ok((html, diagnostics))
}

fn emit(output: &mut dyn Write, text: &str) -> Result<(), EmitError> {
    output.write_all(text.as_bytes()).map_err(EmitError::Write)
}

/// Like [`Parser::indented`], without trailing whitespace on empty lines.
fn emit_indented(parser: &Parser, output: &mut dyn Write, text: &str) -> Result<(), EmitError> {
    if text.is_empty() {
        emit(output, "\n")
    } else {
        emit(output, &parser.indented(text))
    }
}

fn write_stylesheet(
    parser: &mut Parser,
    output: &mut dyn Write,
    path: &Path,
    mode: StylesheetMode,
) -> Result<(), EmitError> {
    match mode {
        StylesheetMode::Link => {
            let href = path.display().to_string();
            let link = format!(
                r#"<link rel="stylesheet" href="{}" type="text/css" />"#,
                html_escape::encode_double_quoted_attribute(&href)
            );
            emit(output, &parser.indented(&link))?;
            tracing::info!(path = %path.display(), "linked stylesheet");
        }
        StylesheetMode::Embed => match fs::read_to_string(path) {
            Ok(css) => {
                emit(output, &parser.enter_template(TemplateBlock::Style))?;
                for line in css.lines() {
                    emit_indented(parser, output, line)?;
                }
                emit(output, &parser.leave_template())?;
                tracing::info!(path = %path.display(), "embedded stylesheet");
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "skipping unreadable stylesheet");
            }
        },
    }
    Ok(())
}

/// Copy the lines between `@$` and `$@` into the head as they are.
fn write_head_block<R: BufRead>(
    parser: &mut Parser,
    lines: &mut LineSource<R>,
    output: &mut dyn Write,
) -> Result<(), EmitError> {
    let Some(opener) = lines.next_line().map_err(EmitError::Read)? else {
        return Ok(());
    };
    loop {
        match lines.next_line().map_err(EmitError::Read)? {
            Some(line) if line.content() == HEAD_CLOSE => return Ok(()),
            Some(line) => emit_indented(parser, output, line.content())?,
            None => {
                let warning = MarkupError::warning(
                    "head block is never closed",
                    opener.number,
                    opener.span(0, HEAD_OPEN.len()),
                    parser.file_id(),
                )
                .with_note("end the block with a line containing only `$@`");
                parser.report(warning);
                return Ok(());
            }
        }
    }
}
