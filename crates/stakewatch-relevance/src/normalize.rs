//! Markup to plain text.
//!
//! Filings arrive as HTML, SGML-wrapped submissions, or plain text, and are
//! frequently malformed. Markup goes through a real HTML parser (`html2text`)
//! in raw mode, so nothing is wrapped or decorated and attribute values never
//! reach the text. This pass never fails: when rendering errors out, the raw
//! input is searched as-is.
//!
//! - `<script>`/`<style>` elements are dropped with their content. An
//!   unclosed one runs to the end of the document.
//! - Block-level elements end up on their own lines, so words in adjacent
//!   blocks do not fuse.
//! - Non-breaking spaces become plain spaces so phrase patterns match
//!   across them.
//!
//! Whitespace runs are otherwise preserved; snippets collapse them later.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Render width. Raw mode does not wrap, so this only sizes rules (`<hr>`).
const RENDER_WIDTH: usize = 80;

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b.*?(?:</script\s*>|\z)").unwrap());
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b.*?(?:</style\s*>|\z)").unwrap());

/// Extract searchable plain text from a raw document.
pub fn to_plain_text(raw: &str) -> Cow<'_, str> {
    if !raw.contains('<') && !raw.contains('&') {
        return Cow::Borrowed(raw);
    }

    let html = SCRIPT_RE.replace_all(raw, "");
    let html = STYLE_RE.replace_all(&html, "");
    let text = match html2text::config::plain_no_decorate()
        .raw_mode(true)
        .no_table_borders()
        .link_footnotes(false)
        .string_from_read(html.as_bytes(), RENDER_WIDTH)
    {
        Ok(text) => text,
        Err(e) => {
            debug!(error = %e, "markup rendering failed; using raw text");
            html.into_owned()
        }
    };
    Cow::Owned(text.replace('\u{a0}', " "))
}

/// Collapse every whitespace run to one space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
