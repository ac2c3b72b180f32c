//! Normal-text styling for body paragraphs and inline code detection.

use crate::error::Result;
use crate::figures::CaptionMatcher;
use crate::paragraph::{self, Layout, Span};
use crate::pipeline::{paragraphs_mut, Context};
use docx_rust::document::{BodyContent, Paragraph};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// `call()`, `camelCase` and `snake_case` tokens.
static CODE_TERM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\w+\(\)|\b[A-Za-z][a-z]+[A-Z]\w*\b|\b\w+_\w+\b").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    ChapterHeader,
    Heading,
    Caption,
    LayoutInfo,
    Indented,
    List,
    Body,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BodyStats {
    pub normal: usize,
    pub code_terms: usize,
}

fn kind(position: usize, para: &Paragraph, ctx: &Context, captions: Option<&CaptionMatcher>) -> Kind {
    if position < 2 {
        return Kind::ChapterHeader;
    }

    let name = ctx.style_name(para);
    if name.starts_with(ctx.styles.heading_prefix.as_str()) {
        Kind::Heading
    } else if captions.is_some_and(|c| c.is_caption(&paragraph::text(para))) {
        Kind::Caption
    } else if name == ctx.styles.layout_info {
        Kind::LayoutInfo
    } else if paragraph::has_left_indent(para) {
        Kind::Indented
    } else if name.starts_with(ctx.styles.list_prefix.as_str()) || paragraph::has_numbering(para) {
        Kind::List
    } else {
        Kind::Body
    }
}

/// Code-like tokens in the paragraph text, as spans styled `style_id`.
pub fn code_term_spans(layout: &Layout, style_id: &str) -> Vec<Span> {
    CODE_TERM
        .find_iter(&layout.text)
        .map(|m| m.range())
        .filter(|range| layout.can_split(range))
        .map(|range| Span::styled(range, style_id))
        .collect()
}

/// Put plain body paragraphs on the normal style and split inline code
/// into runs of their own.
pub fn classify(
    body: &mut [BodyContent],
    ctx: &Context,
    captions: Option<&CaptionMatcher>,
) -> Result<BodyStats> {
    let mut normal = ctx.slot(&ctx.styles.normal);
    let mut code = ctx.slot(&ctx.styles.inline_code);
    let mut stats = BodyStats::default();

    for (position, para) in paragraphs_mut(body).enumerate() {
        let kind = kind(position, para, ctx, captions);
        if kind != Kind::Body {
            debug!(position, ?kind, "left as is");
            continue;
        }

        paragraph::set_style(para, normal.id()?);
        stats.normal += 1;

        let layout = Layout::of(para);
        if !CODE_TERM.is_match(&layout.text) {
            continue;
        }
        let spans = code_term_spans(&layout, code.id()?);
        let applied = paragraph::restyle_spans(para, &spans);
        if applied > 0 {
            debug!(position, terms = applied, "inline code");
        }
        stats.code_terms += applied;
    }

    Ok(stats)
}
