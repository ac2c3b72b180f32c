//! Figure captions and the layout placeholders that follow them.
//!
//! A caption reads `Figure <chapter>.<n>: ...` where `<chapter>` is the
//! text of the document's first paragraph. Every caption gets a
//! placeholder paragraph right after it, numbered in document order.

use crate::error::{Error, Result};
use crate::paragraph;
use crate::pipeline::{paragraphs, Context};
use docx_rust::document::BodyContent;
use regex::Regex;
use tracing::debug;

pub struct CaptionMatcher {
    chapter: String,
    pattern: Regex,
}

impl CaptionMatcher {
    /// `None` when the chapter text is blank.
    pub fn new(chapter: &str) -> Option<Self> {
        let chapter = chapter.trim();
        if chapter.is_empty() {
            return None;
        }
        let pattern = Regex::new(&format!(r"^Figure {}\.\d+:", regex::escape(chapter))).ok()?;
        Some(Self {
            chapter: chapter.to_string(),
            pattern,
        })
    }

    pub fn chapter(&self) -> &str {
        &self.chapter
    }

    pub fn is_caption(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Trimmed text of the first paragraph.
pub fn chapter_number(body: &[BodyContent]) -> Option<String> {
    paragraphs(body)
        .next()
        .map(|p| paragraph::text(p).trim().to_string())
}

/// Running figure number within one document.
#[derive(Debug)]
pub struct FigureCounter {
    next: u32,
}

impl Default for FigureCounter {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl FigureCounter {
    pub fn advance(&mut self) -> u32 {
        let current = self.next;
        self.next += 1;
        current
    }
}

/// Left-pad with zeros to `width` characters, keeping a leading sign in
/// front. Longer input is returned unchanged.
pub fn zfill(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        return s.to_string();
    }
    let zeros = "0".repeat(width - len);
    match s.strip_prefix(['+', '-']) {
        Some(rest) => format!("{}{}{}", &s[..1], zeros, rest),
        None => format!("{}{}", zeros, s),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Part {
    Literal(String),
    Book,
    Chapter,
    Figure,
}

/// Placeholder text template, e.g. `{book}_{chapter}_{figure}`.
///
/// `{chapter}` and `{figure}` render zero-padded to two digits.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutFormat {
    parts: Vec<Part>,
}

impl LayoutFormat {
    pub fn parse(format: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidLayoutFormat {
            format: format.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut chars = format.chars();

        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(c) => name.push(c),
                            None => return Err(invalid("unclosed '{'")),
                        }
                    }
                    let part = match name.as_str() {
                        "book" => Part::Book,
                        "chapter" => Part::Chapter,
                        "figure" => Part::Figure,
                        other => return Err(invalid(&format!("unknown placeholder '{{{}}}'", other))),
                    };
                    if !literal.is_empty() {
                        parts.push(Part::Literal(std::mem::take(&mut literal)));
                    }
                    parts.push(part);
                }
                '}' => return Err(invalid("unmatched '}'")),
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            parts.push(Part::Literal(literal));
        }

        if !parts.contains(&Part::Figure) {
            return Err(invalid("missing '{figure}'"));
        }
        Ok(Self { parts })
    }

    pub fn render(&self, book: &str, chapter: &str, figure: u32) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Literal(s) => out.push_str(s),
                Part::Book => out.push_str(book),
                Part::Chapter => out.push_str(&zfill(chapter, 2)),
                Part::Figure => out.push_str(&format!("{:02}", figure)),
            }
        }
        out
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FigureStats {
    pub captions: usize,
    pub inserted: usize,
    pub renumbered: usize,
}

/// Insert a layout paragraph after every caption of the chapter.
///
/// A caption already followed by a layout paragraph gets that paragraph's
/// text rewritten to the current number instead of a second placeholder.
pub fn annotate(
    body: &mut Vec<BodyContent>,
    ctx: &Context,
    captions: &CaptionMatcher,
    layout: &LayoutFormat,
    book_id: &str,
) -> Result<FigureStats> {
    let mut layout_style = ctx.slot(&ctx.styles.layout_info);
    let mut counter = FigureCounter::default();
    let mut stats = FigureStats::default();

    let mut i = 0;
    while i < body.len() {
        let is_caption = matches!(&body[i], BodyContent::Paragraph(p) if captions.is_caption(&paragraph::text(p)));
        if !is_caption {
            i += 1;
            continue;
        }

        let figure = counter.advance();
        stats.captions += 1;

        let text = layout.render(book_id, captions.chapter(), figure);
        let existing = match body.get(i + 1) {
            Some(BodyContent::Paragraph(next)) if ctx.style_name(next) == ctx.styles.layout_info => {
                Some(paragraph::text(next))
            }
            _ => None,
        };
        match existing {
            Some(current) if current == text => {}
            Some(_) => {
                debug!(figure, placeholder = %text, "renumbered layout placeholder");
                let para = paragraph::new_paragraph(text, layout_style.id()?);
                body[i + 1] = BodyContent::Paragraph(para);
                stats.renumbered += 1;
            }
            None => {
                debug!(figure, placeholder = %text, "layout placeholder");
                let para = paragraph::new_paragraph(text, layout_style.id()?);
                body.insert(i + 1, BodyContent::Paragraph(para));
                stats.inserted += 1;
            }
        }
        i += 2;
    }

    Ok(stats)
}
