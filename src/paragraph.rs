//! Paragraph-level reads and rewrites over the `docx-rust` model.
//!
//! Paragraph text is the concatenation of every run's text, hyperlink text
//! included, with tabs as `\t` and breaks as `\n`. Byte offsets into that
//! text address the same positions in [`restyle_spans`], which splits runs
//! at span boundaries instead of rewriting the paragraph from plain text.
//! Drawings, fields and any other run content stay where they were.

use docx_rust::document::{Paragraph, ParagraphContent, Run, RunContent, Text, TextSpace};
use docx_rust::formatting::{CharacterProperty, CharacterStyleId, ParagraphProperty, ParagraphStyleId};
use std::ops::Range;

/// A byte range of paragraph text that should become its own run.
///
/// With `style` set the new run gets that character style ID; without it
/// the run keeps the formatting of the run it was cut from.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub range: Range<usize>,
    pub style: Option<String>,
}

impl Span {
    pub fn styled(range: Range<usize>, style_id: &str) -> Self {
        Self {
            range,
            style: Some(style_id.to_string()),
        }
    }

    pub fn plain(range: Range<usize>) -> Self {
        Self { range, style: None }
    }
}

/// Paragraph text plus the ranges that cannot be split.
pub struct Layout {
    pub text: String,
    /// Hyperlink text, kept whole
    opaque: Vec<Range<usize>>,
}

impl Layout {
    pub fn of(para: &Paragraph) -> Self {
        let mut text = String::new();
        let mut opaque = Vec::new();

        for pc in &para.content {
            match pc {
                ParagraphContent::Run(run) => push_run_text(&mut text, run),
                ParagraphContent::Link(link) => {
                    let start = text.len();
                    if let Some(ref run) = link.content {
                        push_run_text(&mut text, run);
                    }
                    if text.len() > start {
                        opaque.push(start..text.len());
                    }
                }
                _ => {}
            }
        }

        Self { text, opaque }
    }

    /// False when the range cuts into hyperlink text.
    pub fn can_split(&self, range: &Range<usize>) -> bool {
        !self
            .opaque
            .iter()
            .any(|o| o.start < range.end && range.start < o.end)
    }
}

fn push_run_text(out: &mut String, run: &Run) {
    for rc in &run.content {
        out.push_str(content_text(rc));
    }
}

fn content_text<'r>(rc: &'r RunContent) -> &'r str {
    match rc {
        RunContent::Text(t) => &t.text,
        RunContent::Tab(_) => "\t",
        RunContent::Break(_) => "\n",
        _ => "",
    }
}

pub fn text(para: &Paragraph) -> String {
    Layout::of(para).text
}

pub fn style_id<'p>(para: &'p Paragraph) -> Option<&'p str> {
    para.property
        .as_ref()?
        .style_id
        .as_ref()
        .map(|s| &*s.value)
}

pub fn set_style(para: &mut Paragraph, style_id: &str) {
    let prop = para.property.get_or_insert_with(ParagraphProperty::default);
    prop.style_id = Some(ParagraphStyleId {
        value: style_id.to_string().into(),
    });
}

/// Direct left indent only; indentation inherited from the style or the
/// numbering definition is not considered. A zero indent counts as none.
pub fn has_left_indent(para: &Paragraph) -> bool {
    para.property
        .as_ref()
        .and_then(|p| p.indent.as_ref())
        .and_then(|ind| ind.left)
        .is_some_and(|left| left != 0)
}

pub fn has_numbering(para: &Paragraph) -> bool {
    para.property
        .as_ref()
        .is_some_and(|p| p.numbering.is_some())
}

pub fn run_style_id<'r>(run: &'r Run) -> Option<&'r str> {
    run.property
        .as_ref()?
        .style_id
        .as_ref()
        .map(|s| &*s.value)
}

pub fn set_run_style(run: &mut Run, style_id: &str) {
    let prop = run.property.get_or_insert_with(CharacterProperty::default);
    prop.style_id = Some(CharacterStyleId {
        value: style_id.to_string().into(),
    });
}

/// Visit every run of the paragraph, direct or inside a hyperlink.
pub fn for_each_run_mut<'a>(para: &mut Paragraph<'a>, mut f: impl FnMut(&mut Run<'a>)) {
    for pc in &mut para.content {
        match pc {
            ParagraphContent::Run(run) => f(run),
            ParagraphContent::Link(link) => {
                if let Some(ref mut run) = link.content {
                    f(run);
                }
            }
            _ => {}
        }
    }
}

/// Text content that keeps leading and trailing whitespace when written.
fn text_content<'a>(text: String) -> RunContent<'a> {
    if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
        RunContent::Text(Text::from((text, TextSpace::Preserve)))
    } else {
        RunContent::Text(Text::from(text))
    }
}

/// A single-run paragraph with the given paragraph style ID.
pub fn new_paragraph<'a>(text: String, style_id: &str) -> Paragraph<'a> {
    let mut run = Run::default();
    run.content.push(text_content(text));

    let mut para = Paragraph::default();
    set_style(&mut para, style_id);
    para.content.push(ParagraphContent::Run(run));
    para
}

/// Split the paragraph's runs so every span becomes its own run.
///
/// Spans are byte ranges of [`Layout::text`], sorted and non-overlapping.
/// Empty spans and spans that cut into hyperlink text are ignored. Returns
/// the number of spans applied; zero leaves the paragraph untouched.
pub fn restyle_spans(para: &mut Paragraph, spans: &[Span]) -> usize {
    let layout = Layout::of(para);
    let spans: Vec<&Span> = spans
        .iter()
        .filter(|s| !s.range.is_empty() && layout.can_split(&s.range))
        .collect();
    if spans.is_empty() {
        return 0;
    }

    let mut offset = 0;
    for pc in std::mem::take(&mut para.content) {
        match pc {
            ParagraphContent::Run(run) => {
                let mut splitter = RunSplitter::new(run, &spans);
                offset = splitter.split(offset);
                para.content
                    .extend(splitter.finish().into_iter().map(ParagraphContent::Run));
            }
            ParagraphContent::Link(link) => {
                if let Some(ref run) = link.content {
                    offset += run.content.iter().map(|rc| content_text(rc).len()).sum::<usize>();
                }
                para.content.push(ParagraphContent::Link(link));
            }
            other => para.content.push(other),
        }
    }

    spans.len()
}

/// Rebuilds one run as a sequence of runs, one per stretch of content that
/// falls in the same span (or outside all spans).
struct RunSplitter<'a, 's> {
    template: Run<'a>,
    content: Vec<RunContent<'a>>,
    spans: &'s [&'s Span],
    out: Vec<Run<'a>>,
    current: Option<(Option<usize>, Run<'a>)>,
}

impl<'a, 's> RunSplitter<'a, 's> {
    fn new(mut run: Run<'a>, spans: &'s [&'s Span]) -> Self {
        let content = std::mem::take(&mut run.content);
        Self {
            template: run,
            content,
            spans,
            out: Vec::new(),
            current: None,
        }
    }

    /// Consume the run's content starting at paragraph offset `offset` and
    /// return the offset just past it.
    fn split(&mut self, mut offset: usize) -> usize {
        for rc in std::mem::take(&mut self.content) {
            match rc {
                RunContent::Text(t) => {
                    let text = t.text.to_string();
                    let end = offset + text.len();
                    let mut cursor = offset;
                    while cursor < end {
                        let (piece_end, key) = self.piece_at(cursor, end);
                        let piece = text[cursor - offset..piece_end - offset].to_string();
                        self.push(key, text_content(piece));
                        cursor = piece_end;
                    }
                    offset = end;
                }
                other => {
                    let len = content_text(&other).len();
                    // Zero-width content at a span boundary belongs to neither side.
                    let key = if len == 0 {
                        self.spans
                            .iter()
                            .position(|s| s.range.start < offset && offset < s.range.end)
                    } else {
                        self.span_at(offset)
                    };
                    self.push(key, other);
                    offset += len;
                }
            }
        }
        offset
    }

    fn span_at(&self, offset: usize) -> Option<usize> {
        self.spans.iter().position(|s| s.range.contains(&offset))
    }

    /// End of the piece starting at `cursor` and the span it belongs to.
    fn piece_at(&self, cursor: usize, end: usize) -> (usize, Option<usize>) {
        match self.span_at(cursor) {
            Some(i) => (self.spans[i].range.end.min(end), Some(i)),
            None => {
                let next_start = self
                    .spans
                    .iter()
                    .map(|s| s.range.start)
                    .filter(|&start| start > cursor)
                    .min()
                    .unwrap_or(end);
                (next_start.min(end), None)
            }
        }
    }

    fn push(&mut self, key: Option<usize>, rc: RunContent<'a>) {
        let same = matches!(self.current, Some((k, _)) if k == key);
        if !same {
            self.flush();
            self.current = Some((key, self.run_for(key)));
        }
        if let Some((_, ref mut run)) = self.current {
            run.content.push(rc);
        }
    }

    fn run_for(&self, key: Option<usize>) -> Run<'a> {
        let mut run = self.template.clone();
        if let Some(style) = key.and_then(|i| self.spans[i].style.as_deref()) {
            set_run_style(&mut run, style);
        }
        run
    }

    fn flush(&mut self) {
        if let Some((_, run)) = self.current.take() {
            self.out.push(run);
        }
    }

    fn finish(mut self) -> Vec<Run<'a>> {
        self.flush();
        if self.out.is_empty() {
            // Keep content-less runs as they were.
            self.out.push(self.template);
        }
        self.out
    }
}
