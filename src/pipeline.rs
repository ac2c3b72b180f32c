//! The styling pipeline: one document, one pass per stage, in this order:
//!
//! 1. heading styles mapped to the template's
//! 2. chapter number and title forced on the first two paragraphs
//! 3. body paragraphs set to normal text, inline code split out
//! 4. layout placeholders inserted after figure captions
//! 5. hyperlinks and raw URLs restyled
//!
//! Only body-level paragraphs take part. Tables and other block content
//! pass through untouched.

use crate::body;
use crate::config::{Config, StyleCatalogue};
use crate::error::Result;
use crate::figures::{self, CaptionMatcher, LayoutFormat};
use crate::headings;
use crate::paragraph;
use crate::styles::StyleIndex;
use crate::urls;
use docx_rust::document::{BodyContent, Paragraph, Run};
use docx_rust::Docx;
use std::fmt;
use tracing::{info, warn};

/// Style of a paragraph without `w:pStyle`.
const DEFAULT_PARAGRAPH_STYLE: &str = "Normal";

/// What the stages see of the configuration and the document's styles.
pub struct Context<'c> {
    pub styles: &'c StyleCatalogue,
    pub index: &'c StyleIndex,
}

impl<'c> Context<'c> {
    /// Display name of the paragraph's style.
    pub fn style_name(&self, para: &Paragraph) -> String {
        paragraph::style_id(para)
            .map(|id| self.index.name_of(id))
            .unwrap_or_else(|| DEFAULT_PARAGRAPH_STYLE.to_string())
    }

    pub fn run_style_name(&self, run: &Run) -> Option<String> {
        paragraph::run_style_id(run).map(|id| self.index.name_of(id))
    }

    /// A catalogue style resolved on first use, so styles a document never
    /// needs are never required.
    pub fn slot(&self, name: &'c str) -> StyleSlot<'c> {
        StyleSlot {
            name,
            index: self.index,
            id: None,
        }
    }
}

pub struct StyleSlot<'c> {
    name: &'c str,
    index: &'c StyleIndex,
    id: Option<String>,
}

impl StyleSlot<'_> {
    pub fn id(&mut self) -> Result<&str> {
        if self.id.is_none() {
            self.id = Some(self.index.resolve(self.name)?);
        }
        Ok(self.id.as_deref().unwrap_or_default())
    }
}

/// Body-level paragraphs in document order.
pub fn paragraphs_mut<'b, 'a>(
    body: &'b mut [BodyContent<'a>],
) -> impl Iterator<Item = &'b mut Paragraph<'a>> {
    body.iter_mut().filter_map(|content| match content {
        BodyContent::Paragraph(para) => Some(para),
        _ => None,
    })
}

pub fn paragraphs<'b, 'a>(body: &'b [BodyContent<'a>]) -> impl Iterator<Item = &'b Paragraph<'a>> {
    body.iter().filter_map(|content| match content {
        BodyContent::Paragraph(para) => Some(para),
        _ => None,
    })
}

/// Counts of what each stage changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub headings: usize,
    pub chapter_header: usize,
    pub normal: usize,
    pub code_terms: usize,
    pub captions: usize,
    pub layout_inserted: usize,
    pub hyperlinks: usize,
    pub urls: usize,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} headings, {} body paragraphs, {} code terms, {} figures ({} placeholders added), {} links",
            self.headings,
            self.normal,
            self.code_terms,
            self.captions,
            self.layout_inserted,
            self.hyperlinks + self.urls,
        )
    }
}

pub struct Pipeline<'c> {
    config: &'c Config,
    layout: LayoutFormat,
    book_id: String,
}

impl<'c> Pipeline<'c> {
    pub fn new(config: &'c Config, book_id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            config,
            layout: LayoutFormat::parse(&config.layout_format)?,
            book_id: book_id.into(),
        })
    }

    pub fn run(&self, docx: &mut Docx) -> Result<Report> {
        let index = StyleIndex::from_styles(&docx.styles);
        self.run_body(&mut docx.document.body.content, &index)
    }

    pub fn run_body(&self, body: &mut Vec<BodyContent>, index: &StyleIndex) -> Result<Report> {
        let ctx = Context {
            styles: &self.config.styles,
            index,
        };
        let mut report = Report::default();

        // Read before any stage touches the first paragraph.
        let captions = figures::chapter_number(body).and_then(|c| CaptionMatcher::new(&c));
        if captions.is_none() {
            warn!("first paragraph holds no chapter number; figure captions will not be detected");
        }

        report.headings = headings::map_headings(body, &ctx)?;
        report.chapter_header = headings::fix_chapter_header(body, &ctx)?;
        info!(
            headings = report.headings,
            chapter_header = report.chapter_header,
            "headings styled"
        );

        let stats = body::classify(body, &ctx, captions.as_ref())?;
        report.normal = stats.normal;
        report.code_terms = stats.code_terms;
        info!(normal = stats.normal, code_terms = stats.code_terms, "body text styled");

        if let Some(ref captions) = captions {
            let stats = figures::annotate(body, &ctx, captions, &self.layout, &self.book_id)?;
            report.captions = stats.captions;
            report.layout_inserted = stats.inserted;
            info!(
                chapter = captions.chapter(),
                captions = stats.captions,
                inserted = stats.inserted,
                renumbered = stats.renumbered,
                "figures annotated"
            );
        }

        let stats = urls::annotate(body, &ctx)?;
        report.hyperlinks = stats.hyperlinks;
        report.urls = stats.urls;
        info!(hyperlinks = stats.hyperlinks, urls = stats.urls, "links styled");

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::paragraph::tests::{indented, para, run, runs_of};
    use crate::paragraph::{style_id, text};

    fn index() -> StyleIndex {
        StyleIndex::from_pairs([
            ("Normal", "Normal"),
            ("Heading1", "heading 1"),
            ("Heading2", "heading 2"),
            ("ListBullet", "List Bullet"),
            ("Hyperlink", "Hyperlink"),
            ("HSHeading1PACKT", "HS - Heading_1 [PACKT]"),
            ("HSHeading2PACKT", "HS - Heading_2 [PACKT]"),
            ("HSChapterNumberPACKT", "HS - ChapterNumber [PACKT]"),
            ("HSChapterTitlePACKT", "HS - ChapterTitle [PACKT]"),
            ("P0NormalPACKT", "P0 - Normal [PACKT]"),
            ("CSInlineCodePACKT", "CS - InlineCode [PACKT]"),
            ("PFLayoutInformationPACKT", "PF - LayoutInformation [PACKT]"),
            ("CSURLPACKT", "CS - URL [PACKT]"),
        ])
    }

    fn body_of<'a>(paras: Vec<Paragraph<'a>>) -> Vec<BodyContent<'a>> {
        paras.into_iter().map(BodyContent::Paragraph).collect()
    }

    fn styles_of(body: &[BodyContent]) -> Vec<Option<String>> {
        paragraphs(body)
            .map(|p| style_id(p).map(str::to_string))
            .collect()
    }

    fn texts_of(body: &[BodyContent]) -> Vec<String> {
        paragraphs(body).map(text).collect()
    }

    #[test]
    fn styles_a_small_chapter() {
        let config = Config::default();
        let pipeline = Pipeline::new(&config, "BK01").unwrap();
        let mut body = body_of(vec![
            para(None, vec![run("3", None)]),
            para(None, vec![run("Working with Files", None)]),
            para(Some("Heading1"), vec![run("Opening files", None)]),
            para(None, vec![run("Use open() to read.", None)]),
            para(None, vec![run("Figure 3.1: The file dialog", None)]),
            para(Some("ListBullet"), vec![run("first_item", None)]),
            para(None, vec![run("Figure 3.2: Saving", None)]),
            para(None, vec![run("See https://example.com/page) for details", None)]),
        ]);

        let report = pipeline.run_body(&mut body, &index()).unwrap();

        assert_eq!(
            texts_of(&body),
            vec![
                "3",
                "Working with Files",
                "Opening files",
                "Use open() to read.",
                "Figure 3.1: The file dialog",
                "BK01_03_01",
                "first_item",
                "Figure 3.2: Saving",
                "BK01_03_02",
                "See https://example.com/page) for details",
            ]
        );
        let styles = styles_of(&body);
        assert_eq!(styles[0].as_deref(), Some("HSChapterNumberPACKT"));
        assert_eq!(styles[1].as_deref(), Some("HSChapterTitlePACKT"));
        assert_eq!(styles[2].as_deref(), Some("HSHeading1PACKT"));
        assert_eq!(styles[3].as_deref(), Some("P0NormalPACKT"));
        assert_eq!(styles[4], None);
        assert_eq!(styles[5].as_deref(), Some("PFLayoutInformationPACKT"));
        assert_eq!(styles[6].as_deref(), Some("ListBullet"));
        assert_eq!(styles[8].as_deref(), Some("PFLayoutInformationPACKT"));
        assert_eq!(styles[9].as_deref(), Some("P0NormalPACKT"));

        assert_eq!(
            report,
            Report {
                headings: 1,
                chapter_header: 2,
                normal: 2,
                code_terms: 1,
                captions: 2,
                layout_inserted: 2,
                hyperlinks: 0,
                urls: 1,
            }
        );

        let url_runs = runs_of(paragraphs(&body).nth(9).unwrap());
        assert_eq!(url_runs[1].0, "https://example.com/page");
        assert_eq!(url_runs[1].1.as_deref(), Some("CSURLPACKT"));
        assert_eq!(url_runs[2], (")".to_string(), None));
    }

    #[test]
    fn indented_and_list_only_document_keeps_everything_but_the_header() {
        let config = Config::default();
        let pipeline = Pipeline::new(&config, "BK01").unwrap();
        let mut body = body_of(vec![
            indented(para(None, vec![run("7", None)]), 720),
            para(Some("ListBullet"), vec![run("Title", None)]),
            indented(para(None, vec![run("quoted text", None)]), 720),
            para(Some("ListBullet"), vec![run("an item", None)]),
        ]);
        let before = texts_of(&body);

        pipeline.run_body(&mut body, &index()).unwrap();

        assert_eq!(texts_of(&body), before);
        assert_eq!(
            styles_of(&body),
            vec![
                Some("HSChapterNumberPACKT".to_string()),
                Some("HSChapterTitlePACKT".to_string()),
                None,
                Some("ListBullet".to_string()),
            ]
        );
    }

    #[test]
    fn second_pass_changes_nothing() {
        let config = Config::default();
        let pipeline = Pipeline::new(&config, "BK01").unwrap();
        let mut body = body_of(vec![
            para(None, vec![run("3", None)]),
            para(None, vec![run("Title", None)]),
            para(None, vec![run("Figure 3.1: A figure", None)]),
            para(None, vec![run("Call getValue() now", None)]),
        ]);

        pipeline.run_body(&mut body, &index()).unwrap();
        let texts = texts_of(&body);
        let styles = styles_of(&body);
        let report = pipeline.run_body(&mut body, &index()).unwrap();

        assert_eq!(texts_of(&body), texts);
        assert_eq!(styles_of(&body), styles);
        assert_eq!(report.layout_inserted, 0);
        assert_eq!(report.captions, 1);
    }

    #[test]
    fn missing_catalogue_style_fails_the_run() {
        let config = Config::default();
        let pipeline = Pipeline::new(&config, "BK01").unwrap();
        let index = StyleIndex::from_pairs([("Normal", "Normal")]);
        let mut body = body_of(vec![
            para(None, vec![run("1", None)]),
            para(None, vec![run("Intro", None)]),
        ]);

        let err = pipeline.run_body(&mut body, &index).unwrap_err();
        assert!(matches!(err, Error::MissingStyle { ref name } if name == "HS - ChapterNumber [PACKT]"));
    }

    #[test]
    fn empty_document_is_a_no_op() {
        let config = Config::default();
        let pipeline = Pipeline::new(&config, "BK01").unwrap();
        let mut body = Vec::new();
        let report = pipeline.run_body(&mut body, &index()).unwrap();
        assert_eq!(report, Report::default());
    }

    #[test]
    fn rejects_bad_layout_format() {
        let config = Config {
            layout_format: "{book}_{page}".to_string(),
            ..Config::default()
        };
        assert!(Pipeline::new(&config, "BK01").is_err());
    }

    #[test]
    fn report_summary_mentions_counts() {
        let report = Report {
            headings: 4,
            captions: 2,
            layout_inserted: 2,
            hyperlinks: 1,
            urls: 2,
            ..Report::default()
        };
        let line = report.to_string();
        assert!(line.contains("4 headings"), "got: {line}");
        assert!(line.contains("2 figures (2 placeholders added)"), "got: {line}");
        assert!(line.contains("3 links"), "got: {line}");
    }
}
