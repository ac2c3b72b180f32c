//! Hyperlink runs and raw URLs onto the URL character style.

use crate::error::Result;
use crate::paragraph::{self, Layout, Span};
use crate::pipeline::{paragraphs_mut, Context};
use docx_rust::document::BodyContent;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// A URL, optionally wrapped in brackets or parentheses. Group 2 is the URL.
static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([(\[])?(https?://[^\s()\[\]<>]+)([)\]])?").unwrap()
});

/// Sentence punctuation that ends prose, not the URL.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UrlStats {
    pub hyperlinks: usize,
    pub urls: usize,
}

/// Spans for every raw URL: the URL itself styled `style_id`, wrapping
/// punctuation split off unstyled.
pub fn url_spans(layout: &Layout, style_id: &str) -> Vec<Span> {
    let mut spans = Vec::new();

    for caps in URL.captures_iter(&layout.text) {
        let (Some(whole), Some(url)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        if !layout.can_split(&whole.range()) {
            continue;
        }

        let trimmed = url.as_str().trim_end_matches(TRAILING_PUNCTUATION);
        if trimmed.ends_with("://") {
            continue;
        }
        let url_end = url.start() + trimmed.len();

        if let Some(open) = caps.get(1) {
            spans.push(Span::plain(open.range()));
        }
        spans.push(Span::styled(url.start()..url_end, style_id));
        if url_end == url.end() {
            if let Some(close) = caps.get(3) {
                spans.push(Span::plain(close.range()));
            }
        }
    }

    spans
}

pub fn annotate(body: &mut [BodyContent], ctx: &Context) -> Result<UrlStats> {
    let mut url_style = ctx.slot(&ctx.styles.url);
    let mut stats = UrlStats::default();

    for (position, para) in paragraphs_mut(body).enumerate() {
        let mut hyperlink_runs = 0;
        paragraph::for_each_run_mut(para, |run| {
            if ctx.run_style_name(run).as_deref() == Some(ctx.styles.hyperlink.as_str()) {
                hyperlink_runs += 1;
            }
        });
        if hyperlink_runs > 0 {
            let id = url_style.id()?;
            paragraph::for_each_run_mut(para, |run| {
                if ctx.run_style_name(run).as_deref() == Some(ctx.styles.hyperlink.as_str()) {
                    paragraph::set_run_style(run, id);
                }
            });
            stats.hyperlinks += hyperlink_runs;
        }

        let layout = Layout::of(para);
        if !URL.is_match(&layout.text) {
            continue;
        }
        let spans = url_spans(&layout, url_style.id()?);
        let urls = spans.iter().filter(|s| s.style.is_some()).count();
        if paragraph::restyle_spans(para, &spans) > 0 {
            debug!(position, urls, "raw urls");
            stats.urls += urls;
        }
    }

    Ok(stats)
}
