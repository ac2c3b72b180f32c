use crate::error::Result;
use crate::paragraph;
use crate::pipeline::{paragraphs_mut, Context};
use docx_rust::document::BodyContent;
use tracing::debug;

/// Move generic headings ("Heading 2") onto the template's heading styles.
/// Paragraphs already on a template heading are left alone.
pub fn map_headings(body: &mut [BodyContent], ctx: &Context) -> Result<usize> {
    let mut mapped = 0;

    for para in paragraphs_mut(body) {
        let name = ctx.style_name(para);
        if ctx.styles.is_template_heading(&name) {
            continue;
        }
        let Some(target) = ctx.styles.headings.get(&name) else {
            continue;
        };

        let id = ctx.index.resolve(target)?;
        paragraph::set_style(para, &id);
        debug!(from = %name, to = %target, "mapped heading");
        mapped += 1;
    }

    Ok(mapped)
}

/// Chapter number on the first paragraph, chapter title on the second,
/// whatever they were styled as before. Documents with fewer than two
/// paragraphs are left alone.
pub fn fix_chapter_header(body: &mut [BodyContent], ctx: &Context) -> Result<usize> {
    let targets = [&ctx.styles.chapter_number, &ctx.styles.chapter_title];
    if paragraphs_mut(body).count() < targets.len() {
        debug!("too few paragraphs for a chapter header");
        return Ok(0);
    }

    let mut fixed = 0;
    for (para, name) in paragraphs_mut(body).zip(targets) {
        let id = ctx.index.resolve(name)?;
        paragraph::set_style(para, &id);
        fixed += 1;
    }
    Ok(fixed)
}
