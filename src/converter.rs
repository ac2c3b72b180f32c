use crate::cli::Cli;
use crate::config::Config;
use crate::docx_file::{self, DocxData};
use crate::pipeline::{Pipeline, Report};
use crate::styles::{self, StyleIndex};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const OUTPUT_PREFIX: &str = "styled_";

pub fn convert(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    let output_path = resolve_output_path(cli)?;
    let book_id = match cli.book_id {
        Some(ref id) => id.clone(),
        None => book_id_from_path(&cli.input)?,
    };

    let report = style_document(&cli.input, &cli.template, &output_path, &config, &book_id)?;

    eprintln!(
        "Styled {} ({}) to {}",
        cli.input.display(),
        report,
        output_path.display()
    );

    Ok(())
}

/// Style one manuscript against one template and write the result.
/// Nothing is written unless every stage succeeds.
pub fn style_document(
    input: &Path,
    template_path: &Path,
    output: &Path,
    config: &Config,
    book_id: &str,
) -> Result<Report> {
    let pipeline = Pipeline::new(config, book_id)?;

    let manuscript = DocxData::open(input)?;
    let template = DocxData::open(template_path)?;
    let mut docx = manuscript.parse()?;
    let template_docx = template.parse()?;

    let copied = styles::merge_template(&mut docx.styles, &template_docx.styles);
    info!(
        copied,
        known = StyleIndex::from_styles(&docx.styles).len(),
        "template styles merged"
    );

    let report = pipeline
        .run(&mut docx)
        .with_context(|| format!("Failed to style {}", input.display()))?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    docx_file::write(&mut docx, output)?;

    Ok(report)
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match cli.config {
        Some(ref path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(ref format) = cli.layout_format {
        config.layout_format = format.clone();
    }
    Ok(config)
}

fn resolve_output_path(cli: &Cli) -> Result<PathBuf> {
    if let Some(ref path) = cli.output {
        return Ok(path.clone());
    }

    let name = cli
        .input
        .file_name()
        .context("Input file has no name")?
        .to_string_lossy();

    Ok(cli.input.with_file_name(format!("{}{}", OUTPUT_PREFIX, name)))
}

/// The file name up to the first underscore; the stem when there is none.
fn book_id_from_path(path: &Path) -> Result<String> {
    let name = path
        .file_name()
        .context("Input file has no name")?
        .to_string_lossy();

    match name.split_once('_') {
        Some((prefix, _)) => Ok(prefix.to_string()),
        None => Ok(path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| name.to_string())),
    }
}
