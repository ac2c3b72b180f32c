use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const DEFAULT_LAYOUT_FORMAT: &str = "{book}_{chapter}_{figure}";

/// Style names the pipeline reads and applies.
///
/// Names are display names as they appear in Word's style gallery, not the
/// style IDs stored in the XML. They must exist in the manuscript or the
/// template; nothing here creates styles.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleCatalogue {
    /// Generic heading name -> template heading name
    pub headings: BTreeMap<String, String>,
    pub chapter_number: String,
    pub chapter_title: String,
    pub normal: String,
    pub inline_code: String,
    pub layout_info: String,
    pub url: String,
    /// Generic character style Word puts on hyperlink runs
    pub hyperlink: String,
    /// Paragraphs whose style starts with this are treated as styled headings
    pub heading_prefix: String,
    /// Paragraphs whose style starts with this are treated as lists
    pub list_prefix: String,
}

impl StyleCatalogue {
    /// True for a template heading style, i.e. a value of the heading map.
    pub fn is_template_heading(&self, name: &str) -> bool {
        self.headings.values().any(|v| v == name)
    }
}

impl Default for StyleCatalogue {
    fn default() -> Self {
        let headings = (1..=6)
            .map(|level| {
                (
                    format!("Heading {}", level),
                    format!("HS - Heading_{} [PACKT]", level),
                )
            })
            .collect();

        Self {
            headings,
            chapter_number: "HS - ChapterNumber [PACKT]".to_string(),
            chapter_title: "HS - ChapterTitle [PACKT]".to_string(),
            normal: "P0 - Normal [PACKT]".to_string(),
            inline_code: "CS - InlineCode [PACKT]".to_string(),
            layout_info: "PF - LayoutInformation [PACKT]".to_string(),
            url: "CS - URL [PACKT]".to_string(),
            hyperlink: "Hyperlink".to_string(),
            heading_prefix: "HS".to_string(),
            list_prefix: "List".to_string(),
        }
    }
}

/// Everything a styling run needs besides the documents themselves.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Layout placeholder template with `{book}`, `{chapter}` and `{figure}`
    pub layout_format: String,
    pub styles: StyleCatalogue,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout_format: DEFAULT_LAYOUT_FORMAT.to_string(),
            styles: StyleCatalogue::default(),
        }
    }
}

impl Config {
    /// Load a TOML config. Keys left out keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_toml(raw: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}
