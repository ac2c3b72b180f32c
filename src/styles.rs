use crate::error::{Error, Result};
use docx_rust::styles::Styles;
use std::collections::HashMap;

/// Word writes built-in style names in lower case ("heading 1") and shows
/// them capitalised in the UI. Catalogue names use the UI spelling.
const LOWERCASE_BUILTINS: &[&str] = &["caption", "footer", "header", "title", "subtitle"];

/// Map a stored style name to the name Word displays.
pub fn ui_name(name: &str) -> String {
    let is_heading = name
        .strip_prefix("heading ")
        .is_some_and(|level| !level.is_empty() && level.chars().all(|c| c.is_ascii_digit()));

    if is_heading || LOWERCASE_BUILTINS.contains(&name) {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    } else {
        name.to_string()
    }
}

/// Two-way lookup between style IDs (stored in `w:pStyle`/`w:rStyle`) and
/// display names.
#[derive(Debug, Default)]
pub struct StyleIndex {
    names_by_id: HashMap<String, String>,
    ids_by_name: HashMap<String, String>,
}

impl StyleIndex {
    pub fn from_styles(styles: &Styles) -> Self {
        let mut index = Self::default();
        for style in &styles.styles {
            let name = style.name.as_ref().map(|n| n.value.as_ref());
            index.insert(style.style_id.as_ref(), name);
        }
        index
    }

    fn insert(&mut self, id: &str, name: Option<&str>) {
        let name = ui_name(name.unwrap_or(id));
        self.ids_by_name
            .entry(name.clone())
            .or_insert_with(|| id.to_string());
        self.names_by_id.insert(id.to_string(), name);
    }

    /// Display name for a style ID. Unknown IDs are returned as-is.
    pub fn name_of(&self, id: &str) -> String {
        self.names_by_id
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    /// Style ID to store for a display name. A known style ID passed in
    /// place of a name resolves to itself.
    pub fn resolve(&self, name: &str) -> Result<String> {
        if let Some(id) = self.ids_by_name.get(name) {
            return Ok(id.clone());
        }
        if self.names_by_id.contains_key(name) {
            return Ok(name.to_string());
        }
        Err(Error::MissingStyle {
            name: name.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.names_by_id.len()
    }

    #[cfg(test)]
    pub fn from_pairs<'p>(pairs: impl IntoIterator<Item = (&'p str, &'p str)>) -> Self {
        let mut index = Self::default();
        for (id, name) in pairs {
            index.insert(id, Some(name));
        }
        index
    }
}

/// Copy template styles whose ID the manuscript lacks. Manuscript
/// definitions always win. Returns the number of styles copied.
pub fn merge_template<'a>(target: &mut Styles<'a>, template: &Styles<'a>) -> usize {
    let mut copied = 0;
    for style in &template.styles {
        let exists = target
            .styles
            .iter()
            .any(|s| s.style_id.as_ref() == style.style_id.as_ref());
        if !exists {
            target.styles.push(style.clone());
            copied += 1;
        }
    }
    copied
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_names_get_ui_spelling() {
        assert_eq!(ui_name("heading 1"), "Heading 1");
        assert_eq!(ui_name("heading 12"), "Heading 12");
        assert_eq!(ui_name("caption"), "Caption");
        assert_eq!(ui_name("heading x"), "heading x");
        assert_eq!(ui_name("P0 - Normal [PACKT]"), "P0 - Normal [PACKT]");
        assert_eq!(ui_name("Normal"), "Normal");
    }

    #[test]
    fn resolves_names_to_ids_and_back() {
        let index = StyleIndex::from_pairs([
            ("Heading1", "heading 1"),
            ("P0NormalPACKT", "P0 - Normal [PACKT]"),
        ]);

        assert_eq!(index.name_of("Heading1"), "Heading 1");
        assert_eq!(index.resolve("Heading 1").unwrap(), "Heading1");
        assert_eq!(index.resolve("P0 - Normal [PACKT]").unwrap(), "P0NormalPACKT");
        assert_eq!(index.resolve("P0NormalPACKT").unwrap(), "P0NormalPACKT");
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn unknown_ids_fall_back_to_themselves() {
        let index = StyleIndex::default();
        assert_eq!(index.name_of("ListParagraph"), "ListParagraph");
    }

    #[test]
    fn missing_name_is_an_error() {
        let index = StyleIndex::from_pairs([("Normal", "Normal")]);
        let err = index.resolve("CS - InlineCode [PACKT]").unwrap_err();
        assert!(matches!(err, Error::MissingStyle { ref name } if name == "CS - InlineCode [PACKT]"));
    }

    #[test]
    fn first_id_wins_for_duplicate_names() {
        let index = StyleIndex::from_pairs([("A", "Shared"), ("B", "Shared")]);
        assert_eq!(index.resolve("Shared").unwrap(), "A");
    }
}
