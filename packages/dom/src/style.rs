//! Inline style declarations (`style="color: red; padding: 4px"`)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered list of CSS declarations.
///
/// Order is preserved so that rewriting a `style` attribute only changes the
/// property that was touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleDeclarations {
    declarations: Vec<(String, String)>,
}

impl StyleDeclarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the body of a `style` attribute.
    ///
    /// Semicolons inside parentheses or quotes (`url(data:...;base64,...)`)
    /// do not split declarations. Declarations without a colon are dropped.
    pub fn parse(source: &str) -> Self {
        let mut declarations = Vec::new();

        for chunk in split_declarations(source) {
            let Some((name, value)) = chunk.split_once(':') else {
                continue;
            };
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                continue;
            }
            upsert(&mut declarations, name, value.to_string());
        }

        Self { declarations }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        let property = property.to_ascii_lowercase();
        self.declarations
            .iter()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Set a property. An empty value removes it, mirroring `style.setProperty`.
    pub fn set(&mut self, property: &str, value: &str) {
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim();
        if value.is_empty() {
            self.remove(&property);
            return;
        }
        upsert(&mut self.declarations, property, value.to_string());
    }

    pub fn remove(&mut self, property: &str) -> Option<String> {
        let property = property.to_ascii_lowercase();
        let pos = self.declarations.iter().position(|(name, _)| *name == property)?;
        Some(self.declarations.remove(pos).1)
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn clear(&mut self) {
        self.declarations.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Layer `other` on top of `self`; properties in `other` win.
    pub fn merged_with(&self, other: &StyleDeclarations) -> StyleDeclarations {
        let mut merged = self.clone();
        for (name, value) in other.iter() {
            merged.set(name, value);
        }
        merged
    }
}

impl fmt::Display for StyleDeclarations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.declarations.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}: {};", name, value)?;
        }
        Ok(())
    }
}

fn upsert(declarations: &mut Vec<(String, String)>, name: String, value: String) {
    match declarations.iter_mut().find(|(n, _)| *n == name) {
        Some(existing) => existing.1 = value,
        None => declarations.push((name, value)),
    }
}

fn split_declarations(source: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, ch) in source.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                chunks.push(&source[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    chunks.push(&source[start..]);
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_format() {
        let style = StyleDeclarations::parse("color: red;padding : 4px 8px;");
        assert_eq!(style.get("color"), Some("red"));
        assert_eq!(style.get("PADDING"), Some("4px 8px"));
        assert_eq!(style.to_string(), "color: red; padding: 4px 8px;");
    }

    #[test]
    fn test_semicolon_inside_url() {
        let style = StyleDeclarations::parse("background: url(data:image/png;base64,AAAA); color: blue");
        assert_eq!(style.len(), 2);
        assert_eq!(style.get("background"), Some("url(data:image/png;base64,AAAA)"));
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut style = StyleDeclarations::parse("color: red; margin: 0");
        style.set("color", "blue");
        assert_eq!(style.to_string(), "color: blue; margin: 0;");
    }

    #[test]
    fn test_empty_value_removes() {
        let mut style = StyleDeclarations::parse("color: red; margin: 0");
        style.set("color", "");
        assert_eq!(style.get("color"), None);
        assert_eq!(style.len(), 1);
    }

    #[test]
    fn test_merged_with() {
        let base = StyleDeclarations::parse("color: red; opacity: 1");
        let overlay = StyleDeclarations::parse("opacity: 0.5");
        let merged = base.merged_with(&overlay);
        assert_eq!(merged.get("opacity"), Some("0.5"));
        assert_eq!(merged.get("color"), Some("red"));
    }
}
