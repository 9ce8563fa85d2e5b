//! Generator seam
//!
//! Markup generation is an external collaborator: one opaque call from a
//! prompt (and optional image) to markup or an error.

use crate::error::GenerationError;
use livepage_history::StyleChoices;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationInput {
    pub prompt: String,
    /// Reference to the source image (path or URL)
    pub image: Option<String>,
    pub style: StyleChoices,
}

impl GenerationInput {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_style(mut self, style: StyleChoices) -> Self {
        self.style = style;
        self
    }
}

pub trait Generator {
    fn generate(&mut self, input: &GenerationInput) -> Result<String, GenerationError>;
}

impl<F> Generator for F
where
    F: FnMut(&GenerationInput) -> Result<String, GenerationError>,
{
    fn generate(&mut self, input: &GenerationInput) -> Result<String, GenerationError> {
        self(input)
    }
}

/// Placeholder replaced with the (escaped) prompt
pub const PROMPT_PLACEHOLDER: &str = "{{prompt}}";

/// Returns a fixed template. Stands in for a real generator in the CLI and
/// in tests.
#[derive(Debug, Clone)]
pub struct StaticGenerator {
    template: String,
}

impl StaticGenerator {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

impl Generator for StaticGenerator {
    fn generate(&mut self, input: &GenerationInput) -> Result<String, GenerationError> {
        if self.template.trim().is_empty() {
            return Err(GenerationError::Empty);
        }
        Ok(self
            .template
            .replace(PROMPT_PLACEHOLDER, &escape_text(&input.prompt)))
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
