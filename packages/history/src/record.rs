//! History records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Presentation options chosen for a generation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleChoices {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

impl StyleChoices {
    pub fn is_empty(&self) -> bool {
        self.theme.is_none() && self.accent_color.is_none() && self.font.is_none()
    }
}

/// One successful generation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub markup: String,
    /// Reference to the source image (path or URL)
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub style: StyleChoices,
}

impl HistoryRecord {
    pub fn new(
        markup: impl Into<String>,
        prompt: impl Into<String>,
        image: Option<String>,
        style: StyleChoices,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            markup: markup.into(),
            image,
            prompt: prompt.into(),
            style,
        }
    }

    /// First line of the prompt, shortened for listings
    pub fn summary(&self, max_chars: usize) -> String {
        let line = self.prompt.lines().next().unwrap_or("").trim();
        if line.chars().count() <= max_chars {
            return line.to_string();
        }
        let mut out: String = line.chars().take(max_chars.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_layout() {
        let record = HistoryRecord::new("<p>x</p>", "a landing page", Some("shot.png".into()), StyleChoices::default());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["markup"], "<p>x</p>");
        assert_eq!(value["image"], "shot.png");
        assert!(value["createdAt"].is_string());
        assert_eq!(value["style"], serde_json::json!({}));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = HistoryRecord::new("", "", None, StyleChoices::default());
        let b = HistoryRecord::new("", "", None, StyleChoices::default());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_summary() {
        let record = HistoryRecord::new("", "Pricing page with three tiers\nmore", None, StyleChoices::default());
        assert_eq!(record.summary(100), "Pricing page with three tiers");
        assert_eq!(record.summary(8), "Pricing…");
    }
}
