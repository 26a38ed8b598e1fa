//! Status-bar output block.

use serde::Serialize;

/// One JSON block consumed by the status bar.
///
/// Waybar's `custom` module reads one of these per line from stdout and
/// renders `text` inline with `tooltip` on hover. `class` selects CSS
/// styling ("normal" or "error").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBlock {
    /// Inline text, may contain pango markup
    pub text: String,
    /// Hover tooltip, newline-separated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    /// CSS class hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

impl StatusBlock {
    /// Creates a block with text only.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tooltip: None,
            class: None,
        }
    }

    /// Creates a block with text and tooltip.
    #[must_use]
    pub fn with_tooltip(text: impl Into<String>, tooltip: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tooltip: Some(tooltip.into()),
            class: None,
        }
    }

    /// Creates an error-styled block.
    #[must_use]
    pub fn error(text: impl Into<String>, tooltip: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tooltip: Some(tooltip.into()),
            class: Some("error".to_string()),
        }
    }

    /// Marks the block with the "normal" class.
    #[must_use]
    pub fn normal(mut self) -> Self {
        self.class = Some("normal".to_string());
        self
    }

    /// Serializes the block to a single JSON line.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
