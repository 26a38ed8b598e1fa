//! Status-bar formatting for the tablet display.
//!
//! Assembles the compact bar text and the hover tooltip out of the current
//! settings, the matched preset and the preset list. Markup is pango, as
//! consumed by waybar's `custom` module.

use crate::models::{StatusBlock, TabletSettings};

/// Icon shown for each output mode family.
#[must_use]
pub fn mode_icon(output_mode: Option<&str>) -> &'static str {
    let Some(mode) = output_mode else {
        return "\u{f03d8}";
    };
    let mode = mode.to_lowercase();
    if mode.contains("artist") {
        "\u{f03d8}"
    } else if mode.contains("absolute") {
        "\u{ebf8}"
    } else if mode.contains("relative") {
        "\u{f030c}"
    } else {
        "\u{f03d8}"
    }
}

/// Extracts a short human label from a raw binding string.
///
/// `Key Binding: { Key: LeftControl }` becomes `Ctrl`,
/// `Pen Binding: { Button: Pen Button 1 }` becomes `Btn1`.
#[must_use]
pub fn clean_binding(binding: &str) -> String {
    if let Some(key) = payload(binding, "Key: ") {
        return key.replace("Left", "").replace("Control", "Ctrl").trim().to_string();
    }
    if let Some(keys) = payload(binding, "Keys: ") {
        return keys.replace("Control", "Ctrl").trim().to_string();
    }
    if let Some(button) = payload(binding, "Button: ") {
        return button.replace("Pen Button ", "Btn").trim().to_string();
    }
    binding.trim().to_string()
}

/// The text between `marker` and the closing ` }`.
fn payload<'a>(binding: &'a str, marker: &str) -> Option<&'a str> {
    let (_, rest) = binding.split_once(marker)?;
    Some(rest.split(" }").next().unwrap_or(rest))
}

/// True when the tip binding string is worth showing.
fn tip_is_displayable(tip: &str) -> bool {
    tip != "None"
        && tip != "Error"
        && ["Key:", "Button:", "Keys:"].iter().any(|kw| tip.contains(kw))
}

/// Tooltip lines describing the tip, pen-button and express-key bindings.
#[must_use]
pub fn binding_lines(settings: &TabletSettings) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(tip) = settings.tip_binding.as_deref().filter(|t| tip_is_displayable(t)) {
        lines.push("<b>Tip:</b>".to_string());
        if let Some((action, threshold)) = tip.rsplit_once('@') {
            lines.push(format!("      {} (at {threshold})", clean_binding(action)));
        } else {
            lines.push(format!("      {}", clean_binding(tip)));
        }
    }

    if !settings.pen_bindings.is_empty() {
        lines.push("<b>Pen Buttons:</b>".to_string());
        for binding in &settings.pen_bindings {
            lines.push(format!("      \u{2022} {}", clean_binding(binding)));
        }
    }

    if !settings.express_bindings.is_empty() {
        lines.push("<b>Express Keys:</b>".to_string());
        for binding in &settings.express_bindings {
            lines.push(format!("      \u{2022} {}", clean_binding(binding)));
        }
    }

    lines
}

/// Builds the full status block for a successful poll.
#[must_use]
pub fn tablet_block(
    settings: &TabletSettings,
    current_preset: &str,
    presets: &[String],
) -> StatusBlock {
    let output_mode = settings.output_mode.as_deref().unwrap_or("Unknown");
    let tablet_name = settings.tablet_name.as_deref().unwrap_or("Unknown Tablet");
    let icon = mode_icon(settings.output_mode.as_deref());

    let text = format!("<b>{icon} <sup><small>{current_preset}</small></sup></b>");

    let mut tooltip = vec![
        format!("<b><big>{current_preset}</big></b>"),
        String::new(),
        format!("Tablet: {tablet_name}"),
        format!("Mode: {output_mode}"),
        String::new(),
    ];

    let bindings = binding_lines(settings);
    if !bindings.is_empty() {
        tooltip.extend(bindings);
        tooltip.push(String::new());
    }

    tooltip.push("Presets:".to_string());
    for preset in presets {
        if preset == current_preset {
            tooltip.push(format!("  <b>{preset}</b>"));
        } else {
            tooltip.push(format!("  {preset}"));
        }
    }
    tooltip.push(String::new());
    tooltip.push("Click to cycle forward".to_string());

    StatusBlock::with_tooltip(text, tooltip.join("\n")).normal()
}

/// Error block for an empty preset directory.
#[must_use]
pub fn no_presets_block() -> StatusBlock {
    StatusBlock::error(
        "<b>\u{f03d8} No Presets</b>",
        "No OpenTabletDriver presets found",
    )
}

/// Error block for a failed settings poll.
#[must_use]
pub fn poll_failed_block(last_error: Option<&str>) -> StatusBlock {
    let mut tooltip = "Failed to get tablet settings after multiple retries".to_string();
    if let Some(error) = last_error {
        tooltip.push_str("\n\nError: ");
        tooltip.push_str(error);
    }
    StatusBlock::error("<b>\u{f051f} Error</b>", tooltip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_settings;

    #[test]
    fn test_clean_binding_variants() {
        assert_eq!(clean_binding("Key Binding: { Key: LeftControl }"), "Ctrl");
        assert_eq!(
            clean_binding("Multi-Key Binding: { Keys: LeftControl+Z }"),
            "Ctrl+Z"
        );
        assert_eq!(clean_binding("Pen Binding: { Button: Pen Button 1 }"), "Btn1");
        assert_eq!(clean_binding("  odd input  "), "odd input");
    }

    #[test]
    fn test_tip_threshold_split() {
        let settings = parse_settings(
            "--- Profile for 'T' ---\nTip Binding: Key Binding: { Key: Left Click }@0.85\n",
        );
        let lines = binding_lines(&settings);
        assert_eq!(lines[0], "<b>Tip:</b>");
        assert!(lines[1].contains("(at 0.85)"));
    }

    #[test]
    fn test_tip_none_is_hidden() {
        let settings = parse_settings("--- Profile for 'T' ---\nTip Binding: None\n");
        assert!(binding_lines(&settings).is_empty());
    }

    #[test]
    fn test_block_marks_current_preset_bold() {
        let settings = parse_settings(
            "--- Profile for 'Wacom' ---\nOutput Mode: 'Absolute Mode'\n",
        );
        let presets = vec!["art".to_string(), "osu".to_string()];
        let block = tablet_block(&settings, "osu", &presets);
        let tooltip = block.tooltip.unwrap();
        assert!(tooltip.contains("  <b>osu</b>"));
        assert!(tooltip.contains("\n  art\n"));
        assert!(tooltip.contains("Tablet: Wacom"));
        assert_eq!(block.class.as_deref(), Some("normal"));
    }

    #[test]
    fn test_poll_failure_carries_last_error() {
        let block = poll_failed_block(Some("timeout after 5 attempts"));
        assert!(block.tooltip.unwrap().contains("timeout after 5 attempts"));
        assert_eq!(block.class.as_deref(), Some("error"));
    }
}
