//! Rendering of the accumulated unit list for plain and bar output.

use crate::keys::accumulator::KeyUnit;
use crate::keys::wpm::WpmStats;
use crate::models::StatusBlock;

/// Options controlling unit-list rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Latest unit on the right instead of the left
    pub rtl: bool,
    /// Color the newest unit by typing speed
    pub gauge: bool,
}

fn unit_plain(unit: &KeyUnit) -> String {
    if unit.count > 1 {
        format!("{}^{}", unit.combo, unit.count)
    } else {
        unit.combo.clone()
    }
}

fn unit_markup(unit: &KeyUnit) -> String {
    if unit.count > 1 {
        format!(
            "{}<sup><span weight=\"bold\" style=\"italic\">{}</span></sup>",
            unit.combo, unit.count
        )
    } else {
        unit.combo.clone()
    }
}

/// Splits the units into (newest, older) in display order.
fn split_newest<'a>(units: &'a [KeyUnit], rtl: bool) -> (Option<&'a KeyUnit>, Vec<&'a KeyUnit>) {
    if units.is_empty() {
        return (None, Vec::new());
    }
    if rtl {
        (units.first(), units.iter().skip(1).rev().collect())
    } else {
        (units.first(), units.iter().skip(1).collect())
    }
}

/// Plain-text rendering: newest unit first, older ones after.
#[must_use]
pub fn render_plain(units: &[KeyUnit], options: RenderOptions) -> String {
    let (newest, older) = split_newest(units, options.rtl);
    let mut parts = Vec::with_capacity(units.len());
    if let Some(unit) = newest {
        parts.push(unit_plain(unit));
    }
    parts.extend(older.iter().map(|u| unit_plain(u)));
    parts.join(" ")
}

/// Pango rendering: older units in one subscript run, the newest unit
/// bold and enlarged, optionally tinted by the gauge color.
#[must_use]
pub fn render_markup(
    units: &[KeyUnit],
    options: RenderOptions,
    gauge_color: Option<&str>,
) -> String {
    let (newest, older) = split_newest(units, options.rtl);
    let mut parts = Vec::new();

    if !older.is_empty() {
        let old_text: Vec<String> = older.iter().map(|u| unit_markup(u)).collect();
        parts.push(format!("<sub>{}</sub>", old_text.join(" ")));
    }

    if let Some(unit) = newest {
        let body = unit_markup(unit);
        match gauge_color.filter(|_| options.gauge) {
            Some(color) => parts.push(format!(
                "<span weight=\"bold\" size=\"x-large\" color=\"{color}\">{body}</span>"
            )),
            None => parts.push(format!(
                "<span weight=\"bold\" size=\"x-large\">{body}</span>"
            )),
        }
    }

    parts.join(" ")
}

/// Full status block for the key display.
///
/// With WPM tracking enabled an empty buffer still renders a single space
/// so the bar keeps a hover target for the statistics tooltip.
#[must_use]
pub fn keys_block(
    units: &[KeyUnit],
    options: RenderOptions,
    wpm: Option<&WpmStats>,
) -> StatusBlock {
    let tooltip = wpm.map(WpmStats::tooltip);

    let text = if units.is_empty() {
        if wpm.is_some() {
            " ".to_string()
        } else {
            String::new()
        }
    } else {
        let gauge_color = wpm.and_then(|stats| crate::keys::wpm::wpm_color(stats.current_wpm));
        render_markup(units, options, gauge_color.as_deref())
    };

    match tooltip {
        Some(tooltip) => StatusBlock::with_tooltip(text, tooltip),
        None => StatusBlock::text(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(specs: &[(&str, u32)]) -> Vec<KeyUnit> {
        specs
            .iter()
            .map(|(combo, count)| KeyUnit {
                combo: (*combo).to_string(),
                count: *count,
            })
            .collect()
    }

    #[test]
    fn test_plain_rendering_with_counts() {
        let list = units(&[("b", 1), ("a", 3)]);
        assert_eq!(render_plain(&list, RenderOptions::default()), "b a^3");
    }

    #[test]
    fn test_markup_puts_old_units_in_subscript() {
        let list = units(&[("c", 1), ("b", 1), ("a", 1)]);
        let markup = render_markup(&list, RenderOptions::default(), None);
        assert_eq!(
            markup,
            "<sub>b a</sub> <span weight=\"bold\" size=\"x-large\">c</span>"
        );
    }

    #[test]
    fn test_rtl_reverses_old_unit_order() {
        let list = units(&[("c", 1), ("b", 1), ("a", 1)]);
        let markup = render_markup(&list, RenderOptions { rtl: true, gauge: false }, None);
        assert_eq!(
            markup,
            "<sub>a b</sub> <span weight=\"bold\" size=\"x-large\">c</span>"
        );
    }

    #[test]
    fn test_gauge_color_applied_to_newest_only() {
        let list = units(&[("x", 2)]);
        let markup = render_markup(
            &list,
            RenderOptions { rtl: false, gauge: true },
            Some("#ff0000"),
        );
        assert!(markup.contains("color=\"#ff0000\""));
        assert!(markup.contains("<sup>"));
    }

    #[test]
    fn test_empty_buffer_keeps_hover_target_with_wpm() {
        use crate::keys::wpm::WpmTracker;
        use std::time::Duration;

        let tracker = WpmTracker::new(Duration::from_secs(2));
        let stats = tracker.stats();
        let block = keys_block(&[], RenderOptions::default(), Some(&stats));
        assert_eq!(block.text, " ");
        assert!(block.tooltip.unwrap().starts_with("Average WPM:"));

        let block = keys_block(&[], RenderOptions::default(), None);
        assert_eq!(block.text, "");
        assert!(block.tooltip.is_none());
    }
}
