//! Fuzzy matching between live tablet settings and stored presets.
//!
//! OpenTabletDriver does not report which preset is active, so the bar
//! infers it: every preset is scored against the current settings and the
//! best one is displayed. Scoring is weighted across three dimensions and
//! normalized to 0..=1; a weak best score falls back to name matching.

use crate::models::{Preset, TabletSettings};
use std::collections::HashSet;

/// Weight of output-mode equality.
const MODE_WEIGHT: f64 = 0.3;
/// Weight of express-key overlap; the main differentiator between presets.
const EXPRESS_WEIGHT: f64 = 0.5;
/// Weight of pen-button overlap; pen buttons tend to be similar across
/// presets, so this counts least.
const PEN_WEIGHT: f64 = 0.2;

/// Scores below this trigger the name-matching fallback.
const WEAK_SCORE: f64 = 0.5;

/// Jaccard overlap of two sets, defined as 1.0 when both are empty.
fn jaccard(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let overlap = a.intersection(b).count() as f64;
    let union = a.union(b).count() as f64;
    overlap / union
}

/// Computes the normalized match score (0..=1) of one preset against the
/// current settings.
///
/// The output-mode dimension only participates when both sides declare a
/// mode path; its weight is then part of the normalization denominator.
/// The binding dimensions always participate (two empty sets are a perfect
/// match, not an unknown).
#[must_use]
pub fn match_score(settings: &TabletSettings, preset: &Preset) -> f64 {
    let mut score = 0.0;
    let mut total_weight = 0.0;

    if let (Some(current_path), Some(preset_path)) = (
        settings.output_mode_path.as_deref(),
        preset.output_mode_path.as_deref(),
    ) {
        if current_path == preset_path {
            score += MODE_WEIGHT;
        }
        total_weight += MODE_WEIGHT;
    }

    let current_express: HashSet<&str> = settings.express_key_values().into_iter().collect();
    let preset_express: HashSet<&str> =
        preset.express_bindings.iter().map(String::as_str).collect();
    score += EXPRESS_WEIGHT * jaccard(&current_express, &preset_express);
    total_weight += EXPRESS_WEIGHT;

    let current_pen: HashSet<&str> = settings.pen_button_values().into_iter().collect();
    let preset_pen: HashSet<&str> = preset.pen_bindings.iter().map(String::as_str).collect();
    score += PEN_WEIGHT * jaccard(&current_pen, &preset_pen);
    total_weight += PEN_WEIGHT;

    if total_weight > 0.0 {
        score / total_weight
    } else {
        0.0
    }
}

/// Keyword pairs for the fallback: (substring of the mode name, substring
/// of the preset name).
const MODE_KEYWORDS: &[(&str, &str)] = &[
    ("artist", "artist"),
    ("absolute", "abs"),
    ("relative", "rel"),
];

/// Picks the preset that best matches the current settings.
///
/// Ties keep the first preset seen. When even the best score is weak the
/// preset names are compared against the output-mode name, first as a
/// plain substring, then via mode keywords. The result is never "unknown":
/// with no usable signal at all the first preset wins. `None` only for an
/// empty preset list.
#[must_use]
pub fn find_matching_preset<'a>(
    settings: &TabletSettings,
    presets: &'a [Preset],
) -> Option<&'a Preset> {
    let first = presets.first()?;

    let mut best = first;
    let mut best_score = 0.0;
    for preset in presets {
        let score = match_score(settings, preset);
        if score > best_score {
            best_score = score;
            best = preset;
        }
    }

    if best_score >= WEAK_SCORE {
        return Some(best);
    }

    if let Some(mode) = settings.output_mode.as_deref() {
        let mode = mode.to_lowercase();

        if let Some(by_name) = presets
            .iter()
            .find(|p| mode.contains(&p.name.to_lowercase()))
        {
            return Some(by_name);
        }

        for (mode_kw, preset_kw) in MODE_KEYWORDS {
            if !mode.contains(mode_kw) {
                continue;
            }
            if let Some(by_keyword) = presets
                .iter()
                .find(|p| p.name.to_lowercase().contains(preset_kw))
            {
                return Some(by_keyword);
            }
        }
    }

    Some(best)
}
