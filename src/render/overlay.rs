// src/render/overlay.rs

use crate::config::OverlaySettings;
use crate::data_analysis::lattice::{LatticeSample, LatticeSampler};

/// Text panel contents for one frame.
///
/// Levels are listed in the order they appear on screen, four readings per
/// level in corner order, so the text lines up with the rendered block.
pub fn format_overlay(
    sample: &LatticeSample,
    sampler: &LatticeSampler,
    settings: &OverlaySettings,
) -> String {
    let date = sample.timestamp.format("%Y-%m-%d");
    let time = match &settings.static_time {
        Some(label) => label.clone(),
        None => sample.timestamp.format("%H:%M:%S").to_string(),
    };

    let mut text = format!(
        "{}\n\nHive: {}\n\nDate: {}\n\nTime: {}\n\nFrame: {}\n\nTemperatures:\n(Celsius)\n",
        settings.title, settings.hive_name, date, time, sample.row
    );
    for level in sampler.screen_levels() {
        let [a, b, c, d] = sample.levels[level];
        text.push_str(&format!("\n{:.2} {:.2} {:.2} {:.2}\n", a, b, c, d));
    }
    text.truncate(text.trim_end().len());
    text
}


// src/render/overlay.rs
