//! `imgbatch presets` – list aspect-ratio presets.

use anyhow::Result;
use imgbatch_core::size::{SizePreset, SizeSpec};

pub fn run_presets() -> Result<i32> {
    println!("{:<8} {:<12} {}", "PRESET", "SIZE", "PIXELS");
    for preset in SizePreset::ALL {
        let spec = SizeSpec::from(preset);
        println!(
            "{:<8} {:<12} {}",
            preset.tag(),
            preset.canonical_size(),
            spec.total_pixels()
        );
    }
    Ok(0)
}
