//! `imgbatch size` – resolve a preset or custom size locally.

use anyhow::Result;
use imgbatch_core::size;

pub fn run_size(preset: Option<&str>, custom: Option<&str>) -> Result<i32> {
    match size::resolve_size(preset, custom) {
        Ok(spec) => {
            println!("{}", spec);
            Ok(0)
        }
        Err(e) => {
            eprintln!("{}", e);
            Ok(1)
        }
    }
}
