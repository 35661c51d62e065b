//! CLI command handlers. Each command is in its own file.

mod completions;
mod generate;
mod presets;
mod run;
mod size;

pub use completions::{run_completions, run_man};
pub use generate::run_generate;
pub use presets::run_presets;
pub use run::run_batch_file;
pub use size::run_size;
