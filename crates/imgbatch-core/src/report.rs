//! Batch report rendering (text summary or JSON).

use std::fmt::Write as _;
use std::str::FromStr;

use crate::job::BatchResult;
use crate::output_path::truncate_chars;

const RULE_WIDTH: usize = 60;
const PROMPT_PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("--format must be \"text\" or \"json\", got \"{other}\"")),
        }
    }
}

pub fn render(result: &BatchResult, format: ReportFormat) -> serde_json::Result<String> {
    match format {
        ReportFormat::Json => serde_json::to_string_pretty(result),
        ReportFormat::Text => Ok(render_text(result)),
    }
}

fn prompt_preview(prompt: &str) -> String {
    let head = truncate_chars(prompt, PROMPT_PREVIEW_CHARS);
    if head.len() < prompt.len() {
        format!("{}...", head)
    } else {
        head.to_string()
    }
}

pub fn render_text(result: &BatchResult) -> String {
    let banner = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "{banner}");
    let _ = writeln!(out, "Batch Processing Results");
    let _ = writeln!(out, "{banner}");
    let _ = writeln!(out, "Total: {}", result.total);
    let _ = writeln!(out, "Successful: {}", result.successful);
    let _ = writeln!(out, "Failed: {}", result.failed);
    let _ = writeln!(out);
    let _ = writeln!(out, "Details:");
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));

    for r in &result.results {
        let status = if r.success { "[SUCCESS]" } else { "[FAILED]" };
        let _ = writeln!(out, "{} {}", status, prompt_preview(&r.job.prompt));
        match (&r.filepath, &r.error) {
            (Some(path), _) if r.success => {
                let _ = writeln!(out, "  -> {}", path.display());
            }
            (_, Some(err)) if !r.success => {
                let _ = writeln!(out, "  Error: {}", err);
            }
            _ => {}
        }
    }

    out.push_str(&banner);
    out
}
