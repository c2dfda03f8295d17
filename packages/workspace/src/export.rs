//! Markdown rendering of a generated report.

use crate::generation::GenerationArtifact;
use regex::RegexBuilder;
use std::path::Path;

pub const DEFAULT_EXPORT_NAME: &str = "LoE.md";

pub const SUMMARY_HEADING: &str = "PROJECT SUMMARY";
pub const TASKS_HEADING: &str = "PROJECT TASKS";

/// Drop a leading `heading` line (any case, surrounding blanks allowed).
/// The generator tends to repeat the section title inside the text.
pub fn strip_heading(text: &str, heading: &str) -> String {
    let pattern = format!(r"^\s*{}\s*\n", regex::escape(heading));
    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => re.replace(text, "").into_owned(),
        Err(_) => text.to_string(),
    }
}

/// Full report as markdown, used for both copy and download
pub fn build_markdown(artifact: &GenerationArtifact) -> String {
    let summary = strip_heading(&artifact.summary, SUMMARY_HEADING);
    let tasks = strip_heading(&artifact.tasks, TASKS_HEADING);

    let mut out = format!("# Project Summary\n\n{}\n\n# Project Tasks\n\n{}\n", summary, tasks);

    if !artifact.open_questions.is_empty() {
        out.push_str("\n# Open Questions\n\n");
        for question in &artifact.open_questions {
            out.push_str("- ");
            out.push_str(question);
            out.push('\n');
        }
    }

    out
}

pub fn write_markdown(artifact: &GenerationArtifact, path: &Path) -> std::io::Result<()> {
    std::fs::write(path, build_markdown(artifact))?;
    tracing::info!("Exported report to {}", path.display());
    Ok(())
}
