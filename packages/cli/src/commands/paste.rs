use super::read_input;
use crate::workbench::Workbench;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use loe_editor::{default_document, EditSession, Value};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct PasteArgs {
    /// File holding the client email (reads stdin when omitted or `-`)
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Replace an existing document
    #[arg(short, long)]
    pub force: bool,
}

/// Extract a document from pasted text
pub async fn paste(args: PasteArgs, cwd: &str) -> Result<()> {
    let text = read_input(args.file.as_deref())?;
    if text.trim().is_empty() {
        return Err(anyhow!("Nothing to extract: the pasted text is empty"));
    }

    let bench = Workbench::open(cwd)?;
    let client = bench.api_client()?;

    println!("{}", "📥 Extracting fields...".bright_blue().bold());
    let document = client.ingest(&text, &bench.config.loe_type).await?;

    let session = EditSession::new(bench.document_key(), document);
    bench.save_session(&session)?;
    bench.save_output(None)?;

    print_summary(session.document());
    Ok(())
}

/// Start from the empty template
pub fn new(args: NewArgs, cwd: &str) -> Result<()> {
    let bench = Workbench::open(cwd)?;

    if bench.has_document()? && !args.force {
        println!("{} A document already exists", "⚠️".yellow());
        println!("Use --force to replace it, or `loe reset` to start over");
        return Ok(());
    }

    let session = EditSession::new(bench.document_key(), default_document(&bench.config.loe_type));
    bench.save_session(&session)?;
    bench.save_output(None)?;

    print_summary(session.document());
    Ok(())
}

fn print_summary(document: &Value) {
    let fields = document.as_object().map(|map| map.len()).unwrap_or(0);
    let filled = document
        .as_object()
        .map(|map| map.values().filter(|v| is_filled(v)).count())
        .unwrap_or(0);

    println!(
        "  {} Document ready: {} fields, {} filled in",
        "✓".green(),
        fields,
        filled
    );
    println!();
    println!("Next: {} to review, {} to edit", "loe show".bold(), "loe set".bold());
}

fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => map.values().any(is_filled),
        Value::Bool(_) | Value::Number(_) => true,
    }
}
