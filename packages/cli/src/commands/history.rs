use crate::workbench::Workbench;
use anyhow::{anyhow, Result};
use colored::Colorize;

/// Revert the last change to the document
pub fn undo(cwd: &str) -> Result<()> {
    let bench = Workbench::open(cwd)?;
    let mut session = bench.load_session()?;

    let step = session.undo_description().unwrap_or("last change").to_string();
    if !session.undo() {
        return Err(anyhow!("Nothing to undo"));
    }
    bench.save_session(&session)?;

    println!("  {} Undid: {}", "✓".green(), step);
    Ok(())
}

/// Re-apply the last undone change
pub fn redo(cwd: &str) -> Result<()> {
    let bench = Workbench::open(cwd)?;
    let mut session = bench.load_session()?;

    let step = session.redo_description().unwrap_or("last change").to_string();
    if !session.redo() {
        return Err(anyhow!("Nothing to redo"));
    }
    bench.save_session(&session)?;

    println!("  {} Redid: {}", "✓".green(), step);
    Ok(())
}
