use crate::workbench::Workbench;
use anyhow::Result;
use colored::Colorize;

/// Forget the current document, draft and report
pub fn reset(cwd: &str) -> Result<()> {
    let bench = Workbench::open(cwd)?;
    bench.clear()?;

    println!("  {} Session cleared", "✓".green());
    Ok(())
}
