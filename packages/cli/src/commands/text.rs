use super::read_input;
use crate::workbench::Workbench;
use anyhow::{anyhow, Result};
use clap::Subcommand;
use colored::Colorize;
use loe_editor::{EditorError, TextDiagnostic};
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
pub enum TextCommand {
    /// Print the JSON text view (an unapplied draft if there is one)
    Show,

    /// Replace the document with edited JSON text
    Apply {
        /// File with the new text; reads stdin when piped, otherwise
        /// retries the saved draft
        file: Option<PathBuf>,
    },

    /// Throw away an unapplied draft
    Discard,
}

pub fn text(command: TextCommand, cwd: &str) -> Result<()> {
    let bench = Workbench::open(cwd)?;
    let mut session = bench.load_session()?;

    match command {
        TextCommand::Show => {
            match bench.load_draft()? {
                Some(draft) => {
                    eprintln!(
                        "{} Unapplied draft. Run `loe text apply` or `loe text discard`",
                        "⚠️".yellow()
                    );
                    println!("{}", draft);
                }
                None => println!("{}", session.text().text()),
            }
            Ok(())
        }

        TextCommand::Apply { file } => {
            let text = match file {
                Some(path) => read_input(Some(&path))?,
                None if !std::io::stdin().is_terminal() => read_input(None)?,
                None => bench
                    .load_draft()?
                    .ok_or_else(|| anyhow!("No text given and no draft to retry"))?,
            };

            session.edit_text(text.clone());
            match session.apply_text() {
                Ok(_) => {
                    bench.save_session(&session)?;
                    println!("  {} Document replaced from text", "✓".green());
                    Ok(())
                }
                Err(EditorError::MalformedText(diagnostic)) => {
                    bench.save_draft(&text)?;
                    print_diagnostic(&text, &diagnostic);
                    Err(anyhow!(
                        "Text not applied; the document is unchanged and your text was kept as a draft"
                    ))
                }
                Err(other) => Err(other.into()),
            }
        }

        TextCommand::Discard => {
            // Saving the unchanged document drops the draft
            bench.save_session(&session)?;
            println!("  {} Draft discarded", "✓".green());
            Ok(())
        }
    }
}

fn print_diagnostic(text: &str, diagnostic: &TextDiagnostic) {
    eprintln!(
        "{} line {}, column {}: {}",
        "✗".red(),
        diagnostic.line,
        diagnostic.column,
        diagnostic.message
    );

    let Some(source) = diagnostic
        .line
        .checked_sub(1)
        .and_then(|index| text.lines().nth(index))
    else {
        return;
    };

    let gutter = format!("{} | ", diagnostic.line);
    eprintln!("{}{}", gutter.dimmed(), source);
    eprintln!(
        "{}{}",
        " ".repeat(gutter.len() + diagnostic.column.saturating_sub(1)),
        "^".red().bold()
    );
}
