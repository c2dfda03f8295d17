pub mod edit;
pub mod generate;
pub mod history;
pub mod init;
pub mod paste;
pub mod reset;
pub mod show;
pub mod text;

pub use edit::{append, remove, set, AppendArgs, RemoveArgs, SetArgs};
pub use generate::{export, generate, ExportArgs, GenerateArgs};
pub use history::{redo, undo};
pub use init::{init, InitArgs};
pub use paste::{new, paste, NewArgs, PasteArgs};
pub use reset::reset;
pub use show::{show, ShowArgs};
pub use text::{text, TextCommand};

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Read a file, or stdin when no file (or `-`) is given
pub(crate) fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}
