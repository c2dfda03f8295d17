mod commands;
mod config;
mod workbench;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    append, export, generate, init, new, paste, redo, remove, reset, set, show, text, undo,
    AppendArgs, ExportArgs, GenerateArgs, InitArgs, NewArgs, PasteArgs, RemoveArgs, SetArgs,
    ShowArgs, TextCommand,
};
use tracing_subscriber::EnvFilter;

/// LoE assistant - turn a client email into a level-of-effort report
#[derive(Parser, Debug)]
#[command(name = "loe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a loe.config.json in the current directory
    Init(InitArgs),

    /// Extract a document from a pasted client email
    Paste(PasteArgs),

    /// Start from an empty document and fill it in by hand
    New(NewArgs),

    /// Show the current document
    Show(ShowArgs),

    /// Change a field
    Set(SetArgs),

    /// Add an item to a list such as `sites`
    Append(AppendArgs),

    /// Remove an item from a list
    Remove(RemoveArgs),

    /// Revert the last change to the document
    Undo,

    /// Re-apply the last undone change
    Redo,

    /// Work with the document as JSON text
    Text {
        #[command(subcommand)]
        command: TextCommand,
    },

    /// Generate the report for the current document
    Generate(GenerateArgs),

    /// Save the last report as markdown
    Export(ExportArgs),

    /// Clear the session and start over
    Reset,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match std::env::current_dir() {
        Ok(dir) => {
            let cwd = dir.display().to_string();
            match cli.command {
                Command::Init(args) => init(args, &cwd),
                Command::Paste(args) => paste(args, &cwd).await,
                Command::New(args) => new(args, &cwd),
                Command::Show(args) => show(args, &cwd),
                Command::Set(args) => set(args, &cwd),
                Command::Append(args) => append(args, &cwd),
                Command::Remove(args) => remove(args, &cwd),
                Command::Undo => undo(&cwd),
                Command::Redo => redo(&cwd),
                Command::Text { command } => text(command, &cwd),
                Command::Generate(args) => generate(args, &cwd).await,
                Command::Export(args) => export(args, &cwd),
                Command::Reset => reset(&cwd),
            }
        }
        Err(e) => Err(anyhow::anyhow!("Cannot get current directory: {}", e)),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
