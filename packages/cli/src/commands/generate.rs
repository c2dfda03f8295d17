use crate::workbench::Workbench;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use loe_workspace::{
    build_markdown, write_markdown, GenerationArtifact, GenerationController, GenerationState,
    DEFAULT_EXPORT_NAME,
};
use std::path::PathBuf;
use tokio_stream::StreamExt;

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Also write the report as markdown to this file
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Output file
    #[arg(short, long, default_value = DEFAULT_EXPORT_NAME)]
    pub out: PathBuf,

    /// Print the markdown instead of writing a file
    #[arg(long)]
    pub stdout: bool,
}

/// Generate the report for the current document
pub async fn generate(args: GenerateArgs, cwd: &str) -> Result<()> {
    let bench = Workbench::open(cwd)?;
    let session = bench.load_session()?;
    let controller = GenerationController::spawn(bench.api_client()?);

    let input = controller
        .select(session.document().clone())
        .await
        .ok_or_else(|| anyhow!("Generation stopped before it started"))?;

    let mut updates = controller.updates();
    let settled = loop {
        match updates.next().await {
            Some(GenerationState::Pending { .. }) => {
                eprintln!("{}", "⏳ Generating...".bright_blue().bold());
            }
            Some(state) if state.input() == Some(input) => break state,
            Some(_) => continue,
            None => return Err(anyhow!("Generation stopped before it finished")),
        }
    };

    match settled {
        GenerationState::Success { artifact, .. } => {
            bench.save_output(Some(&artifact))?;
            print_report(&artifact);

            if let Some(out) = args.out {
                write_markdown(&artifact, &PathBuf::from(cwd).join(&out))?;
                eprintln!("  {} Wrote {}", "✓".green(), out.display());
            }
            Ok(())
        }
        GenerationState::Failed { error, .. } => Err(anyhow!("Generation error: {}", error)),
        GenerationState::Idle | GenerationState::Pending { .. } => {
            Err(anyhow!("Generation stopped before it finished"))
        }
    }
}

/// Write or print the last generated report
pub fn export(args: ExportArgs, cwd: &str) -> Result<()> {
    let bench = Workbench::open(cwd)?;
    let artifact = bench
        .load_output()?
        .ok_or_else(|| anyhow!("Nothing generated yet. Run `loe generate` first"))?;

    if args.stdout {
        print!("{}", build_markdown(&artifact));
        return Ok(());
    }

    let path = PathBuf::from(cwd).join(&args.out);
    write_markdown(&artifact, &path)?;
    println!("  {} Wrote {}", "✓".green(), args.out.display());
    Ok(())
}

fn print_report(artifact: &GenerationArtifact) {
    for line in build_markdown(artifact).lines() {
        if let Some(heading) = line.strip_prefix("# ") {
            println!("{}", heading.bold().underline());
        } else {
            println!("{}", line);
        }
    }
}
