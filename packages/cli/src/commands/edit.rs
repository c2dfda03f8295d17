use crate::workbench::Workbench;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use loe_editor::{EditEvent, EditorError, EditorNode, NodeRef, Path, Value, Widget};

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Field path, e.g. `client` or `sites[0].name`
    pub path: String,

    /// New value; list fields take one item per argument
    #[arg(required = true, num_args = 1..)]
    pub values: Vec<String>,

    /// Parse the value as JSON and write it at any path
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct AppendArgs {
    /// Path of an item list, e.g. `sites`
    pub path: String,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Path of an item list, e.g. `sites`
    pub path: String,

    /// Item number as shown by `loe show` (starting at 1)
    pub item: usize,
}

pub fn set(args: SetArgs, cwd: &str) -> Result<()> {
    let bench = Workbench::open(cwd)?;
    let mut session = bench.load_session()?;
    let path: Path = args.path.parse()?;

    let event = if args.json {
        let value = Value::from_json_str(&args.values.join(" ")).context("Value is not valid JSON")?;
        EditEvent::new(path.clone(), value)
    } else {
        field_event(&session.render(), &path, &args.values)?
    };

    session.apply_edit(event);
    bench.save_session(&session)?;

    println!("  {} Updated {}", "✓".green(), path);
    Ok(())
}

pub fn append(args: AppendArgs, cwd: &str) -> Result<()> {
    let bench = Workbench::open(cwd)?;
    let mut session = bench.load_session()?;
    let path: Path = args.path.parse()?;

    let event = append_event(&session.render(), &path)?;

    session.apply_edit(event);
    bench.save_session(&session)?;

    println!("  {} Added an item to {}", "✓".green(), path);
    Ok(())
}

pub fn remove(args: RemoveArgs, cwd: &str) -> Result<()> {
    let bench = Workbench::open(cwd)?;
    let mut session = bench.load_session()?;
    let path: Path = args.path.parse()?;

    let tree = session.render();
    let items = match tree.find(&path) {
        Some(NodeRef::Items(items)) => items,
        Some(_) => return Err(anyhow!("{} is not a list of items", path)),
        None => return Err(EditorError::NotEditable(path.to_string()).into()),
    };

    let event = args
        .item
        .checked_sub(1)
        .and_then(|index| items.remove(index))
        .ok_or_else(|| anyhow!("{} has no item {} (it has {})", path, args.item, items.items.len()))?;

    session.apply_edit(event);
    bench.save_session(&session)?;

    println!("  {} Removed item {} from {}", "✓".green(), args.item, path);
    Ok(())
}

/// Append to an item list, or start a list that is still empty
fn append_event(tree: &EditorNode, path: &Path) -> Result<EditEvent> {
    match tree.find(path) {
        Some(NodeRef::Items(items)) => Ok(items.append()),
        Some(NodeRef::Lines(lines)) => lines.append().ok_or_else(|| {
            anyhow!("{} is a list of lines; replace it with `loe set {} ...`", path, path)
        }),
        Some(_) => Err(anyhow!("{} is not a list of items", path)),
        None => Err(EditorError::NotEditable(path.to_string()).into()),
    }
}

/// Turn command-line words into the edit the rendered node would emit
fn field_event(tree: &EditorNode, path: &Path, values: &[String]) -> Result<EditEvent> {
    match tree.find(path) {
        Some(NodeRef::Field(field)) => {
            let raw = values.join(" ");
            field.input(&raw).ok_or_else(|| {
                let expected = match field.widget {
                    Widget::Checkbox(_) => "yes or no",
                    Widget::NumberInput(_) => "a number",
                    Widget::TextInput(_) | Widget::TextArea(_) => "text",
                };
                anyhow!("'{}' is not valid for {}: expected {}", raw, path, expected)
            })
        }
        Some(NodeRef::Lines(lines)) => Ok(lines.set_text(&values.join("\n"))),
        Some(NodeRef::Object(_)) | Some(NodeRef::Items(_)) => Err(anyhow!(
            "{} is a group; set one of its fields (see `loe show --paths`)",
            path
        )),
        None => Err(anyhow!("Nothing to edit at {}; use --json to create it", path)),
    }
}
