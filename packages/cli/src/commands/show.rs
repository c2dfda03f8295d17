use crate::workbench::Workbench;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use loe_editor::{EditorNode, FieldNode, ItemsNode, LinesNode, ObjectNode, Widget};

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Print the document as JSON text instead of the editor view
    #[arg(long)]
    pub text: bool,

    /// Show the path of every field (for `loe set`)
    #[arg(short, long)]
    pub paths: bool,
}

pub fn show(args: ShowArgs, cwd: &str) -> Result<()> {
    let bench = Workbench::open(cwd)?;
    let session = bench.load_session()?;

    if args.text {
        println!("{}", session.text().text());
        return Ok(());
    }

    let printer = Printer { paths: args.paths };
    printer.node(&session.render(), 0);
    Ok(())
}

struct Printer {
    paths: bool,
}

impl Printer {
    fn node(&self, node: &EditorNode, depth: usize) {
        match node {
            EditorNode::Field(field) => self.field(field, depth),
            EditorNode::Object(object) => self.object(object, depth),
            EditorNode::Lines(lines) => self.lines(lines, depth),
            EditorNode::Items(items) => self.items(items, depth),
        }
    }

    fn heading(&self, label: &str, path: &loe_editor::Path, depth: usize) {
        println!("{}{}{}", indent(depth), label.bold(), self.path_hint(path));
    }

    fn path_hint(&self, path: &loe_editor::Path) -> String {
        if self.paths {
            format!("  {}", path.to_string().dimmed())
        } else {
            String::new()
        }
    }

    fn object(&self, object: &ObjectNode, depth: usize) {
        // The root object has no label; its members sit at the top level
        let inner = if object.label.is_empty() {
            depth
        } else {
            self.heading(&object.label, &object.path, depth);
            depth + 1
        };

        for field in &object.fields {
            self.field(field, inner);
        }
        for child in &object.children {
            self.node(child, inner);
        }
    }

    fn field(&self, field: &FieldNode, depth: usize) {
        let pad = indent(depth);
        let hint = self.path_hint(&field.path);

        match &field.widget {
            Widget::Checkbox(checked) => {
                let mark = if *checked { "[x]".green() } else { "[ ]".normal() };
                println!("{}{} {}{}", pad, mark, field.label, hint);
            }
            Widget::NumberInput(n) => println!("{}{}: {}{}", pad, field.label, n, hint),
            Widget::TextInput(text) if text.is_empty() => {
                println!("{}{}: {}{}", pad, field.label, "(empty)".dimmed(), hint)
            }
            Widget::TextInput(text) => println!("{}{}: {}{}", pad, field.label, text, hint),
            Widget::TextArea(text) => {
                println!("{}{}:{}", pad, field.label, hint);
                if text.trim().is_empty() {
                    println!("{}  {}", pad, "(empty)".dimmed());
                }
                for line in text.lines() {
                    println!("{}  {}", pad, line);
                }
            }
        }
    }

    fn lines(&self, lines: &LinesNode, depth: usize) {
        let pad = indent(depth);
        println!("{}{}:{}", pad, lines.label, self.path_hint(&lines.path));

        if lines.text.is_empty() {
            println!("{}  {}", pad, "(none)".dimmed());
        }
        for line in lines.text.lines() {
            println!("{}  - {}", pad, line);
        }
    }

    fn items(&self, items: &ItemsNode, depth: usize) {
        self.heading(&items.label, &items.path, depth);

        for item in &items.items {
            self.object(&item.body, depth + 1);
        }
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}
