#![forbid(unsafe_code)]

use std::process::exit;

use yaml_registry::{BudgetReport, Node, NodeKind, Options, parse_stream};

fn report_budget(report: &BudgetReport) {
    println!("Budget report:\n{report:#?}");
}

/// Print `node` and its children, one per line, indented by depth.
fn print_node(node: &Node, depth: usize) {
    let pad = "  ".repeat(depth);
    let at = format!("{}:{}", node.location.line(), node.location.column());
    match &node.kind {
        NodeKind::Mapping(entries) => {
            println!("{pad}mapping @{at}");
            entries.iter().for_each(|e| print_node(e, depth + 1));
        }
        NodeKind::MappingEntry { key, value } => {
            println!("{pad}entry @{at}");
            print_node(key, depth + 1);
            print_node(value, depth + 1);
        }
        NodeKind::Sequence(items) => {
            println!("{pad}sequence @{at}");
            items.iter().for_each(|i| print_node(i, depth + 1));
        }
        NodeKind::LiteralBlock(inner) => {
            println!("{pad}literal block @{at}");
            print_node(inner, depth + 1);
        }
        NodeKind::Tag { tag, value } => {
            println!("{pad}tag {tag} @{at}");
            print_node(value, depth + 1);
        }
        NodeKind::Anchor { id, value } => {
            println!("{pad}anchor {id} @{at}");
            print_node(value, depth + 1);
        }
        NodeKind::MappingKey(key) => {
            println!("{pad}complex key @{at}");
            print_node(key, depth + 1);
        }
        other => println!("{pad}{other:?} @{at}"),
    }
}

/// Parse a YAML file, print its document tree and the budget summary. This can be
/// used to check which parts of a file the decoder will see, and as a validator.
/// Single parameter is the file name.
fn main() {
    let path = match std::env::args().nth(1).ok_or(
        "This program prints the document tree of the given YAML file together with \
        its budget report. Expected a path to a YAML file as the first argument",
    ) {
        Ok(path) => path,
        Err(err) => {
            eprintln!("{err}");
            exit(1);
        }
    };

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("Failed to read {path}: {err}");
            exit(2);
        }
    };

    let options = Options {
        budget_report: Some(report_budget),
        ..Options::default()
    };

    match parse_stream(&content, &options) {
        Ok(stream) => {
            for (index, document) in stream.documents.iter().enumerate() {
                println!("document {index}");
                for directive in &document.directives {
                    print_node(directive, 1);
                }
                match &document.body {
                    Some(body) => print_node(body, 1),
                    None => println!("  (empty)"),
                }
            }
        }
        Err(err) => {
            eprintln!("{path} invalid:\n{err}");
            exit(3);
        }
    }
}
