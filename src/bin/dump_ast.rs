//! AST dumping tool for checking how tree-sitter-c-sharp parses a file.

use std::env;
use std::fs;

use no_capture::parser::parse_source;

fn print_tree(node: tree_sitter::Node, source: &str, indent: usize) {
    let indent_str = "  ".repeat(indent);
    let kind = node.kind();

    let text = source.get(node.byte_range()).unwrap_or("");
    let text_display: String = if text.chars().count() > 50 {
        let head: String = text.chars().take(50).collect();
        format!("{head}...")
    } else {
        text.to_string()
    };
    let text_display = text_display.replace('\n', "\\n");

    if node.is_named() {
        println!("{indent_str}{kind}  \"{text_display}\"");
    } else {
        println!("{indent_str}'{kind}'");
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        print_tree(child, source, indent + 1);
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: dump_ast <file.cs>");
        std::process::exit(1);
    }

    let file_path = &args[1];
    let source = fs::read_to_string(file_path).unwrap_or_else(|e| {
        eprintln!("Failed to read {file_path}: {e}");
        std::process::exit(1);
    });

    let tree = parse_source(&source).unwrap_or_else(|e| {
        eprintln!("{e:#}");
        std::process::exit(1);
    });

    println!("AST for {file_path}:");
    println!("================");
    print_tree(tree.root_node(), &source, 0);
}
