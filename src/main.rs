use clap::Parser;
use no_capture::LintEngine;
use no_capture::cli::{Args, Command, LintArgs, OutputFormat};
use no_capture::config;
use no_capture::diagnostics::Diagnostic;
use no_capture::lint::{LintRegistry, LintSettings};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use walkdir::WalkDir;

fn main() -> ExitCode {
    no_capture::telemetry::init_tracing();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(2)
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    match args.command {
        Some(Command::ListRules) => {
            list_rules();
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Explain { rule }) => {
            explain_rule(&rule)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Lint(lint)) => lint_command(lint),
        None => lint_command(args.lint),
    }
}

fn list_rules() {
    let registry = LintRegistry::default_rules();
    let mut rules: Vec<_> = registry.descriptors().collect();
    rules.sort_by_key(|d| d.name);

    for d in rules {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            d.name,
            d.code,
            d.category.as_str(),
            d.default_level.as_str(),
            d.description
        );
    }
}

fn explain_rule(rule: &str) -> anyhow::Result<()> {
    let Some(d) = LintRegistry::default_rules().find_descriptor(rule) else {
        anyhow::bail!("unknown lint: {rule}");
    };

    println!("name: {}", d.name);
    println!("code: {}", d.code);
    println!("category: {}", d.category.as_str());
    println!("default level: {}", d.default_level.as_str());
    println!("description: {}", d.description);
    println!("suppress with: #pragma warning disable {}", d.code);
    Ok(())
}

fn lint_command(args: LintArgs) -> anyhow::Result<ExitCode> {
    let start_dir = infer_start_dir(&args)?;
    let loaded_cfg = config::load_config(args.config.as_deref(), &start_dir)?;

    let (disabled, settings) = match loaded_cfg.as_ref() {
        Some((_path, cfg)) => (cfg.lints.disabled.clone(), LintSettings::from_config(cfg)),
        None => (Vec::new(), LintSettings::default()),
    };

    let registry = LintRegistry::default_rules_filtered(&args.only, &args.skip, &disabled)?;
    let engine = LintEngine::new_with_settings(registry, settings);

    let mut diagnostics = Vec::new();
    if args.paths.is_empty() {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        let mut diags = engine.lint_source(&source)?;
        for d in &mut diags {
            d.file = Some("stdin".to_string());
        }
        diagnostics.append(&mut diags);
    } else {
        for path in collect_cs_files(&args.paths)? {
            diagnostics.append(&mut engine.lint_file(&path)?);
        }
    }

    match args.format {
        OutputFormat::Pretty => print_pretty(&diagnostics),
        OutputFormat::Github => print_github(&diagnostics, args.deny_warnings),
        OutputFormat::Json => print_json(&diagnostics)?,
    }

    if diagnostics.iter().any(|d| d.level.fails_run(args.deny_warnings)) {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn file_label(diag: &Diagnostic) -> &str {
    diag.file.as_deref().unwrap_or("<unknown>")
}

fn print_pretty(diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        println!(
            "{}:{}:{}: {}: {}: {}",
            file_label(diag),
            diag.span.start.row,
            diag.span.start.column,
            diag.level,
            diag.lint.name,
            diag.message
        );
    }
    println!("{} diagnostics", diagnostics.len());
}

fn print_github(diagnostics: &[Diagnostic], deny_warnings: bool) {
    for diag in diagnostics {
        let kind = if diag.level.fails_run(deny_warnings) {
            "error"
        } else {
            "warning"
        };

        println!(
            "::{} file={},line={},col={},endLine={},endColumn={},title={}::{}",
            kind,
            github_escape(file_label(diag)),
            diag.span.start.row,
            diag.span.start.column,
            diag.span.end.row,
            diag.span.end.column,
            diag.lint.code,
            github_escape(&diag.message)
        );
    }
}

#[derive(Debug, Serialize)]
struct JsonDiagnostic<'a> {
    file: &'a str,
    row: usize,
    column: usize,
    end_row: usize,
    end_column: usize,
    level: &'static str,
    lint: &'static str,
    code: &'static str,
    message: &'a str,
}

fn print_json(diagnostics: &[Diagnostic]) -> anyhow::Result<()> {
    let out: Vec<JsonDiagnostic<'_>> = diagnostics
        .iter()
        .map(|d| JsonDiagnostic {
            file: file_label(d),
            row: d.span.start.row,
            column: d.span.start.column,
            end_row: d.span.end.row,
            end_column: d.span.end.column,
            level: d.level.as_str(),
            lint: d.lint.name,
            code: d.lint.code,
            message: &d.message,
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn github_escape(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn collect_cs_files(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for path in paths {
        if path.is_dir() {
            let walker = WalkDir::new(path).into_iter().filter_entry(|e| {
                e.depth() == 0 || !(e.file_type().is_dir() && should_skip_dir(e.path()))
            });
            for entry in walker {
                let entry = entry?;
                if entry.file_type().is_file() && is_cs_file(entry.path()) {
                    out.push(entry.into_path());
                }
            }
        } else {
            out.push(path.clone());
        }
    }

    out.sort();
    out.dedup();
    Ok(out)
}

fn is_cs_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("cs")
}

fn should_skip_dir(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
        return false;
    };

    matches!(name, ".git" | ".vs" | "bin" | "obj")
}

fn infer_start_dir(args: &LintArgs) -> anyhow::Result<PathBuf> {
    let base = match args.paths.first() {
        Some(p) => p.clone(),
        None => std::env::current_dir()?,
    };

    let base = if base.is_file() {
        base.parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    } else {
        base
    };

    Ok(base)
}
