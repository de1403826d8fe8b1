use std::path::Path;

use crate::annotations::PragmaMap;
use crate::lint::LintDescriptor;

/// Check whether `lint` is suppressed by `#pragma warning` on `row` (1-based).
///
/// Both the lint code and the lint name are accepted as pragma ids.
pub fn is_suppressed_at(pragmas: &PragmaMap, row: usize, lint: &LintDescriptor) -> bool {
    if pragmas.is_empty() {
        return false;
    }
    let scope = pragmas.scope_at(row);
    scope.is_suppressed(lint.code) || scope.is_suppressed(lint.name)
}

/// File name suffixes used by C# tooling for generated sources.
const GENERATED_SUFFIXES: &[&str] = &[".g.cs", ".g.i.cs", ".designer.cs", ".generated.cs"];

/// Check whether a file name follows a generated-code naming convention.
pub fn is_generated_file_name(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let name = name.to_ascii_lowercase();
    GENERATED_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Check whether the leading comment block carries an `<auto-generated` marker.
pub fn has_auto_generated_header(source: &str) -> bool {
    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !(trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*')) {
            return false;
        }
        if trimmed.to_ascii_lowercase().contains("<auto-generated") {
            return true;
        }
    }
    false
}

/// Generated code is skipped entirely.
pub fn is_generated_source(path: Option<&Path>, source: &str) -> bool {
    path.is_some_and(is_generated_file_name) || has_auto_generated_header(source)
}
