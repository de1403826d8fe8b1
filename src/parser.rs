use anyhow::Result;
use std::borrow::Cow;
use tree_sitter::{Language, Parser, Tree};

use crate::error::NoCaptureError;

fn csharp_language() -> Language {
    tree_sitter_c_sharp::language()
}

fn should_mask_directive_line(line_trimmed: &[u8]) -> bool {
    // `# pragma warning disable` is legal C#, so compare on a whitespace-free copy.
    let compact: Vec<u8> = line_trimmed
        .iter()
        .copied()
        .filter(|b| *b != b' ' && *b != b'\t')
        .collect();
    let compact = compact.as_slice();

    compact.starts_with(b"#pragma")
        || compact.starts_with(b"#region")
        || compact.starts_with(b"#endregion")
        || compact.starts_with(b"#nullable")
}

/// Blank out preprocessor lines that tree-sitter-c-sharp may parse as ERROR nodes.
///
/// Directive lines are replaced with spaces while preserving byte length (and newlines) so that:
/// - AST offsets/spans remain aligned with the original source
/// - suppression can still scan the original source for `#pragma warning` directives
pub(crate) fn mask_directive_lines(source: &str) -> Cow<'_, str> {
    let bytes = source.as_bytes();
    if !bytes.contains(&b'#') {
        return Cow::Borrowed(source);
    }

    let mut out = bytes.to_vec();
    let mut line_start = 0usize;

    for line in source.split_inclusive('\n') {
        let line_end = line_start + line.trim_end_matches(['\n', '\r']).len();

        let mut trim = line_start;
        while trim < line_end {
            match bytes[trim] {
                b' ' | b'\t' => trim += 1,
                _ => break,
            }
        }

        if should_mask_directive_line(&bytes[trim..line_end]) {
            for byte in out.iter_mut().take(line_end).skip(trim) {
                *byte = b' ';
            }
        }

        line_start += line.len();
    }

    match String::from_utf8(out) {
        Ok(s) => Cow::Owned(s),
        Err(_) => Cow::Borrowed(source),
    }
}

pub fn parse_source(source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(csharp_language())
        .map_err(|e| NoCaptureError::parse(format!("failed to load C# grammar: {e}")))?;

    let masked = mask_directive_lines(source);

    parser
        .parse(masked.as_ref(), None)
        .ok_or_else(|| NoCaptureError::parse("tree-sitter failed to parse source").into_anyhow())
}
