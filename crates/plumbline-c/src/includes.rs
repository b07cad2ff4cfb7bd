use camino::{Utf8Path, Utf8PathBuf};
use plumbline_syntax::{DiagnosticSeverity, IncludeSearch, ParserDiagnostic, Position};
use tree_sitter::Node;

const CATEGORY: &str = "Lexical or Preprocessor Issue";

/// Warn about `#include` directives whose header cannot be found.
///
/// Quoted includes are looked up next to the including file, then in the
/// search directories. System includes are only checked when search
/// directories were given, since the system paths are unknown.
pub(crate) fn unresolved_includes(
    root: Node<'_>,
    source: &str,
    path: &Utf8Path,
    search: &IncludeSearch,
) -> Vec<ParserDiagnostic> {
    let local_dir = path.parent().unwrap_or(Utf8Path::new(""));
    let mut out = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if node.kind() == "preproc_include" {
            if let Some(target) = node.child_by_field_name("path")
                && let Some(diag) = check_include(target, source, local_dir, search)
            {
                out.push(diag);
            }
            continue;
        }
        let mut cursor = node.walk();
        stack.extend(node.named_children(&mut cursor));
    }

    out
}

fn check_include(
    target: Node<'_>,
    source: &str,
    local_dir: &Utf8Path,
    search: &IncludeSearch,
) -> Option<ParserDiagnostic> {
    let text = target.utf8_text(source.as_bytes()).ok()?;
    let (name, candidates): (&str, Vec<Utf8PathBuf>) = match target.kind() {
        "string_literal" => {
            let name = text.trim_matches('"');
            let candidates = std::iter::once(local_dir.join(name))
                .chain(search.dirs.iter().map(|d| d.join(name)))
                .collect();
            (name, candidates)
        }
        "system_lib_string" if !search.dirs.is_empty() => {
            let name = text.trim_start_matches('<').trim_end_matches('>');
            (name, search.dirs.iter().map(|d| d.join(name)).collect())
        }
        // macro-expanded include or unchecked system header
        _ => return None,
    };

    if candidates.iter().any(|c| c.is_file()) {
        return None;
    }

    let start = target.start_position();
    tracing::debug!(header = name, "include not found");
    Some(ParserDiagnostic {
        severity: DiagnosticSeverity::Warning,
        message: format!("'{name}' file not found"),
        category: CATEGORY.to_string(),
        position: Position::new(
            u32::try_from(start.row + 1).unwrap_or(u32::MAX),
            u32::try_from(start.column + 1).unwrap_or(u32::MAX),
        ),
    })
}
