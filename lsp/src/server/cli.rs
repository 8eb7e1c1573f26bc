use anyhow::Context;
use std::path::{Component, Path};

use super::analysis::analyze_document;

pub(crate) fn try_cli_analyze() -> anyhow::Result<Option<String>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() <= 1 {
        return Ok(None);
    }

    if let Some(i) = args.iter().position(|a| a == "--analyze") {
        let mut path_index = i + 1;
        while path_index < args.len() && args[path_index].starts_with("--") {
            path_index += 1;
        }

        let path = args.get(path_index).cloned().ok_or_else(|| {
            anyhow::anyhow!("Usage: nir-lsp --analyze [--errors-only] <relative-file-path>\n  --analyze <file>     : Full analysis with JSON output\n  --errors-only        : Show only errors in simple format")
        })?;

        let errors_only = args.iter().any(|a| a == "--errors-only");
        let content = read_file_content(&path)?;
        let analysis = analyze_document(&content);

        if errors_only {
            return Ok(Some(render_errors(&analysis.diagnostics)));
        }

        let output = serde_json::json!({
            "symbols": analysis.symbols,
            "diagnostics": analysis.diagnostics,
        });
        return Ok(Some(serde_json::to_string_pretty(&output)?));
    }

    Ok(None)
}

fn render_errors(diagnostics: &[tower_lsp::lsp_types::Diagnostic]) -> String {
    let errors: Vec<String> = diagnostics
        .iter()
        .filter(|d| d.severity == Some(tower_lsp::lsp_types::DiagnosticSeverity::ERROR))
        .map(|d| {
            format!(
                "Line {}:{}: {}",
                d.range.start.line + 1,
                d.range.start.character + 1,
                d.message
            )
        })
        .collect();

    if errors.is_empty() {
        "No errors found".to_string()
    } else {
        errors.join("\n")
    }
}

pub(crate) fn is_safe_path(path: &str) -> bool {
    let path = Path::new(path);

    if path.as_os_str().is_empty() {
        return false;
    }
    if path.is_absolute() {
        return false;
    }
    if path.components().any(|c| c == Component::ParentDir) {
        return false;
    }

    let s = path.to_string_lossy();
    let suspicious = ['\0', '\n', '\r', '\t'];
    if s.chars().any(|c| suspicious.contains(&c)) {
        return false;
    }
    if s.len() >= 2 {
        let bytes = s.as_bytes();
        if bytes[1] == b':' {
            return false;
        }
    }
    true
}

pub(crate) fn read_file_content(path: &str) -> anyhow::Result<String> {
    if !is_safe_path(path) {
        return Err(anyhow::anyhow!("Unsafe file path: {}", path));
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file '{}'", path))
}
