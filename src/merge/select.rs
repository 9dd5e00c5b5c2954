use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::errors::MergeError;

fn is_pattern(text: &str) -> bool {
    text.contains(['*', '?', '['])
}

/// Translates a shell wildcard for a single path component into an anchored regex.
pub fn wildcard_to_regex(pattern: &str) -> Result<Regex, MergeError> {
    let invalid = |reason: &str| MergeError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    };

    let mut out = String::from("^");
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '[' => {
                let mut class = String::from("[");
                if matches!(chars.peek(), Some('!') | Some('^')) {
                    chars.next();
                    class.push('^');
                }
                let mut closed = false;
                let mut first = true;
                while let Some(c) = chars.next() {
                    if c == ']' && !first {
                        closed = true;
                        break;
                    }
                    first = false;
                    if c == '\\' || c == '[' || c == '&' || c == '~' {
                        class.push('\\');
                    }
                    class.push(c);
                }
                if !closed {
                    return Err(invalid("unterminated character class"));
                }
                class.push(']');
                out.push_str(&class);
            }
            other => out.push_str(&regex::escape(&other.to_string())),
        }
    }
    out.push('$');

    Regex::new(&out).map_err(|e| invalid(&e.to_string()))
}

/// Expands one wildcard pattern. Only the final path component may contain wildcards.
fn expand(pattern: &str) -> Result<Vec<PathBuf>, MergeError> {
    let path = Path::new(pattern);
    let file_pattern = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| MergeError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: "pattern has no file name".to_string(),
        })?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if is_pattern(&dir.to_string_lossy()) {
        return Err(MergeError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: "wildcards are only supported in the file name".to_string(),
        });
    }

    let regex = wildcard_to_regex(file_pattern)?;
    let show_hidden = file_pattern.starts_with('.');

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("cannot list {}: {}", dir.display(), e);
            return Ok(Vec::new());
        }
    };

    let mut matches: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|t| !t.is_dir()).unwrap_or(false))
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            if name.starts_with('.') && !show_hidden {
                return None;
            }
            regex.is_match(&name).then(|| {
                if path.parent().is_some_and(|p| !p.as_os_str().is_empty()) {
                    dir.join(&name)
                } else {
                    PathBuf::from(&name)
                }
            })
        })
        .collect();

    matches.sort();
    Ok(matches)
}

/// Resolves patterns and explicit paths into the ordered list of input files.
///
/// Wildcard matches are sorted lexicographically; explicit paths keep the order
/// they were given in. Duplicates are dropped.
pub fn enumerate_files(inputs: &[String]) -> Result<Vec<PathBuf>, MergeError> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for input in inputs {
        let found = if is_pattern(input) {
            expand(input)?
        } else if Path::new(input).is_file() {
            vec![PathBuf::from(input)]
        } else {
            warn!("input file {} does not exist, ignoring it", input);
            Vec::new()
        };

        for file in found {
            if seen.insert(file.clone()) {
                files.push(file);
            }
        }
    }

    if files.is_empty() {
        return Err(MergeError::NoInputFiles(inputs.join(" ")));
    }
    Ok(files)
}
