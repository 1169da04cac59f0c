//! Visual directory tree rendering.
//!
//! Produces the conventional `tree(1)`-style listing: lexicographically
//! sorted siblings, depth-first, tee/corner pointers with continuation bars.

use std::fs;
use std::io;
use std::path::Path;

// prefix components:
const SPACE: &str = "    ";
const BRANCH: &str = "│   ";
// pointers:
const TEE: &str = "├── ";
const LAST: &str = "└── ";

/// Render the contents of `dir` as tree lines, one entry per line.
///
/// The directory itself is not included; callers prepend their own header
/// line. Siblings are sorted by file name so the output is deterministic.
///
/// # Errors
///
/// Returns the underlying IO error if `dir` (or a subdirectory) cannot be
/// read.
pub fn tree(dir: &Path) -> io::Result<Vec<String>> {
    let mut lines = Vec::new();
    walk(dir, "", &mut lines)?;
    Ok(lines)
}

fn walk(dir: &Path, prefix: &str, lines: &mut Vec<String>) -> io::Result<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    let count = entries.len();
    for (i, entry) in entries.iter().enumerate() {
        let is_last = i + 1 == count;
        let pointer = if is_last { LAST } else { TEE };
        lines.push(format!(
            "{prefix}{pointer}{}",
            entry.file_name().to_string_lossy()
        ));

        let path = entry.path();
        if path.is_dir() {
            // extend the prefix and recurse: bar while siblings remain,
            // blank once the corner has been printed
            let extension = if is_last { SPACE } else { BRANCH };
            walk(&path, &format!("{prefix}{extension}"), lines)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_tree_sorted_siblings() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("img")).unwrap();
        fs::create_dir(dir.path().join("eq")).unwrap();
        fs::create_dir(dir.path().join("tab")).unwrap();

        let lines = tree(dir.path()).unwrap();
        assert_eq!(lines, vec!["├── eq", "├── img", "└── tab"]);
    }

    #[test]
    fn test_tree_nested_prefixes() {
        let dir = TempDir::new().unwrap();
        let eq = dir.path().join("eq");
        fs::create_dir(&eq).unwrap();
        fs::write(eq.join("a.tex"), "a").unwrap();
        fs::write(eq.join("b.tex"), "b").unwrap();
        fs::create_dir(dir.path().join("img")).unwrap();

        let lines = tree(dir.path()).unwrap();
        assert_eq!(
            lines,
            vec!["├── eq", "│   ├── a.tex", "│   └── b.tex", "└── img"]
        );
    }

    #[test]
    fn test_tree_last_sibling_gets_blank_extension() {
        let dir = TempDir::new().unwrap();
        let tab = dir.path().join("tab");
        fs::create_dir(&tab).unwrap();
        fs::write(tab.join("t.tex"), "t").unwrap();

        let lines = tree(dir.path()).unwrap();
        assert_eq!(lines, vec!["└── tab", "    └── t.tex"]);
    }

    #[test]
    fn test_tree_empty_dir() {
        let dir = TempDir::new().unwrap();
        assert!(tree(dir.path()).unwrap().is_empty());
    }
}
