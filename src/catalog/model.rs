use std::path::{Path, PathBuf};

use crate::core::search::fold_case;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Root-relative path with `/` separators.
    pub id: String,
    pub name: String,
    pub name_lower: String,
    pub path: PathBuf,
}

pub fn build_entry(root: &Path, path: PathBuf) -> Option<FileEntry> {
    let relative = path.strip_prefix(root).ok()?;
    let id = relative_id(relative)?;
    let name = path.file_name()?.to_string_lossy().to_string();
    let name_lower = name.chars().map(fold_case).collect();
    Some(FileEntry {
        id,
        name,
        name_lower,
        path,
    })
}

pub(super) fn relative_id(relative: &Path) -> Option<String> {
    let parts: Vec<String> = relative
        .components()
        .map(|part| part.as_os_str().to_string_lossy().to_string())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Cheap upstream filter: every query char appears in order in the
/// case-folded name. Never stricter than the fuzzy matcher.
pub fn name_contains_chars(name_lower: &str, query_lower: &[char]) -> bool {
    let mut wanted = query_lower.iter().peekable();
    for ch in name_lower.chars() {
        match wanted.peek() {
            Some(&&next) if next == ch => {
                wanted.next();
            }
            Some(_) => {}
            None => break,
        }
    }
    wanted.peek().is_none()
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{build_entry, name_contains_chars};

    #[test]
    fn entry_uses_slash_separated_relative_id() {
        let root = Path::new("/project");
        let entry = build_entry(root, PathBuf::from("/project/Assets/Scenes/Main.unity"))
            .expect("entry");
        assert_eq!(entry.id, "Assets/Scenes/Main.unity");
        assert_eq!(entry.name, "Main.unity");
        assert_eq!(entry.name_lower, "main.unity");
    }

    #[test]
    fn entry_outside_root_is_rejected() {
        assert!(build_entry(Path::new("/project"), PathBuf::from("/other/file.txt")).is_none());
        assert!(build_entry(Path::new("/project"), PathBuf::from("/project")).is_none());
    }

    #[test]
    fn char_prefilter_requires_order() {
        let query: Vec<char> = "mu".chars().collect();
        assert!(name_contains_chars("main.unity", &query));
        let reversed: Vec<char> = "um".chars().collect();
        assert!(!name_contains_chars("main.unity", &reversed));
        assert!(name_contains_chars("anything", &[]));
    }
}
