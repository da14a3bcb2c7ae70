//! Filesystem-backed candidate source for the CLI.
//!
//! Every regular file under the root becomes a candidate. Its identifier is
//! the root-relative path and its display name is the file name. Directories
//! are never candidates.

mod model;

pub use model::{FileEntry, build_entry, name_contains_chars};

use std::io::Write;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use indexmap::IndexMap;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::Config;
use crate::core::candidate::{Activator, Candidate, CandidateSource, NameResolver};
use crate::core::search::fold_case;
use crate::error::{QuickFindError, Result};

#[derive(Debug, Clone)]
pub struct FileCatalog {
    root: PathBuf,
    entries: IndexMap<String, FileEntry>,
}

impl FileCatalog {
    pub fn scan(config: &Config) -> Result<Self> {
        let root = config.root.clone();
        if !root.is_dir() {
            return Err(QuickFindError::NotFound(format!(
                "root directory {}",
                root.display()
            )));
        }
        let include = build_globset(&config.include)?;
        let exclude = build_globset(&config.exclude)?;
        let state_id = config
            .state_path()
            .strip_prefix(&root)
            .ok()
            .and_then(model::relative_id);

        let walker = WalkDir::new(&root)
            .follow_links(config.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !(config.hide_hidden && is_hidden(entry)));

        let mut entries = IndexMap::new();
        for item in walker {
            let item = match item {
                Ok(item) => item,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if !item.file_type().is_file() {
                continue;
            }
            let Some(entry) = build_entry(&root, item.into_path()) else {
                continue;
            };
            if state_id.as_deref() == Some(entry.id.as_str()) {
                continue;
            }
            if exclude.as_ref().is_some_and(|set| set.is_match(&entry.id)) {
                continue;
            }
            if include.as_ref().is_some_and(|set| !set.is_match(&entry.id)) {
                continue;
            }
            entries.insert(entry.id.clone(), entry);
        }

        debug!(root = %root.display(), files = entries.len(), "scanned catalog");
        Ok(Self { root, entries })
    }

    pub fn from_entries(root: impl Into<PathBuf>, entries: Vec<FileEntry>) -> Self {
        Self {
            root: root.into(),
            entries: entries
                .into_iter()
                .map(|entry| (entry.id.clone(), entry))
                .collect(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&FileEntry> {
        self.entries.get(id)
    }
}

impl CandidateSource for FileCatalog {
    fn candidates(&self, query: &str) -> Result<Vec<String>> {
        let query: Vec<char> = query.chars().map(fold_case).collect();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .entries
            .values()
            .filter(|entry| name_contains_chars(&entry.name_lower, &query))
            .map(|entry| entry.id.clone())
            .collect())
    }
}

impl NameResolver for FileCatalog {
    fn display_name(&self, id: &str) -> Result<String> {
        self.entries
            .get(id)
            .map(|entry| entry.name.clone())
            .ok_or_else(|| QuickFindError::NotFound(id.to_string()))
    }
}

/// Writes the absolute path of each activated item, one per line.
pub struct PathActivator<'a, W> {
    catalog: &'a FileCatalog,
    out: W,
}

impl<'a, W: Write> PathActivator<'a, W> {
    pub fn new(catalog: &'a FileCatalog, out: W) -> Self {
        Self { catalog, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Activator for PathActivator<'_, W> {
    fn activate(&mut self, candidate: &Candidate) -> Result<()> {
        let entry = self
            .catalog
            .get(&candidate.id)
            .ok_or_else(|| QuickFindError::NotFound(candidate.id.clone()))?;
        writeln!(self.out, "{}", entry.path.display())?;
        self.out.flush()?;
        Ok(())
    }
}

fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(Some(builder.build()?))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::{FileCatalog, PathActivator};
    use crate::config::Config;
    use crate::core::candidate::{Activator, Candidate, CandidateSource, NameResolver};
    use crate::core::session::{SearchSession, SessionOptions};
    use crate::core::state::SessionState;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, b"").expect("write");
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        for rel in [
            "Assets/apple.txt",
            "Assets/Scripts/application.cs",
            "Assets/banana.txt",
            ".hidden/secret.txt",
            "target/debug/app.bin",
        ] {
            touch(dir.path(), rel);
        }
        fs::create_dir_all(dir.path().join("Assets/apps")).expect("mkdir");
        dir
    }

    fn config(root: &Path) -> Config {
        Config {
            root: root.to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn scan_keeps_files_only_and_honours_filters() {
        let dir = fixture();
        let catalog = FileCatalog::scan(&config(dir.path())).expect("scan");
        let ids: Vec<&str> = catalog.entries.keys().map(String::as_str).collect();
        assert_eq!(
            ids,
            vec![
                "Assets/Scripts/application.cs",
                "Assets/apple.txt",
                "Assets/banana.txt",
            ]
        );
    }

    #[test]
    fn include_globs_narrow_the_scan() {
        let dir = fixture();
        let mut config = config(dir.path());
        config.include = vec!["**/*.cs".to_string()];
        let catalog = FileCatalog::scan(&config).expect("scan");
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("Assets/Scripts/application.cs").is_some());
    }

    #[test]
    fn hidden_entries_can_be_included() {
        let dir = fixture();
        let mut config = config(dir.path());
        config.hide_hidden = false;
        let catalog = FileCatalog::scan(&config).expect("scan");
        assert!(catalog.get(".hidden/secret.txt").is_some());
    }

    #[test]
    fn own_config_and_state_files_are_never_candidates() {
        let dir = fixture();
        touch(dir.path(), ".quickfind.yaml");
        touch(dir.path(), ".quickfind/session.json");
        touch(dir.path(), "state/picks.json");

        let mut config = config(dir.path());
        config.hide_hidden = false;
        let catalog = FileCatalog::scan(&config).expect("scan");
        assert!(catalog.get(".quickfind.yaml").is_none());
        assert!(catalog.get(".quickfind/session.json").is_none());
        assert!(catalog.get("state/picks.json").is_some());

        config.exclude.clear();
        config.state_file = "state/picks.json".into();
        let catalog = FileCatalog::scan(&config).expect("scan");
        assert!(catalog.get("state/picks.json").is_none());
        assert!(catalog.get("Assets/apple.txt").is_some());
    }

    #[test]
    fn missing_root_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = FileCatalog::scan(&config(&dir.path().join("nope"))).expect_err("missing");
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn source_prefilters_by_name_characters() {
        let dir = fixture();
        let catalog = FileCatalog::scan(&config(dir.path())).expect("scan");
        let ids = catalog.candidates("APP").expect("candidates");
        assert_eq!(ids, vec!["Assets/Scripts/application.cs", "Assets/apple.txt"]);
        assert!(catalog.candidates("").expect("candidates").is_empty());
    }

    #[test]
    fn resolver_maps_ids_to_file_names() {
        let dir = fixture();
        let catalog = FileCatalog::scan(&config(dir.path())).expect("scan");
        assert_eq!(
            catalog.display_name("Assets/apple.txt").expect("name"),
            "apple.txt"
        );
        assert_eq!(
            catalog.display_name("Assets/gone.txt").expect_err("gone").code(),
            "NOT_FOUND"
        );
    }

    #[test]
    fn session_over_catalog_ranks_and_activates() {
        let dir = fixture();
        let catalog = FileCatalog::scan(&config(dir.path())).expect("scan");
        let mut session = SearchSession::restore(
            &catalog,
            SessionState::default(),
            SessionOptions::default(),
        );
        session.search("app");
        assert_eq!(
            session.result_ids(),
            vec!["Assets/apple.txt", "Assets/Scripts/application.cs"]
        );

        let mut activator = PathActivator::new(&catalog, Vec::new());
        let picked = session.activate(&mut activator).expect("pick");
        assert_eq!(picked.id, "Assets/apple.txt");
        let printed = String::from_utf8(activator.into_inner()).expect("utf8");
        assert!(printed.trim_end().ends_with("apple.txt"));
    }

    #[test]
    fn activating_unknown_id_fails() {
        let catalog = FileCatalog::from_entries("/nowhere", Vec::new());
        let mut activator = PathActivator::new(&catalog, Vec::new());
        let err = activator
            .activate(&Candidate::new("a.txt", "a.txt"))
            .expect_err("unknown");
        assert_eq!(err.code(), "NOT_FOUND");
    }
}
