//! Walks the target path and collects deletion candidates.

use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::criteria::Criteria;
use crate::filters::{age_matches, name_matches, size_matches};

/// What a candidate is, judged by following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::File => f.write_str("file"),
            EntryKind::Directory => f.write_str("directory"),
        }
    }
}

/// A filesystem entry eligible for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl Candidate {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Candidate {
            path: path.into(),
            kind: EntryKind::File,
        }
    }

    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Candidate {
            path: path.into(),
            kind: EntryKind::Directory,
        }
    }
}

/// File and directory candidates of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidates {
    pub files: Vec<Candidate>,
    pub dirs: Vec<Candidate>,
}

impl Candidates {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty()
    }

    /// Files ascending; directories ascending with `force`, otherwise
    /// descending so nested directories come before their parents.
    pub fn sort(&mut self, force: bool) {
        self.files.sort_by(by_path);
        if force {
            self.dirs.sort_by(by_path);
        } else {
            self.dirs.sort_by(|a, b| by_path(b, a));
        }
    }
}

// Byte-wise comparison of the whole path, not component-wise.
fn by_path(a: &Candidate, b: &Candidate) -> Ordering {
    a.path.as_os_str().cmp(b.path.as_os_str())
}

/// Collect the sorted candidates under `root`.
///
/// A directory root is walked top-down, one level or the whole tree depending
/// on `recurse`; a file root is judged on its own; anything else yields no
/// candidates.
pub fn select(root: &Path, criteria: &Criteria) -> Candidates {
    let mut candidates = Candidates::default();

    match fs::metadata(root) {
        Ok(metadata) if metadata.is_dir() => walk_directory(root, criteria, &mut candidates),
        Ok(metadata) if metadata.is_file() => {
            let path = normalize_path(root);
            let name = file_name(&path);
            if file_passes(&path, &name, criteria) {
                candidates.files.push(Candidate::file(path));
            }
        }
        Ok(_) => log::debug!("{} is neither a file nor a directory", root.display()),
        Err(err) => log::debug!("Nothing to tidy at {}: {}", root.display(), err),
    }

    candidates.sort(criteria.force());
    candidates
}

fn walk_directory(root: &Path, criteria: &Criteria, candidates: &mut Candidates) {
    let max_depth = if criteria.recurse() { usize::MAX } else { 1 };

    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(false);

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("Failed to access entry under {}: {}", root.display(), err);
                continue;
            }
        };

        let path = normalize_path(entry.path());
        let name = entry.file_name().to_string_lossy();

        // Symlinks are classified by their target, like the entries they point at.
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(err) => {
                log::debug!("Skipping {}: {}", path.display(), err);
                continue;
            }
        };

        if metadata.is_dir() {
            if dir_passes(&path, &name, criteria) {
                log::debug!("Directory candidate: {}", path.display());
                candidates.dirs.push(Candidate::directory(path));
            }
        } else if metadata.is_file() && file_passes(&path, &name, criteria) {
            log::debug!("File candidate: {}", path.display());
            candidates.files.push(Candidate::file(path));
        }
    }
}

fn dir_passes(path: &Path, name: &str, criteria: &Criteria) -> bool {
    criteria.rmdirs()
        && name_matches(name, criteria.patterns())
        && age_matches(path, criteria.age_seconds(), criteria.timestamp())
}

fn file_passes(path: &Path, name: &str, criteria: &Criteria) -> bool {
    name_matches(name, criteria.patterns())
        && age_matches(path, criteria.age_seconds(), criteria.timestamp())
        && size_matches(path, criteria.size_bytes())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Lexically normalize a path: drop `.`, collapse `name/..` and repeated
/// separators. The filesystem is not consulted.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }

    if parts.is_empty() {
        PathBuf::from(".")
    } else {
        parts.iter().collect()
    }
}
