//! Directory scanner: builds a [`Tree`] from a filesystem walk.

use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use walkdir::{DirEntry, WalkDir};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::Tree;
use crate::util::path::expand_tilde;

/// Order of entries within one directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Byte-wise by file name
    #[default]
    Name,
    /// Whatever order the filesystem returns
    #[serde(rename = "none")]
    #[value(name = "none")]
    Unsorted,
}

/// What to do when an entry cannot be read during the walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log a warning and leave the entry out
    #[default]
    Skip,
    /// Keep an entry in the tree that carries the error text
    Placeholder,
    /// Abort the scan
    Fail,
}

/// Knobs for a single scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    pub show_hidden: bool,
    /// Levels below the root to descend; `None` is unlimited
    pub max_depth: Option<usize>,
    pub sort: SortOrder,
    pub dirs_first: bool,
    pub follow_links: bool,
    /// Append `/` to directory labels
    pub classify: bool,
    /// Regex patterns matched against entry names
    pub exclude: Vec<String>,
    pub on_error: ErrorPolicy,
}

/// Tree built from a directory plus what went into it.
#[derive(Debug)]
pub struct ScanReport {
    pub tree: Tree,
    /// Directories below the root
    pub directories: usize,
    pub files: usize,
    /// Walk errors encountered (skipped or turned into placeholders)
    pub errors: usize,
}

impl ScanReport {
    /// `tree`-style footer, e.g. `2 directories, 1 file`.
    pub fn summary(&self) -> String {
        format!(
            "{} {}, {} {}",
            self.directories,
            if self.directories == 1 { "directory" } else { "directories" },
            self.files,
            if self.files == 1 { "file" } else { "files" },
        )
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.tree, self.summary())
    }
}

/// Node still receiving children while the walk is inside it.
struct OpenNode {
    path: PathBuf,
    tree: Tree,
}

/// Builds trees from directories.
///
/// Entries are added in walk order, so the display order is decided here
/// (sorting, grouping) and the tree itself stays insertion-ordered.
#[derive(Debug)]
pub struct DirectoryScanner {
    options: ScanOptions,
    exclude: Vec<Regex>,
}

impl DirectoryScanner {
    /// Compiles the exclude patterns of `options`.
    ///
    /// A leading `~` in a pattern is expanded to the home directory.
    pub fn new(options: ScanOptions) -> ApplicationResult<Self> {
        let exclude = options
            .exclude
            .iter()
            .map(|pattern| {
                Regex::new(&expand_tilde(pattern)).map_err(|source| {
                    ApplicationError::InvalidPattern {
                        pattern: pattern.clone(),
                        source,
                    }
                })
            })
            .collect::<ApplicationResult<Vec<_>>>()?;

        Ok(Self { options, exclude })
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Walks `root` and returns its tree.
    ///
    /// The root label is `root` as given; every other label is the entry's
    /// file name. A root that is a plain file yields a single-node tree.
    #[instrument(level = "debug", skip(self))]
    pub fn scan(&self, root: &Path) -> ApplicationResult<ScanReport> {
        if !root.exists() {
            return Err(ApplicationError::NotFound(root.to_path_buf()));
        }

        let mut stack = vec![OpenNode {
            path: root.to_path_buf(),
            tree: Tree::new(root.display().to_string()),
        }];
        let mut directories = 0;
        let mut files = 0;
        let mut errors = 0;

        let walker = self
            .walker(root)
            .into_iter()
            .filter_entry(|entry| self.is_visible(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    errors += 1;
                    self.handle_error(err, root, &mut stack)?;
                    continue;
                }
            };
            if entry.depth() == 0 {
                continue;
            }

            close_until(&mut stack, entry.path().parent());

            let is_dir = entry.file_type().is_dir();
            if is_dir {
                directories += 1;
            } else {
                files += 1;
            }
            stack.push(OpenNode {
                path: entry.path().to_path_buf(),
                tree: Tree::new(self.label_for(&entry)),
            });
        }

        close_until(&mut stack, None);
        let tree = stack
            .pop()
            .map(|open| open.tree)
            .unwrap_or_else(|| Tree::new(root.display().to_string()));

        debug!(directories, files, errors, "scan complete");
        Ok(ScanReport {
            tree,
            directories,
            files,
            errors,
        })
    }

    fn walker(&self, root: &Path) -> WalkDir {
        let mut walker = WalkDir::new(root).follow_links(self.options.follow_links);
        if let Some(depth) = self.options.max_depth {
            walker = walker.max_depth(depth);
        }

        let sort = self.options.sort;
        let dirs_first = self.options.dirs_first;
        if sort != SortOrder::Unsorted || dirs_first {
            walker = walker.sort_by(move |a, b| compare_entries(a, b, sort, dirs_first));
        }
        walker
    }

    fn is_visible(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        if !self.options.show_hidden && name.starts_with('.') {
            return false;
        }
        !self.exclude.iter().any(|re| re.is_match(&name))
    }

    fn label_for(&self, entry: &DirEntry) -> String {
        let mut label = entry.file_name().to_string_lossy().into_owned();
        if self.options.classify && entry.file_type().is_dir() {
            label.push('/');
        }
        label
    }

    fn handle_error(
        &self,
        err: walkdir::Error,
        root: &Path,
        stack: &mut Vec<OpenNode>,
    ) -> ApplicationResult<()> {
        let path = err.path().unwrap_or(root).to_path_buf();
        let reason = err
            .io_error()
            .map(|e| e.to_string())
            .unwrap_or_else(|| err.to_string());

        match self.options.on_error {
            ErrorPolicy::Fail => Err(ApplicationError::Walk { path, source: err }),
            ErrorPolicy::Skip => {
                warn!(path = %path.display(), %reason, "skipping unreadable entry");
                Ok(())
            }
            ErrorPolicy::Placeholder => {
                debug!(path = %path.display(), %reason, "inserting error placeholder");
                if stack.iter().any(|open| open.path == path) {
                    // The entry itself is in the tree already; its contents are not.
                    close_until(stack, Some(&path));
                    if let Some(top) = stack.last_mut() {
                        top.tree.add_child(format!("[error: {}]", reason));
                    }
                } else {
                    close_until(stack, path.parent());
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string());
                    if let Some(top) = stack.last_mut() {
                        top.tree.add_child(format!("{} [error: {}]", name, reason));
                    }
                }
                Ok(())
            }
        }
    }
}

/// Attaches finished nodes to their parents until `parent` is on top.
///
/// `None` collapses everything into the root.
fn close_until(stack: &mut Vec<OpenNode>, parent: Option<&Path>) {
    while stack.len() > 1 {
        if let (Some(parent), Some(top)) = (parent, stack.last()) {
            if top.path == parent {
                break;
            }
        }
        if let Some(done) = stack.pop() {
            if let Some(top) = stack.last_mut() {
                top.tree.attach(Some(done.tree));
            }
        }
    }
}

fn compare_entries(a: &DirEntry, b: &DirEntry, sort: SortOrder, dirs_first: bool) -> Ordering {
    let group = if dirs_first {
        b.file_type().is_dir().cmp(&a.file_type().is_dir())
    } else {
        Ordering::Equal
    };
    group.then_with(|| match sort {
        SortOrder::Name => a.file_name().cmp(b.file_name()),
        SortOrder::Unsorted => Ordering::Equal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_counts_when_summary_then_pluralizes() {
        let report = ScanReport {
            tree: Tree::new("."),
            directories: 1,
            files: 2,
            errors: 0,
        };
        assert_eq!(report.summary(), "1 directory, 2 files");
    }

    #[test]
    fn given_bad_pattern_when_new_then_invalid_pattern_error() {
        let options = ScanOptions {
            exclude: vec!["(".to_string()],
            ..Default::default()
        };
        let err = DirectoryScanner::new(options).unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidPattern { ref pattern, .. } if pattern == "("));
    }

    #[test]
    fn given_dollar_in_pattern_when_new_then_not_env_expanded() {
        let options = ScanOptions {
            exclude: vec!["^a$HOME".to_string()],
            ..Default::default()
        };
        let scanner = DirectoryScanner::new(options).unwrap();
        assert_eq!(scanner.exclude[0].as_str(), "^a$HOME");
    }

    #[test]
    fn given_nested_open_nodes_when_close_all_then_collapses_into_root() {
        let mut stack = vec![
            OpenNode {
                path: PathBuf::from("r"),
                tree: Tree::new("r"),
            },
            OpenNode {
                path: PathBuf::from("r/a"),
                tree: Tree::new("a"),
            },
            OpenNode {
                path: PathBuf::from("r/a/b"),
                tree: Tree::new("b"),
            },
        ];
        close_until(&mut stack, Some(Path::new("r/a")));
        assert_eq!(stack.len(), 2);

        close_until(&mut stack, None);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack[0].tree.render(), "r\n└── a\n    └── b\n");
    }
}
