use std::cmp::Ordering;
use std::path::Path;

use serde::Serialize;
use walkdir::{DirEntry, WalkDir};

use crate::repo::{RepoRoot, VCS_MARKER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    #[serde(rename = "file")]
    File,
    #[serde(rename = "dir")]
    Directory,
}

/// One entry of the repository tree. Directory children list files before
/// directories, each group sorted case-insensitively by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub name: String,
    /// Path relative to the repository root, `.` for the root itself
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Depth-first iterator over this node and all descendants.
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// Build the tree of everything under `root` except version-control
/// metadata.
///
/// Entries that cannot be read are skipped. Symlinks are followed while
/// their target stays inside the root. A symlinked directory pointing
/// outside the root, or back at a directory already being walked, is
/// emitted empty.
pub fn build_tree(root: &RepoRoot) -> TreeNode {
    let base = root.path();
    let canonical_base = base.canonicalize().unwrap_or_else(|_| base.to_path_buf());
    let name = base
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "/".to_string());

    let mut tree = TreeAssembler::new(TreeNode {
        name,
        path: ".".to_string(),
        kind: NodeKind::Directory,
        children: Vec::new(),
    });

    let mut walker = WalkDir::new(base)
        .follow_links(true)
        .min_depth(1)
        .sort_by(compare_entries)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_vcs_metadata(entry));

    while let Some(result) = walker.next() {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                if let (Some(ancestor), Some(path)) = (err.loop_ancestor(), err.path()) {
                    tracing::debug!(?path, ?ancestor, "Directory cycle, not descending");
                    tree.close_to(err.depth());
                    tree.attach(node(base, path, NodeKind::Directory));
                } else {
                    tracing::debug!(error = %err, "Skipping unreadable entry");
                }
                continue;
            }
        };

        tree.close_to(entry.depth());
        let path = entry.path();
        let is_dir = entry.file_type().is_dir();

        if entry.path_is_symlink() && !stays_inside(path, &canonical_base) {
            tracing::debug!(?path, "Symlink leaves the repository, not following");
            if is_dir {
                walker.skip_current_dir();
                tree.attach(node(base, path, NodeKind::Directory));
            }
            continue;
        }

        if is_dir {
            tree.open(node(base, path, NodeKind::Directory));
        } else {
            tree.attach(node(base, path, NodeKind::File));
        }
    }

    tree.finish()
}

fn is_vcs_metadata(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with(VCS_MARKER)
}

fn stays_inside(path: &Path, canonical_base: &Path) -> bool {
    path.canonicalize()
        .is_ok_and(|target| target.starts_with(canonical_base))
}

fn node(base: &Path, path: &Path, kind: NodeKind) -> TreeNode {
    TreeNode {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        path: path
            .strip_prefix(base)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string(),
        kind,
        children: Vec::new(),
    }
}

/// Builds nested nodes from a pre-order walk. `open[i]` is the directory
/// currently being filled at depth `i + 1`.
struct TreeAssembler {
    root: TreeNode,
    open: Vec<TreeNode>,
}

impl TreeAssembler {
    fn new(root: TreeNode) -> Self {
        Self {
            root,
            open: Vec::new(),
        }
    }

    fn parent(&mut self) -> &mut TreeNode {
        match self.open.last_mut() {
            Some(dir) => dir,
            None => &mut self.root,
        }
    }

    fn attach(&mut self, child: TreeNode) {
        self.parent().children.push(child);
    }

    fn open(&mut self, dir: TreeNode) {
        self.open.push(dir);
    }

    /// Close directories until the innermost open one is the parent of an
    /// entry at `depth`.
    fn close_to(&mut self, depth: usize) {
        while self.open.len() >= depth.max(1) {
            if let Some(done) = self.open.pop() {
                self.attach(done);
            }
        }
    }

    fn finish(mut self) -> TreeNode {
        self.close_to(1);
        self.root
    }
}

/// Files before directories, then case-insensitive name. The exact name
/// breaks ties so the order is total.
fn compare_entries(a: &DirEntry, b: &DirEntry) -> Ordering {
    let a_name = a.file_name().to_string_lossy();
    let b_name = b.file_name().to_string_lossy();
    sorts_as_dir(a)
        .cmp(&sorts_as_dir(b))
        .then_with(|| a_name.to_lowercase().cmp(&b_name.to_lowercase()))
        .then_with(|| a_name.cmp(&b_name))
}

/// Entries reach the comparator before links are resolved, so a symlinked
/// directory has to be looked up to sort with the directories.
fn sorts_as_dir(entry: &DirEntry) -> bool {
    if entry.path_is_symlink() {
        entry.path().is_dir()
    } else {
        entry.file_type().is_dir()
    }
}
