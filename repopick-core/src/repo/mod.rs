//! Locating the repository and querying its remote branches.

pub mod branches;
pub mod root;

pub use branches::list_branches;
pub use root::{RepoRoot, RootResolver, VCS_MARKER};
