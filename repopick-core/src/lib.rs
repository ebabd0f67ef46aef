//! Browse a local repository as a tree, bundle selected files into one text
//! blob, and fast-forward the working tree from its remote.

pub mod error;
pub mod file;
pub mod process;
pub mod repo;
pub mod settings;
pub mod update;

pub use error::{FailureReason, RepoError, UpdateFailure};
pub use file::{build_tree, bundle, resolve_safe, NodeKind, TreeNode};
pub use repo::{list_branches, RepoRoot, RootResolver};
pub use settings::{Settings, SettingsManager};
pub use update::{run_steps, validate_branch, UpdateLog, UpdateOrchestrator, UpdateStep};
