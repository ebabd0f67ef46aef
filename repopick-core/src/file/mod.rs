//! Read-only views over the working tree.
//!
//! ### tree.rs
//! Builds the ordered directory tree shown to callers. Version-control
//! metadata is never listed.
//!
//! ### resolver.rs
//! The only gate between caller-supplied relative paths and the filesystem.
//! Every read of a caller path goes through `resolve_safe`.
//!
//! ### bundle.rs
//! Concatenates a selection of files into one text blob.

pub mod bundle;
pub mod resolver;
pub mod tree;

pub use bundle::bundle;
pub use resolver::resolve_safe;
pub use tree::{build_tree, NodeKind, TreeNode};
