//! Domain layer: the tree model and its text renderer
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod node;
pub mod render;

pub use node::Tree;
pub use render::{render, TreeItem};
