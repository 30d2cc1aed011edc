//! Render labeled trees as box-drawing text.
//!
//! ```
//! use boxtree::Tree;
//!
//! let mut artist = Tree::new("Pantera");
//! artist.add_child("Far Beyond Driven").add_child("5 minutes Alone");
//! artist.add_child("Power Metal");
//!
//! assert_eq!(
//!     artist.render(),
//!     "Pantera\n├── Far Beyond Driven\n│   └── 5 minutes Alone\n└── Power Metal\n"
//! );
//! ```
//!
//! The [`application`] layer builds trees from directories, [`cli`] wires
//! everything into the `boxtree` binary.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{render, Tree, TreeItem};
