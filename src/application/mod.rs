//! Application layer: collaborators that produce trees from external sources
//!
//! This layer drives the domain model from the filesystem.

pub mod error;
pub mod error_ext;
pub mod scan;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use scan::{DirectoryScanner, ErrorPolicy, ScanOptions, ScanReport, SortOrder};
