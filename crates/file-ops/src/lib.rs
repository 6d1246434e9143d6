//! Directory tree enumeration and recursive deletion.
//!
//! Walks are depth-bounded, pre-order, and tolerate single bad entries;
//! deletion removes children before their parent directory.

mod browse;
mod delete;

pub use browse::{list, list_paths, FileInfo};
pub use delete::delete_recursive;
