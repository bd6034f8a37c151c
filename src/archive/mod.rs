//! Archive path handling
//!
//! This module confines every caller-supplied path to the document root:
//! - Resolution of relative/absolute candidates against the root
//! - Rejection of traversal attempts that would escape the root
//! - Conversion of in-root paths to their canonical POSIX-style relative form

mod resolver;

pub use resolver::{relative_to_root, resolve};
