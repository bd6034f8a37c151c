//! HTML text and link extraction
//!
//! This module turns one HTML document into indexable data:
//! - Page title (from the <title> tag)
//! - Normalized plain-text body, with script/style content removed
//! - Raw href values of anchor elements, in document order
//!
//! Parsing is lenient and never fails; malformed input yields a best-effort
//! result with the `lossy` flag set so callers can log degraded fidelity.

mod html;

pub use html::{extract, extract_hrefs, Extraction};
