//! Tree formats other than XML and CGM.
//!
//! Each encoder writes the document as a list of line records, where a record
//! carries the line's `text` and, when it has any, its `children`. These
//! encoders build nested values, so they refuse documents nested deeper than
//! [`MAX_DEPTH`]; XML and CGM output have no such limit.

use libcgm::Document;

pub mod cbor;
pub mod toml;
pub mod yaml;

/// Deepest outline the nested formats will render.
pub const MAX_DEPTH: usize = 256;

/// Fail with a message naming `format` when `doc` is nested past [`MAX_DEPTH`].
pub fn check_depth(doc: &Document, format: &str) -> Result<(), String> {
    let depth = doc.max_depth();
    if depth > MAX_DEPTH {
        return Err(format!(
            "{} output supports at most {} levels of nesting, document has {}",
            format, MAX_DEPTH, depth
        ));
    }
    Ok(())
}
