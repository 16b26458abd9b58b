//! TOML transcoding: render a CGM document as nested arrays of tables.
//!
//! TOML requires a table at the top, so the document's lines are stored under
//! the key `line`, and each line's children under its own `line` key:
//!
//! ```toml
//! [[line]]
//! text = "parent"
//!
//! [[line.line]]
//! text = "child"
//! ```
//!
//! TOML strings must be valid UTF-8 and TOML has no binary type, so a line
//! with other bytes is an error.

use libcgm::{Document, NodeId};

use super::check_depth;

/// Key holding a list of line tables.
const LINE_KEY: &str = "line";

/// Encode a CGM document as a TOML string.
pub fn encode(doc: &Document) -> Result<String, String> {
    check_depth(doc, "TOML")?;
    let mut toml_doc = toml_edit::DocumentMut::new();
    if let Some(lines) = lines_to_toml(doc, doc.root())? {
        toml_doc[LINE_KEY] = lines;
    }
    Ok(toml_doc.to_string())
}

fn lines_to_toml(doc: &Document, parent: NodeId) -> Result<Option<toml_edit::Item>, String> {
    let children = doc.children(parent);
    if children.is_empty() {
        return Ok(None);
    }
    let mut tables = toml_edit::ArrayOfTables::new();
    for &id in children {
        tables.push(line_to_toml(doc, id)?);
    }
    Ok(Some(toml_edit::Item::ArrayOfTables(tables)))
}

fn line_to_toml(doc: &Document, id: NodeId) -> Result<toml_edit::Table, String> {
    let node = &doc[id];
    let text = node.text().ok_or_else(|| {
        format!(
            "Line {} is not valid UTF-8; TOML has no binary data type",
            node.line()
        )
    })?;
    let mut table = toml_edit::Table::new();
    table.insert("text", toml_edit::value(text));
    if let Some(lines) = lines_to_toml(doc, id)? {
        table.insert(LINE_KEY, lines);
    }
    Ok(table)
}
