//! CBOR transcoding: render a CGM document as CBOR binary data.
//!
//! Mapping from CGM to CBOR:
//!   - document     -> array of line records (determinate length)
//!   - line record  -> map with text key "text" and, if non-empty, "children"
//!   - UTF-8 text   -> CBOR text string
//!   - other bytes  -> CBOR byte string
//!
//! [`diagnostic`] renders the same structure in RFC 8949 diagnostic notation.

use ciborium::value::Value as CborValue;
use libcgm::{Document, NodeId};

use super::check_depth;

// ---------------------------------------------------------------------------
// Encode (CGM -> CBOR)
// ---------------------------------------------------------------------------

/// Encode a CGM document as CBOR bytes.
pub fn encode(doc: &Document) -> Result<Vec<u8>, String> {
    check_depth(doc, "CBOR")?;
    let value = lines_to_cbor(doc, doc.root());
    let mut buf = Vec::new();
    ciborium::ser::into_writer(&value, &mut buf)
        .map_err(|e| format!("CBOR encode error: {}", e))?;
    Ok(buf)
}

fn lines_to_cbor(doc: &Document, parent: NodeId) -> CborValue {
    CborValue::Array(
        doc.children(parent)
            .iter()
            .map(|&id| line_to_cbor(doc, id))
            .collect(),
    )
}

fn line_to_cbor(doc: &Document, id: NodeId) -> CborValue {
    let content = doc[id].content();
    let text = match std::str::from_utf8(content) {
        Ok(s) => CborValue::Text(s.to_string()),
        Err(_) => CborValue::Bytes(content.to_vec()),
    };
    let mut pairs = vec![(CborValue::Text("text".to_string()), text)];
    if !doc.children(id).is_empty() {
        pairs.push((
            CborValue::Text("children".to_string()),
            lines_to_cbor(doc, id),
        ));
    }
    CborValue::Map(pairs)
}

// ---------------------------------------------------------------------------
// Diagnostic Notation (RFC 8949 §8)
// ---------------------------------------------------------------------------

/// Render the CBOR form of a CGM document as diagnostic notation.
///
/// Each array and map is opened on its own line and its items indented by
/// two spaces, the layout [`encode`]'s output would decode to.
pub fn diagnostic(doc: &Document) -> Result<String, String> {
    check_depth(doc, "CBOR")?;
    let mut out = String::new();
    diag_lines(&mut out, doc, doc.root(), 0);
    out.push('\n');
    Ok(out)
}

fn diag_lines(out: &mut String, doc: &Document, parent: NodeId, indent: usize) {
    let children = doc.children(parent);
    if children.is_empty() {
        out.push_str("[]");
        return;
    }
    out.push_str("[\n");
    for (i, &id) in children.iter().enumerate() {
        push_indent(out, indent + 2);
        diag_line(out, doc, id, indent + 2);
        if i < children.len() - 1 {
            out.push(',');
        }
        out.push('\n');
    }
    push_indent(out, indent);
    out.push(']');
}

fn diag_line(out: &mut String, doc: &Document, id: NodeId, indent: usize) {
    out.push_str("{\n");
    push_indent(out, indent + 2);
    out.push_str("\"text\": ");
    let content = doc[id].content();
    match std::str::from_utf8(content) {
        Ok(s) => diag_text(out, s),
        Err(_) => {
            out.push_str("h'");
            for byte in content {
                out.push_str(&format!("{:02x}", byte));
            }
            out.push('\'');
        }
    }
    if !doc.children(id).is_empty() {
        out.push_str(",\n");
        push_indent(out, indent + 2);
        out.push_str("\"children\": ");
        diag_lines(out, doc, id, indent + 2);
    }
    out.push('\n');
    push_indent(out, indent);
    out.push('}');
}

fn diag_text(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn push_indent(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push(' ');
    }
}
