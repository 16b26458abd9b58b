//! Encode CGM documents to output formats.
//!
//! XML follows the layout of the original `cgm2dom` tool: a `cgm` root element
//! in the CGM namespace, one `line` element per node, top-level lines on their
//! own indented lines and mixed content written without extra whitespace.

use crate::header::{Role, NEWLINE, SPACE};
use crate::tree::Document;
use crate::utf8::encode_scalar;

/// Namespace of the XML root element.
pub const NAMESPACE: &str = "http://codegrove.org/2009/cgm";

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Spaces per depth level in canonical CGM output.
const CGM_INDENT: usize = 2;

/// Output format for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// XML tree (default output of `cgm2dom`)
    Xml,
    /// CGM with the document's own header and two-space indentation
    Cgm,
}

/// Encode a document to a string in the specified format.
///
/// CGM output is lossy for content that is not valid UTF-8; use
/// [`encode_cgm_bytes`] to keep such bytes intact.
pub fn encode(doc: &Document, format: Format) -> String {
    match format {
        Format::Xml => encode_xml(doc),
        Format::Cgm => String::from_utf8_lossy(&encode_cgm_bytes(doc)).into_owned(),
    }
}

// =============================================================================
// XML Encoder
// =============================================================================

fn encode_xml(doc: &Document) -> String {
    let mut out = String::from(XML_DECLARATION);

    if doc.is_empty() {
        out.push_str(&format!("<cgm xmlns=\"{}\"/>\n", NAMESPACE));
        return out;
    }

    out.push_str(&format!("<cgm xmlns=\"{}\">\n", NAMESPACE));

    // Depths of the currently open <line> elements.
    let mut open: Vec<usize> = Vec::new();
    for (depth, id) in doc.descendants() {
        close_lines(&mut out, &mut open, depth);
        if depth == 1 {
            out.push_str("  ");
        }
        out.push_str("<line>");
        push_text(&mut out, &doc[id].text_lossy());
        open.push(depth);
    }
    close_lines(&mut out, &mut open, 1);

    out.push_str("</cgm>\n");
    out
}

/// Escape markup characters, and carriage returns so XML readers keep them.
fn push_text(out: &mut String, text: &str) {
    let escaped = html_escape::encode_text(text);
    if escaped.contains('\r') {
        out.push_str(&escaped.replace('\r', "&#13;"));
    } else {
        out.push_str(&escaped);
    }
}

/// Close open elements at `depth` or deeper. A closed top-level element ends
/// its output line.
fn close_lines(out: &mut String, open: &mut Vec<usize>, depth: usize) {
    while let Some(&d) = open.last() {
        if d < depth {
            break;
        }
        open.pop();
        out.push_str("</line>");
        if d == 1 {
            out.push('\n');
        }
    }
}

// =============================================================================
// CGM Encoder
// =============================================================================

/// Re-encode a document as CGM bytes.
///
/// The header repeats the document's special table; each node is written on
/// its own line, indented two spaces per level below the top.
pub fn encode_cgm_bytes(doc: &Document) -> Vec<u8> {
    let specials = doc.specials();
    let mut out = Vec::new();

    push_scalar(&mut out, specials[Role::ElementStart]);
    out.extend_from_slice(b"cgm1");
    for role in [
        Role::InlineSeparator,
        Role::Escape,
        Role::Preformatted,
        Role::ElementEnd,
    ] {
        push_scalar(&mut out, specials[role]);
    }
    push_scalar(&mut out, NEWLINE);

    for (depth, id) in doc.descendants() {
        for _ in 0..(depth - 1) * CGM_INDENT {
            push_scalar(&mut out, SPACE);
        }
        out.extend_from_slice(doc[id].content());
        push_scalar(&mut out, NEWLINE);
    }

    out
}

fn push_scalar(out: &mut Vec<u8>, value: u32) {
    if encode_scalar(value, out).is_none() {
        // Only reachable for hand-built tables; decoded values always fit.
        encode_scalar(char::REPLACEMENT_CHARACTER as u32, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "☺cgm1|\\#☻\n";

    fn doc(body: &str) -> Document {
        parse(format!("{}{}", HEADER, body).as_bytes()).unwrap()
    }

    #[test]
    fn test_xml_nested() {
        let xml = encode(&doc("a\n  b\n    c\n  d\ne\n"), Format::Xml);
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <cgm xmlns=\"http://codegrove.org/2009/cgm\">\n  \
             <line>a<line>b<line>c</line></line><line>d</line></line>\n  \
             <line>e</line>\n\
             </cgm>\n"
        );
    }

    #[test]
    fn test_xml_empty() {
        assert_eq!(
            encode(&doc(""), Format::Xml),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <cgm xmlns=\"http://codegrove.org/2009/cgm\"/>\n"
        );
    }

    #[test]
    fn test_xml_escapes_text() {
        let xml = encode(&doc("a < b & c > d\n"), Format::Xml);
        assert!(xml.contains("<line>a &lt; b &amp; c &gt; d</line>"));
    }

    #[test]
    fn test_xml_keeps_carriage_return() {
        let xml = encode(&doc("a\r\n  b\rc\n"), Format::Xml);
        assert!(xml.contains("<line>a&#13;<line>b&#13;c</line></line>"));
        assert!(!xml.contains('\r'));
    }

    #[test]
    fn test_cgm_canonical_indent() {
        let cgm = encode(&doc("a\n\tb\n\t\tc\n\td\n"), Format::Cgm);
        assert_eq!(cgm, format!("{}a\n  b\n    c\n  d\n", HEADER));
    }

    #[test]
    fn test_cgm_reparses_to_same_tree() {
        let original = doc("x\n      y\n          z\n\n      w\nv\n");
        let again = parse(&encode_cgm_bytes(&original)).unwrap();
        let shape = |d: &Document| -> Vec<(usize, Vec<u8>)> {
            d.descendants()
                .map(|(depth, id)| (depth, d[id].content().to_vec()))
                .collect()
        };
        assert_eq!(shape(&original), shape(&again));
        assert_eq!(original.specials(), again.specials());
    }

    #[test]
    fn test_cgm_keeps_raw_bytes() {
        let mut input = HEADER.as_bytes().to_vec();
        input.extend_from_slice(b"\xed\xa0\x80\n");
        let bytes = encode_cgm_bytes(&parse(&input).unwrap());
        assert_eq!(bytes, input);
    }
}
