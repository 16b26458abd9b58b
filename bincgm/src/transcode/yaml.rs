//! YAML transcoding: render a CGM document as a YAML sequence.
//!
//! Mapping from CGM to YAML:
//!   - document     -> sequence of line records
//!   - line record  -> mapping with `text` and, if non-empty, `children`
//!   - UTF-8 text   -> YAML string
//!   - other bytes  -> YAML !!binary (base64-encoded)

use base64::prelude::*;
use libcgm::{Document, NodeId};

use super::check_depth;

/// Encode a CGM document as a YAML string.
pub fn encode(doc: &Document) -> Result<String, String> {
    check_depth(doc, "YAML")?;
    let yaml_value = lines_to_yaml(doc, doc.root());
    serde_yaml::to_string(&yaml_value).map_err(|e| format!("YAML encode error: {}", e))
}

fn lines_to_yaml(doc: &Document, parent: NodeId) -> serde_yaml::Value {
    let items = doc
        .children(parent)
        .iter()
        .map(|&id| line_to_yaml(doc, id))
        .collect();
    serde_yaml::Value::Sequence(items)
}

fn line_to_yaml(doc: &Document, id: NodeId) -> serde_yaml::Value {
    let mut map = serde_yaml::Mapping::new();
    map.insert(
        serde_yaml::Value::String("text".to_string()),
        text_to_yaml(doc[id].content()),
    );
    if !doc.children(id).is_empty() {
        map.insert(
            serde_yaml::Value::String("children".to_string()),
            lines_to_yaml(doc, id),
        );
    }
    serde_yaml::Value::Mapping(map)
}

fn text_to_yaml(content: &[u8]) -> serde_yaml::Value {
    match std::str::from_utf8(content) {
        Ok(s) => serde_yaml::Value::String(s.to_string()),
        Err(_) => serde_yaml::Value::Tagged(Box::new(serde_yaml::value::TaggedValue {
            tag: serde_yaml::value::Tag::new("!!binary"),
            value: serde_yaml::Value::String(BASE64_STANDARD.encode(content)),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcode::tests::deep;
    use libcgm::parse;

    #[test]
    fn test_encode_nested() {
        let doc = parse("<cgm1|\\#>\na\n  b\nc\n".as_bytes()).unwrap();
        let yaml = encode(&doc).unwrap();
        let back: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back[0]["text"].as_str(), Some("a"));
        assert_eq!(back[0]["children"][0]["text"].as_str(), Some("b"));
        assert_eq!(back[1]["text"].as_str(), Some("c"));
        assert!(back[1].get("children").is_none());
    }

    #[test]
    fn test_encode_empty() {
        let doc = parse("<cgm1|\\#>\n".as_bytes()).unwrap();
        assert_eq!(encode(&doc).unwrap(), "[]\n");
    }

    #[test]
    fn test_non_utf8_is_binary() {
        let doc = parse(b"<cgm1|\\#>\n\xed\xa0\x80\n").unwrap();
        let yaml = encode(&doc).unwrap();
        assert!(yaml.contains("!!binary"));
        assert!(yaml.contains(&BASE64_STANDARD.encode(b"\xed\xa0\x80")));
    }

    #[test]
    fn test_deep_documents() {
        let yaml = encode(&deep(200)).unwrap();
        assert_eq!(yaml.matches("text: x").count(), 200);
        assert!(encode(&deep(10_000)).is_err());
    }
}
