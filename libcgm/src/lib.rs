//! CGM outline parser.
//!
//! A CGM document declares its own delimiter characters on its first line and
//! expresses structure purely through indentation. Every non-blank body line
//! becomes one node of a [`Document`] tree.
//!
//! # Parsing Pipeline
//!
//! 1. **Header**: decodes the delimiter table and checks the `cgm1` magic.
//!
//! 2. **Scanners**: per body line, measure the leading whitespace (tabs round
//!    up to the next tab stop) and take the remaining bytes as literal text.
//!
//! 3. **Tree builder**: compares each line's indent with a stack of open levels
//!    to decide which node the line is appended under.
//!
//! Parsing is strict: the first malformed byte or unmatched dedent aborts the
//! parse with a [`ParseError`] carrying the line number.

mod builder;
mod encode;
mod error;
mod header;
mod scanner;
pub mod source;
mod tree;
pub mod utf8;

use log::debug;

pub use encode::{encode, encode_cgm_bytes, Format, NAMESPACE};
pub use error::{DecodeError, ErrorKind, ParseError, Result};
pub use header::{Role, SpecialTable};
pub use source::Source;
pub use tree::{Descendants, Document, Node, NodeId};

/// Default distance between tab stops.
pub const TAB_WIDTH: usize = 8;

/// Settings for a single parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Input name used in error messages.
    pub filename: Option<String>,
    /// Columns per tab stop; zero is treated as one.
    pub tab_width: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            filename: None,
            tab_width: TAB_WIDTH,
        }
    }
}

impl ParseOptions {
    /// Default options reporting errors against `filename`.
    pub fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(String::from),
            ..Self::default()
        }
    }
}

/// Parse a CGM document from a byte buffer.
///
/// # Example
///
/// ```
/// use libcgm::parse;
///
/// let doc = parse("<cgm1|\\#>\nparent\n  child\n".as_bytes()).unwrap();
/// let parent = doc.children(doc.root())[0];
/// assert_eq!(doc[parent].text(), Some("parent"));
/// assert_eq!(doc.children(parent).len(), 1);
/// ```
pub fn parse(input: &[u8]) -> Result<Document> {
    parse_with_options(input, &ParseOptions::default())
}

/// Parse a CGM document with a filename for error messages.
pub fn parse_with_filename(input: &[u8], filename: Option<&str>) -> Result<Document> {
    parse_with_options(input, &ParseOptions::new(filename))
}

/// Parse a CGM document with explicit options.
pub fn parse_with_options(input: &[u8], options: &ParseOptions) -> Result<Document> {
    let filename = options.filename.as_deref();
    let located = |err: ParseError| err.with_filename(filename);

    // Phase 1: Read the delimiter table
    let mut pos = 0;
    let specials = header::parse_header(input, &mut pos).map_err(located)?;
    debug!(
        "header: element {:?}..{:?}, separator {:?}, escape {:?}, preformatted {:?}",
        char::from_u32(specials[Role::ElementStart]),
        char::from_u32(specials[Role::ElementEnd]),
        char::from_u32(specials[Role::InlineSeparator]),
        char::from_u32(specials[Role::Escape]),
        char::from_u32(specials[Role::Preformatted]),
    );

    // Phase 2: Scan body lines into the tree
    let mut ctx = scanner::ParserContext::new(input, pos, specials, options.tab_width);
    let mut doc = Document::new(specials);
    builder::build(&mut ctx, &mut doc).map_err(located)?;

    debug!(
        "parsed {} bytes into {} nodes over {} lines",
        ctx.pos(),
        doc.len(),
        ctx.line()
    );
    Ok(doc)
}
