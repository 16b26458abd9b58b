//! Per-line scanners over the document body.
//!
//! Both scanners work on a [`ParserContext`], which owns the cursor, the line
//! counter and the document's special table for the duration of one parse.

use log::trace;

use crate::error::{DecodeError, ErrorKind, ParseError, Result};
use crate::header::{Role, SpecialTable};
use crate::utf8::decode_scalar;

/// Cursor state shared by the scanners and the tree builder.
#[derive(Debug)]
pub struct ParserContext<'a> {
    input: &'a [u8],
    pos: usize,
    line: usize,
    specials: SpecialTable,
    tab_width: usize,
}

impl<'a> ParserContext<'a> {
    /// Start scanning `input` at `pos`, the first body byte, on body line 1.
    pub fn new(input: &'a [u8], pos: usize, specials: SpecialTable, tab_width: usize) -> Self {
        Self {
            input,
            pos,
            line: 1,
            specials,
            tab_width: tab_width.max(1),
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// An error of `kind` on the current line.
    pub fn error(&self, kind: ErrorKind) -> ParseError {
        ParseError::new(kind, self.line)
    }

    fn next_scalar(&mut self) -> std::result::Result<u32, DecodeError> {
        decode_scalar(self.input, &mut self.pos)
    }

    fn is(&self, role: Role, scalar: u32) -> bool {
        self.specials.is(role, scalar)
    }
}

/// Outcome of scanning a line's leading whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    /// Only whitespace up to a newline or the end of input.
    Blank,
    /// Column-equivalent of the whitespace before the first content scalar.
    Measure(usize),
}

/// Consume leading spaces and tabs.
///
/// On a content scalar the cursor is rewound to just before it. On a blank
/// line the newline, if any, is consumed.
pub fn scan_indent(ctx: &mut ParserContext<'_>) -> Result<Indent> {
    let mut indent = 0;
    loop {
        let start = ctx.pos;
        let scalar = match ctx.next_scalar() {
            Ok(scalar) => scalar,
            Err(DecodeError::NoData) => return Ok(Indent::Blank),
            Err(err) => return Err(ctx.error(err.into())),
        };

        if ctx.is(Role::Space, scalar) {
            indent += 1;
        } else if ctx.is(Role::Tab, scalar) {
            indent += ctx.tab_width - indent % ctx.tab_width;
        } else if ctx.is(Role::Newline, scalar) {
            trace!("line {}: blank", ctx.line);
            ctx.line += 1;
            return Ok(Indent::Blank);
        } else {
            ctx.pos = start;
            return Ok(Indent::Measure(indent));
        }
    }
}

/// Consume the rest of the line and return its bytes, newline excluded.
///
/// The cursor is left on the newline (or at the end of input).
pub fn scan_text<'a>(ctx: &mut ParserContext<'a>) -> Result<&'a [u8]> {
    let input = ctx.input;
    let start = ctx.pos;
    let mut scratch = start;
    loop {
        let before = scratch;
        match decode_scalar(input, &mut scratch) {
            Ok(scalar) if ctx.is(Role::Newline, scalar) => {
                scratch = before;
                break;
            }
            Ok(_) => {}
            Err(DecodeError::NoData) => break,
            Err(err) => return Err(ctx.error(err.into())),
        }
    }
    ctx.pos = scratch;
    Ok(&input[start..scratch])
}

/// Consume the newline ending a content line. Running out of input instead is fine.
pub fn consume_newline(ctx: &mut ParserContext<'_>) -> Result<()> {
    match ctx.next_scalar() {
        Ok(_) => {
            ctx.line += 1;
            Ok(())
        }
        Err(DecodeError::NoData) => Ok(()),
        Err(err) => Err(ctx.error(err.into())),
    }
}
