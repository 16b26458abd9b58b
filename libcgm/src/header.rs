//! The self-describing header line.
//!
//! A CGM file names its own delimiters on the first line:
//!
//! ```text
//! <element-start> c g m 1 <inline-separator> <escape> <preformatted> <element-end> \n
//! ```
//!
//! Each field is a single scalar value of any encoded length. Newline, tab and
//! space are never read from the file.

use std::ops::Index;

use crate::error::{DecodeError, ErrorKind, ParseError, Result};
use crate::utf8::decode_scalar;

pub const NEWLINE: u32 = 0x0a;
pub const TAB: u32 = 0x09;
pub const SPACE: u32 = 0x20;

/// The magic token following the element-start field.
pub const MAGIC: [u32; 4] = [b'c' as u32, b'g' as u32, b'm' as u32, b'1' as u32];

/// Semantic role of a special scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    ElementStart,
    ElementEnd,
    Escape,
    InlineSeparator,
    Preformatted,
    Newline,
    Tab,
    Space,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::ElementStart,
        Role::ElementEnd,
        Role::Escape,
        Role::InlineSeparator,
        Role::Preformatted,
        Role::Newline,
        Role::Tab,
        Role::Space,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

/// Mapping from every [`Role`] to the scalar value a document binds it to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialTable {
    values: [u32; 8],
}

impl SpecialTable {
    /// Build a table from the file-defined roles; newline, tab and space take
    /// their fixed ASCII values.
    pub fn new(
        element_start: u32,
        inline_separator: u32,
        escape: u32,
        preformatted: u32,
        element_end: u32,
    ) -> Self {
        let mut values = [0; 8];
        values[Role::ElementStart.slot()] = element_start;
        values[Role::ElementEnd.slot()] = element_end;
        values[Role::Escape.slot()] = escape;
        values[Role::InlineSeparator.slot()] = inline_separator;
        values[Role::Preformatted.slot()] = preformatted;
        values[Role::Newline.slot()] = NEWLINE;
        values[Role::Tab.slot()] = TAB;
        values[Role::Space.slot()] = SPACE;
        Self { values }
    }

    pub fn get(&self, role: Role) -> u32 {
        self.values[role.slot()]
    }

    /// Whether `scalar` is the value bound to `role`.
    pub fn is(&self, role: Role, scalar: u32) -> bool {
        self.get(role) == scalar
    }
}

impl Index<Role> for SpecialTable {
    type Output = u32;

    fn index(&self, role: Role) -> &u32 {
        &self.values[role.slot()]
    }
}

/// Parse the header at `*pos`, leaving `*pos` on the first body byte.
///
/// All failures are reported on line 1.
pub fn parse_header(buf: &[u8], pos: &mut usize) -> Result<SpecialTable> {
    let mut next = || decode_scalar(buf, pos).map_err(header_error);

    let element_start = next()?;

    for expected in MAGIC {
        if next()? != expected {
            return Err(ParseError::new(ErrorKind::InvalidHeader, 1));
        }
    }

    let inline_separator = next()?;
    let escape = next()?;
    let preformatted = next()?;
    let element_end = next()?;

    if next()? != NEWLINE {
        return Err(ParseError::new(ErrorKind::HeaderGarbage, 1));
    }

    Ok(SpecialTable::new(
        element_start,
        inline_separator,
        escape,
        preformatted,
        element_end,
    ))
}

fn header_error(err: DecodeError) -> ParseError {
    ParseError::new(ErrorKind::InvalidByte(err), 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(input: &str) -> Result<(SpecialTable, usize)> {
        let mut pos = 0;
        parse_header(input.as_bytes(), &mut pos).map(|t| (t, pos))
    }

    #[test]
    fn test_multibyte_specials() {
        let (table, pos) = header("☺cgm1|\\#☻\nbody").unwrap();
        assert_eq!(table[Role::ElementStart], '☺' as u32);
        assert_eq!(table[Role::InlineSeparator], '|' as u32);
        assert_eq!(table[Role::Escape], '\\' as u32);
        assert_eq!(table[Role::Preformatted], '#' as u32);
        assert_eq!(table[Role::ElementEnd], '☻' as u32);
        assert_eq!(table[Role::Newline], NEWLINE);
        assert_eq!(table[Role::Tab], TAB);
        assert_eq!(table[Role::Space], SPACE);
        assert_eq!(pos, "☺cgm1|\\#☻\n".len());
        for role in Role::ALL {
            assert_eq!(table.get(role), table[role]);
        }
    }

    #[test]
    fn test_roles_have_distinct_slots() {
        let table = SpecialTable::new(1, 2, 3, 4, 5);
        let mut values: Vec<u32> = Role::ALL.iter().map(|&role| table[role]).collect();
        values.sort_unstable();
        assert_eq!(values, vec![1, 2, 3, 4, 5, TAB, NEWLINE, SPACE]);
    }

    #[test]
    fn test_ascii_specials() {
        let (table, _) = header("<cgm1|\\#>\n").unwrap();
        assert!(table.is(Role::ElementStart, '<' as u32));
        assert!(table.is(Role::ElementEnd, '>' as u32));
    }

    #[test]
    fn test_wrong_magic() {
        let err = header("Xcgn1|\\#>\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidHeader);
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn test_garbage_before_newline() {
        let err = header("<cgm1|\\#>x\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HeaderGarbage);
    }

    #[test]
    fn test_missing_newline() {
        let err = header("<cgm1|\\#>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidByte(DecodeError::NoData));
    }

    #[test]
    fn test_bad_byte_in_header() {
        let mut pos = 0;
        let err = parse_header(b"\xffcgm1|\\#>\n", &mut pos).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidByte(DecodeError::InvalidByte));

        let mut pos = 0;
        let err = parse_header(b"<cgm1|\\#\xe2\x98", &mut pos).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidByte(DecodeError::TruncatedByte));
    }
}
