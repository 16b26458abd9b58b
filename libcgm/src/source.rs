//! Byte buffers for the parser.
//!
//! Files are memory-mapped read-only; standard input and empty files are read
//! into an owned buffer instead.

use std::fs::File;
use std::io::{self, Read};
use std::ops::Deref;
use std::path::Path;

use log::debug;
use memmap2::Mmap;

use crate::error::{ErrorKind, ParseError, Result};

/// A read-only input buffer of known length.
#[derive(Debug)]
pub struct Source {
    backing: Backing,
}

#[derive(Debug)]
enum Backing {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Source {
    /// Open and map the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path.to_string_lossy();
        let open_error = |err: io::Error| {
            ParseError::io(ErrorKind::CannotOpen, err).with_filename(Some(name.as_ref()))
        };

        let file = File::open(path).map_err(open_error)?;
        let len = file.metadata().map_err(open_error)?.len();
        if len == 0 {
            debug!("{}: empty file", name);
            return Ok(Self::from_bytes(Vec::new()));
        }

        // SAFETY: the map is private and read-only. Truncating the file while
        // it is mapped is outside what this tool supports.
        let map = unsafe { Mmap::map(&file) }.map_err(open_error)?;
        debug!("{}: mapped {} bytes", name, map.len());
        Ok(Self {
            backing: Backing::Mapped(map),
        })
    }

    /// Read all of standard input.
    pub fn stdin() -> Result<Self> {
        let mut buf = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut buf)
            .map_err(|err| ParseError::io(ErrorKind::CannotOpen, err).with_filename(Some("-")))?;
        debug!("-: read {} bytes", buf.len());
        Ok(Self::from_bytes(buf))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            backing: Backing::Owned(bytes),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.backing {
            Backing::Mapped(map) => &map[..],
            Backing::Owned(bytes) => bytes.as_slice(),
        }
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self.backing, Backing::Mapped(_))
    }
}

impl Deref for Source {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}
