//! Error types for CGM parsing.

use std::io;

use thiserror::Error;

/// Result type for CGM parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Why a single scalar value could not be decoded.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The cursor is at the end of the buffer.
    #[error("no data")]
    NoData,

    /// A lead byte with no UTF-8 meaning, or a continuation byte that is not `10xxxxxx`.
    #[error("invalid byte")]
    InvalidByte,

    /// The buffer ends in the middle of a multi-byte sequence.
    #[error("truncated byte sequence")]
    TruncatedByte,
}

/// The kind of failure that aborted a parse.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input could not be opened, measured or mapped.
    #[error("Cannot open file for reading")]
    CannotOpen,

    /// A file could not be finished and closed.
    #[error("Cannot close the file")]
    CannotClose,

    /// The header does not carry the `cgm1` magic.
    #[error("Invalid header. Not a CGM file?")]
    InvalidHeader,

    /// Something other than a newline follows the header fields.
    #[error("Garbage on line")]
    HeaderGarbage,

    /// Malformed UTF-8, with the decoder's own diagnosis.
    #[error("Invalid encoding in file ({0})")]
    InvalidByte(DecodeError),

    /// A dedent that lands between two open levels.
    #[error("Obscure indentation")]
    BadIndentation,
}

impl From<DecodeError> for ErrorKind {
    fn from(err: DecodeError) -> Self {
        ErrorKind::InvalidByte(err)
    }
}

/// Error type for CGM parsing.
///
/// Carries the 1-based line the error was found on (zero when no line applies,
/// e.g. a file that could not be opened), the input name if one is known, and
/// the OS error behind resource failures.
#[derive(Error, Debug)]
#[error("{}{kind}{}", location_prefix(.filename, .line), os_suffix(.source))]
pub struct ParseError {
    kind: ErrorKind,
    line: usize,
    filename: Option<String>,
    #[source]
    source: Option<io::Error>,
}

impl ParseError {
    /// Create an error found on `line`.
    pub fn new(kind: ErrorKind, line: usize) -> Self {
        Self {
            kind,
            line,
            filename: None,
            source: None,
        }
    }

    /// Create a resource error backed by an OS error.
    pub fn io(kind: ErrorKind, source: io::Error) -> Self {
        Self {
            kind,
            line: 0,
            filename: None,
            source: Some(source),
        }
    }

    /// Attach the input name used in the message.
    pub fn with_filename(mut self, filename: Option<&str>) -> Self {
        if let Some(name) = filename {
            self.filename = Some(name.to_string());
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Whether an OS error should be reported alongside the message.
    pub fn has_os_error(&self) -> bool {
        self.source.is_some()
    }
}

fn location_prefix(filename: &Option<String>, line: &usize) -> String {
    match (filename, *line) {
        (Some(name), 0) => format!("At file {}: ", name),
        (Some(name), line) => format!("At file {}:{}: ", name, line),
        (None, 0) => String::new(),
        (None, line) => format!("Line {}: ", line),
    }
}

fn os_suffix(source: &Option<io::Error>) -> String {
    match source {
        Some(err) => format!(": {}", err),
        None => String::new(),
    }
}
