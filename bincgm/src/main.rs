//! CGM command-line tool: parse a CGM outline and write its document tree.
//!
//! Usage: cgm2dom [OPTIONS] <INPUT> [OUTPUT]
//!
//! Arguments:
//!   <INPUT>               CGM file to read, or - for standard input
//!   [OUTPUT]              File to write, or - for standard output [default: -]
//!
//! Options:
//!   -t, --to <FORMAT>     Output format (xml, cgm, yaml, toml, cbor, diag) [default: xml]
//!       --tab-width <N>   Columns per tab stop [default: 8]
//!       --check           Only check that the input parses (prints "<INPUT>: ok")
//!   -h, --help            Print help
//!   -V, --version         Print version
//!
//! Errors are printed as `cgm2dom: At file <INPUT>:<LINE>: <MESSAGE>` and exit
//! with status 1. Set RUST_LOG=debug to trace the parse.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use libcgm::{
    encode, encode_cgm_bytes, parse_with_options, Document, ErrorKind, Format, ParseError,
    ParseOptions, Source, TAB_WIDTH,
};
use log::{debug, info};

mod transcode;

const PROGRAM: &str = "cgm2dom";

#[derive(Debug, Parser)]
#[command(name = "cgm2dom", version)]
#[command(about = "Parse a CGM outline into a document tree")]
struct Cli {
    /// CGM file to read, or - for standard input
    input: String,

    /// File to write, or - for standard output
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Xml)]
    to: OutputFormat,

    /// Columns per tab stop when measuring indentation
    #[arg(long, value_name = "N", default_value_t = TAB_WIDTH, value_parser = parse_tab_width)]
    tab_width: usize,

    /// Only check that the input parses
    #[arg(long)]
    check: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// XML tree in the CGM namespace
    Xml,
    /// Canonical CGM with two-space indentation
    Cgm,
    /// YAML sequence of line records
    Yaml,
    /// TOML arrays of `line` tables
    Toml,
    /// CBOR array of line records
    Cbor,
    /// CBOR in diagnostic notation
    Diag,
}

fn parse_tab_width(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("tab width must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    let source = match open_input(&cli.input) {
        Ok(source) => source,
        Err(e) => return report(&e),
    };

    let options = ParseOptions {
        filename: Some(cli.input.clone()),
        tab_width: cli.tab_width,
    };
    let doc = match parse_with_options(&source, &options) {
        Ok(doc) => doc,
        Err(e) => return report(&e),
    };
    // The tree owns its content; the input can go.
    drop(source);
    info!("{}: {} lines in tree", cli.input, doc.len());

    if cli.check {
        println!("{}: ok", cli.input);
        return 0;
    }

    let output = match render(&doc, cli.to) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("{}: {}", PROGRAM, e);
            return 1;
        }
    };

    match cli.output.as_deref() {
        Some(path) if path != Path::new("-") => write_file_output(&output, path),
        _ => write_stdout_output(&output),
    }
}

fn open_input(input: &str) -> Result<Source, ParseError> {
    if input == "-" {
        Source::stdin()
    } else {
        Source::open(input)
    }
}

/// Print a parse or I/O error and return the failure status.
fn report(err: &ParseError) -> i32 {
    eprintln!("{}: {}", PROGRAM, err);
    1
}

fn render(doc: &Document, format: OutputFormat) -> Result<Vec<u8>, String> {
    match format {
        OutputFormat::Xml => Ok(encode(doc, Format::Xml).into_bytes()),
        OutputFormat::Cgm => Ok(encode_cgm_bytes(doc)),
        OutputFormat::Yaml => transcode::yaml::encode(doc).map(String::into_bytes),
        OutputFormat::Toml => transcode::toml::encode(doc).map(String::into_bytes),
        OutputFormat::Cbor => transcode::cbor::encode(doc),
        OutputFormat::Diag => transcode::cbor::diagnostic(doc).map(String::into_bytes),
    }
}

fn write_file_output(output: &[u8], path: &Path) -> i32 {
    let mut file = match File::create(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("{}: Error writing {}: {}", PROGRAM, path.display(), e);
            return 1;
        }
    };
    if let Err(e) = file.write_all(output) {
        eprintln!("{}: Error writing {}: {}", PROGRAM, path.display(), e);
        return 1;
    }
    // Deferred write errors only surface here.
    if let Err(e) = file.sync_all() {
        let name = path.to_string_lossy();
        let err = ParseError::io(ErrorKind::CannotClose, e).with_filename(Some(name.as_ref()));
        return report(&err);
    }
    debug!("{}: wrote {} bytes", path.display(), output.len());
    0
}

fn write_stdout_output(output: &[u8]) -> i32 {
    let mut stdout = io::stdout().lock();
    if let Err(e) = stdout.write_all(output).and_then(|()| stdout.flush()) {
        return report(&ParseError::io(ErrorKind::CannotClose, e).with_filename(Some("-")));
    }
    0
}
