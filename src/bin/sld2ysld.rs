// SLD to YSLD transformer
//
//  Copyright (C) 2014-2023 Ryan Specialty, LLC.
//
//  This file is part of sldyaml.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! This is the SLD to YSLD transformer.
//!
//! `sld2ysld` reads a Styled Layer Descriptor document and writes the
//!   equivalent YSLD style.
//! Input is read from a file or from standard input,
//!   and output is written to a file or to standard output.

extern crate sldyaml;

use getopts::{Fail, Options};
use sldyaml::{
    diagnose::{
        AnnotatedSpan, BufSpanResolver, Diagnostic, FsSpanResolver, Reporter,
        SpanResolver, VisualReporter,
    },
    transform, TransformError,
};
use std::{
    env,
    error::Error,
    fmt::{self, Display},
    fs,
    io::{self, BufReader, BufWriter, Cursor, Read, Write},
};

/// Types of commands
#[derive(Debug, PartialEq, Eq)]
enum Command {
    /// Transform the input path into the output path;
    ///   [`None`] denotes the respective standard stream.
    Transform(Option<String>, Option<String>),
    Usage,
}

/// Open the destination for writing.
fn dest_writer(dest: Option<&str>) -> Result<Box<dyn Write>, Sld2YsldError> {
    match dest {
        None => Ok(Box::new(io::stdout().lock())),
        Some(path) => fs::File::create(path)
            .map(|f| Box::new(f) as Box<dyn Write>)
            .map_err(|e| Sld2YsldError::Output(path.into(), e)),
    }
}

/// Transform `input` into `dest`,
///   flushing all output before returning.
fn convert<R: io::BufRead>(
    input: R,
    dest: Option<&str>,
) -> Result<(), Sld2YsldError> {
    let fout = BufWriter::new(dest_writer(dest)?);
    let mut fout = transform(input, fout)?;

    fout.flush().map_err(Sld2YsldError::Io)
}

/// Render an error report to a string.
///
/// Rendering the entire report before writing it ensures that it is not
///   interleaved with other output.
fn render<R: SpanResolver>(resolver: R, e: &Sld2YsldError) -> String {
    VisualReporter::new(resolver).render(e).to_string()
}

/// Transform a source file (or standard input),
///   returning the rendered report of any failure.
fn execute(src: Option<&str>, dest: Option<&str>) -> Result<(), (i32, String)> {
    let fail = |e: Sld2YsldError, report: String| (e.exit_code(), report);

    match src {
        Some(path) => {
            let file = fs::File::open(path)
                .map_err(|e| Sld2YsldError::Input(path.into(), e))
                .map_err(|e| {
                    let report = render(FsSpanResolver::new(path), &e);
                    fail(e, report)
                })?;

            convert(BufReader::new(file), dest).map_err(|e| {
                let report = render(FsSpanResolver::new(path), &e);
                fail(e, report)
            })
        }

        // Standard input cannot be re-read to resolve spans,
        //   so it is retained in memory.
        None => {
            let mut buf = Vec::new();

            io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .map_err(|e| Sld2YsldError::Input("-".into(), e))
                .and_then(|_| convert(buf.as_slice(), dest))
                .map_err(|e| {
                    let resolver =
                        BufSpanResolver::new("<stdin>", Cursor::new(&buf));
                    let report = render(resolver, &e);
                    fail(e, report)
                })
        }
    }
}

/// Entrypoint for the transformer
pub fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("sld2ysld");
    let opts = get_opts();
    let usage =
        opts.usage(&format!("Usage: {} [OPTIONS] [INPUT]", program));

    match parse_options(opts, args.clone()) {
        Ok(Command::Transform(src, dest)) => {
            match execute(src.as_deref(), dest.as_deref()) {
                Ok(()) => std::process::exit(exitcode::OK),
                Err((code, report)) => {
                    eprintln!(
                        "{report}\nfatal: failed to transform `{}`",
                        src.as_deref().unwrap_or("-"),
                    );
                    std::process::exit(code);
                }
            }
        }
        Ok(Command::Usage) => {
            println!("{}", usage);
            std::process::exit(exitcode::OK);
        }
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("{}", usage);
            std::process::exit(exitcode::USAGE);
        }
    }
}

/// Get 'Options'
fn get_opts() -> Options {
    let mut opts = Options::new();
    opts.optopt("o", "output", "write YSLD to NAME instead of stdout", "NAME");
    opts.optflag("h", "help", "print this help menu");

    opts
}

/// Option parser
///
/// An input of `-` denotes standard input,
///   as does the lack of an input.
fn parse_options(opts: Options, args: Vec<String>) -> Result<Command, Fail> {
    let matches = opts.parse(args.get(1..).unwrap_or_default())?;

    if matches.opt_present("h") {
        return Ok(Command::Usage);
    }

    let input = match matches.free.len() {
        0 => None,
        1 if matches.free[0] == "-" => None,
        1 => Some(matches.free[0].clone()),
        _ => return Err(Fail::UnrecognizedOption(matches.free[1].clone())),
    };

    Ok(Command::Transform(input, matches.opt_str("o")))
}

/// Transformer (`sld2ysld`) error.
#[derive(Debug)]
pub enum Sld2YsldError {
    /// The input could not be opened or read.
    Input(String, io::Error),

    /// The output could not be created.
    Output(String, io::Error),

    /// The output could not be written.
    Io(io::Error),

    Transform(TransformError),
}

impl Sld2YsldError {
    fn exit_code(&self) -> exitcode::ExitCode {
        match self {
            Self::Input(..) => exitcode::NOINPUT,
            Self::Output(..) => exitcode::CANTCREAT,
            Self::Io(_) => exitcode::IOERR,
            Self::Transform(_) => exitcode::DATAERR,
        }
    }
}

impl From<TransformError> for Sld2YsldError {
    fn from(e: TransformError) -> Self {
        Self::Transform(e)
    }
}

impl Display for Sld2YsldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(path, e) => write!(f, "cannot read `{path}`: {e}"),
            Self::Output(path, e) => write!(f, "cannot create `{path}`: {e}"),
            Self::Io(e) => Display::fmt(e, f),
            Self::Transform(e) => Display::fmt(e, f),
        }
    }
}

impl Error for Sld2YsldError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Input(_, e) | Self::Output(_, e) | Self::Io(e) => Some(e),
            Self::Transform(e) => Some(e),
        }
    }
}

impl Diagnostic for Sld2YsldError {
    fn describe(&self) -> Vec<AnnotatedSpan> {
        match self {
            Self::Transform(e) => e.describe(),

            // Falls back to rendering just the error `Display`.
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, Fail> {
        let args = std::iter::once("program")
            .chain(args.iter().copied())
            .map(String::from)
            .collect();

        parse_options(get_opts(), args)
    }

    #[test]
    fn parse_options_help() {
        assert_eq!(Ok(Command::Usage), parse(&["-h"]));
        assert_eq!(Ok(Command::Usage), parse(&["--help", "in.sld"]));
    }

    #[test]
    fn parse_options_invalid() {
        match parse(&["-q"]) {
            Err(Fail::UnrecognizedOption(_)) => {}
            _ => panic!("Invalid option not caught"),
        }
    }

    #[test]
    fn parse_options_too_many_inputs() {
        assert_eq!(
            Err(Fail::UnrecognizedOption("b.sld".into())),
            parse(&["a.sld", "b.sld"]),
        );
    }

    #[test]
    fn parse_options_stdio_by_default() {
        assert_eq!(Ok(Command::Transform(None, None)), parse(&[]));
        assert_eq!(Ok(Command::Transform(None, None)), parse(&["-"]));
    }

    #[test]
    fn parse_options_input_and_output() {
        assert_eq!(
            Ok(Command::Transform(Some("in.sld".into()), Some("out.yaml".into()))),
            parse(&["in.sld", "-o", "out.yaml"]),
        );

        assert_eq!(
            Ok(Command::Transform(None, Some("out.yaml".into()))),
            parse(&["--output", "out.yaml"]),
        );
    }

    #[test]
    fn parse_options_output_requires_name() {
        match parse(&["in.sld", "-o"]) {
            Err(Fail::ArgumentMissing(_)) => {}
            _ => panic!("Missing output name not caught"),
        }
    }

    #[test]
    fn exit_codes_by_failure() {
        let io = || io::Error::new(io::ErrorKind::NotFound, "gone");

        assert_eq!(
            exitcode::NOINPUT,
            Sld2YsldError::Input("a".into(), io()).exit_code()
        );
        assert_eq!(
            exitcode::CANTCREAT,
            Sld2YsldError::Output("b".into(), io()).exit_code()
        );
        assert_eq!(exitcode::IOERR, Sld2YsldError::Io(io()).exit_code());
    }
}
