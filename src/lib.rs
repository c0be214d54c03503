use std::{
    fs, io,
    num::ParseFloatError,
    ops::Range,
    path::{Path, PathBuf},
    str::FromStr,
};

use log::{debug, info};
use logos::Logos;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

pub mod config;
pub mod stats;

pub use stats::{average_temperature, count_rainy_days, hot_days, month_key, Summary};

/// Column names, in the order they appear in a record line.
pub const FIELDS: [&str; 4] = ["date", "temperature", "humidity", "precipitation"];

#[derive(Logos, Debug, PartialEq)]
enum Token {
    #[token(",")]
    Comma,
    #[regex("[^,]+")]
    Field,
}

/// Splits a record line on commas, keeping the byte range of every field.
/// Empty fields (`a,,b` or a trailing comma) are kept as empty ranges.
fn fields(line: &str) -> Vec<Range<usize>> {
    let mut fields = Vec::new();
    let mut lexer = Token::lexer(line);
    let mut current: Option<Range<usize>> = None;

    while let Some(token) = lexer.next() {
        let span = lexer.span();
        match token {
            Ok(Token::Comma) => {
                fields.push(current.take().unwrap_or(span.start..span.start));
            }
            // Anything that isn't a comma belongs to the field being built.
            Ok(Token::Field) | Err(()) => {
                current = Some(match current {
                    Some(field) => field.start..span.end,
                    None => span,
                });
            }
        }
    }
    fields.push(current.unwrap_or(line.len()..line.len()));

    fields
}

/// One day of observations.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherEntry {
    // `YYYY-MM-DD`, kept as written in the file
    pub date: String,
    pub temperature: f64,
    pub humidity: f64,
    pub precipitation: f64,
}

impl WeatherEntry {
    /// The two characters at offset 5..7 of the date, i.e. `MM` in `YYYY-MM-DD`.
    ///
    /// Returns `None` when the date is too short to hold a month. No other
    /// validation is done: a date like `2024/8/01` yields `"8/"`.
    pub fn month_key(&self) -> Option<&str> {
        self.date.get(5..7)
    }

    pub fn is_rainy(&self) -> bool {
        self.precipitation > 0.0
    }
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("missing {name} field, found only {found} of {} fields", FIELDS.len())]
    MissingField {
        name: &'static str,
        found: usize,
        span: Range<usize>,
    },
    #[error("{name} `{value}` is not a number")]
    InvalidNumber {
        name: &'static str,
        value: String,
        span: Range<usize>,
        #[source]
        source: ParseFloatError,
    },
}

impl RecordError {
    /// Byte range of the offending field in the record line.
    pub fn span(&self) -> Range<usize> {
        match self {
            RecordError::MissingField { span, .. } | RecordError::InvalidNumber { span, .. } => {
                span.clone()
            }
        }
    }
}

impl FromStr for WeatherEntry {
    type Err = RecordError;

    /// Parses `date,temperature,humidity,precipitation`. Columns after the
    /// fourth are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = fields(s);
        if fields.len() < FIELDS.len() {
            return Err(RecordError::MissingField {
                name: FIELDS[fields.len()],
                found: fields.len(),
                span: s.len()..s.len(),
            });
        }

        let number = |index: usize| -> Result<f64, RecordError> {
            let span = fields[index].clone();
            let value = &s[span.clone()];
            value
                .trim()
                .parse()
                .map_err(|source| RecordError::InvalidNumber {
                    name: FIELDS[index],
                    value: value.to_string(),
                    span,
                    source,
                })
        };

        Ok(Self {
            date: s[fields[0].clone()].to_string(),
            temperature: number(1)?,
            humidity: number(2)?,
            precipitation: number(3)?,
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
#[error("malformed record on line {line}")]
#[diagnostic(
    code(weather::malformed_record),
    help("data lines must look like `date,temperature,humidity,precipitation`")
)]
pub struct MalformedRecord {
    /// 1-based, the header being line 1.
    pub line: usize,
    #[source]
    pub reason: RecordError,
    #[source_code]
    src: NamedSource<String>,
    #[label("here")]
    span: SourceSpan,
}

impl MalformedRecord {
    fn new(origin: &str, line: usize, text: &str, reason: RecordError) -> Self {
        Self {
            line,
            span: reason.span().into(),
            src: NamedSource::new(format!("{origin}:{line}"), text.to_string()),
            reason,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DataAccess,
    MalformedRecord,
}

#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("could not read weather data from `{}`", .path.display())]
    #[diagnostic(
        code(weather::data_access),
        help("check that the file exists and is readable")
    )]
    DataAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    #[diagnostic(transparent)]
    MalformedRecord(#[from] MalformedRecord),
}

impl LoadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoadError::DataAccess { .. } => ErrorKind::DataAccess,
            LoadError::MalformedRecord(_) => ErrorKind::MalformedRecord,
        }
    }
}

/// Reads the whole file at `path` and parses it with [`load_from_str`].
pub fn load(path: impl AsRef<Path>) -> Result<Vec<WeatherEntry>, LoadError> {
    let path = path.as_ref();
    debug!("reading weather data from {}", path.display());

    let content = fs::read_to_string(path).map_err(|source| LoadError::DataAccess {
        path: path.to_path_buf(),
        source,
    })?;

    load_from_str(&path.display().to_string(), &content)
}

/// Parses CSV text into entries, in file order.
///
/// The first line is a header and is skipped without looking at it. Loading
/// stops at the first malformed line; `origin` names the input in the error.
pub fn load_from_str(origin: &str, content: &str) -> Result<Vec<WeatherEntry>, LoadError> {
    let entries = content
        .lines()
        .enumerate()
        .skip(1)
        .map(|(index, line)| {
            line.parse::<WeatherEntry>()
                .map_err(|reason| MalformedRecord::new(origin, index + 1, line, reason))
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!("loaded {} weather entries from {origin}", entries.len());
    Ok(entries)
}
