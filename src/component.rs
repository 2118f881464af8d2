//! Per-component time series files.
//!
//! A component file carries one quantity (one displacement component, or one
//! ECEF coordinate) of a single station. It starts with a
//! [HEADER_LINES] long header, followed by whitespace separated data lines
//! where the first two fields are a fractional year and the measured value.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Number of header lines preceding the data lines
pub const HEADER_LINES: usize = 3;

/// [Sample] is one (timestamp, value) measurement.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sample {
    /// Fractional year, stamped at the day midpoint
    pub timestamp: f64,
    /// Measured quantity
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: f64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Parses a single numerical field, rejecting NaN and infinite values
fn parse_number(field: &str, path: &Path, lineno: usize) -> Result<f64, Error> {
    match field.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::InvalidNumber(path.to_path_buf(), lineno, field.to_string())),
    }
}

/// Parses [Sample]s from a component file readable through `reader`,
/// appending them to `samples`. `path` only serves diagnostics.
/// On error, `samples` still contains every sample that preceded
/// the faulty line.
pub fn parse_samples<R: BufRead>(
    reader: R,
    path: &Path,
    samples: &mut Vec<Sample>,
) -> Result<(), Error> {
    for (nth, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::ComponentUnavailable(path.to_path_buf(), e))?;
        if nth < HEADER_LINES || line.trim().is_empty() {
            continue;
        }
        let lineno = nth + 1;
        let mut items = line.split_ascii_whitespace();
        let (timestamp, value) = match (items.next(), items.next()) {
            (Some(timestamp), Some(value)) => (timestamp, value),
            _ => return Err(Error::MalformedLine(path.to_path_buf(), lineno)),
        };
        let timestamp = parse_number(timestamp, path, lineno)?;
        let value = parse_number(value, path, lineno)?;
        samples.push(Sample::new(timestamp, value));
    }
    Ok(())
}

/// Opens and parses a component file, appending its [Sample]s to `samples`.
/// See [parse_samples].
pub fn read_component(path: &Path, samples: &mut Vec<Sample>) -> Result<(), Error> {
    let fd = File::open(path).map_err(|e| Error::ComponentUnavailable(path.to_path_buf(), e))?;
    parse_samples(BufReader::new(fd), path, samples)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Scope;
    use std::io::Cursor;

    fn parse(content: &str) -> Result<Vec<Sample>, Error> {
        let mut samples = Vec::new();
        parse_samples(Cursor::new(content), Path::new("mb_TEST_NEU.dat1"), &mut samples)?;
        Ok(samples)
    }

    #[test]
    fn data_lines() {
        let content = "# station TEST
# component N
#  T  value  sigma
2020.0027   5.1234   0.0010
2020.0055  -1.2000   0.0011

2020.0082   0.5000
";
        let samples = parse(content).unwrap();
        assert_eq!(
            samples,
            vec![
                Sample::new(2020.0027, 5.1234),
                Sample::new(2020.0055, -1.2),
                Sample::new(2020.0082, 0.5),
            ]
        );
    }

    #[test]
    fn header_only() {
        let samples = parse("header\nheader\nheader\n").unwrap();
        assert!(samples.is_empty());
        let samples = parse("").unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn malformed_line() {
        let content = "h\nh\nh\n2020.0027 5.1234 0.001\n2020.0055\n";
        match parse(content) {
            Err(Error::MalformedLine(_, line)) => assert_eq!(line, 5),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(parse(content).unwrap_err().scope(), Scope::Run);
    }

    #[test]
    fn invalid_number() {
        let content = "h\nh\nh\n2020,0027 5.1234 0.001\n";
        let err = parse(content).unwrap_err();
        match &err {
            Error::InvalidNumber(_, line, field) => {
                assert_eq!(*line, 4);
                assert_eq!(field, "2020,0027");
            },
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.scope(), Scope::Component);

        for content in ["h\nh\nh\nNaN 1.0\n", "h\nh\nh\n2020.5 inf\n"] {
            assert!(matches!(parse(content), Err(Error::InvalidNumber(_, 4, _))));
        }
    }

    #[test]
    fn samples_preceding_invalid_number() {
        let content = "h\nh\nh
2020.0027   5.1234
2020.0055  -1.2000
2020.0082   5,0000
2020.0109   0.5000
";
        let mut samples = Vec::new();
        let err = parse_samples(
            Cursor::new(content),
            Path::new("mb_TEST_NEU.dat1"),
            &mut samples,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidNumber(_, 6, _)));
        assert_eq!(
            samples,
            vec![Sample::new(2020.0027, 5.1234), Sample::new(2020.0055, -1.2)]
        );
    }

    #[test]
    fn missing_file() {
        let mut samples = Vec::new();
        let err =
            read_component(Path::new("does/not/exist/mb_NONE_NEU.dat1"), &mut samples).unwrap_err();
        assert!(samples.is_empty());
        assert!(matches!(err, Error::ComponentUnavailable(_, _)));
        assert_eq!(err.scope(), Scope::Component);
    }
}
