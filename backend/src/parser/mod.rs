//! CSV to matrix parser.
//!
//! Uploaded files have no header row and use `,` as delimiter. Every record must have the same
//! number of fields and every field must read as an integer; the cells are nevertheless kept
//! as the original text.

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{CsvError, CsvResult};
use crate::matrix::Matrix;

/// Read CSV records as rows of text fields.
///
/// Malformed input fails with [`CsvError::MalformedQuoting`] (stray or unclosed quotes) or
/// [`CsvError::ParseError`] (unequal record lengths, invalid UTF-8).
pub fn parse_records<R: Read>(mut reader: R) -> CsvResult<Vec<Vec<String>>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    check_quoting(&bytes)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .from_reader(bytes.as_slice());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(rows)
}

/// Reject quoting the `csv` reader would silently repair.
///
/// Reading with quoting disabled yields every field as written. A field is accepted when it
/// holds no `"` at all, or when it is wrapped in `"..."` with every inner quote doubled.
/// Quoted fields spanning a delimiter or a line break are split by this pass and rejected too;
/// no integer can contain either.
fn check_quoting(bytes: &[u8]) -> CsvResult<()> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(bytes);

    for record in reader.byte_records() {
        let record = record?;
        if let Some(field) = record.iter().find(|f| !is_well_quoted(f)) {
            return Err(CsvError::MalformedQuoting {
                line: record.position().map_or(0, |p| p.line()),
                field: String::from_utf8_lossy(field).into_owned(),
            });
        }
    }

    Ok(())
}

fn is_well_quoted(field: &[u8]) -> bool {
    if !field.contains(&b'"') {
        return true;
    }

    let inner = match field {
        [b'"', inner @ .., b'"'] => inner,
        _ => return false,
    };

    let mut i = 0;
    while i < inner.len() {
        if inner[i] == b'"' {
            if inner.get(i + 1) != Some(&b'"') {
                return false;
            }
            i += 1;
        }
        i += 1;
    }
    true
}

/// Check that every field reads as a base-10 signed 64-bit integer.
///
/// The parsed numbers are discarded. The first offending field is reported.
pub fn validate_integers(rows: &[Vec<String>]) -> CsvResult<()> {
    for value in rows.iter().flatten() {
        if let Err(source) = value.parse::<i64>() {
            return Err(CsvError::NotAnInteger {
                value: value.clone(),
                source,
            });
        }
    }
    Ok(())
}

/// Parse and validate CSV bytes into a [`Matrix`].
///
/// # Example
/// ```ignore
/// use matrixops::parse_matrix;
///
/// let matrix = parse_matrix(b"1,2\n3,4").unwrap();
/// assert_eq!(matrix.render(), "1,2\n3,4\n");
/// ```
pub fn parse_matrix(bytes: &[u8]) -> CsvResult<Matrix> {
    let rows = parse_records(bytes)?;

    if rows.is_empty() {
        return Err(CsvError::EmptyFile);
    }

    validate_integers(&rows)?;

    Ok(Matrix::new(rows))
}

/// Parse and validate a CSV file from disk.
pub fn parse_matrix_file<P: AsRef<Path>>(path: P) -> CsvResult<Matrix> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_matrix(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_simple_csv() {
        let matrix = parse_matrix(b"1,2,3\n4,5,6\n7,8,9").unwrap();

        assert_eq!(matrix.row_count(), 3);
        assert_eq!(matrix.column_count(), 3);
        assert_eq!(matrix.rows()[1], vec!["4", "5", "6"]);
    }

    #[test]
    fn test_trailing_newline_and_blank_lines() {
        let matrix = parse_matrix(b"1,2\n\n3,4\n").unwrap();
        assert_eq!(matrix.render(), "1,2\n3,4\n");
    }

    #[test]
    fn test_cells_kept_as_text() {
        let matrix = parse_matrix(b"+1,-2\n007,4").unwrap();
        assert_eq!(matrix.flatten(), "+1,-2,007,4");
    }

    #[test]
    fn test_quoted_integers() {
        let matrix = parse_matrix(b"\"1\",2").unwrap();
        assert_eq!(matrix.flatten(), "1,2");
    }

    #[test]
    fn test_empty_file() {
        assert!(matches!(parse_matrix(b""), Err(CsvError::EmptyFile)));
    }

    #[test]
    fn test_unequal_lengths() {
        assert!(matches!(parse_matrix(b"1,2,3\n4,5"), Err(CsvError::ParseError(_))));
    }

    #[test]
    fn test_malformed_quoting() {
        for input in [&b"1,\"2\"3\n4,5"[..], b"1,\"2\n3,4", b"\"1,2\n3,4"] {
            assert!(
                matches!(parse_matrix(input), Err(CsvError::MalformedQuoting { .. })),
                "{:?}",
                String::from_utf8_lossy(input)
            );
        }
    }

    #[test]
    fn test_malformed_quoting_reports_line() {
        match parse_matrix(b"1,2\n3,4\"\n") {
            Err(CsvError::MalformedQuoting { line, field }) => {
                assert_eq!(line, 2);
                assert_eq!(field, "4\"");
            }
            other => panic!("expected quoting error, got {:?}", other),
        }
    }

    #[test]
    fn test_doubled_inner_quotes_accepted_by_quoting_check() {
        assert!(is_well_quoted(b"\"1\"\"2\""));
        assert!(is_well_quoted(b"\"\""));
        assert!(!is_well_quoted(b"\"1\"2\""));
        assert!(!is_well_quoted(b"\""));
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(matches!(parse_matrix(&[0x31, 0x2c, 0xff, 0xfe]), Err(CsvError::ParseError(_))));
    }

    #[test]
    fn test_not_an_integer() {
        match parse_matrix(b"1,2,3\nc,5,6\n7,x,9") {
            Err(CsvError::NotAnInteger { value, .. }) => assert_eq!(value, "c"),
            other => panic!("expected integer validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_is_not_an_integer() {
        assert!(matches!(
            parse_matrix(b"99999999999999999999"),
            Err(CsvError::NotAnInteger { .. })
        ));
    }

    #[test]
    fn test_parse_matrix_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"1,2\n3,4\n").unwrap();

        let matrix = parse_matrix_file(file.path()).unwrap();
        assert_eq!(matrix.flatten(), "1,2,3,4");
    }

    #[test]
    fn test_parse_matrix_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = parse_matrix_file(dir.path().join("missing.csv"));
        assert!(matches!(result, Err(CsvError::IoError(_))));
    }
}
