//! Text linkage files.
//!
//! One merge per line: `left right distance count`, separated by whitespace
//! or commas. Ids and counts may be written as integral floats
//! (`4.000000000000000000e+00`), which is how `numpy.savetxt` stores a SciPy
//! linkage matrix. Blank lines and everything after `#` are ignored.

use smartclust_core::LinkageRecord;
use thiserror::Error;

/// Largest float that still holds every smaller integer exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A line of a linkage file that could not be read as a merge record.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LinkageFileError {
    /// The line did not hold exactly four values.
    #[error("line {line}: expected 4 columns, found {found}")]
    ColumnCount {
        /// One-based line number.
        line: usize,
        /// Number of values on the line.
        found: usize,
    },
    /// A value was not a number.
    #[error("line {line}, column {column}: `{value}` is not a number")]
    InvalidNumber {
        /// One-based line number.
        line: usize,
        /// One-based column number.
        column: usize,
        /// The offending text.
        value: String,
    },
    /// An id or count was negative, fractional or too large.
    #[error("line {line}, column {column}: `{value}` is not a non-negative integer")]
    InvalidInteger {
        /// One-based line number.
        line: usize,
        /// One-based column number.
        column: usize,
        /// The offending text.
        value: String,
    },
}

/// Parses every record of a linkage file.
///
/// Only the text layout is checked here; tree structure is validated when the
/// records are flattened.
///
/// # Errors
/// Returns the first [`LinkageFileError`] in line order.
///
/// # Examples
/// ```
/// use smartclust_cli::cli::parse_linkage;
///
/// let records = parse_linkage("# scipy\n0 1 0.5 2\n2.0e+00,3.0e+00,1.5,3.0e+00\n")?;
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].left(), 2);
/// assert_eq!(records[1].count(), 3);
/// # Ok::<(), smartclust_cli::cli::LinkageFileError>(())
/// ```
pub fn parse_linkage(text: &str) -> Result<Vec<LinkageRecord>, LinkageFileError> {
    let mut records = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or_default();
        let fields: Vec<&str> = content
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|field| !field.is_empty())
            .collect();
        match fields.as_slice() {
            [] => {}
            [left, right, distance, count] => records.push(LinkageRecord::new(
                parse_integer(left, line, 1)?,
                parse_integer(right, line, 2)?,
                parse_number(distance, line, 3)?,
                parse_integer(count, line, 4)?,
            )),
            other => {
                return Err(LinkageFileError::ColumnCount {
                    line,
                    found: other.len(),
                });
            }
        }
    }
    Ok(records)
}

fn parse_number(raw: &str, line: usize, column: usize) -> Result<f64, LinkageFileError> {
    raw.parse::<f64>()
        .map_err(|_| LinkageFileError::InvalidNumber {
            line,
            column,
            value: raw.to_owned(),
        })
}

fn parse_integer(raw: &str, line: usize, column: usize) -> Result<usize, LinkageFileError> {
    if let Ok(value) = raw.parse::<usize>() {
        return Ok(value);
    }
    let value = parse_number(raw, line, column)?;
    if !(0.0..=MAX_EXACT_INTEGER).contains(&value) || value.fract() != 0.0 {
        return Err(LinkageFileError::InvalidInteger {
            line,
            column,
            value: raw.to_owned(),
        });
    }
    Ok(value as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn rows(text: &str) -> Vec<(usize, usize, f64, usize)> {
        parse_linkage(text)
            .expect("linkage must parse")
            .iter()
            .map(|record| (record.left(), record.right(), record.distance(), record.count()))
            .collect()
    }

    #[rstest]
    #[case::whitespace("0 1 1.0 2\n2\t3  1.0 2\n")]
    #[case::commas("0,1,1.0,2\n2, 3, 1.0, 2\n")]
    #[case::savetxt(
        "0.000000000000000000e+00 1.000000000000000000e+00 1.000000000000000000e+00 2.000000000000000000e+00\n\
         2.000000000000000000e+00 3.000000000000000000e+00 1.000000000000000000e+00 2.000000000000000000e+00\n"
    )]
    #[case::comments_and_blanks("# left right distance count\n\n0 1 1 2 # first pair\n   \n2 3 1 2\n")]
    fn accepts_common_layouts(#[case] text: &str) {
        assert_eq!(rows(text), vec![(0, 1, 1.0, 2), (2, 3, 1.0, 2)]);
    }

    #[test]
    fn empty_file_is_a_single_point_linkage() {
        assert!(rows("").is_empty());
        assert!(rows("# nothing here\n").is_empty());
    }

    #[rstest]
    #[case::too_few("0 1 1.0\n", LinkageFileError::ColumnCount { line: 1, found: 3 })]
    #[case::too_many(
        "0 1 1.0 2\n2 3 1.0 2 9\n",
        LinkageFileError::ColumnCount { line: 2, found: 5 }
    )]
    #[case::not_a_number(
        "0 1 far 2\n",
        LinkageFileError::InvalidNumber { line: 1, column: 3, value: "far".to_owned() }
    )]
    #[case::fractional_id(
        "\n0.5 1 1.0 2\n",
        LinkageFileError::InvalidInteger { line: 2, column: 1, value: "0.5".to_owned() }
    )]
    #[case::negative_count(
        "0 1 1.0 -2\n",
        LinkageFileError::InvalidInteger { line: 1, column: 4, value: "-2".to_owned() }
    )]
    fn reports_the_offending_line(#[case] text: &str, #[case] expected: LinkageFileError) {
        assert_eq!(parse_linkage(text), Err(expected));
    }

    #[test]
    fn negative_distances_are_left_to_tree_validation() {
        assert_eq!(rows("0 1 -1.0 2\n"), vec![(0, 1, -1.0, 2)]);
    }
}
