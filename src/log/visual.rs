mod pointer;

pub use pointer::Pointer;

use std::fmt::{Debug, Formatter, Result};

const BLANK: &str = "";
const PIPE: &str = "|";
const EQUAL: &str = "=";
const HIGHLIGHT: &str = "^";

/// Describes a type that can be associated with an Error and used
/// to print a visualization.
pub trait Visual: Debug + Send + Sync {
    /// Display the visualization by writing to the given Formatter.
    fn display(
        &self,
        formatter: &mut Formatter<'_>,
        template: Option<&str>,
        help: Option<&str>,
    ) -> Result;
}

/// Get the zero indexed line and column for the given byte offset.
///
/// The column is measured in display width, so wide characters before the
/// offset push the column right by the amount of space they occupy.
fn get_line_and_column(lines: &[&str], offset: usize) -> (usize, usize) {
    let mut n = 0;

    for (i, line) in lines.iter().enumerate() {
        let len = line.len() + 1;
        if n + len > offset {
            let before = line.get(..offset - n).unwrap_or(line);
            return (i, get_width(before));
        }
        n += len;
    }

    let length = lines.len().saturating_sub(1);
    let last = lines.last().map(|line| get_width(line)).unwrap_or(0);

    (length, last)
}

/// Wrapper for UnicodeWidthStr::width.
fn get_width(s: &str) -> usize {
    unicode_width::UnicodeWidthStr::width(s)
}

#[cfg(test)]
mod tests {
    use super::get_line_and_column;

    #[test]
    fn test_line_and_column() {
        let lines = ["Dear ${name},", "${reason}"];

        assert_eq!(get_line_and_column(&lines, 0), (0, 0));
        assert_eq!(get_line_and_column(&lines, 7), (0, 7));
        assert_eq!(get_line_and_column(&lines, 16), (1, 2));
    }

    #[test]
    fn test_line_and_column_past_end() {
        let lines = ["abc"];

        assert_eq!(get_line_and_column(&lines, 3), (0, 3));
        assert_eq!(get_line_and_column(&lines, 10), (0, 3));
    }
}
