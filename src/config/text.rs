//! # Text Codec Options
//!
//! `TextOptions` carries the settings of the line codec: the output delimiter
//! and the comment marker. Input tokenization follows the delimiter: a
//! whitespace delimiter splits on any run of whitespace and honours quoted
//! tokens, any other delimiter splits on that exact string.
//!
//! ## Legacy Delimiter Descriptions
//!
//! Delimiters historically came from properties files where whitespace could
//! not be written literally, so they are described as space separated words:
//!
//! | Word    | Character |
//! |---------|-----------|
//! | `tab`   | `\t`      |
//! | `comma` | `,`       |
//! | `space` | ` `       |
//! | other   | itself    |
//!
//! `"comma tab"` therefore means `",\t"`. An empty description falls back to
//! a single tab.
//!
//! ## Usage
//!
//! ```
//! use rowdef::config::TextOptions;
//!
//! let opts = TextOptions::new().with_delimiter("\t");
//! assert_eq!(opts.delimiter(), "\t");
//!
//! let legacy = TextOptions::from_delimiter_description("comma space");
//! assert_eq!(legacy.delimiter(), ", ");
//! ```

use super::constants::{COMMENT_MARKER, DEFAULT_DELIMITER, FALLBACK_DELIMITER};

/// Settings for reading and writing delimited text records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextOptions {
    delimiter: String,
    comment_marker: char,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl TextOptions {
    /// Creates options with a single-space delimiter and `#` comments.
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            comment_marker: COMMENT_MARKER,
        }
    }

    /// Builds options from a legacy word-form delimiter description.
    pub fn from_delimiter_description(description: &str) -> Self {
        let mut delimiter = String::new();
        for word in description.split(' ') {
            match word.to_ascii_lowercase().as_str() {
                "tab" => delimiter.push('\t'),
                "comma" => delimiter.push(','),
                "space" => delimiter.push(' '),
                "" => {}
                _ => delimiter.push_str(word),
            }
        }
        if delimiter.is_empty() {
            delimiter.push_str(FALLBACK_DELIMITER);
        }
        Self::new().with_delimiter(delimiter)
    }

    /// Sets the output delimiter. An empty delimiter falls back to a tab.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        let delimiter = delimiter.into();
        self.delimiter = if delimiter.is_empty() {
            FALLBACK_DELIMITER.to_string()
        } else {
            delimiter
        };
        self
    }

    /// Sets the marker that introduces header and comment lines.
    pub fn with_comment_marker(mut self, marker: char) -> Self {
        self.comment_marker = marker;
        self
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn comment_marker(&self) -> char {
        self.comment_marker
    }

    /// True when the delimiter consists only of whitespace, in which case input
    /// is split on whitespace runs and text output may need quoting.
    pub fn splits_on_whitespace(&self) -> bool {
        self.delimiter.chars().all(char::is_whitespace)
    }
}
