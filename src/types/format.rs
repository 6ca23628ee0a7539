//! # printf-style Format Specifiers
//!
//! Every column carries a text format specifier that controls how its value is
//! rendered on output. The supported subset is the one needed for tabular
//! text files:
//!
//! ```text
//! %[flags][width][.precision]conversion
//!
//! flags       '-' left-justify, '0' zero-pad, '+' always sign, ' ' space for sign
//! conversion  d  decimal integer
//!             f  fixed-point float (default precision 6)
//!             e  scientific float, exponent sign and two digits minimum (1.235e+03)
//!             E  as e with an upper-case exponent marker
//!             s  text (precision truncates)
//! ```
//!
//! Non-finite floats render as `NaN`, `Infinity` and `-Infinity` under every
//! float conversion so that the output parses back to the same value.
//!
//! ## Usage
//!
//! ```
//! use rowdef::types::FormatSpec;
//!
//! let spec = FormatSpec::parse("%10.3e").unwrap();
//! assert_eq!(spec.format_float(1234.56), " 1.235e+03");
//!
//! let spec = FormatSpec::parse("%1.3f").unwrap();
//! assert_eq!(spec.format_float(3.5), "3.500");
//! ```

use eyre::{bail, ensure, eyre, Result};

use super::FieldType;

const DEFAULT_FLOAT_PRECISION: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    Decimal,
    Fixed,
    Exponent { upper: bool },
    Str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    source: String,
    left: bool,
    zero: bool,
    plus: bool,
    space: bool,
    width: usize,
    precision: Option<usize>,
    conversion: Conversion,
}

impl FormatSpec {
    pub fn parse(spec: &str) -> Result<Self> {
        let body = spec
            .strip_prefix('%')
            .ok_or_else(|| eyre!("format specifier '{}' must start with '%'", spec))?;
        let bytes = body.as_bytes();
        let mut pos = 0;

        let (mut left, mut zero, mut plus, mut space) = (false, false, false, false);
        while pos < bytes.len() {
            match bytes[pos] {
                b'-' => left = true,
                b'0' => zero = true,
                b'+' => plus = true,
                b' ' => space = true,
                _ => break,
            }
            pos += 1;
        }

        let width_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        let width = parse_digits(&body[width_start..pos], spec)?.unwrap_or(0);

        let precision = if pos < bytes.len() && bytes[pos] == b'.' {
            pos += 1;
            let start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            ensure!(
                pos > start,
                "format specifier '{}' has a '.' without a precision",
                spec
            );
            parse_digits(&body[start..pos], spec)?
        } else {
            None
        };

        let conversion = match bytes.get(pos) {
            Some(b'd') => Conversion::Decimal,
            Some(b'f') => Conversion::Fixed,
            Some(b'e') => Conversion::Exponent { upper: false },
            Some(b'E') => Conversion::Exponent { upper: true },
            Some(b's') => Conversion::Str,
            Some(_) => bail!("format specifier '{}' has an unsupported conversion", spec),
            None => bail!("format specifier '{}' has no conversion", spec),
        };
        ensure!(
            pos + 1 == bytes.len(),
            "format specifier '{}' has trailing characters",
            spec
        );
        ensure!(
            !(left && zero),
            "format specifier '{}' combines '-' and '0'",
            spec
        );

        Ok(Self {
            source: spec.to_string(),
            left,
            zero,
            plus,
            space,
            width,
            precision,
            conversion,
        })
    }

    pub fn conversion(&self) -> Conversion {
        self.conversion
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True if values of `ty` may be rendered with this specifier.
    pub fn accepts(&self, ty: FieldType) -> bool {
        match self.conversion {
            Conversion::Str => true,
            Conversion::Decimal => ty == FieldType::Integer,
            Conversion::Fixed | Conversion::Exponent { .. } => ty == FieldType::Float,
        }
    }

    pub fn format_integer(&self, v: i64) -> String {
        match self.conversion {
            Conversion::Decimal => self.pad_numeric(v < 0, v.unsigned_abs().to_string()),
            Conversion::Fixed | Conversion::Exponent { .. } => self.format_float(v as f64),
            Conversion::Str => self.format_text(&v.to_string()),
        }
    }

    pub fn format_float(&self, v: f64) -> String {
        let precision = self.precision.unwrap_or(DEFAULT_FLOAT_PRECISION);
        match self.conversion {
            Conversion::Fixed | Conversion::Exponent { .. } if !v.is_finite() => {
                self.pad(&float_literal(v))
            }
            Conversion::Fixed => {
                self.pad_numeric(v.is_sign_negative(), format!("{:.*}", precision, v.abs()))
            }
            Conversion::Exponent { upper } => {
                let digits = scientific(v.abs(), precision, upper);
                self.pad_numeric(v.is_sign_negative(), digits)
            }
            Conversion::Decimal | Conversion::Str => self.pad(&float_literal(v)),
        }
    }

    pub fn format_text(&self, v: &str) -> String {
        match (self.conversion, self.precision) {
            (Conversion::Str, Some(max)) => {
                let truncated: String = v.chars().take(max).collect();
                self.pad(&truncated)
            }
            _ => self.pad(v),
        }
    }

    fn pad_numeric(&self, negative: bool, digits: String) -> String {
        let sign = if negative {
            "-"
        } else if self.plus {
            "+"
        } else if self.space {
            " "
        } else {
            ""
        };
        let len = sign.len() + digits.len();
        if len >= self.width {
            return format!("{}{}", sign, digits);
        }
        let fill = self.width - len;
        if self.left {
            format!("{}{}{}", sign, digits, " ".repeat(fill))
        } else if self.zero {
            format!("{}{}{}", sign, "0".repeat(fill), digits)
        } else {
            format!("{}{}{}", " ".repeat(fill), sign, digits)
        }
    }

    fn pad(&self, text: &str) -> String {
        let len = text.chars().count();
        if len >= self.width {
            return text.to_string();
        }
        let fill = " ".repeat(self.width - len);
        if self.left {
            format!("{}{}", text, fill)
        } else {
            format!("{}{}", fill, text)
        }
    }
}

impl std::fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Shortest text that parses back to `v`, spelling non-finite values the way
/// the text codec reads them.
pub fn float_literal(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        let word = if v > 0.0 { "Infinity" } else { "-Infinity" };
        word.to_string()
    } else {
        format!("{:?}", v)
    }
}

fn scientific(v: f64, precision: usize, upper: bool) -> String {
    let rendered = format!("{:.*e}", precision, v);
    let (mantissa, exponent) = rendered.split_once('e').unwrap_or((&rendered, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    format!(
        "{}{}{}{:02}",
        mantissa,
        if upper { 'E' } else { 'e' },
        if exponent < 0 { '-' } else { '+' },
        exponent.unsigned_abs()
    )
}

fn parse_digits(digits: &str, spec: &str) -> Result<Option<usize>> {
    if digits.is_empty() {
        return Ok(None);
    }
    digits
        .parse()
        .map(Some)
        .map_err(|_| eyre!("format specifier '{}' has an oversized width or precision", spec))
}
