//! # rowdef Configuration Constants
//!
//! This module centralizes the constants shared by the record codecs and the
//! SQL text generator. Values that define a wire layout are co-located with
//! the values derived from them so that the binary stream codec, the buffer
//! codec and the signature computation can never disagree.
//!
//! ## Dependency Graph
//!
//! ```text
//! NUMERIC_FIELD_WIDTH (8)
//!       │
//!       └─> every Integer/Float column contributes exactly this many bytes
//!           to TableDef::max_bytes() and to the encoded record
//!
//! TEXT_LENGTH_PREFIX_WIDTH (4)
//!       │
//!       ├─> big-endian u32 length written before every Text field
//!       │
//!       └─> MAX_TEXT_FIELD_BYTES (must fit in the prefix)
//!
//! DDL_NAME_WIDTH (12) / DDL_TYPE_WIDTH (20)
//!       │
//!       └─> column lines in CREATE TABLE scripts:
//!           "grn          number(8)            NOT NULL,"
//! ```
//!
//! ## Critical Invariants
//!
//! Enforced by compile-time assertions:
//!
//! 1. `NUMERIC_FIELD_WIDTH == size_of::<i64>() == size_of::<f64>()`
//! 2. `TEXT_LENGTH_PREFIX_WIDTH == size_of::<u32>()`
//! 3. `MAX_TEXT_FIELD_BYTES <= u32::MAX`

// ============================================================================
// BINARY LAYOUT
// Shared by the stream codec, the buffer codec and the content signature
// ============================================================================

/// Width in bytes of an encoded Integer or Float field (big-endian).
pub const NUMERIC_FIELD_WIDTH: usize = 8;

/// Width in bytes of the big-endian unsigned length written before the UTF-8
/// bytes of every Text field.
pub const TEXT_LENGTH_PREFIX_WIDTH: usize = 4;

/// Largest Text payload accepted when decoding binary input. A length prefix
/// above this value is treated as corrupt input rather than allocated.
pub const MAX_TEXT_FIELD_BYTES: usize = 65_535;

/// Most UTF-8 bytes one character can take.
pub const MAX_UTF8_CHAR_BYTES: usize = 4;

const _: () = assert!(
    NUMERIC_FIELD_WIDTH == std::mem::size_of::<i64>()
        && NUMERIC_FIELD_WIDTH == std::mem::size_of::<f64>(),
    "NUMERIC_FIELD_WIDTH must match the width of i64 and f64"
);

const _: () = assert!(
    TEXT_LENGTH_PREFIX_WIDTH == std::mem::size_of::<u32>(),
    "TEXT_LENGTH_PREFIX_WIDTH must match the u32 length prefix"
);

const _: () = assert!(
    MAX_TEXT_FIELD_BYTES as u64 <= u32::MAX as u64,
    "MAX_TEXT_FIELD_BYTES must be representable in the length prefix"
);

// ============================================================================
// NA SENTINELS
// Legacy "not available" constants used when a column declares no override
// ============================================================================

/// Default NA sentinel for Integer columns.
pub const DEFAULT_INTEGER_NA: i64 = i64::MIN;

/// Default NA sentinel for Float columns.
pub const DEFAULT_FLOAT_NA: f64 = f64::NAN;

/// Default NA sentinel for Text columns.
pub const DEFAULT_TEXT_NA: &str = "-";

// ============================================================================
// TEXT FORMAT
// ============================================================================

/// Marker that starts a header or comment line in text streams.
pub const COMMENT_MARKER: char = '#';

/// Delimiter used between output fields unless configured otherwise.
pub const DEFAULT_DELIMITER: &str = " ";

/// Delimiter used when a legacy delimiter description resolves to nothing.
pub const FALLBACK_DELIMITER: &str = "\t";

// ============================================================================
// SQL TEXT
// ============================================================================

/// Trailing column appended to every table for the row load date.
pub const LOAD_DATE_COLUMN: &str = "lddate";

/// SQL type of the load-date column.
pub const LOAD_DATE_SQL_TYPE: &str = "date";

/// Server-side timestamp expression used by the legacy literal INSERT text.
pub const LEGACY_TIMESTAMP_MARKER: &str = "SYSDATE";

/// Server-side timestamp expression used by the parameterized INSERT text.
pub const CURRENT_TIMESTAMP_MARKER: &str = "CURRENT_TIMESTAMP";

/// Padding width of the column name in CREATE TABLE column lines.
pub const DDL_NAME_WIDTH: usize = 12;

/// Padding width of the SQL type in CREATE TABLE column lines.
pub const DDL_TYPE_WIDTH: usize = 20;

/// Highest `number(p)` precision for which a magnitude bound is enforced.
/// Larger precisions exceed the i64 range and are left unbounded.
pub const MAX_CHECKED_PRECISION: u8 = 18;

const _: () = assert!(
    10i64.checked_pow(MAX_CHECKED_PRECISION as u32).is_some(),
    "MAX_CHECKED_PRECISION must keep 10^p inside i64"
);

// ============================================================================
// MEMORY
// ============================================================================

/// Number of field values stored inline in a record before spilling to the heap.
pub const INLINE_COLUMN_CAPACITY: usize = 16;
