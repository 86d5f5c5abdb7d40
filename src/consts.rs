/// Two-digit years at or above this value belong to the 1900s
pub const TWO_DIGIT_YEAR_PIVOT: i32 = 70;

/// Token splitting the `from` and `to` halves of an editable range
pub const RANGE_SEPARATOR: &str = "to";

/// Joiner placed between `from` and `to` in composite and display values
pub const RANGE_JOINER: &str = " to ";

/// Escape character shared by both format dialects
pub const FORMAT_ESCAPE: char = '\\';

/// Default storage and input format (PHP dialect)
pub const DEFAULT_FORMAT: &str = "Y-m-d";

/// Field type identifier registered with the host
pub const FIELD_TYPE: &str = "date_range";

/// Recognised English ordinal suffixes
pub const ORDINAL_SUFFIXES: [&str; 4] = ["st", "nd", "rd", "th"];

/// Byte length of every ordinal suffix
pub(crate) const ORDINAL_SUFFIX_LEN: usize = 2;
