//! Human-readable asset tags (`A1000`, `A1001`, ...).
//!
//! Tag values come from a single atomic counter row in the database
//! (`id_sequences`, name [`ASSET_TAG_SEQUENCE`]); this module only formats
//! and parses them. The counter starts at [`FIRST_TAG_VALUE`], so the first
//! asset ever created is `A1000`.

/// Prefix shared by every asset tag.
pub const ASSET_TAG_PREFIX: char = 'A';

/// Name of the counter row that hands out tag values.
pub const ASSET_TAG_SEQUENCE: &str = "asset_tag";

/// First value the counter hands out.
pub const FIRST_TAG_VALUE: i64 = 1000;

/// Minimum number of digits after the prefix.
const MIN_DIGITS: usize = 4;

/// Format a counter value as an asset tag, zero-padded to four digits.
pub fn format_asset_tag(value: i64) -> String {
    format!("{ASSET_TAG_PREFIX}{value:0width$}", width = MIN_DIGITS)
}

/// Extract the numeric suffix of a tag, or `None` if the string is not a tag.
pub fn parse_asset_tag(tag: &str) -> Option<i64> {
    let digits = tag.strip_prefix(ASSET_TAG_PREFIX)?;
    if digits.len() < MIN_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
