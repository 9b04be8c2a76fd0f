//! Custom SQL helpers registered on every connection.
//!
//! SQLite's built-in `LIKE`, `lower()` and `NOCASE` only fold ASCII, which
//! misses accented names such as `Saúde`. These helpers fold full Unicode.

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

/// Scalar function used by rewritten `LIKE` predicates.
pub const CASEFOLD_FUNCTION: &str = "casefold";
/// Collation declared on name columns.
pub const CASE_INSENSITIVE_COLLATION: &str = "case_insensitive";

/// Folds text for case-insensitive comparison.
pub fn casefold(value: &str) -> String {
    value.to_lowercase()
}

pub(super) fn register_sql_helpers(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        CASEFOLD_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value = ctx.get::<Option<String>>(0)?;
            Ok(value.map(|text| casefold(&text)))
        },
    )?;
    conn.create_collation(CASE_INSENSITIVE_COLLATION, |left: &str, right: &str| {
        casefold(left).cmp(&casefold(right))
    })?;
    Ok(())
}
