//! Identifier quoting and key-prefix utilities

/// Backtick-quote an identifier. Table and column names are interpolated
/// into SQL text, never parameterized, so quoting is the only treatment
/// they receive; trusting the name is the caller's responsibility.
pub(crate) fn quote(name: &str) -> String {
    format!("`{name}`")
}

/// Split a dotted `table.column` key on the first dot.
///
/// Returns `(column, prefix)`; the prefix (if any) is kept verbatim and
/// must not be quoted, only the column segment is.
pub(crate) fn split_prefix(key: &str) -> (&str, Option<&str>) {
    match key.split_once('.') {
        Some((prefix, column)) => (column, Some(prefix)),
        None => (key, None),
    }
}

/// Render a possibly-prefixed column as SQL: `` pfx.`column` `` or `` `column` ``.
pub(crate) fn quote_prefixed(key: &str) -> String {
    let (column, prefix) = split_prefix(key);
    match prefix {
        Some(prefix) => format!("{prefix}.{}", quote(column)),
        None => quote(column),
    }
}
