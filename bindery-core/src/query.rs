//! The bound-query result type

use crate::error::{Error, Result};
use crate::value::{Value, ValueMap};
use serde::Serialize;
use std::ops::Range;

/// SQL text plus its named bind-value map.
///
/// Every `:name` placeholder in `text` is expected to have exactly one
/// entry in `values`, and every entry to be referenced at least once;
/// the builders in this crate uphold that invariant for map-based WHERE
/// specs. Raw-string WHERE fragments are passed through verbatim, so
/// any placeholders they contain are the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundQuery {
    pub text: String,
    pub values: ValueMap,
}

impl BoundQuery {
    pub fn new(text: impl Into<String>, values: ValueMap) -> Self {
        Self {
            text: text.into(),
            values,
        }
    }

    /// The `:name` placeholders appearing in the text, in order of
    /// appearance, duplicates included. Tokens inside quoted string or
    /// identifier spans are not placeholders.
    pub fn placeholder_names(&self) -> Vec<&str> {
        scan_placeholders(&self.text)
            .into_iter()
            .map(|span| &self.text[span])
            .collect()
    }

    /// Rewrite the text to positional `?` placeholders and return the
    /// bind values in placeholder order, for drivers that do not accept
    /// named parameters. A placeholder with no matching bind value is an
    /// [`Error::UnboundParameter`].
    pub fn to_positional(&self) -> Result<(String, Vec<Value>)> {
        let mut sql = String::with_capacity(self.text.len());
        let mut params = Vec::new();
        let mut last = 0;

        for span in scan_placeholders(&self.text) {
            let name = &self.text[span.clone()];
            let value = self
                .values
                .get(name)
                .ok_or_else(|| Error::unbound_parameter(name, &self.text))?;
            sql.push_str(&self.text[last..span.start - 1]);
            sql.push('?');
            params.push(value.clone());
            last = span.end;
        }
        sql.push_str(&self.text[last..]);

        Ok((sql, params))
    }
}

/// Byte ranges of `:name` tokens, skipping `'...'`, `"..."` and
/// `` `...` `` spans. Names match `[A-Za-z0-9_]+`.
fn scan_placeholders(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'\'' | b'"' | b'`' => quote = Some(b),
                b':' => {
                    let start = i + 1;
                    let mut end = start;
                    while end < bytes.len()
                        && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_')
                    {
                        end += 1;
                    }
                    if end > start {
                        spans.push(start..end);
                        i = end;
                        continue;
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }

    spans
}
