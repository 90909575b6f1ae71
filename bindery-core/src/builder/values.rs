//! Value selector: decides which column/value pairs participate in a query

use crate::ident::quote;
use crate::value::{Value, ValueMap};

/// Whether the selector renders plain column fields (INSERT) or
/// `col = :col` assignments (UPDATE)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueMode {
    Insert,
    Update,
}

/// Output of the value selector: parallel field and placeholder lists
/// plus the sanitized bind-value map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryValues {
    pub fields: Vec<String>,
    pub placeholders: Vec<String>,
    pub values: ValueMap,
}

/// Walk `include_keys` in order and emit one field, placeholder and bind
/// value per key that participates.
///
/// A key is silently dropped (not an error) when it is absent from
/// `values`, when its value is boolean `false` (the "omit this field"
/// sentinel), when the key contains a hyphen (invalid in an unquoted
/// bind-parameter name), or when its value is composite. Null values
/// bind as an empty string.
pub fn query_values<S: AsRef<str>>(
    mode: ValueMode,
    values: &ValueMap,
    include_keys: &[S],
) -> QueryValues {
    let mut out = QueryValues::default();

    for key in include_keys {
        let key = key.as_ref().trim();
        let val = match values.get(key) {
            Some(val) => val,
            None => continue,
        };
        if matches!(val, Value::Bool(false)) || key.contains('-') || val.is_composite() {
            continue;
        }

        let placeholder = format!(":{key}");
        out.fields.push(match mode {
            ValueMode::Insert => quote(key),
            ValueMode::Update => format!("{} = {placeholder}", quote(key)),
        });
        let bound = if val.is_null() {
            Value::String(String::new())
        } else {
            val.clone()
        };
        out.values.insert(key, bound);
        out.placeholders.push(placeholder);
    }

    out
}

/// Resolve an ExcludeKeys list to an IncludeKeys list: every key of
/// `values` not named in `exclude`, in the order `values` holds them.
pub fn exclude_keys<S: AsRef<str>>(values: &ValueMap, exclude: &[S]) -> Vec<String> {
    values
        .keys()
        .filter(|key| !exclude.iter().any(|e| e.as_ref() == *key))
        .map(str::to_string)
        .collect()
}

/// How a builder chooses which keys of its value map participate
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) enum KeySpec {
    /// Every key of the value map (same as excluding nothing)
    #[default]
    All,
    Include(Vec<String>),
    Exclude(Vec<String>),
}

impl KeySpec {
    pub(crate) fn resolve(&self, values: &ValueMap) -> Vec<String> {
        match self {
            KeySpec::All => values.keys().map(str::to_string).collect(),
            KeySpec::Include(keys) => keys.clone(),
            KeySpec::Exclude(keys) => exclude_keys(values, keys),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_mode_fields_and_placeholders() {
        let vals = values! { "name" => "John", "age" => 30 };
        let out = query_values(ValueMode::Insert, &vals, &["name", "age"]);
        assert_eq!(out.fields, vec!["`name`", "`age`"]);
        assert_eq!(out.placeholders, vec![":name", ":age"]);
        assert_eq!(out.values, values! { "name" => "John", "age" => 30 });
    }

    #[test]
    fn test_update_mode_renders_assignments() {
        let vals = values! { "name" => "Jane" };
        let out = query_values(ValueMode::Update, &vals, &["name"]);
        assert_eq!(out.fields, vec!["`name` = :name"]);
        assert_eq!(out.placeholders, vec![":name"]);
    }

    #[test]
    fn test_absent_key_is_skipped() {
        let vals = values! { "name" => "John" };
        let out = query_values(ValueMode::Insert, &vals, &["name", "missing"]);
        assert_eq!(out.fields, vec!["`name`"]);
        assert_eq!(out.values.len(), 1);
    }

    #[test]
    fn test_false_value_is_skipped() {
        let vals = values! { "name" => "John", "hidden" => false };
        let out = query_values(ValueMode::Insert, &vals, &["name", "hidden"]);
        assert_eq!(out.fields, vec!["`name`"]);
        assert!(!out.values.contains_key("hidden"));
    }

    #[test]
    fn test_true_and_zero_are_kept() {
        // only `false` is the omission sentinel
        let vals = values! { "flag" => true, "count" => 0 };
        let out = query_values(ValueMode::Insert, &vals, &["flag", "count"]);
        assert_eq!(out.fields, vec!["`flag`", "`count`"]);
    }

    #[test]
    fn test_hyphenated_key_is_skipped() {
        let vals = values! { "first-name" => "John", "name" => "J" };
        let out = query_values(ValueMode::Insert, &vals, &["first-name", "name"]);
        assert_eq!(out.fields, vec!["`name`"]);
    }

    #[test]
    fn test_composite_value_is_skipped() {
        let vals = values! {
            "tags" => vec!["a", "b"],
            "meta" => serde_json::json!({"k": 1}),
            "name" => "John"
        };
        let out = query_values(ValueMode::Insert, &vals, &["tags", "meta", "name"]);
        assert_eq!(out.fields, vec!["`name`"]);
    }

    #[test]
    fn test_null_binds_as_empty_string() {
        let vals = values! { "note" => () };
        let out = query_values(ValueMode::Update, &vals, &["note"]);
        assert_eq!(out.values.get("note"), Some(&Value::String(String::new())));
    }

    #[test]
    fn test_keys_are_trimmed() {
        let vals = values! { "name" => "John" };
        let out = query_values(ValueMode::Insert, &vals, &[" name "]);
        assert_eq!(out.fields, vec!["`name`"]);
        assert_eq!(out.placeholders, vec![":name"]);
    }

    #[test]
    fn test_field_count_matches_surviving_keys() {
        let vals = values! {
            "a" => 1,
            "b" => false,
            "c-d" => 2,
            "e" => vec![1, 2]
        };
        let include = ["a", "b", "c-d", "e", "missing"];
        let out = query_values(ValueMode::Insert, &vals, &include);
        assert_eq!(out.fields.len(), 1);
        assert_eq!(out.placeholders.len(), 1);
        assert_eq!(out.values.len(), 1);
    }

    #[test]
    fn test_exclude_keys_partitions_value_keys() {
        let vals = values! { "a" => 1, "b" => 2, "c" => 3 };
        let included = exclude_keys(&vals, &["b"]);
        assert_eq!(included, vec!["a", "c"]);

        // included ∪ excluded == keys(values), and the sets are disjoint
        let excluded = ["b"];
        for key in vals.keys() {
            let in_included = included.iter().any(|k| k == key);
            let in_excluded = excluded.contains(&key);
            assert!(in_included ^ in_excluded, "key {key} must be in exactly one set");
        }
    }

    #[test]
    fn test_exclude_keys_ignores_unknown_names() {
        let vals = values! { "a" => 1 };
        assert_eq!(exclude_keys(&vals, &["nope"]), vec!["a"]);
    }

    #[test]
    fn test_key_spec_resolution() {
        let vals = values! { "a" => 1, "b" => 2 };
        assert_eq!(KeySpec::All.resolve(&vals), vec!["a", "b"]);
        assert_eq!(
            KeySpec::Include(vec!["b".to_string()]).resolve(&vals),
            vec!["b"]
        );
        assert_eq!(
            KeySpec::Exclude(vec!["b".to_string()]).resolve(&vals),
            vec!["a"]
        );
    }
}
