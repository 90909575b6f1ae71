//! WHERE-clause composition

use crate::ident::{quote_prefixed, split_prefix};
use crate::operator::{op, Operator};
use crate::value::{Value, ValueMap};

/// Suffix appended to a bind name when the same column is used both as a
/// SET target and as a WHERE key within one query
pub const KEY_COLLISION: &str = "____";

/// A WHERE specification: either a raw SQL fragment used verbatim, or an
/// ordered column/value map rendered as `AND`-joined equality predicates
#[derive(Debug, Clone, PartialEq)]
pub enum Where {
    /// Used as-is; contributes no bind values. The caller owns its
    /// correctness, including any placeholders it mentions.
    Raw(String),
    /// Each `column -> value` pair becomes one `` `column` = :column ``
    /// predicate. Keys may be dotted (`table.column`); the prefix stays
    /// unquoted.
    Map(ValueMap),
}

impl Where {
    /// An empty raw string or an empty map both compose to no clause
    pub fn is_empty(&self) -> bool {
        match self {
            Where::Raw(s) => s.is_empty(),
            Where::Map(map) => map.is_empty(),
        }
    }
}

impl Default for Where {
    fn default() -> Self {
        Where::Raw(String::new())
    }
}

impl From<&str> for Where {
    fn from(raw: &str) -> Self {
        Where::Raw(raw.to_string())
    }
}

impl From<String> for Where {
    fn from(raw: String) -> Self {
        Where::Raw(raw)
    }
}

impl From<ValueMap> for Where {
    fn from(map: ValueMap) -> Self {
        Where::Map(map)
    }
}

/// Bind-parameter name for a WHERE column: the column itself, or the
/// column plus [`KEY_COLLISION`] when that name is already taken by an
/// existing bind (a SET-clause value of the same column).
fn bind_name(column: &str, existing_binds: &ValueMap) -> String {
    if existing_binds.contains_key(column) {
        format!("{column}{KEY_COLLISION}")
    } else {
        column.to_string()
    }
}

/// Compose a WHERE specification into clause text.
///
/// Raw specifications pass through unmodified. Map specifications render
/// one equality predicate per entry, joined with ` and `; dotted keys
/// keep their prefix unquoted and bind under the column segment alone.
/// `existing_binds` holds bind names already claimed by the enclosing
/// query, used for collision renaming.
pub fn compose_where(spec: &Where, existing_binds: &ValueMap) -> String {
    match spec {
        Where::Raw(raw) => raw.clone(),
        Where::Map(map) => {
            let predicates: Vec<String> = map
                .iter()
                .map(|(key, _)| {
                    let (column, _) = split_prefix(key);
                    let param = bind_name(column, existing_binds);
                    format!("{} = :{param}", quote_prefixed(key))
                })
                .collect();
            predicates.join(" and ")
        }
    }
}

/// Variant of [`compose_where`] with a caller-supplied operator per
/// column (`=` when a column has none, or when the supplied operator is
/// empty). Returns clause text only and performs no collision renaming;
/// bind values are the caller's to supply.
///
/// # Examples
/// ```
/// use bindery_core::{compose_where_with_operators, op, values};
///
/// let clause = compose_where_with_operators(
///     &values! { "id" => 1, "date" => "2015-07-30" },
///     &[("date", op::GTE)],
/// );
/// assert_eq!(clause, "`id` = :id and `date` >= :date");
/// ```
pub fn compose_where_with_operators(map: &ValueMap, operators: &[(&str, Operator)]) -> String {
    let predicates: Vec<String> = map
        .iter()
        .map(|(key, _)| {
            let operator = operators
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, o)| o.clone())
                .filter(|o| !o.as_str().is_empty())
                .unwrap_or(op::EQ);
            let (column, _) = split_prefix(key);
            format!("{} {operator} :{column}", quote_prefixed(key))
        })
        .collect();
    predicates.join(" and ")
}

/// Bind values for a map-based WHERE: keys renamed to the exact names
/// the composed clause used (split column segment, collision suffix
/// applied against `existing_binds`), boolean `false` coerced to null
/// since it is not a valid bind parameter in most drivers.
pub(crate) fn where_bind_values(map: &ValueMap, existing_binds: &ValueMap) -> ValueMap {
    let mut out = ValueMap::new();
    for (key, val) in map.iter() {
        let (column, _) = split_prefix(key);
        let name = bind_name(column, existing_binds);
        let val = if matches!(val, Value::Bool(false)) {
            Value::Null
        } else {
            val.clone()
        };
        out.insert(name, val);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_raw_passes_through_verbatim() {
        let spec = Where::from("id > 5 and deleted_at IS NULL");
        assert_eq!(
            compose_where(&spec, &ValueMap::new()),
            "id > 5 and deleted_at IS NULL"
        );
    }

    #[test]
    fn test_map_composes_equalities() {
        let spec = Where::from(values! { "id" => 1, "status" => "active" });
        assert_eq!(
            compose_where(&spec, &ValueMap::new()),
            "`id` = :id and `status` = :status"
        );
    }

    #[test]
    fn test_empty_specs_compose_to_nothing() {
        assert_eq!(compose_where(&Where::default(), &ValueMap::new()), "");
        assert_eq!(
            compose_where(&Where::from(ValueMap::new()), &ValueMap::new()),
            ""
        );
        assert!(Where::default().is_empty());
        assert!(Where::from(ValueMap::new()).is_empty());
    }

    #[test]
    fn test_dotted_key_keeps_prefix_unquoted() {
        let spec = Where::from(values! { "users.id" => 1 });
        assert_eq!(compose_where(&spec, &ValueMap::new()), "users.`id` = :id");
    }

    #[test]
    fn test_collision_appends_marker() {
        let existing = values! { "name" => "new" };
        let spec = Where::from(values! { "name" => "old" });
        assert_eq!(compose_where(&spec, &existing), "`name` = :name____");
    }

    #[test]
    fn test_operators_variant_defaults_to_equality() {
        let clause = compose_where_with_operators(
            &values! { "id" => 1, "date" => "2015-07-30" },
            &[("date", op::GTE)],
        );
        assert_eq!(clause, "`id` = :id and `date` >= :date");
    }

    #[test]
    fn test_operators_variant_empty_operator_defaults_to_equality() {
        let clause = compose_where_with_operators(
            &values! { "id" => 1 },
            &[("id", Operator::custom(""))],
        );
        assert_eq!(clause, "`id` = :id");
    }

    #[test]
    fn test_operators_variant_custom_operator() {
        let clause =
            compose_where_with_operators(&values! { "name" => "j%" }, &[("name", op::LIKE)]);
        assert_eq!(clause, "`name` LIKE :name");
    }

    #[test]
    fn test_operators_variant_dotted_key() {
        let clause = compose_where_with_operators(
            &values! { "orders.total" => 100 },
            &[("orders.total", op::GT)],
        );
        assert_eq!(clause, "orders.`total` > :total");
    }

    #[test]
    fn test_where_bind_values_coerces_false_to_null() {
        let binds = where_bind_values(&values! { "active" => false }, &ValueMap::new());
        assert_eq!(binds.get("active"), Some(&Value::Null));
    }

    #[test]
    fn test_where_bind_values_renames_on_collision() {
        let existing = values! { "name" => "new" };
        let binds = where_bind_values(&values! { "name" => "old" }, &existing);
        assert!(!binds.contains_key("name"));
        assert_eq!(
            binds.get("name____"),
            Some(&Value::String("old".to_string()))
        );
    }

    #[test]
    fn test_where_bind_values_uses_split_column_for_dotted_keys() {
        let binds = where_bind_values(&values! { "users.id" => 1 }, &ValueMap::new());
        assert_eq!(binds.get("id"), Some(&Value::I32(1)));
    }
}
