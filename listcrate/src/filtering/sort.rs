use sea_orm::sea_query::Order;

use super::scope::Scope;

const DESCENDING_SUFFIX: &str = "desc";
const ASCENDING_SUFFIX: &str = "asc";

/// Split a sort key into its field and direction.
///
/// The field is the key with its last `_suffix` removed; only `desc` sorts
/// descending. A key without an underscore is the field itself, ascending.
#[must_use]
pub fn parse_sort_key(key: &str) -> (&str, Order) {
    match key.rsplit_once('_') {
        Some((field, suffix)) if !field.is_empty() => (field, parse_order(suffix)),
        _ => (key, Order::Asc),
    }
}

/// Convert a sort suffix to an Order; anything but `desc` is ascending
fn parse_order(suffix: &str) -> Order {
    if suffix == DESCENDING_SUFFIX {
        Order::Desc
    } else {
        Order::Asc
    }
}

/// Make the requested sort the primary ordering of `scope`.
///
/// With `sortable` given, keys naming any other field leave the scope unchanged.
#[must_use]
pub fn apply_sort(scope: Scope, sort: Option<&str>, sortable: Option<&[&str]>) -> Scope {
    let Some(key) = sort.map(str::trim).filter(|key| !key.is_empty()) else {
        return scope;
    };
    let (field, order) = parse_sort_key(key);
    if sortable.is_some_and(|columns| !columns.contains(&field)) {
        tracing::debug!(sort = key, field, "Ignoring sort on non-sortable field");
        return scope;
    }
    scope.order_first(field, order)
}

/// Every sort key accepted for `columns`, e.g. `views_asc`, `views_desc`.
#[must_use]
pub fn sort_keys(columns: &[&str]) -> Vec<String> {
    columns
        .iter()
        .flat_map(|column| {
            [
                format!("{column}_{ASCENDING_SUFFIX}"),
                format!("{column}_{DESCENDING_SUFFIX}"),
            ]
        })
        .collect()
}
