use sea_orm::sea_query::{Alias, Expr, Func, LikeExpr, Query, SimpleExpr};

// Basic safety limits
pub(crate) const MAX_SEARCH_QUERY_LENGTH: usize = 10_000;

/// Escape character for LIKE patterns; needs no quoting in any backend.
const LIKE_ESCAPE: char = '!';

/// Alias of the unnested element in array searches.
const ARRAY_ELEMENT: &str = "elem";

/// Escape LIKE wildcards so the value is matched literally
/// Escapes: % (match any) and _ (match single char)
pub(crate) fn escape_like_wildcards(input: &str) -> String {
    input
        .replace(LIKE_ESCAPE, "!!") // Escape the escape character first
        .replace('%', "!%")
        .replace('_', "!_")
}

/// Whether `value` is short enough to search for.
pub(crate) fn is_searchable(value: &str) -> bool {
    value.chars().count() <= MAX_SEARCH_QUERY_LENGTH
}

/// Uppercased `%value%` pattern with wildcards escaped.
fn contains_pattern(value: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", escape_like_wildcards(value).to_uppercase())).escape(LIKE_ESCAPE)
}

/// Case-insensitive literal substring match on a scalar column:
/// `UPPER(column) LIKE '%VALUE%' ESCAPE '!'`
#[must_use]
pub fn build_like_condition(column: &str, value: &str) -> SimpleExpr {
    Expr::expr(Func::upper(Expr::col(Alias::new(column)))).like(contains_pattern(value))
}

/// Case-insensitive literal substring match against any element of an array column:
/// `EXISTS (SELECT 1 FROM UNNEST(column) AS elem WHERE UPPER(elem) LIKE '%VALUE%' ESCAPE '!')`
#[must_use]
pub fn build_array_like_condition(column: &str, value: &str) -> SimpleExpr {
    let elements = Query::select()
        .expr(Expr::cust("1"))
        .from_function(
            Func::cust(Alias::new("UNNEST")).arg(Expr::col(Alias::new(column))),
            Alias::new(ARRAY_ELEMENT),
        )
        .and_where(
            Expr::expr(Func::upper(Expr::col(Alias::new(ARRAY_ELEMENT))))
                .like(contains_pattern(value)),
        )
        .to_owned();
    Expr::exists(elements)
}

/// `value = ANY(column)` for array columns.
#[must_use]
pub fn build_array_element_condition(column: &str, value: sea_orm::Value) -> SimpleExpr {
    Expr::val(value).eq(Func::cust(Alias::new("ANY")).arg(Expr::col(Alias::new(column))))
}
