//! The composable narrowing expression every predicate works on.

use sea_orm::{
    Condition, DbBackend, EntityTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait, Select,
    sea_query::{Alias, ConditionExpression, IntoColumnRef, Order, SimpleExpr},
};

/// Offset window applied by pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

/// A lazy description of a list query: a conjunction of clauses, an ordering,
/// an optional pagination window, and whether default scoping was suspended.
///
/// Nothing is executed until the scope is turned into a Sea-ORM `Select` with
/// [`Scope::into_select`] and handed to a connection.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    condition: Condition,
    orders: Vec<(String, Order)>,
    window: Option<Window>,
    unscoped: bool,
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Scope {
    /// Scope matching every record.
    #[must_use]
    pub fn new() -> Self {
        Self {
            condition: Condition::all(),
            orders: Vec::new(),
            window: None,
            unscoped: false,
        }
    }

    /// Scope starting from an existing selector.
    #[must_use]
    pub fn from_condition(condition: Condition) -> Self {
        Self::new().and(condition)
    }

    /// Conjoin a clause onto this scope. Clauses are never replaced.
    ///
    /// An empty `Condition::all()` matches everything and is dropped.
    #[must_use]
    pub fn and<C>(mut self, clause: C) -> Self
    where
        C: Into<ConditionExpression>,
    {
        let clause = clause.into();
        if matches!(&clause, ConditionExpression::Condition(condition) if *condition == Condition::all()) {
            return self;
        }
        self.condition = self.condition.add(clause);
        self
    }

    /// Append an ordering on `column`.
    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>, order: Order) -> Self {
        self.orders.push((column.into(), order));
        self
    }

    /// Make `column` the primary ordering; existing orderings become tie-breakers.
    #[must_use]
    pub fn order_first(mut self, column: impl Into<String>, order: Order) -> Self {
        let column = column.into();
        self.orders.retain(|(existing, _)| *existing != column);
        self.orders.insert(0, (column, order));
        self
    }

    /// Restrict the scope to an offset window.
    #[must_use]
    pub fn window(mut self, window: Window) -> Self {
        self.window = Some(window);
        self
    }

    /// Drop the pagination window, e.g. to count the whole result set.
    #[must_use]
    pub fn without_window(mut self) -> Self {
        self.window = None;
        self
    }

    /// Mark the scope as built with default scoping suspended.
    #[must_use]
    pub fn unscoped(mut self, unscoped: bool) -> Self {
        self.unscoped = unscoped;
        self
    }

    #[must_use]
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    #[must_use]
    pub fn orders(&self) -> &[(String, Order)] {
        &self.orders
    }

    #[must_use]
    pub fn pagination(&self) -> Option<Window> {
        self.window
    }

    #[must_use]
    pub fn is_unscoped(&self) -> bool {
        self.unscoped
    }

    /// Apply this scope to a fresh `SELECT` over `E`.
    #[must_use]
    pub fn into_select<E: EntityTrait>(self) -> Select<E> {
        self.apply(E::find())
    }

    /// Apply this scope on top of an existing select.
    #[must_use]
    pub fn apply<E: EntityTrait>(self, select: Select<E>) -> Select<E> {
        let mut select = if self.condition.is_empty() {
            select
        } else {
            select.filter(self.condition)
        };
        for (column, order) in self.orders {
            select = select.order_by(column_expr(&column), order);
        }
        if let Some(window) = self.window {
            select = select.offset(window.offset).limit(window.limit);
        }
        select
    }

    /// Render the query this scope produces for `E`, values inlined.
    #[must_use]
    pub fn to_sql<E: EntityTrait>(&self, backend: DbBackend) -> String {
        self.clone().into_select::<E>().build(backend).to_string()
    }
}

pub(crate) fn column_expr(column: &str) -> SimpleExpr {
    SimpleExpr::Column(Alias::new(column).into_column_ref())
}
