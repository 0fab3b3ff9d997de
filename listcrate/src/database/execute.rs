use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait};

use crate::ApiError;
use crate::core::ListResource;
use crate::filtering::{DEFAULT_PER_PAGE, Scope};
use crate::models::{ListResult, Page};

type ModelOf<R> = <<R as ListResource>::EntityType as EntityTrait>::Model;

/// Run `scope` against `db`, window included.
///
/// # Errors
///
/// Returns a database error when the query fails.
pub async fn fetch_all<R: ListResource>(
    db: &impl ConnectionTrait,
    scope: Scope,
) -> Result<Vec<ModelOf<R>>, ApiError> {
    Ok(scope.into_select::<R::EntityType>().all(db).await?)
}

/// Count every record `scope` matches, ignoring its window.
///
/// # Errors
///
/// Returns a database error when the query fails.
pub async fn count_total<R: ListResource>(
    db: &impl ConnectionTrait,
    scope: &Scope,
) -> Result<u64, ApiError>
where
    ModelOf<R>: Sync,
{
    let select = scope.clone().without_window().into_select::<R::EntityType>();
    Ok(PaginatorTrait::count(select, db).await?)
}

/// Fetch the window of `result` and count the records it was cut from.
///
/// # Errors
///
/// Returns a database error when either query fails.
pub async fn fetch_page<R: ListResource>(
    db: &impl ConnectionTrait,
    result: ListResult,
) -> Result<Page<ModelOf<R>>, ApiError>
where
    ModelOf<R>: Sync,
{
    let per = result
        .list
        .pagination()
        .map_or(DEFAULT_PER_PAGE, |window| window.limit);
    let total = count_total::<R>(db, &result.list).await?;
    let items = fetch_all::<R>(db, result.list).await?;
    tracing::debug!(resource = R::RESOURCE_NAME, total, fetched = items.len(), "Fetched list page");

    Ok(Page {
        items,
        total: Some(total),
        page: result.page,
        per,
    })
}
