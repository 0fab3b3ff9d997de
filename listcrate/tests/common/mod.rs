#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use listcrate::{
    ApiError, AuthorizeAction, ListConfig, ListEngine, ListParams, Page, ResourceInfo, Scope,
    ScopeResolver, fetch_page,
};
use sea_orm::{
    ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema, Set,
};
use sea_orm_migration::{MigrationName, MigrationTrait, MigratorTrait, SchemaManager};
use uuid::Uuid;

pub mod article_entity;
pub mod author_entity;

use article_entity::Articles;

/// Articles seeded by [`setup_test_db`]; the last three are soft-deleted.
pub const ARTICLE_COUNT: i32 = 35;
pub const DELETED_FROM: i32 = 33;

/// Route library logs to the test output; `RUST_LOG=listcrate=debug` shows filter generation.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    init_tracing();
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;
    seed(&db).await?;

    Ok(db)
}

pub struct Migrator;

#[async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateAuthorsAndArticles)]
    }
}

pub struct CreateAuthorsAndArticles;

impl MigrationName for CreateAuthorsAndArticles {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_authors_and_articles"
    }
}

#[async_trait]
impl MigrationTrait for CreateAuthorsAndArticles {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());
        manager
            .create_table(schema.create_table_from_entity(author_entity::Entity))
            .await?;
        manager
            .create_table(schema.create_table_from_entity(article_entity::Entity))
            .await?;
        Ok(())
    }
}

/// Publication time of article `id`: noon on day `id` counted from 2024-01-01.
pub fn published_at(id: i32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        + TimeDelta::days(i64::from(id - 1))
}

/// Article `id` is by author 1 up to 20, by author 2 after.
pub fn author_of(id: i32) -> i32 {
    if id <= 20 { 1 } else { 2 }
}

pub const EDITOR: Uuid = Uuid::from_u128(0x0c04_5d2e_8f1a_4b6c_9e3d_7a21_b0f4_c8e9);
pub const GUEST: Uuid = Uuid::from_u128(0x7f3a_1c9b_2e4d_4f80_a5b6_c7d8_e9f0_1a2b);

/// Every fourth article is reviewed by [`EDITOR`], the rest by [`GUEST`].
pub fn reviewer_of(id: i32) -> Uuid {
    if id % 4 == 0 { EDITOR } else { GUEST }
}

async fn seed(db: &impl ConnectionTrait) -> Result<(), DbErr> {
    author_entity::Entity::insert_many([
        author_entity::ActiveModel {
            id: Set(1),
            name: Set("Ada".to_string()),
        },
        author_entity::ActiveModel {
            id: Set(2),
            name: Set("Grace".to_string()),
        },
    ])
    .exec(db)
    .await?;

    let articles = (1..=ARTICLE_COUNT).map(|id| article_entity::ActiveModel {
        id: Set(id),
        title: Set(format!("Article {id}")),
        body: Set(if id % 3 == 0 {
            "Learning Rust 50% faster".to_string()
        } else {
            "Saved 500 hours".to_string()
        }),
        views: Set(id * 10),
        rating: Set(f64::from(id % 5) + 0.5),
        published: Set(id % 2 == 0),
        author_id: Set(author_of(id)),
        reviewer_id: Set(reviewer_of(id)),
        deleted: Set(id >= DELETED_FROM),
        published_at: Set(published_at(id)),
    });
    article_entity::Entity::insert_many(articles).exec(db).await?;
    Ok(())
}

/// Caller context handed to the hooks.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub can_list: bool,
    /// Restricts every list to this author's articles.
    pub author_id: Option<i32>,
}

impl Session {
    pub fn allowed() -> Self {
        Self {
            can_list: true,
            author_id: None,
        }
    }
}

/// Narrows articles to the session's author and counts its invocations.
#[derive(Clone, Default)]
pub struct AuthorScope {
    pub calls: Arc<AtomicUsize>,
}

impl AuthorScope {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScopeResolver<Session> for AuthorScope {
    async fn resolve(
        &self,
        ctx: &Session,
        _resource: &ResourceInfo,
        base: Scope,
    ) -> Result<Scope, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(match ctx.author_id {
            Some(author_id) => base.and(article_entity::Column::AuthorId.eq(author_id)),
            None => base,
        })
    }
}

/// Resolver that always fails with a 401.
pub struct ExpiredSession;

#[async_trait]
impl ScopeResolver<Session> for ExpiredSession {
    async fn resolve(
        &self,
        _ctx: &Session,
        _resource: &ResourceInfo,
        _base: Scope,
    ) -> Result<Scope, ApiError> {
        Err(ApiError::custom(
            StatusCode::UNAUTHORIZED,
            "session expired",
            Some("token revoked".to_string()),
        ))
    }
}

pub fn setup_engine(resolver: AuthorScope) -> ListEngine<Session> {
    ListEngine::new(
        ListConfig::new()
            .with_authorizer(|action: &AuthorizeAction<'_, Session>| action.ctx.can_list)
            .with_scope_resolver(resolver),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub engine: Arc<ListEngine<Session>>,
}

async fn list_articles(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<axum::Json<Page<article_entity::Model>>, ApiError> {
    let request = params.into_request()?;
    let result = state
        .engine
        .resolve_list::<Articles>(&Session::allowed(), request)
        .await?;
    Ok(axum::Json(fetch_page::<Articles>(&state.db, result).await?))
}

pub fn setup_test_app(db: DatabaseConnection) -> Router {
    let state = AppState {
        db,
        engine: Arc::new(setup_engine(AuthorScope::default())),
    };
    let api = Router::new()
        .route("/articles", axum::routing::get(list_articles))
        .with_state(state);

    Router::new().nest("/api/v1", api)
}

/// Ids of `models`, in order.
pub fn ids(models: &[article_entity::Model]) -> Vec<i32> {
    models.iter().map(|model| model.id).collect()
}
