use std::fmt;

use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use utoipa::IntoParams;

use crate::ApiError;
use crate::core::RelationSource;
use crate::filtering::{DEFAULT_PAGE, DEFAULT_PER_PAGE, Scope};

fn default_page() -> u64 {
    DEFAULT_PAGE
}

fn default_per() -> u64 {
    DEFAULT_PER_PAGE
}

/// Query parameters of a list request.
///
/// # Filtering
/// The `filter` parameter is a JSON-encoded object of filter arguments, for example:
/// ```json
/// {"title_has": "rust", "views_gte": 5, "id_in": [1, 2, 3]}
/// ```
/// Unknown keys are ignored.
///
/// # Pagination
/// `page` is 1-based and `per` may not exceed 100, for example: `page=2&per=25`
///
/// # Sorting
/// The `sort` parameter is a column name with an `_asc` or `_desc` suffix, for example:
/// `views_desc`
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// JSON-encoded filter arguments.
    ///
    /// Example: `{"title_has": "rust", "views_gte": 5}`
    #[param(example = json!({ "title_has": "rust", "views_gte": 5 }))]
    pub filter: Option<String>,
    /// Sort key, `<column>_asc` or `<column>_desc`.
    ///
    /// Example: `views_desc`
    #[param(example = "views_desc")]
    pub sort: Option<String>,
    /// Page number (1-based).
    #[serde(default = "default_page")]
    #[param(example = 1, minimum = 1)]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_per")]
    #[param(example = 10, minimum = 1, maximum = 100)]
    pub per: u64,
    /// Suspend default scoping (soft deletes, default ordering).
    #[serde(default)]
    pub unscope: bool,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            filter: None,
            sort: None,
            page: DEFAULT_PAGE,
            per: DEFAULT_PER_PAGE,
            unscope: false,
        }
    }
}

impl ListParams {
    /// Decode the filter JSON into a top-level [`ListRequest`].
    ///
    /// # Errors
    ///
    /// Returns a bad request error when `filter` is not a JSON object.
    pub fn into_request(self) -> Result<ListRequest<'static>, ApiError> {
        let filter = match self.filter.as_deref().map(str::trim) {
            None | Some("") => Map::new(),
            Some(raw) => match serde_json::from_str::<Json>(raw) {
                Ok(Json::Object(map)) => map,
                Ok(_) => return Err(ApiError::bad_request("filter must be a JSON object")),
                Err(e) => {
                    return Err(ApiError::bad_request(format!("Invalid filter JSON: {e}")));
                }
            },
        };

        Ok(ListRequest {
            filter,
            sort: self.sort,
            page: self.page,
            per: self.per,
            unscope: self.unscope,
            ..ListRequest::default()
        })
    }
}

/// One invocation of the list pipeline.
pub struct ListRequest<'a> {
    pub filter: Map<String, Json>,
    pub sort: Option<String>,
    pub page: u64,
    pub per: u64,
    pub unscope: bool,
    /// Parent record of a nested list.
    pub parent: Option<&'a dyn RelationSource>,
    /// Relation of `parent` the list is narrowed to.
    pub relation: Option<String>,
    /// Field path of the list, outermost first. Passed to the authorizer.
    pub path: Vec<String>,
}

impl Default for ListRequest<'_> {
    fn default() -> Self {
        Self {
            filter: Map::new(),
            sort: None,
            page: DEFAULT_PAGE,
            per: DEFAULT_PER_PAGE,
            unscope: false,
            parent: None,
            relation: None,
            path: Vec::new(),
        }
    }
}

impl<'a> ListRequest<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filter(mut self, filter: Map<String, Json>) -> Self {
        self.filter = filter;
        self
    }

    /// Set a single filter argument.
    #[must_use]
    pub fn with_filter(mut self, name: impl Into<String>, value: Json) -> Self {
        self.filter.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    #[must_use]
    pub fn page(mut self, page: u64) -> Self {
        self.page = page;
        self
    }

    #[must_use]
    pub fn per(mut self, per: u64) -> Self {
        self.per = per;
        self
    }

    #[must_use]
    pub fn unscope(mut self, unscope: bool) -> Self {
        self.unscope = unscope;
        self
    }

    #[must_use]
    pub fn path(mut self, path: Vec<String>) -> Self {
        self.path = path;
        self
    }

    /// Resolve this list as the `segment` field of `parent`.
    ///
    /// The relation name is `segment` in snake case, so `relatedArticles`
    /// narrows by the parent's `related_articles` relation.
    #[must_use]
    pub fn nested(mut self, parent: &'a dyn RelationSource, segment: &str) -> Self {
        self.parent = Some(parent);
        self.relation = Some(segment.to_snake_case());
        self.path.push(segment.to_string());
        self
    }
}

impl fmt::Debug for ListRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListRequest")
            .field("filter", &self.filter)
            .field("sort", &self.sort)
            .field("page", &self.page)
            .field("per", &self.per)
            .field("unscope", &self.unscope)
            .field("parent", &self.parent.is_some())
            .field("relation", &self.relation)
            .field("path", &self.path)
            .finish()
    }
}

/// Result of the list pipeline: a lazy scope plus paging metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ListResult {
    pub list: Scope,
    /// `None` unless counted, see [`crate::database::count_total`].
    pub total: Option<u64>,
    pub page: u64,
}

/// One fetched page of records.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    pub page: u64,
    pub per: u64,
}
