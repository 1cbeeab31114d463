//! Generic resource endpoints
//!
//! Every HR entity exposes the same surface; a [`Resource`] ties a DTO to
//! its criteria type and the handlers below are instantiated once per
//! entity when the router is built.

pub mod dto;

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::api::extractors::{IdPath, QueryPairs, ValidatedJson};
use crate::api::types::{ApiError, PaginatedResponse};
use crate::core::config::QueryConfig;
use crate::core::constants::{MIRROR_DEGRADED, WARNING_HEADER};
use crate::data::sqlite::SqlitePool;
use crate::data::types::{Entity, JobRow};
use crate::data::{SearchService, SqliteRepository};
use crate::domain::criteria::{
    CountryCriteria, Criteria, DepartmentCriteria, EmployeeCriteria, JobCriteria,
    LocationCriteria, RegionCriteria, TaskCriteria,
};
use crate::domain::query::{PageRequest, QueryService};
use crate::domain::records::{LinkOwners, MirrorStatus, RecordService};

use dto::{CountryDto, DepartmentDto, EmployeeDto, JobDto, LocationDto, RegionDto, TaskDto};

/// Row type behind a resource
pub type Row<R> = <<R as Resource>::Criteria as Criteria>::Entity;

/// Wire representation of one entity
pub trait Resource: Serialize + DeserializeOwned + Validate + Send + Sync + 'static {
    type Criteria: Criteria;

    fn from_row(row: Row<Self>) -> Self;

    fn into_row(self) -> Row<Self>;
}

macro_rules! resource {
    ($dto:ty, $criteria:ty) => {
        impl Resource for $dto {
            type Criteria = $criteria;

            fn from_row(row: Row<Self>) -> Self {
                row.into()
            }

            fn into_row(self) -> Row<Self> {
                self.into()
            }
        }
    };
}

resource!(RegionDto, RegionCriteria);
resource!(CountryDto, CountryCriteria);
resource!(LocationDto, LocationCriteria);
resource!(DepartmentDto, DepartmentCriteria);
resource!(TaskDto, TaskCriteria);
resource!(EmployeeDto, EmployeeCriteria);
resource!(JobDto, JobCriteria);

/// Shared state for one resource's endpoints
pub struct ResourceState<R: Resource> {
    queries: QueryService<R::Criteria>,
    records: RecordService<Row<R>>,
    query: QueryConfig,
}

impl<R: Resource> Clone for ResourceState<R> {
    fn clone(&self) -> Self {
        Self {
            queries: self.queries.clone(),
            records: self.records.clone(),
            query: self.query,
        }
    }
}

impl<R: Resource> ResourceState<R> {
    pub fn new(pool: &SqlitePool, search: Arc<SearchService>, query: QueryConfig) -> Self {
        let repository = Arc::new(SqliteRepository::<Row<R>>::new(pool.clone()));
        Self {
            queries: QueryService::new(repository.clone()),
            records: RecordService::new(repository, search),
            query,
        }
    }

    /// Keep `O`'s mirrored links current when rows of this resource are deleted
    pub fn linked_from<O: Entity>(mut self, pool: &SqlitePool, search: Arc<SearchService>) -> Self {
        let repository = Arc::new(SqliteRepository::<O>::new(pool.clone()));
        if let Some(owners) = LinkOwners::new(repository, search, <Row<R> as Entity>::META.table) {
            self.records = self.records.with_linked(Arc::new(owners));
        }
        self
    }
}

/// Mount `/{resource}` and `/_search/{resource}` for one resource
pub fn mount<R: Resource>(router: Router<()>, state: ResourceState<R>) -> Router<()> {
    let resource = <Row<R> as Entity>::META.resource;
    let crud = Router::new()
        .route(
            "/",
            get(list::<R>).post(create::<R>).put(update::<R>),
        )
        .route("/page", get(list_paged::<R>))
        .route("/count", get(count::<R>))
        .route("/{id}", get(get_one::<R>).delete(delete::<R>))
        .with_state(state.clone());
    let search = Router::new()
        .route("/", get(search::<R>))
        .with_state(state);

    router
        .nest(&format!("/{}", resource), crud)
        .nest(&format!("/_search/{}", resource), search)
}

/// Mount every HR resource
pub fn routes(pool: &SqlitePool, search: &Arc<SearchService>, query: QueryConfig) -> Router<()> {
    let router = Router::new();
    let router = mount::<RegionDto>(router, ResourceState::new(pool, search.clone(), query));
    let router = mount::<CountryDto>(router, ResourceState::new(pool, search.clone(), query));
    let router = mount::<LocationDto>(router, ResourceState::new(pool, search.clone(), query));
    let router = mount::<DepartmentDto>(router, ResourceState::new(pool, search.clone(), query));
    let tasks =
        ResourceState::new(pool, search.clone(), query).linked_from::<JobRow>(pool, search.clone());
    let router = mount::<TaskDto>(router, tasks);
    let router = mount::<EmployeeDto>(router, ResourceState::new(pool, search.clone(), query));
    mount::<JobDto>(router, ResourceState::new(pool, search.clone(), query))
}

/// Headers reporting a degraded search mirror
fn mirror_headers(mirror: &MirrorStatus) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let MirrorStatus::Degraded(message) = mirror {
        headers.insert(HeaderName::from_static(WARNING_HEADER), warning_value(message));
    }
    headers
}

/// Header-safe warning text; whitespace becomes a space, anything else outside visible ASCII becomes `?`
fn warning_value(message: &str) -> HeaderValue {
    let visible: String = message
        .chars()
        .map(|c| match c {
            c if c.is_ascii_graphic() => c,
            c if c.is_whitespace() => ' ',
            _ => '?',
        })
        .collect();
    match visible.trim() {
        "" => HeaderValue::from_static(MIRROR_DEGRADED),
        visible => HeaderValue::from_str(visible)
            .unwrap_or_else(|_| HeaderValue::from_static(MIRROR_DEGRADED)),
    }
}

/// All rows matching the criteria
async fn list<R: Resource>(
    State(state): State<ResourceState<R>>,
    params: QueryPairs,
) -> Result<Json<Vec<R>>, ApiError> {
    let criteria = R::Criteria::from_params(&params.0)?;
    let rows = state.queries.list(Some(&criteria)).await?;
    Ok(Json(rows.into_iter().map(R::from_row).collect()))
}

/// One page of rows matching the criteria
async fn list_paged<R: Resource>(
    State(state): State<ResourceState<R>>,
    params: QueryPairs,
) -> Result<Json<PaginatedResponse<R>>, ApiError> {
    let criteria = R::Criteria::from_params(&params.0)?;
    let page = PageRequest::from_params(&params.0, <Row<R> as Entity>::META, &state.query)?;
    let page = state.queries.list_paged(Some(&criteria), &page).await?;
    Ok(Json(PaginatedResponse::from_page(page, R::from_row)))
}

async fn count<R: Resource>(
    State(state): State<ResourceState<R>>,
    params: QueryPairs,
) -> Result<Json<u64>, ApiError> {
    let criteria = R::Criteria::from_params(&params.0)?;
    Ok(Json(state.queries.count(Some(&criteria)).await?))
}

async fn get_one<R: Resource>(
    State(state): State<ResourceState<R>>,
    IdPath(id): IdPath,
) -> Result<Json<R>, ApiError> {
    let row = state.records.find_one(id).await?;
    Ok(Json(R::from_row(row)))
}

async fn create<R: Resource>(
    State(state): State<ResourceState<R>>,
    ValidatedJson(body): ValidatedJson<R>,
) -> Result<(StatusCode, HeaderMap, Json<R>), ApiError> {
    let written = state.records.create(body.into_row()).await?;
    let mut headers = mirror_headers(&written.mirror);
    if let Some(id) = written.value.id()
        && let Ok(location) =
            HeaderValue::from_str(&format!("/api/v1/{}/{}", <Row<R> as Entity>::META.resource, id))
    {
        headers.insert(header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(R::from_row(written.value))))
}

async fn update<R: Resource>(
    State(state): State<ResourceState<R>>,
    ValidatedJson(body): ValidatedJson<R>,
) -> Result<(HeaderMap, Json<R>), ApiError> {
    let written = state.records.update(body.into_row()).await?;
    Ok((mirror_headers(&written.mirror), Json(R::from_row(written.value))))
}

async fn delete<R: Resource>(
    State(state): State<ResourceState<R>>,
    IdPath(id): IdPath,
) -> Result<(StatusCode, HeaderMap), ApiError> {
    let written = state.records.delete(id).await?;
    Ok((StatusCode::NO_CONTENT, mirror_headers(&written.mirror)))
}

/// Ranked free-text search over the mirror
async fn search<R: Resource>(
    State(state): State<ResourceState<R>>,
    params: QueryPairs,
) -> Result<Json<PaginatedResponse<R>>, ApiError> {
    let query = params.get("query").unwrap_or_default();
    let page = PageRequest::from_params(&params.0, <Row<R> as Entity>::META, &state.query)?;
    let page = state.records.search(query, &page).await?;
    Ok(Json(PaginatedResponse::from_page(page, R::from_row)))
}
