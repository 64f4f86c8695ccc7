use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::auth::middleware::AuthUser;
use crate::catalog::{self, CompanyRequest, LocationRequest, LocationSearch, Lookup};
use crate::errors::AppError;
use crate::extract::{AppJson, AppQuery};
use crate::models::catalog::{JobCompany, JobLocation};
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CompanySearch {
    #[serde(default)]
    pub name: String,
}

/// GET /api/locations
pub async fn handle_list_locations(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Vec<JobLocation>> {
    let locations = state.catalog.list_locations().await?;
    Ok(ApiResponse::ok("Locations retrieved successfully", locations))
}

/// POST /api/locations
pub async fn handle_create_location(
    State(state): State<AppState>,
    _user: AuthUser,
    AppJson(req): AppJson<LocationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<JobLocation>>), AppError> {
    let (location, lookup) = catalog::location_or_create(&state, req).await?;
    Ok(match lookup {
        Lookup::Found => (StatusCode::OK, ApiResponse::ok("Location found", location)),
        Lookup::Created => ApiResponse::created("Location created successfully", location),
    })
}

/// GET /api/locations/search
pub async fn handle_search_locations(
    State(state): State<AppState>,
    _user: AuthUser,
    AppQuery(search): AppQuery<LocationSearch>,
) -> ApiResult<Vec<JobLocation>> {
    let locations = catalog::search_locations(&state, &search).await?;
    Ok(ApiResponse::ok("Location search completed", locations))
}

/// GET /api/companies
pub async fn handle_list_companies(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Vec<JobCompany>> {
    let companies = state.catalog.list_companies().await?;
    Ok(ApiResponse::ok("Companies retrieved successfully", companies))
}

/// POST /api/companies
pub async fn handle_create_company(
    State(state): State<AppState>,
    _user: AuthUser,
    AppJson(req): AppJson<CompanyRequest>,
) -> Result<(StatusCode, Json<ApiResponse<JobCompany>>), AppError> {
    let (company, lookup) = catalog::company_or_create(&state, req).await?;
    Ok(match lookup {
        Lookup::Found => (StatusCode::OK, ApiResponse::ok("Company found", company)),
        Lookup::Created => ApiResponse::created("Company created successfully", company),
    })
}

/// GET /api/companies/search
pub async fn handle_search_companies(
    State(state): State<AppState>,
    _user: AuthUser,
    AppQuery(search): AppQuery<CompanySearch>,
) -> ApiResult<Vec<JobCompany>> {
    let term = search.name.trim();
    let companies = if term.is_empty() {
        state.catalog.list_companies().await?
    } else {
        state.catalog.search_companies(term).await?
    };
    Ok(ApiResponse::ok("Company search completed", companies))
}
