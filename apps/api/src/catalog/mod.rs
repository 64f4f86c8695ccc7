//! Companies and locations referenced by job posts.

pub mod handlers;

use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::catalog::{JobCompany, JobLocation, LocationField, NewCompany, NewLocation};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LocationRequest {
    pub city: String,
    pub state: String,
    pub country: String,
}

#[derive(Debug, Deserialize)]
pub struct CompanyRequest {
    pub name: String,
    pub logo: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LocationSearch {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl LocationSearch {
    /// The first non-blank of city, state, country.
    pub fn criterion(&self) -> Option<(LocationField, &str)> {
        [
            (LocationField::City, &self.city),
            (LocationField::State, &self.state),
            (LocationField::Country, &self.country),
        ]
        .into_iter()
        .find_map(|(field, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (field, v))
        })
    }
}

/// Whether a create-or-get call found an existing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Found,
    Created,
}

pub async fn location_or_create(
    state: &AppState,
    req: LocationRequest,
) -> Result<(JobLocation, Lookup), AppError> {
    let city = req.city.trim();
    let region = req.state.trim();
    let country = req.country.trim();
    if city.is_empty() || region.is_empty() || country.is_empty() {
        return Err(AppError::Validation(
            "City, state and country are required".to_string(),
        ));
    }

    if let Some(existing) = state.catalog.find_location(city, region, country).await? {
        return Ok((existing, Lookup::Found));
    }
    let created = state
        .catalog
        .create_location(NewLocation {
            city: city.to_string(),
            state: region.to_string(),
            country: country.to_string(),
        })
        .await?;
    info!(
        "Created location {} ({}, {}, {})",
        created.id, created.city, created.state, created.country
    );
    Ok((created, Lookup::Created))
}

pub async fn company_or_create(
    state: &AppState,
    req: CompanyRequest,
) -> Result<(JobCompany, Lookup), AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Company name is required".to_string()));
    }

    if let Some(existing) = state.catalog.find_company_by_name(name).await? {
        return Ok((existing, Lookup::Found));
    }
    let created = state
        .catalog
        .create_company(NewCompany {
            name: name.to_string(),
            logo: req.logo,
            website: req.website,
        })
        .await?;
    info!("Created company {} ({})", created.id, created.name);
    Ok((created, Lookup::Created))
}

pub async fn search_locations(
    state: &AppState,
    search: &LocationSearch,
) -> Result<Vec<JobLocation>, AppError> {
    match search.criterion() {
        Some((field, term)) => state.catalog.search_locations(field, term).await,
        None => state.catalog.list_locations().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::test_context;

    #[test]
    fn test_first_non_blank_criterion_wins() {
        let search = LocationSearch {
            city: Some("  ".to_string()),
            state: Some("Texas".to_string()),
            country: Some("USA".to_string()),
        };
        assert_eq!(search.criterion(), Some((LocationField::State, "Texas")));
        assert_eq!(LocationSearch::default().criterion(), None);
    }

    #[tokio::test]
    async fn test_location_create_or_get_trims_and_dedupes() {
        let ctx = test_context();
        let (first, lookup) = location_or_create(
            &ctx.state,
            LocationRequest {
                city: " Austin ".to_string(),
                state: "TX".to_string(),
                country: "USA".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(lookup, Lookup::Created);
        assert_eq!(first.city, "Austin");

        let (again, lookup) = location_or_create(
            &ctx.state,
            LocationRequest {
                city: "Austin".to_string(),
                state: " TX".to_string(),
                country: "USA ".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(lookup, Lookup::Found);
        assert_eq!(again.id, first.id);
    }

    #[tokio::test]
    async fn test_company_create_or_get() {
        let ctx = test_context();
        let (created, lookup) = company_or_create(
            &ctx.state,
            CompanyRequest {
                name: "Acme".to_string(),
                logo: None,
                website: Some("https://acme.test".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(lookup, Lookup::Created);

        let (found, lookup) = company_or_create(
            &ctx.state,
            CompanyRequest {
                name: " Acme ".to_string(),
                logo: None,
                website: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(lookup, Lookup::Found);
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_blank_company_name_is_rejected() {
        let ctx = test_context();
        let err = company_or_create(
            &ctx.state,
            CompanyRequest {
                name: "   ".to_string(),
                logo: None,
                website: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
