use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JobCompany {
    pub id: i32,
    pub name: String,
    pub logo: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JobLocation {
    pub id: i32,
    pub city: String,
    pub state: String,
    pub country: String,
}

#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub logo: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewLocation {
    pub city: String,
    pub state: String,
    pub country: String,
}

/// Which location column a search targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationField {
    City,
    State,
    Country,
}

impl LocationField {
    pub fn column(self) -> &'static str {
        match self {
            LocationField::City => "city",
            LocationField::State => "state",
            LocationField::Country => "country",
        }
    }

    pub fn value(self, location: &JobLocation) -> &str {
        match self {
            LocationField::City => &location.city,
            LocationField::State => &location.state,
            LocationField::Country => &location.country,
        }
    }
}
