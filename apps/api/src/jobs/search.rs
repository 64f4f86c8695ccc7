use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::Deserialize;

use crate::models::job::JobPost;

/// Raw query string of the job listing endpoints. `jobType` and `remote`
/// may repeat.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSearchQuery {
    pub job: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub job_type: Vec<String>,
    #[serde(default)]
    pub remote: Vec<String>,
    pub days: Option<i64>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
}

impl PageRequest {
    pub fn offset(self) -> i64 {
        self.page.saturating_mul(self.size)
    }
}

/// Normalized search criteria. Empty lists do not filter, and the lists are
/// only kept when title, location or date narrow the listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobSearch {
    pub title: Option<String>,
    pub location: Option<String>,
    pub job_types: Vec<String>,
    pub remote: Vec<String>,
    pub posted_since: Option<DateTime<Utc>>,
    pub page: Option<PageRequest>,
}

impl JobSearch {
    pub fn from_query(query: JobSearchQuery, now: DateTime<Utc>) -> Self {
        // Out-of-range windows reach back past every post
        let posted_since = query
            .days
            .filter(|d| *d > 0)
            .and_then(Duration::try_days)
            .and_then(|window| now.date_naive().checked_sub_signed(window))
            .map(|day| day.and_time(NaiveTime::MIN).and_utc());
        let page = match (query.page, query.size) {
            (None, None) => None,
            (page, size) => Some(PageRequest {
                page: page.unwrap_or(0).max(0),
                size: size.unwrap_or(10).clamp(1, 100),
            }),
        };

        let mut search = JobSearch {
            title: non_blank(query.job),
            location: non_blank(query.location),
            job_types: Vec::new(),
            remote: Vec::new(),
            posted_since,
            page,
        };
        if search.is_filtered() {
            search.job_types = non_blank_list(query.job_type);
            search.remote = non_blank_list(query.remote);
        }
        search
    }

    /// Whether title, location or date narrow the listing.
    pub fn is_filtered(&self) -> bool {
        self.title.is_some() || self.location.is_some() || self.posted_since.is_some()
    }

    pub fn matches(&self, job: &JobPost) -> bool {
        if let Some(title) = &self.title {
            if !contains_ignore_case(&job.job_title, title) {
                return false;
            }
        }
        if let Some(location) = &self.location {
            let hit = [&job.location_city, &job.location_state, &job.location_country]
                .into_iter()
                .flatten()
                .any(|field| contains_ignore_case(field, location));
            if !hit {
                return false;
            }
        }
        if !self.job_types.is_empty() && !in_list(&self.job_types, job.job_type.as_deref()) {
            return false;
        }
        if !self.remote.is_empty() && !in_list(&self.remote, job.remote.as_deref()) {
            return false;
        }
        if let Some(since) = self.posted_since {
            if job.posted_date < since {
                return false;
            }
        }
        true
    }
}

/// `%term%` with LIKE metacharacters escaped.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn in_list(list: &[String], value: Option<&str>) -> bool {
    value.is_some_and(|v| list.iter().any(|item| item == v))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn non_blank_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn job(title: &str, city: &str, job_type: &str, remote: &str, days_ago: i64) -> JobPost {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        JobPost {
            job_post_id: 1,
            posted_by_id: 1,
            job_title: title.to_string(),
            description_of_job: None,
            job_type: Some(job_type.to_string()),
            salary: None,
            remote: Some(remote.to_string()),
            posted_date: now - Duration::days(days_ago),
            job_location_id: Some(1),
            location_city: Some(city.to_string()),
            location_state: Some("CA".to_string()),
            location_country: Some("USA".to_string()),
            job_company_id: None,
            company_name: None,
            company_website: None,
            poster_first_name: "Rita".to_string(),
            poster_last_name: "Cruz".to_string(),
            poster_email: "rita@example.com".to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let search = JobSearch::from_query(JobSearchQuery::default(), now());
        assert!(!search.is_filtered());
        assert!(search.matches(&job("Engineer", "Austin", "Full-Time", "Office-Only", 400)));
    }

    #[test]
    fn test_title_and_location_are_case_insensitive_substrings() {
        let search = JobSearch::from_query(
            JobSearchQuery {
                job: Some("ENGIN".to_string()),
                location: Some("usa".to_string()),
                ..Default::default()
            },
            now(),
        );
        assert!(search.matches(&job("Software Engineer", "Austin", "Full-Time", "Remote-Only", 1)));
        assert!(!search.matches(&job("Designer", "Austin", "Full-Time", "Remote-Only", 1)));
    }

    #[test]
    fn test_type_lists_alone_return_everything() {
        let search = JobSearch::from_query(
            JobSearchQuery {
                job_type: vec!["Part-Time".to_string()],
                remote: vec!["Remote-Only".to_string()],
                ..Default::default()
            },
            now(),
        );
        assert!(!search.is_filtered());
        assert!(search.job_types.is_empty());
        assert!(search.remote.is_empty());
        assert!(search.matches(&job("Tutor", "Lyon", "Full-Time", "Office-Only", 1)));
    }

    #[test]
    fn test_type_lists_narrow_a_title_search() {
        let search = JobSearch::from_query(
            JobSearchQuery {
                job: Some("tutor".to_string()),
                job_type: vec!["Part-Time".to_string()],
                remote: vec!["Remote-Only".to_string(), "Partial-Remote".to_string()],
                ..Default::default()
            },
            now(),
        );
        assert!(search.matches(&job("Tutor", "Lyon", "Part-Time", "Partial-Remote", 1)));
        assert!(!search.matches(&job("Tutor", "Lyon", "Full-Time", "Partial-Remote", 1)));
        assert!(!search.matches(&job("Tutor", "Lyon", "Part-Time", "Office-Only", 1)));
    }

    #[test]
    fn test_days_cuts_at_start_of_day() {
        let search = JobSearch::from_query(
            JobSearchQuery {
                days: Some(7),
                ..Default::default()
            },
            now(),
        );
        assert_eq!(
            search.posted_since,
            Some(Utc.with_ymd_and_hms(2024, 6, 8, 0, 0, 0).unwrap())
        );
        assert!(search.matches(&job("A", "B", "Full-Time", "Office-Only", 7)));
        assert!(!search.matches(&job("A", "B", "Full-Time", "Office-Only", 8)));
    }

    #[test]
    fn test_non_positive_days_are_ignored() {
        let search = JobSearch::from_query(
            JobSearchQuery {
                days: Some(0),
                job: Some("   ".to_string()),
                ..Default::default()
            },
            now(),
        );
        assert_eq!(search.posted_since, None);
        assert_eq!(search.title, None);
    }

    #[test]
    fn test_page_defaults_when_only_one_side_given() {
        let search = JobSearch::from_query(
            JobSearchQuery {
                page: Some(2),
                ..Default::default()
            },
            now(),
        );
        let page = search.page.unwrap();
        assert_eq!(page, PageRequest { page: 2, size: 10 });
        assert_eq!(page.offset(), 20);
    }

    #[test]
    fn test_out_of_range_days_has_no_lower_bound() {
        let search = JobSearch::from_query(
            JobSearchQuery {
                days: Some(1_000_000_000),
                ..Default::default()
            },
            now(),
        );
        assert_eq!(search.posted_since, None);

        let search = JobSearch::from_query(
            JobSearchQuery {
                days: Some(i64::MAX),
                ..Default::default()
            },
            now(),
        );
        assert_eq!(search.posted_since, None);
    }

    #[test]
    fn test_huge_page_offset_saturates() {
        let search = JobSearch::from_query(
            JobSearchQuery {
                page: Some(i64::MAX),
                ..Default::default()
            },
            now(),
        );
        assert_eq!(search.page.unwrap().offset(), i64::MAX);
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("100%_off"), "%100\\%\\_off%");
    }
}
