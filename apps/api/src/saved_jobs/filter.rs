use std::cmp::Ordering;

use serde::Deserialize;

use crate::jobs::search::contains_ignore_case;
use crate::saved_jobs::SavedJobEntry;

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 100;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedJobQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub remote: Option<String>,
    pub applied: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    SavedAt,
    Title,
    PostedDate,
}

impl SortKey {
    /// Unknown keys fall back to `savedAt`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "title" => SortKey::Title,
            "postedDate" => SortKey::PostedDate,
            _ => SortKey::SavedAt,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavedJobFilter {
    pub search: Option<String>,
    pub job_type: Option<String>,
    /// `Some(true)` keeps remote-friendly jobs, `Some(false)` office-only ones.
    pub remote: Option<bool>,
    pub applied: Option<bool>,
    pub sort: SortKey,
    pub descending: bool,
    /// 1-based.
    pub page: usize,
    pub limit: usize,
}

impl From<SavedJobQuery> for SavedJobFilter {
    fn from(query: SavedJobQuery) -> Self {
        let present = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        SavedJobFilter {
            search: present(query.search),
            job_type: present(query.job_type),
            remote: present(query.remote).map(|r| r == "true"),
            applied: present(query.applied).and_then(|a| match a.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            }),
            sort: query.sort_by.as_deref().map(SortKey::parse).unwrap_or_default(),
            descending: !query
                .sort_order
                .as_deref()
                .is_some_and(|o| o.trim().eq_ignore_ascii_case("asc")),
            page: query.page.unwrap_or(1).max(1),
            limit: query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }
}

impl SavedJobFilter {
    pub fn keeps(&self, entry: &SavedJobEntry) -> bool {
        let job = &entry.job;
        if let Some(term) = &self.search {
            let hit = [
                Some(&job.job_title),
                job.company_name.as_ref(),
                job.job_location.as_ref(),
            ]
            .into_iter()
            .flatten()
            .any(|field| contains_ignore_case(field, term));
            if !hit {
                return false;
            }
        }
        if let Some(job_type) = &self.job_type {
            if job.job_type.as_ref() != Some(job_type) {
                return false;
            }
        }
        if let Some(remote) = self.remote {
            let friendly = matches!(
                job.remote.as_deref(),
                Some("Remote-Only") | Some("Partial-Remote")
            );
            let office = job.remote.as_deref() == Some("Office-Only");
            if (remote && !friendly) || (!remote && !office) {
                return false;
            }
        }
        if let Some(applied) = self.applied {
            if entry.is_applied != applied {
                return false;
            }
        }
        true
    }

    fn compare(&self, a: &SavedJobEntry, b: &SavedJobEntry) -> Ordering {
        let ordering = match self.sort {
            SortKey::SavedAt => a.saved_at.cmp(&b.saved_at),
            SortKey::Title => a
                .job
                .job_title
                .to_lowercase()
                .cmp(&b.job.job_title.to_lowercase()),
            SortKey::PostedDate => a.job.posted_date.cmp(&b.job.posted_date),
        };
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }

    /// Filters, sorts and cuts out the requested page.
    pub fn apply(&self, entries: Vec<SavedJobEntry>) -> Vec<SavedJobEntry> {
        let mut kept: Vec<SavedJobEntry> = entries.into_iter().filter(|e| self.keeps(e)).collect();
        kept.sort_by(|a, b| self.compare(a, b));
        kept.into_iter()
            .skip((self.page - 1).saturating_mul(self.limit))
            .take(self.limit)
            .collect()
    }
}
