use std::collections::HashMap;

use axum::extract::Multipart;
use bytes::Bytes;
use chrono::NaiveDate;
use tracing::warn;

use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// A parsed multipart profile form. Blank text parts and empty file parts
/// are treated as absent.
#[derive(Debug, Default)]
pub struct ProfileForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl ProfileForm {
    pub async fn read(mut multipart: Multipart, max_file_bytes: usize) -> Result<Self, AppError> {
        let mut form = ProfileForm::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?;
                    if bytes.len() > max_file_bytes {
                        warn!(
                            "Rejected upload '{file_name}' of {} bytes (limit {max_file_bytes})",
                            bytes.len()
                        );
                        return Err(AppError::PayloadTooLarge);
                    }
                    if !bytes.is_empty() && !file_name.trim().is_empty() {
                        form.files.insert(
                            name,
                            UploadedFile {
                                file_name,
                                content_type,
                                bytes,
                            },
                        );
                    }
                }
                None => {
                    let value = field.text().await?;
                    form.insert_text(name, value);
                }
            }
        }
        Ok(form)
    }

    pub fn insert_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        if !value.trim().is_empty() {
            self.fields.insert(name.into(), value.trim().to_string());
        }
    }

    pub fn insert_file(&mut self, name: impl Into<String>, file: UploadedFile) {
        self.files.insert(name.into(), file);
    }

    pub fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    /// `YYYY-MM-DD`; anything else is logged and ignored.
    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        let raw = self.fields.get(name)?;
        match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                warn!("Invalid date format for {name}: {raw}");
                None
            }
        }
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.fields.get(name)?.to_ascii_lowercase().as_str() {
            "true" | "on" | "1" => Some(true),
            "false" | "off" | "0" => Some(false),
            other => {
                warn!("Invalid boolean for {name}: {other}");
                None
            }
        }
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_is_absent() {
        let mut form = ProfileForm::default();
        form.insert_text("city", "   ");
        form.insert_text("phone", " 555 ");
        assert_eq!(form.text("city"), None);
        assert_eq!(form.text("phone").as_deref(), Some("555"));
    }

    #[test]
    fn test_invalid_dates_are_ignored() {
        let mut form = ProfileForm::default();
        form.insert_text("dateOfBirth", "1990-02-30");
        form.insert_text("availabilityDate", "2024-09-01");
        assert_eq!(form.date("dateOfBirth"), None);
        assert_eq!(
            form.date("availabilityDate"),
            NaiveDate::from_ymd_opt(2024, 9, 1)
        );
    }

    #[test]
    fn test_flag_parsing() {
        let mut form = ProfileForm::default();
        form.insert_text("willingToRelocate", "TRUE");
        form.insert_text("other", "maybe");
        assert_eq!(form.flag("willingToRelocate"), Some(true));
        assert_eq!(form.flag("other"), None);
        assert_eq!(form.flag("missing"), None);
    }
}
