use chrono::NaiveDate;

use crate::company::media_url;
use crate::validate::ValidationError;

/// Record a file or external link is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentOwner {
    Company(i64),
    ManufacturerPart(i64),
}

impl AttachmentOwner {
    pub fn pk(&self) -> i64 {
        match self {
            Self::Company(pk) | Self::ManufacturerPart(pk) => *pk,
        }
    }

    /// Name of the owner reference field in payloads.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Company(_) => "company",
            Self::ManufacturerPart(_) => "manufacturer_part",
        }
    }

    /// Storage sub-directory for files attached to this owner.
    pub fn subdir(&self) -> String {
        match self {
            Self::Company(pk) => format!("company_files/{pk}"),
            Self::ManufacturerPart(pk) => format!("manufacturer_part_files/{pk}"),
        }
    }

    /// Media-relative path for an attached file named `filename`.
    pub fn storage_path(&self, filename: &str) -> String {
        format!("attachments/{}/{filename}", self.subdir())
    }
}

/// A file or link attached to a company or manufacturer part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub pk: i64,
    pub owner: AttachmentOwner,
    /// Stored file path relative to the media root.
    pub attachment: Option<String>,
    pub link: String,
    pub comment: String,
    pub upload_date: NaiveDate,
    pub user: Option<i64>,
}

impl Attachment {
    pub fn attachment_url(&self) -> Option<String> {
        self.attachment.as_deref().map(media_url)
    }

    pub fn filename(&self) -> Option<&str> {
        self.attachment
            .as_deref()
            .and_then(|p| p.rsplit('/').next())
            .filter(|s| !s.is_empty())
    }
}

/// Reject names that would escape the owner's directory.
pub fn validate_filename(field: &str, name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    let bad = trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains(['/', '\\', '\0']);
    if bad {
        return Err(ValidationError::rule(field, "Invalid attachment file name"));
    }
    Ok(trimmed.to_string())
}
