use crate::company::{media_url, BLANK_THUMBNAIL_URL};
use crate::validate::ValidationError;

/// The part catalogue entry that supplier and manufacturer parts point at.
///
/// Parts are owned by the part catalogue; this crate only reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub pk: i64,
    pub name: String,
    pub ipn: String,
    pub revision: String,
    pub description: String,
    pub image: Option<String>,
    pub units: String,
    pub active: bool,
    pub assembly: bool,
    pub purchaseable: bool,
    pub salable: bool,
    pub trackable: bool,
    pub is_virtual: bool,
}

impl Part {
    /// `IPN | name | revision`, skipping empty parts.
    pub fn full_name(&self) -> String {
        [self.ipn.as_str(), self.name.as_str(), self.revision.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" | ")
    }

    pub fn thumbnail_url(&self) -> String {
        self.image
            .as_deref()
            .map(media_url)
            .unwrap_or_else(|| BLANK_THUMBNAIL_URL.to_string())
    }

    /// Supplier and manufacturer parts may only reference purchaseable parts.
    pub fn require_purchaseable(&self, field: &str) -> Result<(), ValidationError> {
        if self.purchaseable {
            Ok(())
        } else {
            Err(ValidationError::DoesNotExist {
                field: field.to_string(),
                pk: self.pk,
            })
        }
    }
}
