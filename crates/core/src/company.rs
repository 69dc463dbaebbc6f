use crate::validate::ValidationError;

/// URL prefix under which stored media files are served.
pub const MEDIA_URL: &str = "/media/";

/// Placeholder thumbnail for records without an image.
pub const BLANK_THUMBNAIL_URL: &str = "/static/img/blank_image.thumbnail.png";

/// Directory (relative to the media root) holding company images.
pub const COMPANY_IMAGE_DIR: &str = "company_images";

/// A business the inventory deals with: customer, supplier, manufacturer, or
/// any combination of those.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub pk: i64,
    pub name: String,
    pub description: String,
    pub website: String,
    pub phone: String,
    pub address: String,
    pub email: String,
    pub currency: String,
    pub contact: String,
    pub link: String,
    /// Stored image path relative to the media root.
    pub image: Option<String>,
    pub is_customer: bool,
    pub is_supplier: bool,
    pub is_manufacturer: bool,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyRole {
    Customer,
    Supplier,
    Manufacturer,
}

impl Company {
    pub fn absolute_url(&self) -> String {
        format!("/company/{}/", self.pk)
    }

    pub fn has_role(&self, role: CompanyRole) -> bool {
        match role {
            CompanyRole::Customer => self.is_customer,
            CompanyRole::Supplier => self.is_supplier,
            CompanyRole::Manufacturer => self.is_manufacturer,
        }
    }

    /// Reject the company as the target of `field` unless it carries `role`.
    ///
    /// A company without the role is reported the same way as a missing one,
    /// since it is outside the set of selectable companies.
    pub fn require_role(&self, field: &str, role: CompanyRole) -> Result<(), ValidationError> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(ValidationError::DoesNotExist {
                field: field.to_string(),
                pk: self.pk,
            })
        }
    }

    pub fn image_url(&self) -> Option<String> {
        self.image.as_deref().map(media_url)
    }

    /// Thumbnail URL, falling back to the blank placeholder.
    pub fn thumbnail_url(&self) -> String {
        self.image_url()
            .unwrap_or_else(|| BLANK_THUMBNAIL_URL.to_string())
    }
}

/// Public URL for a path relative to the media root.
pub fn media_url(path: &str) -> String {
    format!("{MEDIA_URL}{}", path.trim_start_matches('/'))
}
