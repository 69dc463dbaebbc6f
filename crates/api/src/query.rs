//! Query-string parameters for list and detail endpoints.
//!
//! Detail toggles arrive as loose booleans (`true`, `1`, `yes`, `on`, ...) and
//! are resolved once into the option structs in [`crate::views`].

use serde::{Deserialize, Deserializer};

use crate::views::{ManufacturerPartDetail, ParameterDetail, PriceBreakDetail, SupplierPartDetail};

/// Interpret a loose boolean. Anything unrecognized is false.
pub fn str2bool(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "1" | "y" | "yes" | "t" | "true" | "on" | "ok"
    )
}

fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.map(|s| str2bool(&s)))
}

/// `GET /api/company/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyListQuery {
    #[serde(default, deserialize_with = "flag")]
    pub is_customer: Option<bool>,
    #[serde(default, deserialize_with = "flag")]
    pub is_supplier: Option<bool>,
    #[serde(default, deserialize_with = "flag")]
    pub is_manufacturer: Option<bool>,
    pub search: Option<String>,
}

/// `GET /api/company/part/manufacturer/[{id}/]`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManufacturerPartQuery {
    pub part: Option<i64>,
    pub manufacturer: Option<i64>,
    #[serde(default, deserialize_with = "flag")]
    pub part_detail: Option<bool>,
    #[serde(default, deserialize_with = "flag")]
    pub manufacturer_detail: Option<bool>,
    #[serde(default, deserialize_with = "flag")]
    pub pretty: Option<bool>,
}

impl ManufacturerPartQuery {
    pub fn detail(&self) -> ManufacturerPartDetail {
        let d = ManufacturerPartDetail::default();
        ManufacturerPartDetail {
            part_detail: self.part_detail.unwrap_or(d.part_detail),
            manufacturer_detail: self.manufacturer_detail.unwrap_or(d.manufacturer_detail),
            pretty: self.pretty.unwrap_or(d.pretty),
        }
    }
}

/// `GET /api/company/part/manufacturer/parameter/[{id}/]`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParameterQuery {
    pub manufacturer_part: Option<i64>,
    #[serde(default, deserialize_with = "flag")]
    pub manufacturer_part_detail: Option<bool>,
}

impl ParameterQuery {
    pub fn detail(&self) -> ParameterDetail {
        ParameterDetail {
            manufacturer_part_detail: self.manufacturer_part_detail.unwrap_or(false),
        }
    }
}

/// `GET /api/company/part/[{id}/]`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupplierPartQuery {
    pub part: Option<i64>,
    pub supplier: Option<i64>,
    /// Company id of the linked manufacturer part's manufacturer.
    pub manufacturer: Option<i64>,
    #[serde(default, deserialize_with = "flag")]
    pub brief: Option<bool>,
    #[serde(default, deserialize_with = "flag")]
    pub part_detail: Option<bool>,
    #[serde(default, deserialize_with = "flag")]
    pub supplier_detail: Option<bool>,
    #[serde(default, deserialize_with = "flag")]
    pub manufacturer_detail: Option<bool>,
    #[serde(default, deserialize_with = "flag")]
    pub pretty: Option<bool>,
}

impl SupplierPartQuery {
    /// Brief mode sets every detail default to off; explicit flags win.
    pub fn detail(&self) -> SupplierPartDetail {
        let base = if self.brief.unwrap_or(false) {
            SupplierPartDetail::brief()
        } else {
            SupplierPartDetail::full()
        };
        SupplierPartDetail {
            part_detail: self.part_detail.unwrap_or(base.part_detail),
            supplier_detail: self.supplier_detail.unwrap_or(base.supplier_detail),
            manufacturer_detail: self.manufacturer_detail.unwrap_or(base.manufacturer_detail),
            pretty: self.pretty.unwrap_or(base.pretty),
        }
    }
}

/// `GET /api/company/price-break/[{id}/]`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceBreakQuery {
    pub part: Option<i64>,
    #[serde(default, deserialize_with = "flag")]
    pub part_detail: Option<bool>,
    #[serde(default, deserialize_with = "flag")]
    pub supplier_detail: Option<bool>,
}

impl PriceBreakQuery {
    pub fn detail(&self) -> PriceBreakDetail {
        PriceBreakDetail {
            part_detail: self.part_detail.unwrap_or(false),
            supplier_detail: self.supplier_detail.unwrap_or(false),
        }
    }
}

/// `GET /api/company/attachment/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyAttachmentQuery {
    pub company: Option<i64>,
}

/// `GET /api/company/part/manufacturer/attachment/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManufacturerPartAttachmentQuery {
    pub manufacturer_part: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_str2bool() {
        for yes in ["1", "true", "True", "yes", "on", " Y "] {
            assert!(str2bool(yes), "{yes}");
        }
        for no in ["0", "false", "no", "off", "", "maybe"] {
            assert!(!str2bool(no), "{no}");
        }
    }

    #[test]
    fn test_supplier_part_brief_overrides() {
        let q: SupplierPartQuery =
            serde_json::from_value(json!({"brief": "true", "supplier_detail": "1"})).unwrap();
        let d = q.detail();
        assert!(!d.part_detail);
        assert!(d.supplier_detail);
        assert!(!d.manufacturer_detail);
        assert!(!d.pretty);

        let d = SupplierPartQuery::default().detail();
        assert_eq!(d, SupplierPartDetail::full());

        let q: SupplierPartQuery =
            serde_json::from_value(json!({"part_detail": "false"})).unwrap();
        let d = q.detail();
        assert!(!d.part_detail);
        assert!(d.supplier_detail);
    }

    #[test]
    fn test_manufacturer_part_defaults() {
        let d = ManufacturerPartQuery::default().detail();
        assert!(d.part_detail);
        assert!(d.manufacturer_detail);
        assert!(!d.pretty);

        let q: ManufacturerPartQuery =
            serde_json::from_value(json!({"pretty": "yes", "part_detail": "0"})).unwrap();
        let d = q.detail();
        assert!(d.pretty);
        assert!(!d.part_detail);
    }

    #[test]
    fn test_price_break_and_parameter_defaults_off() {
        assert_eq!(PriceBreakQuery::default().detail(), PriceBreakDetail::default());
        assert!(!ParameterQuery::default().detail().manufacturer_part_detail);
    }
}
