//! Manufacturer parts, supplier parts and price breaks.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::company::Company;
use crate::part::Part;
use crate::validate::{self, ValidationError};

/// A part as designated by its manufacturer (identified by the MPN).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManufacturerPart {
    pub pk: i64,
    pub part: i64,
    pub manufacturer: i64,
    pub mpn: Option<String>,
    pub description: String,
    pub link: String,
}

impl ManufacturerPart {
    /// `<manufacturer name> | <MPN>`
    pub fn pretty_name(&self, manufacturer: &Company) -> String {
        format!(
            "{} | {}",
            manufacturer.name,
            self.mpn.as_deref().unwrap_or_default()
        )
    }
}

/// A named value attached to a manufacturer part (e.g. "Tolerance" = "1%").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManufacturerPartParameter {
    pub pk: i64,
    pub manufacturer_part: i64,
    pub name: String,
    pub value: String,
    pub units: String,
}

/// A part as sold by one supplier, optionally tied to a manufacturer part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierPart {
    pub pk: i64,
    pub part: i64,
    pub supplier: i64,
    pub manufacturer_part: Option<i64>,
    pub sku: String,
    pub description: String,
    pub link: String,
    pub note: String,
    pub packaging: String,
    pub pack_size: Decimal,
    pub available: Decimal,
    pub availability_updated: Option<DateTime<Utc>>,
    pub barcode_hash: String,
    pub updated: Option<DateTime<Utc>>,
}

impl SupplierPart {
    pub fn absolute_url(&self) -> String {
        format!("/supplier-part/{}/", self.pk)
    }

    /// Set the quantity the supplier reports as available and stamp the time
    /// of the report. This is the only way `available` changes.
    pub fn update_available_quantity(
        &mut self,
        quantity: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        validate::min_value("available", quantity, Decimal::ZERO)?;
        self.available = quantity;
        self.availability_updated = Some(now);
        Ok(())
    }

    /// The linked manufacturer part must describe the same base part.
    pub fn check_manufacturer_part(&self, mp: &ManufacturerPart) -> Result<(), ValidationError> {
        if mp.part != self.part {
            return Err(ValidationError::rule(
                "manufacturer_part",
                "Linked manufacturer part must reference the same base part",
            ));
        }
        Ok(())
    }

    /// `[IPN | ]<supplier> | <SKU>[ | <manufacturer> | <MPN>]`
    pub fn pretty_name(
        &self,
        part: &Part,
        supplier: &Company,
        manufacturer: Option<(&ManufacturerPart, &Company)>,
    ) -> String {
        let mut s = String::new();
        if !part.ipn.is_empty() {
            s.push_str(&part.ipn);
            s.push_str(" | ");
        }
        s.push_str(&supplier.name);
        s.push_str(" | ");
        s.push_str(&self.sku);

        let mfr = manufacturer_string(manufacturer);
        if !mfr.is_empty() {
            s.push_str(" | ");
            s.push_str(&mfr);
        }
        s
    }
}

fn manufacturer_string(manufacturer: Option<(&ManufacturerPart, &Company)>) -> String {
    let Some((mp, company)) = manufacturer else {
        return String::new();
    };
    let mut items = vec![company.name.as_str()];
    if let Some(mpn) = mp.mpn.as_deref().filter(|m| !m.is_empty()) {
        items.push(mpn);
    }
    items.join(" | ")
}

/// Unit price of a supplier part from a quantity threshold upward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierPriceBreak {
    pub pk: i64,
    /// The supplier part this break belongs to.
    pub part: i64,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub price_currency: String,
    pub updated: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use chrono::TimeZone;

    #[test]
    fn test_update_available_quantity_stamps_time() {
        let mut sp = testing::supplier_part(1, 1, 2, "SKU-1");
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        sp.update_available_quantity(Decimal::from(50), now).unwrap();
        assert_eq!(sp.available, Decimal::from(50));
        assert_eq!(sp.availability_updated, Some(now));
    }

    #[test]
    fn test_update_available_quantity_rejects_negative() {
        let mut sp = testing::supplier_part(1, 1, 2, "SKU-1");
        let now = Utc::now();
        assert!(sp.update_available_quantity(Decimal::from(-1), now).is_err());
        assert_eq!(sp.available, Decimal::ZERO);
        assert_eq!(sp.availability_updated, None);
    }

    #[test]
    fn test_pretty_names() {
        let mut part = testing::part(1, "Resistor");
        let supplier = testing::company(2, "DigiKey");
        let maker = testing::company(3, "Yageo");
        let sp = testing::supplier_part(10, 1, 2, "311-10KCRCT");
        assert_eq!(sp.pretty_name(&part, &supplier, None), "DigiKey | 311-10KCRCT");

        part.ipn = "R-10K".into();
        let mp = ManufacturerPart {
            pk: 5,
            part: 1,
            manufacturer: 3,
            mpn: Some("RC0603FR-0710KL".into()),
            description: String::new(),
            link: String::new(),
        };
        assert_eq!(mp.pretty_name(&maker), "Yageo | RC0603FR-0710KL");
        assert_eq!(
            sp.pretty_name(&part, &supplier, Some((&mp, &maker))),
            "R-10K | DigiKey | 311-10KCRCT | Yageo | RC0603FR-0710KL"
        );
    }

    #[test]
    fn test_check_manufacturer_part_same_base_part() {
        let sp = testing::supplier_part(10, 1, 2, "X");
        let mut mp = ManufacturerPart {
            pk: 5,
            part: 1,
            manufacturer: 3,
            mpn: None,
            description: String::new(),
            link: String::new(),
        };
        assert!(sp.check_manufacturer_part(&mp).is_ok());
        mp.part = 9;
        assert_eq!(
            sp.check_manufacturer_part(&mp).unwrap_err().field(),
            "manufacturer_part"
        );
    }
}
