//! JSON projections of the company records.
//!
//! Every view is built from a *bundle*: the record plus whatever related
//! records the view may embed. Toggleable fields are `Option`s skipped when
//! `None`, so field presence is decided once by the detail option struct.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use stockroom_core::{
    Attachment, AttachmentOwner, Company, ManufacturerPart, ManufacturerPartParameter, Part,
    SupplierPart, SupplierPriceBreak,
};

// ── Bundles ───────────────────────────────────────────────────────────────

/// A company loaded through the part-count annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedCompany {
    pub company: Company,
    pub parts_supplied: i64,
    pub parts_manufactured: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManufacturerPartBundle {
    pub manufacturer_part: ManufacturerPart,
    pub part: Part,
    pub manufacturer: Company,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBundle {
    pub parameter: ManufacturerPartParameter,
    pub manufacturer_part: ManufacturerPartBundle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SupplierPartBundle {
    pub supplier_part: SupplierPart,
    pub part: Part,
    pub supplier: Company,
    pub manufacturer_part: Option<ManufacturerPartBundle>,
    /// Set only when loaded through the in-stock annotation.
    pub in_stock: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBreakBundle {
    pub price_break: SupplierPriceBreak,
    pub supplier_part: SupplierPartBundle,
}

// ── Detail options ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManufacturerPartDetail {
    pub part_detail: bool,
    pub manufacturer_detail: bool,
    pub pretty: bool,
}

impl Default for ManufacturerPartDetail {
    fn default() -> Self {
        Self {
            part_detail: true,
            manufacturer_detail: true,
            pretty: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParameterDetail {
    pub manufacturer_part_detail: bool,
}

/// Field toggles for [`SupplierPartView`]. `manufacturer_detail` governs
/// both `manufacturer_detail` and `manufacturer_part_detail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupplierPartDetail {
    pub part_detail: bool,
    pub supplier_detail: bool,
    pub manufacturer_detail: bool,
    pub pretty: bool,
}

impl SupplierPartDetail {
    pub fn full() -> Self {
        Self {
            part_detail: true,
            supplier_detail: true,
            manufacturer_detail: true,
            pretty: false,
        }
    }

    pub fn brief() -> Self {
        Self {
            part_detail: false,
            supplier_detail: false,
            manufacturer_detail: false,
            pretty: false,
        }
    }
}

impl Default for SupplierPartDetail {
    fn default() -> Self {
        Self::full()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceBreakDetail {
    pub part_detail: bool,
    pub supplier_detail: bool,
}

// ── Company ───────────────────────────────────────────────────────────────

/// Minimal company projection embedded by other views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyBrief {
    pub pk: i64,
    pub url: String,
    pub name: String,
    pub description: String,
    /// Thumbnail URL.
    pub image: String,
}

impl From<&Company> for CompanyBrief {
    fn from(c: &Company) -> Self {
        Self {
            pk: c.pk,
            url: c.absolute_url(),
            name: c.name.clone(),
            description: c.description.clone(),
            image: c.thumbnail_url(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyDetail {
    pub pk: i64,
    pub url: String,
    pub name: String,
    pub description: String,
    pub website: String,
    pub phone: String,
    pub address: String,
    pub email: String,
    pub currency: String,
    pub contact: String,
    pub link: String,
    pub image: Option<String>,
    pub is_customer: bool,
    pub is_manufacturer: bool,
    pub is_supplier: bool,
    pub notes: String,
    pub parts_supplied: i64,
    pub parts_manufactured: i64,
}

impl From<&AnnotatedCompany> for CompanyDetail {
    fn from(a: &AnnotatedCompany) -> Self {
        let c = &a.company;
        Self {
            pk: c.pk,
            url: c.absolute_url(),
            name: c.name.clone(),
            description: c.description.clone(),
            website: c.website.clone(),
            phone: c.phone.clone(),
            address: c.address.clone(),
            email: c.email.clone(),
            currency: c.currency.clone(),
            contact: c.contact.clone(),
            link: c.link.clone(),
            image: c.image_url(),
            is_customer: c.is_customer,
            is_manufacturer: c.is_manufacturer,
            is_supplier: c.is_supplier,
            notes: c.notes.clone(),
            parts_supplied: a.parts_supplied,
            parts_manufactured: a.parts_manufactured,
        }
    }
}

// ── Part ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartBrief {
    pub pk: i64,
    #[serde(rename = "IPN")]
    pub ipn: String,
    pub name: String,
    pub revision: String,
    pub full_name: String,
    pub description: String,
    pub thumbnail: String,
    pub active: bool,
    pub assembly: bool,
    pub purchaseable: bool,
    pub salable: bool,
    pub trackable: bool,
    #[serde(rename = "virtual")]
    pub is_virtual: bool,
    pub units: String,
}

impl From<&Part> for PartBrief {
    fn from(p: &Part) -> Self {
        Self {
            pk: p.pk,
            ipn: p.ipn.clone(),
            name: p.name.clone(),
            revision: p.revision.clone(),
            full_name: p.full_name(),
            description: p.description.clone(),
            thumbnail: p.thumbnail_url(),
            active: p.active,
            assembly: p.assembly,
            purchaseable: p.purchaseable,
            salable: p.salable,
            trackable: p.trackable,
            is_virtual: p.is_virtual,
            units: p.units.clone(),
        }
    }
}

// ── Manufacturer parts ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManufacturerPartView {
    pub pk: i64,
    pub part: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_detail: Option<PartBrief>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty_name: Option<String>,
    pub manufacturer: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer_detail: Option<CompanyBrief>,
    pub description: String,
    #[serde(rename = "MPN")]
    pub mpn: Option<String>,
    pub link: String,
}

impl ManufacturerPartView {
    pub fn build(b: &ManufacturerPartBundle, detail: ManufacturerPartDetail) -> Self {
        let mp = &b.manufacturer_part;
        Self {
            pk: mp.pk,
            part: mp.part,
            part_detail: detail.part_detail.then(|| PartBrief::from(&b.part)),
            pretty_name: detail.pretty.then(|| mp.pretty_name(&b.manufacturer)),
            manufacturer: mp.manufacturer,
            manufacturer_detail: detail
                .manufacturer_detail
                .then(|| CompanyBrief::from(&b.manufacturer)),
            description: mp.description.clone(),
            mpn: mp.mpn.clone(),
            link: mp.link.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterView {
    pub pk: i64,
    pub manufacturer_part: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer_part_detail: Option<ManufacturerPartView>,
    pub name: String,
    pub value: String,
    pub units: String,
}

impl ParameterView {
    pub fn build(b: &ParameterBundle, detail: ParameterDetail) -> Self {
        let p = &b.parameter;
        Self {
            pk: p.pk,
            manufacturer_part: p.manufacturer_part,
            manufacturer_part_detail: detail.manufacturer_part_detail.then(|| {
                ManufacturerPartView::build(&b.manufacturer_part, ManufacturerPartDetail::default())
            }),
            name: p.name.clone(),
            value: p.value.clone(),
            units: p.units.clone(),
        }
    }
}

// ── Supplier parts ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierPartView {
    pub available: Decimal,
    pub availability_updated: Option<DateTime<Utc>>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<f64>,
    pub link: String,
    /// Company id of the linked manufacturer part's manufacturer.
    pub manufacturer: Option<i64>,
    /// `None`: field omitted. `Some(None)`: enabled but nothing linked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer_detail: Option<Option<CompanyBrief>>,
    pub manufacturer_part: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer_part_detail: Option<Option<ManufacturerPartView>>,
    #[serde(rename = "MPN")]
    pub mpn: Option<String>,
    pub note: String,
    pub pk: i64,
    pub barcode_hash: String,
    pub packaging: String,
    pub pack_size: f64,
    pub part: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_detail: Option<PartBrief>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty_name: Option<String>,
    #[serde(rename = "SKU")]
    pub sku: String,
    pub supplier: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_detail: Option<CompanyBrief>,
    pub url: String,
    pub updated: Option<DateTime<Utc>>,
}

impl SupplierPartView {
    pub fn build(b: &SupplierPartBundle, detail: SupplierPartDetail) -> Self {
        let sp = &b.supplier_part;
        let linked = b.manufacturer_part.as_ref();
        Self {
            available: sp.available,
            availability_updated: sp.availability_updated,
            description: sp.description.clone(),
            in_stock: b.in_stock,
            link: sp.link.clone(),
            manufacturer: linked.map(|m| m.manufacturer.pk),
            manufacturer_detail: detail
                .manufacturer_detail
                .then(|| linked.map(|m| CompanyBrief::from(&m.manufacturer))),
            manufacturer_part: sp.manufacturer_part,
            manufacturer_part_detail: detail.manufacturer_detail.then(|| {
                linked.map(|m| ManufacturerPartView::build(m, ManufacturerPartDetail::default()))
            }),
            mpn: linked.and_then(|m| m.manufacturer_part.mpn.clone()),
            note: sp.note.clone(),
            pk: sp.pk,
            barcode_hash: sp.barcode_hash.clone(),
            packaging: sp.packaging.clone(),
            pack_size: sp.pack_size.to_f64().unwrap_or_default(),
            part: sp.part,
            part_detail: detail.part_detail.then(|| PartBrief::from(&b.part)),
            pretty_name: detail.pretty.then(|| {
                sp.pretty_name(
                    &b.part,
                    &b.supplier,
                    linked.map(|m| (&m.manufacturer_part, &m.manufacturer)),
                )
            }),
            sku: sp.sku.clone(),
            supplier: sp.supplier,
            supplier_detail: detail.supplier_detail.then(|| CompanyBrief::from(&b.supplier)),
            url: sp.absolute_url(),
            updated: sp.updated,
        }
    }
}

// ── Price breaks ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBreakView {
    pub pk: i64,
    pub part: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_detail: Option<SupplierPartView>,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub price_currency: String,
    pub supplier: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_detail: Option<CompanyBrief>,
    pub updated: Option<DateTime<Utc>>,
}

impl PriceBreakView {
    /// The embedded supplier part is always brief and never carries the
    /// stock annotation.
    pub fn build(b: &PriceBreakBundle, detail: PriceBreakDetail) -> Self {
        let pb = &b.price_break;
        let sp = &b.supplier_part;
        Self {
            pk: pb.pk,
            part: pb.part,
            part_detail: detail.part_detail.then(|| {
                let mut view = SupplierPartView::build(sp, SupplierPartDetail::brief());
                view.in_stock = None;
                view
            }),
            quantity: pb.quantity,
            price: pb.price,
            price_currency: pb.price_currency.clone(),
            supplier: sp.supplier.pk,
            supplier_detail: detail.supplier_detail.then(|| CompanyBrief::from(&sp.supplier)),
            updated: pb.updated,
        }
    }
}

// ── Attachments ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentView {
    pub pk: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer_part: Option<i64>,
    pub attachment: Option<String>,
    pub filename: Option<String>,
    pub link: String,
    pub comment: String,
    pub upload_date: NaiveDate,
    pub user: Option<i64>,
}

impl From<&Attachment> for AttachmentView {
    fn from(a: &Attachment) -> Self {
        let (company, manufacturer_part) = match a.owner {
            AttachmentOwner::Company(pk) => (Some(pk), None),
            AttachmentOwner::ManufacturerPart(pk) => (None, Some(pk)),
        };
        Self {
            pk: a.pk,
            company,
            manufacturer_part,
            attachment: a.attachment_url(),
            filename: a.filename().map(str::to_string),
            link: a.link.clone(),
            comment: a.comment.clone(),
            upload_date: a.upload_date,
            user: a.user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use stockroom_core::testing;

    fn manufacturer_bundle() -> ManufacturerPartBundle {
        let mut acme = testing::company(7, "Acme");
        acme.is_manufacturer = true;
        ManufacturerPartBundle {
            manufacturer_part: ManufacturerPart {
                pk: 3,
                part: 1,
                manufacturer: 7,
                mpn: Some("ABC123".into()),
                description: String::new(),
                link: String::new(),
            },
            part: testing::part(1, "Widget"),
            manufacturer: acme,
        }
    }

    fn supplier_bundle(linked: bool) -> SupplierPartBundle {
        let mut part = testing::part(1, "Widget");
        part.ipn = "W-001".into();
        let mut supplier = testing::company(2, "Digi");
        supplier.is_supplier = true;
        let mut sp = testing::supplier_part(5, 1, 2, "D-42");
        sp.manufacturer_part = linked.then_some(3);
        SupplierPartBundle {
            supplier_part: sp,
            part,
            supplier,
            manufacturer_part: linked.then(manufacturer_bundle),
            in_stock: Some(12.0),
        }
    }

    fn keys(v: &impl Serialize) -> Value {
        serde_json::to_value(v).unwrap()
    }

    #[test]
    fn test_company_brief_placeholder_image() {
        let mut c = testing::company(1, "Acme");
        assert_eq!(
            CompanyBrief::from(&c).image,
            "/static/img/blank_image.thumbnail.png"
        );
        c.image = Some("company_images/company_1_image.png".into());
        let v = keys(&CompanyBrief::from(&c));
        assert_eq!(v["image"], "/media/company_images/company_1_image.png");
        assert_eq!(v["url"], "/company/1/");
    }

    #[test]
    fn test_company_detail_includes_counts() {
        let a = AnnotatedCompany {
            company: testing::company(1, "Acme"),
            parts_supplied: 4,
            parts_manufactured: 2,
        };
        let v = keys(&CompanyDetail::from(&a));
        assert_eq!(v["parts_supplied"], 4);
        assert_eq!(v["parts_manufactured"], 2);
        assert!(v["image"].is_null());
    }

    #[test]
    fn test_manufacturer_part_toggles() {
        let b = manufacturer_bundle();
        let v = keys(&ManufacturerPartView::build(&b, ManufacturerPartDetail::default()));
        assert!(v.get("part_detail").is_some());
        assert!(v.get("manufacturer_detail").is_some());
        assert!(v.get("pretty_name").is_none());
        assert_eq!(v["MPN"], "ABC123");

        let v = keys(&ManufacturerPartView::build(
            &b,
            ManufacturerPartDetail {
                part_detail: false,
                manufacturer_detail: false,
                pretty: true,
            },
        ));
        assert!(v.get("part_detail").is_none());
        assert!(v.get("manufacturer_detail").is_none());
        assert_eq!(v["pretty_name"], "Acme | ABC123");
    }

    #[test]
    fn test_parameter_embeds_default_manufacturer_view() {
        let b = ParameterBundle {
            parameter: ManufacturerPartParameter {
                pk: 1,
                manufacturer_part: 3,
                name: "Voltage".into(),
                value: "5".into(),
                units: "V".into(),
            },
            manufacturer_part: manufacturer_bundle(),
        };
        let v = keys(&ParameterView::build(&b, ParameterDetail::default()));
        assert!(v.get("manufacturer_part_detail").is_none());

        let v = keys(&ParameterView::build(
            &b,
            ParameterDetail {
                manufacturer_part_detail: true,
            },
        ));
        assert!(v["manufacturer_part_detail"].get("part_detail").is_some());
    }

    #[test]
    fn test_supplier_part_full_and_brief() {
        let b = supplier_bundle(true);
        let v = keys(&SupplierPartView::build(&b, SupplierPartDetail::full()));
        for key in [
            "part_detail",
            "supplier_detail",
            "manufacturer_detail",
            "manufacturer_part_detail",
            "in_stock",
        ] {
            assert!(v.get(key).is_some(), "{key}");
        }
        assert!(v.get("pretty_name").is_none());
        assert_eq!(v["MPN"], "ABC123");
        assert_eq!(v["SKU"], "D-42");
        assert_eq!(v["manufacturer"], 7);
        assert_eq!(v["url"], "/supplier-part/5/");

        let v = keys(&SupplierPartView::build(&b, SupplierPartDetail::brief()));
        for key in [
            "part_detail",
            "supplier_detail",
            "manufacturer_detail",
            "manufacturer_part_detail",
        ] {
            assert!(v.get(key).is_none(), "{key}");
        }
    }

    #[test]
    fn test_supplier_part_unlinked_manufacturer_detail_is_null() {
        let b = supplier_bundle(false);
        let v = keys(&SupplierPartView::build(&b, SupplierPartDetail::full()));
        assert!(v["manufacturer_detail"].is_null());
        assert!(v["manufacturer_part_detail"].is_null());
        assert!(v["MPN"].is_null());
    }

    #[test]
    fn test_supplier_part_pretty_name() {
        let b = supplier_bundle(true);
        let detail = SupplierPartDetail {
            pretty: true,
            ..SupplierPartDetail::brief()
        };
        let v = keys(&SupplierPartView::build(&b, detail));
        assert_eq!(v["pretty_name"], "W-001 | Digi | D-42 | Acme | ABC123");
    }

    #[test]
    fn test_in_stock_only_when_annotated() {
        let mut b = supplier_bundle(false);
        b.in_stock = None;
        let v = keys(&SupplierPartView::build(&b, SupplierPartDetail::full()));
        assert!(v.get("in_stock").is_none());
    }

    #[test]
    fn test_price_break_part_detail_is_brief() {
        let b = PriceBreakBundle {
            price_break: SupplierPriceBreak {
                pk: 1,
                part: 5,
                quantity: Decimal::ONE,
                price: Some(Decimal::new(125, 2)),
                price_currency: "USD".into(),
                updated: None,
            },
            supplier_part: supplier_bundle(true),
        };
        let v = keys(&PriceBreakView::build(&b, PriceBreakDetail::default()));
        assert!(v.get("part_detail").is_none());
        assert!(v.get("supplier_detail").is_none());
        assert_eq!(v["supplier"], 2);
        assert_eq!(v["price"], "1.25");

        let v = keys(&PriceBreakView::build(
            &b,
            PriceBreakDetail {
                part_detail: true,
                supplier_detail: true,
            },
        ));
        let part = &v["part_detail"];
        for key in [
            "part_detail",
            "supplier_detail",
            "manufacturer_detail",
            "manufacturer_part_detail",
            "in_stock",
        ] {
            assert!(part.get(key).is_none(), "{key}");
        }
        assert_eq!(v["supplier_detail"]["name"], "Digi");
    }

    #[test]
    fn test_attachment_view_owner_field() {
        let a = Attachment {
            pk: 1,
            owner: AttachmentOwner::ManufacturerPart(3),
            attachment: Some("attachments/manufacturer_part_files/3/spec.pdf".into()),
            link: String::new(),
            comment: String::new(),
            upload_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            user: None,
        };
        let v = keys(&AttachmentView::from(&a));
        assert!(v.get("company").is_none());
        assert_eq!(v["manufacturer_part"], 3);
        assert_eq!(v["filename"], "spec.pdf");
        assert_eq!(v["upload_date"], "2024-01-02");
    }
}
