//! Request payload parsing.
//!
//! A [`Payload`] reads fields out of a JSON object and collects every
//! problem into [`FieldErrors`] instead of stopping at the first one. Create
//! requests treat required fields as mandatory; partial updates (PATCH) only
//! touch the keys they carry.
//!
//! Each record has a `*Changes` struct holding the parsed, validated fields
//! (`None` = not supplied) with an `apply_to()` that writes them onto a
//! record. Side inputs that are not columns (`available`, the raw
//! `manufacturer`/`MPN` pair, `remote_image`) are surfaced separately so the
//! store can run them as explicit steps.

use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use stockroom_core::attachment::validate_filename;
use stockroom_core::company::Company;
use stockroom_core::validate::{self, ValidationError};
use stockroom_core::{
    CurrencyTable, ManufacturerPart, ManufacturerPartParameter, SupplierPart, SupplierPriceBreak,
};

use crate::{FieldErrors, ServiceError};

const URL_SCHEMES: &[&str] = &["http", "https", "ftp", "ftps"];

// ─── Payload reader ──────────────────────────────────────────────────────────

pub struct Payload<'a> {
    map: &'a Map<String, Value>,
    partial: bool,
    errors: FieldErrors,
}

impl<'a> Payload<'a> {
    /// `partial` relaxes required fields for PATCH.
    pub fn new(value: &'a Value, partial: bool) -> Result<Self, ServiceError> {
        let map = value
            .as_object()
            .ok_or_else(|| ServiceError::BadRequest("Expected a JSON object".into()))?;
        Ok(Self {
            map,
            partial,
            errors: FieldErrors::new(),
        })
    }

    pub fn has(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn raw(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key)
    }

    pub fn error(&mut self, err: ValidationError) {
        self.errors.push(err);
    }

    pub fn finish(self) -> Result<(), ServiceError> {
        self.errors.into_result()
    }

    /// Core lookup: returns `Some(Some(v))` for a value, `Some(None)` for an
    /// explicit null, `None` when absent. Records a missing required field.
    fn lookup(&mut self, key: &str, required: bool) -> Option<Option<&'a Value>> {
        match self.map.get(key) {
            None => {
                if required && !self.partial {
                    self.error(ValidationError::MissingField { field: key.into() });
                }
                None
            }
            Some(Value::Null) => Some(None),
            Some(v) => Some(Some(v)),
        }
    }

    /// A present, non-null value parsed by `parse`. Null is rejected.
    fn field<T>(
        &mut self,
        key: &str,
        required: bool,
        parse: impl FnOnce(&str, &Value) -> Result<T, ValidationError>,
    ) -> Option<T> {
        match self.lookup(key, required)? {
            None => {
                self.error(ValidationError::NullField { field: key.into() });
                None
            }
            Some(v) => self.errors.check(parse(key, v)),
        }
    }

    /// Like [`Self::field`] but null is a valid value.
    fn nullable<T>(
        &mut self,
        key: &str,
        required: bool,
        parse: impl FnOnce(&str, &Value) -> Result<T, ValidationError>,
    ) -> Option<Option<T>> {
        match self.lookup(key, required)? {
            None => Some(None),
            Some(v) => self.errors.check(parse(key, v)).map(Some),
        }
    }

    /// Optional free text; blank allowed.
    pub fn text(&mut self, key: &str, max: usize) -> Option<String> {
        self.field(key, false, |k, v| parse_text(k, v, max, true))
    }

    /// Required, non-blank text.
    pub fn required_text(&mut self, key: &str, max: usize) -> Option<String> {
        self.field(key, true, |k, v| parse_text(k, v, max, false))
    }

    pub fn nullable_text(&mut self, key: &str, max: usize) -> Option<Option<String>> {
        self.nullable(key, false, |k, v| parse_text(k, v, max, true))
    }

    pub fn url(&mut self, key: &str, max: usize) -> Option<String> {
        self.field(key, false, |k, v| {
            let s = parse_text(k, v, max, true)?;
            if !s.is_empty() {
                check_url(k, &s, URL_SCHEMES)?;
            }
            Ok(s)
        })
    }

    pub fn email(&mut self, key: &str, max: usize) -> Option<String> {
        self.field(key, false, |k, v| {
            let s = parse_text(k, v, max, true)?;
            if !s.is_empty() {
                validate::email(k, &s)?;
            }
            Ok(s)
        })
    }

    pub fn boolean(&mut self, key: &str) -> Option<bool> {
        self.field(key, false, parse_bool)
    }

    /// A decimal with at most `max_digits` digits, `places` after the point.
    pub fn decimal(
        &mut self,
        key: &str,
        required: bool,
        max_digits: u32,
        places: u32,
    ) -> Option<Decimal> {
        self.field(key, required, |k, v| {
            let d = parse_decimal(k, v)?;
            validate::decimal_precision(k, d, max_digits, places)?;
            Ok(d)
        })
    }

    pub fn nullable_decimal(
        &mut self,
        key: &str,
        required: bool,
        max_digits: u32,
        places: u32,
    ) -> Option<Option<Decimal>> {
        self.nullable(key, required, |k, v| {
            let d = parse_decimal(k, v)?;
            validate::decimal_precision(k, d, max_digits, places)?;
            Ok(d)
        })
    }

    /// Primary key of a related record.
    pub fn pk(&mut self, key: &str, required: bool) -> Option<i64> {
        self.field(key, required, parse_pk)
    }

    pub fn nullable_pk(&mut self, key: &str) -> Option<Option<i64>> {
        self.nullable(key, false, parse_pk)
    }

    /// Currency code from the configured table.
    pub fn currency(&mut self, key: &str, required: bool, table: &CurrencyTable) -> Option<String> {
        self.field(key, required, |k, v| {
            let code = v
                .as_str()
                .ok_or_else(|| ValidationError::NotAString { field: k.into() })?;
            table.validate(k, code)
        })
    }
}

fn parse_text(
    field: &str,
    v: &Value,
    max: usize,
    allow_blank: bool,
) -> Result<String, ValidationError> {
    let s = match v {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return Err(ValidationError::NotAString { field: field.into() }),
    };
    if s.is_empty() && !allow_blank {
        return Err(ValidationError::BlankField { field: field.into() });
    }
    validate::max_length(field, &s, max)?;
    Ok(s)
}

fn check_url(field: &str, s: &str, schemes: &[&str]) -> Result<(), ValidationError> {
    match url::Url::parse(s) {
        Ok(u) if schemes.contains(&u.scheme()) && u.host().is_some() => Ok(()),
        _ => Err(ValidationError::InvalidUrl { field: field.into() }),
    }
}

fn parse_bool(field: &str, v: &Value) -> Result<bool, ValidationError> {
    match v {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) if n.as_i64() == Some(1) => Ok(true),
        Value::Number(n) if n.as_i64() == Some(0) => Ok(false),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "y" | "on" => Ok(true),
            "false" | "0" | "no" | "n" | "off" => Ok(false),
            _ => Err(ValidationError::NotABoolean { field: field.into() }),
        },
        _ => Err(ValidationError::NotABoolean { field: field.into() }),
    }
}

fn parse_decimal(field: &str, v: &Value) -> Result<Decimal, ValidationError> {
    let s = match v {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return Err(ValidationError::NotADecimal { field: field.into() }),
    };
    Decimal::from_str(&s)
        .or_else(|_| Decimal::from_scientific(&s))
        .map_err(|_| ValidationError::NotADecimal { field: field.into() })
}

fn parse_pk(field: &str, v: &Value) -> Result<i64, ValidationError> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| ValidationError::NotAnInteger { field: field.into() })
}

/// Overwrite `target` when a value was supplied.
fn set<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}

// ─── Company ─────────────────────────────────────────────────────────────────

/// The image itself is only ever set through `remote_image`; the only value
/// accepted for `image` is null.
fn clear_image(p: &mut Payload<'_>) -> bool {
    match p.raw("image") {
        None => false,
        Some(Value::Null) => true,
        Some(_) => {
            p.error(ValidationError::Rule {
                field: "image".into(),
                message: "The submitted data was not a file. Check the encoding type on the form."
                    .into(),
            });
            false
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub currency: Option<String>,
    pub contact: Option<String>,
    pub link: Option<String>,
    pub is_customer: Option<bool>,
    pub is_supplier: Option<bool>,
    pub is_manufacturer: Option<bool>,
    pub notes: Option<String>,
    /// URL to download the company image from. Write-only.
    pub remote_image: Option<String>,
    /// `"image": null` was sent: drop the stored image.
    pub clear_image: bool,
}

impl CompanyChanges {
    pub fn parse(
        value: &Value,
        partial: bool,
        currencies: &CurrencyTable,
    ) -> Result<Self, ServiceError> {
        let mut p = Payload::new(value, partial)?;
        let changes = Self {
            name: p.required_text("name", 100),
            description: p.text("description", 500),
            website: p.url("website", 200),
            phone: p.text("phone", 50),
            address: p.text("address", 200),
            email: p.email("email", 254),
            currency: p.currency("currency", true, currencies),
            contact: p.text("contact", 100),
            link: p.url("link", 200),
            is_customer: p.boolean("is_customer"),
            is_supplier: p.boolean("is_supplier"),
            is_manufacturer: p.boolean("is_manufacturer"),
            notes: p.text("notes", 50_000),
            remote_image: p
                .nullable(
                    "remote_image",
                    false,
                    |k, v| {
                        let s = parse_text(k, v, 2000, true)?;
                        if !s.is_empty() {
                            check_url(k, &s, &["http", "https"])?;
                        }
                        Ok(s)
                    },
                )
                .flatten()
                .filter(|s| !s.is_empty()),
            clear_image: clear_image(&mut p),
        };
        p.finish()?;
        Ok(changes)
    }

    /// A new company with the role defaults: supplier only.
    pub fn create(&self) -> Company {
        let mut c = Company {
            pk: 0,
            name: String::new(),
            description: String::new(),
            website: String::new(),
            phone: String::new(),
            address: String::new(),
            email: String::new(),
            currency: String::new(),
            contact: String::new(),
            link: String::new(),
            image: None,
            is_customer: false,
            is_supplier: true,
            is_manufacturer: false,
            notes: String::new(),
        };
        self.apply_to(&mut c);
        c
    }

    pub fn apply_to(&self, c: &mut Company) {
        set(&mut c.name, &self.name);
        set(&mut c.description, &self.description);
        set(&mut c.website, &self.website);
        set(&mut c.phone, &self.phone);
        set(&mut c.address, &self.address);
        set(&mut c.email, &self.email);
        set(&mut c.currency, &self.currency);
        set(&mut c.contact, &self.contact);
        set(&mut c.link, &self.link);
        set(&mut c.is_customer, &self.is_customer);
        set(&mut c.is_supplier, &self.is_supplier);
        set(&mut c.is_manufacturer, &self.is_manufacturer);
        set(&mut c.notes, &self.notes);
    }
}

// ─── Manufacturer parts ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManufacturerPartChanges {
    pub part: Option<i64>,
    pub manufacturer: Option<i64>,
    pub mpn: Option<Option<String>>,
    pub description: Option<String>,
    pub link: Option<String>,
}

impl ManufacturerPartChanges {
    pub fn parse(value: &Value, partial: bool) -> Result<Self, ServiceError> {
        let mut p = Payload::new(value, partial)?;
        let changes = Self {
            part: p.pk("part", true),
            manufacturer: p.pk("manufacturer", true),
            mpn: p.nullable_text("MPN", 100),
            description: p.text("description", 250),
            link: p.url("link", 200),
        };
        p.finish()?;
        Ok(changes)
    }

    pub fn create(&self) -> ManufacturerPart {
        let mut mp = ManufacturerPart {
            pk: 0,
            part: 0,
            manufacturer: 0,
            mpn: None,
            description: String::new(),
            link: String::new(),
        };
        self.apply_to(&mut mp);
        mp
    }

    pub fn apply_to(&self, mp: &mut ManufacturerPart) {
        set(&mut mp.part, &self.part);
        set(&mut mp.manufacturer, &self.manufacturer);
        set(&mut mp.mpn, &self.mpn);
        set(&mut mp.description, &self.description);
        set(&mut mp.link, &self.link);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterChanges {
    pub manufacturer_part: Option<i64>,
    pub name: Option<String>,
    pub value: Option<String>,
    pub units: Option<String>,
}

impl ParameterChanges {
    pub fn parse(value: &Value, partial: bool) -> Result<Self, ServiceError> {
        let mut p = Payload::new(value, partial)?;
        let changes = Self {
            manufacturer_part: p.pk("manufacturer_part", true),
            name: p.required_text("name", 500),
            value: p.required_text("value", 500),
            units: p.text("units", 64),
        };
        p.finish()?;
        Ok(changes)
    }

    pub fn create(&self) -> ManufacturerPartParameter {
        let mut param = ManufacturerPartParameter {
            pk: 0,
            manufacturer_part: 0,
            name: String::new(),
            value: String::new(),
            units: String::new(),
        };
        self.apply_to(&mut param);
        param
    }

    pub fn apply_to(&self, param: &mut ManufacturerPartParameter) {
        set(&mut param.manufacturer_part, &self.manufacturer_part);
        set(&mut param.name, &self.name);
        set(&mut param.value, &self.value);
        set(&mut param.units, &self.units);
    }
}

// ─── Supplier parts ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplierPartChanges {
    pub part: Option<i64>,
    pub supplier: Option<i64>,
    pub manufacturer_part: Option<Option<i64>>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub note: Option<String>,
    pub packaging: Option<String>,
    pub pack_size: Option<Decimal>,
}

impl SupplierPartChanges {
    pub fn create(&self) -> SupplierPart {
        let mut sp = SupplierPart {
            pk: 0,
            part: 0,
            supplier: 0,
            manufacturer_part: None,
            sku: String::new(),
            description: String::new(),
            link: String::new(),
            note: String::new(),
            packaging: String::new(),
            pack_size: Decimal::ONE,
            available: Decimal::ZERO,
            availability_updated: None,
            barcode_hash: String::new(),
            updated: None,
        };
        self.apply_to(&mut sp);
        sp
    }

    /// `available` and its timestamp are never written here.
    pub fn apply_to(&self, sp: &mut SupplierPart) {
        set(&mut sp.part, &self.part);
        set(&mut sp.supplier, &self.supplier);
        set(&mut sp.manufacturer_part, &self.manufacturer_part);
        set(&mut sp.sku, &self.sku);
        set(&mut sp.description, &self.description);
        set(&mut sp.link, &self.link);
        set(&mut sp.note, &self.note);
        set(&mut sp.packaging, &self.packaging);
        set(&mut sp.pack_size, &self.pack_size);
    }
}

/// Raw `manufacturer` + `MPN` pair supplied when creating a supplier part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManufacturerLink {
    pub manufacturer: i64,
    pub mpn: String,
}

/// A parsed supplier part request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplierPartInput {
    pub changes: SupplierPartChanges,
    /// Present exactly when the payload carried the `available` key.
    pub available: Option<Decimal>,
    pub manufacturer_link: Option<ManufacturerLink>,
}

impl SupplierPartInput {
    pub fn from_create(value: &Value) -> Result<Self, ServiceError> {
        Self::parse(value, false, true)
    }

    /// Updates never create manufacturer links.
    pub fn from_update(value: &Value, partial: bool) -> Result<Self, ServiceError> {
        Self::parse(value, partial, false)
    }

    fn parse(value: &Value, partial: bool, link: bool) -> Result<Self, ServiceError> {
        let mut p = Payload::new(value, partial)?;
        let pack_size = p.decimal("pack_size", false, 15, 5);
        if let Some(size) = pack_size
            && size <= Decimal::ZERO
        {
            p.error(ValidationError::rule(
                "pack_size",
                "Pack size must be greater than zero",
            ));
        }
        let changes = SupplierPartChanges {
            part: p.pk("part", true),
            supplier: p.pk("supplier", true),
            manufacturer_part: p.nullable_pk("manufacturer_part"),
            sku: p.required_text("SKU", 100),
            description: p.text("description", 250),
            link: p.url("link", 200),
            note: p.text("note", 100),
            packaging: p.text("packaging", 50),
            pack_size,
        };

        let available = p.decimal("available", false, 10, 3);
        if let Some(qty) = available
            && let Err(e) = validate::min_value("available", qty, Decimal::ZERO)
        {
            p.error(e);
        }

        let manufacturer_link = if link {
            manufacturer_link(&mut p)
        } else {
            None
        };

        p.finish()?;
        Ok(Self {
            changes,
            available,
            manufacturer_link,
        })
    }
}

/// Both raw keys must be present and non-empty; anything else means no link.
fn manufacturer_link(p: &mut Payload<'_>) -> Option<ManufacturerLink> {
    let truthy = |v: Option<&Value>| match v {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(_) => true,
    };
    if !truthy(p.raw("manufacturer")) || !truthy(p.raw("MPN")) {
        return None;
    }
    let manufacturer = p.pk("manufacturer", false)?;
    let mpn = p.text("MPN", 100)?;
    Some(ManufacturerLink { manufacturer, mpn })
}

// ─── Price breaks ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceBreakChanges {
    pub part: Option<i64>,
    pub quantity: Option<Decimal>,
    pub price: Option<Option<Decimal>>,
    pub price_currency: Option<String>,
}

impl PriceBreakChanges {
    pub fn parse(
        value: &Value,
        partial: bool,
        currencies: &CurrencyTable,
    ) -> Result<Self, ServiceError> {
        let mut p = Payload::new(value, partial)?;
        let quantity = p.decimal("quantity", true, 15, 5);
        if let Some(q) = quantity
            && let Err(e) = validate::min_value("quantity", q, Decimal::ONE)
        {
            p.error(e);
        }
        let changes = Self {
            part: p.pk("part", true),
            quantity,
            price: p.nullable_decimal("price", true, 19, 6),
            price_currency: p.currency("price_currency", false, currencies),
        };
        p.finish()?;
        Ok(changes)
    }

    /// A new break; `price_currency` falls back to the configured default.
    pub fn create(&self, currencies: &CurrencyTable) -> SupplierPriceBreak {
        let mut pb = SupplierPriceBreak {
            pk: 0,
            part: 0,
            quantity: Decimal::ONE,
            price: None,
            price_currency: currencies.default_code().to_string(),
            updated: None,
        };
        self.apply_to(&mut pb);
        pb
    }

    pub fn apply_to(&self, pb: &mut SupplierPriceBreak) {
        set(&mut pb.part, &self.part);
        set(&mut pb.quantity, &self.quantity);
        set(&mut pb.price, &self.price);
        set(&mut pb.price_currency, &self.price_currency);
    }
}

// ─── Attachments ─────────────────────────────────────────────────────────────

/// An uploaded attachment file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentInput {
    pub owner: i64,
    pub link: String,
    pub comment: String,
    pub file: Option<UploadedFile>,
}

impl AttachmentInput {
    /// `owner_field` is `company` or `manufacturer_part`.
    pub fn parse(value: &Value, owner_field: &str) -> Result<Self, ServiceError> {
        let mut p = Payload::new(value, false)?;
        let owner = p.pk(owner_field, true);
        let link = p.url("link", 2000).unwrap_or_default();
        let comment = p.text("comment", 100).unwrap_or_default();

        let file = match (p.raw("filename"), p.raw("content")) {
            (None | Some(Value::Null), None | Some(Value::Null)) => None,
            _ => {
                let filename = p
                    .field("filename", true, |k, v| validate_filename(k, v.as_str().unwrap_or("")));
                let content = p.field("content", true, |k, v| {
                    let s = v
                        .as_str()
                        .ok_or_else(|| ValidationError::NotAString { field: k.into() })?;
                    BASE64
                        .decode(s.trim())
                        .map_err(|_| ValidationError::rule(k, "Invalid base64 file content"))
                });
                filename
                    .zip(content)
                    .map(|(filename, content)| UploadedFile { filename, content })
            }
        };

        if file.is_none() && link.is_empty() && p.errors.is_empty() {
            p.error(ValidationError::rule("attachment", "Missing file"));
            p.error(ValidationError::rule("link", "Missing external link"));
        }

        p.finish()?;
        Ok(Self {
            owner: owner.unwrap_or_default(),
            link,
            comment,
            file,
        })
    }
}
