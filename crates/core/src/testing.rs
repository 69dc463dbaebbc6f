use rust_decimal::Decimal;

use crate::{Company, Part, SupplierPart};

/// Company with every role flag off and USD currency.
pub fn company(pk: i64, name: &str) -> Company {
    Company {
        pk,
        name: name.to_string(),
        description: String::new(),
        website: String::new(),
        phone: String::new(),
        address: String::new(),
        email: String::new(),
        currency: "USD".to_string(),
        contact: String::new(),
        link: String::new(),
        image: None,
        is_customer: false,
        is_supplier: false,
        is_manufacturer: false,
        notes: String::new(),
    }
}

/// Active, purchaseable part with no IPN or revision.
pub fn part(pk: i64, name: &str) -> Part {
    Part {
        pk,
        name: name.to_string(),
        ipn: String::new(),
        revision: String::new(),
        description: String::new(),
        image: None,
        units: String::new(),
        active: true,
        assembly: false,
        purchaseable: true,
        salable: false,
        trackable: false,
        is_virtual: false,
    }
}

/// Supplier part with pack size 1 and nothing available.
pub fn supplier_part(pk: i64, part: i64, supplier: i64, sku: &str) -> SupplierPart {
    SupplierPart {
        pk,
        part,
        supplier,
        manufacturer_part: None,
        sku: sku.to_string(),
        description: String::new(),
        link: String::new(),
        note: String::new(),
        packaging: String::new(),
        pack_size: Decimal::ONE,
        available: Decimal::ZERO,
        availability_updated: None,
        barcode_hash: String::new(),
        updated: None,
    }
}
