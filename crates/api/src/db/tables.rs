//! Compile-time–checked column identifiers for all tables.

use sea_query::Iden;

#[derive(Iden, Clone, Copy)]
pub enum Companies {
    Table,
    Id,
    Name,
    Description,
    Website,
    Phone,
    Address,
    Email,
    Currency,
    Contact,
    Link,
    Image,
    IsCustomer,
    IsSupplier,
    IsManufacturer,
    Notes,
}

#[derive(Iden, Clone, Copy)]
pub enum Parts {
    Table,
    Id,
    Name,
    Ipn,
    Revision,
    Description,
    Image,
    Units,
    Active,
    Assembly,
    Purchaseable,
    Salable,
    Trackable,
    IsVirtual,
}

#[derive(Iden, Clone, Copy)]
pub enum ManufacturerParts {
    Table,
    Id,
    PartId,
    ManufacturerId,
    Mpn,
    Description,
    Link,
}

#[derive(Iden, Clone, Copy)]
pub enum ManufacturerPartParameters {
    Table,
    Id,
    ManufacturerPartId,
    Name,
    Value,
    Units,
}

#[derive(Iden, Clone, Copy)]
pub enum SupplierParts {
    Table,
    Id,
    PartId,
    SupplierId,
    ManufacturerPartId,
    Sku,
    Description,
    Link,
    Note,
    Packaging,
    PackSize,
    Available,
    AvailabilityUpdated,
    BarcodeHash,
    Updated,
}

#[derive(Iden, Clone, Copy)]
pub enum SupplierPriceBreaks {
    Table,
    Id,
    SupplierPartId,
    Quantity,
    Price,
    PriceCurrency,
    Updated,
}

#[derive(Iden, Clone, Copy)]
pub enum StockItems {
    Table,
    Id,
    PartId,
    SupplierPartId,
    Quantity,
    IsBuilding,
    CustomerId,
}

#[derive(Iden, Clone, Copy)]
pub enum CompanyAttachments {
    Table,
    Id,
    CompanyId,
    Attachment,
    Link,
    Comment,
    UploadDate,
    UserId,
}

#[derive(Iden, Clone, Copy)]
pub enum ManufacturerPartAttachments {
    Table,
    Id,
    ManufacturerPartId,
    Attachment,
    Link,
    Comment,
    UploadDate,
    UserId,
}
