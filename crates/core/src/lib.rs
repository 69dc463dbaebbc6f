//! Domain records for companies, manufacturer parts, supplier parts and
//! supplier price breaks, plus the rules that apply to them regardless of
//! storage or transport.

pub mod attachment;
pub mod company;
pub mod currency;
pub mod image;
pub mod part;
pub mod supplier;
pub mod validate;

pub use attachment::{Attachment, AttachmentOwner};
pub use company::{Company, CompanyRole};
pub use currency::CurrencyTable;
pub use image::{ImageFormat, RemoteImage};
pub use part::Part;
pub use supplier::{ManufacturerPart, ManufacturerPartParameter, SupplierPart, SupplierPriceBreak};
pub use validate::ValidationError;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
