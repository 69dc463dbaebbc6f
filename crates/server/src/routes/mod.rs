pub mod attachments;
pub mod companies;
pub mod currencies;
pub mod health;
pub mod manufacturer_parts;
pub mod parameters;
pub mod price_breaks;
pub mod supplier_parts;

use crate::error::ApiErr;

pub type ApiResult<T> = Result<T, ApiErr>;
