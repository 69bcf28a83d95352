//! sea-orm entities for the storefront, with the validation that guards
//! every insert and update.

pub mod errors;
pub mod db;
pub mod resource;
pub mod validate;

pub mod country_master;
pub mod state_master;
pub mod currency;
pub mod weight;
pub mod brand;
pub mod category;
pub mod product;
pub mod product_price;
pub mod sku;
pub mod inventory;

pub mod role;
pub mod user;
pub mod user_credentials;
pub mod address;

pub mod cart;
pub mod order;
pub mod order_item;
pub mod payment;
pub mod transaction;
pub mod refund;
pub mod shipment;
pub mod analytics_event;
pub mod third_party_api_log;

pub use resource::Resource;

use sea_orm::prelude::DateTimeWithTimeZone;

/// Timestamp used for `created_date` / `modified_date`.
pub fn now() -> DateTimeWithTimeZone {
    chrono::Utc::now().into()
}

pub(crate) fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests;
