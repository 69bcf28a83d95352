//! Business layer of the spice store.
//! - Generic CRUD over catalog and master data through [`repository::Repository`].
//! - Auth, cart, checkout, payments and refunds.
//! - GST invoices, notifications and carrier shipping, with every outbound
//!   provider call recorded by [`api_log::ApiLogger`].

pub mod analytics_service;
pub mod api_log;
pub mod auth;
pub mod cart_service;
pub mod checkout;
pub mod config_service;
pub mod errors;
pub mod invoice;
pub mod metrics;
pub mod notify;
pub mod pagination;
pub mod repository;
pub mod shipping;
pub mod user_service;
#[cfg(test)]
pub mod test_support;
