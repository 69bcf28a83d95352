//! Checkout and order lifecycle.

pub mod payment;
pub mod pricing;
pub mod service;

pub use service::{CheckoutService, CreateOrderInput, OrderDetail, PlacedOrder, RefundInput, VerifyPaymentInput, VerifyOutcome};
