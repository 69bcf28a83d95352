//! Order arithmetic. Catalog prices include GST, so tax is backed out of
//! each line rather than added on top.

use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use rust_decimal::Decimal;

use models::{order::Totals, validate::round_money};

use crate::cart_service::PricedLine;

const HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// `(taxable, tax)` for a GST-inclusive amount at `rate` percent.
pub fn split_inclusive(total: Decimal, rate: Decimal) -> (Decimal, Decimal) {
    if rate.is_zero() {
        return (total, Decimal::ZERO);
    }
    let taxable = round_money(total * HUNDRED / (HUNDRED + rate));
    (taxable, total - taxable)
}

pub fn shipping_fee(subtotal: Decimal, flat_fee: Decimal, free_threshold: Decimal) -> Decimal {
    if subtotal.is_zero() || subtotal >= free_threshold {
        Decimal::ZERO
    } else {
        round_money(flat_fee)
    }
}

pub fn totals(lines: &[PricedLine], cfg: &configs::CheckoutConfig) -> Totals {
    let subtotal: Decimal = lines.iter().map(|l| l.line_total).sum();
    let tax_total: Decimal = lines.iter().map(|l| split_inclusive(l.line_total, l.gst_rate).1).sum();
    let shipping = shipping_fee(subtotal, cfg.shipping_fee, cfg.free_shipping_threshold);
    let discount = Decimal::ZERO;
    Totals {
        subtotal,
        tax_total,
        shipping_fee: shipping,
        discount_total: discount,
        grand_total: subtotal + shipping - discount,
    }
}

/// `SPC-YYYYMMDD-XXXXXX` with an upper-case alphanumeric suffix.
pub fn order_number(at: DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|b| (b as char).to_ascii_uppercase())
        .collect();
    format!("SPC-{}-{}", at.format("%Y%m%d"), suffix)
}

/// Invoice numbers reuse the order's date and suffix under the configured prefix.
pub fn invoice_number(prefix: &str, order_number: &str) -> String {
    let tail = order_number.strip_prefix("SPC-").unwrap_or(order_number);
    format!("{prefix}-{tail}")
}
