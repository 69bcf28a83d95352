use once_cell::sync::Lazy;
use prometheus::{register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter, IntCounterVec};

// Prometheus metrics (default registry)
pub static ORDERS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "spice_store_orders_created_total",
        "Orders placed through checkout"
    )
    .expect("register orders_created_total")
});

pub static PAYMENTS_VERIFIED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "spice_store_payments_verified_total",
        "Payment signature verifications by outcome",
        &["outcome"]
    )
    .expect("register payments_verified_total")
});

pub static INVOICES_RENDERED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "spice_store_invoices_rendered_total",
        "Invoices rendered by output format",
        &["format"]
    )
    .expect("register invoices_rendered_total")
});

pub static THIRD_PARTY_CALLS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "spice_store_third_party_calls_total",
        "Outbound provider calls by provider and outcome",
        &["provider", "outcome"]
    )
    .expect("register third_party_calls_total")
});

pub static PDF_RENDER_SECONDS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "spice_store_invoice_pdf_render_seconds",
        "Headless browser PDF render duration in seconds",
        vec![0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]
    )
    .expect("register invoice_pdf_render_seconds")
});

pub fn third_party_call(provider: &str, ok: bool) {
    THIRD_PARTY_CALLS_TOTAL
        .with_label_values(&[provider, if ok { "ok" } else { "error" }])
        .inc();
}
