use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;
use uuid::Uuid;

use models::{order, order_item};
use service::invoice::{
    document::{build, Party},
    qr, template,
    words::amount_in_words,
};

fn sample() -> (order::Model, Vec<order_item::Model>) {
    let ts = models::now();
    let id = Uuid::new_v4();
    let items: Vec<order_item::Model> = (0..12)
        .map(|i| order_item::Model {
            id: Uuid::new_v4(),
            order_id: id,
            product_id: Uuid::new_v4(),
            product_price_id: Uuid::new_v4(),
            product_name: format!("Spice blend #{i}"),
            weight_label: "200 g".into(),
            hsn_code: Some("0910".into()),
            quantity: 1 + i % 3,
            unit_price: Decimal::new(14950, 2),
            gst_rate: Decimal::new(5, 0),
            line_total: Decimal::new(14950 * (1 + i as i64 % 3), 2),
        })
        .collect();
    let subtotal: Decimal = items.iter().map(|l| l.line_total).sum();
    let o = order::Model {
        id,
        order_number: "SPC-20240501-BENCH1".into(),
        user_id: Uuid::new_v4(),
        address_id: Uuid::new_v4(),
        currency_code: "INR".into(),
        subtotal,
        tax_total: Decimal::ZERO,
        shipping_fee: Decimal::ZERO,
        discount_total: Decimal::ZERO,
        grand_total: subtotal,
        status: "paid".into(),
        invoice_number: Some("INV-20240501-BENCH1".into()),
        invoice_date: Some(ts),
        notes: None,
        is_deleted: false,
        created_date: ts,
        modified_date: ts,
    };
    (o, items)
}

fn buyer() -> Party {
    Party {
        name: "Bench Buyer".into(),
        address_lines: vec!["1 MG Road".into(), "Bengaluru 560001".into()],
        gstin: None,
        state_name: "Karnataka".into(),
        state_code: Some("29".into()),
        email: None,
        phone: None,
    }
}

fn bench_invoice(c: &mut Criterion) {
    let (o, items) = sample();
    let seller = Party::seller(&configs::CompanyConfig::default());

    c.bench_function("invoice_render_html", |b| {
        b.iter(|| {
            let doc = build(black_box(&o), black_box(&items), seller.clone(), buyer()).unwrap();
            let svg = qr::svg(&doc).unwrap();
            black_box(template::render_html(&doc, &svg));
        });
    });

    c.bench_function("amount_in_words", |b| {
        b.iter(|| black_box(amount_in_words(black_box(Decimal::new(123456789, 2)))));
    });
}

criterion_group!(benches, bench_invoice);
criterion_main!(benches);
