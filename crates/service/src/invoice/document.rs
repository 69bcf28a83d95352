//! Tax invoice data, independent of how it is rendered.

use rust_decimal::Decimal;
use serde::Serialize;

use models::{order, order_item, validate::round_money};

use crate::checkout::pricing::split_inclusive;
use crate::errors::ServiceError;

use super::words::amount_in_words;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub name: String,
    pub address_lines: Vec<String>,
    pub gstin: Option<String>,
    pub state_name: String,
    /// Two-digit GST state code, when known.
    pub state_code: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Party {
    pub fn seller(c: &configs::CompanyConfig) -> Self {
        Self {
            name: c.name.clone(),
            address_lines: c.address_lines.clone(),
            gstin: Some(c.gstin.clone()).filter(|g| !g.is_empty()),
            state_name: c.state_name.clone(),
            state_code: Some(c.state_code.clone()),
            email: Some(c.email.clone()).filter(|e| !e.is_empty()),
            phone: Some(c.phone.clone()).filter(|p| !p.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TaxMode {
    /// CGST + SGST
    IntraState,
    /// IGST
    InterState,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub index: usize,
    pub description: String,
    pub hsn_code: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub gst_rate: Decimal,
    pub taxable_value: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxSummary {
    pub taxable_value: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
}

impl TaxSummary {
    pub fn total_tax(&self) -> Decimal {
        self.cgst + self.sgst + self.igst
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDocument {
    pub invoice_number: String,
    pub order_number: String,
    pub invoice_date: String,
    pub currency_code: String,
    pub seller: Party,
    pub buyer: Party,
    pub tax_mode: TaxMode,
    pub lines: Vec<InvoiceLine>,
    pub summary: TaxSummary,
    pub shipping_fee: Decimal,
    pub discount_total: Decimal,
    pub grand_total: Decimal,
    pub amount_in_words: String,
}

pub fn tax_mode(seller: &Party, buyer: &Party) -> TaxMode {
    match (&seller.state_code, &buyer.state_code) {
        (Some(s), Some(b)) if s == b => TaxMode::IntraState,
        _ => TaxMode::InterState,
    }
}

fn line(index: usize, item: &order_item::Model, mode: TaxMode) -> InvoiceLine {
    let (taxable, tax) = split_inclusive(item.line_total, item.gst_rate);
    let (cgst, sgst, igst) = match mode {
        TaxMode::IntraState => {
            let half = round_money(tax / Decimal::new(2, 0));
            (half, tax - half, Decimal::ZERO)
        }
        TaxMode::InterState => (Decimal::ZERO, Decimal::ZERO, tax),
    };
    let description = if item.weight_label.is_empty() {
        item.product_name.clone()
    } else {
        format!("{} ({})", item.product_name, item.weight_label)
    };
    InvoiceLine {
        index,
        description,
        hsn_code: item.hsn_code.clone().unwrap_or_default(),
        quantity: item.quantity,
        unit_price: item.unit_price,
        gst_rate: item.gst_rate,
        taxable_value: taxable,
        cgst,
        sgst,
        igst,
        total: item.line_total,
    }
}

/// Assemble the invoice for a paid order. Orders without an invoice number
/// have not been paid and have no invoice.
pub fn build(order: &order::Model, items: &[order_item::Model], seller: Party, buyer: Party) -> Result<InvoiceDocument, ServiceError> {
    let invoice_number = order
        .invoice_number
        .clone()
        .ok_or_else(|| ServiceError::InvalidState(format!("order {} has not been invoiced", order.order_number)))?;
    let mode = tax_mode(&seller, &buyer);
    let lines: Vec<InvoiceLine> = items.iter().enumerate().map(|(i, it)| line(i + 1, it, mode)).collect();
    let summary = lines.iter().fold(TaxSummary::default(), |mut acc, l| {
        acc.taxable_value += l.taxable_value;
        acc.cgst += l.cgst;
        acc.sgst += l.sgst;
        acc.igst += l.igst;
        acc
    });
    Ok(InvoiceDocument {
        invoice_number,
        order_number: order.order_number.clone(),
        invoice_date: order.invoice_date.unwrap_or(order.created_date).format("%d-%m-%Y").to_string(),
        currency_code: order.currency_code.clone(),
        seller,
        buyer,
        tax_mode: mode,
        lines,
        summary,
        shipping_fee: order.shipping_fee,
        discount_total: order.discount_total,
        grand_total: order.grand_total,
        amount_in_words: amount_in_words(order.grand_total),
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use uuid::Uuid;

    pub fn company() -> configs::CompanyConfig {
        configs::CompanyConfig {
            name: "Malabar Spice Co.".into(),
            address_lines: vec!["12 Jew Town Road".into(), "Mattancherry, Kochi 682002".into()],
            gstin: "32ABCDE1234F1Z5".into(),
            state_code: "32".into(),
            state_name: "Kerala".into(),
            city: "Kochi".into(),
            postal_code: "682002".into(),
            email: "orders@malabarspice.in".into(),
            phone: "+91 484 222 3344".into(),
        }
    }

    pub fn buyer(state_code: &str, name: &str) -> Party {
        Party {
            name: name.into(),
            address_lines: vec!["Flat 4B, Lake View".into(), "Chennai 600020".into()],
            gstin: None,
            state_name: "Tamil Nadu".into(),
            state_code: Some(state_code.into()),
            email: None,
            phone: Some("9840012345".into()),
        }
    }

    pub fn order() -> (order::Model, Vec<order_item::Model>) {
        let ts = models::now();
        let id = Uuid::new_v4();
        let o = order::Model {
            id,
            order_number: "SPC-20240501-K2P9QZ".into(),
            user_id: Uuid::new_v4(),
            address_id: Uuid::new_v4(),
            currency_code: "INR".into(),
            subtotal: Decimal::new(3310, 1),
            tax_total: Decimal::ZERO,
            shipping_fee: Decimal::new(60, 0),
            discount_total: Decimal::ZERO,
            grand_total: Decimal::new(3910, 1),
            status: "paid".into(),
            invoice_number: Some("INV-20240501-K2P9QZ".into()),
            invoice_date: Some(ts),
            notes: None,
            is_deleted: false,
            created_date: ts,
            modified_date: ts,
        };
        let item = |name: &str, qty: i32, unit: i64, rate: i64| order_item::Model {
            id: Uuid::new_v4(),
            order_id: id,
            product_id: Uuid::new_v4(),
            product_price_id: Uuid::new_v4(),
            product_name: name.into(),
            weight_label: "100 g".into(),
            hsn_code: Some("0904".into()),
            quantity: qty,
            unit_price: Decimal::new(unit, 1),
            gst_rate: Decimal::new(rate, 0),
            line_total: Decimal::new(unit * qty as i64, 1),
        };
        (o, vec![item("Black Pepper", 2, 1205, 5), item("Green Cardamom", 1, 900, 5)])
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn same_state_splits_cgst_sgst() {
        let (o, items) = order();
        let doc = build(&o, &items, Party::seller(&company()), buyer("32", "Anu")).unwrap();
        assert_eq!(doc.tax_mode, TaxMode::IntraState);
        assert!(doc.summary.igst.is_zero());
        assert!(!doc.summary.cgst.is_zero());
        for l in &doc.lines {
            assert_eq!(l.taxable_value + l.cgst + l.sgst, l.total);
        }
    }

    #[test]
    fn cgst_plus_sgst_equals_igst() {
        let (o, items) = order();
        let intra = build(&o, &items, Party::seller(&company()), buyer("32", "Anu")).unwrap();
        let inter = build(&o, &items, Party::seller(&company()), buyer("33", "Anu")).unwrap();
        assert_eq!(inter.tax_mode, TaxMode::InterState);
        assert_eq!(intra.summary.cgst + intra.summary.sgst, inter.summary.igst);
        assert_eq!(intra.summary.taxable_value, inter.summary.taxable_value);
        assert_eq!(intra.summary.total_tax(), inter.summary.total_tax());
    }

    #[test]
    fn uninvoiced_order_is_rejected() {
        let (mut o, items) = order();
        o.invoice_number = None;
        let err = build(&o, &items, Party::seller(&company()), buyer("32", "Anu")).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[test]
    fn dated_at_payment_not_last_update() {
        let (mut o, items) = order();
        let paid_at = chrono::DateTime::parse_from_rfc3339("2024-05-01T10:30:00+05:30").unwrap();
        o.invoice_date = Some(paid_at);
        o.modified_date = chrono::DateTime::parse_from_rfc3339("2024-06-12T09:00:00+05:30").unwrap();
        let doc = build(&o, &items, Party::seller(&company()), buyer("32", "Anu")).unwrap();
        assert_eq!(doc.invoice_date, "01-05-2024");
    }

    #[test]
    fn unknown_buyer_state_is_inter_state() {
        let mut b = buyer("32", "Anu");
        b.state_code = None;
        assert_eq!(tax_mode(&Party::seller(&company()), &b), TaxMode::InterState);
    }
}
