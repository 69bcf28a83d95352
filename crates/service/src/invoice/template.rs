//! HTML rendering of an [`InvoiceDocument`]. The same markup feeds the
//! browser preview and the headless PDF print.

use std::fmt::Write;

use rust_decimal::Decimal;

use super::document::{InvoiceDocument, Party, TaxMode};

const STYLE: &str = r#"
* { box-sizing: border-box; }
body { font-family: "Helvetica Neue", Arial, sans-serif; font-size: 12px; color: #222; margin: 24px; }
h1 { font-size: 20px; margin: 0 0 4px; letter-spacing: 1px; }
.head { display: flex; justify-content: space-between; border-bottom: 2px solid #7a3b10; padding-bottom: 8px; }
.parties { display: flex; justify-content: space-between; margin: 16px 0; }
.party { width: 48%; }
.party h3 { font-size: 12px; text-transform: uppercase; color: #7a3b10; margin: 0 0 4px; }
table { width: 100%; border-collapse: collapse; }
th, td { border: 1px solid #ccc; padding: 4px 6px; }
th { background: #f6ede4; text-align: left; }
td.num, th.num { text-align: right; }
.totals { width: 45%; margin-left: auto; margin-top: 12px; }
.totals td { border: none; padding: 2px 6px; }
.grand td { border-top: 2px solid #222; font-weight: bold; }
.words { margin-top: 12px; font-style: italic; }
.foot { display: flex; justify-content: space-between; align-items: flex-end; margin-top: 24px; }
.qr svg { width: 110px; height: 110px; }
"#;

/// Escape text for HTML element and attribute content.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn money(v: Decimal) -> String {
    format!("{:.2}", v)
}

fn party(out: &mut String, title: &str, p: &Party) {
    let _ = write!(out, "<div class=\"party\"><h3>{}</h3><strong>{}</strong><br>", title, escape(&p.name));
    for l in &p.address_lines {
        let _ = write!(out, "{}<br>", escape(l));
    }
    let _ = write!(out, "State: {}", escape(&p.state_name));
    if let Some(code) = &p.state_code {
        let _ = write!(out, " ({})", escape(code));
    }
    out.push_str("<br>");
    if let Some(g) = &p.gstin {
        let _ = write!(out, "GSTIN: {}<br>", escape(g));
    }
    if let Some(ph) = &p.phone {
        let _ = write!(out, "Phone: {}<br>", escape(ph));
    }
    if let Some(e) = &p.email {
        let _ = write!(out, "Email: {}<br>", escape(e));
    }
    out.push_str("</div>");
}

/// Full HTML page. `qr_svg` is inserted verbatim and must come from
/// [`super::qr::svg`].
pub fn render_html(doc: &InvoiceDocument, qr_svg: &str) -> String {
    let intra = doc.tax_mode == TaxMode::IntraState;
    let mut out = String::with_capacity(8 * 1024);
    let _ = write!(
        out,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Invoice {num}</title><style>{STYLE}</style></head><body>",
        num = escape(&doc.invoice_number)
    );
    let _ = write!(
        out,
        "<div class=\"head\"><div><h1>TAX INVOICE</h1>{seller}</div><div>Invoice No: <strong>{inv}</strong><br>Order No: {ord}<br>Date: {date}</div></div>",
        seller = escape(&doc.seller.name),
        inv = escape(&doc.invoice_number),
        ord = escape(&doc.order_number),
        date = escape(&doc.invoice_date),
    );

    out.push_str("<div class=\"parties\">");
    party(&mut out, "Sold by", &doc.seller);
    party(&mut out, "Bill / Ship to", &doc.buyer);
    out.push_str("</div>");

    out.push_str("<table><thead><tr><th>#</th><th>Item</th><th>HSN</th><th class=\"num\">Qty</th><th class=\"num\">Rate</th><th class=\"num\">Taxable</th><th class=\"num\">GST %</th>");
    if intra {
        out.push_str("<th class=\"num\">CGST</th><th class=\"num\">SGST</th>");
    } else {
        out.push_str("<th class=\"num\">IGST</th>");
    }
    out.push_str("<th class=\"num\">Amount</th></tr></thead><tbody>");
    for l in &doc.lines {
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td>",
            l.index,
            escape(&l.description),
            escape(&l.hsn_code),
            l.quantity,
            money(l.unit_price),
            money(l.taxable_value),
            l.gst_rate.normalize(),
        );
        if intra {
            let _ = write!(out, "<td class=\"num\">{}</td><td class=\"num\">{}</td>", money(l.cgst), money(l.sgst));
        } else {
            let _ = write!(out, "<td class=\"num\">{}</td>", money(l.igst));
        }
        let _ = write!(out, "<td class=\"num\">{}</td></tr>", money(l.total));
    }
    out.push_str("</tbody></table>");

    let cur = escape(&doc.currency_code);
    out.push_str("<table class=\"totals\">");
    let _ = write!(out, "<tr><td>Taxable value</td><td class=\"num\">{}</td></tr>", money(doc.summary.taxable_value));
    if intra {
        let _ = write!(out, "<tr><td>CGST</td><td class=\"num\">{}</td></tr>", money(doc.summary.cgst));
        let _ = write!(out, "<tr><td>SGST</td><td class=\"num\">{}</td></tr>", money(doc.summary.sgst));
    } else {
        let _ = write!(out, "<tr><td>IGST</td><td class=\"num\">{}</td></tr>", money(doc.summary.igst));
    }
    let _ = write!(out, "<tr><td>Shipping</td><td class=\"num\">{}</td></tr>", money(doc.shipping_fee));
    if !doc.discount_total.is_zero() {
        let _ = write!(out, "<tr><td>Discount</td><td class=\"num\">-{}</td></tr>", money(doc.discount_total));
    }
    let _ = write!(out, "<tr class=\"grand\"><td>Total ({cur})</td><td class=\"num\">{}</td></tr></table>", money(doc.grand_total));
    let _ = write!(out, "<div class=\"words\">{}</div>", escape(&doc.amount_in_words));

    let _ = write!(
        out,
        "<div class=\"foot\"><div class=\"qr\">{qr_svg}</div><div>For {}<br><br><br>Authorised Signatory</div></div>",
        escape(&doc.seller.name)
    );
    out.push_str("<p>This is a computer generated invoice.</p></body></html>");
    out
}

#[cfg(test)]
mod tests {
    use super::super::document::{build, fixtures};
    use super::*;

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(escape(r#"<b>"Tom" & 'Jerry'</b>"#), "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn buyer_name_is_escaped() {
        let (o, items) = fixtures::order();
        let doc = build(&o, &items, Party::seller(&fixtures::company()), fixtures::buyer("32", "<script>x</script>")).unwrap();
        let html = render_html(&doc, "<svg></svg>");
        assert!(!html.contains("<script>x</script>"));
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(html.contains("<svg></svg>"));
    }

    #[test]
    fn columns_follow_tax_mode() {
        let (o, items) = fixtures::order();
        let intra = build(&o, &items, Party::seller(&fixtures::company()), fixtures::buyer("32", "Anu")).unwrap();
        let inter = build(&o, &items, Party::seller(&fixtures::company()), fixtures::buyer("29", "Anu")).unwrap();
        let a = render_html(&intra, "");
        let b = render_html(&inter, "");
        assert!(a.contains("CGST") && a.contains("SGST") && !a.contains("IGST"));
        assert!(b.contains("IGST") && !b.contains("CGST"));
        assert!(a.contains("391.00"));
        assert!(a.contains("INV-20240501-K2P9QZ"));
    }
}
