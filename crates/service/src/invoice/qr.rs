use qrcode::{render::svg, EcLevel, QrCode};

use crate::errors::ServiceError;

use super::document::InvoiceDocument;

/// Text carried by the invoice QR code.
pub fn payload(doc: &InvoiceDocument) -> String {
    format!(
        "{}|{}|{}|{:.2}",
        doc.invoice_number,
        doc.order_number,
        doc.seller.gstin.as_deref().unwrap_or(""),
        doc.grand_total
    )
}

/// Inline SVG without the XML prolog so it can sit inside an HTML body.
pub fn svg(doc: &InvoiceDocument) -> Result<String, ServiceError> {
    let code = QrCode::with_error_correction_level(payload(doc).as_bytes(), EcLevel::M)
        .map_err(|e| ServiceError::InvalidState(format!("qr encode: {e}")))?;
    let image = code
        .render::<svg::Color>()
        .min_dimensions(120, 120)
        .quiet_zone(false)
        .build();
    Ok(match image.find("<svg") {
        Some(at) => image[at..].to_string(),
        None => image,
    })
}

#[cfg(test)]
mod tests {
    use super::super::document::{build, fixtures, Party};
    use super::*;

    #[test]
    fn svg_is_inline_markup() {
        let (o, items) = fixtures::order();
        let doc = build(&o, &items, Party::seller(&fixtures::company()), fixtures::buyer("32", "Anu")).unwrap();
        assert_eq!(payload(&doc), "INV-20240501-K2P9QZ|SPC-20240501-K2P9QZ|32ABCDE1234F1Z5|391.00");
        let out = svg(&doc).unwrap();
        assert!(out.starts_with("<svg"));
        assert!(!out.contains("<?xml"));
    }
}
