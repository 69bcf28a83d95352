//! GST tax invoices for paid orders: document assembly, HTML template,
//! QR code and PDF printing.

pub mod document;
pub mod pdf;
pub mod qr;
pub mod service;
pub mod template;
pub mod words;

pub use document::{InvoiceDocument, TaxMode};
pub use pdf::{ChromiumPdf, PdfRenderer};
pub use service::InvoiceService;
