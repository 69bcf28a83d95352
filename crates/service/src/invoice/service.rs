use std::sync::Arc;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::instrument;
use uuid::Uuid;

use models::{address, order, order_item, state_master, user};

use crate::{errors::ServiceError, metrics};

use super::{
    document::{self, InvoiceDocument, Party},
    pdf::PdfRenderer,
    qr, template,
};

#[derive(Clone)]
pub struct InvoiceService {
    db: Arc<DatabaseConnection>,
    seller: Party,
    pdf: Arc<dyn PdfRenderer>,
}

impl InvoiceService {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>, company: &configs::CompanyConfig, pdf: Arc<dyn PdfRenderer>) -> Self {
        Self { db: db.into(), seller: Party::seller(company), pdf }
    }

    /// Load everything the invoice needs. With `requester` set, orders of
    /// other users are reported as missing.
    #[instrument(skip(self))]
    pub async fn document_for(&self, order_id: Uuid, requester: Option<Uuid>) -> Result<InvoiceDocument, ServiceError> {
        let o = order::Entity::find_by_id(order_id)
            .one(self.db.as_ref())
            .await?
            .filter(|o| !o.is_deleted && requester.map_or(true, |u| o.user_id == u))
            .ok_or_else(|| ServiceError::not_found("order"))?;
        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(o.id))
            .order_by_asc(order_item::Column::ProductName)
            .all(self.db.as_ref())
            .await?;
        let addr = address::Entity::find_by_id(o.address_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("address"))?;
        let state = state_master::Entity::find_by_id(addr.state_id).one(self.db.as_ref()).await?;
        let email = user::Entity::find_by_id(o.user_id).one(self.db.as_ref()).await?.map(|u| u.email);
        let buyer = buyer_party(&addr, state.as_ref(), email);
        document::build(&o, &items, self.seller.clone(), buyer)
    }

    pub async fn render_html(&self, order_id: Uuid, requester: Option<Uuid>) -> Result<String, ServiceError> {
        let doc = self.document_for(order_id, requester).await?;
        let html = template::render_html(&doc, &qr::svg(&doc)?);
        metrics::INVOICES_RENDERED_TOTAL.with_label_values(&["html"]).inc();
        Ok(html)
    }

    /// PDF bytes plus the file name to offer for download.
    pub async fn render_pdf(&self, order_id: Uuid, requester: Option<Uuid>) -> Result<(String, Vec<u8>), ServiceError> {
        let doc = self.document_for(order_id, requester).await?;
        let html = template::render_html(&doc, &qr::svg(&doc)?);
        let bytes = self.pdf.render(&html).await?;
        metrics::INVOICES_RENDERED_TOTAL.with_label_values(&["pdf"]).inc();
        Ok((format!("{}.pdf", doc.invoice_number), bytes))
    }
}

fn buyer_party(addr: &address::Model, state: Option<&state_master::Model>, email: Option<String>) -> Party {
    let mut lines = vec![addr.line1.clone()];
    lines.extend(addr.line2.iter().filter(|l| !l.is_empty()).cloned());
    lines.extend(addr.landmark.iter().filter(|l| !l.is_empty()).cloned());
    lines.push(format!("{} - {}", addr.city, addr.postal_code));
    Party {
        name: addr.full_name.clone(),
        address_lines: lines,
        gstin: None,
        state_name: state.map(|s| s.name.clone()).unwrap_or_default(),
        state_code: state.and_then(|s| s.gst_code.clone()),
        email,
        phone: Some(addr.phone.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::document::fixtures;
    use async_trait::async_trait;
    use sea_orm::{DatabaseBackend, MockDatabase};

    struct FakePdf;

    #[async_trait]
    impl PdfRenderer for FakePdf {
        async fn render(&self, html: &str) -> Result<Vec<u8>, ServiceError> {
            Ok(format!("%PDF-{}", html.len()).into_bytes())
        }
    }

    fn address_row(user_id: Uuid, state_id: Uuid) -> address::Model {
        let ts = models::now();
        address::Model {
            id: Uuid::new_v4(),
            user_id,
            full_name: "Anu Varghese".into(),
            phone: "9840012345".into(),
            line1: "Flat 4B, Lake View".into(),
            line2: None,
            landmark: Some("Near Metro".into()),
            city: "Chennai".into(),
            state_id,
            country_id: Uuid::new_v4(),
            postal_code: "600020".into(),
            is_default: true,
            is_deleted: false,
            created_date: ts,
            modified_date: ts,
        }
    }

    fn state_row(id: Uuid, gst: &str) -> state_master::Model {
        let ts = models::now();
        state_master::Model {
            id,
            country_id: Uuid::new_v4(),
            code: "TN".into(),
            name: "Tamil Nadu".into(),
            gst_code: Some(gst.into()),
            is_active: true,
            created_date: ts,
            modified_date: ts,
        }
    }

    #[tokio::test]
    async fn other_users_order_is_not_found() {
        let (o, _) = fixtures::order();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![o.clone()]])
            .into_connection();
        let svc = InvoiceService::new(db, &fixtures::company(), Arc::new(FakePdf));
        let err = svc.document_for(o.id, Some(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn pdf_is_named_after_invoice_number() {
        let (o, items) = fixtures::order();
        let state_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![o.clone()]])
            .append_query_results([items])
            .append_query_results([vec![address_row(o.user_id, state_id)]])
            .append_query_results([vec![state_row(state_id, "33")]])
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let svc = InvoiceService::new(db, &fixtures::company(), Arc::new(FakePdf));
        let (name, bytes) = svc.render_pdf(o.id, Some(o.user_id)).await.unwrap();
        assert_eq!(name, "INV-20240501-K2P9QZ.pdf");
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn buyer_lines_skip_empty_parts() {
        let state_id = Uuid::new_v4();
        let p = buyer_party(&address_row(Uuid::new_v4(), state_id), Some(&state_row(state_id, "33")), None);
        assert_eq!(p.address_lines, vec!["Flat 4B, Lake View", "Near Metro", "Chennai - 600020"]);
        assert_eq!(p.state_code.as_deref(), Some("33"));
    }
}
