use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use common::types::Page;
use models::{
    now, order,
    order::OrderStatus,
    order_item, payment,
    payment::PaymentStatus,
    refund, shipment, transaction, user,
};

use crate::{
    cart_service::{self, LineRequest},
    errors::ServiceError,
    metrics,
    notify::Notifier,
    pagination::Pagination,
    user_service,
};

use super::payment::{verify_signature, GatewayOrder, PaymentGateway};
use super::pricing;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
    pub address_id: Uuid,
    /// Buy-now lines; the cart is used when absent.
    pub items: Option<Vec<LineRequest>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    pub order: order::Model,
    pub items: Vec<order_item::Model>,
    pub payment: GatewayOrder,
    pub key_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentInput {
    pub order_id: Uuid,
    pub provider_order_id: String,
    pub provider_payment_id: String,
    pub signature: String,
    pub method: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOutcome {
    pub verified: bool,
    pub order: order::Model,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundInput {
    pub amount: Decimal,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: order::Model,
    pub items: Vec<order_item::Model>,
    pub payments: Vec<payment::Model>,
    pub shipments: Vec<shipment::Model>,
}

#[derive(Clone)]
pub struct CheckoutService {
    db: Arc<DatabaseConnection>,
    checkout: configs::CheckoutConfig,
    payment_cfg: configs::PaymentConfig,
    invoice_prefix: String,
    store_name: String,
    gateway: Arc<dyn PaymentGateway>,
    notifier: Notifier,
}

/// Checked lifecycle move; an illegal move is `InvalidState`, not a bad request.
pub(crate) fn move_order(model: order::Model, next: OrderStatus) -> Result<order::ActiveModel, ServiceError> {
    let current = model.status()?;
    if !current.can_transition(next) {
        return Err(ServiceError::InvalidState(format!("order {} is {current}, cannot become {next}", model.order_number)));
    }
    Ok(order::transition(model, next)?)
}

impl CheckoutService {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>, cfg: &configs::AppConfig, gateway: Arc<dyn PaymentGateway>, notifier: Notifier) -> Self {
        Self {
            db: db.into(),
            checkout: cfg.checkout.clone(),
            payment_cfg: cfg.payment.clone(),
            invoice_prefix: cfg.invoice.number_prefix.clone(),
            store_name: cfg.company.name.clone(),
            gateway,
            notifier,
        }
    }

    /// Price the lines, register the amount with the gateway, then write the
    /// order, its items and the pending payment in one transaction.
    #[instrument(skip(self, input), fields(%user_id, address_id = %input.address_id))]
    pub async fn create_order(&self, user_id: Uuid, input: CreateOrderInput) -> Result<PlacedOrder, ServiceError> {
        let address = user_service::get_address(self.db.as_ref(), user_id, input.address_id).await?;

        let from_cart = input.items.is_none();
        let requests: Vec<(Option<Uuid>, LineRequest)> = match input.items {
            Some(items) => items.into_iter().map(|r| (None, r)).collect(),
            None => cart_service::list(self.db.as_ref(), user_id)
                .await?
                .lines
                .into_iter()
                .map(|l| (l.cart_id, LineRequest { product_price_id: l.product_price_id, quantity: l.quantity }))
                .collect(),
        };
        if requests.is_empty() {
            return Err(ServiceError::Validation("cart is empty".into()));
        }
        for (_, r) in &requests {
            models::validate::positive_qty("quantity", r.quantity)?;
        }
        let lines = cart_service::price_lines(self.db.as_ref(), &requests).await?;
        let totals = pricing::totals(&lines, &self.checkout);
        let number = pricing::order_number(chrono::Utc::now());
        let gateway_order = self.gateway.create_order(totals.grand_total, &self.checkout.currency_code, &number).await?;

        let txn = self.db.begin().await?;
        let created = order::new_order(number, user_id, address.id, &self.checkout.currency_code, totals, input.notes)
            .insert(&txn)
            .await?;
        let mut items = Vec::with_capacity(lines.len());
        for l in &lines {
            let item = order_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(created.id),
                product_id: Set(l.product_id),
                product_price_id: Set(l.product_price_id),
                product_name: Set(l.product_name.clone()),
                weight_label: Set(l.weight_label.clone()),
                hsn_code: Set(l.hsn_code.clone()),
                quantity: Set(l.quantity),
                unit_price: Set(l.unit_price),
                gst_rate: Set(l.gst_rate),
                line_total: Set(l.line_total),
            }
            .insert(&txn)
            .await?;
            items.push(item);
        }
        payment::new_pending(
            created.id,
            &gateway_order.provider,
            gateway_order.provider_order_id.clone(),
            totals.grand_total,
            &self.checkout.currency_code,
        )
        .insert(&txn)
        .await?;
        if from_cart {
            cart_service::clear(&txn, user_id).await?;
        }
        txn.commit().await?;

        metrics::ORDERS_CREATED_TOTAL.inc();
        info!(order_id = %created.id, order_number = %created.order_number, total = %created.grand_total, lines = items.len(), "order_created");
        Ok(PlacedOrder { order: created, items, payment: gateway_order, key_id: self.payment_cfg.key_id.clone() })
    }

    /// Check the gateway signature and settle the order either way.
    #[instrument(skip(self, input), fields(%user_id, order_id = %input.order_id))]
    pub async fn verify_payment(&self, user_id: Uuid, input: VerifyPaymentInput) -> Result<VerifyOutcome, ServiceError> {
        let current = self.owned_order(user_id, input.order_id).await?;
        let pay = payment::Entity::find()
            .filter(payment::Column::OrderId.eq(current.id))
            .filter(payment::Column::ProviderOrderId.eq(input.provider_order_id.clone()))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("payment"))?;

        if pay.status == PaymentStatus::Paid.as_str() {
            if pay.provider_payment_id.as_deref() == Some(input.provider_payment_id.as_str()) {
                return Ok(VerifyOutcome { verified: true, order: current });
            }
            return Err(ServiceError::InvalidState("order is already paid".into()));
        }

        let verified = verify_signature(&self.payment_cfg.key_secret, &input.provider_order_id, &input.provider_payment_id, &input.signature);
        let (next_order, next_payment, tx_status) = if verified {
            (OrderStatus::Paid, PaymentStatus::Paid, transaction::STATUS_SUCCESS)
        } else {
            (OrderStatus::Failed, PaymentStatus::Failed, transaction::STATUS_FAILED)
        };

        let txn = self.db.begin().await?;
        let amount = pay.amount;
        let payment_id = pay.id;
        let mut pam: payment::ActiveModel = pay.into();
        pam.status = Set(next_payment.as_str().to_string());
        pam.provider_payment_id = Set(Some(input.provider_payment_id.clone()));
        pam.method = Set(input.method.clone());
        pam.modified_date = Set(now());
        pam.update(&txn).await?;

        // a failed order may be retried and then paid, but a failure never overwrites a failure
        let settled = if current.status()? == next_order {
            current
        } else {
            let mut oam = move_order(current, next_order)?;
            if verified {
                if let sea_orm::ActiveValue::Unchanged(number) = &oam.order_number {
                    oam.invoice_number = Set(Some(pricing::invoice_number(&self.invoice_prefix, number)));
                }
                oam.invoice_date = Set(Some(now()));
            }
            oam.update(&txn).await?
        };
        transaction::record(
            payment_id,
            transaction::KIND_VERIFY,
            amount,
            tx_status,
            Some(input.provider_payment_id.clone()),
            Some(serde_json::json!({ "providerOrderId": input.provider_order_id, "method": input.method })),
        )
        .insert(&txn)
        .await?;
        txn.commit().await?;

        metrics::PAYMENTS_VERIFIED_TOTAL
            .with_label_values(&[if verified { "success" } else { "failed" }])
            .inc();
        if verified {
            info!(order_number = %settled.order_number, "payment_verified");
            self.notify_paid(&settled).await;
        } else {
            warn!(order_number = %settled.order_number, "payment_signature_mismatch");
        }
        Ok(VerifyOutcome { verified, order: settled })
    }

    async fn notify_paid(&self, o: &order::Model) {
        match user::Entity::find_by_id(o.user_id).one(self.db.as_ref()).await {
            Ok(Some(u)) => self.notifier.order_confirmed(o, &u.email, u.phone.as_deref(), &self.store_name).await,
            Ok(None) => warn!(order_number = %o.order_number, "order owner missing; no confirmation sent"),
            Err(e) => warn!(error = %e, "could not load order owner for confirmation"),
        }
    }

    async fn owned_order(&self, user_id: Uuid, id: Uuid) -> Result<order::Model, ServiceError> {
        order::Entity::find_by_id(id)
            .filter(order::Column::UserId.eq(user_id))
            .filter(order::Column::IsDeleted.eq(false))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("order"))
    }

    pub async fn list_orders(&self, user_id: Uuid, page: Pagination) -> Result<Page<order::Model>, ServiceError> {
        let select = order::Entity::find()
            .filter(order::Column::UserId.eq(user_id))
            .filter(order::Column::IsDeleted.eq(false))
            .order_by_desc(order::Column::CreatedDate);
        let (idx, per_page) = page.normalize();
        let paginator = select.paginate(self.db.as_ref(), per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(idx).await?;
        Ok(page.to_page(items, total))
    }

    pub async fn get_order(&self, user_id: Uuid, id: Uuid) -> Result<OrderDetail, ServiceError> {
        let o = self.owned_order(user_id, id).await?;
        detail(self.db.as_ref(), o).await
    }

    /// Admin view of a single order regardless of owner.
    pub async fn get_any_order(&self, id: Uuid) -> Result<OrderDetail, ServiceError> {
        let o = order::Entity::find_by_id(id)
            .filter(order::Column::IsDeleted.eq(false))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("order"))?;
        detail(self.db.as_ref(), o).await
    }

    pub async fn list_all(&self, page: Pagination, status: Option<OrderStatus>) -> Result<Page<order::Model>, ServiceError> {
        let mut select = order::Entity::find()
            .filter(order::Column::IsDeleted.eq(false))
            .order_by_desc(order::Column::CreatedDate);
        if let Some(st) = status {
            select = select.filter(order::Column::Status.eq(st.as_str()));
        }
        let (idx, per_page) = page.normalize();
        let paginator = select.paginate(self.db.as_ref(), per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(idx).await?;
        Ok(page.to_page(items, total))
    }

    #[instrument(skip(self), fields(%id, next = %next))]
    pub async fn update_status(&self, id: Uuid, next: OrderStatus) -> Result<order::Model, ServiceError> {
        let current = order::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("order"))?;
        let updated = move_order(current, next)?.update(self.db.as_ref()).await?;
        info!(order_number = %updated.order_number, status = %updated.status, "order_status_changed");
        Ok(updated)
    }

    /// Refund against the paid payment through the gateway, then record it.
    /// A full refund closes the order.
    #[instrument(skip(self, input), fields(%order_id, amount = %input.amount))]
    pub async fn refund(&self, order_id: Uuid, input: RefundInput) -> Result<refund::Model, ServiceError> {
        let o = order::Entity::find_by_id(order_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("order"))?;
        if !o.status()?.is_paid() {
            return Err(ServiceError::InvalidState(format!("order {} is {}, nothing to refund", o.order_number, o.status)));
        }
        let pay = payment::Entity::find()
            .filter(payment::Column::OrderId.eq(o.id))
            .filter(payment::Column::Status.eq(PaymentStatus::Paid.as_str()))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::InvalidState("order has no settled payment".into()))?;
        let already: Decimal = refund::Entity::find()
            .filter(refund::Column::PaymentId.eq(pay.id))
            .all(self.db.as_ref())
            .await?
            .iter()
            .map(|r| r.amount)
            .sum();
        let refundable = pay.amount - already;
        let full = models::validate::round_money(input.amount) == refundable;
        let mut am = refund::new_refund(pay.id, input.amount, refundable, input.reason)?;
        if full && !o.status()?.can_transition(OrderStatus::Refunded) {
            return Err(ServiceError::InvalidState(format!("order {} is {}; full refund not allowed", o.order_number, o.status)));
        }
        let provider_payment_id = pay
            .provider_payment_id
            .clone()
            .ok_or_else(|| ServiceError::InvalidState("payment has no provider payment id".into()))?;

        let provider_refund_id = self
            .gateway
            .refund(&provider_payment_id, models::validate::round_money(input.amount))
            .await
            .map_err(|e| {
                warn!(error = %e, %provider_payment_id, "gateway_refund_failed");
                e
            })?;
        am.provider_refund_id = Set(Some(provider_refund_id.clone()));

        let txn = self.db.begin().await?;
        let created = am.insert(&txn).await?;
        transaction::record(pay.id, transaction::KIND_REFUND, created.amount, transaction::STATUS_SUCCESS, Some(provider_refund_id), None)
            .insert(&txn)
            .await?;
        if full {
            let mut pam: payment::ActiveModel = pay.into();
            pam.status = Set(PaymentStatus::Refunded.as_str().to_string());
            pam.modified_date = Set(now());
            pam.update(&txn).await?;
            move_order(o, OrderStatus::Refunded)?.update(&txn).await?;
        }
        txn.commit().await?;
        info!(refund_id = %created.id, full, "refund_recorded");
        Ok(created)
    }
}

async fn detail<C: ConnectionTrait>(db: &C, o: order::Model) -> Result<OrderDetail, ServiceError> {
    let items = order_item::Entity::find().filter(order_item::Column::OrderId.eq(o.id)).all(db).await?;
    let payments = payment::Entity::find()
        .filter(payment::Column::OrderId.eq(o.id))
        .order_by_asc(payment::Column::CreatedDate)
        .all(db)
        .await?;
    let shipments = shipment::for_order(db, o.id).await?;
    Ok(OrderDetail { order: o, items, payments, shipments })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::checkout::payment::{sign, OfflineGateway};
    use async_trait::async_trait;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    /// Remembers refund calls and answers with sequential refund ids.
    #[derive(Default)]
    struct RecordingGateway {
        refunds: Mutex<Vec<(String, Decimal)>>,
    }

    #[async_trait]
    impl PaymentGateway for RecordingGateway {
        fn provider(&self) -> &str { "recording" }

        async fn create_order(&self, amount: Decimal, currency: &str, receipt: &str) -> Result<GatewayOrder, ServiceError> {
            OfflineGateway.create_order(amount, currency, receipt).await
        }

        async fn refund(&self, provider_payment_id: &str, amount: Decimal) -> Result<String, ServiceError> {
            let mut calls = self.refunds.lock().unwrap();
            calls.push((provider_payment_id.to_string(), amount));
            Ok(format!("rfnd_test_{}", calls.len()))
        }
    }

    struct DownGateway;

    #[async_trait]
    impl PaymentGateway for DownGateway {
        fn provider(&self) -> &str { "down" }

        async fn create_order(&self, _: Decimal, _: &str, _: &str) -> Result<GatewayOrder, ServiceError> {
            Err(ServiceError::external("down", "connection refused"))
        }

        async fn refund(&self, _: &str, _: Decimal) -> Result<String, ServiceError> {
            Err(ServiceError::external("down", "connection refused"))
        }
    }

    fn cfg() -> configs::AppConfig {
        let mut c = configs::AppConfig::default();
        c.payment.key_secret = "test-secret".into();
        c
    }

    fn service(db: impl Into<Arc<DatabaseConnection>>) -> CheckoutService {
        CheckoutService::new(db, &cfg(), Arc::new(OfflineGateway), Notifier::logging())
    }

    fn service_with(db: impl Into<Arc<DatabaseConnection>>, gateway: Arc<dyn PaymentGateway>) -> CheckoutService {
        CheckoutService::new(db, &cfg(), gateway, Notifier::logging())
    }

    fn tx_row(payment_id: Uuid, kind: &str, amount: Decimal) -> transaction::Model {
        transaction::Model {
            id: Uuid::new_v4(),
            payment_id,
            kind: kind.into(),
            amount,
            status: "success".into(),
            reference: None,
            payload: None,
            created_date: now(),
        }
    }

    fn refund_row(payment_id: Uuid, amount: Decimal, provider_refund_id: &str) -> refund::Model {
        let ts = now();
        refund::Model {
            id: Uuid::new_v4(),
            payment_id,
            amount,
            reason: None,
            status: "processed".into(),
            provider_refund_id: Some(provider_refund_id.into()),
            created_date: ts,
            modified_date: ts,
        }
    }

    fn paid_pair() -> (order::Model, payment::Model) {
        let o = order_row(Uuid::new_v4(), OrderStatus::Paid);
        let mut p = payment_row(o.id, PaymentStatus::Paid);
        p.provider_payment_id = Some("pay_1".into());
        (o, p)
    }

    fn take_log(db: Arc<DatabaseConnection>) -> String {
        let db = Arc::try_unwrap(db).ok().expect("service dropped");
        format!("{:?}", db.into_transaction_log())
    }

    fn order_row(user_id: Uuid, status: OrderStatus) -> order::Model {
        let ts = now();
        order::Model {
            id: Uuid::new_v4(),
            order_number: "SPC-20240501-K2P9QZ".into(),
            user_id,
            address_id: Uuid::new_v4(),
            currency_code: "INR".into(),
            subtotal: Decimal::new(450, 0),
            tax_total: Decimal::new(2143, 2),
            shipping_fee: Decimal::new(60, 0),
            discount_total: Decimal::ZERO,
            grand_total: Decimal::new(510, 0),
            status: status.as_str().into(),
            invoice_number: None,
            invoice_date: None,
            notes: None,
            is_deleted: false,
            created_date: ts,
            modified_date: ts,
        }
    }

    fn payment_row(order_id: Uuid, status: PaymentStatus) -> payment::Model {
        let ts = now();
        payment::Model {
            id: Uuid::new_v4(),
            order_id,
            provider: "offline".into(),
            provider_order_id: Some("order_abc".into()),
            provider_payment_id: None,
            amount: Decimal::new(510, 0),
            currency_code: "INR".into(),
            method: None,
            status: status.as_str().into(),
            created_date: ts,
            modified_date: ts,
        }
    }

    #[tokio::test]
    async fn update_status_rejects_backward_move() {
        let o = order_row(Uuid::new_v4(), OrderStatus::Shipped);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![o.clone()]])
            .into_connection();
        let err = service(db).update_status(o.id, OrderStatus::Packed).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn verify_good_signature_marks_paid_with_invoice_number() {
        let uid = Uuid::new_v4();
        let o = order_row(uid, OrderStatus::Created);
        let p = payment_row(o.id, PaymentStatus::Created);
        let mut paid_p = p.clone();
        paid_p.status = "paid".into();
        let mut paid_o = o.clone();
        paid_o.status = "paid".into();
        paid_o.invoice_number = Some("INV-20240501-K2P9QZ".into());
        paid_o.invoice_date = Some(now());
        let tx = tx_row(p.id, "verify", p.amount);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![o.clone()]])
                .append_query_results([vec![p.clone()]])
                .append_query_results([vec![paid_p]])
                .append_query_results([vec![paid_o]])
                .append_query_results([vec![tx]])
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let svc = service(Arc::clone(&db));
        let sig = sign("test-secret", "order_abc", "pay_1").unwrap();
        let out = svc
            .verify_payment(uid, VerifyPaymentInput {
                order_id: o.id,
                provider_order_id: "order_abc".into(),
                provider_payment_id: "pay_1".into(),
                signature: sig,
                method: Some("upi".into()),
            })
            .await
            .unwrap();
        assert!(out.verified);
        assert_eq!(out.order.status, "paid");
        assert_eq!(out.order.invoice_number.as_deref(), Some("INV-20240501-K2P9QZ"));
        assert!(out.order.invoice_date.is_some());
        drop(svc);
        let log = take_log(db);
        assert!(log.contains(r#"\"invoice_date\" = $"#), "{log}");
    }

    fn verify_input(order_id: Uuid, signature: String) -> VerifyPaymentInput {
        VerifyPaymentInput {
            order_id,
            provider_order_id: "order_abc".into(),
            provider_payment_id: "pay_1".into(),
            signature,
            method: None,
        }
    }

    #[tokio::test]
    async fn signature_mismatch_marks_order_failed() {
        let uid = Uuid::new_v4();
        let o = order_row(uid, OrderStatus::Created);
        let p = payment_row(o.id, PaymentStatus::Created);
        let mut failed_p = p.clone();
        failed_p.status = "failed".into();
        let mut failed_o = o.clone();
        failed_o.status = "failed".into();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![o.clone()]])
            .append_query_results([vec![p.clone()]])
            .append_query_results([vec![failed_p]])
            .append_query_results([vec![failed_o]])
            .append_query_results([vec![tx_row(p.id, "verify", p.amount)]])
            .into_connection();
        let forged = sign("some-other-secret", "order_abc", "pay_1").unwrap();
        let out = service(db).verify_payment(uid, verify_input(o.id, forged)).await.unwrap();
        assert!(!out.verified);
        assert_eq!(out.order.status, "failed");
        assert!(out.order.invoice_number.is_none());
    }

    #[tokio::test]
    async fn failed_order_can_be_paid_on_retry() {
        let uid = Uuid::new_v4();
        let o = order_row(uid, OrderStatus::Failed);
        let p = payment_row(o.id, PaymentStatus::Failed);
        let mut paid_p = p.clone();
        paid_p.status = "paid".into();
        let mut paid_o = o.clone();
        paid_o.status = "paid".into();
        paid_o.invoice_number = Some("INV-20240501-K2P9QZ".into());
        paid_o.invoice_date = Some(now());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![o.clone()]])
            .append_query_results([vec![p.clone()]])
            .append_query_results([vec![paid_p]])
            .append_query_results([vec![paid_o]])
            .append_query_results([vec![tx_row(p.id, "verify", p.amount)]])
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let sig = sign("test-secret", "order_abc", "pay_1").unwrap();
        let out = service(db).verify_payment(uid, verify_input(o.id, sig)).await.unwrap();
        assert!(out.verified);
        assert_eq!(out.order.status, "paid");
        assert!(out.order.invoice_number.is_some());
    }

    #[tokio::test]
    async fn blank_secret_rejects_forged_signature() {
        let uid = Uuid::new_v4();
        let o = order_row(uid, OrderStatus::Created);
        let p = payment_row(o.id, PaymentStatus::Created);
        let mut failed_p = p.clone();
        failed_p.status = "failed".into();
        let mut failed_o = o.clone();
        failed_o.status = "failed".into();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![o.clone()]])
            .append_query_results([vec![p.clone()]])
            .append_query_results([vec![failed_p]])
            .append_query_results([vec![failed_o]])
            .append_query_results([vec![tx_row(p.id, "verify", p.amount)]])
            .into_connection();
        let mut c = cfg();
        c.payment.key_secret = String::new();
        let svc = CheckoutService::new(db, &c, Arc::new(OfflineGateway), Notifier::logging());
        let forged = sign("", "order_abc", "pay_1").unwrap();
        let out = svc.verify_payment(uid, verify_input(o.id, forged)).await.unwrap();
        assert!(!out.verified);
    }

    #[tokio::test]
    async fn create_order_with_empty_cart_is_validation() {
        let uid = Uuid::new_v4();
        let ts = now();
        let addr = models::address::Model {
            id: Uuid::new_v4(),
            user_id: uid,
            full_name: "A".into(),
            phone: "9000000000".into(),
            line1: "1 Road".into(),
            line2: None,
            landmark: None,
            city: "Pune".into(),
            state_id: Uuid::new_v4(),
            country_id: Uuid::new_v4(),
            postal_code: "411001".into(),
            is_default: true,
            is_deleted: false,
            created_date: ts,
            modified_date: ts,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![addr.clone()]])
            .append_query_results([Vec::<models::cart::Model>::new()])
            .into_connection();
        let err = service(db)
            .create_order(uid, CreateOrderInput { address_id: addr.id, items: None, notes: None })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(m) if m.contains("empty")));
    }

    #[tokio::test]
    async fn partial_then_full_refund_closes_order() {
        let (o, p) = paid_pair();
        let first = refund_row(p.id, Decimal::new(200, 0), "rfnd_test_1");
        let second = refund_row(p.id, Decimal::new(310, 0), "rfnd_test_2");
        let mut refunded_p = p.clone();
        refunded_p.status = "refunded".into();
        let mut refunded_o = o.clone();
        refunded_o.status = "refunded".into();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // partial: 200 of 510
                .append_query_results([vec![o.clone()]])
                .append_query_results([vec![p.clone()]])
                .append_query_results([Vec::<refund::Model>::new()])
                .append_query_results([vec![first.clone()]])
                .append_query_results([vec![tx_row(p.id, "refund", first.amount)]])
                // remainder: 310
                .append_query_results([vec![o.clone()]])
                .append_query_results([vec![p.clone()]])
                .append_query_results([vec![first.clone()]])
                .append_query_results([vec![second.clone()]])
                .append_query_results([vec![tx_row(p.id, "refund", second.amount)]])
                .append_query_results([vec![refunded_p]])
                .append_query_results([vec![refunded_o]])
                .into_connection(),
        );
        let gateway = Arc::new(RecordingGateway::default());
        let svc = service_with(Arc::clone(&db), gateway.clone());

        let r1 = svc.refund(o.id, RefundInput { amount: Decimal::new(200, 0), reason: Some("damaged jar".into()) }).await.unwrap();
        assert_eq!(r1.amount, Decimal::new(200, 0));
        let r2 = svc.refund(o.id, RefundInput { amount: Decimal::new(310, 0), reason: None }).await.unwrap();
        assert_eq!(r2.provider_refund_id.as_deref(), Some("rfnd_test_2"));

        assert_eq!(
            *gateway.refunds.lock().unwrap(),
            vec![("pay_1".to_string(), Decimal::new(200, 0)), ("pay_1".to_string(), Decimal::new(310, 0))]
        );
        drop(svc);
        let log = take_log(db);
        assert!(log.contains("rfnd_test_1"), "{log}");
        assert!(log.contains("rfnd_test_2"), "{log}");
        assert_eq!(log.matches(r#"UPDATE \"order\""#).count(), 1, "{log}");
        assert!(log.contains("refunded"), "{log}");
    }

    #[tokio::test]
    async fn over_refund_is_validation_and_skips_gateway() {
        let (o, p) = paid_pair();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![o.clone()]])
            .append_query_results([vec![p.clone()]])
            .append_query_results([vec![refund_row(p.id, Decimal::new(200, 0), "rfnd_test_1")]])
            .into_connection();
        let gateway = Arc::new(RecordingGateway::default());
        let err = service_with(db, gateway.clone())
            .refund(o.id, RefundInput { amount: Decimal::new(311, 0), reason: None })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(m) if m.contains("exceeds")));
        assert!(gateway.refunds.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn gateway_refund_failure_is_external_and_records_nothing() {
        let (o, p) = paid_pair();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![o.clone()]])
                .append_query_results([vec![p.clone()]])
                .append_query_results([Vec::<refund::Model>::new()])
                .into_connection(),
        );
        let svc = service_with(Arc::clone(&db), Arc::new(DownGateway));
        let err = svc.refund(o.id, RefundInput { amount: Decimal::new(100, 0), reason: None }).await.unwrap_err();
        assert!(matches!(err, ServiceError::External(_)));
        drop(svc);
        let log = take_log(db);
        assert!(!log.contains("INSERT"), "{log}");
    }

    #[tokio::test]
    async fn admin_lookup_skips_deleted_orders() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<order::Model>::new()])
                .into_connection(),
        );
        let svc = service(Arc::clone(&db));
        let err = svc.get_any_order(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        drop(svc);
        let log = take_log(db);
        assert!(log.contains(r#"\"is_deleted\" = $"#), "{log}");
    }

    #[tokio::test]
    async fn refund_on_unpaid_order_is_invalid_state() {
        let o = order_row(Uuid::new_v4(), OrderStatus::Created);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![o.clone()]])
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 0 }])
            .into_connection();
        let err = service(db)
            .refund(o.id, RefundInput { amount: Decimal::new(10, 0), reason: None })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }
}
