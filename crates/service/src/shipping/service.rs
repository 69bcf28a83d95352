use std::sync::Arc;

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use models::{address, now, order, order::OrderStatus, order_item, shipment, state_master};

use crate::{checkout::service::move_order, errors::ServiceError};

use super::{Carriers, Contact, ShipmentRequest, TrackingSnapshot, TrackingStatus};

/// Per-unit parcel weight used when the caller gives none.
const DEFAULT_UNIT_GRAMS: u32 = 250;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShipmentInput {
    pub order_id: Uuid,
    pub carrier: String,
    #[serde(default)]
    pub weight_grams: Option<u32>,
    #[serde(default)]
    pub pieces: Option<u32>,
}

#[derive(Clone)]
pub struct ShipmentService {
    db: Arc<DatabaseConnection>,
    carriers: Carriers,
    pickup: Contact,
}

fn pickup_contact(c: &configs::CompanyConfig) -> Contact {
    Contact {
        name: c.name.clone(),
        phone: c.phone.clone(),
        address_lines: c.address_lines.clone(),
        city: c.city.clone(),
        state: c.state_name.clone(),
        pincode: c.postal_code.clone(),
    }
}

/// Order moves implied by a tracking update, in lifecycle order.
fn implied_moves(current: OrderStatus, tracking: TrackingStatus) -> Vec<OrderStatus> {
    use OrderStatus::*;
    match (current, tracking) {
        (Packed, TrackingStatus::InTransit | TrackingStatus::OutForDelivery) => vec![Shipped],
        (Packed, TrackingStatus::Delivered) => vec![Shipped, Delivered],
        (Shipped, TrackingStatus::Delivered) => vec![Delivered],
        _ => Vec::new(),
    }
}

impl ShipmentService {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>, carriers: Carriers, company: &configs::CompanyConfig) -> Self {
        Self { db: db.into(), carriers, pickup: pickup_contact(company) }
    }

    pub fn carriers(&self) -> Vec<&'static str> {
        self.carriers.names()
    }

    /// Book the parcel with the carrier and store the AWB. A `paid` order
    /// becomes `packed` once booked.
    #[instrument(skip(self, input), fields(order_id = %input.order_id, carrier = %input.carrier))]
    pub async fn create_for_order(&self, input: CreateShipmentInput) -> Result<shipment::Model, ServiceError> {
        let carrier = self.carriers.get(&input.carrier)?;
        let o = order::Entity::find_by_id(input.order_id)
            .one(self.db.as_ref())
            .await?
            .filter(|o| !o.is_deleted)
            .ok_or_else(|| ServiceError::not_found("order"))?;
        let status = o.status()?;
        if !matches!(status, OrderStatus::Paid | OrderStatus::Packed) {
            return Err(ServiceError::InvalidState(format!("order {} is {status}; only paid or packed orders ship", o.order_number)));
        }
        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(o.id))
            .all(self.db.as_ref())
            .await?;
        let addr = address::Entity::find_by_id(o.address_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("address"))?;
        let state = state_master::Entity::find_by_id(addr.state_id).one(self.db.as_ref()).await?;

        let units: u32 = items.iter().map(|i| i.quantity.max(0) as u32).sum();
        let mut drop_lines = vec![addr.line1.clone()];
        drop_lines.extend(addr.line2.iter().chain(addr.landmark.iter()).filter(|l| !l.is_empty()).cloned());
        let req = ShipmentRequest {
            reference: o.order_number.clone(),
            pickup: self.pickup.clone(),
            drop: Contact {
                name: addr.full_name.clone(),
                phone: addr.phone.clone(),
                address_lines: drop_lines,
                city: addr.city.clone(),
                state: state.map(|s| s.name).unwrap_or_default(),
                pincode: addr.postal_code.clone(),
            },
            weight_grams: input.weight_grams.unwrap_or(units.max(1) * DEFAULT_UNIT_GRAMS),
            pieces: input.pieces.unwrap_or(1),
            declared_value: o.grand_total,
            description: "Spices and condiments".into(),
        };

        let booking = carrier.book(&req).await?;
        let carrier_name = carrier.name();
        let saved = self
            .db
            .transaction::<_, shipment::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let row = shipment::booked(o.id, carrier_name, booking.awb_number, booking.status.as_str())
                        .insert(txn)
                        .await?;
                    if status == OrderStatus::Paid {
                        move_order(o, OrderStatus::Packed)?.update(txn).await?;
                    }
                    Ok(row)
                })
            })
            .await?;
        info!(shipment_id = %saved.id, awb = ?saved.awb_number, "shipment_booked");
        Ok(saved)
    }

    pub async fn list_for_order(&self, order_id: Uuid) -> Result<Vec<shipment::Model>, ServiceError> {
        Ok(shipment::for_order(self.db.as_ref(), order_id).await?)
    }

    /// Pull the carrier's latest tracking into the shipment row and advance
    /// the order when the parcel has moved on.
    #[instrument(skip(self))]
    pub async fn refresh(&self, id: Uuid) -> Result<shipment::Model, ServiceError> {
        let current = shipment::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("shipment"))?;
        let awb = current
            .awb_number
            .clone()
            .ok_or_else(|| ServiceError::InvalidState("shipment has no AWB number".into()))?;
        let snap = self.carriers.get(&current.carrier)?.track(&awb).await?;
        self.apply(current, snap).await
    }

    async fn apply(&self, current: shipment::Model, snap: TrackingSnapshot) -> Result<shipment::Model, ServiceError> {
        let order_id = current.order_id;
        let o = order::Entity::find_by_id(order_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::not_found("order"))?;
        let moves = implied_moves(o.status()?, snap.status);
        let updated = self
            .db
            .transaction::<_, shipment::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let mut am: shipment::ActiveModel = current.into();
                    am.status = Set(snap.status.as_str().to_string());
                    am.last_event = Set(snap.last_event);
                    am.last_location = Set(snap.last_location);
                    am.expected_delivery = Set(snap.expected_delivery);
                    am.modified_date = Set(now());
                    let row = am.update(txn).await?;
                    let mut o = o;
                    for next in moves {
                        o = move_order(o, next)?.update(txn).await?;
                    }
                    Ok(row)
                })
            })
            .await?;
        info!(shipment_id = %updated.id, status = %updated.status, "shipment_refreshed");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {

    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;
    use crate::shipping::{Booking, ShipmentCarrier};

    struct StubCarrier(TrackingStatus);

    #[async_trait]
    impl ShipmentCarrier for StubCarrier {
        fn name(&self) -> &'static str { "dtdc" }

        async fn book(&self, _req: &ShipmentRequest) -> Result<Booking, ServiceError> {
            Ok(Booking { awb_number: "D70012345".into(), status: TrackingStatus::Booked })
        }

        async fn track(&self, awb_number: &str) -> Result<TrackingSnapshot, ServiceError> {
            Ok(TrackingSnapshot {
                awb_number: awb_number.into(),
                status: self.0,
                last_event: Some("Delivered".into()),
                last_location: Some("CHENNAI".into()),
                expected_delivery: None,
            })
        }
    }

    fn service(db: impl Into<Arc<DatabaseConnection>>, tracking: TrackingStatus) -> ShipmentService {
        let mut carriers = Carriers::default();
        carriers.insert(Arc::new(StubCarrier(tracking)));
        ShipmentService::new(db, carriers, &configs::CompanyConfig::default())
    }

    fn order_row(status: OrderStatus) -> order::Model {
        let ts = now();
        order::Model {
            id: Uuid::new_v4(),
            order_number: "SPC-20240501-K2P9QZ".into(),
            user_id: Uuid::new_v4(),
            address_id: Uuid::new_v4(),
            currency_code: "INR".into(),
            subtotal: Decimal::new(450, 0),
            tax_total: Decimal::new(2143, 2),
            shipping_fee: Decimal::new(60, 0),
            discount_total: Decimal::ZERO,
            grand_total: Decimal::new(510, 0),
            status: status.as_str().into(),
            invoice_number: Some("INV-20240501-K2P9QZ".into()),
            invoice_date: Some(ts),
            notes: None,
            is_deleted: false,
            created_date: ts,
            modified_date: ts,
        }
    }

    fn shipment_row(order_id: Uuid, status: &str) -> shipment::Model {
        let ts = now();
        shipment::Model {
            id: Uuid::new_v4(),
            order_id,
            carrier: "dtdc".into(),
            awb_number: Some("D70012345".into()),
            status: status.into(),
            last_event: None,
            last_location: None,
            expected_delivery: None,
            created_date: ts,
            modified_date: ts,
        }
    }

    #[test]
    fn tracking_moves_follow_lifecycle() {
        assert_eq!(implied_moves(OrderStatus::Packed, TrackingStatus::Delivered), vec![OrderStatus::Shipped, OrderStatus::Delivered]);
        assert_eq!(implied_moves(OrderStatus::Shipped, TrackingStatus::Delivered), vec![OrderStatus::Delivered]);
        assert_eq!(implied_moves(OrderStatus::Packed, TrackingStatus::InTransit), vec![OrderStatus::Shipped]);
        assert!(implied_moves(OrderStatus::Shipped, TrackingStatus::InTransit).is_empty());
        assert!(implied_moves(OrderStatus::Delivered, TrackingStatus::Delivered).is_empty());
        assert!(implied_moves(OrderStatus::Cancelled, TrackingStatus::Delivered).is_empty());
    }

    #[tokio::test]
    async fn unpaid_order_cannot_ship() {
        let o = order_row(OrderStatus::Created);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![o.clone()]])
            .into_connection();
        let input = CreateShipmentInput { order_id: o.id, carrier: "dtdc".into(), weight_grams: None, pieces: None };
        let err = service(db, TrackingStatus::Booked).create_for_order(input).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn unconfigured_carrier_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let input = CreateShipmentInput { order_id: Uuid::new_v4(), carrier: "bluedart".into(), weight_grams: None, pieces: None };
        let err = service(db, TrackingStatus::Booked).create_for_order(input).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn delivered_tracking_delivers_shipped_order() {
        let o = order_row(OrderStatus::Shipped);
        let s = shipment_row(o.id, "in_transit");
        let mut s_after = s.clone();
        s_after.status = "delivered".into();
        let mut o_after = o.clone();
        o_after.status = "delivered".into();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![s.clone()]])
            .append_query_results([vec![o.clone()]])
            .append_query_results([vec![s_after]])
            .append_query_results([vec![o_after]])
            .into_connection();
        let db = Arc::new(db);
        let svc = service(Arc::clone(&db), TrackingStatus::Delivered);
        let out = svc.refresh(s.id).await.unwrap();
        assert_eq!(out.status, "delivered");
        drop(svc);
        let db = Arc::try_unwrap(db).ok().expect("service dropped");
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("UPDATE") && log.contains("delivered"));
    }
}
