//! Carrier integrations. Each carrier maps its own REST DTOs onto the
//! booking and tracking types below.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::ServiceError;

pub mod dtdc;
pub mod service;
pub mod trackon;

pub use service::{CreateShipmentInput, ShipmentService};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub phone: String,
    pub address_lines: Vec<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl Contact {
    pub fn line(&self, i: usize) -> &str {
        self.address_lines.get(i).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone)]
pub struct ShipmentRequest {
    pub reference: String,
    pub pickup: Contact,
    pub drop: Contact,
    pub weight_grams: u32,
    pub pieces: u32,
    pub declared_value: Decimal,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    Booked,
    InTransit,
    OutForDelivery,
    Delivered,
    Returned,
    Exception,
}

impl TrackingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TrackingStatus::Booked => "booked",
            TrackingStatus::InTransit => "in_transit",
            TrackingStatus::OutForDelivery => "out_for_delivery",
            TrackingStatus::Delivered => "delivered",
            TrackingStatus::Returned => "returned",
            TrackingStatus::Exception => "exception",
        }
    }

    /// Classify a carrier's free-text status. Unknown wording counts as in transit.
    pub fn from_carrier_text(text: &str) -> Self {
        let t = text.to_ascii_lowercase();
        if t.contains("undeliver") || t.contains("fail") || t.contains("lost") || t.contains("damage") {
            TrackingStatus::Exception
        } else if t.contains("rto") || t.contains("return") {
            TrackingStatus::Returned
        } else if t.contains("out for delivery") {
            TrackingStatus::OutForDelivery
        } else if t.contains("deliver") {
            TrackingStatus::Delivered
        } else if t.contains("book") || t.contains("manifest") || t.contains("softdata") || t.contains("pickup") {
            TrackingStatus::Booked
        } else {
            TrackingStatus::InTransit
        }
    }
}

#[derive(Debug, Clone)]
pub struct Booking {
    pub awb_number: String,
    pub status: TrackingStatus,
}

#[derive(Debug, Clone)]
pub struct TrackingSnapshot {
    pub awb_number: String,
    pub status: TrackingStatus,
    pub last_event: Option<String>,
    pub last_location: Option<String>,
    pub expected_delivery: Option<DateTime<FixedOffset>>,
}

#[async_trait]
pub trait ShipmentCarrier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn book(&self, req: &ShipmentRequest) -> Result<Booking, ServiceError>;

    async fn track(&self, awb_number: &str) -> Result<TrackingSnapshot, ServiceError>;
}

/// Configured carriers keyed by their stored name.
#[derive(Clone, Default)]
pub struct Carriers {
    inner: HashMap<&'static str, Arc<dyn ShipmentCarrier>>,
}

impl Carriers {
    pub fn from_config(cfg: &configs::ShippingConfig, api_log: crate::api_log::ApiLogger) -> Result<Self, ServiceError> {
        let mut carriers = Self::default();
        if let Some(c) = &cfg.dtdc {
            carriers.insert(Arc::new(dtdc::DtdcClient::new(c, api_log.clone())?));
        }
        if let Some(c) = &cfg.trackon {
            carriers.insert(Arc::new(trackon::TrackonClient::new(c, api_log)?));
        }
        Ok(carriers)
    }

    pub fn insert(&mut self, carrier: Arc<dyn ShipmentCarrier>) {
        self.inner.insert(carrier.name(), carrier);
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn ShipmentCarrier>, ServiceError> {
        self.inner
            .get(name)
            .cloned()
            .ok_or_else(|| ServiceError::Validation(format!("carrier '{name}' is not configured")))
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut v: Vec<_> = self.inner.keys().copied().collect();
        v.sort_unstable();
        v
    }
}

pub(crate) fn http_client(timeout_secs: u64, provider: &str) -> Result<reqwest::Client, ServiceError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs.max(1)))
        .build()
        .map_err(|e| ServiceError::external(provider, e))
}

/// Parse the JSON body of a carrier response.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(provider: &str, body: &str) -> Result<T, ServiceError> {
    serde_json::from_str(body).map_err(|e| ServiceError::external(provider, format!("unexpected response: {e}")))
}
