//! Trackon courier API: pickup booking and AWB tracking.

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{api_log::ApiLogger, errors::ServiceError};

use super::{decode, http_client, Booking, ShipmentCarrier, ShipmentRequest, TrackingSnapshot, TrackingStatus};

const PROVIDER: &str = "trackon";

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BookingRequest {
    pub customer_code: String,
    pub ref_no: String,
    pub service_type: String,
    pub no_of_pieces: u32,
    pub actual_weight: String,
    pub invoice_value: String,
    pub content_description: String,
    pub shipper_name: String,
    pub shipper_address: String,
    pub shipper_pincode: String,
    pub shipper_mobile: String,
    pub consignee_name: String,
    pub consignee_address: String,
    pub consignee_city: String,
    pub consignee_state: String,
    pub consignee_pincode: String,
    pub consignee_mobile: String,
}

#[derive(Debug, Deserialize)]
pub struct BookingResponse {
    #[serde(rename = "AWBNo", default)]
    pub awb_no: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: String,
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrackResponse {
    #[serde(rename = "summaryTrack", default)]
    pub summary: Option<SummaryTrack>,
    #[serde(rename = "lstDetails", default)]
    pub details: Vec<TrackEvent>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryTrack {
    #[serde(rename = "AWBNO")]
    pub awb_no: String,
    #[serde(rename = "CURRENT_STATUS", default)]
    pub current_status: String,
    #[serde(rename = "CURRENT_CITY", default)]
    pub current_city: Option<String>,
    #[serde(rename = "EXPECTED_DATE", default)]
    pub expected_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrackEvent {
    #[serde(rename = "EVENTDESCRIPTION")]
    pub description: String,
    #[serde(rename = "CURRENT_CITY", default)]
    pub city: Option<String>,
    #[serde(rename = "EVENTDATE", default)]
    pub date: Option<String>,
}

pub fn booking_request(req: &ShipmentRequest, customer_code: &str) -> BookingRequest {
    BookingRequest {
        customer_code: customer_code.to_string(),
        ref_no: req.reference.clone(),
        service_type: "EXPRESS".into(),
        no_of_pieces: req.pieces.max(1),
        actual_weight: format!("{:.3}", f64::from(req.weight_grams) / 1000.0),
        invoice_value: format!("{:.2}", req.declared_value),
        content_description: req.description.clone(),
        shipper_name: req.pickup.name.clone(),
        shipper_address: req.pickup.address_lines.join(", "),
        shipper_pincode: req.pickup.pincode.clone(),
        shipper_mobile: req.pickup.phone.clone(),
        consignee_name: req.drop.name.clone(),
        consignee_address: req.drop.address_lines.join(", "),
        consignee_city: req.drop.city.clone(),
        consignee_state: req.drop.state.clone(),
        consignee_pincode: req.drop.pincode.clone(),
        consignee_mobile: req.drop.phone.clone(),
    }
}

pub fn booking_from(resp: BookingResponse) -> Result<Booking, ServiceError> {
    match resp.awb_no.filter(|a| !a.trim().is_empty()) {
        Some(awb) if resp.status.eq_ignore_ascii_case("success") => Ok(Booking { awb_number: awb.trim().to_string(), status: TrackingStatus::Booked }),
        _ => Err(ServiceError::external(
            PROVIDER,
            resp.message.unwrap_or_else(|| format!("booking failed with status '{}'", resp.status)),
        )),
    }
}

/// Trackon dates come as `dd/MM/yyyy`.
fn parse_date(s: &str) -> Option<chrono::DateTime<chrono::FixedOffset>> {
    let d = NaiveDate::parse_from_str(s.trim(), "%d/%m/%Y").ok()?;
    let ist = chrono::FixedOffset::east_opt(5 * 3600 + 30 * 60)?;
    ist.from_local_datetime(&d.and_hms_opt(0, 0, 0)?).single()
}

pub fn snapshot_from(resp: TrackResponse, awb: &str) -> Result<TrackingSnapshot, ServiceError> {
    let summary = resp
        .summary
        .ok_or_else(|| ServiceError::external(PROVIDER, format!("no tracking data for {awb}")))?;
    // newest event first
    let latest = resp.details.first();
    Ok(TrackingSnapshot {
        awb_number: summary.awb_no.clone(),
        status: TrackingStatus::from_carrier_text(&summary.current_status),
        last_event: latest.map(|e| match &e.date {
            Some(d) => format!("{} ({d})", e.description),
            None => e.description.clone(),
        }),
        last_location: summary.current_city.clone().or_else(|| latest.and_then(|e| e.city.clone())),
        expected_delivery: summary.expected_date.as_deref().and_then(parse_date),
    })
}

pub struct TrackonClient {
    client: reqwest::Client,
    base_url: String,
    app_key: String,
    customer_code: String,
    api_log: ApiLogger,
}

impl TrackonClient {
    pub fn new(cfg: &configs::CarrierConfig, api_log: ApiLogger) -> Result<Self, ServiceError> {
        Ok(Self {
            client: http_client(cfg.timeout_secs, PROVIDER)?,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            app_key: cfg.api_key.clone(),
            customer_code: cfg.customer_code.clone(),
            api_log,
        })
    }
}

#[async_trait]
impl ShipmentCarrier for TrackonClient {
    fn name(&self) -> &'static str { PROVIDER }

    #[instrument(skip(self, req), fields(reference = %req.reference))]
    async fn book(&self, req: &ShipmentRequest) -> Result<Booking, ServiceError> {
        let http = self
            .client
            .post(format!("{}/CrmApi/Crm/UploadPickupRequestWithoutDockNo", self.base_url))
            .header("AppKey", &self.app_key)
            .json(&booking_request(req, &self.customer_code))
            .build()
            .map_err(|e| ServiceError::external(PROVIDER, e))?;
        let body = self.api_log.execute(&self.client, PROVIDER, http).await?;
        let booking = booking_from(decode(PROVIDER, &body)?)?;
        info!(awb = %booking.awb_number, "trackon_booked");
        Ok(booking)
    }

    #[instrument(skip(self))]
    async fn track(&self, awb_number: &str) -> Result<TrackingSnapshot, ServiceError> {
        let http = self
            .client
            .get(format!("{}/CrmApi/Crm/ShipmentTracking", self.base_url))
            .header("AppKey", &self.app_key)
            .query(&[("AWBNo", awb_number)])
            .build()
            .map_err(|e| ServiceError::external(PROVIDER, e))?;
        let body = self.api_log.execute(&self.client, PROVIDER, http).await?;
        snapshot_from(decode(PROVIDER, &body)?, awb_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shipping::Contact;
    use rust_decimal::Decimal;

    #[test]
    fn booking_body_is_pascal_case() {
        let contact = |name: &str| Contact {
            name: name.into(),
            phone: "9840012345".into(),
            address_lines: vec!["Flat 4B".into(), "Lake View".into()],
            city: "Chennai".into(),
            state: "Tamil Nadu".into(),
            pincode: "600020".into(),
        };
        let req = ShipmentRequest {
            reference: "SPC-20240501-K2P9QZ".into(),
            pickup: contact("Malabar Spice Co."),
            drop: contact("Anu"),
            weight_grams: 1200,
            pieces: 2,
            declared_value: Decimal::new(510, 0),
            description: "Spices".into(),
        };
        let v = serde_json::to_value(booking_request(&req, "CUST9")).unwrap();
        assert_eq!(v["CustomerCode"], "CUST9");
        assert_eq!(v["RefNo"], "SPC-20240501-K2P9QZ");
        assert_eq!(v["ActualWeight"], "1.200");
        assert_eq!(v["NoOfPieces"], 2);
        assert_eq!(v["ConsigneeAddress"], "Flat 4B, Lake View");
    }

    #[test]
    fn booking_maps_awb() {
        let ok = r#"{"AWBNo":" 500123456 ","Status":"Success","Message":"Pickup registered"}"#;
        assert_eq!(booking_from(serde_json::from_str(ok).unwrap()).unwrap().awb_number, "500123456");
        let bad = r#"{"AWBNo":"","Status":"Failed","Message":"Pincode not serviceable"}"#;
        let err = booking_from(serde_json::from_str(bad).unwrap()).unwrap_err();
        assert!(err.to_string().contains("Pincode not serviceable"));
    }

    #[test]
    fn tracking_uses_summary_and_newest_event() {
        let json = r#"{
            "summaryTrack": {"AWBNO": "500123456", "CURRENT_STATUS": "OUT FOR DELIVERY", "CURRENT_CITY": "CHENNAI", "EXPECTED_DATE": "06/05/2024"},
            "lstDetails": [
                {"EVENTDESCRIPTION": "Out for delivery", "CURRENT_CITY": "CHENNAI", "EVENTDATE": "05/05/2024"},
                {"EVENTDESCRIPTION": "Booked", "CURRENT_CITY": "KOCHI", "EVENTDATE": "02/05/2024"}
            ]
        }"#;
        let snap = snapshot_from(serde_json::from_str(json).unwrap(), "500123456").unwrap();
        assert_eq!(snap.status, TrackingStatus::OutForDelivery);
        assert_eq!(snap.last_event.as_deref(), Some("Out for delivery (05/05/2024)"));
        assert_eq!(snap.last_location.as_deref(), Some("CHENNAI"));
        assert!(snap.expected_delivery.is_some());
    }
}
