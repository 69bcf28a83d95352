//! DTDC customer integration API: softdata booking and consignment tracking.

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{api_log::ApiLogger, errors::ServiceError};

use super::{decode, http_client, Booking, ShipmentCarrier, ShipmentRequest, TrackingSnapshot, TrackingStatus};

const PROVIDER: &str = "dtdc";

#[derive(Debug, Serialize)]
pub struct SoftdataRequest {
    pub consignments: Vec<Consignment>,
}

#[derive(Debug, Serialize)]
pub struct Consignment {
    pub customer_code: String,
    pub service_type_id: String,
    pub load_type: String,
    pub description: String,
    pub dimension_unit: String,
    pub weight_unit: String,
    pub weight: String,
    pub declared_value: String,
    pub num_pieces: String,
    pub customer_reference_number: String,
    pub origin_details: Location,
    pub destination_details: Location,
}

#[derive(Debug, Serialize)]
pub struct Location {
    pub name: String,
    pub phone: String,
    pub address_line_1: String,
    pub address_line_2: String,
    pub pincode: String,
    pub city: String,
    pub state: String,
}

impl From<&super::Contact> for Location {
    fn from(c: &super::Contact) -> Self {
        Self {
            name: c.name.clone(),
            phone: c.phone.clone(),
            address_line_1: c.line(0).to_string(),
            address_line_2: c.address_lines.iter().skip(1).cloned().collect::<Vec<_>>().join(", "),
            pincode: c.pincode.clone(),
            city: c.city.clone(),
            state: c.state.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SoftdataResponse {
    pub status: String,
    #[serde(default)]
    pub data: Vec<SoftdataResult>,
}

#[derive(Debug, Deserialize)]
pub struct SoftdataResult {
    pub success: bool,
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TrackRequest<'a> {
    #[serde(rename = "trkType")]
    pub trk_type: &'a str,
    pub strcnno: &'a str,
    pub addtnl: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackResponse {
    #[serde(default)]
    pub status_code: Option<i32>,
    #[serde(default)]
    pub track_header: Option<TrackHeader>,
    #[serde(default)]
    pub track_details: Vec<TrackDetail>,
}

#[derive(Debug, Deserialize)]
pub struct TrackHeader {
    #[serde(rename = "strShipmentNo")]
    pub shipment_no: String,
    #[serde(rename = "strStatus", default)]
    pub status: String,
    #[serde(rename = "strExpectedDeliveryDate", default)]
    pub expected_delivery_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrackDetail {
    #[serde(rename = "strAction")]
    pub action: String,
    #[serde(rename = "strOrigin", default)]
    pub origin: Option<String>,
    #[serde(rename = "strActionDate", default)]
    pub action_date: Option<String>,
    #[serde(rename = "strActionTime", default)]
    pub action_time: Option<String>,
}

pub fn softdata(req: &ShipmentRequest, customer_code: &str) -> SoftdataRequest {
    SoftdataRequest {
        consignments: vec![Consignment {
            customer_code: customer_code.to_string(),
            service_type_id: "B2C PRIORITY".into(),
            load_type: "NON-DOCUMENT".into(),
            description: req.description.clone(),
            dimension_unit: "cm".into(),
            weight_unit: "kg".into(),
            weight: format!("{:.3}", f64::from(req.weight_grams) / 1000.0),
            declared_value: format!("{:.2}", req.declared_value),
            num_pieces: req.pieces.max(1).to_string(),
            customer_reference_number: req.reference.clone(),
            origin_details: (&req.pickup).into(),
            destination_details: (&req.drop).into(),
        }],
    }
}

pub fn booking_from(resp: SoftdataResponse) -> Result<Booking, ServiceError> {
    let first = resp
        .data
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::external(PROVIDER, format!("booking returned no consignment (status {})", resp.status)))?;
    match (first.success, first.reference_number) {
        (true, Some(awb)) if !awb.is_empty() => Ok(Booking { awb_number: awb, status: TrackingStatus::Booked }),
        _ => Err(ServiceError::external(
            PROVIDER,
            first.message.unwrap_or_else(|| "booking rejected".into()),
        )),
    }
}

/// DTDC dates come as `ddMMyyyy`.
fn parse_date(s: &str) -> Option<chrono::DateTime<chrono::FixedOffset>> {
    let d = NaiveDate::parse_from_str(s.trim(), "%d%m%Y").ok()?;
    let ist = chrono::FixedOffset::east_opt(5 * 3600 + 30 * 60)?;
    ist.from_local_datetime(&d.and_hms_opt(0, 0, 0)?).single()
}

pub fn snapshot_from(resp: TrackResponse, awb: &str) -> Result<TrackingSnapshot, ServiceError> {
    let header = resp
        .track_header
        .ok_or_else(|| ServiceError::external(PROVIDER, format!("no tracking data for {awb}")))?;
    // details are listed oldest first
    let last = resp.track_details.last();
    let status_text = if header.status.is_empty() {
        last.map(|d| d.action.as_str()).unwrap_or_default()
    } else {
        header.status.as_str()
    };
    Ok(TrackingSnapshot {
        awb_number: header.shipment_no.clone(),
        status: TrackingStatus::from_carrier_text(status_text),
        last_event: last.map(|d| {
            let when = [d.action_date.as_deref(), d.action_time.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
            if when.is_empty() { d.action.clone() } else { format!("{} ({when})", d.action) }
        }),
        last_location: last.and_then(|d| d.origin.clone()),
        expected_delivery: header.expected_delivery_date.as_deref().and_then(parse_date),
    })
}

pub struct DtdcClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    customer_code: String,
    api_log: ApiLogger,
}

impl DtdcClient {
    pub fn new(cfg: &configs::CarrierConfig, api_log: ApiLogger) -> Result<Self, ServiceError> {
        Ok(Self {
            client: http_client(cfg.timeout_secs, PROVIDER)?,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            customer_code: cfg.customer_code.clone(),
            api_log,
        })
    }
}

#[async_trait]
impl ShipmentCarrier for DtdcClient {
    fn name(&self) -> &'static str { PROVIDER }

    #[instrument(skip(self, req), fields(reference = %req.reference))]
    async fn book(&self, req: &ShipmentRequest) -> Result<Booking, ServiceError> {
        let http = self
            .client
            .post(format!("{}/api/customer/integration/consignment/softdata", self.base_url))
            .header("api-key", &self.api_key)
            .json(&softdata(req, &self.customer_code))
            .build()
            .map_err(|e| ServiceError::external(PROVIDER, e))?;
        let body = self.api_log.execute(&self.client, PROVIDER, http).await?;
        let booking = booking_from(decode(PROVIDER, &body)?)?;
        info!(awb = %booking.awb_number, "dtdc_booked");
        Ok(booking)
    }

    #[instrument(skip(self))]
    async fn track(&self, awb_number: &str) -> Result<TrackingSnapshot, ServiceError> {
        let http = self
            .client
            .post(format!("{}/dtdc-api/rest/JSONCnTrk/getTrackDetails", self.base_url))
            .header("X-Access-Token", &self.api_key)
            .json(&TrackRequest { trk_type: "cnno", strcnno: awb_number, addtnl: "Y" })
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

    fn request() -> ShipmentRequest {
        let contact = |name: &str, pin: &str| Contact {
            name: name.into(),
            phone: "9840012345".into(),
            address_lines: vec!["12 Jew Town Road".into(), "Mattancherry".into(), "Near Synagogue".into()],
            city: "Kochi".into(),
            state: "Kerala".into(),
            pincode: pin.into(),
        };
        ShipmentRequest {
            reference: "SPC-20240501-K2P9QZ".into(),
            pickup: contact("Malabar Spice Co.", "682002"),
            drop: contact("Anu Varghese", "600020"),
            weight_grams: 750,
            pieces: 0,
            declared_value: Decimal::new(3910, 1),
            description: "Spices".into(),
        }
    }

    #[test]
    fn softdata_body_uses_dtdc_field_names() {
        let body = serde_json::to_value(softdata(&request(), "GL017")).unwrap();
        let c = &body["consignments"][0];
        assert_eq!(c["customer_code"], "GL017");
        assert_eq!(c["weight"], "0.750");
        assert_eq!(c["declared_value"], "391.00");
        assert_eq!(c["num_pieces"], "1");
        assert_eq!(c["destination_details"]["address_line_2"], "Mattancherry, Near Synagogue");
        assert_eq!(c["destination_details"]["pincode"], "600020");
    }

    #[test]
    fn booking_maps_reference_number() {
        let json = r#"{"status":"OK","data":[{"success":true,"reference_number":"D70012345","customer_reference_number":"SPC-20240501-K2P9QZ"}]}"#;
        let b = booking_from(serde_json::from_str(json).unwrap()).unwrap();
        assert_eq!(b.awb_number, "D70012345");
        assert_eq!(b.status, TrackingStatus::Booked);
    }

    #[test]
    fn rejected_booking_carries_message() {
        let json = r#"{"status":"OK","data":[{"success":false,"message":"Invalid pincode"}]}"#;
        let err = booking_from(serde_json::from_str(json).unwrap()).unwrap_err();
        assert!(err.to_string().contains("Invalid pincode"));
    }

    #[test]
    fn tracking_maps_header_and_last_detail() {
        let json = r#"{
            "statusCode": 200,
            "trackHeader": {"strShipmentNo": "D70012345", "strStatus": "Delivered", "strExpectedDeliveryDate": "04052024"},
            "trackDetails": [
                {"strAction": "Booked", "strOrigin": "COCHIN", "strActionDate": "01052024", "strActionTime": "1015"},
                {"strAction": "Delivered", "strOrigin": "CHENNAI", "strActionDate": "03052024", "strActionTime": "1432"}
            ]
        }"#;
        let snap = snapshot_from(serde_json::from_str(json).unwrap(), "D70012345").unwrap();
        assert_eq!(snap.status, TrackingStatus::Delivered);
        assert_eq!(snap.last_location.as_deref(), Some("CHENNAI"));
        assert_eq!(snap.last_event.as_deref(), Some("Delivered (03052024 1432)"));
        assert_eq!(snap.expected_delivery.map(|d| d.format("%Y-%m-%d").to_string()).as_deref(), Some("2024-05-04"));
    }

    #[test]
    fn missing_header_is_error() {
        let json = r#"{"statusCode": 404, "trackDetails": []}"#;
        assert!(snapshot_from(serde_json::from_str(json).unwrap(), "X1").is_err());
    }
}
