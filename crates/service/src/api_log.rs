//! Records every outbound provider call in `third_party_api_log`.

use std::{sync::Arc, time::Instant};

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use tracing::{debug, warn};
use uuid::Uuid;

use common::types::Page;
use models::{now, third_party_api_log};

use crate::{errors::ServiceError, metrics, pagination::Pagination};

const MAX_BODY: usize = 8 * 1024;

#[derive(Debug, Clone, Default)]
pub struct CallRecord {
    pub provider: String,
    pub endpoint: String,
    pub method: String,
    pub request_body: Option<String>,
    pub response_body: Option<String>,
    pub status_code: Option<i32>,
    pub duration_ms: i64,
    pub error: Option<String>,
}

fn clip(body: Option<String>) -> Option<String> {
    body.map(|mut b| {
        if b.len() > MAX_BODY {
            let mut cut = MAX_BODY;
            while !b.is_char_boundary(cut) {
                cut -= 1;
            }
            b.truncate(cut);
        }
        b
    })
}

/// Persists call records when a database is attached; otherwise only logs.
#[derive(Clone, Default)]
pub struct ApiLogger {
    db: Option<Arc<DatabaseConnection>>,
}

impl ApiLogger {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self { Self { db: Some(db.into()) } }

    pub fn disabled() -> Self { Self { db: None } }

    /// Failing to write the log never fails the caller.
    pub async fn record(&self, rec: CallRecord) {
        let ok = rec.error.is_none() && rec.status_code.map_or(false, |s| (200..300).contains(&s));
        metrics::third_party_call(&rec.provider, ok);
        debug!(provider = %rec.provider, endpoint = %rec.endpoint, status = ?rec.status_code, ms = rec.duration_ms, ok, "third_party_call");
        let Some(db) = &self.db else { return };
        let am = third_party_api_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            provider: Set(rec.provider),
            endpoint: Set(rec.endpoint),
            method: Set(rec.method),
            request_body: Set(clip(rec.request_body)),
            response_body: Set(clip(rec.response_body)),
            status_code: Set(rec.status_code),
            duration_ms: Set(rec.duration_ms),
            error: Set(rec.error),
            created_date: Set(now()),
        };
        if let Err(e) = am.insert(db.as_ref()).await {
            warn!(error = %e, "failed to persist third party api log");
        }
    }

    /// Send `req`, record the exchange and return status plus body text.
    /// Non-2xx responses are returned as `External` errors after logging.
    pub async fn execute(
        &self,
        client: &reqwest::Client,
        provider: &str,
        req: reqwest::Request,
    ) -> Result<String, ServiceError> {
        let endpoint = req.url().as_str().split('?').next().unwrap_or_default().to_string();
        let method = req.method().to_string();
        let request_body = req
            .body()
            .and_then(|b| b.as_bytes())
            .map(|b| String::from_utf8_lossy(b).into_owned());
        let started = Instant::now();
        let result = client.execute(req).await;
        let mut rec = CallRecord { provider: provider.to_string(), endpoint, method, request_body, ..Default::default() };
        let outcome = match result {
            Ok(resp) => {
                let status = resp.status();
                rec.status_code = Some(status.as_u16() as i32);
                match resp.text().await {
                    Ok(body) => {
                        rec.response_body = Some(body.clone());
                        if status.is_success() {
                            Ok(body)
                        } else {
                            rec.error = Some(format!("http {status}"));
                            Err(ServiceError::external(provider, format!("http {status}: {body}")))
                        }
                    }
                    Err(e) => {
                        rec.error = Some(e.to_string());
                        Err(ServiceError::external(provider, e))
                    }
                }
            }
            Err(e) => {
                rec.error = Some(e.to_string());
                Err(ServiceError::external(provider, e))
            }
        };
        rec.duration_ms = started.elapsed().as_millis() as i64;
        self.record(rec).await;
        outcome
    }
}

pub async fn list(db: &DatabaseConnection, page: Pagination, provider: Option<&str>) -> Result<Page<third_party_api_log::Model>, ServiceError> {
    let mut select = third_party_api_log::Entity::find().order_by_desc(third_party_api_log::Column::CreatedDate);
    if let Some(p) = provider {
        select = select.filter(third_party_api_log::Column::Provider.eq(p));
    }
    let (idx, per_page) = page.normalize();
    let paginator = select.paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(idx).await?;
    Ok(page.to_page(items, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_respects_char_boundaries() {
        let long = "é".repeat(MAX_BODY);
        let clipped = clip(Some(long)).unwrap();
        assert!(clipped.len() <= MAX_BODY);
        assert!(clipped.chars().all(|c| c == 'é'));
        assert_eq!(clip(Some("short".into())).as_deref(), Some("short"));
    }

    #[tokio::test]
    async fn disabled_logger_is_silent() {
        ApiLogger::disabled()
            .record(CallRecord { provider: "dtdc".into(), endpoint: "https://x".into(), method: "POST".into(), ..Default::default() })
            .await;
    }
}
