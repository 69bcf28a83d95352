//! Storefront analytics events: anonymous or signed-in page and cart signals.

use sea_orm::{
    prelude::DateTimeWithTimeZone,
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use common::types::Page;
use models::analytics_event;

use crate::{errors::ServiceError, pagination::Pagination};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct TypeCount {
    pub event_type: String,
    pub count: i64,
}

pub async fn record(db: &DatabaseConnection, user_id: Option<Uuid>, input: analytics_event::NewEvent) -> Result<analytics_event::Model, ServiceError> {
    let saved = analytics_event::build(user_id, input)?.insert(db).await?;
    debug!(event_type = %saved.event_type, user_id = ?saved.user_id, "analytics_event");
    Ok(saved)
}

pub async fn list(db: &DatabaseConnection, page: Pagination, event_type: Option<&str>) -> Result<Page<analytics_event::Model>, ServiceError> {
    let mut select = analytics_event::Entity::find().order_by_desc(analytics_event::Column::CreatedDate);
    if let Some(t) = event_type {
        select = select.filter(analytics_event::Column::EventType.eq(t));
    }
    let (idx, per_page) = page.normalize();
    let paginator = select.paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(idx).await?;
    Ok(page.to_page(items, total))
}

/// Event totals per type, optionally only those at or after `since`.
pub async fn counts_by_type(db: &DatabaseConnection, since: Option<DateTimeWithTimeZone>) -> Result<Vec<TypeCount>, ServiceError> {
    let mut select = analytics_event::Entity::find()
        .select_only()
        .column(analytics_event::Column::EventType)
        .column_as(analytics_event::Column::Id.count(), "count")
        .group_by(analytics_event::Column::EventType)
        .order_by_asc(analytics_event::Column::EventType);
    if let Some(t) = since {
        select = select.filter(analytics_event::Column::CreatedDate.gte(t));
    }
    Ok(select.into_model::<TypeCount>().all(db).await?)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    use super::*;

    fn count_row(t: &str, n: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("event_type", Value::from(t.to_string())), ("count", Value::from(n))])
    }

    #[tokio::test]
    async fn counts_are_grouped_by_type() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count_row("add_to_cart", 4), count_row("page_view", 17)]])
            .into_connection();
        let out = counts_by_type(&db, None).await.unwrap();
        assert_eq!(out, vec![
            TypeCount { event_type: "add_to_cart".into(), count: 4 },
            TypeCount { event_type: "page_view".into(), count: 17 },
        ]);
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("GROUP BY"));
    }

    #[tokio::test]
    async fn blank_event_type_is_rejected_before_insert() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let input = analytics_event::NewEvent { session_id: None, event_type: "  ".into(), path: None, payload: None };
        let err = record(&db, None, input).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn live_record_then_count() {
        let Some(db) = crate::test_support::get_db().await else { return };
        let tag = format!("test_{}", Uuid::new_v4().simple());
        let input = analytics_event::NewEvent {
            session_id: Some("s-1".into()),
            event_type: tag.clone(),
            path: Some("/product/black-pepper".into()),
            payload: Some(serde_json::json!({ "qty": 2 })),
        };
        let saved = record(&db, None, input).await.unwrap();
        assert_eq!(saved.event_type, tag);
        let counts = counts_by_type(&db, None).await.unwrap();
        assert!(counts.iter().any(|c| c.event_type == tag && c.count == 1));
        let page = list(&db, Pagination::default(), Some(&tag)).await.unwrap();
        assert_eq!(page.total, 1);
    }
}
