// src/models/event.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::lead::Utm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "event_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Click,
    LeadCreate,
    LeadUpdate,
}

// Evento a ser gravado
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub user_id: Uuid,
    pub indication_id: Option<Uuid>,
    pub lead_id: Option<Uuid>,
    pub event_type: EventType,
    pub utm: Utm,
}

// Filtro do GET /api/events/stats
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStatsQuery {
    pub indication_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventTypeCount {
    pub event_type: EventType,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UtmSourceCount {
    // None = tráfego direto
    pub utm_source: Option<String>,
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    pub clicks: i64,
    pub leads_created: i64,
    pub leads_updated: i64,
    // leads_created / clicks, em %
    pub conversion_rate: f64,
    pub by_source: Vec<UtmSourceCount>,
}

impl EventStats {
    pub fn from_counts(counts: &[EventTypeCount], by_source: Vec<UtmSourceCount>) -> Self {
        let count_of = |wanted: EventType| {
            counts
                .iter()
                .filter(|c| c.event_type == wanted)
                .map(|c| c.total)
                .sum::<i64>()
        };

        let clicks = count_of(EventType::Click);
        let leads_created = count_of(EventType::LeadCreate);
        let conversion_rate = if clicks > 0 {
            (leads_created as f64 / clicks as f64 * 1000.0).round() / 10.0
        } else {
            0.0
        };

        Self {
            clicks,
            leads_created,
            leads_updated: count_of(EventType::LeadUpdate),
            conversion_rate,
            by_source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_compute_conversion_rate() {
        let counts = vec![
            EventTypeCount { event_type: EventType::Click, total: 40 },
            EventTypeCount { event_type: EventType::LeadCreate, total: 6 },
            EventTypeCount { event_type: EventType::LeadUpdate, total: 2 },
        ];
        let stats = EventStats::from_counts(&counts, vec![]);
        assert_eq!(stats.clicks, 40);
        assert_eq!(stats.leads_created, 6);
        assert_eq!(stats.leads_updated, 2);
        assert_eq!(stats.conversion_rate, 15.0);
    }

    #[test]
    fn no_clicks_means_zero_rate() {
        let counts = vec![EventTypeCount { event_type: EventType::LeadCreate, total: 3 }];
        assert_eq!(EventStats::from_counts(&counts, vec![]).conversion_rate, 0.0);
    }
}
