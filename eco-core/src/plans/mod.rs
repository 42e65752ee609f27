//! Saved-plan persistence.
//!
//! All plans live in one JSON array stored under [`PLANS_STORAGE_KEY`]. The
//! free functions here are pure transformations of that collection; the
//! [`PlanStore`] pairs them with a [`KeyValueStorage`](crate::KeyValueStorage)
//! backend for the read-modify-write round trips.

mod clock;
mod store;

pub use clock::{Clock, SystemClock};
pub use store::PlanStore;

use tracing::warn;

use crate::models::PlanSnapshot;
use crate::storage::StorageError;

/// Storage key holding the serialized plan collection.
pub const PLANS_STORAGE_KEY: &str = "ecoPlans";

/// Decodes the stored collection.
///
/// Missing data, invalid JSON, and JSON of the wrong shape all decode to an
/// empty collection.
pub fn decode_plans(raw: Option<&str>) -> Vec<PlanSnapshot> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    if raw.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(error = %e, "stored plans are unreadable, starting from an empty list");
        Vec::new()
    })
}

/// Encodes the collection in stored (oldest-first) order.
pub fn encode_plans(plans: &[PlanSnapshot]) -> Result<String, StorageError> {
    serde_json::to_string(plans).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Plans with the most recently saved first.
pub fn newest_first(plans: &[PlanSnapshot]) -> Vec<PlanSnapshot> {
    plans.iter().rev().cloned().collect()
}

/// The collection without the plan `id`, other plans keeping their order.
/// Returns `None` when no plan has that id.
pub fn without_plan(
    plans: &[PlanSnapshot],
    id: i64,
) -> Option<Vec<PlanSnapshot>> {
    if !plans.iter().any(|p| p.id == id) {
        return None;
    }
    Some(plans.iter().filter(|p| p.id != id).cloned().collect())
}

/// Next id: the current time, bumped past every id already in use.
pub fn next_plan_id(
    plans: &[PlanSnapshot],
    now_millis: i64,
) -> i64 {
    match plans.iter().map(|p| p.id).max() {
        Some(last) if last >= now_millis => last.saturating_add(1),
        _ => now_millis,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{ExpenseEntry, ExpenseTag};

    fn plan(id: i64) -> PlanSnapshot {
        PlanSnapshot {
            id,
            name: format!("Plan {id}"),
            income: dec!(100),
            entries: vec![ExpenseEntry::new("Food", dec!(10), ExpenseTag::Neutral)],
        }
    }

    // =========================================================================
    // decode_plans
    // =========================================================================

    #[test]
    fn decode_missing_or_blank_is_empty() {
        assert!(decode_plans(None).is_empty());
        assert!(decode_plans(Some("")).is_empty());
    }

    #[test]
    fn decode_malformed_is_empty() {
        assert!(decode_plans(Some("not json")).is_empty());
        assert!(decode_plans(Some(r#"{"id":1}"#)).is_empty());
        assert!(decode_plans(Some(r#"[{"name":"no id"}]"#)).is_empty());
    }

    #[test]
    fn decode_reads_stored_layout() {
        let raw = r#"[{"id":1,"name":"A","income":500,"rows":[{"name":"Bus","amt":20.5,"tag":"sustainable"}]}]"#;

        let plans = decode_plans(Some(raw));

        assert_eq!(
            plans,
            vec![PlanSnapshot {
                id: 1,
                name: "A".to_string(),
                income: dec!(500),
                entries: vec![ExpenseEntry::new("Bus", dec!(20.5), ExpenseTag::Sustainable)],
            }]
        );
    }

    #[test]
    fn encode_then_decode_preserves_order() {
        let plans = vec![plan(1), plan(2), plan(3)];

        let raw = encode_plans(&plans).unwrap();

        assert_eq!(decode_plans(Some(&raw)), plans);
    }

    // =========================================================================
    // collection helpers
    // =========================================================================

    #[test]
    fn newest_first_reverses_stored_order() {
        let ids: Vec<i64> = newest_first(&[plan(1), plan(2), plan(3)])
            .iter()
            .map(|p| p.id)
            .collect();

        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn without_plan_removes_only_matching_id() {
        let remaining = without_plan(&[plan(1), plan(2), plan(3)], 2).unwrap();

        assert_eq!(remaining, vec![plan(1), plan(3)]);
    }

    #[test]
    fn without_plan_reports_missing_id() {
        assert_eq!(without_plan(&[plan(1)], 9), None);
    }

    #[test]
    fn next_plan_id_uses_clock_when_ahead() {
        assert_eq!(next_plan_id(&[plan(10)], 50), 50);
        assert_eq!(next_plan_id(&[], 50), 50);
    }

    #[test]
    fn next_plan_id_never_collides() {
        assert_eq!(next_plan_id(&[plan(50)], 50), 51);
        assert_eq!(next_plan_id(&[plan(70), plan(60)], 50), 71);
    }
}
