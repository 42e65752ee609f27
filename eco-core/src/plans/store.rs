use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{
    Clock, PLANS_STORAGE_KEY, SystemClock, decode_plans, encode_plans, newest_first, next_plan_id,
    without_plan,
};
use crate::models::{NewPlanSnapshot, PlanSnapshot};
use crate::storage::{KeyValueStorage, StorageError};

/// Save, list, load and delete named plan snapshots.
///
/// Unreadable stored data behaves as an empty collection and unknown ids are
/// no-ops. Errors from the storage backend itself are returned, never
/// swallowed, so a failed read cannot lead to the collection being
/// overwritten. Mutations hold an internal lock for their whole
/// read-modify-write cycle.
pub struct PlanStore {
    storage: Box<dyn KeyValueStorage>,
    clock: Box<dyn Clock>,
    write_lock: Mutex<()>,
}

impl PlanStore {
    pub fn new(storage: Box<dyn KeyValueStorage>) -> Self {
        Self::with_clock(storage, Box::new(SystemClock))
    }

    pub fn with_clock(
        storage: Box<dyn KeyValueStorage>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            storage,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    async fn read(&self) -> Result<Vec<PlanSnapshot>, StorageError> {
        let raw = self.storage.get_item(PLANS_STORAGE_KEY).await?;
        Ok(decode_plans(raw.as_deref()))
    }

    async fn write(
        &self,
        plans: &[PlanSnapshot],
    ) -> Result<(), StorageError> {
        let raw = encode_plans(plans)?;
        self.storage.set_item(PLANS_STORAGE_KEY, &raw).await
    }

    /// Every plan in the order it was saved.
    pub async fn all(&self) -> Result<Vec<PlanSnapshot>, StorageError> {
        self.read().await
    }

    /// Every plan, most recently saved first.
    pub async fn list(&self) -> Result<Vec<PlanSnapshot>, StorageError> {
        Ok(newest_first(&self.read().await?))
    }

    /// The plan with `id`, if one was saved.
    pub async fn get(
        &self,
        id: i64,
    ) -> Result<Option<PlanSnapshot>, StorageError> {
        let plans = self.read().await?;
        Ok(plans.into_iter().find(|p| p.id == id))
    }

    /// Appends a new snapshot and persists the whole collection.
    pub async fn save(
        &self,
        plan: NewPlanSnapshot,
    ) -> Result<PlanSnapshot, StorageError> {
        let _guard = self.write_lock.lock().await;

        let mut plans = self.read().await?;
        let id = next_plan_id(&plans, self.clock.now_millis());
        let snapshot = plan.into_snapshot(id);
        plans.push(snapshot.clone());
        self.write(&plans).await?;

        info!(id, name = %snapshot.name, rows = snapshot.entries.len(), "saved plan");
        Ok(snapshot)
    }

    /// Removes the plan with `id`. Returns `false`, writing nothing, when no
    /// such plan exists.
    pub async fn delete(
        &self,
        id: i64,
    ) -> Result<bool, StorageError> {
        let _guard = self.write_lock.lock().await;

        let plans = self.read().await?;
        let Some(remaining) = without_plan(&plans, id) else {
            debug!(id, "delete ignored, no plan with that id");
            return Ok(false);
        };
        self.write(&remaining).await?;

        info!(id, remaining = remaining.len(), "deleted plan");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI64, Ordering};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::aggregate;
    use crate::calculations::common::parse_money;
    use crate::models::{ExpenseEntry, ExpenseTag};
    use crate::storage::MemoryStorage;

    /// Clock that returns a fixed instant, advanced manually by tests.
    #[derive(Clone)]
    struct ManualClock(Arc<AtomicI64>);

    impl ManualClock {
        fn at(millis: i64) -> Self {
            Self(Arc::new(AtomicI64::new(millis)))
        }

        fn advance(
            &self,
            millis: i64,
        ) {
            self.0.fetch_add(millis, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now_millis(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    /// Storage whose reads always fail and whose writes are recorded.
    #[derive(Default)]
    struct BrokenStorage {
        writes: Arc<AtomicI64>,
    }

    #[async_trait]
    impl KeyValueStorage for BrokenStorage {
        async fn get_item(
            &self,
            _key: &str,
        ) -> Result<Option<String>, StorageError> {
            Err(StorageError::Backend("disk on fire".to_string()))
        }

        async fn set_item(
            &self,
            _key: &str,
            _value: &str,
        ) -> Result<(), StorageError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn remove_item(
            &self,
            _key: &str,
        ) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn store_with(
        storage: MemoryStorage,
        clock: ManualClock,
    ) -> PlanStore {
        PlanStore::with_clock(Box::new(storage), Box::new(clock))
    }

    fn groceries_plan() -> NewPlanSnapshot {
        NewPlanSnapshot::new(
            "June",
            dec!(1000),
            vec![
                ExpenseEntry::new("Groceries", dec!(200), ExpenseTag::Sustainable),
                ExpenseEntry::new("Gas", dec!(300), ExpenseTag::Unsustainable),
                ExpenseEntry::new("", dec!(12.34), ExpenseTag::Neutral),
            ],
        )
    }

    // =========================================================================
    // save / list
    // =========================================================================

    #[tokio::test]
    async fn save_assigns_clock_id_and_persists() {
        let storage = MemoryStorage::new();
        let store = store_with(storage.clone(), ManualClock::at(1_700_000_000_000));

        let saved = store.save(groceries_plan()).await.unwrap();

        assert_eq!(saved.id, 1_700_000_000_000);
        let raw = storage.get_item(PLANS_STORAGE_KEY).await.unwrap().unwrap();
        assert!(raw.starts_with(r#"[{"id":1700000000000,"name":"June","income":1000,"rows":["#));
    }

    #[tokio::test]
    async fn save_defaults_blank_name() {
        let store = store_with(MemoryStorage::new(), ManualClock::at(1));

        let saved = store
            .save(NewPlanSnapshot::new("", dec!(0), vec![]))
            .await
            .unwrap();

        assert_eq!(saved.name, "Plan");
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let clock = ManualClock::at(100);
        let store = store_with(MemoryStorage::new(), clock.clone());

        for name in ["first", "second", "third"] {
            store
                .save(NewPlanSnapshot::new(name, dec!(1), vec![]))
                .await
                .unwrap();
            clock.advance(10);
        }

        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn saves_within_same_millisecond_get_distinct_ids() {
        let store = store_with(MemoryStorage::new(), ManualClock::at(5));

        let a = store.save(groceries_plan()).await.unwrap();
        let b = store.save(groceries_plan()).await.unwrap();

        assert_eq!((a.id, b.id), (5, 6));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_saves_are_not_lost() {
        let store = Arc::new(store_with(MemoryStorage::new(), ManualClock::at(1)));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .save(NewPlanSnapshot::new(format!("plan {i}"), dec!(1), vec![]))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut ids: Vec<i64> = store.all().await.unwrap().iter().map(|p| p.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 16);
    }

    // =========================================================================
    // get (load)
    // =========================================================================

    #[tokio::test]
    async fn save_then_get_round_trips_plan_and_result() {
        let store = store_with(MemoryStorage::new(), ManualClock::at(42));
        let original = groceries_plan();
        let expected = aggregate(original.income, &original.entries);

        let saved = store.save(original.clone()).await.unwrap();
        let loaded = store.get(saved.id).await.unwrap().unwrap();

        assert_eq!(loaded.name, original.name);
        assert_eq!(loaded.income, original.income);
        assert_eq!(loaded.entries, original.entries);
        assert_eq!(aggregate(loaded.income, &loaded.entries), expected);
    }

    #[tokio::test]
    async fn high_precision_input_reloads_unchanged() {
        let store = store_with(MemoryStorage::new(), ManualClock::at(42));
        let original = NewPlanSnapshot::new(
            "Precise",
            parse_money("1000.000000000000000001"),
            vec![
                ExpenseEntry::from_input("Tea", "0.1234567890123456789", "sustainable"),
                ExpenseEntry::from_input("Bus", "33.333333333333333333", "neutral"),
            ],
        );
        let expected = aggregate(original.income, &original.entries);

        let saved = store.save(original.clone()).await.unwrap();
        let loaded = store.get(saved.id).await.unwrap().unwrap();

        assert_eq!(loaded.income, original.income);
        assert_eq!(loaded.entries, original.entries);
        assert_eq!(aggregate(loaded.income, &loaded.entries), expected);
    }

    #[tokio::test]
    async fn get_unknown_id_is_none() {
        let store = store_with(MemoryStorage::new(), ManualClock::at(1));
        store.save(groceries_plan()).await.unwrap();

        assert_eq!(store.get(999).await.unwrap(), None);
    }

    // =========================================================================
    // delete
    // =========================================================================

    #[tokio::test]
    async fn delete_removes_exactly_one_plan_keeping_order() {
        let clock = ManualClock::at(10);
        let store = store_with(MemoryStorage::new(), clock.clone());
        let mut ids = Vec::new();
        for name in ["a", "b", "c", "d"] {
            ids.push(store.save(NewPlanSnapshot::new(name, dec!(1), vec![])).await.unwrap().id);
            clock.advance(1);
        }

        let removed = store.delete(ids[1]).await.unwrap();

        assert!(removed);
        let names: Vec<String> = store.all().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["a", "c", "d"]);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_a_no_op() {
        let storage = MemoryStorage::new();
        let store = store_with(storage.clone(), ManualClock::at(1));
        store.save(groceries_plan()).await.unwrap();
        let before = storage.get_item(PLANS_STORAGE_KEY).await.unwrap();

        let removed = store.delete(12345).await.unwrap();

        assert!(!removed);
        assert_eq!(storage.get_item(PLANS_STORAGE_KEY).await.unwrap(), before);
    }

    // =========================================================================
    // degraded storage
    // =========================================================================

    #[tokio::test]
    async fn corrupt_data_reads_as_empty() {
        let storage = MemoryStorage::with_item(PLANS_STORAGE_KEY, "{broken");
        let store = store_with(storage, ManualClock::at(1));

        assert!(store.list().await.unwrap().is_empty());
        assert_eq!(store.get(1).await.unwrap(), None);
        assert!(!store.delete(1).await.unwrap());
    }

    #[tokio::test]
    async fn save_over_corrupt_data_starts_fresh() {
        let storage = MemoryStorage::with_item(PLANS_STORAGE_KEY, "42");
        let store = store_with(storage, ManualClock::at(7));

        store.save(groceries_plan()).await.unwrap();

        assert_eq!(store.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn backend_read_failure_is_returned_and_nothing_is_written() {
        let storage = BrokenStorage::default();
        let writes = Arc::clone(&storage.writes);
        let store = PlanStore::with_clock(Box::new(storage), Box::new(ManualClock::at(1)));

        let result = store.save(groceries_plan()).await;

        assert_eq!(
            result,
            Err(StorageError::Backend("disk on fire".to_string()))
        );
        assert_eq!(writes.load(Ordering::SeqCst), 0);
    }
}
