//! End-to-end planner sessions against the shipped storage backends.

use eco_core::storage::StorageConfig;
use eco_core::{AdviceTier, ExpenseEntry, ExpenseTag};
use eco_ui::app::{PlannerApp, open_plan_store};
use eco_ui::render::CLEARED_ADVICE;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn sqlite_config(connection_string: &str) -> StorageConfig {
    StorageConfig::new("sqlite", connection_string)
}

async fn planner(config: &StorageConfig) -> PlannerApp {
    PlannerApp::new(open_plan_store(config).await.expect("store should open"))
}

fn fill_reference_plan(planner: &mut PlannerApp) {
    planner.set_name("Household");
    planner.set_income("1000");
    planner.add_expense(ExpenseEntry::new("Groceries", dec!(200), ExpenseTag::Sustainable));
    planner.add_expense(ExpenseEntry::new("Gas", dec!(300), ExpenseTag::Unsustainable));
    planner.add_expense(ExpenseEntry::new("Rent", dec!(400), ExpenseTag::Neutral));
}

#[tokio::test]
async fn test_reference_plan_through_the_session() {
    let mut planner = planner(&sqlite_config(":memory:")).await;
    fill_reference_plan(&mut planner);

    let result = planner.calculate().clone();

    assert_eq!(result.total_expenses, dec!(900));
    assert_eq!(result.balance, dec!(100));
    assert_eq!(result.eco_score, 54);
    assert_eq!(result.advice, AdviceTier::Fair);
    assert_eq!(planner.summary().score, "54 / 100");

    let sweep: f64 = planner.chart().slices().iter().map(|s| s.sweep).sum();
    assert!((sweep - 360.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_saved_plan_reloads_in_a_new_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("eco_plans.db");
    let config = sqlite_config(path.to_str().unwrap());

    let (id, expected) = {
        let mut first = planner(&config).await;
        fill_reference_plan(&mut first);
        let expected = first.calculate().clone();
        let saved = first.save_plan().await.unwrap();
        (saved.id, expected)
    };

    let mut second = planner(&config).await;
    let labels: Vec<String> = second
        .saved_plans()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.label)
        .collect();
    assert_eq!(labels, vec!["Household — ₱1000.00"]);

    assert!(second.load_plan(id).await.unwrap());
    assert_eq!(second.result(), Some(&expected));
    assert_eq!(second.form().name, "Household");
    assert_eq!(second.form().rows().len(), 3);
}

#[tokio::test]
async fn test_delete_and_clear() {
    let mut planner = planner(&StorageConfig::memory()).await;
    fill_reference_plan(&mut planner);
    planner.calculate();
    let first = planner.save_plan().await.unwrap();
    let second = planner.save_plan().await.unwrap();

    assert!(planner.delete_plan(first.id).await.unwrap());

    let ids: Vec<i64> = planner
        .saved_plans()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![second.id]);

    planner.clear_form();
    assert_eq!(planner.form().rows(), &[ExpenseEntry::blank()]);
    assert_eq!(planner.summary().advice, CLEARED_ADVICE);
}

#[tokio::test]
async fn test_unknown_backend_is_rejected() {
    let config = StorageConfig::new("postgres", "");

    assert!(open_plan_store(&config).await.is_err());
}
