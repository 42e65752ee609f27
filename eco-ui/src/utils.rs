use eco_core::calculations::common::round_half_up;
use eco_core::{ExpenseEntry, PlanSnapshot};
use rust_decimal::Decimal;

/// Currency marker used in legends and saved-plan labels.
pub const CURRENCY_SYMBOL: &str = "₱";

/// Formats a money value with exactly two decimals (`1234.5` → `"1234.50"`).
pub fn format_money(value: Decimal) -> String {
    format!("{:.2}", round_half_up(value))
}

/// Formats a money value with the currency marker (`"₱1234.50"`).
pub fn format_currency(value: Decimal) -> String {
    format!("{CURRENCY_SYMBOL}{}", format_money(value))
}

/// The label a saved plan is listed under: `"<name> — ₱<income>"`.
pub fn plan_label(plan: &PlanSnapshot) -> String {
    format!("{} — {}", plan.name, format_currency(plan.income))
}

/// Parses an expense given as `category:amount[:tag]`.
///
/// The category may itself contain colons; amount and tag are taken from
/// the right. Amount and tag are coerced like form input, so this never
/// fails.
pub fn parse_expense_spec(spec: &str) -> ExpenseEntry {
    let parts: Vec<&str> = spec.rsplitn(3, ':').collect();
    match parts.as_slice() {
        [tag, amount, category] => ExpenseEntry::from_input(category, amount, tag),
        [amount, category] => ExpenseEntry::from_input(category, amount, ""),
        _ => ExpenseEntry::from_input(spec, "", ""),
    }
}

/// Parses a plan id typed by the user. Ids are whole numbers.
pub fn parse_plan_id(s: &str) -> Option<i64> {
    let id = s.trim().parse().ok();
    if id.is_none() {
        tracing::warn!(input = %s, "invalid plan id");
    }
    id
}

#[cfg(test)]
mod tests {
    use eco_core::ExpenseTag;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn format_money_always_has_two_decimals() {
        assert_eq!(format_money(dec!(1000)), "1000.00");
        assert_eq!(format_money(dec!(12.5)), "12.50");
        assert_eq!(format_money(dec!(0.125)), "0.13");
        assert_eq!(format_money(dec!(-100)), "-100.00");
    }

    #[test]
    fn format_currency_prefixes_symbol() {
        assert_eq!(format_currency(dec!(200)), "₱200.00");
    }

    #[test]
    fn plan_label_shows_name_and_income() {
        let plan = PlanSnapshot {
            id: 1,
            name: "June".to_string(),
            income: dec!(1000),
            entries: vec![],
        };

        assert_eq!(plan_label(&plan), "June — ₱1000.00");
    }

    #[test]
    fn expense_spec_with_all_parts() {
        assert_eq!(
            parse_expense_spec("Bus Pass:45.50:sustainable"),
            ExpenseEntry::new("Bus Pass", dec!(45.50), ExpenseTag::Sustainable)
        );
    }

    #[test]
    fn expense_spec_without_tag_is_neutral() {
        assert_eq!(
            parse_expense_spec("Rent:400"),
            ExpenseEntry::new("Rent", dec!(400), ExpenseTag::Neutral)
        );
    }

    #[test]
    fn expense_spec_with_only_category_has_zero_amount() {
        assert_eq!(
            parse_expense_spec("Misc"),
            ExpenseEntry::new("Misc", Decimal::ZERO, ExpenseTag::Neutral)
        );
    }

    #[test]
    fn expense_spec_coerces_bad_values() {
        assert_eq!(
            parse_expense_spec("Gas:abc:diesel"),
            ExpenseEntry::new("Gas", Decimal::ZERO, ExpenseTag::Neutral)
        );
    }

    #[test]
    fn plan_id_parses_whole_numbers_only() {
        assert_eq!(parse_plan_id(" 1718000000000 "), Some(1_718_000_000_000));
        assert_eq!(parse_plan_id("12.5"), None);
        assert_eq!(parse_plan_id("plan"), None);
    }
}
