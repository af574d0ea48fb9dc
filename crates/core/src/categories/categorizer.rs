use super::CategoryRule;
use crate::transactions::Transaction;

/// Assigns `avery_category` from the first rule, in list order, whose match
/// text occurs in the transaction's display text. Rules are never reordered
/// by specificity. No match leaves the category untouched.
pub fn categorize(mut transaction: Transaction, rules: &[CategoryRule]) -> Transaction {
    let text = transaction
        .display_text()
        .unwrap_or_default()
        .to_lowercase();

    if let Some(rule) = rules.iter().find(|rule| rule.matches(&text)) {
        transaction.avery_category = Some(rule.category.clone());
    }
    transaction
}
