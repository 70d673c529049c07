use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{FlowType, MonthKey, Transaction};

/// Inflow/outflow totals over a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub total_inflow: Decimal,
    pub total_outflow: Decimal,
    /// total_inflow - total_outflow
    pub net_profit: Decimal,
}

/// Select the transactions dated in `month`, keeping their order.
pub fn filter_by_month(transactions: &[Transaction], month: MonthKey) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| month.contains(&t.date))
        .cloned()
        .collect()
}

/// Balance = sum of inflows - sum of outflows
pub fn compute_balance(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .fold(Decimal::ZERO, |balance, t| balance + t.signed_amount())
}

pub fn compute_totals(transactions: &[Transaction]) -> Totals {
    let mut totals = Totals::default();

    for t in transactions {
        match t.flow {
            FlowType::Inflow => totals.total_inflow += t.amount.value(),
            FlowType::Outflow => totals.total_outflow += t.amount.value(),
        }
    }

    totals.net_profit = totals.total_inflow - totals.total_outflow;
    totals
}

/// Drop every transaction whose id already appeared earlier in the list.
/// Returns how many were dropped.
pub fn dedupe_by_id(transactions: &mut Vec<Transaction>) -> usize {
    let before = transactions.len();
    let mut seen = HashSet::with_capacity(before);
    transactions.retain(|t| seen.insert(t.id));
    before - transactions.len()
}
