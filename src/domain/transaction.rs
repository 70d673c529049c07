use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Amount;

pub type TransactionId = Uuid;

/// Direction of a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowType {
    /// Money received (sales, payments in)
    Inflow,
    /// Money spent (restock, bills)
    Outflow,
}

impl FlowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowType::Inflow => "inflow",
            FlowType::Outflow => "outflow",
        }
    }
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FlowType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inflow" | "in" => Ok(FlowType::Inflow),
            "outflow" | "out" => Ok(FlowType::Outflow),
            other => Err(format!("unknown transaction type '{}'", other)),
        }
    }
}

/// A single recorded cash movement.
/// Transactions are never edited; a wrong entry is deleted and re-entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub amount: Amount,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(rename = "type")]
    pub flow: FlowType,
    /// Creation time; its RFC 3339 form starts with the month key.
    pub date: DateTime<Utc>,
}

impl Transaction {
    pub fn new(amount: Amount, flow: FlowType, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            note: None,
            flow,
            date,
        }
    }

    /// Attach a note. Blank notes are dropped.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        let trimmed = note.trim();
        self.note = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    pub fn is_inflow(&self) -> bool {
        self.flow == FlowType::Inflow
    }

    /// Amount with the sign of its direction: positive for inflows, negative for outflows.
    pub fn signed_amount(&self) -> Decimal {
        match self.flow {
            FlowType::Inflow => self.amount.value(),
            FlowType::Outflow => -self.amount.value(),
        }
    }
}
