// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Income,
    Expense,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Income => "income",
            TxType::Expense => "expense",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TxType::Income),
            "expense" => Ok(TxType::Expense),
            other => Err(Error::InvalidInput(format!(
                "unknown transaction type '{}', expected income|expense",
                other
            ))),
        }
    }
}

/// A ledger entry. `amount` is always positive; `tx_type` carries the sign of the cash flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub category: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub amount: Decimal,
    pub tx_type: TxType,
    pub category: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub amount: Option<Decimal>,
    pub tx_type: Option<TxType>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDateTime>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.tx_type.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.date.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_savings: Decimal,
    pub transaction_count: i64,
}

/// Summed amount for one category label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    BalanceQuery,
    CategorySpending,
    TotalSpending,
    IncomeQuery,
    RecentTransactions,
    SavingsAdvice,
    BiggestExpense,
    Unknown,
}

impl Intent {
    pub const ALL: [Intent; 8] = [
        Intent::BalanceQuery,
        Intent::CategorySpending,
        Intent::TotalSpending,
        Intent::IncomeQuery,
        Intent::RecentTransactions,
        Intent::SavingsAdvice,
        Intent::BiggestExpense,
        Intent::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::BalanceQuery => "balance_query",
            Intent::CategorySpending => "category_spending",
            Intent::TotalSpending => "total_spending",
            Intent::IncomeQuery => "income_query",
            Intent::RecentTransactions => "recent_transactions",
            Intent::SavingsAdvice => "savings_advice",
            Intent::BiggestExpense => "biggest_expense",
            Intent::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Intent::ALL
            .iter()
            .copied()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown intent label '{}'", s)))
    }
}

/// One persisted question/answer exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub user_id: i64,
    pub user_message: String,
    pub bot_response: String,
    pub intent: Option<Intent>,
    pub created_at: DateTime<Utc>,
}

/// History record handed to the store; the store assigns `id`.
#[derive(Debug, Clone)]
pub struct NewChatMessage {
    pub user_id: i64,
    pub user_message: String,
    pub bot_response: String,
    pub intent: Option<Intent>,
    pub created_at: DateTime<Utc>,
}

/// What `QueryEngine::process` returns to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub user_message: String,
    pub bot_response: String,
    pub intent: Option<Intent>,
    pub timestamp: DateTime<Utc>,
}
