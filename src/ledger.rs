// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transaction ledger: read-only aggregate queries used by the chat engine,
//! plus the CRUD surface used by the `tx` commands.

use std::collections::HashMap;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params};
use rust_decimal::Decimal;
use tracing::debug;

use crate::db::decimal_at;
use crate::error::{Error, Result};
use crate::models::{
    CategoryTotal, NewTransaction, Transaction, TransactionPatch, TransactionSummary, TxType,
};

/// Aggregate reads over one user's ledger.
///
/// `category` filters are case-insensitive substring matches on the stored label.
pub trait LedgerAccessor {
    fn sum(&self, user_id: i64, tx_type: TxType, category: Option<&str>) -> Result<Decimal>;

    fn count(&self, user_id: i64, tx_type: TxType, category: Option<&str>) -> Result<i64>;

    /// Per-category totals, largest first.
    fn group_sum_by_category(&self, user_id: i64, tx_type: TxType) -> Result<Vec<CategoryTotal>>;

    /// The `n` largest transactions of a type by amount.
    fn top_n(&self, user_id: i64, tx_type: TxType, n: usize) -> Result<Vec<Transaction>>;

    /// The `n` latest transactions of any type by event date.
    fn most_recent(&self, user_id: i64, n: usize) -> Result<Vec<Transaction>>;

    fn max(&self, user_id: i64, tx_type: TxType) -> Result<Option<Transaction>> {
        Ok(self.top_n(user_id, tx_type, 1)?.into_iter().next())
    }
}

/// Orders totals descending, breaking ties on the category label.
pub fn sort_category_totals(totals: &mut [CategoryTotal]) {
    totals.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
}

#[derive(Debug, Clone)]
pub struct TransactionFilter {
    pub tx_type: Option<TxType>,
    /// Exact category label.
    pub category: Option<String>,
    pub skip: usize,
    pub limit: usize,
}

impl Default for TransactionFilter {
    fn default() -> Self {
        Self {
            tx_type: None,
            category: None,
            skip: 0,
            limit: 100,
        }
    }
}

const TX_COLUMNS: &str =
    "id, user_id, amount, type, category, description, date, created_at, updated_at";

// Empty category filter means "no filter".
const CATEGORY_CLAUSE: &str = "(?3 IS NULL OR instr(lower(category), lower(?3)) > 0)";

fn row_to_transaction(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: r.get(0)?,
        user_id: r.get(1)?,
        amount: decimal_at(r, 2)?,
        tx_type: r.get(3)?,
        category: r.get(4)?,
        description: r.get(5)?,
        date: r.get(6)?,
        created_at: r.get(7)?,
        updated_at: r.get(8)?,
    })
}

/// Largest single amount accepted on insert/update (one trillion).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);
pub const MAX_CATEGORY_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;

fn validate(amount: Decimal, category: &str, description: Option<&str>) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidInput(format!(
            "amount must be greater than 0, got {}",
            amount
        )));
    }
    if amount > MAX_AMOUNT {
        return Err(Error::InvalidInput(format!(
            "amount must not exceed {}, got {}",
            MAX_AMOUNT, amount
        )));
    }
    let category = category.trim();
    if category.is_empty() {
        return Err(Error::InvalidInput("category must not be empty".into()));
    }
    if category.chars().count() > MAX_CATEGORY_LEN {
        return Err(Error::InvalidInput(format!(
            "category must be at most {} characters",
            MAX_CATEGORY_LEN
        )));
    }
    if description.is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LEN) {
        return Err(Error::InvalidInput(format!(
            "description must be at most {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }
    Ok(())
}

// Rows written outside `insert` are not bounded, so totals are checked.
fn checked_total(total: Decimal, amt: Decimal) -> Result<Decimal> {
    total
        .checked_add(amt)
        .ok_or_else(|| Error::Overflow(format!("total exceeds {}", Decimal::MAX)))
}

pub struct SqliteLedger<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteLedger<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, user_id: i64, tx: &NewTransaction) -> Result<Transaction> {
        validate(tx.amount, &tx.category, tx.description.as_deref())?;
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO transactions(user_id, amount, type, category, description, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user_id,
                tx.amount.to_string(),
                tx.tx_type,
                tx.category.trim(),
                tx.description,
                tx.date,
                now
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(user_id, id, "inserted transaction");
        self.get(user_id, id)
    }

    pub fn get(&self, user_id: i64, id: i64) -> Result<Transaction> {
        let sql = format!(
            "SELECT {} FROM transactions WHERE id=?1 AND user_id=?2",
            TX_COLUMNS
        );
        self.conn
            .query_row(&sql, params![id, user_id], row_to_transaction)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("transaction {}", id)))
    }

    pub fn list(&self, user_id: i64, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let mut sql = format!("SELECT {} FROM transactions WHERE user_id=?", TX_COLUMNS);
        let mut args: Vec<Box<dyn ToSql>> = vec![Box::new(user_id)];
        if let Some(t) = filter.tx_type {
            sql.push_str(" AND type=?");
            args.push(Box::new(t));
        }
        if let Some(cat) = &filter.category {
            sql.push_str(" AND category=?");
            args.push(Box::new(cat.clone()));
        }
        sql.push_str(" ORDER BY date DESC, id DESC LIMIT ? OFFSET ?");
        args.push(Box::new(filter.limit as i64));
        args.push(Box::new(filter.skip as i64));

        let refs: Vec<&dyn ToSql> = args.iter().map(|a| a.as_ref()).collect();
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(refs.as_slice(), row_to_transaction)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn update(&self, user_id: i64, id: i64, patch: &TransactionPatch) -> Result<Transaction> {
        let mut tx = self.get(user_id, id)?;
        if patch.is_empty() {
            return Ok(tx);
        }
        if let Some(a) = patch.amount {
            tx.amount = a;
        }
        if let Some(t) = patch.tx_type {
            tx.tx_type = t;
        }
        if let Some(c) = &patch.category {
            tx.category = c.trim().to_string();
        }
        if let Some(d) = &patch.description {
            tx.description = Some(d.clone());
        }
        if let Some(d) = patch.date {
            tx.date = d;
        }
        validate(tx.amount, &tx.category, tx.description.as_deref())?;
        self.conn.execute(
            "UPDATE transactions SET amount=?1, type=?2, category=?3, description=?4, date=?5, updated_at=?6
             WHERE id=?7 AND user_id=?8",
            params![
                tx.amount.to_string(),
                tx.tx_type,
                tx.category,
                tx.description,
                tx.date,
                Utc::now(),
                id,
                user_id
            ],
        )?;
        self.get(user_id, id)
    }

    pub fn delete(&self, user_id: i64, id: i64) -> Result<()> {
        let n = self.conn.execute(
            "DELETE FROM transactions WHERE id=?1 AND user_id=?2",
            params![id, user_id],
        )?;
        if n == 0 {
            return Err(Error::NotFound(format!("transaction {}", id)));
        }
        Ok(())
    }

    pub fn summary(&self, user_id: i64) -> Result<TransactionSummary> {
        let total_income = self.sum(user_id, TxType::Income, None)?;
        let total_expenses = self.sum(user_id, TxType::Expense, None)?;
        let transaction_count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE user_id=?1",
            params![user_id],
            |r| r.get(0),
        )?;
        let net_savings = total_income
            .checked_sub(total_expenses)
            .ok_or_else(|| Error::Overflow("net savings out of range".into()))?;
        Ok(TransactionSummary {
            total_income,
            total_expenses,
            net_savings,
            transaction_count,
        })
    }
}

impl LedgerAccessor for SqliteLedger<'_> {
    fn sum(&self, user_id: i64, tx_type: TxType, category: Option<&str>) -> Result<Decimal> {
        let sql = format!(
            "SELECT amount FROM transactions WHERE user_id=?1 AND type=?2 AND {}",
            CATEGORY_CLAUSE
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id, tx_type, category], |r| decimal_at(r, 0))?;
        let mut total = Decimal::ZERO;
        for amt in rows {
            total = checked_total(total, amt?)?;
        }
        Ok(total)
    }

    fn count(&self, user_id: i64, tx_type: TxType, category: Option<&str>) -> Result<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM transactions WHERE user_id=?1 AND type=?2 AND {}",
            CATEGORY_CLAUSE
        );
        let n = self
            .conn
            .query_row(&sql, params![user_id, tx_type, category], |r| r.get(0))?;
        Ok(n)
    }

    fn group_sum_by_category(&self, user_id: i64, tx_type: TxType) -> Result<Vec<CategoryTotal>> {
        let mut stmt = self
            .conn
            .prepare("SELECT category, amount FROM transactions WHERE user_id=?1 AND type=?2")?;
        let rows = stmt.query_map(params![user_id, tx_type], |r| {
            Ok((r.get::<_, String>(0)?, decimal_at(r, 1)?))
        })?;
        let mut agg: HashMap<String, Decimal> = HashMap::new();
        for row in rows {
            let (cat, amt) = row?;
            let entry = agg.entry(cat).or_insert(Decimal::ZERO);
            *entry = checked_total(*entry, amt)?;
        }
        let mut totals: Vec<CategoryTotal> = agg
            .into_iter()
            .map(|(category, total)| CategoryTotal { category, total })
            .collect();
        sort_category_totals(&mut totals);
        Ok(totals)
    }

    fn top_n(&self, user_id: i64, tx_type: TxType, n: usize) -> Result<Vec<Transaction>> {
        // Amounts are TEXT; REAL casts lose precision past ~15 digits, so rank in Rust.
        let sql = format!(
            "SELECT {} FROM transactions WHERE user_id=?1 AND type=?2",
            TX_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id, tx_type], row_to_transaction)?;
        let mut txs = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        txs.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.id.cmp(&b.id)));
        txs.truncate(n);
        Ok(txs)
    }

    fn most_recent(&self, user_id: i64, n: usize) -> Result<Vec<Transaction>> {
        let sql = format!(
            "SELECT {} FROM transactions WHERE user_id=?1 ORDER BY date DESC, id DESC LIMIT ?2",
            TX_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id, n as i64], row_to_transaction)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
