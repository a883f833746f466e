// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, Local, Months, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::ledger::SqliteLedger;
use crate::models::{NewTransaction, TxType, User};

// (day of month, type, category, amount in cents, description, every n-th month)
const MONTHLY: &[(u32, TxType, &str, i64, Option<&str>, u32)] = &[
    (1, TxType::Income, "Salary", 450_000, Some("Monthly salary"), 1),
    (15, TxType::Income, "Freelance", 80_000, Some("Side project"), 2),
    (2, TxType::Expense, "Rent", 120_000, Some("Apartment rent"), 1),
    (4, TxType::Expense, "Food", 12_050, Some("Groceries"), 1),
    (11, TxType::Expense, "Food", 8_525, Some("Restaurant"), 1),
    (19, TxType::Expense, "Food", 6_410, None, 1),
    (6, TxType::Expense, "Transport", 6_000, Some("Transit pass"), 1),
    (13, TxType::Expense, "Entertainment", 9_000, Some("Concert tickets"), 2),
    (8, TxType::Expense, "Utilities", 15_000, Some("Electricity and water"), 1),
    (21, TxType::Expense, "Shopping", 21_000, None, 2),
    (24, TxType::Expense, "Healthcare", 7_500, Some("Pharmacy"), 3),
];

/// Insert `months` months of sample activity ending in the month of `today`.
/// Returns the number of transactions written.
pub fn seed_ledger(conn: &Connection, user_id: i64, months: u32, today: NaiveDate) -> Result<usize> {
    let ledger = SqliteLedger::new(conn);
    let this_month = today.with_day(1).context("first day of month")?;
    let mut written = 0;
    for back in 0..months {
        let month_start = this_month
            .checked_sub_months(Months::new(back))
            .context("month arithmetic out of range")?;
        for (day, tx_type, category, cents, description, every) in MONTHLY {
            if back % every != 0 {
                continue;
            }
            let date = month_start
                .with_day(*day)
                .context("seed day out of range")?;
            if date > today {
                continue;
            }
            ledger.insert(
                user_id,
                &NewTransaction {
                    amount: Decimal::new(*cents, 2),
                    tx_type: *tx_type,
                    category: category.to_string(),
                    description: description.map(str::to_string),
                    date: date.and_hms_opt(12, 0, 0).context("noon")?,
                },
            )?;
            written += 1;
        }
    }
    Ok(written)
}

pub fn handle(conn: &Connection, user: &User, m: &clap::ArgMatches) -> Result<()> {
    let months = *m.get_one::<u32>("months").unwrap_or(&3);
    let n = seed_ledger(conn, user.id, months, Local::now().date_naive())?;
    println!("Seeded {} transactions for {}", n, user.email);
    Ok(())
}
