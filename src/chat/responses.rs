// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! One generator per intent. Each reads aggregates for a single user and
//! renders a deterministic text report; empty ledgers fold into text, never errors.

use std::fmt::Write as _;

use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::ledger::LedgerAccessor;
use crate::models::{Intent, Transaction, TxType};
use crate::utils::{fmt_money, fmt_pct, percent_of};

pub const RECENT_LIMIT: usize = 5;
pub const TOP_CATEGORY_LIMIT: usize = 3;
pub const NO_DESCRIPTION: &str = "No description";

pub const HELP_TEXT: &str = "🤔 I'm not sure I understood that. Here's what I can help you with:\n\n\
💰 Ask about your **balance** or **summary**\n\
📊 Check **spending** by category (e.g., 'How much did I spend on food?')\n\
📈 View your **income**\n\
📋 See **recent** transactions\n\
💡 Get **savings tips** and advice\n\
💸 Find your **biggest expense**\n\n\
Try asking me something like: 'What's my balance?' or 'How much did I spend on food?'";

pub const NO_TRANSACTIONS: &str = "You don't have any transactions yet. Start adding some!";
pub const NO_EXPENSES: &str = "You don't have any expenses recorded yet.";
pub const NEED_INCOME: &str =
    "Add some income transactions first so I can give you personalized advice!";

pub type Generated = (Intent, String);

fn net_of(income: Decimal, expenses: Decimal) -> Result<Decimal> {
    income
        .checked_sub(expenses)
        .ok_or_else(|| Error::Overflow("net balance out of range".into()))
}

fn description(tx: &Transaction) -> &str {
    match tx.description.as_deref() {
        Some(d) if !d.trim().is_empty() => d,
        _ => NO_DESCRIPTION,
    }
}

pub fn balance(ledger: &dyn LedgerAccessor, user_id: i64) -> Result<Generated> {
    let income = ledger.sum(user_id, TxType::Income, None)?;
    let expenses = ledger.sum(user_id, TxType::Expense, None)?;
    let net = net_of(income, expenses)?;

    let mut out = format!(
        "🧾**Financial Summary**\n\n\
         💰 Total Income: {}\n\
         💸 Total Expenses: {}\n\
         𓍝 Net Balance: {}\n\n",
        fmt_money(&income),
        fmt_money(&expenses),
        fmt_money(&net)
    );
    if net > Decimal::ZERO {
        let _ = write!(out, "Great job! You're saving {}! 🎉", fmt_money(&net));
    } else if net < Decimal::ZERO {
        let _ = write!(
            out,
            "⚠️ You're spending {} more than you earn. Consider reviewing your expenses.",
            fmt_money(&net.abs())
        );
    } else {
        out.push_str("You're breaking even. Try to save a little each month! 💪🏻");
    }
    Ok((Intent::BalanceQuery, out))
}

pub fn category_spending(
    ledger: &dyn LedgerAccessor,
    user_id: i64,
    category: &str,
) -> Result<Generated> {
    let total = ledger.sum(user_id, TxType::Expense, Some(category))?;
    let count = ledger.count(user_id, TxType::Expense, Some(category))?;

    let text = if count == 0 {
        format!(
            "You haven't recorded any expenses in the '{}' category yet.",
            category
        )
    } else {
        let avg = total / Decimal::from(count);
        format!(
            "📊 **{} Spending**\n\n\
             💸 Total: {}\n\
             📝 Transactions: {}\n\
             📊 Average: {} per transaction",
            category,
            fmt_money(&total),
            count,
            fmt_money(&avg)
        )
    };
    Ok((Intent::CategorySpending, text))
}

pub fn total_spending(ledger: &dyn LedgerAccessor, user_id: i64) -> Result<Generated> {
    let total = ledger.sum(user_id, TxType::Expense, None)?;
    let top = ledger.group_sum_by_category(user_id, TxType::Expense)?;

    let mut out = format!("💸 **Total Expenses: {}**\n\n", fmt_money(&total));
    if !top.is_empty() {
        out.push_str("Top spending categories:\n");
        for (i, ct) in top.iter().take(TOP_CATEGORY_LIMIT).enumerate() {
            let _ = writeln!(
                out,
                "{}. {}: {} ({}%)",
                i + 1,
                ct.category,
                fmt_money(&ct.total),
                fmt_pct(&percent_of(ct.total, total))
            );
        }
    }
    Ok((Intent::TotalSpending, out))
}

pub fn income(ledger: &dyn LedgerAccessor, user_id: i64) -> Result<Generated> {
    let total = ledger.sum(user_id, TxType::Income, None)?;
    let count = ledger.count(user_id, TxType::Income, None)?;
    let text = format!(
        "💰 **Income Summary**\n\n\
         📈 Total Income: {}\n\
         📝 Income Transactions: {}",
        fmt_money(&total),
        count
    );
    Ok((Intent::IncomeQuery, text))
}

pub fn recent_transactions(ledger: &dyn LedgerAccessor, user_id: i64) -> Result<Generated> {
    let recent = ledger.most_recent(user_id, RECENT_LIMIT)?;
    if recent.is_empty() {
        return Ok((Intent::RecentTransactions, NO_TRANSACTIONS.to_string()));
    }
    let mut out = String::from("📋 **Recent Transactions:**\n\n");
    for tx in &recent {
        let marker = match tx.tx_type {
            TxType::Income => "📈",
            TxType::Expense => "📉",
        };
        let _ = writeln!(
            out,
            "{} {} - {} ({})",
            marker,
            fmt_money(&tx.amount),
            tx.category,
            description(tx)
        );
    }
    Ok((Intent::RecentTransactions, out))
}

pub fn savings_advice(ledger: &dyn LedgerAccessor, user_id: i64) -> Result<Generated> {
    let income = ledger.sum(user_id, TxType::Income, None)?;
    if income <= Decimal::ZERO {
        return Ok((Intent::SavingsAdvice, NEED_INCOME.to_string()));
    }
    let expenses = ledger.sum(user_id, TxType::Expense, None)?;
    let rate = percent_of(net_of(income, expenses)?, income);
    let rate_s = fmt_pct(&rate);

    let mut out = String::from("💡 **Savings Tips:**\n\n");
    if rate >= Decimal::from(20) {
        let _ = write!(
            out,
            "🌟 Excellent! You're saving {}% of your income. Keep it up!",
            rate_s
        );
    } else if rate >= Decimal::TEN {
        let _ = write!(
            out,
            "👍 Good job! You're saving {}% of your income. Try to reach 20% for optimal savings.",
            rate_s
        );
    } else if rate > Decimal::ZERO {
        let _ = write!(
            out,
            "⚠️ You're saving {}% of your income. Financial experts recommend at least 20%.",
            rate_s
        );
    } else {
        out.push_str("🚨 You're spending more than you earn! Consider cutting unnecessary expenses.");
    }

    if let Some(top) = ledger
        .group_sum_by_category(user_id, TxType::Expense)?
        .into_iter()
        .next()
    {
        let _ = write!(
            out,
            "\n\n💰 Your biggest expense is {} ({}, {}% of income). Consider reducing this category to boost savings!",
            top.category,
            fmt_money(&top.total),
            fmt_pct(&percent_of(top.total, income))
        );
    }
    Ok((Intent::SavingsAdvice, out))
}

pub fn biggest_expense(ledger: &dyn LedgerAccessor, user_id: i64) -> Result<Generated> {
    let text = match ledger.max(user_id, TxType::Expense)? {
        None => NO_EXPENSES.to_string(),
        Some(tx) => format!(
            "💸 **Your Biggest Expense:**\n\n\
             Amount: {}\n\
             Category: {}\n\
             Description: {}\n\
             Date: {}",
            fmt_money(&tx.amount),
            tx.category,
            description(&tx),
            tx.date.format("%Y-%m-%d")
        ),
    };
    Ok((Intent::BiggestExpense, text))
}

/// Static help; never touches the ledger.
pub fn unknown() -> Generated {
    (Intent::Unknown, HELP_TEXT.to_string())
}
