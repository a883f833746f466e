// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use ledgerchat::chat::{QueryEngine, Vocabulary, responses};
use ledgerchat::db;
use ledgerchat::history::{HistoryStore, SqliteHistory};
use ledgerchat::ledger::SqliteLedger;
use ledgerchat::models::{Intent, NewTransaction, TxType, User};
use ledgerchat::users;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> (Connection, User) {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let user = users::register(&conn, "alice@example.com", "Alice Johnson").unwrap();
    (conn, user)
}

fn add(conn: &Connection, user: &User, amount: &str, t: TxType, cat: &str, desc: Option<&str>, day: u32) {
    SqliteLedger::new(conn)
        .insert(
            user.id,
            &NewTransaction {
                amount: amount.parse::<Decimal>().unwrap(),
                tx_type: t,
                category: cat.into(),
                description: desc.map(|d| d.to_string()),
                date: NaiveDate::from_ymd_opt(2025, 3, day)
                    .unwrap()
                    .and_hms_opt(14, 30, 0)
                    .unwrap(),
            },
        )
        .unwrap();
}

fn ask(conn: &Connection, user: &User, msg: &str) -> (Intent, String) {
    let ledger = SqliteLedger::new(conn);
    let history = SqliteHistory::new(conn);
    let vocab = Vocabulary::default();
    let engine = QueryEngine::new(&ledger, &history, &vocab);
    let reply = engine.process(user.id, msg).unwrap();
    (reply.intent.unwrap(), reply.bot_response)
}

#[test]
fn zero_state_answers() {
    let (conn, user) = setup();

    let (intent, text) = ask(&conn, &user, "What's my balance?");
    assert_eq!(intent, Intent::BalanceQuery);
    assert!(text.contains("Total Income: $0.00"));
    assert!(text.contains("Total Expenses: $0.00"));
    assert!(text.contains("Net Balance: $0.00"));
    assert!(text.contains("breaking even"));

    let (_, text) = ask(&conn, &user, "show recent transactions");
    assert_eq!(text, responses::NO_TRANSACTIONS);

    let (_, text) = ask(&conn, &user, "what is my biggest purchase");
    assert_eq!(text, responses::NO_EXPENSES);

    let (_, text) = ask(&conn, &user, "any advice?");
    assert_eq!(text, responses::NEED_INCOME);

    let (intent, text) = ask(&conn, &user, "how much have I spent");
    assert_eq!(intent, Intent::TotalSpending);
    assert_eq!(text, "💸 **Total Expenses: $0.00**\n\n");
}

#[test]
fn category_spending_totals_and_average() {
    let (conn, user) = setup();
    add(&conn, &user, "100", TxType::Expense, "Food", None, 1);
    add(&conn, &user, "50", TxType::Expense, "food delivery", None, 2);
    add(&conn, &user, "800", TxType::Expense, "Rent", None, 3);
    add(&conn, &user, "30", TxType::Income, "Food", None, 4);

    let (intent, text) = ask(&conn, &user, "How much did I spend on food?");
    assert_eq!(intent, Intent::CategorySpending);
    assert!(text.starts_with("📊 **Food Spending**"));
    assert!(text.contains("Total: $150.00"));
    assert!(text.contains("Transactions: 2"));
    assert!(text.contains("Average: $75.00 per transaction"));

    let (intent, text) = ask(&conn, &user, "what did I spend on shopping");
    assert_eq!(intent, Intent::CategorySpending);
    assert_eq!(
        text,
        "You haven't recorded any expenses in the 'Shopping' category yet."
    );
}

#[test]
fn total_spending_lists_top_three_with_percentages() {
    let (conn, user) = setup();
    add(&conn, &user, "500", TxType::Expense, "Rent", None, 1);
    add(&conn, &user, "300", TxType::Expense, "Food", None, 2);
    add(&conn, &user, "150", TxType::Expense, "Transport", None, 3);
    add(&conn, &user, "50", TxType::Expense, "Shopping", None, 4);

    let (intent, text) = ask(&conn, &user, "my spending");
    assert_eq!(intent, Intent::TotalSpending);
    assert!(text.starts_with("💸 **Total Expenses: $1,000.00**"));
    assert!(text.contains("1. Rent: $500.00 (50.0%)"));
    assert!(text.contains("2. Food: $300.00 (30.0%)"));
    assert!(text.contains("3. Transport: $150.00 (15.0%)"));
    assert!(!text.contains("Shopping"));
}

#[test]
fn total_spending_with_two_categories_lists_only_those() {
    let (conn, user) = setup();
    add(&conn, &user, "450", TxType::Expense, "Food", None, 1);
    add(&conn, &user, "150", TxType::Expense, "Food", None, 2);
    add(&conn, &user, "200", TxType::Expense, "Rent", None, 3);
    add(&conn, &user, "900", TxType::Income, "Salary", None, 4);

    let (intent, text) = ask(&conn, &user, "how much have I spent?");
    assert_eq!(intent, Intent::TotalSpending);
    assert!(text.starts_with("💸 **Total Expenses: $800.00**"));
    assert!(text.contains("1. Food: $600.00 (75.0%)"));
    assert!(text.contains("2. Rent: $200.00 (25.0%)"));
    assert!(!text.contains("3."));
    assert!(!text.contains("Salary"));
}

#[test]
fn balance_tone_follows_net() {
    let (conn, user) = setup();
    add(&conn, &user, "1200", TxType::Expense, "Rent", None, 1);
    add(&conn, &user, "1000", TxType::Income, "Salary", None, 2);

    let (_, text) = ask(&conn, &user, "overview");
    assert!(text.contains("Net Balance: $-200.00"));
    assert!(text.contains("You're spending $200.00 more than you earn"));

    add(&conn, &user, "4000", TxType::Income, "Salary", None, 3);
    let (_, text) = ask(&conn, &user, "overview");
    assert!(text.contains("Great job! You're saving $3,800.00!"));
}

#[test]
fn balance_read_path_is_stable() {
    let (conn, user) = setup();
    add(&conn, &user, "2500.75", TxType::Income, "Salary", None, 1);
    add(&conn, &user, "99.99", TxType::Expense, "Food", None, 2);
    let (_, first) = ask(&conn, &user, "balance");
    let (_, second) = ask(&conn, &user, "balance");
    assert_eq!(first, second);
}

#[test]
fn income_summary() {
    let (conn, user) = setup();
    add(&conn, &user, "4000", TxType::Income, "Salary", None, 1);
    add(&conn, &user, "750.5", TxType::Income, "Freelance", None, 2);
    add(&conn, &user, "10", TxType::Expense, "Food", None, 3);

    let (intent, text) = ask(&conn, &user, "How much have I earned?");
    assert_eq!(intent, Intent::IncomeQuery);
    assert!(text.contains("Total Income: $4,750.50"));
    assert!(text.contains("Income Transactions: 2"));
}

#[test]
fn recent_transactions_newest_first_limited_to_five() {
    let (conn, user) = setup();
    for day in 1..=6 {
        add(&conn, &user, &format!("{}", day * 10), TxType::Expense, "Food", None, day);
    }
    add(&conn, &user, "900", TxType::Income, "Salary", Some("March pay"), 7);

    let (intent, text) = ask(&conn, &user, "latest activity");
    assert_eq!(intent, Intent::RecentTransactions);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    assert_eq!(lines[0], "📋 **Recent Transactions:**");
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[1], "📈 $900.00 - Salary (March pay)");
    assert_eq!(lines[2], "📉 $60.00 - Food (No description)");
    assert_eq!(lines[5], "📉 $30.00 - Food (No description)");
}

#[test]
fn savings_advice_excellent_tier_with_top_category() {
    let (conn, user) = setup();
    add(&conn, &user, "5000", TxType::Income, "Salary", None, 1);
    add(&conn, &user, "2500", TxType::Expense, "Rent", None, 2);
    add(&conn, &user, "1500", TxType::Expense, "Food", None, 3);

    let (intent, text) = ask(&conn, &user, "give me savings tips");
    assert_eq!(intent, Intent::SavingsAdvice);
    assert!(text.contains("🌟 Excellent! You're saving 20.0% of your income."));
    assert!(text.contains("Your biggest expense is Rent ($2,500.00, 50.0% of income)"));
}

#[test]
fn savings_advice_bands() {
    let (conn, user) = setup();
    add(&conn, &user, "1000", TxType::Income, "Salary", None, 1);
    add(&conn, &user, "850", TxType::Expense, "Rent", None, 2);
    let (_, text) = ask(&conn, &user, "tips");
    assert!(text.contains("Good job! You're saving 15.0%"));

    add(&conn, &user, "100", TxType::Expense, "Food", None, 3);
    let (_, text) = ask(&conn, &user, "tips");
    assert!(text.contains("You're saving 5.0% of your income. Financial experts"));

    add(&conn, &user, "50", TxType::Expense, "Food", None, 4);
    let (_, text) = ask(&conn, &user, "tips");
    assert!(text.contains("🚨 You're spending more than you earn!"));
}

#[test]
fn biggest_expense_renders_date_only() {
    let (conn, user) = setup();
    add(&conn, &user, "99", TxType::Expense, "Food", Some("Dinner"), 5);
    add(&conn, &user, "1450", TxType::Expense, "Rent", None, 9);
    add(&conn, &user, "5000", TxType::Income, "Salary", None, 10);

    let (intent, text) = ask(&conn, &user, "largest expense?");
    assert_eq!(intent, Intent::BiggestExpense);
    assert!(text.contains("Amount: $1,450.00"));
    assert!(text.contains("Category: Rent"));
    assert!(text.contains("Description: No description"));
    assert!(text.contains("Date: 2025-03-09"));
    assert!(!text.contains("14:30"));
}

#[test]
fn unknown_message_still_logged() {
    let (conn, user) = setup();
    let (intent, text) = ask(&conn, &user, "asdkjasd");
    assert_eq!(intent, Intent::Unknown);
    assert_eq!(text, responses::HELP_TEXT);

    let rows = SqliteHistory::new(&conn).query_by_user(user.id, 10).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].intent, Some(Intent::Unknown));
    assert_eq!(rows[0].user_message, "asdkjasd");
}

#[test]
fn history_is_per_user_newest_first_and_limited() {
    let (conn, alice) = setup();
    let bob = users::register(&conn, "bob@example.com", "Bob Smith").unwrap();
    for msg in ["balance", "income", "tips"] {
        ask(&conn, &alice, msg);
    }
    ask(&conn, &bob, "recent");

    let ledger = SqliteLedger::new(&conn);
    let history = SqliteHistory::new(&conn);
    let vocab = Vocabulary::default();
    let engine = QueryEngine::new(&ledger, &history, &vocab);

    let rows = engine.history(alice.id, 2).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].user_message, "tips");
    assert_eq!(rows[1].user_message, "income");

    let rows = engine.history(bob.id, 20).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].intent, Some(Intent::RecentTransactions));

    let carol = users::register(&conn, "carol@example.com", "Carol").unwrap();
    assert!(engine.history(carol.id, 20).unwrap().is_empty());
}

#[test]
fn answers_are_scoped_to_the_caller() {
    let (conn, alice) = setup();
    let bob = users::register(&conn, "bob@example.com", "Bob Smith").unwrap();
    add(&conn, &bob, "777", TxType::Income, "Salary", None, 1);

    let (_, text) = ask(&conn, &alice, "balance");
    assert!(text.contains("Total Income: $0.00"));
}
