// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Utc;
use tracing::{debug, warn};

use super::classifier::{classify, normalize};
use super::responses::{self, Generated};
use super::vocabulary::Vocabulary;
use crate::error::{Error, Result};
use crate::history::HistoryStore;
use crate::ledger::LedgerAccessor;
use crate::models::{ChatMessage, ChatReply, Intent, NewChatMessage};

/// Answers one message at a time for an already-authenticated user.
///
/// Holds no state between calls; every `process` appends exactly one history record.
pub struct QueryEngine<'a> {
    ledger: &'a dyn LedgerAccessor,
    history: &'a dyn HistoryStore,
    vocab: &'a Vocabulary,
}

impl<'a> QueryEngine<'a> {
    pub fn new(
        ledger: &'a dyn LedgerAccessor,
        history: &'a dyn HistoryStore,
        vocab: &'a Vocabulary,
    ) -> Self {
        Self {
            ledger,
            history,
            vocab,
        }
    }

    /// Classify and answer without touching history.
    pub fn answer(&self, user_id: i64, raw_message: &str) -> Result<Generated> {
        let message = normalize(raw_message);
        let classification = classify(&message, self.vocab);
        match (classification.intent, classification.category.as_deref()) {
            (Intent::BalanceQuery, _) => responses::balance(self.ledger, user_id),
            (Intent::CategorySpending, Some(cat)) => {
                responses::category_spending(self.ledger, user_id, cat)
            }
            (Intent::CategorySpending, None) | (Intent::TotalSpending, _) => {
                responses::total_spending(self.ledger, user_id)
            }
            (Intent::IncomeQuery, _) => responses::income(self.ledger, user_id),
            (Intent::RecentTransactions, _) => responses::recent_transactions(self.ledger, user_id),
            (Intent::SavingsAdvice, _) => responses::savings_advice(self.ledger, user_id),
            (Intent::BiggestExpense, _) => responses::biggest_expense(self.ledger, user_id),
            (Intent::Unknown, _) => Ok(responses::unknown()),
        }
    }

    pub fn process(&self, user_id: i64, raw_message: &str) -> Result<ChatReply> {
        if raw_message.trim().is_empty() {
            return Err(Error::InvalidInput("message must not be empty".into()));
        }
        let (intent, bot_response) = self.answer(user_id, raw_message)?;

        let record = NewChatMessage {
            user_id,
            user_message: raw_message.to_string(),
            bot_response: bot_response.clone(),
            intent: Some(intent),
            created_at: Utc::now(),
        };
        let reply = ChatReply {
            user_message: raw_message.to_string(),
            bot_response,
            intent: Some(intent),
            timestamp: Utc::now(),
        };

        match self.history.append(&record) {
            Ok(saved) => {
                debug!(user_id, id = saved.id, %intent, "chat message processed");
                Ok(reply)
            }
            Err(e) => {
                warn!(user_id, error = %e, "could not record chat history");
                Err(Error::HistoryWrite {
                    reply: Box::new(reply),
                    source: Box::new(e),
                })
            }
        }
    }

    pub fn history(&self, user_id: i64, limit: usize) -> Result<Vec<ChatMessage>> {
        self.history.query_by_user(user_id, limit)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::str::FromStr;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;
    use crate::ledger::sort_category_totals;
    use crate::models::{CategoryTotal, Transaction, TxType};

    #[derive(Default)]
    struct FakeLedger {
        txs: Vec<Transaction>,
        calls: RefCell<usize>,
    }

    impl FakeLedger {
        fn with(rows: &[(&str, TxType, &str, u32)]) -> Self {
            let txs = rows
                .iter()
                .enumerate()
                .map(|(i, (amt, t, cat, day))| Transaction {
                    id: i as i64 + 1,
                    user_id: 1,
                    amount: Decimal::from_str(amt).unwrap(),
                    tx_type: *t,
                    category: cat.to_string(),
                    description: None,
                    date: NaiveDate::from_ymd_opt(2025, 1, *day)
                        .unwrap()
                        .and_hms_opt(9, 0, 0)
                        .unwrap(),
                    created_at: Utc::now(),
                    updated_at: None,
                })
                .collect();
            Self {
                txs,
                calls: RefCell::new(0),
            }
        }

        fn matching(&self, user_id: i64, t: TxType, cat: Option<&str>) -> Vec<&Transaction> {
            *self.calls.borrow_mut() += 1;
            self.txs
                .iter()
                .filter(|tx| tx.user_id == user_id && tx.tx_type == t)
                .filter(|tx| {
                    cat.is_none_or(|c| tx.category.to_lowercase().contains(&c.to_lowercase()))
                })
                .collect()
        }
    }

    impl LedgerAccessor for FakeLedger {
        fn sum(&self, user_id: i64, t: TxType, cat: Option<&str>) -> Result<Decimal> {
            Ok(self.matching(user_id, t, cat).iter().map(|tx| tx.amount).sum())
        }

        fn count(&self, user_id: i64, t: TxType, cat: Option<&str>) -> Result<i64> {
            Ok(self.matching(user_id, t, cat).len() as i64)
        }

        fn group_sum_by_category(&self, user_id: i64, t: TxType) -> Result<Vec<CategoryTotal>> {
            let mut out: Vec<CategoryTotal> = Vec::new();
            for tx in self.matching(user_id, t, None) {
                match out.iter_mut().find(|c| c.category == tx.category) {
                    Some(c) => c.total += tx.amount,
                    None => out.push(CategoryTotal {
                        category: tx.category.clone(),
                        total: tx.amount,
                    }),
                }
            }
            sort_category_totals(&mut out);
            Ok(out)
        }

        fn top_n(&self, user_id: i64, t: TxType, n: usize) -> Result<Vec<Transaction>> {
            let mut v: Vec<Transaction> =
                self.matching(user_id, t, None).into_iter().cloned().collect();
            v.sort_by(|a, b| b.amount.cmp(&a.amount));
            v.truncate(n);
            Ok(v)
        }

        fn most_recent(&self, user_id: i64, n: usize) -> Result<Vec<Transaction>> {
            *self.calls.borrow_mut() += 1;
            let mut v: Vec<Transaction> = self
                .txs
                .iter()
                .filter(|tx| tx.user_id == user_id)
                .cloned()
                .collect();
            v.sort_by(|a, b| b.date.cmp(&a.date));
            v.truncate(n);
            Ok(v)
        }
    }

    #[derive(Default)]
    struct FakeHistory {
        rows: RefCell<Vec<ChatMessage>>,
        fail: bool,
    }

    impl HistoryStore for FakeHistory {
        fn append(&self, record: &NewChatMessage) -> Result<ChatMessage> {
            if self.fail {
                return Err(Error::Storage(rusqlite::Error::InvalidQuery));
            }
            let mut rows = self.rows.borrow_mut();
            let msg = ChatMessage {
                id: rows.len() as i64 + 1,
                user_id: record.user_id,
                user_message: record.user_message.clone(),
                bot_response: record.bot_response.clone(),
                intent: record.intent,
                created_at: record.created_at,
            };
            rows.push(msg.clone());
            Ok(msg)
        }

        fn query_by_user(&self, user_id: i64, limit: usize) -> Result<Vec<ChatMessage>> {
            Ok(self
                .rows
                .borrow()
                .iter()
                .rev()
                .filter(|m| m.user_id == user_id)
                .take(limit)
                .cloned()
                .collect())
        }
    }

    #[test]
    fn unknown_intent_is_logged_without_ledger_reads() {
        let ledger = FakeLedger::default();
        let history = FakeHistory::default();
        let vocab = Vocabulary::default();
        let engine = QueryEngine::new(&ledger, &history, &vocab);

        let reply = engine.process(1, "asdkjasd").unwrap();
        assert_eq!(reply.intent, Some(Intent::Unknown));
        assert_eq!(reply.bot_response, responses::HELP_TEXT);
        assert_eq!(*ledger.calls.borrow(), 0);
        assert_eq!(history.rows.borrow().len(), 1);
        assert_eq!(history.rows.borrow()[0].user_message, "asdkjasd");
    }

    #[test]
    fn one_history_row_per_call() {
        let ledger = FakeLedger::with(&[("100", TxType::Expense, "Food", 1)]);
        let history = FakeHistory::default();
        let vocab = Vocabulary::default();
        let engine = QueryEngine::new(&ledger, &history, &vocab);

        for msg in ["balance", "spent on food", "income", "recent", "tips", "biggest", "??"] {
            engine.process(1, msg).unwrap();
        }
        let rows = engine.history(1, 100).unwrap();
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0].intent, Some(Intent::Unknown));
        assert_eq!(rows[6].intent, Some(Intent::BalanceQuery));
    }

    #[test]
    fn raw_message_is_kept_verbatim() {
        let ledger = FakeLedger::default();
        let history = FakeHistory::default();
        let vocab = Vocabulary::default();
        let engine = QueryEngine::new(&ledger, &history, &vocab);

        let reply = engine.process(1, "  What's my BALANCE?  ").unwrap();
        assert_eq!(reply.user_message, "  What's my BALANCE?  ");
        assert_eq!(reply.intent, Some(Intent::BalanceQuery));
    }

    #[test]
    fn empty_message_is_rejected_and_not_logged() {
        let ledger = FakeLedger::default();
        let history = FakeHistory::default();
        let vocab = Vocabulary::default();
        let engine = QueryEngine::new(&ledger, &history, &vocab);

        assert!(matches!(engine.process(1, "   "), Err(Error::InvalidInput(_))));
        assert!(history.rows.borrow().is_empty());
    }

    #[test]
    fn history_failure_carries_computed_reply() {
        let ledger = FakeLedger::with(&[("50", TxType::Income, "Salary", 1)]);
        let history = FakeHistory {
            fail: true,
            ..Default::default()
        };
        let vocab = Vocabulary::default();
        let engine = QueryEngine::new(&ledger, &history, &vocab);

        match engine.process(1, "income?") {
            Err(Error::HistoryWrite { reply, .. }) => {
                assert_eq!(reply.intent, Some(Intent::IncomeQuery));
                assert!(reply.bot_response.contains("$50.00"));
            }
            other => panic!("expected HistoryWrite, got {:?}", other),
        }
    }

    #[test]
    fn category_spending_scenario() {
        let ledger = FakeLedger::with(&[
            ("100", TxType::Expense, "Food", 1),
            ("50", TxType::Expense, "Food", 2),
            ("800", TxType::Expense, "Rent", 3),
        ]);
        let history = FakeHistory::default();
        let vocab = Vocabulary::default();
        let engine = QueryEngine::new(&ledger, &history, &vocab);

        let (intent, text) = engine.answer(1, "How much did I spend on food?").unwrap();
        assert_eq!(intent, Intent::CategorySpending);
        assert!(text.contains("Total: $150.00"));
        assert!(text.contains("Transactions: 2"));
        assert!(text.contains("Average: $75.00 per transaction"));
    }
}
