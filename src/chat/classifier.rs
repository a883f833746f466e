// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Ordered keyword rules mapping a normalized message to an [`Intent`].
//!
//! Rules are evaluated top to bottom and the first rule with any keyword
//! contained in the message wins. Matching is plain substring containment,
//! so "spend" also fires on "spending" and "spender".

use tracing::debug;

use super::extractor::extract_category;
use super::vocabulary::Vocabulary;
use crate::models::Intent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    Fixed(Intent),
    /// `CategorySpending` when a category is extracted, else `TotalSpending`.
    Spending,
}

#[derive(Debug, Clone, Copy)]
pub struct Rule<'a> {
    pub keywords: &'a [String],
    pub outcome: RuleOutcome,
}

impl Rule<'_> {
    pub fn matches(&self, message: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| !k.is_empty() && message.contains(k.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub intent: Intent,
    pub category: Option<String>,
}

/// The rule list in priority order.
pub fn rules(vocab: &Vocabulary) -> [Rule<'_>; 6] {
    [
        Rule {
            keywords: &vocab.balance,
            outcome: RuleOutcome::Fixed(Intent::BalanceQuery),
        },
        Rule {
            keywords: &vocab.spending,
            outcome: RuleOutcome::Spending,
        },
        Rule {
            keywords: &vocab.income,
            outcome: RuleOutcome::Fixed(Intent::IncomeQuery),
        },
        Rule {
            keywords: &vocab.recent,
            outcome: RuleOutcome::Fixed(Intent::RecentTransactions),
        },
        Rule {
            keywords: &vocab.savings,
            outcome: RuleOutcome::Fixed(Intent::SavingsAdvice),
        },
        Rule {
            keywords: &vocab.biggest,
            outcome: RuleOutcome::Fixed(Intent::BiggestExpense),
        },
    ]
}

/// Lower-case and trim raw user text.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn classify(message: &str, vocab: &Vocabulary) -> Classification {
    for (idx, rule) in rules(vocab).iter().enumerate() {
        if !rule.matches(message) {
            continue;
        }
        let classification = match rule.outcome {
            RuleOutcome::Fixed(intent) => Classification {
                intent,
                category: None,
            },
            RuleOutcome::Spending => match extract_category(message, &vocab.categories) {
                Some(category) => Classification {
                    intent: Intent::CategorySpending,
                    category: Some(category),
                },
                None => Classification {
                    intent: Intent::TotalSpending,
                    category: None,
                },
            },
        };
        debug!(rule = idx + 1, intent = %classification.intent, "classified message");
        return classification;
    }
    debug!("no rule matched");
    Classification {
        intent: Intent::Unknown,
        category: None,
    }
}
