// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Keyword tables driving intent classification and category extraction.
//!
//! Only the contents of each table are configurable. The priority in which
//! the tables are consulted is fixed by the classifier.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub balance: Vec<String>,
    pub spending: Vec<String>,
    pub income: Vec<String>,
    pub recent: Vec<String>,
    pub savings: Vec<String>,
    pub biggest: Vec<String>,
    /// Category names in lookup order; the first hit wins.
    pub categories: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            balance: words(&["balance", "summary", "total", "overview"]),
            spending: words(&["spend", "spent"]),
            income: words(&["income", "earned", "salary"]),
            recent: words(&["recent", "last", "latest"]),
            savings: words(&["save", "saving", "tips", "advice", "recommend"]),
            biggest: words(&["biggest", "largest", "most expensive"]),
            categories: words(&[
                "food",
                "rent",
                "transport",
                "entertainment",
                "utilities",
                "shopping",
                "healthcare",
                "salary",
                "freelance",
            ]),
        }
    }
}

impl Vocabulary {
    /// Load a vocabulary from JSON. Tables missing from the file keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let mut vocab: Vocabulary = serde_json::from_str(raw)?;
        vocab.normalize();
        Ok(vocab)
    }

    // Matching runs against lower-cased text, so keywords are stored lower-cased too.
    fn normalize(&mut self) {
        for table in [
            &mut self.balance,
            &mut self.spending,
            &mut self.income,
            &mut self.recent,
            &mut self.savings,
            &mut self.biggest,
            &mut self.categories,
        ] {
            for w in table.iter_mut() {
                *w = w.trim().to_lowercase();
            }
            table.retain(|w| !w.is_empty());
        }
    }
}
