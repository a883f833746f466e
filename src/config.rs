// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::chat::Vocabulary;
use crate::db;
use crate::error::Error;

pub const DEFAULT_MAX_MESSAGE_LEN: usize = 100;
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Process settings, built once at startup and passed down by reference.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub max_message_len: usize,
    pub history_limit: usize,
    pub vocabulary: Vocabulary,
}

impl Config {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
            history_limit: DEFAULT_HISTORY_LIMIT,
            vocabulary: Vocabulary::default(),
        }
    }

    pub fn from_matches(m: &clap::ArgMatches) -> Result<Self> {
        let db_path = match m.get_one::<String>("db") {
            Some(p) => PathBuf::from(p),
            None => db::default_db_path()?,
        };
        let mut cfg = Self::new(db_path);
        if let Some(path) = m.get_one::<String>("vocab") {
            cfg.vocabulary = Vocabulary::from_json_file(Path::new(path))
                .with_context(|| format!("Load vocabulary from {}", path))?;
        }
        Ok(cfg)
    }

    /// Length checks applied before a message reaches the query engine.
    pub fn validate_message(&self, message: &str) -> crate::error::Result<()> {
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput("message must not be empty".into()));
        }
        let len = message.chars().count();
        if len > self.max_message_len {
            return Err(Error::InvalidInput(format!(
                "message is {} characters, the limit is {}",
                len, self.max_message_len
            )));
        }
        Ok(())
    }
}
