// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, params};
use tracing::debug;

use crate::error::Result;
use crate::models::{ChatMessage, NewChatMessage};

/// Append-only store of processed chat exchanges.
pub trait HistoryStore {
    fn append(&self, record: &NewChatMessage) -> Result<ChatMessage>;

    /// Most recent first, at most `limit` records.
    fn query_by_user(&self, user_id: i64, limit: usize) -> Result<Vec<ChatMessage>>;
}

pub struct SqliteHistory<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteHistory<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl HistoryStore for SqliteHistory<'_> {
    fn append(&self, record: &NewChatMessage) -> Result<ChatMessage> {
        self.conn.execute(
            "INSERT INTO chat_messages(user_id, user_message, bot_response, intent, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.user_id,
                record.user_message,
                record.bot_response,
                record.intent,
                record.created_at
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(user_id = record.user_id, id, "appended chat history");
        Ok(ChatMessage {
            id,
            user_id: record.user_id,
            user_message: record.user_message.clone(),
            bot_response: record.bot_response.clone(),
            intent: record.intent,
            created_at: record.created_at,
        })
    }

    fn query_by_user(&self, user_id: i64, limit: usize) -> Result<Vec<ChatMessage>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, user_message, bot_response, intent, created_at
             FROM chat_messages WHERE user_id=?1
             ORDER BY created_at DESC, id DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![user_id, limit as i64], |r| {
            Ok(ChatMessage {
                id: r.get(0)?,
                user_id: r.get(1)?,
                user_message: r.get(2)?,
                bot_response: r.get(3)?,
                intent: r.get(4)?,
                created_at: r.get(5)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
