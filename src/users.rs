// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Minimal local user registry. Resolving an email to a user is the only
//! identity check the chat engine relies on.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::info;

use crate::error::{Error, Result};
use crate::models::User;

fn row_to_user(r: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: r.get(0)?,
        email: r.get(1)?,
        full_name: r.get(2)?,
        created_at: r.get(3)?,
    })
}

pub fn register(conn: &Connection, email: &str, full_name: &str) -> Result<User> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(Error::InvalidInput(format!("invalid email '{}'", email)));
    }
    let full_name = full_name.trim();
    if full_name.is_empty() {
        return Err(Error::InvalidInput("name must not be empty".into()));
    }
    let exists: Option<i64> = conn
        .query_row("SELECT id FROM users WHERE email=?1", params![email], |r| {
            r.get(0)
        })
        .optional()?;
    if exists.is_some() {
        return Err(Error::InvalidInput(format!(
            "email '{}' is already registered",
            email
        )));
    }
    conn.execute(
        "INSERT INTO users(email, full_name, created_at) VALUES (?1, ?2, ?3)",
        params![email, full_name, Utc::now()],
    )?;
    let id = conn.last_insert_rowid();
    info!(id, %email, "registered user");
    Ok(conn.query_row(
        "SELECT id, email, full_name, created_at FROM users WHERE id=?1",
        params![id],
        row_to_user,
    )?)
}

pub fn list(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt =
        conn.prepare("SELECT id, email, full_name, created_at FROM users ORDER BY email")?;
    let rows = stmt.query_map([], row_to_user)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Resolve the caller's identity; a missing or unknown email is `Unauthenticated`.
pub fn authenticate(conn: &Connection, email: Option<&str>) -> Result<User> {
    let email = email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| {
            Error::Unauthenticated("no user given; pass --user or set LEDGERCHAT_USER".into())
        })?;
    conn.query_row(
        "SELECT id, email, full_name, created_at FROM users WHERE email=?1",
        params![email],
        row_to_user,
    )
    .optional()?
    .ok_or_else(|| Error::Unauthenticated(format!("unknown user '{}'", email)))
}
