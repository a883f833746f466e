// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use rusqlite::Connection;
use tracing::warn;

use crate::chat::QueryEngine;
use crate::config::Config;
use crate::error::Error;
use crate::history::SqliteHistory;
use crate::ledger::SqliteLedger;
use crate::models::{ChatReply, User};
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, cfg: &Config, user: &User, m: &clap::ArgMatches) -> Result<()> {
    let ledger = SqliteLedger::new(conn);
    let history = SqliteHistory::new(conn);
    let engine = QueryEngine::new(&ledger, &history, &cfg.vocabulary);

    match m.subcommand() {
        Some(("ask", sub)) => {
            let message = sub
                .get_many::<String>("message")
                .unwrap()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            let reply = ask(&engine, cfg, user, &message)?;
            if sub.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&reply)?);
            } else {
                println!("{}", reply.bot_response);
            }
        }
        Some(("history", sub)) => {
            let limit = sub
                .get_one::<usize>("limit")
                .copied()
                .unwrap_or(cfg.history_limit);
            let rows = engine.history(user.id, limit)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                let data = rows
                    .into_iter()
                    .map(|r| {
                        vec![
                            r.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                            r.intent.map(|i| i.to_string()).unwrap_or_default(),
                            r.user_message,
                            r.bot_response,
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["When", "Intent", "You", "Assistant"], data)
                );
            }
        }
        Some(("repl", _)) => repl(&engine, cfg, user)?,
        _ => {}
    }
    Ok(())
}

/// Validate, answer and record one message. A history write failure still
/// yields the computed reply, with a warning.
pub fn ask(engine: &QueryEngine<'_>, cfg: &Config, user: &User, message: &str) -> Result<ChatReply> {
    cfg.validate_message(message)?;
    match engine.process(user.id, message) {
        Ok(reply) => Ok(reply),
        Err(Error::HistoryWrite { reply, source }) => {
            warn!(error = %source, "reply not saved to history");
            Ok(*reply)
        }
        Err(e) => Err(e.into()),
    }
}

fn repl(engine: &QueryEngine<'_>, cfg: &Config, user: &User) -> Result<()> {
    let stdin = io::stdin();
    let mut out = io::stdout();
    write!(out, "Hi {}! Ask me about your money (exit to quit).\n> ", user.full_name)?;
    out.flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
            break;
        }
        if !trimmed.is_empty() {
            match ask(engine, cfg, user, &line) {
                Ok(reply) => writeln!(out, "{}\n", reply.bot_response)?,
                Err(e) => writeln!(out, "{}\n", e)?,
            }
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    Ok(())
}
