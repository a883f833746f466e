// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

use crate::history::{HistoryStore, SqliteHistory};
use crate::ledger::{SqliteLedger, TransactionFilter};
use crate::models::User;

pub fn handle(conn: &Connection, user: &User, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, user, sub),
        Some(("history", sub)) => export_history(conn, user, sub),
        _ => Ok(()),
    }
}

fn target(sub: &clap::ArgMatches) -> (String, &String) {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    (fmt, out)
}

fn export_transactions(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let (fmt, out) = target(sub);
    let ledger = SqliteLedger::new(conn);
    let mut rows = Vec::new();
    let mut skip = 0;
    loop {
        let page = ledger.list(
            user.id,
            &TransactionFilter {
                skip,
                ..Default::default()
            },
        )?;
        let n = page.len();
        rows.extend(page);
        if n < TransactionFilter::default().limit {
            break;
        }
        skip += n;
    }
    // Oldest first reads naturally in a spreadsheet.
    rows.reverse();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["id", "date", "type", "amount", "category", "description"])?;
            for t in &rows {
                wtr.write_record([
                    t.id.to_string(),
                    t.date.format("%Y-%m-%d %H:%M:%S").to_string(),
                    t.tx_type.to_string(),
                    t.amount.to_string(),
                    t.category.clone(),
                    t.description.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = rows
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id,
                        "date": t.date.format("%Y-%m-%d %H:%M:%S").to_string(),
                        "type": t.tx_type,
                        "amount": t.amount.to_string(),
                        "category": t.category,
                        "description": t.description,
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}

fn export_history(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let (fmt, out) = target(sub);
    let mut rows = SqliteHistory::new(conn).query_by_user(user.id, i64::MAX as usize)?;
    rows.reverse();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["id", "created_at", "intent", "user_message", "bot_response"])?;
            for r in &rows {
                wtr.write_record([
                    r.id.to_string(),
                    r.created_at.to_rfc3339(),
                    r.intent.map(|i| i.to_string()).unwrap_or_default(),
                    r.user_message.clone(),
                    r.bot_response.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&rows)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported {} chat messages to {}", rows.len(), out);
    Ok(())
}
