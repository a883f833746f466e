// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{SqliteLedger, TransactionFilter};
use crate::models::{NewTransaction, Transaction, TransactionPatch, TxType, User};
use crate::utils::{fmt_money, maybe_print_json, parse_datetime, parse_decimal, pretty_table};
use anyhow::Result;
use chrono::Local;
use rusqlite::Connection;

pub fn handle(conn: &Connection, user: &User, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, user, sub)?,
        Some(("list", sub)) => list(conn, user, sub)?,
        Some(("show", sub)) => show(conn, user, sub)?,
        Some(("update", sub)) => update(conn, user, sub)?,
        Some(("rm", sub)) => remove(conn, user, sub)?,
        Some(("summary", sub)) => summary(conn, user, sub)?,
        _ => {}
    }
    Ok(())
}

fn opt_str(sub: &clap::ArgMatches, id: &str) -> Option<String> {
    sub.get_one::<String>(id).map(|s| s.trim().to_string())
}

fn add(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let tx_type: TxType = sub.get_one::<String>("type").unwrap().parse()?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let description = opt_str(sub, "description").filter(|d| !d.is_empty());
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_datetime(d)?,
        None => Local::now().naive_local(),
    };

    let tx = SqliteLedger::new(conn).insert(
        user.id,
        &NewTransaction {
            amount,
            tx_type,
            category,
            description,
            date,
        },
    )?;
    println!(
        "Recorded {} {} #{} in '{}' on {}",
        tx.tx_type,
        fmt_money(&tx.amount),
        tx.id,
        tx.category,
        tx.date.format("%Y-%m-%d")
    );
    Ok(())
}

pub fn query_rows(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let tx_type = match sub.get_one::<String>("type") {
        Some(t) => Some(t.parse::<TxType>()?),
        None => None,
    };
    let filter = TransactionFilter {
        tx_type,
        category: opt_str(sub, "category"),
        skip: *sub.get_one::<usize>("skip").unwrap_or(&0),
        limit: sub.get_one::<u16>("limit").map(|l| *l as usize).unwrap_or(100),
    };
    Ok(SqliteLedger::new(conn).list(user.id, &filter)?)
}

fn rows_for_table(data: &[Transaction]) -> Vec<Vec<String>> {
    data.iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.date.format("%Y-%m-%d %H:%M").to_string(),
                t.tx_type.to_string(),
                fmt_money(&t.amount),
                t.category.clone(),
                t.description.clone().unwrap_or_default(),
            ]
        })
        .collect()
}

const HEADERS: [&str; 6] = ["ID", "Date", "Type", "Amount", "Category", "Description"];

fn list(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, user, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!("{}", pretty_table(&HEADERS, rows_for_table(&data)));
    }
    Ok(())
}

fn show(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let tx = SqliteLedger::new(conn).get(user.id, id)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &tx)? {
        println!("{}", pretty_table(&HEADERS, rows_for_table(&[tx])));
    }
    Ok(())
}

pub fn patch_from(sub: &clap::ArgMatches) -> Result<TransactionPatch> {
    Ok(TransactionPatch {
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        tx_type: sub
            .get_one::<String>("type")
            .map(|s| s.parse::<TxType>())
            .transpose()?,
        category: opt_str(sub, "category"),
        description: opt_str(sub, "description"),
        date: sub
            .get_one::<String>("date")
            .map(|s| parse_datetime(s))
            .transpose()?,
    })
}

fn update(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let patch = patch_from(sub)?;
    if patch.is_empty() {
        println!("Nothing to update for #{}", id);
        return Ok(());
    }
    let tx = SqliteLedger::new(conn).update(user.id, id, &patch)?;
    println!(
        "Updated #{}: {} {} in '{}'",
        tx.id,
        tx.tx_type,
        fmt_money(&tx.amount),
        tx.category
    );
    Ok(())
}

fn remove(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    SqliteLedger::new(conn).delete(user.id, id)?;
    println!("Removed transaction #{}", id);
    Ok(())
}

fn summary(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let s = SqliteLedger::new(conn).summary(user.id)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        let rows = vec![
            vec!["Total income".into(), fmt_money(&s.total_income)],
            vec!["Total expenses".into(), fmt_money(&s.total_expenses)],
            vec!["Net savings".into(), fmt_money(&s.net_savings)],
            vec!["Transactions".into(), s.transaction_count.to_string()],
        ];
        println!("{}", pretty_table(&["Metric", "Value"], rows));
    }
    Ok(())
}
