// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::users;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let email = sub.get_one::<String>("email").unwrap();
            let name = sub.get_one::<String>("name").unwrap();
            let user = users::register(conn, email, name)?;
            println!("Added user '{}' <{}>", user.full_name, user.email);
        }
        Some(("list", _)) => {
            let data = users::list(conn)?
                .into_iter()
                .map(|u| {
                    vec![
                        u.email,
                        u.full_name,
                        u.created_at.format("%Y-%m-%d").to_string(),
                    ]
                })
                .collect();
            println!("{}", pretty_table(&["Email", "Name", "Created"], data));
        }
        _ => {}
    }
    Ok(())
}
