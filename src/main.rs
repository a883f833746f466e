// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use ledgerchat::{cli, commands, config::Config, db, users};

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();

    // RUST_LOG wins over --verbose; default stays quiet so answers are readable.
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if matches.get_flag("verbose") {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr).compact())
        .init();

    let cfg = Config::from_matches(&matches)?;
    let conn = db::open_or_init(&cfg.db_path)?;
    let user_email = matches.get_one::<String>("user").map(|s| s.as_str());

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", cfg.db_path.display());
        }
        Some(("user", sub)) => commands::users::handle(&conn, sub)?,
        Some(("tx", sub)) => {
            let user = users::authenticate(&conn, user_email)?;
            commands::transactions::handle(&conn, &user, sub)?
        }
        Some(("chat", sub)) => {
            let user = users::authenticate(&conn, user_email)?;
            commands::chat::handle(&conn, &cfg, &user, sub)?
        }
        Some(("export", sub)) => {
            let user = users::authenticate(&conn, user_email)?;
            commands::exporter::handle(&conn, &user, sub)?
        }
        Some(("seed", sub)) => {
            let user = users::authenticate(&conn, user_email)?;
            commands::seed::handle(&conn, &user, sub)?
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
