// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn tx_type_arg(required: bool) -> Arg {
    Arg::new("type")
        .long("type")
        .short('t')
        .required(required)
        .value_parser(["income", "expense"])
        .help("income | expense")
}

pub fn build_cli() -> Command {
    Command::new("ledgerchat")
        .version(clap::crate_version!())
        .about("Ask plain-English questions about your income and expense ledger")
        .arg(
            Arg::new("db")
                .long("db")
                .env("LEDGERCHAT_DB")
                .global(true)
                .help("SQLite database path (defaults to the platform data dir)"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .short('u')
                .env("LEDGERCHAT_USER")
                .global(true)
                .help("Email of the registered user to act as"),
        )
        .arg(
            Arg::new("vocab")
                .long("vocab")
                .global(true)
                .help("JSON file overriding chat keyword tables"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("user")
                .about("Manage users")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(Command::new("list")),
        )
        .subcommand(
            Command::new("tx")
                .about("Manage transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(tx_type_arg(true))
                        .arg(Arg::new("category").long("category").short('c').required(true))
                        .arg(Arg::new("description").long("description").short('d'))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("YYYY-MM-DD or YYYY-MM-DD HH:MM[:SS]; defaults to now"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(tx_type_arg(false))
                        .arg(Arg::new("category").long("category").short('c'))
                        .arg(
                            Arg::new("skip")
                                .long("skip")
                                .value_parser(value_parser!(usize))
                                .default_value("0"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(u16).range(1..=100))
                                .default_value("100"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("show").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ))
                .subcommand(
                    Command::new("update")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("amount").long("amount"))
                        .arg(tx_type_arg(false))
                        .arg(Arg::new("category").long("category").short('c'))
                        .arg(Arg::new("description").long("description").short('d'))
                        .arg(Arg::new("date").long("date")),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                )
                .subcommand(json_flags(Command::new("summary"))),
        )
        .subcommand(
            Command::new("chat")
                .about("Talk to the ledger assistant")
                .subcommand(
                    Command::new("ask")
                        .arg(
                            Arg::new("message")
                                .required(true)
                                .num_args(1..)
                                .trailing_var_arg(true),
                        )
                        .arg(
                            Arg::new("json")
                                .long("json")
                                .action(ArgAction::SetTrue)
                                .help("Print the full reply as JSON"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("history").arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize)),
                    ),
                ))
                .subcommand(Command::new("repl").about("Read questions from stdin until EOF")),
        )
        .subcommand(
            Command::new("export")
                .about("Export the current user's data")
                .subcommand(export_target("transactions"))
                .subcommand(export_target("history")),
        )
        .subcommand(
            Command::new("seed")
                .about("Insert a sample ledger for the current user")
                .arg(
                    Arg::new("months")
                        .long("months")
                        .value_parser(value_parser!(u32).range(1..=24))
                        .default_value("3"),
                ),
        )
}

fn export_target(name: &'static str) -> Command {
    Command::new(name)
        .arg(
            Arg::new("format")
                .long("format")
                .value_parser(["csv", "json"])
                .default_value("csv"),
        )
        .arg(Arg::new("out").long("out").required(true))
}
