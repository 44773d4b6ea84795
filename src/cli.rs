// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn flag(name: &'static str, long: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(long).help(help).action(ArgAction::SetTrue)
}

pub fn build_cli() -> Command {
    Command::new("ledgerline")
        .version(crate_version!())
        .about("Multi-account, multi-currency ledger with starting-balance reconciliation")
        .subcommand(Command::new("init").about("Initialize the data file"))
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .about("Add an account (triggers a reconcile pass)")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("currency").long("currency").default_value("EUR"))
                        .arg(Arg::new("tag").long("tag").default_value("bank"))
                        .arg(Arg::new("color").long("color"))
                        .arg(
                            Arg::new("starting-balance")
                                .long("starting-balance")
                                .default_value("0"),
                        ),
                )
                .subcommand(Command::new("list").about("List accounts with derived balances"))
                .subcommand(
                    Command::new("set")
                        .about("Edit an account (triggers a reconcile pass)")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("currency").long("currency"))
                        .arg(Arg::new("tag").long("tag"))
                        .arg(Arg::new("color").long("color"))
                        .arg(Arg::new("starting-balance").long("starting-balance"))
                        .arg(Arg::new("rename").long("rename")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove an account (blocked while entries reference it)")
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("kind").long("kind").default_value("expense"))
                        .arg(Arg::new("color").long("color")),
                )
                .subcommand(Command::new("list"))
                .subcommand(
                    Command::new("rename")
                        .about("Rename a category; colliding names require --merge")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("new-name").required(true))
                        .arg(Arg::new("kind").long("kind").default_value("expense"))
                        .arg(flag("merge", "merge", "Merge into an existing category"))
                        .arg(flag("yes", "yes", "Skip the merge confirmation prompt")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove a category (blocked while entries use it)")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("kind").long("kind").default_value("expense")),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Manage ledger entries")
                .subcommand(
                    Command::new("add")
                        .about("Add an income or expense entry")
                        .arg(Arg::new("kind").required(true).value_parser(["expense", "income"]))
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category").default_value(""))
                        .arg(Arg::new("subcategory").long("subcategory").default_value(""))
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("notes").long("notes").default_value(""))
                        .arg(flag("cleared", "cleared", "Mark as settled"))
                        .arg(flag("projected", "projected", "Mark as planned"))
                        .arg(flag("important", "important", "Budget-priority flag")),
                )
                .subcommand(
                    Command::new("transfer")
                        .about("Add a transfer between two accounts")
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("dest-amount")
                                .long("dest-amount")
                                .help("Amount in the destination currency (required across currencies)"),
                        )
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("notes").long("notes").default_value(""))
                        .arg(flag("cleared", "cleared", "Mark as settled"))
                        .arg(flag("projected", "projected", "Mark as planned")),
                )
                .subcommand(
                    Command::new("list")
                        .about("List entries, most recent first")
                        .arg(Arg::new("account").long("account")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete an entry with an undo window")
                        .arg(Arg::new("id").required(true))
                        .arg(flag("now", "now", "Delete immediately, no undo window")),
                )
                .subcommand(
                    Command::new("clear-all")
                        .about("Delete every ledger entry (asks twice)")
                        .arg(
                            Arg::new("yes")
                                .long("yes")
                                .action(ArgAction::Count)
                                .help("Pass twice to skip both confirmations"),
                        ),
                ),
        )
        .subcommand(
            Command::new("import").about("Import data").subcommand(
                Command::new("transactions")
                    .about("Import ledger entries from CSV")
                    .arg(Arg::new("path").long("path").required(true)),
            ),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .about("Export ledger entries to CSV")
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(Command::new("reconcile").about("Run a starting-balance reconciliation pass"))
        .subcommand(
            Command::new("report")
                .about("Balance reports")
                .subcommand(
                    Command::new("balances")
                        .arg(Arg::new("as-of").long("as-of"))
                        .arg(Arg::new("basis").long("basis").default_value("settled")),
                )
                .subcommand(
                    Command::new("networth")
                        .arg(Arg::new("as-of").long("as-of"))
                        .arg(Arg::new("basis").long("basis").default_value("settled")),
                )
                .subcommand(
                    Command::new("running")
                        .arg(Arg::new("account").required(true)),
                ),
        )
        .subcommand(
            Command::new("settings")
                .about("User preferences")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("number-format").long("number-format"))
                        .arg(Arg::new("main-currency").long("main-currency"))
                        .arg(Arg::new("fx-provider").long("fx-provider"))
                        .arg(
                            Arg::new("account-order")
                                .long("account-order")
                                .help("Comma-separated account ids"),
                        ),
                ),
        )
        .subcommand(Command::new("doctor").about("Read-only ledger integrity report"))
}
