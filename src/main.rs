// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use ledgerline::{app::App, cli, commands, store};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let app = App::open().await?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Data file initialized at {}", store::data_path()?.display());
        }
        Some(("account", sub)) => commands::accounts::handle(&app, sub).await?,
        Some(("category", sub)) => commands::categories::handle(&app, sub).await?,
        Some(("tx", sub)) => commands::transactions::handle(&app, sub).await?,
        Some(("import", sub)) => commands::importer::handle(&app, sub).await?,
        Some(("export", sub)) => commands::exporter::handle(&app, sub).await?,
        Some(("reconcile", _)) => commands::reconcile::handle(&app).await?,
        Some(("report", sub)) => commands::reports::handle(&app, sub).await?,
        Some(("settings", sub)) => commands::settings::handle(&app, sub).await?,
        Some(("doctor", _)) => commands::doctor::handle(&app).await?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }

    app.shutdown().await?;
    Ok(())
}
