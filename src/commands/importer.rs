// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::app::App;
use crate::import;

pub async fn handle(app: &App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(app, sub).await,
        _ => Ok(()),
    }
}

async fn import_transactions(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Open CSV {}", path))?;

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    let report = import::import_csv(&app.store, &text, |pct| bar.set_position(pct as u64)).await;
    bar.finish_and_clear();

    for line in &report.log {
        println!("{}", line);
    }
    app.deletes.refresh().await;
    Ok(())
}
