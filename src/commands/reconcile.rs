// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::app::App;
use crate::utils::pretty_table;

pub async fn handle(app: &App) -> Result<()> {
    let accounts = app.store.accounts.list().await;
    let report = app.reconciler.reconcile(&accounts).await;

    let data = report
        .outcomes
        .iter()
        .map(|o| {
            vec![
                o.account.to_string(),
                o.name.clone(),
                o.action.label().to_string(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Id", "Account", "Action"], data));

    for err in &report.errors {
        eprintln!("reconcile: {}", err);
    }
    println!(
        "{} accounts checked, {} writes, {} errors",
        report.outcomes.len(),
        report.writes(),
        report.errors.len()
    );
    Ok(())
}
