// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use crate::app::App;
use crate::models::SettingsPatch;
use crate::utils::pretty_table;

pub async fn handle(app: &App, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let s = app.settings.get();
            let order = s
                .account_order
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(",");
            let data = vec![
                vec!["number-format".to_string(), s.number_format],
                vec!["main-currency".to_string(), s.main_currency],
                vec!["fx-provider".to_string(), s.fx_provider],
                vec!["account-order".to_string(), order],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], data));
        }
        Some(("set", sub)) => {
            let account_order = sub
                .get_one::<String>("account-order")
                .map(|raw| {
                    raw.split(',')
                        .filter(|s| !s.trim().is_empty())
                        .map(|s| {
                            s.trim()
                                .parse::<i64>()
                                .with_context(|| format!("Invalid account id '{}'", s))
                        })
                        .collect::<Result<Vec<i64>>>()
                })
                .transpose()?;
            let patch = SettingsPatch {
                number_format: sub.get_one::<String>("number-format").cloned(),
                main_currency: sub.get_one::<String>("main-currency").map(|s| s.to_uppercase()),
                fx_provider: sub.get_one::<String>("fx-provider").cloned(),
                account_order,
            };
            app.settings.set(patch);
            app.settings.flush().await;
            println!("Settings updated");
        }
        _ => {}
    }
    Ok(())
}
