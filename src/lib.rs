// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod app;
pub mod balance;
pub mod cli;
pub mod commands;
pub mod import;
pub mod models;
pub mod reconcile;
pub mod settings;
pub mod store;
pub mod undo;
pub mod utils;
