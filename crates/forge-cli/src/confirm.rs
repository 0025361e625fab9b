// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! The interactive y/n confirmation prompt backing `forge_exec::Confirm`
//! for a real terminal, gated off by the global `--yes` flag.

use std::io::Write;

use async_trait::async_trait;
use forge_exec::Confirm;

#[derive(Clone, Copy, Debug, Default)]
pub struct StdinConfirm;

#[async_trait]
impl Confirm for StdinConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        loop {
            print!("{prompt} [y/N] ");
            if std::io::stdout().flush().is_err() {
                return false;
            }
            let mut line = String::new();
            if std::io::stdin().read_line(&mut line).is_err() {
                return false;
            }
            match line.trim().to_lowercase().as_str() {
                "y" | "yes" => return true,
                "n" | "no" | "" => return false,
                _ => println!("please answer y or n"),
            }
        }
    }
}
