// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! Confirmation prompts, abstracted away from the executor itself.
//!
//! Library crates never read stdin or print directly (`forge-cli` is the
//! only place that does); the executor asks through this trait instead, so
//! `forge-cli` can back it with a real prompt and `--yes`/tests can back it
//! with [`AlwaysYes`].

use async_trait::async_trait;

#[async_trait]
pub trait Confirm: Send + Sync {
    /// Ask the user to approve `prompt`. Returning `false` aborts whatever
    /// step asked.
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Approves every prompt without asking: spec.md §6's `--yes`, and the
/// default for non-interactive callers and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysYes;

#[async_trait]
impl Confirm for AlwaysYes {
    async fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}
