// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! Logging setup, adapted from `spk-cli/common::env::configure_logging`: a
//! verbosity-tiered `EnvFilter`, layered under an explicit `FORGE_LOG` override.

use tracing_subscriber::layer::SubscriberExt;

use crate::error::{Error, Result};

pub fn configure_logging(verbosity: u8) -> Result<()> {
    let mut directives = match verbosity {
        0 => "forge=info",
        1 => "forge=debug",
        2 => "forge=trace",
        _ => "forge=trace,forge_exec=trace,forge_solve=trace",
    }
    .to_string();

    if let Ok(overrides) = std::env::var("FORGE_LOG") {
        directives = overrides;
    }

    let env_filter = tracing_subscriber::filter::EnvFilter::new(directives);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(verbosity >= 2);
    let subscriber = tracing_subscriber::Registry::default().with(env_filter).with(fmt_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Write(std::path::PathBuf::from("(logger)"), std::io::Error::other(e)))
}
