// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! Process-level settings: where the forge root lives, and defaults used
//! only at `init` time. See SPEC_FULL.md §A.3 for why this is kept
//! separate from the persisted, versioned `GlobalConfig` of spec.md §3.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::Result;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Cli {
    /// Default worker count handed to a freshly-`init`ed `GlobalConfig`.
    pub default_workers: usize,
    /// Whether to colorize CLI output by default.
    pub color: bool,
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            default_workers: 4,
            color: true,
        }
    }
}

/// Ambient configuration for the `forge` binary, loaded once at startup.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub cli: Cli,
}

impl Settings {
    /// Load settings from the built-in default, `~/.config/forge/forge.toml`
    /// if present, and `FORGE_<SECTION>_<KEY>` environment overrides, in
    /// that order of increasing precedence — the same three tiers
    /// `spk_config::load_config` uses for `spk`.
    pub fn load() -> Result<Self> {
        use config::{Config as RawConfig, File};

        let mut builder = RawConfig::builder();
        if let Some(dir) = dirs::config_dir() {
            let path = dir.join("forge").join("forge.toml");
            builder = builder.add_source(File::from(path).required(false));
        }

        for (var, value) in std::env::vars() {
            let Some(tail) = var.strip_prefix("FORGE_") else {
                continue;
            };
            let Some((section, name)) = tail.split_once('_') else {
                continue;
            };
            if section.eq_ignore_ascii_case("root") || section.eq_ignore_ascii_case("home") {
                // FORGE_ROOT / FORGE_HOME are consumed directly by
                // `resolve_root`, not as a `Settings` field.
                continue;
            }
            let key = format!("{}.{}", section.to_lowercase(), name.to_lowercase());
            builder = builder.set_override(key, value)?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Resolve the forge root directory: `$FORGE_ROOT`, else `$FORGE_HOME`,
    /// else `~/.forge`.
    pub fn resolve_root() -> Result<PathBuf> {
        if let Ok(root) = std::env::var("FORGE_ROOT") {
            return Ok(PathBuf::from(root));
        }
        if let Ok(home) = std::env::var("FORGE_HOME") {
            return Ok(PathBuf::from(home));
        }
        dirs::home_dir()
            .map(|h| h.join(".forge"))
            .ok_or(crate::Error::NoConfigDir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_root_honors_forge_root() {
        // SAFETY: test-only env mutation, no other thread in this test
        // binary reads FORGE_ROOT concurrently.
        unsafe {
            std::env::set_var("FORGE_ROOT", "/tmp/example-forge-root");
        }
        assert_eq!(
            Settings::resolve_root().unwrap(),
            PathBuf::from("/tmp/example-forge-root")
        );
        unsafe {
            std::env::remove_var("FORGE_ROOT");
        }
    }

    #[test]
    fn default_cli_settings() {
        let s = Settings::default();
        assert_eq!(s.cli.default_workers, 4);
        assert!(s.cli.color);
    }
}
