// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! Environment composition for build/remove commands (spec.md §4.5(d)).

use std::collections::BTreeMap;
use std::path::Path;

use forge_schema::{CompilerDescr, EnvOpKind};

use crate::error::{Error, Result};

pub type Env = BTreeMap<String, String>;

/// Apply a compiler description's `env` block over the ambient process
/// environment, then prepend the switch's `bin/` to `PATH`.
///
/// Returns `(composed, ambient)` — `ambient` is the environment the build
/// would otherwise have inherited, persisted alongside the composed one for
/// debugging and rollback (spec.md §4.5(d)).
pub fn compose_env(compiler: &CompilerDescr, switch_bin: &Path) -> (Env, Env) {
    let ambient: Env = std::env::vars().collect();
    let mut env = ambient.clone();

    for op in &compiler.env {
        let current = env.get(&op.name).cloned().unwrap_or_default();
        let value = match op.op {
            EnvOpKind::Set => op.value.clone(),
            EnvOpKind::Prepend if current.is_empty() => op.value.clone(),
            EnvOpKind::Prepend => format!("{}:{current}", op.value),
            EnvOpKind::Append if current.is_empty() => op.value.clone(),
            EnvOpKind::Append => format!("{current}:{}", op.value),
        };
        env.insert(op.name.clone(), value);
    }

    let path = env.get("PATH").cloned().unwrap_or_default();
    let path = if path.is_empty() {
        switch_bin.display().to_string()
    } else {
        format!("{}:{path}", switch_bin.display())
    };
    env.insert("PATH".to_string(), path);

    (env, ambient)
}

/// Persist the composed and ambient environments to per-build files
/// (spec.md §4.5(d): "for debugging and rollback by scripts").
pub fn persist_env(build_dir: &Path, composed: &Env, ambient: &Env) -> Result<()> {
    write_env_file(&build_dir.join("env"), composed)?;
    write_env_file(&build_dir.join("env.prev"), ambient)
}

fn write_env_file(path: &Path, env: &Env) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::Write(parent.to_owned(), e))?;
    }
    let body: String = env.iter().map(|(k, v)| format!("{k}={v}\n")).collect();
    std::fs::write(path, body).map_err(|e| Error::Write(path.to_owned(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_schema::EnvOp;

    fn op(name: &str, kind: EnvOpKind, value: &str) -> EnvOp {
        EnvOp { name: name.to_string(), op: kind, value: value.to_string() }
    }

    #[test]
    #[serial_test::serial]
    fn prepend_colon_joins_existing_value() {
        std::env::set_var("FORGE_TEST_VAR", "old");
        let compiler = CompilerDescr {
            env: vec![op("FORGE_TEST_VAR", EnvOpKind::Prepend, "new")],
            ..Default::default()
        };
        let (composed, _) = compose_env(&compiler, Path::new("/switch/bin"));
        assert_eq!(composed.get("FORGE_TEST_VAR").unwrap(), "new:old");
    }

    #[test]
    #[serial_test::serial]
    fn set_replaces_value_entirely() {
        std::env::set_var("FORGE_TEST_SET", "old");
        let compiler = CompilerDescr {
            env: vec![op("FORGE_TEST_SET", EnvOpKind::Set, "new")],
            ..Default::default()
        };
        let (composed, _) = compose_env(&compiler, Path::new("/switch/bin"));
        assert_eq!(composed.get("FORGE_TEST_SET").unwrap(), "new");
    }

    #[test]
    fn path_is_prepended_with_switch_bin() {
        let compiler = CompilerDescr::default();
        let (composed, ambient) = compose_env(&compiler, Path::new("/switch/bin"));
        let path = composed.get("PATH").unwrap();
        assert!(path.starts_with("/switch/bin:") || path == "/switch/bin");
        assert_eq!(ambient.get("PATH"), std::env::var("PATH").ok().as_ref());
    }
}
