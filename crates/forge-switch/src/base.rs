// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! The synthetic "compiler-config" package (spec.md §4.6 `init_switch`):
//! carries the switch's prefix/lib/bin/doc variables under the sentinel
//! package name `base`, so `%{base:prefix}%`-style substitutions resolve
//! the same way a real package's variables would.

use forge_foundation::{CompilerVersion, Nv, PkgName, PkgVersion, VariableValue};
use forge_schema::{doc, BuildConfig, InstallDescriptor};
use forge_storage::SwitchPaths;

use crate::error::Result;

pub fn base_package_name() -> PkgName {
    PkgName::new("base").expect("\"base\" is a valid package name")
}

/// Write `base`'s synthetic `BuildConfig`/`InstallDescriptor` and return its
/// NV (the switch's compiler version, reused as `base`'s version so it
/// changes whenever the switch is rebuilt against a different compiler).
pub fn install_base_package(switch: &SwitchPaths, compiler_version: &CompilerVersion) -> Result<Nv> {
    let pkg = base_package_name();
    let version = PkgVersion::new(compiler_version.as_str())?;
    let nv = Nv::new(pkg.clone(), version);

    let mut config = BuildConfig::default();
    config.variables.insert("prefix".into(), VariableValue::String(switch.root().display().to_string()));
    config.variables.insert(
        "lib".into(),
        VariableValue::String(switch.root().join("lib").display().to_string()),
    );
    config.variables.insert("bin".into(), VariableValue::String(switch.bin_dir().display().to_string()));
    config.variables.insert("doc".into(), VariableValue::String(switch.doc_dir().display().to_string()));

    doc::write(&switch.package_config(&pkg), &config)?;
    doc::write(&switch.package_install(&pkg), &InstallDescriptor::default())?;

    Ok(nv)
}
