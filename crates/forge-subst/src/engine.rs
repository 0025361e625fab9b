// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! Evaluation of a single [`FullVariable`] against a [`State`] (spec.md
//! §4.2).

use forge_foundation::{FullVariable, VariableValue};
use forge_schema::{doc, BuildConfig};
use forge_storage::State;

use crate::error::{Error, Result};

/// Evaluate `var` against `state`, per spec.md §4.2:
///
/// - `enable` yields `"enable"`/`"disable"` depending on install status.
/// - `installed` yields a `Bool`.
/// - anything else requires the package to be installed; its `BuildConfig`
///   is loaded and the variable looked up globally or in the named
///   section.
pub fn evaluate(state: &State, var: &FullVariable) -> Result<VariableValue> {
    let installed = state.installed_version(var.pkg()).is_some();

    match var.var() {
        "enable" => {
            return Ok(VariableValue::String(
                if installed { "enable" } else { "disable" }.to_owned(),
            ));
        }
        "installed" => return Ok(VariableValue::Bool(installed)),
        _ => {}
    }

    if !installed {
        return Err(Error::NotInstalled(var.pkg().clone()));
    }

    let config_path = state.switch_paths().package_config(var.pkg());
    let config: BuildConfig = doc::read(&config_path)?;

    config
        .lookup(var.section(), var.var())
        .cloned()
        .ok_or_else(|| Error::UnknownVariable(var.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_foundation::{Alias, CompilerVersion, Nv, PkgName, RepoAddress, RepoKind, Repository, Section};
    use forge_schema::{AliasMap, GlobalConfig, Installed, SectionConfig, FORMAT_VERSION};
    use forge_storage::GlobalPaths;
    use tempfile::tempdir;

    fn minimal_root(root: &std::path::Path) -> Nv {
        let global = GlobalPaths::new(root);
        let alias = Alias::new("sys").unwrap();
        let compiler = CompilerVersion::new("5.1").unwrap();

        let mut aliases = AliasMap::default();
        aliases.insert(alias.clone(), compiler);
        doc::write(&global.aliases(), &aliases).unwrap();

        let config = GlobalConfig {
            format_version: FORMAT_VERSION.to_string(),
            repos: vec![Repository {
                name: forge_foundation::RepoName::new("default").unwrap(),
                address: RepoAddress::new("file:///tmp/repo"),
                kind: RepoKind::Local,
            }],
            current_alias: alias.clone(),
            workers: 4,
        };
        doc::write(&global.config(), &config).unwrap();

        let switch = global.switch(&alias);
        let nv: Nv = "foo.1".parse().unwrap();
        let mut installed = Installed::default();
        installed.insert(nv.clone()).unwrap();
        doc::write(&switch.installed(), &installed).unwrap();

        let mut build = BuildConfig::default();
        build
            .variables
            .insert("prefix".into(), VariableValue::String("/opt/foo".into()));
        let sect = Section::new("lib-foo").unwrap();
        let mut sc = SectionConfig::default();
        sc.variables.insert("include".into(), VariableValue::Bool(true));
        build.sections.insert(sect, sc);
        doc::write(&switch.package_config(&PkgName::new("foo").unwrap()), &build).unwrap();

        nv
    }

    #[test]
    fn enable_reflects_install_status() {
        let dir = tempdir().unwrap();
        minimal_root(dir.path());
        let state = State::load(dir.path()).unwrap();

        let foo_enable: FullVariable = "foo:enable".parse().unwrap();
        assert_eq!(
            evaluate(&state, &foo_enable).unwrap(),
            VariableValue::String("enable".into())
        );

        let bar_enable: FullVariable = "bar:enable".parse().unwrap();
        assert_eq!(
            evaluate(&state, &bar_enable).unwrap(),
            VariableValue::String("disable".into())
        );
    }

    #[test]
    fn global_variable_reads_build_config() {
        let dir = tempdir().unwrap();
        minimal_root(dir.path());
        let state = State::load(dir.path()).unwrap();

        let var: FullVariable = "foo:prefix".parse().unwrap();
        assert_eq!(
            evaluate(&state, &var).unwrap(),
            VariableValue::String("/opt/foo".into())
        );
    }

    #[test]
    fn section_variable_reads_local_scope() {
        let dir = tempdir().unwrap();
        minimal_root(dir.path());
        let state = State::load(dir.path()).unwrap();

        let var: FullVariable = "foo:lib-foo:include".parse().unwrap();
        assert_eq!(evaluate(&state, &var).unwrap(), VariableValue::Bool(true));
    }

    #[test]
    fn missing_variable_is_unknown() {
        let dir = tempdir().unwrap();
        minimal_root(dir.path());
        let state = State::load(dir.path()).unwrap();

        let var: FullVariable = "foo:nope".parse().unwrap();
        match evaluate(&state, &var) {
            Err(Error::UnknownVariable(_)) => {}
            other => panic!("expected UnknownVariable, got {other:?}"),
        }
    }

    #[test]
    fn uninstalled_package_variable_errors() {
        let dir = tempdir().unwrap();
        minimal_root(dir.path());
        let state = State::load(dir.path()).unwrap();

        let var: FullVariable = "bar:prefix".parse().unwrap();
        match evaluate(&state, &var) {
            Err(Error::NotInstalled(_)) => {}
            other => panic!("expected NotInstalled, got {other:?}"),
        }
    }
}
