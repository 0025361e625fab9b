// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! The action executor: turns a [`forge_solve::Solution`] into on-disk
//! reality (spec.md §2 component 5, §4.5 "Action executor").

mod archive;
mod confirm;
mod env;
mod error;
mod install;
mod process;
mod remove;
mod scheduler;

pub use confirm::{AlwaysYes, Confirm};
pub use env::{compose_env, persist_env, Env};
pub use error::{Error, Result};
pub use install::install_one_nv;
pub use remove::remove_one_nv;
pub use scheduler::execute;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use forge_foundation::{Alias, CompilerVersion, Nv, RepoAddress, RepoKind, RepoName, Repository};
    use forge_schema::{doc, AliasMap, GlobalConfig, Installed, FORMAT_VERSION};
    use forge_solve::{Action, ActionNode, Solution};
    use forge_storage::GlobalPaths;
    use tempfile::tempdir;

    use super::*;

    fn init_root(root: &std::path::Path) {
        let global = GlobalPaths::new(root);
        let alias = Alias::new("sys").unwrap();
        let compiler = CompilerVersion::new("5.1").unwrap();

        let mut aliases = AliasMap::default();
        aliases.insert(alias.clone(), compiler);
        doc::write(&global.aliases(), &aliases).unwrap();

        let config = GlobalConfig {
            format_version: FORMAT_VERSION.to_string(),
            repos: vec![Repository {
                name: RepoName::new("default").unwrap(),
                address: RepoAddress::new("file:///tmp/repo"),
                kind: RepoKind::Local,
            }],
            current_alias: alias.clone(),
            workers: 2,
        };
        doc::write(&global.config(), &config).unwrap();

        let switch = global.switch(&alias);
        doc::write(&switch.installed(), &Installed::default()).unwrap();
        for dir in global.top_level_dirs().iter().chain(switch.top_level_dirs().iter()) {
            std::fs::create_dir_all(dir).unwrap();
        }
    }

    #[tokio::test]
    async fn execute_is_a_noop_on_an_empty_solution() {
        let dir = tempdir().unwrap();
        init_root(dir.path());
        let solution = Solution::default();
        execute(dir.path(), &solution, Arc::new(AlwaysYes)).await.unwrap();
    }

    #[tokio::test]
    async fn execute_fails_when_the_target_has_no_manifest() {
        let dir = tempdir().unwrap();
        init_root(dir.path());
        let nv: Nv = "missing.1".parse().unwrap();
        let solution = Solution {
            to_remove: vec![],
            to_add: vec![ActionNode {
                action: Action::Change { from: None, to: nv },
                depends_on: vec![],
            }],
        };
        assert!(execute(dir.path(), &solution, Arc::new(AlwaysYes)).await.is_err());
    }
}
