// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! The switch manager: creates, selects, and bootstraps switches (spec.md
//! §2 component 8, §4.6).

mod base;
mod bootstrap;
mod error;
mod init;
mod switch;

pub use base::base_package_name;
pub use error::{Error, Result};
pub use init::{init, init_switch};
pub use switch::switch;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use forge_exec::AlwaysYes;
    use forge_foundation::{Alias, CompilerVersion, RepoAddress, RepoKind, RepoName, Repository};
    use forge_schema::{CompilerDescr, doc};
    use forge_storage::{GlobalPaths, State};
    use tempfile::tempdir;

    use super::*;

    fn local_repo(name: &str, source: &std::path::Path) -> Repository {
        Repository {
            name: RepoName::new(name).unwrap(),
            address: RepoAddress::new(source.to_string_lossy().to_string()),
            kind: RepoKind::Local,
        }
    }

    fn write_preinstalled_compiler(source: &std::path::Path, version: &str) {
        let compilers_dir = source.join("compilers");
        std::fs::create_dir_all(&compilers_dir).unwrap();
        let descr = CompilerDescr {
            version: CompilerVersion::new(version).unwrap(),
            preinstalled: true,
            ..Default::default()
        };
        doc::write(&compilers_dir.join(format!("{version}.comp")), &descr).unwrap();
    }

    #[tokio::test]
    async fn init_creates_a_working_root_with_a_base_package() {
        let root_dir = tempdir().unwrap();
        let source_dir = tempdir().unwrap();
        write_preinstalled_compiler(source_dir.path(), "5.1");

        let alias = Alias::new("sys").unwrap();
        let compiler = CompilerVersion::new("5.1").unwrap();
        let repo = local_repo("default", source_dir.path());

        init(root_dir.path(), alias.clone(), compiler.clone(), repo, 2)
            .await
            .unwrap();

        let state = State::load(root_dir.path()).unwrap();
        assert_eq!(state.current_alias(), &alias);
        assert_eq!(state.installed().len(), 1);
        assert_eq!(
            state.installed_version(&base_package_name()).unwrap().as_str(),
            "5.1"
        );
    }

    #[tokio::test]
    async fn init_is_rejected_over_an_existing_root() {
        let root_dir = tempdir().unwrap();
        let source_dir = tempdir().unwrap();
        write_preinstalled_compiler(source_dir.path(), "5.1");

        let alias = Alias::new("sys").unwrap();
        let compiler = CompilerVersion::new("5.1").unwrap();

        init(root_dir.path(), alias.clone(), compiler.clone(), local_repo("default", source_dir.path()), 1)
            .await
            .unwrap();

        match init(root_dir.path(), alias, compiler, local_repo("default", source_dir.path()), 1).await {
            Err(Error::AlreadyInitialized(_)) => {}
            other => panic!("expected AlreadyInitialized, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn init_rolls_back_the_root_when_the_compiler_has_no_source() {
        let root_dir = tempdir().unwrap();
        let source_dir = tempdir().unwrap();
        // No compilers/ entry at all: CompilerDescr defaults to
        // preinstalled = false with no source_url, so bootstrap fails and
        // init must erase the root directory it created.
        std::fs::create_dir_all(source_dir.path().join("packages")).unwrap();

        let alias = Alias::new("sys").unwrap();
        let compiler = CompilerVersion::new("9.9").unwrap();
        let repo = local_repo("default", source_dir.path());

        let result = init(root_dir.path(), alias, compiler, repo, 1).await;
        assert!(result.is_err());
        assert!(!root_dir.path().join("config").exists());
    }

    #[tokio::test]
    async fn switch_clone_carries_forward_the_previous_installed_set() {
        let root_dir = tempdir().unwrap();
        let source_dir = tempdir().unwrap();
        write_preinstalled_compiler(source_dir.path(), "5.1");
        write_preinstalled_compiler(source_dir.path(), "5.2");

        let sys = Alias::new("sys").unwrap();
        let compiler_a = CompilerVersion::new("5.1").unwrap();
        init(root_dir.path(), sys.clone(), compiler_a, local_repo("default", source_dir.path()), 1)
            .await
            .unwrap();

        let dev = Alias::new("dev").unwrap();
        let compiler_b = CompilerVersion::new("5.2").unwrap();
        switch(root_dir.path(), true, dev.clone(), compiler_b, Arc::new(AlwaysYes))
            .await
            .unwrap();

        let state = State::load(root_dir.path()).unwrap();
        assert_eq!(state.current_alias(), &dev);
        assert_eq!(
            state.installed_version(&base_package_name()).unwrap().as_str(),
            "5.2"
        );

        // sys's own switch is untouched by dev's creation.
        let global = GlobalPaths::new(root_dir.path());
        let sys_installed: forge_schema::Installed =
            doc::read(&global.switch(&sys).installed()).unwrap();
        assert_eq!(
            sys_installed.version_of(&base_package_name()).unwrap().as_str(),
            "5.1"
        );
    }

    #[test]
    fn global_paths_smoke() {
        let paths = GlobalPaths::new("/tmp/forge-root");
        assert_eq!(paths.root(), std::path::Path::new("/tmp/forge-root"));
    }
}
