// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! The repository backend capability interface and synchronizer (spec.md
//! §2 component 5, §4.3, §6 "Repository backend").

mod backend;
mod error;
mod sync;

pub use backend::{backend_for, LocalBackend, RepoBackend, RepoBackendImpl, UnsupportedBackend, UploadArtifacts};
pub use error::{Error, Result};
pub use sync::{update, UpdateReport};

#[cfg(test)]
mod tests {
    use super::*;
    use forge_foundation::{Alias, CompilerVersion, RepoAddress, RepoKind, Repository};
    use forge_schema::{doc, AliasMap, GlobalConfig, Installed, FORMAT_VERSION};
    use forge_storage::GlobalPaths;
    use tempfile::tempdir;

    fn write_source_package(source: &std::path::Path, name: &str, version: &str, opam: &str) {
        let pkg_dir = source.join("packages").join(format!("{name}.{version}"));
        std::fs::create_dir_all(&pkg_dir).unwrap();
        std::fs::write(pkg_dir.join("opam"), opam).unwrap();
        std::fs::write(pkg_dir.join("descr"), "a test package").unwrap();
        std::fs::create_dir_all(source.join("archives")).unwrap();
        std::fs::write(source.join("archives").join(format!("{name}.{version}.tar.gz")), b"fake").unwrap();
    }

    fn init_root(root: &std::path::Path, repo_address: &std::path::Path) {
        let global = GlobalPaths::new(root);
        let alias = Alias::new("sys").unwrap();
        let compiler = CompilerVersion::new("5.1").unwrap();
        let mut aliases = AliasMap::default();
        aliases.insert(alias.clone(), compiler);
        doc::write(&global.aliases(), &aliases).unwrap();

        let repo_name = forge_foundation::RepoName::new("default").unwrap();
        let config = GlobalConfig {
            format_version: FORMAT_VERSION.to_string(),
            repos: vec![Repository {
                name: repo_name,
                address: RepoAddress::new(repo_address.to_string_lossy().to_string()),
                kind: RepoKind::Local,
            }],
            current_alias: alias.clone(),
            workers: 4,
        };
        doc::write(&global.config(), &config).unwrap();

        let switch = global.switch(&alias);
        doc::write(&switch.installed(), &Installed::default()).unwrap();
    }

    #[tokio::test]
    async fn update_populates_available_and_repo_index() {
        let root_dir = tempdir().unwrap();
        let source_dir = tempdir().unwrap();
        write_source_package(source_dir.path(), "foo", "1", "name: foo\nversion: \"1\"\n");
        init_root(root_dir.path(), source_dir.path());

        let report = update(root_dir.path()).await.unwrap();
        assert_eq!(report.updated.len(), 1);

        let state = forge_storage::State::load(root_dir.path()).unwrap();
        let nv: forge_foundation::Nv = "foo.1".parse().unwrap();
        assert!(state.available().contains(&nv));
        assert_eq!(
            state.repo_index().get(nv.name()).unwrap().as_str(),
            "default"
        );
    }

    #[tokio::test]
    async fn second_update_is_idempotent_on_repo_index() {
        let root_dir = tempdir().unwrap();
        let source_dir = tempdir().unwrap();
        write_source_package(source_dir.path(), "foo", "1", "name: foo\nversion: \"1\"\n");
        init_root(root_dir.path(), source_dir.path());

        update(root_dir.path()).await.unwrap();
        let first = forge_storage::State::load(root_dir.path()).unwrap();

        update(root_dir.path()).await.unwrap();
        let second = forge_storage::State::load(root_dir.path()).unwrap();

        assert_eq!(first.repo_index().iter().count(), second.repo_index().iter().count());
    }
}
