// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! Textual substitution of `%{…}%` markers (spec.md §4.2).
//!
//! Invariant I5 (spec.md §8): substitution is an identity on bytes outside
//! `%{…}%` occurrences, and each well-formed occurrence is replaced exactly
//! once — the replacement text is never itself rescanned.

use std::path::Path;

use forge_storage::State;

use crate::error::Result;
use crate::engine::evaluate;

/// Replace every `%{f}%` marker in `input` where `f` parses as a
/// `FullVariable` with that variable's string value. Markers that don't
/// parse as a variable, and any text outside `%{…}%`, pass through
/// unchanged.
pub fn substitute_string(state: &State, input: &str) -> Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("%{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        let Some(close_rel) = after_open.find("}%") else {
            // No closing delimiter: the rest of the input is left verbatim.
            out.push_str(&rest[start..]);
            rest = "";
            break;
        };

        let inner = &after_open[..close_rel];
        let marker_end = start + 2 + close_rel + 2;

        match forge_foundation::try_parse_variable(inner) {
            Some(var) => {
                let value = evaluate(state, &var)?;
                out.push_str(&value.to_subst_string());
            }
            None => out.push_str(&rest[start..marker_end]),
        }

        rest = &rest[marker_end..];
    }
    out.push_str(rest);
    Ok(out)
}

/// File substitution (spec.md §4.2): read `{base}.in` and write `base` with
/// substitutions applied, preserving byte contents otherwise. `base` is an
/// absolute path; its `.in` sibling is read as UTF-8 (templates are text
/// files by construction — the manifest's `substs` field only ever names
/// text templates).
pub fn substitute_file(state: &State, base: &Path) -> Result<()> {
    let mut template = base.as_os_str().to_owned();
    template.push(".in");
    let template = std::path::PathBuf::from(template);
    let contents = std::fs::read_to_string(&template)
        .map_err(|e| forge_schema::Error::Read(template.clone(), e))?;
    let substituted = substitute_string(state, &contents)?;
    std::fs::write(base, substituted).map_err(|e| forge_schema::Error::Write(base.to_owned(), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_foundation::{Alias, CompilerVersion, Nv, RepoAddress, RepoKind, Repository};
    use forge_schema::{doc, AliasMap, GlobalConfig, Installed, FORMAT_VERSION};
    use forge_storage::GlobalPaths;
    use tempfile::tempdir;

    fn minimal_root(root: &std::path::Path) {
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
        installed.insert(nv).unwrap();
        doc::write(&switch.installed(), &installed).unwrap();
    }

    #[test]
    fn leaves_non_marker_text_untouched() {
        let dir = tempdir().unwrap();
        minimal_root(dir.path());
        let state = State::load(dir.path()).unwrap();
        let out = substitute_string(&state, "plain text, no markers here").unwrap();
        assert_eq!(out, "plain text, no markers here");
    }

    #[test]
    fn substitutes_well_formed_marker() {
        let dir = tempdir().unwrap();
        minimal_root(dir.path());
        let state = State::load(dir.path()).unwrap();
        let out = substitute_string(&state, "status=%{foo:enable}%;").unwrap();
        assert_eq!(out, "status=enable;");
    }

    #[test]
    fn leaves_ill_formed_marker_verbatim() {
        let dir = tempdir().unwrap();
        minimal_root(dir.path());
        let state = State::load(dir.path()).unwrap();
        let out = substitute_string(&state, "x=%{not a variable}%;").unwrap();
        assert_eq!(out, "x=%{not a variable}%;");
    }

    #[test]
    fn replacement_text_is_not_rescanned() {
        let dir = tempdir().unwrap();
        minimal_root(dir.path());
        let state = State::load(dir.path()).unwrap();
        // foo:installed evaluates to a literal "true" which itself contains
        // no further markers to expand; still a useful regression guard.
        let out = substitute_string(&state, "%{foo:installed}%").unwrap();
        assert_eq!(out, "true");
    }

    #[test]
    fn file_substitution_writes_sibling_without_in_suffix() {
        let dir = tempdir().unwrap();
        minimal_root(dir.path());
        let state = State::load(dir.path()).unwrap();

        let base = dir.path().join("pkgconfig.pc");
        std::fs::write(dir.path().join("pkgconfig.pc.in"), "prefix=%{foo:enable}%\n").unwrap();
        substitute_file(&state, &base).unwrap();
        let written = std::fs::read_to_string(&base).unwrap();
        assert_eq!(written, "prefix=enable\n");
    }
}
