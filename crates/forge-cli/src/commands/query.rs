// Copyright (c) Contributors to the forge project.
// SPDX-License-Identifier: Apache-2.0
//! The read-only query surface (spec.md §2 component 9, §4.7). None of
//! these commands touch the root lock.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use forge_foundation::{FullVariable, Nv, PkgName, Section};
use forge_schema::{doc, BuildConfig, CompilerDescr, Manifest, SectionConfig};
use forge_storage::State;

use crate::error::{Error, Result};

pub fn list(state: &State, json: bool) -> Result<()> {
    let nvs: Vec<&Nv> = state.installed().iter().collect();
    if json {
        let values: Vec<String> = nvs.iter().map(|nv| nv.to_string()).collect();
        println!("{}", serde_json::to_string_pretty(&values).expect("Vec<String> always serializes"));
        return Ok(());
    }
    for nv in nvs {
        println!("{nv}");
    }
    Ok(())
}

/// spec.md §4.7: "print package, installed-version (if any), available-
/// version(s) (excluding the installed one), library/syntax sections
/// (from the installed or latest manifest), and the description's full
/// body."
pub fn info(state: &State, pkg: &PkgName, json: bool) -> Result<()> {
    let installed = state.installed_version(pkg).cloned();
    let available: Vec<Nv> = state
        .available()
        .iter()
        .filter(|nv| nv.name() == pkg)
        .filter(|nv| installed.as_ref() != Some(nv.version()))
        .cloned()
        .collect();

    let reference = match &installed {
        Some(version) => Some(Nv::new(pkg.clone(), version.clone())),
        None => available.iter().max_by(|a, b| a.version().cmp(b.version())).cloned(),
    };

    let (libraries, syntax, descr) = match &reference {
        Some(nv) => {
            let manifest_path = state.global_paths().opam_link(nv);
            let manifest = Manifest::load_checked(&manifest_path, nv)?;
            let descr_path = state.global_paths().descr_link(nv);
            let descr = std::fs::read_to_string(&descr_path).unwrap_or_default();
            (manifest.libraries, manifest.syntax, descr)
        }
        None => (Vec::new(), Vec::new(), String::new()),
    };

    if json {
        let payload = serde_json::json!({
            "package": pkg.as_str(),
            "installed_version": installed.as_ref().map(|v| v.as_str()),
            "available_versions": available.iter().map(|nv| nv.version().as_str()).collect::<Vec<_>>(),
            "libraries": libraries.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            "syntax": syntax.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            "description": descr,
        });
        println!("{}", serde_json::to_string_pretty(&payload).expect("json! payload always serializes"));
        return Ok(());
    }

    println!("package: {pkg}");
    match &installed {
        Some(version) => println!("installed: {version}"),
        None => println!("installed: (none)"),
    }
    if available.is_empty() {
        println!("available: (none)");
    } else {
        let versions: Vec<String> = available.iter().map(|nv| nv.version().to_string()).collect();
        println!("available: {}", versions.join(", "));
    }
    if !libraries.is_empty() {
        println!("libraries: {}", libraries.iter().map(Section::as_str).collect::<Vec<_>>().join(", "));
    }
    if !syntax.is_empty() {
        println!("syntax: {}", syntax.iter().map(Section::as_str).collect::<Vec<_>>().join(", "));
    }
    if !descr.is_empty() {
        println!();
        println!("{descr}");
    }
    Ok(())
}

pub fn config_env(state: &State) -> Result<()> {
    let compiler: CompilerDescr = doc::read(&state.global_paths().compiler_link(state.current_compiler()))?;
    let (composed, _ambient) = forge_exec::compose_env(&compiler, &state.switch_paths().bin_dir());
    for (name, value) in &composed {
        println!("{name}={value}");
    }
    Ok(())
}

/// spec.md §4.7: "enumerate all global and section variables of every
/// installed package."
pub fn config_list_vars(state: &State, json: bool) -> Result<()> {
    let mut rows: Vec<(String, String)> = Vec::new();
    for nv in state.installed().iter() {
        let config: BuildConfig = doc::read(&state.switch_paths().package_config(nv.name()))?;
        for (var, value) in &config.variables {
            rows.push((format!("{}:{var}", nv.name()), value.to_subst_string()));
        }
        for (section, sc) in &config.sections {
            for (var, value) in &sc.variables {
                rows.push((format!("{}:{section}:{var}", nv.name()), value.to_subst_string()));
            }
        }
    }
    rows.sort();

    if json {
        let map: BTreeMap<&str, &str> = rows.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        println!("{}", serde_json::to_string_pretty(&map).expect("string map always serializes"));
        return Ok(());
    }
    for (key, value) in rows {
        println!("{key}={value}");
    }
    Ok(())
}

pub fn config_variable(state: &State, var: &str) -> Result<()> {
    let full: FullVariable = var.parse().map_err(Error::Foundation)?;
    let value = forge_subst::evaluate(state, &full)?;
    println!("{}", value.to_subst_string());
    Ok(())
}

pub fn config_subst(state: &State, files: &[PathBuf]) -> Result<()> {
    for file in files {
        forge_subst::substitute_file(state, file)?;
        println!("substituted {}", file.display());
    }
    Ok(())
}

/// spec.md §4.7: "print `-I <lib_dir>` flags for the given package names
/// (transitively closed if `-r`)."
pub fn config_includes(state: &State, recursive: bool, names: &[PkgName]) -> Result<()> {
    let universe = forge_solve::build_universe(state, false)?;
    let targets: BTreeSet<PkgName> = if recursive {
        forge_solve::filter_forward_dependencies(&universe, names)
            .into_iter()
            .map(|d| d.nv.name().clone())
            .collect()
    } else {
        names.iter().cloned().collect()
    };

    let mut flags = Vec::new();
    for name in &targets {
        if state.installed_version(name).is_none() {
            return Err(Error::NotInstalled(name.clone()));
        }
        flags.push(format!("-I {}", state.switch_paths().lib_dir(name).display()));
    }
    println!("{}", flags.join(" "));
    Ok(())
}

pub fn remote_list(state: &State) -> Result<()> {
    for repo in &state.config().repos {
        println!("{}\t{}\t{}", repo.name, repo.kind, repo.address);
    }
    Ok(())
}

pub fn compiler_list(state: &State) -> Result<()> {
    let dir = state.global_paths().compiler_dir();
    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(Error::Read(dir, e)),
    };
    let mut versions = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::Read(dir.clone(), e))?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("comp") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                versions.push(stem.to_owned());
            }
        }
    }
    versions.sort();
    for version in versions {
        let marker = if version == state.current_compiler().as_str() { "*" } else { " " };
        println!("{marker} {version}");
    }
    Ok(())
}

/// The section-closure algorithm for `config compil` (spec.md §4.7, §9
/// "Section closure"): a least-fixed-point worklist traversal over the DAG
/// of sections linked by `requires`, seeded by the caller's full-section
/// list plus the current compiler's own required sections. Section name
/// uniqueness is checked as each node is resolved, not up front.
pub fn config_compil(state: &State, full_sections: &[String]) -> Result<()> {
    let compiler: CompilerDescr = doc::read(&state.global_paths().compiler_link(state.current_compiler()))?;

    let mut seeds: Vec<(Option<PkgName>, Section)> = Vec::new();
    for raw in full_sections {
        let (pkg, section) = raw
            .split_once(':')
            .ok_or_else(|| Error::MalformedFullSection(raw.clone()))?;
        let pkg = PkgName::new(pkg).map_err(|_| Error::MalformedFullSection(raw.clone()))?;
        let section = Section::new(section).map_err(|_| Error::MalformedFullSection(raw.clone()))?;
        seeds.push((Some(pkg), section));
    }
    for section in &compiler.required_sections {
        seeds.push((None, section.clone()));
    }

    let mut closure: BTreeMap<Section, (PkgName, SectionConfig)> = BTreeMap::new();
    let mut worklist = seeds;
    while let Some((pkg_hint, section)) = worklist.pop() {
        if closure.contains_key(&section) {
            continue;
        }
        let (owner, sc) = resolve_section(state, pkg_hint.as_ref(), &section)?;
        for dep in &sc.requires {
            worklist.push((None, dep.clone()));
        }
        closure.insert(section, (owner, sc));
    }

    let order = topo_order(&closure);

    for category in ["byte", "asm", "compile", "link"] {
        let mut tokens: Vec<String> = compiler.flags.get(category).cloned().unwrap_or_default();
        for section in &order {
            if let Some((_, sc)) = closure.get(section) {
                if let Some(extra) = sc.flags.get(category) {
                    tokens.extend(extra.iter().cloned());
                }
            }
        }
        println!("{category}: {}", tokens.join(" "));
    }
    Ok(())
}

/// Find the installed package that defines `section`, preferring
/// `pkg_hint` when given. Errors if more than one installed package
/// defines a section of this name (`NameCollision`, spec.md §7).
fn resolve_section(state: &State, pkg_hint: Option<&PkgName>, section: &Section) -> Result<(PkgName, SectionConfig)> {
    let mut matches: Vec<(PkgName, SectionConfig)> = Vec::new();
    for nv in state.installed().iter() {
        if let Some(hint) = pkg_hint {
            if nv.name() != hint {
                continue;
            }
        }
        let config: BuildConfig = doc::read(&state.switch_paths().package_config(nv.name()))?;
        if let Some(sc) = config.sections.get(section) {
            matches.push((nv.name().clone(), sc.clone()));
        }
    }
    match matches.len() {
        0 => Err(Error::UnknownSection(section.to_string())),
        1 => Ok(matches.remove(0)),
        _ => Err(Error::SectionCollision(section.to_string())),
    }
}

/// Post-order DFS over `requires` edges: a section's dependencies are
/// emitted before the section itself.
fn topo_order(closure: &BTreeMap<Section, (PkgName, SectionConfig)>) -> Vec<Section> {
    let mut order = Vec::with_capacity(closure.len());
    let mut visited = BTreeSet::new();

    fn visit(
        section: &Section,
        closure: &BTreeMap<Section, (PkgName, SectionConfig)>,
        visited: &mut BTreeSet<Section>,
        order: &mut Vec<Section>,
    ) {
        if !visited.insert(section.clone()) {
            return;
        }
        if let Some((_, sc)) = closure.get(section) {
            for dep in &sc.requires {
                if closure.contains_key(dep) {
                    visit(dep, closure, visited, order);
                }
            }
        }
        order.push(section.clone());
    }

    for section in closure.keys() {
        visit(section, closure, &mut visited, &mut order);
    }
    order
}
