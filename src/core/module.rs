//
//  Copyright (C) 2022-2024  Chase Ruskin
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use crate::core::fetch::FetchRequest;
use crate::core::lang::Identifier;
use crate::core::manifest::{ManifestOptions, ToolOptions};
use crate::core::source::{self, Checkout, RemoteSpec, Source};
use crate::core::sourcefile::SourceFile;
use crate::error::{Hint, ResolveError};
use crate::util::filesystem;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Stable handle to a module within its `ModuleTree`.
pub type ModuleId = usize;

/// How a module was reached from its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// The parent's manifest names this module as the alternate project root.
    Root,
    Local,
    Svn,
    Git,
}

/// Identifies a module by where its content lives.
///
/// Two declarations of the same directory, or of remote repositories that land
/// in the same place, are the same module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleKey {
    source: Source,
    location: PathBuf,
}

impl ModuleKey {
    pub fn get_location(&self) -> &Path {
        &self.location
    }
}

/// Where a module's files come from once it is parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum FileList {
    /// Entries listed by the manifest: files, directories, or glob patterns.
    Explicit(Vec<String>),
    /// Everything visible under the module's directory.
    Directory,
}

/// One node of the project tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    url: String,
    path: Option<PathBuf>,
    source: Source,
    fetchto: PathBuf,
    checkout: Checkout,
    manifest: Option<PathBuf>,
    library: Identifier,
    tool: ToolOptions,
    file_list: FileList,
    is_fetched: bool,
    is_parsed: bool,
    files: Option<Vec<SourceFile>>,
    children: Vec<(Relation, ModuleId)>,
    key: ModuleKey,
}

impl Module {
    fn with(url: String, source: Source, fetchto: &Path, checkout: Checkout, location: PathBuf) -> Self {
        Self {
            url: url,
            path: None,
            source: source,
            fetchto: filesystem::full_path(fetchto),
            checkout: checkout,
            manifest: None,
            library: Identifier::new_working(),
            tool: ToolOptions::default(),
            file_list: FileList::Directory,
            is_fetched: false,
            is_parsed: false,
            files: None,
            children: Vec::new(),
            key: ModuleKey {
                source: source,
                location: location,
            },
        }
    }

    /// Creates a module for the existing directory `path`.
    ///
    /// Errors if the directory is missing.
    pub fn new_local(path: &Path, fetchto: &Path) -> Result<Self, ResolveError> {
        if path.exists() == false {
            return Err(ResolveError::MissingLocalPath(path.to_path_buf()));
        }
        let full = filesystem::full_path(path);
        let mut m = Self::with(
            path.display().to_string(),
            Source::Local,
            fetchto,
            Checkout::Default,
            full.clone(),
        );
        m.path = Some(full);
        m.is_fetched = true;
        Ok(m)
    }

    /// Creates a module for the repository described by `spec`, to be fetched
    /// into `fetchto`.
    ///
    /// The module starts out fetched when its target directory already exists.
    pub fn new_remote(spec: &RemoteSpec, source: Source, fetchto: &Path) -> Result<Self, ResolveError> {
        if source.is_remote() == false {
            return Err(ResolveError::InvalidModuleSource(
                spec.get_url().to_string(),
                source.to_string(),
                Hint::SourceKinds,
            ));
        }
        let name = source::target_name(spec.get_url(), source);
        // the target must be a child of fetchto
        if name.is_empty() == true || name == "." || name == ".." {
            return Err(ResolveError::InvalidModuleUrl(spec.get_url().to_string()));
        }
        let target = filesystem::full_path(&fetchto.join(name));
        let mut m = Self::with(
            spec.get_url().to_string(),
            source,
            fetchto,
            spec.get_checkout().clone(),
            target.clone(),
        );
        if target.exists() == true {
            m.path = Some(target);
            m.is_fetched = true;
        }
        Ok(m)
    }

    /// Creates a module from a textual source kind, as given on the command line.
    pub fn from_kind(kind: &str, url: &str, fetchto: &Path) -> Result<Self, ResolveError> {
        let source = Source::from_str(kind).map_err(|_| {
            ResolveError::InvalidModuleSource(url.to_string(), kind.to_string(), Hint::SourceKinds)
        })?;
        match source {
            Source::Local => Self::new_local(Path::new(url), fetchto),
            _ => Self::new_remote(&RemoteSpec::new(url, Checkout::Default), source, fetchto),
        }
    }

    /// Describes the fetch of this module for a fetcher.
    pub fn fetch_request(&self) -> FetchRequest {
        FetchRequest::new(
            &self.url,
            self.source,
            &self.fetchto,
            self.checkout.clone(),
            self.is_fetched,
        )
    }

    pub(crate) fn mark_fetched(&mut self, path: PathBuf) {
        self.path = Some(path);
        self.is_fetched = true;
    }

    /// Takes on the manifest's settings. Children are attached by the tree.
    pub(crate) fn apply_manifest(&mut self, manifest: &Path, opts: &ManifestOptions) {
        self.manifest = Some(manifest.to_path_buf());
        self.library = opts.get_library().clone();
        self.tool = opts.get_tool().clone();
        if let Some(dir) = opts.get_fetchto() {
            self.fetchto = dir.clone();
        }
        self.file_list = match opts.get_files() {
            Some(entries) => FileList::Explicit(entries.clone()),
            None => FileList::Directory,
        };
    }

    pub(crate) fn mark_parsed(&mut self) {
        self.is_parsed = true;
    }

    pub(crate) fn add_child(&mut self, relation: Relation, id: ModuleId) {
        if self.children.contains(&(relation, id)) == false {
            self.children.push((relation, id));
        }
    }

    /// Stores the discovered files. Later calls leave the first list in place.
    pub(crate) fn set_files(&mut self, files: Vec<SourceFile>) {
        if self.files.is_none() {
            self.files = Some(files);
        }
    }

    pub fn get_url(&self) -> &str {
        &self.url
    }

    /// Access the on-disk location, known once the module is fetched.
    pub fn get_path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    pub fn get_source(&self) -> Source {
        self.source
    }

    pub fn get_fetchto(&self) -> &Path {
        &self.fetchto
    }

    pub fn get_checkout(&self) -> &Checkout {
        &self.checkout
    }

    pub fn get_manifest(&self) -> Option<&PathBuf> {
        self.manifest.as_ref()
    }

    pub fn get_library(&self) -> &Identifier {
        &self.library
    }

    pub fn get_tool(&self) -> &ToolOptions {
        &self.tool
    }

    pub fn get_file_list(&self) -> &FileList {
        &self.file_list
    }

    pub fn is_fetched(&self) -> bool {
        self.is_fetched
    }

    pub fn is_parsed(&self) -> bool {
        self.is_parsed
    }

    /// Access the discovered files, set once after parsing.
    pub fn get_files(&self) -> Option<&Vec<SourceFile>> {
        self.files.as_ref()
    }

    pub fn get_children(&self) -> &Vec<(Relation, ModuleId)> {
        &self.children
    }

    pub fn get_key(&self) -> &ModuleKey {
        &self.key
    }
}

impl Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}", self.source, self.url)?;
        if let Some(p) = &self.path {
            write!(f, "\t{}", p.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn local_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let m = Module::new_local(dir.path(), dir.path()).unwrap();
        assert_eq!(m.is_fetched(), true);
        assert_eq!(m.is_parsed(), false);
        assert_eq!(m.get_path(), Some(&filesystem::full_path(dir.path())));
        assert_eq!(m.get_library(), &Identifier::new_working());

        let missing = dir.path().join("common");
        assert_eq!(
            Module::new_local(&missing, dir.path()),
            Err(ResolveError::MissingLocalPath(missing))
        );
    }

    #[test]
    fn remote_target() {
        let dir = tempfile::tempdir().unwrap();
        let fetchto = dir.path().join("ip_cores");
        let spec = RemoteSpec::new("https://example/mod.git", Checkout::Default);
        let m = Module::new_remote(&spec, Source::Git, &fetchto).unwrap();
        assert_eq!(m.is_fetched(), false);
        assert_eq!(m.get_path(), None);
        assert_eq!(
            m.get_key().get_location(),
            filesystem::full_path(&fetchto.join("mod"))
        );
        assert_eq!(m.fetch_request().get_target(), m.get_key().get_location());

        // a target already on disk counts as fetched
        std::fs::create_dir_all(fetchto.join("mod")).unwrap();
        let m = Module::new_remote(&spec, Source::Git, &fetchto).unwrap();
        assert_eq!(m.is_fetched(), true);
        assert_eq!(m.get_path(), Some(&filesystem::full_path(&fetchto.join("mod"))));
    }

    #[test]
    fn remote_target_outside_fetchto() {
        let dir = tempfile::tempdir().unwrap();
        for url in ["https://host/.git", "https://host/..", "http://svn.example/x/.", ""] {
            let source = match url.starts_with("http://svn") {
                true => Source::Svn,
                false => Source::Git,
            };
            let spec = RemoteSpec::new(url, Checkout::Default);
            assert_eq!(
                Module::new_remote(&spec, source, dir.path()),
                Err(ResolveError::InvalidModuleUrl(url.to_string()))
            );
        }
        // a dotted name that is not a bare dot is fine
        let spec = RemoteSpec::new("https://host/..mod.git", Checkout::Default);
        assert!(Module::new_remote(&spec, Source::Git, dir.path()).is_ok());
    }

    #[test]
    fn source_kind_validated() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            Module::from_kind("hg", "https://example/mod", dir.path()),
            Err(ResolveError::InvalidModuleSource(
                String::from("https://example/mod"),
                String::from("hg"),
                Hint::SourceKinds
            ))
        );
        let spec = RemoteSpec::new("../common", Checkout::Default);
        assert!(matches!(
            Module::new_remote(&spec, Source::Local, dir.path()),
            Err(ResolveError::InvalidModuleSource(_, _, _))
        ));
        let m = Module::from_kind("svn", "http://svn.example/x", dir.path()).unwrap();
        assert_eq!(m.get_source(), Source::Svn);
    }
}
