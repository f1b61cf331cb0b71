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

//! Builds the file-level dependency graph of a resolved project.
//!
//! Every file is scanned first and its units indexed by name, then each
//! reference is resolved against the index. Indexing before resolving keeps the
//! result independent of the order files are given in.

use crate::core::diagnostic::{Diagnostic, Diagnostics, Unresolved};
use crate::core::lang::{Identifier, Scan, Units};
use crate::core::sourcefile::SourceFile;
use crate::util::anyerror::CodeFault;
use crate::util::graphmap::GraphMap;
use rayon::prelude::*;
use serde_derive::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::path::{Path, PathBuf};

pub struct DepGraph<'a> {
    graph: GraphMap<PathBuf, &'a SourceFile, ()>,
}

#[derive(Serialize)]
struct Entry<'a> {
    file: &'a Path,
    library: &'a Identifier,
    dependencies: Vec<&'a Path>,
}

impl<'a> DepGraph<'a> {
    /// Scans `files` and links each one to the files defining the units it uses.
    ///
    /// Unresolved references and conflicting definitions are recorded in
    /// `diagnostics`; every file still becomes a node. Errors if a file cannot
    /// be read.
    pub fn build(
        files: &[&'a SourceFile],
        scanner: &impl Scan,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self, CodeFault> {
        let units: Vec<Units> = files
            .par_iter()
            .map(|f| match std::fs::read_to_string(f.get_path()) {
                Ok(text) => Ok(scanner.scan(&text)),
                Err(e) => Err(CodeFault(f.get_path().to_path_buf(), Box::new(e))),
            })
            .collect::<Result<Vec<Units>, CodeFault>>()?;

        let index = Self::index_definitions(files, &units, diagnostics);

        let libraries: HashSet<&Identifier> = files.iter().map(|f| f.get_library()).collect();

        let mut graph = GraphMap::new();
        for f in files {
            graph.add_node(f.get_path().to_path_buf(), *f);
        }

        for (i, file) in files.iter().enumerate() {
            let mut reported = HashSet::new();
            for r in &units[i].used {
                let outcome = match index.get(r.get_unit()) {
                    Some(j) if *j == i => continue,
                    Some(j) => match files[*j].get_library() == r.get_library() {
                        true => Ok(*j),
                        false => Err(Unresolved::LibraryMismatch(files[*j].get_library().clone())),
                    },
                    None => match libraries.contains(r.get_library()) {
                        true => Err(Unresolved::Missing),
                        false => Err(Unresolved::ExternalLibrary),
                    },
                };
                match outcome {
                    Ok(j) => {
                        graph.add_edge_by_key(
                            &file.get_path().to_path_buf(),
                            &files[j].get_path().to_path_buf(),
                            (),
                        );
                    }
                    Err(reason) => {
                        if reported.insert((r.get_library(), r.get_unit())) == true {
                            diagnostics.push(Diagnostic::UnresolvedDependency {
                                file: file.get_path().to_path_buf(),
                                reference: r.clone(),
                                reason: reason,
                            });
                        }
                    }
                }
            }
        }
        Ok(Self { graph: graph })
    }

    /// Maps each unit name, and each file's own name, to the file defining it.
    ///
    /// A name claimed by a second file is handed to that file.
    fn index_definitions(
        files: &[&SourceFile],
        units: &[Units],
        diagnostics: &mut Diagnostics,
    ) -> HashMap<Identifier, usize> {
        let mut index: HashMap<Identifier, usize> = HashMap::new();
        for (i, file) in files.iter().enumerate() {
            let fallback = file.get_stem().map(|s| Identifier::from_file_stem(s));
            for name in units[i].declared.iter().chain(fallback.iter()) {
                if let Some(prev) = index.insert(name.clone(), i) {
                    if prev != i {
                        diagnostics.push(Diagnostic::DefinitionConflict {
                            unit: name.clone(),
                            previous: files[prev].get_path().to_path_buf(),
                            file: file.get_path().to_path_buf(),
                        });
                    }
                }
            }
        }
        index
    }

    /// Iterates over the files in the order they were given.
    pub fn files(&self) -> impl Iterator<Item = &'a SourceFile> + '_ {
        self.graph
            .keys()
            .filter_map(|k| Some(*self.graph.get_node_by_key(k)?.as_ref()))
    }

    /// Lists the files `path` depends on, in order of first reference.
    pub fn dependencies_of(&self, path: &Path) -> Option<Vec<&'a SourceFile>> {
        Some(
            self.graph
                .successors_by_key(&path.to_path_buf())?
                .into_iter()
                .map(|f| *f)
                .collect(),
        )
    }

    pub fn file_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.get_graph().edge_count()
    }

    /// Renders the graph as a JSON list of `{file, library, dependencies}`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let entries: Vec<Entry> = self
            .files()
            .map(|f| Entry {
                file: f.get_path(),
                library: f.get_library(),
                dependencies: self
                    .dependencies_of(f.get_path())
                    .unwrap_or_default()
                    .into_iter()
                    .map(|d| d.get_path())
                    .collect(),
            })
            .collect();
        serde_json::to_string_pretty(&entries)
    }
}

impl<'a> Display for DepGraph<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for file in self.files() {
            writeln!(f, "{}", file)?;
            for dep in self.dependencies_of(file.get_path()).unwrap_or_default() {
                writeln!(f, "    {}", dep.get_path().display())?;
            }
        }
        Ok(())
    }
}
