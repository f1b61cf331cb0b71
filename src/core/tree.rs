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

//! The module resolution engine.
//!
//! Modules live in an arena and refer to their children by `ModuleId`, with
//! each edge tagged by how the child was declared. A module is registered once
//! per `ModuleKey`, so repeated declarations and cycles collapse onto one node.

use crate::core::diagnostic::{Diagnostic, Diagnostics};
use crate::core::fetch::{FetchError, FetchRequest, Fetchers};
use crate::core::fileset;
use crate::core::manifest::{self, FromFile, Manifest};
use crate::core::module::{FileList, Module, ModuleId, ModuleKey, Relation};
use crate::core::source::Source;
use crate::core::sourcefile::SourceFile;
use crate::error::{Hint, ResolveError};
use crate::util::filesystem;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

pub struct ModuleTree {
    arena: Vec<Module>,
    index: HashMap<ModuleKey, ModuleId>,
    root: ModuleId,
}

impl ModuleTree {
    /// Creates a tree holding only the project root.
    pub fn new(root: Module) -> Self {
        let mut index = HashMap::new();
        index.insert(root.get_key().clone(), 0);
        Self {
            arena: vec![root],
            index: index,
            root: 0,
        }
    }

    pub fn root(&self) -> ModuleId {
        self.root
    }

    /// Accesses the module behind `id`.
    pub fn get(&self, id: ModuleId) -> &Module {
        &self.arena[id]
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Registers `m`, or finds the module already registered under the same key.
    fn insert(&mut self, m: Module) -> ModuleId {
        match self.index.get(m.get_key()) {
            Some(id) => *id,
            None => {
                let id = self.arena.len();
                self.index.insert(m.get_key().clone(), id);
                self.arena.push(m);
                id
            }
        }
    }

    /// Retrieves the module's content and returns where it is on disk.
    ///
    /// Local modules never reach a fetcher. A remote module whose content is
    /// already present is updated rather than cloned again.
    pub fn fetch(&mut self, id: ModuleId, fetchers: &Fetchers) -> Result<PathBuf, ResolveError> {
        let m = &self.arena[id];
        let fetcher = match fetchers.get(m.get_source()) {
            Some(f) => f,
            None => {
                return match m.get_path() {
                    Some(p) => Ok(p.clone()),
                    None => Err(ResolveError::MissingLocalPath(PathBuf::from(m.get_url()))),
                }
            }
        };
        let url = m.get_url().to_string();
        let path = fetcher
            .fetch(&m.fetch_request())
            .map_err(|e| e.into_resolve_error(&url))?;
        Ok(self.apply_fetch(id, path))
    }

    fn apply_fetch(&mut self, id: ModuleId, path: PathBuf) -> PathBuf {
        let path = filesystem::full_path(&path);
        self.arena[id].mark_fetched(path.clone());
        path
    }

    /// Reads the module's manifest and attaches the modules it declares.
    ///
    /// Does nothing if the module is already parsed or not yet fetched. A module
    /// without a manifest is marked parsed and has no children. An alternate root
    /// module is attached and parsed immediately.
    pub fn parse_manifest(&mut self, id: ModuleId, diagnostics: &mut Diagnostics) -> Result<(), ResolveError> {
        let m = &self.arena[id];
        if m.is_parsed() == true || m.is_fetched() == false {
            return Ok(());
        }
        let dir = match m.get_path() {
            Some(p) => p.clone(),
            None => return Ok(()),
        };
        let path = match manifest::find_manifest(&dir) {
            Some(p) => p,
            None => {
                tracing::debug!("no manifest in {:?}", dir);
                self.arena[id].mark_parsed();
                return Ok(());
            }
        };
        tracing::debug!("parsing manifest {:?}", path);
        let opts = Manifest::from_file(&path)?.validate(&dir, &path)?;

        self.arena[id].apply_manifest(&path, &opts);
        self.arena[id].mark_parsed();
        let fetchto = self.arena[id].get_fetchto().to_path_buf();

        if let Some(root_path) = opts.get_root_module() {
            tracing::debug!("encountered root module {:?}", root_path);
            let child = self.insert(Module::new_local(root_path, &fetchto)?);
            self.arena[id].add_child(Relation::Root, child);
            self.parse_manifest(child, diagnostics)?;
        }
        for local in opts.get_local() {
            let child = self.insert(Module::new_local(local, &fetchto)?);
            self.arena[id].add_child(Relation::Local, child);
        }
        for spec in opts.get_svn() {
            let child = self.insert(Module::new_remote(spec, Source::Svn, &fetchto)?);
            self.arena[id].add_child(Relation::Svn, child);
        }
        for spec in opts.get_git() {
            let child = self.insert(Module::new_remote(spec, Source::Git, &fetchto)?);
            self.arena[id].add_child(Relation::Git, child);
        }
        Ok(())
    }

    /// Collects the module's files, stamped with its library.
    ///
    /// Directories holding any other known module are left to that module, and
    /// the manifest itself is never a source file. Call this once the whole tree
    /// is known, so modules nested at any depth are excluded.
    pub fn discover_files(&mut self, id: ModuleId, diagnostics: &mut Diagnostics) -> Result<(), ResolveError> {
        let m = &self.arena[id];
        if m.get_files().is_some() {
            return Ok(());
        }
        let dir = match m.get_path() {
            Some(p) => p.clone(),
            None => return Err(Self::unfetched(m)),
        };
        let prune: Vec<PathBuf> = self
            .index
            .keys()
            .map(|k| k.get_location())
            .filter(|p| p.starts_with(&dir) == true && p != &dir)
            .map(|p| p.to_path_buf())
            .collect();
        let skip: Vec<PathBuf> = m.get_manifest().into_iter().cloned().collect();

        let paths = match m.get_file_list() {
            FileList::Explicit(entries) => {
                let manifest = m.get_manifest().cloned().unwrap_or_else(|| dir.join(manifest::MANIFEST_FILE));
                fileset::expand_entries(&dir, entries, &prune, &skip, &manifest, diagnostics)
            }
            FileList::Directory => filesystem::gather_files(&dir, &prune, &skip),
        };
        let library = m.get_library().clone();
        let files = paths
            .into_iter()
            .map(|p| SourceFile::new(p, library.clone()))
            .collect();
        self.arena[id].set_files(files);
        Ok(())
    }

    /// Fetches and parses every module reachable from the root, returning each
    /// one exactly once with the root first.
    ///
    /// Remote siblings are fetched concurrently on up to `jobs` threads (zero
    /// picks a default). When fetches fail, the others still run to completion
    /// and their results are kept; the first failure is returned and the rest
    /// are recorded as diagnostics.
    pub fn resolve(
        &mut self,
        fetchers: &Fetchers,
        jobs: usize,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<ModuleId>, ResolveError> {
        let pool = match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::warn!("fetching modules one at a time: {}", e);
                None
            }
        };

        let root = self.root;
        self.fetch(root, fetchers)?;
        self.parse_manifest(root, diagnostics)?;

        let mut seen = HashSet::from([root]);
        let mut order = vec![root];
        let mut queue = VecDeque::from([root]);

        while let Some(cur) = queue.pop_front() {
            let children: Vec<ModuleId> = self.arena[cur]
                .get_children()
                .iter()
                .map(|(_, c)| *c)
                .filter(|c| seen.insert(*c) == true)
                .collect();

            let requests: Vec<(ModuleId, FetchRequest)> = children
                .iter()
                .filter(|c| self.arena[**c].get_source().is_remote())
                .map(|c| (*c, self.arena[*c].fetch_request()))
                .collect();
            let results = Self::fetch_all(fetchers, pool.as_ref(), requests);

            let mut failure: Option<ResolveError> = None;
            for (id, result) in results {
                let url = self.arena[id].get_url().to_string();
                match result {
                    Ok(path) => {
                        self.apply_fetch(id, path);
                    }
                    Err(e) => {
                        if failure.is_none() {
                            failure = Some(e.into_resolve_error(&url));
                        } else {
                            diagnostics.push(Diagnostic::FetchAbandoned {
                                url: url,
                                reason: e.to_string(),
                            });
                        }
                    }
                }
            }
            if let Some(e) = failure {
                return Err(e);
            }

            for child in children {
                self.parse_manifest(child, diagnostics)?;
                order.push(child);
                queue.push_back(child);
            }
        }
        self.discover_all(&order, diagnostics)?;
        Ok(order)
    }

    /// Discovers the files of every module in `order`.
    fn discover_all(&mut self, order: &[ModuleId], diagnostics: &mut Diagnostics) -> Result<(), ResolveError> {
        for id in order {
            self.discover_files(*id, diagnostics)?;
        }
        Ok(())
    }

    /// Runs the fetch requests, concurrently when a pool is available, and
    /// returns every outcome in request order.
    fn fetch_all(
        fetchers: &Fetchers,
        pool: Option<&rayon::ThreadPool>,
        requests: Vec<(ModuleId, FetchRequest)>,
    ) -> Vec<(ModuleId, Result<PathBuf, FetchError>)> {
        let run = |(id, req): &(ModuleId, FetchRequest)| -> (ModuleId, Result<PathBuf, FetchError>) {
            match fetchers.get(req.get_source()) {
                Some(f) => (*id, f.fetch(req)),
                None => (*id, Ok(req.get_target())),
            }
        };
        match pool {
            Some(p) if requests.len() > 1 => p.install(|| requests.par_iter().map(run).collect()),
            _ => requests.iter().map(run).collect(),
        }
    }

    /// Lists every module reachable from the root without fetching anything,
    /// returning each one exactly once with the root first.
    ///
    /// Errors if any reachable module has not been fetched.
    pub fn enumerate(&mut self, diagnostics: &mut Diagnostics) -> Result<Vec<ModuleId>, ResolveError> {
        let root = self.root;
        let mut seen = HashSet::from([root]);
        let mut order = vec![root];
        let mut queue = VecDeque::from([root]);

        while let Some(cur) = queue.pop_front() {
            if self.arena[cur].is_fetched() == false {
                return Err(Self::unfetched(&self.arena[cur]));
            }
            self.parse_manifest(cur, diagnostics)?;
            for (_, child) in self.arena[cur].get_children().clone() {
                if seen.insert(child) == true {
                    order.push(child);
                    queue.push_back(child);
                }
            }
        }
        self.discover_all(&order, diagnostics)?;
        Ok(order)
    }

    /// Gathers the files of `modules` in order, each file once.
    ///
    /// A file claimed by more than one module stays with the first and is
    /// reported for the others.
    pub fn files(&self, modules: &[ModuleId], diagnostics: &mut Diagnostics) -> Vec<&SourceFile> {
        let mut owners: HashMap<&Path, ModuleId> = HashMap::new();
        let mut files = Vec::new();
        for id in modules {
            for f in self.arena[*id].get_files().into_iter().flatten() {
                match owners.get(f.get_path()) {
                    Some(owner) => {
                        if owner != id {
                            diagnostics.push(Diagnostic::SharedFile {
                                file: f.get_path().to_path_buf(),
                                owner: self.arena[*owner].get_url().to_string(),
                                module: self.arena[*id].get_url().to_string(),
                            });
                        }
                    }
                    None => {
                        owners.insert(f.get_path(), *id);
                        files.push(f);
                    }
                }
            }
        }
        files
    }

    /// Gathers the hdl files of `modules`, the input of the dependency graph.
    pub fn hdl_files(&self, modules: &[ModuleId], diagnostics: &mut Diagnostics) -> Vec<&SourceFile> {
        self.files(modules, diagnostics)
            .into_iter()
            .filter(|f| f.is_vhdl() == true)
            .collect()
    }

    fn unfetched(m: &Module) -> ResolveError {
        ResolveError::UnfetchedModule(m.get_url().to_string(), Hint::FetchFirst)
    }
}

impl std::fmt::Debug for ModuleTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (id, m) in self.arena.iter().enumerate() {
            writeln!(f, "{}\t{}", id, m)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::fetch::Fetch;
    use crate::core::source::RemoteSpec;
    use crate::util::process::{ProcessError, Stderr};
    use std::sync::Mutex;

    /// Materializes fixture repositories instead of calling a version-control client.
    struct MockFetch {
        repos: Vec<(&'static str, Vec<(&'static str, &'static str)>)>,
        calls: Mutex<Vec<String>>,
    }

    impl MockFetch {
        fn new(repos: Vec<(&'static str, Vec<(&'static str, &'static str)>)>) -> Self {
            Self {
                repos: repos,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl Fetch for MockFetch {
        fn fetch(&self, req: &FetchRequest) -> Result<PathBuf, FetchError> {
            self.calls.lock().unwrap().push(req.get_url().to_string());
            let files = match self.repos.iter().find(|(url, _)| url == &req.get_url()) {
                Some((_, files)) => files,
                None => {
                    return Err(FetchError::Process(ProcessError::ExitCode(
                        format!("git clone -- {}", req.get_url()),
                        128,
                        Stderr(String::from("repository not found")),
                    )))
                }
            };
            let target = req.get_target();
            std::fs::create_dir_all(&target).unwrap();
            for (name, text) in files {
                write(&target, name, text);
            }
            Ok(target)
        }

        fn resolved_commit(&self, _path: &Path) -> Result<String, FetchError> {
            Ok(String::from("0123abcd"))
        }
    }

    struct Shared(std::sync::Arc<MockFetch>);

    impl Fetch for Shared {
        fn fetch(&self, req: &FetchRequest) -> Result<PathBuf, FetchError> {
            self.0.fetch(req)
        }

        fn resolved_commit(&self, path: &Path) -> Result<String, FetchError> {
            self.0.resolved_commit(path)
        }
    }

    fn fetchers(mock: &std::sync::Arc<MockFetch>) -> Fetchers {
        Fetchers::new(
            Box::new(Shared(mock.clone())),
            Box::new(Shared(mock.clone())),
        )
    }

    fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, text).unwrap();
    }

    fn root_tree(dir: &Path) -> ModuleTree {
        ModuleTree::new(Module::new_local(dir, dir).unwrap())
    }

    fn names(dir: &Path, files: &[&SourceFile]) -> Vec<String> {
        let base = filesystem::full_path(dir);
        files
            .iter()
            .map(|f| {
                f.get_path()
                    .strip_prefix(&base)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn git_submodule_lands_in_fetchto() {
        let dir = tempfile::tempdir().unwrap();
        let top = dir.path().join("top");
        write(&top, "manifest.toml", "fetchto = \"ip_cores\"\ngit = [\"https://example/mod.git\"]\n");
        write(&top, "top.vhd", "");
        let mock = std::sync::Arc::new(MockFetch::new(vec![(
            "https://example/mod.git",
            vec![("mod.vhd", "")],
        )]));

        let mut tree = root_tree(&top);
        let mut diagnostics = Diagnostics::new();
        let order = tree.resolve(&fetchers(&mock), 2, &mut diagnostics).unwrap();

        assert_eq!(order.len(), 2);
        let sub = tree.get(order[1]);
        assert_eq!(sub.is_fetched(), true);
        assert_eq!(sub.is_parsed(), true);
        assert_eq!(
            sub.get_path(),
            Some(&filesystem::full_path(&top.join("ip_cores/mod")))
        );
        // the submodule's files belong to it alone
        assert_eq!(names(&top, &tree.files(&order[..1], &mut Diagnostics::new())), vec!["top.vhd"]);
        assert_eq!(
            names(&top, &tree.files(&order, &mut Diagnostics::new())),
            vec!["top.vhd", "ip_cores/mod/mod.vhd"]
        );
        assert_eq!(diagnostics.is_empty(), true);
    }

    #[test]
    fn local_modules_skip_fetcher() {
        let dir = tempfile::tempdir().unwrap();
        let top = dir.path().join("top");
        write(&top, "manifest.toml", "local = [\"../common\"]\n");
        write(&dir.path().join("common"), "common.vhd", "");
        let mock = std::sync::Arc::new(MockFetch::new(vec![]));

        let mut tree = root_tree(&top);
        let order = tree
            .resolve(&fetchers(&mock), 0, &mut Diagnostics::new())
            .unwrap();
        assert_eq!(order.len(), 2);
        assert_eq!(tree.get(order[1]).get_source(), Source::Local);
        assert_eq!(mock.calls.lock().unwrap().len(), 0);
    }

    #[test]
    fn repeated_and_cyclic_modules_appear_once() {
        let dir = tempfile::tempdir().unwrap();
        let top = dir.path().join("top");
        let common = dir.path().join("common");
        let uart = dir.path().join("uart");
        write(&top, "manifest.toml", "local = [\"../common\", \"../uart\"]\n");
        write(&uart, "manifest.toml", "local = [\"../common\"]\n");
        write(&common, "manifest.toml", "local = [\"../top\"]\n");

        let mock = std::sync::Arc::new(MockFetch::new(vec![]));
        let mut tree = root_tree(&top);
        let order = tree
            .resolve(&fetchers(&mock), 0, &mut Diagnostics::new())
            .unwrap();
        assert_eq!(order.len(), 3);
        assert_eq!(tree.len(), 3);
        // common points back at the root
        let common_id = order[1];
        assert_eq!(
            tree.get(common_id).get_children(),
            &vec![(Relation::Local, tree.root())]
        );
    }

    #[test]
    fn alternate_root_is_tagged_edge() {
        let dir = tempfile::tempdir().unwrap();
        let top = dir.path().join("top");
        let board = dir.path().join("board");
        write(&top, "manifest.toml", "root-module = \"../board\"\n");
        write(&board, "manifest.toml", "local = [\"../common\"]\n");
        write(&board, "board.vhd", "");
        write(&dir.path().join("common"), "common.vhd", "");

        let mock = std::sync::Arc::new(MockFetch::new(vec![]));
        let mut tree = root_tree(&top);
        let order = tree
            .resolve(&fetchers(&mock), 0, &mut Diagnostics::new())
            .unwrap();
        assert_eq!(order.len(), 3);
        let root = tree.get(tree.root());
        assert_eq!(root.get_children(), &vec![(Relation::Root, order[1])]);
        assert_eq!(
            tree.get(order[1]).get_path(),
            Some(&filesystem::full_path(&board))
        );
        assert_eq!(tree.get(order[2]).get_url(), common_url(&board));
    }

    fn common_url(board: &Path) -> String {
        filesystem::resolve_rel_path(&filesystem::full_path(board), Path::new("../common"))
            .display()
            .to_string()
    }

    #[test]
    fn absolute_fetchto_stops_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let top = dir.path().join("top");
        write(&top, "manifest.toml", "local = [\"../common\"]\n");
        write(&dir.path().join("common"), "manifest.toml", "fetchto = \"/opt/ip\"\n");

        let mock = std::sync::Arc::new(MockFetch::new(vec![]));
        let mut tree = root_tree(&top);
        assert!(matches!(
            tree.resolve(&fetchers(&mock), 0, &mut Diagnostics::new()),
            Err(ResolveError::RelativePathRequired(_, _))
        ));
    }

    #[test]
    fn malformed_manifest_stops_resolution() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "manifest.toml", "files = [\"a.vhd\"\n");
        let mock = std::sync::Arc::new(MockFetch::new(vec![]));
        let mut tree = root_tree(dir.path());
        assert!(matches!(
            tree.resolve(&fetchers(&mock), 0, &mut Diagnostics::new()),
            Err(ResolveError::ManifestParse(_, _))
        ));
    }

    #[test]
    fn enumerate_requires_fetched_modules() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "manifest.toml", "git = [\"https://example/mod.git\"]\n");
        let mut tree = root_tree(dir.path());
        assert_eq!(
            tree.enumerate(&mut Diagnostics::new()),
            Err(ResolveError::UnfetchedModule(
                String::from("https://example/mod.git"),
                Hint::FetchFirst
            ))
        );
    }

    #[test]
    fn enumerate_after_resolve() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "manifest.toml", "git = [\"https://example/mod.git::develop\"]\n");
        let mock = std::sync::Arc::new(MockFetch::new(vec![(
            "https://example/mod.git",
            vec![("manifest.toml", "library = \"ip\"\n"), ("fifo.vhd", "")],
        )]));
        let resolved = root_tree(dir.path())
            .resolve(&fetchers(&mock), 0, &mut Diagnostics::new())
            .unwrap();

        // a fresh tree finds the fetched content on disk without fetching
        let mut tree = root_tree(dir.path());
        let order = tree.enumerate(&mut Diagnostics::new()).unwrap();
        assert_eq!(order.len(), resolved.len());
        assert_eq!(mock.calls.lock().unwrap().len(), 1);
        let sub = tree.get(order[1]);
        assert_eq!(sub.get_library(), &crate::core::lang::Identifier::Basic(String::from("ip")));
        assert_eq!(
            tree.files(&order, &mut Diagnostics::new())
                .iter()
                .map(|f| f.get_library().to_string())
                .collect::<Vec<String>>(),
            vec!["ip"]
        );
    }

    #[test]
    fn parse_waits_for_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let spec = RemoteSpec::new("https://example/mod.git", crate::core::source::Checkout::Default);
        let mut tree = ModuleTree::new(Module::new_remote(&spec, Source::Git, dir.path()).unwrap());
        let root = tree.root();
        tree.parse_manifest(root, &mut Diagnostics::new()).unwrap();
        assert_eq!(tree.get(root).is_parsed(), false);
        assert_eq!(tree.get(root).get_files(), None);
    }

    #[test]
    fn failed_fetch_keeps_siblings() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "manifest.toml",
            "git = [\"https://example/bad1.git\", \"https://example/good.git\", \"https://example/bad2.git\"]\n",
        );
        let mock = std::sync::Arc::new(MockFetch::new(vec![(
            "https://example/good.git",
            vec![("good.vhd", "")],
        )]));
        let mut tree = root_tree(dir.path());
        let mut diagnostics = Diagnostics::new();
        let result = tree.resolve(&fetchers(&mock), 3, &mut diagnostics);

        assert!(matches!(result, Err(ResolveError::FetchFailure(url, _)) if url == "https://example/bad1.git"));
        assert_eq!(mock.calls.lock().unwrap().len(), 3);
        assert_eq!(
            diagnostics.into_vec(),
            vec![Diagnostic::FetchAbandoned {
                url: String::from("https://example/bad2.git"),
                reason: String::from(
                    "\"git clone -- https://example/bad2.git\" exited with error code 128: repository not found"
                ),
            }]
        );
        let good = tree.get(tree.get(tree.root()).get_children()[1].1);
        assert_eq!(good.is_fetched(), true);
    }

    #[test]
    fn implicit_files_skip_hidden_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "manifest.toml", "library = \"work\"\n");
        write(dir.path(), "a.vhd", "");
        write(dir.path(), ".hidden", "");
        write(dir.path(), "lib/b.vhd", "");

        let mock = std::sync::Arc::new(MockFetch::new(vec![]));
        let mut tree = root_tree(dir.path());
        let order = tree
            .resolve(&fetchers(&mock), 0, &mut Diagnostics::new())
            .unwrap();
        assert_eq!(
            names(dir.path(), &tree.files(&order, &mut Diagnostics::new())),
            vec!["a.vhd", "lib/b.vhd"]
        );
    }

    #[test]
    fn flatten_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let top = dir.path().join("top");
        write(&top, "manifest.toml", "local = [\"../common\"]\ngit = [\"https://example/mod.git\"]\n");
        write(&dir.path().join("common"), "c.vhd", "");
        let mock = std::sync::Arc::new(MockFetch::new(vec![(
            "https://example/mod.git",
            vec![("m.vhd", "")],
        )]));

        let run = || {
            let mut tree = root_tree(&top);
            let order = tree
                .resolve(&fetchers(&mock), 0, &mut Diagnostics::new())
                .unwrap();
            let mut set: Vec<(String, Option<PathBuf>, Source)> = order
                .iter()
                .map(|id| {
                    let m = tree.get(*id);
                    (m.get_url().to_string(), m.get_path().cloned(), m.get_source())
                })
                .collect();
            set.sort_by(|a, b| a.0.cmp(&b.0));
            set
        };
        let first = run();
        assert_eq!(first.len(), 3);
        assert_eq!(first, run());
        // every parsed module was fetched first
        let mut tree = root_tree(&top);
        let order = tree.enumerate(&mut Diagnostics::new()).unwrap();
        assert!(order
            .iter()
            .all(|id| tree.get(*id).is_parsed() == false || tree.get(*id).is_fetched() == true));
    }

    fn libraries(dir: &Path, files: &[&SourceFile]) -> Vec<(String, String)> {
        names(dir, files)
            .into_iter()
            .zip(files.iter().map(|f| f.get_library().to_string()))
            .collect()
    }

    #[test]
    fn nested_remote_files_keep_their_library() {
        let dir = tempfile::tempdir().unwrap();
        let top = dir.path().join("top");
        write(&top, "manifest.toml", "git = [\"https://example/mod.git\"]\n");
        write(&top, "top.vhd", "");
        let mock = std::sync::Arc::new(MockFetch::new(vec![
            (
                "https://example/mod.git",
                vec![
                    ("manifest.toml", "library = \"ip\"\ngit = [\"https://example/grand.git\"]\n"),
                    ("m.vhd", ""),
                ],
            ),
            (
                "https://example/grand.git",
                vec![("manifest.toml", "library = \"gl\"\n"), ("g.vhd", "")],
            ),
        ]));
        let expected = vec![
            (String::from("top.vhd"), String::from("work")),
            (String::from("mod/m.vhd"), String::from("ip")),
            (String::from("grand/g.vhd"), String::from("gl")),
        ];

        let mut tree = root_tree(&top);
        let mut diagnostics = Diagnostics::new();
        let order = tree.resolve(&fetchers(&mock), 0, &mut diagnostics).unwrap();
        assert_eq!(order.len(), 3);
        assert_eq!(libraries(&top, &tree.files(&order, &mut diagnostics)), expected);

        // a later run sees the grandchild on disk from the start
        let mut tree = root_tree(&top);
        let order = tree.enumerate(&mut diagnostics).unwrap();
        assert_eq!(libraries(&top, &tree.files(&order, &mut diagnostics)), expected);
        assert_eq!(diagnostics.is_empty(), true);
        assert_eq!(mock.calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn file_listed_by_two_modules_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "manifest.toml",
            "files = [\"lib/shared.vhd\"]\nlocal = [\"lib\"]\n",
        );
        write(dir.path(), "lib/shared.vhd", "");

        let mock = std::sync::Arc::new(MockFetch::new(vec![]));
        let mut tree = root_tree(dir.path());
        let mut diagnostics = Diagnostics::new();
        let order = tree.resolve(&fetchers(&mock), 0, &mut diagnostics).unwrap();
        assert_eq!(diagnostics.is_empty(), true);

        let files = tree.files(&order, &mut diagnostics);
        assert_eq!(names(dir.path(), &files), vec!["lib/shared.vhd"]);
        let shared = filesystem::full_path(&dir.path().join("lib/shared.vhd"));
        assert_eq!(
            diagnostics.into_vec(),
            vec![Diagnostic::SharedFile {
                file: shared,
                owner: tree.get(order[0]).get_url().to_string(),
                module: tree.get(order[1]).get_url().to_string(),
            }]
        );
    }

    #[test]
    fn manifest_files_build_a_graph() {
        use crate::core::depgraph::DepGraph;
        use crate::core::lang::vhdl::scanner::VhdlScanner;

        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "manifest.toml", "files = [\"pkg.vhd\", \"top.vhd\"]\n");
        write(dir.path(), "pkg.vhd", "package pkg is\nend package;\n");
        write(
            dir.path(),
            "top.vhd",
            "use work.pkg.all;\n\nentity top is\nend entity;\n",
        );
        write(dir.path(), "notes.txt", "");

        let mock = std::sync::Arc::new(MockFetch::new(vec![]));
        let mut tree = root_tree(dir.path());
        let mut diagnostics = Diagnostics::new();
        let order = tree.resolve(&fetchers(&mock), 0, &mut diagnostics).unwrap();
        let files = tree.hdl_files(&order, &mut diagnostics);
        assert_eq!(names(dir.path(), &files), vec!["pkg.vhd", "top.vhd"]);

        let graph = DepGraph::build(&files, &VhdlScanner, &mut diagnostics).unwrap();
        let deps = |name: &str| -> Vec<String> {
            let path = filesystem::full_path(&dir.path().join(name));
            names(dir.path(), &graph.dependencies_of(&path).unwrap())
        };
        assert_eq!(deps("pkg.vhd"), Vec::<String>::new());
        assert_eq!(deps("top.vhd"), vec!["pkg.vhd"]);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(diagnostics.is_empty(), true);
    }
}
