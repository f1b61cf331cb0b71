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

//! Retrieval of remote module content through version-control clients.

pub mod extgit;
pub mod extsvn;

use crate::core::context::Context;
use crate::core::source::{self, Checkout, Source};
use crate::error::{Hint, LastError, ResolveError};
use crate::util::process::ProcessError;
use extgit::ExtGit;
use extsvn::ExtSvn;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{0}")]
    Process(#[from] ProcessError),
    #[error("failed to create directory {0:?}: {1}")]
    CreateDir(PathBuf, std::io::Error),
    #[error("{0} fetcher cannot retrieve {1} modules")]
    WrongSource(&'static str, Source),
}

impl FetchError {
    /// Maps the failure of fetching the module at `url` into a run-stopping error.
    pub fn into_resolve_error(self, url: &str) -> ResolveError {
        match self {
            Self::Process(ProcessError::TimedOut(_, limit)) => {
                ResolveError::FetchTimeout(url.to_string(), limit, Hint::RaiseTimeout)
            }
            e => ResolveError::FetchFailure(url.to_string(), LastError(e.to_string())),
        }
    }
}

/// Everything a fetcher needs to know to materialize one remote module.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    url: String,
    source: Source,
    fetchto: PathBuf,
    checkout: Checkout,
    is_fetched: bool,
}

impl FetchRequest {
    pub fn new(url: &str, source: Source, fetchto: &Path, checkout: Checkout, is_fetched: bool) -> Self {
        Self {
            url: url.to_string(),
            source: source,
            fetchto: fetchto.to_path_buf(),
            checkout: checkout,
            is_fetched: is_fetched,
        }
    }

    pub fn get_url(&self) -> &str {
        &self.url
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

    /// Checks if the content is already on disk, making this fetch an update.
    pub fn is_fetched(&self) -> bool {
        self.is_fetched
    }

    /// The directory name the content lands in under the fetch directory.
    pub fn get_basename(&self) -> String {
        source::target_name(&self.url, self.source)
    }

    /// The directory the content lands in.
    pub fn get_target(&self) -> PathBuf {
        self.fetchto.join(self.get_basename())
    }
}

/// Retrieves a remote module's content into its fetch directory.
pub trait Fetch: Send + Sync {
    /// Clones or updates the content described by `req`, returning where it landed.
    fn fetch(&self, req: &FetchRequest) -> Result<PathBuf, FetchError>;

    /// Returns a stable identifier for the state currently checked out at `path`.
    fn resolved_commit(&self, path: &Path) -> Result<String, FetchError>;
}

/// The fetcher to use for each remote source kind.
pub struct Fetchers {
    git: Box<dyn Fetch>,
    svn: Box<dyn Fetch>,
}

impl Fetchers {
    pub fn new(git: Box<dyn Fetch>, svn: Box<dyn Fetch>) -> Self {
        Self { git, svn }
    }

    /// Creates the fetchers that call the external `git` and `svn` programs
    /// configured in `c`.
    pub fn from_context(c: &Context) -> Self {
        Self {
            git: Box::new(
                ExtGit::new()
                    .command(Some(c.get_git().to_string()))
                    .timeout(c.get_fetch_timeout()),
            ),
            svn: Box::new(
                ExtSvn::new()
                    .command(Some(c.get_svn().to_string()))
                    .timeout(c.get_fetch_timeout()),
            ),
        }
    }

    /// Accesses the fetcher for `source`. Local modules have none.
    pub fn get(&self, source: Source) -> Option<&dyn Fetch> {
        match source {
            Source::Git => Some(self.git.as_ref()),
            Source::Svn => Some(self.svn.as_ref()),
            Source::Local => None,
        }
    }
}

/// Creates the fetch directory if it is missing.
pub(crate) fn ensure_dir(dir: &Path) -> Result<(), FetchError> {
    if dir.exists() == false {
        std::fs::create_dir_all(dir).map_err(|e| FetchError::CreateDir(dir.to_path_buf(), e))?;
    }
    Ok(())
}

/// Writes an executable stand-in for a version-control client into `dir`.
///
/// Each call appends its arguments as one line to the returned log. A clone,
/// or a checkout naming a destination, creates that destination, and
/// `submodule` reports commit `0123abcd`.
#[cfg(all(test, unix))]
pub(crate) fn stub_client(dir: &Path) -> (String, PathBuf) {
    use std::os::unix::fs::PermissionsExt;
    let log = dir.join("calls.log");
    let program = dir.join("client.sh");
    let script = format!(
        r#"#!/bin/sh
echo "$@" >> '{}'
for last in "$@"; do :; done
case "$1" in
    clone) mkdir -p "$last" ;;
    checkout) if [ "$#" -gt 2 ]; then mkdir -p "$last"; fi ;;
    submodule) echo " 0123abcd mod" ;;
esac
"#,
        log.display()
    );
    std::fs::write(&program, script).unwrap();
    std::fs::set_permissions(&program, std::fs::Permissions::from_mode(0o755)).unwrap();
    (program.display().to_string(), log)
}

/// Reads the calls recorded by a client from [stub_client].
#[cfg(all(test, unix))]
pub(crate) fn stub_calls(log: &Path) -> Vec<String> {
    std::fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .map(|l| l.to_string())
        .collect()
}
