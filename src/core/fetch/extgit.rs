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

use super::{ensure_dir, Fetch, FetchError, FetchRequest};
use crate::core::source::{Checkout, Source};
use crate::util::process::Process;
use std::path::{Path, PathBuf};
use std::time::Duration;

const COMMIT_ID_LEN: usize = 32;

/// A series of git commands necessary to run through subprocesses rather than libgit2 bindings.
pub struct ExtGit {
    command: String,
    timeout: Option<Duration>,
}

impl ExtGit {
    /// Creates an `ExtGit` struct that calls `git` with no time limit.
    pub fn new() -> Self {
        Self {
            command: String::from("git"),
            timeout: None,
        }
    }

    /// Sets the command for calling git through processes.
    ///
    /// By `s` is `None`, the command assumes git is on path and is simply `git`.
    pub fn command(mut self, s: Option<String>) -> Self {
        self.command = s.unwrap_or("git".to_string());
        self
    }

    /// Sets the longest time a single git call may take.
    pub fn timeout(mut self, limit: Option<Duration>) -> Self {
        self.timeout = limit;
        self
    }

    fn git(&self, dir: &Path) -> Process {
        Process::new(&self.command).cwd(dir).timeout(self.timeout)
    }

    /// Clones a repository `url` into the directory `dest` under `dir`.
    ///
    /// Runs the command: `git clone -- <url> <dest>`.
    pub fn clone(&self, dir: &Path, url: &str, dest: &str) -> Result<(), FetchError> {
        self.git(dir).args(["clone", "--", url, dest]).output()?;
        Ok(())
    }

    /// Checks out `id` in the repository at `repo`.
    ///
    /// Runs the command: `git checkout <id>`.
    pub fn checkout(&self, repo: &Path, id: &str) -> Result<(), FetchError> {
        self.git(repo).args(["checkout", id]).output()?;
        Ok(())
    }

    /// Looks up the commit an enclosing superproject records for submodule
    /// `name` under `dir`.
    ///
    /// Runs the command: `git submodule status -- <name>`. Any failure, such
    /// as `dir` not being inside a repository, means there is no recorded commit.
    pub fn submodule_commit(&self, dir: &Path, name: &str) -> Option<String> {
        match self.git(dir).args(["submodule", "status", "--", name]).output() {
            Ok(out) => parse_submodule_status(&out),
            Err(e) => {
                tracing::debug!("no submodule commit for {:?}: {}", name, e);
                None
            }
        }
    }
}

/// Reads the commit out of `git submodule status` output for exactly one submodule.
///
/// Each line is a state character (` `, `+`, `-`, or `U`), the commit, the path,
/// and an optional description.
fn parse_submodule_status(output: &str) -> Option<String> {
    let mut lines = output.lines().filter(|l| l.trim().is_empty() == false);
    let line = lines.next()?;
    if lines.next().is_some() {
        return None;
    }
    let line = match line.chars().next()? {
        ' ' | '+' | '-' | 'U' => &line[1..],
        _ => line,
    };
    let mut fields = line.split_whitespace();
    let commit = fields.next()?;
    // the path must follow the commit
    fields.next()?;
    match commit.chars().all(|c| c.is_ascii_hexdigit()) {
        true => Some(commit.to_string()),
        false => None,
    }
}

impl Fetch for ExtGit {
    fn fetch(&self, req: &FetchRequest) -> Result<PathBuf, FetchError> {
        if req.get_source() != Source::Git {
            return Err(FetchError::WrongSource("git", req.get_source()));
        }
        let fetchto = req.get_fetchto();
        ensure_dir(fetchto)?;
        let basename = req.get_basename();
        let target = req.get_target();

        if req.is_fetched() == false && target.exists() == false {
            tracing::info!("fetching git module {:?}", target);
            self.clone(fetchto, req.get_url(), &basename)?;
        } else {
            tracing::info!("updating git module {:?}", target);
        }

        let checkout_id = match req.get_checkout() {
            Checkout::Branch(b) => {
                tracing::debug!("git branch requested: {}", b);
                Some(b.clone())
            }
            Checkout::Revision(r) => {
                tracing::debug!("git commit requested: {}", r);
                Some(r.clone())
            }
            Checkout::Default => {
                let id = self.submodule_commit(fetchto, &basename);
                tracing::debug!("git submodule commit: {:?}", id);
                id
            }
        };
        if let Some(id) = checkout_id {
            tracing::info!("checking out version {}", id);
            self.checkout(&target, &id)?;
        }
        Ok(target)
    }

    fn resolved_commit(&self, path: &Path) -> Result<String, FetchError> {
        let out = self.git(path).args(["log", "-1", "--format=%H"]).output()?;
        Ok(out.trim().chars().take(COMMIT_ID_LEN).collect())
    }
}
