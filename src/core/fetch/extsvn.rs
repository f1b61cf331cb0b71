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
use crate::core::source::Source;
use crate::util::process::Process;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Subversion commands run through subprocesses.
pub struct ExtSvn {
    command: String,
    timeout: Option<Duration>,
}

impl ExtSvn {
    /// Creates an `ExtSvn` struct that calls `svn` with no time limit.
    pub fn new() -> Self {
        Self {
            command: String::from("svn"),
            timeout: None,
        }
    }

    /// Sets the command for calling svn through processes.
    pub fn command(mut self, s: Option<String>) -> Self {
        self.command = s.unwrap_or("svn".to_string());
        self
    }

    /// Sets the longest time a single svn call may take.
    pub fn timeout(mut self, limit: Option<Duration>) -> Self {
        self.timeout = limit;
        self
    }

    fn svn(&self, dir: &Path) -> Process {
        Process::new(&self.command).cwd(dir).timeout(self.timeout)
    }

    /// Builds the arguments for a fresh checkout of `url` into `dest`.
    fn checkout_args(url: &str, dest: &str, revision: Option<&str>) -> Vec<String> {
        let mut args = vec![String::from("checkout")];
        if let Some(r) = revision {
            args.push(String::from("-r"));
            args.push(r.to_string());
        }
        args.extend([String::from("--"), url.to_string(), dest.to_string()]);
        args
    }

    /// Builds the arguments for updating an existing working copy.
    fn update_args(revision: Option<&str>) -> Vec<String> {
        let mut args = vec![String::from("update")];
        if let Some(r) = revision {
            args.push(String::from("-r"));
            args.push(r.to_string());
        }
        args
    }
}

impl Fetch for ExtSvn {
    fn fetch(&self, req: &FetchRequest) -> Result<PathBuf, FetchError> {
        if req.get_source() != Source::Svn {
            return Err(FetchError::WrongSource("svn", req.get_source()));
        }
        let fetchto = req.get_fetchto();
        ensure_dir(fetchto)?;
        let target = req.get_target();
        // svn has no branches apart from the url itself
        let revision = req.get_checkout().as_revision();

        if req.is_fetched() == false && target.exists() == false {
            tracing::info!("fetching svn module {:?}", target);
            self.svn(fetchto)
                .args(Self::checkout_args(req.get_url(), &req.get_basename(), revision))
                .output()?;
        } else {
            tracing::info!("updating svn module {:?}", target);
            self.svn(&target).args(Self::update_args(revision)).output()?;
        }
        Ok(target)
    }

    fn resolved_commit(&self, path: &Path) -> Result<String, FetchError> {
        let out = self
            .svn(path)
            .args(["info", "--show-item", "revision"])
            .output()?;
        Ok(out.trim().to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::source::Checkout;

    #[test]
    fn argument_lists() {
        assert_eq!(
            ExtSvn::checkout_args("http://svn.example/x", "x", Some("1200")),
            vec!["checkout", "-r", "1200", "--", "http://svn.example/x", "x"]
        );
        assert_eq!(
            ExtSvn::checkout_args("http://svn.example/x", "x", None),
            vec!["checkout", "--", "http://svn.example/x", "x"]
        );
        assert_eq!(ExtSvn::update_args(None), vec!["update"]);
        assert_eq!(ExtSvn::update_args(Some("7")), vec!["update", "-r", "7"]);
    }

    #[cfg(unix)]
    fn fetch_with_stub(dir: &Path, checkout: Checkout) -> (PathBuf, Vec<String>) {
        use crate::core::fetch::{stub_calls, stub_client};
        let (program, log) = stub_client(dir);
        let req = FetchRequest::new(
            "http://svn.example/x",
            Source::Svn,
            &dir.join("ip_cores"),
            checkout,
            false,
        );
        let target = ExtSvn::new().command(Some(program)).fetch(&req).unwrap();
        (target, stub_calls(&log))
    }

    #[test]
    #[cfg(unix)]
    fn checks_out_fresh_target_at_revision() {
        let dir = tempfile::tempdir().unwrap();
        let (target, calls) = fetch_with_stub(dir.path(), Checkout::Revision(String::from("1200")));
        assert_eq!(target, dir.path().join("ip_cores/x"));
        assert_eq!(target.is_dir(), true);
        assert_eq!(calls, vec!["checkout -r 1200 -- http://svn.example/x x"]);
    }

    #[test]
    #[cfg(unix)]
    fn present_target_is_updated() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("ip_cores/x")).unwrap();
        let (_, calls) = fetch_with_stub(dir.path(), Checkout::Revision(String::from("7")));
        assert_eq!(calls, vec!["update -r 7"]);

        // a branch has no meaning to svn
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("ip_cores/x")).unwrap();
        let (_, calls) = fetch_with_stub(dir.path(), Checkout::Branch(String::from("develop")));
        assert_eq!(calls, vec!["update"]);
    }
}
