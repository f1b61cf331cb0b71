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

use std::env;
use std::time::Duration;

pub const HDLMOD_GIT: &str = "HDLMOD_GIT";
pub const HDLMOD_SVN: &str = "HDLMOD_SVN";
pub const HDLMOD_FETCH_TIMEOUT: &str = "HDLMOD_FETCH_TIMEOUT";
pub const HDLMOD_JOBS: &str = "HDLMOD_JOBS";
pub const HDLMOD_LOG: &str = "HDLMOD_LOG";

const DEFAULT_FETCH_TIMEOUT: u64 = 300;
const DEFAULT_LOG_FILTER: &str = "hdlmod=info";

/// Runtime settings shared by every command.
#[derive(Debug, PartialEq, Clone)]
pub struct Context {
    git: String,
    svn: String,
    fetch_timeout: u64,
    jobs: usize,
    log_filter: String,
    verbose: bool,
}

impl Context {
    pub fn new() -> Context {
        Context {
            git: String::from("git"),
            svn: String::from("svn"),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            jobs: 0,
            log_filter: String::from(DEFAULT_LOG_FILTER),
            verbose: false,
        }
    }

    pub fn retain_options(mut self, verbose: bool) -> Context {
        self.verbose = verbose;
        self
    }

    /// Sets the git executable from `key`, if set.
    pub fn git(mut self, key: &str) -> Result<Context, ContextError> {
        if let Ok(s) = env::var(key) {
            self.git = Self::non_empty(key, s)?;
        }
        Ok(self)
    }

    /// Sets the svn executable from `key`, if set.
    pub fn svn(mut self, key: &str) -> Result<Context, ContextError> {
        if let Ok(s) = env::var(key) {
            self.svn = Self::non_empty(key, s)?;
        }
        Ok(self)
    }

    /// Sets the number of seconds one external fetch call may take from `key`,
    /// if set. Zero disables the limit.
    pub fn fetch_timeout(mut self, key: &str) -> Result<Context, ContextError> {
        if let Ok(s) = env::var(key) {
            self.fetch_timeout = Self::number(key, &s)?;
        }
        Ok(self)
    }

    /// Sets the number of concurrent fetches from `key`, if set. Zero lets the
    /// thread pool decide.
    pub fn jobs(mut self, key: &str) -> Result<Context, ContextError> {
        if let Ok(s) = env::var(key) {
            self.jobs = Self::number(key, &s)?;
        }
        Ok(self)
    }

    /// Sets the tracing filter directive from `key`, if set.
    pub fn log_filter(mut self, key: &str) -> Result<Context, ContextError> {
        if let Ok(s) = env::var(key) {
            self.log_filter = Self::non_empty(key, s)?;
        }
        Ok(self)
    }

    /// Overrides the number of concurrent fetches.
    pub fn with_jobs(mut self, jobs: Option<usize>) -> Context {
        if let Some(n) = jobs {
            self.jobs = n;
        }
        self
    }

    pub fn get_git(&self) -> &str {
        &self.git
    }

    pub fn get_svn(&self) -> &str {
        &self.svn
    }

    /// Access the per-call fetch time limit, if any.
    pub fn get_fetch_timeout(&self) -> Option<Duration> {
        match self.fetch_timeout {
            0 => None,
            n => Some(Duration::from_secs(n)),
        }
    }

    pub fn get_jobs(&self) -> usize {
        self.jobs
    }

    pub fn get_log_filter(&self) -> &str {
        &self.log_filter
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    fn non_empty(key: &str, s: String) -> Result<String, ContextError> {
        match s.trim().is_empty() {
            true => Err(ContextError(format!("{} cannot be empty", key))),
            false => Ok(s),
        }
    }

    fn number<T: std::str::FromStr>(key: &str, s: &str) -> Result<T, ContextError> {
        s.trim()
            .parse::<T>()
            .map_err(|_| ContextError(format!("{} must be a non-negative number but found {:?}", key, s)))
    }
}

#[derive(Debug, PartialEq)]
pub struct ContextError(String);

impl std::error::Error for ContextError {}

impl std::fmt::Display for ContextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let c = Context::new();
        assert_eq!(c.get_git(), "git");
        assert_eq!(c.get_svn(), "svn");
        assert_eq!(c.get_fetch_timeout(), Some(Duration::from_secs(300)));
        assert_eq!(c.get_jobs(), 0);
        assert_eq!(c.get_log_filter(), "hdlmod=info");
        assert_eq!(c.with_jobs(Some(4)).get_jobs(), 4);
    }

    #[test]
    fn reads_variables() {
        // unique names keep parallel tests from seeing each other's values
        env::set_var("HDLMOD_TEST_TIMEOUT_OK", "0");
        env::set_var("HDLMOD_TEST_JOBS_BAD", "four");
        env::set_var("HDLMOD_TEST_GIT", "/usr/local/bin/git");

        let c = Context::new()
            .fetch_timeout("HDLMOD_TEST_TIMEOUT_OK")
            .unwrap()
            .git("HDLMOD_TEST_GIT")
            .unwrap()
            .svn("HDLMOD_TEST_SVN_UNSET")
            .unwrap();
        assert_eq!(c.get_fetch_timeout(), None);
        assert_eq!(c.get_git(), "/usr/local/bin/git");
        assert_eq!(c.get_svn(), "svn");

        let err = Context::new().jobs("HDLMOD_TEST_JOBS_BAD").unwrap_err();
        assert_eq!(
            err.to_string(),
            "HDLMOD_TEST_JOBS_BAD must be a non-negative number but found \"four\""
        );
    }
}
