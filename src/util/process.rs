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

//! Subprocess execution with a bounded wait.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("failed to run {0:?}: {1}")]
    Spawn(String, std::io::Error),
    #[error("{0:?} exited with error code {1}{2}")]
    ExitCode(String, i32, Stderr),
    #[error("{0:?} terminated by signal")]
    Terminated(String),
    #[error("{0:?} did not finish within {1:?}")]
    TimedOut(String, Duration),
}

/// Captured standard error, displayed as a trailing block when non-empty.
#[derive(Debug, PartialEq)]
pub struct Stderr(pub String);

impl std::fmt::Display for Stderr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.trim().is_empty() {
            true => Ok(()),
            false => write!(f, ": {}", self.0.trim()),
        }
    }
}

/// An external program invocation given as an argument list, never as a shell string.
#[derive(Debug, Clone)]
pub struct Process {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl Process {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            cwd: None,
            timeout: None,
        }
    }

    pub fn arg<S: AsRef<str>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Sets the directory from where to call the program.
    pub fn cwd(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    /// Sets the longest time the program may run before it is killed.
    pub fn timeout(mut self, limit: Option<Duration>) -> Self {
        self.timeout = limit;
        self
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Renders the invocation for messages, e.g. `git clone -- <url> mod`.
    pub fn display(&self) -> String {
        let mut text = self.program.clone();
        for a in &self.args {
            text.push(' ');
            text.push_str(a);
        }
        text
    }

    /// Runs the program to completion and returns its standard output.
    ///
    /// Errors if the program cannot start, exits with a non-zero code, is
    /// terminated by a signal, or outlives its timeout.
    pub fn output(&self) -> Result<String, ProcessError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        let mut child = cmd
            .spawn()
            .map_err(|e| ProcessError::Spawn(self.display(), e))?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match self.wait(&mut child) {
            Ok(s) => s,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        };
        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();

        match status.code() {
            Some(0) => Ok(stdout),
            Some(num) => Err(ProcessError::ExitCode(self.display(), num, Stderr(stderr))),
            None => Err(ProcessError::Terminated(self.display())),
        }
    }

    fn wait(&self, child: &mut Child) -> Result<std::process::ExitStatus, ProcessError> {
        let limit = match self.timeout {
            Some(t) => t,
            None => return child.wait().map_err(|e| ProcessError::Spawn(self.display(), e)),
        };
        let deadline = Instant::now() + limit;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => (),
                Err(e) => return Err(ProcessError::Spawn(self.display(), e)),
            }
            if Instant::now() >= deadline {
                return Err(ProcessError::TimedOut(self.display(), limit));
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }
}

/// Reads a child's pipe on its own thread so a chatty process cannot block on a full pipe.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<String> {
    std::thread::spawn(move || {
        let mut text = String::new();
        if let Some(mut p) = pipe {
            let mut bytes = Vec::new();
            if p.read_to_end(&mut bytes).is_ok() {
                text = String::from_utf8_lossy(&bytes).into_owned();
            }
        }
        text
    })
}
