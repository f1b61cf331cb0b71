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

use colored::Colorize;
use std::{fmt::Display, path::PathBuf, time::Duration};

/// Errors that stop a resolution run.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("module {0:?} has unknown source kind {1:?}{2}")]
    InvalidModuleSource(String, String, Hint),
    #[error("module url {0:?} does not name a directory to fetch into")]
    InvalidModuleUrl(String),
    #[error("local module path {0:?} does not exist")]
    MissingLocalPath(PathBuf),
    #[error("failed to parse manifest {0:?}: {1}")]
    ManifestParse(PathBuf, LastError),
    #[error("failed to fetch module {0:?}: {1}")]
    FetchFailure(String, LastError),
    #[error("timed out fetching module {0:?} after {1:?}{2}")]
    FetchTimeout(String, Duration, Hint),
    #[error("manifest {0:?} requires {1:?} to be a relative path")]
    RelativePathRequired(PathBuf, PathBuf),
    #[error("module {0:?} was never fetched{1}")]
    UnfetchedModule(String, Hint),
    #[error("failed to access {0:?}: {1}")]
    Io(PathBuf, LastError),
}

#[derive(Debug, PartialEq)]
pub struct LastError(pub String);

impl Display for LastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", ResolveError::lowerize(self.0.to_string()))
    }
}

impl ResolveError {
    pub fn lowerize(s: String) -> String {
        // get the first word
        let first_word = match s.split_whitespace().next() {
            Some(w) => w,
            None => return s,
        };
        // retain punctuation if the first word is all-caps and longer than 1 character
        if first_word.len() > 1
            && first_word
                .chars()
                .find(|c| c.is_ascii_lowercase() == true)
                .is_none()
        {
            s.to_string()
        } else {
            s.char_indices()
                .map(|(i, c)| if i == 0 { c.to_ascii_lowercase() } else { c })
                .collect()
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Hint {
    SourceKinds,
    FetchFirst,
    RaiseTimeout,
}

impl Display for Hint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::SourceKinds => "supported source kinds are \"local\", \"svn\", and \"git\"",
            Self::FetchFirst => "use `hdlmod fetch` to resolve the project before listing it, passing the same --fetchto",
            Self::RaiseTimeout => "set HDLMOD_FETCH_TIMEOUT to allow slower fetches more time",
        };
        write!(
            f,
            "\n\n{}: {}",
            "hint".green(),
            ResolveError::lowerize(message.to_string())
        )
    }
}
