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

//! Recoverable conditions gathered during resolution and graph building.
//!
//! A run keeps going after any of these; the caller decides how to report them.

use crate::core::lang::{Identifier, UnitRef};
use colored::Colorize;
use std::fmt::Display;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Note,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "{}", "warning".yellow().bold()),
            Self::Note => write!(f, "{}", "note".cyan().bold()),
        }
    }
}

/// Why a unit reference did not become an edge.
#[derive(Debug, Clone, PartialEq)]
pub enum Unresolved {
    /// No file declares the unit.
    Missing,
    /// A file declares the unit, but it was compiled into this other library.
    LibraryMismatch(Identifier),
    /// The referenced library is not provided by any file in the project.
    ExternalLibrary,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    DefinitionConflict {
        unit: Identifier,
        previous: PathBuf,
        file: PathBuf,
    },
    UnresolvedDependency {
        file: PathBuf,
        reference: UnitRef,
        reason: Unresolved,
    },
    AbsoluteFileOmitted {
        manifest: PathBuf,
        entry: String,
    },
    NoFilesMatched {
        manifest: PathBuf,
        pattern: String,
    },
    FetchAbandoned {
        url: String,
        reason: String,
    },
    SharedFile {
        file: PathBuf,
        owner: String,
        module: String,
    },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Self::UnresolvedDependency {
                reason: Unresolved::ExternalLibrary,
                ..
            } => Severity::Note,
            Self::FetchAbandoned { .. } => Severity::Note,
            _ => Severity::Warning,
        }
    }

    /// Describes the condition without the severity prefix.
    pub fn message(&self) -> String {
        match self {
            Self::DefinitionConflict {
                unit,
                previous,
                file,
            } => format!(
                "unit \"{}\" is defined in both {:?} and {:?}; using {:?}",
                unit, previous, file, file
            ),
            Self::UnresolvedDependency {
                file,
                reference,
                reason,
            } => {
                let location = format!("{}{}", file.display(), reference.get_position());
                match reason {
                    Unresolved::Missing => {
                        format!("{}: no file defines unit \"{}\"", location, reference)
                    }
                    Unresolved::LibraryMismatch(found) => format!(
                        "{}: unit \"{}\" is only defined in library \"{}\"",
                        location,
                        reference,
                        found
                    ),
                    Unresolved::ExternalLibrary => format!(
                        "{}: unit \"{}\" belongs to a library outside the project",
                        location, reference
                    ),
                }
            }
            Self::AbsoluteFileOmitted { manifest, entry } => format!(
                "manifest {:?} lists absolute file {:?}; omitting it",
                manifest, entry
            ),
            Self::NoFilesMatched { manifest, pattern } => format!(
                "manifest {:?} entry {:?} matches no files",
                manifest, pattern
            ),
            Self::FetchAbandoned { url, reason } => {
                format!("fetch of module {:?} also failed: {}", url, reason)
            }
            Self::SharedFile {
                file,
                owner,
                module,
            } => format!(
                "file {:?} belongs to module {:?} and is also listed by module {:?}; keeping it in {:?}",
                file, owner, module, owner
            ),
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.severity(), self.message())
    }
}

/// Collects diagnostics in the order they are raised.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, d: Diagnostic) {
        tracing::debug!("{}", d.message());
        self.entries.push(d);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counts the entries at `Severity::Warning`.
    pub fn warnings(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity() == Severity::Warning)
            .count()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::lang::lexer::Position;

    #[test]
    fn names_file_and_unit() {
        let d = Diagnostic::UnresolvedDependency {
            file: PathBuf::from("/proj/top.vhd"),
            reference: UnitRef::new(
                Identifier::Basic(String::from("work")),
                Identifier::Basic(String::from("fifo")),
                Position::place(4, 5),
            ),
            reason: Unresolved::Missing,
        };
        assert_eq!(
            d.message(),
            "/proj/top.vhd:4:5: no file defines unit \"work.fifo\""
        );
        assert_eq!(d.severity(), Severity::Warning);
    }

    #[test]
    fn counts_warnings() {
        let mut list = Diagnostics::new();
        list.push(Diagnostic::NoFilesMatched {
            manifest: PathBuf::from("manifest.toml"),
            pattern: String::from("sim/*.vhd"),
        });
        list.push(Diagnostic::FetchAbandoned {
            url: String::from("https://example/a.git"),
            reason: String::from("exit code 128"),
        });
        assert_eq!(list.len(), 2);
        assert_eq!(list.warnings(), 1);
        assert_eq!(list.is_empty(), false);
    }
}
