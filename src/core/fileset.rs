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

use crate::core::diagnostic::{Diagnostic, Diagnostics};
use crate::util::filesystem;
use glob::{MatchOptions, Pattern};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Checks if the `file` is a VHDL file (ending with .vhd or .vhdl).
pub fn is_vhdl(file: &str) -> bool {
    if let Some((_, ending)) = file.rsplit_once('.') {
        crate::util::strcmp::cmp_ascii_ignore_case(ending, "vhd")
            || crate::util::strcmp::cmp_ascii_ignore_case(ending, "vhdl")
    } else {
        false
    }
}

/// Determines which files a list of manifest `files` entries names.
///
/// Each entry is resolved against `root` and may be a file, a directory (taken
/// recursively), or a glob pattern. Absolute entries are omitted. Directories in
/// `prune` are not descended into and files in `skip` are never returned. The
/// result follows the order of the entries, without repeats.
pub fn expand_entries(
    root: &Path,
    entries: &[String],
    prune: &[PathBuf],
    skip: &[PathBuf],
    manifest: &Path,
    diagnostics: &mut Diagnostics,
) -> Vec<PathBuf> {
    let match_opts = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };
    let skip_full: Vec<PathBuf> = skip.iter().map(|p| filesystem::full_path(p)).collect();

    let mut seen = HashSet::new();
    let mut files = Vec::new();
    let mut collect = |list: Vec<PathBuf>| {
        for f in list {
            if seen.insert(f.clone()) == true {
                files.push(f);
            }
        }
    };

    for entry in entries {
        if Path::new(entry).is_absolute() == true {
            diagnostics.push(Diagnostic::AbsoluteFileOmitted {
                manifest: manifest.to_path_buf(),
                entry: entry.clone(),
            });
            continue;
        }
        let target = root.join(entry);
        if target.is_file() == true {
            let target = filesystem::full_path(&target);
            if skip_full.contains(&target) == false {
                collect(vec![target]);
            }
        } else if target.is_dir() == true {
            collect(filesystem::gather_files(&target, prune, skip));
        } else {
            let base = Pattern::escape(&root.to_string_lossy());
            let pattern = format!("{}/{}", base.trim_end_matches('/'), entry);
            let matches: Vec<PathBuf> = match glob::glob_with(&pattern, match_opts) {
                Ok(paths) => paths.filter_map(|p| p.ok()).collect(),
                Err(_) => Vec::new(),
            };
            let mut found = Vec::new();
            for m in matches {
                if m.is_dir() == true {
                    found.extend(filesystem::gather_files(&m, prune, skip));
                } else {
                    let m = filesystem::full_path(&m);
                    if skip_full.contains(&m) == false {
                        found.push(m);
                    }
                }
            }
            if found.is_empty() == true {
                diagnostics.push(Diagnostic::NoFilesMatched {
                    manifest: manifest.to_path_buf(),
                    pattern: entry.clone(),
                });
            }
            found.sort();
            collect(found);
        }
    }
    files
}
