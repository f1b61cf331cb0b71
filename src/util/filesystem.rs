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

use ignore::WalkBuilder;
use std::path::{Component, Path, PathBuf};

/// Resolves `path` against `root` when it is relative.
///
/// Absolute paths are returned untouched. The result is lexically normalized.
pub fn resolve_rel_path(root: &Path, path: &Path) -> PathBuf {
    match path.is_relative() {
        true => normalize_path(root.join(path)),
        false => normalize_path(path.to_path_buf()),
    }
}

/// Removes `.` components and folds `..` components into their parents without
/// touching the filesystem.
pub fn normalize_path(path: PathBuf) -> PathBuf {
    let mut result = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => (),
            Component::ParentDir => match result.components().next_back() {
                Some(Component::Normal(_)) => {
                    result.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => (),
                _ => result.push(comp),
            },
            _ => result.push(comp),
        }
    }
    result
}

/// Produces an absolute, normalized form of `path` for identity comparisons.
///
/// Links are resolved through the deepest ancestor that exists, so a path
/// agrees with itself before and after it is created.
pub fn full_path(path: &Path) -> PathBuf {
    let path = match path.is_relative() {
        true => match std::env::current_dir() {
            Ok(cwd) => normalize_path(cwd.join(path)),
            Err(_) => normalize_path(path.to_path_buf()),
        },
        false => normalize_path(path.to_path_buf()),
    };
    let mut rest = Vec::new();
    let mut base = path.as_path();
    loop {
        if let Ok(mut real) = std::fs::canonicalize(base) {
            for part in rest.iter().rev() {
                real.push(part);
            }
            return real;
        }
        match (base.parent(), base.file_name()) {
            (Some(parent), Some(name)) => {
                rest.push(name.to_os_string());
                base = parent;
            }
            _ => break,
        }
    }
    path
}

/// Checks if the final component of `path` begins with a dot.
pub fn is_hidden(path: &Path) -> bool {
    match path.file_name() {
        Some(name) => name.to_string_lossy().starts_with('.'),
        None => false,
    }
}

/// Recursively collects every regular file under `root`.
///
/// Hidden files and directories are skipped. Any directory listed in `prune` is
/// not descended into, and any file listed in `skip` is left out. The files
/// are returned sorted so repeated runs agree on the ordering.
pub fn gather_files(root: &Path, prune: &[PathBuf], skip: &[PathBuf]) -> Vec<PathBuf> {
    let prune: Vec<PathBuf> = prune.iter().map(|p| full_path(p)).collect();
    let skip: Vec<PathBuf> = skip.iter().map(|p| full_path(p)).collect();
    let root = full_path(root);

    let walker = WalkBuilder::new(&root)
        .standard_filters(false)
        .hidden(true)
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            is_dir == false || prune.iter().any(|p| p == entry.path()) == false
        })
        .build();

    let mut files: Vec<PathBuf> = walker
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.into_path())
        .filter(|p| skip.contains(p) == false)
        .collect();
    files.sort();
    files
}
