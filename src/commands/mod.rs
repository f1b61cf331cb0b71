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

pub mod deps;
pub mod fetch;
pub mod hdlmod;
pub mod list;

mod helps;

use crate::core::diagnostic::Diagnostics;
use crate::core::module::Module;
use crate::core::tree::ModuleTree;
use crate::error::ResolveError;
use std::path::PathBuf;

/// Creates the tree of the project rooted at `path`, or the current directory.
///
/// Remote modules are looked for under `fetchto`, which defaults to the root.
fn open_project(path: Option<PathBuf>, fetchto: Option<PathBuf>) -> Result<ModuleTree, ResolveError> {
    let path = path.unwrap_or(PathBuf::from("."));
    let fetchto = fetchto.unwrap_or(path.clone());
    Ok(ModuleTree::new(Module::new_local(&path, &fetchto)?))
}

/// Prints the collected diagnostics to standard error.
fn report(diagnostics: &Diagnostics) {
    for d in diagnostics.iter() {
        eprintln!("{}", d);
    }
}
