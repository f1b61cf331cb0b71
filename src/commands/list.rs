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

use super::helps::list;
use crate::core::context::Context;
use crate::core::diagnostic::Diagnostics;
use crate::core::fetch::Fetchers;
use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Help, Subcommand};
use std::path::PathBuf;

#[derive(Debug, PartialEq)]
pub struct List {
    path: Option<PathBuf>,
    fetchto: Option<PathBuf>,
    files: bool,
    commits: bool,
    tools: bool,
}

impl Subcommand<Context> for List {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(list::HELP))?;
        Ok(List {
            // flags
            files: cli.check(Arg::flag("files"))?,
            commits: cli.check(Arg::flag("commits"))?,
            tools: cli.check(Arg::flag("tools"))?,
            // options
            path: cli.get(Arg::option("path").value("dir"))?,
            fetchto: cli.get(Arg::option("fetchto").value("dir"))?,
        })
    }

    fn execute(self, c: &Context) -> proc::Result {
        let mut tree = super::open_project(self.path, self.fetchto)?;
        let mut diagnostics = Diagnostics::new();
        let result = tree.enumerate(&mut diagnostics);
        super::report(&diagnostics);
        let order = result?;

        let fetchers = Fetchers::from_context(c);
        for id in order {
            let m = tree.get(id);
            match (self.commits, fetchers.get(m.get_source()), m.get_path()) {
                (true, Some(f), Some(path)) => {
                    let commit = f
                        .resolved_commit(path)
                        .map_err(|e| e.into_resolve_error(m.get_url()))?;
                    println!("{}\t{}", m, commit);
                }
                _ => println!("{}", m),
            }
            if self.tools == true && m.get_manifest().is_some() {
                println!("    {}", m.get_tool());
            }
            if self.files == true {
                for file in m.get_files().into_iter().flatten() {
                    println!("    {}", file);
                }
            }
        }
        Ok(())
    }
}
