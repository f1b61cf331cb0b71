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

use super::helps::deps;
use crate::core::context::Context;
use crate::core::depgraph::DepGraph;
use crate::core::diagnostic::Diagnostics;
use crate::core::lang::vhdl::scanner::VhdlScanner;
use crate::core::sourcefile::SourceFile;
use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Help, Subcommand};
use std::path::PathBuf;

#[derive(Debug, PartialEq)]
pub struct Deps {
    path: Option<PathBuf>,
    fetchto: Option<PathBuf>,
    json: bool,
}

impl Subcommand<Context> for Deps {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(deps::HELP))?;
        Ok(Deps {
            // flags
            json: cli.check(Arg::flag("json"))?,
            // options
            path: cli.get(Arg::option("path").value("dir"))?,
            fetchto: cli.get(Arg::option("fetchto").value("dir"))?,
        })
    }

    fn execute(self, _: &Context) -> proc::Result {
        let mut tree = super::open_project(self.path, self.fetchto)?;
        let mut diagnostics = Diagnostics::new();
        let order = match tree.enumerate(&mut diagnostics) {
            Ok(o) => o,
            Err(e) => {
                super::report(&diagnostics);
                return Err(e)?;
            }
        };

        let files: Vec<&SourceFile> = tree.hdl_files(&order, &mut diagnostics);
        tracing::debug!("building graph over {} hdl files", files.len());

        let graph = DepGraph::build(&files, &VhdlScanner, &mut diagnostics);
        super::report(&diagnostics);
        let graph = graph?;

        match self.json {
            true => println!("{}", graph.to_json()?),
            false => print!("{}", graph),
        }
        if diagnostics.warnings() > 0 {
            tracing::info!("{} warnings", diagnostics.warnings());
        }
        Ok(())
    }
}
