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

use super::helps::fetch;
use crate::core::context::Context;
use crate::core::diagnostic::Diagnostics;
use crate::core::fetch::Fetchers;
use crate::core::module::Module;
use crate::core::tree::ModuleTree;
use crate::error::ResolveError;
use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Help, Subcommand};
use std::path::PathBuf;

#[derive(Debug, PartialEq)]
pub struct Fetch {
    url: Option<String>,
    source: Option<String>,
    fetchto: Option<PathBuf>,
    path: Option<PathBuf>,
    jobs: Option<usize>,
}

impl Subcommand<Context> for Fetch {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(fetch::HELP))?;
        Ok(Fetch {
            // options
            source: cli.get(Arg::option("source").value("kind"))?,
            fetchto: cli.get(Arg::option("fetchto").value("dir"))?,
            path: cli.get(Arg::option("path").value("dir"))?,
            jobs: cli.get(Arg::option("jobs").value("n"))?,
            // positionals
            url: cli.get(Arg::positional("url"))?,
        })
    }

    fn execute(self, c: &Context) -> proc::Result {
        let c = c.clone().with_jobs(self.jobs);
        let root = self.root_module()?;
        tracing::debug!("project root is {}", root);

        let mut tree = ModuleTree::new(root);
        let mut diagnostics = Diagnostics::new();
        let result = tree.resolve(&Fetchers::from_context(&c), c.get_jobs(), &mut diagnostics);
        super::report(&diagnostics);

        let order = result?;
        for id in &order {
            println!("{}", tree.get(*id));
        }
        tracing::info!("resolved {} modules", order.len());
        Ok(())
    }
}

impl Fetch {
    /// Creates the project root from the command line, defaulting to the
    /// local directory given by `--path`.
    fn root_module(&self) -> Result<Module, ResolveError> {
        let path = self.path.clone().unwrap_or(PathBuf::from("."));
        let fetchto = self.fetchto.clone().unwrap_or(path.clone());
        match &self.url {
            Some(url) => Module::from_kind(self.source.as_deref().unwrap_or("git"), url, &fetchto),
            None => Module::new_local(&path, &fetchto),
        }
    }
}
