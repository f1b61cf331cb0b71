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

use super::helps::hdlmod;
use crate::commands::deps::Deps;
use crate::commands::fetch::Fetch;
use crate::commands::list::List;
use crate::core::context::{self, Context};
use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Command, Help, Subcommand};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, PartialEq)]
pub struct Hdlmod {
    version: bool,
    verbose: bool,
    command: Option<HdlmodSubcommand>,
}

impl Command for Hdlmod {
    fn interpret(cli: &mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(hdlmod::HELP))?;
        Ok(Hdlmod {
            version: cli.check(Arg::flag("version"))?,
            verbose: cli.check(Arg::flag("verbose"))?,
            command: cli.nest(Arg::subcommand("command"))?,
        })
    }

    fn execute(self) -> proc::Result {
        // prioritize version information
        if self.version == true {
            println!("hdlmod {}", VERSION);
            return Ok(());
        }
        let command = match self.command {
            Some(c) => c,
            None => {
                println!("{}", hdlmod::HELP);
                return Ok(());
            }
        };
        let context = Context::new()
            .git(context::HDLMOD_GIT)?
            .svn(context::HDLMOD_SVN)?
            .fetch_timeout(context::HDLMOD_FETCH_TIMEOUT)?
            .jobs(context::HDLMOD_JOBS)?
            .log_filter(context::HDLMOD_LOG)?
            .retain_options(self.verbose);

        Self::init_logging(&context);
        command.execute(&context)
    }
}

impl Hdlmod {
    /// Installs the tracing subscriber. Logs go to stderr so command output
    /// can be piped.
    fn init_logging(c: &Context) {
        let filter = match c.is_verbose() {
            true => EnvFilter::new("hdlmod=debug"),
            false => EnvFilter::new(c.get_log_filter()),
        };
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .init();
    }
}

#[derive(Debug, PartialEq)]
enum HdlmodSubcommand {
    Fetch(Fetch),
    List(List),
    Deps(Deps),
}

impl Subcommand<Context> for HdlmodSubcommand {
    fn interpret<'c>(cli: &'c mut Cli<Memory>) -> cli::Result<Self> {
        match cli.select(&["fetch", "list", "deps"])?.as_ref() {
            "fetch" => Ok(HdlmodSubcommand::Fetch(Fetch::interpret(cli)?)),
            "list" => Ok(HdlmodSubcommand::List(List::interpret(cli)?)),
            "deps" => Ok(HdlmodSubcommand::Deps(Deps::interpret(cli)?)),
            _ => panic!("an unimplemented command was passed through!"),
        }
    }

    fn execute(self, context: &Context) -> proc::Result {
        match self {
            HdlmodSubcommand::Fetch(c) => c.execute(context),
            HdlmodSubcommand::List(c) => c.execute(context),
            HdlmodSubcommand::Deps(c) => c.execute(context),
        }
    }
}
