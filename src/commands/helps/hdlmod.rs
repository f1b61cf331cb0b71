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

pub const HELP: &str = r#"Hdlmod resolves the modules and file dependencies of an hdl project.

Usage:
    hdlmod [options] [command]

Commands:
    fetch                 retrieve every module reachable from the project root
    list                  list the modules of an already fetched project
    deps                  print the file dependency graph

Options:
    --verbose             print debug information while running
    --version             print version information and exit
    --help, -h            print help information

Environment:
    HDLMOD_GIT            git executable (default: git)
    HDLMOD_SVN            svn executable (default: svn)
    HDLMOD_FETCH_TIMEOUT  seconds one fetch may take, 0 for no limit (default: 300)
    HDLMOD_JOBS           concurrent fetches, 0 for automatic (default: 0)
    HDLMOD_LOG            log filter directive (default: hdlmod=info)

Use 'hdlmod <command> --help' for more information about a command."#;
