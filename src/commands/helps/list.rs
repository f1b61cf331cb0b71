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

pub const HELP: &str = r#"List the modules of an already fetched project.

Usage:
    hdlmod list [options]

Options:
    --path <dir>          directory of the project root (default: .)
    --fetchto <dir>       directory remote modules were fetched into (default: <path>)
    --files               print the source files of each module
    --commits             print the checked out commit of each remote module
    --tools               print the tool options of each module with a manifest

Nothing is fetched. A module that has not been fetched yet is an error.
"#;
