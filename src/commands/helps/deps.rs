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

pub const HELP: &str = r#"Print the file dependency graph of an already fetched project.

Usage:
    hdlmod deps [options]

Options:
    --path <dir>          directory of the project root (default: .)
    --fetchto <dir>       directory remote modules were fetched into (default: <path>)
    --json                print the graph as json

Each hdl file is printed followed by the files it depends on.
Unresolved references are reported as warnings on stderr.
"#;
