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

pub const HELP: &str = r#"Retrieve every module reachable from the project root.

Usage:
    hdlmod fetch [options] [<url>]

Args:
    <url>                 remote module to use as the project root

Options:
    --source <kind>       kind of the root module: local, svn, git (default: git)
    --fetchto <dir>       directory remote modules are placed into
    --path <dir>          directory of the project root (default: .)
    --jobs <n>            number of fetches to run at once

Modules already present on disk are updated instead of fetched again.
The resolved modules are printed root first, one per line.
"#;
