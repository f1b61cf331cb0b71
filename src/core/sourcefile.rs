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

use crate::core::fileset;
use crate::core::lang::Identifier;
use std::path::{Path, PathBuf};

/// A file found in a module's directory, tagged with the library it compiles into.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    path: PathBuf,
    library: Identifier,
}

impl SourceFile {
    pub fn new(path: PathBuf, library: Identifier) -> Self {
        Self { path, library }
    }

    pub fn get_path(&self) -> &Path {
        &self.path
    }

    pub fn get_library(&self) -> &Identifier {
        &self.library
    }

    pub fn get_extension(&self) -> Option<&str> {
        self.path.extension()?.to_str()
    }

    /// The file name without its final extension.
    pub fn get_stem(&self) -> Option<&str> {
        self.path.file_stem()?.to_str()
    }

    /// Checks if the file holds VHDL code that takes part in the dependency graph.
    pub fn is_vhdl(&self) -> bool {
        match self.path.file_name().and_then(|n| n.to_str()) {
            Some(name) => fileset::is_vhdl(name),
            None => false,
        }
    }
}

impl std::fmt::Display for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}", self.library, self.path.display())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn attributes() {
        let f = SourceFile::new(
            PathBuf::from("/proj/rtl/Top.VHD"),
            Identifier::new_working(),
        );
        assert_eq!(f.get_extension(), Some("VHD"));
        assert_eq!(f.get_stem(), Some("Top"));
        assert_eq!(f.is_vhdl(), true);
        assert_eq!(f.to_string(), "work\t/proj/rtl/Top.VHD");

        let f = SourceFile::new(PathBuf::from("/proj/constraints.xdc"), Identifier::new_working());
        assert_eq!(f.is_vhdl(), false);
    }
}
