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

pub mod lexer;
pub mod vhdl;

use lexer::Position;
pub use vhdl::identifier::Identifier;

/// Extracts the design units a source file declares and the ones it references.
///
/// Implementations must be pure functions of the text so files can be scanned
/// in any order and on any thread.
pub trait Scan: Sync {
    fn scan(&self, text: &str) -> Units;
}

/// The design units found in one source file.
#[derive(Debug, PartialEq, Default, Clone)]
pub struct Units {
    pub declared: Vec<Identifier>,
    pub used: Vec<UnitRef>,
}

impl Units {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A reference to design unit `unit` within library `library`.
#[derive(Debug, PartialEq, Clone)]
pub struct UnitRef {
    library: Identifier,
    unit: Identifier,
    position: Position,
}

impl UnitRef {
    pub fn new(library: Identifier, unit: Identifier, position: Position) -> Self {
        Self {
            library,
            unit,
            position,
        }
    }

    pub fn get_library(&self) -> &Identifier {
        &self.library
    }

    pub fn get_unit(&self) -> &Identifier {
        &self.unit
    }

    /// Location of the reference within its file.
    pub fn get_position(&self) -> &Position {
        &self.position
    }
}

impl std::fmt::Display for UnitRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.library, self.unit)
    }
}
