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

use std::error::Error;
use std::fmt::Display;
use std::path::PathBuf;

/// Quickly implement a custom/unique error message.
///
/// Can also be used to wrap another error's message.
#[derive(Debug, PartialEq)]
pub struct AnyError(pub String);

impl Error for AnyError {}

impl Display for AnyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AnyError {
    fn from(value: &str) -> Self {
        AnyError(value.to_string())
    }
}

impl From<Fault> for AnyError {
    fn from(value: Fault) -> Self {
        AnyError(value.to_string())
    }
}

pub type Fault = Box<dyn Error>;

/// An error raised while handling a particular source code file.
///
/// Stores the (source code file, error).
#[derive(Debug)]
pub struct CodeFault(pub PathBuf, pub Box<dyn Error + Send + Sync>);

impl Error for CodeFault {}

impl CodeFault {
    /// References the file that produced the error.
    pub fn as_source_file(&self) -> &PathBuf {
        &self.0
    }
}

impl Display for CodeFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to read file {:?}: {}", self.0, self.1)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn code_fault_names_file() {
        let err = CodeFault(
            PathBuf::from("rtl/top.vhd"),
            Box::new(AnyError::from("permission denied")),
        );
        assert_eq!(
            err.to_string(),
            "failed to read file \"rtl/top.vhd\": permission denied"
        );
        assert_eq!(err.as_source_file(), &PathBuf::from("rtl/top.vhd"));
    }
}
