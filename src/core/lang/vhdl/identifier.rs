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

use super::token::char_set;
use crate::core::lang::lexer::TrainCar;
use crate::util::strcmp;
use serde_derive::Serialize;
use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A VHDL name. Basic identifiers ignore case, extended identifiers do not.
#[derive(Debug, Clone, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum Identifier {
    Basic(String),
    Extended(String),
}

impl std::cmp::Eq for Identifier {}

impl Identifier {
    /// Creates a new basic identifier for the working library: `work`.
    pub fn new_working() -> Self {
        Self::Basic(String::from("work"))
    }

    /// Creates the lookup name for a file from its stem, used when a file is
    /// referenced by its own name.
    pub fn from_file_stem(stem: &str) -> Self {
        match Self::from_str(stem) {
            Ok(id) => id,
            Err(_) => Self::Basic(stem.to_string()),
        }
    }

    // Returns the reference to the inner `String` struct.
    fn as_str(&self) -> &str {
        match self {
            Self::Basic(id) => id.as_ref(),
            Self::Extended(id) => id.as_ref(),
        }
    }

    /// Checks if `self` is an extended identifier or not.
    fn is_extended(&self) -> bool {
        match self {
            Self::Extended(_) => true,
            Self::Basic(_) => false,
        }
    }
}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Basic(id) => strcmp::fold(id).hash(state),
            Self::Extended(id) => id.hash(state),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum IdentifierError {
    Empty,
    InvalidFirstChar(char),
    InvalidChar(char),
    Unterminated,
    CharsAfterDelimiter(String),
}

impl std::error::Error for IdentifierError {}

impl Display for IdentifierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty identifier"),
            Self::CharsAfterDelimiter(s) => write!(
                f,
                "characters \'{}\' found following closing extended backslash",
                s
            ),
            Self::InvalidFirstChar(c) => {
                write!(f, "first character must be letter but found \'{}\'", c)
            }
            Self::InvalidChar(c) => write!(f, "invalid character \'{}\'", c),
            Self::Unterminated => write!(f, "missing closing extended backslash"),
        }
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = TrainCar::new(s.chars());
        match chars.consume() {
            // check what type of identifier it is
            Some('\\') => {
                let result = match char_set::consume_extended(&mut chars) {
                    Some(id) => Self::Extended(id),
                    None => return Err(Self::Err::Unterminated),
                };
                // gather remaining characters
                let mut rem = String::new();
                while let Some(c) = chars.consume() {
                    rem.push(c);
                }
                match rem.is_empty() {
                    true => Ok(result),
                    false => Err(Self::Err::CharsAfterDelimiter(rem)),
                }
            }
            Some(c) => {
                // verify the first character was a letter
                if char_set::is_letter(&c) == false {
                    return Err(Self::Err::InvalidFirstChar(c));
                }
                let word = char_set::consume_word(&mut chars, c);
                match chars.consume() {
                    Some(bad) => Err(Self::Err::InvalidChar(bad)),
                    None => Ok(Self::Basic(word)),
                }
            }
            None => Err(Self::Err::Empty),
        }
    }
}

impl std::cmp::PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        // instantly not equal if not they are not of same type
        if self.is_extended() != other.is_extended() {
            return false;
        };
        // compare with case sensitivity
        if self.is_extended() == true {
            self.as_str() == other.as_str()
        // compare without case sensitivity
        } else {
            strcmp::cmp_ignore_case(self.as_str(), other.as_str())
        }
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic(id) => write!(f, "{}", id),
            Self::Extended(id) => write!(f, "\\{}\\", id.replace('\\', r#"\\"#)),
        }
    }
}
