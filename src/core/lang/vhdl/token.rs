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

use super::identifier::Identifier;
use crate::core::lang::lexer::{Token, TrainCar};

pub mod char_set {
    use crate::core::lang::lexer::TrainCar;

    pub const DOUBLE_QUOTE: char = '\"';
    pub const BACKSLASH: char = '\\';
    pub const SINGLE_QUOTE: char = '\'';
    pub const DASH: char = '-';
    pub const FWDSLASH: char = '/';
    pub const STAR: char = '*';
    pub const UNDERLINE: char = '_';

    /// Checks if `c` is a digit according to VHDL-2008 LRM p225.
    pub fn is_digit(c: &char) -> bool {
        match c {
            '0'..='9' => true,
            _ => false,
        }
    }

    /// Checks if `c` is an upper-case letter according to VHDL-2019 LRM p257.
    /// Set: `ABCDEFGHIJKLMNOPQRSTUVWXYZÀÁÂÃÄÅÆÇÈÉÊËÌÍÎÏÐÑÒÓÔÕÖØÙÚÛÜÝÞ`
    pub fn is_upper(c: &char) -> bool {
        match c {
            '\u{00D7}' => false, // reject multiplication sign
            'A'..='Z' | 'À'..='Þ' => true,
            _ => false,
        }
    }

    /// Checks if `c` is a lower-case letter according to VHDL-2019 LRM p257.
    /// Set: `abcdefghijklmnopqrstuvwxyzßàáâãäåæçèéêëìíîïðñòóôõöøùúûüýþÿ`
    pub fn is_lower(c: &char) -> bool {
        match c {
            '\u{00F7}' => false, // reject division sign
            'a'..='z' | 'ß'..='ÿ' => true,
            _ => false,
        }
    }

    /// Checks if `c` is a letter according to VHDL-2019 LRM p257.
    pub fn is_letter(c: &char) -> bool {
        is_lower(&c) || is_upper(&c)
    }

    /// Checks if `c` is a digit | letter according to VHDL-2008 LRM p229.
    pub fn is_letter_or_digit(c: &char) -> bool {
        is_digit(&c) || is_letter(&c)
    }

    /// Checks if the character is a seperator according to VHDL-2019 LRM p259.
    pub fn is_separator(c: &char) -> bool {
        // whitespace: space, nbsp
        c == &'\u{0020}' || c == &'\u{00A0}' ||
        // format-effectors: ht (\t), vt, cr (\r), lf (\n)
        c == &'\u{0009}' || c == &'\u{000B}' || c == &'\u{000D}' || c == &'\u{000A}'
    }

    /// Collects the rest of a basic identifier that began with `first`.
    pub fn consume_word<T: Iterator<Item = char>>(train: &mut TrainCar<T>, first: char) -> String {
        let mut word = String::from(first);
        while let Some(c) = train.consume_if(|c| is_letter_or_digit(c) || c == &UNDERLINE) {
            word.push(c);
        }
        word
    }

    /// Collects an extended identifier after its opening backslash.
    ///
    /// A doubled backslash stands for one backslash. Returns `None` if the input
    /// ends before the closing backslash.
    pub fn consume_extended<T: Iterator<Item = char>>(train: &mut TrainCar<T>) -> Option<String> {
        let mut word = String::new();
        while let Some(c) = train.consume() {
            if c == BACKSLASH {
                match train.consume_if(|n| n == &BACKSLASH) {
                    Some(_) => word.push(BACKSLASH),
                    None => return Some(word),
                }
            } else {
                word.push(c);
            }
        }
        None
    }
}

/// The reserved words that shape design unit declarations and references.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Keyword {
    All,
    Architecture,
    Body,
    Configuration,
    Context,
    End,
    Entity,
    Is,
    Library,
    Of,
    Package,
    Use,
}

impl Keyword {
    /// Attempts to match `s` to a reserved word, ignoring case.
    pub fn match_keyword(s: &str) -> Option<Self> {
        Some(match s.to_ascii_lowercase().as_ref() {
            "all" => Self::All,
            "architecture" => Self::Architecture,
            "body" => Self::Body,
            "configuration" => Self::Configuration,
            "context" => Self::Context,
            "end" => Self::End,
            "entity" => Self::Entity,
            "is" => Self::Is,
            "library" => Self::Library,
            "of" => Self::Of,
            "package" => Self::Package,
            "use" => Self::Use,
            _ => return None,
        })
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum VhdlToken {
    Identifier(Identifier),
    Keyword(Keyword),
    Literal(String),
    Delimiter(char),
}

impl VhdlToken {
    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Self::Identifier(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_keyword(&self, kw: Keyword) -> bool {
        match self {
            Self::Keyword(k) => k == &kw,
            _ => false,
        }
    }

    pub fn is_delimiter(&self, d: char) -> bool {
        match self {
            Self::Delimiter(c) => c == &d,
            _ => false,
        }
    }
}

pub struct VhdlTokenizer;

impl VhdlTokenizer {
    /// Breaks VHDL source code `s` into tokens.
    ///
    /// Comments are dropped. Malformed literals and unterminated constructs are
    /// captured as far as the input reaches rather than rejected.
    pub fn tokenize(s: &str) -> Vec<Token<VhdlToken>> {
        let mut train = TrainCar::new(s.chars());
        let mut tokens: Vec<Token<VhdlToken>> = Vec::new();
        // consume every character (lexical analysis)
        while let Some(c) = train.consume() {
            // skip over whitespace
            if char_set::is_separator(&c) {
                continue;
            }
            let tk_loc = train.locate().clone();
            let tk = if char_set::is_letter(&c) {
                let word = char_set::consume_word(&mut train, c);
                match Keyword::match_keyword(&word) {
                    Some(kw) => VhdlToken::Keyword(kw),
                    None => VhdlToken::Identifier(Identifier::Basic(word)),
                }
            } else if c == char_set::BACKSLASH {
                let word = char_set::consume_extended(&mut train).unwrap_or_default();
                VhdlToken::Identifier(Identifier::Extended(word))
            } else if c == char_set::DOUBLE_QUOTE {
                VhdlToken::Literal(Self::consume_str_lit(&mut train))
            } else if c == char_set::SINGLE_QUOTE
                && tokens
                    .last()
                    .map(|t| match t.as_ref() {
                        VhdlToken::Delimiter(_) => true,
                        _ => false,
                    })
                    .unwrap_or(true)
            {
                // a tick following a delimiter opens a character literal
                let mut lit = String::new();
                if let Some(ch) = train.consume() {
                    lit.push(ch);
                }
                train.consume_if(|n| n == &char_set::SINGLE_QUOTE);
                VhdlToken::Literal(lit)
            } else if char_set::is_digit(&c) {
                let mut lit = String::from(c);
                while let Some(d) = train.consume_if(|n| {
                    char_set::is_letter_or_digit(n) || n == &char_set::UNDERLINE || n == &'.' || n == &'#'
                }) {
                    lit.push(d);
                }
                VhdlToken::Literal(lit)
            } else if c == char_set::DASH && train.peek() == Some(&char_set::DASH) {
                // single-line comment
                while let Some(_) = train.consume_if(|n| n != &'\n') {}
                continue;
            } else if c == char_set::FWDSLASH && train.peek() == Some(&char_set::STAR) {
                // delimited (multi-line) comment
                train.consume();
                let mut prev = ' ';
                while let Some(n) = train.consume() {
                    if prev == char_set::STAR && n == char_set::FWDSLASH {
                        break;
                    }
                    prev = n;
                }
                continue;
            } else {
                VhdlToken::Delimiter(c)
            };
            tokens.push(Token::new(tk, tk_loc));
        }
        tokens
    }

    /// Collects a string literal after its opening double quote. A doubled quote
    /// stands for one quote.
    fn consume_str_lit<T: Iterator<Item = char>>(train: &mut TrainCar<T>) -> String {
        let mut lit = String::new();
        while let Some(c) = train.consume() {
            if c == char_set::DOUBLE_QUOTE {
                match train.consume_if(|n| n == &char_set::DOUBLE_QUOTE) {
                    Some(_) => lit.push(c),
                    None => break,
                }
            } else {
                lit.push(c);
            }
        }
        lit
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::lang::lexer::Position;

    fn types(s: &str) -> Vec<VhdlToken> {
        VhdlTokenizer::tokenize(s)
            .into_iter()
            .map(|t| t.as_ref().clone())
            .collect()
    }

    #[test]
    fn words_and_keywords() {
        assert_eq!(
            types("PACKAGE Pkg IS"),
            vec![
                VhdlToken::Keyword(Keyword::Package),
                VhdlToken::Identifier(Identifier::Basic(String::from("Pkg"))),
                VhdlToken::Keyword(Keyword::Is),
            ]
        );
        assert_eq!(
            types("use work.\\My Pkg\\.all;"),
            vec![
                VhdlToken::Keyword(Keyword::Use),
                VhdlToken::Identifier(Identifier::Basic(String::from("work"))),
                VhdlToken::Delimiter('.'),
                VhdlToken::Identifier(Identifier::Extended(String::from("My Pkg"))),
                VhdlToken::Delimiter('.'),
                VhdlToken::Keyword(Keyword::All),
                VhdlToken::Delimiter(';'),
            ]
        );
    }

    #[test]
    fn skips_comments_and_literals() {
        let s = "-- entity fake is\n/* package hidden is */ x <= \"use a.b;\"; c <= 'x';";
        assert_eq!(
            types(s),
            vec![
                VhdlToken::Identifier(Identifier::Basic(String::from("x"))),
                VhdlToken::Delimiter('<'),
                VhdlToken::Delimiter('='),
                VhdlToken::Literal(String::from("use a.b;")),
                VhdlToken::Delimiter(';'),
                VhdlToken::Identifier(Identifier::Basic(String::from("c"))),
                VhdlToken::Delimiter('<'),
                VhdlToken::Delimiter('='),
                VhdlToken::Literal(String::from("x")),
                VhdlToken::Delimiter(';'),
            ]
        );
    }

    #[test]
    fn attribute_tick_is_delimiter() {
        assert_eq!(
            types("a'length"),
            vec![
                VhdlToken::Identifier(Identifier::Basic(String::from("a"))),
                VhdlToken::Delimiter('\''),
                VhdlToken::Identifier(Identifier::Basic(String::from("length"))),
            ]
        );
    }

    #[test]
    fn positions() {
        let tokens = VhdlTokenizer::tokenize("library ieee;\n  use ieee.numeric_std.all;");
        assert_eq!(tokens[0].locate(), &Position::place(1, 1));
        assert_eq!(tokens[3].locate(), &Position::place(2, 3));
    }
}
