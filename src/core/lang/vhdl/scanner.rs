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
use super::token::{Keyword, VhdlToken, VhdlTokenizer};
use crate::core::lang::lexer::Token;
use crate::core::lang::{Scan, UnitRef, Units};

/// Extracts design unit declarations and references from VHDL source code.
#[derive(Debug, Default, Clone, Copy)]
pub struct VhdlScanner;

impl Scan for VhdlScanner {
    fn scan(&self, text: &str) -> Units {
        let tokens = VhdlTokenizer::tokenize(text);
        let mut units = Units::new();
        let mut i = 0;
        while i < tokens.len() {
            let tk = tokens[i].as_ref();
            match tk {
                VhdlToken::Keyword(Keyword::Package) => {
                    // `package body` is the implementation of a declared package
                    if let Some(id) = declaration(&tokens, i + 1, Keyword::Is) {
                        units.declared.push(id);
                    }
                }
                VhdlToken::Keyword(Keyword::Entity) | VhdlToken::Keyword(Keyword::Context) => {
                    if let Some(id) = declaration(&tokens, i + 1, Keyword::Is) {
                        units.declared.push(id);
                    } else {
                        i = selected_names(&tokens, i + 1, &mut units.used);
                        continue;
                    }
                }
                VhdlToken::Keyword(Keyword::Configuration) => {
                    if let Some(id) = declaration(&tokens, i + 1, Keyword::Of) {
                        units.declared.push(id);
                    } else if let Some(r) = selected_name(&tokens, i + 1) {
                        units.used.push(r);
                    }
                }
                VhdlToken::Keyword(Keyword::Use) => {
                    // `use entity` and `use configuration` bindings are handled by their keyword
                    i = selected_names(&tokens, i + 1, &mut units.used);
                    continue;
                }
                _ => (),
            }
            i += 1;
        }
        units
    }
}

/// Matches `<identifier> <kw>` starting at `i`.
fn declaration(tokens: &[Token<VhdlToken>], i: usize, kw: Keyword) -> Option<Identifier> {
    let id = tokens.get(i)?.as_ref().as_identifier()?;
    match tokens.get(i + 1)?.as_ref().is_keyword(kw) {
        true => Some(id.clone()),
        false => None,
    }
}

/// Matches `<library> . <unit>` starting at `i`.
fn selected_name(tokens: &[Token<VhdlToken>], i: usize) -> Option<UnitRef> {
    let lib = tokens.get(i)?;
    let library = lib.as_ref().as_identifier()?;
    if tokens.get(i + 1)?.as_ref().is_delimiter('.') == false {
        return None;
    }
    let unit = tokens.get(i + 2)?.as_ref().as_identifier()?;
    Some(UnitRef::new(library.clone(), unit.clone(), lib.locate().clone()))
}

/// Collects every `<library> . <unit>` prefix in a comma-separated list of
/// selected names starting at `i`.
///
/// Returns the index of the first token after the list.
fn selected_names(tokens: &[Token<VhdlToken>], mut i: usize, used: &mut Vec<UnitRef>) -> usize {
    loop {
        if let Some(r) = selected_name(tokens, i) {
            used.push(r);
        }
        // skip the remainder of this name
        while let Some(tk) = tokens.get(i) {
            match tk.as_ref() {
                VhdlToken::Identifier(_) | VhdlToken::Keyword(Keyword::All) => i += 1,
                VhdlToken::Delimiter('.') => i += 1,
                _ => break,
            }
        }
        match tokens.get(i) {
            Some(tk) if tk.as_ref().is_delimiter(',') => i += 1,
            _ => return i,
        }
    }
}
