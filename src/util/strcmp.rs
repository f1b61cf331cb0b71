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

/// Compares two string references `s0` and `s1` with full unicode case conversion.
///
/// Returns `true` if they are deemed equivalent without regarding case sensitivity.
pub fn cmp_ignore_case(s0: &str, s1: &str) -> bool {
    let mut lhs = s0.chars().flat_map(|c| c.to_lowercase());
    let mut rhs = s1.chars().flat_map(|c| c.to_lowercase());
    loop {
        match (lhs.next(), rhs.next()) {
            (None, None) => return true,
            (Some(a), Some(b)) if a == b => continue,
            _ => return false,
        }
    }
}

/// Compares two string references `s0` and `s1` with only ascii case conversion.
///
/// Returns `true` if they are deemed equivalent without regarding ascii case sensitivity.
pub fn cmp_ascii_ignore_case(s0: &str, s1: &str) -> bool {
    s0.len() == s1.len()
        && s0
            .chars()
            .zip(s1.chars())
            .all(|(a, b)| a.to_ascii_lowercase() == b.to_ascii_lowercase())
}

/// Folds `s` into the lower-case form used as a lookup key.
pub fn fold(s: &str) -> String {
    s.to_lowercase()
}
