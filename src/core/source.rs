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

use crate::util::anyerror::AnyError;
use serde::de::{self, MapAccess, Visitor};
use serde::Deserialize;
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a module's content comes from.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Local,
    Svn,
    Git,
}

impl Source {
    /// Checks if the content must be retrieved by a version-control client.
    pub fn is_remote(&self) -> bool {
        match self {
            Self::Local => false,
            Self::Svn | Self::Git => true,
        }
    }
}

impl FromStr for Source {
    type Err = AnyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_ref() {
            "local" => Ok(Self::Local),
            "svn" => Ok(Self::Svn),
            "git" => Ok(Self::Git),
            _ => Err(AnyError(format!("unknown source kind {:?}", s))),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Local => "local",
                Self::Svn => "svn",
                Self::Git => "git",
            }
        )
    }
}

/// The state of a remote repository to check out after fetching.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Default)]
pub enum Checkout {
    /// Leaves the default branch, or the commit recorded by an enclosing superproject.
    #[default]
    Default,
    Branch(String),
    Revision(String),
}

impl Checkout {
    /// Picks the checkout from optional branch and revision selections. The
    /// branch wins when both are given.
    pub fn select(branch: Option<String>, revision: Option<String>) -> Self {
        match (branch, revision) {
            (Some(b), _) => Self::Branch(b),
            (None, Some(r)) => Self::Revision(r),
            (None, None) => Self::Default,
        }
    }

    pub fn as_branch(&self) -> Option<&str> {
        match self {
            Self::Branch(b) => Some(b.as_ref()),
            _ => None,
        }
    }

    pub fn as_revision(&self) -> Option<&str> {
        match self {
            Self::Revision(r) => Some(r.as_ref()),
            _ => None,
        }
    }

    /// Rejects a branch or revision that is empty or that an external tool
    /// would read as an option.
    fn check(self) -> Result<Self, AnyError> {
        if let Self::Branch(x) | Self::Revision(x) = &self {
            if x.is_empty() == true {
                return Err(AnyError(String::from("branch or revision cannot be empty")));
            }
            if x.starts_with('-') == true {
                return Err(AnyError(format!("branch or revision {:?} cannot begin with '-'", x)));
            }
        }
        Ok(self)
    }
}

/// A remote sub-module entry of a manifest: a url and what to check out.
#[derive(Debug, PartialEq, Clone)]
pub struct RemoteSpec {
    url: String,
    checkout: Checkout,
}

impl RemoteSpec {
    pub fn new(url: &str, checkout: Checkout) -> Self {
        Self {
            url: url.to_string(),
            checkout: checkout,
        }
    }

    pub fn get_url(&self) -> &str {
        &self.url
    }

    pub fn get_checkout(&self) -> &Checkout {
        &self.checkout
    }
}

impl FromStr for RemoteSpec {
    type Err = AnyError;

    /// Reads `url`, `url::branch`, or `url@@revision`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (url, checkout) = if let Some((url, branch)) = s.rsplit_once("::") {
            (url, Checkout::Branch(branch.to_string()))
        } else if let Some((url, rev)) = s.rsplit_once("@@") {
            (url, Checkout::Revision(rev.to_string()))
        } else {
            (s, Checkout::Default)
        };
        if url.is_empty() == true {
            return Err(AnyError(format!("missing url in module entry {:?}", s)));
        }
        let checkout = checkout
            .check()
            .map_err(|e| AnyError(format!("{} in module entry {:?}", e, s)))?;
        Ok(Self::new(url, checkout))
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RemoteTable {
    url: String,
    branch: Option<String>,
    revision: Option<String>,
}

impl<'de> Deserialize<'de> for RemoteSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        // accepts either the short string form or the `{ url, branch, revision }` table
        struct LayerVisitor;

        impl<'de> Visitor<'de> for LayerVisitor {
            type Value = RemoteSpec;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("string or map")
            }

            fn visit_str<E>(self, value: &str) -> Result<RemoteSpec, E>
            where
                E: de::Error,
            {
                RemoteSpec::from_str(value).map_err(|e| de::Error::custom(e))
            }

            fn visit_map<M>(self, map: M) -> Result<RemoteSpec, M::Error>
            where
                M: MapAccess<'de>,
            {
                let table = RemoteTable::deserialize(de::value::MapAccessDeserializer::new(map))?;
                let checkout = Checkout::select(table.branch, table.revision)
                    .check()
                    .map_err(|e| de::Error::custom(e))?;
                Ok(RemoteSpec::new(&table.url, checkout))
            }
        }

        deserializer.deserialize_any(LayerVisitor)
    }
}

/// Determines the directory name a remote module lands in under its fetch directory.
///
/// This is the last segment of the url (after `/` or an scp-style `:`), with any
/// trailing `/` removed and, for git, a trailing `.git` removed.
pub fn target_name(url: &str, source: Source) -> String {
    let trimmed = url.trim_end_matches('/');
    let base = trimmed
        .rsplit(|c| c == '/' || c == ':')
        .next()
        .unwrap_or(trimmed);
    match source {
        Source::Git => base.strip_suffix(".git").unwrap_or(base),
        _ => base,
    }
    .to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn source_kinds() {
        assert_eq!(Source::from_str("git").unwrap(), Source::Git);
        assert_eq!(Source::from_str("SVN").unwrap(), Source::Svn);
        assert_eq!(Source::from_str("local").unwrap(), Source::Local);
        assert!(Source::from_str("hg").is_err());
        assert_eq!(Source::Git.is_remote(), true);
        assert_eq!(Source::Local.to_string(), "local");
    }

    #[test]
    fn remote_from_str() {
        assert_eq!(
            RemoteSpec::from_str("https://example/b.git::develop").unwrap(),
            RemoteSpec::new(
                "https://example/b.git",
                Checkout::Branch(String::from("develop"))
            )
        );
        assert_eq!(
            RemoteSpec::from_str("https://example/c.git@@1a2b3c").unwrap(),
            RemoteSpec::new(
                "https://example/c.git",
                Checkout::Revision(String::from("1a2b3c"))
            )
        );
        assert_eq!(
            RemoteSpec::from_str("git@github.com:user/repo.git").unwrap(),
            RemoteSpec::new("git@github.com:user/repo.git", Checkout::Default)
        );
        assert!(RemoteSpec::from_str("https://example/b.git::").is_err());
        assert!(RemoteSpec::from_str("@@12").is_err());
        assert!(RemoteSpec::from_str("https://example/b.git::-b").is_err());
        assert!(RemoteSpec::from_str("https://example/b.git@@--force").is_err());
        assert_eq!(
            RemoteSpec::from_str("https://example/b.git::fix-1").unwrap(),
            RemoteSpec::new("https://example/b.git", Checkout::Branch(String::from("fix-1")))
        );
    }

    #[test]
    fn branch_wins() {
        assert_eq!(
            Checkout::select(Some(String::from("v2")), Some(String::from("abc"))),
            Checkout::Branch(String::from("v2"))
        );
        assert_eq!(Checkout::select(None, None), Checkout::Default);
    }

    #[test]
    fn target_names() {
        assert_eq!(target_name("https://example/mod.git", Source::Git), "mod");
        assert_eq!(target_name("https://example/mod.git/", Source::Git), "mod");
        assert_eq!(target_name("git@github.com:user/repo.git", Source::Git), "repo");
        assert_eq!(target_name("git@host:repo.git", Source::Git), "repo");
        assert_eq!(target_name("http://svn.example/repo/trunk/", Source::Svn), "trunk");
        assert_eq!(target_name("http://svn.example/lib.git", Source::Svn), "lib.git");
    }
}
