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

use crate::core::lang::Identifier;
use crate::core::source::RemoteSpec;
use crate::error::{LastError, ResolveError};
use crate::util::filesystem;
use serde_derive::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const MANIFEST_FILE: &str = "manifest.toml";

const DEFAULT_ISE_VERSION: &str = "13.1";

pub trait FromFile: Sized {
    fn from_file(path: &Path) -> Result<Self, ResolveError>;
}

/// The declarative description stored in a module's directory.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    library: Option<String>,
    fetchto: Option<PathBuf>,
    #[serde(rename = "root-module")]
    root_module: Option<PathBuf>,
    files: Option<Vec<String>>,
    #[serde(default)]
    local: Vec<PathBuf>,
    #[serde(default)]
    git: Vec<RemoteSpec>,
    #[serde(default)]
    svn: Vec<RemoteSpec>,
    #[serde(default)]
    tool: ToolOptions,
}

/// Options passed through to downstream tools.
#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolOptions {
    #[serde(default = "default_ise")]
    ise: String,
    #[serde(rename = "vcom-opt", default)]
    vcom_opt: String,
    #[serde(rename = "vlog-opt", default)]
    vlog_opt: String,
    #[serde(rename = "vmap-opt", default)]
    vmap_opt: String,
}

fn default_ise() -> String {
    String::from(DEFAULT_ISE_VERSION)
}

impl Default for ToolOptions {
    fn default() -> Self {
        Self {
            ise: default_ise(),
            vcom_opt: String::new(),
            vlog_opt: String::new(),
            vmap_opt: String::new(),
        }
    }
}

impl ToolOptions {
    /// The target toolchain version.
    pub fn get_ise(&self) -> &str {
        &self.ise
    }

    pub fn get_vcom_opt(&self) -> &str {
        &self.vcom_opt
    }

    pub fn get_vlog_opt(&self) -> &str {
        &self.vlog_opt
    }

    pub fn get_vmap_opt(&self) -> &str {
        &self.vmap_opt
    }
}

impl std::fmt::Display for ToolOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ise={}", self.get_ise())?;
        for (key, value) in [
            ("vcom-opt", self.get_vcom_opt()),
            ("vlog-opt", self.get_vlog_opt()),
            ("vmap-opt", self.get_vmap_opt()),
        ] {
            if value.is_empty() == false {
                write!(f, " {}={:?}", key, value)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Manifest {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s)
    }
}

impl FromFile for Manifest {
    fn from_file(path: &Path) -> Result<Self, ResolveError> {
        // open file
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| ResolveError::Io(path.to_path_buf(), LastError(e.to_string())))?;
        // parse toml syntax
        Self::from_str(&contents).map_err(|e| {
            ResolveError::ManifestParse(path.to_path_buf(), LastError(e.to_string().trim().to_string()))
        })
    }
}

impl Manifest {
    /// Checks the manifest's values and resolves its paths against the module
    /// directory `root`.
    ///
    /// `path` is the manifest's own location, named in any error.
    pub fn validate(self, root: &Path, path: &Path) -> Result<ManifestOptions, ResolveError> {
        let library = match self.library {
            Some(s) => Identifier::from_str(&s).map_err(|e| {
                ResolveError::ManifestParse(
                    path.to_path_buf(),
                    LastError(format!("invalid library {:?}: {}", s, e)),
                )
            })?,
            None => Identifier::new_working(),
        };
        let fetchto = match self.fetchto {
            Some(dir) => match dir.is_relative() {
                true => Some(filesystem::resolve_rel_path(root, &dir)),
                false => return Err(ResolveError::RelativePathRequired(path.to_path_buf(), dir)),
            },
            None => None,
        };
        Ok(ManifestOptions {
            library: library,
            fetchto: fetchto,
            root_module: self
                .root_module
                .map(|p| filesystem::resolve_rel_path(root, &p)),
            files: self.files,
            local: self
                .local
                .iter()
                .map(|p| filesystem::resolve_rel_path(root, p))
                .collect(),
            git: self.git,
            svn: self.svn,
            tool: self.tool,
        })
    }
}

/// A manifest whose values have been checked and whose paths are absolute.
#[derive(Debug, PartialEq)]
pub struct ManifestOptions {
    library: Identifier,
    fetchto: Option<PathBuf>,
    root_module: Option<PathBuf>,
    files: Option<Vec<String>>,
    local: Vec<PathBuf>,
    git: Vec<RemoteSpec>,
    svn: Vec<RemoteSpec>,
    tool: ToolOptions,
}

impl ManifestOptions {
    pub fn get_library(&self) -> &Identifier {
        &self.library
    }

    pub fn get_fetchto(&self) -> Option<&PathBuf> {
        self.fetchto.as_ref()
    }

    pub fn get_root_module(&self) -> Option<&PathBuf> {
        self.root_module.as_ref()
    }

    /// The explicit file entries, if the manifest names any.
    pub fn get_files(&self) -> Option<&Vec<String>> {
        self.files.as_ref()
    }

    pub fn get_local(&self) -> &Vec<PathBuf> {
        &self.local
    }

    pub fn get_git(&self) -> &Vec<RemoteSpec> {
        &self.git
    }

    pub fn get_svn(&self) -> &Vec<RemoteSpec> {
        &self.svn
    }

    pub fn get_tool(&self) -> &ToolOptions {
        &self.tool
    }
}

/// Finds the manifest directly within the module directory `dir`, if one exists.
pub fn find_manifest(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(MANIFEST_FILE);
    match path.is_file() {
        true => Some(path),
        false => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::source::Checkout;

    #[test]
    fn full_manifest() {
        let man = Manifest::from_str(EX1).unwrap();
        let opts = man
            .validate(Path::new("/proj/top"), Path::new("/proj/top/manifest.toml"))
            .unwrap();
        assert_eq!(opts.get_library(), &Identifier::Basic(String::from("uart")));
        assert_eq!(opts.get_fetchto(), Some(&PathBuf::from("/proj/top/ip_cores")));
        assert_eq!(opts.get_root_module(), Some(&PathBuf::from("/proj/board")));
        assert_eq!(
            opts.get_files(),
            Some(&vec![String::from("pkg.vhd"), String::from("top.vhd")])
        );
        assert_eq!(opts.get_local(), &vec![PathBuf::from("/proj/common")]);
        assert_eq!(
            opts.get_git(),
            &vec![
                RemoteSpec::new("https://example/mod.git", Checkout::Default),
                RemoteSpec::new(
                    "https://example/b.git",
                    Checkout::Branch(String::from("develop"))
                ),
                RemoteSpec::new("https://example/d.git", Checkout::Branch(String::from("v2"))),
            ]
        );
        assert_eq!(
            opts.get_svn(),
            &vec![RemoteSpec::new(
                "http://svn.example/x",
                Checkout::Revision(String::from("1200"))
            )]
        );
        assert_eq!(opts.get_tool().get_ise(), "14.7");
        assert_eq!(opts.get_tool().get_vcom_opt(), "-2008");
        assert_eq!(opts.get_tool().get_vlog_opt(), "");
        assert_eq!(opts.get_tool().to_string(), "ise=14.7 vcom-opt=\"-2008\"");
    }

    #[test]
    fn empty_manifest_defaults() {
        let opts = Manifest::from_str("")
            .unwrap()
            .validate(Path::new("/proj"), Path::new("/proj/manifest.toml"))
            .unwrap();
        assert_eq!(opts.get_library(), &Identifier::new_working());
        assert_eq!(opts.get_fetchto(), None);
        assert_eq!(opts.get_files(), None);
        assert_eq!(opts.get_tool(), &ToolOptions::default());
        assert_eq!(opts.get_tool().get_ise(), "13.1");
        assert_eq!(opts.get_tool().to_string(), "ise=13.1");
    }

    #[test]
    fn absolute_fetchto() {
        let man = Manifest::from_str("fetchto = \"/opt/ip\"").unwrap();
        assert_eq!(
            man.validate(Path::new("/proj"), Path::new("/proj/manifest.toml")),
            Err(ResolveError::RelativePathRequired(
                PathBuf::from("/proj/manifest.toml"),
                PathBuf::from("/opt/ip")
            ))
        );
    }

    #[test]
    fn invalid_library() {
        let man = Manifest::from_str("library = \"9lives\"").unwrap();
        assert!(matches!(
            man.validate(Path::new("/proj"), Path::new("/proj/manifest.toml")),
            Err(ResolveError::ManifestParse(_, _))
        ));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(Manifest::from_str(ERR1).is_err());
        assert!(Manifest::from_str(ERR2).is_err());
    }

    #[test]
    fn checkout_cannot_look_like_an_option() {
        assert!(Manifest::from_str("git = [\"https://example/a.git::--upload-pack=x\"]").is_err());
        assert!(Manifest::from_str("svn = [\"http://svn.example/x@@-r5\"]").is_err());
        assert!(
            Manifest::from_str("git = [{ url = \"https://example/a.git\", revision = \"-f\" }]")
                .is_err()
        );
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE),
            "git = [{ url = \"https://example/a.git\", branch = \"--orphan\" }]",
        )
        .unwrap();
        assert!(matches!(
            Manifest::from_file(&dir.path().join(MANIFEST_FILE)),
            Err(ResolveError::ManifestParse(_, _))
        ));
    }

    #[test]
    fn parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), ERR1).unwrap();
        let path = find_manifest(dir.path()).unwrap();
        match Manifest::from_file(&path) {
            Err(ResolveError::ManifestParse(p, _)) => assert_eq!(p, path),
            _ => panic!("expected a manifest parse error"),
        }
        assert_eq!(find_manifest(&dir.path().join("missing")), None);
    }

    const EX1: &str = r#"
library = "uart"
fetchto = "ip_cores"
root-module = "../board"
files = ["pkg.vhd", "top.vhd"]
local = ["../common"]
git = [
    "https://example/mod.git",
    "https://example/b.git::develop",
    { url = "https://example/d.git", branch = "v2", revision = "abc" },
]
svn = [{ url = "http://svn.example/x", revision = "1200" }]

[tool]
ise = "14.7"
vcom-opt = "-2008"
"#;

    const ERR1: &str = r#"
library = "work"
fetch-to = "ip_cores"
"#;

    const ERR2: &str = r#"
git = [{ url = "https://example/mod.git", tag = "v1" }]
"#;
}
