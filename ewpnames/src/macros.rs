/*
   Copyright (C) 2012-2021 by László Nagy
   Copyright (C) 2021 by Michael Bikovitksy

   This file is part of ewpbear.

   ewpbear is a tool to generate a compilation database for clang tooling
   from IAR Embedded Workbench projects.

   ewpbear is free software: you can redistribute it and/or modify
   it under the terms of the GNU General Public License as published by
   the Free Software Foundation, either version 3 of the License, or
   (at your option) any later version.

   ewpbear is distributed in the hope that it will be useful,
   but WITHOUT ANY WARRANTY; without even the implied warranty of
   MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
   GNU General Public License for more details.

   You should have received a copy of the GNU General Public License
   along with ewpbear.  If not, see <https://www.gnu.org/licenses/>.
*/

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use util::{is_absolute, join, normalize_path};

pub const PROJ_DIR: &str = "PROJ_DIR";
pub const CONFIG_DIR: &str = "CONFIG_DIR";
pub const TOOLKIT_DIR: &str = "TOOLKIT_DIR";

/// Substitutes `$NAME$` path macros and turns project paths into absolute,
/// forward-slash paths.
#[derive(Debug, Clone)]
pub struct MacroTable {
    project_root: String,
    macros: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub path: String,
    pub unresolved: Vec<String>,
}

impl MacroTable {
    pub fn new(project_root: &str, configuration: &str, toolkit_dir: Option<&str>) -> Self {
        let mut macros = HashMap::new();
        macros.insert(PROJ_DIR.to_string(), project_root.to_string());
        macros.insert(CONFIG_DIR.to_string(), join(project_root, configuration));
        if let Some(toolkit_dir) = toolkit_dir {
            macros.insert(TOOLKIT_DIR.to_string(), toolkit_dir.to_string());
        }

        Self {
            project_root: project_root.to_string(),
            macros,
        }
    }

    /// Never fails: macros missing from the table stay in the path verbatim
    /// and are listed in [`Resolution::unresolved`].
    pub fn resolve(&self, raw: &str) -> Resolution {
        lazy_static! {
            static ref RE: Regex = Regex::new(r"\$([A-Za-z0-9_]+)\$").unwrap();
        }

        if raw.is_empty() {
            return Resolution {
                path: normalize_path(&self.project_root),
                unresolved: vec![],
            };
        }

        let trimmed = raw.trim().trim_matches('"').trim_matches('\'');

        let mut unresolved = vec![];
        let substituted = RE.replace_all(trimmed, |captures: &Captures| {
            let name = &captures[1];
            match self.macros.get(name) {
                Some(value) => value.clone(),
                None => {
                    unresolved.push(name.to_string());
                    captures[0].to_string()
                }
            }
        });

        let path = if substituted.starts_with("../") || substituted.starts_with("..\\") {
            join(&self.project_root, &substituted[3..])
        } else if is_absolute(&substituted) {
            substituted.into_owned()
        } else {
            join(&self.project_root, &substituted)
        };

        Resolution {
            path: normalize_path(&path),
            unresolved,
        }
    }
}
