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

use std::error::Error;

use itertools::Itertools;
use roxmltree::{Document, Node};

use crate::language::Language;

/// Settings block holding the C/C++ compiler options.
pub const COMPILER_SETTINGS: &str = "ICCARM";

pub const INCLUDE_PATHS: &str = "CCIncludePath2";
pub const DEFINES: &str = "CCDefines";
pub const LANGUAGE_DIALECT: &str = "IccLang";
pub const OPTIMIZATION: &str = "CCOptLevel";
pub const PREINCLUDE: &str = "PreInclude";

/// Owned model of an IAR Embedded Workbench project file (`.ewp`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Project {
    pub configurations: Vec<ProjectConfiguration>,
    /// Every `file/name` entry of the project tree, in document order.
    pub files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectConfiguration {
    pub name: String,
    pub settings: Vec<Settings>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Settings {
    pub name: String,
    pub options: Vec<ProjectOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectOption {
    pub name: String,
    pub states: Vec<String>,
}

/// Raw compiler settings of one configuration. Paths are not resolved yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompilerSettings {
    pub includes: Vec<String>,
    pub defines: Vec<String>,
    pub dialect: Option<String>,
    pub optimization: Option<String>,
    pub preinclude: Vec<String>,
}

impl Project {
    pub fn parse(source: &str) -> Result<Self, Box<dyn Error>> {
        let document = Document::parse(source)?;
        let root = document.root_element();

        let configurations = elements(root, "configuration")
            .map(ProjectConfiguration::parse)
            .collect();

        let files = root
            .descendants()
            .filter(|node| *node != root && is_element(*node, "file"))
            .flat_map(|file| elements(file, "name"))
            .map(text)
            .filter(|name| !name.is_empty())
            .collect();

        Ok(Self {
            configurations,
            files,
        })
    }

    pub fn configuration(&self, name: &str) -> Result<&ProjectConfiguration, Box<dyn Error>> {
        if let Some(configuration) = self.configurations.iter().find(|cfg| cfg.name == name) {
            return Ok(configuration);
        }

        let available = self
            .configurations
            .iter()
            .map(|cfg| cfg.name.as_str())
            .filter(|name| !name.is_empty())
            .join(", ");

        Err(format!(
            "Configuration '{}' not found, available configurations: {}",
            name,
            if available.is_empty() { "none" } else { available.as_str() }
        ))?
    }

    /// The compilable C/C++ files of the project, as written in the project.
    pub fn source_files(&self) -> Vec<&str> {
        self.files
            .iter()
            .map(String::as_str)
            .filter(|file| Language::recognize(file).is_some())
            .collect()
    }
}

impl ProjectConfiguration {
    fn parse(node: Node) -> Self {
        Self {
            name: first_text(node, "name"),
            settings: elements(node, "settings").map(Settings::parse).collect(),
        }
    }

    /// All `state` values of `option` inside every `settings` block named
    /// `settings`.
    pub fn option_states(&self, settings: &str, option: &str) -> Vec<&str> {
        self.settings
            .iter()
            .filter(|block| block.name == settings)
            .flat_map(|block| block.options.iter())
            .filter(|candidate| candidate.name == option)
            .flat_map(|candidate| candidate.states.iter().map(String::as_str))
            .collect()
    }

    pub fn compiler_settings(&self) -> CompilerSettings {
        let states = |option: &str| self.option_states(COMPILER_SETTINGS, option);
        let first = |option: &str| states(option).first().map(|state| state.to_string());

        CompilerSettings {
            includes: util::dedupe(states(INCLUDE_PATHS).into_iter().map(String::from)),
            defines: util::dedupe(states(DEFINES).into_iter().map(String::from)),
            dialect: first(LANGUAGE_DIALECT),
            optimization: first(OPTIMIZATION),
            preinclude: states(PREINCLUDE).into_iter().map(String::from).collect(),
        }
    }
}

impl Settings {
    fn parse(node: Node) -> Self {
        let options: Vec<ProjectOption> = elements(node, "data")
            .next()
            .map(|data| elements(data, "option").map(ProjectOption::parse).collect())
            .unwrap_or_default();

        Self {
            name: first_text(node, "name"),
            options,
        }
    }
}

impl ProjectOption {
    fn parse(node: Node) -> Self {
        Self {
            name: first_text(node, "name"),
            states: elements(node, "state").map(text).collect(),
        }
    }
}

fn is_element(node: Node, tag: &str) -> bool {
    node.is_element() && node.tag_name().name() == tag
}

fn elements<'a, 'input: 'a>(
    parent: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    parent.children().filter(move |node| is_element(*node, tag))
}

fn text(node: Node) -> String {
    node.text().unwrap_or_default().trim().to_string()
}

fn first_text(parent: Node, tag: &str) -> String {
    elements(parent, tag).next().map(text).unwrap_or_default()
}
