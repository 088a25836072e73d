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

use std::path::Path;

use log::trace;

use util::{join, normalize_path, parent, quote_argument};

use crate::{
    configuration::{Configuration, Target},
    language::Language,
    project::CompilerSettings,
    resolver::FileSystem,
    Entry,
};

/// Optimization flag used when the project does not set a level.
pub const DEFAULT_OPTIMIZATION: &str = "-Og";

/// Maps the project optimization level to a compiler flag.
///
/// `None` means the project has no level at all and yields the default.
/// A level outside the table yields nothing.
pub fn optimization_flag(level: Option<&str>) -> Option<&'static str> {
    match level {
        None => Some(DEFAULT_OPTIMIZATION),
        Some("0") | Some("None") => Some("-O0"),
        Some("1") | Some("Low") => Some("-O1"),
        Some("2") | Some("Medium") => Some("-O2"),
        Some("3") | Some("High") => Some("-O3"),
        Some(_) => None,
    }
}

pub fn include_flag(path: &str) -> String {
    format!("-I{}", quote_argument(path))
}

/// Replaces the extension of the file name with `extension`.
pub fn object_path(source: &str, extension: &str) -> String {
    let name_start = source.rfind('/').map(|index| index + 1).unwrap_or(0);
    match source[name_start..].rfind('.') {
        Some(dot) if dot > 0 => format!("{}{}", &source[..name_start + dot], extension),
        _ => format!("{}{}", source, extension),
    }
}

/// Builds compilation database entries for the sources of one
/// configuration. The flags shared by every source are computed once.
#[derive(Debug, Clone)]
pub struct CommandAssembler {
    target: Target,
    compiler: String,
    cpu_flags: Vec<String>,
    optimization_flags: Vec<String>,
    define_flags: Vec<String>,
    include_flags: Vec<String>,
    system_include_flags: Vec<String>,
}

impl CommandAssembler {
    /// `includes` and `system_includes` are resolved paths, `compiler` is the
    /// validated compiler.
    pub fn new(
        config: &Configuration,
        fs: &dyn FileSystem,
        compiler: &str,
        settings: &CompilerSettings,
        includes: &[String],
        system_includes: &[String],
    ) -> Self {
        let target = config.target.clone();

        let mut cpu_flags = target.cpu_flags.clone();
        if config.use_clang {
            cpu_flags.insert(0, format!("--target={}", target.triple));
        }

        let optimization_flags = optimization_flag(settings.optimization.as_deref())
            .map(String::from)
            .into_iter()
            .collect();

        let define_flags = settings
            .defines
            .iter()
            .chain(target.defines.iter())
            .map(|define| format!("-D{}", define))
            .collect();

        let mut include_flags: Vec<String> = includes.iter().map(|path| include_flag(path)).collect();
        for path in includes {
            let convention = config
                .include_conventions
                .iter()
                .find(|convention| path.contains(&convention.marker));

            if let Some(convention) = convention {
                for subdirectory in &convention.subdirectories {
                    let candidate = normalize_path(&join(path, subdirectory));
                    if !fs.exists(Path::new(&candidate)) {
                        continue;
                    }

                    let flag = include_flag(&candidate);
                    if !include_flags.contains(&flag) {
                        trace!("Adding {} for {}", candidate, convention.marker);
                        include_flags.push(flag);
                    }
                }
            }
        }

        let system_include_flags = system_includes
            .iter()
            .flat_map(|path| vec!["-isystem".to_string(), quote_argument(path)])
            .collect();

        Self {
            target,
            compiler: compiler.to_string(),
            cpu_flags,
            optimization_flags,
            define_flags,
            include_flags,
            system_include_flags,
        }
    }

    pub fn assemble(&self, source: &str) -> Entry {
        let language = Language::classify(source);
        let standard = match language {
            Language::C => &self.target.c_standard,
            Language::Cxx => &self.target.cxx_standard,
        };
        let object = object_path(source, &self.target.object_extension);

        let mut arguments = vec![quote_argument(&self.compiler)];
        arguments.extend(self.cpu_flags.iter().cloned());
        arguments.extend(language.override_flags().iter().map(|flag| flag.to_string()));
        arguments.push(standard.clone());
        arguments.extend(self.optimization_flags.iter().cloned());
        arguments.extend(self.target.warning_flags.iter().cloned());
        arguments.extend(self.define_flags.iter().cloned());
        arguments.extend(self.include_flags.iter().cloned());
        arguments.extend(self.system_include_flags.iter().cloned());
        arguments.push("-c".to_string());
        arguments.push(quote_argument(source));
        arguments.push("-o".to_string());
        arguments.push(quote_argument(&object));

        Entry {
            directory: parent(source).to_string(),
            file: source.to_string(),
            arguments,
        }
    }
}
