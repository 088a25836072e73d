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

use std::{collections::BTreeSet, error::Error, path::Path};

use log::debug;

use crate::{
    command::CommandAssembler, configuration::Configuration, macros::MacroTable, project::Project,
    resolver::FileSystem, toolchain::detect_system_includes,
};

pub mod command;
pub mod configuration;
pub mod language;
pub mod macros;
pub mod output;
pub mod project;
pub mod resolver;
pub mod toolchain;

/// One record of the compilation database.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    pub directory: String,
    pub file: String,
    /// Already quoted where needed.
    pub arguments: Vec<String>,
}

impl Entry {
    pub fn command(&self) -> String {
        self.arguments.join(" ")
    }
}

/// Conditions worth telling the user about. None of them stop the run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Report {
    pub include_count: usize,
    pub define_count: usize,
    pub file_count: usize,
    pub source_count: usize,
    pub dialect: Option<String>,
    pub preinclude: Vec<String>,
    pub system_includes: Vec<String>,
    /// Still present in the commands.
    pub missing_includes: Vec<String>,
    /// Left out of the database.
    pub missing_sources: Vec<String>,
    pub unresolved_macros: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Generation {
    pub entries: Vec<Entry>,
    pub report: Report,
}

pub struct Generator<'a> {
    config: &'a Configuration,
    fs: &'a dyn FileSystem,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a Configuration, fs: &'a dyn FileSystem) -> Self {
        Self { config, fs }
    }

    /// `compiler` must already be validated, see
    /// [`resolver::CompilerResolver`].
    pub fn generate(&self, project: &Project, compiler: &str) -> Result<Generation, Box<dyn Error>> {
        let config = self.config;
        let settings = project.configuration(&config.configuration)?.compiler_settings();

        let macros = MacroTable::new(
            &config.project_root,
            &config.configuration,
            config.toolkit_dir.as_deref(),
        );

        let mut report = Report {
            include_count: settings.includes.len(),
            define_count: settings.defines.len(),
            file_count: project.files.len(),
            dialect: settings.dialect.clone(),
            preinclude: settings.preinclude.clone(),
            ..Default::default()
        };

        let mut includes = vec![];
        for raw in &settings.includes {
            let resolution = macros.resolve(raw);
            report.unresolved_macros.extend(resolution.unresolved);
            if !self.fs.exists(Path::new(&resolution.path)) {
                report.missing_includes.push(resolution.path.clone());
            }
            includes.push(resolution.path);
        }

        report.system_includes = detect_system_includes(self.fs, compiler, &config.target.triple);

        let assembler = CommandAssembler::new(
            config,
            self.fs,
            compiler,
            &settings,
            &includes,
            &report.system_includes,
        );

        let sources = project.source_files();
        report.source_count = sources.len();

        let mut entries = vec![];
        for raw in sources {
            let resolution = macros.resolve(raw);
            report.unresolved_macros.extend(resolution.unresolved);
            if self.fs.exists(Path::new(&resolution.path)) {
                debug!("Source: {}", resolution.path);
                entries.push(assembler.assemble(&resolution.path));
            } else {
                report.missing_sources.push(resolution.path);
            }
        }

        Ok(Generation { entries, report })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::{
        configuration::Configuration, project::Project, resolver::MockFileSystem, Generator,
    };

    const COMPILER: &str = "/opt/arm/bin/arm-none-eabi-gcc";

    const PROJECT: &str = r#"<project>
    <configuration>
        <name>Debug</name>
        <settings>
            <name>ICCARM</name>
            <data>
                <option>
                    <name>CCIncludePath2</name>
                    <state>$PROJ_DIR$\inc</state>
                    <state>$SDK_ROOT$\inc</state>
                </option>
                <option>
                    <name>CCDefines</name>
                    <state>BOARD_V2</state>
                </option>
            </data>
        </settings>
    </configuration>
    <group>
        <name>app</name>
        <file><name>$PROJ_DIR$\src\main.c</name></file>
        <file><name>$PROJ_DIR$\src\gone.cpp</name></file>
        <file><name>$PROJ_DIR$\src\board.h</name></file>
    </group>
</project>"#;

    fn filesystem(existing: &'static [&'static str]) -> MockFileSystem {
        let mut fs = MockFileSystem::new();
        fs.expect_exists()
            .returning(move |path| existing.iter().any(|entry| Path::new(entry) == path));
        fs.expect_subdirectories().returning(|_| Ok(vec![]));
        fs
    }

    #[test]
    fn end_to_end() {
        let config = Configuration::new("/proj");
        let fs = filesystem(&["/proj/inc", "/proj/src/main.c"]);
        let project = Project::parse(PROJECT).unwrap();

        let sut = Generator::new(&config, &fs);
        let result = sut.generate(&project, COMPILER).unwrap();

        assert_eq!(1, result.entries.len());

        let entry = &result.entries[0];
        assert_eq!("/proj/src/main.c", entry.file);
        assert_eq!("/proj/src", entry.directory);
        assert!(entry.arguments.contains(&"-I/proj/inc".to_string()));
        assert!(entry.arguments.contains(&"-DBOARD_V2".to_string()));

        let report = &result.report;
        assert!(report.unresolved_macros.contains("SDK_ROOT"));
        assert_eq!(vec!["/proj/$SDK_ROOT$/inc"], report.missing_includes);
        assert_eq!(vec!["/proj/src/gone.cpp"], report.missing_sources);
        assert_eq!(2, report.include_count);
        assert_eq!(1, report.define_count);
        assert_eq!(3, report.file_count);
        assert_eq!(2, report.source_count);
        assert!(report.system_includes.is_empty());
    }

    #[test]
    fn unresolved_include_is_still_emitted() {
        let config = Configuration::new("/proj");
        let fs = filesystem(&["/proj/src/main.c"]);
        let project = Project::parse(PROJECT).unwrap();

        let result = Generator::new(&config, &fs).generate(&project, COMPILER).unwrap();

        assert!(result.entries[0]
            .arguments
            .contains(&"-I/proj/$SDK_ROOT$/inc".to_string()));
    }

    #[test]
    fn system_includes_are_detected() {
        let config = Configuration::new("/proj");
        let fs = filesystem(&["/proj/src/main.c", "/opt/arm/arm-none-eabi/include"]);
        let project = Project::parse(PROJECT).unwrap();

        let result = Generator::new(&config, &fs).generate(&project, COMPILER).unwrap();

        assert_eq!(
            vec!["/opt/arm/arm-none-eabi/include"],
            result.report.system_includes
        );
        assert!(result.entries[0]
            .command()
            .contains("-isystem /opt/arm/arm-none-eabi/include -c /proj/src/main.c"));
    }

    #[test]
    fn unknown_configuration_is_fatal() {
        let mut config = Configuration::new("/proj");
        config.configuration = "Release".to_string();
        let fs = MockFileSystem::new();
        let project = Project::parse(PROJECT).unwrap();

        let error = Generator::new(&config, &fs)
            .generate(&project, COMPILER)
            .unwrap_err();

        assert!(error.to_string().contains("Debug"));
    }
}
