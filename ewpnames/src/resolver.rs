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

use std::{error::Error, fs, io, path::Path};

#[cfg(test)]
use mockall::automock;

use util::{expand_env_vars, join, normalize_path};

/// Read-only view of the filesystem. Every probe the generator makes goes
/// through this trait.
#[cfg_attr(test, automock)]
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    /// Names of the directories directly below `path`, in no particular order.
    fn subdirectories(&self, path: &Path) -> io::Result<Vec<String>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFileSystem;

impl FileSystem for DefaultFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn subdirectories(&self, path: &Path) -> io::Result<Vec<String>> {
        let mut result = vec![];
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            if entry.path().is_dir() {
                result.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(result)
    }
}

/// Turns the compiler given on the command line into a validated absolute
/// path.
pub struct CompilerResolver<'a> {
    fs: &'a dyn FileSystem,
    executable_extension: Option<&'a str>,
}

impl<'a> CompilerResolver<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self {
            fs,
            executable_extension: if cfg!(windows) { Some(".exe") } else { None },
        }
    }

    pub fn executable_extension(mut self, extension: Option<&'a str>) -> Self {
        self.executable_extension = extension;
        self
    }

    /// Environment references in `candidate` are expanded with `environment`.
    /// Relative paths are taken relative to `project_root`.
    pub fn resolve<F>(
        &self,
        candidate: &str,
        project_root: &str,
        environment: F,
    ) -> Result<String, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        if candidate.trim().is_empty() {
            return Err("Compiler path is empty.")?;
        }

        let expanded = expand_env_vars(candidate.trim(), environment);
        let path = normalize_path(&join(project_root, &expanded));

        if self.fs.is_file(Path::new(&path)) {
            return Ok(path);
        }

        if let Some(extension) = self.executable_extension {
            if !path.to_ascii_lowercase().ends_with(extension) {
                let with_extension = format!("{}{}", path, extension);
                if self.fs.is_file(Path::new(&with_extension)) {
                    return Ok(with_extension);
                }
                if !self.fs.exists(Path::new(&path)) {
                    return Err(format!(
                        "Compiler not found: {} (also tried {})",
                        path, with_extension
                    ))?;
                }
            }
        }

        if !self.fs.exists(Path::new(&path)) {
            return Err(format!("Compiler not found: {}", path))?;
        }

        Err(format!("Compiler path is not a file: {}", path))?
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use super::{CompilerResolver, DefaultFileSystem, FileSystem, MockFileSystem};

    fn no_environment(_: &str) -> Option<String> {
        None
    }

    fn filesystem(
        files: &'static [&'static str],
        dirs: &'static [&'static str],
    ) -> MockFileSystem {
        let mut fs = MockFileSystem::new();
        fs.expect_is_file()
            .returning(move |path| files.iter().any(|file| Path::new(file) == path));
        fs.expect_exists().returning(move |path| {
            files.iter().chain(dirs.iter()).any(|entry| Path::new(entry) == path)
        });
        fs
    }

    #[test]
    fn existing_compiler() {
        let fs = filesystem(&["/opt/gcc/bin/arm-none-eabi-gcc"], &[]);
        let sut = CompilerResolver::new(&fs).executable_extension(None);

        let result = sut.resolve("/opt/gcc/bin/arm-none-eabi-gcc", "/proj", no_environment);

        assert_eq!("/opt/gcc/bin/arm-none-eabi-gcc", result.unwrap());
    }

    #[test]
    fn environment_is_expanded() {
        let fs = filesystem(&["/opt/gcc/bin/arm-none-eabi-gcc"], &[]);
        let sut = CompilerResolver::new(&fs).executable_extension(None);

        let environment = |name: &str| {
            if name == "GCC_HOME" {
                Some("/opt/gcc".to_string())
            } else {
                None
            }
        };

        let result = sut.resolve("$GCC_HOME/bin/arm-none-eabi-gcc", "/proj", environment);

        assert_eq!("/opt/gcc/bin/arm-none-eabi-gcc", result.unwrap());
    }

    #[test]
    fn relative_to_project_root() {
        let fs = filesystem(&["/proj/tools/bin/gcc"], &[]);
        let sut = CompilerResolver::new(&fs).executable_extension(None);

        let result = sut.resolve("tools/bin/gcc", "/proj", no_environment);

        assert_eq!("/proj/tools/bin/gcc", result.unwrap());
    }

    #[test]
    fn executable_extension_is_appended() {
        let fs = filesystem(&["C:/gcc/bin/arm-none-eabi-gcc.exe"], &[]);
        let sut = CompilerResolver::new(&fs).executable_extension(Some(".exe"));

        let result = sut.resolve("C:\\gcc\\bin\\arm-none-eabi-gcc", "C:/proj", no_environment);

        assert_eq!("C:/gcc/bin/arm-none-eabi-gcc.exe", result.unwrap());
    }

    #[test]
    fn missing_compiler_fails() {
        let fs = filesystem(&[], &[]);
        let sut = CompilerResolver::new(&fs).executable_extension(Some(".exe"));

        let error = sut
            .resolve("/opt/gcc/bin/gcc", "/proj", no_environment)
            .unwrap_err();

        assert!(error.to_string().contains("/opt/gcc/bin/gcc.exe"));
    }

    #[test]
    fn directory_is_rejected() {
        let fs = filesystem(&[], &["/opt/gcc/bin"]);
        let sut = CompilerResolver::new(&fs).executable_extension(None);

        let error = sut.resolve("/opt/gcc/bin", "/proj", no_environment).unwrap_err();

        assert!(error.to_string().contains("not a file"));
    }

    #[test]
    fn empty_path_is_rejected() {
        let fs = filesystem(&[], &[]);
        let sut = CompilerResolver::new(&fs);

        assert!(sut.resolve("  ", "/proj", no_environment).is_err());
    }

    #[test]
    fn default_file_system_lists_directories_only() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("10.3.1")).unwrap();
        fs::create_dir(root.path().join("13.2.1")).unwrap();
        fs::write(root.path().join("README"), "").unwrap();

        let sut = DefaultFileSystem;

        let mut result = sut.subdirectories(root.path()).unwrap();
        result.sort();

        assert_eq!(vec!["10.3.1".to_string(), "13.2.1".to_string()], result);
        assert!(sut.is_file(&root.path().join("README")));
        assert!(!sut.is_file(&root.path().join("10.3.1")));
        assert!(sut.exists(&root.path().join("10.3.1")));
        assert!(sut.subdirectories(&root.path().join("missing")).is_err());
    }
}
