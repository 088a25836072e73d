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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    C,
    Cxx,
}

const C_EXTENSIONS: &[&str] = &["c"];
const CXX_EXTENSIONS: &[&str] = &["cpp", "cxx", "cc"];

impl Language {
    /// Returns the language of a compilable source file, or `None` for any
    /// other project asset (headers, linker scripts, libraries...).
    pub fn recognize(file: &str) -> Option<Language> {
        let extension = extension(file)?;

        if CXX_EXTENSIONS.contains(&extension.as_str()) {
            Some(Language::Cxx)
        } else if C_EXTENSIONS.contains(&extension.as_str()) {
            Some(Language::C)
        } else {
            None
        }
    }

    /// C++ if the extension belongs to the C++ set, C otherwise.
    pub fn classify(file: &str) -> Language {
        match Self::recognize(file) {
            Some(Language::Cxx) => Language::Cxx,
            _ => Language::C,
        }
    }

    pub fn override_flags(self) -> [&'static str; 2] {
        match self {
            Language::C => ["-x", "c"],
            Language::Cxx => ["-x", "c++"],
        }
    }
}

// Textual so that `\` separated project paths behave the same on every host.
fn extension(file: &str) -> Option<String> {
    let name = file.rsplit(|c: char| c == '/' || c == '\\').next()?;
    let (_, extension) = name.rsplit_once('.')?;
    Some(extension.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::Language;

    #[test]
    fn recognize_sources() {
        assert_eq!(Some(Language::C), Language::recognize("src/driver.c"));
        assert_eq!(Some(Language::C), Language::recognize("SRC/DRIVER.C"));
        assert_eq!(Some(Language::Cxx), Language::recognize("main.cpp"));
        assert_eq!(Some(Language::Cxx), Language::recognize("main.CXX"));
        assert_eq!(Some(Language::Cxx), Language::recognize("main.cc"));
    }

    #[test]
    fn ignore_other_assets() {
        assert_eq!(None, Language::recognize("inc/board.h"));
        assert_eq!(None, Language::recognize("startup_at32f403a.s"));
        assert_eq!(None, Language::recognize("link.icf"));
        assert_eq!(None, Language::recognize("Makefile"));
    }

    #[test]
    fn classify_defaults_to_c() {
        assert_eq!(Language::Cxx, Language::classify("main.cpp"));
        assert_eq!(Language::C, Language::classify("driver.c"));
        assert_eq!(Language::C, Language::classify("DRIVER.C"));
        assert_eq!(Language::C, Language::classify("weird.s"));
    }

    #[test]
    fn override_flags() {
        assert_eq!(["-x", "c++"], Language::Cxx.override_flags());
        assert_eq!(["-x", "c"], Language::C.override_flags());
    }
}
