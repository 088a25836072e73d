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

use std::{borrow::Cow, error::Error};

use serde::Serialize;

use crate::Entry;

/// Serializes entries in the `compile_commands.json` format, with the
/// command as a single string.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompilationDatabase;

impl CompilationDatabase {
    pub fn new() -> Self {
        Self
    }

    pub fn to_json<'a>(
        &self,
        entries: impl IntoIterator<Item = &'a Entry>,
    ) -> Result<String, Box<dyn Error>> {
        let serializable: Vec<_> = entries.into_iter().map(SerializableEntry::from).collect();

        Ok(serde_json::to_string_pretty(&serializable)?)
    }
}

#[derive(Debug, Clone, Serialize)]
struct SerializableEntry<'a> {
    pub directory: Cow<'a, str>,
    pub command: Cow<'a, str>,
    pub file: Cow<'a, str>,
}

impl<'a> From<&'a Entry> for SerializableEntry<'a> {
    fn from(entry: &'a Entry) -> Self {
        Self {
            directory: Cow::Borrowed(entry.directory.as_str()),
            command: Cow::Owned(entry.command()),
            file: Cow::Borrowed(entry.file.as_str()),
        }
    }
}
