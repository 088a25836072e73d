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

use log::{debug, trace};

use util::{join, normalize_path, parent};

use crate::resolver::FileSystem;

/// Finds the system header directories of a GCC style cross toolchain.
///
/// The toolchain root is assumed to be the parent of the `bin` directory
/// holding the compiler. Missing directories and unreadable listings just
/// shrink the result.
pub fn detect_system_includes(fs: &dyn FileSystem, compiler: &str, triple: &str) -> Vec<String> {
    let compiler = normalize_path(compiler);
    let toolchain_root = parent(parent(&compiler));

    let gcc_base = join(toolchain_root, &format!("lib/gcc/{}", triple));

    let mut candidates = vec![
        join(toolchain_root, &format!("{}/include", triple)),
        join(toolchain_root, &format!("{}/include/c++", triple)),
        gcc_base.clone(),
    ];

    if fs.exists(Path::new(&gcc_base)) {
        match fs.subdirectories(Path::new(&gcc_base)) {
            Ok(mut versions) => {
                versions.sort();
                if let Some(latest) = versions.last() {
                    debug!("GCC version directory: {}", latest);
                    let version_dir = join(&gcc_base, latest);
                    candidates.push(join(&version_dir, "include"));
                    candidates.push(join(&version_dir, "include-fixed"));
                }
            }
            Err(error) => debug!("Cannot list {}: {}", gcc_base, error),
        }
    }

    candidates
        .into_iter()
        .filter(|candidate| {
            let exists = fs.exists(Path::new(candidate));
            trace!("System include candidate {} exists: {}", candidate, exists);
            exists
        })
        .map(|candidate| normalize_path(&candidate))
        .collect()
}
