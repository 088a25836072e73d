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

pub const DEFAULT_DESCRIPTOR: &str = "project.ewp";
pub const DEFAULT_CONFIGURATION: &str = "Debug";
pub const DEFAULT_OUTPUT: &str = "compile_commands.json";
pub const DEFAULT_COMPILER: &str = "/usr/bin/arm-none-eabi-gcc";

/// Everything a single run needs. Built once by the caller and passed down
/// by reference.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub project_root: String,
    pub descriptor: String,
    pub output: String,
    pub configuration: String,
    pub compiler: String,
    pub use_clang: bool,
    pub toolkit_dir: Option<String>,
    pub target: Target,
    pub include_conventions: Vec<IncludeConvention>,
}

impl Configuration {
    pub fn new(project_root: impl Into<String>) -> Self {
        Self {
            project_root: project_root.into(),
            descriptor: DEFAULT_DESCRIPTOR.to_string(),
            output: DEFAULT_OUTPUT.to_string(),
            configuration: DEFAULT_CONFIGURATION.to_string(),
            compiler: DEFAULT_COMPILER.to_string(),
            use_clang: false,
            toolkit_dir: None,
            target: Target::default(),
            include_conventions: default_include_conventions(),
        }
    }
}

/// Flags injected into every command regardless of the project contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub triple: String,
    pub cpu_flags: Vec<String>,
    pub defines: Vec<String>,
    pub warning_flags: Vec<String>,
    pub c_standard: String,
    pub cxx_standard: String,
    pub object_extension: String,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            triple: "arm-none-eabi".to_string(),
            cpu_flags: strings(&[
                "-mcpu=cortex-m4",
                "-mthumb",
                "-mfpu=fpv4-sp-d16",
                "-mfloat-abi=hard",
            ]),
            defines: strings(&["ARM_MATH_CM4", "__FPU_PRESENT=1"]),
            warning_flags: strings(&[
                "-Wno-pragma-once-outside-header",
                "-Wno-unused-parameter",
                "-Wno-unknown-pragmas",
            ]),
            c_standard: "-std=c11".to_string(),
            cxx_standard: "-std=c++14".to_string(),
            object_extension: ".o".to_string(),
        }
    }
}

/// A library directory layout recognized by a substring of the include path.
/// When matched, the listed subdirectories are probed and added as extra
/// include paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeConvention {
    pub marker: String,
    pub subdirectories: Vec<String>,
}

impl IncludeConvention {
    pub fn new(marker: &str, subdirectories: &[&str]) -> Self {
        Self {
            marker: marker.to_string(),
            subdirectories: strings(subdirectories),
        }
    }
}

pub fn default_include_conventions() -> Vec<IncludeConvention> {
    vec![
        IncludeConvention::new(
            "AC_Motor_Control",
            &["MotorControl/Inc", "Common/Inc", "MotorControl", "Common"],
        ),
        IncludeConvention::new("AT32F4_CppDrv", &["Inc"]),
    ]
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().copied().map(String::from).collect()
}
