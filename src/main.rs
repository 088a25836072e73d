use std::{env, error::Error, fs};

use clap::{App, Arg, ArgMatches};
use log::info;

use ewpnames::{
    configuration::{
        Configuration, DEFAULT_COMPILER, DEFAULT_CONFIGURATION, DEFAULT_DESCRIPTOR, DEFAULT_OUTPUT,
    },
    output::CompilationDatabase,
    project::Project,
    resolver::{CompilerResolver, DefaultFileSystem},
    Generator,
};
use util::{join, normalize_path};

mod summary;

fn main() -> Result<(), Box<dyn Error>> {
    let matches = arguments();

    let result = stderrlog::new()
        .module(module_path!())
        .module("ewpnames")
        .quiet(matches.is_present("quiet"))
        .verbosity(2 + matches.occurrences_of("verbose") as usize)
        .init();
    if let Err(error) = result {
        eprintln!("Cannot initialize logging: {}", error);
    }

    let config = configuration(&matches)?;
    run(&config)
}

fn arguments() -> ArgMatches<'static> {
    App::new("ewpbear")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generates compile_commands.json for clangd from an IAR Embedded Workbench project")
        .arg(
            Arg::with_name("ewp")
                .long("ewp")
                .value_name("FILE")
                .default_value(DEFAULT_DESCRIPTOR)
                .help("IAR project file (.ewp)"),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("NAME")
                .env("IAR_CONFIG")
                .default_value(DEFAULT_CONFIGURATION)
                .help("Build configuration to read"),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .value_name("FILE")
                .default_value(DEFAULT_OUTPUT)
                .help("Compilation database to write, relative to the project directory"),
        )
        .arg(
            Arg::with_name("compiler")
                .long("compiler")
                .value_name("PATH")
                .env("COMPILER_PATH")
                .default_value(DEFAULT_COMPILER)
                .help("ARM GCC compiler executable"),
        )
        .arg(
            Arg::with_name("project-dir")
                .long("project-dir")
                .value_name("DIR")
                .help("Project root used for $PROJ_DIR$ [default: current directory]"),
        )
        .arg(
            Arg::with_name("use-clang")
                .long("use-clang")
                .help("Emit commands for clang (adds --target=arm-none-eabi)"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Increase logging verbosity"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .help("Silence logging (fatal errors are still printed)"),
        )
        .get_matches()
}

fn configuration(matches: &ArgMatches) -> Result<Configuration, Box<dyn Error>> {
    let current_dir = env::current_dir()?;
    let project_root = normalize_path(&join(
        &current_dir.to_string_lossy(),
        matches.value_of("project-dir").unwrap_or("."),
    ));

    let mut config = Configuration::new(project_root);

    if let Some(descriptor) = matches.value_of("ewp") {
        config.descriptor = normalize_path(&join(&config.project_root, descriptor));
    }
    if let Some(output) = matches.value_of("output") {
        config.output = normalize_path(&join(&config.project_root, output));
    }
    if let Some(name) = matches.value_of("config") {
        config.configuration = name.to_string();
    }
    if let Some(compiler) = matches.value_of("compiler") {
        config.compiler = compiler.to_string();
    }
    config.use_clang = matches.is_present("use-clang");
    config.toolkit_dir = toolkit_dir(|name| env::var(name).ok());

    Ok(config)
}

/// `IAR_TOOLKIT_DIR`, then `TOOLKIT_DIR`. Empty values count as unset.
fn toolkit_dir<F>(environment: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    ["IAR_TOOLKIT_DIR", "TOOLKIT_DIR"]
        .iter()
        .filter_map(|name| environment(*name))
        .find(|value| !value.is_empty())
}

fn run(config: &Configuration) -> Result<(), Box<dyn Error>> {
    let filesystem = DefaultFileSystem;

    info!("Project file: {}", config.descriptor);
    info!("Configuration: {}", config.configuration);

    let compiler = CompilerResolver::new(&filesystem)
        .resolve(&config.compiler, &config.project_root, |name| {
            env::var(name).ok()
        })
        .map_err(|error| {
            format!(
                "{} (set the compiler with --compiler or COMPILER_PATH)",
                error
            )
        })?;
    info!("Compiler: {}", compiler);
    if config.use_clang {
        info!("Clang mode (--target={})", config.target.triple);
    }

    let source = fs::read_to_string(&config.descriptor)
        .map_err(|error| format!("Cannot read {}: {}", config.descriptor, error))?;
    let project = Project::parse(&source)?;

    let generation = Generator::new(config, &filesystem).generate(&project, &compiler)?;

    let json = CompilationDatabase::new().to_json(&generation.entries)?;
    fs::write(&config.output, json)
        .map_err(|error| format!("Cannot write {}: {}", config.output, error))?;

    summary::print(config, &generation);

    Ok(())
}
