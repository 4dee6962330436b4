use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use command_mapper_core::{Command as Invocation, Param};
use command_mapper_db::{DefinitionFormat, MapperConfig, SchemaRegistry};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[command(name = "argv-build")]
#[command(about = "Build validated argument vectors from command schemas")]
struct Cli {
    /// Mapper config naming schema sources and default environment.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log debug output to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate definition files and/or directories.
    Validate(ValidateArgs),
    /// List the commands known to the schema sources.
    List(SourceArgs),
    /// Print the argument vector for an invocation as a JSON array.
    Argv(InvocationArgs),
    /// Print the shell-escaped invocation string.
    #[command(name = "string")]
    InvocationString(StringArgs),
    /// Bundle definition files into a SchemaPackage file.
    Bundle(BundleArgs),
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Definition files and/or directories of definition files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Definition file, bundle, or directory (repeatable; overrides --config).
    #[arg(long = "schemas")]
    schemas: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct InvocationArgs {
    #[command(flatten)]
    sources: SourceArgs,
    /// Command name to build.
    #[arg(long)]
    command: String,
    /// JSON object of parameter values, or `-` for stdin.
    #[arg(long)]
    params: Option<String>,
    /// Program path to use instead of the command name.
    #[arg(long)]
    path: Option<String>,
}

#[derive(Debug, Args)]
struct StringArgs {
    #[command(flatten)]
    invocation: InvocationArgs,
    /// Environment assignment KEY=VALUE to prefix (repeatable).
    #[arg(long = "env", value_name = "KEY=VALUE")]
    env: Vec<String>,
}

#[derive(Debug, Args)]
struct BundleArgs {
    /// Definition files and/or directories of definition files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Output bundle path (`.json`, `.yaml`, or `.yml`).
    #[arg(long)]
    output: PathBuf,
    /// Optional bundle name metadata.
    #[arg(long)]
    name: Option<String>,
    /// Optional bundle description metadata.
    #[arg(long)]
    description: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match cli.config.as_deref().map(MapperConfig::load).transpose() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: failed to load config: {err}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::List(args) => run_list(args, config.as_ref()),
        Command::Argv(args) => run_argv(args, config.as_ref()),
        Command::InvocationString(args) => run_string(args, config.as_ref()),
        Command::Bundle(args) => run_bundle(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut total = 0;
    for input in &args.inputs {
        let registry = SchemaRegistry::load(input)
            .map_err(|err| format!("'{}': {err}", input.display()))?;
        println!(
            "{}: {} command(s) ok",
            input.display(),
            registry.len()
        );
        total += registry.len();
    }
    println!(
        "Validated {} input(s) for {total} command(s).",
        args.inputs.len()
    );
    Ok(())
}

fn run_list(args: SourceArgs, config: Option<&MapperConfig>) -> Result<(), String> {
    let registry = load_registry(&args, config)?;
    for name in registry.commands() {
        match registry.get(name).and_then(|s| s.description.clone()) {
            Some(description) => println!("{name}\t{description}"),
            None => println!("{name}"),
        }
    }
    Ok(())
}

fn run_argv(args: InvocationArgs, config: Option<&MapperConfig>) -> Result<(), String> {
    let invocation = build_invocation(&args, config)?;
    let argv = invocation.argv().map_err(|err| err.to_string())?;
    let raw = serde_json::to_string(&argv)
        .map_err(|err| format!("Failed to serialize argv: {err}"))?;
    println!("{raw}");
    Ok(())
}

fn run_string(args: StringArgs, config: Option<&MapperConfig>) -> Result<(), String> {
    let mut invocation = build_invocation(&args.invocation, config)?;
    for assignment in &args.env {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| format!("invalid --env '{assignment}', expected KEY=VALUE"))?;
        if key.is_empty() {
            return Err(format!("invalid --env '{assignment}', empty variable name"));
        }
        invocation.set_env(key, value);
    }
    let line = invocation
        .to_invocation_string()
        .map_err(|err| err.to_string())?;
    println!("{line}");
    Ok(())
}

fn run_bundle(args: BundleArgs) -> Result<(), String> {
    let registry = load_paths(&args.inputs)?;
    let mut package = registry.to_package(PACKAGE_VERSION);
    package.name = args.name;
    package.description = args.description;

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create output directory '{}': {err}",
                    parent.display()
                )
            })?;
        }
    }

    let raw = match DefinitionFormat::from_path(&args.output) {
        Some(DefinitionFormat::Yaml) => serde_yaml::to_string(&package)
            .map_err(|err| format!("Failed to serialize schema bundle: {err}"))?,
        Some(DefinitionFormat::Json) | None => serde_json::to_string_pretty(&package)
            .map_err(|err| format!("Failed to serialize schema bundle: {err}"))?,
    };
    fs::write(&args.output, raw)
        .map_err(|err| format!("Failed to write '{}': {err}", args.output.display()))?;

    println!(
        "Bundled {} schema(s) into '{}'.",
        package.schema_count(),
        args.output.display()
    );

    Ok(())
}

fn load_registry(
    args: &SourceArgs,
    config: Option<&MapperConfig>,
) -> Result<SchemaRegistry, String> {
    if !args.schemas.is_empty() {
        return load_paths(&args.schemas);
    }
    match config {
        Some(config) => SchemaRegistry::from_config(config).map_err(|err| err.to_string()),
        None => Err("no schema sources given (use --schemas or --config)".to_string()),
    }
}

fn load_paths(paths: &[PathBuf]) -> Result<SchemaRegistry, String> {
    let mut registry = SchemaRegistry::new();
    for path in paths {
        let part = SchemaRegistry::load(path)
            .map_err(|err| format!("'{}': {err}", path.display()))?;
        registry.merge(part);
    }
    Ok(registry)
}

fn build_invocation(
    args: &InvocationArgs,
    config: Option<&MapperConfig>,
) -> Result<Invocation, String> {
    let registry = load_registry(&args.sources, config)?;
    let schema = registry
        .get(&args.command)
        .ok_or_else(|| format!("unknown command '{}'", args.command))?;

    let params = match &args.params {
        Some(source) => read_params(source)?,
        None => Vec::new(),
    };
    debug!(command = %args.command, params = params.len(), "Building invocation");

    let mut invocation = Invocation::from_params(schema, params).map_err(|err| err.to_string())?;
    if let Some(path) = &args.path {
        invocation.set_path(path);
    }
    if let Some(config) = config {
        for (key, value) in &config.env {
            invocation.set_env(key, value);
        }
    }
    Ok(invocation)
}

fn read_params(source: &str) -> Result<Vec<(String, Param)>, String> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|err| format!("Failed to read params from stdin: {err}"))?;
        buf
    } else {
        fs::read_to_string(Path::new(source))
            .map_err(|err| format!("Failed to read '{source}': {err}"))?
    };

    match serde_json::from_str::<Param>(&raw) {
        Ok(Param::Map(entries)) => Ok(entries
            .into_iter()
            .map(|(key, value)| (key.to_plain_string(), value))
            .collect()),
        Ok(Param::Nil) => Ok(Vec::new()),
        Ok(other) => Err(format!("params must be a JSON object, got {other}")),
        Err(err) => Err(format!("invalid params JSON: {err}")),
    }
}
