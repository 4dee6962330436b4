//! Registry loading example.
//!
//! Loads definition files from a directory (or a config file) and builds
//! an invocation from JSON parameters given on the command line.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p command-mapper-demos --example load_registry -- \
//!     schemas/ tar '{"create": true, "file": "out.tar", "members": ["src"]}'
//!
//! # Or point at a mapper config
//! cargo run -p command-mapper-demos --example load_registry -- \
//!     command-mapper.yml tar '{"extract": true, "file": "out.tar"}'
//! ```

use std::path::Path;

use command_mapper_core::{Command, Param};
use command_mapper_db::{DefinitionFormat, MapperConfig, SchemaRegistry};
use command_mapper_demos::show;

fn load(source: &Path) -> Result<(SchemaRegistry, Option<MapperConfig>), Box<dyn std::error::Error>> {
    if source.is_file() && DefinitionFormat::from_path(source) == Some(DefinitionFormat::Yaml) {
        if let Ok(config) = MapperConfig::load(source) {
            if config.has_sources() {
                let registry = SchemaRegistry::from_config(&config)?;
                return Ok((registry, Some(config)));
            }
        }
    }
    Ok((SchemaRegistry::load(source)?, None))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let (Some(source), Some(command)) = (args.next(), args.next()) else {
        eprintln!("usage: load_registry <dir|file|config.yml> <command> [params-json]");
        std::process::exit(2);
    };
    let params = args.next().unwrap_or_else(|| "{}".to_string());

    let (registry, config) = load(Path::new(&source))?;
    println!("Loaded {} schema(s): {:?}", registry.len(), registry.commands());
    println!("Source: {:?}", registry.source());
    println!();

    let Some(schema) = registry.get(&command) else {
        eprintln!("unknown command '{command}'");
        std::process::exit(1);
    };

    let params = match serde_json::from_str::<Param>(&params)? {
        Param::Map(entries) => entries
            .into_iter()
            .map(|(key, value)| (key.to_plain_string(), value))
            .collect(),
        _ => Vec::new(),
    };

    let mut invocation = Command::from_params(schema, params)?;
    if let Some(config) = config {
        for (key, value) in &config.env {
            invocation.set_env(key, value);
        }
    }
    show(&command, &invocation);

    Ok(())
}
