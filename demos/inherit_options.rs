//! Schema inheritance example.
//!
//! Several `git` subcommands share the same connection options. A base
//! schema defines them once; each subcommand copies them at definition time
//! and may override individual entries.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p command-mapper-demos --example inherit_options
//! ```

use command_mapper_core::{
    ArgumentSchema, Command, CommandSchema, NumType, OptionSchema, Param, Value,
};
use command_mapper_demos::show;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let remote = CommandSchema::builder("remote-options")
        .flag("--verbose")
        .flag("--quiet")
        .option_with_value("--depth", Value::new(NumType::new().with_range(0..=i64::MAX)))
        .argument(ArgumentSchema::new("repository"))
        .build()?;

    let git = CommandSchema::builder("git")
        .try_option(OptionSchema::named("-C", "directory").map(|o| o.taking(Value::string())))
        .subcommand("fetch", |fetch| {
            fetch
                .inherit(&remote)
                .flag("--prune")
                .argument(ArgumentSchema::new("refspec").optional().repeats())
        })
        .subcommand("clone", |clone| {
            clone
                .inherit(&remote)
                // clone needs at least one commit of history
                .option_with_value("--depth", Value::new(NumType::new().with_range(1..=i64::MAX)))
                .argument(ArgumentSchema::new("directory").optional())
        })
        .build()?;

    for sub in git.subcommand_names() {
        if let Some(schema) = git.find_subcommand(sub) {
            println!("{sub}: options {:?}, arguments {:?}", schema.option_names(), schema.argument_names());
        }
    }
    println!();

    let clone = Command::from_params(
        git.clone(),
        [(
            "clone",
            Param::map([
                ("depth", Param::from(1)),
                ("quiet", Param::from(true)),
                ("repository", Param::from("https://example.com/repo.git")),
                ("directory", Param::from("work tree")),
            ]),
        )],
    )?;
    show("shallow clone", &clone);

    let mut fetch = Command::new(git);
    fetch.set_param("directory", "/srv/repo")?;
    fetch
        .select_subcommand("fetch", [("prune", Param::from(true)), ("repository", Param::from("origin"))])?
        .set_argument("refspec", vec!["main", "+refs/tags/*:refs/tags/*"])?;
    show("fetch with refspecs", &fetch);

    Ok(())
}
