//! Docker run example.
//!
//! Defines a slice of the `docker` CLI in code and builds a few `docker run`
//! invocations, including ones that are rejected before anything executes.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p command-mapper-demos --example docker_run
//! ```

use command_mapper_core::{
    ArgumentSchema, Command, CommandSchema, KeyValueType, OptionSchema, Param, Type, Value,
};
use command_mapper_demos::show;

fn docker_schema() -> Result<CommandSchema, command_mapper_core::DefinitionError> {
    CommandSchema::builder("docker")
        .description("Container runtime")
        .flag("--debug")
        .subcommand("run", |run| {
            run.flag("--rm")
                .try_option(OptionSchema::named("-d", "detach"))
                .option_with_value("--name", Value::string())
                .try_option(
                    OptionSchema::with_value("--env", Value::new(Type::key_value()))
                        .map(OptionSchema::repeats),
                )
                .try_option(
                    OptionSchema::with_value(
                        "--publish",
                        Value::new(KeyValueType::new().with_separator(":").with_key(Value::new(Type::num()))),
                    )
                    .map(OptionSchema::repeats),
                )
                .try_option(
                    OptionSchema::with_value(
                        "--restart",
                        Value::new(Type::enumeration(["no", "always", "on-failure"])),
                    )
                    .map(OptionSchema::equals),
                )
                .argument(ArgumentSchema::new("image"))
                .argument(ArgumentSchema::new("command").optional().repeats())
        })
        .build()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let schema = docker_schema()?;

    let mut docker = Command::new(schema.clone()).with_env("DOCKER_HOST", "unix:///run/docker.sock");
    docker.select_subcommand(
        "run",
        [
            ("rm", Param::from(true)),
            ("name", Param::from("web")),
            ("env", Param::map([("MODE", "prod"), ("LOG_LEVEL", "info")])),
            ("publish", Param::from(vec![Param::map([(8080, "80")])])),
            ("restart", Param::from("on-failure")),
            ("image", Param::from("nginx:1.27")),
        ],
    )?;
    show("detached web server", &docker);

    let mut oneshot = Command::new(schema.clone());
    oneshot.set_option("debug", true)?;
    oneshot.select_subcommand(
        "run",
        [
            ("rm", Param::from(true)),
            ("image", Param::from("alpine")),
            ("command", Param::from(vec!["ls", "-la", "/tmp/my dir"])),
        ],
    )?;
    show("one-shot command with dash-leading arguments", &oneshot);

    let mut bad_restart = Command::new(schema.clone());
    bad_restart.select_subcommand(
        "run",
        [("restart", Param::from("sometimes")), ("image", Param::from("alpine"))],
    )?;
    show("unknown restart policy", &bad_restart);

    let mut no_image = Command::new(schema);
    no_image.select_subcommand("run", [("detach", true)])?;
    show("missing image", &no_image);

    Ok(())
}
