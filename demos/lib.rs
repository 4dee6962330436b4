//! Shared output helpers for the runnable examples.

use command_mapper_core::Command;

/// Prints a labelled invocation as its argv and its shell string, or the
/// error that rejected it.
pub fn show(label: &str, command: &Command) {
    println!("=== {label} ===");
    match command.argv() {
        Ok(argv) => {
            println!("argv:   {argv:?}");
            if let Ok(line) = command.to_invocation_string() {
                println!("shell:  {line}");
            }
        }
        Err(err) => println!("error:  {err}"),
    }
    println!();
}
