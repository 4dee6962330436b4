//! POSIX shell escaping for invocation strings.
//!
//! Tokens made only of characters the shell never interprets are emitted
//! as-is; everything else is wrapped in single quotes, with embedded single
//! quotes written as `'\''`.
//!
//! # Examples
//!
//! ```
//! use command_mapper_core::shell::{shell_join, shell_quote};
//!
//! assert_eq!(shell_quote("--name=value"), "--name=value");
//! assert_eq!(shell_quote("it's here"), r#"'it'\''s here'"#);
//! assert_eq!(shell_join(["echo", "a b"]), "echo 'a b'");
//! ```

use indexmap::IndexMap;

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ',' | ':' | '/' | '@' | '%' | '+' | '=')
}

/// Escapes a single token for a POSIX shell.
pub fn shell_quote(token: &str) -> String {
    if token.is_empty() {
        return "''".to_string();
    }
    if token.chars().all(is_safe) {
        return token.to_string();
    }
    format!("'{}'", token.replace('\'', r"'\''"))
}

/// Escapes each token and joins them with spaces.
pub fn shell_join<I, S>(tokens: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|t| shell_quote(t.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escapes a `NAME=value` environment assignment.
pub fn env_assignment(name: &str, value: &str) -> String {
    format!("{}={}", shell_quote(name), shell_quote(value))
}

/// Renders environment assignments followed by the escaped argv.
///
/// The assignment prefix is only present when `env` is non-empty.
pub fn invocation_string(env: &IndexMap<String, String>, argv: &[String]) -> String {
    let command = shell_join(argv);
    if env.is_empty() {
        return command;
    }
    let assignments = env
        .iter()
        .map(|(name, value)| env_assignment(name, value))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{assignments} {command}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_special_characters() {
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("$HOME"), "'$HOME'");
        assert_eq!(shell_quote("a;b"), "'a;b'");
        assert_eq!(shell_quote("/usr/bin/env"), "/usr/bin/env");
    }

    #[test]
    fn test_invocation_without_env() {
        let argv = vec!["ls".to_string(), "-la".to_string()];
        assert_eq!(invocation_string(&IndexMap::new(), &argv), "ls -la");
    }

    #[test]
    fn test_invocation_with_env() {
        let mut env = IndexMap::new();
        env.insert("LANG".to_string(), "C".to_string());
        env.insert("GREETING".to_string(), "hello world".to_string());
        let argv = vec!["printenv".to_string()];
        assert_eq!(
            invocation_string(&env, &argv),
            "LANG=C GREETING='hello world' printenv"
        );
    }
}
