//! Copy-on-define schema inheritance.
//!
//! A command kind may start from a parent kind's options, arguments, and
//! subcommands. [`inherit_schema`] copies the parent's tables into a new,
//! independent schema; entries the child defines with the same name replace
//! the inherited ones in place. Because the result is a snapshot, changing
//! the parent afterwards never affects an already-defined child.
//!
//! # Example
//!
//! ```
//! use command_mapper_core::*;
//!
//! let base = CommandSchema::builder("tool")
//!     .flag("--verbose")
//!     .build()
//!     .unwrap();
//! let child = CommandSchema::builder("tool-child")
//!     .option_with_value("--output", Value::string())
//!     .build()
//!     .unwrap();
//!
//! let merged = inherit_schema(&base, &child);
//! assert_eq!(merged.name, "tool-child");
//! assert_eq!(merged.option_names(), vec!["verbose", "output"]);
//! ```

use indexmap::IndexMap;

use crate::CommandSchema;

/// Returns `child` with `parent`'s options, arguments, and subcommands
/// copied in ahead of its own.
///
/// The child's name is kept; its description falls back to the parent's.
pub fn inherit_schema(parent: &CommandSchema, child: &CommandSchema) -> CommandSchema {
    let mut merged = child.clone();

    merged.description = child
        .description
        .clone()
        .or_else(|| parent.description.clone());
    merged.options = merge_named(&parent.options, &child.options, |o| &o.name);
    merged.arguments = merge_named(&parent.arguments, &child.arguments, |a| &a.name);
    merged.subcommands = merge_named(&parent.subcommands, &child.subcommands, |s| &s.name);

    merged
}

/// Merges two ordered tables by name; `overlay` entries replace `base`
/// entries in place and new names are appended.
pub(crate) fn merge_named<T, F>(base: &[T], overlay: &[T], key: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> &String,
{
    let mut by_name: IndexMap<String, T> = IndexMap::new();
    for entry in base.iter().chain(overlay) {
        by_name.insert(key(entry).clone(), entry.clone());
    }
    by_name.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArgumentSchema, Type, Value};

    #[test]
    fn test_child_overrides_in_place() {
        let parent = CommandSchema::builder("base")
            .flag("--alpha")
            .option_with_value("--beta", Value::string())
            .argument(ArgumentSchema::new("path"))
            .build()
            .unwrap();
        let child = CommandSchema::builder("child")
            .option_with_value("--alpha", Value::new(Type::num()))
            .flag("--gamma")
            .build()
            .unwrap();

        let merged = inherit_schema(&parent, &child);
        assert_eq!(merged.option_names(), vec!["alpha", "beta", "gamma"]);
        assert!(merged.find_option("alpha").unwrap().accepts_value());
        assert_eq!(merged.argument_names(), vec!["path"]);
    }

    #[test]
    fn test_description_falls_back_to_parent() {
        let parent = CommandSchema::builder("base")
            .description("parent docs")
            .build()
            .unwrap();
        let child = CommandSchema::builder("child").build().unwrap();
        let merged = inherit_schema(&parent, &child);
        assert_eq!(merged.description.as_deref(), Some("parent docs"));
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut parent = CommandSchema::builder("base").flag("--one").build().unwrap();
        let child = inherit_schema(&parent, &CommandSchema::builder("child").build().unwrap());

        parent.options.clear();
        assert_eq!(child.option_names(), vec!["one"]);
    }
}
