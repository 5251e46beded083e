//! A declarative command line layer: a host program registers global options, per-command
//! options, positional arguments, and sub-commands, then parses a token vector against that
//! declaration and renders formatted usage text.
//!
//! The schema is built once and stays immutable; each parse produces a separate
//! [`Invocation`] carrying the bound values, so the same parser can be exercised against many
//! token sequences.
//! All values are raw strings; conversion is left to the caller.
//!
//! ### Direct-main program
//! ```
//! use declargs::Program;
//!
//! let parser = Program::new("no-command", "an example program without any command")
//!     .flag(None, Some("flag-a"), "a long flag")
//!     .flag(Some('b'), None, "a short flag")
//!     .option(Some('c'), Some("option-c"), "value", "foo", "an option with both names")
//!     .argument("arg-1", "the first argument")
//!     .optional_argument("arg-opt", "an optional argument")
//!     .trailing_argument("rest", "all trailing arguments")
//!     .main(|invocation| {
//!         let _ = invocation.option_value("option-c");
//!     })
//!     .build_parser()
//!     .unwrap();
//!
//! let invocation = parser.parse_tokens(&["-b", "one", "two", "three"]).unwrap();
//! assert!(invocation.is_option_set("b"));
//! assert_eq!(invocation.argument_value("arg-1"), "one");
//! assert_eq!(invocation.argument_value("arg-opt"), "two");
//! assert_eq!(invocation.trailing_argument_values("rest"), &["three".to_string()]);
//! ```
//!
//! ### Command-based program
//! ```
//! use declargs::Program;
//!
//! let parser = Program::new("commands", "an example program with commands")
//!     .flag(Some('f'), Some("flag"), "a global flag")
//!     .command("foo", "foo command", |invocation| {
//!         let _ = invocation.argument_value("arg-1");
//!     })
//!     .command_flag("foo", Some('d'), Some("flag-d"), "a command flag")
//!     .command_argument("foo", "arg-1", "the first argument")
//!     .build_parser()
//!     .unwrap();
//!
//! let invocation = parser.parse_tokens(&["-f", "foo", "-d", "x"]).unwrap();
//! assert_eq!(invocation.command_name(), "foo");
//! assert!(invocation.is_option_set("flag"));
//! assert!(invocation.is_option_set("flag-d"));
//! ```
//!
//! Parse failures are reported as `error: <message>` plus the usage text of the command in
//! scope, and [`ProgramParser::parse`] exits with status 1; the built-in `-h`/`--help` flag
//! (and the `help` command of a command-based program) prints usage and exits with status 0.
#![deny(missing_docs)]
mod api;
mod build_id;
mod constant;
mod model;
mod parser;

pub use api::Program;
pub use build_id::{BuildId, InvalidBuildId};
pub use model::{ConfigError, Main};
pub use parser::{Invocation, ParseError, ProgramParser};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
