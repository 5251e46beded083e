use std::fmt;

use thiserror::Error;

use crate::constant::*;
use crate::model::{ArgumentSpec, Command, Main, OptionSet, OptionSpec, Schema};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The error for invalid command line input.
///
/// These are expected runtime conditions caused by the untrusted token sequence, as opposed to
/// [`ConfigError`](crate::ConfigError) which reflects a defect in the host program.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A token looked like an option, but its key is not registered in scope.
    #[error("unknown option \"{0}\"")]
    UnknownOption(String),

    /// A value-taking option appeared as the final token.
    #[error("missing value for option \"{0}\"")]
    MissingOptionValue(String),

    /// The schema has commands but the token sequence named none.
    #[error("missing command")]
    MissingCommand,

    /// The command-name token does not name a registered command.
    #[error("unknown command \"{0}\"")]
    UnknownCommand(String),

    /// Fewer tokens remained than the mandatory argument count.
    #[error("missing argument(s)")]
    MissingArguments,

    /// Tokens remained after every non-trailing argument was bound.
    #[error("too many arguments")]
    TooManyArguments,

    /// The built-in `--debug` option carried a value outside the non-negative 32-bit range.
    #[error("invalid debug level {0}")]
    InvalidDebugLevel(String),
}

#[derive(Debug, Default, Clone)]
struct OptionState {
    set: bool,
    value: Option<String>,
}

#[derive(Debug, Default, Clone)]
struct ArgumentState {
    set: bool,
    value: String,
    trailing_values: Vec<String>,
}

/// The populated result of one parse: which options were set, what the positional arguments
/// bound to, and which command was selected.
///
/// The schema itself stays immutable across parses; an `Invocation` is rebuilt per token
/// sequence.
///
/// ### Example
/// ```
/// use declargs::Program;
///
/// let parser = Program::new("app", "An example application.")
///     .flag(Some('f'), Some("flag"), "a flag")
///     .argument("path", "the input path")
///     .main(|_| {})
///     .build_parser()
///     .unwrap();
///
/// let invocation = parser.parse_tokens(&["--flag", "data.txt"]).unwrap();
/// assert!(invocation.is_option_set("flag"));
/// assert!(invocation.is_option_set("f"));
/// assert_eq!(invocation.argument_value("path"), "data.txt");
/// ```
pub struct Invocation<'p> {
    schema: &'p Schema,
    command: Option<&'p Command>,
    global_states: Vec<OptionState>,
    command_states: Vec<OptionState>,
    argument_states: Vec<ArgumentState>,
    quiet: bool,
    debug_level: i32,
}

impl std::fmt::Debug for Invocation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invocation")
            .field("schema", &self.schema.name)
            .field("command", &self.command.map(|c| &c.name))
            .field("global_states", &self.global_states)
            .field("command_states", &self.command_states)
            .field("argument_states", &self.argument_states)
            .field("quiet", &self.quiet)
            .field("debug_level", &self.debug_level)
            .finish()
    }
}

impl<'p> Invocation<'p> {
    /// Whether the named option appeared on the command line.
    /// Either registered key of an option reports the same state.
    ///
    /// Panics when the name was never registered; asking for an unknown option is a defect in
    /// the host program.
    pub fn is_option_set(&self, name: &str) -> bool {
        self.must_option(name).1.set
    }

    /// The value bound to the named option, or its declared default when the option did not
    /// appear on the command line.
    ///
    /// Panics when the name was never registered.
    pub fn option_value(&self, name: &str) -> String {
        let (spec, state) = self.must_option(name);

        if !state.set {
            return spec.default.clone().unwrap_or_default();
        }

        state.value.clone().unwrap_or_default()
    }

    /// The value bound to the named positional argument, empty when the argument is optional
    /// and was absent.
    ///
    /// Panics when the name does not appear in the active argument list.
    pub fn argument_value(&self, name: &str) -> &str {
        &self.must_argument(name).value
    }

    /// The ordered values captured by the named trailing argument; empty when no tokens
    /// remained for it.
    ///
    /// Panics when the name does not appear in the active argument list.
    pub fn trailing_argument_values(&self, name: &str) -> &[String] {
        &self.must_argument(name).trailing_values
    }

    /// The name of the selected command.
    ///
    /// Panics when the schema has no commands.
    pub fn command_name(&self) -> &str {
        if self.schema.commands.is_empty() {
            panic!("no command defined");
        }

        &self
            .command
            .expect("internal error - a command schema always selects a command")
            .name
    }

    /// Whether the built-in quiet flag was registered and set.
    pub fn quiet(&self) -> bool {
        self.quiet
    }

    /// The validated value of the built-in debug option; `0` when unregistered or unset.
    pub fn debug_level(&self) -> i32 {
        self.debug_level
    }

    /// Print an informational message to stderr, unless the quiet flag is set.
    pub fn info(&self, message: impl fmt::Display) {
        if !self.quiet {
            eprintln!("{message}");
        }
    }

    /// Print a debug message to stderr when `level` does not exceed the selected debug level.
    pub fn debug(&self, level: i32, message: impl fmt::Display) {
        if level <= self.debug_level {
            eprintln!("{message}");
        }
    }

    /// Print an error message to stderr, prefixed with `error: `.
    pub fn error(&self, message: impl fmt::Display) {
        eprintln!("error: {message}");
    }

    pub(crate) fn is_builtin_help(&self) -> bool {
        self.command.is_some_and(|command| command.entry.is_none())
    }

    pub(crate) fn entry(&self) -> &'p Main {
        match self.command {
            Some(command) => command
                .entry
                .as_ref()
                .expect("internal error - the built-in help command is dispatched by the driver"),
            None => self
                .schema
                .main
                .as_ref()
                .expect("internal error - a schema without commands must carry a main"),
        }
    }

    fn must_option(&self, name: &str) -> (&OptionSpec, &OptionState) {
        if let Some(command) = self.command {
            if let Some((slot, spec)) = command.options.get(name) {
                return (spec, &self.command_states[slot]);
            }
        }

        match self.schema.options.get(name) {
            Some((slot, spec)) => (spec, &self.global_states[slot]),
            None => panic!("unknown option \"{name}\""),
        }
    }

    fn must_argument(&self, name: &str) -> &ArgumentState {
        let arguments = self.schema.active_arguments(self.command);

        for (slot, spec) in arguments.iter().enumerate() {
            if spec.name == name {
                return &self.argument_states[slot];
            }
        }

        panic!("unknown argument \"{name}\"");
    }
}

pub(crate) enum ScanOutcome<'p> {
    /// The help flag was encountered; render usage for the given view and stop.
    Help(Option<&'p Command>),
    Complete(Invocation<'p>),
}

/// The command selected before the failure (for contextual usage rendering), plus the cause.
pub(crate) type ScanError<'p> = (Option<&'p Command>, ParseError);

/// One pass over the token sequence: global options, command dispatch, command options,
/// positional binding, built-in validation.
pub(crate) fn scan<'p>(schema: &'p Schema, tokens: &[&str]) -> Result<ScanOutcome<'p>, ScanError<'p>> {
    let mut cursor = 0;
    let mut global_states = vec![OptionState::default(); schema.options.len()];

    scan_options(
        tokens,
        &mut cursor,
        (&schema.options, &mut global_states),
        None,
    )
    .map_err(|error| (None, error))?;

    if help_requested(schema, &global_states) {
        return Ok(ScanOutcome::Help(None));
    }

    let mut command: Option<&Command> = None;
    let mut command_states = Vec::default();

    if !schema.commands.is_empty() {
        let name = *tokens
            .get(cursor)
            .ok_or((None, ParseError::MissingCommand))?;
        let selected = schema
            .commands
            .get(name)
            .ok_or_else(|| (None, ParseError::UnknownCommand(name.to_string())))?;
        cursor += 1;

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Dispatched command '{name}'.");
        }

        command_states = vec![OptionState::default(); selected.options.len()];
        scan_options(
            tokens,
            &mut cursor,
            (&schema.options, &mut global_states),
            Some((&selected.options, &mut command_states)),
        )
        .map_err(|error| (Some(selected), error))?;

        if help_requested(schema, &global_states) {
            return Ok(ScanOutcome::Help(Some(selected)));
        }

        command = Some(selected);
    }

    let arguments = schema.active_arguments(command);
    let mut argument_states = vec![ArgumentState::default(); arguments.len()];
    bind_arguments(&tokens[cursor..], arguments, &mut argument_states)
        .map_err(|error| (command, error))?;

    #[cfg(feature = "tracing_debug")]
    {
        debug!(
            "Bound {count} positional argument(s).",
            count = arguments.len()
        );
    }

    let mut invocation = Invocation {
        schema,
        command,
        global_states,
        command_states,
        argument_states,
        quiet: false,
        debug_level: 0,
    };

    invocation.quiet = schema.quiet_enabled && invocation.is_option_set(QUIET_NAME);

    if schema.debug_enabled && invocation.is_option_set(DEBUG_NAME) {
        let value = invocation.option_value(DEBUG_NAME);
        match value.parse::<i64>() {
            Ok(level) if (0..=i64::from(i32::MAX)).contains(&level) => {
                invocation.debug_level = level as i32;
            }
            _ => return Err((command, ParseError::InvalidDebugLevel(value))),
        }
    }

    Ok(ScanOutcome::Complete(invocation))
}

/// A short option is exactly `-` plus one non-dash character; a long option is `--` plus two or
/// more characters. The literal `--` is neither: it stops the option scan and stays in place.
fn option_shaped(token: &str) -> bool {
    if token == "--" {
        return false;
    }

    let bytes = token.as_bytes();
    let short = bytes.len() == 2 && bytes[0] == b'-' && bytes[1] != b'-';
    let long = bytes.len() > 2 && token.starts_with("--");

    short || long
}

fn scan_options(
    tokens: &[&str],
    cursor: &mut usize,
    global: (&OptionSet, &mut Vec<OptionState>),
    mut command: Option<(&OptionSet, &mut Vec<OptionState>)>,
) -> Result<(), ParseError> {
    let (global_set, global_states) = global;

    while *cursor < tokens.len() {
        let token = tokens[*cursor];

        if !option_shaped(token) {
            break;
        }

        let key = token.trim_start_matches('-');

        // Key spaces are disjoint by construction, so scope order is irrelevant for lookup.
        let command_hit = match command.as_mut() {
            Some((set, states)) => match set.get(key) {
                Some((slot, spec)) => Some((spec, &mut states[slot])),
                None => None,
            },
            None => None,
        };
        let (spec, state) = match command_hit {
            Some(hit) => hit,
            None => match global_set.get(key) {
                Some((slot, spec)) => (spec, &mut global_states[slot]),
                None => return Err(ParseError::UnknownOption(key.to_string())),
            },
        };

        state.set = true;

        if spec.takes_value() {
            match tokens.get(*cursor + 1) {
                Some(value) => {
                    state.value = Some((*value).to_string());
                    *cursor += 2;
                }
                None => return Err(ParseError::MissingOptionValue(key.to_string())),
            }
        } else {
            *cursor += 1;
        }
    }

    Ok(())
}

fn help_requested(schema: &Schema, global_states: &[OptionState]) -> bool {
    schema
        .options
        .get(HELP_NAME)
        .is_some_and(|(slot, _)| global_states[slot].set)
}

fn bind_arguments(
    tokens: &[&str],
    arguments: &[ArgumentSpec],
    states: &mut [ArgumentState],
) -> Result<(), ParseError> {
    let mandatory = arguments
        .iter()
        .take_while(|spec| !spec.optional && !spec.trailing)
        .count();

    if tokens.len() < mandatory {
        return Err(ParseError::MissingArguments);
    }

    for slot in 0..mandatory {
        states[slot].set = true;
        states[slot].value = tokens[slot].to_string();
    }

    let mut cursor = mandatory;
    let mut trailing = None;

    for slot in mandatory..arguments.len() {
        if arguments[slot].trailing {
            trailing = Some(slot);
            break;
        }

        if cursor >= tokens.len() {
            break;
        }

        states[slot].set = true;
        states[slot].value = tokens[cursor].to_string();
        cursor += 1;
    }

    match trailing {
        Some(slot) => {
            states[slot].trailing_values = tokens[cursor..].iter().map(|t| t.to_string()).collect();
        }
        None if cursor < tokens.len() => return Err(ParseError::TooManyArguments),
        None => {}
    }

    Ok(())
}
