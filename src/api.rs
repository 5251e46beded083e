use crate::constant::*;
use crate::model::{push_argument, ArgumentSpec, Command, ConfigError, OptionSet, OptionSpec, Schema};
use crate::parser::{Invocation, ProgramParser};

#[cfg(test)]
use crate::parser::UserInterface;

/// The program schema builder: declare options, positional arguments, and commands, then
/// build the command line parser.
///
/// Registration validates immediately; the first violation (duplicate option name, invalid
/// argument ordering, a main entry combined with commands, an unknown command name) is
/// recorded and surfaced when building.
/// These are defects in the host program, never user input errors.
///
/// ### Example
/// ```
/// use declargs::Program;
///
/// let parser = Program::new("copy", "Copy files around.")
///     .flag(Some('v'), Some("verify"), "verify after copying")
///     .argument("source", "the file to copy")
///     .argument("destination", "where to copy it")
///     .main(|invocation| {
///         let _ = (
///             invocation.is_option_set("verify"),
///             invocation.argument_value("source"),
///             invocation.argument_value("destination"),
///         );
///     })
///     .build_parser()
///     .unwrap();
///
/// let invocation = parser.parse_tokens(&["a.txt", "b.txt"]).unwrap();
/// assert_eq!(invocation.argument_value("source"), "a.txt");
/// ```
pub struct Program {
    schema: Schema,
    deferred_error: Option<ConfigError>,
}

impl Program {
    /// Create a program schema.
    /// The built-in `-h`/`--help` flag is always registered.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            schema: Schema::new(name, description),
            deferred_error: None,
        }
    }

    /// Register a global boolean flag.
    /// At least one of `short`/`long` must be given, and neither may collide with a key
    /// already registered in the global scope.
    ///
    /// ### Example
    /// ```
    /// use declargs::Program;
    ///
    /// let parser = Program::new("program", "")
    ///     .flag(None, Some("flag-a"), "a long flag")
    ///     .flag(Some('b'), None, "a short flag")
    ///     .main(|_| {})
    ///     .build_parser()
    ///     .unwrap();
    ///
    /// let invocation = parser.parse_tokens(&["--flag-a"]).unwrap();
    /// assert!(invocation.is_option_set("flag-a"));
    /// assert!(!invocation.is_option_set("b"));
    /// ```
    pub fn flag(
        mut self,
        short: Option<char>,
        long: Option<&str>,
        description: impl Into<String>,
    ) -> Self {
        let result = self.schema.options.insert(
            OptionSpec {
                short,
                long: long.map(str::to_string),
                value_name: None,
                default: None,
                description: description.into(),
            },
            None,
        );
        self.defer(result);
        self
    }

    /// Register a global option taking one value.
    /// An empty `value_name` degrades the option to a boolean flag; an empty `default` means
    /// no default.
    ///
    /// ### Example
    /// ```
    /// use declargs::Program;
    ///
    /// let parser = Program::new("program", "")
    ///     .option(Some('c'), Some("option-c"), "value", "foo", "an option")
    ///     .main(|_| {})
    ///     .build_parser()
    ///     .unwrap();
    ///
    /// let invocation = parser.parse_tokens(&[]).unwrap();
    /// assert_eq!(invocation.option_value("option-c"), "foo");
    /// ```
    pub fn option(
        mut self,
        short: Option<char>,
        long: Option<&str>,
        value_name: impl Into<String>,
        default: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let result = self
            .schema
            .options
            .insert(valued_spec(short, long, value_name, default, description), None);
        self.defer(result);
        self
    }

    /// Register a mandatory top-level positional argument.
    pub fn argument(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        let result = push_argument(
            &mut self.schema.arguments,
            argument_spec(name, description, false, false),
        );
        self.defer(result);
        self
    }

    /// Register an optional top-level positional argument.
    /// Optional arguments bind in order while tokens remain; an absent one reads back as the
    /// empty string.
    pub fn optional_argument(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let result = push_argument(
            &mut self.schema.arguments,
            argument_spec(name, description, true, false),
        );
        self.defer(result);
        self
    }

    /// Register a trailing top-level positional argument, capturing zero or more remaining
    /// tokens. It must be the last argument registered.
    pub fn trailing_argument(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let result = push_argument(
            &mut self.schema.arguments,
            argument_spec(name, description, false, true),
        );
        self.defer(result);
        self
    }

    /// Set the direct entry callback.
    /// Mutually exclusive with [`Program::command`].
    pub fn main(mut self, main: impl Fn(&Invocation) + 'static) -> Self {
        if !self.schema.commands.is_empty() {
            self.defer(Err(ConfigError::MainWithCommands));
            return self;
        }

        self.schema.main = Some(Box::new(main));
        self
    }

    /// Register a command with its entry callback.
    /// Mutually exclusive with [`Program::main`]; registering the same name again replaces the
    /// earlier command.
    ///
    /// ### Example
    /// ```
    /// use declargs::Program;
    ///
    /// let parser = Program::new("program", "")
    ///     .command("foo", "foo command", |_| {})
    ///     .command_flag("foo", Some('d'), Some("flag-d"), "a command flag")
    ///     .command_argument("foo", "arg-1", "the first argument")
    ///     .build_parser()
    ///     .unwrap();
    ///
    /// let invocation = parser.parse_tokens(&["foo", "-d", "x"]).unwrap();
    /// assert_eq!(invocation.command_name(), "foo");
    /// assert!(invocation.is_option_set("flag-d"));
    /// assert_eq!(invocation.argument_value("arg-1"), "x");
    /// ```
    pub fn command(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        entry: impl Fn(&Invocation) + 'static,
    ) -> Self {
        if self.schema.main.is_some() {
            self.defer(Err(ConfigError::MainWithCommands));
            return self;
        }

        let name = name.into();
        self.schema.commands.insert(
            name.clone(),
            Command {
                name,
                description: description.into(),
                entry: Some(Box::new(entry)),
                options: OptionSet::default(),
                arguments: Vec::default(),
            },
        );
        self
    }

    /// Register a boolean flag scoped to the named command.
    /// The keys must not collide with the command's own options nor with the global scope.
    pub fn command_flag(
        mut self,
        command: &str,
        short: Option<char>,
        long: Option<&str>,
        description: impl Into<String>,
    ) -> Self {
        let spec = OptionSpec {
            short,
            long: long.map(str::to_string),
            value_name: None,
            default: None,
            description: description.into(),
        };
        let result = self.insert_command_option(command, spec);
        self.defer(result);
        self
    }

    /// Register a value-taking option scoped to the named command.
    pub fn command_option(
        mut self,
        command: &str,
        short: Option<char>,
        long: Option<&str>,
        value_name: impl Into<String>,
        default: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let spec = valued_spec(short, long, value_name, default, description);
        let result = self.insert_command_option(command, spec);
        self.defer(result);
        self
    }

    /// Register a mandatory positional argument on the named command.
    pub fn command_argument(
        mut self,
        command: &str,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let spec = argument_spec(name, description, false, false);
        let result = self.push_command_argument(command, spec);
        self.defer(result);
        self
    }

    /// Register an optional positional argument on the named command.
    pub fn command_optional_argument(
        mut self,
        command: &str,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let spec = argument_spec(name, description, true, false);
        let result = self.push_command_argument(command, spec);
        self.defer(result);
        self
    }

    /// Register a trailing positional argument on the named command.
    pub fn command_trailing_argument(
        mut self,
        command: &str,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let spec = argument_spec(name, description, false, true);
        let result = self.push_command_argument(command, spec);
        self.defer(result);
        self
    }

    /// Register the built-in `-q`/`--quiet` flag, reflected into
    /// [`Invocation::quiet`](crate::Invocation::quiet).
    pub fn with_quiet_flag(mut self) -> Self {
        let result = self.schema.options.insert(
            OptionSpec {
                short: Some(QUIET_SHORT),
                long: Some(QUIET_NAME.to_string()),
                value_name: None,
                default: None,
                description: QUIET_DESCRIPTION.to_string(),
            },
            None,
        );
        self.defer(result);
        self.schema.quiet_enabled = true;
        self
    }

    /// Register the built-in `--debug <level>` option, validated as a non-negative 32-bit
    /// integer and reflected into [`Invocation::debug_level`](crate::Invocation::debug_level).
    pub fn with_debug_option(mut self) -> Self {
        let result = self.schema.options.insert(
            OptionSpec {
                short: None,
                long: Some(DEBUG_NAME.to_string()),
                value_name: Some(DEBUG_VALUE_NAME.to_string()),
                default: Some(DEBUG_DEFAULT.to_string()),
                description: DEBUG_DESCRIPTION.to_string(),
            },
            None,
        );
        self.defer(result);
        self.schema.debug_enabled = true;
        self
    }

    /// Build the command line parser as a Result.
    /// This finalizes the configuration: the first registration error is returned, a schema
    /// with neither a main entry nor commands is rejected, and command-based schemas gain the
    /// built-in `help` command.
    pub fn build_parser(self) -> Result<ProgramParser, ConfigError> {
        self.finish().map(ProgramParser::new)
    }

    /// Build the command line parser.
    /// If the configuration is invalid, prints the error and exits with status 1
    /// (via [`std::process::exit`]).
    pub fn build(self) -> ProgramParser {
        match self.build_parser() {
            Ok(parser) => parser,
            Err(error) => {
                eprintln!("{error}");
                std::process::exit(1);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn build_with_interface(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<ProgramParser, ConfigError> {
        self.finish()
            .map(|schema| ProgramParser::with_interface(schema, user_interface))
    }

    fn finish(self) -> Result<Schema, ConfigError> {
        let Program {
            mut schema,
            deferred_error,
        } = self;

        if let Some(error) = deferred_error {
            return Err(error);
        }

        if schema.main.is_none() && schema.commands.is_empty() {
            return Err(ConfigError::NoEntryPoint);
        }

        if !schema.commands.is_empty() {
            schema
                .commands
                .insert(HELP_COMMAND.to_string(), help_command());
        }

        Ok(schema)
    }

    fn defer(&mut self, result: Result<(), ConfigError>) {
        if let Err(error) = result {
            if self.deferred_error.is_none() {
                self.deferred_error = Some(error);
            }
        }
    }

    fn insert_command_option(&mut self, command: &str, spec: OptionSpec) -> Result<(), ConfigError> {
        match self.schema.commands.get_mut(command) {
            Some(selected) => selected.options.insert(spec, Some(&self.schema.options)),
            None => Err(ConfigError::UnknownCommand(command.to_string())),
        }
    }

    fn push_command_argument(
        &mut self,
        command: &str,
        spec: ArgumentSpec,
    ) -> Result<(), ConfigError> {
        match self.schema.commands.get_mut(command) {
            Some(selected) => push_argument(&mut selected.arguments, spec),
            None => Err(ConfigError::UnknownCommand(command.to_string())),
        }
    }
}

fn valued_spec(
    short: Option<char>,
    long: Option<&str>,
    value_name: impl Into<String>,
    default: impl Into<String>,
    description: impl Into<String>,
) -> OptionSpec {
    let value_name = value_name.into();
    let default = default.into();

    OptionSpec {
        short,
        long: long.map(str::to_string),
        value_name: (!value_name.is_empty()).then_some(value_name),
        default: (!default.is_empty()).then_some(default),
        description: description.into(),
    }
}

fn argument_spec(
    name: impl Into<String>,
    description: impl Into<String>,
    optional: bool,
    trailing: bool,
) -> ArgumentSpec {
    ArgumentSpec {
        name: name.into(),
        description: description.into(),
        optional,
        trailing,
    }
}

fn help_command() -> Command {
    let mut arguments = Vec::default();
    push_argument(
        &mut arguments,
        ArgumentSpec {
            name: HELP_COMMAND_ARGUMENT.to_string(),
            description: HELP_COMMAND_ARGUMENT_DESCRIPTION.to_string(),
            optional: false,
            trailing: true,
        },
    )
    .expect("internal error - the help command argument list is a single trailing argument");

    Command {
        name: HELP_COMMAND.to_string(),
        description: HELP_COMMAND_DESCRIPTION.to_string(),
        entry: None,
        options: OptionSet::default(),
        arguments,
    }
}
