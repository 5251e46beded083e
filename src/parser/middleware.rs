use std::env;
use std::process;

use crate::constant::*;
use crate::model::Schema;
use crate::parser::interface::{ConsoleInterface, UserInterface};
use crate::parser::printer::render_usage;
use crate::parser::scan::{scan, Invocation, ParseError, ScanOutcome};

/// The configured command line parser.
/// Built via [`Program::build`](crate::Program::build) or
/// [`Program::build_parser`](crate::Program::build_parser).
///
/// This is the only component that writes to the diagnostic stream or decides exit codes; the
/// scanner and the usage renderer underneath it are pure.
pub struct ProgramParser {
    schema: Schema,
    user_interface: Box<dyn UserInterface>,
}

impl std::fmt::Debug for ProgramParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgramParser")
            .field("schema", &self.schema.name)
            .finish_non_exhaustive()
    }
}

impl ProgramParser {
    pub(crate) fn new(schema: Schema) -> Self {
        Self::with_interface(schema, Box::new(ConsoleInterface::default()))
    }

    pub(crate) fn with_interface(schema: Schema, user_interface: Box<dyn UserInterface>) -> Self {
        Self {
            schema,
            user_interface,
        }
    }

    /// Parse the given token sequence (everything following the program name).
    ///
    /// On success the populated [`Invocation`] is returned; the entry callback is not invoked
    /// (see [`ProgramParser::run`] for the full lifecycle).
    ///
    /// `Err(0)` signals that a help path was taken: the `-h`/`--help` flag, or the built-in
    /// `help` command of a command-based program. `Err(1)` signals a user input error, reported
    /// to the diagnostic stream as `error: <message>`, a blank line, and the usage text of the
    /// command in scope.
    ///
    /// ### Example
    /// ```
    /// use declargs::Program;
    ///
    /// let parser = Program::new("program", "An example.")
    ///     .flag(Some('f'), Some("flag"), "a flag")
    ///     .main(|_| {})
    ///     .build_parser()
    ///     .unwrap();
    ///
    /// let invocation = parser.parse_tokens(&["-f"]).unwrap();
    /// assert!(invocation.is_option_set("flag"));
    /// ```
    pub fn parse_tokens<'p>(&'p self, tokens: &[&str]) -> Result<Invocation<'p>, i32> {
        match scan(&self.schema, tokens) {
            Ok(ScanOutcome::Help(command)) => {
                self.user_interface
                    .print(render_usage(&self.schema, command));
                Err(0)
            }
            Ok(ScanOutcome::Complete(invocation)) => {
                if invocation.is_builtin_help() {
                    Err(self.print_command_help(&invocation))
                } else {
                    Ok(invocation)
                }
            }
            Err((command, error)) => {
                self.user_interface.print_error(error);
                self.user_interface.print(String::default());
                self.user_interface
                    .print(render_usage(&self.schema, command));
                Err(1)
            }
        }
    }

    /// Parse the process argument vector.
    /// Exits the process on a help path (status 0) or a user input error (status 1).
    pub fn parse(&self) -> Invocation<'_> {
        let command_input: Vec<String> = env::args().skip(1).collect();
        let tokens: Vec<&str> = command_input.iter().map(AsRef::as_ref).collect();

        match self.parse_tokens(tokens.as_slice()) {
            Ok(invocation) => invocation,
            Err(code) => process::exit(code),
        }
    }

    /// Parse the process argument vector, then invoke the selected entry callback: the
    /// dispatched command's callback, or the program main when the schema has no commands.
    pub fn run(&self) {
        let invocation = self.parse();
        let entry = invocation.entry();
        entry(&invocation);
    }

    /// The built-in `help` command: print the usage of each named command (blank-line
    /// separated), or the program usage when no names were given.
    fn print_command_help(&self, invocation: &Invocation) -> i32 {
        let names = invocation.trailing_argument_values(HELP_COMMAND_ARGUMENT);

        if names.is_empty() {
            self.user_interface.print(render_usage(&self.schema, None));
            return 0;
        }

        for (i, name) in names.iter().enumerate() {
            match self.schema.commands.get(name) {
                Some(command) => {
                    if i > 0 {
                        self.user_interface.print(String::default());
                        self.user_interface.print(String::default());
                    }

                    self.user_interface
                        .print(render_usage(&self.schema, Some(command)));
                }
                None => {
                    self.user_interface
                        .print_error(ParseError::UnknownCommand(name.clone()));
                    return 1;
                }
            }
        }

        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Program;
    use crate::parser::util::channel_interface;
    use crate::test::assert_contains;
    use rstest::rstest;
    use std::cell::Cell;
    use std::rc::Rc;

    #[rstest]
    #[case(vec!["-h"])]
    #[case(vec!["--help"])]
    fn parse_tokens_help(#[case] tokens: Vec<&str>) {
        // Setup
        let witness = Rc::new(Cell::new(false));
        let observer = Rc::clone(&witness);
        let (sender, receiver) = channel_interface();
        let parser = Program::new("program", "the description")
            .main(move |_| observer.set(true))
            .build_with_interface(Box::new(sender))
            .unwrap();

        // Execute
        let error_code = parser.parse_tokens(tokens.as_slice()).unwrap_err();

        // Verify
        assert_eq!(error_code, 0);
        assert!(!witness.get());

        let message = receiver.consume_message();
        assert_contains!(message, "Usage: program OPTIONS");
        assert_contains!(message, "-h, --help  print help and exit");
    }

    #[test]
    fn parse_tokens_unknown_option() {
        // Setup
        let (sender, receiver) = channel_interface();
        let parser = Program::new("program", "")
            .main(|_| {})
            .build_with_interface(Box::new(sender))
            .unwrap();

        // Execute
        let error_code = parser.parse_tokens(&["--nope"]).unwrap_err();

        // Verify
        assert_eq!(error_code, 1);

        let (message, error) = receiver.consume();
        assert_eq!(error, Some("error: unknown option \"nope\"".to_string()));
        let message = message.unwrap();
        // A blank line precedes the usage block.
        assert!(message.starts_with("\nUsage: program OPTIONS"));
    }

    #[test]
    fn parse_tokens_error_in_command_scope() {
        // Setup
        let (sender, receiver) = channel_interface();
        let parser = Program::new("program", "")
            .command("foo", "foo command", |_| {})
            .command_argument("foo", "arg-1", "the first argument")
            .build_with_interface(Box::new(sender))
            .unwrap();

        // Execute
        let error_code = parser.parse_tokens(&["foo"]).unwrap_err();

        // Verify
        assert_eq!(error_code, 1);

        let (message, error) = receiver.consume();
        assert_eq!(error, Some("error: missing argument(s)".to_string()));
        assert_contains!(message.unwrap(), "Usage: program foo OPTIONS <arg-1>");
    }

    #[test]
    fn parse_tokens_unknown_command() {
        // Setup
        let (sender, receiver) = channel_interface();
        let parser = Program::new("program", "")
            .command("foo", "foo command", |_| {})
            .build_with_interface(Box::new(sender))
            .unwrap();

        // Execute
        let error_code = parser.parse_tokens(&["walk"]).unwrap_err();

        // Verify
        assert_eq!(error_code, 1);

        let (message, error) = receiver.consume();
        assert_eq!(error, Some("error: unknown command \"walk\"".to_string()));
        assert_contains!(message.unwrap(), "Usage: program OPTIONS <command>");
    }

    #[test]
    fn help_command_without_names() {
        // Setup
        let (sender, receiver) = channel_interface();
        let parser = Program::new("program", "")
            .command("foo", "foo command", |_| {})
            .build_with_interface(Box::new(sender))
            .unwrap();

        // Execute
        let error_code = parser.parse_tokens(&["help"]).unwrap_err();

        // Verify
        assert_eq!(error_code, 0);

        let message = receiver.consume_message();
        assert_contains!(message, "Usage: program OPTIONS <command>");
        assert_contains!(message, "COMMANDS");
        assert_contains!(message, "foo command");
        assert_contains!(message, "print help and exit");
    }

    #[test]
    fn help_command_with_names() {
        // Setup
        let (sender, receiver) = channel_interface();
        let parser = Program::new("program", "")
            .command("foo", "foo command", |_| {})
            .command("bar", "bar command", |_| {})
            .build_with_interface(Box::new(sender))
            .unwrap();

        // Execute
        let error_code = parser.parse_tokens(&["help", "foo", "bar"]).unwrap_err();

        // Verify
        assert_eq!(error_code, 0);

        let message = receiver.consume_message();
        assert_contains!(message, "Usage: program foo OPTIONS");
        assert_contains!(message, "Usage: program bar OPTIONS");
        // Blocks are separated by a pair of blank lines.
        assert_contains!(message, "\n\n\nUsage: program bar OPTIONS");
    }

    #[test]
    fn help_command_unknown_name() {
        // Setup
        let (sender, receiver) = channel_interface();
        let parser = Program::new("program", "")
            .command("foo", "foo command", |_| {})
            .build_with_interface(Box::new(sender))
            .unwrap();

        // Execute
        let error_code = parser.parse_tokens(&["help", "nope"]).unwrap_err();

        // Verify
        assert_eq!(error_code, 1);

        let (message, error) = receiver.consume();
        assert_eq!(message, None);
        assert_eq!(error, Some("error: unknown command \"nope\"".to_string()));
    }

    #[test]
    fn entry_dispatches_to_command() {
        // Setup
        let command_witness = Rc::new(Cell::new(false));
        let observer = Rc::clone(&command_witness);
        let (sender, _receiver) = channel_interface();
        let parser = Program::new("program", "")
            .command("foo", "foo command", move |_| observer.set(true))
            .build_with_interface(Box::new(sender))
            .unwrap();

        // Execute
        let invocation = parser.parse_tokens(&["foo"]).unwrap();
        invocation.entry()(&invocation);

        // Verify
        assert!(command_witness.get());
        assert_eq!(invocation.command_name(), "foo");
    }

    #[test]
    fn entry_dispatches_to_main() {
        // Setup
        let witness = Rc::new(Cell::new(false));
        let observer = Rc::clone(&witness);
        let (sender, _receiver) = channel_interface();
        let parser = Program::new("program", "")
            .main(move |invocation| observer.set(invocation.is_option_set("flag")))
            .flag(Some('f'), Some("flag"), "a flag")
            .build_with_interface(Box::new(sender))
            .unwrap();

        // Execute
        let invocation = parser.parse_tokens(&["--flag"]).unwrap();
        invocation.entry()(&invocation);

        // Verify
        assert!(witness.get());
    }
}
