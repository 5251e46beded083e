use crate::parser::scan::ParseError;

/// Seam between the parser and the diagnostic stream.
/// The driver is the only component that prints; the scanner and the usage renderer stay pure.
pub(crate) trait UserInterface {
    fn print(&self, message: String);
    fn print_error(&self, error: ParseError);
}

/// Prints to stderr, matching the convention that usage and error text are diagnostic output.
#[derive(Default)]
pub(crate) struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        eprintln!("{message}");
    }

    fn print_error(&self, error: ParseError) {
        eprintln!("error: {error}");
    }
}
