pub(crate) const HELP_SHORT: char = 'h';
pub(crate) const HELP_NAME: &str = "help";
pub(crate) const HELP_DESCRIPTION: &str = "print help and exit";

pub(crate) const HELP_COMMAND: &str = "help";
pub(crate) const HELP_COMMAND_DESCRIPTION: &str = "print help and exit";
pub(crate) const HELP_COMMAND_ARGUMENT: &str = "command";
pub(crate) const HELP_COMMAND_ARGUMENT_DESCRIPTION: &str = "the name of the command(s)";

pub(crate) const QUIET_SHORT: char = 'q';
pub(crate) const QUIET_NAME: &str = "quiet";
pub(crate) const QUIET_DESCRIPTION: &str = "do not print status and information messages";

pub(crate) const DEBUG_NAME: &str = "debug";
pub(crate) const DEBUG_VALUE_NAME: &str = "level";
pub(crate) const DEBUG_DEFAULT: &str = "0";
pub(crate) const DEBUG_DESCRIPTION: &str = "print debug messages";
