use std::collections::HashMap;

use thiserror::Error;

use crate::constant::*;
use crate::parser::Invocation;

/// An entry callback, invoked with the populated [`Invocation`] once parsing completes.
pub type Main = Box<dyn Fn(&Invocation)>;

/// The error for an invalid parser configuration.
///
/// A configuration error signals a defect in the host program's registration code, never bad
/// command line input.
/// It is recorded at the offending registration call and surfaced by `Program::build_parser`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An option was registered without a short or a long name.
    #[error("option has no short or long name")]
    NamelessOption,

    /// An option name collides with one already registered in the same scope, or in the global
    /// scope for a command-local option.
    #[error("duplicate option name \"{0}\"")]
    DuplicateOptionName(String),

    /// A main entry callback and commands were both registered.
    #[error("cannot have a main function with commands")]
    MainWithCommands,

    /// A mandatory argument was registered after an optional argument.
    #[error("cannot add non-optional argument after optional argument")]
    ArgumentAfterOptional,

    /// An argument was registered after a trailing argument.
    #[error("cannot add argument after trailing argument")]
    ArgumentAfterTrailing,

    /// A second trailing argument was registered.
    #[error("cannot add multiple trailing arguments")]
    MultipleTrailingArguments,

    /// A command-scoped registration call named a command that does not exist.
    #[error("unknown command \"{0}\"")]
    UnknownCommand(String),

    /// The program was built with neither a main entry callback nor commands.
    #[error("program has neither a main function nor commands")]
    NoEntryPoint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OptionSpec {
    pub(crate) short: Option<char>,
    pub(crate) long: Option<String>,
    pub(crate) value_name: Option<String>,
    pub(crate) default: Option<String>,
    pub(crate) description: String,
}

impl OptionSpec {
    pub(crate) fn takes_value(&self) -> bool {
        self.value_name.is_some()
    }

    pub(crate) fn sort_key(&self) -> String {
        match (&self.short, &self.long) {
            (Some(short), _) => short.to_string(),
            (None, Some(long)) => long.clone(),
            (None, None) => String::default(),
        }
    }
}

/// Arena of option specs with short and long keys indexing into the same slot.
/// An option registered under both names is one spec reachable through two index entries.
#[derive(Debug, Default)]
pub(crate) struct OptionSet {
    specs: Vec<OptionSpec>,
    index: HashMap<String, usize>,
}

impl OptionSet {
    pub(crate) fn insert(
        &mut self,
        spec: OptionSpec,
        global: Option<&OptionSet>,
    ) -> Result<(), ConfigError> {
        let mut keys: Vec<String> = Vec::with_capacity(2);

        if let Some(short) = spec.short {
            keys.push(short.to_string());
        }

        if let Some(long) = &spec.long {
            keys.push(long.clone());
        }

        if keys.is_empty() {
            return Err(ConfigError::NamelessOption);
        }

        for (i, key) in keys.iter().enumerate() {
            if keys[..i].contains(key)
                || self.index.contains_key(key)
                || global.is_some_and(|g| g.index.contains_key(key))
            {
                return Err(ConfigError::DuplicateOptionName(key.clone()));
            }
        }

        let slot = self.specs.len();
        self.specs.push(spec);

        for key in keys {
            self.index.insert(key, slot);
        }

        Ok(())
    }

    pub(crate) fn get(&self, key: &str) -> Option<(usize, &OptionSpec)> {
        self.index.get(key).map(|&slot| (slot, &self.specs[slot]))
    }

    pub(crate) fn len(&self) -> usize {
        self.specs.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, OptionSpec> {
        self.specs.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArgumentSpec {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) optional: bool,
    pub(crate) trailing: bool,
}

/// Append `spec` to an argument list, enforcing the positional ordering invariants:
/// a mandatory argument may not follow an optional or trailing one, nothing may follow a
/// trailing argument, and at most one trailing argument may exist.
pub(crate) fn push_argument(
    arguments: &mut Vec<ArgumentSpec>,
    spec: ArgumentSpec,
) -> Result<(), ConfigError> {
    if let Some(last) = arguments.last() {
        if last.trailing {
            return Err(if spec.trailing {
                ConfigError::MultipleTrailingArguments
            } else {
                ConfigError::ArgumentAfterTrailing
            });
        }

        if last.optional && !spec.optional && !spec.trailing {
            return Err(ConfigError::ArgumentAfterOptional);
        }
    }

    arguments.push(spec);
    Ok(())
}

pub(crate) struct Command {
    pub(crate) name: String,
    pub(crate) description: String,
    /// `None` marks the synthesized `help` command; every host-registered command carries one.
    pub(crate) entry: Option<Main>,
    pub(crate) options: OptionSet,
    pub(crate) arguments: Vec<ArgumentSpec>,
}

pub(crate) struct Schema {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) main: Option<Main>,
    pub(crate) commands: HashMap<String, Command>,
    pub(crate) options: OptionSet,
    pub(crate) arguments: Vec<ArgumentSpec>,
    pub(crate) quiet_enabled: bool,
    pub(crate) debug_enabled: bool,
}

impl Schema {
    pub(crate) fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let mut options = OptionSet::default();
        options
            .insert(
                OptionSpec {
                    short: Some(HELP_SHORT),
                    long: Some(HELP_NAME.to_string()),
                    value_name: None,
                    default: None,
                    description: HELP_DESCRIPTION.to_string(),
                },
                None,
            )
            .expect("internal error - help flag must insert into an empty option set");

        Self {
            name: name.into(),
            description: description.into(),
            main: None,
            commands: HashMap::default(),
            options,
            arguments: Vec::default(),
            quiet_enabled: false,
            debug_enabled: false,
        }
    }

    pub(crate) fn active_arguments<'s>(&'s self, command: Option<&'s Command>) -> &'s [ArgumentSpec] {
        match command {
            Some(command) => &command.arguments,
            None => &self.arguments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn flag_spec(short: Option<char>, long: Option<&str>) -> OptionSpec {
        OptionSpec {
            short,
            long: long.map(str::to_string),
            value_name: None,
            default: None,
            description: "a flag".to_string(),
        }
    }

    fn argument_spec(name: &str, optional: bool, trailing: bool) -> ArgumentSpec {
        ArgumentSpec {
            name: name.to_string(),
            description: "an argument".to_string(),
            optional,
            trailing,
        }
    }

    #[test]
    fn option_set_insert() {
        // Setup
        let mut set = OptionSet::default();

        // Execute
        set.insert(flag_spec(Some('f'), Some("flag")), None).unwrap();
        set.insert(flag_spec(Some('g'), None), None).unwrap();
        set.insert(flag_spec(None, Some("other")), None).unwrap();

        // Verify
        assert_eq!(set.len(), 3);
        let (slot_short, _) = set.get("f").unwrap();
        let (slot_long, _) = set.get("flag").unwrap();
        assert_eq!(slot_short, slot_long);
        assert_eq!(set.get("g").unwrap().0, 1);
        assert_eq!(set.get("other").unwrap().0, 2);
        assert_eq!(set.get("nope"), None);
    }

    #[test]
    fn option_set_nameless() {
        let mut set = OptionSet::default();

        let error = set.insert(flag_spec(None, None), None).unwrap_err();

        assert_eq!(error, ConfigError::NamelessOption);
    }

    #[rstest]
    #[case(flag_spec(Some('f'), None), "f")]
    #[case(flag_spec(None, Some("flag")), "flag")]
    #[case(flag_spec(Some('f'), Some("other")), "f")]
    #[case(flag_spec(Some('x'), Some("flag")), "flag")]
    fn option_set_duplicate(#[case] spec: OptionSpec, #[case] expected_key: &str) {
        // Setup
        let mut set = OptionSet::default();
        set.insert(flag_spec(Some('f'), Some("flag")), None).unwrap();

        // Execute
        let error = set.insert(spec, None).unwrap_err();

        // Verify
        assert_eq!(error, ConfigError::DuplicateOptionName(expected_key.to_string()));
    }

    #[test]
    fn option_set_duplicate_against_global() {
        // Setup
        let mut global = OptionSet::default();
        global.insert(flag_spec(Some('f'), Some("flag")), None).unwrap();
        let mut local = OptionSet::default();

        // Execute & verify
        let error = local
            .insert(flag_spec(None, Some("flag")), Some(&global))
            .unwrap_err();
        assert_eq!(error, ConfigError::DuplicateOptionName("flag".to_string()));

        local.insert(flag_spec(Some('d'), None), Some(&global)).unwrap();
        assert_eq!(local.len(), 1);
    }

    #[test]
    fn option_set_self_colliding_names() {
        let mut set = OptionSet::default();

        let error = set.insert(flag_spec(Some('x'), Some("x")), None).unwrap_err();

        assert_eq!(error, ConfigError::DuplicateOptionName("x".to_string()));
    }

    #[test]
    fn push_argument_ordering() {
        // Setup
        let mut arguments = Vec::default();

        // Execute
        push_argument(&mut arguments, argument_spec("a", false, false)).unwrap();
        push_argument(&mut arguments, argument_spec("b", false, false)).unwrap();
        push_argument(&mut arguments, argument_spec("c", true, false)).unwrap();
        push_argument(&mut arguments, argument_spec("d", true, false)).unwrap();
        push_argument(&mut arguments, argument_spec("e", false, true)).unwrap();

        // Verify
        assert_eq!(arguments.len(), 5);
    }

    #[rstest]
    // Mandatory after optional.
    #[case(vec![argument_spec("a", true, false)], argument_spec("b", false, false), ConfigError::ArgumentAfterOptional)]
    // Mandatory after trailing.
    #[case(vec![argument_spec("a", false, true)], argument_spec("b", false, false), ConfigError::ArgumentAfterTrailing)]
    // Optional after trailing.
    #[case(vec![argument_spec("a", false, true)], argument_spec("b", true, false), ConfigError::ArgumentAfterTrailing)]
    // Trailing after trailing.
    #[case(vec![argument_spec("a", false, true)], argument_spec("b", false, true), ConfigError::MultipleTrailingArguments)]
    fn push_argument_rejects(
        #[case] mut arguments: Vec<ArgumentSpec>,
        #[case] spec: ArgumentSpec,
        #[case] expected: ConfigError,
    ) {
        let error = push_argument(&mut arguments, spec).unwrap_err();

        assert_eq!(error, expected);
        assert_eq!(arguments.len(), 1);
    }

    #[test]
    fn schema_registers_help() {
        // Setup & execute
        let schema = Schema::new("program", "the description");

        // Verify
        let (slot_short, spec) = schema.options.get("h").unwrap();
        let (slot_long, _) = schema.options.get("help").unwrap();
        assert_eq!(slot_short, slot_long);
        assert!(!spec.takes_value());
        assert_eq!(spec.description, "print help and exit");
    }

    #[rstest]
    #[case(flag_spec(Some('f'), Some("flag")), "f")]
    #[case(flag_spec(Some('f'), None), "f")]
    #[case(flag_spec(None, Some("flag")), "flag")]
    fn option_sort_key(#[case] spec: OptionSpec, #[case] expected: &str) {
        assert_eq!(spec.sort_key(), expected.to_string());
    }
}
