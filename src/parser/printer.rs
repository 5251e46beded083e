use crate::model::{ArgumentSpec, Command, OptionSet, OptionSpec, Schema};

/// Render the usage text for the program root (`command == None`) or for one command view.
///
/// Sections are separated by blank lines and only emitted when non-empty: the usage line, the
/// sentence-cased description, the COMMANDS or ARGUMENTS table, and the option table(s). A
/// command view with command-local options renders GLOBAL OPTIONS and COMMAND OPTIONS
/// separately. All tables align on the widest label in scope.
pub(crate) fn render_usage(schema: &Schema, command: Option<&Command>) -> String {
    let mut lines: Vec<String> = Vec::default();

    let program_name = match command {
        Some(command) => format!("{} {}", schema.name, command.name),
        None => schema.name.clone(),
    };

    let has_commands = !schema.commands.is_empty();
    let arguments = schema.active_arguments(command);
    let description = match command {
        Some(command) => command.description.as_str(),
        None => schema.description.as_str(),
    };
    let max_width = compute_max_width(schema, command);

    if command.is_none() && has_commands {
        lines.push(format!("Usage: {program_name} OPTIONS <command>"));
    } else if !arguments.is_empty() {
        let mut signature = String::default();

        for spec in arguments {
            if spec.trailing {
                signature.push_str(&format!(" [<{}>...]", spec.name));
            } else if spec.optional {
                signature.push_str(&format!(" [<{}>]", spec.name));
            } else {
                signature.push_str(&format!(" <{}>", spec.name));
            }
        }

        lines.push(format!("Usage: {program_name} OPTIONS{signature}"));
    } else {
        lines.push(format!("Usage: {program_name} OPTIONS"));
    }

    if !description.is_empty() {
        lines.push(String::default());
        lines.push(sentence(description));
    }

    if command.is_none() && has_commands {
        render_commands(&mut lines, schema, max_width);
    } else if !arguments.is_empty() {
        render_arguments(&mut lines, arguments, max_width);
    }

    if !schema.options.is_empty() {
        let label = if command.is_some_and(|command| !command.options.is_empty()) {
            "GLOBAL OPTIONS"
        } else {
            "OPTIONS"
        };
        render_options(&mut lines, label, &schema.options, max_width);
    }

    if let Some(command) = command {
        if !command.options.is_empty() {
            render_options(&mut lines, "COMMAND OPTIONS", &command.options, max_width);
        }
    }

    lines.join("\n")
}

/// Widest label across whichever of command names, argument names, and option signatures apply
/// to the current view. Option width uses the full `-s, --long <value>` footprint.
fn compute_max_width(schema: &Schema, command: Option<&Command>) -> usize {
    let mut max = 0;

    for name in schema.commands.keys() {
        max = max.max(name.len());
    }

    for spec in schema.active_arguments(command) {
        max = max.max(spec.name.len());
    }

    let option_width = |spec: &OptionSpec| {
        let mut width = 2 + 2 + 2 + spec.long.as_ref().map_or(0, String::len);

        if let Some(value_name) = &spec.value_name {
            width += 2 + value_name.len() + 1;
        }

        width
    };

    for spec in schema.options.iter() {
        max = max.max(option_width(spec));
    }

    if let Some(command) = command {
        for spec in command.options.iter() {
            max = max.max(option_width(spec));
        }
    }

    max
}

fn render_commands(lines: &mut Vec<String>, schema: &Schema, max_width: usize) {
    lines.push(String::default());
    lines.push("COMMANDS".to_string());
    lines.push(String::default());

    let mut names: Vec<&String> = schema.commands.keys().collect();
    names.sort();

    for name in names {
        let command = &schema.commands[name];
        lines.push(format!("{name:<max_width$}  {}", command.description));
    }
}

fn render_arguments(lines: &mut Vec<String>, arguments: &[ArgumentSpec], max_width: usize) {
    lines.push(String::default());
    lines.push("ARGUMENTS".to_string());
    lines.push(String::default());

    for spec in arguments {
        lines.push(format!("{:<max_width$}  {}", spec.name, spec.description));
    }
}

fn render_options(lines: &mut Vec<String>, label: &str, options: &OptionSet, max_width: usize) {
    lines.push(String::default());
    lines.push(label.to_string());
    lines.push(String::default());

    let mut specs: Vec<&OptionSpec> = options.iter().collect();
    specs.sort_by_key(|spec| spec.sort_key());

    for spec in specs {
        let mut row = format!("{:<max_width$}  {}", option_label(spec), spec.description);

        if let Some(default) = &spec.default {
            row.push_str(&format!(" (default: {default})"));
        }

        lines.push(row);
    }
}

fn option_label(spec: &OptionSpec) -> String {
    let mut label = String::default();

    match spec.short {
        Some(short) => label.push_str(&format!("-{short}")),
        None => label.push_str("  "),
    }

    if let Some(long) = &spec.long {
        label.push_str(if spec.short.is_some() { ", " } else { "  " });
        label.push_str(&format!("--{long}"));
    }

    if let Some(value_name) = &spec.value_name {
        label.push_str(&format!(" <{value_name}>"));
    }

    label
}

/// Capitalize the first letter and terminate with a period if not already.
fn sentence(text: &str) -> String {
    let mut chars = text.chars();

    let mut out: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => return String::default(),
    };

    if !out.ends_with('.') {
        out.push('.');
    }

    out
}
