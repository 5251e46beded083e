use declargs::{Invocation, Program};

fn main() {
    let parser = Program::new("commands", "an example program with commands")
        .flag(None, Some("flag-a"), "a long flag")
        .flag(Some('b'), None, "a short flag")
        .option(
            Some('c'),
            Some("option-c"),
            "value",
            "foo",
            "an option with both a short and long name",
        )
        .with_quiet_flag()
        .with_debug_option()
        .command("foo", "foo command", cmd_foo)
        .command_flag("foo", Some('d'), Some("flag-d"), "a command flag")
        .command_argument("foo", "arg-1", "the first argument")
        .command_argument("foo", "arg-2", "the second argument")
        .command_trailing_argument("foo", "arg-3", "all trailing arguments")
        .command("bar", "bar command", cmd_bar)
        .build();

    parser.run();
}

fn cmd_foo(invocation: &Invocation) {
    invocation.info("running command foo");

    println!("flag-a: {}", invocation.is_option_set("flag-a"));
    println!("b: {}", invocation.is_option_set("b"));
    println!("option-c: {}", invocation.option_value("option-c"));
    println!("flag-d: {}", invocation.is_option_set("flag-d"));

    println!("arg-1: {}", invocation.argument_value("arg-1"));
    println!("arg-2: {}", invocation.argument_value("arg-2"));
    println!(
        "arg-3: {}",
        invocation.trailing_argument_values("arg-3").join(" ")
    );
}

fn cmd_bar(invocation: &Invocation) {
    invocation.info("running command bar");

    println!("flag-a: {}", invocation.is_option_set("flag-a"));
    println!("b: {}", invocation.is_option_set("b"));
    println!("option-c: {}", invocation.option_value("option-c"));
}
