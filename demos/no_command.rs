use declargs::Program;

fn main() {
    let parser = Program::new("no-command", "an example program without any command")
        .flag(None, Some("flag-a"), "a long flag")
        .flag(Some('b'), None, "a short flag")
        .option(
            Some('c'),
            Some("option-c"),
            "value",
            "foo",
            "an option with both a short and long name",
        )
        .argument("arg-1", "the first argument")
        .argument("arg-2", "the second argument")
        .optional_argument("arg-opt-1", "the first optional argument")
        .optional_argument("arg-opt-2", "the second optional argument")
        .trailing_argument("arg-trailing", "all trailing arguments")
        .with_quiet_flag()
        .with_debug_option()
        .main(|invocation| {
            invocation.debug(2, "running program");

            println!("flag-a: {}", invocation.is_option_set("flag-a"));
            println!("b: {}", invocation.is_option_set("b"));
            println!("option-c: {}", invocation.option_value("option-c"));

            println!("arg-1: {}", invocation.argument_value("arg-1"));
            println!("arg-2: {}", invocation.argument_value("arg-2"));
            println!("arg-opt-1: {}", invocation.argument_value("arg-opt-1"));
            println!("arg-opt-2: {}", invocation.argument_value("arg-opt-2"));
            println!(
                "arg-trailing: {}",
                invocation.trailing_argument_values("arg-trailing").join(" ")
            );
        })
        .build();

    parser.run();
}
