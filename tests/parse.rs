use std::error::Error;

use pennant::prelude::*;
use pennant::{OrHelp, ParseError};

fn parse<P: Parser>(parser: P, args: &[&str]) -> Result<P::Item, Box<dyn Error>> {
    parser
        .parse_args("prog".to_string(), args.iter().map(|s| s.to_string()))
        .map_err(|(e, _)| e)
}

#[test]
fn long_option_separate_and_assignment_forms() {
    let foo = parse(opt_req::<String, _>("FOO", "foo"), &["--foo", "bar"]).unwrap();
    assert_eq!(foo, "bar");
    let foo = parse(opt_req::<String, _>("FOO", "foo"), &["--foo=bar"]).unwrap();
    assert_eq!(foo, "bar");
}

#[test]
fn short_option_with_attached_parameter() {
    let level = parse(opt_req::<u32, _>("LEVEL", 'l'), &["-l8"]).unwrap();
    assert_eq!(level, 8);
}

#[test]
fn short_flag_sequence_counts_every_occurrence() {
    let (verbosity, quiet) = parse(
        flag_count('v').both(flag('q')),
        &["-vvq", "-v"],
    )
    .unwrap();
    assert_eq!(verbosity, 3);
    assert!(quiet);
}

#[test]
fn missing_required_argument() {
    let err = parse(opt_req::<String, _>("FOO", "foo"), &[]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ParseError>(),
        Some(ParseError::MissingRequiredArgument(_))
    ));
    assert_eq!(err.to_string(), "Required argument \"--foo\" is missing");
}

#[test]
fn unknown_name_is_an_error() {
    let err = parse(flag('v'), &["--frobnicate"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Argument \"--frobnicate\" does not exist"
    );
}

#[test]
fn a_switch_given_a_parameter_is_an_error() {
    let err = parse(flag("verbose"), &["--verbose=yes"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unexpected param \"yes\" to argument \"--verbose\""
    );
}

#[test]
fn out_of_range_value_reports_the_reason() {
    let err = parse(opt_req::<u16, _>("PORT", "port"), &["--port", "70000"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unable to parse value \"70000\" given for argument \"--port\": 70000 is out of its range"
    );
}

#[test]
fn unparseable_value_reports_the_reason() {
    let err = parse(opt_req::<i32, _>("N", 'n'), &["-n", "ten"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unable to parse value \"ten\" given for argument \"-n\": failed to convert to i32 (\"ten\")"
    );
}

#[test]
fn empty_string_value_is_rejected() {
    let err = parse(opt_req::<String, _>("NAME", "name"), &["--name="]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unable to parse value \"\" given for argument \"--name\": input is empty"
    );
}

#[test]
fn repeated_values_accumulate_in_command_line_order() {
    let ns = parse(
        opt_multi::<u32, _>("N", 'n').name("num"),
        &["-n", "3", "--num", "1", "-n2"],
    )
    .unwrap();
    assert_eq!(ns, vec![3, 1, 2]);
}

#[test]
fn a_failed_element_fails_the_whole_list() {
    let err = parse(opt_multi::<u8, _>("N", 'n'), &["-n", "7", "-n", "300"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unable to parse value \"300\" given for argument \"-n\": 300 is out of its range"
    );
}

#[test]
fn validation_callback_accepts_and_rejects() {
    let odd = |n: u16| {
        if n % 2 == 1 {
            Ok(n)
        } else {
            Err(ValueError::new(format!("{} is not an odd number", n)))
        }
    };
    let number = parse(
        opt_req::<u16, _>("NUMBER", "number").try_map(odd),
        &["--number", "7"],
    )
    .unwrap();
    assert_eq!(number, 7);

    let err = parse(
        opt_req::<u16, _>("NUMBER", "number").try_map(odd),
        &["--number", "4"],
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "4 is not an odd number");
}

#[test]
fn positional_arguments_parse_in_declaration_order() {
    let (src, rest) = parse(
        pos_req::<String>("SRC").both(pos_multi::<u32>("N")),
        &["input.txt", "4", "5"],
    )
    .unwrap();
    assert_eq!(src, "input.txt");
    assert_eq!(rest, vec![4, 5]);
}

#[test]
fn missing_required_positional_argument() {
    let err = parse(pos_req::<String>("SRC"), &[]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Required positional argument \"SRC\" is missing"
    );
}

#[test]
fn unhandled_positional_arguments_are_an_error() {
    let err = parse(flag('v'), &["stray"]).unwrap_err();
    assert_eq!(err.to_string(), "Unhandled positional arguments: stray");
}

#[test]
fn extra_arguments_after_the_separator_are_captured_verbatim() {
    let (verbose, rest) = parse(
        flag('v').both(extra("ARGS")),
        &["-v", "--", "--not-a-flag", "word"],
    )
    .unwrap();
    assert!(verbose);
    assert_eq!(rest, vec!["--not-a-flag".to_string(), "word".to_string()]);
}

#[test]
fn negative_values_need_the_assignment_form() {
    let n = parse(opt_req::<i32, _>("N", "n"), &["--n=-5"]).unwrap();
    assert_eq!(n, -5);
    let err = parse(opt_req::<i32, _>("N", "n"), &["--n", "-5"]).unwrap_err();
    assert_eq!(err.to_string(), "Argument \"--n\" lacks parameter");
}

#[test]
fn valued_bool_is_a_presence_flag() {
    let strict = parse(
        opt_opt::<bool, _>("BOOL", "strict"),
        &["--strict", "whatever"],
    )
    .unwrap();
    assert_eq!(strict, Some(true));
}

#[test]
fn defaults_fill_in_for_absent_options() {
    let port = parse(opt_opt::<u16, _>("PORT", "port").with_default(8080), &[]).unwrap();
    assert_eq!(port, 8080);
    let port = parse(
        opt_opt::<u16, _>("PORT", "port").with_default_parse("9090"),
        &[],
    )
    .unwrap();
    assert_eq!(port, 9090);
    let port = parse(
        opt_opt::<u16, _>("PORT", "port").with_default(8080),
        &["--port", "80"],
    )
    .unwrap();
    assert_eq!(port, 80);
    let cores = parse(
        opt_opt::<u32, _>("N", "cores").with_default_lazy("number of CPUs", || 4),
        &[],
    )
    .unwrap();
    assert_eq!(cores, 4);
    let root = parse(
        opt_opt::<String, _>("DIR", "root").with_default_desc("current directory", ".".to_string()),
        &[],
    )
    .unwrap();
    assert_eq!(root, ".");
}

#[derive(Debug, PartialEq)]
enum Format {
    Plain,
    Json,
    Yaml,
}

fn format_parser() -> impl Parser<Item = Format> {
    pennant::choose_at_most_one!(
        flag("json").some_if(Format::Json),
        flag("yaml").some_if(Format::Yaml),
    )
    .with_default_general(Format::Plain)
}

#[test]
fn mutually_exclusive_flags() {
    assert_eq!(parse(format_parser(), &["--yaml"]).unwrap(), Format::Yaml);
    assert_eq!(parse(format_parser(), &[]).unwrap(), Format::Plain);
    let err = parse(format_parser(), &["--json", "--yaml"]).unwrap_err();
    assert_eq!(err.to_string(), "Multiple mutually-exclusive options chosen");

    let lazy = flag("json")
        .some_if(Format::Json)
        .with_default_lazy_general(|| Format::Plain);
    assert_eq!(parse(lazy, &[]).unwrap(), Format::Plain);
}

#[test]
fn required_general_reports_its_own_message() {
    let err = parse(
        opt_opt::<u32, _>("N", 'n').required_general("pass -n or set it in the config"),
        &[],
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "pass -n or set it in the config");
}

#[test]
fn let_map_binds_results_by_name() {
    let parser = pennant::let_map! {
        let {
            level = opt_opt::<u32, _>("LEVEL", 'l');
            labels = opt_multi::<String, _>("LABEL", "label");
            verbose = flag('v');
        } in {
            (level, labels, verbose)
        }
    };
    let (level, labels, verbose) = parse(
        parser,
        &["--label", "a", "-l", "2", "--label", "b"],
    )
    .unwrap();
    assert_eq!(level, Some(2));
    assert_eq!(labels, vec!["a".to_string(), "b".to_string()]);
    assert!(!verbose);
}

#[test]
fn help_message_rendering() {
    let parser = opt_req::<u16, _>("PORT", "port")
        .desc("port to listen on")
        .both(flag('v').name("verbose").desc("log more"))
        .with_help_default()
        .with_program_description("tiny server");
    let help = match parse(parser, &["--help"]).unwrap() {
        OrHelp::Help(help) => help,
        OrHelp::Value(_) => panic!("expected help"),
    };
    assert_eq!(
        help.to_string(),
        "Usage: prog [OPTIONS]\n\
         \n\
         tiny server\n\
         \n\
         Options:\n    \
         --port PORT         port to listen on\n    \
         [-v, --verbose]     log more\n    \
         [-h, --help]        print help message"
    );
}

#[test]
fn usage_line_covers_positionals_and_extra() {
    let parser = pos_req::<String>("SRC")
        .desc("source file")
        .both(pos_multi::<u32>("N"))
        .both(extra("REST"))
        .with_help('?');
    let rendered = match parse(parser, &["-?"]).unwrap() {
        OrHelp::Help(help) => help.to_string(),
        OrHelp::Value(_) => panic!("expected help"),
    };
    assert!(rendered.starts_with("Usage: prog [OPTIONS] SRC [N ...] [-- REST ...]"));
    assert!(rendered.contains("\n\nArgs:\n"));
    assert!(rendered.contains("source file"));
}

#[test]
fn failed_parse_can_still_render_help() {
    let result = opt_req::<u16, _>("PORT", "port")
        .with_help_default()
        .parse_args("prog".to_string(), vec!["--port".to_string()]);
    let (err, spent) = match result {
        Err(pair) => pair,
        Ok(_) => panic!("expected an error"),
    };
    assert_eq!(err.to_string(), "Argument \"--port\" lacks parameter");
    let help = spent.into_help().to_string();
    assert!(help.starts_with("Usage: prog [OPTIONS]"));
    assert!(help.contains("--port PORT"));
}

#[test]
fn an_option_given_twice_when_expected_once() {
    let err = parse(
        opt_req::<u32, _>("N", 'n'),
        &["-n", "1", "-n", "2"],
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Argument \"-n\" was passed multiple times but expected at most once"
    );
}
