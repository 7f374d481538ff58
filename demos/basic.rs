use pennant::prelude::*;

fn main() {
    let (foo, verbosity) = opt_req::<String, _>("FOO", "foo")
        .desc("a string to print")
        .both(flag_count('v').name("verbose").desc("increase verbosity"))
        .with_help_default()
        .parse_env_or_exit();
    println!("{} {}", foo, verbosity);
}
