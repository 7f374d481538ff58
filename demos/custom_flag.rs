use pennant::prelude::*;

fn main() {
    let number = opt_req::<u16, _>("NUMBER", "number")
        .desc("Please input only odd numbers!")
        .try_map(|n| {
            if n % 2 == 1 {
                Ok(n)
            } else {
                Err(ValueError::new(format!("{} is not an odd number", n)))
            }
        })
        .with_help_default()
        .with_program_description("accepts a single odd number")
        .parse_env_or_exit();

    // To emit a completion spec for this program, build the parser without
    // consuming it and pass it to pennant::complete::CompletionSpec::from_parser.

    println!("{}", number);
}
