use std::time::Duration;

use pennant::prelude::*;

#[derive(Debug)]
struct Timeout(Duration);

impl FlagValue for Timeout {
    fn parse_value(input: &str) -> Result<Self, ValueError> {
        parse_duration::parse(input).map(Timeout).map_err(|e| {
            ValueError::new(format!("failed to convert to duration (\"{}\"): {}", input, e))
        })
    }
}

fn main() {
    let (timeouts, dry_run) = pennant::let_map! {
        let {
            timeouts = opt_multi::<Timeout, _>("DURATION", "timeout")
                .desc("retry timeouts, shortest first");
            dry_run = flag("dry-run").desc("print the plan without executing it");
        } in {
            (timeouts, dry_run)
        }
    }
    .with_help_default()
    .parse_env_or_exit();
    println!("{:?} {}", timeouts, dry_run);
}
