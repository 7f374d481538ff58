use std::io;

use pennant::complete::CompletionSpec;
use pennant::prelude::*;

fn main() {
    let parser = opt_req::<u16, _>("PORT", "port")
        .desc("port to listen on")
        .both(opt_multi::<String, _>("HEADER", "header").name('H').desc("extra response header"))
        .both(flag("verbose").name('v').desc("log every request"))
        .both(pos_opt::<String>("ROOT").desc("directory to serve"))
        .both(extra("ARGS").desc("arguments passed to the handler"))
        .with_help_default()
        .with_program_description("tiny static file server");

    let spec = CompletionSpec::from_parser("serve", &parser);
    spec.write_json(io::stdout().lock())
        .expect("failed to write completion spec");
    println!();
}
