//! Autocompletion spec generation.
//!
//! Serializes the registered interface of a parser into JSON for consumption
//! by shell-completion tooling: every option with its names, value hint and
//! arity markers, every positional argument, and the trailing-argument
//! capture if one exists.

use std::error;
use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::help::Help;
use crate::parser::{ArityEnum, Name, Parser};

#[derive(Debug, Serialize)]
pub struct CompletionSpec {
    pub program: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub options: Vec<OptionCompletion>,
    pub positionals: Vec<PositionalCompletion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<ExtraCompletion>,
}

#[derive(Debug, Serialize)]
pub struct OptionCompletion {
    pub long: Vec<String>,
    pub short: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    pub repeatable: bool,
    pub takes_value: bool,
}

#[derive(Debug, Serialize)]
pub struct PositionalCompletion {
    pub hint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    pub repeatable: bool,
}

#[derive(Debug, Serialize)]
pub struct ExtraCompletion {
    pub hint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CompletionSpec {
    /// Walk `parser` the same way help generation does and build the spec.
    pub fn from_parser<P: Parser>(program_name: &str, parser: &P) -> Self {
        let mut help = Help::new(program_name.to_string());
        parser.update_help(&mut help);
        let spec = Self::from_help(&help);
        tracing::debug!(
            program = %spec.program,
            options = spec.options.len(),
            positionals = spec.positionals.len(),
            "generated completion spec"
        );
        spec
    }

    pub fn from_help(help: &Help) -> Self {
        let options = help
            .named
            .iter()
            .map(|named| {
                let mut long = Vec::new();
                let mut short = Vec::new();
                for name in named.names.names() {
                    match name {
                        Name::Long(l) => long.push(l.clone()),
                        Name::Short(c) => short.push(c.to_string()),
                    }
                }
                OptionCompletion {
                    long,
                    short,
                    hint: named.hint.clone(),
                    description: named.description.clone(),
                    required: matches!(named.arity, ArityEnum::Required),
                    repeatable: matches!(named.arity, ArityEnum::Multiple),
                    takes_value: named.hint.is_some(),
                }
            })
            .collect();
        let positionals = help
            .positional
            .iter()
            .map(|positional| PositionalCompletion {
                hint: positional.hint.clone(),
                description: positional.description.clone(),
                required: matches!(positional.arity, ArityEnum::Required),
                repeatable: matches!(positional.arity, ArityEnum::Multiple),
            })
            .collect();
        let extra = help.extra.as_ref().map(|extra| ExtraCompletion {
            hint: extra.hint.clone(),
            description: extra.description.clone(),
        });
        Self {
            program: help.program_name.clone(),
            description: help.description.clone(),
            options,
            positionals,
            extra,
        }
    }

    pub fn to_json_string(&self) -> Result<String, CompletionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json<W: io::Write>(&self, writer: W) -> Result<(), CompletionError> {
        Ok(serde_json::to_writer_pretty(writer, self)?)
    }

    pub fn write_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CompletionError> {
        let mut file = File::create(path)?;
        self.write_json(&mut file)?;
        writeln!(file)?;
        Ok(())
    }
}

#[derive(Debug)]
pub enum CompletionError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Self::Io(e) => write!(f, "failed to write completion spec: {}", e),
            Self::Json(e) => write!(f, "failed to serialize completion spec: {}", e),
        }
    }
}

impl error::Error for CompletionError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}

impl From<io::Error> for CompletionError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for CompletionError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn spec_reflects_the_registered_interface() {
        let parser = opt_req::<u16, _>("PORT", "port")
            .desc("port to listen on")
            .both(opt_multi::<String, _>("HEADER", "header").name('H'))
            .both(flag("verbose").name('v'))
            .both(pos_opt::<String>("ROOT"))
            .both(extra("ARGS").desc("arguments passed through"))
            .with_help_default();
        let spec = CompletionSpec::from_parser("serve", &parser);
        let json = serde_json::to_value(&spec).unwrap();

        assert_eq!(json["program"], "serve");
        let options = json["options"].as_array().unwrap();
        assert_eq!(options.len(), 4); // port, header, verbose, help
        assert_eq!(options[0]["long"][0], "port");
        assert_eq!(options[0]["required"], true);
        assert_eq!(options[0]["takes_value"], true);
        assert_eq!(options[1]["long"][0], "header");
        assert_eq!(options[1]["short"][0], "H");
        assert_eq!(options[1]["repeatable"], true);
        assert_eq!(options[2]["long"][0], "verbose");
        assert_eq!(options[2]["takes_value"], false);
        assert_eq!(options[3]["short"][0], "h");
        assert_eq!(options[3]["long"][0], "help");

        let positionals = json["positionals"].as_array().unwrap();
        assert_eq!(positionals.len(), 1);
        assert_eq!(positionals[0]["hint"], "ROOT");
        assert_eq!(positionals[0]["required"], false);
        assert_eq!(json["extra"]["hint"], "ARGS");
    }

    #[test]
    fn absent_pieces_are_omitted_from_the_json() {
        let parser = flag("quiet");
        let spec = CompletionSpec::from_parser("tool", &parser);
        let json = serde_json::to_value(&spec).unwrap();
        assert!(json.get("description").is_none());
        assert!(json.get("extra").is_none());
        assert!(json["options"][0].get("hint").is_none());
        assert!(spec.to_json_string().unwrap().contains("\"program\": \"tool\""));
    }

    #[test]
    fn json_file_round_trips_through_serde() {
        let parser = opt_req::<u16, _>("PORT", "port").with_help_default();
        let spec = CompletionSpec::from_parser("serve", &parser);
        let path = std::env::temp_dir().join("pennant_completion_spec.json");
        spec.write_json_file(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(written.ends_with('\n'));
        let json: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(json["program"], "serve");
        assert_eq!(json["options"][0]["long"][0], "port");
    }
}
