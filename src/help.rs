//! Help message model and rendering.
//!
//! Parsers describe themselves into a [`Help`] value by walking their tree;
//! rendering produces a `Usage:` line followed by aligned `Args:` and
//! `Options:` columns.

use std::fmt;

use crate::parser::{name_type, ArityEnum};

const ARG_SINGLE_LINE_MAX_WIDTH: usize = 16;
const OPT_SINGLE_LINE_MAX_WIDTH: usize = 32;
const DESCRIPTION_LEFT_PAD: usize = 4;
const WRAPPED_DESCRIPTION_INDENT: &str = "                ";

#[derive(Debug)]
pub struct ArgHelpPositional {
    pub hint: String,
    pub description: Option<String>,
    pub arity: ArityEnum,
}

#[derive(Debug)]
pub struct ArgHelpNamed {
    pub names: name_type::Named,
    pub hint: Option<String>,
    pub description: Option<String>,
    pub arity: ArityEnum,
}

/// Help entry for the trailing arguments captured after `--`.
#[derive(Debug)]
pub struct ArgHelpExtra {
    pub hint: String,
    pub description: Option<String>,
}

#[derive(Debug)]
pub enum ArgHelp {
    Positional(ArgHelpPositional),
    Named(ArgHelpNamed),
}

#[derive(Debug)]
pub struct Help {
    pub program_name: String,
    pub description: Option<String>,
    pub positional: Vec<ArgHelpPositional>,
    pub named: Vec<ArgHelpNamed>,
    pub extra: Option<ArgHelpExtra>,
}

impl Help {
    pub fn new(program_name: String) -> Self {
        Self {
            program_name,
            description: None,
            positional: Vec::new(),
            named: Vec::new(),
            extra: None,
        }
    }
}

fn positional_usage(p: &ArgHelpPositional) -> String {
    match p.arity {
        ArityEnum::Required => p.hint.clone(),
        ArityEnum::Optional => format!("[{}]", p.hint),
        ArityEnum::Multiple => format!("[{} ...]", p.hint),
    }
}

fn named_usage(n: &ArgHelpNamed) -> String {
    let name_list = n
        .names
        .names()
        .iter()
        .map(|name| name.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    match (n.arity, n.hint.as_ref()) {
        (ArityEnum::Required, None) => name_list,
        (ArityEnum::Optional, None) => format!("[{}]", name_list),
        (ArityEnum::Multiple, None) => format!("[{} ...]", name_list),
        (ArityEnum::Required, Some(hint)) => format!("{} {}", name_list, hint),
        (ArityEnum::Optional, Some(hint)) => format!("[{} {}]", name_list, hint),
        (ArityEnum::Multiple, Some(hint)) => format!("[{} {} ...]", name_list, hint),
    }
}

fn write_two_column_section(
    f: &mut fmt::Formatter,
    title: &str,
    parts: &[(String, Option<&String>)],
    single_line_max_width: usize,
) -> Result<(), fmt::Error> {
    let column_width = parts
        .iter()
        .filter_map(|(usage, _)| {
            if usage.len() < single_line_max_width {
                Some(usage.len())
            } else {
                None
            }
        })
        .max()
        .unwrap_or(0)
        + DESCRIPTION_LEFT_PAD;
    write!(f, "\n\n{}", title)?;
    for (usage, description) in parts {
        writeln!(f)?;
        if let Some(description) = description {
            if usage.len() < single_line_max_width {
                write!(f, "    {:width$} {}", usage, description, width = column_width)?;
            } else {
                writeln!(f, "    {}", usage)?;
                write!(f, "{}{}", WRAPPED_DESCRIPTION_INDENT, description)?;
            }
        } else {
            write!(f, "    {}", usage)?;
        }
    }
    Ok(())
}

impl fmt::Display for Help {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "Usage: {} [OPTIONS]", self.program_name)?;
        for p in &self.positional {
            write!(f, " {}", positional_usage(p))?;
        }
        if let Some(extra) = &self.extra {
            write!(f, " [-- {} ...]", extra.hint)?;
        }
        if let Some(description) = &self.description {
            write!(f, "\n\n{}", description)?;
        }
        let mut arg_parts = self
            .positional
            .iter()
            .map(|p| (positional_usage(p), p.description.as_ref()))
            .collect::<Vec<_>>();
        if let Some(extra) = &self.extra {
            arg_parts.push((format!("[-- {} ...]", extra.hint), extra.description.as_ref()));
        }
        if !arg_parts.is_empty() {
            write_two_column_section(f, "Args:", &arg_parts, ARG_SINGLE_LINE_MAX_WIDTH)?;
        }
        if !self.named.is_empty() {
            let parts = self
                .named
                .iter()
                .map(|n| (named_usage(n), n.description.as_ref()))
                .collect::<Vec<_>>();
            write_two_column_section(f, "Options:", &parts, OPT_SINGLE_LINE_MAX_WIDTH)?;
        }
        Ok(())
    }
}
