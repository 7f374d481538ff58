use std::error;
use std::fmt;

use crate::low_level::Unique;
use crate::parser::Name;
use crate::value::ValueError;

/// The ways parsing a command line can fail.
#[derive(Debug)]
pub enum ParseError {
    UnhandledPositionalArguments(Vec<String>),
    UnknownName(Name),
    ArgumentLacksParameter(Name),
    UnexpectedArgumentParam {
        name: Name,
        value: String,
    },
    MissingRequiredPositionalArgument(String),
    MissingRequiredArgument(Name),
    ExpectedOneArgument(Name),
    InvalidPositionalArgumentParam {
        hint: String,
        value: String,
        reason: ValueError,
    },
    InvalidArgumentParam {
        name: Name,
        value: String,
        reason: ValueError,
    },
    MultipleMutuallyExclusiveOptionsChosen,
    MissingRequiredArgumentGeneral(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Self::UnhandledPositionalArguments(values) => {
                write!(f, "Unhandled positional arguments: {}", values.join(", "))
            }
            Self::UnknownName(name) => write!(f, "Argument \"{}\" does not exist", name),
            Self::ArgumentLacksParameter(name) => {
                write!(f, "Argument \"{}\" lacks parameter", name)
            }
            Self::UnexpectedArgumentParam { name, value } => {
                write!(f, "Unexpected param \"{}\" to argument \"{}\"", value, name)
            }
            Self::MissingRequiredPositionalArgument(hint) => {
                write!(f, "Required positional argument \"{}\" is missing", hint)
            }
            Self::MissingRequiredArgument(name) => {
                write!(f, "Required argument \"{}\" is missing", name)
            }
            Self::ExpectedOneArgument(name) => write!(
                f,
                "Argument \"{}\" was passed multiple times but expected at most once",
                name
            ),
            Self::InvalidPositionalArgumentParam {
                hint,
                value,
                reason,
            } => write!(
                f,
                "Unable to parse \"{}\" given for positional argument \"{}\": {}",
                value, hint, reason
            ),
            Self::InvalidArgumentParam {
                name,
                value,
                reason,
            } => write!(
                f,
                "Unable to parse value \"{}\" given for argument \"{}\": {}",
                value, name, reason
            ),
            Self::MultipleMutuallyExclusiveOptionsChosen => {
                write!(f, "Multiple mutually-exclusive options chosen")
            }
            Self::MissingRequiredArgumentGeneral(error) => write!(f, "{}", error),
        }
    }
}

impl error::Error for ParseError {}

/// Errors in the argument spec itself. These are programmer errors and abort
/// at registration time.
#[derive(Debug)]
pub enum SpecError {
    NameUsedMultipleTimes(Name),
    RepeatedUnique(Unique),
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Self::NameUsedMultipleTimes(name) => {
                write!(f, "Name used multiple times: {}", name)
            }
            Self::RepeatedUnique(Unique::PositionalMulti) => {
                write!(f, "Multiple multi-value positional arguments")
            }
            Self::RepeatedUnique(Unique::Extra) => {
                write!(f, "Multiple parsers capturing extra arguments")
            }
        }
    }
}

impl error::Error for SpecError {}
