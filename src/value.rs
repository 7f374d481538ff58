//! Conversion of textual argument values into typed values.
//!
//! Every valued argument declared through this crate parses its text via
//! [`FlagValue`]. Scalar implementations replace their value on repeated
//! parses; `Vec<T>` accumulates, preserving command-line order.

use std::error;
use std::fmt;

/// The reason a textual value failed to convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueError {
    message: String,
}

impl ValueError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.message)
    }
}

impl error::Error for ValueError {}

impl From<String> for ValueError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl<'a> From<&'a str> for ValueError {
    fn from(message: &'a str) -> Self {
        Self::new(message)
    }
}

/// Types whose values can be parsed from a single command-line word.
pub trait FlagValue: Sized {
    /// Parse one textual argument value. Must not produce a value on failure.
    fn parse_value(input: &str) -> Result<Self, ValueError>;

    /// Fold a newly parsed value into an existing one. Scalar types replace
    /// their value; list types append.
    fn accumulate(&mut self, input: &str) -> Result<(), ValueError> {
        *self = Self::parse_value(input)?;
        Ok(())
    }
}

// Narrow integers parse at the intermediate width first, then range-check
// before narrowing. A failed range check must leave no value behind, and must
// be reported distinctly from unparseable text.
macro_rules! narrow_int_flag_value {
    ($($t:ty => $wide:ty),* $(,)?) => {
        $(impl FlagValue for $t {
            fn parse_value(input: &str) -> Result<Self, ValueError> {
                let wide = input.parse::<$wide>().map_err(|_| {
                    ValueError::new(format!(
                        concat!("failed to convert to ", stringify!($t), " (\"{}\")"),
                        input
                    ))
                })?;
                <$t>::try_from(wide)
                    .map_err(|_| ValueError::new(format!("{} is out of its range", input)))
            }
        })*
    };
}

narrow_int_flag_value! {
    i8 => i32,
    i16 => i32,
    i32 => i32,
    u8 => u32,
    u16 => u32,
    u32 => u32,
}

// Full-width integers and floats parse directly; malformed and overflowing
// text alike surface as a conversion failure.
macro_rules! direct_flag_value {
    ($($t:ty),* $(,)?) => {
        $(impl FlagValue for $t {
            fn parse_value(input: &str) -> Result<Self, ValueError> {
                input.parse::<$t>().map_err(|_| {
                    ValueError::new(format!(
                        concat!("failed to convert to ", stringify!($t), " (\"{}\")"),
                        input
                    ))
                })
            }
        })*
    };
}

direct_flag_value!(i64, u64, f32, f64);

/// Presence flag. The surrounding parser decides whether the flag was given;
/// any textual input, empty included, parses to `true`.
impl FlagValue for bool {
    fn parse_value(_input: &str) -> Result<Self, ValueError> {
        Ok(true)
    }
}

impl FlagValue for String {
    fn parse_value(input: &str) -> Result<Self, ValueError> {
        if input.is_empty() {
            return Err(ValueError::new("input is empty"));
        }
        Ok(input.to_string())
    }
}

impl<T: FlagValue> FlagValue for Vec<T> {
    fn parse_value(input: &str) -> Result<Self, ValueError> {
        Ok(vec![T::parse_value(input)?])
    }

    /// Parse one element and append it. Earlier elements are never reordered
    /// or removed; a failed parse leaves the list untouched.
    fn accumulate(&mut self, input: &str) -> Result<(), ValueError> {
        self.push(T::parse_value(input)?);
        Ok(())
    }
}
