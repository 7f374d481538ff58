//! Typed command-line flag parsing.
//!
//! Arguments are declared with the constructors in [`prelude`] and combined
//! with [`Parser::both`], [`Parser::map`] and [`Parser::try_map`]. Valued
//! arguments convert their text through the [`FlagValue`] trait, which
//! range-checks narrow integers, treats `bool` as a presence flag, rejects
//! empty strings, and accumulates repeated values into a `Vec` in
//! command-line order. The [`complete`] module serializes the registered
//! interface to JSON for shell-completion tooling.
//!
//! ```no_run
//! use pennant::prelude::*;
//!
//! let (_port, _verbose) = opt_req::<u16, _>("PORT", "port")
//!     .desc("port to listen on")
//!     .both(flag('v').name("verbose"))
//!     .with_help_default()
//!     .parse_env_or_exit();
//! ```

pub mod complete;
pub mod error;
pub mod help;
pub mod low_level;
pub mod parser;
pub mod value;

pub use crate::error::{ParseError, SpecError};
pub use crate::parser::{IntoName, Name, OrHelp, Parser};
pub use crate::value::{FlagValue, ValueError};

pub mod prelude {
    pub use crate::parser::{arity, has_param, name_type, Arg, Extra, Parser};
    pub use crate::value::{FlagValue, ValueError};

    use crate::parser::IntoName;

    /// A presence flag, `false` when absent and `true` when given once.
    pub fn flag<N: IntoName>(
        name: N,
    ) -> Arg<arity::Optional, has_param::No, name_type::Named> {
        Arg::new(arity::Optional, has_param::No, name_type::Named::new(name))
    }

    /// A flag counted across its occurrences (`-vvv`).
    pub fn flag_count<N: IntoName>(
        name: N,
    ) -> Arg<arity::Multiple, has_param::No, name_type::Named> {
        Arg::new(arity::Multiple, has_param::No, name_type::Named::new(name))
    }

    pub fn opt_req<T: FlagValue, N: IntoName>(
        hint: &str,
        name: N,
    ) -> Arg<arity::Required, has_param::Yes<T>, name_type::Named> {
        Arg::new(
            arity::Required,
            has_param::Yes::new(hint),
            name_type::Named::new(name),
        )
    }

    pub fn opt_opt<T: FlagValue, N: IntoName>(
        hint: &str,
        name: N,
    ) -> Arg<arity::Optional, has_param::Yes<T>, name_type::Named> {
        Arg::new(
            arity::Optional,
            has_param::Yes::new(hint),
            name_type::Named::new(name),
        )
    }

    pub fn opt_multi<T: FlagValue, N: IntoName>(
        hint: &str,
        name: N,
    ) -> Arg<arity::Multiple, has_param::Yes<T>, name_type::Named> {
        Arg::new(
            arity::Multiple,
            has_param::Yes::new(hint),
            name_type::Named::new(name),
        )
    }

    pub fn pos_req<T: FlagValue>(
        hint: &str,
    ) -> Arg<arity::Required, has_param::Yes<T>, name_type::Positional> {
        Arg::new(
            arity::Required,
            has_param::Yes::new(hint),
            name_type::Positional,
        )
    }

    pub fn pos_opt<T: FlagValue>(
        hint: &str,
    ) -> Arg<arity::Optional, has_param::Yes<T>, name_type::Positional> {
        Arg::new(
            arity::Optional,
            has_param::Yes::new(hint),
            name_type::Positional,
        )
    }

    /// All remaining positional arguments, in order.
    pub fn pos_multi<T: FlagValue>(
        hint: &str,
    ) -> Arg<arity::Multiple, has_param::Yes<T>, name_type::Positional> {
        Arg::new(
            arity::Multiple,
            has_param::Yes::new(hint),
            name_type::Positional,
        )
    }

    /// Everything after the `--` separator, verbatim.
    pub fn extra(hint: &str) -> Extra {
        Extra::new(hint)
    }
}

/// Combine several parsers, binding each result to a name:
///
/// ```
/// use pennant::prelude::*;
///
/// let parser = pennant::let_map! {
///     let {
///         level = opt_opt::<u32, _>("LEVEL", 'l');
///         verbose = flag('v');
///     } in {
///         (level, verbose)
///     }
/// };
/// let (level, verbose) = parser
///     .parse_args("demo".to_string(), vec!["-l".to_string(), "3".to_string()])
///     .map_err(|(e, _)| e)
///     .unwrap();
/// assert_eq!(level, Some(3));
/// assert!(!verbose);
/// ```
#[macro_export]
macro_rules! let_map {
    { let { $first:ident = $first_parser:expr; $($name:ident = $parser:expr;)* } in { $($body:tt)* } } => {
        $crate::let_map!(@chain ($first_parser) ($first) $($name = $parser;)* { $($body)* })
    };
    (@chain ($parsers:expr) ($pattern:pat) $name:ident = $parser:expr; $($rest:tt)*) => {
        $crate::let_map!(@chain ($crate::Parser::both($parsers, $parser)) (($pattern, $name)) $($rest)*)
    };
    (@chain ($parsers:expr) ($pattern:pat) { $($body:tt)* }) => {
        $crate::Parser::map($parsers, move |$pattern| { $($body)* })
    };
}

/// Fold a list of `Option`-producing parsers into one that fails unless at
/// most one of them produced a value.
#[macro_export]
macro_rules! choose_at_most_one {
    ($only:expr $(,)?) => {
        $only
    };
    ($head:expr, $($tail:expr),+ $(,)?) => {
        $crate::Parser::choose_at_most_one($head, $crate::choose_at_most_one!($($tail),+))
    };
}
