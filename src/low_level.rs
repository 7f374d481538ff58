//! Tokenization of raw arguments and per-name occurrence tables.

use std::collections::HashMap;
use std::error;
use std::vec;

use crate::error::{ParseError, SpecError};
use crate::parser::Name;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HasParam {
    Yes,
    No,
}

#[derive(Clone, Copy)]
struct ArgSlot {
    index: usize,
    has_param: HasParam,
}

/// Anonymous registrations of which at most one instance may exist.
#[derive(Debug)]
pub enum Unique {
    PositionalMulti,
    Extra,
}

pub struct LowLevelParser {
    program_name: String,
    name_to_slot: HashMap<Name, ArgSlot>,
    flag_count: usize,
    opt_count: usize,
    has_positional_multi: bool,
    has_extra: bool,
}

pub struct LowLevelParserOutput {
    program_name: String,
    name_to_slot: HashMap<Name, ArgSlot>,
    flags: Vec<usize>,
    opts: Vec<Vec<String>>,
    frees: vec::IntoIter<String>,
    extra: Vec<String>,
}

enum Token {
    Name(Name),
    Word(String),
    LongAssignment { long: String, value: String },
    ShortSequence { first: char, rest: String },
    Separator,
}

impl Token {
    fn classify(s: String) -> Self {
        if s == "--" {
            Token::Separator
        } else if let Some(long) = s.strip_prefix("--") {
            match long.split_once('=') {
                None => Token::Name(Name::Long(long.to_string())),
                Some((long, value)) => Token::LongAssignment {
                    long: long.to_string(),
                    value: value.to_string(),
                },
            }
        } else if let Some(shorts) = s.strip_prefix('-') {
            let mut chars = shorts.chars();
            match chars.next() {
                None => Token::Word("-".to_string()),
                Some(first) => {
                    let rest = chars.as_str();
                    if rest.is_empty() {
                        Token::Name(Name::Short(first))
                    } else {
                        Token::ShortSequence {
                            first,
                            rest: rest.to_string(),
                        }
                    }
                }
            }
        } else {
            Token::Word(s)
        }
    }
}

impl LowLevelParser {
    pub fn new(program_name: String) -> Self {
        Self {
            program_name,
            name_to_slot: HashMap::default(),
            flag_count: 0,
            opt_count: 0,
            has_positional_multi: false,
            has_extra: false,
        }
    }

    pub fn register(&mut self, names: &[Name], has_param: HasParam) -> Result<(), SpecError> {
        tracing::trace!(?names, ?has_param, "registering argument names");
        let index = match has_param {
            HasParam::No => &mut self.flag_count,
            HasParam::Yes => &mut self.opt_count,
        };
        let slot = ArgSlot {
            index: *index,
            has_param,
        };
        for name in names {
            if self.name_to_slot.contains_key(name) {
                return Err(SpecError::NameUsedMultipleTimes(name.clone()));
            }
            self.name_to_slot.insert(name.clone(), slot);
        }
        *index += 1;
        Ok(())
    }

    pub fn register_anonymous_unique(&mut self, unique: Unique) -> Result<(), SpecError> {
        match unique {
            Unique::PositionalMulti => {
                if self.has_positional_multi {
                    return Err(SpecError::RepeatedUnique(Unique::PositionalMulti));
                }
                self.has_positional_multi = true;
            }
            Unique::Extra => {
                if self.has_extra {
                    return Err(SpecError::RepeatedUnique(Unique::Extra));
                }
                self.has_extra = true;
            }
        }
        Ok(())
    }

    pub fn parse<A: IntoIterator<Item = String>>(
        self,
        args: A,
    ) -> Result<LowLevelParserOutput, Box<dyn error::Error>> {
        let LowLevelParser {
            program_name,
            name_to_slot,
            flag_count,
            opt_count,
            has_positional_multi: _,
            has_extra: _,
        } = self;
        let mut flags = vec![0; flag_count];
        let mut opts = Vec::with_capacity(opt_count);
        opts.resize_with(opt_count, Vec::new);
        let mut frees = Vec::new();
        let mut args_iter = args.into_iter();
        while let Some(token) = args_iter.next().map(Token::classify) {
            match token {
                Token::Separator => break,
                Token::Word(word) => frees.push(word),
                Token::ShortSequence { first, rest } => {
                    let ArgSlot { index, has_param } = name_to_slot
                        .get(&Name::Short(first))
                        .ok_or_else(|| ParseError::UnknownName(Name::Short(first)))?;
                    match has_param {
                        // The leading short is a switch; the rest of the
                        // sequence must be switches too.
                        HasParam::No => {
                            flags[*index] += 1;
                            for short in rest.chars() {
                                let ArgSlot { index, has_param } = name_to_slot
                                    .get(&Name::Short(short))
                                    .ok_or_else(|| ParseError::UnknownName(Name::Short(short)))?;
                                match has_param {
                                    HasParam::No => flags[*index] += 1,
                                    HasParam::Yes => {
                                        return Err(ParseError::ArgumentLacksParameter(
                                            Name::Short(short),
                                        )
                                        .into())
                                    }
                                }
                            }
                        }
                        // The rest of the sequence is the attached parameter.
                        HasParam::Yes => {
                            opts[*index].push(rest);
                        }
                    }
                }
                Token::Name(name) => {
                    let ArgSlot { index, has_param } = name_to_slot
                        .get(&name)
                        .ok_or_else(|| ParseError::UnknownName(name.clone()))?;
                    match has_param {
                        HasParam::No => flags[*index] += 1,
                        HasParam::Yes => {
                            let next = args_iter
                                .next()
                                .ok_or_else(|| ParseError::ArgumentLacksParameter(name.clone()))?;
                            match Token::classify(next) {
                                Token::Word(word) => opts[*index].push(word),
                                _ => return Err(ParseError::ArgumentLacksParameter(name).into()),
                            }
                        }
                    }
                }
                Token::LongAssignment { long, value } => {
                    let name = Name::Long(long);
                    let ArgSlot { index, has_param } = name_to_slot
                        .get(&name)
                        .ok_or_else(|| ParseError::UnknownName(name.clone()))?;
                    match has_param {
                        HasParam::No => {
                            return Err(ParseError::UnexpectedArgumentParam {
                                name: name.clone(),
                                value,
                            }
                            .into())
                        }
                        HasParam::Yes => opts[*index].push(value),
                    }
                }
            }
        }
        Ok(LowLevelParserOutput {
            program_name,
            name_to_slot,
            flags,
            opts,
            frees: frees.into_iter(),
            extra: args_iter.collect(),
        })
    }
}

impl LowLevelParserOutput {
    pub fn program_name(&self) -> &str {
        self.program_name.as_str()
    }

    pub fn get_flag_count(&self, names: &[Name]) -> usize {
        let ArgSlot { index, has_param } = self.name_to_slot.get(&names[0]).unwrap();
        assert!(*has_param == HasParam::No);
        self.flags[*index]
    }

    pub fn get_opt_values(&self, names: &[Name]) -> &[String] {
        let ArgSlot { index, has_param } = self.name_to_slot.get(&names[0]).unwrap();
        assert!(*has_param == HasParam::Yes);
        &self.opts[*index]
    }

    /// The positional words, consumed in order by positional parsers.
    pub fn free_iter(&mut self) -> &mut vec::IntoIter<String> {
        &mut self.frees
    }

    /// Everything after the `--` separator, verbatim.
    pub fn extra(&self) -> &[String] {
        &self.extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn classifies_and_tabulates() {
        let mut ll = LowLevelParser::new("prog".to_string());
        ll.register(
            &[Name::Long("level".to_string()), Name::Short('l')],
            HasParam::Yes,
        )
        .unwrap();
        ll.register(&[Name::Short('v')], HasParam::No).unwrap();
        let mut out = ll
            .parse(strings(&[
                "--level", "3", "-vv", "-l8", "--level=2", "word", "--", "-x", "tail",
            ]))
            .unwrap();
        assert_eq!(
            out.get_opt_values(&[Name::Long("level".to_string())]),
            &["3".to_string(), "8".to_string(), "2".to_string()]
        );
        assert_eq!(out.get_flag_count(&[Name::Short('v')]), 2);
        assert_eq!(out.free_iter().next(), Some("word".to_string()));
        assert_eq!(out.extra(), &["-x".to_string(), "tail".to_string()]);
    }

    #[test]
    fn lone_dash_is_a_word() {
        let ll = LowLevelParser::new("prog".to_string());
        let mut out = ll.parse(strings(&["-"])).unwrap();
        assert_eq!(out.free_iter().next(), Some("-".to_string()));
    }

    #[test]
    fn rejects_duplicate_registration() {
        let mut ll = LowLevelParser::new("prog".to_string());
        ll.register(&[Name::Short('v')], HasParam::No).unwrap();
        assert!(matches!(
            ll.register(&[Name::Short('v')], HasParam::Yes),
            Err(SpecError::NameUsedMultipleTimes(Name::Short('v')))
        ));
    }

    #[test]
    fn rejects_repeated_unique_registrations() {
        let mut ll = LowLevelParser::new("prog".to_string());
        ll.register_anonymous_unique(Unique::Extra).unwrap();
        assert!(matches!(
            ll.register_anonymous_unique(Unique::Extra),
            Err(SpecError::RepeatedUnique(Unique::Extra))
        ));
    }
}
