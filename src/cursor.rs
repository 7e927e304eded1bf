//! Pull/peek access to the command line words.

use crate::{Error, Result};

/// An ordered source of tokens consumed left to right.
pub trait Source {
    /// The token at the cursor, without consuming it.
    fn current(&self) -> Option<&str>;

    /// Whether at least `count` tokens remain.
    fn has_next(&self, count: usize) -> bool;

    /// The token `offset` positions ahead of the cursor, without consuming it.
    fn peek(&self, offset: usize) -> Option<&str>;

    /// Consumes and returns the current token.
    fn pull(&mut self) -> Option<String>;

    /// Consumes the value token of `name`, failing when the line has run out.
    fn pull_value(&mut self, name: &str) -> Result<String> {
        self.pull().ok_or_else(|| Error::MissingValue(name.to_string()))
    }

    /// Consumes every remaining token and joins them with single spaces.
    ///
    /// Tokens containing a space or a tab are wrapped in double quotes;
    /// embedded double quotes are doubled.
    fn pull_remainder(&mut self) -> String {
        let mut remainder = String::new();
        while let Some(arg) = self.pull() {
            if !remainder.is_empty() {
                remainder.push(' ');
            }
            let escaped = arg.replace('"', "\"\"");
            if arg.contains(' ') || arg.contains('\t') {
                remainder.push('"');
                remainder.push_str(&escaped);
                remainder.push('"');
            } else {
                remainder.push_str(&escaped);
            }
        }
        remainder
    }
}

/// A cursor over an owned list of tokens.
#[derive(Debug, Clone, Default)]
pub struct Tokens {
    rargs: Vec<String>,
}

impl Tokens {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rargs = args.into_iter().map(Into::into).collect::<Vec<_>>();
        rargs.reverse();
        Self { rargs }
    }

    pub fn len(&self) -> usize {
        self.rargs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rargs.is_empty()
    }
}

impl Source for Tokens {
    fn current(&self) -> Option<&str> {
        self.rargs.last().map(String::as_str)
    }

    fn has_next(&self, count: usize) -> bool {
        self.rargs.len() >= count
    }

    fn peek(&self, offset: usize) -> Option<&str> {
        let idx = self.rargs.len().checked_sub(offset + 1)?;
        self.rargs.get(idx).map(String::as_str)
    }

    fn pull(&mut self) -> Option<String> {
        self.rargs.pop()
    }
}

/// Re-injects one token in front of another source.
///
/// Once the extra token has been pulled, every call is forwarded to the
/// wrapped source.
pub struct PushBack<'a> {
    extra: Option<String>,
    rest: &'a mut dyn Source,
}

impl<'a> PushBack<'a> {
    pub fn new(extra: String, rest: &'a mut dyn Source) -> Self {
        Self { extra: Some(extra), rest }
    }
}

impl Source for PushBack<'_> {
    fn current(&self) -> Option<&str> {
        match &self.extra {
            Some(extra) => Some(extra.as_str()),
            None => self.rest.current(),
        }
    }

    fn has_next(&self, count: usize) -> bool {
        match self.extra {
            Some(_) => self.rest.has_next(count.saturating_sub(1)),
            None => self.rest.has_next(count),
        }
    }

    fn peek(&self, offset: usize) -> Option<&str> {
        match (&self.extra, offset) {
            (Some(extra), 0) => Some(extra.as_str()),
            (Some(_), _) => self.rest.peek(offset - 1),
            (None, _) => self.rest.peek(offset),
        }
    }

    fn pull(&mut self) -> Option<String> {
        self.extra.take().or_else(|| self.rest.pull())
    }
}
