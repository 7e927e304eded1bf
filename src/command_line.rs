use std::fmt;

use crate::{cursor::Tokens, parse, Args, Error, Result};

/// The argument data to parse and what to do with tokens no parameter claims.
pub struct CommandLine {
    args: Vec<String>,
    on_unrecognized: Option<Box<dyn FnMut(&str)>>,
}

impl Default for CommandLine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandLine")
            .field("args", &self.args)
            .field("on_unrecognized", &self.on_unrecognized.is_some())
            .finish()
    }
}

impl CommandLine {
    /// Starts from the process arguments; non UTF-8 arguments are converted lossily.
    pub fn new() -> Self {
        let args = std::env::args_os().map(|it| it.to_string_lossy().into_owned()).collect();
        Self { args, on_unrecognized: None }
    }

    pub fn with_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut res = Self { args: Vec::new(), on_unrecognized: None };
        res.set_args(args);
        res
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Replaces the held arguments; the first one is the program path.
    pub fn set_args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn clear_args(&mut self) -> &mut Self {
        self.args.clear();
        self
    }

    /// Hands unrecognized tokens to `f` instead of failing the parse.
    pub fn on_unrecognized(&mut self, f: impl FnMut(&str) + 'static) -> &mut Self {
        self.on_unrecognized = Some(Box::new(f));
        self
    }

    pub fn parse<T: Args>(&mut self) -> Result<T> {
        let schema = T::schema()?;
        let tokens = Tokens::new(self.args.iter().map(String::as_str));
        let on_unrecognized = &mut self.on_unrecognized;
        parse::parse(&schema, tokens, &mut |arg| match on_unrecognized {
            Some(f) => {
                f(&arg);
                Ok(())
            }
            None => Err(Error::UnrecognizedToken(arg)),
        })
    }

    /// Completion candidates for `prefix` given the words before it.
    pub fn complete<T: Args, S: AsRef<str>>(
        &self,
        prefix: &str,
        preceding: &[S],
    ) -> Result<Vec<String>> {
        Ok(T::schema()?.complete(prefix, preceding))
    }
}
