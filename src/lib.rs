//! Declarative command line parsing.
//!
//! Annotate the fields of a plain struct and let the derive build a
//! [`Schema`] for it:
//!
//! ```
//! use declflags::Args;
//!
//! #[derive(Debug, Default, Args)]
//! struct Flags {
//!     #[binary_path]
//!     binary: String,
//!     /// Print more.
//!     #[switch("/v")]
//!     verbose: u32,
//!     #[argument(floating, required)]
//!     input: String,
//!     #[argument("/out")]
//!     output: Option<String>,
//! }
//!
//! let flags = Flags::from_vec(vec![
//!     "tool".into(),
//!     "/v".into(),
//!     "in.txt".into(),
//!     "/OUT".into(),
//!     "out.txt".into(),
//! ])
//! .unwrap();
//! assert_eq!(flags.verbose, 1);
//! assert_eq!(flags.input, "in.txt");
//! assert_eq!(flags.output.as_deref(), Some("out.txt"));
//! ```
//!
//! Parsing is a single left to right pass: each token is matched against
//! switch names, then keyed argument names, then the next floating
//! argument. Names are case insensitive unless declared otherwise.

pub mod coerce;
mod command_line;
mod complete;
mod cursor;
mod parse;
mod schema;

pub use declflags_macros::{Args, Group, Value};

pub use crate::{
    coerce::{CoerceError, Value, ValueKind},
    command_line::CommandLine,
    cursor::{PushBack, Source, Tokens},
    schema::{
        Argument, Descriptor, DescriptorKind, Group, List, Schema, SchemaBuilder, SchemaError,
        Switch,
    },
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("Unrecognized argument: {0}")]
    UnrecognizedToken(String),
    #[error("{}", missing_message(.0))]
    MissingRequired(Vec<String>),
    #[error("expected a value for `{0}`")]
    MissingValue(String),
    #[error("can't parse `{name}`, {source}")]
    Coercion {
        name: String,
        #[source]
        source: CoerceError,
    },
}

fn missing_message(names: &[String]) -> String {
    match names {
        [] => "Missing values for required command-line switches.".to_string(),
        [name] => format!("Missing value for required command-line switch {}.", name),
        [init @ .., last] => format!(
            "Missing values for required command-line switches {} and {}.",
            init.join(", "),
            last
        ),
    }
}

/// A target structure with a declared schema, usually from `#[derive(Args)]`.
pub trait Args: Default + Sized + 'static {
    fn schema() -> std::result::Result<Schema<Self>, SchemaError>;

    /// Parses the process arguments.
    fn from_env() -> Result<Self> {
        CommandLine::new().parse()
    }

    /// Parses `args`, whose first element is the program path.
    fn from_vec(args: Vec<String>) -> Result<Self> {
        Self::schema()?.parse(args)
    }
}
