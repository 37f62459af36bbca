mod solomon;
pub use solomon::{SolomonFmt, SolomonStr};

use std::path::PathBuf;

mod nom_prelude {
  pub use nom::{
    IResult,
    error::{
      self,
      VerboseError,
      VerboseErrorKind,
      context,
    },
    sequence::*,
    multi::*,
    combinator::*,
    character::complete::*,
    bytes::complete::take_till1,
    Finish,
  };
  pub use std::str::FromStr;
}

mod common;

/// Failure to turn an instance file into a validated instance.  Fatal: no model is built.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
  #[error("failed to read {path:?}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("input ended while reading {field}")]
  Truncated { field: &'static str },
  #[error("cannot convert {token:?} while reading {field}")]
  InvalidNumber { field: &'static str, token: String },
  #[error("invalid instance: {0}")]
  Invalid(String),
}

pub trait ParseInstance<Fmt>: Sized {
  fn parse(inputs: Fmt) -> Result<Self, ParseError>;
}
