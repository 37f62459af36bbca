use super::nom_prelude::*;
use super::ParseError;

pub type PResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// Next whitespace-delimited token.
pub fn token(input: &str) -> PResult<&str> {
  preceded(multispace0, take_till1(|c: char| c.is_whitespace()))(input)
}

pub fn skip_tokens<'a>(field: &'static str, n: usize) -> impl FnMut(&'a str) -> PResult<'a, ()> {
  context(field, map(count(token, n), |_| ()))
}

pub fn number<'a, T: FromStr>(field: &'static str) -> impl FnMut(&'a str) -> PResult<'a, T> {
  context(field, map_res(token, T::from_str))
}

/// Maps a nom failure onto the field that was being read.  The innermost error records where
/// parsing stopped: nothing left means the file was cut short, anything else is a bad token.
pub fn convert_error(e: VerboseError<&str>) -> ParseError {
  let field = e.errors.iter()
    .find_map(|(_, kind)| match kind {
      VerboseErrorKind::Context(ctx) => Some(*ctx),
      _ => None,
    })
    .unwrap_or("input");

  let at = e.errors.first().map(|(i, _)| i.trim_start()).unwrap_or("");
  match at.split_whitespace().next() {
    None => ParseError::Truncated { field },
    Some(token) => ParseError::InvalidNumber { field, token: token.to_string() },
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tokens_skip_any_whitespace() {
    let (rest, t) = token("  \n\t C101  25").unwrap();
    assert_eq!(t, "C101");
    let (rest, n) = number::<usize>("n")(rest).unwrap();
    assert_eq!(n, 25);
    assert_eq!(rest, "");
  }

  #[test]
  fn error_kinds() {
    let e = number::<usize>("vehicle count")("  ").finish().unwrap_err();
    assert!(matches!(convert_error(e), ParseError::Truncated { field: "vehicle count" }));

    let e = number::<usize>("vehicle count")(" x25 7").finish().unwrap_err();
    match convert_error(e) {
      ParseError::InvalidNumber { field, token } => {
        assert_eq!(field, "vehicle count");
        assert_eq!(token, "x25");
      }
      other => panic!("unexpected {:?}", other),
    }
  }
}
