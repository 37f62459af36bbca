use std::path::Path;
use crate::raw::solomon::*;
use super::{
  ParseInstance,
  ParseError,
  nom_prelude::*,
  common::*,
};

/// A Solomon-format instance file on disk.
#[derive(Debug, Copy, Clone)]
pub struct SolomonFmt<P>(pub P);

/// Solomon-format text already held in memory.
#[derive(Debug, Copy, Clone)]
pub struct SolomonStr<'a>(pub &'a str);

impl<'a> ParseInstance<SolomonStr<'a>> for Solomon {
  fn parse(input: SolomonStr<'a>) -> Result<Solomon, ParseError> {
    match parsers::solomon(input.0).finish() {
      Ok((_, instance)) => Ok(instance),
      Err(e) => Err(convert_error(e)),
    }
  }
}

impl<P: AsRef<Path>> ParseInstance<SolomonFmt<P>> for Solomon {
  fn parse(path: SolomonFmt<P>) -> Result<Solomon, ParseError> {
    let path = path.0.as_ref();
    let data = std::fs::read_to_string(path)
      .map_err(|source| ParseError::Io { path: path.to_path_buf(), source })?;
    Solomon::parse(SolomonStr(&data))
  }
}


mod parsers {
  use super::*;

  //    1      45         68         10        912        967         90
  fn customer(input: &str) -> PResult<SolomonNode> {
    let (input, (id, x, y, demand, ready_time, due_date, service_time)) = tuple((
      number::<usize>("customer number"),
      number::<f64>("customer x"),
      number::<f64>("customer y"),
      number::<Demand>("customer demand"),
      number::<Time>("ready time"),
      number::<Time>("due date"),
      number::<Time>("service time"),
    ))(input)?;
    Ok((input, SolomonNode { id, x, y, demand, ready_time, due_date, service_time }))
  }

  pub fn solomon(input: &str) -> PResult<Solomon> {
    let (i, name) = context("instance name", token)(input)?;
    let (i, _) = skip_tokens("vehicle header", 3)(i)?;
    let (i, num_vehicles) = number::<usize>("vehicle count")(i)?;
    let (i, vehicle_capacity) = number::<Demand>("vehicle capacity")(i)?;
    // column header plus the depot's record number
    let (i, _) = skip_tokens("customer header", 13)(i)?;
    let (i, (x, y)) = tuple((number::<f64>("depot x"), number::<f64>("depot y")))(i)?;
    let (i, _) = skip_tokens("depot demand and ready time", 2)(i)?;
    let (i, horizon) = number::<Time>("time horizon")(i)?;
    let (mut input, _) = skip_tokens("depot service time", 1)(i)?;

    let mut customers = Vec::new();
    loop {
      let (rest, _) = multispace0::<_, VerboseError<&str>>(input)?;
      if rest.is_empty() {
        input = rest;
        break;
      }
      let (rest, c) = customer(rest)?;
      customers.push(c);
      input = rest;
    }

    Ok((input, Solomon {
      name: name.to_string(),
      num_vehicles,
      vehicle_capacity,
      depot: (x, y),
      horizon,
      customers,
    }))
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  pub(crate) const C101_3: &str = "C101

VEHICLE
NUMBER     CAPACITY
  25         200

CUSTOMER
CUST NO.  XCOORD.   YCOORD.    DEMAND   READY TIME  DUE DATE   SERVICE   TIME

    0      40         50          0          0       1236          0
    1      45         68         10        912        967         90
    2      45         70         30        825        870         90
    3      42         66         10         65        146         90
";

  #[test]
  fn c101_prefix() -> Result<(), ParseError> {
    let raw = Solomon::parse(SolomonStr(C101_3))?;
    assert_eq!(raw.name, "C101");
    assert_eq!(raw.num_vehicles, 25);
    assert_eq!(raw.vehicle_capacity, 200);
    assert_eq!(raw.depot, (40.0, 50.0));
    assert_eq!(raw.horizon, 1236);
    assert_eq!(raw.customers.len(), 3);
    assert_eq!(raw.customers[1], SolomonNode {
      id: 2, x: 45.0, y: 70.0, demand: 30, ready_time: 825, due_date: 870, service_time: 90,
    });
    Ok(())
  }

  #[test]
  fn depot_only() -> Result<(), ParseError> {
    let text = C101_3.lines().take(10).collect::<Vec<_>>().join("\n");
    let raw = Solomon::parse(SolomonStr(&text))?;
    assert!(raw.customers.is_empty());
    Ok(())
  }

  #[test]
  fn truncated_record() {
    let text = format!("{}    4      42         68         10\n", C101_3);
    match Solomon::parse(SolomonStr(&text)) {
      Err(ParseError::Truncated { field }) => assert_eq!(field, "ready time"),
      other => panic!("expected truncation, got {:?}", other),
    }
  }

  #[test]
  fn truncated_header() {
    let text: String = C101_3.chars().take(40).collect();
    assert!(matches!(Solomon::parse(SolomonStr(&text)), Err(ParseError::Truncated { .. })));
  }

  #[test]
  fn bad_number() {
    let text = C101_3.replace("  25         200", "  25         2x0");
    match Solomon::parse(SolomonStr(&text)) {
      Err(ParseError::InvalidNumber { field, token }) => {
        assert_eq!(field, "vehicle capacity");
        assert_eq!(token, "2x0");
      }
      other => panic!("expected bad number, got {:?}", other),
    }
  }

  #[test]
  fn missing_file() {
    let r = Solomon::parse(SolomonFmt("no/such/file.txt"));
    assert!(matches!(r, Err(ParseError::Io { .. })));
  }
}
