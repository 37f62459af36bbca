use super::*;
use lazy_static::lazy_static;
use crate::{ParseError, ParseInstance, SolomonFmt, SolomonStr};
use crate::raw::solomon::Solomon;
use crate::raw::{
  metrics::{self, Euclidean},
  FromRaw,
};

pub type Time = i64;
pub type Demand = i64;
pub type Distance = i64;
/// Raw node index: `0` is the depot, `1..=n` are customers in file order.
pub type Node = usize;
pub type Vehicle = usize;

/// Multiplier applied to every time value and distance so the model stays integral.
pub const TIME_FACTOR: i64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
  /// Record number as it appears in the instance file
  pub id: usize,
  pub location: (f64, f64),
  pub demand: Demand,
  pub earliest_start: Time,
  pub latest_start: Time,
  pub service_time: Time,
}

/// A validated VRPTW instance.  All time-valued fields are already multiplied by [`TIME_FACTOR`].
#[derive(Debug, Clone, PartialEq)]
pub struct VrptwInstance {
  pub id: String,
  pub depot: (f64, f64),
  pub customers: Vec<Customer>,
  pub num_vehicles: usize,
  pub capacity: Demand,
  pub max_horizon: Time,
}

impl FromRaw<Solomon> for VrptwInstance {
  fn from_raw(raw: Solomon, id: Cow<str>) -> Result<VrptwInstance, ParseError> {
    let invalid = |msg: String| Err(ParseError::Invalid(msg));

    if raw.num_vehicles < 1 {
      return invalid("at least one vehicle is required".to_string());
    }
    if raw.vehicle_capacity < 0 {
      return invalid(format!("negative vehicle capacity {}", raw.vehicle_capacity));
    }
    if raw.horizon < 0 {
      return invalid(format!("negative time horizon {}", raw.horizon));
    }
    if !(raw.depot.0.is_finite() && raw.depot.1.is_finite()) {
      return invalid("depot coordinates must be finite".to_string());
    }

    let scale = |t: Time, what: &str| t.checked_mul(TIME_FACTOR)
      .ok_or_else(|| ParseError::Invalid(format!("{} {} overflows once scaled by {}", what, t, TIME_FACTOR)));
    let mut customers = Vec::with_capacity(raw.customers.len());
    for c in raw.customers {
      if !(c.x.is_finite() && c.y.is_finite()) {
        return invalid(format!("customer {}: coordinates must be finite", c.id));
      }
      if c.demand < 0 {
        return invalid(format!("customer {}: negative demand {}", c.id, c.demand));
      }
      if c.service_time < 0 {
        return invalid(format!("customer {}: negative service time {}", c.id, c.service_time));
      }
      if c.ready_time < 0 || c.due_date < c.ready_time {
        return invalid(format!("customer {}: bad time window [{}, {}]", c.id, c.ready_time, c.due_date));
      }
      customers.push(Customer {
        id: c.id,
        location: (c.x, c.y),
        demand: c.demand,
        earliest_start: scale(c.ready_time, "ready time")?,
        latest_start: scale(c.due_date, "due date")?,
        service_time: scale(c.service_time, "service time")?,
      });
    }

    Ok(VrptwInstance {
      id: id.into_owned(),
      depot: raw.depot,
      customers,
      num_vehicles: raw.num_vehicles,
      capacity: raw.vehicle_capacity,
      max_horizon: scale(raw.horizon, "time horizon")?,
    })
  }
}

impl VrptwInstance {
  pub fn load(path: impl AsRef<Path>) -> Result<VrptwInstance, ParseError> {
    let path = path.as_ref();
    let raw = Solomon::parse(SolomonFmt(path))?;
    let id = match path.file_stem() {
      Some(stem) => stem.to_string_lossy().into_owned(),
      None => raw.name.clone(),
    };
    VrptwInstance::from_raw(raw, Cow::Owned(id))
  }

  pub fn parse_str(id: &str, text: &str) -> Result<VrptwInstance, ParseError> {
    let raw = Solomon::parse(SolomonStr(text))?;
    VrptwInstance::from_raw(raw, Cow::Borrowed(id))
  }

  #[inline]
  pub fn num_customers(&self) -> usize { self.customers.len() }

  pub fn total_demand(&self) -> Demand {
    self.customers.iter().map(|c| c.demand).sum()
  }

  #[inline]
  fn customer(&self, i: Node) -> Option<&Customer> {
    if i == 0 { None } else { Some(&self.customers[i - 1]) }
  }

  #[inline]
  pub fn location(&self, i: Node) -> (f64, f64) {
    self.customer(i).map_or(self.depot, |c| c.location)
  }

  #[inline]
  pub fn demand(&self, i: Node) -> Demand {
    self.customer(i).map_or(0, |c| c.demand)
  }

  #[inline]
  pub fn service_time(&self, i: Node) -> Time {
    self.customer(i).map_or(0, |c| c.service_time)
  }

  #[inline]
  pub fn earliest_start(&self, i: Node) -> Time {
    self.customer(i).map_or(0, |c| c.earliest_start)
  }

  #[inline]
  pub fn latest_start(&self, i: Node) -> Time {
    self.customer(i).map_or(self.max_horizon, |c| c.latest_start)
  }

  /// Scaled Euclidean distance, floored.  Symmetric, and zero on the diagonal.
  #[inline]
  pub fn distance(&self, i: Node, j: Node) -> Distance {
    if i == j { return 0 }
    metrics::scaled_floor(Euclidean(), self.location(i), self.location(j), TIME_FACTOR)
  }

  /// Copy restricted to the first `n` customers, as in the `C101_25` style benchmark variants.
  pub fn truncated(&self, n: usize) -> VrptwInstance {
    let mut data = self.clone();
    if n < data.customers.len() {
      data.customers.truncate(n);
      data.id = format!("{}_{}", self.id, n);
    }
    data
  }
}

pub enum VrptwSolomon {}

impl Dataset for StdLayout<VrptwSolomon> {
  type Instance = VrptwInstance;

  fn load_instance(&self, idx: usize) -> Result<Self::Instance> {
    let (instance, path) = self.instance_path(idx)?;
    let raw = Solomon::parse(SolomonFmt(&path)).context(format!("failed to load {:?}", path))?;
    Ok(VrptwInstance::from_raw(raw, instance)?)
  }
}

/// Sub-directories of [`data_root`] making up [`dset`], in index order.
pub const COLLECTIONS: [&str; 2] = ["solomon", "homberger"];

/// The benchmark collections present under `root`, in [`COLLECTIONS`] order.  Collections whose
/// directory is absent are left out; an unreadable index is an error.
pub fn collection_at(root: &Path) -> Result<DSetCollection<VrptwInstance>> {
  let mut members: Vec<Box<dyn Dataset<Instance=VrptwInstance>>> = Vec::new();
  for dir in COLLECTIONS.iter() {
    if root.join(dir).is_dir() {
      let dset: StdLayout<VrptwSolomon> = StdLayout::with_root(root, dir, "txt")?;
      members.push(Box::new(dset));
    }
  }
  if members.is_empty() {
    anyhow::bail!("none of {:?} found in {:?}", COLLECTIONS, root);
  }
  DSetCollection::new(members)
}

lazy_static!{
  static ref DSET: std::result::Result<DSetCollection<VrptwInstance>, String> =
    data_root()
      .and_then(|root| collection_at(&root))
      .map_err(|e| format!("{:#}", e));
}

/// The collections under `$DATA_ROOT`, opened on first use.
pub fn dset() -> Result<&'static DSetCollection<VrptwInstance>> {
  DSET.as_ref().map_err(|e| anyhow::anyhow!("{}", e))
}
