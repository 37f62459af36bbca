pub type Time = i64;
pub type Demand = i64;

/// One customer record: `CUST NO. XCOORD. YCOORD. DEMAND READY TIME DUE DATE SERVICE TIME`
#[derive(Debug, Clone, PartialEq)]
pub struct SolomonNode {
  pub id: usize,
  pub x: f64,
  pub y: f64,
  pub demand: Demand,
  pub ready_time: Time,
  pub due_date: Time,
  pub service_time: Time,
}

/// Unscaled contents of a Solomon-format file.
#[derive(Debug, Clone, PartialEq)]
pub struct Solomon {
  pub name: String,
  pub num_vehicles: usize,
  pub vehicle_capacity: Demand,
  pub depot: (f64, f64),
  pub horizon: Time,
  pub customers: Vec<SolomonNode>,
}
