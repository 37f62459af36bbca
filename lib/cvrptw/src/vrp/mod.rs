//! Compiles a [`VrptwInstance`](instances::dataset::vrptw::VrptwInstance) into a routing model.
//!
//! Every vehicle gets two synthetic visits standing for the depot, `first` and `last`.  The
//! `first` visit of each vehicle is preceded by the `last` visit of the vehicle before it, so the
//! predecessor array forms a single circuit over all visits.  The route of vehicle `v` is the
//! segment of that circuit running from `first(v)` to `last(v)`.
pub mod visits;
mod compiler;
mod routes;

pub use visits::{Visit, VisitData, VisitKind, VisitTable};
pub use compiler::{compile, compile_all, CompileOptions, RoutingModel};
pub use routes::{Route, RouteSolution};

#[cfg(test)]
pub(crate) mod tests {
    use instances::dataset::vrptw::VrptwInstance;

    /// Two customers: 1 at (3, 4) with demand 10 and window [20, 30], 2 at (6, 8) with demand 20
    /// and window [100, 200].  Both take 1 time unit of service.
    pub(crate) fn small(num_vehicles: usize) -> VrptwInstance {
        let text = format!("SMALL
VEHICLE
NUMBER     CAPACITY
  {}         50
CUSTOMER
CUST NO.  XCOORD.   YCOORD.    DEMAND   READY TIME  DUE DATE   SERVICE   TIME
    0       0          0          0          0        500          0
    1       3          4         10         20         30          1
    2       6          8         20        100        200          1
", num_vehicles);
        VrptwInstance::parse_str("small", &text).unwrap()
    }

    pub(crate) fn depot_only(num_vehicles: usize) -> VrptwInstance {
        let text = format!("EMPTY
VEHICLE
NUMBER     CAPACITY
  {}         10
CUSTOMER
CUST NO.  XCOORD.   YCOORD.    DEMAND   READY TIME  DUE DATE   SERVICE   TIME
    0      35         35          0          0        230          0
", num_vehicles);
        VrptwInstance::parse_str("empty", &text).unwrap()
    }
}
