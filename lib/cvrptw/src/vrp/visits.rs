use instances::dataset::vrptw::{Demand, Distance, Node, Time, Vehicle, VrptwInstance};
use crate::model::ModelError;
use std::ops::Range;

/// Visit index within a [`VisitTable`].
pub type Visit = usize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VisitKind {
    Customer,
    /// Start of the route of a vehicle
    First(Vehicle),
    /// End of the route of a vehicle
    Last(Vehicle),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VisitData {
    pub kind: VisitKind,
    /// Raw node of the instance (`0` is the depot)
    pub node: Node,
    pub demand: Demand,
    pub service_time: Time,
    pub earliest: Time,
    pub latest: Time,
}

/// Lookup table for the visits of a routing model.  Customers come first (visit `c` is raw
/// node `c + 1`), then the `first` visit of each vehicle, then the `last` visit of each vehicle.
/// Both synthetic visits of a vehicle stand for the depot.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitTable {
    pub num_customers: usize,
    pub num_vehicles: usize,
    pub capacity: Demand,
    pub max_horizon: Time,
    visits: Vec<VisitData>,
    distance: Vec<Distance>,
}

impl VisitTable {
    pub fn new(data: &VrptwInstance) -> VisitTable {
        let num_customers = data.num_customers();
        let num_vehicles = data.num_vehicles;
        let n = num_customers + 2 * num_vehicles;

        let depot = |kind| VisitData {
            kind,
            node: 0,
            demand: 0,
            service_time: 0,
            earliest: 0,
            latest: data.max_horizon,
        };

        let mut visits = Vec::with_capacity(n);
        visits.extend((1..=num_customers).map(|i| VisitData {
            kind: VisitKind::Customer,
            node: i,
            demand: data.demand(i),
            service_time: data.service_time(i),
            earliest: data.earliest_start(i),
            latest: data.latest_start(i),
        }));
        visits.extend((0..num_vehicles).map(|v| depot(VisitKind::First(v))));
        visits.extend((0..num_vehicles).map(|v| depot(VisitKind::Last(v))));

        let mut distance = Vec::with_capacity(n * n);
        for a in &visits {
            distance.extend(visits.iter().map(|b| data.distance(a.node, b.node)));
        }

        VisitTable {
            num_customers,
            num_vehicles,
            capacity: data.capacity,
            max_horizon: data.max_horizon,
            visits,
            distance,
        }
    }

    #[inline]
    pub fn len(&self) -> usize { self.visits.len() }

    #[inline]
    pub fn first(&self, v: Vehicle) -> Visit { self.num_customers + v }

    #[inline]
    pub fn last(&self, v: Vehicle) -> Visit { self.num_customers + self.num_vehicles + v }

    #[inline]
    pub fn is_customer(&self, i: Visit) -> bool { i < self.num_customers }

    #[inline]
    pub fn get(&self, i: Visit) -> &VisitData { &self.visits[i] }

    #[inline]
    pub fn kind(&self, i: Visit) -> VisitKind { self.visits[i].kind }

    #[inline]
    pub fn node(&self, i: Visit) -> Node { self.visits[i].node }

    #[inline]
    pub fn distance(&self, from: Visit, to: Visit) -> Distance {
        self.distance[from * self.len() + to]
    }

    #[inline]
    pub fn customers(&self) -> Range<Visit> { 0..self.num_customers }

    #[inline]
    pub fn vehicles(&self) -> Range<Vehicle> { 0..self.num_vehicles }

    pub fn iter(&self) -> impl Iterator<Item=(Visit, &VisitData)> + '_ {
        self.visits.iter().enumerate()
    }

    /// Verifies the index arithmetic against the stored visit kinds.
    pub fn check(&self) -> Result<(), ModelError> {
        let fail = |msg: String| Err(ModelError::Bookkeeping(msg));
        let n = self.num_customers + 2 * self.num_vehicles;
        if self.visits.len() != n || self.distance.len() != n * n {
            return fail(format!("expected {} visits, table has {}", n, self.visits.len()));
        }
        for c in self.customers() {
            if self.kind(c) != VisitKind::Customer || self.node(c) != c + 1 {
                return fail(format!("visit {} is not customer {}", c, c + 1));
            }
        }
        for v in self.vehicles() {
            if self.kind(self.first(v)) != VisitKind::First(v) || self.node(self.first(v)) != 0 {
                return fail(format!("visit {} is not the start of vehicle {}", self.first(v), v));
            }
            if self.kind(self.last(v)) != VisitKind::Last(v) || self.node(self.last(v)) != 0 {
                return fail(format!("visit {} is not the end of vehicle {}", self.last(v), v));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vrp::tests::small;

    #[test]
    fn index_space() {
        let data = small(2);
        let t = VisitTable::new(&data);
        t.check().unwrap();
        assert_eq!(t.len(), 6);
        assert_eq!((t.first(0), t.first(1), t.last(0), t.last(1)), (2, 3, 4, 5));
        assert_eq!(t.kind(3), VisitKind::First(1));
        assert_eq!(t.kind(4), VisitKind::Last(0));
        assert_eq!(t.node(1), 2);
        assert!(t.is_customer(1) && !t.is_customer(2));
    }

    #[test]
    fn synthetic_visits_are_the_depot() {
        let data = small(2);
        let t = VisitTable::new(&data);
        for v in t.vehicles() {
            for &i in &[t.first(v), t.last(v)] {
                let d = t.get(i);
                assert_eq!((d.node, d.demand, d.service_time, d.earliest, d.latest), (0, 0, 0, 0, 5000));
            }
        }
        let c = t.get(0);
        assert_eq!((c.demand, c.service_time, c.earliest, c.latest), (10, 10, 200, 300));
    }

    #[test]
    fn distances_follow_raw_nodes() {
        let data = small(2);
        let t = VisitTable::new(&data);
        assert_eq!(t.distance(t.first(0), 0), 50);
        assert_eq!(t.distance(0, 1), 50);
        assert_eq!(t.distance(1, t.last(1)), 100);
        assert_eq!(t.distance(t.first(0), t.last(0)), 0);
        assert_eq!(t.distance(t.last(1), t.first(0)), 0);
    }

    #[test]
    fn detects_corruption() {
        let data = small(1);
        let mut t = VisitTable::new(&data);
        t.visits.swap(0, 2);
        assert!(matches!(t.check(), Err(ModelError::Bookkeeping(_))));
    }
}
