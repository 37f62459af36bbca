use super::compiler::RoutingModel;
use crate::model::{Assignment, Model, ModelError};
use instances::dataset::vrptw::{Demand, Distance, Node, Time, Vehicle, TIME_FACTOR};

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub vehicle: Vehicle,
    /// Raw customer nodes in visiting order
    pub customers: Vec<Node>,
    pub load: Demand,
    /// Service start time of each customer
    pub start_times: Vec<Time>,
    /// Arrival back at the depot
    pub end_time: Time,
    /// Scaled travel distance
    pub distance: Distance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteSolution {
    pub routes: Vec<Route>,
    pub used: i64,
    /// Unscaled total travel distance, the primary objective
    pub total_distance: f64,
}

impl RouteSolution {
    pub fn to_json(&self) -> json::JsonValue {
        let routes: Vec<json::JsonValue> = self.routes.iter()
            .map(|r| json::object! {
                vehicle: r.vehicle,
                customers: r.customers.clone(),
                load: r.load,
                start_times: r.start_times.clone(),
                end_time: r.end_time,
                distance: r.distance,
            })
            .collect();
        json::object! {
            routes: routes,
            used: self.used,
            total_distance: self.total_distance,
        }
    }
}

impl RoutingModel {
    /// Reads the routes off a complete assignment by following `prev` back from each `last` visit.
    pub fn decode(&self, a: &Assignment) -> Result<RouteSolution, ModelError> {
        let t = &self.visits;
        let mut routes = Vec::with_capacity(t.num_vehicles);
        let mut total: Distance = 0;

        for v in t.vehicles() {
            let first = t.first(v);
            let mut node = t.last(v);
            let end_time = a.value(self.start[node])?;
            let mut distance = 0;
            let mut seq = Vec::new();
            loop {
                let p = a.value(self.prev[node])?;
                if p < 0 || p as usize >= t.len() {
                    return Err(ModelError::BrokenRoute { vehicle: v });
                }
                let p = p as usize;
                distance += t.distance(p, node);
                if p == first {
                    break;
                }
                if !t.is_customer(p) || seq.len() >= t.num_customers {
                    return Err(ModelError::BrokenRoute { vehicle: v });
                }
                seq.push(p);
                node = p;
            }
            seq.reverse();

            let start_times = seq.iter().map(|&c| a.value(self.start[c])).collect::<Result<_, _>>()?;
            total += distance;
            routes.push(Route {
                vehicle: v,
                customers: seq.iter().map(|&c| t.node(c)).collect(),
                load: a.value(self.load[v])?,
                start_times,
                end_time,
                distance,
            });
        }

        Ok(RouteSolution {
            routes,
            used: a.value(self.used)?,
            total_distance: total as f64 / TIME_FACTOR as f64,
        })
    }

    /// Builds the complete assignment that realises `routes`, one sequence of raw customer nodes
    /// per vehicle.  Service starts as early as the windows allow.  Customers missing from the
    /// plan are left as their own predecessor, which no solution of the model permits.
    pub fn hydrate(&self, model: &Model, routes: &[Vec<Node>]) -> Result<Assignment, ModelError> {
        let t = &self.visits;
        let nv = t.num_vehicles;
        if routes.len() != nv {
            return Err(ModelError::RoutePlan(format!("expected {} routes, got {}", nv, routes.len())));
        }

        let mut a = Assignment::new(model.num_vars());
        let mut placed = vec![false; t.num_customers];
        let mut used = 0;

        for (v, route) in routes.iter().enumerate() {
            let first = t.first(v);
            a.set(self.prev[first], t.last((v + nv - 1) % nv) as i64);
            a.set(self.veh[first], v as i64);
            a.set(self.start[first], 0);

            let mut pred = first;
            let mut time: Time = 0;
            let mut load: Demand = 0;
            for &node in route {
                if node == 0 || node > t.num_customers {
                    return Err(ModelError::RoutePlan(format!("node {} is not a customer", node)));
                }
                let c = node - 1;
                if placed[c] {
                    return Err(ModelError::RoutePlan(format!("customer {} is visited twice", node)));
                }
                placed[c] = true;
                let arrival = time + t.get(pred).service_time + t.distance(pred, c);
                time = arrival.max(t.get(c).earliest);
                load += t.get(c).demand;
                a.set(self.prev[c], pred as i64);
                a.set(self.veh[c], v as i64);
                a.set(self.start[c], time);
                pred = c;
            }

            let last = t.last(v);
            a.set(self.prev[last], pred as i64);
            a.set(self.veh[last], v as i64);
            a.set(self.start[last], time + t.get(pred).service_time + t.distance(pred, last));
            a.set(self.load[v], load);
            if load != 0 {
                used += 1;
            }
        }

        for c in t.customers().filter(|&c| !placed[c]) {
            a.set(self.prev[c], c as i64);
            a.set(self.veh[c], 0);
            a.set(self.start[c], t.get(c).earliest);
        }
        a.set(self.used, used);
        Ok(a)
    }
}
