use super::visits::{Visit, VisitTable};
use crate::model::expr::{element, element_const, element_vars, max, sum};
use crate::model::*;
use instances::dataset::vrptw::{VrptwInstance, TIME_FACTOR};
use rayon::prelude::*;
use tracing::*;

#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Register the number of used vehicles as a secondary objective, below total distance.
    pub minimize_vehicles: bool,
}

/// The variable arrays of a compiled routing model, together with the visit table that
/// addresses them.  `prev`, `veh` and `start` are indexed by visit, `load` by vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingModel {
    pub visits: VisitTable,
    pub prev: Vec<VarId>,
    pub veh: Vec<VarId>,
    pub load: Vec<VarId>,
    pub used: VarId,
    pub start: Vec<VarId>,
}

#[instrument(level = "info", skip(data, sink, options), fields(id = %data.id))]
pub fn compile<S: ModelSink + ?Sized>(data: &VrptwInstance, sink: &mut S, options: &CompileOptions) -> Result<RoutingModel, ModelError> {
    let visits = VisitTable::new(data);
    visits.check()?;
    let n = visits.len() as i64;
    let num_vehicles = visits.num_vehicles as i64;

    let prev = sink.new_int_vars(visits.len(), 0, n - 1, "prev");
    let veh = sink.new_int_vars(visits.len(), 0, num_vehicles - 1, "veh");
    let load = sink.new_int_vars(visits.num_vehicles, 0, visits.capacity, "load");
    let used = sink.new_int_var(0, num_vehicles, Some("used".to_string()));
    let start: Vec<_> = visits.iter()
        .map(|(i, d)| sink.new_int_var(d.earliest, d.latest, Some(format!("start_{}", i))))
        .collect();

    sink.add_inferred(&veh);
    sink.add_inferred(&start);
    sink.add_inferred(&load);
    sink.add_inferred(&[used]);

    let model = RoutingModel { visits, prev, veh, load, used, start };
    model.post_structure(sink);
    model.post_capacity(sink);
    model.post_schedule(sink);

    sink.add_objective(ObjectiveTerm::scaled("total_distance", model.distance_expr(), TIME_FACTOR));
    sink.add_kpi(Kpi { name: "used".to_string(), expr: model.used.into() });
    if options.minimize_vehicles {
        model.add_secondary_objective(sink, "vehicles", model.used.into(), 1);
    }
    info!(visits = model.visits.len(), vehicles = model.visits.num_vehicles, "model compiled");
    Ok(model)
}

/// Compiles each instance into its own [`Model`] on the rayon pool.
pub fn compile_all(instances: &[VrptwInstance], options: &CompileOptions) -> Result<Vec<(Model, RoutingModel)>, ModelError> {
    instances.par_iter()
        .map(|data| {
            let mut model = Model::new(&data.id);
            let routing = compile(data, &mut model, options)?;
            Ok((model, routing))
        })
        .collect()
}

impl RoutingModel {
    fn as_values(visits: impl Iterator<Item=Visit>) -> Vec<i64> {
        visits.map(|i| i as i64).collect()
    }

    #[instrument(level = "debug", skip_all)]
    fn post_structure<S: ModelSink + ?Sized>(&self, sink: &mut S) {
        let t = &self.visits;
        let nv = t.num_vehicles;

        for v in t.vehicles() {
            let (first, last) = (t.first(v), t.last(v));
            let vehicle = v as i64;
            sink.add(Constraint::eq(self.prev[first], t.last((v + nv - 1) % nv) as i64));
            // either a customer or an empty route
            sink.add(Constraint::allowed(
                self.prev[last],
                Self::as_values(t.customers().chain(std::iter::once(first))),
            ));
            sink.add(Constraint::eq(self.veh[first], vehicle));
            sink.add(Constraint::eq(self.veh[last], vehicle));
            sink.add(Constraint::eq(element_vars(&self.veh, self.prev[last]), vehicle));
        }

        let customer_preds = Self::as_values(t.customers().chain(t.vehicles().map(|v| t.first(v))));
        for c in t.customers() {
            sink.add(Constraint::allowed(self.prev[c], customer_preds.clone()));
            sink.add(Constraint::ne(self.prev[c], c as i64));
            sink.add(Constraint::eq(self.veh[c], element_vars(&self.veh, self.prev[c])));
        }

        sink.add(Constraint::SubCircuit { prev: self.prev.clone() });
        debug!("structure posted");
    }

    #[instrument(level = "debug", skip_all)]
    fn post_capacity<S: ModelSink + ?Sized>(&self, sink: &mut S) {
        let t = &self.visits;
        sink.add(Constraint::Pack {
            loads: self.load.clone(),
            assignments: t.customers().map(|c| self.veh[c]).collect(),
            weights: t.customers().map(|c| t.get(c).demand).collect(),
            used: self.used,
        });
    }

    /// Arrival time at `to`: the finishing time of its predecessor plus the travel time.
    pub fn arrival_expr(&self, to: Visit) -> IntExpr {
        let t = &self.visits;
        let candidates = (0..t.len())
            .map(|p| IntExpr::from(self.start[p]) + (t.get(p).service_time + t.distance(p, to)))
            .collect();
        element(candidates, self.prev[to])
    }

    #[instrument(level = "debug", skip_all)]
    fn post_schedule<S: ModelSink + ?Sized>(&self, sink: &mut S) {
        let t = &self.visits;
        for c in t.customers() {
            // waiting is free, service starts once the window opens
            sink.add(Constraint::eq(self.start[c], max(self.arrival_expr(c), t.get(c).earliest)));
        }
        for v in t.vehicles() {
            sink.add(Constraint::eq(self.start[t.first(v)], 0i64));
            sink.add(Constraint::eq(self.start[t.last(v)], self.arrival_expr(t.last(v))));
        }
    }

    /// Total scaled travel distance: the edge into every customer and into every `last` visit.
    pub fn distance_expr(&self) -> IntExpr {
        let t = &self.visits;
        sum(t.customers().chain(t.vehicles().map(|v| t.last(v))).map(|i| {
            let column: Vec<i64> = (0..t.len()).map(|p| t.distance(p, i)).collect();
            element_const(&column, self.prev[i])
        }))
    }

    /// Registers a further objective, below all previously registered ones.
    pub fn add_secondary_objective<S: ModelSink + ?Sized>(&self, sink: &mut S, name: &str, expr: IntExpr, divisor: i64) {
        debug!(name, divisor, "secondary objective");
        sink.add_objective(ObjectiveTerm::scaled(name, expr, divisor));
    }
}
