use json;
use rayon::ThreadPoolBuilder;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use anyhow::{Context, Result};
use tracing::*;

use cvrptw::*;
use cvrptw::model::Model;
use cvrptw::vrp::{compile_all, CompileOptions, RoutingModel, VisitKind};
use instances::dataset::Dataset;
use instances::dataset::vrptw::{self, VrptwInstance};
use instances::modify::DSetModify;

use structopt::StructOpt;

const FORMATS: [&str; 2] = ["json", "json-summ"];

/// How much of each compiled model goes into the report.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Format {
    /// Size info plus the full visit table
    Json,
    /// Size info only
    JsonSummary,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        return match s {
            "json" => Ok(Self::Json),
            "json-summ" => Ok(Self::JsonSummary),
            _ => Err(format!("invalid format: {}", s))
        };
    }
}

fn at_least_one(val: String) -> Result<(), String> {
    match val.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(_) => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}

/// Compiles VRPTW instances into routing models.
#[derive(Debug, StructOpt)]
struct ClArgs {
    /// Instance files in Solomon format
    #[structopt(parse(from_os_str))]
    instances: Vec<PathBuf>,
    /// Instances of the `$DATA_ROOT` collection (Solomon, then Homberger), by index
    #[structopt(long, short="i")]
    index: Vec<usize>,
    /// Keep only the first N customers of every instance
    #[structopt(long)]
    customers: Option<usize>,
    /// Threads used to compile instances in parallel
    #[structopt(long, short="c", default_value="1", validator=at_least_one)]
    cpus: usize,
    /// Add the number of vehicles used as a secondary objective
    #[structopt(long)]
    minimize_vehicles: bool,
    /// Write a `<id>.cpo` text export of each model here
    #[structopt(long, parse(from_os_str))]
    export_dir: Option<PathBuf>,
    #[structopt(long, short="f", default_value="json-summ", possible_values=&FORMATS)]
    format: Format,
    /// Write the report here instead of stdout
    #[structopt(long, short="o", parse(from_os_str))]
    output: Option<PathBuf>,
    /// Also write JSON-formatted logs to this file
    #[structopt(long, parse(from_os_str))]
    log: Option<PathBuf>,
}

#[derive(Debug)]
struct Compiled {
    models: Vec<(Model, RoutingModel)>,
}

fn summary(model: &Model, routing: &RoutingModel) -> json::JsonValue {
    let mut record = json::object! {
        id: model.name.clone(),
        customers: routing.visits.num_customers,
        vehicles: routing.visits.num_vehicles,
        capacity: routing.visits.capacity,
        objectives: model.objectives().iter().map(|o| o.name.clone()).collect::<Vec<_>>(),
    };
    record["size"] = model.size_info().into();
    record
}

fn visit_table(routing: &RoutingModel) -> json::JsonValue {
    let visits: Vec<json::JsonValue> = routing.visits.iter()
        .map(|(i, d)| {
            let (kind, vehicle) = match d.kind {
                VisitKind::Customer => ("customer", json::JsonValue::Null),
                VisitKind::First(v) => ("first", v.into()),
                VisitKind::Last(v) => ("last", v.into()),
            };
            json::object! {
                visit: i,
                kind: kind,
                vehicle: vehicle,
                node: d.node,
                demand: d.demand,
                service_time: d.service_time,
                earliest: d.earliest,
                latest: d.latest,
            }
        })
        .collect();
    visits.into()
}

impl Compiled {
    fn to_json(&self, format: Format) -> json::JsonValue {
        self.models.iter()
            .map(|(model, routing)| {
                let mut record = summary(model, routing);
                if format == Format::Json {
                    record["visits"] = visit_table(routing);
                }
                record
            })
            .collect::<Vec<_>>()
            .into()
    }

    fn write(&self, format: Format, dest: Option<&PathBuf>) -> Result<()> {
        let report = self.to_json(format);
        match dest {
            Some(path) => {
                let file = std::fs::File::create(path).with_context(|| format!("unable to create {:?}", path))?;
                let mut writer = std::io::BufWriter::new(file);
                report.write_pretty(&mut writer, 2).and_then(|_| writer.flush())
                    .with_context(|| format!("failed to write {:?}", path))?;
            }
            None => {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                report.write_pretty(&mut handle, 2)?;
                writeln!(handle)?;
            }
        }
        Ok(())
    }
}

fn load_instances(args: &ClArgs) -> Result<Vec<VrptwInstance>> {
    let truncate = |data: VrptwInstance| match args.customers {
        Some(n) => data.truncated(n),
        None => data,
    };

    let mut instances = Vec::with_capacity(args.instances.len() + args.index.len());
    for path in &args.instances {
        let data = VrptwInstance::load(path).with_context(|| format!("failed to load {:?}", path))?;
        instances.push(truncate(data));
    }
    if !args.index.is_empty() {
        let dset = vrptw::dset()?.map(truncate);
        for &idx in &args.index {
            instances.push(dset.load_instance(idx)?);
        }
    }

    let mut seen = Set::default();
    for data in &instances {
        if !seen.insert(data.id.as_str()) {
            anyhow::bail!("instance {} given more than once", data.id);
        }
    }
    info!(count = instances.len(), "instances loaded");
    Ok(instances)
}

fn export_models(dir: &Path, models: &[(Model, RoutingModel)]) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("unable to create {:?}", dir))?;
    for (model, _) in models {
        let path = dir.join(format!("{}.cpo", model.name));
        let file = std::fs::File::create(&path).with_context(|| format!("unable to create {:?}", &path))?;
        let mut writer = std::io::BufWriter::new(file);
        model.export(&mut writer).and_then(|_| writer.flush())
            .with_context(|| format!("failed to write {:?}", &path))?;
        debug!(?path, "model exported");
    }
    Ok(())
}

fn main() -> Result<()> {
    let args : ClArgs = StructOpt::from_args();
    let _g = init_logging(args.log.as_ref())?;
    debug!(?args);
    ThreadPoolBuilder::new().num_threads(args.cpus).build_global().context("failed to construct thread pool")?;

    let instances = load_instances(&args)?;
    if instances.is_empty() {
        anyhow::bail!("no instances given, pass instance files or --index");
    }

    let options = CompileOptions { minimize_vehicles: args.minimize_vehicles };
    let models = compile_all(&instances, &options)?;
    if let Some(dir) = args.export_dir.as_ref() {
        export_models(dir, &models)?;
    }
    Compiled { models }.write(args.format, args.output.as_ref())?;
    Ok(())
}
