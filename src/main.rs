use anyhow::{Context, Result};
use refinery_flow::{config, domain::Scenario, optimizer::FlowOptimizer, telemetry};
use config::Config;
use telemetry::init_tracing;
use tracing::{error, info};

fn main() -> Result<()> {
    init_tracing();

    let mut cfg = Config::load()?;

    let mut json = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            path => cfg.scenario.path = path.into(),
        }
    }

    let scenario = Scenario::load(&cfg.scenario.path, cfg.model.strict_block_lists)
        .with_context(|| format!("loading scenario {}", cfg.scenario.path.display()))?;

    info!(
        path = %cfg.scenario.path.display(),
        wells = scenario.network.well_count(),
        refineries = scenario.network.refinery_count(),
        routes = scenario.network.route_count(),
        total_demand = scenario.demand.total(),
        formulation = %cfg.model.formulation,
        "scenario loaded"
    );

    let optimizer = FlowOptimizer::from_settings(&cfg.model, cfg.solver.clone());
    let report = optimizer.optimize_scenario(&scenario)?;

    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{report}");
    }

    if report.outcome.is_infeasible() {
        error!(run_id = %report.run_id, "model not feasible, don't use results");
    }

    Ok(())
}
