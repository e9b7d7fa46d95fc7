use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

mod cycle;
mod error;
mod report;
mod sweep;

use cf_flow::{FlowState, StationSpec};
use cf_gas::{GasAdapter, IdealGasModel};
use error::AppResult;
use report::StationRow;

#[derive(Parser)]
#[command(name = "cf-cli")]
#[command(about = "CycleFlow CLI - 1-D gas-turbine flow stations and cycle components", long_about = None)]
struct Cli {
    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a single flow station
    Station {
        /// Total temperature [°R]
        #[arg(long)]
        tt: f64,
        /// Total pressure [psia]
        #[arg(long)]
        pt: f64,
        /// Mass flow [lbm/s]
        #[arg(long, default_value_t = 1.0)]
        w: f64,
        /// Mach number constraint
        #[arg(long)]
        mach: Option<f64>,
        /// Flow area constraint [in²]
        #[arg(long)]
        area: Option<f64>,
        /// Static pressure constraint [psia]
        #[arg(long)]
        ps: Option<f64>,
        /// Take the supersonic root of an area constraint
        #[arg(long)]
        supersonic: bool,
        /// Water-air ratio
        #[arg(long, default_value_t = 0.0)]
        war: f64,
    },
    /// Size a nozzle and sweep its back pressure
    NozzleSweep {
        #[arg(long, default_value_t = 100.0)]
        w: f64,
        #[arg(long, default_value_t = 700.0)]
        tt: f64,
        #[arg(long, default_value_t = 50.0)]
        pt: f64,
        /// Back pressure the nozzle is sized for [psia]
        #[arg(long, default_value_t = 15.0)]
        design_back_ps: f64,
        /// First back pressure of the sweep [psia]
        #[arg(long)]
        from: f64,
        /// Last back pressure of the sweep [psia]
        #[arg(long)]
        to: f64,
        #[arg(long, default_value_t = 11)]
        points: usize,
    },
    /// Run a cycle file: design point, then its off-design points
    Run {
        /// Path to the cycle YAML file
        cycle_path: PathBuf,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let model = IdealGasModel::new();
    let gas = GasAdapter::new(&model);

    match cli.command {
        Commands::Station {
            tt,
            pt,
            w,
            mach,
            area,
            ps,
            supersonic,
            war,
        } => {
            let mut spec = StationSpec::new("station")
                .tt(tt)
                .pt(pt)
                .w(w)
                .war(war)
                .is_super(supersonic);
            if let Some(mach) = mach {
                spec = spec.mach(mach);
            }
            if let Some(area) = area {
                spec = spec.area(area);
            }
            if let Some(ps) = ps {
                spec = spec.ps(ps);
            }
            cmd_station(&gas, &spec, cli.json)
        }
        Commands::NozzleSweep {
            w,
            tt,
            pt,
            design_back_ps,
            from,
            to,
            points,
        } => {
            let req = sweep::SweepRequest {
                w,
                tt,
                pt,
                design_back_ps,
                from,
                to,
                points,
            };
            cmd_nozzle_sweep(&gas, &req, cli.json)
        }
        Commands::Run { cycle_path } => cmd_run(&gas, &cycle_path, cli.json),
    }
}

fn cmd_station(gas: &GasAdapter<'_>, spec: &StationSpec, json: bool) -> AppResult<()> {
    let state = FlowState::resolve(gas, spec)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }
    report::station_header();
    report::print_station(&StationRow::from(&state));
    println!(
        "  ht={:.4} s={:.5} rhos={:.6e} gams={:.4} V={:.2} ft/s",
        state.ht(),
        state.s(),
        state.statics.rhos,
        state.statics.gams,
        state.vflow()
    );
    if let Some(wc) = state.wc {
        println!("  Wc={wc:.4}");
    }
    Ok(())
}

fn cmd_nozzle_sweep(gas: &GasAdapter<'_>, req: &sweep::SweepRequest, json: bool) -> AppResult<()> {
    let rows = sweep::run(gas, req)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!(
            "Nozzle sized at W={:.3} Tt={:.2} Pt={:.4} back={:.4}",
            req.w, req.tt, req.pt, req.design_back_ps
        );
        report::print_sweep(&rows);
    }
    Ok(())
}

fn cmd_run(gas: &GasAdapter<'_>, cycle_path: &Path, json: bool) -> AppResult<()> {
    let file = cycle::load(cycle_path)?;
    let mut cycle = cycle::Cycle::from_file(&file)?;
    let reports = cycle.run(gas, &file.off_design)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }
    println!("Cycle: {} (gas model: {})", cycle.name, gas.model_name());
    for r in &reports {
        report::print_point(r);
    }
    Ok(())
}
