//! YAML cycle files: a source, a linear chain of components and a list of
//! off-design points evaluated after the design pass.

use crate::error::{AppError, AppResult};
use crate::report::{ComponentRow, PointReport, StationRow};
use cf_components::{
    Compressor, CompressorParams, CycleComponent, Duct, DuctParams, FlowStart, FlowStartStatic,
    HeatExchanger, HeatExchangerParams, Inlet, InletParams, Nozzle, NozzleInputs, NozzleParams,
    SplitterBpr, SplitterBprParams, SplitterInputs, SplitterOutputs, SplitterW, SplitterWParams,
    StartConditions, StaticStartConditions,
};
use cf_flow::FlowState;
use cf_gas::GasAdapter;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CycleFile {
    #[serde(default = "default_name")]
    pub name: String,
    pub start: StartConfig,
    #[serde(default)]
    pub components: Vec<ComponentConfig>,
    #[serde(default)]
    pub off_design: Vec<OffDesignPoint>,
}

fn default_name() -> String {
    "cycle".to_string()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StartConfig {
    Total(StartConditions),
    Static(StaticStartConditions),
}

/// Which splitter exit the chain continues along.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Follow {
    #[default]
    Exit1,
    Exit2,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComponentConfig {
    Inlet {
        name: String,
        #[serde(flatten)]
        params: InletParams,
    },
    Duct {
        name: String,
        #[serde(flatten)]
        params: DuctParams,
    },
    Compressor {
        name: String,
        #[serde(flatten)]
        params: CompressorParams,
    },
    HeatExchanger {
        name: String,
        #[serde(flatten)]
        params: HeatExchangerParams,
    },
    Nozzle {
        name: String,
        /// Design back pressure [psia]
        back_ps: f64,
        #[serde(flatten)]
        params: NozzleParams,
    },
    SplitterBpr {
        name: String,
        #[serde(default)]
        follow: Follow,
        #[serde(flatten)]
        params: SplitterBprParams,
    },
    SplitterW {
        name: String,
        #[serde(default)]
        follow: Follow,
        #[serde(flatten)]
        params: SplitterWParams,
    },
}

/// Overrides of the design source conditions and back pressure.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OffDesignPoint {
    pub label: Option<String>,
    pub w: Option<f64>,
    pub pt: Option<f64>,
    pub tt: Option<f64>,
    pub ps: Option<f64>,
    pub ts: Option<f64>,
    pub mach: Option<f64>,
    pub war: Option<f64>,
    /// Nozzle back pressure for every nozzle in the chain [psia]
    pub back_ps: Option<f64>,
}

pub fn load(path: &Path) -> AppResult<CycleFile> {
    let content = std::fs::read_to_string(path).map_err(|source| AppError::CycleFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_yaml::from_str(&content)?)
}

enum Source {
    Total(FlowStart, StartConditions),
    Static(FlowStartStatic, StaticStartConditions),
}

enum Stage {
    Inlet(Inlet),
    Duct(Duct),
    Compressor(Compressor),
    HeatExchanger(HeatExchanger),
    Nozzle(Nozzle, f64),
    SplitterBpr(SplitterBpr, Follow),
    SplitterW(SplitterW, Follow),
}

/// Instantiated chain. Every component keeps its own design memory, so a
/// cycle is designed once and then evaluated at any number of points.
pub struct Cycle {
    pub name: String,
    source: Source,
    stages: Vec<Stage>,
}

impl Cycle {
    pub fn from_file(file: &CycleFile) -> AppResult<Self> {
        let source = match file.start {
            StartConfig::Total(c) => Source::Total(FlowStart::new("start"), c),
            StartConfig::Static(c) => Source::Static(FlowStartStatic::new("start"), c),
        };
        let stages = file
            .components
            .iter()
            .map(|config| -> AppResult<Stage> {
                Ok(match config {
                    ComponentConfig::Inlet { name, params } => {
                        Stage::Inlet(Inlet::new(name.as_str(), *params)?)
                    }
                    ComponentConfig::Duct { name, params } => {
                        Stage::Duct(Duct::new(name.as_str(), *params)?)
                    }
                    ComponentConfig::Compressor { name, params } => {
                        Stage::Compressor(Compressor::new(name.as_str(), *params)?)
                    }
                    ComponentConfig::HeatExchanger { name, params } => {
                        Stage::HeatExchanger(HeatExchanger::new(name.as_str(), *params)?)
                    }
                    ComponentConfig::Nozzle {
                        name,
                        back_ps,
                        params,
                    } => Stage::Nozzle(Nozzle::new(name.as_str(), *params)?, *back_ps),
                    ComponentConfig::SplitterBpr {
                        name,
                        follow,
                        params,
                    } => Stage::SplitterBpr(SplitterBpr::new(name.as_str(), *params)?, *follow),
                    ComponentConfig::SplitterW {
                        name,
                        follow,
                        params,
                    } => Stage::SplitterW(SplitterW::new(name.as_str(), *params)?, *follow),
                })
            })
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Self {
            name: file.name.clone(),
            source,
            stages,
        })
    }

    /// Design pass followed by every off-design point, in file order.
    pub fn run(&mut self, gas: &GasAdapter<'_>, points: &[OffDesignPoint]) -> AppResult<Vec<PointReport>> {
        let mut reports = vec![self.evaluate(gas, None)?];
        for (i, point) in points.iter().enumerate() {
            let mut report = self.evaluate(gas, Some(point))?;
            report.label = point
                .label
                .clone()
                .unwrap_or_else(|| format!("point {}", i + 1));
            reports.push(report);
        }
        Ok(reports)
    }

    /// Evaluate the whole chain; `None` is the design point.
    pub fn evaluate(
        &mut self,
        gas: &GasAdapter<'_>,
        point: Option<&OffDesignPoint>,
    ) -> AppResult<PointReport> {
        let design = point.is_none();
        let overrides = point.cloned().unwrap_or_default();
        let mut stations = Vec::new();
        let mut components = Vec::new();

        let mut flow = match &mut self.source {
            Source::Total(start, c) => {
                let conditions = StartConditions {
                    w: overrides.w.unwrap_or(c.w),
                    pt: overrides.pt.unwrap_or(c.pt),
                    tt: overrides.tt.unwrap_or(c.tt),
                    mach: overrides.mach.unwrap_or(c.mach),
                    war: overrides.war.unwrap_or(c.war),
                };
                start.evaluate(gas, &conditions, design)?.flow_out
            }
            Source::Static(start, c) => {
                let conditions = StaticStartConditions {
                    w: overrides.w.unwrap_or(c.w),
                    ps: overrides.ps.unwrap_or(c.ps),
                    ts: overrides.ts.unwrap_or(c.ts),
                    mach: overrides.mach.unwrap_or(c.mach),
                    war: overrides.war.unwrap_or(c.war),
                };
                start.evaluate(gas, &conditions, design)?.flow_out
            }
        };
        stations.push(StationRow::from(&flow));

        for stage in &mut self.stages {
            flow = match stage {
                Stage::Inlet(inlet) => {
                    let out = inlet.evaluate(gas, &flow, design)?;
                    components.push(
                        ComponentRow::new(&inlet.name)
                            .value("f_ram", out.f_ram)
                            .value("a_capture", out.a_capture),
                    );
                    out.flow_out
                }
                Stage::Duct(duct) => duct.evaluate(gas, &flow, design)?.flow_out,
                Stage::Compressor(compressor) => {
                    let out = compressor.evaluate(gas, &flow, design)?;
                    components.push(
                        ComponentRow::new(&compressor.name)
                            .value("pr", out.pr)
                            .value("eff", out.eff)
                            .value("eff_poly", out.eff_poly)
                            .value("pwr", out.pwr)
                            .value("tip_radius", out.tip_radius),
                    );
                    out.flow_out
                }
                Stage::HeatExchanger(hx) => {
                    let out = hx.evaluate(gas, &flow, design)?;
                    components.push(
                        ComponentRow::new(&hx.name)
                            .value("q_max", out.q_max)
                            .value("q_released", out.q_released)
                            .value("lmtd", out.lmtd)
                            .value("t_cold_out", out.t_cold_out),
                    );
                    out.flow_out
                }
                Stage::Nozzle(nozzle, back_ps) => {
                    let inputs = NozzleInputs {
                        flow_in: flow.clone(),
                        back_ps: overrides.back_ps.unwrap_or(*back_ps),
                    };
                    let out = nozzle.evaluate(gas, &inputs, design)?;
                    let mut row = ComponentRow::new(&nozzle.name)
                        .value("fg", out.fg)
                        .value("pr", out.pr)
                        .value("ar", out.ar)
                        .value("wq_aexit", out.wq_aexit)
                        .value("wq_aexit_dmd", out.wq_aexit_dmd);
                    row.regime = Some(out.regime.to_string());
                    components.push(row);
                    stations.push(StationRow::from(&out.throat));
                    out.flow_out
                }
                Stage::SplitterBpr(splitter, follow) => {
                    let out = splitter.evaluate(gas, &SplitterInputs::subsonic(flow.clone()), design)?;
                    components.push(ComponentRow::new(&splitter.name).value("bpr_des", out.bpr_des));
                    continue_along(out, *follow, &mut stations)
                }
                Stage::SplitterW(splitter, follow) => {
                    let out = splitter.evaluate(gas, &SplitterInputs::subsonic(flow.clone()), design)?;
                    components.push(ComponentRow::new(&splitter.name).value("bpr_des", out.bpr_des));
                    continue_along(out, *follow, &mut stations)
                }
            };
            stations.push(StationRow::from(&flow));
        }

        info!(cycle = %self.name, design, stations = stations.len(), "cycle evaluated");
        Ok(PointReport {
            label: if design { "design".to_string() } else { String::new() },
            design,
            stations,
            components,
        })
    }
}

/// Record the branch the chain leaves behind and return the one it follows.
fn continue_along(out: SplitterOutputs, follow: Follow, stations: &mut Vec<StationRow>) -> FlowState {
    let (next, branch) = match follow {
        Follow::Exit1 => (out.flow_out1, out.flow_out2),
        Follow::Exit2 => (out.flow_out2, out.flow_out1),
    };
    stations.push(StationRow::from(&branch));
    next
}
