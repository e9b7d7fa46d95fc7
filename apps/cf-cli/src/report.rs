//! Compact report rows and their text rendering.

use cf_flow::FlowState;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Serialize)]
pub struct StationRow {
    pub name: String,
    pub w: f64,
    pub tt: f64,
    pub pt: f64,
    pub ts: f64,
    pub ps: f64,
    pub mach: f64,
    pub area: f64,
}

impl From<&FlowState> for StationRow {
    fn from(flow: &FlowState) -> Self {
        Self {
            name: flow.name.clone(),
            w: flow.w,
            tt: flow.tt(),
            pt: flow.pt(),
            ts: flow.statics.ts,
            ps: flow.ps(),
            mach: flow.mach(),
            area: flow.area(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ComponentRow {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regime: Option<String>,
    pub values: BTreeMap<&'static str, f64>,
}

impl ComponentRow {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            regime: None,
            values: BTreeMap::new(),
        }
    }

    pub fn value(mut self, key: &'static str, value: f64) -> Self {
        self.values.insert(key, value);
        self
    }
}

/// One evaluated operating point of a cycle.
#[derive(Clone, Debug, Serialize)]
pub struct PointReport {
    pub label: String,
    pub design: bool,
    pub stations: Vec<StationRow>,
    pub components: Vec<ComponentRow>,
}

/// One back pressure of a nozzle sweep.
#[derive(Clone, Debug, Serialize)]
pub struct SweepRow {
    pub back_ps: f64,
    pub regime: String,
    pub exit_mach: f64,
    pub exit_ps: f64,
    pub fg: f64,
    pub wq_aexit: f64,
    pub wq_aexit_dmd: f64,
}

pub fn station_header() {
    println!(
        "  {:<22} {:>10} {:>10} {:>10} {:>10} {:>10} {:>8} {:>10}",
        "station", "W", "Tt", "Pt", "Ts", "Ps", "Mach", "area"
    );
}

pub fn print_station(row: &StationRow) {
    println!(
        "  {:<22} {:>10.4} {:>10.2} {:>10.4} {:>10.2} {:>10.4} {:>8.4} {:>10.2}",
        row.name, row.w, row.tt, row.pt, row.ts, row.ps, row.mach, row.area
    );
}

pub fn print_point(report: &PointReport) {
    let mode = if report.design { "design" } else { "off-design" };
    println!("\n{} ({})", report.label, mode);
    station_header();
    for row in &report.stations {
        print_station(row);
    }
    for comp in &report.components {
        let mut line = format!("  {}", comp.name);
        if let Some(regime) = &comp.regime {
            line.push_str(&format!("  regime={regime}"));
        }
        for (key, value) in &comp.values {
            line.push_str(&format!("  {key}={value:.4}"));
        }
        println!("{line}");
    }
}

pub fn print_sweep(rows: &[SweepRow]) {
    println!(
        "  {:>10} {:<20} {:>8} {:>10} {:>12} {:>10} {:>10}",
        "back_ps", "regime", "Mach", "Ps", "Fg", "WqA", "WqA_dmd"
    );
    for r in rows {
        println!(
            "  {:>10.4} {:<20} {:>8.4} {:>10.4} {:>12.2} {:>10.5} {:>10.5}",
            r.back_ps, r.regime, r.exit_mach, r.exit_ps, r.fg, r.wq_aexit, r.wq_aexit_dmd
        );
    }
}
