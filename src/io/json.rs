use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::sim::SimOutput;

/// Summary statistics computed from a closed-loop run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub controller: String,
    pub ticks: usize,
    pub duration: f64,
    pub arrived: bool,
    pub final_position: [f64; 2],
    pub final_heading_deg: f64,
    pub tack_switches: usize,
    pub close_hauled_ticks: usize,
    pub max_abs_cross_track: f64,
    pub final_cross_track: f64,
}

impl RunSummary {
    /// Compute summary from a run.
    pub fn from_output(controller: &str, output: &SimOutput) -> Self {
        let close_hauled_ticks = output
            .samples
            .iter()
            .filter(|s| s.target.map_or(false, |t| t.close_hauled))
            .count();

        RunSummary {
            controller: controller.to_string(),
            ticks: output.samples.len(),
            duration: output.final_state.time,
            arrived: output.arrived,
            final_position: [output.final_state.pos.x, output.final_state.pos.y],
            final_heading_deg: crate::geometry::wrap_pi(output.final_state.heading).to_degrees(),
            tack_switches: output.tack_switches(),
            close_hauled_ticks,
            max_abs_cross_track: output.max_abs_cross_track(),
            final_cross_track: output.samples.last().map_or(0.0, |s| s.cross_track),
        }
    }
}

/// Write run summary as pretty JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &RunSummary) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)
}

/// Write run summary JSON to a file.
pub fn write_summary_file<P: AsRef<Path>>(path: P, summary: &RunSummary) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, summary)
}
