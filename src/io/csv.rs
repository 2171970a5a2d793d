use std::io::{self, Write};
use std::path::Path;

use crate::geometry::wrap_pi;
use crate::sim::Sample;

/// Write per-tick samples in CSV format.
///
/// Columns: step, time, pos_x, pos_y, heading_deg, target_deg, close_hauled,
///          rudder_deg, max_sail_deg, tack, cross_track, wind_dir_deg
pub fn write_trajectory<W: Write>(writer: &mut W, samples: &[Sample]) -> io::Result<()> {
    writeln!(
        writer,
        "step,time,pos_x,pos_y,heading_deg,target_deg,close_hauled,\
         rudder_deg,max_sail_deg,tack,cross_track,wind_dir_deg"
    )?;

    for s in samples {
        let (target, close_hauled) = match s.target {
            Some(t) => (
                format!("{:.2}", wrap_pi(t.heading).to_degrees()),
                u8::from(t.close_hauled).to_string(),
            ),
            None => (String::new(), String::new()),
        };
        let tack = s.tack.map_or(String::new(), |t| i8::from(t).to_string());

        writeln!(
            writer,
            "{},{:.3},{:.4},{:.4},{:.2},{},{},{:.3},{:.3},{},{:.4},{:.2}",
            s.step,
            s.state.time,
            s.state.pos.x,
            s.state.pos.y,
            wrap_pi(s.state.heading).to_degrees(),
            target,
            close_hauled,
            s.command.rudder.to_degrees(),
            s.command.max_sail.to_degrees(),
            tack,
            s.cross_track,
            s.wind.direction.to_degrees(),
        )?;
    }

    Ok(())
}

/// Write samples to a CSV file at the given path.
pub fn write_trajectory_file<P: AsRef<Path>>(path: P, samples: &[Sample]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_trajectory(&mut file, samples)
}
