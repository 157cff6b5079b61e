use std::io::{self, Write};
use std::path::Path;

use crate::dynamics::state::State;

/// Write a state sequence to CSV format, in the order given.
///
/// Columns: time, pos_x, pos_z, vel_x, vel_z, mass
pub fn write_trajectory<'a, W, I>(writer: &mut W, states: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a State>,
{
    writeln!(writer, "time,pos_x,pos_z,vel_x,vel_z,mass")?;

    for s in states {
        writeln!(
            writer,
            "{:.4},{:.4},{:.4},{:.4},{:.4},{:.4}",
            s.time, s.pos.x, s.pos.y, s.vel.x, s.vel.y, s.mass,
        )?;
    }

    Ok(())
}

/// Write a state sequence to a CSV file at the given path.
pub fn write_trajectory_file<'a, I>(path: impl AsRef<Path>, states: I) -> io::Result<()>
where
    I: IntoIterator<Item = &'a State>,
{
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_trajectory(&mut file, states)?;
    file.flush()
}
