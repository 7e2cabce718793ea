//! Line-oriented snapshot recorder
//!
//! Contract with the downstream visualization/analysis tooling: one
//! `"<time> - <totalFlow>"` header per sample (time to 4 decimals),
//! followed by one `x,y,vx,vy,radius` line per grain in id order, all
//! fields to 8 decimals. Field order and precision are load-bearing.
//!
//! Write failures are fatal for the run; the underlying file is released
//! on every exit path because the writer owns it.

use silo_sim::Snapshot;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub struct Recorder<W: Write> {
    writer: W,
}

impl Recorder<BufWriter<File>> {
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Recorder::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> Recorder<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Serialize one sampled snapshot.
    pub fn record(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        writeln!(self.writer, "{:.4} - {}", snapshot.time, snapshot.total_flow)?;
        for grain in snapshot.grains {
            writeln!(
                self.writer,
                "{:.8},{:.8},{:.8},{:.8},{:.8}",
                grain.position.x,
                grain.position.y,
                grain.velocity.x,
                grain.velocity.y,
                grain.radius
            )?;
        }
        Ok(())
    }

    /// Flush buffered output. Call at the end of a successful run; on the
    /// error paths dropping the writer releases the file.
    pub fn finish(mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use silo_sim::{Beeman, Grain, Silo, SiloParams};

    /// Single grain, single step, known constants: the first force sample
    /// is pure gravity, so Beeman collapses to the exact parabola.
    #[test]
    fn single_grain_single_step_output() {
        let params = SiloParams::default();
        let mut silo = Silo::new(params, 11).unwrap();
        silo.add_grain(Grain::new(0, DVec2::new(0.1, 0.5), 0.01));

        let dt = 1e-4;
        let mut integrator = Beeman::new(silo, dt, 1.0, params.mass);

        let mut buffer: Vec<u8> = Vec::new();
        {
            let mut recorder = Recorder::new(&mut buffer);
            let snapshot = integrator.advance().unwrap();
            recorder.record(&snapshot).unwrap();
            recorder.finish().unwrap();
        }

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("0.0001 - 0"), "header is time - totalFlow");

        let row = lines.next().expect("one line per grain");
        let y = 0.5 - 0.5 * params.gravity * dt * dt;
        let vy = -params.gravity * dt;
        let expected = format!("{:.8},{:.8},{:.8},{:.8},{:.8}", 0.1, y, 0.0, vy, 0.01);
        assert_eq!(row, expected);
        assert_eq!(lines.next(), None, "exactly one grain line");
    }

    #[test]
    fn grains_are_written_in_id_order() {
        let params = SiloParams {
            amplitude: 0.0,
            ..SiloParams::default()
        };
        let mut silo = Silo::new(params, 2).unwrap();
        silo.add_grain(Grain::new(0, DVec2::new(0.05, 0.50), 0.01));
        silo.add_grain(Grain::new(1, DVec2::new(0.15, 0.40), 0.01));
        let mut integrator = Beeman::new(silo, 1e-4, 1.0, params.mass);
        let snapshot = integrator.advance().unwrap();

        let mut buffer: Vec<u8> = Vec::new();
        let mut recorder = Recorder::new(&mut buffer);
        recorder.record(&snapshot).unwrap();
        recorder.finish().unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let rows: Vec<&str> = text.lines().skip(1).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("0.05"), "grain 0 first: {}", rows[0]);
        assert!(rows[1].starts_with("0.15"), "grain 1 second: {}", rows[1]);
    }
}
