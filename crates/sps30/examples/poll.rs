//! Minimal poll loop: wake the sensor, print ten samples, put it back to sleep.
//!
//! Run with:
//!   cargo run --example poll -- /dev/ttyUSB0
//!
//! The port defaults to `SPS30_PORT` when no argument is given.

use std::thread;
use std::time::Duration;

use sps30::{ShdlcError, SerialConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let port = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SPS30_PORT").ok())
        .ok_or("usage: poll <serial-port>")?;

    let mut sensor = sps30::open(&port, &SerialConfig::default())?;
    sensor.wakeup()?;
    eprintln!("Connected to {port}: {}", sensor.read_version()?);

    sensor.start_measurement()?;
    let mut printed = 0;
    while printed < 10 {
        thread::sleep(Duration::from_secs(1));
        match sensor.read_measurement() {
            Ok(m) => {
                printed += 1;
                println!(
                    "PM1.0 {:6.2}  PM2.5 {:6.2}  PM4.0 {:6.2}  PM10 {:6.2} µg/m³  size {:.2} µm",
                    m.mass_pm1_0, m.mass_pm2_5, m.mass_pm4_0, m.mass_pm10_0, m.typical_particle_size
                );
            }
            // The first second after start has no data yet.
            Err(err @ ShdlcError::UnexpectedResponseLength { .. }) => eprintln!("skipped: {err}"),
            Err(err) => return Err(err.into()),
        }
    }

    sensor.stop_measurement()?;
    sensor.sleep()?;
    Ok(())
}
