use std::io::{ErrorKind, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use sps30_device::{Device, Measurement, ShdlcError};
use tracing::{debug, info, warn};

use crate::cmd::{parse_duration, ConnectArgs, MeasureArgs};
use crate::exit::{io_error, shdlc_error, CliError, CliResult, SUCCESS};
use crate::output::{print_measurement, OutputFormat};

const WAIT_SLICE: Duration = Duration::from_millis(100);

pub fn run(args: MeasureArgs, conn: &ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    let interval = parse_duration(&args.interval)?;
    let mut device = conn.open()?;

    device
        .wakeup()
        .map_err(|err| shdlc_error("wake-up failed", err))?;
    if !args.no_start {
        device
            .start_measurement()
            .map_err(|err| shdlc_error("start-measurement failed", err))?;
        info!(port = device.get_ref().name(), "measurement started");
    }

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let result = poll(&mut device, interval, args.count, &running, |sample, m| {
        print_measurement(sample, m, format)
    });

    if !args.no_start {
        match device.stop_measurement() {
            Ok(()) => info!("measurement stopped"),
            Err(err) => warn!(error = %err, "stop-measurement failed"),
        }
    }

    let printed = result?;
    debug!(printed, "measurement loop finished");
    Ok(SUCCESS)
}

/// Read one sample per `interval` until `count` samples were emitted or
/// `running` is cleared. Frame and device errors skip the sample; a broken
/// transport ends the loop.
fn poll<T, F>(
    device: &mut Device<T>,
    interval: Duration,
    count: Option<u64>,
    running: &AtomicBool,
    mut emit: F,
) -> CliResult<u64>
where
    T: Read + Write,
    F: FnMut(u64, &Measurement),
{
    let mut printed = 0u64;
    while running.load(Ordering::SeqCst) {
        wait(interval, running);
        if !running.load(Ordering::SeqCst) {
            break;
        }

        match device.read_measurement() {
            Ok(measurement) => {
                printed += 1;
                emit(printed, &measurement);
                if count.is_some_and(|count| printed >= count) {
                    break;
                }
            }
            Err(ShdlcError::Io(err)) if err.kind() != ErrorKind::TimedOut => {
                return Err(io_error("read-measurement failed", err));
            }
            Err(err) => warn!(error = %err, "sample skipped"),
        }
    }
    Ok(printed)
}

fn wait(interval: Duration, running: &AtomicBool) {
    let deadline = Instant::now() + interval;
    while running.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        std::thread::sleep((deadline - now).min(WAIT_SLICE));
    }
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;

    use super::*;
    use crate::exit::TRANSPORT_ERROR;

    const EMPTY_MEASUREMENT: &str = "7e00030000fc7e";
    const SAMPLE: &str = "7e000300283fc00000401000004040000040840000412800004140000041480000414c0000415000003f000000717e";

    /// Delivers one queued frame per read, as a device answers one request.
    struct FakeUart {
        frames: VecDeque<Vec<u8>>,
        fail_reads: bool,
    }

    impl FakeUart {
        fn replying(frames: &[&str]) -> Self {
            let frames = frames
                .iter()
                .map(|hex| {
                    (0..hex.len())
                        .step_by(2)
                        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).unwrap())
                        .collect()
                })
                .collect();
            Self {
                frames,
                fail_reads: false,
            }
        }
    }

    impl Read for FakeUart {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.fail_reads {
                return Err(io::Error::new(ErrorKind::BrokenPipe, "adapter unplugged"));
            }
            match self.frames.pop_front() {
                Some(frame) => {
                    buf[..frame.len()].copy_from_slice(&frame);
                    Ok(frame.len())
                }
                None => Ok(0),
            }
        }
    }

    impl Write for FakeUart {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn skips_empty_sample_and_stops_at_count() {
        let mut device = Device::new(FakeUart::replying(&[EMPTY_MEASUREMENT, SAMPLE, SAMPLE]));
        let running = AtomicBool::new(true);
        let mut seen = Vec::new();

        let printed = poll(
            &mut device,
            Duration::from_millis(1),
            Some(2),
            &running,
            |sample, m| seen.push((sample, m.mass_pm2_5)),
        )
        .unwrap();

        assert_eq!(printed, 2);
        assert_eq!(seen, vec![(1, 2.25), (2, 2.25)]);
    }

    #[test]
    fn cleared_flag_stops_before_reading() {
        let mut device = Device::new(FakeUart::replying(&[SAMPLE]));
        let running = AtomicBool::new(false);

        let printed = poll(&mut device, Duration::from_millis(1), None, &running, |_, _| {
            panic!("no sample expected")
        })
        .unwrap();
        assert_eq!(printed, 0);
    }

    #[test]
    fn broken_transport_ends_loop() {
        let mut uart = FakeUart::replying(&[]);
        uart.fail_reads = true;
        let mut device = Device::new(uart);
        let running = AtomicBool::new(true);

        let err = poll(&mut device, Duration::from_millis(1), None, &running, |_, _| {}).unwrap_err();
        assert_eq!(err.code, TRANSPORT_ERROR);
    }
}
