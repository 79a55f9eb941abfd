//! at-probe: identify an AT modem on a serial port, or send it one command.

use std::time::Duration;

use anyhow::{anyhow, bail};
use at_command::{
    identity::{identify, DeviceIdentity},
    Command, Config, FramingConvention, TransactionEngine, WatchdogConfig,
    DEFAULT_RESPONSE_CAPACITY,
};
use clap::Parser;

mod observer;
mod serial;

use observer::TracingObserver;
use serial::{SerialTransport, ThreadDelay};

#[derive(Parser, Debug)]
#[command(
    name = "at-probe",
    version,
    about = "Identify an AT command modem attached to a serial port",
    long_about = None
)]
struct Cli {
    /// Serial port (e.g., /dev/ttyUSB0, COM3)
    port: String,

    /// Baud rate
    #[arg(short, long, default_value_t = 9600)]
    baud: u32,

    /// Attempts per command
    #[arg(short, long, default_value_t = 3)]
    repeat: u8,

    /// Delay between attempts in milliseconds
    #[arg(long, default_value_t = 500)]
    retry_delay_ms: u32,

    /// Delay between identification cycles in milliseconds
    #[arg(long, default_value_t = 10_000)]
    interval_ms: u64,

    /// Silent polls tolerated before a response is considered complete
    #[arg(long, default_value_t = WatchdogConfig::DEFAULT.ticks)]
    watchdog_ticks: u32,

    /// Keep the space after the colon of data replies
    #[arg(long)]
    colon_only: bool,

    /// Run a single identification cycle
    #[arg(long)]
    once: bool,

    /// Send this command instead of identifying (e.g., "AT+CSQ")
    #[arg(short, long)]
    command: Option<String>,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            watchdog: WatchdogConfig {
                ticks: self.watchdog_ticks,
                ..WatchdogConfig::DEFAULT
            },
            framing: if self.colon_only {
                FramingConvention::COLON_ONLY
            } else {
                FramingConvention::DEFAULT
            },
        }
    }
}

/// Terminate a command typed on the command line.
fn frame(text: &str) -> String {
    let text = text.trim_end_matches(['\r', '\n']);

    format!("{text}\r\n")
}

fn report(identity: &DeviceIdentity) {
    if !identity.responsive {
        tracing::warn!("device did not acknowledge AT");
    }

    tracing::info!(
        manufacturer = identity.manufacturer.as_deref(),
        model = identity.model.as_deref(),
        revision = identity.revision.as_deref(),
        serial_number = identity.serial_number.as_deref(),
        "device identified"
    );
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    tracing::info!(port = %cli.port, baud = cli.baud, "opening serial port");

    let transport = SerialTransport::open(&cli.port, cli.baud)?;

    let mut engine =
        TransactionEngine::<_, _, _, DEFAULT_RESPONSE_CAPACITY>::new(transport, ThreadDelay)
            .with_config(cli.config())
            .with_observer(TracingObserver);

    if let Some(text) = &cli.command {
        let text = frame(text);
        let command = Command::new(&text).map_err(|_| anyhow!("commands must begin with AT"))?;
        let mut output = [0u8; 256];

        let Some(result) =
            engine.transact_until(&command, &mut output, cli.repeat, cli.retry_delay_ms, |result| {
                result.success
            })
        else {
            bail!("{} was not acknowledged", text.trim_end());
        };

        if let Some(payload) = result.payload(&output) {
            println!("{}", String::from_utf8_lossy(payload));
        }

        return Ok(());
    }

    loop {
        report(&identify(&mut engine, cli.repeat, cli.retry_delay_ms));

        if cli.once {
            break Ok(());
        }

        std::thread::sleep(Duration::from_millis(cli.interval_ms));
    }
}
