//! # zplgfa CLI
//!
//! Convert an image into a ZPL Graphic Field and print it or send it to a
//! Zebra printer.
//!
//! ```bash
//! # Write compressed ZPL to stdout
//! zplgfa --file logo.png
//!
//! # Invert, scale down and send to the printer
//! zplgfa --file logo.png --edit invert --resize 0.5 --ip 192.168.1.50 --send
//!
//! # Ask the printer for its status
//! zplgfa --ip 192.168.1.50 --status
//! ```

use clap::Parser;
use log::{debug, error, info, warn};
use std::{io::Write, path::PathBuf, process::ExitCode};

use zplgfa::{
    apply_edits, convert_to_zpl, flatten, resize, Config, Edit, Error, GraphicType, Printer,
    DEFAULT_PORT,
};

/// zplgfa - convert images to ZPL Graphic Fields
#[derive(Parser, Debug)]
#[command(name = "zplgfa")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Image file to convert to ZPL
    #[arg(long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Graphic field encoding: ascii, binary or compressed-ascii
    #[arg(long = "type", default_value = "compressed-ascii")]
    graphic_type: GraphicType,

    /// Manipulate the image: invert, monochrome, blur, edge, segment
    #[arg(long, default_value = "")]
    edit: String,

    /// Zoom/resize the image by this factor
    #[arg(long, default_value_t = 1.0)]
    resize: f64,

    /// Printer IP address or host name
    #[arg(long)]
    ip: Option<String>,

    /// Printer port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Send the converted image to the printer instead of stdout
    #[arg(long)]
    send: bool,

    /// Feed one label
    #[arg(long)]
    feed: bool,

    /// Calibrate the media sensor
    #[arg(long)]
    calib: bool,

    /// Cancel all queued formats
    #[arg(long)]
    cancel: bool,

    /// Print host identification and status
    #[arg(long)]
    info: bool,

    /// Print parsed printer status
    #[arg(long)]
    status: bool,

    /// Print the printer configuration
    #[arg(long)]
    config: bool,

    /// Print the printer diagnostics
    #[arg(long)]
    diag: bool,
}

impl Cli {
    fn printer(&self) -> Result<Printer, Error> {
        match &self.ip {
            Some(ip) => Printer::new(Config::new(ip.as_str()).port(self.port)),
            None => Err(Error::InvalidConfig(
                "--ip is required to talk to a printer".to_string(),
            )),
        }
    }

    fn needs_printer(&self) -> bool {
        self.send
            || self.feed
            || self.calib
            || self.cancel
            || self.info
            || self.status
            || self.config
            || self.diag
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}:{}] {} - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.level(),
                record.args()
            )
        })
        .init();

    let cli = Cli::parse();
    debug!("{:?}", cli);

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, Error> {
    let printer = if cli.needs_printer() {
        Some(cli.printer()?)
    } else {
        None
    };

    if let Some(printer) = &printer {
        if cli.cancel {
            printer.cancel()?;
        }
        if cli.calib {
            printer.calibrate()?;
        }
        if cli.feed {
            printer.feed()?;
        }
        if cli.info {
            print!("{}", printer.info()?);
        }
        if cli.status {
            let status = printer.check_status()?;
            println!("{:#?}", status);
            for err in status.errors() {
                warn!("printer reports: {}", err);
            }
        }
        if cli.config {
            print!("{}", printer.config()?);
        }
        if cli.diag {
            print!("{}", printer.diagnostics()?);
        }
    }

    let file = match &cli.file {
        Some(file) => file,
        None => {
            if printer.is_none() {
                warn!("nothing to do, pass --file or a printer action");
                return Ok(ExitCode::FAILURE);
            }
            return Ok(ExitCode::SUCCESS);
        }
    };

    let edits = Edit::parse_list(&cli.edit)?;
    let img = image::open(file)?;
    debug!("decoded {:?}: {}x{}", file, img.width(), img.height());

    let img = apply_edits(img, &edits);
    let img = resize(img, cli.resize)?;

    let flat = flatten(&img);
    let zpl = convert_to_zpl(&flat, cli.graphic_type);
    if zpl.is_empty() {
        warn!(
            "{:?} is {} pixels wide, at least 8 are needed",
            file,
            flat.width()
        );
        return Ok(ExitCode::FAILURE);
    }

    match (&printer, cli.send) {
        (Some(printer), true) => printer.send(&zpl)?,
        _ => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            out.write_all(&zpl)?;
            out.flush()?;
        }
    }
    info!("converted {:?} to {} bytes of {} ZPL", file, zpl.len(), cli.graphic_type);

    Ok(ExitCode::SUCCESS)
}
