use log::{debug, info};
use std::{
    io::{self, BufRead, BufReader, Write},
    net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs},
    sync::mpsc::{self, RecvTimeoutError},
    thread,
    time::{Duration, Instant},
};

use crate::{error::Error, status::Status, DEFAULT_PORT};

/// Every command is terminated by an empty line.
const TERMINATOR: &[u8] = b"\r\n\r\n";

const FEED: &str = "^xa^aa^fd ^fs^xz";
const CALIBRATE: &str = "~jc^xa^jus^xz";
const CANCEL: &str = "~ja";
const HOST_IDENTIFICATION: &str = "~HI";
const HOST_STATUS: &str = "~HS";
const CONFIGURATION: &str = "^XA^HH^XZ";
const DIAGNOSTICS: &str = "~HD";

pub struct Printer {
    address: SocketAddr,
    config: Config,
}

impl Printer {
    pub fn new(config: Config) -> Result<Self, Error> {
        let target = format!("{}:{}", config.host, config.port);
        let addresses: Vec<SocketAddr> = match (config.host.as_str(), config.port).to_socket_addrs() {
            Ok(addresses) => addresses.collect(),
            Err(err) => {
                debug!("{:?}", err);
                return Err(Error::InvalidAddress(target));
            }
        };

        // Printers are usually only reachable over IPv4.
        let address = match addresses.iter().find(|a| a.is_ipv4()).or_else(|| addresses.first()) {
            Some(address) => *address,
            None => return Err(Error::InvalidAddress(target)),
        };
        debug!("resolved {} to {}", target, address);

        Ok(Printer { address, config })
    }

    fn connect(&self) -> Result<TcpStream, Error> {
        let stream = TcpStream::connect_timeout(&self.address, self.config.timeout)?;
        stream.set_write_timeout(Some(self.config.timeout))?;
        stream.set_read_timeout(Some(self.config.timeout))?;
        debug!("connected to {}", self.address);
        Ok(stream)
    }

    fn write(stream: &mut TcpStream, data: &[u8]) -> Result<(), Error> {
        let mut buf: Vec<u8> = Vec::with_capacity(data.len() + TERMINATOR.len());
        buf.extend_from_slice(data);
        buf.extend_from_slice(TERMINATOR);
        stream.write_all(&buf)?;
        stream.flush()?;
        Ok(())
    }

    fn read_line(reader: &mut impl BufRead) -> Result<String, Error> {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => Err(Error::InvalidResponse("connection closed".to_string())),
            Ok(_) => Ok(line),
            Err(err) if matches!(err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                Err(Error::ReadStatusTimeout)
            }
            Err(err) => Err(Error::Io(err)),
        }
    }

    /// Send a job or control command to the printer.
    ///
    /// The data is written unmodified, so binary Graphic Fields pass through.
    pub fn send(&self, data: &[u8]) -> Result<(), Error> {
        let mut stream = self.connect()?;
        Self::write(&mut stream, data)?;
        info!("sent {} bytes to {}", data.len(), self.address);
        Ok(())
    }

    /// Feed one blank label.
    pub fn feed(&self) -> Result<(), Error> {
        self.send(FEED.as_bytes())
    }

    /// Measure the media length.
    pub fn calibrate(&self) -> Result<(), Error> {
        self.send(CALIBRATE.as_bytes())
    }

    /// Cancel all formats in the receive buffer.
    pub fn cancel(&self) -> Result<(), Error> {
        self.send(CANCEL.as_bytes())
    }

    /// Read host identification followed by the raw host status.
    pub fn info(&self) -> Result<String, Error> {
        let mut stream = self.connect()?;
        let mut reader = BufReader::new(stream.try_clone()?);

        Self::write(&mut stream, HOST_IDENTIFICATION.as_bytes())?;
        let mut info = Self::read_line(&mut reader)?;

        Self::write(&mut stream, HOST_STATUS.as_bytes())?;
        for _ in 0..3 {
            info.push_str(&Self::read_line(&mut reader)?);
        }
        Ok(info)
    }

    /// Read printer status.
    ///
    /// Use [`Status::check`] to turn reported faults into an error.
    pub fn check_status(&self) -> Result<Status, Error> {
        let mut stream = self.connect()?;
        let mut reader = BufReader::new(stream.try_clone()?);

        Self::write(&mut stream, HOST_STATUS.as_bytes())?;
        let mut response = String::new();
        for _ in 0..3 {
            response.push_str(&Self::read_line(&mut reader)?);
        }
        debug!("Raw status: {:?}", response);

        let status = Status::from_response(&response)?;
        debug!("Parsed Status struct: {:?}", status);
        Ok(status)
    }

    /// Print the configuration label and return its text.
    pub fn config(&self) -> Result<String, Error> {
        self.terminal_output(CONFIGURATION)
    }

    /// Enter diagnostics and return the printer's report.
    pub fn diagnostics(&self) -> Result<String, Error> {
        self.terminal_output(DIAGNOSTICS)
    }

    /// Send `command` and collect lines until the printer goes quiet.
    ///
    /// The printer gives no end marker for these reports. Lines are read on a
    /// background thread and the response ends once nothing arrived for
    /// `quiet_period`, checked every `poll_interval`.
    fn terminal_output(&self, command: &str) -> Result<String, Error> {
        let mut stream = self.connect()?;
        let reader = BufReader::new(stream.try_clone()?);
        Self::write(&mut stream, command.as_bytes())?;

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
        });

        let mut output = String::new();
        let mut last_input: Option<Instant> = None;
        loop {
            match rx.recv_timeout(self.config.poll_interval) {
                Ok(line) => {
                    output.push_str(&line);
                    output.push('\n');
                    last_input = Some(Instant::now());
                }
                Err(RecvTimeoutError::Timeout) => {
                    let quiet = last_input.map_or(true, |t| t.elapsed() > self.config.quiet_period);
                    if quiet {
                        break;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        debug!("read {} bytes of terminal output", output.len());

        // Unblocks the reader thread.
        stream.shutdown(Shutdown::Both).ok();
        Ok(output)
    }
}

/// Config
///
#[derive(Debug, Clone)]
pub struct Config {
    host: String,
    port: u16,
    timeout: Duration,
    poll_interval: Duration,
    quiet_period: Duration,
}

impl Config {
    /// Initialize configuration data with default values.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use zplgfa::Config;
    ///
    /// let config = Config::new("192.168.1.50")
    ///     .port(6101)
    ///     .timeout(Duration::from_secs(3));
    /// ```
    ///
    pub fn new(host: impl Into<String>) -> Config {
        Config {
            host: host.into(),
            port: DEFAULT_PORT,
            timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(300),
            quiet_period: Duration::from_millis(50),
        }
    }

    pub fn port(self, port: u16) -> Self {
        Config { port, ..self }
    }

    /// Connect, read and write timeout.
    pub fn timeout(self, timeout: Duration) -> Self {
        Config { timeout, ..self }
    }

    pub fn poll_interval(self, poll_interval: Duration) -> Self {
        Config {
            poll_interval,
            ..self
        }
    }

    pub fn quiet_period(self, quiet_period: Duration) -> Self {
        Config {
            quiet_period,
            ..self
        }
    }
}
