//! Logging backend which writes to a file from a background thread, and
//! mirrors records over UDP in debug builds.

use chrono::Local;
use log::{Level, Metadata, Record};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::Write,
    net,
    path::{Path, PathBuf},
    sync::Mutex,
};

#[derive(Clone, Copy, Serialize, Deserialize)]
enum Severity {
    Normal,
    Error,
    Warning,
    Debug,
}

#[derive(Serialize, Deserialize)]
struct Message {
    module: String,
    severity: Severity,
    string: String,
    time: String,
}

impl Message {
    /// Length-prefixed bincode, for the UDP mirror.
    fn pack(&self) -> Option<Vec<u8>> {
        let serialized = bincode::serialize::<Message>(self).ok()?;

        let mut bytes = Vec::from(u32::to_le_bytes((serialized.len() as u32) + 4));
        bytes.extend(&serialized);

        Some(bytes)
    }

    fn write_to_file(&self, file: &mut File) {
        let level_name = match self.severity {
            Severity::Normal => "info",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Debug => "debug",
        };

        //      [date time] [module] [level] Text
        let _ = file.write_fmt(format_args!(
            "[{}] [{}] [{}] {}\n",
            self.time, self.module, level_name, self.string
        ));
    }
}

pub struct Logger;

impl Logger {
    fn commit(&self, record: &Record) {
        let severity = match record.level() {
            Level::Error => Severity::Error,
            Level::Warn => Severity::Warning,
            Level::Info => Severity::Normal,
            Level::Debug | Level::Trace => Severity::Debug,
        };

        let module = match record.module_path() {
            Some(path) => path.split("::").last().unwrap_or("unknown").to_string(),
            None => return,
        };

        let message = Message {
            module,
            severity,
            string: format!("{}", record.args()),
            time: Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
        };

        if let Some(Err(err)) = MSG_SENDER.get().map(|s| s.lock().map(|s| s.send(message))) {
            eprintln!("error in log sender chain: {err}");
        }
    }
}

impl log::Log for Logger {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.commit(record);
        }
    }

    fn flush(&self) {}
}

static LOGGER: Logger = Logger;
static MSG_SENDER: OnceCell<Mutex<std::sync::mpsc::Sender<Message>>> = OnceCell::new();
static PANIC_PATH: OnceCell<PathBuf> = OnceCell::new();

fn panic_hook(info: &std::panic::PanicInfo) {
    let message = info
        .payload()
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| info.payload().downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "no message".to_string());

    let time = Local::now();
    let backtrace = std::backtrace::Backtrace::force_capture();

    let info_dump = format!(
        "The patch layer panicked.

Message: {message}
Time: {time}
Backtrace: see below

{backtrace}"
    );

    log::error!("{info_dump}");

    if let Some(dir) = PANIC_PATH.get() {
        let _ = std::fs::write(dir.join("PANIC.txt"), info_dump);
    }
}

fn install_panic_hook() {
    // Record useful information rather than dying silently inside the host.
    std::panic::set_hook(Box::new(panic_hook));
}

/// Starts the logging backend, writing to `log.txt` inside `dir`. Call once,
/// before bring-up, so installation itself can log.
pub fn init(dir: &Path) {
    install_panic_hook();

    if log::set_logger(&LOGGER)
        .map(|_| log::set_max_level(log::LevelFilter::max()))
        .is_err()
    {
        log::warn!("logger was already initialised");
        return;
    }

    let (sender, receiver) = std::sync::mpsc::channel();

    if MSG_SENDER.set(Mutex::new(sender)).is_err() {
        log::warn!("log sender already exists");
        return;
    }

    let _ = PANIC_PATH.set(dir.to_path_buf());

    // Only attempt to mirror over UDP in debug mode.
    let socket = if cfg!(feature = "debug") {
        net::UdpSocket::bind("0.0.0.0:0").ok()
    } else {
        None
    };

    let mirror_addr =
        std::env::var("PATCHBAY_LOG_ADDR").unwrap_or_else(|_| "127.0.0.1:4568".to_string());

    let mut file = match File::create(dir.join("log.txt")) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("unable to create log file: {err}");
            return;
        }
    };

    // Receive log messages on a background thread so normal host code never
    // blocks on file or socket writes.
    std::thread::spawn(move || {
        while let Ok(msg) = receiver.recv() {
            msg.write_to_file(&mut file);

            if let Some(socket) = &socket {
                if let Some(bin) = msg.pack() {
                    let _ = socket.send_to(&bin, &mirror_addr);
                }
            }
        }
    });
}
