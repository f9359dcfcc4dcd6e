use anyhow::Result;
use std::fmt;
use std::path::Path;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::mpsc::{
    self, error::TryRecvError, Receiver, Sender, UnboundedReceiver, UnboundedSender,
};
use tokio::sync::oneshot;
use tokio::time;

use crate::caller::Caller;
use crate::config::FileLoggerConfig;
use crate::level::{parse_level, Level};
use crate::log_file::LogFiles;
use crate::record::Record;
use crate::Logger;

pub const QUEUE_CAPACITY: usize = 50_000;
pub const IDLE_INTERVAL: Duration = Duration::from_millis(500);

enum Ctrl {
    Flush(oneshot::Sender<()>),
    Terminate,
}

/// File backend that hands records to a single background writer.
///
/// Logging never blocks: records go into a bounded queue with `try_send` and
/// are dropped (and counted) when the queue is full. One thread named
/// `log writer` owns both files for the lifetime of the logger; it routes each
/// record to `<base>.log` or `<base>-error.log`, and cuts a file once its size
/// reaches `max_file_size`. The size is checked before every write, so a burst
/// of large lines just over the limit cuts on every line.
pub struct FileLogger {
    level: Level,
    writer: Sender<Record>,
    controller: UnboundedSender<Ctrl>,
    dropped: Arc<AtomicU64>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl FileLogger {
    pub fn new(
        level: &str,
        directory: impl AsRef<Path>,
        file_name: &str,
        max_file_size: u64,
    ) -> Result<FileLogger> {
        let config = FileLoggerConfig::new(
            parse_level(level)?,
            directory.as_ref(),
            file_name,
            max_file_size,
        );
        FileLogger::from_config(&config)
    }

    pub fn from_config(config: &FileLoggerConfig) -> Result<FileLogger> {
        config.validate()?;
        let files = LogFiles::open(&config.directory, &config.file_name, config.max_file_size)?;
        let (writer, writer_rx) = mpsc::channel::<Record>(config.queue_capacity);
        let (controller, controller_rx) = mpsc::unbounded_channel::<Ctrl>();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        let idle = config.idle_interval();
        let handle = thread::Builder::new()
            .name("log writer".to_string())
            .spawn(move || {
                runtime.block_on(drain(files, writer_rx, controller_rx, idle));
            })?;
        log::debug!(
            "log writer started: {}",
            config.directory.join(&config.file_name).display()
        );
        Ok(FileLogger {
            level: config.level,
            writer,
            controller,
            dropped: Arc::new(AtomicU64::new(0)),
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Records lost to a full queue or a stopped writer.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Blocks until every record queued before this call has been written.
    /// Inside an async runtime the request is sent without waiting.
    pub fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.controller.send(Ctrl::Flush(tx)).is_err() {
            return;
        }
        if tokio::runtime::Handle::try_current().is_err() {
            let _ = rx.blocking_recv();
        }
    }

    /// Writes out what is queued, closes the files and stops the writer.
    /// Records logged afterwards are dropped.
    pub fn shutdown(&self) {
        let handle = match self.handle.lock() {
            Ok(mut handle) => handle.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        let Some(handle) = handle else {
            return;
        };
        let _ = self.controller.send(Ctrl::Terminate);
        if handle.join().is_err() {
            eprintln!("log writer panicked");
        }
        let dropped = self.dropped_count();
        if dropped > 0 {
            log::warn!("log writer stopped, {} records dropped", dropped);
        } else {
            log::debug!("log writer stopped");
        }
    }
}

impl Logger for FileLogger {
    fn min_level(&self) -> Level {
        self.level
    }

    fn log(&self, level: Level, caller: Caller<'_>, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        let record = Record::new(level, caller, args);
        if self.writer.try_send(record).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn flush(&self) {
        FileLogger::flush(self);
    }
}

impl Drop for FileLogger {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn drain(
    mut files: LogFiles,
    mut records: Receiver<Record>,
    mut controller: UnboundedReceiver<Ctrl>,
    idle: Duration,
) {
    loop {
        match controller.try_recv() {
            Ok(ctrl) => {
                if handle_ctrl(ctrl, &mut files, &mut records) {
                    break;
                }
                continue;
            }
            Err(TryRecvError::Disconnected) => {
                drain_pending(&mut files, &mut records);
                break;
            }
            Err(TryRecvError::Empty) => {}
        }
        match records.try_recv() {
            Ok(record) => write(&mut files, &record),
            Err(TryRecvError::Empty) => {
                tokio::select! {
                    Some(ctrl) = controller.recv() => {
                        if handle_ctrl(ctrl, &mut files, &mut records) {
                            break;
                        }
                    },
                    _ = time::sleep(idle) => {},
                }
            }
            Err(TryRecvError::Disconnected) => break,
        }
    }
    files.flush();
}

fn handle_ctrl(ctrl: Ctrl, files: &mut LogFiles, records: &mut Receiver<Record>) -> bool {
    drain_pending(files, records);
    files.flush();
    match ctrl {
        Ctrl::Flush(ack) => {
            let _ = ack.send(());
            false
        }
        Ctrl::Terminate => true,
    }
}

fn drain_pending(files: &mut LogFiles, records: &mut Receiver<Record>) {
    while let Ok(record) = records.try_recv() {
        write(files, &record);
    }
}

fn write(files: &mut LogFiles, record: &Record) {
    if let Err(err) = files.write(record) {
        // Nothing can be written any more.
        eprintln!("{:#}", err);
        process::abort();
    }
}
