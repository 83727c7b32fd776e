//! PTY (pseudo-terminal) handling with portable-pty.
//!
//! A spawned PTY exposes a single ordered event stream: every chunk of
//! process output arrives as `PtyEvent::Data`, and `PtyEvent::Exited` is
//! delivered exactly once, after the last data chunk. The reader thread
//! drains the master side to EOF before waiting on the child, which is
//! what makes the session layer's wait-then-flush ordering sound.

use std::io::{Read, Write};
use std::sync::Mutex;

use portable_pty::{native_pty_system, ChildKiller, CommandBuilder, MasterPty, PtySize};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use termview_core::{Dimensions, Error, Result, SpawnSpec};

/// Event emitted by a spawned PTY.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PtyEvent {
    /// Output bytes from the child process, in arrival order
    Data(Vec<u8>),
    /// The child exited with this code; sent exactly once, after all data
    Exited(i32),
}

/// Handle to a spawned PTY process.
pub struct PtyHandle {
    /// Master end, kept for resize
    master: Mutex<Box<dyn MasterPty + Send>>,
    /// Write end of the PTY
    writer: Mutex<Box<dyn Write + Send>>,
    /// Killer cloned from the child before it moved to the reader thread
    killer: Mutex<Box<dyn ChildKiller + Send + Sync>>,
    /// Child process id
    pid: u32,
    /// Current PTY dimensions
    dimensions: Mutex<Dimensions>,
    /// Event stream, taken once by the session layer
    events: Mutex<Option<mpsc::UnboundedReceiver<PtyEvent>>>,
}

impl std::fmt::Debug for PtyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PtyHandle")
            .field("pid", &self.pid)
            .field("dimensions", &self.dimensions)
            .finish_non_exhaustive()
    }
}

impl PtyHandle {
    /// Spawn a new PTY running the given command at the given size.
    ///
    /// Extra environment variables from the spec are merged over the
    /// inherited environment; the working directory is inherited unless
    /// set in the spec.
    pub fn spawn(spec: &SpawnSpec, dimensions: Dimensions) -> Result<Self> {
        info!(
            "Spawning PTY: shell='{}' args={:?}, dimensions={}x{}, cwd={:?}",
            spec.shell, spec.args, dimensions.rows, dimensions.cols, spec.cwd
        );

        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize {
                rows: dimensions.rows,
                cols: dimensions.cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| {
                error!("Failed to open PTY: {}", e);
                Error::SpawnFailure(format!("failed to open PTY: {e}"))
            })?;

        let mut cmd = CommandBuilder::new(&spec.shell);
        for arg in &spec.args {
            cmd.arg(arg);
        }
        if let Some(dir) = &spec.cwd {
            cmd.cwd(dir);
        }
        for (key, value) in &spec.env {
            cmd.env(key, value);
        }

        let mut child = pair.slave.spawn_command(cmd).map_err(|e| {
            error!("Failed to spawn '{}': {}", spec.shell, e);
            Error::SpawnFailure(format!("failed to spawn '{}': {e}", spec.shell))
        })?;
        // Dropping the slave here is required so the master sees EOF when
        // the child exits.
        drop(pair.slave);

        let killer = child.clone_killer();
        let pid = child.process_id().unwrap_or(0);

        let writer = pair.master.take_writer().map_err(|e| {
            Error::SpawnFailure(format!("failed to take PTY writer: {e}"))
        })?;
        let mut reader = pair.master.try_clone_reader().map_err(|e| {
            Error::SpawnFailure(format!("failed to clone PTY reader: {e}"))
        })?;

        let (tx, rx) = mpsc::unbounded_channel();

        // Reader thread: drain to EOF, then reap the child. Sending the
        // exit event last guarantees it is ordered behind every data chunk.
        std::thread::spawn(move || {
            let mut buffer = vec![0u8; 4096];
            loop {
                match reader.read(&mut buffer) {
                    Ok(0) => break,
                    Ok(n) => {
                        if tx.send(PtyEvent::Data(buffer[..n].to_vec())).is_err() {
                            // Receiver dropped; keep reaping the child below.
                            break;
                        }
                    }
                    // EIO on Linux once the slave side closes.
                    Err(_) => break,
                }
            }

            let code = match child.wait() {
                Ok(status) => status.exit_code() as i32,
                Err(e) => {
                    warn!("Failed to wait for child (pid {}): {}", pid, e);
                    -1
                }
            };
            debug!("PTY child {} exited with code {}", pid, code);
            let _ = tx.send(PtyEvent::Exited(code));
        });

        info!("PTY spawned: shell='{}', pid={}", spec.shell, pid);

        Ok(Self {
            master: Mutex::new(pair.master),
            writer: Mutex::new(writer),
            killer: Mutex::new(killer),
            pid,
            dimensions: Mutex::new(dimensions),
            events: Mutex::new(Some(rx)),
        })
    }

    /// Take the event stream. Returns `None` after the first call.
    pub fn take_events(&self) -> Option<mpsc::UnboundedReceiver<PtyEvent>> {
        self.events.lock().unwrap().take()
    }

    /// Child process id.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Write bytes verbatim to the PTY.
    pub fn write(&self, data: &[u8]) -> Result<usize> {
        debug!("Writing {} bytes to PTY (pid {})", data.len(), self.pid);
        let mut writer = self.writer.lock().unwrap();
        writer.write_all(data).map_err(Error::Io)?;
        writer.flush().map_err(Error::Io)?;
        Ok(data.len())
    }

    /// Resize the PTY; the child is notified via SIGWINCH.
    pub fn resize(&self, new_dimensions: Dimensions) -> Result<()> {
        info!(
            "Resizing PTY (pid {}) to {}x{}",
            self.pid, new_dimensions.rows, new_dimensions.cols
        );
        self.master
            .lock()
            .unwrap()
            .resize(PtySize {
                rows: new_dimensions.rows,
                cols: new_dimensions.cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| Error::Other(format!("PTY resize failed: {e}")))?;

        *self.dimensions.lock().unwrap() = new_dimensions;
        Ok(())
    }

    /// Current PTY dimensions.
    pub fn dimensions(&self) -> Dimensions {
        *self.dimensions.lock().unwrap()
    }

    /// Kill the child process. Safe to call after the child has exited.
    pub fn kill(&self) -> Result<()> {
        info!("Killing PTY child (pid {})", self.pid);
        match self.killer.lock().unwrap().kill() {
            Ok(()) => Ok(()),
            // Already-dead children report errors on some platforms.
            Err(e) => {
                debug!("Kill for pid {} reported: {}", self.pid, e);
                Ok(())
            }
        }
    }
}
