//! PTY-backed terminal session.
//!
//! A session moves through three states: it is created without a
//! process, a PTY is spawned into it, and the process eventually exits.
//! Destruction is orthogonal and can happen in any state.
//!
//! All PTY output flows through a single FIFO job queue before it
//! reaches the grid. A flush enqueues a no-op job behind everything
//! already queued, so once the flush completes, every output chunk
//! received before the flush request is visible in snapshots.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use termview_core::{
    CellRecord, Dimensions, Error, Result, SessionId, SessionSummary, SpawnSpec,
};
use termview_emulator::{Grid, Interpreter, PtyBackend, PtyEvent, PtyHandle};

use crate::snapshot;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No process yet
    Created,
    /// Process running in a PTY
    Spawned,
    /// Process has exited (grid remains readable)
    Exited,
}

/// Unit of work on the session's ordered output pipeline.
enum Job {
    /// Output bytes to apply to the grid
    Data(Vec<u8>),
    /// Synchronization barrier; acknowledged once everything queued
    /// before it has been applied
    Flush(oneshot::Sender<()>),
    /// Resize the live grid
    Resize(Dimensions),
    /// Process exit, always the last job originating from the PTY
    Exited(i32),
}

/// A PTY-backed terminal session.
///
/// The snapshot window is fixed at construction: `cell_grid` and `text`
/// always return `dimensions.rows x dimensions.cols`, even after the
/// live grid has been resized.
pub struct TerminalSession {
    /// Session identifier
    id: SessionId,

    /// Snapshot window, fixed at construction
    dimensions: Dimensions,

    /// Terminal grid and escape-sequence interpreter
    interpreter: Arc<Mutex<Interpreter>>,

    /// PTY handle, present once spawned
    pty: Mutex<Option<Arc<PtyHandle>>>,

    /// Sender side of the job queue, present once spawned
    jobs: Mutex<Option<mpsc::UnboundedSender<Job>>>,

    /// Exit notifier sender, moved into the pump task at spawn
    exit_tx: Mutex<Option<watch::Sender<Option<i32>>>>,

    /// Exit notifier; every waiter observes the same code
    exit_rx: watch::Receiver<Option<i32>>,

    /// Destroyed flag, set once
    destroyed: AtomicBool,
}

impl std::fmt::Debug for TerminalSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalSession")
            .field("id", &self.id)
            .field("dimensions", &self.dimensions)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl TerminalSession {
    /// Create a new session with no process.
    pub fn new(id: SessionId, dimensions: Dimensions) -> Self {
        info!(
            "Creating session {}: dimensions={}x{}",
            id, dimensions.rows, dimensions.cols
        );
        let (exit_tx, exit_rx) = watch::channel(None);

        Self {
            id,
            dimensions,
            interpreter: Arc::new(Mutex::new(Interpreter::new(Grid::new(dimensions)))),
            pty: Mutex::new(None),
            jobs: Mutex::new(None),
            exit_tx: Mutex::new(Some(exit_tx)),
            exit_rx,
            destroyed: AtomicBool::new(false),
        }
    }

    /// Session identifier.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Snapshot window dimensions (fixed at construction).
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        if self.exit_code().is_some() {
            SessionState::Exited
        } else if self.pty.lock().unwrap().is_some() {
            SessionState::Spawned
        } else {
            SessionState::Created
        }
    }

    /// Whether the session has been destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    /// Exit code, if the process has exited.
    pub fn exit_code(&self) -> Option<i32> {
        *self.exit_rx.borrow()
    }

    /// Summary for session listings.
    pub fn summary(&self) -> SessionSummary {
        let exit_code = self.exit_code();
        SessionSummary {
            id: self.id.clone(),
            cols: self.dimensions.cols,
            rows: self.dimensions.rows,
            exited: exit_code.is_some(),
            exit_code,
        }
    }

    fn ensure_usable(&self) -> Result<()> {
        if self.is_destroyed() {
            return Err(Error::Other(format!("session {} is destroyed", self.id)));
        }
        Ok(())
    }

    /// Spawn a process into this session using the given backend.
    ///
    /// The PTY is opened at the session's construction dimensions. A
    /// session holds at most one process; spawning twice is an error.
    pub fn spawn(&self, backend: &dyn PtyBackend, spec: &SpawnSpec) -> Result<()> {
        self.ensure_usable()?;

        let mut pty_slot = self.pty.lock().unwrap();
        if pty_slot.is_some() {
            return Err(Error::SpawnFailure(format!(
                "session {} already has a process",
                self.id
            )));
        }

        let handle = Arc::new(backend.spawn(spec, self.dimensions)?);
        let events = handle
            .take_events()
            .ok_or_else(|| Error::SpawnFailure("PTY event stream already taken".to_string()))?;

        let (jobs_tx, jobs_rx) = mpsc::unbounded_channel();
        let exit_tx = self
            .exit_tx
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| Error::SpawnFailure("exit notifier already taken".to_string()))?;

        self.start_pipeline(events, jobs_tx.clone(), jobs_rx, exit_tx);

        *self.jobs.lock().unwrap() = Some(jobs_tx);
        *pty_slot = Some(handle);

        info!("Session {} spawned '{}'", self.id, spec.shell);
        Ok(())
    }

    /// Start the forwarder and pump tasks for a freshly spawned PTY.
    ///
    /// The forwarder turns PTY events into jobs; because it holds its
    /// own sender clone, the exit event reaches the pump even after the
    /// session drops its sender at destruction.
    fn start_pipeline(
        &self,
        mut events: mpsc::UnboundedReceiver<PtyEvent>,
        jobs_tx: mpsc::UnboundedSender<Job>,
        mut jobs_rx: mpsc::UnboundedReceiver<Job>,
        exit_tx: watch::Sender<Option<i32>>,
    ) {
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                let job = match event {
                    PtyEvent::Data(bytes) => Job::Data(bytes),
                    PtyEvent::Exited(code) => Job::Exited(code),
                };
                if jobs_tx.send(job).is_err() {
                    break;
                }
            }
        });

        let interpreter = Arc::clone(&self.interpreter);
        let id = self.id.clone();
        tokio::spawn(async move {
            while let Some(job) = jobs_rx.recv().await {
                match job {
                    Job::Data(bytes) => interpreter.lock().unwrap().feed(&bytes),
                    Job::Flush(ack) => {
                        let _ = ack.send(());
                    }
                    Job::Resize(dims) => interpreter.lock().unwrap().grid_mut().resize(dims),
                    Job::Exited(code) => {
                        debug!("Session {} process exited with code {}", id, code);
                        let _ = exit_tx.send(Some(code));
                    }
                }
            }
            debug!("Session {} pipeline drained", id);
        });
    }

    fn pty_handle(&self) -> Result<Arc<PtyHandle>> {
        self.pty.lock().unwrap().clone().ok_or(Error::NotSpawned)
    }

    /// Write input bytes verbatim to the PTY.
    pub fn write(&self, data: &[u8]) -> Result<usize> {
        self.ensure_usable()?;
        self.pty_handle()?.write(data)
    }

    /// Resize the PTY and the live grid.
    ///
    /// The snapshot window is unaffected; snapshots keep the
    /// construction-time shape.
    pub fn resize(&self, new_dimensions: Dimensions) -> Result<()> {
        self.ensure_usable()?;
        if new_dimensions.is_empty() {
            return Err(Error::InvalidDimensions {
                rows: new_dimensions.rows,
                cols: new_dimensions.cols,
            });
        }

        let pty = self.pty_handle()?;
        pty.resize(new_dimensions)?;

        // Grid resize rides the job queue so it stays ordered with output.
        if let Some(jobs) = self.jobs.lock().unwrap().as_ref() {
            let _ = jobs.send(Job::Resize(new_dimensions));
        }
        Ok(())
    }

    /// Wait until all output received so far has been applied to the grid.
    ///
    /// Resolves once the pipeline has processed everything queued before
    /// this call. If the pipeline has already shut down, everything it
    /// ever received has been applied, so this still resolves cleanly.
    pub async fn flush(&self) -> Result<()> {
        self.ensure_usable()?;

        let jobs = self
            .jobs
            .lock()
            .unwrap()
            .clone()
            .ok_or(Error::NotSpawned)?;

        let (ack_tx, ack_rx) = oneshot::channel();
        if jobs.send(Job::Flush(ack_tx)).is_err() {
            return Ok(());
        }
        let _ = ack_rx.await;
        Ok(())
    }

    /// Wait for the process to exit and return its exit code.
    ///
    /// Any number of callers can wait concurrently; all observe the same
    /// code, and calls after exit return immediately.
    pub async fn wait_for_exit(&self) -> Result<i32> {
        if self.pty.lock().unwrap().is_none() {
            return Err(Error::NotSpawned);
        }

        let mut rx = self.exit_rx.clone();
        let code = rx
            .wait_for(Option::is_some)
            .await
            .map_err(|_| Error::Other(format!("session {} destroyed before exit", self.id)))?;
        Ok(code.unwrap_or(-1))
    }

    /// Deep-copied snapshot of the screen through the fixed window.
    pub fn cell_grid(&self) -> Vec<Vec<CellRecord>> {
        let interpreter = self.interpreter.lock().unwrap();
        snapshot::extract(interpreter.grid(), self.dimensions)
    }

    /// Plain-text snapshot of the screen, one line per window row.
    pub fn text(&self) -> String {
        snapshot::to_text(&self.cell_grid())
    }

    /// Destroy the session: kill the process (if any) and stop accepting
    /// operations. Idempotent; the grid stays readable for callers that
    /// already hold a snapshot.
    pub fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        info!("Destroying session {}", self.id);

        // Dropping our sender stops new flushes; the forwarder's clone
        // keeps the pipeline alive until the exit event lands.
        self.jobs.lock().unwrap().take();

        if let Some(pty) = self.pty.lock().unwrap().as_ref() {
            if let Err(e) = pty.kill() {
                warn!("Failed to kill process for session {}: {}", self.id, e);
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termview_emulator::NativePtyBackend;

    fn session(rows: u16, cols: u16) -> TerminalSession {
        TerminalSession::new(SessionId::from_seq(0), Dimensions::new(rows, cols))
    }

    #[test]
    fn test_created_session_state() {
        let s = session(24, 80);
        assert_eq!(s.state(), SessionState::Created);
        assert!(!s.is_destroyed());
        assert_eq!(s.exit_code(), None);
    }

    #[test]
    fn test_operations_require_spawn() {
        let s = session(24, 80);
        assert!(matches!(s.write(b"x"), Err(Error::NotSpawned)));
        assert!(matches!(
            s.resize(Dimensions::new(10, 10)),
            Err(Error::NotSpawned)
        ));
    }

    #[tokio::test]
    async fn test_flush_requires_spawn() {
        let s = session(24, 80);
        assert!(matches!(s.flush().await, Err(Error::NotSpawned)));
    }

    #[tokio::test]
    async fn test_wait_requires_spawn() {
        let s = session(24, 80);
        assert!(matches!(s.wait_for_exit().await, Err(Error::NotSpawned)));
    }

    #[test]
    fn test_snapshot_of_fresh_session_is_blank() {
        let s = session(3, 5);
        let records = s.cell_grid();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].len(), 5);
        assert_eq!(s.text(), "\n\n");
    }

    #[test]
    fn test_destroy_idempotent() {
        let s = session(24, 80);
        s.destroy();
        s.destroy();
        assert!(s.is_destroyed());
        assert!(s.write(b"x").is_err());
    }

    #[test]
    fn test_summary_shape() {
        let s = session(10, 40);
        let summary = s.summary();
        assert_eq!(summary.rows, 10);
        assert_eq!(summary.cols, 40);
        assert!(!summary.exited);
        assert_eq!(summary.exit_code, None);
    }

    #[cfg(unix)]
    mod process {
        use super::*;

        fn sh(script: &str) -> SpawnSpec {
            SpawnSpec::command("/bin/sh", vec!["-c".to_string(), script.to_string()])
        }

        #[tokio::test]
        async fn test_spawn_echo_and_snapshot() {
            let backend = NativePtyBackend::probe().unwrap();
            let s = session(24, 80);

            s.spawn(&backend, &sh("echo hello")).unwrap();
            assert_eq!(s.state(), SessionState::Spawned);

            let code = s.wait_for_exit().await.unwrap();
            assert_eq!(code, 0);

            s.flush().await.unwrap();
            assert!(s.text().contains("hello"));
            assert_eq!(s.state(), SessionState::Exited);
        }

        #[tokio::test]
        async fn test_exit_code_propagates() {
            let backend = NativePtyBackend::probe().unwrap();
            let s = session(24, 80);

            s.spawn(&backend, &sh("exit 42")).unwrap();
            assert_eq!(s.wait_for_exit().await.unwrap(), 42);

            // Repeated waits observe the same code immediately.
            assert_eq!(s.wait_for_exit().await.unwrap(), 42);
            assert_eq!(s.exit_code(), Some(42));
        }

        #[tokio::test]
        async fn test_spawn_twice_fails() {
            let backend = NativePtyBackend::probe().unwrap();
            let s = session(24, 80);

            s.spawn(&backend, &sh("sleep 5")).unwrap();
            let second = s.spawn(&backend, &sh("echo nope"));
            assert!(matches!(second, Err(Error::SpawnFailure(_))));
            s.destroy();
        }

        #[tokio::test]
        async fn test_write_reaches_process() {
            let backend = NativePtyBackend::probe().unwrap();
            let s = session(24, 80);

            s.spawn(&backend, &sh("read line; echo got:$line")).unwrap();
            s.write(b"ping\n").unwrap();

            s.wait_for_exit().await.unwrap();
            s.flush().await.unwrap();
            assert!(s.text().contains("got:ping"));
        }

        #[tokio::test]
        async fn test_sessions_are_isolated() {
            let backend = NativePtyBackend::probe().unwrap();
            let a = TerminalSession::new(SessionId::from_seq(1), Dimensions::new(24, 80));
            let b = TerminalSession::new(SessionId::from_seq(2), Dimensions::new(24, 80));

            a.spawn(&backend, &sh("echo alpha")).unwrap();
            b.spawn(&backend, &sh("echo beta")).unwrap();

            a.wait_for_exit().await.unwrap();
            b.wait_for_exit().await.unwrap();
            a.flush().await.unwrap();
            b.flush().await.unwrap();

            assert!(a.text().contains("alpha"));
            assert!(!a.text().contains("beta"));
            assert!(b.text().contains("beta"));
        }

        #[tokio::test]
        async fn test_resize_keeps_snapshot_window() {
            let backend = NativePtyBackend::probe().unwrap();
            let s = session(10, 40);

            s.spawn(&backend, &sh("sleep 5")).unwrap();
            s.resize(Dimensions::new(50, 200)).unwrap();
            s.flush().await.unwrap();

            let records = s.cell_grid();
            assert_eq!(records.len(), 10);
            assert_eq!(records[0].len(), 40);
            s.destroy();
        }

        #[tokio::test]
        async fn test_resize_rejects_zero() {
            let backend = NativePtyBackend::probe().unwrap();
            let s = session(10, 40);

            s.spawn(&backend, &sh("sleep 5")).unwrap();
            assert!(matches!(
                s.resize(Dimensions::new(0, 40)),
                Err(Error::InvalidDimensions { .. })
            ));
            s.destroy();
        }

        #[tokio::test]
        async fn test_flush_after_exit_still_resolves() {
            let backend = NativePtyBackend::probe().unwrap();
            let s = session(24, 80);

            s.spawn(&backend, &sh("true")).unwrap();
            s.wait_for_exit().await.unwrap();

            s.flush().await.unwrap();
            s.flush().await.unwrap();
        }

        #[tokio::test]
        async fn test_destroy_kills_running_process() {
            let backend = NativePtyBackend::probe().unwrap();
            let s = session(24, 80);

            s.spawn(&backend, &sh("sleep 60")).unwrap();
            s.destroy();

            // The killed process still reports an exit through the
            // pipeline, so the grid stays consistent.
            assert!(s.is_destroyed());
        }
    }
}
