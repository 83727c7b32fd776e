//! PTY spawning capability.
//!
//! The backend is chosen once at process startup and injected into the
//! session registry; sessions never probe for capabilities themselves.

use portable_pty::{native_pty_system, PtySize};
use tracing::debug;

use termview_core::{Dimensions, Error, Result, SpawnSpec};

use crate::pty::PtyHandle;

/// Capability provider for spawning PTY-attached processes.
pub trait PtyBackend: Send + Sync + std::fmt::Debug {
    /// Spawn a process attached to a fresh PTY of the given size.
    fn spawn(&self, spec: &SpawnSpec, dimensions: Dimensions) -> Result<PtyHandle>;
}

/// Backend using the platform's native PTY system (via portable-pty).
#[derive(Debug, Clone, Copy)]
pub struct NativePtyBackend;

impl NativePtyBackend {
    /// Verify the platform can open a PTY at all, once, at startup.
    ///
    /// Fails with `BackendUnavailable`; the registry and any already
    /// spawned sessions are unaffected by a later probe failure elsewhere.
    pub fn probe() -> Result<Self> {
        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize {
                rows: 1,
                cols: 1,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| Error::BackendUnavailable(format!("cannot open PTY: {e}")))?;
        drop(pair);
        debug!("Native PTY backend available");
        Ok(Self)
    }
}

impl PtyBackend for NativePtyBackend {
    fn spawn(&self, spec: &SpawnSpec, dimensions: Dimensions) -> Result<PtyHandle> {
        PtyHandle::spawn(spec, dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_succeeds_on_supported_platform() {
        assert!(NativePtyBackend::probe().is_ok());
    }

    #[test]
    #[cfg(unix)]
    fn test_backend_spawns_handle() {
        let backend = NativePtyBackend::probe().unwrap();
        let spec = SpawnSpec::command("/bin/echo", vec!["hi".to_string()]);
        let pty = backend.spawn(&spec, Dimensions::new(24, 80)).unwrap();
        assert!(pty.pid() > 0);
    }
}
