//! Cadforge Backend - the geometry backend adapter
//!
//! One capability interface, two conforming implementations:
//! - [`KernelBackend`] forwards calls to an external CAD kernel, bounded
//!   by a per-call timeout
//! - [`SimulatedBackend`] fabricates plausible deterministic results when
//!   no kernel is available
//!
//! A backend is selected once per session via [`select_backend`] and
//! never mixed within it; the active mode is queryable so callers and the
//! training pipeline can tell which substrate produced a given record.

pub mod kernel;
pub mod sim;
pub mod traits;

use std::sync::Arc;
use std::time::Duration;

pub use kernel::KernelBackend;
pub use sim::SimulatedBackend;
pub use traits::{
    BackendError, BackendHandle, BackendResult, GeometryBackend, GeometryKernel, KernelError,
    LoadedDocument,
};

/// Select the session backend
///
/// Probes the supplied kernel once; if none is supplied or the probe
/// fails, falls back to the simulation backend. Mirrors the startup
/// behavior of kernel-optional CAD environments: the session always comes
/// up, possibly in simulation mode.
pub fn select_backend(
    kernel: Option<Arc<dyn GeometryKernel>>,
    timeout: Duration,
) -> Arc<dyn GeometryBackend> {
    match kernel {
        Some(kernel) if kernel.is_available() => {
            tracing::info!(kernel = kernel.name(), "geometry kernel attached");
            Arc::new(KernelBackend::new(kernel, timeout))
        }
        Some(kernel) => {
            tracing::warn!(
                kernel = kernel.name(),
                "kernel probe failed, falling back to simulation"
            );
            Arc::new(SimulatedBackend::new())
        }
        None => {
            tracing::info!("no geometry kernel supplied, using simulation backend");
            Arc::new(SimulatedBackend::new())
        }
    }
}
