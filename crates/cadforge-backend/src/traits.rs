//! Backend trait definitions
//!
//! These traits define the capability interface the executor drives and
//! the contract an external geometry kernel must implement to be attached.

use std::path::{Path, PathBuf};

use thiserror::Error;

use cadforge_core::registry::{BooleanKind, ModifyKind, PrimitiveKind, TransformKind};
use cadforge_core_types::{BackendMode, DerivedProps, Params};
use cadforge_store::DocumentSnapshot;

/// Error type for external kernel operations
#[derive(Debug, Clone, Error)]
pub enum KernelError {
    #[error("kernel not available: {0}")]
    NotAvailable(String),

    #[error("operation failed: {0}")]
    OperationFailed(String),

    #[error("file I/O error: {0}")]
    FileIo(String),
}

/// Error type at the backend adapter boundary
///
/// Kernel-native errors never escape past this boundary: the adapter
/// wraps them here, and the executor maps them onto the core taxonomy
/// (`BackendExecution` / `BackendTimeout`) with the operation name.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The backend rejected or failed the operation
    #[error("{message}")]
    Execution { message: String },

    /// The backend call exceeded its time bound
    #[error("timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// A handle did not resolve in the backend's shape table
    #[error("unknown backend handle: {handle}")]
    UnknownHandle { handle: u64 },
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Opaque reference to a shape held by a backend
///
/// The backend owns the actual shape data; the engine only tracks which
/// handle belongs to which document object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackendHandle(pub u64);

/// Result of loading a persisted document through a backend
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// The restored object set
    pub snapshot: DocumentSnapshot,
    /// Backend handles, parallel to `snapshot.objects`
    pub handles: Vec<BackendHandle>,
}

/// The geometry-evaluating substrate driven by the executor
///
/// Two implementations exist: [`crate::KernelBackend`] forwarding to an
/// external CAD kernel, and [`crate::SimulatedBackend`] fabricating
/// deterministic synthetic results. One backend is selected per session
/// and never mixed within it.
pub trait GeometryBackend: Send + Sync {
    /// Which mode this backend runs in
    fn mode(&self) -> BackendMode;

    /// Create a primitive shape
    fn create_primitive(&self, kind: PrimitiveKind, params: &Params) -> BackendResult<BackendHandle>;

    /// Derive a new shape by transforming an existing one
    fn apply_transform(
        &self,
        kind: TransformKind,
        base: BackendHandle,
        params: &Params,
    ) -> BackendResult<BackendHandle>;

    /// Combine two shapes with a boolean operation
    fn boolean_op(
        &self,
        kind: BooleanKind,
        a: BackendHandle,
        b: BackendHandle,
    ) -> BackendResult<BackendHandle>;

    /// Derive a new shape by applying an edge modifier
    fn apply_modifier(
        &self,
        kind: ModifyKind,
        base: BackendHandle,
        params: &Params,
    ) -> BackendResult<BackendHandle>;

    /// Report the derived properties of a shape
    fn describe(&self, handle: BackendHandle) -> BackendResult<DerivedProps>;

    /// Persist a document capture to disk
    fn save_document(&self, snapshot: &DocumentSnapshot, path: &Path) -> BackendResult<()>;

    /// Restore a document capture from disk, minting fresh handles
    fn load_document(&self, path: &Path) -> BackendResult<LoadedDocument>;
}

/// Contract an external CAD kernel implements to be attached to a session
///
/// Arguments are passed by value so calls can be dispatched onto a worker
/// thread and bounded by the session timeout.
pub trait GeometryKernel: Send + Sync {
    /// Kernel name, for logs and probe reporting
    fn name(&self) -> &str;

    /// Availability probe, checked once at session start
    fn is_available(&self) -> bool;

    /// Create a primitive shape and report its properties
    fn create_primitive(
        &self,
        kind: PrimitiveKind,
        params: Params,
    ) -> Result<DerivedProps, KernelError>;

    /// Transform a shape and report the resulting properties
    fn apply_transform(
        &self,
        kind: TransformKind,
        base: DerivedProps,
        params: Params,
    ) -> Result<DerivedProps, KernelError>;

    /// Combine two shapes and report the resulting properties
    fn boolean_op(
        &self,
        kind: BooleanKind,
        a: DerivedProps,
        b: DerivedProps,
    ) -> Result<DerivedProps, KernelError>;

    /// Apply an edge modifier and report the resulting properties
    fn apply_modifier(
        &self,
        kind: ModifyKind,
        base: DerivedProps,
        params: Params,
    ) -> Result<DerivedProps, KernelError>;

    /// Persist a document in the kernel's native format
    fn save_document(&self, snapshot: DocumentSnapshot, path: PathBuf) -> Result<(), KernelError>;

    /// Restore a document from the kernel's native format
    fn load_document(&self, path: PathBuf) -> Result<DocumentSnapshot, KernelError>;
}
