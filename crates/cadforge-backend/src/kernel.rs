//! Real-kernel adapter
//!
//! Thin pass-through to an externally-supplied [`GeometryKernel`]. Every
//! kernel call runs on a worker thread and is bounded by the session
//! timeout; kernel errors are wrapped at this boundary and never escape
//! as kernel-native types. There is no mid-operation cancellation: a
//! timed-out worker is abandoned and its result discarded.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use cadforge_core::registry::{BooleanKind, ModifyKind, PrimitiveKind, TransformKind};
use cadforge_core_types::{BackendMode, Bbox, DerivedProps, Params};
use cadforge_store::DocumentSnapshot;

use crate::traits::{
    BackendError, BackendHandle, BackendResult, GeometryBackend, GeometryKernel, KernelError,
    LoadedDocument,
};

/// Adapter forwarding calls to an external CAD kernel
pub struct KernelBackend {
    kernel: Arc<dyn GeometryKernel>,
    shapes: Mutex<HashMap<u64, DerivedProps>>,
    next_handle: AtomicU64,
    timeout: Duration,
}

impl KernelBackend {
    /// Wrap a kernel with the given per-call time bound
    pub fn new(kernel: Arc<dyn GeometryKernel>, timeout: Duration) -> Self {
        Self {
            kernel,
            shapes: Mutex::new(HashMap::new()),
            next_handle: AtomicU64::new(0),
            timeout,
        }
    }

    /// Name of the wrapped kernel
    pub fn kernel_name(&self) -> &str {
        self.kernel.name()
    }

    fn register(&self, props: DerivedProps) -> BackendHandle {
        let handle = self.next_handle.fetch_add(1, Ordering::Relaxed) + 1;
        self.shapes.lock().insert(handle, props);
        BackendHandle(handle)
    }

    fn props_of(&self, handle: BackendHandle) -> BackendResult<DerivedProps> {
        self.shapes
            .lock()
            .get(&handle.0)
            .copied()
            .ok_or(BackendError::UnknownHandle { handle: handle.0 })
    }

    /// Run a kernel call on a worker thread, bounded by the timeout
    fn call<T, F>(&self, f: F) -> BackendResult<T>
    where
        T: Send + 'static,
        F: FnOnce(Arc<dyn GeometryKernel>) -> Result<T, KernelError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let kernel = Arc::clone(&self.kernel);
        thread::spawn(move || {
            let _ = tx.send(f(kernel));
        });
        match rx.recv_timeout(self.timeout) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(BackendError::Execution {
                message: err.to_string(),
            }),
            Err(RecvTimeoutError::Timeout) => Err(BackendError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }),
            // A dropped sender means the worker panicked mid-call
            Err(RecvTimeoutError::Disconnected) => Err(BackendError::Execution {
                message: "kernel worker terminated unexpectedly".to_string(),
            }),
        }
    }
}

impl GeometryBackend for KernelBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Kernel
    }

    fn create_primitive(
        &self,
        kind: PrimitiveKind,
        params: &Params,
    ) -> BackendResult<BackendHandle> {
        let params = params.clone();
        let props = self.call(move |kernel| kernel.create_primitive(kind, params))?;
        Ok(self.register(props))
    }

    fn apply_transform(
        &self,
        kind: TransformKind,
        base: BackendHandle,
        params: &Params,
    ) -> BackendResult<BackendHandle> {
        let base_props = self.props_of(base)?;
        let params = params.clone();
        let props = self.call(move |kernel| kernel.apply_transform(kind, base_props, params))?;
        Ok(self.register(props))
    }

    fn boolean_op(
        &self,
        kind: BooleanKind,
        a: BackendHandle,
        b: BackendHandle,
    ) -> BackendResult<BackendHandle> {
        let (pa, pb) = (self.props_of(a)?, self.props_of(b)?);
        let props = self.call(move |kernel| kernel.boolean_op(kind, pa, pb))?;
        Ok(self.register(props))
    }

    fn apply_modifier(
        &self,
        kind: ModifyKind,
        base: BackendHandle,
        params: &Params,
    ) -> BackendResult<BackendHandle> {
        let base_props = self.props_of(base)?;
        let params = params.clone();
        let props = self.call(move |kernel| kernel.apply_modifier(kind, base_props, params))?;
        Ok(self.register(props))
    }

    fn describe(&self, handle: BackendHandle) -> BackendResult<DerivedProps> {
        self.props_of(handle)
    }

    fn save_document(&self, snapshot: &DocumentSnapshot, path: &Path) -> BackendResult<()> {
        let snapshot = snapshot.clone();
        let path = path.to_path_buf();
        self.call(move |kernel| kernel.save_document(snapshot, path))
    }

    fn load_document(&self, path: &Path) -> BackendResult<LoadedDocument> {
        let path = path.to_path_buf();
        let snapshot = self.call(move |kernel| kernel.load_document(path))?;
        let handles = snapshot
            .objects
            .iter()
            .map(|obj| {
                let props = obj
                    .props
                    .unwrap_or(DerivedProps::new(0.0, Bbox::new([0.0; 3], [0.0; 3])));
                self.register(props)
            })
            .collect();
        Ok(LoadedDocument { snapshot, handles })
    }
}
