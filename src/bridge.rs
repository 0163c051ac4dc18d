use crate::{
    backend::ImageBackend,
    config::BridgeConfig,
    error::{BridgeError, ErrorKind},
    method::Method,
    params::{Call, ImageCall},
    response::{BridgeResponse, ErrorReport, Payload},
    source::ImageSource,
    value::Request,
};
use std::{
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

/// Reports whether the host currently has a usable foreground session.
pub trait HostContext: Send + Sync {
    fn is_active(&self) -> bool;
}

impl<F: Fn() -> bool + Send + Sync> HostContext for F {
    fn is_active(&self) -> bool {
        self()
    }
}

/// A flag the host flips as its foreground session comes and goes.
impl HostContext for Arc<AtomicBool> {
    fn is_active(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

/// The host's camera capture / crop flow, which answers `edge_detect` itself.
pub trait CaptureFlow: Send + Sync {
    fn open(&self, request: Request) -> BridgeResponse;
}

/// Routes remote calls to the image backend and turns every outcome into a
/// [`BridgeResponse`].
///
/// Calls are handled synchronously on the caller's thread. The only state shared between
/// calls is the native library's initialization flag.
pub struct Bridge<B: ImageBackend> {
    backend: B,
    config: BridgeConfig,
    context: Box<dyn HostContext>,
    capture: Option<Box<dyn CaptureFlow>>,
    initialized: AtomicBool,
    init_lock: Mutex<()>,
}

impl<B: ImageBackend> Bridge<B> {
    /// Creates a bridge whose host context is always active and with no capture flow.
    pub fn new(backend: B, config: BridgeConfig) -> Self {
        Self {
            backend,
            config,
            context: Box::new(|| true),
            capture: None,
            initialized: AtomicBool::new(false),
            init_lock: Mutex::new(()),
        }
    }

    pub fn with_context(mut self, context: impl HostContext + 'static) -> Self {
        self.context = Box::new(context);
        self
    }

    pub fn with_capture(mut self, capture: impl CaptureFlow + 'static) -> Self {
        self.capture = Some(Box::new(capture));
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Wire names of every method this bridge answers.
    pub fn supported_methods(&self) -> Vec<&'static str> {
        Method::ALL
            .into_iter()
            .filter(|m| *m != Method::EdgeDetect || self.capture.is_some())
            .map(|m| m.as_str())
            .collect()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Initializes the native library once per bridge.
    ///
    /// A failed attempt leaves the flag unset so the next call tries again. Concurrent
    /// callers serialize on the slow path and never initialize twice.
    pub fn ensure_initialized(&self) -> Result<(), BridgeError> {
        if self.initialized.load(Ordering::Acquire) {
            return Ok(());
        }
        let _guard = self
            .init_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if self.initialized.load(Ordering::Acquire) {
            return Ok(());
        }
        self.backend
            .initialize()
            .map_err(|e| BridgeError::Initialization {
                source: Box::new(e),
            })?;
        self.initialized.store(true, Ordering::Release);
        log::info!("Native image library initialized");
        Ok(())
    }

    /// Handles one remote call end to end.
    pub fn dispatch(&self, request: Request) -> BridgeResponse {
        let method = Method::from_name(&request.method);

        if method == Some(Method::EdgeDetect) {
            return match &self.capture {
                Some(capture) => capture.open(request),
                None => {
                    log::warn!("edge_detect requested but no capture flow is registered");
                    BridgeResponse::NotImplemented
                }
            };
        }

        if !self.context.is_active() {
            log::warn!("Rejecting {}: no active host context", request.method);
            return self.report(BridgeError::NoContext(self.config.context_name.clone()));
        }

        let Some(method) = method else {
            log::debug!("Unknown method {}", request.method);
            return BridgeResponse::NotImplemented;
        };

        log::debug!("Dispatching {method}");
        match self.run(method, &request) {
            Ok(payload) => BridgeResponse::Success(payload),
            Err(e) => self.report(e),
        }
    }

    fn run(&self, method: Method, request: &Request) -> Result<Payload, BridgeError> {
        self.ensure_initialized()?;
        match Call::parse(method, &request.arguments)? {
            Call::GetVersion => self
                .backend
                .version()
                .map(Payload::Text)
                .map_err(|e| BridgeError::Processing {
                    method: method.as_str(),
                    source: Box::new(e),
                }),
            Call::Image(call) => self.invoke(call),
        }
    }

    /// Load, apply one primitive, and store the result in the caller's representation.
    fn invoke(&self, call: ImageCall) -> Result<Payload, BridgeError> {
        let method = call.op.method().as_str();
        let mode = call.op.read_mode();
        let image = match &call.source {
            ImageSource::Path(path) => self.backend.read(path, mode),
            ImageSource::Bytes(data) => self.backend.decode(data, mode),
        }
        .map_err(|e| BridgeError::ImageLoad {
            origin: call.source.describe(),
            source: Box::new(e),
        })?;

        let output = self
            .backend
            .apply(&image, &call.op)
            .map_err(|e| BridgeError::Processing {
                method,
                source: Box::new(e),
            })?;
        drop(image);

        let encode_error = |e: B::Error| BridgeError::Encode {
            method,
            source: Box::new(e),
        };
        match call.source {
            ImageSource::Bytes(_) => self
                .backend
                .encode(&output, &self.config.encode_extension)
                .map(Payload::Bytes)
                .map_err(encode_error),
            ImageSource::Path(source) => {
                let target = self.output_path(&source, method);
                self.backend
                    .write(&target, &output)
                    .map_err(encode_error)?;
                Ok(Payload::Path(target))
            }
        }
    }

    /// `<output dir or source dir>/<stem>_<method>.<ext>`
    ///
    /// The source extension is kept when the backend can write it, otherwise the configured
    /// encode extension is used.
    fn output_path(&self, source: &Path, method: &str) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let extension = source
            .extension()
            .map(|s| format!(".{}", s.to_string_lossy()))
            .filter(|ext| self.backend.can_write(ext))
            .unwrap_or_else(|| self.config.encode_extension.clone());
        let dir = match &self.config.output_dir {
            Some(dir) => dir.clone(),
            None => source.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        dir.join(format!("{stem}_{method}{extension}"))
    }

    fn report(&self, error: BridgeError) -> BridgeResponse {
        match error.kind() {
            ErrorKind::Processing => log::error!("{error}"),
            _ => log::warn!("{error}"),
        }
        BridgeResponse::Error(ErrorReport::from_error(&self.config.platform, &error))
    }
}
