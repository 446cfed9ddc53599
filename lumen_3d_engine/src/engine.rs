/// Lumen3D Engine - Global state: graphics device singleton and logger
///
/// Provides global access to the graphics device shared by renderers, and
/// to the swappable logger used by the engine_* macros. Storage is
/// thread-safe static state guarded by RwLock.

use std::sync::{OnceLock, RwLock, Arc, Mutex};
use std::time::SystemTime;
use crate::graphics_device::GraphicsDevice;
use crate::error::{Result, Error};
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

// ===== INTERNAL STATE =====

/// Global engine state storage
static ENGINE_STATE: OnceLock<EngineState> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Internal state structure holding the engine singletons
struct EngineState {
    /// Graphics device singleton (wrapped in Mutex for exclusive access during a frame)
    graphics_device: RwLock<Option<Arc<Mutex<dyn GraphicsDevice>>>>,
}

impl EngineState {
    fn new() -> Self {
        Self {
            graphics_device: RwLock::new(None),
        }
    }
}

// ===== PUBLIC API =====

/// Engine singleton manager
///
/// # Example
///
/// ```no_run
/// use lumen_3d_engine::lumen3d::Engine;
/// use lumen_3d_engine::lumen3d::render::{Renderer, RendererConfig};
/// use lumen_3d_engine_device_headless::HeadlessGraphicsDevice;
///
/// Engine::initialize()?;
/// let device = Engine::create_graphics_device(HeadlessGraphicsDevice::new())?;
/// let _renderer = Renderer::new(device, RendererConfig::default())?;
/// // ...
/// Engine::shutdown();
/// # Ok::<(), lumen_3d_engine::lumen3d::Error>(())
/// ```
pub struct Engine;

impl Engine {
    /// Log errors before returning them (internal use)
    fn log_and_return_error(error: Error) -> Error {
        match &error {
            Error::InitializationFailed(msg) => {
                crate::engine_error!("lumen3d::Engine", "Initialization failed: {}", msg);
            }
            Error::BackendError(msg) => {
                crate::engine_error!("lumen3d::Engine", "Backend error: {}", msg);
            }
            _ => {
                crate::engine_error!("lumen3d::Engine", "Engine error: {}", error);
            }
        }
        error
    }

    fn state() -> Result<&'static EngineState> {
        ENGINE_STATE.get()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("Engine not initialized. Call Engine::initialize() first.".to_string())
            ))
    }

    /// Initialize the engine
    ///
    /// Must be called once at startup before creating the graphics device.
    /// Calling it again is a no-op.
    pub fn initialize() -> Result<()> {
        ENGINE_STATE.get_or_init(EngineState::new);
        Ok(())
    }

    /// Drop the graphics device singleton
    ///
    /// Existing device references stay valid until dropped.
    pub fn shutdown() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut device) = state.graphics_device.write() {
                *device = None;
            }
        }
    }

    // ===== GRAPHICS DEVICE API =====

    /// Wrap `device` and register it as the global graphics device
    ///
    /// # Errors
    ///
    /// - the engine is not initialized
    /// - a graphics device already exists
    pub fn create_graphics_device<D: GraphicsDevice + 'static>(device: D) -> Result<Arc<Mutex<dyn GraphicsDevice>>> {
        let device: Arc<Mutex<dyn GraphicsDevice>> = Arc::new(Mutex::new(device));
        Self::register_graphics_device(Arc::clone(&device))?;
        crate::engine_info!("lumen3d::Engine", "Graphics device singleton created successfully");
        Ok(device)
    }

    /// Register an already shared device (e.g. one built by a device plugin)
    pub fn register_graphics_device(device: Arc<Mutex<dyn GraphicsDevice>>) -> Result<()> {
        let state = Self::state()?;
        let mut lock = state.graphics_device.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Graphics device lock poisoned".to_string())
            ))?;

        if lock.is_some() {
            return Err(Self::log_and_return_error(
                Error::InitializationFailed("Graphics device already exists. Call Engine::destroy_graphics_device() first.".to_string())
            ));
        }

        *lock = Some(device);
        Ok(())
    }

    /// The global graphics device
    ///
    /// # Errors
    ///
    /// - the engine is not initialized
    /// - no graphics device was created
    pub fn graphics_device() -> Result<Arc<Mutex<dyn GraphicsDevice>>> {
        let state = Self::state()?;
        let lock = state.graphics_device.read()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Graphics device lock poisoned".to_string())
            ))?;

        lock.clone()
            .ok_or_else(|| Self::log_and_return_error(
                Error::DeviceUnavailable("Graphics device not created. Call Engine::create_graphics_device() first.".to_string())
            ))
    }

    /// Remove the global graphics device, allowing a new one to be created
    pub fn destroy_graphics_device() -> Result<()> {
        let state = Self::state()?;
        let mut lock = state.graphics_device.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Graphics device lock poisoned".to_string())
            ))?;

        *lock = None;
        crate::engine_info!("lumen3d::Engine", "Graphics device singleton destroyed");
        Ok(())
    }

    /// Reset all singletons for testing (only available in test builds)
    #[cfg(test)]
    pub fn reset_for_testing() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut device) = state.graphics_device.write() {
                *device = None;
            }
        }
    }

    // ===== LOGGING API =====

    /// Replace the logger (file logger, test capture, etc.)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use lumen_3d_engine::lumen3d::{Engine, log::{Logger, LogEntry}};
    ///
    /// struct FileLogger;
    /// impl Logger for FileLogger {
    ///     fn log(&self, entry: &LogEntry) {
    ///         // Write to file...
    ///     }
    /// }
    ///
    /// Engine::set_logger(FileLogger);
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to DefaultLogger
    pub fn reset_logger() {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Log without file:line (used by engine_trace! .. engine_warn!)
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Log with file:line (used by engine_error!, engine_err!, engine_bail!)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
