//! Transcoding engine boundary and its owning handle.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use textcast_common::error::{TextcastError, TextcastResult};

/// Shared cancellation flag, raised by the caller and polled by the export
/// runner and by engines while a job runs.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Exit status of one engine invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineExit {
    pub code: i32,
    pub stderr: String,
}

impl EngineExit {
    pub fn ok() -> Self {
        Self {
            code: 0,
            stderr: String::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// An engine that turns an input file plus command-line arguments into an
/// output file, all within its own private file namespace.
///
/// Calls are issued strictly one at a time; the namespace is reused
/// across jobs.
#[async_trait::async_trait]
pub trait TranscodeEngine: Send {
    /// Store `bytes` under `name` in the engine's namespace.
    async fn write_input(&mut self, name: &str, bytes: &[u8]) -> TextcastResult<()>;

    /// Run one transcode. Returns `Err(Cancelled)` if `cancel` was raised
    /// while the job ran.
    async fn run(&mut self, args: &[String], cancel: &CancelFlag) -> TextcastResult<EngineExit>;

    /// Fetch a file the last run produced.
    async fn read_output(&mut self, name: &str) -> TextcastResult<Vec<u8>>;

    /// Engine name for logs.
    fn name(&self) -> &str;
}

/// Observable state of an [`EngineHandle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    Uninitialized,
    Ready,
    Failed(String),
}

#[derive(Debug)]
enum EngineSlot<E> {
    Uninitialized,
    Ready(E),
    Failed(String),
}

/// Owns a lazily initialized engine.
///
/// Initialization is attempted at most once; a failure is remembered and
/// reported to every later caller instead of being retried.
#[derive(Debug)]
pub struct EngineHandle<E> {
    slot: EngineSlot<E>,
}

impl<E> Default for EngineHandle<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EngineHandle<E> {
    pub fn new() -> Self {
        Self {
            slot: EngineSlot::Uninitialized,
        }
    }

    /// A handle around an engine that is already usable.
    pub fn ready(engine: E) -> Self {
        Self {
            slot: EngineSlot::Ready(engine),
        }
    }

    /// Run `init` if no attempt has been made yet.
    pub async fn initialize<F>(&mut self, init: F) -> TextcastResult<()>
    where
        F: Future<Output = TextcastResult<E>>,
    {
        match &self.slot {
            EngineSlot::Ready(_) => return Ok(()),
            EngineSlot::Failed(message) => {
                return Err(TextcastError::engine_unavailable(message.clone()))
            }
            EngineSlot::Uninitialized => {}
        }

        match init.await {
            Ok(engine) => {
                tracing::info!("Transcoding engine initialized");
                self.slot = EngineSlot::Ready(engine);
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                tracing::error!(error = %message, "Transcoding engine failed to initialize");
                self.slot = EngineSlot::Failed(message.clone());
                Err(TextcastError::engine_unavailable(message))
            }
        }
    }

    pub fn status(&self) -> EngineStatus {
        match &self.slot {
            EngineSlot::Uninitialized => EngineStatus::Uninitialized,
            EngineSlot::Ready(_) => EngineStatus::Ready,
            EngineSlot::Failed(message) => EngineStatus::Failed(message.clone()),
        }
    }

    pub fn engine_mut(&mut self) -> Option<&mut E> {
        match &mut self.slot {
            EngineSlot::Ready(engine) => Some(engine),
            _ => None,
        }
    }

    pub fn engine(&self) -> Option<&E> {
        match &self.slot {
            EngineSlot::Ready(engine) => Some(engine),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initialize_once() {
        let mut handle: EngineHandle<u32> = EngineHandle::new();
        assert_eq!(handle.status(), EngineStatus::Uninitialized);

        handle
            .initialize(async { Ok::<u32, TextcastError>(7) })
            .await
            .unwrap();
        assert_eq!(handle.status(), EngineStatus::Ready);

        // A second initializer is never polled.
        handle
            .initialize(async { Err::<u32, _>(TextcastError::engine("polled twice")) })
            .await
            .unwrap();
        assert_eq!(handle.engine().copied(), Some(7));
    }

    #[tokio::test]
    async fn test_failure_is_sticky() {
        let mut handle: EngineHandle<u32> = EngineHandle::new();
        let err = handle
            .initialize(async { Err::<u32, _>(TextcastError::engine("ffmpeg binary not found")) })
            .await
            .unwrap_err();
        assert!(matches!(err, TextcastError::EngineUnavailable { .. }));
        assert_eq!(
            handle.status(),
            EngineStatus::Failed("Engine error: ffmpeg binary not found".to_string())
        );

        let again = handle
            .initialize(async { Ok::<u32, TextcastError>(1) })
            .await;
        assert!(again.is_err());
        assert!(handle.engine_mut().is_none());
    }

    #[test]
    fn test_cancel_flag_is_shared() {
        let flag = CancelFlag::new();
        let observer = flag.clone();
        assert!(!observer.is_cancelled());
        flag.cancel();
        assert!(observer.is_cancelled());
    }
}
