use crossbeam_channel::{bounded, Receiver, TryRecvError};
use once_cell::sync::Lazy;
use std::future::Future;
use tokio::runtime::{Builder, Runtime};

use crate::api::{ApiError, ApiResult};

static RUNTIME: Lazy<Runtime> = Lazy::new(|| {
    Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("mentorai-net")
        .enable_all()
        .build()
        .expect("Failed to build Tokio runtime")
});

/// A request running on the background runtime. Poll it once per frame.
pub struct Pending<T> {
    rx: Receiver<ApiResult<T>>,
}

impl<T> Pending<T> {
    pub fn poll(&self) -> Option<ApiResult<T>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(ApiError::Interrupted)),
        }
    }
}

/// Runs `fut` on the shared runtime. `on_done` fires after the result is
/// queued, so the GUI can ask for a repaint.
pub fn spawn<T, F>(fut: F, on_done: impl FnOnce() + Send + 'static) -> Pending<T>
where
    T: Send + 'static,
    F: Future<Output = ApiResult<T>> + Send + 'static,
{
    let (tx, rx) = bounded(1);
    RUNTIME.spawn(async move {
        let result = fut.await;
        let _ = tx.send(result);
        on_done();
    });
    Pending { rx }
}

/// Blocking variant for the console.
pub fn block_on<F: Future>(fut: F) -> F::Output {
    RUNTIME.block_on(fut)
}

/// Takes the result out of `slot` once it has arrived.
pub fn take_ready<T>(slot: &mut Option<Pending<T>>) -> Option<ApiResult<T>> {
    let result = slot.as_ref()?.poll()?;
    *slot = None;
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait<T>(slot: &mut Option<Pending<T>>) -> ApiResult<T> {
        let start = Instant::now();
        loop {
            if let Some(result) = take_ready(slot) {
                return result;
            }
            assert!(start.elapsed() < Duration::from_secs(5), "task never finished");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn spawned_result_arrives_once() {
        let mut slot = Some(spawn(async { Ok(41 + 1) }, || {}));
        assert_eq!(wait(&mut slot).unwrap(), 42);
        assert!(slot.is_none());
        assert!(take_ready(&mut slot).is_none());
    }

    #[test]
    fn errors_are_delivered_too() {
        let mut slot: Option<Pending<()>> = Some(spawn(async { Err(ApiError::Interrupted) }, || {}));
        assert!(matches!(wait(&mut slot), Err(ApiError::Interrupted)));
    }

    #[test]
    fn block_on_runs_to_completion() {
        assert_eq!(block_on(async { 7 }), 7);
    }
}
