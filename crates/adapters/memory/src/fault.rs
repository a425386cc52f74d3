//! 故障注入

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use pantry_errors::{AppError, AppResult};
use parking_lot::Mutex;

/// 模拟后端不可用与延迟，并统计调用次数
#[derive(Debug, Default)]
pub struct FaultInjector {
    unavailable: AtomicBool,
    latency: Mutex<Option<Duration>>,
    calls: AtomicUsize,
}

impl FaultInjector {
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.lock() = latency;
    }

    /// 已发出的调用次数（包括失败的调用）
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 每次调用开始时执行
    pub async fn enter(&self, op: &str) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let latency = *self.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::store_unavailable(format!("{} failed: backend offline", op)));
        }
        Ok(())
    }
}
