//! 库存服务
//!
//! 所有写操作都是「读取 → 写入 → 重新加载完整快照」。
//! 默认的先读后写不是原子的：同一物品的两个并发增减可能丢失一次更新。

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use pantry_common::UserId;
use pantry_config::StoreConfig;
use pantry_domain_core::{ItemKey, ItemName, Quantity, Session, Snapshot};
use pantry_errors::{AppError, AppResult};
use pantry_ports::ItemStore;
use pantry_telemetry::{METRIC_ITEM_MUTATIONS, METRIC_SNAPSHOT_LOAD_SECONDS, METRIC_STORE_FAILURES};
use tracing::{debug, info, warn};

/// 库存服务选项
#[derive(Debug, Clone)]
pub struct InventoryOptions {
    /// 单次存储调用超时
    pub request_timeout: Duration,
    /// 使用 `ItemStore::adjust` 代替先读后写
    pub atomic_updates: bool,
}

impl Default for InventoryOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            atomic_updates: false,
        }
    }
}

impl From<&StoreConfig> for InventoryOptions {
    fn from(config: &StoreConfig) -> Self {
        Self {
            request_timeout: config.request_timeout(),
            atomic_updates: config.atomic_updates,
        }
    }
}

/// 会话范围的库存上下文
///
/// 登录时创建，登出时销毁；持有该用户的快照
#[derive(Debug)]
pub struct InventoryContext {
    session: Session,
    snapshot: Snapshot,
}

impl InventoryContext {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            snapshot: Snapshot::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn user_id(&self) -> &UserId {
        &self.session.user_id
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// 会话过期后拒绝任何存储调用
    pub fn ensure_live(&self) -> AppResult<()> {
        if self.session.is_expired() {
            return Err(AppError::unauthenticated("Session expired"));
        }
        Ok(())
    }
}

/// 库存服务
pub struct InventoryService {
    store: Arc<dyn ItemStore>,
    options: InventoryOptions,
}

impl InventoryService {
    pub fn new(store: Arc<dyn ItemStore>, options: InventoryOptions) -> Self {
        Self { store, options }
    }

    pub fn options(&self) -> &InventoryOptions {
        &self.options
    }

    /// 加载用户的完整快照
    ///
    /// 失败时返回 `StoreUnavailable`，之前的快照保持不变
    pub async fn load_snapshot<'a>(&self, ctx: &'a mut InventoryContext) -> AppResult<&'a Snapshot> {
        ctx.ensure_live()?;

        let started = Instant::now();
        // 分区不存在即没有物品
        let items = match self.call("list_all", self.store.list_all(ctx.user_id())).await {
            Ok(items) => items,
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(e),
        };
        histogram!(METRIC_SNAPSHOT_LOAD_SECONDS).record(started.elapsed().as_secs_f64());

        debug!(user_id = %ctx.user_id(), items = items.len(), "Snapshot loaded");
        ctx.snapshot = Snapshot::new(items);
        Ok(&ctx.snapshot)
    }

    /// 数量加一，不存在则以 1 创建
    pub async fn add_item<'a>(
        &self,
        ctx: &'a mut InventoryContext,
        name: &str,
    ) -> AppResult<&'a Snapshot> {
        ctx.ensure_live()?;
        let key = ItemKey::new(ctx.user_id().clone(), ItemName::new(name)?);

        let quantity = if self.options.atomic_updates {
            self.call("adjust", self.store.adjust(&key, 1)).await?
        } else {
            let current = match self.call("get", self.store.get(&key)).await {
                Ok(current) => current,
                Err(e) if e.is_not_found() => None,
                Err(e) => return Err(e),
            };
            let next = match current {
                Some(current) => current.increment()?,
                None => Quantity::ONE,
            };
            self.call("put", self.store.put(&key, next)).await?;
            Some(next)
        };

        counter!(METRIC_ITEM_MUTATIONS, "op" => "add").increment(1);
        info!(user_id = %key.user_id, item = %key.name, quantity = ?quantity.map(Quantity::get), "Item added");

        self.load_snapshot(ctx).await
    }

    /// 数量减一，归零即删除；物品不存在时什么也不做
    pub async fn remove_item<'a>(
        &self,
        ctx: &'a mut InventoryContext,
        name: &str,
    ) -> AppResult<&'a Snapshot> {
        ctx.ensure_live()?;
        let key = ItemKey::new(ctx.user_id().clone(), ItemName::new(name)?);

        if self.options.atomic_updates {
            let remaining = self.call("adjust", self.store.adjust(&key, -1)).await?;
            debug!(item = %key.name, remaining = ?remaining.map(Quantity::get), "Adjusted");
        } else {
            let current = match self.call("get", self.store.get(&key)).await {
                Ok(current) => current,
                Err(e) if e.is_not_found() => None,
                Err(e) => return Err(e),
            };

            match current.map(Quantity::decrement) {
                None => debug!(item = %key.name, "Nothing to remove"),
                Some(None) => match self.call("delete", self.store.delete(&key)).await {
                    Ok(()) => {}
                    Err(e) if e.is_not_found() => {}
                    Err(e) => return Err(e),
                },
                Some(Some(next)) => self.call("put", self.store.put(&key, next)).await?,
            }
        }

        counter!(METRIC_ITEM_MUTATIONS, "op" => "remove").increment(1);
        info!(user_id = %key.user_id, item = %key.name, "Item removed");

        self.load_snapshot(ctx).await
    }

    /// 带超时的存储调用
    ///
    /// NotFound 与 Validation（如数量溢出）原样返回，其余失败统一为 StoreUnavailable
    async fn call<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        let result = match tokio::time::timeout(self.options.request_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(AppError::store_unavailable(format!(
                "{} timed out after {:?}",
                op, self.options.request_timeout
            ))),
        };

        result.map_err(|err| {
            if err.is_not_found() || matches!(err, AppError::Validation(_)) {
                return err;
            }
            counter!(METRIC_STORE_FAILURES, "op" => op).increment(1);
            warn!(op, error = %err, "Item store call failed");
            if err.is_store_unavailable() {
                err
            } else {
                AppError::store_unavailable(format!("{} failed: {}", op, err))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};
    use pantry_domain_core::{Email, InventoryItem, SessionToken};
    use pantry_ports::MockItemStore;

    fn session() -> Session {
        Session {
            token: SessionToken::new("token"),
            user_id: UserId::new(),
            email: Email::new("cook@example.com").unwrap(),
            expires_at: Utc::now() + ChronoDuration::hours(1),
        }
    }

    fn item(name: &str, quantity: u32) -> InventoryItem {
        InventoryItem::new(ItemName::new(name).unwrap(), Quantity::new(quantity).unwrap())
    }

    fn service(store: MockItemStore) -> InventoryService {
        InventoryService::new(Arc::new(store), InventoryOptions::default())
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_snapshot() {
        let mut store = MockItemStore::new();
        let mut calls = 0;
        store.expect_list_all().returning(move |_| {
            calls += 1;
            if calls == 1 {
                Ok(vec![item("rice", 2)])
            } else {
                Err(AppError::store_unavailable("offline"))
            }
        });
        let svc = service(store);
        let mut ctx = InventoryContext::new(session());

        svc.load_snapshot(&mut ctx).await.unwrap();
        let err = svc.load_snapshot(&mut ctx).await.unwrap_err();

        assert!(err.is_store_unavailable());
        assert_eq!(ctx.snapshot().quantity_of("rice"), Some(2));
    }

    #[tokio::test]
    async fn test_add_increments_existing() {
        let mut store = MockItemStore::new();
        store
            .expect_get()
            .times(1)
            .returning(|_| Ok(Some(Quantity::new(2).unwrap())));
        store
            .expect_put()
            .withf(|key, q| key.name.as_str() == "egg" && q.get() == 3)
            .times(1)
            .returning(|_, _| Ok(()));
        store
            .expect_list_all()
            .times(1)
            .returning(|_| Ok(vec![item("egg", 3)]));

        let mut ctx = InventoryContext::new(session());
        let snapshot = service(store).add_item(&mut ctx, "egg").await.unwrap();
        assert_eq!(snapshot.quantity_of("egg"), Some(3));
    }

    #[tokio::test]
    async fn test_remove_last_unit_deletes() {
        let mut store = MockItemStore::new();
        store.expect_get().returning(|_| Ok(Some(Quantity::ONE)));
        store.expect_put().never();
        store.expect_delete().times(1).returning(|_| Ok(()));
        store.expect_list_all().returning(|_| Ok(vec![]));

        let mut ctx = InventoryContext::new(session());
        let snapshot = service(store).remove_item(&mut ctx, "egg").await.unwrap();
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_remove_treats_not_found_as_absent() {
        let mut store = MockItemStore::new();
        store
            .expect_get()
            .returning(|_| Err(AppError::not_found("egg")));
        store.expect_delete().never();
        store.expect_put().never();
        store.expect_list_all().returning(|_| Ok(vec![]));

        let mut ctx = InventoryContext::new(session());
        assert!(service(store).remove_item(&mut ctx, "egg").await.is_ok());
    }

    #[tokio::test]
    async fn test_add_treats_not_found_as_absent() {
        let mut store = MockItemStore::new();
        store
            .expect_get()
            .returning(|_| Err(AppError::not_found("egg")));
        store
            .expect_put()
            .withf(|key, q| key.name.as_str() == "egg" && *q == Quantity::ONE)
            .times(1)
            .returning(|_, _| Ok(()));
        store
            .expect_list_all()
            .returning(|_| Ok(vec![item("egg", 1)]));

        let mut ctx = InventoryContext::new(session());
        let snapshot = service(store).add_item(&mut ctx, "egg").await.unwrap();
        assert_eq!(snapshot.quantity_of("egg"), Some(1));
    }

    #[tokio::test]
    async fn test_load_treats_missing_partition_as_empty() {
        let mut store = MockItemStore::new();
        store
            .expect_list_all()
            .returning(|_| Err(AppError::not_found("inventory")));

        let mut ctx = InventoryContext::new(session());
        let snapshot = service(store).load_snapshot(&mut ctx).await.unwrap();
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_atomic_overflow_is_validation_error() {
        let mut store = MockItemStore::new();
        store
            .expect_adjust()
            .returning(|_, _| Err(AppError::validation("Quantity overflow")));
        store.expect_list_all().never();

        let svc = InventoryService::new(
            Arc::new(store),
            InventoryOptions {
                atomic_updates: true,
                ..InventoryOptions::default()
            },
        );
        let mut ctx = InventoryContext::new(session());
        let err = svc.add_item(&mut ctx, "egg").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_write_failure_leaves_snapshot_unchanged() {
        let mut store = MockItemStore::new();
        store.expect_get().returning(|_| Ok(None));
        store
            .expect_put()
            .returning(|_, _| Err(AppError::internal("disk full")));
        store.expect_list_all().never();

        let mut ctx = InventoryContext::new(session());
        let err = service(store).add_item(&mut ctx, "egg").await.unwrap_err();

        assert!(err.is_store_unavailable());
        assert!(ctx.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_name_makes_no_store_call() {
        let mut store = MockItemStore::new();
        store.expect_get().never();
        store.expect_adjust().never();

        let mut ctx = InventoryContext::new(session());
        let err = service(store).add_item(&mut ctx, "a/b").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_expired_session_refused() {
        let mut store = MockItemStore::new();
        store.expect_list_all().never();

        let mut expired = session();
        expired.expires_at = Utc::now() - ChronoDuration::seconds(1);
        let mut ctx = InventoryContext::new(expired);

        let err = service(store).load_snapshot(&mut ctx).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_atomic_mode_uses_adjust() {
        let mut store = MockItemStore::new();
        store.expect_get().never();
        store.expect_put().never();
        store
            .expect_adjust()
            .withf(|_, delta| *delta == -1)
            .times(1)
            .returning(|_, _| Ok(None));
        store.expect_list_all().returning(|_| Ok(vec![]));

        let svc = InventoryService::new(
            Arc::new(store),
            InventoryOptions {
                atomic_updates: true,
                ..InventoryOptions::default()
            },
        );
        let mut ctx = InventoryContext::new(session());
        assert!(svc.remove_item(&mut ctx, "egg").await.is_ok());
    }

    #[test]
    fn test_options_from_store_config() {
        let config = StoreConfig {
            request_timeout_ms: 250,
            atomic_updates: true,
            ..StoreConfig::default()
        };
        let options = InventoryOptions::from(&config);
        assert_eq!(options.request_timeout, Duration::from_millis(250));
        assert!(options.atomic_updates);
    }
}
