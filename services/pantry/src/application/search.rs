//! 快照搜索

use pantry_domain_core::{InventoryItem, Snapshot};

/// 名称包含 `query`（不区分大小写）的物品，按名称字典序排列
///
/// 纯函数，只作用于已加载的快照；空查询返回全部物品
pub fn search(snapshot: &Snapshot, query: &str) -> Vec<InventoryItem> {
    let needle = query.to_lowercase();

    let mut hits: Vec<InventoryItem> = snapshot
        .items()
        .iter()
        .filter(|item| item.name.contains_lowercase(&needle))
        .cloned()
        .collect();

    hits.sort_by_cached_key(|item| (item.name.as_str().to_lowercase(), item.name.clone()));
    hits
}
