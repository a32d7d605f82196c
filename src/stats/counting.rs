//! Counting Service

use crate::domain::EntityKind;
use crate::store::{StatsStore, StoreResult};

/// Count rows of one entity kind
pub async fn count(store: &dyn StatsStore, kind: EntityKind) -> StoreResult<u64> {
    let count = store.count(kind).await?;
    tracing::debug!(kind = %kind, count = count, "Counted entities");
    Ok(count)
}
