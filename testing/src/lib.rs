//! # Event Store Testing
//!
//! An in-memory `EventStore`/`SnapshotStore` backend plus the reusable
//! contract-test harness that any concrete backend must pass.
//!
//! ## Modules
//!
//! - [`in_memory_event_store`]: a fast, non-durable `EventStore`
//! - [`in_memory_snapshot_store`]: a fast, non-durable `SnapshotStore`
//! - [`fixtures`]: sample domain event payloads for the harness and examples
//! - [`contract`]: the backend-agnostic conformance suite (C6)
//!
//! ## Example
//!
//! ```
//! use event_store_testing::InMemoryEventStore;
//! use event_store_testing::contract::run_event_store_contract;
//!
//! # tokio_test::block_on(async {
//! run_event_store_contract(
//!     || async { InMemoryEventStore::new() },
//!     |_store| async {},
//! )
//! .await;
//! # });
//! ```

pub mod contract;
pub mod fixtures;
pub mod in_memory_event_store;
pub mod in_memory_snapshot_store;
#[cfg(test)]
mod properties;

pub use in_memory_event_store::InMemoryEventStore;
pub use in_memory_snapshot_store::InMemorySnapshotStore;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{run_event_store_contract, run_snapshot_store_contract};

    #[tokio::test]
    async fn in_memory_event_store_passes_the_contract_suite() {
        run_event_store_contract(
            || async { InMemoryEventStore::new() },
            |_store| async {},
        )
        .await;
    }

    #[tokio::test]
    async fn in_memory_snapshot_store_passes_the_contract_suite() {
        run_snapshot_store_contract(
            || async { InMemorySnapshotStore::new() },
            |_store| async {},
        )
        .await;
    }
}
