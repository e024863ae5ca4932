//! Delta-based entity and player replication over the tagnet protocol.
//!
//! Entities are partitioned by owner: exactly one peer holds write
//! authority over each entity and broadcasts deltas; everyone else applies
//! them. Change detection is byte-level — each component slot caches its
//! last serialized form and a component is re-sent only when the fresh
//! bytes differ. The player directory tracks per-client session state with
//! the same cache policy, and late joiners receive a roster snapshot from
//! the authoritative peer before the session is considered ready.
//!
//! # Example
//!
//! ```no_run
//! use replication::{
//!     Component, InstantiateOptions, ManagerConfig, ReplicationManager, TypeCatalog,
//! };
//! use transport::LoopbackHub;
//! use wire::{ClientId, ComponentId};
//!
//! # use buffer::{ByteReader, ByteWriter};
//! # use std::any::Any;
//! # #[derive(Default)]
//! # struct Health { current: i32 }
//! # impl Component for Health {
//! #     fn type_name(&self) -> &'static str { "health" }
//! #     fn serialize(&self, out: &mut ByteWriter) -> replication::ReplicationResult<()> {
//! #         out.write_i32(self.current);
//! #         Ok(())
//! #     }
//! #     fn apply(&mut self, input: &mut ByteReader<'_>) -> replication::ReplicationResult<()> {
//! #         self.current = input.read_i32()?;
//! #         Ok(())
//! #     }
//! #     fn as_any(&self) -> &dyn Any { self }
//! #     fn as_any_mut(&mut self) -> &mut dyn Any { self }
//! # }
//! # fn run() -> replication::ReplicationResult<()> {
//! let mut catalog = TypeCatalog::new();
//! catalog.register_entity("ship", || {
//!     vec![(ComponentId::new(1), Box::<Health>::default() as _)]
//! })?;
//!
//! let hub = LoopbackHub::new();
//! let endpoint = hub.connect(ClientId::new(1)).unwrap();
//! let mut manager = ReplicationManager::new(endpoint, catalog, ManagerConfig::default());
//! // ... set a local player, initialize, then instantiate and tick.
//! # Ok(())
//! # }
//! ```

mod catalog;
mod component;
mod config;
mod entity;
mod error;
mod events;
mod ids;
mod manager;
mod players;
mod synced;

pub use catalog::{ComponentFactory, EntityFactory, PlayerFactory, TypeCatalog};
pub use component::Component;
pub use config::ManagerConfig;
pub use entity::{Entity, InstantiateOptions};
pub use error::{ProtocolViolation, ReplicationError, ReplicationResult};
pub use events::ReplicationEvent;
pub use ids::{ENTITY_IDS_PER_OWNER, SCENE_ID_THRESHOLD};
pub use manager::{ReplicationManager, SessionPhase};
pub use players::{Player, PlayerDirectory};
pub use synced::{
    apply_synced, encode_synced, SyncedEncode, SyncedFields, SyncedSlot, SyncedValue,
};
