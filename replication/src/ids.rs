//! Owner-partitioned entity ID allocation.

use std::collections::{BTreeMap, HashMap};

use codec::ClientId;
use wire::EntityId;

use crate::entity::Entity;
use crate::error::{ReplicationError, ReplicationResult};

/// Size of each owner's ID partition. Client `c` allocates from
/// `c * 1000 ..= c * 1000 + 999`.
pub const ENTITY_IDS_PER_OWNER: i32 = 1000;

/// IDs below this threshold name pre-placed scene entities and are never
/// allocated automatically.
pub const SCENE_ID_THRESHOLD: i32 = 1000;

/// Allocates entity IDs within each owner's partition.
///
/// Scanning resumes after the last allocated slot and wraps within the
/// partition, so freed IDs are reused only after the offset space cycles —
/// this keeps stale remote references from landing on fresh entities.
#[derive(Debug, Default)]
pub(crate) struct IdAllocator {
    last_offset: HashMap<ClientId, i32>,
}

impl IdAllocator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Allocates the next free ID in `owner`'s partition.
    pub(crate) fn allocate(
        &mut self,
        owner: ClientId,
        in_use: &BTreeMap<EntityId, Entity>,
    ) -> ReplicationResult<EntityId> {
        let base = i64::from(owner.raw()) * i64::from(ENTITY_IDS_PER_OWNER);
        if base <= 0 || base + i64::from(ENTITY_IDS_PER_OWNER) > i64::from(i32::MAX) {
            return Err(ReplicationError::IdSpaceExhausted { owner });
        }

        let start = self.last_offset.get(&owner).copied().unwrap_or(0);
        for step in 1..=ENTITY_IDS_PER_OWNER {
            let offset = (start + step) % ENTITY_IDS_PER_OWNER;
            let id = EntityId::new((base + i64::from(offset)) as i32);
            if !in_use.contains_key(&id) {
                self.last_offset.insert(owner, offset);
                return Ok(id);
            }
        }
        Err(ReplicationError::IdSpaceExhausted { owner })
    }
}
