//! Reserved event body layouts.
//!
//! Bodies are the tagged payload of a reserved event, carried on the wire as
//! a byte array inside the envelope. Component and player state passes
//! through as opaque length-prefixed bytes; this module never interprets it.

use buffer::{BufferError, ByteReader, ByteWriter};
use codec::ClientId;

use crate::error::{LimitKind, WireError, WireResult};
use crate::limits::Limits;
use crate::types::{ComponentId, EntityId};

/// Announces a new entity (or re-announces one on ownership transfer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityCreateBody {
    pub entity: EntityId,
    pub owner: ClientId,
    pub type_name: String,
}

impl EntityCreateBody {
    pub fn encode(&self, out: &mut ByteWriter) -> WireResult<()> {
        out.write_i32(self.entity.raw());
        out.write_i32(self.owner.raw());
        out.write_str(&self.type_name)?;
        Ok(())
    }

    pub fn decode(bytes: &[u8], _limits: &Limits) -> WireResult<Self> {
        let mut input = ByteReader::new(bytes);
        let body = Self {
            entity: EntityId::new(input.read_i32()?),
            owner: ClientId::new(input.read_i32()?),
            type_name: input.read_str()?,
        };
        ensure_drained(&input)?;
        Ok(body)
    }
}

/// Removes an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDestroyBody {
    pub entity: EntityId,
}

impl EntityDestroyBody {
    pub fn encode(&self, out: &mut ByteWriter) -> WireResult<()> {
        out.write_i32(self.entity.raw());
        Ok(())
    }

    pub fn decode(bytes: &[u8], _limits: &Limits) -> WireResult<Self> {
        let mut input = ByteReader::new(bytes);
        let body = Self {
            entity: EntityId::new(input.read_i32()?),
        };
        ensure_drained(&input)?;
        Ok(body)
    }
}

/// One changed component within an update body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentUpdate {
    pub component: ComponentId,
    pub bytes: Vec<u8>,
}

/// Carries the changed component payloads for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityUpdateBody {
    pub entity: EntityId,
    pub components: Vec<ComponentUpdate>,
}

impl EntityUpdateBody {
    pub fn encode(&self, out: &mut ByteWriter) -> WireResult<()> {
        out.write_i32(self.entity.raw());
        write_count(self.components.len(), out)?;
        for update in &self.components {
            out.write_i16(update.component.raw());
            out.write_bytes(&update.bytes)?;
        }
        Ok(())
    }

    pub fn decode(bytes: &[u8], limits: &Limits) -> WireResult<Self> {
        let mut input = ByteReader::new(bytes);
        let entity = EntityId::new(input.read_i32()?);
        let count = read_count(&mut input)?;
        if count > limits.max_components_per_update {
            return Err(WireError::LimitsExceeded {
                kind: LimitKind::ComponentCount,
                limit: limits.max_components_per_update,
                actual: count,
            });
        }
        let mut components = Vec::with_capacity(count);
        for _ in 0..count {
            let component = ComponentId::new(input.read_i16()?);
            let bytes = read_payload(&mut input, limits)?;
            components.push(ComponentUpdate { component, bytes });
        }
        ensure_drained(&input)?;
        Ok(Self { entity, components })
    }
}

/// Attaches a component to an existing entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentAddBody {
    pub entity: EntityId,
    pub component: ComponentId,
    pub type_name: String,
    pub bytes: Vec<u8>,
}

impl ComponentAddBody {
    pub fn encode(&self, out: &mut ByteWriter) -> WireResult<()> {
        out.write_i32(self.entity.raw());
        out.write_i16(self.component.raw());
        out.write_str(&self.type_name)?;
        out.write_bytes(&self.bytes)?;
        Ok(())
    }

    pub fn decode(bytes: &[u8], limits: &Limits) -> WireResult<Self> {
        let mut input = ByteReader::new(bytes);
        let body = Self {
            entity: EntityId::new(input.read_i32()?),
            component: ComponentId::new(input.read_i16()?),
            type_name: input.read_str()?,
            bytes: read_payload(&mut input, limits)?,
        };
        ensure_drained(&input)?;
        Ok(body)
    }
}

/// Detaches a component from an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentRemoveBody {
    pub entity: EntityId,
    pub component: ComponentId,
}

impl ComponentRemoveBody {
    pub fn encode(&self, out: &mut ByteWriter) -> WireResult<()> {
        out.write_i32(self.entity.raw());
        out.write_i16(self.component.raw());
        Ok(())
    }

    pub fn decode(bytes: &[u8], _limits: &Limits) -> WireResult<Self> {
        let mut input = ByteReader::new(bytes);
        let body = Self {
            entity: EntityId::new(input.read_i32()?),
            component: ComponentId::new(input.read_i16()?),
        };
        ensure_drained(&input)?;
        Ok(body)
    }
}

/// The roster snapshot unicast to a late joiner.
///
/// Each entry is a client ID plus that player's serialized state. The
/// newcomer itself never appears in the list it receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerListBody {
    pub players: Vec<(ClientId, Vec<u8>)>,
}

impl PlayerListBody {
    pub fn encode(&self, out: &mut ByteWriter) -> WireResult<()> {
        write_count(self.players.len(), out)?;
        for (client, bytes) in &self.players {
            out.write_i32(client.raw());
            out.write_bytes(bytes)?;
        }
        Ok(())
    }

    pub fn decode(bytes: &[u8], limits: &Limits) -> WireResult<Self> {
        let mut input = ByteReader::new(bytes);
        let count = read_count(&mut input)?;
        if count > limits.max_players {
            return Err(WireError::LimitsExceeded {
                kind: LimitKind::PlayerCount,
                limit: limits.max_players,
                actual: count,
            });
        }
        let mut players = Vec::with_capacity(count);
        for _ in 0..count {
            let client = ClientId::new(input.read_i32()?);
            let bytes = read_payload(&mut input, limits)?;
            players.push((client, bytes));
        }
        ensure_drained(&input)?;
        Ok(Self { players })
    }
}

/// A single serialized player payload: the join announcement and the
/// per-tick player delta share this layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerUpdateBody {
    pub bytes: Vec<u8>,
}

impl PlayerUpdateBody {
    pub fn encode(&self, out: &mut ByteWriter) -> WireResult<()> {
        out.write_bytes(&self.bytes)?;
        Ok(())
    }

    pub fn decode(bytes: &[u8], limits: &Limits) -> WireResult<Self> {
        let mut input = ByteReader::new(bytes);
        let body = Self {
            bytes: read_payload(&mut input, limits)?,
        };
        ensure_drained(&input)?;
        Ok(body)
    }
}

fn ensure_drained(input: &ByteReader<'_>) -> WireResult<()> {
    if input.is_empty() {
        Ok(())
    } else {
        Err(WireError::TrailingBytes {
            remaining: input.remaining(),
        })
    }
}

fn write_count(count: usize, out: &mut ByteWriter) -> WireResult<()> {
    let count =
        i32::try_from(count).map_err(|_| BufferError::ArrayTooLong { length: count })?;
    out.write_i32(count);
    Ok(())
}

fn read_count(input: &mut ByteReader<'_>) -> WireResult<usize> {
    let count = input.read_i32()?;
    if count < 0 {
        return Err(WireError::Buffer(BufferError::NegativeLength {
            length: i64::from(count),
        }));
    }
    Ok(count as usize)
}

// Length is validated against the limit before any bytes are copied.
fn read_payload(input: &mut ByteReader<'_>, limits: &Limits) -> WireResult<Vec<u8>> {
    let length = read_count(input)?;
    if length > limits.max_payload_bytes {
        return Err(WireError::LimitsExceeded {
            kind: LimitKind::PayloadBytes,
            limit: limits.max_payload_bytes,
            actual: length,
        });
    }
    Ok(input.read_raw(length)?.to_vec())
}
