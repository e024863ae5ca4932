//! The replication manager: entity lifecycle, delta emission, session flow.

use std::collections::BTreeMap;
use std::time::Instant;

use buffer::{ByteReader, ByteWriter};
use codec::{ClientId, EventCode, Serializer, Value};
use transport::{IncomingEvent, Transport};
use wire::{
    ComponentAddBody, ComponentId, ComponentRemoveBody, ComponentUpdate, EntityCreateBody,
    EntityDestroyBody, EntityId, EntityUpdateBody, MessageTarget, PlayerListBody, PlayerUpdateBody,
    WireResult, COMPONENT_ADD, COMPONENT_REMOVE, ENTITY_CREATE, ENTITY_DESTROY, ENTITY_UPDATE,
    PLAYER_JOIN, PLAYER_LIST, PLAYER_UPDATE,
};

use crate::catalog::TypeCatalog;
use crate::component::Component;
use crate::config::ManagerConfig;
use crate::entity::{Entity, InstantiateOptions};
use crate::error::{ProtocolViolation, ReplicationError, ReplicationResult};
use crate::events::ReplicationEvent;
use crate::ids::{IdAllocator, SCENE_ID_THRESHOLD};
use crate::players::{Player, PlayerDirectory};

/// Where the session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No local player set or `initialize` not called yet.
    Uninitialized,

    /// Join announced; waiting for the authoritative roster snapshot.
    AwaitingPlayerList { deadline: Instant },

    /// Fully joined; replication is running.
    Ready,
}

/// Drives replication over one transport endpoint.
///
/// Single-threaded by design: all state changes happen inside explicit calls
/// and [`update`](Self::update), which the owner invokes once per tick. The
/// returned [`ReplicationEvent`]s are the only notification channel — local
/// operations and remote traffic surface through the same stream.
pub struct ReplicationManager<T: Transport> {
    transport: T,
    serializer: Serializer,
    catalog: TypeCatalog,
    config: ManagerConfig,
    entities: BTreeMap<EntityId, Entity>,
    allocator: IdAllocator,
    directory: PlayerDirectory,
    local_player: Option<Box<dyn Player>>,
    player_cache: Vec<u8>,
    phase: SessionPhase,
    scratch: ByteWriter,
    pending: Vec<ReplicationEvent>,
}

impl<T: Transport> ReplicationManager<T> {
    /// Creates a manager over a connected transport endpoint.
    #[must_use]
    pub fn new(transport: T, catalog: TypeCatalog, config: ManagerConfig) -> Self {
        Self {
            transport,
            serializer: Serializer::new(),
            catalog,
            config,
            entities: BTreeMap::new(),
            allocator: IdAllocator::new(),
            directory: PlayerDirectory::new(),
            local_player: None,
            player_cache: Vec::new(),
            phase: SessionPhase::Uninitialized,
            scratch: ByteWriter::new(),
            pending: Vec::new(),
        }
    }

    /// The client ID this manager speaks as.
    #[must_use]
    pub fn local_client(&self) -> ClientId {
        self.transport.local_client()
    }

    /// Returns `true` if this peer is the authoritative one.
    #[must_use]
    pub fn is_server(&self) -> bool {
        self.transport.is_server()
    }

    /// The current session phase.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Returns `true` once the session reached the ready phase.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self.phase, SessionPhase::Ready)
    }

    /// The serializer, for registering custom application value types.
    pub fn serializer_mut(&mut self) -> &mut Serializer {
        &mut self.serializer
    }

    /// Remote players known to this session.
    #[must_use]
    pub const fn players(&self) -> &PlayerDirectory {
        &self.directory
    }

    /// Downcasts the local player.
    #[must_use]
    pub fn local_player<P: Player>(&self) -> Option<&P> {
        self.local_player.as_ref()?.as_any().downcast_ref::<P>()
    }

    /// Mutable downcast of the local player.
    pub fn local_player_mut<P: Player>(&mut self) -> Option<&mut P> {
        self.local_player
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<P>()
    }

    /// Looks up an entity.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// All known entity IDs, ascending.
    #[must_use]
    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    /// Downcasts a component on an entity.
    #[must_use]
    pub fn component<C: Component>(&self, entity: EntityId, slot: ComponentId) -> Option<&C> {
        self.entities.get(&entity)?.component::<C>(slot)
    }

    /// Mutable downcast of a component on an entity.
    pub fn component_mut<C: Component>(
        &mut self,
        entity: EntityId,
        slot: ComponentId,
    ) -> Option<&mut C> {
        self.entities.get_mut(&entity)?.component_mut::<C>(slot)
    }

    /// Sets the local player. Must happen before [`initialize`](Self::initialize).
    pub fn set_local_player(&mut self, player: Box<dyn Player>) -> ReplicationResult<()> {
        if !matches!(self.phase, SessionPhase::Uninitialized) {
            return Err(ReplicationError::AlreadyInitialized);
        }
        self.local_player = Some(player);
        Ok(())
    }

    /// Starts the session.
    ///
    /// The authoritative peer becomes ready immediately. A joiner announces
    /// itself and waits for the roster snapshot; the wait is bounded by
    /// `config.player_list_timeout` and checked during [`update`](Self::update).
    pub fn initialize(&mut self) -> ReplicationResult<()> {
        if !matches!(self.phase, SessionPhase::Uninitialized) {
            return Err(ReplicationError::AlreadyInitialized);
        }
        let Some(player) = &self.local_player else {
            return Err(ReplicationError::MissingLocalPlayer);
        };
        self.scratch.clear();
        player.serialize(&mut self.scratch)?;
        self.player_cache = self.scratch.as_slice().to_vec();

        if self.transport.is_server() {
            log::debug!("session ready as server, client {}", self.local_client().raw());
            self.phase = SessionPhase::Ready;
            self.pending.push(ReplicationEvent::SessionReady);
        } else {
            let body = PlayerUpdateBody {
                bytes: self.player_cache.clone(),
            };
            self.broadcast(PLAYER_JOIN, |out| body.encode(out), true)?;
            self.phase = SessionPhase::AwaitingPlayerList {
                deadline: Instant::now() + self.config.player_list_timeout,
            };
            log::debug!("join announced, awaiting player list");
        }
        Ok(())
    }

    /// Creates an entity from a catalog type and announces it.
    pub fn instantiate(
        &mut self,
        type_name: &str,
        options: InstantiateOptions,
    ) -> ReplicationResult<EntityId> {
        self.ensure_ready()?;
        if options.scene_owned && !self.transport.is_server() {
            return Err(ReplicationError::SceneOwnedRequiresServer);
        }
        let factory = self.catalog.entity_factory(type_name).ok_or_else(|| {
            ReplicationError::UnknownTypeName {
                type_name: type_name.to_string(),
            }
        })?;

        // Scene-owned entities still draw IDs from the creator's partition.
        let local = self.transport.local_client();
        let id = self.allocator.allocate(local, &self.entities)?;
        let owner = if options.scene_owned {
            ClientId::SCENE
        } else {
            local
        };

        let mut entity = Entity::new(id, owner, type_name.to_string(), options);
        for (component_id, component) in factory() {
            self.scratch.clear();
            component.serialize(&mut self.scratch)?;
            entity.add_slot(component_id, component, self.scratch.as_slice().to_vec())?;
        }
        self.entities.insert(id, entity);

        let body = EntityCreateBody {
            entity: id,
            owner,
            type_name: type_name.to_string(),
        };
        self.broadcast(ENTITY_CREATE, |out| body.encode(out), true)?;
        self.pending
            .push(ReplicationEvent::EntityCreated { entity: id, owner });
        log::debug!("instantiated entity {} as {}", id.raw(), type_name);
        Ok(id)
    }

    /// Registers a pre-placed scene entity under a fixed low ID.
    ///
    /// Every peer performs the same registration during setup; nothing is
    /// broadcast.
    pub fn register_scene_entity(
        &mut self,
        id: EntityId,
        type_name: &str,
    ) -> ReplicationResult<()> {
        if id.raw() < 1 || id.raw() >= SCENE_ID_THRESHOLD {
            return Err(ReplicationError::SceneIdOutOfRange { entity: id });
        }
        if self.entities.contains_key(&id) {
            return Err(ReplicationError::EntityAlreadyExists { entity: id });
        }
        let factory = self.catalog.entity_factory(type_name).ok_or_else(|| {
            ReplicationError::UnknownTypeName {
                type_name: type_name.to_string(),
            }
        })?;

        let mut entity = Entity::new(
            id,
            ClientId::SCENE,
            type_name.to_string(),
            InstantiateOptions::default(),
        );
        for (component_id, component) in factory() {
            self.scratch.clear();
            component.serialize(&mut self.scratch)?;
            entity.add_slot(component_id, component, self.scratch.as_slice().to_vec())?;
        }
        self.entities.insert(id, entity);
        Ok(())
    }

    /// Destroys a locally owned entity and announces the removal.
    pub fn destroy(&mut self, id: EntityId) -> ReplicationResult<()> {
        self.ensure_ready()?;
        self.ensure_owner(id)?;

        if let Some(entity) = self.entities.remove(&id) {
            for component in entity.component_ids() {
                self.pending
                    .push(ReplicationEvent::ComponentRemoved { entity: id, component });
            }
        }
        self.pending.push(ReplicationEvent::EntityDestroyed { entity: id });

        let body = EntityDestroyBody { entity: id };
        self.broadcast(ENTITY_DESTROY, |out| body.encode(out), true)?;
        log::debug!("destroyed entity {}", id.raw());
        Ok(())
    }

    /// Attaches a component to a locally owned entity and announces it.
    pub fn add_component(
        &mut self,
        id: EntityId,
        component_id: ComponentId,
        component: Box<dyn Component>,
    ) -> ReplicationResult<()> {
        self.ensure_ready()?;
        self.ensure_owner(id)?;

        self.scratch.clear();
        component.serialize(&mut self.scratch)?;
        let bytes = self.scratch.as_slice().to_vec();
        let type_name = component.type_name().to_string();

        let Some(entity) = self.entities.get_mut(&id) else {
            return Err(ReplicationError::EntityNotFound { entity: id });
        };
        entity.add_slot(component_id, component, bytes.clone())?;

        let body = ComponentAddBody {
            entity: id,
            component: component_id,
            type_name,
            bytes,
        };
        self.broadcast(COMPONENT_ADD, |out| body.encode(out), true)?;
        self.pending.push(ReplicationEvent::ComponentAdded {
            entity: id,
            component: component_id,
        });
        Ok(())
    }

    /// Detaches a component from a locally owned entity.
    ///
    /// Returns `Ok(false)` if the slot was already empty.
    pub fn remove_component(
        &mut self,
        id: EntityId,
        component_id: ComponentId,
    ) -> ReplicationResult<bool> {
        self.ensure_ready()?;
        self.ensure_owner(id)?;

        let Some(entity) = self.entities.get_mut(&id) else {
            return Err(ReplicationError::EntityNotFound { entity: id });
        };
        if entity.remove_slot(component_id).is_none() {
            return Ok(false);
        }

        let body = ComponentRemoveBody {
            entity: id,
            component: component_id,
        };
        self.broadcast(COMPONENT_REMOVE, |out| body.encode(out), true)?;
        self.pending.push(ReplicationEvent::ComponentRemoved {
            entity: id,
            component: component_id,
        });
        Ok(true)
    }

    /// Hands a locally owned entity to another client.
    ///
    /// The transfer is a create re-announcement with the new owner; peers
    /// that already know the entity treat it as an ownership change.
    pub fn transfer_ownership(
        &mut self,
        id: EntityId,
        new_owner: ClientId,
    ) -> ReplicationResult<()> {
        self.ensure_ready()?;
        self.ensure_owner(id)?;

        let Some(entity) = self.entities.get_mut(&id) else {
            return Err(ReplicationError::EntityNotFound { entity: id });
        };
        let previous = entity.owner();
        entity.set_owner(new_owner);
        let type_name = entity.type_name().to_string();

        let body = EntityCreateBody {
            entity: id,
            owner: new_owner,
            type_name,
        };
        self.broadcast(ENTITY_CREATE, |out| body.encode(out), true)?;
        self.pending.push(ReplicationEvent::OwnershipTransferred {
            entity: id,
            previous,
            owner: new_owner,
        });
        log::debug!(
            "transferred entity {} from {} to {}",
            id.raw(),
            previous.raw(),
            new_owner.raw()
        );
        Ok(())
    }

    /// Gates a locally owned entity's participation in the delta pass.
    pub fn set_active(&mut self, id: EntityId, active: bool) -> ReplicationResult<()> {
        self.ensure_owner(id)?;
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.set_active(active);
        }
        Ok(())
    }

    /// Sends an application-level event.
    pub fn raise_event(
        &mut self,
        code: EventCode,
        data: &Value,
        target: &MessageTarget,
        reliable: bool,
    ) -> ReplicationResult<()> {
        if code.is_reserved() {
            return Err(ReplicationError::ReservedEventCode { code: code.raw() });
        }
        self.ensure_ready()?;
        let bytes = self.serializer.encode_value(data)?;
        self.transport.send(code, &bytes, target, reliable)?;
        Ok(())
    }

    /// Runs one replication tick.
    ///
    /// Drains transport notifications and events, enforces the session
    /// timeout, emits entity and player deltas, and returns everything
    /// observable that happened.
    pub fn update(&mut self) -> ReplicationResult<Vec<ReplicationEvent>> {
        if matches!(self.phase, SessionPhase::Uninitialized) {
            return Ok(Vec::new());
        }

        while let Some(client) = self.transport.poll_joined() {
            log::debug!("client {} joined the transport", client.raw());
        }
        self.drain_leaves();
        while let Some(event) = self.transport.poll_event() {
            self.handle_incoming(event)?;
        }
        self.check_session_timeout()?;

        if self.is_ready() {
            self.emit_entity_deltas()?;
            self.emit_player_delta()?;
        }
        Ok(std::mem::take(&mut self.pending))
    }

    fn ensure_ready(&self) -> ReplicationResult<()> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(ReplicationError::NotReady)
        }
    }

    fn ensure_owner(&self, id: EntityId) -> ReplicationResult<()> {
        let Some(entity) = self.entities.get(&id) else {
            return Err(ReplicationError::EntityNotFound { entity: id });
        };
        let local = self.transport.local_client();
        if entity.is_local(local, self.transport.is_server()) {
            Ok(())
        } else {
            Err(ReplicationError::NotOwner {
                entity: id,
                owner: entity.owner(),
                local,
            })
        }
    }

    fn broadcast(
        &mut self,
        code: EventCode,
        encode: impl FnOnce(&mut ByteWriter) -> WireResult<()>,
        reliable: bool,
    ) -> ReplicationResult<()> {
        let mut writer = ByteWriter::new();
        encode(&mut writer)?;
        self.transport
            .send(code, writer.as_slice(), &MessageTarget::Others, reliable)?;
        Ok(())
    }

    fn check_session_timeout(&self) -> ReplicationResult<()> {
        if let SessionPhase::AwaitingPlayerList { deadline } = self.phase {
            if Instant::now() >= deadline {
                let waited_ms = u64::try_from(self.config.player_list_timeout.as_millis())
                    .unwrap_or(u64::MAX);
                return Err(ReplicationError::InitTimeout { waited_ms });
            }
        }
        Ok(())
    }

    fn drain_leaves(&mut self) {
        while let Some(client) = self.transport.poll_left() {
            log::debug!("client {} left the transport", client.raw());
            if self.config.remove_player_on_leave && self.directory.remove(client).is_some() {
                self.pending.push(ReplicationEvent::PlayerLeft { client });
            }
            if self.config.destroy_entities_on_leave {
                // Local unregistration only. Every surviving peer runs the
                // same cleanup, so nothing is broadcast.
                let doomed: Vec<EntityId> = self
                    .entities
                    .iter()
                    .filter(|(_, entity)| entity.owner() == client)
                    .map(|(id, _)| *id)
                    .collect();
                for id in doomed {
                    if let Some(entity) = self.entities.remove(&id) {
                        for component in entity.component_ids() {
                            self.pending.push(ReplicationEvent::ComponentRemoved {
                                entity: id,
                                component,
                            });
                        }
                    }
                    self.pending
                        .push(ReplicationEvent::EntityDestroyed { entity: id });
                }
            }
        }
    }

    fn handle_incoming(&mut self, event: IncomingEvent) -> ReplicationResult<()> {
        let IncomingEvent {
            sender,
            code,
            payload,
        } = event;
        if code == ENTITY_CREATE {
            self.on_entity_create(&payload)
        } else if code == ENTITY_DESTROY {
            self.on_entity_destroy(sender, &payload)
        } else if code == ENTITY_UPDATE {
            self.on_entity_update(sender, &payload)
        } else if code == COMPONENT_ADD {
            self.on_component_add(sender, &payload)
        } else if code == COMPONENT_REMOVE {
            self.on_component_remove(sender, &payload)
        } else if code == PLAYER_JOIN {
            self.on_player_join(sender, &payload)
        } else if code == PLAYER_LIST {
            self.on_player_list(&payload)
        } else if code == PLAYER_UPDATE {
            self.on_player_update(sender, &payload)
        } else if code.is_reserved() {
            log::warn!("unhandled reserved event code {} dropped", code.raw());
            Ok(())
        } else {
            let data = self.serializer.decode_value(&payload)?;
            self.pending
                .push(ReplicationEvent::Application { sender, code, data });
            Ok(())
        }
    }

    fn on_entity_create(&mut self, payload: &[u8]) -> ReplicationResult<()> {
        let body = EntityCreateBody::decode(payload, &self.config.limits)?;

        if let Some(entity) = self.entities.get_mut(&body.entity) {
            // A re-announcement with a new owner is an ownership transfer;
            // with the same owner it is a duplicate.
            if entity.owner() == body.owner {
                log::warn!("duplicate create for entity {} dropped", body.entity.raw());
                return Ok(());
            }
            let previous = entity.owner();
            entity.set_owner(body.owner);
            self.pending.push(ReplicationEvent::OwnershipTransferred {
                entity: body.entity,
                previous,
                owner: body.owner,
            });
            return Ok(());
        }

        let Some(factory) = self.catalog.entity_factory(&body.type_name) else {
            log::warn!(
                "create for unknown entity type {:?} dropped",
                body.type_name
            );
            return Ok(());
        };
        let mut entity = Entity::new(
            body.entity,
            body.owner,
            body.type_name.clone(),
            InstantiateOptions::default(),
        );
        for (component_id, component) in factory() {
            self.scratch.clear();
            component.serialize(&mut self.scratch)?;
            entity.add_slot(component_id, component, self.scratch.as_slice().to_vec())?;
        }
        self.entities.insert(body.entity, entity);
        self.pending.push(ReplicationEvent::EntityCreated {
            entity: body.entity,
            owner: body.owner,
        });
        Ok(())
    }

    fn on_entity_destroy(&mut self, sender: ClientId, payload: &[u8]) -> ReplicationResult<()> {
        let body = EntityDestroyBody::decode(payload, &self.config.limits)?;
        let local = self.transport.local_client();
        let is_server = self.transport.is_server();

        let Some(entity) = self.entities.get(&body.entity) else {
            log::warn!("destroy for unknown entity {} dropped", body.entity.raw());
            return Ok(());
        };
        if entity.is_local(local, is_server) {
            return Err(ProtocolViolation::RemoteWriteToOwnedEntity {
                entity: body.entity,
                sender,
            }
            .into());
        }
        if let Some(entity) = self.entities.remove(&body.entity) {
            for component in entity.component_ids() {
                self.pending.push(ReplicationEvent::ComponentRemoved {
                    entity: body.entity,
                    component,
                });
            }
        }
        self.pending.push(ReplicationEvent::EntityDestroyed {
            entity: body.entity,
        });
        Ok(())
    }

    fn on_entity_update(&mut self, sender: ClientId, payload: &[u8]) -> ReplicationResult<()> {
        let body = EntityUpdateBody::decode(payload, &self.config.limits)?;
        let local = self.transport.local_client();
        let is_server = self.transport.is_server();

        let Some(entity) = self.entities.get_mut(&body.entity) else {
            log::warn!("update for unknown entity {} dropped", body.entity.raw());
            return Ok(());
        };
        if entity.is_local(local, is_server) {
            return Err(ProtocolViolation::RemoteWriteToOwnedEntity {
                entity: body.entity,
                sender,
            }
            .into());
        }
        for update in body.components {
            let Some(slot) = entity.slots.get_mut(&update.component) else {
                log::warn!(
                    "update for unknown component {} on entity {} dropped",
                    update.component.raw(),
                    body.entity.raw()
                );
                continue;
            };
            let mut reader = ByteReader::new(&update.bytes);
            slot.component.apply(&mut reader)?;
            slot.cache = update.bytes;
        }
        Ok(())
    }

    fn on_component_add(&mut self, sender: ClientId, payload: &[u8]) -> ReplicationResult<()> {
        let body = ComponentAddBody::decode(payload, &self.config.limits)?;
        let local = self.transport.local_client();
        let is_server = self.transport.is_server();

        let Some(entity) = self.entities.get_mut(&body.entity) else {
            log::warn!(
                "component add for unknown entity {} dropped",
                body.entity.raw()
            );
            return Ok(());
        };
        if entity.is_local(local, is_server) {
            return Err(ProtocolViolation::RemoteWriteToOwnedEntity {
                entity: body.entity,
                sender,
            }
            .into());
        }
        if entity.has_component(body.component) {
            log::warn!(
                "component add for occupied slot {} on entity {} dropped",
                body.component.raw(),
                body.entity.raw()
            );
            return Ok(());
        }
        let Some(factory) = self.catalog.component_factory(&body.type_name) else {
            log::warn!(
                "component add with unknown type {:?} dropped",
                body.type_name
            );
            return Ok(());
        };
        let mut component = factory();
        let mut reader = ByteReader::new(&body.bytes);
        component.apply(&mut reader)?;
        entity.add_slot(body.component, component, body.bytes.clone())?;
        self.pending.push(ReplicationEvent::ComponentAdded {
            entity: body.entity,
            component: body.component,
        });
        Ok(())
    }

    fn on_component_remove(&mut self, sender: ClientId, payload: &[u8]) -> ReplicationResult<()> {
        let body = ComponentRemoveBody::decode(payload, &self.config.limits)?;
        let local = self.transport.local_client();
        let is_server = self.transport.is_server();

        let Some(entity) = self.entities.get_mut(&body.entity) else {
            log::warn!(
                "component remove for unknown entity {} dropped",
                body.entity.raw()
            );
            return Ok(());
        };
        if entity.is_local(local, is_server) {
            return Err(ProtocolViolation::RemoteWriteToOwnedEntity {
                entity: body.entity,
                sender,
            }
            .into());
        }
        if entity.remove_slot(body.component).is_none() {
            log::warn!(
                "component remove for empty slot {} on entity {} dropped",
                body.component.raw(),
                body.entity.raw()
            );
            return Ok(());
        }
        self.pending.push(ReplicationEvent::ComponentRemoved {
            entity: body.entity,
            component: body.component,
        });
        Ok(())
    }

    fn on_player_join(&mut self, sender: ClientId, payload: &[u8]) -> ReplicationResult<()> {
        let body = PlayerUpdateBody::decode(payload, &self.config.limits)?;
        let player = self.construct_player(sender, &body.bytes)?;
        self.directory.insert(sender, player);
        self.pending
            .push(ReplicationEvent::PlayerJoined { client: sender });
        log::debug!("player {} joined", sender.raw());

        if self.transport.is_server() {
            self.send_player_list(sender)?;
        }
        Ok(())
    }

    // Roster snapshot for a newcomer: everyone this peer knows, the local
    // player included, the newcomer itself excluded.
    fn send_player_list(&mut self, newcomer: ClientId) -> ReplicationResult<()> {
        let mut players = Vec::new();
        if let Some(player) = &self.local_player {
            self.scratch.clear();
            player.serialize(&mut self.scratch)?;
            players.push((
                self.transport.local_client(),
                self.scratch.as_slice().to_vec(),
            ));
        }
        for (client, player) in self.directory.iter() {
            if client == newcomer {
                continue;
            }
            self.scratch.clear();
            player.serialize(&mut self.scratch)?;
            players.push((client, self.scratch.as_slice().to_vec()));
        }

        let body = PlayerListBody { players };
        let mut writer = ByteWriter::new();
        body.encode(&mut writer)?;
        self.transport.send(
            PLAYER_LIST,
            writer.as_slice(),
            &MessageTarget::Clients(vec![newcomer]),
            true,
        )?;
        Ok(())
    }

    fn on_player_list(&mut self, payload: &[u8]) -> ReplicationResult<()> {
        if !matches!(self.phase, SessionPhase::AwaitingPlayerList { .. }) {
            log::warn!("unexpected player list dropped");
            return Ok(());
        }
        let body = PlayerListBody::decode(payload, &self.config.limits)?;
        for (client, bytes) in body.players {
            let player = self.construct_player(client, &bytes)?;
            self.directory.insert(client, player);
            self.pending
                .push(ReplicationEvent::PlayerJoined { client });
        }
        self.phase = SessionPhase::Ready;
        self.pending.push(ReplicationEvent::SessionReady);
        log::debug!("player list received, session ready");
        Ok(())
    }

    fn on_player_update(&mut self, sender: ClientId, payload: &[u8]) -> ReplicationResult<()> {
        let body = PlayerUpdateBody::decode(payload, &self.config.limits)?;
        let Some(player) = self.directory.get_dyn_mut(sender) else {
            log::warn!("player update for unknown client {} dropped", sender.raw());
            return Ok(());
        };
        let mut reader = ByteReader::new(&body.bytes);
        if player.apply(&mut reader).is_err() || !reader.is_empty() {
            return Err(ProtocolViolation::PlayerTypeMismatch { client: sender }.into());
        }
        Ok(())
    }

    fn construct_player(
        &mut self,
        client: ClientId,
        bytes: &[u8],
    ) -> ReplicationResult<Box<dyn Player>> {
        let Some(factory) = self.catalog.player_factory() else {
            return Err(ProtocolViolation::PlayerTypeMismatch { client }.into());
        };
        let mut player = factory();
        let mut reader = ByteReader::new(bytes);
        if player.apply(&mut reader).is_err() || !reader.is_empty() {
            return Err(ProtocolViolation::PlayerTypeMismatch { client }.into());
        }
        Ok(player)
    }

    fn emit_entity_deltas(&mut self) -> ReplicationResult<()> {
        let local = self.transport.local_client();
        let is_server = self.transport.is_server();
        let reliable_default = self.config.reliable_updates;

        // BTreeMap iteration keeps emission in entity ID ascending order.
        let mut outgoing: Vec<(EntityUpdateBody, bool)> = Vec::new();
        for entity in self.entities.values_mut() {
            if !entity.active() || !entity.is_local(local, is_server) {
                continue;
            }
            let send_all = !entity.update_when_changed();
            let reliable = entity.reliable() || reliable_default;
            let id = entity.id();

            let mut components = Vec::new();
            for (component_id, slot) in &mut entity.slots {
                self.scratch.clear();
                slot.component.serialize(&mut self.scratch)?;
                let bytes = self.scratch.as_slice();
                if send_all || bytes != slot.cache.as_slice() {
                    slot.cache = bytes.to_vec();
                    components.push(ComponentUpdate {
                        component: *component_id,
                        bytes: slot.cache.clone(),
                    });
                }
            }
            // No changed component means no event at all.
            if !components.is_empty() {
                outgoing.push((EntityUpdateBody { entity: id, components }, reliable));
            }
        }

        for (body, reliable) in outgoing {
            self.broadcast(ENTITY_UPDATE, |out| body.encode(out), reliable)?;
        }
        Ok(())
    }

    fn emit_player_delta(&mut self) -> ReplicationResult<()> {
        let Some(player) = &self.local_player else {
            return Ok(());
        };
        self.scratch.clear();
        player.serialize(&mut self.scratch)?;
        if self.scratch.as_slice() == self.player_cache.as_slice() {
            return Ok(());
        }
        self.player_cache = self.scratch.as_slice().to_vec();

        let body = PlayerUpdateBody {
            bytes: self.player_cache.clone(),
        };
        let reliable = self.config.reliable_updates;
        self.broadcast(PLAYER_UPDATE, |out| body.encode(out), reliable)?;
        Ok(())
    }
}
