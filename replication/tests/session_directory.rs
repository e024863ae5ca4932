//! Session flow and player directory behavior over the loopback transport.

use std::any::Any;
use std::time::Duration;

use buffer::{ByteReader, ByteWriter};
use replication::{
    Component, InstantiateOptions, ManagerConfig, Player, ProtocolViolation, ReplicationError,
    ReplicationEvent, ReplicationManager, ReplicationResult, SessionPhase, TypeCatalog,
};
use transport::{LoopbackEndpoint, LoopbackHub, Transport};
use wire::{ClientId, ComponentId, MessageTarget, PLAYER_JOIN, PLAYER_UPDATE};

#[derive(Default)]
struct Score {
    points: i32,
}

impl Component for Score {
    fn type_name(&self) -> &'static str {
        "score"
    }

    fn serialize(&self, out: &mut ByteWriter) -> ReplicationResult<()> {
        out.write_i32(self.points);
        Ok(())
    }

    fn apply(&mut self, input: &mut ByteReader<'_>) -> ReplicationResult<()> {
        self.points = input.read_i32()?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[derive(Default)]
struct Profile {
    name: String,
}

impl Player for Profile {
    fn type_name(&self) -> &'static str {
        "profile"
    }

    fn serialize(&self, out: &mut ByteWriter) -> ReplicationResult<()> {
        out.write_str(&self.name)?;
        Ok(())
    }

    fn apply(&mut self, input: &mut ByteReader<'_>) -> ReplicationResult<()> {
        self.name = input.read_str()?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

const SCORE: ComponentId = ComponentId::new(1);

fn catalog() -> TypeCatalog {
    let mut catalog = TypeCatalog::new();
    catalog
        .register_entity("pawn", || vec![(SCORE, Box::<Score>::default() as _)])
        .unwrap();
    catalog
        .register_player("profile", || Box::<Profile>::default() as _)
        .unwrap();
    catalog
}

type Manager = ReplicationManager<LoopbackEndpoint>;

fn manager_with_config(hub: &LoopbackHub, client: i32, name: &str, config: ManagerConfig) -> Manager {
    let endpoint = hub.connect(ClientId::new(client)).unwrap();
    let mut manager = ReplicationManager::new(endpoint, catalog(), config);
    manager
        .set_local_player(Box::new(Profile {
            name: name.to_string(),
        }))
        .unwrap();
    manager
}

fn manager(hub: &LoopbackHub, client: i32, name: &str) -> Manager {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut manager = manager_with_config(hub, client, name, ManagerConfig::for_testing());
    manager.initialize().unwrap();
    manager
}

#[test]
fn joiner_becomes_ready_after_the_roster_snapshot() {
    let hub = LoopbackHub::new();
    let mut server = manager(&hub, 1, "host");
    assert!(server.is_server());
    assert!(server.is_ready());

    let mut client = manager(&hub, 2, "guest");
    assert!(matches!(
        client.phase(),
        SessionPhase::AwaitingPlayerList { .. }
    ));

    let events = server.update().unwrap();
    assert!(events.contains(&ReplicationEvent::PlayerJoined {
        client: ClientId::new(2),
    }));

    let events = client.update().unwrap();
    // The roster snapshot delivers the server's player, then readiness.
    assert_eq!(
        events,
        vec![
            ReplicationEvent::PlayerJoined {
                client: ClientId::new(1),
            },
            ReplicationEvent::SessionReady,
        ]
    );
    assert!(client.is_ready());

    let guest = server.players().get::<Profile>(ClientId::new(2)).unwrap();
    assert_eq!(guest.name, "guest");
    let host = client.players().get::<Profile>(ClientId::new(1)).unwrap();
    assert_eq!(host.name, "host");
}

#[test]
fn late_joiner_receives_the_full_roster_except_itself() {
    let hub = LoopbackHub::new();
    let mut server = manager(&hub, 1, "host");
    let mut c2 = manager(&hub, 2, "second");
    server.update().unwrap();
    c2.update().unwrap();
    let mut c3 = manager(&hub, 3, "third");
    server.update().unwrap();
    c2.update().unwrap();
    c3.update().unwrap();

    let mut c4 = manager(&hub, 4, "fourth");
    server.update().unwrap();
    c2.update().unwrap();
    c3.update().unwrap();
    let events = c4.update().unwrap();

    assert!(c4.is_ready());
    assert!(events.contains(&ReplicationEvent::SessionReady));
    assert_eq!(
        c4.players().clients(),
        vec![ClientId::new(1), ClientId::new(2), ClientId::new(3)]
    );
    assert!(!c4.players().contains(ClientId::new(4)));
    assert_eq!(
        c4.players().get::<Profile>(ClientId::new(3)).unwrap().name,
        "third"
    );
}

#[test]
fn player_mutation_replicates_only_when_changed() {
    let hub = LoopbackHub::new();
    let mut server = manager(&hub, 1, "host");
    let mut client = manager(&hub, 2, "guest");
    server.update().unwrap();
    client.update().unwrap();

    let mut observer = hub.connect(ClientId::new(99)).unwrap();

    // Nothing changed, so no player update leaves either peer.
    server.update().unwrap();
    client.update().unwrap();
    let mut traffic = Vec::new();
    while let Some(event) = observer.poll_event() {
        traffic.push(event);
    }
    assert!(traffic.iter().all(|event| event.code != PLAYER_UPDATE));

    client.local_player_mut::<Profile>().unwrap().name = "renamed".to_string();
    client.update().unwrap();
    let mut updates = 0;
    while let Some(event) = observer.poll_event() {
        if event.code == PLAYER_UPDATE {
            updates += 1;
        }
    }
    assert_eq!(updates, 1);

    server.update().unwrap();
    assert_eq!(
        server
            .players()
            .get::<Profile>(ClientId::new(2))
            .unwrap()
            .name,
        "renamed"
    );
}

#[test]
fn leaving_removes_the_player_and_their_entities() {
    let hub = LoopbackHub::new();
    let mut server = manager(&hub, 1, "host");
    let mut client = manager(&hub, 2, "guest");
    server.update().unwrap();
    client.update().unwrap();

    let id = client
        .instantiate("pawn", InstantiateOptions::default())
        .unwrap();
    server.update().unwrap();
    assert!(server.entity(id).is_some());

    hub.disconnect(ClientId::new(2));
    let events = server.update().unwrap();
    assert!(events.contains(&ReplicationEvent::PlayerLeft {
        client: ClientId::new(2),
    }));
    // Teardown mirrors an explicit destroy: component removals first.
    assert!(events.contains(&ReplicationEvent::ComponentRemoved {
        entity: id,
        component: SCORE,
    }));
    assert!(events.contains(&ReplicationEvent::EntityDestroyed { entity: id }));
    assert!(server.entity(id).is_none());
    assert!(!server.players().contains(ClientId::new(2)));
}

#[test]
fn leave_cleanup_can_be_disabled() {
    let hub = LoopbackHub::new();
    let mut server = manager(&hub, 1, "host");
    let config = ManagerConfig {
        remove_player_on_leave: false,
        destroy_entities_on_leave: false,
        ..ManagerConfig::for_testing()
    };
    let mut client = manager_with_config(&hub, 2, "guest", config);
    client.initialize().unwrap();
    server.update().unwrap();
    client.update().unwrap();

    let id = server
        .instantiate("pawn", InstantiateOptions::default())
        .unwrap();
    client.update().unwrap();

    hub.disconnect(ClientId::new(1));
    let events = client.update().unwrap();
    assert!(events.is_empty());
    assert!(client.entity(id).is_some());
    assert!(client.players().contains(ClientId::new(1)));
}

#[test]
fn missing_roster_snapshot_times_out() {
    let hub = LoopbackHub::new();
    // No server manager on the hub's first slot, so the join goes unanswered.
    let _silent = hub.connect(ClientId::new(1)).unwrap();
    let mut client = manager(&hub, 2, "guest");

    std::thread::sleep(Duration::from_millis(60));
    let err = client.update().unwrap_err();
    assert!(matches!(err, ReplicationError::InitTimeout { .. }));
}

#[test]
fn initialization_preconditions() {
    let hub = LoopbackHub::new();
    let endpoint = hub.connect(ClientId::new(1)).unwrap();
    let mut manager = ReplicationManager::new(endpoint, catalog(), ManagerConfig::for_testing());

    assert_eq!(
        manager.initialize().unwrap_err(),
        ReplicationError::MissingLocalPlayer
    );

    manager
        .set_local_player(Box::new(Profile {
            name: "host".to_string(),
        }))
        .unwrap();
    manager.initialize().unwrap();
    assert_eq!(
        manager.initialize().unwrap_err(),
        ReplicationError::AlreadyInitialized
    );
    assert_eq!(
        manager
            .set_local_player(Box::new(Profile::default()))
            .unwrap_err(),
        ReplicationError::AlreadyInitialized
    );
}

#[test]
fn update_before_initialize_is_a_no_op() {
    let hub = LoopbackHub::new();
    let endpoint = hub.connect(ClientId::new(1)).unwrap();
    let mut manager = ReplicationManager::new(endpoint, catalog(), ManagerConfig::for_testing());
    assert_eq!(manager.phase(), SessionPhase::Uninitialized);
    assert!(manager.update().unwrap().is_empty());
}

#[test]
fn mutating_calls_require_readiness() {
    let hub = LoopbackHub::new();
    let _server = manager(&hub, 1, "host");
    let mut client = manager(&hub, 2, "guest");

    // Still awaiting the roster snapshot.
    let err = client
        .instantiate("pawn", InstantiateOptions::default())
        .unwrap_err();
    assert_eq!(err, ReplicationError::NotReady);
}

#[test]
fn malformed_join_payload_is_a_protocol_violation() {
    let hub = LoopbackHub::new();
    let mut server = manager(&hub, 1, "host");

    let mut rogue = hub.connect(ClientId::new(66)).unwrap();
    // A valid body frame whose player bytes are not a Profile.
    let mut writer = ByteWriter::new();
    writer.write_bytes(&[0xFF, 0x01, 0x02]).unwrap();
    rogue
        .send(PLAYER_JOIN, writer.as_slice(), &MessageTarget::Server, true)
        .unwrap();

    let err = server.update().unwrap_err();
    assert_eq!(
        err,
        ReplicationError::Protocol(ProtocolViolation::PlayerTypeMismatch {
            client: ClientId::new(66),
        })
    );
}

#[test]
fn player_update_with_trailing_bytes_is_rejected() {
    let hub = LoopbackHub::new();
    let mut server = manager(&hub, 1, "host");

    // The peer joins cleanly first.
    let mut rogue = hub.connect(ClientId::new(66)).unwrap();
    let mut inner = ByteWriter::new();
    inner.write_str("ok").unwrap();
    let mut writer = ByteWriter::new();
    writer.write_bytes(inner.as_slice()).unwrap();
    rogue
        .send(PLAYER_JOIN, writer.as_slice(), &MessageTarget::Server, true)
        .unwrap();
    let events = server.update().unwrap();
    assert!(events.contains(&ReplicationEvent::PlayerJoined {
        client: ClientId::new(66),
    }));

    // A later update whose payload carries extra bytes is a type mismatch.
    let mut inner = ByteWriter::new();
    inner.write_str("ok").unwrap();
    inner.write_u8(0xAA);
    let mut writer = ByteWriter::new();
    writer.write_bytes(inner.as_slice()).unwrap();
    rogue
        .send(PLAYER_UPDATE, writer.as_slice(), &MessageTarget::Server, true)
        .unwrap();

    let err = server.update().unwrap_err();
    assert_eq!(
        err,
        ReplicationError::Protocol(ProtocolViolation::PlayerTypeMismatch {
            client: ClientId::new(66),
        })
    );
}

#[test]
fn join_with_trailing_player_bytes_is_rejected() {
    let hub = LoopbackHub::new();
    let mut server = manager(&hub, 1, "host");

    let mut rogue = hub.connect(ClientId::new(66)).unwrap();
    // A valid Profile payload followed by extra bytes.
    let mut inner = ByteWriter::new();
    inner.write_str("ok").unwrap();
    inner.write_u8(0xAA);
    let mut writer = ByteWriter::new();
    writer.write_bytes(inner.as_slice()).unwrap();
    rogue
        .send(PLAYER_JOIN, writer.as_slice(), &MessageTarget::Server, true)
        .unwrap();

    let err = server.update().unwrap_err();
    assert_eq!(
        err,
        ReplicationError::Protocol(ProtocolViolation::PlayerTypeMismatch {
            client: ClientId::new(66),
        })
    );
}
