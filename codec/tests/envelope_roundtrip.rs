use buffer::{ByteReader, ByteWriter};
use codec::{
    ClientId, CodecResult, CustomArray, CustomType, EventCode, NetworkEvent, Serializer, Value,
};
use proptest::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Vec3 {
    x: f32,
    y: f32,
    z: f32,
}

impl CustomType for Vec3 {
    fn encode(&self, out: &mut ByteWriter) -> CodecResult<()> {
        out.write_f32(self.x);
        out.write_f32(self.y);
        out.write_f32(self.z);
        Ok(())
    }

    fn decode(input: &mut ByteReader<'_>) -> CodecResult<Self> {
        Ok(Self {
            x: input.read_f32()?,
            y: input.read_f32()?,
            z: input.read_f32()?,
        })
    }
}

fn registered_serializer() -> Serializer {
    let mut serializer = Serializer::new();
    serializer.registry_mut().register::<Vec3>().unwrap();
    serializer
}

fn leaf_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<u8>().prop_map(Value::Byte),
        any::<bool>().prop_map(Value::Bool),
        any::<i16>().prop_map(Value::Short),
        any::<i32>().prop_map(Value::Int),
        any::<i64>().prop_map(Value::Long),
        prop_oneof![
            Just(f32::INFINITY),
            Just(f32::NEG_INFINITY),
            (-1.0e6f32..1.0e6).prop_map(|v| v),
        ]
        .prop_map(Value::Float),
        (-1.0e12f64..1.0e12).prop_map(Value::Double),
        ".{0,32}".prop_map(Value::String),
        prop::collection::vec(any::<u8>(), 0..64).prop_map(Value::ByteArray),
        prop::collection::vec(
            ((-100.0f32..100.0), (-100.0f32..100.0), (-100.0f32..100.0))
                .prop_map(|(x, y, z)| Vec3 { x, y, z }),
            0..4
        )
        .prop_map(|items| Value::CustomArray(CustomArray::new(items))),
    ]
}

fn value_tree() -> impl Strategy<Value = Value> {
    leaf_value().prop_recursive(3, 24, 6, |inner| {
        prop::collection::vec(inner, 0..6).prop_map(Value::ObjectArray)
    })
}

proptest! {
    #[test]
    fn prop_value_roundtrip(value in value_tree()) {
        let mut serializer = registered_serializer();
        let bytes = serializer.encode_value(&value).unwrap();
        let decoded = serializer.decode_value(&bytes).unwrap();
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn prop_envelope_roundtrip(
        sender in any::<i32>(),
        code in 0u8..200,
        value in value_tree(),
    ) {
        let mut serializer = registered_serializer();
        let event = NetworkEvent {
            sender: ClientId::new(sender),
            code: EventCode::application(code).unwrap(),
            data: value,
        };
        let bytes = serializer.encode_event(&event).unwrap();
        let decoded = serializer.decode_event(&bytes).unwrap();
        prop_assert_eq!(decoded, event);
    }

    #[test]
    fn prop_truncated_envelope_errors_cleanly(
        value in value_tree(),
        cut in 1usize..16,
    ) {
        let mut serializer = registered_serializer();
        let event = NetworkEvent {
            sender: ClientId::new(1),
            code: EventCode::from_raw(0),
            data: value,
        };
        let bytes = serializer.encode_event(&event).unwrap();
        if cut < bytes.len() {
            let truncated = &bytes[..bytes.len() - cut];
            // Must error, never panic or fabricate data.
            prop_assert!(serializer.decode_event(truncated).is_err());
        }
    }
}

#[test]
fn string_length_boundary() {
    let mut serializer = Serializer::new();
    let exact = "a".repeat(32767);
    let bytes = serializer
        .encode_value(&Value::String(exact.clone()))
        .unwrap();
    assert_eq!(
        serializer.decode_value(&bytes).unwrap(),
        Value::String(exact)
    );

    let over = "a".repeat(32768);
    assert!(serializer.encode_value(&Value::String(over)).is_err());
}

#[test]
fn custom_typed_array_through_envelope() {
    let mut serializer = registered_serializer();
    let event = NetworkEvent {
        sender: ClientId::new(4),
        code: EventCode::application(9).unwrap(),
        data: Value::CustomArray(CustomArray::new(vec![
            Vec3 {
                x: 1.0,
                y: 2.0,
                z: 3.0,
            },
            Vec3 {
                x: -4.0,
                y: -5.0,
                z: -6.0,
            },
        ])),
    };
    let bytes = serializer.encode_event(&event).unwrap();
    let decoded = serializer.decode_event(&bytes).unwrap();
    assert_eq!(decoded, event);
}

#[test]
fn registries_do_not_share_state_across_instances() {
    let mut first = Serializer::new();
    first.registry_mut().register::<Vec3>().unwrap();

    // A fresh serializer knows nothing about Vec3.
    let second = Serializer::new();
    let value = Value::custom(Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    });
    let mut writer = ByteWriter::new();
    assert!(second.serialize(&value, &mut writer).is_err());
}
