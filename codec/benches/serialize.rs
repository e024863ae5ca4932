use buffer::{ByteReader, ByteWriter};
use codec::{
    ClientId, CodecResult, CustomArray, CustomType, EventCode, NetworkEvent, Serializer, Value,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

#[derive(Debug, Clone, PartialEq)]
struct Transform {
    x: f32,
    y: f32,
    z: f32,
    yaw: f32,
}

impl CustomType for Transform {
    fn encode(&self, out: &mut ByteWriter) -> CodecResult<()> {
        out.write_f32(self.x);
        out.write_f32(self.y);
        out.write_f32(self.z);
        out.write_f32(self.yaw);
        Ok(())
    }

    fn decode(input: &mut ByteReader<'_>) -> CodecResult<Self> {
        Ok(Self {
            x: input.read_f32()?,
            y: input.read_f32()?,
            z: input.read_f32()?,
            yaw: input.read_f32()?,
        })
    }
}

fn sample_event() -> NetworkEvent {
    let transforms: Vec<Transform> = (0..16)
        .map(|i| Transform {
            x: i as f32,
            y: i as f32 * 0.5,
            z: -(i as f32),
            yaw: 90.0,
        })
        .collect();
    NetworkEvent {
        sender: ClientId::new(3),
        code: EventCode::from_raw(42),
        data: Value::ObjectArray(vec![
            Value::Int(7),
            Value::String("update".to_string()),
            Value::ByteArray(vec![0xAB; 64]),
            Value::CustomArray(CustomArray::new(transforms)),
        ]),
    }
}

fn bench_envelope(c: &mut Criterion) {
    let mut serializer = Serializer::new();
    serializer.registry_mut().register::<Transform>().unwrap();
    let event = sample_event();
    let encoded = serializer.encode_event(&event).unwrap();

    let mut group = c.benchmark_group("envelope");
    group.throughput(Throughput::Bytes(encoded.len() as u64));

    group.bench_function("encode", |b| {
        b.iter(|| serializer.encode_event(black_box(&event)).unwrap());
    });

    group.bench_function("decode", |b| {
        b.iter(|| serializer.decode_event(black_box(&encoded)).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_envelope);
criterion_main!(benches);
