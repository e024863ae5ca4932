//! The replicated component contract.

use std::any::Any;

use buffer::{ByteReader, ByteWriter};

use crate::error::ReplicationResult;

/// A piece of replicated entity state.
///
/// `serialize` must be a pure function of current state: the same state must
/// always produce the same bytes, because change detection compares
/// serialized output byte-for-byte. Timestamps or random padding in the
/// output would make every tick look dirty.
///
/// `apply` consumes exactly the bytes `serialize` produced. Both sides of a
/// session construct components from the same catalog factories, so a fresh
/// component decodes any payload a fresh peer produced.
pub trait Component: Any {
    /// The catalog name remote peers use to construct this component.
    fn type_name(&self) -> &'static str;

    /// Writes the full component state.
    fn serialize(&self, out: &mut ByteWriter) -> ReplicationResult<()>;

    /// Overwrites state from a serialized payload.
    fn apply(&mut self, input: &mut ByteReader<'_>) -> ReplicationResult<()>;

    /// Upcasts for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Minimal test component: one replicated integer.
    #[derive(Debug, Default)]
    pub(crate) struct Counter {
        pub value: i32,
    }

    impl Component for Counter {
        fn type_name(&self) -> &'static str {
            "counter"
        }

        fn serialize(&self, out: &mut ByteWriter) -> ReplicationResult<()> {
            out.write_i32(self.value);
            Ok(())
        }

        fn apply(&mut self, input: &mut ByteReader<'_>) -> ReplicationResult<()> {
            self.value = input.read_i32()?;
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn counter_roundtrip() {
        let source = Counter { value: 77 };
        let mut writer = ByteWriter::new();
        source.serialize(&mut writer).unwrap();

        let mut target = Counter::default();
        let bytes = writer.finish();
        let mut reader = ByteReader::new(&bytes);
        target.apply(&mut reader).unwrap();
        assert_eq!(target.value, 77);
    }

    #[test]
    fn downcast_through_any() {
        let component: Box<dyn Component> = Box::new(Counter { value: 3 });
        let counter = component.as_any().downcast_ref::<Counter>().unwrap();
        assert_eq!(counter.value, 3);
    }
}
