//! Configured entry point for both directions

use std::any::Any;
use std::fmt;
use std::io::Read;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::config::{Config, DecodeConfig};
use crate::decode::Decoder;
use crate::encode::Encoder;
use crate::error::{Error, Result};
use crate::indent::Indenter;
use crate::typed::{FromValue, ToValue};
use crate::value::{Array, Object, Value};

/// Callback run on every object produced by [`XmlManager::from_xml_to_type`].
///
/// It receives the freshly converted value as `&mut dyn Any` and can
/// downcast it to the types it cares about.
pub type PostConstructHook = Arc<dyn Fn(&mut dyn Any) + Send + Sync>;

/// XML mapper holding a compact and a pretty encoder plus decode limits.
///
/// Built once from a [`Config`] and immutable afterwards, so a single
/// instance can be shared between threads.
#[derive(Clone)]
pub struct XmlManager {
    compact: Encoder,
    pretty: Encoder,
    decode: DecodeConfig,
    post_construct: Option<PostConstructHook>,
}

impl fmt::Debug for XmlManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlManager")
            .field("compact", &self.compact)
            .field("pretty", &self.pretty)
            .field("decode", &self.decode)
            .field("post_construct", &self.post_construct.is_some())
            .finish()
    }
}

impl Default for XmlManager {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl XmlManager {
    pub fn new(config: Config) -> Self {
        let Config {
            encode,
            indent,
            decode,
        } = config;
        Self {
            compact: Encoder::new(encode.clone(), Indenter::compact()),
            pretty: Encoder::new(encode, Indenter::new(indent)),
            decode,
            post_construct: None,
        }
    }

    /// Install the hook run after typed decoding
    #[must_use]
    pub fn with_post_construct<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut dyn Any) + Send + Sync + 'static,
    {
        self.post_construct = Some(Arc::new(hook));
        self
    }

    pub fn decode_config(&self) -> DecodeConfig {
        self.decode
    }

    fn encoder(&self, pretty: bool) -> &Encoder {
        if pretty {
            &self.pretty
        } else {
            &self.compact
        }
    }

    /// Serialize with the default root name
    #[instrument(level = "debug", skip_all, fields(kind = %value.kind(), pretty))]
    pub fn to_xml(&self, value: &Value, pretty: bool) -> String {
        let xml = self.encoder(pretty).encode(value);
        debug!(len = xml.len(), "encoded value");
        xml
    }

    /// Serialize under a caller-chosen root tag
    pub fn to_xml_with_root(&self, value: &Value, root: &str, pretty: bool) -> String {
        self.encoder(pretty).encode_with_root(value, root)
    }

    /// Serialize a caller type, using its own root name when it has one
    pub fn to_xml_typed<T: ToValue + ?Sized>(&self, item: &T, pretty: bool) -> String {
        let value = item.to_value();
        match T::root_name() {
            Some(root) => self.to_xml_with_root(&value, root, pretty),
            None => self.to_xml(&value, pretty),
        }
    }

    /// Decode to an object, an array or a plain string
    #[instrument(level = "debug", skip_all, fields(len = xml.len()))]
    pub fn from_xml(&self, xml: &str) -> Result<Value> {
        Decoder::new(xml.as_bytes(), self.decode).decode()
    }

    /// Decode, overriding whether a root made of `<element>` children
    /// without `isArray` is read as an array
    pub fn from_xml_with(&self, xml: &str, root_array_allowed: bool) -> Result<Value> {
        let config = self.decode.with_root_array_allowed(root_array_allowed);
        Decoder::new(xml.as_bytes(), config).decode()
    }

    /// Decode bytes pulled from any reader
    pub fn from_xml_reader<R: Read>(&self, mut reader: R) -> Result<Value> {
        let mut bytes = Vec::new();
        if self.decode.max_size > 0 {
            // one byte past the limit is enough for the decoder to reject it
            let limit = u64::try_from(self.decode.max_size)
                .unwrap_or(u64::MAX)
                .saturating_add(1);
            reader.by_ref().take(limit).read_to_end(&mut bytes)?;
        } else {
            reader.read_to_end(&mut bytes)?;
        }
        Decoder::new(&bytes, self.decode).decode()
    }

    pub fn from_xml_to_object(&self, xml: &str) -> Result<Object> {
        Object::from_value(self.from_xml(xml)?)
    }

    pub fn from_xml_to_array(&self, xml: &str) -> Result<Array> {
        Array::from_value(self.from_xml(xml)?)
    }

    /// Decode into `T`, then run the post-construct hook on it
    pub fn from_xml_to_type<T: FromValue + 'static>(&self, xml: &str) -> Result<T> {
        let mut item = T::from_value(self.from_xml(xml)?)?;
        if let Some(hook) = &self.post_construct {
            debug!(target_type = std::any::type_name::<T>(), "running post-construct hook");
            hook(&mut item);
        }
        Ok(item)
    }

    /// Decode into `T` and hand it to `init` before returning it
    pub fn from_xml_to_type_with<T, F>(&self, xml: &str, init: F) -> Result<T>
    where
        T: FromValue + 'static,
        F: FnOnce(&mut T),
    {
        let mut item = self.from_xml_to_type(xml)?;
        init(&mut item);
        Ok(item)
    }

    /// Decode a document whose root must be an array of `T`
    pub fn from_xml_to_list<T: FromValue>(&self, xml: &str) -> Result<Vec<T>> {
        match self.from_xml(xml)? {
            Value::Array(arr) => arr.into_iter().map(T::from_value).collect(),
            other => Err(Error::unsupported_shape("array", other.kind().name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndentConfig;
    use crate::error::ErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct Counter {
        value: u32,
        initialized: bool,
    }

    impl FromValue for Counter {
        fn from_value(value: Value) -> Result<Self> {
            let mut obj = Object::from_value(value)?;
            Ok(Self {
                value: obj.take("value")?,
                initialized: false,
            })
        }
    }

    #[test]
    fn test_pretty_and_compact_share_config() {
        let config = Config::default().with_indent(IndentConfig::new(2, "\n"));
        let manager = XmlManager::new(config);
        let value = Value::from(Object::new().with("a", 1));
        assert_eq!(manager.to_xml(&value, false), "<JsonObject><a>1</a></JsonObject>");
        assert_eq!(
            manager.to_xml(&value, true),
            "<JsonObject>\n  <a>1</a>\n</JsonObject>\n"
        );
    }

    #[test]
    fn test_post_construct_hook_runs() -> Result<()> {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let manager = XmlManager::default().with_post_construct(move |item| {
            seen.fetch_add(1, Ordering::SeqCst);
            if let Some(counter) = item.downcast_mut::<Counter>() {
                counter.initialized = true;
            }
        });

        let counter: Counter = manager.from_xml_to_type("<Counter><value>7</value></Counter>")?;
        assert_eq!(counter.value, 7);
        assert!(counter.initialized);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let _: Object = manager.from_xml_to_type("<r/>")?;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[test]
    fn test_type_with_initializer() -> Result<()> {
        let manager = XmlManager::default();
        let counter: Counter = manager
            .from_xml_to_type_with("<c><value>3</value></c>", |c: &mut Counter| c.value += 1)?;
        assert_eq!(counter.value, 4);
        assert!(!counter.initialized);
        Ok(())
    }

    #[test]
    fn test_reader_respects_size_limit() {
        let manager =
            XmlManager::new(Config::default().with_decode(DecodeConfig::new(16, 10)));
        let err = manager.from_xml_reader("<abc>1234567</abc>".as_bytes());
        assert!(matches!(
            err.map_err(|e| e.kind().clone()),
            Err(ErrorKind::MaxSizeExceeded { max: 10 })
        ));
    }

    #[test]
    fn test_wrong_top_level_shape() {
        let manager = XmlManager::default();
        let err = manager.from_xml_to_array("<r><a>1</a></r>");
        assert!(matches!(
            err.map_err(|e| e.kind().clone()),
            Err(ErrorKind::UnsupportedTargetShape { .. })
        ));
        let list: Result<Vec<u32>> = manager.from_xml_to_list("<l><element>1</element><element>2</element></l>");
        assert_eq!(list, Ok(vec![1, 2]));
    }
}
