//! Event payloads.
//!
//! Payloads travel through the broker as JSON values so that the shapes seen
//! by subscribers are exactly the ones documented for the wire protocol.
//! Typed structs are converted on the way in and parsed on the way out.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A broker payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload(Value);

impl Payload {
    /// A payload without data.
    #[must_use]
    pub const fn empty() -> Self {
        Self(Value::Null)
    }

    /// Serialize a typed value into a payload.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be represented as JSON.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self)
    }

    /// Parse the payload into a typed value.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload does not have the shape of `T`.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.0)
    }

    /// Look up a top-level field of an object payload.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a top-level string field of an object payload.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Whether the payload carries no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_null()
    }

    /// The raw JSON value.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// Shallow-merge `overlay` on top of this payload.
    ///
    /// Object keys from `overlay` win. A non-object side is treated as an
    /// empty object, except that an empty overlay leaves the payload as is.
    #[must_use]
    pub fn merge(self, overlay: Self) -> Self {
        match (self.0, overlay.0) {
            (base, Value::Null) => Self(base),
            (Value::Null, overlay) => Self(overlay),
            (Value::Object(mut base), Value::Object(overlay)) => {
                base.extend(overlay);
                Self(Value::Object(base))
            }
            (_, overlay) => Self(overlay),
        }
    }

    /// Build an object payload from key/value pairs.
    #[must_use]
    pub fn object<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let map: Map<String, Value> = pairs.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self(Value::Object(map))
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<Payload> for Value {
    fn from(payload: Payload) -> Self {
        payload.0
    }
}
