use std::fmt;
use std::hash::{Hash, Hasher};

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identificador opaco de entidad.
///
/// El backend usa UUIDs para casi todo y enteros para algunos modelos; aquí se
/// guardan ambos como texto y se serializan de vuelta como string, salvo que
/// el valor original fuera numérico.
#[derive(Clone, Debug)]
pub struct EntityId {
    raw: String,
    numeric: bool,
}

impl EntityId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into(), numeric: false }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

// La igualdad solo mira el texto: `7` y `"7"` son el mismo id
impl PartialEq for EntityId {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for EntityId {}

impl Hash for EntityId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for EntityId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for EntityId {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self { raw: value.to_string(), numeric: true }
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.numeric {
            if let Ok(value) = self.raw.parse::<i64>() {
                return serializer.serialize_i64(value);
            }
        }
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntityIdVisitor;

        impl<'de> Visitor<'de> for EntityIdVisitor {
            type Value = EntityId;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string or integer id")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<EntityId, E> {
                Ok(EntityId::new(v))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<EntityId, E> {
                Ok(EntityId::new(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<EntityId, E> {
                Ok(EntityId::from(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<EntityId, E> {
                Ok(EntityId { raw: v.to_string(), numeric: true })
            }
        }

        deserializer.deserialize_any(EntityIdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_uuid_ids_compare_by_text() {
        let numeric: EntityId = serde_json::from_str("7").unwrap();
        let text: EntityId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(numeric, text);
        assert_eq!(serde_json::to_string(&numeric).unwrap(), "7");

        let uuid: EntityId =
            serde_json::from_str("\"3f2b8c4e-1d7a-4c5e-9a0b-2e6f8d1c3b5a\"").unwrap();
        assert_eq!(uuid.to_string(), "3f2b8c4e-1d7a-4c5e-9a0b-2e6f8d1c3b5a");
    }
}
