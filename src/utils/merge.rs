use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Mezcla superficial `{ ...base, ...patch }`: las claves del patch pisan a las
/// de `base`, el resto se conserva.
pub fn merge_patch<T>(base: &T, patch: &Map<String, Value>) -> Result<T, serde_json::Error>
where
    T: Serialize + DeserializeOwned,
{
    let mut merged = match serde_json::to_value(base)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in patch {
        merged.insert(key.clone(), value.clone());
    }
    serde_json::from_value(Value::Object(merged))
}
