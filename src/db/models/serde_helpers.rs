//! Serde helpers for SurrealDB record ids
//!
//! Model ids and record links cross two boundaries with different
//! shapes: the database hands back native `RecordId` values, while API
//! JSON carries them as `"table:id"` strings. Deserialization accepts
//! both; serialization always emits the string form so API payloads
//! stay flat.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serializer};
use std::fmt;
use surrealdb::RecordId;

/// Accepts either a `"table:id"` string or a native RecordId
#[derive(Debug, Clone)]
struct IdValue(RecordId);

struct IdValueVisitor;

impl<'de> Visitor<'de> for IdValueVisitor {
    type Value = IdValue;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string 'table:id' or a record id")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        value
            .parse::<RecordId>()
            .map(IdValue)
            .map_err(|_| de::Error::custom(format!("invalid record id: {value}")))
    }

    fn visit_map<M>(self, map: M) -> Result<Self::Value, M::Error>
    where
        M: de::MapAccess<'de>,
    {
        RecordId::deserialize(de::value::MapAccessDeserializer::new(map)).map(IdValue)
    }
}

impl<'de> Deserialize<'de> for IdValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(IdValueVisitor)
    }
}

/// Null-tolerant bool: absent/null reads as true (legacy rows predate
/// the flag)
pub fn bool_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// `RecordId` as a "table:id" string
pub mod record_id {
    use super::*;

    pub fn serialize<S: Serializer>(id: &RecordId, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&id.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<RecordId, D::Error> {
        IdValue::deserialize(d).map(|v| v.0)
    }
}

/// `Option<RecordId>` as an optional "table:id" string
pub mod option_record_id {
    use super::*;

    pub fn serialize<S: Serializer>(id: &Option<RecordId>, s: S) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => s.serialize_some(&id.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<RecordId>, D::Error> {
        Ok(Option::<IdValue>::deserialize(d)?.map(|v| v.0))
    }
}

/// `Vec<RecordId>` as a string array
pub mod vec_record_id {
    use super::*;

    pub fn serialize<S: Serializer>(ids: &[RecordId], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(ids.iter().map(|id| id.to_string()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<RecordId>, D::Error> {
        Ok(Vec::<IdValue>::deserialize(d)?
            .into_iter()
            .map(|v| v.0)
            .collect())
    }
}

/// `Option<Vec<RecordId>>` as an optional string array
pub mod option_vec_record_id {
    use super::*;

    pub fn serialize<S: Serializer>(
        ids: &Option<Vec<RecordId>>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        match ids {
            Some(ids) => s.collect_seq(ids.iter().map(|id| id.to_string())),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Vec<RecordId>>, D::Error> {
        Ok(Option::<Vec<IdValue>>::deserialize(d)?
            .map(|v| v.into_iter().map(|i| i.0).collect()))
    }
}
