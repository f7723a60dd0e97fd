//! Serialization and Deserialization implementation

use std::fmt;
use std::marker::PhantomData;

use ::serde::de::{self, MapAccess, Visitor};
use ::serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{parse_cidr, Cidr, Lpm};

impl Serialize for Cidr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cidr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_cidr(&s).map_err(de::Error::custom)
    }
}

/// Serialized as a map from the CIDR notation of each prefix to its value.
impl<V: Serialize> Serialize for Lpm<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Lpm<V> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(LpmVisitor(PhantomData))
    }
}

struct LpmVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for LpmVisitor<V> {
    type Value = Lpm<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map from CIDR prefixes to values")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Lpm<V>, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut lpm = Lpm::new();
        while let Some((cidr, value)) = access.next_entry::<Cidr, V>()? {
            lpm.insert_cidr(cidr, value).map_err(de::Error::custom)?;
        }
        Ok(lpm)
    }
}
