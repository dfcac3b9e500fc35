//! Matcher chain configuration.
//!
//! In a spec document the chain is a mapping from matcher name to its
//! parameters, and the order of the keys is the order in which matchers are
//! tried:
//!
//! ```yaml
//! matchers:
//!   primitives: [number, boolean]
//!   collection: { delim: ",", open: "!<type>[", close: "]" }
//!   date: { format: "%Y-%m-%d" }
//!   symbol: { prefix: "$", global: true }
//!   string: true
//! ```

use std::fmt;
use std::str::FromStr;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Names of the available matchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatcherKind {
    Number,
    Boolean,
    Primitive,
    Collection,
    Date,
    Symbol,
    String,
}

impl MatcherKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Primitive => "primitive",
            Self::Collection => "collection",
            Self::Date => "date",
            Self::Symbol => "symbol",
            Self::String => "string",
        }
    }
}

impl FromStr for MatcherKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            "primitive" | "primitives" => Ok(Self::Primitive),
            "collection" => Ok(Self::Collection),
            "date" => Ok(Self::Date),
            "symbol" => Ok(Self::Symbol),
            "string" => Ok(Self::String),
            other => Err(format!("unknown matcher '{other}'")),
        }
    }
}

impl fmt::Display for MatcherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a matcher chain with its own parameters.
///
/// Unset parameters are resolved at coercion time: first against the
/// attributes context (for text nodes), then against built-in defaults.
#[derive(Debug, Clone, PartialEq)]
pub enum MatcherSpec {
    Number,
    Boolean,
    Primitive(Option<Vec<PrimitiveKind>>),
    Collection(CollectionSpec),
    Date(DateSpec),
    Symbol(SymbolSpec),
    /// `false` disables the terminal matcher: it then never matches.
    String(bool),
}

impl MatcherSpec {
    pub fn kind(&self) -> MatcherKind {
        match self {
            Self::Number => MatcherKind::Number,
            Self::Boolean => MatcherKind::Boolean,
            Self::Primitive(_) => MatcherKind::Primitive,
            Self::Collection(_) => MatcherKind::Collection,
            Self::Date(_) => MatcherKind::Date,
            Self::Symbol(_) => MatcherKind::Symbol,
            Self::String(_) => MatcherKind::String,
        }
    }
}

/// Primitive matchers usable inside the `primitive` matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Number,
    Boolean,
}

/// Parameters of the `collection` matcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSpec {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub delim: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub open: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub close: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assoc: Option<AssocSpec>,
}

/// Parameters for associative collections (`Object`, `Map`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssocSpec {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub delim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_type: Option<TypeList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<TypeList>,
}

/// Parameters of the `date` matcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpec {
    /// chrono format string.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub format: Option<String>,
}

/// Parameters of the `symbol` matcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolSpec {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global: Option<bool>,
}

/// Target types for associative keys and values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Number,
    Boolean,
    Primitive,
    Date,
    Symbol,
    String,
}

/// One type name or an ordered list of candidates; the first that matches wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeList(pub Vec<ValueType>);

impl TypeList {
    #[must_use]
    pub fn one(value_type: ValueType) -> Self {
        Self(vec![value_type])
    }

    pub fn types(&self) -> &[ValueType] {
        &self.0
    }
}

impl<'de> Deserialize<'de> for TypeList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(ValueType),
            Many(Vec<ValueType>),
        }

        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::One(t) => Self(vec![t]),
            OneOrMany::Many(ts) => Self(ts),
        })
    }
}

impl Serialize for TypeList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.as_slice() {
            [single] => single.serialize(serializer),
            many => many.serialize(serializer),
        }
    }
}

/// Ordered chain of matchers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatcherChain(Vec<MatcherSpec>);

impl MatcherChain {
    #[must_use]
    pub fn new(matchers: Vec<MatcherSpec>) -> Self {
        Self(matchers)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatcherSpec> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The entry for `kind`, if present in the chain.
    pub fn get(&self, kind: MatcherKind) -> Option<&MatcherSpec> {
        self.0.iter().find(|m| m.kind() == kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = MatcherKind> + '_ {
        self.0.iter().map(MatcherSpec::kind)
    }
}

impl<'a> IntoIterator for &'a MatcherChain {
    type Item = &'a MatcherSpec;
    type IntoIter = std::slice::Iter<'a, MatcherSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Matcher parameters as written in a document: `true`/`false` or a parameter map.
#[derive(Deserialize)]
#[serde(untagged)]
enum Setting<T> {
    Flag(bool),
    Params(T),
}

/// Parameter-less matchers accept only a flag or an empty map.
#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoParams {}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PrimitiveParams {
    #[serde(default)]
    primitives: Option<Vec<PrimitiveKind>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PrimitiveSetting {
    List(Vec<PrimitiveKind>),
    Flag(bool),
    Params(PrimitiveParams),
}

/// Read a setting; `None` means the matcher is switched off and left out.
fn enabled<T: Default>(setting: Option<Setting<T>>) -> Option<T> {
    match setting {
        None | Some(Setting::Flag(true)) => Some(T::default()),
        Some(Setting::Flag(false)) => None,
        Some(Setting::Params(params)) => Some(params),
    }
}

struct ChainVisitor;

impl<'de> Visitor<'de> for ChainVisitor {
    type Value = MatcherChain;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an ordered mapping of matcher name to matcher parameters")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut matchers: Vec<MatcherSpec> = Vec::new();
        let mut seen: Vec<MatcherKind> = Vec::new();

        while let Some(name) = map.next_key::<String>()? {
            let kind: MatcherKind = name.parse().map_err(de::Error::custom)?;
            if seen.contains(&kind) {
                return Err(de::Error::custom(format!("matcher '{kind}' listed twice")));
            }
            seen.push(kind);

            let entry = match kind {
                MatcherKind::Number => {
                    enabled(map.next_value::<Option<Setting<NoParams>>>()?).map(|_| MatcherSpec::Number)
                }
                MatcherKind::Boolean => {
                    enabled(map.next_value::<Option<Setting<NoParams>>>()?).map(|_| MatcherSpec::Boolean)
                }
                MatcherKind::Primitive => match map.next_value::<Option<PrimitiveSetting>>()? {
                    None | Some(PrimitiveSetting::Flag(true)) => Some(MatcherSpec::Primitive(None)),
                    Some(PrimitiveSetting::Flag(false)) => None,
                    Some(PrimitiveSetting::List(list)) => Some(MatcherSpec::Primitive(Some(list))),
                    Some(PrimitiveSetting::Params(p)) => Some(MatcherSpec::Primitive(p.primitives)),
                },
                MatcherKind::Collection => {
                    enabled(map.next_value::<Option<Setting<CollectionSpec>>>()?)
                        .map(MatcherSpec::Collection)
                }
                MatcherKind::Date => {
                    enabled(map.next_value::<Option<Setting<DateSpec>>>()?).map(MatcherSpec::Date)
                }
                MatcherKind::Symbol => {
                    enabled(map.next_value::<Option<Setting<SymbolSpec>>>()?).map(MatcherSpec::Symbol)
                }
                MatcherKind::String => Some(MatcherSpec::String(
                    map.next_value::<Option<bool>>()?.unwrap_or(true),
                )),
            };

            if let Some(entry) = entry {
                matchers.push(entry);
            }
        }

        Ok(MatcherChain(matchers))
    }
}

impl<'de> Deserialize<'de> for MatcherChain {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ChainVisitor)
    }
}

impl Serialize for MatcherChain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for matcher in &self.0 {
            let name = matcher.kind().as_str();
            match matcher {
                MatcherSpec::Number | MatcherSpec::Boolean => map.serialize_entry(name, &true)?,
                MatcherSpec::Primitive(None) => map.serialize_entry(name, &true)?,
                MatcherSpec::Primitive(Some(list)) => map.serialize_entry(name, list)?,
                MatcherSpec::Collection(c) => map.serialize_entry(name, c)?,
                MatcherSpec::Date(d) => map.serialize_entry(name, d)?,
                MatcherSpec::Symbol(s) => map.serialize_entry(name, s)?,
                MatcherSpec::String(enabled) => map.serialize_entry(name, enabled)?,
            }
        }
        map.end()
    }
}

/// A field that may be omitted but, when present, must not be `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
