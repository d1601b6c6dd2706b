use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::breadcrumb::BreadcrumbMeta;

/// Target of a router resolution: a concrete path, or a named route with
/// optional params/query/hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RouteDescriptor {
    Path {
        path: String,
    },
    Name {
        name: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        params: BTreeMap<String, String>,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        query: BTreeMap<String, String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hash: Option<String>,
    },
}

impl RouteDescriptor {
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path { path: path.into() }
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self::Name {
            name: name.into(),
            params: BTreeMap::new(),
            query: BTreeMap::new(),
            hash: None,
        }
    }

    pub fn name_with_params(name: impl Into<String>, params: BTreeMap<String, String>) -> Self {
        Self::Name {
            name: name.into(),
            params,
            query: BTreeMap::new(),
            hash: None,
        }
    }
}

impl fmt::Display for RouteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path { path } => write!(f, "{path}"),
            Self::Name { name, .. } => write!(f, "{name}"),
        }
    }
}

// Accepts a bare path string, `{path}`, or `{name, params?, query?, hash?}`.
impl<'de> Deserialize<'de> for RouteDescriptor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::String(path) => Ok(Self::Path { path }),
            Value::Object(map) => {
                if let Some(path) = map.get("path") {
                    let path = path
                        .as_str()
                        .ok_or_else(|| de::Error::custom("descriptor `path` must be a string"))?;
                    Ok(Self::Path {
                        path: path.to_string(),
                    })
                } else if let Some(name) = map.get("name") {
                    let name = name
                        .as_str()
                        .ok_or_else(|| de::Error::custom("descriptor `name` must be a string"))?;
                    Ok(Self::Name {
                        name: name.to_string(),
                        params: string_map(map.get("params")).map_err(de::Error::custom)?,
                        query: string_map(map.get("query")).map_err(de::Error::custom)?,
                        hash: map
                            .get("hash")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                    })
                } else {
                    Err(de::Error::custom(
                        "route descriptor needs a `path` or a `name`",
                    ))
                }
            }
            other => Err(de::Error::custom(format!(
                "route descriptor must be a string or an object, got {}",
                json_type_name(&other)
            ))),
        }
    }
}

fn string_map(value: Option<&Value>) -> Result<BTreeMap<String, String>, String> {
    let Some(value) = value else {
        return Ok(BTreeMap::new());
    };
    let Value::Object(map) = value else {
        return Err(format!(
            "expected an object of string values, got {}",
            json_type_name(value)
        ));
    };
    let mut out = BTreeMap::new();
    for (key, entry) in map {
        let Some(entry) = entry.as_str() else {
            return Err(format!("value for `{key}` must be a string"));
        };
        out.insert(key.clone(), entry.to_string());
    }
    Ok(out)
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Free-form route metadata. Only `breadcrumb` is interpreted; everything
/// else passes through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breadcrumb: Option<BreadcrumbMeta>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RouteMeta {
    pub fn with_breadcrumb(breadcrumb: BreadcrumbMeta) -> Self {
        Self {
            breadcrumb: Some(breadcrumb),
            extra: Map::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.breadcrumb.is_none() && self.extra.is_empty()
    }
}

/// One entry of a route's matched ancestry chain. Chains are stored
/// root-first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchedRecord {
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "RouteMeta::is_empty")]
    pub meta: RouteMeta,
}

impl MatchedRecord {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            meta: RouteMeta::default(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }
}

/// A resolved route: concrete path plus the matched ancestry chain and the
/// metadata of its deepest record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched: Vec<MatchedRecord>,

    #[serde(default, skip_serializing_if = "RouteMeta::is_empty")]
    pub meta: RouteMeta,
}

impl Route {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_matched(mut self, matched: Vec<MatchedRecord>) -> Self {
        self.matched = matched;
        self
    }

    pub fn with_meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Descriptor pointing back at this route. Named routes round-trip
    /// through their name so params survive re-resolution.
    pub fn descriptor(&self) -> RouteDescriptor {
        match &self.name {
            Some(name) => RouteDescriptor::Name {
                name: name.clone(),
                params: self.params.clone(),
                query: self.query.clone(),
                hash: self.hash.clone(),
            },
            None => RouteDescriptor::Path {
                path: self.path.clone(),
            },
        }
    }

    /// Name when present, path otherwise. The last label fallback.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.path)
    }

    pub fn deepest_record(&self) -> Option<&MatchedRecord> {
        self.matched.last()
    }
}
