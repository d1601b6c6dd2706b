use std::collections::{BTreeMap, HashMap};

use matchit::Router as PathRouter;
use serde::{Deserialize, Serialize};

use crumbtrail_model::{MatchedRecord, Route, RouteDescriptor, RouteMeta};

use crate::error::{Result, RouterError};
use crate::resolver::RouteResolver;

/// One route definition. Child paths join onto the parent's path unless
/// they start with `/`; an empty child path aliases the parent's path
/// (the "default child" pattern, which is what produces collapsed
/// matched chains).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteDef {
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "RouteMeta::is_empty")]
    pub meta: RouteMeta,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteDef>,
}

impl RouteDef {
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

    pub fn meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn children(mut self, children: Vec<RouteDef>) -> Self {
        self.children = children;
        self
    }
}

#[derive(Debug)]
struct Node {
    /// Full path pattern, root-first join of definition segments
    path: String,
    name: Option<String>,
    meta: RouteMeta,
    parent: Option<usize>,
}

/// In-memory route table:
///
/// - all flattened definitions (`Vec<Node>`)
/// - name -> node index
/// - path pattern -> node index via `matchit`
pub struct RouteTable {
    nodes: Vec<Node>,
    name_index: HashMap<String, usize>,
    path_router: PathRouter<usize>,
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteTable")
            .field("nodes", &self.nodes)
            .field("name_index", &self.name_index)
            .finish_non_exhaustive()
    }
}

/// Read-only view of one registered route, for listing and validation.
#[derive(Debug, Clone, Copy)]
pub struct RouteView<'a> {
    pub path: &'a str,
    pub name: Option<&'a str>,
    pub meta: &'a RouteMeta,
}

impl RouteTable {
    pub fn new(defs: Vec<RouteDef>) -> Result<Self> {
        let mut nodes = Vec::new();
        let mut name_index = HashMap::new();
        for def in defs {
            flatten(def, None, &mut nodes, &mut name_index)?;
        }

        // Deepest definition wins when two definitions share a full path
        // (a default child aliasing its parent); both still appear in the
        // matched chain.
        let mut by_path: HashMap<String, usize> = HashMap::new();
        for (idx, node) in nodes.iter().enumerate() {
            if let Some(shadowed) = by_path.insert(node.path.clone(), idx) {
                log::debug!(
                    "route `{}` shadows an earlier definition at the same path (#{shadowed})",
                    node.path
                );
            }
        }

        let mut path_router = PathRouter::new();
        for (path, idx) in by_path {
            path_router
                .insert(path.clone(), idx)
                .map_err(|err| RouterError::InvalidPattern {
                    pattern: path,
                    message: err.to_string(),
                })?;
        }

        Ok(Self {
            nodes,
            name_index,
            path_router,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn route_named(&self, name: &str) -> Option<RouteView<'_>> {
        let idx = *self.name_index.get(name)?;
        let node = &self.nodes[idx];
        Some(RouteView {
            path: &node.path,
            name: node.name.as_deref(),
            meta: &node.meta,
        })
    }

    pub fn routes(&self) -> impl Iterator<Item = RouteView<'_>> {
        self.nodes.iter().map(|node| RouteView {
            path: &node.path,
            name: node.name.as_deref(),
            meta: &node.meta,
        })
    }

    fn resolve_path(&self, path: &str) -> Result<Route> {
        let matched = self
            .path_router
            .at(path)
            .map_err(|_| RouterError::NotFound(path.to_string()))?;
        let idx = *matched.value;
        let params: BTreeMap<String, String> = matched
            .params
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Ok(self.build_route(idx, path.to_string(), params, BTreeMap::new(), None))
    }

    fn resolve_name(
        &self,
        name: &str,
        params: &BTreeMap<String, String>,
        query: &BTreeMap<String, String>,
        hash: Option<&str>,
    ) -> Result<Route> {
        let idx = *self
            .name_index
            .get(name)
            .ok_or_else(|| RouterError::NotFound(format!("name `{name}`")))?;
        let path = fill_pattern(&self.nodes[idx].path, params)?;
        Ok(self.build_route(
            idx,
            path,
            params.clone(),
            query.clone(),
            hash.map(str::to_string),
        ))
    }

    fn build_route(
        &self,
        idx: usize,
        path: String,
        params: BTreeMap<String, String>,
        query: BTreeMap<String, String>,
        hash: Option<String>,
    ) -> Route {
        let mut chain = Vec::new();
        let mut cursor = Some(idx);
        while let Some(current) = cursor {
            chain.push(current);
            cursor = self.nodes[current].parent;
        }
        chain.reverse();

        let matched = chain
            .into_iter()
            .map(|i| {
                let node = &self.nodes[i];
                let concrete = fill_pattern(&node.path, &params).unwrap_or_else(|_| node.path.clone());
                MatchedRecord {
                    path: concrete,
                    name: node.name.clone(),
                    meta: node.meta.clone(),
                }
            })
            .collect();

        let node = &self.nodes[idx];
        Route {
            path,
            name: node.name.clone(),
            params,
            query,
            hash,
            matched,
            meta: node.meta.clone(),
        }
    }
}

impl RouteResolver for RouteTable {
    fn resolve(&self, spec: &RouteDescriptor) -> Result<Route> {
        match spec {
            RouteDescriptor::Path { path } => self.resolve_path(path),
            RouteDescriptor::Name {
                name,
                params,
                query,
                hash,
            } => self.resolve_name(name, params, query, hash.as_deref()),
        }
    }
}

fn flatten(
    def: RouteDef,
    parent: Option<usize>,
    nodes: &mut Vec<Node>,
    name_index: &mut HashMap<String, usize>,
) -> Result<()> {
    let full_path = match parent {
        Some(parent_idx) => join_paths(&nodes[parent_idx].path, &def.path),
        None => normalize_root(&def.path),
    };

    let idx = nodes.len();
    if let Some(name) = &def.name {
        if name_index.insert(name.clone(), idx).is_some() {
            return Err(RouterError::DuplicateName(name.clone()));
        }
    }
    nodes.push(Node {
        path: full_path,
        name: def.name,
        meta: def.meta,
        parent,
    });

    for child in def.children {
        flatten(child, Some(idx), nodes, name_index)?;
    }
    Ok(())
}

fn normalize_root(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

fn join_paths(parent: &str, child: &str) -> String {
    if child.is_empty() {
        parent.to_string()
    } else if child.starts_with('/') {
        child.to_string()
    } else if parent.ends_with('/') {
        format!("{parent}{child}")
    } else {
        format!("{parent}/{child}")
    }
}

/// Substitute `:param` segments with supplied values.
fn fill_pattern(pattern: &str, params: &BTreeMap<String, String>) -> Result<String> {
    if !pattern.contains(':') {
        return Ok(pattern.to_string());
    }
    let mut segments = Vec::new();
    for segment in pattern.split('/') {
        if let Some(param) = segment.strip_prefix(':') {
            let value = params
                .get(param)
                .ok_or_else(|| RouterError::MissingParam {
                    param: param.to_string(),
                    pattern: pattern.to_string(),
                })?;
            segments.push(value.clone());
        } else {
            segments.push(segment.to_string());
        }
    }
    Ok(segments.join("/"))
}
