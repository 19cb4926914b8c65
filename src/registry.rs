use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use crate::{
    any::{RcAny, TypeInfo},
    errors::ResolveErrorKind,
    instantiator::BoxedCloneInstantiator,
    reflect::Base,
};

/// Polymorphic lookup key: a registered type or a string alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceKey {
    Type(TypeInfo),
    Name(String),
}

impl ServiceKey {
    #[inline]
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Type(TypeInfo::of::<T>())
    }
}

impl From<TypeInfo> for ServiceKey {
    fn from(info: TypeInfo) -> Self {
        Self::Type(info)
    }
}

impl From<&str> for ServiceKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for ServiceKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(info) => fmt::Display::fmt(info, f),
            Self::Name(name) => f.write_str(name),
        }
    }
}

#[derive(Clone)]
pub(crate) enum NodeProvider {
    Singleton(BoxedCloneInstantiator),
    Factory(BoxedCloneInstantiator),
    Assembler(BoxedCloneInstantiator),
    Instance(RcAny),
}

pub(crate) struct GraphNode {
    pub(crate) provider: Option<NodeProvider>,
    pub(crate) subclasses: BTreeSet<TypeInfo>,
}

impl GraphNode {
    fn empty() -> Self {
        Self {
            provider: None,
            subclasses: BTreeSet::new(),
        }
    }

    fn single_subclass(&self) -> Option<TypeInfo> {
        if self.subclasses.len() == 1 {
            self.subclasses.iter().next().copied()
        } else {
            None
        }
    }
}

pub(crate) enum NamedEntry {
    Alias(TypeInfo),
    Value(RcAny),
}

/// Outcome of a successful lookup: either an inline named value, or the
/// narrowed graph node's key and provider.
pub(crate) enum Target {
    Value(RcAny),
    Node {
        info: TypeInfo,
        provider: NodeProvider,
    },
}

/// The service graph and the name table behind it.
///
/// Subclass links are stored on the base's node, so resolution can start
/// at any requested key and walk downward without a reverse index.
pub(crate) struct Registry {
    nodes: BTreeMap<TypeInfo, GraphNode>,
    names: BTreeMap<String, NamedEntry>,
}

impl Registry {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            names: BTreeMap::new(),
        }
    }

    pub(crate) fn ensure_node(&mut self, info: TypeInfo) -> &mut GraphNode {
        self.nodes.entry(info).or_insert_with(GraphNode::empty)
    }

    /// Sets the node's provider, returning the previous one. Last write
    /// wins: re-registration under any lifecycle is allowed.
    pub(crate) fn set_provider(&mut self, info: TypeInfo, provider: NodeProvider) -> Option<NodeProvider> {
        self.ensure_node(info).provider.replace(provider)
    }

    pub(crate) fn alias(&mut self, name: String, info: TypeInfo) {
        self.names.insert(name, NamedEntry::Alias(info));
    }

    pub(crate) fn insert_value(&mut self, name: String, value: RcAny) {
        self.names.insert(name, NamedEntry::Value(value));
    }

    /// Records `info` as a subclass of each of its bases, recursing to the
    /// transitive root so a deeply nested type is discoverable from any
    /// ancestor. Idempotent.
    pub(crate) fn link_hierarchy(&mut self, info: TypeInfo, bases: Vec<Base>) {
        for base in bases {
            self.ensure_node(base.info).subclasses.insert(info);
            self.link_hierarchy(base.info, (base.bases)());
        }
    }

    /// The lookup algorithm: inline named values bypass the graph; aliases
    /// and type keys walk down to the most specific uniquely determined
    /// subclass. Branching is a hard error, never an arbitrary pick.
    pub(crate) fn lookup(&self, key: &ServiceKey) -> Result<Target, ResolveErrorKind> {
        let start = match key {
            ServiceKey::Name(name) => match self.names.get(name) {
                Some(NamedEntry::Value(value)) => return Ok(Target::Value(value.clone())),
                Some(NamedEntry::Alias(info)) => *info,
                None => self
                    .node_key_by_name(name)
                    .ok_or_else(|| ResolveErrorKind::NotFound(key.clone()))?,
            },
            ServiceKey::Type(info) => *info,
        };

        let mut info = start;
        let mut node = self
            .nodes
            .get(&info)
            .ok_or_else(|| ResolveErrorKind::NotFound(key.clone()))?;
        while let Some(subclass) = node.single_subclass() {
            info = subclass;
            node = self
                .nodes
                .get(&info)
                .ok_or_else(|| ResolveErrorKind::NotFound(key.clone()))?;
        }

        if node.subclasses.len() > 1 {
            return Err(ResolveErrorKind::Ambiguous {
                key: key.clone(),
                candidates: node.subclasses.iter().copied().collect(),
            });
        }

        match &node.provider {
            Some(provider) => Ok(Target::Node {
                info,
                provider: provider.clone(),
            }),
            None => Err(ResolveErrorKind::NotFound(key.clone())),
        }
    }

    /// A string equal to a node's full type path is accepted as a graph key.
    fn node_key_by_name(&self, name: &str) -> Option<TypeInfo> {
        self.nodes.keys().find(|info| info.name == name).copied()
    }
}
