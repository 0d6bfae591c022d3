use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::model::{JavaType, Primitive, TypeId, Variance};
use crate::signature;

/// Result of [`TypeCache::reserve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    /// The signature was already registered (complete or in progress).
    Existing(TypeId),
    /// A placeholder was registered; the caller must [`TypeCache::patch`] it.
    Fresh(TypeId),
}

impl Reservation {
    pub fn id(self) -> TypeId {
        match self {
            Reservation::Existing(id) | Reservation::Fresh(id) => id,
        }
    }

    pub fn is_fresh(self) -> bool {
        matches!(self, Reservation::Fresh(_))
    }
}

/// Interning arena for resolved types, one per type-checking session.
///
/// Reads vastly outnumber writes: a write lock is taken only when a
/// signature is seen for the first time, when a placeholder is patched, or
/// when a shallow class is upgraded.
#[derive(Debug)]
pub struct TypeCache {
    inner: RwLock<Inner>,
    unknown: TypeId,
}

#[derive(Debug, Default)]
struct Inner {
    nodes: Vec<Arc<JavaType>>,
    by_signature: HashMap<String, TypeId>,
    pending: HashSet<TypeId>,
}

impl Inner {
    fn push(&mut self, signature: &str, ty: JavaType) -> TypeId {
        let id = TypeId(self.nodes.len() as u32);
        self.nodes.push(Arc::new(ty));
        self.by_signature.insert(signature.to_string(), id);
        id
    }
}

impl Default for TypeCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeCache {
    pub fn new() -> Self {
        let mut inner = Inner::default();
        for p in Primitive::ALL {
            inner.push(p.keyword(), JavaType::Primitive(p));
        }
        let unknown = inner.push(signature::UNKNOWN, JavaType::Unknown);
        TypeCache {
            inner: RwLock::new(inner),
            unknown,
        }
    }

    pub fn unknown(&self) -> TypeId {
        self.unknown
    }

    pub fn primitive(&self, p: Primitive) -> TypeId {
        // Pre-interned in `Primitive::ALL` order.
        let idx = Primitive::ALL
            .iter()
            .position(|candidate| *candidate == p)
            .unwrap_or_default();
        TypeId(idx as u32)
    }

    /// Return the canonical id for `signature`, registering `candidate` when
    /// the signature is new.
    ///
    /// A shallow class is replaced in place by a fully attributed class with
    /// the same signature, and a pending placeholder is completed by the
    /// candidate. Otherwise the existing node wins and `candidate` is dropped.
    pub fn intern(&self, signature: &str, candidate: JavaType) -> TypeId {
        {
            let inner = self.inner.read();
            if let Some(&id) = inner.by_signature.get(signature) {
                if !needs_replacement(&inner, id, &candidate) {
                    tracing::trace!(target: "remold.types", signature, "cache hit");
                    return id;
                }
            }
        }

        let mut inner = self.inner.write();
        match inner.by_signature.get(signature).copied() {
            Some(id) => {
                if needs_replacement(&inner, id, &candidate) {
                    inner.pending.remove(&id);
                    inner.nodes[id.index()] = Arc::new(candidate);
                }
                id
            }
            None => inner.push(signature, candidate),
        }
    }

    /// Register a placeholder for `signature` unless one already exists.
    pub fn reserve(&self, signature: &str) -> Reservation {
        if let Some(&id) = self.inner.read().by_signature.get(signature) {
            return Reservation::Existing(id);
        }
        let mut inner = self.inner.write();
        if let Some(&id) = inner.by_signature.get(signature) {
            return Reservation::Existing(id);
        }
        let id = inner.push(signature, JavaType::Unknown);
        inner.pending.insert(id);
        Reservation::Fresh(id)
    }

    /// Complete a placeholder handed out by [`TypeCache::reserve`].
    pub fn patch(&self, id: TypeId, ty: JavaType) {
        let mut inner = self.inner.write();
        if let Some(slot) = inner.nodes.get_mut(id.index()) {
            *slot = Arc::new(ty);
            inner.pending.remove(&id);
        }
    }

    pub fn is_pending(&self, id: TypeId) -> bool {
        self.inner.read().pending.contains(&id)
    }

    /// Node for `id`. Ids that do not belong to this cache map to `Unknown`.
    pub fn get(&self, id: TypeId) -> Arc<JavaType> {
        let inner = self.inner.read();
        match inner.nodes.get(id.index()) {
            Some(node) => Arc::clone(node),
            None => Arc::clone(&inner.nodes[self.unknown.index()]),
        }
    }

    pub fn lookup(&self, signature: &str) -> Option<TypeId> {
        self.inner.read().by_signature.get(signature).copied()
    }

    pub fn len(&self) -> usize {
        self.inner.read().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Recompute the canonical signature of `id` from the graph.
    pub fn signature(&self, id: TypeId) -> String {
        let inner = self.inner.read();
        let mut visiting = HashSet::new();
        signature_of(&inner, id, &mut visiting)
    }

    pub fn fully_qualified_name(&self, id: TypeId) -> Option<String> {
        let inner = self.inner.read();
        fqn_of(&inner, id).map(str::to_string)
    }

    /// Flattened graph of the session: every node with its signature, in id
    /// order.
    pub fn graph(&self) -> Vec<(TypeId, String)> {
        let inner = self.inner.read();
        let mut entries: Vec<(TypeId, String)> = inner
            .by_signature
            .iter()
            .map(|(sig, id)| (*id, sig.clone()))
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        entries
    }
}

fn needs_replacement(inner: &Inner, id: TypeId, candidate: &JavaType) -> bool {
    if inner.pending.contains(&id) {
        return true;
    }
    matches!(
        (inner.nodes[id.index()].as_ref(), candidate),
        (JavaType::ShallowClass(_), JavaType::Class(_))
    )
}

fn fqn_of(inner: &Inner, id: TypeId) -> Option<&str> {
    match inner.nodes.get(id.index())?.as_ref() {
        JavaType::Class(class) => Some(&class.fully_qualified_name),
        JavaType::ShallowClass(shallow) => Some(&shallow.fully_qualified_name),
        JavaType::Parameterized(p) => fqn_of(inner, p.class),
        _ => None,
    }
}

fn signature_of(inner: &Inner, id: TypeId, visiting: &mut HashSet<TypeId>) -> String {
    let Some(node) = inner.nodes.get(id.index()) else {
        return signature::UNKNOWN.to_string();
    };
    match node.as_ref() {
        JavaType::Primitive(p) => p.keyword().to_string(),
        JavaType::Class(class) => class.fully_qualified_name.clone(),
        JavaType::ShallowClass(shallow) => shallow.fully_qualified_name.clone(),
        JavaType::Unknown => {
            // A placeholder still under construction keeps the signature it
            // was reserved under.
            if inner.pending.contains(&id) {
                if let Some((sig, _)) = inner.by_signature.iter().find(|(_, v)| **v == id) {
                    return sig.clone();
                }
            }
            signature::UNKNOWN.to_string()
        }
        JavaType::Array(array) => signature::array(&signature_of(inner, array.element, visiting)),
        JavaType::Parameterized(p) => {
            let fqn = fqn_of(inner, p.class).unwrap_or(signature::UNKNOWN);
            let args: Vec<String> = p
                .type_arguments
                .iter()
                .map(|arg| signature_of(inner, *arg, visiting))
                .collect();
            signature::parameterized(fqn, &args)
        }
        JavaType::GenericTypeVariable(g) => {
            if !visiting.insert(id) {
                return signature::generic(&g.name, Variance::Invariant, &[]);
            }
            let bounds: Vec<String> = g
                .bounds
                .iter()
                .map(|bound| signature_of(inner, *bound, visiting))
                .collect();
            visiting.remove(&id);
            signature::generic(&g.name, g.variance, &bounds)
        }
        JavaType::Method(m) => {
            let declaring = fqn_of(inner, m.declaring_type).unwrap_or(signature::UNKNOWN);
            let ret = signature_of(inner, m.return_type, visiting);
            let params: Vec<String> = m
                .parameter_types
                .iter()
                .map(|p| signature_of(inner, *p, visiting))
                .collect();
            signature::method(declaring, &m.name, &ret, &params)
        }
        JavaType::Variable(v) => {
            let owner = v.owner.and_then(|o| fqn_of(inner, o)).unwrap_or("");
            let ty = signature_of(inner, v.ty, visiting);
            signature::variable(owner, &v.name, &ty)
        }
    }
}
