use std::collections::HashSet;

use remold_types::signature;
use remold_types::{
    ArrayType, ClassKind, ClassType, Flag, Flags, GenericTypeVariable, JavaType, MethodType,
    ParameterizedType, Primitive, ShallowClass, TypeCache, TypeId, TypeMapping, Variance,
    VariableType, CONSTRUCTOR_NAME, JAVA_LANG_OBJECT,
};

/// Identity of a type variable symbol within one [`SymbolTable`].
pub type SymbolId = u32;

/// A type as the compiler attributed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeMirror {
    Primitive(Primitive),
    /// A class type by binary name. Empty `arguments` for raw and
    /// non-generic uses.
    Declared {
        name: String,
        arguments: Vec<TypeMirror>,
    },
    Array(Box<TypeMirror>),
    TypeVar(SymbolId),
    Wildcard(WildcardKind),
    Intersection(Vec<TypeMirror>),
    /// Capture conversion of the wrapped wildcard.
    Captured(Box<TypeMirror>),
    /// A name the compiler could not resolve.
    Error(String),
    NoType,
}

impl TypeMirror {
    pub fn declared(name: impl Into<String>) -> Self {
        TypeMirror::Declared {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn parameterized(name: impl Into<String>, arguments: Vec<TypeMirror>) -> Self {
        TypeMirror::Declared {
            name: name.into(),
            arguments,
        }
    }

    pub fn array(element: TypeMirror) -> Self {
        TypeMirror::Array(Box::new(element))
    }

    fn is_object(&self) -> bool {
        matches!(self, TypeMirror::Declared { name, arguments } if name == JAVA_LANG_OBJECT && arguments.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WildcardKind {
    Unbounded,
    Extends(Box<TypeMirror>),
    Super(Box<TypeMirror>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    Source,
    Class,
    Runtime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationMirror {
    pub name: String,
    pub retention: Retention,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeVarSymbol {
    pub name: String,
    pub bounds: Vec<TypeMirror>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSymbol {
    pub binary_name: String,
    pub kind: ClassKind,
    pub flags: Flags,
    pub owner: Option<String>,
    pub type_parameters: Vec<SymbolId>,
    /// `None` when the source declares no `extends` clause.
    pub superclass: Option<TypeMirror>,
    pub interfaces: Vec<TypeMirror>,
    pub annotations: Vec<AnnotationMirror>,
    pub methods: Vec<MethodSymbol>,
    pub fields: Vec<VariableSymbol>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSymbol {
    /// `<init>` for constructors, `<clinit>` for static initialisers.
    pub name: String,
    pub flags: Flags,
    pub bridge: bool,
    pub type_parameters: Vec<SymbolId>,
    pub parameters: Vec<(String, TypeMirror)>,
    pub return_type: TypeMirror,
    pub thrown: Vec<TypeMirror>,
    pub annotations: Vec<AnnotationMirror>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSymbol {
    pub name: String,
    pub flags: Flags,
    pub ty: TypeMirror,
    pub annotations: Vec<AnnotationMirror>,
}

/// Attributed symbols of one compilation.
pub trait SymbolTable {
    fn class(&self, binary_name: &str) -> Option<&ClassSymbol>;

    fn type_variable(&self, id: SymbolId) -> Option<&TypeVarSymbol>;
}

pub struct CompilerTypeMapping<'a> {
    symbols: &'a dyn SymbolTable,
}

impl<'a> CompilerTypeMapping<'a> {
    pub fn new(symbols: &'a dyn SymbolTable) -> Self {
        Self { symbols }
    }

    /// Map an arbitrary attributed type.
    pub fn map_type(&self, cache: &TypeCache, ty: &TypeMirror) -> TypeId {
        Walker::new(self.symbols, cache).ty(ty)
    }
}

impl TypeMapping for CompilerTypeMapping<'_> {
    fn map_class(&self, cache: &TypeCache, name: &str) -> TypeId {
        Walker::new(self.symbols, cache).class(name)
    }
}

struct Walker<'a> {
    symbols: &'a dyn SymbolTable,
    cache: &'a TypeCache,
    in_progress: HashSet<String>,
    /// Type variables whose bounds are being walked.
    visiting: Vec<SymbolId>,
}

impl<'a> Walker<'a> {
    fn new(symbols: &'a dyn SymbolTable, cache: &'a TypeCache) -> Self {
        Self {
            symbols,
            cache,
            in_progress: HashSet::new(),
            visiting: Vec::new(),
        }
    }

    fn class(&mut self, name: &str) -> TypeId {
        let symbols = self.symbols;
        if let Some(id) = self.cache.lookup(name) {
            let shallow = matches!(*self.cache.get(id), JavaType::ShallowClass(_));
            if !shallow || self.in_progress.contains(name) || symbols.class(name).is_none() {
                return id;
            }
        }

        let Some(symbol) = symbols.class(name) else {
            tracing::debug!(target: "remold.types.compiler", class = name, "no symbol, using shallow class");
            return self.shallow(name);
        };

        let id = self.cache.reserve(name).id();
        self.in_progress.insert(name.to_string());
        let outer_visiting = std::mem::take(&mut self.visiting);

        let class = self.build_class(symbol, id);
        let id = self.cache.intern(name, JavaType::Class(class));

        self.visiting = outer_visiting;
        self.in_progress.remove(name);
        id
    }

    fn shallow(&self, name: &str) -> TypeId {
        self.cache.intern(
            name,
            JavaType::ShallowClass(ShallowClass {
                fully_qualified_name: name.to_string(),
            }),
        )
    }

    fn build_class(&mut self, symbol: &'a ClassSymbol, id: TypeId) -> ClassType {
        let name = symbol.binary_name.as_str();
        let mut class = ClassType::new(name, symbol.kind);
        class.flags = symbol.flags;
        if matches!(symbol.kind, ClassKind::Interface | ClassKind::Annotation) {
            class.flags.insert(Flag::Interface);
            class.flags.insert(Flag::Abstract);
        }

        class.owning_class = symbol.owner.as_deref().map(|owner| self.class(owner));
        class.type_parameters = symbol
            .type_parameters
            .iter()
            .map(|tv| self.ty(&TypeMirror::TypeVar(*tv)))
            .collect();

        let has_supertype = name != JAVA_LANG_OBJECT
            && !matches!(symbol.kind, ClassKind::Interface | ClassKind::Annotation);
        if has_supertype {
            class.supertype = Some(match &symbol.superclass {
                Some(superclass) => self.ty(superclass),
                None => self.class(JAVA_LANG_OBJECT),
            });
        }
        class.interfaces = symbol.interfaces.iter().map(|i| self.ty(i)).collect();
        class.annotations = self.annotations(&symbol.annotations);

        for method in &symbol.methods {
            if method.name == "<clinit>" || method.bridge || method.flags.contains(Flag::Synthetic) {
                continue;
            }
            if method.name == "<init>" && symbol.kind == ClassKind::Enum {
                continue;
            }
            let method_id = self.method(name, id, method);
            class.methods.push(method_id);
        }

        for field in &symbol.fields {
            if field.flags.contains(Flag::Synthetic) {
                continue;
            }
            let field_id = self.field(name, id, field);
            class.fields.push(field_id);
        }

        class
    }

    fn annotations(&mut self, annotations: &[AnnotationMirror]) -> Vec<TypeId> {
        annotations
            .iter()
            .filter(|a| a.retention == Retention::Runtime)
            .map(|a| self.class(&a.name))
            .collect()
    }

    fn method(&mut self, owner: &str, owner_id: TypeId, method: &MethodSymbol) -> TypeId {
        let constructor = method.name == "<init>";
        let name = if constructor {
            CONSTRUCTOR_NAME
        } else {
            method.name.as_str()
        };

        let return_sig = if constructor {
            owner.to_string()
        } else {
            self.signature(&method.return_type)
        };
        let param_sigs: Vec<String> = method
            .parameters
            .iter()
            .map(|(_, ty)| self.signature(ty))
            .collect();
        let sig = signature::method(owner, name, &return_sig, &param_sigs);
        if let Some(id) = self.cache.lookup(&sig) {
            return id;
        }

        let return_type = if constructor {
            owner_id
        } else {
            self.ty(&method.return_type)
        };
        let parameter_types = method.parameters.iter().map(|(_, ty)| self.ty(ty)).collect();
        let thrown_exceptions = method.thrown.iter().map(|ty| self.ty(ty)).collect();
        let annotations = self.annotations(&method.annotations);

        self.cache.intern(
            &sig,
            JavaType::Method(MethodType {
                declaring_type: owner_id,
                name: name.to_string(),
                flags: method.flags,
                return_type,
                parameter_names: method.parameters.iter().map(|(n, _)| n.clone()).collect(),
                parameter_types,
                thrown_exceptions,
                annotations,
            }),
        )
    }

    fn field(&mut self, owner: &str, owner_id: TypeId, field: &VariableSymbol) -> TypeId {
        let type_sig = self.signature(&field.ty);
        let sig = signature::variable(owner, &field.name, &type_sig);
        if let Some(id) = self.cache.lookup(&sig) {
            return id;
        }
        let ty = self.ty(&field.ty);
        let annotations = self.annotations(&field.annotations);
        self.cache.intern(
            &sig,
            JavaType::Variable(VariableType {
                owner: Some(owner_id),
                name: field.name.clone(),
                ty,
                flags: field.flags,
                annotations,
            }),
        )
    }

    /// Signature of `ty` computed from the symbol form.
    fn signature(&mut self, ty: &TypeMirror) -> String {
        match ty {
            TypeMirror::Primitive(p) => p.keyword().to_string(),
            TypeMirror::NoType => Primitive::None.keyword().to_string(),
            TypeMirror::Error(name) => name.clone(),
            TypeMirror::Declared { name, arguments } if arguments.is_empty() => name.clone(),
            TypeMirror::Declared { name, arguments } => {
                let args: Vec<String> = arguments.iter().map(|a| self.signature(a)).collect();
                signature::parameterized(name, &args)
            }
            TypeMirror::Array(element) => signature::array(&self.signature(element)),
            TypeMirror::TypeVar(id) => {
                let symbols = self.symbols;
                let Some(tv) = symbols.type_variable(*id) else {
                    return signature::UNKNOWN.to_string();
                };
                if self.visiting.contains(id) {
                    return signature::generic(&tv.name, Variance::Invariant, &[]);
                }
                self.visiting.push(*id);
                let bounds: Vec<String> = tv
                    .bounds
                    .iter()
                    .filter(|b| !b.is_object())
                    .map(|b| self.signature(b))
                    .collect();
                self.visiting.pop();
                signature::generic(&tv.name, variance_of(&bounds), &bounds)
            }
            TypeMirror::Wildcard(kind) => {
                let (variance, bounds) = match kind {
                    WildcardKind::Unbounded => (Variance::Invariant, Vec::new()),
                    WildcardKind::Extends(b) if b.is_object() => (Variance::Invariant, Vec::new()),
                    WildcardKind::Extends(b) => (Variance::Covariant, vec![self.signature(b)]),
                    WildcardKind::Super(b) => (Variance::Contravariant, vec![self.signature(b)]),
                };
                signature::generic("?", variance, &bounds)
            }
            TypeMirror::Intersection(parts) => {
                let bounds: Vec<String> = parts.iter().map(|p| self.signature(p)).collect();
                signature::generic("?", Variance::Covariant, &bounds)
            }
            TypeMirror::Captured(wildcard) => self.signature(wildcard),
        }
    }

    fn ty(&mut self, ty: &TypeMirror) -> TypeId {
        match ty {
            TypeMirror::Primitive(p) => self.cache.primitive(*p),
            TypeMirror::NoType => self.cache.primitive(Primitive::None),
            TypeMirror::Error(name) => self.shallow(name),
            TypeMirror::Declared { name, arguments } if arguments.is_empty() => self.class(name),
            TypeMirror::Declared { name, arguments } => {
                let sig = self.signature(ty);
                if let Some(id) = self.cache.lookup(&sig) {
                    return id;
                }
                let class = self.class(name);
                let type_arguments = arguments.iter().map(|a| self.ty(a)).collect();
                self.cache.intern(
                    &sig,
                    JavaType::Parameterized(ParameterizedType {
                        class,
                        type_arguments,
                    }),
                )
            }
            TypeMirror::Array(element) => {
                let sig = self.signature(ty);
                if let Some(id) = self.cache.lookup(&sig) {
                    return id;
                }
                let element = self.ty(element);
                self.cache.intern(&sig, JavaType::Array(ArrayType { element }))
            }
            TypeMirror::TypeVar(id) => self.type_variable(*id),
            TypeMirror::Wildcard(kind) => {
                let sig = self.signature(ty);
                if let Some(id) = self.cache.lookup(&sig) {
                    return id;
                }
                let (variance, bounds) = match kind {
                    WildcardKind::Unbounded => (Variance::Invariant, Vec::new()),
                    WildcardKind::Extends(b) if b.is_object() => (Variance::Invariant, Vec::new()),
                    WildcardKind::Extends(b) => (Variance::Covariant, vec![self.ty(b)]),
                    WildcardKind::Super(b) => (Variance::Contravariant, vec![self.ty(b)]),
                };
                self.generic_node(&sig, "?", variance, bounds)
            }
            TypeMirror::Intersection(parts) => {
                let sig = self.signature(ty);
                if let Some(id) = self.cache.lookup(&sig) {
                    return id;
                }
                let bounds = parts.iter().map(|p| self.ty(p)).collect();
                self.generic_node(&sig, "?", Variance::Covariant, bounds)
            }
            TypeMirror::Captured(wildcard) => self.ty(wildcard),
        }
    }

    fn type_variable(&mut self, id: SymbolId) -> TypeId {
        let symbols = self.symbols;
        let Some(tv) = symbols.type_variable(id) else {
            return self.cache.unknown();
        };
        if self.visiting.contains(&id) {
            let sig = signature::generic(&tv.name, Variance::Invariant, &[]);
            return self.generic_node(&sig, &tv.name, Variance::Invariant, Vec::new());
        }

        let sig = self.signature(&TypeMirror::TypeVar(id));
        if let Some(existing) = self.cache.lookup(&sig) {
            return existing;
        }
        let reserved = self.cache.reserve(&sig).id();

        self.visiting.push(id);
        let bounds: Vec<TypeId> = tv
            .bounds
            .iter()
            .filter(|b| !b.is_object())
            .map(|b| self.ty(b))
            .collect();
        self.visiting.pop();

        let variance = if bounds.is_empty() {
            Variance::Invariant
        } else {
            Variance::Covariant
        };
        self.cache.patch(
            reserved,
            JavaType::GenericTypeVariable(GenericTypeVariable {
                name: tv.name.clone(),
                variance,
                bounds,
            }),
        );
        reserved
    }

    fn generic_node(
        &self,
        sig: &str,
        name: &str,
        variance: Variance,
        bounds: Vec<TypeId>,
    ) -> TypeId {
        self.cache.intern(
            sig,
            JavaType::GenericTypeVariable(GenericTypeVariable {
                name: name.to_string(),
                variance,
                bounds,
            }),
        )
    }
}

fn variance_of(bounds: &[String]) -> Variance {
    if bounds.is_empty() {
        Variance::Invariant
    } else {
        Variance::Covariant
    }
}
