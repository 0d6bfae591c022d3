use std::collections::HashSet;

use remold_signature::access::{
    ACC_ANNOTATION, ACC_BRIDGE, ACC_ENUM, ACC_INTERFACE, ACC_STATIC, ACC_SYNTHETIC,
};
use remold_signature::{
    internal_to_binary, parse_class_signature, parse_field_descriptor, parse_field_signature,
    parse_method_descriptor, parse_method_signature, ClassSignature, ClassTypeSignature,
    FieldType, MethodSignature, ReturnType, TypeArgument, TypeParameter, TypeSignature,
};
use remold_types::signature;
use remold_types::{
    ArrayType, ClassKind, ClassType, Flags, GenericTypeVariable, JavaType, MethodType,
    ParameterizedType, Primitive, ShallowClass, TypeCache, TypeId, TypeMapping, Variance,
    VariableType, CONSTRUCTOR_NAME, JAVA_LANG_OBJECT,
};

const JAVA_LANG_RECORD: &str = "java.lang.Record";

/// A class as seen through runtime reflection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeClass {
    /// Binary name (`java.util.Map$Entry`).
    pub name: String,
    /// JVM access flags, including the inner-class flags of nested classes.
    pub modifiers: u16,
    /// Generic `Signature` attribute, if the class declares one.
    pub signature: Option<String>,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    pub enclosing_class: Option<String>,
    /// Binary names of runtime-visible annotations.
    pub annotations: Vec<String>,
    pub methods: Vec<RuntimeMethod>,
    pub fields: Vec<RuntimeField>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeMethod {
    /// `<init>` for constructors, `<clinit>` for static initialisers.
    pub name: String,
    pub modifiers: u16,
    pub descriptor: String,
    pub signature: Option<String>,
    /// Empty unless the class was compiled with parameter names.
    pub parameter_names: Vec<String>,
    pub exceptions: Vec<String>,
    pub annotations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeField {
    pub name: String,
    pub modifiers: u16,
    pub descriptor: String,
    pub signature: Option<String>,
    pub annotations: Vec<String>,
}

/// Runtime class lookup.
pub trait ReflectionAccess {
    fn class(&self, binary_name: &str) -> Option<&RuntimeClass>;
}

pub struct ReflectionTypeMapping<'a> {
    access: &'a dyn ReflectionAccess,
}

impl<'a> ReflectionTypeMapping<'a> {
    pub fn new(access: &'a dyn ReflectionAccess) -> Self {
        Self { access }
    }
}

impl TypeMapping for ReflectionTypeMapping<'_> {
    fn map_class(&self, cache: &TypeCache, name: &str) -> TypeId {
        Walker::new(self.access, cache).class(name)
    }
}

/// Type parameters declared by one class or method.
struct Frame {
    owner: String,
    params: Vec<TypeParameter>,
}

struct Walker<'a> {
    access: &'a dyn ReflectionAccess,
    cache: &'a TypeCache,
    in_progress: HashSet<String>,
    /// Type parameters in scope, innermost last.
    scope: Vec<Frame>,
    /// `owner:name` keys of type variables whose bounds are being walked.
    visiting: Vec<String>,
}

impl<'a> Walker<'a> {
    fn new(access: &'a dyn ReflectionAccess, cache: &'a TypeCache) -> Self {
        Self {
            access,
            cache,
            in_progress: HashSet::new(),
            scope: Vec::new(),
            visiting: Vec::new(),
        }
    }

    fn class(&mut self, name: &str) -> TypeId {
        let access = self.access;
        if let Some(id) = self.cache.lookup(name) {
            let shallow = matches!(*self.cache.get(id), JavaType::ShallowClass(_));
            if !shallow || self.in_progress.contains(name) || access.class(name).is_none() {
                return id;
            }
        }

        let Some(runtime) = access.class(name) else {
            tracing::debug!(target: "remold.types.reflection", class = name, "class not found, using shallow class");
            return self.shallow(name);
        };

        let id = self.cache.reserve(name).id();
        self.in_progress.insert(name.to_string());
        let frames = self.class_frames(runtime);
        let outer_scope = std::mem::replace(&mut self.scope, frames);
        let outer_visiting = std::mem::take(&mut self.visiting);

        let class = self.build_class(runtime, id);
        let id = self.cache.intern(name, JavaType::Class(class));

        self.scope = outer_scope;
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

    /// Type parameter frames visible inside `runtime`: those of enclosing
    /// classes (for inner classes) followed by its own.
    fn class_frames(&self, runtime: &RuntimeClass) -> Vec<Frame> {
        let mut frames = Vec::new();
        if runtime.modifiers & ACC_STATIC == 0 {
            if let Some(outer) = runtime.enclosing_class.as_deref().and_then(|n| self.access.class(n)) {
                frames = self.class_frames(outer);
            }
        }
        let params = class_signature(runtime)
            .map(|sig| sig.type_parameters)
            .unwrap_or_default();
        frames.push(Frame {
            owner: runtime.name.clone(),
            params,
        });
        frames
    }

    fn build_class(&mut self, runtime: &'a RuntimeClass, id: TypeId) -> ClassType {
        let name = runtime.name.as_str();
        let kind = class_kind(runtime);
        let mut class = ClassType::new(name, kind);
        class.flags = Flags::from_class_access(runtime.modifiers);

        class.owning_class = runtime.enclosing_class.as_deref().map(|owner| self.class(owner));

        let sig = class_signature(runtime);
        if let Some(sig) = &sig {
            class.type_parameters = sig
                .type_parameters
                .iter()
                .map(|tp| self.type_variable(&tp.name))
                .collect();
        }

        let has_supertype =
            name != JAVA_LANG_OBJECT && !matches!(kind, ClassKind::Interface | ClassKind::Annotation);
        if has_supertype {
            class.supertype = Some(match (&sig, runtime.superclass.as_deref()) {
                (Some(sig), _) => self.class_type(&sig.super_class),
                (None, Some(superclass)) => self.class(superclass),
                (None, None) => self.class(JAVA_LANG_OBJECT),
            });
        }
        class.interfaces = match &sig {
            Some(sig) => sig.interfaces.iter().map(|i| self.class_type(i)).collect(),
            None => runtime.interfaces.iter().map(|i| self.class(i)).collect(),
        };
        class.annotations = runtime.annotations.iter().map(|a| self.class(a)).collect();

        // The outer instance is an implicit first constructor parameter of
        // inner classes.
        let inner = runtime.enclosing_class.is_some()
            && runtime.modifiers & ACC_STATIC == 0
            && kind == ClassKind::Class;

        for method in &runtime.methods {
            if method.name == "<clinit>" || method.modifiers & (ACC_SYNTHETIC | ACC_BRIDGE) != 0 {
                continue;
            }
            if method.name == "<init>" && kind == ClassKind::Enum {
                continue;
            }
            if let Some(method_id) = self.method(name, id, method, inner) {
                class.methods.push(method_id);
            }
        }

        for field in &runtime.fields {
            if field.modifiers & ACC_SYNTHETIC != 0 {
                continue;
            }
            if let Some(field_id) = self.field(name, id, field) {
                class.fields.push(field_id);
            }
        }

        class
    }

    fn method(
        &mut self,
        owner: &str,
        owner_id: TypeId,
        method: &RuntimeMethod,
        inner_class: bool,
    ) -> Option<TypeId> {
        let constructor = method.name == "<init>";
        let name = if constructor {
            CONSTRUCTOR_NAME
        } else {
            method.name.as_str()
        };

        let shape = match method.signature.as_deref().map(parse_method_signature) {
            Some(Ok(sig)) => MethodShape::Generic(sig),
            Some(Err(err)) => {
                tracing::debug!(target: "remold.types.reflection", class = owner, method = %method.name, error = %err, "ignoring malformed method signature");
                MethodShape::from_descriptor(method, constructor && inner_class)?
            }
            None => MethodShape::from_descriptor(method, constructor && inner_class)?,
        };

        let type_parameters = match &shape {
            MethodShape::Generic(sig) => sig.type_parameters.clone(),
            MethodShape::Erased { .. } => Vec::new(),
        };
        self.scope.push(Frame {
            owner: format!("{owner}#{}{}", method.name, method.descriptor),
            params: type_parameters,
        });
        let id = self.method_in_scope(owner, owner_id, name, constructor, method, &shape);
        self.scope.pop();
        Some(id)
    }

    fn method_in_scope(
        &mut self,
        owner: &str,
        owner_id: TypeId,
        name: &str,
        constructor: bool,
        method: &RuntimeMethod,
        shape: &MethodShape,
    ) -> TypeId {
        let (return_sig, param_sigs) = match shape {
            MethodShape::Generic(sig) => (
                sig.return_type.as_ref().map(|r| self.signature(r)),
                sig.parameters.iter().map(|p| self.signature(p)).collect::<Vec<_>>(),
            ),
            MethodShape::Erased { params, ret } => (
                ret.as_ref().map(field_type_signature),
                params.iter().map(field_type_signature).collect(),
            ),
        };
        let return_sig = if constructor {
            owner.to_string()
        } else {
            return_sig.unwrap_or_else(|| Primitive::Void.keyword().to_string())
        };
        let sig = signature::method(owner, name, &return_sig, &param_sigs);
        if let Some(id) = self.cache.lookup(&sig) {
            return id;
        }

        let (return_type, parameter_types): (Option<TypeId>, Vec<TypeId>) = match shape {
            MethodShape::Generic(sig) => (
                sig.return_type.as_ref().map(|r| self.ty(r)),
                sig.parameters.iter().map(|p| self.ty(p)).collect(),
            ),
            MethodShape::Erased { params, ret } => (
                ret.as_ref().map(|r| self.field_type(r)),
                params.iter().map(|p| self.field_type(p)).collect(),
            ),
        };
        let return_type = if constructor {
            owner_id
        } else {
            return_type.unwrap_or_else(|| self.cache.primitive(Primitive::Void))
        };

        let thrown_exceptions = match shape {
            MethodShape::Generic(sig) if !sig.throws.is_empty() => {
                sig.throws.iter().map(|t| self.ty(t)).collect()
            }
            _ => method.exceptions.iter().map(|e| self.class(e)).collect(),
        };

        let parameter_names = if method.parameter_names.len() == parameter_types.len() {
            method.parameter_names.clone()
        } else {
            (0..parameter_types.len()).map(|i| format!("arg{i}")).collect()
        };
        let annotations = method.annotations.iter().map(|a| self.class(a)).collect();

        self.cache.intern(
            &sig,
            JavaType::Method(MethodType {
                declaring_type: owner_id,
                name: name.to_string(),
                flags: Flags::from_method_access(method.modifiers),
                return_type,
                parameter_names,
                parameter_types,
                thrown_exceptions,
                annotations,
            }),
        )
    }

    fn field(&mut self, owner: &str, owner_id: TypeId, field: &RuntimeField) -> Option<TypeId> {
        let generic = field
            .signature
            .as_deref()
            .and_then(|s| parse_field_signature(s).ok());
        let erased = match &generic {
            Some(_) => None,
            None => match parse_field_descriptor(&field.descriptor) {
                Ok(desc) => Some(desc),
                Err(err) => {
                    tracing::debug!(target: "remold.types.reflection", class = owner, field = %field.name, error = %err, "skipping field with malformed descriptor");
                    return None;
                }
            },
        };

        let type_sig = match (&generic, &erased) {
            (Some(g), _) => self.signature(g),
            (None, Some(e)) => field_type_signature(e),
            (None, None) => return None,
        };
        let sig = signature::variable(owner, &field.name, &type_sig);
        if let Some(id) = self.cache.lookup(&sig) {
            return Some(id);
        }

        let ty = match (&generic, &erased) {
            (Some(g), _) => self.ty(g),
            (None, Some(e)) => self.field_type(e),
            (None, None) => return None,
        };
        let annotations = field.annotations.iter().map(|a| self.class(a)).collect();
        Some(self.cache.intern(
            &sig,
            JavaType::Variable(VariableType {
                owner: Some(owner_id),
                name: field.name.clone(),
                ty,
                flags: Flags::from_field_access(field.modifiers),
                annotations,
            }),
        ))
    }

    fn resolve(&self, name: &str) -> Option<(String, TypeParameter)> {
        self.scope.iter().rev().find_map(|frame| {
            frame
                .params
                .iter()
                .find(|tp| tp.name == name)
                .map(|tp| (format!("{}:{name}", frame.owner), tp.clone()))
        })
    }

    fn signature(&mut self, ty: &TypeSignature) -> String {
        match ty {
            TypeSignature::Base(base) => Primitive::from(*base).keyword().to_string(),
            TypeSignature::Array(element) => signature::array(&self.signature(element)),
            TypeSignature::Class(class) => {
                let name = internal_to_binary(&class.internal_name());
                let args = class.type_arguments();
                if args.is_empty() {
                    return name;
                }
                let args: Vec<String> = args.iter().map(|a| self.argument_signature(a)).collect();
                signature::parameterized(&name, &args)
            }
            TypeSignature::TypeVariable(name) => {
                let Some((key, tp)) = self.resolve(name) else {
                    return signature::UNKNOWN.to_string();
                };
                if self.visiting.contains(&key) {
                    return signature::generic(name, Variance::Invariant, &[]);
                }
                self.visiting.push(key);
                let bounds: Vec<String> = bounds_of(&tp).map(|b| self.signature(b)).collect();
                self.visiting.pop();
                let variance = if bounds.is_empty() {
                    Variance::Invariant
                } else {
                    Variance::Covariant
                };
                signature::generic(name, variance, &bounds)
            }
        }
    }

    fn argument_signature(&mut self, arg: &TypeArgument) -> String {
        match arg {
            TypeArgument::Exact(ty) => self.signature(ty),
            TypeArgument::Any => signature::generic("?", Variance::Invariant, &[]),
            TypeArgument::Extends(b) if is_object(b) => {
                signature::generic("?", Variance::Invariant, &[])
            }
            TypeArgument::Extends(b) => {
                let bound = self.signature(b);
                signature::generic("?", Variance::Covariant, &[bound])
            }
            TypeArgument::Super(b) => {
                let bound = self.signature(b);
                signature::generic("?", Variance::Contravariant, &[bound])
            }
        }
    }

    fn ty(&mut self, ty: &TypeSignature) -> TypeId {
        match ty {
            TypeSignature::Base(base) => self.cache.primitive(Primitive::from(*base)),
            TypeSignature::Array(element) => {
                let sig = self.signature(ty);
                if let Some(id) = self.cache.lookup(&sig) {
                    return id;
                }
                let element = self.ty(element);
                self.cache.intern(&sig, JavaType::Array(ArrayType { element }))
            }
            TypeSignature::Class(class) => self.class_type(class),
            TypeSignature::TypeVariable(name) => self.type_variable(name),
        }
    }

    fn class_type(&mut self, class: &ClassTypeSignature) -> TypeId {
        let name = internal_to_binary(&class.internal_name());
        if class.type_arguments().is_empty() {
            return self.class(&name);
        }
        let sig = self.signature(&TypeSignature::Class(class.clone()));
        if let Some(id) = self.cache.lookup(&sig) {
            return id;
        }
        let class_id = self.class(&name);
        let type_arguments = class
            .type_arguments()
            .iter()
            .map(|a| self.argument(a))
            .collect();
        self.cache.intern(
            &sig,
            JavaType::Parameterized(ParameterizedType {
                class: class_id,
                type_arguments,
            }),
        )
    }

    fn argument(&mut self, arg: &TypeArgument) -> TypeId {
        let (variance, bound) = match arg {
            TypeArgument::Exact(ty) => return self.ty(ty),
            TypeArgument::Any => (Variance::Invariant, None),
            TypeArgument::Extends(b) if is_object(b) => (Variance::Invariant, None),
            TypeArgument::Extends(b) => (Variance::Covariant, Some(b)),
            TypeArgument::Super(b) => (Variance::Contravariant, Some(b)),
        };
        let sig = self.argument_signature(arg);
        if let Some(id) = self.cache.lookup(&sig) {
            return id;
        }
        let bounds = bound.map(|b| self.ty(b)).into_iter().collect();
        self.generic_node(&sig, "?", variance, bounds)
    }

    fn type_variable(&mut self, name: &str) -> TypeId {
        let Some((key, tp)) = self.resolve(name) else {
            tracing::debug!(target: "remold.types.reflection", variable = name, "type variable not in scope");
            return self.cache.unknown();
        };
        if self.visiting.contains(&key) {
            let sig = signature::generic(name, Variance::Invariant, &[]);
            return self.generic_node(&sig, name, Variance::Invariant, Vec::new());
        }

        let sig = self.signature(&TypeSignature::TypeVariable(name.to_string()));
        if let Some(existing) = self.cache.lookup(&sig) {
            return existing;
        }
        let reserved = self.cache.reserve(&sig).id();

        self.visiting.push(key);
        let bounds: Vec<TypeId> = bounds_of(&tp).map(|b| self.ty(b)).collect();
        self.visiting.pop();

        let variance = if bounds.is_empty() {
            Variance::Invariant
        } else {
            Variance::Covariant
        };
        self.cache.patch(
            reserved,
            JavaType::GenericTypeVariable(GenericTypeVariable {
                name: name.to_string(),
                variance,
                bounds,
            }),
        );
        reserved
    }

    fn field_type(&mut self, ty: &FieldType) -> TypeId {
        match ty {
            FieldType::Base(base) => self.cache.primitive(Primitive::from(*base)),
            FieldType::Object(internal) => self.class(&internal_to_binary(internal)),
            FieldType::Array(element) => {
                let sig = field_type_signature(ty);
                if let Some(id) = self.cache.lookup(&sig) {
                    return id;
                }
                let element = self.field_type(element);
                self.cache.intern(&sig, JavaType::Array(ArrayType { element }))
            }
        }
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

enum MethodShape {
    Generic(MethodSignature),
    /// From the plain descriptor. `ret` is `None` for `void`.
    Erased {
        params: Vec<FieldType>,
        ret: Option<FieldType>,
    },
}

impl MethodShape {
    fn from_descriptor(method: &RuntimeMethod, drop_outer_instance: bool) -> Option<Self> {
        let desc = match parse_method_descriptor(&method.descriptor) {
            Ok(desc) => desc,
            Err(err) => {
                tracing::debug!(target: "remold.types.reflection", method = %method.name, error = %err, "skipping method with malformed descriptor");
                return None;
            }
        };
        let mut params = desc.params;
        if drop_outer_instance && !params.is_empty() {
            params.remove(0);
        }
        let ret = match desc.return_type {
            ReturnType::Void => None,
            ReturnType::Type(ty) => Some(ty),
        };
        Some(MethodShape::Erased { params, ret })
    }
}

fn class_signature(runtime: &RuntimeClass) -> Option<ClassSignature> {
    let raw = runtime.signature.as_deref()?;
    match parse_class_signature(raw) {
        Ok(sig) => Some(sig),
        Err(err) => {
            tracing::debug!(target: "remold.types.reflection", class = %runtime.name, error = %err, "ignoring malformed class signature");
            None
        }
    }
}

fn class_kind(runtime: &RuntimeClass) -> ClassKind {
    if runtime.modifiers & ACC_ANNOTATION != 0 {
        ClassKind::Annotation
    } else if runtime.modifiers & ACC_INTERFACE != 0 {
        ClassKind::Interface
    } else if runtime.modifiers & ACC_ENUM != 0 {
        ClassKind::Enum
    } else if runtime.superclass.as_deref() == Some(JAVA_LANG_RECORD) {
        ClassKind::Record
    } else {
        ClassKind::Class
    }
}

fn is_object(ty: &TypeSignature) -> bool {
    matches!(ty, TypeSignature::Class(c) if c.internal_name() == "java/lang/Object" && c.type_arguments().is_empty())
}

/// Declared bounds of a type parameter, without the implicit `Object`.
fn bounds_of(tp: &TypeParameter) -> impl Iterator<Item = &TypeSignature> {
    tp.class_bound
        .iter()
        .chain(tp.interface_bounds.iter())
        .filter(|b| !is_object(b))
}

fn field_type_signature(ty: &FieldType) -> String {
    match ty {
        FieldType::Base(base) => Primitive::from(*base).keyword().to_string(),
        FieldType::Object(internal) => internal_to_binary(internal),
        FieldType::Array(element) => signature::array(&field_type_signature(element)),
    }
}
