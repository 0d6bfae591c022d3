use crate::flags::Flags;

/// Index of a node in a [`crate::TypeCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    pub fn to_raw(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
    /// Type of string literals.
    String,
    Null,
    /// No type, e.g. the type of a package name expression.
    None,
}

impl Primitive {
    pub const ALL: [Primitive; 12] = [
        Primitive::Boolean,
        Primitive::Byte,
        Primitive::Char,
        Primitive::Short,
        Primitive::Int,
        Primitive::Long,
        Primitive::Float,
        Primitive::Double,
        Primitive::Void,
        Primitive::String,
        Primitive::Null,
        Primitive::None,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Char => "char",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Void => "void",
            Primitive::String => "String",
            Primitive::Null => "null",
            Primitive::None => "none",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Primitive::ALL.into_iter().find(|p| p.keyword() == keyword)
    }
}

impl From<remold_signature::BaseType> for Primitive {
    fn from(base: remold_signature::BaseType) -> Self {
        use remold_signature::BaseType;
        match base {
            BaseType::Byte => Primitive::Byte,
            BaseType::Char => Primitive::Char,
            BaseType::Double => Primitive::Double,
            BaseType::Float => Primitive::Float,
            BaseType::Int => Primitive::Int,
            BaseType::Long => Primitive::Long,
            BaseType::Short => Primitive::Short,
            BaseType::Boolean => Primitive::Boolean,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Record,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variance {
    Invariant,
    /// `? extends X`, or a named variable with upper bounds.
    Covariant,
    /// `? super X`
    Contravariant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassType {
    /// Binary name with `$` separating nested classes.
    pub fully_qualified_name: String,
    pub kind: ClassKind,
    pub flags: Flags,
    /// Enclosing class of a nested class. Lookup only.
    pub owning_class: Option<TypeId>,
    pub supertype: Option<TypeId>,
    pub interfaces: Vec<TypeId>,
    pub type_parameters: Vec<TypeId>,
    /// Runtime-retained annotations only.
    pub annotations: Vec<TypeId>,
    pub methods: Vec<TypeId>,
    pub fields: Vec<TypeId>,
}

impl ClassType {
    pub fn new(fully_qualified_name: impl Into<String>, kind: ClassKind) -> Self {
        ClassType {
            fully_qualified_name: fully_qualified_name.into(),
            kind,
            flags: Flags::empty(),
            owning_class: None,
            supertype: None,
            interfaces: Vec::new(),
            type_parameters: Vec::new(),
            annotations: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn package_name(&self) -> &str {
        match self.fully_qualified_name.rfind('.') {
            Some(idx) => &self.fully_qualified_name[..idx],
            None => "",
        }
    }

    /// Simple name, with enclosing classes joined by `.` (`Map.Entry`).
    pub fn class_name(&self) -> String {
        let start = self.fully_qualified_name.rfind('.').map_or(0, |idx| idx + 1);
        self.fully_qualified_name[start..].replace('$', ".")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterizedType {
    /// The generic class being parameterized.
    pub class: TypeId,
    pub type_arguments: Vec<TypeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericTypeVariable {
    /// `?` for wildcards.
    pub name: String,
    pub variance: Variance,
    pub bounds: Vec<TypeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayType {
    pub element: TypeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodType {
    /// Lookup only.
    pub declaring_type: TypeId,
    /// [`crate::CONSTRUCTOR_NAME`] for constructors.
    pub name: String,
    pub flags: Flags,
    pub return_type: TypeId,
    pub parameter_names: Vec<String>,
    pub parameter_types: Vec<TypeId>,
    pub thrown_exceptions: Vec<TypeId>,
    pub annotations: Vec<TypeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableType {
    /// Lookup only.
    pub owner: Option<TypeId>,
    pub name: String,
    pub ty: TypeId,
    pub flags: Flags,
    pub annotations: Vec<TypeId>,
}

/// A class known only by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShallowClass {
    pub fully_qualified_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JavaType {
    Primitive(Primitive),
    Array(ArrayType),
    Class(ClassType),
    Parameterized(ParameterizedType),
    GenericTypeVariable(GenericTypeVariable),
    Method(MethodType),
    Variable(VariableType),
    ShallowClass(ShallowClass),
    Unknown,
}

impl JavaType {
    pub fn as_class(&self) -> Option<&ClassType> {
        match self {
            JavaType::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_parameterized(&self) -> Option<&ParameterizedType> {
        match self {
            JavaType::Parameterized(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_generic(&self) -> Option<&GenericTypeVariable> {
        match self {
            JavaType::GenericTypeVariable(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayType> {
        match self {
            JavaType::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&MethodType> {
        match self {
            JavaType::Method(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&VariableType> {
        match self {
            JavaType::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, JavaType::Unknown)
    }
}
