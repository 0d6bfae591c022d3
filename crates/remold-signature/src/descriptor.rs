use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    pub(crate) fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            b'B' => BaseType::Byte,
            b'C' => BaseType::Char,
            b'D' => BaseType::Double,
            b'F' => BaseType::Float,
            b'I' => BaseType::Int,
            b'J' => BaseType::Long,
            b'S' => BaseType::Short,
            b'Z' => BaseType::Boolean,
            _ => return None,
        })
    }

    /// The Java keyword for this primitive.
    pub fn keyword(self) -> &'static str {
        match self {
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Double => "double",
            BaseType::Float => "float",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Boolean => "boolean",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Base(BaseType),
    /// Internal name, e.g. `java/lang/String`.
    Object(String),
    Array(Box<FieldType>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnType {
    Void,
    Type(FieldType),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub params: Vec<FieldType>,
    pub return_type: ReturnType,
}

pub fn parse_field_descriptor(desc: &str) -> Result<FieldType> {
    let (ty, next) = field_type_at(desc, 0)?;
    if next != desc.len() {
        return Err(Error::InvalidDescriptor(desc.to_string()));
    }
    Ok(ty)
}

pub fn parse_method_descriptor(desc: &str) -> Result<MethodDescriptor> {
    let bytes = desc.as_bytes();
    if bytes.first() != Some(&b'(') {
        return Err(Error::InvalidDescriptor(desc.to_string()));
    }

    let mut pos = 1;
    let mut params = Vec::new();
    loop {
        match bytes.get(pos) {
            Some(b')') => {
                pos += 1;
                break;
            }
            Some(_) => {
                let (param, next) = field_type_at(desc, pos)?;
                params.push(param);
                pos = next;
            }
            None => return Err(Error::InvalidDescriptor(desc.to_string())),
        }
    }

    let return_type = match bytes.get(pos) {
        Some(b'V') if pos + 1 == bytes.len() => ReturnType::Void,
        Some(_) => {
            let (ty, next) = field_type_at(desc, pos)?;
            if next != bytes.len() {
                return Err(Error::InvalidDescriptor(desc.to_string()));
            }
            ReturnType::Type(ty)
        }
        None => return Err(Error::InvalidDescriptor(desc.to_string())),
    };

    Ok(MethodDescriptor {
        params,
        return_type,
    })
}

/// Parse one field type starting at byte `pos`, returning it and the offset just past it.
fn field_type_at(desc: &str, pos: usize) -> Result<(FieldType, usize)> {
    let bytes = desc.as_bytes();
    let mut dims = 0usize;
    let mut pos = pos;
    while bytes.get(pos) == Some(&b'[') {
        dims += 1;
        pos += 1;
    }

    let invalid = || Error::InvalidDescriptor(desc.to_string());
    let tag = *bytes.get(pos).ok_or_else(invalid)?;
    let (mut ty, next) = if let Some(base) = BaseType::from_tag(tag) {
        (FieldType::Base(base), pos + 1)
    } else if tag == b'L' {
        let end = desc[pos..].find(';').map(|i| pos + i).ok_or_else(invalid)?;
        if end == pos + 1 {
            return Err(invalid());
        }
        (FieldType::Object(desc[pos + 1..end].to_string()), end + 1)
    } else {
        return Err(invalid());
    };

    for _ in 0..dims {
        ty = FieldType::Array(Box::new(ty));
    }
    Ok((ty, next))
}
