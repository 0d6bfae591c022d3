use crate::descriptor::BaseType;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSignature {
    pub type_parameters: Vec<TypeParameter>,
    pub super_class: ClassTypeSignature,
    pub interfaces: Vec<ClassTypeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<TypeSignature>,
    /// `None` for `void`.
    pub return_type: Option<TypeSignature>,
    pub throws: Vec<TypeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameter {
    pub name: String,
    /// An empty class bound (`T::Ljava/lang/Comparable;`) is `None`.
    pub class_bound: Option<TypeSignature>,
    pub interface_bounds: Vec<TypeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSignature {
    Base(BaseType),
    Array(Box<TypeSignature>),
    Class(ClassTypeSignature),
    TypeVariable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTypeSignature {
    /// Package in internal form (`java/util/`), possibly empty.
    pub package: String,
    /// Outer-to-inner class segments.
    pub segments: Vec<SimpleClassTypeSignature>,
}

impl ClassTypeSignature {
    /// Internal name of the innermost class (`java/util/Map$Entry`).
    pub fn internal_name(&self) -> String {
        let mut out = self.package.clone();
        for (idx, seg) in self.segments.iter().enumerate() {
            if idx > 0 {
                out.push('$');
            }
            out.push_str(&seg.name);
        }
        out
    }

    pub fn type_arguments(&self) -> &[TypeArgument] {
        self.segments
            .last()
            .map(|seg| seg.type_arguments.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleClassTypeSignature {
    pub name: String,
    pub type_arguments: Vec<TypeArgument>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeArgument {
    /// `*`
    Any,
    Exact(TypeSignature),
    /// `+`
    Extends(TypeSignature),
    /// `-`
    Super(TypeSignature),
}

pub fn parse_class_signature(sig: &str) -> Result<ClassSignature> {
    let mut p = Parser::new(sig);
    let type_parameters = p.type_parameters()?;
    let super_class = p.class_type()?;
    let mut interfaces = Vec::new();
    while !p.at_end() {
        interfaces.push(p.class_type()?);
    }
    Ok(ClassSignature {
        type_parameters,
        super_class,
        interfaces,
    })
}

pub fn parse_method_signature(sig: &str) -> Result<MethodSignature> {
    let mut p = Parser::new(sig);
    let type_parameters = p.type_parameters()?;
    p.expect(b'(')?;
    let mut parameters = Vec::new();
    while p.peek() != Some(b')') {
        parameters.push(p.java_type()?);
    }
    p.expect(b')')?;

    let return_type = if p.peek() == Some(b'V') {
        p.bump();
        None
    } else {
        Some(p.java_type()?)
    };

    let mut throws = Vec::new();
    while p.peek() == Some(b'^') {
        p.bump();
        throws.push(p.reference_type()?);
    }
    p.finish()?;

    Ok(MethodSignature {
        type_parameters,
        parameters,
        return_type,
        throws,
    })
}

pub fn parse_field_signature(sig: &str) -> Result<TypeSignature> {
    let mut p = Parser::new(sig);
    let ty = p.reference_type()?;
    p.finish()?;
    Ok(ty)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn error(&self) -> Error {
        Error::InvalidSignature {
            signature: self.input.to_string(),
            offset: self.pos,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        if self.peek() != Some(byte) {
            return Err(self.error());
        }
        self.bump();
        Ok(())
    }

    fn finish(&self) -> Result<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.error())
        }
    }

    /// Identifiers run until one of the grammar's reserved characters.
    fn identifier(&mut self) -> Result<&'a str> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if matches!(b, b'.' | b';' | b'[' | b'/' | b'<' | b'>' | b':') {
                break;
            }
            self.bump();
        }
        if self.pos == start {
            return Err(self.error());
        }
        Ok(&self.input[start..self.pos])
    }

    fn type_parameters(&mut self) -> Result<Vec<TypeParameter>> {
        let mut out = Vec::new();
        if self.peek() != Some(b'<') {
            return Ok(out);
        }
        self.bump();
        while self.peek() != Some(b'>') {
            let name = self.identifier()?.to_string();
            self.expect(b':')?;
            let class_bound = match self.peek() {
                Some(b'L' | b'T' | b'[') => Some(self.reference_type()?),
                _ => None,
            };
            let mut interface_bounds = Vec::new();
            while self.peek() == Some(b':') {
                self.bump();
                interface_bounds.push(self.reference_type()?);
            }
            out.push(TypeParameter {
                name,
                class_bound,
                interface_bounds,
            });
        }
        self.expect(b'>')?;
        if out.is_empty() {
            return Err(self.error());
        }
        Ok(out)
    }

    fn java_type(&mut self) -> Result<TypeSignature> {
        match self.peek().and_then(BaseType::from_tag) {
            Some(base) => {
                self.bump();
                Ok(TypeSignature::Base(base))
            }
            None => self.reference_type(),
        }
    }

    fn reference_type(&mut self) -> Result<TypeSignature> {
        match self.peek() {
            Some(b'L') => Ok(TypeSignature::Class(self.class_type()?)),
            Some(b'T') => {
                self.bump();
                let name = self.identifier()?.to_string();
                self.expect(b';')?;
                Ok(TypeSignature::TypeVariable(name))
            }
            Some(b'[') => {
                self.bump();
                Ok(TypeSignature::Array(Box::new(self.java_type()?)))
            }
            _ => Err(self.error()),
        }
    }

    fn class_type(&mut self) -> Result<ClassTypeSignature> {
        self.expect(b'L')?;

        // Package segments are identifiers followed by `/`.
        let mut package = String::new();
        let mut first = loop {
            let ident = self.identifier()?;
            if self.peek() == Some(b'/') {
                self.bump();
                package.push_str(ident);
                package.push('/');
            } else {
                break ident.to_string();
            }
        };

        let mut segments = Vec::new();
        loop {
            let type_arguments = self.type_arguments()?;
            segments.push(SimpleClassTypeSignature {
                name: std::mem::take(&mut first),
                type_arguments,
            });
            match self.peek() {
                Some(b'.') => {
                    self.bump();
                    first = self.identifier()?.to_string();
                }
                Some(b';') => {
                    self.bump();
                    break;
                }
                _ => return Err(self.error()),
            }
        }

        Ok(ClassTypeSignature { package, segments })
    }

    fn type_arguments(&mut self) -> Result<Vec<TypeArgument>> {
        let mut out = Vec::new();
        if self.peek() != Some(b'<') {
            return Ok(out);
        }
        self.bump();
        while self.peek() != Some(b'>') {
            let arg = match self.peek() {
                Some(b'*') => {
                    self.bump();
                    TypeArgument::Any
                }
                Some(b'+') => {
                    self.bump();
                    TypeArgument::Extends(self.reference_type()?)
                }
                Some(b'-') => {
                    self.bump();
                    TypeArgument::Super(self.reference_type()?)
                }
                _ => TypeArgument::Exact(self.reference_type()?),
            };
            out.push(arg);
        }
        self.expect(b'>')?;
        if out.is_empty() {
            return Err(self.error());
        }
        Ok(out)
    }
}
