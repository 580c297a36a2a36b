//! Explicit type descriptors consumed by the schema deriver.
//!
//! Instead of language runtime introspection, callers describe each type to
//! register as a [`TypeShape`] value: a tagged tree over scalars, records,
//! sequences, maps, and dynamic (unknown-shape) types. Reference wrappers are
//! transparent and unwrap to their pointee before derivation dispatches.
//!
//! A self-referential type graph is expressed by re-occurrence of the record
//! name: the nested occurrence only needs the name, since derivation stops at
//! a name already in flight and emits a forward reference.

/// The scalar families the deriver emits fixed schema bodies for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Integer,
    Number,
    String,
    Boolean,
}

impl ScalarKind {
    /// The segment name a scalar schema is registered under.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            ScalarKind::Integer => "integer",
            ScalarKind::Number => "number",
            ScalarKind::String => "string",
            ScalarKind::Boolean => "boolean",
        }
    }
}

/// A named record field, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub shape: TypeShape,
}

impl Field {
    pub fn new(name: impl Into<String>, shape: TypeShape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }
}

/// Structural description of a type to derive a schema for.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape {
    Scalar(ScalarKind),
    /// A record with ordered fields. `name` is the declared, usually
    /// module-qualified name (`"mempool.Transaction"`); empty for anonymous
    /// records, whose name is derived from the printable signature.
    Record { name: String, fields: Vec<Field> },
    /// A list, fixed-length when `fixed_len` is set.
    Sequence {
        element: Box<TypeShape>,
        fixed_len: Option<usize>,
    },
    /// An associative map. Keys are always treated as strings.
    Map { value: Box<TypeShape> },
    /// A type with no statically known shape.
    Dynamic,
    /// A pointer/reference wrapper, transparent to derivation.
    Reference(Box<TypeShape>),
    /// A kind no schema can represent (functions, channels, ...).
    Unsupported { kind: String },
}

impl TypeShape {
    pub fn integer() -> Self {
        TypeShape::Scalar(ScalarKind::Integer)
    }

    pub fn number() -> Self {
        TypeShape::Scalar(ScalarKind::Number)
    }

    pub fn string() -> Self {
        TypeShape::Scalar(ScalarKind::String)
    }

    pub fn boolean() -> Self {
        TypeShape::Scalar(ScalarKind::Boolean)
    }

    pub fn record(name: impl Into<String>, fields: Vec<Field>) -> Self {
        TypeShape::Record {
            name: name.into(),
            fields,
        }
    }

    /// A variable-length sequence.
    pub fn list(element: TypeShape) -> Self {
        TypeShape::Sequence {
            element: Box::new(element),
            fixed_len: None,
        }
    }

    /// A fixed-length sequence.
    pub fn array(element: TypeShape, len: usize) -> Self {
        TypeShape::Sequence {
            element: Box::new(element),
            fixed_len: Some(len),
        }
    }

    pub fn map_of(value: TypeShape) -> Self {
        TypeShape::Map {
            value: Box::new(value),
        }
    }

    pub fn reference(inner: TypeShape) -> Self {
        TypeShape::Reference(Box::new(inner))
    }

    pub fn unsupported(kind: impl Into<String>) -> Self {
        TypeShape::Unsupported { kind: kind.into() }
    }

    /// Strip any number of reference wrappers.
    pub fn unwrap_refs(&self) -> &TypeShape {
        let mut shape = self;
        while let TypeShape::Reference(inner) = shape {
            shape = inner;
        }
        shape
    }

    /// The deterministic name a type registers under.
    ///
    /// Named records use their declared name verbatim; anonymous composites
    /// fall back to the printable signature with container decoration
    /// stripped. Sequences append `[]` to the element name, maps render as
    /// `Object[<value>]`, dynamic types as `anything`.
    pub fn canonical_name(&self) -> String {
        match self {
            TypeShape::Scalar(kind) => kind.canonical_name().to_string(),
            TypeShape::Record { name, .. } if !name.is_empty() => name.clone(),
            TypeShape::Record { .. } => strip_decoration(&self.signature()),
            TypeShape::Sequence { element, .. } => {
                format!("{}[]", element.unwrap_refs().canonical_name())
            }
            TypeShape::Map { value } => {
                format!("Object[{}]", value.unwrap_refs().canonical_name())
            }
            TypeShape::Dynamic => "anything".to_string(),
            TypeShape::Reference(inner) => inner.canonical_name(),
            TypeShape::Unsupported { kind } => kind.clone(),
        }
    }

    /// Printable signature, used for anonymous-name derivation and
    /// diagnostics.
    pub fn signature(&self) -> String {
        match self {
            TypeShape::Scalar(kind) => kind.canonical_name().to_string(),
            TypeShape::Record { name, fields } if name.is_empty() => {
                let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
                format!("{{{}}}", names.join(" "))
            }
            TypeShape::Record { name, .. } => name.clone(),
            TypeShape::Sequence {
                element,
                fixed_len: Some(len),
            } => format!("[{}]{}", len, element.signature()),
            TypeShape::Sequence {
                element,
                fixed_len: None,
            } => format!("[]{}", element.signature()),
            TypeShape::Map { value } => format!("Object[{}]", value.signature()),
            TypeShape::Dynamic => "anything".to_string(),
            TypeShape::Reference(inner) => format!("*{}", inner.signature()),
            TypeShape::Unsupported { kind } => kind.clone(),
        }
    }
}

/// Drop container decoration from a printable signature: everything up to
/// and including the last `]` or `*`.
fn strip_decoration(signature: &str) -> String {
    match signature.rfind(|c| c == ']' || c == '*') {
        Some(idx) => signature[idx + 1..].to_string(),
        None => signature.to_string(),
    }
}
