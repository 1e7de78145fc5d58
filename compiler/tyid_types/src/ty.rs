//! The type tree handed to hashers.

use std::sync::Arc;

use crate::assert_identifier;
use crate::basic::BasicKind;
use crate::named::{Named, TypeParam};

/// Direction of a channel type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ChanDir {
    SendRecv,
    SendOnly,
    RecvOnly,
}

/// A struct field. Embedded fields carry no name of their own.
#[derive(Clone, Debug)]
pub struct Field {
    name: Option<Box<str>>,
    ty: Type,
}

impl Field {
    /// # Panics
    /// Panics if `name` is not an [identifier](crate::is_identifier).
    #[track_caller]
    pub fn new(name: impl Into<Box<str>>, ty: Type) -> Self {
        let name = name.into();
        assert_identifier("field", &name);
        Self {
            name: Some(name),
            ty,
        }
    }

    pub fn embedded(ty: Type) -> Self {
        Self { name: None, ty }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn is_embedded(&self) -> bool {
        self.name.is_none()
    }
}

/// A type.
///
/// Composite types own their children. Named types are shared by reference
/// and carry reference identity.
#[derive(Clone, Debug)]
pub enum Type {
    Basic(BasicKind),
    Pointer(Box<Type>),
    Slice(Box<Type>),
    Array {
        len: u64,
        elem: Box<Type>,
    },
    Map {
        key: Box<Type>,
        value: Box<Type>,
    },
    Chan {
        dir: ChanDir,
        elem: Box<Type>,
    },
    Struct(Box<[Field]>),
    Tuple(Box<[Type]>),
    /// Function signature. When `variadic` is set the last parameter is the
    /// variadic one.
    Signature {
        params: Box<[Type]>,
        results: Box<[Type]>,
        variadic: bool,
    },
    TypeParam(TypeParam),
    Named(Arc<Named>),
}

// Convenience constructors.
impl Type {
    pub fn pointer(elem: Type) -> Self {
        Type::Pointer(Box::new(elem))
    }

    pub fn slice(elem: Type) -> Self {
        Type::Slice(Box::new(elem))
    }

    pub fn array(len: u64, elem: Type) -> Self {
        Type::Array {
            len,
            elem: Box::new(elem),
        }
    }

    pub fn map(key: Type, value: Type) -> Self {
        Type::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn chan(dir: ChanDir, elem: Type) -> Self {
        Type::Chan {
            dir,
            elem: Box::new(elem),
        }
    }

    pub fn structure(fields: Vec<Field>) -> Self {
        Type::Struct(fields.into_boxed_slice())
    }

    pub fn tuple(types: Vec<Type>) -> Self {
        Type::Tuple(types.into_boxed_slice())
    }

    /// # Panics
    /// Panics if `variadic` is set without any parameter.
    #[track_caller]
    pub fn signature(params: Vec<Type>, results: Vec<Type>, variadic: bool) -> Self {
        assert!(
            !variadic || !params.is_empty(),
            "variadic signature needs a parameter"
        );
        Type::Signature {
            params: params.into_boxed_slice(),
            results: results.into_boxed_slice(),
            variadic,
        }
    }

    pub fn named(named: &Arc<Named>) -> Self {
        Type::Named(Arc::clone(named))
    }

    pub fn as_named(&self) -> Option<&Arc<Named>> {
        match self {
            Type::Named(named) => Some(named),
            _ => None,
        }
    }
}

impl From<BasicKind> for Type {
    fn from(kind: BasicKind) -> Self {
        Type::Basic(kind)
    }
}

impl From<TypeParam> for Type {
    fn from(param: TypeParam) -> Self {
        Type::TypeParam(param)
    }
}
