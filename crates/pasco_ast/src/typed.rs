//! typing information traits

use pasco_types::TypeRef;

/// The typing information attached to a node
#[derive(Debug, Default, Clone)]
pub struct TypeInfo {
    ty: Option<TypeRef>,
    lvalue: bool,
}

impl TypeInfo {
    /// Gets the type, if it was resolved
    pub fn ty(&self) -> Option<&TypeRef> {
        self.ty.as_ref()
    }

    /// Whether the node denotes an assignable location
    pub fn is_lvalue(&self) -> bool {
        self.lvalue
    }
}

/// Gets the type of the node within the tree
pub trait Typed {
    fn type_info(&self) -> &TypeInfo;

    /// Gets the type, `None` until semantic analysis has run
    fn get_type(&self) -> Option<&TypeRef> {
        self.type_info().ty()
    }

    fn is_lvalue(&self) -> bool {
        self.type_info().is_lvalue()
    }
}

/// Sets the type of a node
pub trait TypedMut: Typed {
    fn type_info_mut(&mut self) -> &mut TypeInfo;

    /// Set the type for this object
    fn set_type(&mut self, ty: TypeRef) {
        self.type_info_mut().ty = Some(ty);
    }

    /// Marks this object as an lvalue or not
    fn set_lvalue(&mut self, lvalue: bool) {
        self.type_info_mut().lvalue = lvalue;
    }
}

/// Implements [`Typed`] and [`TypedMut`] for structs with an `info: TypeInfo` field
macro_rules! typed_struct {
    ($($ty:ty),+ $(,)?) => {
        $(
        impl $crate::typed::Typed for $ty {
            fn type_info(&self) -> &$crate::typed::TypeInfo {
                &self.info
            }
        }

        impl $crate::typed::TypedMut for $ty {
            fn type_info_mut(&mut self) -> &mut $crate::typed::TypeInfo {
                &mut self.info
            }
        }
        )+
    };
}

/// Implements [`Typed`] and [`TypedMut`] for enums whose variants all wrap typed nodes
macro_rules! typed_enum {
    ($ty:ty { $($variant:ident),+ $(,)? }) => {
        impl $crate::typed::Typed for $ty {
            fn type_info(&self) -> &$crate::typed::TypeInfo {
                match self {
                    $(Self::$variant(inner) => $crate::typed::Typed::type_info(inner)),+
                }
            }
        }

        impl $crate::typed::TypedMut for $ty {
            fn type_info_mut(&mut self) -> &mut $crate::typed::TypeInfo {
                match self {
                    $(Self::$variant(inner) => $crate::typed::TypedMut::type_info_mut(inner)),+
                }
            }
        }
    };
}

pub(crate) use {typed_enum, typed_struct};
