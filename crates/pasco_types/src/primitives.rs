//! The intrinsic primitive types

use crate::ty::{SymbolType, TypeRef};
use paste::paste;
use std::sync::{Arc, LazyLock};

macro_rules! primitives {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// A primitive type
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
        pub enum Primitive {
            $($variant),+
        }

        impl Primitive {
            /// The name this primitive is declared under in the global scope
            pub const fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }

            /// Gets the shared type for this primitive
            pub fn type_ref(&self) -> TypeRef {
                match self {
                    $(Self::$variant => paste! { [<$variant:upper>].clone() }),+
                }
            }
        }

        paste! {
            $(
            #[doc = concat!("The `", $name, "` type")]
            pub static [<$variant:upper>]: LazyLock<TypeRef> =
                LazyLock::new(|| Arc::new(SymbolType::Primitive(Primitive::$variant)));
            )+
        }

        /// All primitive types, in the order they are declared in the global scope
        pub fn all() -> Vec<TypeRef> {
            vec![$(Primitive::$variant.type_ref()),+]
        }
    };
}

primitives! {
    Integer => "integer",
    Real => "real",
    Boolean => "boolean",
    Char => "char",
    String => "string",
}
