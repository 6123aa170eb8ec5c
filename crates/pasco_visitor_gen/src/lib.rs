#![doc = include_str!("../README.md")]

#[doc(hidden)]
pub use paste;

/// Creates a mut visitor.
///
/// Every `visit (v, node: &mut Type) { ... }` entry generates a free function
/// `walk_<type>_mut` holding the default traversal, and a trait method
/// `visit_<type>_mut` that delegates to it. Implementors override the methods
/// they care about and call the `walk_*` function to keep descending.
#[macro_export]
macro_rules! visit_mut {
    (
        $(#[$meta:meta])*
        $trait_vis:vis trait $id:ident {
            $(
                $(#[$fn_meta:meta])*
                $vis:vis visit ($visitor_id:ident, $visited_id:ident: &mut $visited:ident) $block:block
            )+
        }
    ) => {
        $(
        $crate::paste::paste! {
            $(#[$fn_meta])*
            $vis fn [<walk_ $visited:snake _mut>]<V: $id + ?Sized>(
                $visitor_id: &mut V,
                $visited_id: &mut $visited,
            ) -> ::std::result::Result<(), V::Err> $block
        }
        )+

        $(#[$meta])*
        $trait_vis trait $id {
            type Err;

            $(
            $crate::paste::paste! {
                fn [<visit_ $visited:snake _mut>](
                    &mut self,
                    $visited_id: &mut $visited,
                ) -> ::std::result::Result<(), Self::Err> {
                    [<walk_ $visited:snake _mut>](self, $visited_id)
                }
            }
            )+
        }
    };
}

/// Creates a visitor over shared references.
///
/// Same shape as [`visit_mut!`], generating `walk_<type>` functions and
/// `visit_<type>` trait methods.
#[macro_export]
macro_rules! visit {
    (
        $(#[$meta:meta])*
        $trait_vis:vis trait $id:ident {
            $(
                $(#[$fn_meta:meta])*
                $vis:vis visit ($visitor_id:ident, $visited_id:ident: &$visited:ident) $block:block
            )+
        }
    ) => {
        $(
        $crate::paste::paste! {
            $(#[$fn_meta])*
            $vis fn [<walk_ $visited:snake>]<V: $id + ?Sized>(
                $visitor_id: &mut V,
                $visited_id: &$visited,
            ) -> ::std::result::Result<(), V::Err> $block
        }
        )+

        $(#[$meta])*
        $trait_vis trait $id {
            type Err;

            $(
            $crate::paste::paste! {
                fn [<visit_ $visited:snake>](
                    &mut self,
                    $visited_id: &$visited,
                ) -> ::std::result::Result<(), Self::Err> {
                    [<walk_ $visited:snake>](self, $visited_id)
                }
            }
            )+
        }
    };
}
