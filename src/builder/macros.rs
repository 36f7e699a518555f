//! Macros for declaring action spaces.

/// Generate an action enum with an `Action` implementation.
///
/// Variant names become action names, and `all()` returns the full action
/// space in declaration order.
///
/// # Example
///
/// ```
/// use horizon_guard::action_enum;
/// use horizon_guard::core::Action;
///
/// action_enum! {
///     pub enum Move {
///         Left,
///         Right,
///         Stop,
///     }
/// }
///
/// assert_eq!(Move::Left.name(), "Left");
/// assert_eq!(Move::all(), vec![Move::Left, Move::Right, Move::Stop]);
/// ```
#[macro_export]
macro_rules! action_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every action, in declaration order.
            #[allow(dead_code)]
            $vis fn all() -> ::std::vec::Vec<Self> {
                ::std::vec![$(Self::$variant),*]
            }
        }

        impl $crate::core::Action for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
