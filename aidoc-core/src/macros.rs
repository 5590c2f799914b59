//! Utility macros for reducing boilerplate

/// Declare a closed, case-sensitive string enumeration.
///
/// Generates the enum with serde renames, `as_db_str`/`from_db_str`,
/// an `ALL` slice, an `ALLOWED` slice of storage strings, `Display` and
/// `FromStr`.
///
/// # Example
/// ```ignore
/// db_enum! {
///     /// Level of risk.
///     pub enum RiskLevel("riskLevel") {
///         Low => "Low",
///         High => "High",
///     }
/// }
/// ```
#[macro_export]
macro_rules! db_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident($field:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $db:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $db)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Storage strings accepted for this enumeration.
            pub const ALLOWED: &'static [&'static str] = &[$($db),+];

            /// Convert to database string representation.
            pub fn as_db_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $db),+
                }
            }

            /// Parse from database string representation (exact match).
            pub fn from_db_str(s: &str) -> Result<Self, $crate::EnumParseError> {
                match s {
                    $($db => Ok($name::$variant),)+
                    _ => Err($crate::EnumParseError {
                        field: $field,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_db_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::EnumParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_db_str(s)
            }
        }
    };
}
