//! Newtype IDs for type-safe entity references.
//!
//! Fixture records reference each other by string ids (`"prod-001"`,
//! `"shop-oaxaca-01"`). Use the `define_id!` macro to create wrappers that
//! prevent accidentally mixing IDs from different entity types.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `generate()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use papalote_core::define_id;
/// define_id!(BasketId, "bsk");
/// define_id!(TicketId, "tkt");
///
/// let basket = BasketId::new("bsk-1");
/// let ticket = TicketId::new("bsk-1");
///
/// // These are different types, so this won't compile:
/// // let _: BasketId = ticket;
/// assert_eq!(basket.as_str(), ticket.as_str());
/// assert!(BasketId::generate().as_str().starts_with("bsk-"));
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Prefix used for freshly generated ids.
            pub const PREFIX: &'static str = $prefix;

            /// Wrap an existing id.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a new random id with this type's prefix.
            #[must_use]
            pub fn generate() -> Self {
                let raw = ::uuid::Uuid::new_v4().simple().to_string();
                Self(format!("{}-{}", $prefix, &raw[..12]))
            }

            /// Get the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the id and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId, "prod");
define_id!(ShopId, "shop");
define_id!(OrderId, "ord");
define_id!(BuyerId, "buyer");
define_id!(ReviewId, "rev");
define_id!(MessageId, "msg");
define_id!(VerificationId, "ver");
