//! Macros for reducing boilerplate when defining records
//!
//! Every record carries the same bookkeeping columns (id, timestamps and
//! the soft-delete stamp). These macros generate the repetitive trait
//! implementations for them.

/// Implement [`Entity`](crate::core::Entity) for a struct that has the
/// bookkeeping fields
///
/// # Example
///
/// ```rust,ignore
/// impl_entity!(Product, "product", "products");
/// ```
#[macro_export]
macro_rules! impl_entity {
    ($type:ident, $singular:expr, $plural:expr) => {
        impl $crate::core::entity::Entity for $type {
            fn resource_name() -> &'static str {
                $plural
            }

            fn resource_name_singular() -> &'static str {
                $singular
            }

            fn id(&self) -> ::uuid::Uuid {
                self.id
            }

            fn created_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.created_at
            }

            fn updated_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.updated_at
            }

            fn deleted_at(&self) -> Option<::chrono::DateTime<::chrono::Utc>> {
                self.deleted_at
            }

            fn set_deleted_at(&mut self, deleted_at: Option<::chrono::DateTime<::chrono::Utc>>) {
                self.deleted_at = deleted_at;
            }

            fn touch(&mut self) {
                self.updated_at = ::chrono::Utc::now();
            }
        }
    };
}

/// Complete macro to create a record that only has a name
///
/// Lookup tables such as categories and tags are nothing more than a
/// titled row; this generates the struct, `Entity`, `Data` and a `new`
/// constructor.
///
/// # Example
///
/// ```rust,ignore
/// impl_named_record!(Tag, "tag", "tags", ["name"]);
///
/// let tag = Tag::new("Outdoor");
/// ```
#[macro_export]
macro_rules! impl_named_record {
    (
        $type:ident,
        $singular:expr,
        $plural:expr,
        [ $( $unique_field:expr ),* $(,)? ]
    ) => {
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            /// Unique identifier for this record
            pub id: ::uuid::Uuid,

            /// Display name, used as the relationship title attribute
            pub name: String,

            /// When this record was created
            pub created_at: ::chrono::DateTime<::chrono::Utc>,

            /// When this record was last updated
            pub updated_at: ::chrono::DateTime<::chrono::Utc>,

            /// When this record was soft-deleted (if applicable)
            #[serde(default)]
            pub deleted_at: Option<::chrono::DateTime<::chrono::Utc>>,
        }

        $crate::impl_entity!($type, $singular, $plural);

        impl $crate::core::entity::Data for $type {
            fn name(&self) -> &str {
                &self.name
            }

            fn unique_fields() -> &'static [&'static str] {
                &[ $( $unique_field ),* ]
            }

            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                use $crate::core::field::FieldValue;
                match field {
                    "id" => Some(FieldValue::Uuid(self.id)),
                    "name" => Some(FieldValue::String(self.name.clone())),
                    "created_at" => Some(FieldValue::DateTime(self.created_at)),
                    "updated_at" => Some(FieldValue::DateTime(self.updated_at)),
                    _ => None,
                }
            }
        }

        impl $type {
            /// Create a new record with a fresh id
            pub fn new(name: impl Into<String>) -> Self {
                let now = ::chrono::Utc::now();
                Self {
                    id: ::uuid::Uuid::new_v4(),
                    name: name.into(),
                    created_at: now,
                    updated_at: now,
                    deleted_at: None,
                }
            }
        }
    };
}
