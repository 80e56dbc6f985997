//! Record trait: the entity-agnostic shape the listing engine operates over

use crate::core::field::FieldValue;

/// Base trait for every record kept in a collection.
///
/// A record exposes:
/// - id: opaque string key (UUID for new records, legacy numeric ids survive)
/// - resource name: the storage key its collection is persisted under
/// - field access by name, returning `None` for missing or unset fields
///
/// Every record of one collection exposes the same field set; nothing is
/// enforced across collections.
pub trait Record: Clone + Send + Sync + 'static {
    /// The collection name (e.g., "jobs", "applications")
    fn resource_name() -> &'static str;

    /// Names of every field readable through [`Record::field_value`]
    fn field_names() -> &'static [&'static str];

    /// Get the unique identifier for this record
    fn id(&self) -> &str;

    /// Get the value of a specific field by name
    fn field_value(&self, field: &str) -> Option<FieldValue>;
}

/// Generate a [`Record`] implementation from a field table.
///
/// Each entry maps a public field name to a struct field whose type
/// implements [`IntoFieldValue`](crate::core::field::IntoFieldValue).
/// The struct must have an `id: String` field.
///
/// # Example
///
/// ```rust,ignore
/// impl_record!(Job, "jobs", {
///     "title" => title,
///     "location" => location,
///     "posted_at" => posted_at,
/// });
/// ```
#[macro_export]
macro_rules! impl_record {
    ($type:ident, $resource:literal, { $($name:literal => $field:ident),* $(,)? }) => {
        impl $crate::core::record::Record for $type {
            fn resource_name() -> &'static str {
                $resource
            }

            fn field_names() -> &'static [&'static str] {
                &["id", $($name),*]
            }

            fn id(&self) -> &str {
                &self.id
            }

            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                match field {
                    "id" => Some($crate::core::field::FieldValue::String(self.id.clone())),
                    $($name => $crate::core::field::IntoFieldValue::to_field_value(&self.$field),)*
                    _ => None,
                }
            }
        }
    };
}
