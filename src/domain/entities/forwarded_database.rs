//! Forwarded database entity.

/// A logical database whose records are forwarded by key.
///
/// Built once from configuration at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardedDatabase {
    /// Routing name used in `/r/{name}/{key}`.
    pub name: String,
    /// Opaque identifier of the upstream Notion database.
    pub database_id: String,
    /// Name of the record property that holds the forwarding key.
    pub forward_field: String,
}

impl ForwardedDatabase {
    pub fn new(
        name: impl Into<String>,
        database_id: impl Into<String>,
        forward_field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            database_id: database_id.into(),
            forward_field: forward_field.into(),
        }
    }
}
