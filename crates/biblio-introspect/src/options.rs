use biblio_core::DEFAULT_NAMESPACE;

/// Options that control how introspection behaves.
#[derive(Debug, Clone)]
pub struct IntrospectOptions {
    /// Namespace (Postgres schema) holding the tables.
    pub namespace: String,
    /// Include views when listing tables.
    pub include_views: bool,
}

impl Default for IntrospectOptions {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            include_views: false,
        }
    }
}
