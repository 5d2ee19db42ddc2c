//! Schema store contract
//!
//! Schema persistence belongs to an external collaborator; the engine
//! only needs read access by identifier. The in-memory implementation
//! backs tests and local runs.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use lens_core::Schema;

/// Read contract consumed by the extraction endpoints. An absent
/// schema is terminal; the engine never retries a lookup.
#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// Look up a schema by its opaque identifier.
    async fn find_by_id(&self, schema_id: &str) -> Option<Schema>;
}

/// In-memory schema store.
#[derive(Default)]
pub struct MemorySchemaStore {
    schemas: RwLock<HashMap<String, Schema>>,
}

impl MemorySchemaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a schema, keyed by its identifier.
    pub async fn insert(&self, schema: Schema) {
        let mut schemas = self.schemas.write().await;
        schemas.insert(schema.schema_id.clone(), schema);
    }
}

#[async_trait]
impl SchemaStore for MemorySchemaStore {
    async fn find_by_id(&self, schema_id: &str) -> Option<Schema> {
        let schemas = self.schemas.read().await;
        schemas.get(schema_id).cloned()
    }
}
