use serde_json::Value;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Gives access to the JSON payload an entity was built from.
pub trait RawBacked {
    fn raw(&self) -> &Value;
}

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use rust_decimal;
pub use serde_json;
