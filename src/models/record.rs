use serde_json::Value;

/// A row as the datastore reports it after insertion.
#[derive(Debug, Clone)]
pub struct PersistedRecord {
    pub id: u64,
    pub created_at: Option<Value>,
    pub row: Value,
}

impl PersistedRecord {
    /// Interpret a returned row. Rows without a positive numeric `id`
    /// cannot be confirmed and yield `None`.
    pub fn from_row(row: Value) -> Option<Self> {
        let id = match row.get("id")? {
            Value::Number(n) => n.as_u64()?,
            Value::String(s) => s.trim().parse::<u64>().ok()?,
            _ => return None,
        };
        if id == 0 {
            return None;
        }

        let created_at = row.get("created_at").filter(|v| !v.is_null()).cloned();

        Some(PersistedRecord { id, created_at, row })
    }

    pub fn display_id(&self, prefix: &str) -> String {
        display_id(prefix, self.id)
    }
}

/// `display_id("BK", 42)` is `BK-000042`.
pub fn display_id(prefix: &str, id: u64) -> String {
    format!("{prefix}-{id:06}")
}
