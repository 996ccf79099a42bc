use uuid::Uuid;

/// Generates a new random appointment identifier.
pub fn generate_id() -> Uuid {
    Uuid::new_v4()
}
