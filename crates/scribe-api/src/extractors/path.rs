//! Path parameter helpers.

use std::str::FromStr;

use bson::oid::ObjectId;

use scribe_core::error::AppError;

/// Parse a hex path segment into an `ObjectId`.
pub fn parse_object_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::from_str(raw).map_err(|_| AppError::validation(format!("Invalid ID: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_hex() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex()).unwrap(), id);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_object_id("not-an-id").is_err());
    }
}
