//! Resource name length constraint.

use crate::error::PolicyGenError;

/// Upper bound on `namespace.name` for generated governance resources.
pub const MAX_NAME_LENGTH: usize = 63;

/// Check that `namespace + "." + name` fits within [`MAX_NAME_LENGTH`].
pub fn check_name_length(namespace: &str, name: &str) -> Result<(), PolicyGenError> {
    if namespace.len() + 1 + name.len() > MAX_NAME_LENGTH {
        return Err(PolicyGenError::NameLength {
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_at_limit() {
        // "sites-sub." is 10 characters
        let name = "a".repeat(53);
        assert_eq!(format!("sites-sub.{}", name).len(), 63);
        assert!(check_name_length("sites-sub", &name).is_ok());
    }

    #[test]
    fn test_one_over_limit() {
        let name = "a".repeat(54);
        let err = check_name_length("sites-sub", &name).unwrap_err();
        match err {
            PolicyGenError::NameLength { namespace, name: n } => {
                assert_eq!(namespace, "sites-sub");
                assert_eq!(n, name);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_short_names() {
        assert!(check_name_length("common-sub", "common-placementrule").is_ok());
        assert!(check_name_length("", "").is_ok());
    }
}
