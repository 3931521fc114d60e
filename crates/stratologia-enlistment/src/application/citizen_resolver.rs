//! Find-or-create of citizens keyed on national ID.

use stratologia_core::error::DomainError;
use stratologia_core::model::{Citizen, NewCitizen};
use stratologia_core::repository::CitizenRepository;
use tracing::{debug, info};

/// Minimum accepted length of a national ID, in characters.
pub const NATIONAL_ID_MIN_LEN: usize = 3;

/// Maximum accepted length of a national ID, in characters (column width).
pub const NATIONAL_ID_MAX_LEN: usize = 50;

/// Checks the length bounds of a national ID.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the ID is shorter than
/// [`NATIONAL_ID_MIN_LEN`] or longer than [`NATIONAL_ID_MAX_LEN`].
pub fn validate_national_id(national_id: &str) -> Result<(), DomainError> {
    let len = national_id.chars().count();
    if len < NATIONAL_ID_MIN_LEN {
        return Err(DomainError::Validation(format!(
            "citizen_national_id must be at least {NATIONAL_ID_MIN_LEN} characters"
        )));
    }
    if len > NATIONAL_ID_MAX_LEN {
        return Err(DomainError::Validation(format!(
            "citizen_national_id must be at most {NATIONAL_ID_MAX_LEN} characters"
        )));
    }
    Ok(())
}

/// Returns the citizen with `national_id`, creating one with placeholder
/// names if none exists. An existing citizen is never modified.
///
/// The length bounds are expected to have been checked by the caller.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store fails.
pub async fn resolve_or_create(
    national_id: &str,
    repo: &dyn CitizenRepository,
) -> Result<Citizen, DomainError> {
    if let Some(citizen) = repo.find_by_national_id(national_id).await? {
        debug!(citizen_id = citizen.id, "resolved existing citizen");
        return Ok(citizen);
    }

    let citizen = repo
        .insert_citizen(NewCitizen::placeholder(national_id))
        .await?;
    info!(citizen_id = citizen.id, "created citizen for unseen national id");
    Ok(citizen)
}

#[cfg(test)]
mod tests {
    use stratologia_core::error::DomainError;
    use stratologia_test_support::{FailingStore, InMemoryStore};

    use super::*;

    #[tokio::test]
    async fn test_resolve_creates_placeholder_citizen_for_unseen_id() {
        // Arrange
        let store = InMemoryStore::new();

        // Act
        let citizen = resolve_or_create("AB123", &store).await.unwrap();

        // Assert
        assert_eq!(citizen.id, 1);
        assert_eq!(citizen.first_name, "Unknown");
        assert_eq!(citizen.last_name, "Citizen");
        assert_eq!(citizen.national_id, "AB123");
        assert_eq!(store.citizen_count(), 1);
    }

    #[tokio::test]
    async fn test_resolve_returns_existing_citizen_unchanged() {
        // Arrange
        let store = InMemoryStore::new();
        let created = resolve_or_create("AB123", &store).await.unwrap();

        // Act
        let resolved = resolve_or_create("AB123", &store).await.unwrap();

        // Assert
        assert_eq!(resolved, created);
        assert_eq!(store.citizen_count(), 1);
    }

    #[tokio::test]
    async fn test_resolve_matches_national_id_exactly() {
        // Arrange
        let store = InMemoryStore::new();
        resolve_or_create("AB123", &store).await.unwrap();

        // Act
        let other = resolve_or_create("ab123", &store).await.unwrap();

        // Assert
        assert_eq!(other.id, 2);
        assert_eq!(store.citizen_count(), 2);
    }

    #[tokio::test]
    async fn test_resolve_propagates_store_failure() {
        let result = resolve_or_create("AB123", &FailingStore).await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }

    #[test]
    fn test_validate_national_id_bounds() {
        assert!(validate_national_id("AB").is_err());
        assert!(validate_national_id("ABC").is_ok());
        assert!(validate_national_id(&"9".repeat(50)).is_ok());
        assert!(validate_national_id(&"9".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_national_id_counts_characters_not_bytes() {
        // Two characters, four bytes.
        assert!(validate_national_id("ΑΒ").is_err());
        assert!(validate_national_id("ΑΒΓ").is_ok());
    }
}
