//! Customer service.
//!
//! Runs the write pipeline `validate → hash → persist` on top of a
//! [`CustomerStore`]. Nothing is written unless validation passes, and a
//! storage-level username conflict is reported exactly like a failed
//! uniqueness check.

use serde_json::{Map, Value};
use thiserror::Error;

use customer_hub_core::validation::{self, Rule};
use customer_hub_core::{Customer, CustomerDraft, CustomerId, Page, PageRequest, Sort, ValidationErrors};

use super::password::{PasswordError, hash_password};
use crate::db::{CustomerRecord, CustomerStore, RepositoryError};

/// Errors that can occur during customer operations.
#[derive(Debug, Error)]
pub enum CustomerError {
    /// One or more fields failed validation.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// No customer has this ID.
    #[error("customer {0} not found")]
    NotFound(CustomerId),

    /// Password hashing failed.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for CustomerError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(_) => Self::Validation(username_taken()),
            other => Self::Repository(other),
        }
    }
}

fn username_taken() -> ValidationErrors {
    ValidationErrors::single("username", Rule::Unique.message("username"))
}

/// Customer service.
pub struct CustomerService<'a> {
    store: &'a dyn CustomerStore,
}

impl<'a> CustomerService<'a> {
    /// Create a new customer service.
    #[must_use]
    pub const fn new(store: &'a dyn CustomerStore) -> Self {
        Self { store }
    }

    /// One page of customers.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::Repository` if the store fails.
    pub async fn list(
        &self,
        sort: &[Sort],
        page: PageRequest,
    ) -> Result<Page<Customer>, CustomerError> {
        Ok(self.store.list(sort, page).await?)
    }

    /// Fetch one customer.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if the ID is unknown.
    pub async fn get(&self, id: CustomerId) -> Result<Customer, CustomerError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(CustomerError::NotFound(id))
    }

    /// Validate and create a customer.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::Validation` with every field problem,
    /// including a username taken concurrently by another request.
    pub async fn create(&self, fields: &Map<String, Value>) -> Result<Customer, CustomerError> {
        let draft = self.validate(fields, None).await?;
        let record = to_record(draft)?;

        let customer = self.store.insert(&record).await?;
        tracing::info!(customer_id = %customer.id, "Customer created");
        Ok(customer)
    }

    /// Validate and fully replace a customer.
    ///
    /// The password is required and re-hashed on every update.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` before validating if the ID is
    /// unknown, otherwise as [`Self::create`].
    pub async fn update(
        &self,
        id: CustomerId,
        fields: &Map<String, Value>,
    ) -> Result<Customer, CustomerError> {
        self.get(id).await?;

        let draft = self.validate(fields, Some(id)).await?;
        let record = to_record(draft)?;

        let customer = self
            .store
            .update(id, &record)
            .await?
            .ok_or(CustomerError::NotFound(id))?;
        tracing::info!(customer_id = %customer.id, "Customer updated");
        Ok(customer)
    }

    /// Delete a customer.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if the ID is unknown, including when
    /// it was already deleted.
    pub async fn delete(&self, id: CustomerId) -> Result<(), CustomerError> {
        if !self.store.delete(id).await? {
            return Err(CustomerError::NotFound(id));
        }
        tracing::info!(customer_id = %id, "Customer deleted");
        Ok(())
    }

    /// Run the rule set, resolving the uniqueness question against the store
    /// first so validation itself stays synchronous.
    async fn validate(
        &self,
        fields: &Map<String, Value>,
        except: Option<CustomerId>,
    ) -> Result<CustomerDraft, CustomerError> {
        let candidate = validation::normalize(fields)
            .get("username")
            .and_then(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty());

        let taken = match &candidate {
            Some(username) => self.store.username_taken(username, except).await?,
            None => false,
        };

        validation::validate_customer(fields, &|username| {
            taken && candidate.as_deref() == Some(username)
        })
        .map_err(CustomerError::Validation)
    }
}

/// Hash the draft's password, producing the record a store may persist.
fn to_record(draft: CustomerDraft) -> Result<CustomerRecord, PasswordError> {
    let password_hash = hash_password(&draft.password)?;
    Ok(CustomerRecord {
        first_name: draft.first_name,
        last_name: draft.last_name,
        dob: draft.dob,
        username: draft.username,
        password_hash,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::db::MemoryCustomerStore;
    use crate::services::verify_password;

    /// A store whose uniqueness lookup always misses, as when another request
    /// claims the username between the check and the write.
    #[derive(Default)]
    struct RacingStore {
        inner: MemoryCustomerStore,
    }

    #[async_trait]
    impl CustomerStore for RacingStore {
        async fn insert(&self, record: &CustomerRecord) -> Result<Customer, RepositoryError> {
            self.inner.insert(record).await
        }

        async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
            self.inner.find_by_id(id).await
        }

        async fn list(
            &self,
            sort: &[Sort],
            page: PageRequest,
        ) -> Result<Page<Customer>, RepositoryError> {
            self.inner.list(sort, page).await
        }

        async fn update(
            &self,
            id: CustomerId,
            record: &CustomerRecord,
        ) -> Result<Option<Customer>, RepositoryError> {
            self.inner.update(id, record).await
        }

        async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError> {
            self.inner.delete(id).await
        }

        async fn username_taken(
            &self,
            _username: &str,
            _except: Option<CustomerId>,
        ) -> Result<bool, RepositoryError> {
            Ok(false)
        }
    }

    fn assert_username_taken(err: CustomerError) {
        let CustomerError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("username").unwrap(),
            ["The username has already been taken."]
        );
    }

    fn fields(username: &str, password: &str) -> Map<String, Value> {
        json!({
            "first_name": "John",
            "last_name": "Lastname",
            "dob": "1990-11-11",
            "username": username,
            "password": password,
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_hashes_password() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store);

        let customer = service.create(&fields("userjohn", "PasS1234")).await.unwrap();

        let hash = store.password_hash(customer.id).unwrap();
        assert_ne!(hash, "PasS1234");
        assert!(verify_password("PasS1234", &hash));
    }

    #[tokio::test]
    async fn test_create_duplicate_username_is_validation_error() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store);
        let first = service.create(&fields("userjohn", "PasS1234")).await.unwrap();

        let err = service
            .create(&fields("userjohn", "Other1234"))
            .await
            .unwrap_err();
        let CustomerError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(
            errors.get("username").unwrap(),
            ["The username has already been taken."]
        );
        assert_eq!(store.len(), 1);
        assert_eq!(service.get(first.id).await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_invalid_create_writes_nothing() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store);

        let err = service.create(&fields("userjohn", "1")).await.unwrap_err();
        assert!(matches!(err, CustomerError::Validation(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_update_rehashes_even_when_unchanged() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store);
        let customer = service.create(&fields("userjohn", "PasS1234")).await.unwrap();
        let before = store.password_hash(customer.id).unwrap();

        service
            .update(customer.id, &fields("userjohn", "PasS1234"))
            .await
            .unwrap();

        let after = store.password_hash(customer.id).unwrap();
        assert_ne!(before, after);
        assert!(verify_password("PasS1234", &after));
    }

    #[tokio::test]
    async fn test_update_checks_existence_before_validation() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store);

        let err = service
            .update(CustomerId::new(1000), &Map::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CustomerError::NotFound(id) if id.as_i32() == 1000));
    }

    #[tokio::test]
    async fn test_update_rejects_other_customers_username() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store);
        service.create(&fields("taken", "PasS1234")).await.unwrap();
        let me = service.create(&fields("mine", "PasS1234")).await.unwrap();

        let err = service
            .update(me.id, &fields("taken", "PasS1234"))
            .await
            .unwrap_err();
        assert!(matches!(err, CustomerError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store);
        let customer = service.create(&fields("userjohn", "PasS1234")).await.unwrap();

        service.delete(customer.id).await.unwrap();
        let err = service.delete(customer.id).await.unwrap_err();
        assert!(matches!(err, CustomerError::NotFound(_)));
        assert!(matches!(
            service.get(customer.id).await,
            Err(CustomerError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_conflict_at_write_is_validation_error() {
        let store = RacingStore::default();
        let service = CustomerService::new(&store);
        service.create(&fields("userjohn", "PasS1234")).await.unwrap();

        let err = service
            .create(&fields("userjohn", "Other1234"))
            .await
            .unwrap_err();
        assert_username_taken(err);
        assert_eq!(store.inner.len(), 1);
    }

    #[tokio::test]
    async fn test_update_conflict_at_write_is_validation_error() {
        let store = RacingStore::default();
        let service = CustomerService::new(&store);
        service.create(&fields("taken", "PasS1234")).await.unwrap();
        let me = service.create(&fields("mine", "PasS1234")).await.unwrap();

        let err = service
            .update(me.id, &fields("taken", "PasS1234"))
            .await
            .unwrap_err();
        assert_username_taken(err);
        assert_eq!(service.get(me.id).await.unwrap().username, "mine");
    }

    #[test]
    fn test_other_repository_errors_pass_through() {
        let err = CustomerError::from(RepositoryError::DataCorruption("bad row".to_owned()));
        assert!(matches!(err, CustomerError::Repository(_)));
    }
}
