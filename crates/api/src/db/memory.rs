//! In-memory customer store.
//!
//! Used when `API_STORAGE=memory` and throughout the test suites. All state
//! sits behind one mutex, so the username check and the write it guards are a
//! single critical section. The lock is never held across an `.await`.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use customer_hub_core::{Customer, CustomerId, Page, PageRequest, Sort, SortDirection, SortField};

use super::{CustomerRecord, CustomerStore, RepositoryError};

#[derive(Debug, Clone)]
struct StoredCustomer {
    customer: Customer,
    password_hash: String,
}

#[derive(Debug, Default)]
struct Inner {
    last_id: i32,
    rows: BTreeMap<CustomerId, StoredCustomer>,
}

impl Inner {
    fn username_taken(&self, username: &str, except: Option<CustomerId>) -> bool {
        self.rows
            .values()
            .any(|row| row.customer.username == username && Some(row.customer.id) != except)
    }
}

/// Customer store holding everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryCustomerStore {
    inner: Mutex<Inner>,
}

impl MemoryCustomerStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The stored password hash of a customer, if it exists.
    #[must_use]
    pub fn password_hash(&self, id: CustomerId) -> Option<String> {
        self.lock().rows.get(&id).map(|row| row.password_hash.clone())
    }

    /// Number of stored customers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn compare_field(a: &Customer, b: &Customer, field: SortField) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::FirstName => a.first_name.cmp(&b.first_name),
        SortField::LastName => a.last_name.cmp(&b.last_name),
        SortField::Dob => a.dob.cmp(&b.dob),
        SortField::Username => a.username.cmp(&b.username),
    }
}

fn compare(a: &Customer, b: &Customer, sort: &[Sort]) -> Ordering {
    sort.iter()
        .map(|s| {
            let ord = compare_field(a, b, s.field);
            match s.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        })
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| a.id.cmp(&b.id))
}

#[async_trait]
impl CustomerStore for MemoryCustomerStore {
    async fn insert(&self, record: &CustomerRecord) -> Result<Customer, RepositoryError> {
        let mut inner = self.lock();
        if inner.username_taken(&record.username, None) {
            return Err(RepositoryError::Conflict(
                "username already exists".to_owned(),
            ));
        }

        inner.last_id += 1;
        let now = Utc::now();
        let customer = Customer {
            id: CustomerId::new(inner.last_id),
            created_at: now,
            updated_at: now,
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            dob: record.dob,
            username: record.username.clone(),
        };
        inner.rows.insert(
            customer.id,
            StoredCustomer {
                customer: customer.clone(),
                password_hash: record.password_hash.clone(),
            },
        );

        Ok(customer)
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        Ok(self.lock().rows.get(&id).map(|row| row.customer.clone()))
    }

    async fn list(
        &self,
        sort: &[Sort],
        page: PageRequest,
    ) -> Result<Page<Customer>, RepositoryError> {
        let inner = self.lock();
        let mut all: Vec<&Customer> = inner.rows.values().map(|row| &row.customer).collect();
        all.sort_by(|a, b| compare(a, b, sort));

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let per_page = usize::try_from(page.per_page).unwrap_or(usize::MAX);
        let items = all
            .iter()
            .skip(offset)
            .take(per_page)
            .map(|c| (*c).clone())
            .collect();

        Ok(Page {
            items,
            total: all.len() as u64,
            request: page,
        })
    }

    async fn update(
        &self,
        id: CustomerId,
        record: &CustomerRecord,
    ) -> Result<Option<Customer>, RepositoryError> {
        let mut inner = self.lock();
        if !inner.rows.contains_key(&id) {
            return Ok(None);
        }
        if inner.username_taken(&record.username, Some(id)) {
            return Err(RepositoryError::Conflict(
                "username already exists".to_owned(),
            ));
        }

        let Some(row) = inner.rows.get_mut(&id) else {
            return Ok(None);
        };
        row.customer.first_name.clone_from(&record.first_name);
        row.customer.last_name.clone_from(&record.last_name);
        row.customer.dob = record.dob;
        row.customer.username.clone_from(&record.username);
        row.customer.updated_at = Utc::now();
        row.password_hash.clone_from(&record.password_hash);

        Ok(Some(row.customer.clone()))
    }

    async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        Ok(self.lock().rows.remove(&id).is_some())
    }

    async fn username_taken(
        &self,
        username: &str,
        except: Option<CustomerId>,
    ) -> Result<bool, RepositoryError> {
        Ok(self.lock().username_taken(username, except))
    }
}
