//! Client-side state container.
//!
//! Caches the last fetched page and the last fetched customer, plus an
//! `is_loading` flag for UIs. Actions talk to the API through
//! [`CustomerApi`]; mutations change local state only.
//!
//! The state mutex is never held across an `.await`. Overlapping actions may
//! interleave, so `is_loading` is a display hint rather than a lock.

use std::sync::{Mutex, MutexGuard, PoisonError};

use customer_hub_core::{Customer, CustomerId, CustomerInput, PageLinks, PageMeta, Paginated};

use crate::api::{CustomerApi, ListParams};
use crate::error::ClientError;

/// The cached listing: the server's message plus the page it returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerListState {
    pub message: String,
    pub data: Vec<Customer>,
    pub links: Option<PageLinks>,
    pub meta: Option<PageMeta>,
}

impl CustomerListState {
    /// Build from a listing response.
    #[must_use]
    pub fn from_response(message: String, page: Paginated<Customer>) -> Self {
        Self {
            message,
            data: page.data,
            links: Some(page.links),
            meta: Some(page.meta),
        }
    }
}

/// Everything the store holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    pub customers_list: CustomerListState,
    pub customer: Option<Customer>,
    pub is_loading: bool,
}

/// State container backed by a [`CustomerApi`].
pub struct CustomerStore {
    api: CustomerApi,
    state: Mutex<StoreState>,
}

/// Sets `is_loading` on creation and clears it when dropped, so every exit
/// path of an action (including `?` and cancellation) resets the flag.
struct LoadingGuard<'a> {
    store: &'a CustomerStore,
}

impl<'a> LoadingGuard<'a> {
    fn new(store: &'a CustomerStore) -> Self {
        store.set_loading(true);
        Self { store }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.store.set_loading(false);
    }
}

impl CustomerStore {
    /// Create an empty store.
    #[must_use]
    pub fn new(api: CustomerApi) -> Self {
        Self {
            api,
            state: Mutex::new(StoreState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> StoreState {
        self.lock().clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lock().is_loading
    }

    #[must_use]
    pub fn customers_list(&self) -> CustomerListState {
        self.lock().customers_list.clone()
    }

    #[must_use]
    pub fn customer(&self) -> Option<Customer> {
        self.lock().customer.clone()
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    pub fn set_customers_list(&self, list: CustomerListState) {
        self.lock().customers_list = list;
    }

    pub fn set_customer(&self, customer: Option<Customer>) {
        self.lock().customer = customer;
    }

    pub fn set_loading(&self, loading: bool) {
        self.lock().is_loading = loading;
    }

    /// Drop a customer from the cached page. No-op if it is not there.
    pub fn remove_customer_from_list(&self, id: CustomerId) {
        self.lock().customers_list.data.retain(|c| c.id != id);
    }

    // -------------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------------

    /// Fetch a page and replace the cached listing.
    ///
    /// # Errors
    ///
    /// Returns the `ClientError`; the cached listing is left unchanged.
    pub async fn fetch_customer_list(&self, params: &ListParams) -> Result<(), ClientError> {
        let _loading = LoadingGuard::new(self);

        let response = self.api.list(params).await.inspect_err(|e| {
            tracing::error!(error = %e, "Error fetching customers list");
        })?;

        self.set_customers_list(CustomerListState::from_response(
            response.message,
            response.data,
        ));
        Ok(())
    }

    /// Fetch one customer and make it the current one.
    ///
    /// # Errors
    ///
    /// Returns the `ClientError`; the current customer is left unchanged.
    pub async fn fetch_customer(&self, id: CustomerId) -> Result<(), ClientError> {
        let _loading = LoadingGuard::new(self);

        let response = self.api.get(id).await.inspect_err(|e| {
            tracing::error!(error = %e, customer_id = %id, "Error fetching the customer");
        })?;

        self.set_customer(Some(response.data));
        Ok(())
    }

    /// Create a customer and return its new ID.
    ///
    /// # Errors
    ///
    /// Returns the `ClientError`, carrying field errors on 422.
    pub async fn add_customer(&self, input: &CustomerInput) -> Result<CustomerId, ClientError> {
        let _loading = LoadingGuard::new(self);

        let response = self.api.create(input).await.inspect_err(|e| {
            tracing::error!(error = %e, "Error adding the customer");
        })?;

        Ok(response.data.id)
    }

    /// Replace a customer and return its ID.
    ///
    /// # Errors
    ///
    /// Returns the `ClientError`, carrying field errors on 422.
    pub async fn update_customer(
        &self,
        id: CustomerId,
        input: &CustomerInput,
    ) -> Result<CustomerId, ClientError> {
        let _loading = LoadingGuard::new(self);

        let response = self.api.update(id, input).await.inspect_err(|e| {
            tracing::error!(error = %e, customer_id = %id, "Error updating the customer");
        })?;

        Ok(response.data.id)
    }

    /// Delete a customer and return the server's message.
    ///
    /// The cached listing is not touched; call
    /// [`Self::remove_customer_from_list`] to drop the row locally.
    ///
    /// # Errors
    ///
    /// Returns the `ClientError`.
    pub async fn delete_customer(&self, id: CustomerId) -> Result<String, ClientError> {
        let _loading = LoadingGuard::new(self);

        let response = self.api.delete(id).await.inspect_err(|e| {
            tracing::error!(error = %e, customer_id = %id, "Error deleting the customer");
        })?;

        Ok(response.message)
    }
}
