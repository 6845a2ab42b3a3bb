//! Seed the database with random customers.
//!
//! Each customer goes through the same validation and hashing as an API
//! request, so seeded rows are indistinguishable from real ones. Every seeded
//! customer shares [`SEED_PASSWORD`].

use chrono::{Months, NaiveDate, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde_json::{Map, Value};

use customer_hub_api::db::PgCustomerStore;
use customer_hub_api::services::{CustomerError, CustomerService};

use super::{ConnectError, connect};

/// Password of every seeded customer.
pub const SEED_PASSWORD: &str = "Password123";

/// Attempts per customer before giving up on finding a free username.
const MAX_ATTEMPTS: u32 = 5;

const FIRST_NAMES: &[&str] = &[
    "Anna", "Bjorn", "Clara", "David", "Elsa", "Felix", "Greta", "Henrik", "Ida", "Johan",
    "Karin", "Lars", "Maja", "Nils", "Olivia", "Per", "Rosa", "Sven", "Tove", "Viktor",
];

const LAST_NAMES: &[&str] = &[
    "Andersson", "Berg", "Carlsson", "Dahl", "Eriksson", "Forsberg", "Gustafsson", "Holm",
    "Isaksson", "Johansson", "Karlsson", "Lindqvist", "Nilsson", "Olsson", "Persson", "Svensson",
];

/// Errors that can occur while seeding.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error(transparent)]
    Customer(#[from] CustomerError),
}

/// Insert `count` random customers and return how many were created.
///
/// # Errors
///
/// Returns `SeedError` if the database is unreachable or a write fails for a
/// reason other than a username collision.
pub async fn customers(count: u32) -> Result<u32, SeedError> {
    let pool = connect().await?;
    let store = PgCustomerStore::new(pool);
    let service = CustomerService::new(&store);
    let today = Utc::now().date_naive();

    let mut created = 0;
    for _ in 0..count {
        for attempt in 1..=MAX_ATTEMPTS {
            let fields = fake_customer(&mut rand::rng(), today);
            match service.create(&fields).await {
                Ok(customer) => {
                    tracing::debug!(customer_id = %customer.id, username = %customer.username, "Seeded customer");
                    created += 1;
                    break;
                }
                Err(CustomerError::Validation(errors)) if attempt < MAX_ATTEMPTS => {
                    tracing::debug!(?errors, "Generated customer rejected, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(created)
}

/// Random customer fields: a name, a birth date between 100 and 18 years
/// before `today`, and a username derived from the name.
fn fake_customer<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> Map<String, Value> {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Anna");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Berg");

    let earliest = today.checked_sub_months(Months::new(100 * 12)).unwrap_or(today);
    let latest = today.checked_sub_months(Months::new(18 * 12)).unwrap_or(today);
    let span = (latest - earliest).num_days().max(0);
    let dob = earliest + chrono::Duration::days(rng.random_range(0..=span));

    let username = format!(
        "{}.{}{}",
        first.to_lowercase(),
        last.to_lowercase(),
        rng.random_range(1..10_000)
    );

    let mut fields = Map::new();
    fields.insert("first_name".to_owned(), Value::from(first));
    fields.insert("last_name".to_owned(), Value::from(last));
    fields.insert("dob".to_owned(), Value::from(dob.format("%Y-%m-%d").to_string()));
    fields.insert("username".to_owned(), Value::from(username));
    fields.insert("password".to_owned(), Value::from(SEED_PASSWORD));
    fields
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use customer_hub_core::validate_customer;

    use super::*;

    #[test]
    fn test_fake_customers_pass_validation() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let mut rng = rand::rng();

        for _ in 0..200 {
            let fields = fake_customer(&mut rng, today);
            let draft = validate_customer(&fields, &|_| false).unwrap();

            assert!(draft.dob >= NaiveDate::from_ymd_opt(1924, 6, 15).unwrap());
            assert!(draft.dob <= NaiveDate::from_ymd_opt(2006, 6, 15).unwrap());
            assert!(draft.username.contains('.'));
        }
    }
}
