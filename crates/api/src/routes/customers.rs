//! Customer resource handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, Path, Query, Request, State, rejection::QueryRejection},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use customer_hub_core::{ApiResponse, Customer, CustomerId, MessageResponse, PageRequest, Paginated, Sort};

use crate::error::{AppError, Result, not_found_message};
use crate::state::AppState;

/// Query parameters accepted by the listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub sort: Option<String>,
    pub page: Option<String>,
}

/// Submitted customer fields.
///
/// Anything that is not a JSON object (including an empty or unparseable
/// body) becomes an empty map, so validation reports every field as
/// required instead of the request failing to parse.
#[derive(Debug, Default)]
pub struct FieldMap(pub Map<String, Value>);

impl<S: Send + Sync> FromRequest<S> for FieldMap {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let bytes = Bytes::from_request(req, state).await?;

        let fields = match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        Ok(Self(fields))
    }
}

/// Parse a path segment as a customer ID. Non-integers cannot name a
/// customer, so they are reported as not found.
fn parse_id(raw: &str) -> Result<CustomerId> {
    raw.parse()
        .map_err(|_| AppError::NotFound(not_found_message(raw)))
}

/// `GET /api/customers`
pub async fn index(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Paginated<Customer>>>> {
    let Query(query) = query?;
    let sort = Sort::parse_list(query.sort.as_deref())?;
    let page_request = PageRequest::from_query(query.page.as_deref());

    let page = state.customers().list(&sort, page_request).await?;

    let mut keep = Vec::new();
    if query.sort.as_deref().is_some_and(|s| !s.trim().is_empty()) {
        let terms: Vec<String> = sort.iter().map(|s| s.to_query_term()).collect();
        keep.push(("sort", terms.join(",")));
    }
    let body = Paginated::from_page(page, &state.config().customers_url(), &keep);

    Ok(Json(ApiResponse::new("Customers retrieved successfully", body)))
}

/// `GET /api/customers/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Customer>>> {
    let id = parse_id(&id)?;
    let customer = state.customers().get(id).await?;

    Ok(Json(ApiResponse::new("Customer retrieved successfully", customer)))
}

/// `POST /api/customers`
pub async fn store(
    State(state): State<AppState>,
    FieldMap(fields): FieldMap,
) -> Result<(StatusCode, Json<ApiResponse<Customer>>)> {
    let customer = state.customers().create(&fields).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Customer saved successfully", customer)),
    ))
}

/// `PUT /api/customers/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    FieldMap(fields): FieldMap,
) -> Result<Json<ApiResponse<Customer>>> {
    let id = parse_id(&id)?;
    let customer = state.customers().update(id, &fields).await?;

    Ok(Json(ApiResponse::new("Customer updated successfully", customer)))
}

/// `DELETE /api/customers/{id}`
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    state.customers().delete(id).await?;

    Ok(Json(MessageResponse::new(format!(
        "Customer {id} deleted successfully"
    ))))
}
