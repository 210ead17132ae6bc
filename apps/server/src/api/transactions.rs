use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use budgetbook_core::transactions::Transaction;
use serde::Deserialize;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListTransactionsQuery {
    account_id: Option<String>,
}

async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListTransactionsQuery>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let transactions = state
        .transaction_repository
        .list_transactions(query.account_id.as_deref())?;
    Ok(Json(transactions))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/transactions", get(list_transactions))
}
