use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chain_client::resolve_prices;
use dashboard_engine::{
    home_summary, net_worth_summary, spending_options, spending_power_summary, BalanceReading,
};
use models::{ConnectionKind, ConnectionState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{connect::ConnectionStatus, error::ApiError, session::RequestSession, state::AppState, Result};

pub type SharedState = Arc<AppState>;

#[derive(Debug, Default, Deserialize)]
pub struct ConnectQuery {
    /// Block until the flow leaves `Loading`.
    #[serde(default)]
    pub wait: bool,
}

#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    pub kind: ConnectionKind,
    #[serde(flatten)]
    pub state: ConnectionState,
}

fn connect_response(kind: ConnectionKind, state: ConnectionState) -> impl IntoResponse {
    let status = if state.is_loading() {
        StatusCode::ACCEPTED
    } else {
        StatusCode::OK
    };
    (status, Json(ConnectResponse { kind, state }))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "plutus-api"
    }))
}

/// GET /api/connect/status
/// Returns the state of every connection flow
pub async fn connection_status(State(state): State<SharedState>) -> Json<ConnectionStatus> {
    Json(state.board().status())
}

/// POST /api/connect/bank
/// Starts linking the mock bank accounts
pub async fn connect_bank(
    State(state): State<SharedState>,
    Query(query): Query<ConnectQuery>,
) -> impl IntoResponse {
    let board = state.board();
    let mut current = board.connect_bank();
    if query.wait {
        current = board.flow(ConnectionKind::Bank).wait_settled().await;
    }
    connect_response(ConnectionKind::Bank, current)
}

/// POST /api/connect/credit-cards
/// Starts linking the mock credit cards
pub async fn connect_credit_cards(
    State(state): State<SharedState>,
    Query(query): Query<ConnectQuery>,
) -> impl IntoResponse {
    let board = state.board();
    let mut current = board.connect_credit_card();
    if query.wait {
        current = board.flow(ConnectionKind::CreditCard).wait_settled().await;
    }
    connect_response(ConnectionKind::CreditCard, current)
}

#[derive(Debug, Default, Deserialize)]
pub struct Web3ConnectRequest {
    #[serde(default)]
    pub primary_wallet: Option<String>,
}

/// POST /api/connect/web3
/// Links the caller's primary wallet, or asks for sign-in when there is none
pub async fn connect_web3(
    State(state): State<SharedState>,
    body: Option<Json<Web3ConnectRequest>>,
) -> impl IntoResponse {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let session = RequestSession::new(request.primary_wallet);

    let outcome = state
        .board()
        .connect_web3(&session, state.wallet.clone())
        .await;

    Json(outcome)
}

/// POST /api/connect/reset
/// Cancels pending connections and starts over with idle flows
pub async fn reset_connections(State(state): State<SharedState>) -> Json<ConnectionStatus> {
    let board = state.reset_board();
    tracing::info!("Connection board reset");
    Json(board.status())
}

/// GET /api/home
/// Account-level balances and the combined credit record
pub async fn get_home(State(state): State<SharedState>) -> impl IntoResponse {
    Json(home_summary(state.store.as_ref()))
}

/// GET /api/networth
/// Net worth including crypto holdings valued at oracle prices
pub async fn get_net_worth(State(state): State<SharedState>) -> impl IntoResponse {
    let reading = BalanceReading::from_store(state.store.as_ref());
    let prices = resolve_prices(state.oracle.as_ref(), state.fallback_prices).await;
    Json(net_worth_summary(&reading, prices))
}

/// GET /api/power
/// Bank balance, card debt and available liquidity
pub async fn get_spending_power(State(state): State<SharedState>) -> impl IntoResponse {
    Json(spending_power_summary(state.store.as_ref()))
}

#[derive(Debug, Deserialize)]
pub struct SpendRequest {
    pub amount: f64,
}

/// POST /api/power/options
/// Financing projections for a spend amount
pub async fn get_spending_options(
    State(state): State<SharedState>,
    body: std::result::Result<Json<SpendRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let options = spending_options(request.amount)?;

    // Simulated calculation time
    tokio::time::sleep(state.calculation_delay).await;

    Ok(Json(options))
}
