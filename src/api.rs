//! REST API server for ChainTrace
//!
//! Exposes the ledger over HTTP: custody-event intake, block sealing, chain
//! inspection and the product provenance queries.

use axum::{
    extract::{Path, Request, State},
    http::{self, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;
use crate::ledger::{is_valid_chain, Block, HistoryEntry, Ledger};
use crate::miner;
use crate::transaction::{CustodyEvent, Transaction};

/// Shared handler state: one ledger behind a single writer lock.
///
/// All mutation goes through the write half, so overlapping requests never
/// observe the chain and pending pool mid-update.
#[derive(Clone)]
pub struct Node {
    pub ledger: Arc<RwLock<Ledger>>,
}

impl Node {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
        }
    }
}

// ============================================================================
// API Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    InvalidInput(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct NewTransactionRequest {
    sender: Option<String>,
    recipient: Option<String>,
    product_id: Option<String>,
    product_name: Option<String>,
    location: Option<String>,
    status: Option<String>,
    #[serde(default)]
    metadata: BTreeMap<String, serde_json::Value>,
}

impl NewTransactionRequest {
    /// All six custody fields are mandatory at this boundary; the ledger
    /// itself accepts anything.
    fn into_event(self) -> Result<CustodyEvent, ApiError> {
        fn required(field: Option<String>, name: &str) -> Result<String, ApiError> {
            field.ok_or_else(|| ApiError::InvalidInput(format!("missing required field: {name}")))
        }

        Ok(CustodyEvent {
            sender: required(self.sender, "sender")?,
            recipient: required(self.recipient, "recipient")?,
            product_id: required(self.product_id, "product_id")?,
            product_name: required(self.product_name, "product_name")?,
            location: required(self.location, "location")?,
            status: required(self.status, "status")?,
            metadata: self.metadata,
        })
    }
}

#[derive(Serialize)]
struct TransactionCreatedResponse {
    message: String,
    transaction: Transaction,
}

#[derive(Serialize)]
struct MineResponse {
    message: String,
    index: u64,
    transactions: Vec<Transaction>,
    proof: u64,
    previous_hash: String,
}

#[derive(Serialize)]
struct ChainResponse {
    chain: Vec<Block>,
    length: usize,
}

#[derive(Serialize)]
struct ValidationResponse {
    valid: bool,
    length: usize,
}

#[derive(Serialize)]
struct ProductsResponse {
    products: Vec<String>,
    count: usize,
}

#[derive(Serialize)]
struct ProductHistoryResponse {
    product_id: String,
    history: Vec<HistoryEntry>,
    count: usize,
}

#[derive(Serialize)]
struct StatsResponse {
    total_blocks: usize,
    total_transactions: usize,
    total_products: usize,
    pending_transactions: usize,
}

// ============================================================================
// Middleware
// ============================================================================

/// Logs method, path, status and duration for every request.
async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        "api.request"
    );

    response
}

// ============================================================================
// API Server
// ============================================================================

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origin = if allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|o| o.parse::<http::HeaderValue>().ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(vec![
            http::Method::GET,
            http::Method::POST,
            http::Method::OPTIONS,
        ])
        .allow_headers(vec![http::header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Build the API router with all endpoints (also used by tests).
pub fn build_api_router(node: Arc<Node>, allowed_origins: &[String]) -> Router {
    Router::new()
        // Sealing
        .route("/mine", get(mine))
        // Transactions
        .route("/transactions/new", post(new_transaction))
        // Chain inspection
        .route("/chain", get(full_chain))
        .route("/chain/valid", get(validate_chain))
        // Provenance queries
        .route("/products", get(all_products))
        .route("/products/:product_id/history", get(product_history))
        // System endpoints
        .route("/stats", get(stats))
        .route("/health", get(health_check))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(node)
        .layer(cors_layer(allowed_origins))
}

/// Bind and serve the API until the process exits.
pub async fn run_api_server(
    node: Arc<Node>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_api_router(node, &config.network.allowed_origins);

    let addr: SocketAddr =
        format!("{}:{}", config.network.bind_addr, config.network.api_port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(%addr, "API server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Route Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "chaintrace",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn mine(State(node): State<Arc<Node>>) -> Result<Json<MineResponse>, ApiError> {
    // Hold the write lock across the whole seal so concurrent /mine requests
    // queue instead of racing on the same tip.
    let mut ledger = node.ledger.write().await;
    let last_proof = ledger.last_block().proof;

    // The search is CPU-bound; keep it off the async workers.
    let proof = tokio::task::spawn_blocking(move || miner::proof_of_work(last_proof))
        .await
        .map_err(|e| ApiError::Internal(format!("proof search failed: {e}")))?;

    ledger.record_transaction(CustodyEvent::seal_reward());
    let previous_hash = ledger.last_block().hash();
    let block = ledger.append_block(proof, previous_hash).clone();

    tracing::info!(index = block.index, proof = block.proof, "block.sealed");

    Ok(Json(MineResponse {
        message: "New block forged".to_string(),
        index: block.index,
        transactions: block.transactions,
        proof: block.proof,
        previous_hash: block.previous_hash,
    }))
}

async fn new_transaction(
    State(node): State<Arc<Node>>,
    Json(req): Json<NewTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionCreatedResponse>), ApiError> {
    let event = req.into_event()?;

    let mut ledger = node.ledger.write().await;
    let index = ledger.record_transaction(event);
    let transaction = ledger
        .pending
        .last()
        .expect("transaction was just recorded")
        .clone();

    Ok((
        StatusCode::CREATED,
        Json(TransactionCreatedResponse {
            message: format!("Transaction will be added to Block {index}"),
            transaction,
        }),
    ))
}

async fn full_chain(State(node): State<Arc<Node>>) -> impl IntoResponse {
    let ledger = node.ledger.read().await;
    Json(ChainResponse {
        chain: ledger.chain.clone(),
        length: ledger.chain.len(),
    })
}

async fn validate_chain(State(node): State<Arc<Node>>) -> impl IntoResponse {
    let ledger = node.ledger.read().await;
    Json(ValidationResponse {
        valid: is_valid_chain(&ledger.chain),
        length: ledger.chain.len(),
    })
}

async fn all_products(State(node): State<Arc<Node>>) -> impl IntoResponse {
    let ledger = node.ledger.read().await;
    let products: Vec<String> = ledger.all_product_ids().into_iter().collect();
    let count = products.len();
    Json(ProductsResponse { products, count })
}

async fn product_history(
    State(node): State<Arc<Node>>,
    Path(product_id): Path<String>,
) -> impl IntoResponse {
    let ledger = node.ledger.read().await;
    let history = ledger.product_history(&product_id);
    let count = history.len();
    Json(ProductHistoryResponse {
        product_id,
        history,
        count,
    })
}

async fn stats(State(node): State<Arc<Node>>) -> impl IntoResponse {
    let ledger = node.ledger.read().await;
    let total_transactions = ledger
        .chain
        .iter()
        .map(|block| block.transactions.len())
        .sum();

    Json(StatsResponse {
        total_blocks: ledger.chain.len(),
        total_transactions,
        total_products: ledger.all_product_ids().len(),
        pending_transactions: ledger.pending.len(),
    })
}
