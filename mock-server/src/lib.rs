use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Breach {
    pub name: String,
    pub domain: String,
    pub pwn_count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BreachList {
    pub breaches: Vec<Breach>,
}

/// Problem-details error body.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Problem {
    pub title: String,
    pub detail: String,
    pub status: u16,
}

/// What `/echo` saw on the incoming request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Echo {
    pub query: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
}

#[derive(Deserialize)]
pub struct BreachFilter {
    pub domain: Option<String>,
}

/// Read-only breach data served by the app.
#[derive(Debug, Default)]
pub struct Catalog {
    pub breaches: Vec<Breach>,
    pub accounts: HashMap<String, Vec<String>>,
}

impl Catalog {
    pub fn seeded() -> Self {
        let breach = |name: &str, domain: &str, pwn_count| Breach {
            name: name.to_string(),
            domain: domain.to_string(),
            pwn_count,
        };
        let breaches = vec![
            breach("Adobe", "adobe.com", 152_445_165),
            breach("LinkedIn", "linkedin.com", 164_611_595),
            breach("Dropbox", "dropbox.com", 68_648_009),
        ];
        let accounts = HashMap::from([
            (
                "test@example.com".to_string(),
                vec!["Adobe".to_string(), "Dropbox".to_string()],
            ),
            ("alice@example.com".to_string(), vec!["LinkedIn".to_string()]),
        ]);
        Self { breaches, accounts }
    }
}

pub type Db = Arc<Catalog>;

pub fn app() -> Router {
    app_with(Catalog::seeded())
}

pub fn app_with(catalog: Catalog) -> Router {
    let db: Db = Arc::new(catalog);
    Router::new()
        .route("/breaches", get(list_breaches))
        .route("/breachedaccount/{account}", get(breached_account))
        .route("/echo", get(echo))
        .route("/broken", get(broken))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_breaches(
    State(db): State<Db>,
    Query(filter): Query<BreachFilter>,
) -> Json<BreachList> {
    let breaches = db
        .breaches
        .iter()
        .filter(|b| {
            filter
                .domain
                .as_deref()
                .is_none_or(|d| b.domain.eq_ignore_ascii_case(d))
        })
        .cloned()
        .collect();
    Json(BreachList { breaches })
}

async fn breached_account(State(db): State<Db>, Path(account): Path<String>) -> Response {
    if !account.contains('@') {
        debug!(%account, "rejecting malformed account");
        let problem = Problem {
            title: "Invalid".to_string(),
            detail: "bad email".to_string(),
            status: StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
        };
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            [(header::CONTENT_TYPE, "application/problem+json")],
            Json(problem),
        )
            .into_response();
    }

    match db.accounts.get(&account.to_ascii_lowercase()) {
        Some(names) => {
            let breaches = db
                .breaches
                .iter()
                .filter(|b| names.contains(&b.name))
                .cloned()
                .collect();
            Json(BreachList { breaches }).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn echo(Query(query): Query<BTreeMap<String, String>>, headers: HeaderMap) -> Json<Echo> {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    Json(Echo { query, headers })
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "not json{")
}
