#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use cardex::config::ClientConfig;
use cardex::{Backend, CatalogClient, CatalogView, FilterState, ModalView, Notice};
use serde_json::{Value, json};
use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};
use tokio::net::TcpListener;
use url::Url;

#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct MockState {
    captured: Vec<Captured>,
    cards: HashMap<String, Vec<Value>>,
    next_id: u64,
    list_response: Option<(StatusCode, String)>,
    list_delays: VecDeque<Duration>,
}

/// In-process stand-in for the catalog REST server.
#[derive(Clone, Default)]
pub struct MockCatalog {
    state: Arc<Mutex<MockState>>,
}

impl MockCatalog {
    pub fn seed(&self, backend: &str, card: Value) {
        self.state
            .lock()
            .unwrap()
            .cards
            .entry(backend.to_string())
            .or_default()
            .push(card);
    }

    /// Every list request answers with this status and raw body.
    pub fn fail_list_with(&self, status: StatusCode, body: &str) {
        self.state.lock().unwrap().list_response = Some((status, body.to_string()));
    }

    /// The next list requests sleep for these durations, in order.
    pub fn delay_lists(&self, delays: impl IntoIterator<Item = Duration>) {
        self.state.lock().unwrap().list_delays.extend(delays);
    }

    pub fn captured(&self) -> Vec<Captured> {
        self.state.lock().unwrap().captured.clone()
    }

    pub fn captured_with(&self, method: Method) -> Vec<Captured> {
        self.captured()
            .into_iter()
            .filter(|c| c.method == method)
            .collect()
    }

    fn record(&self, method: Method, path: String, query: Option<String>, body: &Bytes) {
        let body = (!body.is_empty()).then(|| serde_json::from_slice(body).expect("json body"));
        self.state.lock().unwrap().captured.push(Captured {
            method,
            path,
            query,
            body,
        });
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/{backend}/cards", get(list_cards).post(create_card))
            .route(
                "/api/{backend}/cards/{id}",
                axum::routing::put(update_card).delete(delete_card),
            )
            .with_state(self.clone())
    }
}

async fn list_cards(
    State(mock): State<MockCatalog>,
    Path(backend): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    mock.record(
        Method::GET,
        format!("/api/{backend}/cards"),
        query.clone(),
        &Bytes::new(),
    );

    let (override_response, delay) = {
        let mut state = mock.state.lock().unwrap();
        (state.list_response.clone(), state.list_delays.pop_front())
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if let Some((status, body)) = override_response {
        return (status, [(header::CONTENT_TYPE, "application/json")], body).into_response();
    }

    let params: HashMap<String, String> = query
        .as_deref()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();
    let cards: Vec<Value> = mock
        .state
        .lock()
        .unwrap()
        .cards
        .get(&backend)
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .filter(|card| {
            params
                .get("manufacturer")
                .is_none_or(|m| card["manufacturer"] == m.as_str())
        })
        .collect();

    Json(json!({ "success": true, "data": cards })).into_response()
}

async fn create_card(
    State(mock): State<MockCatalog>,
    Path(backend): Path<String>,
    body: Bytes,
) -> Response {
    mock.record(Method::POST, format!("/api/{backend}/cards"), None, &body);

    let mut card: Value = serde_json::from_slice(&body).expect("json body");
    let mut state = mock.state.lock().unwrap();
    state.next_id += 1;
    let id = if backend == "mysql" {
        json!(state.next_id)
    } else {
        json!(format!("65a1f0c2e4b0a1b2c3d4{:04x}", state.next_id))
    };
    card["id"] = id.clone();
    state.cards.entry(backend).or_default().push(card);

    Json(json!({ "success": true, "id": id, "message": "Card created successfully" }))
        .into_response()
}

async fn update_card(
    State(mock): State<MockCatalog>,
    Path((backend, id)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    mock.record(Method::PUT, format!("/api/{backend}/cards/{id}"), None, &body);

    let patch: Value = serde_json::from_slice(&body).expect("json body");
    let mut state = mock.state.lock().unwrap();
    let card = state
        .cards
        .get_mut(&backend)
        .and_then(|cards| cards.iter_mut().find(|c| id_matches(c, &id)));
    match card {
        Some(card) => {
            for (key, value) in patch.as_object().expect("object body") {
                card[key] = value.clone();
            }
            Json(json!({ "success": true, "message": "Card updated successfully" }))
                .into_response()
        }
        None => not_found(),
    }
}

async fn delete_card(
    State(mock): State<MockCatalog>,
    Path((backend, id)): Path<(String, String)>,
) -> Response {
    mock.record(
        Method::DELETE,
        format!("/api/{backend}/cards/{id}"),
        None,
        &Bytes::new(),
    );

    let mut state = mock.state.lock().unwrap();
    let Some(cards) = state.cards.get_mut(&backend) else {
        return not_found();
    };
    let before = cards.len();
    cards.retain(|c| !id_matches(c, &id));
    if cards.len() == before {
        return not_found();
    }
    Json(json!({ "success": true, "message": "Card deleted successfully" })).into_response()
}

fn id_matches(card: &Value, id: &str) -> bool {
    match &card["id"] {
        Value::String(s) => s == id,
        Value::Number(n) => n.to_string() == id,
        _ => false,
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "error": "Card not found" })),
    )
        .into_response()
}

pub async fn spawn_test_server(app: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let base = Url::parse(&format!("http://{}", addr)).expect("valid base url");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });

    base
}

/// A base URL nothing listens on.
pub async fn closed_port_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    Url::parse(&format!("http://{}", addr)).expect("valid base url")
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Tab(Backend),
    Grid(Backend),
    ModalShown { title: String },
    ModalHidden,
    FiltersSynced(Backend, FilterState),
    Confirm(String),
}

/// Records everything the controller shows.
pub struct RecordingView {
    grids: Mutex<HashMap<Backend, String>>,
    events: Mutex<Vec<ViewEvent>>,
    notices: Mutex<Vec<Notice>>,
    confirm_answer: AtomicBool,
    confirms: AtomicUsize,
}

impl RecordingView {
    pub fn new(confirm_answer: bool) -> Self {
        Self {
            grids: Mutex::default(),
            events: Mutex::default(),
            notices: Mutex::default(),
            confirm_answer: AtomicBool::new(confirm_answer),
            confirms: AtomicUsize::new(0),
        }
    }

    pub fn grid(&self, backend: Backend) -> String {
        self.grids
            .lock()
            .unwrap()
            .get(&backend)
            .cloned()
            .unwrap_or_default()
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn confirms(&self) -> usize {
        self.confirms.load(Ordering::SeqCst)
    }

    pub fn answer_confirm(&self, answer: bool) {
        self.confirm_answer.store(answer, Ordering::SeqCst);
    }
}

#[async_trait]
impl CatalogView for RecordingView {
    fn show_tab(&self, backend: Backend) {
        self.events.lock().unwrap().push(ViewEvent::Tab(backend));
    }

    fn render_grid(&self, backend: Backend, html: &str) {
        self.grids.lock().unwrap().insert(backend, html.to_string());
        self.events.lock().unwrap().push(ViewEvent::Grid(backend));
    }

    fn show_modal(&self, modal: ModalView<'_>) {
        self.events.lock().unwrap().push(ViewEvent::ModalShown {
            title: modal.title.to_string(),
        });
    }

    fn hide_modal(&self) {
        self.events.lock().unwrap().push(ViewEvent::ModalHidden);
    }

    fn sync_filters(&self, backend: Backend, filters: &FilterState) {
        self.events
            .lock()
            .unwrap()
            .push(ViewEvent::FiltersSynced(backend, filters.clone()));
    }

    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }

    async fn confirm(&self, prompt: &str) -> bool {
        self.confirms.fetch_add(1, Ordering::SeqCst);
        self.events
            .lock()
            .unwrap()
            .push(ViewEvent::Confirm(prompt.to_string()));
        self.confirm_answer.load(Ordering::SeqCst)
    }
}

pub fn client_config(base: Url) -> ClientConfig {
    let mut cfg = ClientConfig::with_base_url(base).expect("valid base url");
    cfg.search_debounce_ms = 60;
    cfg
}

pub async fn spawn_client(
    mock: &MockCatalog,
    cfg: impl FnOnce(&mut ClientConfig),
) -> CatalogClient<RecordingView> {
    let base = spawn_test_server(mock.router()).await;
    let mut config = client_config(base);
    cfg(&mut config);
    CatalogClient::from_config(RecordingView::new(true), &config).expect("client builds")
}

pub fn rtx_4090(id: Value) -> Value {
    json!({
        "id": id,
        "name": "NVIDIA GeForce RTX 4090",
        "manufacturer": "NVIDIA",
        "model": "RTX 4090",
        "memory_gb": 24,
        "memory_type": "GDDR6X",
        "core_clock_mhz": 2230,
        "boost_clock_mhz": 2520,
        "price_usd": 1599.0,
        "release_date": "2022-10-12",
    })
}

pub fn rx_7900(id: Value) -> Value {
    json!({
        "id": id,
        "name": "AMD Radeon RX 7900 XTX",
        "manufacturer": "AMD",
        "model": "RX 7900 XTX",
        "memory_gb": 24,
        "memory_type": "GDDR6",
        "core_clock_mhz": 2300,
    })
}
