//! Shared test doubles for the connector integration tests

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use econet_connectors::http::{EconetClient, HttpConfig, HttpRequest, HttpResponse, Transport, TransportError};

pub type Reply = Result<HttpResponse, TransportError>;

#[derive(Default)]
struct Route {
    queued: VecDeque<Reply>,
    sticky: Option<Reply>,
}

/// Transport answering from per-endpoint scripts
///
/// Queued replies are served first, in order; once drained the sticky
/// reply (if any) is repeated. Unknown endpoints answer 404.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, Route>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Always answer `endpoint` with `reply`
    pub fn respond(&self, endpoint: &str, reply: Reply) {
        self.routes.lock().unwrap().entry(endpoint.to_string()).or_default().sticky = Some(reply);
    }

    pub fn respond_json(&self, endpoint: &str, body: Value) {
        self.respond(endpoint, Ok(HttpResponse::json(&body)));
    }

    /// Answer the next call to `endpoint` with `reply`
    pub fn enqueue(&self, endpoint: &str, reply: Reply) {
        self.routes
            .lock()
            .unwrap()
            .entry(endpoint.to_string())
            .or_default()
            .queued
            .push_back(reply);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| endpoint_of(&r.url) == endpoint)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

fn endpoint_of(url: &str) -> &str {
    url.split_once("/econet/").map(|(_, rest)| rest).unwrap_or(url)
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());

        let mut routes = self.routes.lock().unwrap();
        let Some(route) = routes.get_mut(endpoint_of(&request.url)) else {
            return Ok(HttpResponse::new(404, ""));
        };

        match route.queued.pop_front() {
            Some(reply) => reply,
            None => route
                .sticky
                .clone()
                .unwrap_or_else(|| Ok(HttpResponse::new(404, ""))),
        }
    }
}

pub const HOST: &str = "192.168.1.50";

pub fn http_config() -> HttpConfig {
    HttpConfig::new(HOST)
        .basic_auth("admin", "admin")
        .retry_delay(Duration::ZERO)
}

pub fn client(transport: &Arc<ScriptedTransport>) -> EconetClient {
    EconetClient::new(http_config(), transport.clone())
}

pub fn sys_params() -> Value {
    json!({
        "uid": "UID-0001",
        "softVer": "1.0.0",
        "routerType": "ecoNET300",
        "mixerTemp1": 35.2,
        "mixerSetTemp1": 40,
    })
}

pub fn reg_params() -> Value {
    json!({
        "curr": {
            "tempCO": 45.5,
            "tempCOSet": 55,
            "tempCWU": 48.0,
            "tempCWUSet": 50,
            "fanPower": 33.333,
            "mode": 2,
            "lambdaStatus": 1,
            "fan": true,
            "fanWorks": false,
            "pumpCO": true,
            "pumpCOWorks": true,
            "pumpSolar": false,
            "pumpSolarWorks": true,
        }
    })
}

pub fn limits() -> Value {
    json!({
        "data": {
            "1280": { "min": 27, "max": 68 },
            "1281": { "min": 20, "max": 55 },
        }
    })
}

/// Transport scripted like a healthy controller
pub fn healthy_controller() -> Arc<ScriptedTransport> {
    let transport = ScriptedTransport::new();
    transport.respond_json("sysParams", sys_params());
    transport.respond_json("regParams", reg_params());
    transport.respond_json("rmCurrentDataParamsEdits", limits());
    transport.respond_json("rmCurrNewParam", json!({ "result": "OK" }));
    transport
}
