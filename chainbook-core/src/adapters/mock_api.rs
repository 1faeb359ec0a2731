//! Mock watchlist API server for testing
//!
//! A stateful HTTP server that mirrors the real API's routes and error
//! shapes, so the HTTP client and the services above it can be exercised
//! end to end:
//! - POST /token (form) -> { access_token } | 401
//! - POST /register (JSON) -> { access_token } | 400 { detail } | 422 { detail: [{msg}] }
//! - GET /users/me -> { email, id } | 401
//! - GET /wallets/ -> [Wallet] | 401
//! - POST /wallets/ -> Wallet | 401 | 422
//! - DELETE /wallets/{id} -> { ok } | 401 | 403 | 404

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use serde::{Deserialize, Serialize};

use crate::domain::{RiskLevel, Wallet, WalletId};

/// Mock watchlist server for testing
pub struct MockApiServer {
    port: u16,
    running: Arc<AtomicBool>,
    state: Arc<Mutex<MockState>>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

/// Failure injection knobs fixed at start; see also `set_fail_list`
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Answer POST /register with a 500 and no `detail`
    pub fail_register_without_detail: bool,
    /// Delay in milliseconds before responding
    pub delay_ms: u64,
}

#[derive(Debug, Default)]
struct MockState {
    users: Vec<MockUser>,
    wallets: Vec<StoredWallet>,
    next_wallet_id: WalletId,
    requests: Vec<String>,
    /// Answer GET /wallets/ with HTTP 500
    fail_list: bool,
}

#[derive(Debug, Clone)]
struct MockUser {
    id: i64,
    email: String,
    password: String,
}

#[derive(Debug, Clone)]
struct StoredWallet {
    owner_id: i64,
    wallet: Wallet,
}

// Response/request structures matching the real API

#[derive(Serialize)]
struct TokenBody {
    access_token: String,
    token_type: String,
}

#[derive(Serialize)]
struct WalletBody<'a> {
    #[serde(flatten)]
    wallet: &'a Wallet,
    owner_id: i64,
}

#[derive(Deserialize)]
struct RegisterRequest {
    email: Option<String>,
    password: Option<String>,
}

#[derive(Deserialize)]
struct WalletCreateRequest {
    label: Option<String>,
    address: Option<String>,
    chain: Option<String>,
    risk_level: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

struct MockRequest {
    method: String,
    path: String,
    headers: String,
    body: String,
}

impl MockApiServer {
    /// Start a new mock server on a random available port
    pub fn start(config: MockConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let state = Arc::new(Mutex::new(MockState {
            next_wallet_id: 1,
            ..MockState::default()
        }));

        // Non-blocking accept so the loop can observe shutdown
        listener.set_nonblocking(true)?;

        let running_clone = running.clone();
        let state_clone = state.clone();
        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let cfg = config.clone();
                        let state = state_clone.clone();
                        thread::spawn(move || handle_connection(stream, &cfg, &state));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            state,
            thread_handle: Some(thread_handle),
        })
    }

    /// Get the base URL for this mock server
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Register a user directly, bypassing /register
    pub fn seed_user(&self, email: &str, password: &str) {
        let mut state = self.state.lock().unwrap();
        let id = state.users.len() as i64 + 1;
        state.users.push(MockUser {
            id,
            email: email.to_string(),
            password: password.to_string(),
        });
    }

    /// Insert a wallet owned by `email`, bypassing POST /wallets/
    pub fn seed_wallet(&self, email: &str, label: &str, address: &str, risk: RiskLevel) -> Wallet {
        let mut state = self.state.lock().unwrap();
        let owner_id = state
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.id)
            .expect("seed the user first");
        let wallet = Wallet {
            id: state.next_wallet_id,
            label: label.to_string(),
            address: address.to_string(),
            chain: "Ethereum".to_string(),
            risk_level: risk,
            notes: None,
        };
        state.next_wallet_id += 1;
        state.wallets.push(StoredWallet {
            owner_id,
            wallet: wallet.clone(),
        });
        wallet
    }

    /// Bearer token the server accepts for `email`
    pub fn token_for(&self, email: &str) -> String {
        format!("mock-token:{}", email)
    }

    /// Toggle HTTP 500 on GET /wallets/ while the server is running
    pub fn set_fail_list(&self, fail: bool) {
        self.state.lock().unwrap().fail_list = fail;
    }

    /// "METHOD /path" of every request received so far
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Number of received requests matching "METHOD /path"
    pub fn request_count(&self, route: &str) -> usize {
        self.requests().iter().filter(|r| r.as_str() == route).count()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockApiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Read one request: headers up to the blank line, then Content-Length bytes
fn read_request(stream: &mut TcpStream) -> Option<MockRequest> {
    let mut data = Vec::new();
    let mut buffer = [0; 4096];

    let header_end = loop {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buffer[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&data[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while data.len() < header_end + content_length {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buffer[..n]);
    }

    let mut request_line = head.lines().next().unwrap_or("").split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let body_end = data.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&data[header_end..body_end]).to_string();

    Some(MockRequest {
        method,
        path,
        headers: head,
        body,
    })
}

fn handle_connection(mut stream: TcpStream, config: &MockConfig, state: &Mutex<MockState>) {
    let _ = stream.set_nonblocking(false);
    let Some(request) = read_request(&mut stream) else {
        return;
    };

    if config.delay_ms > 0 {
        thread::sleep(std::time::Duration::from_millis(config.delay_ms));
    }

    let path = request.path.split('?').next().unwrap_or("").to_string();
    let mut state = state.lock().unwrap();
    state.requests.push(format!("{} {}", request.method, path));

    let (status, body) = route(&request, &path, config, &mut state);
    drop(state);
    send_response(&mut stream, status, &body);
}

fn route(
    request: &MockRequest,
    path: &str,
    config: &MockConfig,
    state: &mut MockState,
) -> (u16, String) {
    match (request.method.as_str(), path) {
        ("POST", "/token") => login(&request.body, state),
        ("POST", "/register") => register(&request.body, config, state),
        ("GET", "/users/me") => match current_user(&request.headers, state) {
            Some(user) => (
                200,
                serde_json::json!({ "email": user.email, "id": user.id }).to_string(),
            ),
            None => unauthorized(),
        },
        ("GET", "/wallets/") => {
            let Some(user) = current_user(&request.headers, state) else {
                return unauthorized();
            };
            if state.fail_list {
                return (500, r#"{"detail":"Internal Server Error"}"#.to_string());
            }
            let wallets: Vec<WalletBody> = state
                .wallets
                .iter()
                .filter(|w| w.owner_id == user.id)
                .map(|w| WalletBody {
                    wallet: &w.wallet,
                    owner_id: w.owner_id,
                })
                .collect();
            (200, serde_json::to_string(&wallets).unwrap())
        }
        ("POST", "/wallets/") => {
            let Some(user) = current_user(&request.headers, state) else {
                return unauthorized();
            };
            create_wallet(&request.body, user.id, state)
        }
        ("DELETE", p) if p.starts_with("/wallets/") => {
            let Some(user) = current_user(&request.headers, state) else {
                return unauthorized();
            };
            let id: Option<WalletId> = p.trim_start_matches("/wallets/").parse().ok();
            let Some(index) = id.and_then(|id| state.wallets.iter().position(|w| w.wallet.id == id))
            else {
                return (404, r#"{"detail":"Wallet Not Found"}"#.to_string());
            };
            if state.wallets[index].owner_id != user.id {
                return (403, r#"{"detail":"Not Authorized"}"#.to_string());
            }
            state.wallets.remove(index);
            (200, r#"{"ok":true}"#.to_string())
        }
        _ => (404, r#"{"detail":"Not Found"}"#.to_string()),
    }
}

fn unauthorized() -> (u16, String) {
    (
        401,
        r#"{"detail":"Could not validate user credentials"}"#.to_string(),
    )
}

fn field_required(field: &str) -> (u16, String) {
    (
        422,
        serde_json::json!({
            "detail": [{ "loc": ["body", field], "msg": "Field required", "type": "missing" }]
        })
        .to_string(),
    )
}

fn token_body(email: &str) -> String {
    serde_json::to_string(&TokenBody {
        access_token: format!("mock-token:{}", email),
        token_type: "bearer".to_string(),
    })
    .unwrap()
}

fn login(body: &str, state: &MockState) -> (u16, String) {
    let form = parse_form(body);
    let field = |name: &str| {
        form.iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    };
    let (Some(username), Some(password)) = (field("username"), field("password")) else {
        return field_required("username");
    };
    match state
        .users
        .iter()
        .find(|u| u.email == username && u.password == password)
    {
        Some(user) => (200, token_body(&user.email)),
        None => (
            401,
            r#"{"detail":"Incorrect username or password"}"#.to_string(),
        ),
    }
}

fn register(body: &str, config: &MockConfig, state: &mut MockState) -> (u16, String) {
    if config.fail_register_without_detail {
        return (500, "Internal Server Error".to_string());
    }
    let Ok(request) = serde_json::from_str::<RegisterRequest>(body) else {
        return field_required("email");
    };
    let Some(email) = request.email.filter(|e| e.contains('@')) else {
        return (
            422,
            serde_json::json!({
                "detail": [{ "msg": "value is not a valid email address" }]
            })
            .to_string(),
        );
    };
    let Some(password) = request.password else {
        return field_required("password");
    };
    if password.len() < 8 {
        return (
            422,
            serde_json::json!({
                "detail": [{ "msg": "Value error, Password must be at least 8 characters long" }]
            })
            .to_string(),
        );
    }
    if state.users.iter().any(|u| u.email == email) {
        return (
            400,
            r#"{"detail":"Account already exists with given email"}"#.to_string(),
        );
    }
    let id = state.users.len() as i64 + 1;
    state.users.push(MockUser {
        id,
        email: email.clone(),
        password,
    });
    (200, token_body(&email))
}

fn create_wallet(body: &str, owner_id: i64, state: &mut MockState) -> (u16, String) {
    let Ok(request) = serde_json::from_str::<WalletCreateRequest>(body) else {
        return field_required("label");
    };
    let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
    for (name, value) in [
        ("label", &request.label),
        ("address", &request.address),
        ("chain", &request.chain),
        ("risk_level", &request.risk_level),
    ] {
        if !present(value) {
            return field_required(name);
        }
    }
    // The real server stores any string here
    let risk_level = RiskLevel::from_server(&request.risk_level.unwrap_or_default());

    let wallet = Wallet {
        id: state.next_wallet_id,
        label: request.label.unwrap_or_default(),
        address: request.address.unwrap_or_default(),
        chain: request.chain.unwrap_or_default(),
        risk_level,
        notes: request.notes,
    };
    state.next_wallet_id += 1;
    state.wallets.push(StoredWallet {
        owner_id,
        wallet: wallet.clone(),
    });

    let body = serde_json::to_string(&WalletBody {
        wallet: &wallet,
        owner_id,
    })
    .unwrap();
    (200, body)
}

fn current_user(headers: &str, state: &MockState) -> Option<MockUser> {
    let token = headers
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("authorization"))
        .and_then(|(_, value)| value.trim().strip_prefix("Bearer ").map(str::to_string))?;
    let email = token.strip_prefix("mock-token:")?;
    state.users.iter().find(|u| u.email == email).cloned()
}

/// Decode an application/x-www-form-urlencoded body
fn parse_form(body: &str) -> Vec<(String, String)> {
    body.split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (percent_decode(k), percent_decode(v)))
        .collect()
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                match u8::from_str_radix(&s[i + 1..i + 3], 16) {
                    Ok(b) => {
                        out.push(b);
                        i += 2;
                    }
                    Err(_) => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).to_string()
}

fn send_response(stream: &mut TcpStream, status: u16, body: &str) {
    let status_text = match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        _ => "Internal Server Error",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("analyst%40example.com"), "analyst@example.com");
        assert_eq!(percent_decode("a+b"), "a b");
        assert_eq!(percent_decode("100%"), "100%");
    }

    #[test]
    fn test_parse_form() {
        let form = parse_form("username=a%40b.c&password=p%26w");
        assert_eq!(form[0], ("username".to_string(), "a@b.c".to_string()));
        assert_eq!(form[1], ("password".to_string(), "p&w".to_string()));
    }

    #[test]
    fn test_mock_server_starts() {
        let server = MockApiServer::start(MockConfig::default()).unwrap();
        assert!(server.base_url().starts_with("http://127.0.0.1:"));
        assert!(server.requests().is_empty());
    }
}
