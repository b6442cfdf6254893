/// Dispatcher tests.
///
/// Drive `Cookbook` end to end with a recording HTTP fetcher and a scripted
/// client handle, so every remote call can be counted and inspected without
/// a node.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use serde_json::{Value, json};
use tiny_http::Method;
use url::Url;

use cookbook::catalog;
use cookbook::dispatch::Cookbook;
use cookbook::form::FormData;
use cookbook::session::SessionRegistry;
use cookbook::transport::sdk::{ClientHandle, Credentials, HandleFactory};
use cookbook::transport::{HttpFetch, NodeUrls};
use cookbook::web;

// ---------------------------------------------------------------------------
// Stubs
// ---------------------------------------------------------------------------

struct RecordingFetch {
    body: Mutex<String>,
    seen: Mutex<Vec<String>>,
}

impl RecordingFetch {
    fn answering(body: &str) -> Arc<Self> {
        Arc::new(Self {
            body: Mutex::new(body.to_string()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

impl HttpFetch for RecordingFetch {
    fn get(&self, url: &Url) -> Result<String> {
        self.seen.lock().unwrap().push(url.to_string());
        Ok(self.body.lock().unwrap().clone())
    }
}

#[derive(Default)]
struct Counters {
    opened: AtomicUsize,
    calls: Mutex<Vec<String>>,
}

struct StubHandle {
    credentials: Credentials,
    counters: Arc<Counters>,
    session_id: String,
    genesis_id: String,
}

impl ClientHandle for StubHandle {
    fn call(&mut self, method: &str, args: &[&str]) -> Value {
        self.counters
            .calls
            .lock()
            .unwrap()
            .push(format!("{method}({})", args.join(",")));

        if method == "nexus_users_login_user" {
            if self.credentials.password == "bad" {
                return json!({ "error": { "code": -139, "message": "Invalid credentials" } });
            }
            self.session_id = "S1".to_string();
            self.genesis_id = "G1".to_string();
            return json!({ "session": "S1", "genesis": "G1" });
        }
        if method.ends_with("_by_genesis") {
            return json!({ "result": [{ "txid": "a" }, { "txid": "b" }] });
        }
        json!({ "result": { "method": method, "user": self.credentials.username } })
    }

    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn genesis_id(&self) -> &str {
        &self.genesis_id
    }
}

struct StubFactory(Arc<Counters>);

impl HandleFactory for StubFactory {
    fn open(&self, credentials: Credentials) -> Box<dyn ClientHandle> {
        self.0.opened.fetch_add(1, Ordering::SeqCst);
        Box::new(StubHandle {
            credentials,
            counters: Arc::clone(&self.0),
            session_id: String::new(),
            genesis_id: String::new(),
        })
    }
}

struct Harness {
    cookbook: Cookbook,
    fetch: Arc<RecordingFetch>,
    counters: Arc<Counters>,
}

fn harness_with(body: &str) -> Harness {
    let fetch = RecordingFetch::answering(body);
    let counters = Arc::new(Counters::default());
    let urls = Arc::new(NodeUrls::new("http://api:8080", "http://sdk:8080"));
    let cookbook = Cookbook::with_parts(
        urls,
        fetch.clone(),
        Box::new(StubFactory(Arc::clone(&counters))),
        SessionRegistry::new(16, Duration::ZERO),
    );
    Harness {
        cookbook,
        fetch,
        counters,
    }
}

fn harness() -> Harness {
    harness_with(r#"{"result":{"ok":true}}"#)
}

fn form(pairs: &[(&str, &str)]) -> FormData {
    FormData::from_pairs(pairs.iter().copied())
}

fn login(h: &Harness) -> String {
    h.cookbook
        .handle(
            "users-login-user",
            None,
            &form(&[
                ("username", "alice"),
                ("password", "p"),
                ("pin", "1234"),
                ("action", "SDK"),
            ]),
        )
        .unwrap()
}

// ---------------------------------------------------------------------------
// Required inputs
// ---------------------------------------------------------------------------

#[test]
fn missing_input_names_operation_and_makes_no_call() {
    let h = harness();
    for op in catalog::all().iter().filter(|op| !op.required.is_empty()) {
        for action in ["SDK", "API"] {
            let page = h
                .cookbook
                .handle(op.route, None, &form(&[("action", action)]))
                .unwrap();
            let expected = format!("{} needs more input parameters", op.remote);
            assert!(page.contains(&expected), "{} via {action}", op.route);
        }
    }
    assert!(h.fetch.calls().is_empty());
    assert_eq!(h.counters.opened.load(Ordering::SeqCst), 0);
}

#[test]
fn one_blank_required_field_is_enough_to_stop() {
    let h = harness();
    let page = h
        .cookbook
        .handle(
            "users-login-user",
            None,
            &form(&[("username", "alice"), ("password", ""), ("pin", "1234"), ("action", "API")]),
        )
        .unwrap();
    assert!(page.contains("users/login/user needs more input parameters"));
    assert!(h.fetch.calls().is_empty());
}

// ---------------------------------------------------------------------------
// SDK transport
// ---------------------------------------------------------------------------

#[test]
fn sdk_login_registers_handle_and_updates_display_slot() {
    let h = harness();
    let page = login(&h);

    assert!(page.contains(r#""session":"S1""#));
    assert_eq!(h.cookbook.session_count(), 1);
    assert_eq!(h.cookbook.last_sdk_user().as_deref(), Some("alice"));
    assert_eq!(h.cookbook.last_api_user(), None);
    // the next page's session and genesis inputs are pre-filled
    assert!(page.contains(r#"name="session" value="S1""#));
    assert!(page.contains(r#"name="genesis" value="G1""#));
    assert!(page.contains(r#"action="/users-list-items/S1""#));
}

#[test]
fn failed_sdk_login_registers_nothing() {
    let h = harness();
    let page = h
        .cookbook
        .handle(
            "users-login-user",
            None,
            &form(&[
                ("username", "alice"),
                ("password", "bad"),
                ("pin", "1234"),
                ("action", "SDK"),
            ]),
        )
        .unwrap();
    assert!(page.contains("Invalid credentials"));
    assert!(page.contains(r#"<font color="red">"#));
    assert_eq!(h.cookbook.session_count(), 0);
    assert_eq!(h.cookbook.last_sdk_user(), None);
}

#[test]
fn session_field_call_uses_registered_handle() {
    let h = harness();
    login(&h);

    let page = h
        .cookbook
        .handle(
            "tokens-get-token-name",
            None,
            &form(&[("session", "S1"), ("name", "coin"), ("action", "SDK")]),
        )
        .unwrap();

    assert!(page.contains("nexus_tokens_get_token_by_name"));
    assert!(page.contains(r#""user":"alice""#));
    assert_eq!(h.counters.opened.load(Ordering::SeqCst), 1);
    let calls = h.counters.calls.lock().unwrap().clone();
    assert_eq!(
        calls,
        ["nexus_users_login_user()", "nexus_tokens_get_token_by_name(coin)"]
    );
    assert!(h.fetch.calls().is_empty());
}

#[test]
fn route_session_listing_renders_items_and_echoes_genesis() {
    let h = harness();
    login(&h);

    let page = h
        .cookbook
        .handle(
            "users-list-transactions",
            Some("S1"),
            &form(&[
                ("genesis", "G9"),
                ("page", "0"),
                ("limit", "100"),
                ("verbose", "default"),
                ("action", "SDK"),
            ]),
        )
        .unwrap();

    assert!(page.contains(r#"{"result": [<br><br>{"txid":"a"}<br><br>{"txid":"b"}<br><br>]}"#));
    assert!(page.contains(r#"name="genesis" value="G9""#));
    let calls = h.counters.calls.lock().unwrap().clone();
    assert_eq!(
        calls[1],
        "nexus_users_list_transactions_by_genesis(0,100,default)"
    );
}

#[test]
fn unknown_session_is_rendered_without_remote_call() {
    let h = harness();
    let page = h
        .cookbook
        .handle(
            "finance-list-accounts",
            None,
            &form(&[("session", "nope"), ("action", "SDK")]),
        )
        .unwrap();

    assert!(page.contains("Login session nope does not exist"));
    assert!(page.contains(r#"<font color="red">"#));
    assert!(h.counters.calls.lock().unwrap().is_empty());
    assert!(h.fetch.calls().is_empty());
}

#[test]
fn anonymous_operations_open_a_fresh_handle() {
    let h = harness();
    let page = h
        .cookbook
        .handle("system-get-info", None, &form(&[("action", "SDK")]))
        .unwrap();
    assert!(page.contains("nexus_system_get_info"));
    assert_eq!(h.counters.opened.load(Ordering::SeqCst), 1);
    assert_eq!(h.cookbook.session_count(), 0);
}

// ---------------------------------------------------------------------------
// API transport
// ---------------------------------------------------------------------------

#[test]
fn api_login_updates_api_slot_only() {
    let h = harness_with(r#"{"result":{"session":"A1","genesis":"AG"}}"#);
    let page = h
        .cookbook
        .handle(
            "users-login-user",
            None,
            &form(&[
                ("username", "bob"),
                ("password", "p w"),
                ("pin", "1234"),
                ("action", "API"),
            ]),
        )
        .unwrap();

    assert_eq!(
        h.fetch.calls(),
        ["http://api:8080/users/login/user?username=bob&password=p+w&pin=1234"]
    );
    assert_eq!(h.cookbook.last_api_user().as_deref(), Some("bob"));
    assert_eq!(h.cookbook.last_sdk_user(), None);
    assert_eq!(h.cookbook.session_count(), 0);
    assert!(page.contains(r#"name="session" value="A1""#));
    assert_eq!(h.counters.opened.load(Ordering::SeqCst), 0);
}

#[test]
fn api_call_sends_fixed_params() {
    let h = harness();
    h.cookbook.handle(
        "assets-create-asset",
        None,
        &form(&[
            ("pin", "1"),
            ("session", "S"),
            ("name", "car"),
            ("data", "x"),
            ("action", "API"),
        ]),
    );
    assert_eq!(
        h.fetch.calls(),
        ["http://api:8080/assets/create/asset?pin=1&session=S&name=car&format=raw&data=x"]
    );
}

#[test]
fn credit_token_hits_credit_token_endpoint() {
    let h = harness();
    h.cookbook.handle(
        "tokens-credit-token",
        None,
        &form(&[
            ("pin", "1"),
            ("session", "S"),
            ("name", "coin"),
            ("amount", "5"),
            ("txid", "T"),
            ("action", "API"),
        ]),
    );
    assert_eq!(
        h.fetch.calls(),
        ["http://api:8080/tokens/credit/token?pin=1&session=S&name=coin&amount=5&txid=T"]
    );
}

#[test]
fn list_blocks_sends_verbose_from_its_own_field() {
    let h = harness();
    h.cookbook.handle(
        "ledger-list-blocks-height",
        None,
        &form(&[
            ("height", "10"),
            ("limit", "3"),
            ("verbose", "2"),
            ("action", "API"),
        ]),
    );
    assert_eq!(
        h.fetch.calls(),
        ["http://api:8080/ledger/list/blocks?height=10&limit=3&verbose=2"]
    );
}

#[test]
fn unreachable_node_is_rendered_as_error_page() {
    let h = harness_with("");
    let page = h
        .cookbook
        .handle("system-list-peers", None, &form(&[("action", "API")]))
        .unwrap();
    assert!(page.contains("nexus daemon may not be running"));
    assert!(page.contains(r#"<font color="red">"#));
}

// ---------------------------------------------------------------------------
// Node URLs
// ---------------------------------------------------------------------------

#[test]
fn url_change_touches_only_its_transport() {
    let h = harness();
    h.cookbook
        .change_url("api", &form(&[("url", "http://other:9336")]));
    assert_eq!(h.cookbook.api_url(), "http://other:9336");
    assert_eq!(h.cookbook.sdk_url(), "http://sdk:8080");

    h.cookbook.handle("system-get-info", None, &form(&[("action", "API")]));
    assert_eq!(h.fetch.calls(), ["http://other:9336/system/get/info"]);
}

#[test]
fn empty_url_is_refused() {
    let h = harness();
    let page = h.cookbook.change_url("sdk", &form(&[("url", "")]));
    assert!(page.contains("url/sdk needs more input parameters"));
    assert_eq!(h.cookbook.sdk_url(), "http://sdk:8080");
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[test]
fn unknown_routes_are_not_handled() {
    let h = harness();
    assert!(h.cookbook.handle("users-login", None, &FormData::default()).is_none());
    // only route-session operations take a suffix
    assert!(
        h.cookbook
            .handle("finance-list-accounts", Some("S1"), &FormData::default())
            .is_none()
    );
}

#[test]
fn web_router_statuses() {
    let h = harness();
    assert_eq!(web::route(&h.cookbook, &Method::Get, "/", "").status, 200);
    assert_eq!(
        web::route(&h.cookbook, &Method::Post, "/nope", "").status,
        404
    );
    assert_eq!(
        web::route(&h.cookbook, &Method::Post, "/url/elsewhere/x", "").status,
        404
    );

    let page = web::route(
        &h.cookbook,
        &Method::Post,
        "/ledger-get-blockhash",
        "height=5&action=API",
    );
    assert_eq!(page.status, 200);
    assert_eq!(
        h.fetch.calls(),
        ["http://api:8080/ledger/get/blockhash?height=5"]
    );

    // a failed operation is still a 200 page
    let page = web::route(
        &h.cookbook,
        &Method::Post,
        "/users-list-items/S404",
        "genesis=G&page=0&limit=1&action=SDK",
    );
    assert_eq!(page.status, 200);
    assert!(page.html.contains("Login session S404 does not exist"));
}
