//! Client library transport.
//!
//! A [`ClientHandle`] is the cookbook's view of a Nexus SDK object: it is
//! built from credentials, exposes one named method per remote operation, and
//! remembers the session and genesis ids handed back by a successful login.
//! [`SdkClient`] is the bundled implementation; it knows, per method, which
//! remote path to hit and which credential material to attach.
use std::sync::Arc;

use serde_json::{Value, json};

use super::{HttpFetch, NodeUrls, Transport, endpoint, fetch_json, is_error};

/// Method name of the login call; its answer populates the handle's ids.
pub const LOGIN_METHOD: &str = "nexus_users_login_user";

/// Identity a handle is opened with. All empty for anonymous handles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub pin: String,
}

/// A live client library object.
pub trait ClientHandle: Send {
    /// Invoke `method` with positional `args`. Remote failures come back as
    /// an `{"error": ...}` value, never as a Rust error.
    fn call(&mut self, method: &str, args: &[&str]) -> Value;

    /// Session id from the last successful login, or empty.
    fn session_id(&self) -> &str;

    /// Genesis id from the last successful login, or empty.
    fn genesis_id(&self) -> &str;
}

/// Opens client handles.
pub trait HandleFactory: Send + Sync {
    fn open(&self, credentials: Credentials) -> Box<dyn ClientHandle>;
}

// ---------------------------------------------------------------------------
// Method table
// ---------------------------------------------------------------------------

/// Credential material a method attaches ahead of its own parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    None,
    /// `username`, `password`, `pin`.
    Credentials,
    /// `session`.
    Session,
    /// `pin`, `session`.
    SessionPin,
    /// `genesis`.
    Genesis,
}

#[derive(Debug)]
struct Method {
    name: &'static str,
    path: &'static str,
    auth: Auth,
    /// Query names for the positional arguments, in order.
    params: &'static [&'static str],
    fixed: &'static [(&'static str, &'static str)],
}

const fn m(
    name: &'static str,
    path: &'static str,
    auth: Auth,
    params: &'static [&'static str],
) -> Method {
    Method {
        name,
        path,
        auth,
        params,
        fixed: &[],
    }
}

const fn mf(
    name: &'static str,
    path: &'static str,
    auth: Auth,
    params: &'static [&'static str],
    fixed: &'static [(&'static str, &'static str)],
) -> Method {
    Method {
        name,
        path,
        auth,
        params,
        fixed,
    }
}

static METHODS: &[Method] = &[
    m("nexus_system_get_info", "system/get/info", Auth::None, &[]),
    m("nexus_system_list_peers", "system/list/peers", Auth::None, &[]),
    m("nexus_system_list_lisp_eids", "system/list/lisp-eids", Auth::None, &[]),
    // users
    m("nexus_users_create_user", "users/create/user", Auth::Credentials, &[]),
    m(LOGIN_METHOD, "users/login/user", Auth::Credentials, &[]),
    m("nexus_users_logout_user", "users/logout/user", Auth::Session, &[]),
    m("nexus_users_lock_user", "users/lock/user", Auth::Session, &[]),
    m("nexus_users_unlock_user", "users/unlock/user", Auth::SessionPin, &[]),
    m(
        "nexus_users_list_transactions_by_genesis",
        "users/list/transactions",
        Auth::Genesis,
        &["page", "limit", "verbose"],
    ),
    m(
        "nexus_users_list_notifications_by_genesis",
        "users/list/notifications",
        Auth::Genesis,
        &["page", "limit"],
    ),
    m(
        "nexus_users_list_items_by_genesis",
        "users/list/items",
        Auth::Genesis,
        &["page", "limit"],
    ),
    m(
        "nexus_users_list_assets_by_genesis",
        "users/list/assets",
        Auth::Genesis,
        &["page", "limit"],
    ),
    m(
        "nexus_users_list_tokens_by_genesis",
        "users/list/tokens",
        Auth::Genesis,
        &["page", "limit"],
    ),
    m(
        "nexus_users_list_accounts_by_genesis",
        "users/list/accounts",
        Auth::Genesis,
        &["page", "limit"],
    ),
    // ledger
    m(
        "nexus_ledger_get_blockhash",
        "ledger/get/blockhash",
        Auth::None,
        &["height"],
    ),
    m(
        "nexus_ledger_get_block_by_height",
        "ledger/get/block",
        Auth::None,
        &["height", "verbose"],
    ),
    m(
        "nexus_ledger_get_block_by_hash",
        "ledger/get/block",
        Auth::None,
        &["hash", "verbose"],
    ),
    m(
        "nexus_ledger_get_transaction",
        "ledger/get/transaction",
        Auth::None,
        &["hash", "verbose"],
    ),
    m(
        "nexus_ledger_submit_transaction",
        "ledger/submit/transaction",
        Auth::None,
        &["data"],
    ),
    m(
        "nexus_ledger_list_blocks_by_height",
        "ledger/list/blocks",
        Auth::None,
        &["height", "limit", "verbose"],
    ),
    m(
        "nexus_ledger_list_blocks_by_hash",
        "ledger/list/blocks",
        Auth::None,
        &["hash", "limit", "verbose"],
    ),
    // tokens
    m(
        "nexus_tokens_create_token",
        "tokens/create/token",
        Auth::SessionPin,
        &["name", "supply", "digits"],
    ),
    m(
        "nexus_tokens_create_account",
        "tokens/create/account",
        Auth::SessionPin,
        &["name", "token_name"],
    ),
    m(
        "nexus_tokens_get_token_by_name",
        "tokens/get/token",
        Auth::Session,
        &["name"],
    ),
    m(
        "nexus_tokens_get_token_by_address",
        "tokens/get/token",
        Auth::Session,
        &["address"],
    ),
    m(
        "nexus_tokens_get_account_by_name",
        "tokens/get/account",
        Auth::Session,
        &["name"],
    ),
    m(
        "nexus_tokens_get_account_by_address",
        "tokens/get/account",
        Auth::Session,
        &["address"],
    ),
    m(
        "nexus_tokens_debit_token_by_name",
        "tokens/debit/token",
        Auth::SessionPin,
        &["name", "name_to", "amount"],
    ),
    m(
        "nexus_tokens_credit_token_by_name",
        "tokens/credit/token",
        Auth::SessionPin,
        &["name", "amount", "txid"],
    ),
    m(
        "nexus_tokens_debit_account_by_name",
        "tokens/debit/account",
        Auth::SessionPin,
        &["name", "name_to", "amount"],
    ),
    m(
        "nexus_tokens_credit_account_by_name",
        "tokens/credit/account",
        Auth::SessionPin,
        &["name", "amount", "txid"],
    ),
    // assets
    mf(
        "nexus_assets_create_asset",
        "assets/create/asset",
        Auth::SessionPin,
        &["name", "data"],
        &[("format", "raw")],
    ),
    m(
        "nexus_assets_get_asset_by_name",
        "assets/get/asset",
        Auth::Session,
        &["name"],
    ),
    m(
        "nexus_assets_get_asset_by_address",
        "assets/get/asset",
        Auth::Session,
        &["address"],
    ),
    m(
        "nexus_assets_update_asset_by_address",
        "assets/update/asset",
        Auth::SessionPin,
        &["address", "data"],
    ),
    m(
        "nexus_assets_transfer_asset_by_address",
        "assets/transfer/asset",
        Auth::SessionPin,
        &["address", "destination"],
    ),
    m(
        "nexus_assets_claim_asset",
        "assets/claim/asset",
        Auth::SessionPin,
        &["txid"],
    ),
    m(
        "nexus_assets_tokenize_asset_by_name",
        "assets/tokenize/asset",
        Auth::SessionPin,
        &["asset_name", "token_name"],
    ),
    m(
        "nexus_assets_list_asset_history_by_name",
        "assets/list/asset/history",
        Auth::Session,
        &["name"],
    ),
    m(
        "nexus_assets_list_asset_history_by_address",
        "assets/list/asset/history",
        Auth::Session,
        &["address"],
    ),
    // supply
    m(
        "nexus_supply_create_item",
        "supply/create/item",
        Auth::SessionPin,
        &["name", "data"],
    ),
    m(
        "nexus_supply_get_item_by_name",
        "supply/get/item",
        Auth::Session,
        &["name"],
    ),
    m(
        "nexus_supply_get_item_by_address",
        "supply/get/item",
        Auth::Session,
        &["address"],
    ),
    m(
        "nexus_supply_update_item_by_address",
        "supply/update/item",
        Auth::SessionPin,
        &["address", "data"],
    ),
    m(
        "nexus_supply_transfer_item_by_address",
        "supply/transfer/item",
        Auth::SessionPin,
        &["address", "destination"],
    ),
    m(
        "nexus_supply_claim_item",
        "supply/claim/item",
        Auth::SessionPin,
        &["txid"],
    ),
    m(
        "nexus_supply_list_item_history_by_name",
        "supply/list/item/history",
        Auth::Session,
        &["name"],
    ),
    m(
        "nexus_supply_list_item_history_by_address",
        "supply/list/item/history",
        Auth::Session,
        &["address"],
    ),
    // finance
    m(
        "nexus_finance_create_account",
        "finance/create/account",
        Auth::SessionPin,
        &["name"],
    ),
    m(
        "nexus_finance_get_account_by_name",
        "finance/get/account",
        Auth::Session,
        &["name"],
    ),
    m(
        "nexus_finance_get_account_by_address",
        "finance/get/account",
        Auth::Session,
        &["address"],
    ),
    m(
        "nexus_finance_debit_account_by_name",
        "finance/debit/account",
        Auth::SessionPin,
        &["name_from", "name_to", "amount"],
    ),
    m(
        "nexus_finance_credit_account_by_name",
        "finance/credit/account",
        Auth::SessionPin,
        &["name_to", "amount", "txid"],
    ),
    m(
        "nexus_finance_list_accounts",
        "finance/list/accounts",
        Auth::Session,
        &[],
    ),
    m(
        "nexus_finance_get_stakeinfo",
        "finance/get/stakeinfo",
        Auth::Session,
        &[],
    ),
    m(
        "nexus_finance_set_stake",
        "finance/set/stake",
        Auth::SessionPin,
        &["amount"],
    ),
    // objects
    mf(
        "nexus_objects_create_schema",
        "objects/create/schema",
        Auth::SessionPin,
        &["name", "json"],
        &[("format", "json")],
    ),
    mf(
        "nexus_objects_get_schema_by_name",
        "objects/get/schema",
        Auth::None,
        &["name"],
        &[("format", "json")],
    ),
    mf(
        "nexus_objects_get_schema_by_address",
        "objects/get/schema",
        Auth::None,
        &["address"],
        &[("format", "json")],
    ),
];

fn lookup(name: &str) -> Option<&'static Method> {
    METHODS.iter().find(|m| m.name == name)
}

/// Number of positional arguments `method` takes, or `None` if the client
/// library has no such method.
pub(crate) fn arity(method: &str) -> Option<usize> {
    lookup(method).map(|m| m.params.len())
}

/// Remote path `method` calls.
#[cfg(test)]
fn remote_path(method: &str) -> Option<&'static str> {
    lookup(method).map(|m| m.path)
}

// ---------------------------------------------------------------------------
// SdkClient
// ---------------------------------------------------------------------------

/// HTTP-backed client handle.
///
/// The SDK base URL is looked up on every call, so changing it from the
/// landing page redirects live handles as well as new ones.
pub struct SdkClient {
    fetch: Arc<dyn HttpFetch>,
    urls: Arc<NodeUrls>,
    credentials: Credentials,
    session_id: String,
    genesis_id: String,
}

impl SdkClient {
    pub fn new(fetch: Arc<dyn HttpFetch>, urls: Arc<NodeUrls>, credentials: Credentials) -> Self {
        Self {
            fetch,
            urls,
            credentials,
            session_id: String::new(),
            genesis_id: String::new(),
        }
    }

    fn request(&self, method: &Method, args: &[&str]) -> Value {
        let mut query: Vec<(&str, &str)> = Vec::new();
        match method.auth {
            Auth::None => {}
            Auth::Credentials => {
                query.push(("username", self.credentials.username.as_str()));
                query.push(("password", self.credentials.password.as_str()));
                query.push(("pin", self.credentials.pin.as_str()));
            }
            Auth::Session => query.push(("session", self.session_id.as_str())),
            Auth::SessionPin => {
                query.push(("pin", self.credentials.pin.as_str()));
                query.push(("session", self.session_id.as_str()));
            }
            Auth::Genesis => query.push(("genesis", self.genesis_id.as_str())),
        }
        query.extend(method.params.iter().copied().zip(args.iter().copied()));
        query.extend(method.fixed.iter().copied());

        let base = self.urls.get(Transport::Sdk);
        match endpoint(&base, method.path, &query) {
            Ok(url) => fetch_json(self.fetch.as_ref(), &url),
            Err(e) => json!({ "error": format!("{e:#}") }),
        }
    }
}

impl ClientHandle for SdkClient {
    fn call(&mut self, method: &str, args: &[&str]) -> Value {
        let Some(spec) = lookup(method) else {
            return json!({ "error": format!("client library has no method {method}") });
        };
        if spec.params.len() != args.len() {
            return json!({
                "error": format!(
                    "{method} takes {} arguments, got {}",
                    spec.params.len(),
                    args.len()
                )
            });
        }

        let value = self.request(spec, args);

        if spec.name == LOGIN_METHOD
            && !is_error(&value)
            && let Some(result) = value.get("result")
        {
            self.session_id = result["session"].as_str().unwrap_or_default().to_string();
            self.genesis_id = result["genesis"].as_str().unwrap_or_default().to_string();
        }
        value
    }

    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn genesis_id(&self) -> &str {
        &self.genesis_id
    }
}

/// Opens [`SdkClient`] handles that share one fetcher and the node URLs.
pub struct SdkFactory {
    fetch: Arc<dyn HttpFetch>,
    urls: Arc<NodeUrls>,
}

impl SdkFactory {
    pub fn new(fetch: Arc<dyn HttpFetch>, urls: Arc<NodeUrls>) -> Self {
        Self { fetch, urls }
    }
}

impl HandleFactory for SdkFactory {
    fn open(&self, credentials: Credentials) -> Box<dyn ClientHandle> {
        Box::new(SdkClient::new(
            Arc::clone(&self.fetch),
            Arc::clone(&self.urls),
            credentials,
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::catalog;

    #[test]
    fn method_names_are_unique() {
        let mut seen = HashSet::new();
        for method in METHODS {
            assert!(seen.insert(method.name), "duplicate {}", method.name);
        }
    }

    #[test]
    fn every_operation_maps_to_a_method_with_matching_arity() {
        for op in catalog::all() {
            assert_eq!(
                arity(op.sdk.method),
                Some(op.sdk.args.len()),
                "{} -> {}",
                op.route,
                op.sdk.method
            );
        }
    }

    #[test]
    fn every_operation_hits_the_same_remote_path() {
        for op in catalog::all() {
            assert_eq!(remote_path(op.sdk.method), Some(op.remote), "{}", op.route);
        }
    }

    #[test]
    fn unknown_method_is_an_error_value() {
        let fetch: Arc<dyn HttpFetch> = Arc::new(crate::transport::UreqFetch::new());
        let urls = Arc::new(NodeUrls::new("http://a", "http://b"));
        let mut client = SdkClient::new(fetch, urls, Credentials::default());
        let value = client.call("nexus_nope", &[]);
        assert!(value["error"].as_str().unwrap().contains("nexus_nope"));
    }

    #[test]
    fn wrong_arity_is_an_error_value() {
        let fetch: Arc<dyn HttpFetch> = Arc::new(crate::transport::UreqFetch::new());
        let urls = Arc::new(NodeUrls::new("http://a", "http://b"));
        let mut client = SdkClient::new(fetch, urls, Credentials::default());
        let value = client.call("nexus_ledger_get_blockhash", &[]);
        assert!(value["error"].as_str().unwrap().contains("takes 1 arguments"));
    }
}
