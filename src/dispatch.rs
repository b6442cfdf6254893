//! The server context and the per-operation dispatcher.
//!
//! [`Cookbook`] owns all state shared between requests: the node URLs, the
//! session registry, and the last logged-in user per transport. Every form
//! submission runs the same sequence:
//!
//! 1. check the operation's required fields, stopping with a local error if
//!    any is empty (no remote call is made);
//! 2. pick the transport from the submit button;
//! 3. call the node directly, or through a client handle that is either
//!    fresh or looked up by session id;
//! 4. render the answer into a full page.
//!
//! Every outcome is a page. Nothing here fails at the HTTP level.
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

use crate::catalog::{self, Access, Operation, Param};
use crate::config::CookbookConfig;
use crate::error::DispatchError;
use crate::form::FormData;
use crate::render::{self, Frame, Notice};
use crate::session::{SessionRegistry, SharedHandle};
use crate::transport::api::ApiTransport;
use crate::transport::sdk::{Credentials, HandleFactory, SdkFactory};
use crate::transport::{HttpFetch, NodeUrls, Transport, UreqFetch, is_error};

/// Last user that logged in successfully, per transport.
#[derive(Debug, Default)]
struct LastLogin {
    sdk: Option<String>,
    api: Option<String>,
}

/// What a dispatched operation leaves on the page.
struct Outcome {
    notice: Notice,
    session: String,
    genesis: String,
}

impl Outcome {
    fn new(notice: Notice, session: &str, genesis: &str) -> Self {
        Self {
            notice,
            session: session.to_string(),
            genesis: genesis.to_string(),
        }
    }

    fn error(err: &DispatchError, session: &str, genesis: &str) -> Self {
        Self::new(Notice::error(err), session, genesis)
    }
}

pub struct Cookbook {
    hostname: String,
    urls: Arc<NodeUrls>,
    api: ApiTransport,
    factory: Box<dyn HandleFactory>,
    sessions: Mutex<SessionRegistry>,
    last_login: Mutex<LastLogin>,
}

impl Cookbook {
    /// Context wired to the real node over HTTP.
    pub fn new(config: &CookbookConfig) -> Self {
        let urls = Arc::new(NodeUrls::from_config(&config.nodes));
        let fetch: Arc<dyn HttpFetch> = Arc::new(UreqFetch::new());
        let factory = SdkFactory::new(Arc::clone(&fetch), Arc::clone(&urls));
        Self::with_parts(
            urls,
            fetch,
            Box::new(factory),
            SessionRegistry::from_config(&config.sessions),
        )
    }

    /// Context with caller-supplied collaborators.
    pub fn with_parts(
        urls: Arc<NodeUrls>,
        fetch: Arc<dyn HttpFetch>,
        factory: Box<dyn HandleFactory>,
        sessions: SessionRegistry,
    ) -> Self {
        let hostname = gethostname::gethostname().to_string_lossy().into_owned();
        Self {
            hostname,
            api: ApiTransport::new(fetch, Arc::clone(&urls)),
            urls,
            factory,
            sessions: Mutex::new(sessions),
            last_login: Mutex::new(LastLogin::default()),
        }
    }

    // -----------------------------------------------------------------------
    // Pages
    // -----------------------------------------------------------------------

    /// The empty landing page.
    pub fn landing(&self) -> String {
        render::page(&self.frame(), None, "", "")
    }

    /// Handle `POST /url/<target>`: point one transport at a new node.
    pub fn change_url(&self, target: &str, form: &FormData) -> String {
        let Some(transport) = Transport::from_url_target(target) else {
            let err = DispatchError::UnknownUrlTarget(target.to_string());
            return render::page(&self.frame(), Some(&Notice::error(&err)), "", "");
        };
        let url = form.get("url").trim();
        if url.is_empty() {
            let err = DispatchError::MissingInput {
                operation: transport.url_form(),
            };
            return render::page(&self.frame(), Some(&Notice::error(&err)), "", "");
        }
        self.urls.set(transport, url);
        log::info!("{transport} node URL changed to {url}");
        self.landing()
    }

    /// Handle `POST /<route>` or `POST /<route>/<suffix>`.
    ///
    /// Returns `None` when no operation answers at that path.
    pub fn handle(&self, route: &str, suffix: Option<&str>, form: &FormData) -> Option<String> {
        let op = catalog::find(route)?;
        if suffix.is_some() && !op.takes_route_session() {
            return None;
        }
        let outcome = self.execute(op, suffix.unwrap_or_default(), form);
        Some(render::page(
            &self.frame(),
            Some(&outcome.notice),
            &outcome.session,
            &outcome.genesis,
        ))
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    fn execute(&self, op: &'static Operation, route_session: &str, form: &FormData) -> Outcome {
        let session = if op.takes_route_session() {
            route_session
        } else {
            form.get("session")
        };
        let echoed_genesis = if op.echoes_genesis() {
            form.get("genesis")
        } else {
            ""
        };

        if op.required.iter().any(|name| form.get(name).is_empty()) {
            let err = DispatchError::MissingInput {
                operation: op.remote,
            };
            return Outcome::error(&err, session, echoed_genesis);
        }

        let transport = Transport::from_action(form.get("action"));
        log::debug!("{} via {transport}", op.remote);
        match transport {
            Transport::Sdk => self.via_sdk(op, session, echoed_genesis, form),
            Transport::Api => self.via_api(op, session, echoed_genesis, form),
        }
    }

    fn via_sdk(
        &self,
        op: &'static Operation,
        session: &str,
        echoed_genesis: &str,
        form: &FormData,
    ) -> Outcome {
        let args: Vec<&str> = op.sdk.args.iter().map(|name| form.get(name)).collect();

        match op.access {
            Access::Anonymous => {
                let mut handle = self.factory.open(Credentials::default());
                let answer = handle.call(op.sdk.method, &args);
                Outcome::new(self.notice(op, &answer), "", "")
            }
            Access::Credentials => {
                let mut handle = self.factory.open(credentials(form));
                let answer = handle.call(op.sdk.method, &args);
                Outcome::new(self.notice(op, &answer), "", "")
            }
            Access::Login => self.login_via_sdk(op, form, &args),
            Access::SessionField | Access::RouteSession => {
                let resolved = self.lock_sessions().resolve(session);
                let found = match resolved {
                    Ok(found) => found,
                    Err(err) => return Outcome::error(&err, "", ""),
                };
                let (answer, handle_genesis) = {
                    let mut handle = found.handle.lock().unwrap_or_else(PoisonError::into_inner);
                    let answer = handle.call(op.sdk.method, &args);
                    let genesis = handle.genesis_id().to_string();
                    (answer, genesis)
                };
                let genesis = if op.echoes_genesis() {
                    echoed_genesis
                } else {
                    handle_genesis.as_str()
                };
                Outcome::new(self.notice(op, &answer), session, genesis)
            }
        }
    }

    fn login_via_sdk(&self, op: &'static Operation, form: &FormData, args: &[&str]) -> Outcome {
        let mut handle = self.factory.open(credentials(form));
        let answer = handle.call(op.sdk.method, args);
        let session = handle.session_id().to_string();
        let genesis = handle.genesis_id().to_string();

        if !is_error(&answer) && !session.is_empty() {
            let shared: SharedHandle = Arc::new(Mutex::new(handle));
            self.lock_sessions().register(&session, &genesis, shared);
            self.lock_last_login().sdk = Some(form.get("username").to_string());
            log::info!(
                "SDK login for {} registered session {session} ({} open)",
                form.get("username"),
                self.session_count()
            );
        } else {
            log::info!("SDK login for {} failed", form.get("username"));
        }
        Outcome::new(self.notice(op, &answer), &session, &genesis)
    }

    fn via_api(
        &self,
        op: &'static Operation,
        session: &str,
        echoed_genesis: &str,
        form: &FormData,
    ) -> Outcome {
        let query: Vec<(&str, &str)> = op
            .params
            .iter()
            .map(|param| match param {
                Param::Input { name, .. } => (*name, form.get(name)),
                Param::Fixed { name, value } => (*name, *value),
            })
            .collect();
        let answer = self.api.call(op.remote, &query);

        if op.access == Access::Login {
            let session = answer["result"]["session"].as_str().unwrap_or_default();
            let genesis = answer["result"]["genesis"].as_str().unwrap_or_default();
            if !is_error(&answer) {
                self.lock_last_login().api = Some(form.get("username").to_string());
            }
            return Outcome::new(self.notice(op, &answer), session, genesis);
        }

        let session = match op.access {
            Access::Anonymous | Access::Credentials => "",
            _ => session,
        };
        Outcome::new(self.notice(op, &answer), session, echoed_genesis)
    }

    fn notice(&self, op: &Operation, answer: &Value) -> Notice {
        let text = if op.listing {
            render::render_list(answer)
        } else {
            render::render_json(answer)
        };
        Notice::result(text)
    }

    // -----------------------------------------------------------------------
    // State
    // -----------------------------------------------------------------------

    fn frame(&self) -> Frame {
        Frame {
            hostname: self.hostname.clone(),
            sdk_user: self.last_sdk_user(),
            api_user: self.last_api_user(),
            sdk_url: self.sdk_url(),
            api_url: self.api_url(),
        }
    }

    fn lock_sessions(&self) -> std::sync::MutexGuard<'_, SessionRegistry> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_last_login(&self) -> std::sync::MutexGuard<'_, LastLogin> {
        self.last_login.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn last_sdk_user(&self) -> Option<String> {
        self.lock_last_login().sdk.clone()
    }

    pub fn last_api_user(&self) -> Option<String> {
        self.lock_last_login().api.clone()
    }

    pub fn session_count(&self) -> usize {
        self.lock_sessions().len()
    }

    pub fn api_url(&self) -> String {
        self.urls.get(Transport::Api)
    }

    pub fn sdk_url(&self) -> String {
        self.urls.get(Transport::Sdk)
    }
}

fn credentials(form: &FormData) -> Credentials {
    Credentials {
        username: form.get("username").to_string(),
        password: form.get("password").to_string(),
        pin: form.get("pin").to_string(),
    }
}
