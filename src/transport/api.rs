//! Direct transport: one blocking GET per operation against the API node.
use std::sync::Arc;

use serde_json::{Value, json};

use super::{HttpFetch, NodeUrls, Transport, endpoint, fetch_json};

/// Calls `<api_url>/<path>?<query>` and returns the node's JSON answer.
pub struct ApiTransport {
    fetch: Arc<dyn HttpFetch>,
    urls: Arc<NodeUrls>,
}

impl ApiTransport {
    pub fn new(fetch: Arc<dyn HttpFetch>, urls: Arc<NodeUrls>) -> Self {
        Self { fetch, urls }
    }

    /// Issue the call. The base URL is read at call time so a change made
    /// from the landing page applies to the next submission.
    pub fn call(&self, path: &str, query: &[(&str, &str)]) -> Value {
        let base = self.urls.get(Transport::Api);
        match endpoint(&base, path, query) {
            Ok(url) => fetch_json(self.fetch.as_ref(), &url),
            Err(e) => json!({ "error": format!("{e:#}") }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use anyhow::Result;
    use url::Url;

    use super::*;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl HttpFetch for Recorder {
        fn get(&self, url: &Url) -> Result<String> {
            self.0.lock().unwrap().push(url.to_string());
            Ok(r#"{"result":"ok"}"#.to_string())
        }
    }

    #[test]
    fn call_uses_current_api_url() {
        let fetch = Arc::new(Recorder::default());
        let urls = Arc::new(NodeUrls::new("http://api:8080", "http://sdk:8080"));
        let api = ApiTransport::new(fetch.clone(), urls.clone());

        api.call("ledger/get/blockhash", &[("height", "5")]);
        urls.set(Transport::Api, "http://other:9336");
        api.call("ledger/get/blockhash", &[("height", "6")]);

        let seen = fetch.0.lock().unwrap();
        assert_eq!(seen[0], "http://api:8080/ledger/get/blockhash?height=5");
        assert_eq!(seen[1], "http://other:9336/ledger/get/blockhash?height=6");
    }

    #[test]
    fn bad_base_url_is_rendered_not_fetched() {
        let fetch = Arc::new(Recorder::default());
        let urls = Arc::new(NodeUrls::new("nonsense", "http://sdk:8080"));
        let api = ApiTransport::new(fetch.clone(), urls);

        let value = api.call("system/get/info", &[]);
        assert!(value["error"].as_str().unwrap().contains("invalid node URL"));
        assert!(fetch.0.lock().unwrap().is_empty());
    }
}
