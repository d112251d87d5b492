//! Blocking REST client for a hosted realtime database.
//!
//! Speaks the Firebase-style REST dialect: every path maps to
//! `<base>/<path>.json`, `GET` reads, `PUT` overwrites, `DELETE` removes, and
//! an optional `auth` query parameter carries the access token.
//!
//! Subscriptions are served by re-reading each subscribed path after every
//! write made through this client, and on demand through [`RemoteDatabase::poll`].

use super::{paths_overlap, segments, Listener, RemoteDatabase};
use crate::error::{RackzError, Result};
use reqwest::blocking::{Client, Response};
use reqwest::Url;
use serde_json::Value;
use std::cell::RefCell;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

struct Subscriber {
    path: String,
    listener: Listener,
}

pub struct RestDatabase {
    client: Client,
    base_url: Url,
    auth: Option<String>,
    subscribers: RefCell<Vec<Subscriber>>,
}

impl RestDatabase {
    pub fn new(base_url: &str, auth: Option<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RackzError::Remote(format!("invalid database url {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(RackzError::Remote(format!(
                "database url cannot be a base: {}",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RackzError::Remote(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            auth,
            subscribers: RefCell::new(Vec::new()),
        })
    }

    /// Builds `<base>/<segments...>.json[?auth=<token>]`.
    pub fn url_for(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        {
            let segs = segments(path);
            // cannot_be_a_base was rejected in `new`
            if let Ok(mut parts) = url.path_segments_mut() {
                parts.pop_if_empty();
                match segs.split_last() {
                    None => {
                        parts.push(".json");
                    }
                    Some((last, parents)) => {
                        parts.extend(parents.iter());
                        parts.push(&format!("{}.json", last));
                    }
                }
            }
        }
        if let Some(token) = &self.auth {
            url.query_pairs_mut().append_pair("auth", token);
        }
        url
    }

    fn notify(&self, written: &str) {
        let mut subscribers = self.subscribers.take();
        for sub in subscribers.iter_mut() {
            if !paths_overlap(&sub.path, written) {
                continue;
            }
            match self.get(&sub.path) {
                Ok(value) => (sub.listener)(&value),
                Err(e) => warn!(path = %sub.path, error = %e, "subscription refresh failed"),
            }
        }
        let mut current = self.subscribers.borrow_mut();
        subscribers.append(&mut current);
        *current = subscribers;
    }
}

fn check(response: reqwest::Result<Response>) -> Result<Response> {
    let response = response.map_err(|e| RackzError::Remote(e.to_string()))?;
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(RackzError::Remote(format!("HTTP {}: {}", status, message)));
    }
    Ok(response)
}

impl RemoteDatabase for RestDatabase {
    fn get(&self, path: &str) -> Result<Value> {
        debug!(path, "GET");
        let response = check(self.client.get(self.url_for(path)).send())?;
        response
            .json::<Value>()
            .map_err(|e| RackzError::Remote(e.to_string()))
    }

    fn set(&self, path: &str, value: &Value) -> Result<()> {
        debug!(path, "PUT");
        check(self.client.put(self.url_for(path)).json(value).send())?;
        self.notify(path);
        Ok(())
    }

    fn remove(&self, path: &str) -> Result<()> {
        debug!(path, "DELETE");
        check(self.client.delete(self.url_for(path)).send())?;
        self.notify(path);
        Ok(())
    }

    fn subscribe(&self, path: &str, mut listener: Listener) -> Result<()> {
        match self.get(path) {
            Ok(value) => listener(&value),
            Err(e) => warn!(path, error = %e, "initial subscription read failed"),
        }
        self.subscribers.borrow_mut().push(Subscriber {
            path: path.to_string(),
            listener,
        });
        Ok(())
    }

    /// Re-reads every subscribed path and notifies its listener.
    fn poll(&self) -> Result<()> {
        self.notify("");
        Ok(())
    }
}
