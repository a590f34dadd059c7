use std::error::Error as _;
use std::time::{Duration, Instant};

use reqwest::{redirect, Client, NoProxy, Proxy, StatusCode};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::config::Config;
use crate::message::Msg;

#[derive(Debug, Clone)]
pub struct RequestResult {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub duration: Duration,
}

impl RequestResult {
    pub fn status_line(&self) -> String {
        format!(
            "{} {}",
            self.status.as_str(),
            self.status.canonical_reason().unwrap_or("")
        )
        .trim_end()
        .to_string()
    }

    /// Duration on the first line, then the body. Non-UTF-8 bytes are
    /// replaced rather than rejected.
    pub fn display_text(&self) -> String {
        format!("{:?}\n{}", self.duration, String::from_utf8_lossy(&self.body))
    }
}

/// Both variants display as the bare failure description.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Body(String),
}

pub fn build_client(config: &Config) -> reqwest::Result<Client> {
    let mut builder = Client::builder();
    if config.http.timeout > 0 {
        builder = builder.timeout(Duration::from_secs(config.http.timeout));
    }
    let policy = if config.http.follow_redirects {
        redirect::Policy::limited(config.http.max_redirects as usize)
    } else {
        redirect::Policy::none()
    };
    builder = builder.redirect(policy);

    if let Some(url) = &config.proxy.url {
        let proxy = Proxy::all(url)?.no_proxy(
            config
                .proxy
                .no_proxy
                .as_deref()
                .and_then(NoProxy::from_string),
        );
        builder = builder.proxy(proxy);
    }
    builder.build()
}

/// Issues a GET and drains the whole body. The duration covers the request
/// up to the response head, not the body transfer.
pub async fn fetch(client: &Client, url: &str) -> Result<RequestResult, FetchError> {
    debug!(url, "sending GET request");
    let start = Instant::now();
    let response = client.get(url).send().await;
    let duration = start.elapsed();

    let response = response.map_err(|err| {
        let description = describe_error(&err);
        error!(url, error = %description, "error sending GET request");
        FetchError::Transport(description)
    })?;

    let status = response.status();
    debug!(url, %status, ?duration, "response received");

    let body = response.bytes().await.map_err(|err| {
        let description = describe_error(&err);
        error!(url, error = %description, "error reading response body");
        FetchError::Body(description)
    })?;

    Ok(RequestResult {
        status,
        body: body.to_vec(),
        duration,
    })
}

/// Runs [`fetch`] off the event loop and feeds the outcome back as a message.
pub fn dispatch(client: Client, url: String, tx: mpsc::Sender<Msg>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let msg = match fetch(&client, &url).await {
            Ok(result) => Msg::RequestSucceeded(result),
            Err(err) => Msg::RequestFailed(err),
        };
        if tx.send(msg).await.is_err() {
            debug!(url, "event loop gone, dropping response");
        }
    })
}

/// reqwest keeps the useful part (refused, dns, ...) in the source chain.
fn describe_error(err: &reqwest::Error) -> String {
    let mut description = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !description.contains(&text) {
            description.push_str(": ");
            description.push_str(&text);
        }
        source = cause.source();
    }
    description
}
