use async_trait::async_trait;
use reqwest::{
    Client,
    header::{ACCEPT, ACCEPT_CHARSET, HeaderMap, HeaderValue},
};
use std::fmt::Debug;

/// Error raised when no HTTP response was received at all.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Status and body of a received HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    /// Reply with the given status and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }
}

/// Issues a single GET request.
///
/// Any status code counts as a reply; only failures to get a response at all
/// are errors.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// GET `url` and return whatever the server answered.
    async fn get(&self, url: &str) -> Result<HttpReply, TransportError>;
}

/// [`Transport`] over a reqwest client that asks for UTF-8 JSON.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Build the client with `Accept` and `Accept-Charset` set on every request.
    pub fn new() -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_CHARSET, HeaderValue::from_static("UTF-8"));

        let http = Client::builder().default_headers(headers).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpReply, TransportError> {
        // Request URLs carry the API key; keep it out of error messages.
        let res = self.http.get(url).send().await.map_err(reqwest::Error::without_url)?;

        let status = res.status().as_u16();
        let body = res.text().await.map_err(reqwest::Error::without_url)?;

        Ok(HttpReply { status, body })
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::{collections::VecDeque, sync::Mutex};

    /// Replays canned replies in order and records every requested URL.
    #[derive(Debug, Default)]
    pub struct FakeTransport {
        replies: Mutex<VecDeque<Result<HttpReply, String>>>,
        requested: Mutex<Vec<String>>,
    }

    impl FakeTransport {
        pub fn replying(status: u16, body: &str) -> Self {
            let fake = Self::default();
            fake.push(Ok(HttpReply::new(status, body)));
            fake
        }

        pub fn failing(reason: &str) -> Self {
            let fake = Self::default();
            fake.push(Err(reason.to_string()));
            fake
        }

        pub fn push(&self, reply: Result<HttpReply, String>) {
            self.replies.lock().unwrap().push_back(reply);
        }

        pub fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn get(&self, url: &str) -> Result<HttpReply, TransportError> {
            self.requested.lock().unwrap().push(url.to_string());

            match self.replies.lock().unwrap().pop_front() {
                Some(Ok(reply)) => Ok(reply),
                Some(Err(reason)) => Err(reason.into()),
                None => Err("no canned reply left".into()),
            }
        }
    }
}
