//! HTTP client with base URL, default headers, and retries.

use crate::{
    FetchError, HttpTransport, Method, RequestBuilder, Response, RetryPolicy, TimeoutConfig,
    Transport,
};
use fruitpack_observability::RequestTimer;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// HTTP client for the Fruit-Pack backend.
///
/// Relative URLs are joined onto the base URL; absolute ones pass through.
pub struct FetchClient {
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
    transport: Box<dyn Transport>,
    retry: RetryPolicy,
}

impl fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchClient")
            .field("base_url", &self.base_url)
            .field("default_headers", &self.default_headers)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl FetchClient {
    /// Create a client over the reqwest transport.
    pub fn new(timeouts: TimeoutConfig) -> Result<Self, FetchError> {
        Ok(Self::with_transport(HttpTransport::new(timeouts)?))
    }

    /// Create a client over any transport.
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            base_url: None,
            default_headers: HashMap::new(),
            transport: Box::new(transport),
            retry: RetryPolicy::default(),
        }
    }

    /// Prepend `base_url` to relative request URLs.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Resolve a URL against the base URL.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        match &self.base_url {
            Some(base) if path.starts_with('/') => format!("{base}{path}"),
            Some(base) => format!("{base}/{path}"),
            None => path.to_string(),
        }
    }

    /// Create a GET request.
    pub fn get(&self, url: impl AsRef<str>) -> ClientRequestBuilder<'_> {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl AsRef<str>) -> ClientRequestBuilder<'_> {
        self.request(Method::Post, url)
    }

    /// Create a PUT request.
    pub fn put(&self, url: impl AsRef<str>) -> ClientRequestBuilder<'_> {
        self.request(Method::Put, url)
    }

    /// Create a PATCH request.
    pub fn patch(&self, url: impl AsRef<str>) -> ClientRequestBuilder<'_> {
        self.request(Method::Patch, url)
    }

    /// Create a DELETE request.
    pub fn delete(&self, url: impl AsRef<str>) -> ClientRequestBuilder<'_> {
        self.request(Method::Delete, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl AsRef<str>) -> ClientRequestBuilder<'_> {
        let path = url.as_ref().to_string();
        let builder = RequestBuilder::new(method, self.url(&path)).headers(
            self.default_headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        ClientRequestBuilder {
            client: self,
            path,
            builder,
        }
    }

    fn execute(&self, path: &str, builder: RequestBuilder) -> Result<Response, FetchError> {
        let request = builder.build();
        let mut attempt = 0;

        loop {
            let timer = RequestTimer::start(request.method.as_str(), path).with_attempt(attempt);
            match self.transport.execute(&request) {
                Ok(response) => {
                    timer.finish(response.status);
                    if !self
                        .retry
                        .should_retry_status(request.method, response.status, attempt)
                    {
                        return Ok(response);
                    }
                    tracing::warn!(
                        method = %request.method,
                        path,
                        status = response.status,
                        attempt,
                        "retrying request"
                    );
                }
                Err(err) => {
                    timer.fail(&err);
                    if !self.retry.should_retry_error(request.method, &err, attempt) {
                        return Err(err);
                    }
                    tracing::warn!(
                        method = %request.method,
                        path,
                        error = %err,
                        attempt,
                        "retrying request"
                    );
                }
            }

            let delay = self.retry.delay(attempt);
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
            attempt += 1;
        }
    }
}

/// A request builder bound to a client.
#[derive(Debug)]
pub struct ClientRequestBuilder<'a> {
    client: &'a FetchClient,
    path: String,
    builder: RequestBuilder,
}

impl<'a> ClientRequestBuilder<'a> {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Set the request body as raw bytes.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.builder = self.builder.body(body);
        self
    }

    /// Set the request body as a string.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.builder = self.builder.text(text);
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    /// Set the request body as an urlencoded form.
    pub fn form<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.form(value)?;
        Ok(self)
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_auth(token);
        self
    }

    pub fn accept(mut self, content_type: impl Into<String>) -> Self {
        self.builder = self.builder.accept(content_type);
        self
    }

    /// Send the request and return the response, whatever its status.
    pub fn send(self) -> Result<Response, FetchError> {
        self.client.execute(&self.path, self.builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Request;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Scripted {
        replies: Rc<RefCell<VecDeque<Result<Response, FetchError>>>>,
        seen: Rc<RefCell<Vec<Request>>>,
    }

    impl Scripted {
        fn reply(self, reply: Result<Response, FetchError>) -> Self {
            self.replies.borrow_mut().push_back(reply);
            self
        }
    }

    impl Transport for Scripted {
        fn execute(&self, request: &Request) -> Result<Response, FetchError> {
            self.seen.borrow_mut().push(request.clone());
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(Response::json_body(200, "{}")))
        }
    }

    fn no_wait(retries: u32) -> RetryPolicy {
        RetryPolicy::new(retries).with_backoff(crate::BackoffStrategy::None)
    }

    #[test]
    fn test_url_joining() {
        let client = FetchClient::with_transport(Scripted::default())
            .with_base_url("http://api.local:8000/");
        assert_eq!(client.url("/products/"), "http://api.local:8000/products/");
        assert_eq!(client.url("categories/"), "http://api.local:8000/categories/");
        assert_eq!(client.url("https://cdn/x.png"), "https://cdn/x.png");
    }

    #[test]
    fn test_default_headers_applied() {
        let transport = Scripted::default();
        let client = FetchClient::with_transport(transport.clone())
            .with_base_url("http://api")
            .with_default_header("Accept", "application/json");
        client.get("/products/").send().unwrap();

        let seen = transport.seen.borrow();
        assert_eq!(seen[0].url, "http://api/products/");
        assert_eq!(seen[0].header("accept"), Some("application/json"));
    }

    #[test]
    fn test_get_retries_server_error() {
        let transport = Scripted::default()
            .reply(Ok(Response::json_body(503, "{}")))
            .reply(Err(FetchError::Timeout))
            .reply(Ok(Response::json_body(200, "[]")));
        let client = FetchClient::with_transport(transport.clone()).with_retry(no_wait(2));

        let resp = client.get("http://api/products/").send().unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(transport.seen.borrow().len(), 3);
    }

    #[test]
    fn test_retries_exhausted_returns_last_response() {
        let transport = Scripted::default()
            .reply(Ok(Response::json_body(500, "{}")))
            .reply(Ok(Response::json_body(502, "{}")));
        let client = FetchClient::with_transport(transport.clone()).with_retry(no_wait(1));

        let resp = client.get("http://api/orders/1").send().unwrap();
        assert_eq!(resp.status, 502);
        assert_eq!(transport.seen.borrow().len(), 2);
    }

    #[test]
    fn test_post_sent_once() {
        let transport = Scripted::default().reply(Err(FetchError::Timeout));
        let client = FetchClient::with_transport(transport.clone()).with_retry(no_wait(3));

        let err = client.post("http://api/cart/checkout/").send().unwrap_err();
        assert!(matches!(err, FetchError::Timeout));
        assert_eq!(transport.seen.borrow().len(), 1);
    }
}
