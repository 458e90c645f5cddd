// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! CouchDB client and database handle

use std::sync::Arc;

use bytes::Bytes;
use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use super::config::ClientConfig;
use super::metrics::{ClientMetrics, ExchangeCounters, MetricsReport, MetricsTimer};
use super::queue::{OperationHandle, OperationQueue, PendingOperation, QueueStats};
use crate::error::Result;
use crate::http::InterceptableSession;
use crate::network::{InterceptorChain, RequestLogger, SessionCookieInterceptor, SessionState};
use crate::operations::{
    interpret, CreateDatabase, DeleteAttachment, DeleteDatabase, DeleteDocument, DocumentRevision,
    GetDocument, Operation, OperationResponse, PutAttachment, PutDocument, ReadAttachment,
};

/// CouchDB client
///
/// Cheap to clone; clones share the transport, session cookie, queue and
/// metrics.
///
/// # Example
///
/// ```rust,no_run
/// use cushion::{ClientConfig, CouchClient};
///
/// #[tokio::main]
/// async fn main() -> cushion::Result<()> {
///     let client = CouchClient::with_config(
///         ClientConfig::new("http://localhost:5984").credentials("admin", "secret"),
///     )?;
///
///     let db = client.database("animals");
///     db.create().await?;
///     let rev = db.put_document("aardvark", &serde_json::json!({"legs": 4})).await?;
///     println!("stored {} at {}", rev.id, rev.rev);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct CouchClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    base_url: Url,
    session: InterceptableSession,
    cookie_auth: Option<Arc<SessionCookieInterceptor>>,
    queue: Arc<OperationQueue>,
    metrics: Arc<ClientMetrics>,
}

impl CouchClient {
    /// Client without authentication
    pub fn new(url: &str) -> Result<Self> {
        Self::with_config(ClientConfig::new(url))
    }

    /// Client using session cookie authentication
    pub fn with_credentials(url: &str, username: &str, password: &str) -> Result<Self> {
        Self::with_config(ClientConfig::new(url).credentials(username, password))
    }

    /// Client from a full configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_interceptors(config, InterceptorChain::new())
    }

    /// Client with additional interceptors
    ///
    /// The chain runs the session cookie interceptor first (when
    /// credentials are configured), then `extra` in order, then the
    /// request logger.
    pub fn with_interceptors(config: ClientConfig, extra: InterceptorChain) -> Result<Self> {
        config.validate()?;
        let base_url = config.base_url()?;
        let http = config.build_http_client()?;

        let mut chain = InterceptorChain::new();
        let cookie_auth = match (&config.username, &config.password) {
            (Some(username), Some(password)) => {
                let interceptor = Arc::new(
                    SessionCookieInterceptor::with_client(username, password, http.clone())
                        .endpoint(&base_url)
                        .timeout(config.session_timeout),
                );
                chain.add_shared(interceptor.clone());
                Some(interceptor)
            }
            _ => None,
        };
        chain.extend(extra);
        if config.log_requests {
            chain.add(RequestLogger::default());
        }

        tracing::debug!(
            url = %base_url,
            interceptors = ?chain.names(),
            max_concurrent = config.max_concurrent_operations,
            "Client created"
        );

        let session = InterceptableSession::new(http, chain).max_retries(config.max_retries);
        let queue = Arc::new(OperationQueue::new(config.max_concurrent_operations));

        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                base_url,
                session,
                cookie_auth,
                queue,
                metrics: Arc::new(ClientMetrics::new()),
            }),
        })
    }

    /// Server base URL
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Configuration the client was built from
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Session cookie state; `None` without credentials
    pub fn session_state(&self) -> Option<SessionState> {
        self.inner.cookie_auth.as_ref().map(|auth| auth.state())
    }

    /// Get the interceptable session
    pub fn session(&self) -> &InterceptableSession {
        &self.inner.session
    }

    /// Get queue statistics
    pub fn queue_stats(&self) -> QueueStats {
        self.inner.queue.stats()
    }

    /// Get metrics report
    pub fn metrics(&self) -> MetricsReport {
        self.inner.metrics.report(ExchangeCounters {
            exchanges: self.inner.session.exchange_count(),
            retries: self.inner.session.retry_count(),
            session_requests: self
                .inner
                .cookie_auth
                .as_ref()
                .map_or(0, |auth| auth.session_requests()),
            cancelled: self.inner.queue.stats().cancelled,
        })
    }

    /// Stop dispatching queued operations
    pub fn close(&self) {
        self.inner.queue.close();
    }

    /// Run an operation now, bypassing the queue
    pub async fn execute(&self, operation: impl Into<Operation>) -> Result<OperationResponse> {
        let operation = operation.into();
        let kind = operation.kind();

        let timer = MetricsTimer::start(self.inner.metrics.clone());
        let outcome = self.dispatch(&operation).await;
        timer.stop(&outcome);

        match &outcome {
            Ok(response) => tracing::debug!(
                operation = %kind,
                status = response.status_code(),
                "Operation succeeded"
            ),
            Err(e) if e.is_validation() => tracing::debug!(operation = %kind, error = %e, "Operation rejected"),
            Err(e) => tracing::debug!(operation = %kind, error = %e, "Operation failed"),
        }

        outcome
    }

    async fn dispatch(&self, operation: &Operation) -> Result<OperationResponse> {
        let request = operation.to_request(&self.inner.base_url)?;
        let response = self.inner.session.execute(request).await?;
        interpret(operation.kind(), response)
    }

    /// Queue an operation; the handle yields its outcome
    pub fn submit(&self, operation: impl Into<Operation>) -> OperationHandle {
        let client = self.clone();
        let operation = operation.into();
        self.inner
            .queue
            .submit(async move { client.execute(operation).await })
    }

    /// Queue an operation and call `completion` with its outcome exactly once
    pub fn add_operation<C>(&self, operation: impl Into<Operation>, completion: C) -> PendingOperation
    where
        C: FnOnce(Result<OperationResponse>) + Send + 'static,
    {
        let client = self.clone();
        let operation = operation.into();
        self.inner
            .queue
            .spawn(async move { client.execute(operation).await }, completion)
    }

    /// Queue several operations and wait for all outcomes, in input order
    pub async fn execute_all(&self, operations: Vec<Operation>) -> Vec<Result<OperationResponse>> {
        let handles: Vec<_> = operations.into_iter().map(|op| self.submit(op)).collect();
        join_all(handles.into_iter().map(OperationHandle::wait)).await
    }

    /// Handle for one database
    pub fn database(&self, name: impl Into<String>) -> Database {
        Database {
            client: self.clone(),
            name: name.into(),
        }
    }

    /// Create a database
    pub async fn create_database(&self, name: &str) -> Result<()> {
        self.execute(CreateDatabase::named(name)).await.map(|_| ())
    }

    /// Delete a database
    pub async fn delete_database(&self, name: &str) -> Result<()> {
        self.execute(DeleteDatabase::named(name)).await.map(|_| ())
    }

    /// Create or update a document
    ///
    /// Updates must carry the current `_rev` inside `document`.
    pub async fn put_document<T: Serialize>(
        &self,
        database: &str,
        doc_id: &str,
        document: &T,
    ) -> Result<DocumentRevision> {
        let op = PutDocument::new()
            .database(database)
            .doc_id(doc_id)
            .body_from(document)?;
        self.execute(op).await?.revision()
    }

    /// Fetch a document
    pub async fn get_document<T: DeserializeOwned>(&self, database: &str, doc_id: &str) -> Result<T> {
        let op = GetDocument::new().database(database).doc_id(doc_id);
        self.execute(op).await?.deserialize()
    }

    /// Delete a document revision
    pub async fn delete_document(
        &self,
        database: &str,
        doc_id: &str,
        rev: &str,
    ) -> Result<DocumentRevision> {
        let op = DeleteDocument::new().database(database).doc_id(doc_id).rev(rev);
        self.execute(op).await?.revision()
    }

    /// Upload an attachment to a document revision
    pub async fn put_attachment(
        &self,
        database: &str,
        doc_id: &str,
        rev: &str,
        name: &str,
        content_type: &str,
        data: impl Into<Bytes>,
    ) -> Result<DocumentRevision> {
        let op = PutAttachment::new()
            .database(database)
            .doc_id(doc_id)
            .rev(rev)
            .name(name)
            .content_type(content_type)
            .data(data);
        self.execute(op).await?.revision()
    }

    /// Download an attachment
    pub async fn read_attachment(&self, database: &str, doc_id: &str, name: &str) -> Result<Bytes> {
        let op = ReadAttachment::new().database(database).doc_id(doc_id).name(name);
        Ok(self.execute(op).await?.body)
    }

    /// Delete an attachment
    pub async fn delete_attachment(
        &self,
        database: &str,
        doc_id: &str,
        rev: &str,
        name: &str,
    ) -> Result<DocumentRevision> {
        let op = DeleteAttachment::new()
            .database(database)
            .doc_id(doc_id)
            .rev(rev)
            .name(name);
        self.execute(op).await?.revision()
    }
}

impl std::fmt::Debug for CouchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CouchClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("interceptors", &self.inner.session.chain().names())
            .finish()
    }
}

/// Operations scoped to one database
///
/// Operations passed through the handle get its database name when they
/// have none of their own.
#[derive(Debug, Clone)]
pub struct Database {
    client: CouchClient,
    name: String,
}

impl Database {
    /// Database name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning client
    pub fn client(&self) -> &CouchClient {
        &self.client
    }

    fn scoped(&self, operation: impl Into<Operation>) -> Operation {
        let mut operation = operation.into();
        if operation.database().map_or(true, str::is_empty) {
            operation.set_database(self.name.as_str());
        }
        operation
    }

    /// Create this database
    pub async fn create(&self) -> Result<()> {
        self.client.create_database(&self.name).await
    }

    /// Delete this database
    pub async fn delete(&self) -> Result<()> {
        self.client.delete_database(&self.name).await
    }

    /// Run an operation against this database now
    pub async fn execute(&self, operation: impl Into<Operation>) -> Result<OperationResponse> {
        self.client.execute(self.scoped(operation)).await
    }

    /// Queue an operation against this database
    pub fn submit(&self, operation: impl Into<Operation>) -> OperationHandle {
        self.client.submit(self.scoped(operation))
    }

    /// Queue an operation against this database with a completion
    pub fn add_operation<C>(&self, operation: impl Into<Operation>, completion: C) -> PendingOperation
    where
        C: FnOnce(Result<OperationResponse>) + Send + 'static,
    {
        self.client.add_operation(self.scoped(operation), completion)
    }

    /// Create or update a document in this database
    pub async fn put_document<T: Serialize>(
        &self,
        doc_id: &str,
        document: &T,
    ) -> Result<DocumentRevision> {
        self.client.put_document(&self.name, doc_id, document).await
    }

    /// Fetch a document from this database
    pub async fn get_document<T: DeserializeOwned>(&self, doc_id: &str) -> Result<T> {
        self.client.get_document(&self.name, doc_id).await
    }

    /// Delete a document revision from this database
    pub async fn delete_document(&self, doc_id: &str, rev: &str) -> Result<DocumentRevision> {
        self.client.delete_document(&self.name, doc_id, rev).await
    }

    /// Upload an attachment to a document revision in this database
    pub async fn put_attachment(
        &self,
        doc_id: &str,
        rev: &str,
        name: &str,
        content_type: &str,
        data: impl Into<Bytes>,
    ) -> Result<DocumentRevision> {
        self.client
            .put_attachment(&self.name, doc_id, rev, name, content_type, data)
            .await
    }

    /// Download an attachment from this database
    pub async fn read_attachment(&self, doc_id: &str, name: &str) -> Result<Bytes> {
        self.client.read_attachment(&self.name, doc_id, name).await
    }

    /// Delete an attachment from a document revision in this database
    pub async fn delete_attachment(
        &self,
        doc_id: &str,
        rev: &str,
        name: &str,
    ) -> Result<DocumentRevision> {
        self.client
            .delete_attachment(&self.name, doc_id, rev, name)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::operations::OperationKind;

    #[test]
    fn test_chain_layout() {
        let client = CouchClient::with_config(
            ClientConfig::new("http://localhost:5984").credentials("admin", "secret"),
        )
        .unwrap();

        assert_eq!(
            client.session().chain().names(),
            vec!["session-cookie", "request-logger"]
        );
        assert_eq!(client.session_state(), Some(SessionState::NoCookie));
    }

    #[test]
    fn test_no_credentials_no_cookie_interceptor() {
        let client = CouchClient::with_config(
            ClientConfig::new("http://localhost:5984").log_requests(false),
        )
        .unwrap();

        assert!(client.session().chain().is_empty());
        assert_eq!(client.session_state(), None);
    }

    #[test]
    fn test_rejects_bad_config() {
        let err = CouchClient::with_config(
            ClientConfig::new("http://localhost:5984").max_concurrent_operations(0),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_database_scoping() {
        let db = CouchClient::new("http://localhost:5984")
            .unwrap()
            .database("animals");

        let scoped = db.scoped(GetDocument::new().doc_id("aardvark"));
        assert_eq!(scoped.database(), Some("animals"));

        let explicit = db.scoped(GetDocument::new().database("plants").doc_id("fern"));
        assert_eq!(explicit.database(), Some("plants"));
    }

    #[tokio::test]
    async fn test_validation_failure_is_counted() {
        let client = CouchClient::new("http://localhost:5984").unwrap();

        let err = client
            .execute(PutAttachment::new().database("db").doc_id("doc"))
            .await
            .unwrap_err();

        assert_eq!(err.operation_kind(), Some(OperationKind::PutAttachment));
        let report = client.metrics();
        assert_eq!(report.validation_failures, 1);
        assert_eq!(report.exchanges, 0);
    }
}
