use super::{parse_records, Connector};
use async_trait::async_trait;
use reqwest::Client;
use starmart_types::{
    errors::connector::{ConnectorError, MalformedReason, UnreachableReason},
    ingestion_types::{FeedEnvelope, RawTransaction},
    models::source::{default_feed_timeout_secs, HttpSourceConfig},
    serde_json,
    tracing::{debug, info},
};
use std::time::Duration;

#[derive(Debug)]
pub struct HttpConnector {
    config: HttpSourceConfig,
    client: Client,
    timeout: Duration,
}

impl HttpConnector {
    pub fn new(config: HttpSourceConfig) -> Result<Self, ConnectorError> {
        let timeout = Duration::from_secs(
            config
                .timeout_secs
                .unwrap_or_else(default_feed_timeout_secs),
        );
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            ConnectorError::unreachable(&config.url, UnreachableReason::Transport(Box::new(e)))
        })?;
        Ok(Self {
            config,
            client,
            timeout,
        })
    }

    fn has_filters(&self) -> bool {
        self.config.category.is_some()
            || self.config.brand.is_some()
            || self.config.order_type.is_some()
    }

    fn query(&self, page: Option<(usize, usize)>) -> Vec<(&'static str, String)> {
        let mut query = vec![];
        for (name, filter) in [
            ("category", &self.config.category),
            ("brand", &self.config.brand),
            ("order_type", &self.config.order_type),
        ] {
            if let Some(value) = filter {
                query.push((name, value.clone()));
            }
        }
        if let Some((limit, offset)) = page {
            query.push(("limit", limit.to_string()));
            query.push(("offset", offset.to_string()));
        }
        query
    }

    fn transport_error(&self, error: reqwest::Error) -> ConnectorError {
        let reason = if error.is_timeout() {
            UnreachableReason::Timeout(self.timeout)
        } else {
            UnreachableReason::Transport(Box::new(error))
        };
        ConnectorError::unreachable(&self.config.url, reason)
    }

    async fn fetch(&self, page: Option<(usize, usize)>) -> Result<FeedEnvelope, ConnectorError> {
        let response = self
            .client
            .get(&self.config.url)
            .query(&self.query(page))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectorError::unreachable(
                &self.config.url,
                UnreachableReason::Status(status.as_u16()),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        serde_json::from_slice(&body)
            .map_err(|e| ConnectorError::malformed(&self.config.url, MalformedReason::Json(e)))
    }

    async fn extract_whole(&self) -> Result<Vec<RawTransaction>, ConnectorError> {
        let envelope = self.fetch(None).await?;
        let received = envelope.data.len();
        let expected = envelope.returned_records.unwrap_or(received);
        if expected != received {
            return Err(self.count_mismatch(expected, received));
        }
        parse_records(&self.config.url, envelope.data, 0)
    }

    /// Reads `limit`/`offset` pages until a short page, or until the
    /// announced total is reached when no filters apply.
    ///
    /// `total_records` bounds the number of requests, so a feed that ignores
    /// `offset` fails instead of being read forever.
    async fn extract_paged(&self, page_size: usize) -> Result<Vec<RawTransaction>, ConnectorError> {
        let mut transactions = vec![];
        let mut total_records;
        let mut pages = 0;
        loop {
            let offset = transactions.len();
            let envelope = self.fetch(Some((page_size, offset))).await?;
            let page_len = envelope.data.len();
            pages += 1;
            debug!("Fetched page {pages} at offset {offset} with {page_len} records");

            if page_len > page_size {
                return Err(ConnectorError::malformed(
                    &self.config.url,
                    MalformedReason::PageOverflow {
                        page_size,
                        received: page_len,
                    },
                ));
            }

            total_records = envelope.total_records;
            let page_limit = total_records / page_size + 1;
            if pages > page_limit {
                return Err(ConnectorError::malformed(
                    &self.config.url,
                    MalformedReason::TooManyPages { limit: page_limit },
                ));
            }

            transactions.extend(parse_records(&self.config.url, envelope.data, offset)?);
            if page_len < page_size || (!self.has_filters() && transactions.len() >= total_records)
            {
                break;
            }
        }

        // `total_records` counts the unfiltered collection
        if !self.has_filters() && total_records != transactions.len() {
            return Err(self.count_mismatch(total_records, transactions.len()));
        }
        Ok(transactions)
    }

    fn count_mismatch(&self, expected: usize, received: usize) -> ConnectorError {
        ConnectorError::malformed(
            &self.config.url,
            MalformedReason::CountMismatch { expected, received },
        )
    }
}

#[async_trait]
impl Connector for HttpConnector {
    fn type_name(&self) -> &'static str {
        "http"
    }

    fn address(&self) -> &str {
        &self.config.url
    }

    async fn validate_connection(&self) -> Result<(), ConnectorError> {
        self.fetch(Some((1, 0))).await.map(|_| ())
    }

    async fn extract(&self) -> Result<Vec<RawTransaction>, ConnectorError> {
        info!("Extracting transactions from {}", self.config.url);
        match self.config.page_size {
            Some(page_size) if page_size > 0 => self.extract_paged(page_size).await,
            _ => self.extract_whole().await,
        }
    }
}
