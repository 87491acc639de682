//! Redis connection provider
//!
//! Lends connections to a Redis server for script registration and
//! invocation.
//!
//! ## Features
//!
//! - One auto-reconnecting multiplexed connection shared by all borrowers
//! - Lazy connect on first borrow, retried on the next borrow after failure
//! - Optional `PING` health check on borrow
//! - Connect and response timeouts
//!
//! ## Example
//!
//! ```ignore
//! use leaselock_providers::RedisConnectionProvider;
//!
//! let provider = RedisConnectionProvider::new("redis://localhost:6379")?;
//! // Or with host/port
//! let provider = RedisConnectionProvider::with_host_port("localhost", 6379)?;
//! ```

use crate::constants::{REDIS_CONNECT_TIMEOUT, REDIS_PROVIDER_NAME, REDIS_RESPONSE_TIMEOUT};
use async_trait::async_trait;
use leaselock_domain::constants::NOSCRIPT_ERROR_CODE;
use leaselock_domain::error::{Error, Result};
use leaselock_domain::ports::{ConnectionProvider, ScriptConnection};
use leaselock_domain::value_objects::{ScriptHandle, ScriptReply};
use redis::aio::ConnectionManager;
use redis::{Client, RedisError, Value};
use std::future::Future;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::debug;

/// Redis connection provider
pub struct RedisConnectionProvider {
    client: Client,
    manager: OnceCell<ConnectionManager>,
    connect_timeout: Duration,
    response_timeout: Duration,
    ping_on_borrow: bool,
}

impl RedisConnectionProvider {
    /// Create a provider for a Redis connection URL
    ///
    /// No connection is made until the first borrow.
    ///
    /// # Arguments
    ///
    /// * `connection_string` - Redis connection URL (e.g., "redis://localhost:6379/0")
    pub fn new(connection_string: &str) -> Result<Self> {
        let client = Client::open(connection_string).map_err(|e| Error::Configuration {
            message: format!("Failed to create Redis client: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(Self {
            client,
            manager: OnceCell::new(),
            connect_timeout: REDIS_CONNECT_TIMEOUT,
            response_timeout: REDIS_RESPONSE_TIMEOUT,
            ping_on_borrow: true,
        })
    }

    /// Create a provider with host and port
    pub fn with_host_port(host: &str, port: u16) -> Result<Self> {
        Self::new(&format!("redis://{host}:{port}"))
    }

    /// Time allowed to establish the connection
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Time allowed for one command round trip
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Check connections with `PING` before lending them
    pub fn with_ping_on_borrow(mut self, ping: bool) -> Self {
        self.ping_on_borrow = ping;
        self
    }

    /// Shared connection, connecting on first use
    async fn manager(&self) -> Result<ConnectionManager> {
        let manager = self
            .manager
            .get_or_try_init(|| async {
                debug!(timeout_ms = self.connect_timeout.as_millis() as u64, "Connecting to Redis");
                match tokio::time::timeout(
                    self.connect_timeout,
                    self.client.get_connection_manager(),
                )
                .await
                {
                    Ok(Ok(manager)) => Ok(manager),
                    Ok(Err(e)) => Err(Error::connection_unavailable_with_source(
                        format!("Failed to connect to Redis: {e}"),
                        e,
                    )),
                    Err(_) => Err(Error::connection_unavailable(format!(
                        "Redis connect timed out after {:?}",
                        self.connect_timeout
                    ))),
                }
            })
            .await?;
        Ok(manager.clone())
    }
}

#[async_trait]
impl ConnectionProvider for RedisConnectionProvider {
    async fn borrow(&self) -> Result<Box<dyn ScriptConnection>> {
        let mut conn = RedisScriptConnection {
            conn: self.manager().await?,
            response_timeout: self.response_timeout,
        };

        if self.ping_on_borrow {
            let ping = redis::cmd("PING");
            let mut probe = conn.conn.clone();
            let pong: Result<String> = conn.run(ping.query_async(&mut probe)).await;
            pong.map_err(|e| Error::connection_unavailable(format!("Redis PING failed: {e}")))?;
        }

        Ok(Box::new(conn))
    }

    fn provider_name(&self) -> &str {
        REDIS_PROVIDER_NAME
    }
}

impl std::fmt::Debug for RedisConnectionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisConnectionProvider")
            .field("connected", &self.manager.initialized())
            .field("connect_timeout", &self.connect_timeout)
            .field("response_timeout", &self.response_timeout)
            .field("ping_on_borrow", &self.ping_on_borrow)
            .finish()
    }
}

/// Borrowed Redis connection
struct RedisScriptConnection {
    conn: ConnectionManager,
    response_timeout: Duration,
}

impl RedisScriptConnection {
    /// Await a command under the response timeout
    async fn run<T, F>(&self, command: F) -> Result<T>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match tokio::time::timeout(self.response_timeout, command).await {
            Ok(result) => result.map_err(|e| {
                Error::script_with_source(format!("Redis command failed: {e}"), e)
            }),
            Err(_) => Err(Error::script(format!(
                "Redis command timed out after {:?}",
                self.response_timeout
            ))),
        }
    }
}

#[async_trait]
impl ScriptConnection for RedisScriptConnection {
    async fn load_script(&mut self, source: &str) -> Result<ScriptHandle> {
        let mut cmd = redis::cmd("SCRIPT");
        cmd.arg("LOAD").arg(source);
        let mut conn = self.conn.clone();
        let sha: String = self.run(cmd.query_async(&mut conn)).await?;
        Ok(ScriptHandle::new(sha))
    }

    async fn invoke_script(
        &mut self,
        handle: &ScriptHandle,
        keys: &[&str],
        args: &[&str],
    ) -> Result<ScriptReply> {
        let mut cmd = redis::cmd("EVALSHA");
        cmd.arg(handle.as_str()).arg(keys.len());
        for key in keys {
            cmd.arg(*key);
        }
        for arg in args {
            cmd.arg(*arg);
        }

        let mut conn = self.conn.clone();
        let result: std::result::Result<redis::RedisResult<Value>, _> =
            tokio::time::timeout(self.response_timeout, cmd.query_async(&mut conn)).await;

        match result {
            Ok(Ok(value)) => Ok(reply_from_value(value)),
            Ok(Err(e)) if is_noscript(&e) => Err(Error::stale_handle(handle.as_str())),
            Ok(Err(e)) => Err(Error::script_with_source(
                format!("EVALSHA {handle} failed: {e}"),
                e,
            )),
            Err(_) => Err(Error::script(format!(
                "EVALSHA {handle} timed out after {:?}",
                self.response_timeout
            ))),
        }
    }
}

/// Whether Redis rejected an unknown script hash
fn is_noscript(err: &RedisError) -> bool {
    err.code() == Some(NOSCRIPT_ERROR_CODE)
}

fn reply_from_value(value: Value) -> ScriptReply {
    match value {
        Value::Int(n) => ScriptReply::Integer(n),
        Value::BulkString(bytes) => ScriptReply::Text(String::from_utf8_lossy(&bytes).into_owned()),
        Value::SimpleString(text) => ScriptReply::Text(text),
        Value::Okay => ScriptReply::Text("OK".to_string()),
        _ => ScriptReply::Nil,
    }
}
