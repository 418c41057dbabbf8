//! Client for a managed, sandboxed remote code-execution service
//! ("dynamic sessions").
//!
//! An agent submits Java source for synchronous execution inside a
//! per-session sandbox, transfers files in and out of the session, and
//! authenticates every call with a cached bearer token obtained from an
//! injected [`TokenCredential`].

mod auth;
mod client;
mod error;
mod multipart;
mod sanitize;
mod types;

pub use auth::AccessToken;
pub use auth::StaticTokenCredential;
pub use auth::TokenCredential;
pub use client::ByteStream;
pub use client::SessionsClient;
pub use error::Result;
pub use error::SessionsError;
pub use types::ExecutionOutcome;
pub use types::ExecutionResult;
pub use types::RemoteFileMetadata;
pub use types::TypedOutcome;

/// API version the service contract is pinned to. Part of the query string
/// of every request.
pub const API_VERSION: &str = "2024-09-09-preview";

/// OAuth scope tokens are requested for.
pub const TOKEN_SCOPE: &str = "https://dynamicsessions.io/.default";

/// Directory the service mounts session files under.
pub const REMOTE_FILE_ROOT: &str = "/mnt/data/";

/// Name the REPL registers under when exposed to a model as a tool.
pub const TOOL_NAME: &str = "java_REPL";

/// Description to register alongside [`TOOL_NAME`].
pub const TOOL_DESCRIPTION: &str = "Use this to execute java commands when you need to perform calculations or computations. Input should be a valid java command. Returns a JSON object with the result, stdout, and stderr.";

/// Fixed client identifier sent as the `User-Agent` of every request.
pub const USER_AGENT: &str =
    concat!("dynamic-sessions/", env!("CARGO_PKG_VERSION"), " (Language=Rust)");
