//! # Micro Frontend API Client
//!
//! Typed async wrapper around the REST service, one method per endpoint.
//! Every method returns the parsed resource; transport failures and non-2xx
//! statuses are errors. The client is stateless: no retries, no caching.
//!
//! ## Example
//!
//! ```no_run
//! use mfe_client::ApiClient;
//! use mfe_core::types::{Origin, TodoPatch};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // MFE_API_BASE, or http://localhost:3003
//!     let client = ApiClient::from_env()?;
//!
//!     let todo = client.create_todo("Learn Micro Frontends").await?;
//!     client.update_todo(todo.id, TodoPatch::completed(true)).await?;
//!     client.create_message("todo done", Origin::Remote2).await?;
//!
//!     println!("{:?}", client.get_todos().await?);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;

// Re-export main types for convenience
pub use client::{ApiClient, DEFAULT_API_BASE};
pub use error::ClientError;
