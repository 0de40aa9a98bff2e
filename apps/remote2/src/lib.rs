//! # Remote App 2 - Todo List
//!
//! An independently built remote exposing `./App`: a todo list backed by the
//! REST API through [`mfe_client::ApiClient`].
//!
//! - Starts from two seed items and replaces them with the server rows once
//!   the API answers
//! - Add, toggle and delete call the API and fall back to a local change when
//!   it fails
//! - While mounted, listens for `mf:add-todo` page events and appends an
//!   event-sourced item for each
//! - Announces every addition in the shared message log as `remote2`

pub mod app;
pub mod model;

pub use app::{DESCRIPTION, REMOTE_NAME, TITLE, TodoListApp, remote_entry};
pub use model::{TodoItem, TodoSource, seed_todos};
