//! Desktop user-management form backed by a local SQLite file.
//!
//! # Intention
//!
//! - Keep every SQL statement behind [`store::UserStore`]; the form never
//!   touches a connection directly.
//! - Keep the form logic in [`app::UserForm`] plain enough to test without
//!   opening a window.
//!
//! # Architectural Boundaries
//!
//! - `domain`, `error` and `store` know nothing about egui.
//! - `app` reaches storage only through `UserStore` and resynchronizes its
//!   row projection from storage after every mutation, never the reverse.

pub mod app;
pub mod domain;
pub mod error;
pub mod store;
