//! Request middleware: authentication extraction and role guards.

pub mod auth;
