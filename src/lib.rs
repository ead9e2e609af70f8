//! Miniblog library.
//!
//! A minimal blogging backend: create/list/fetch posts and attach
//! comments to them over HTTP, with a denormalized per-post comment
//! counter and optional bearer-token gating of post creation.

pub mod auth;
pub mod config;
pub mod db;
pub mod object_id;
pub mod sanitize;
pub mod web;
