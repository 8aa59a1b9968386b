//! bitbyte is a server-rendered personal blog.
//!
//! Every request on the public listener runs through an ordered chain of
//! request policies before a page is rendered: metrics, security headers,
//! a canonical-host redirect, trailing-slash normalization, replay of
//! writes to the primary region, compression, static files, and access
//! logging. A second listener serves Prometheus metrics and a health
//! summary.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, init, validate, health).
//! - [`config`] -- Runtime environment and site configuration loading and
//!   validation.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`health`] -- `GET /health` endpoint handler returning runtime diagnostics.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`metrics`] -- Prometheus recorder, metric names, and `GET /metrics`.
//! - [`middleware`] -- The request policy chain and the axum middleware that
//!   drives it.
//! - [`render`] -- The [`Renderer`](render::Renderer) trait and the built-in
//!   blog renderer.
//! - [`server`] -- Axum server setup, shared application state, and graceful
//!   shutdown.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `sentry-integration` | Sentry error tracking |
//! | `full` | All features |

// Binary crate: public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod render;
pub mod server;

#[cfg(feature = "sentry-integration")]
pub mod sentry_integration;
