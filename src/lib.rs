//! Credit Insights API Library
//!
//! Credit-profile analysis, dispute success estimation, score timeline
//! projection and action plan generation, plus the HTTP handlers that
//! expose them.
//!
//! # Modules
//!
//! - `api`: API definitions.
//! - `core`: Core business logic.
//! - `integrations`: External service integrations.
//! - `action_plan`: Three-phase plan generation.
//! - `analyzer`: Full profile analysis.
//! - `circuit_breaker`: Circuit breaker for the completion provider.
//! - `config`: Configuration management.
//! - `dispute`: Dispute success estimation.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `insights`: AI insights with fallback.
//! - `llm_client`: Chat-completion client.
//! - `models`: Core data models.
//! - `scoring`: Health score and rule tables.
//! - `timeline`: Score timeline projection.

pub mod api;
pub mod core;
pub mod integrations;

pub mod action_plan;
pub mod analyzer;
pub mod circuit_breaker;
pub mod config;
pub mod dispute;
pub mod errors;
pub mod handlers;
pub mod insights;
pub mod llm_client;
pub mod models;
pub mod scoring;
pub mod timeline;
