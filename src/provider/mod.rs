//! Provider version layer
//!
//! This module resolves provider versions from upstream releases and keeps
//! the resolved listings in a freshness-windowed cache.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────▶│  Resolver   │────▶│    Cache    │
//! │ (releases)  │     │ (normalize) │     │  (storage)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ Registries  │
//! │  (github)   │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: SQLite-based listing store and the freshness predicate
//! - [`error`]: Error types for cache, registry and resolver operations
//! - [`registry`]: Registry trait for listing upstream release tags
//! - [`registries`]: Concrete registry implementations (GitHub)
//! - [`resolver`]: Version normalization and download URL construction
//! - [`types`]: Common types like `Version` and `ProviderKey`

pub mod cache;
pub mod error;
pub mod registries;
pub mod registry;
pub mod resolver;
pub mod types;
