//! Server Module
//!
//! This module contains the code for initializing and configuring the
//! Axum HTTP server.
//!
//! # Module Structure
//!
//! - **`config`** - Configuration loading and validation
//! - **`state`**  - Application state shared across request handlers
//! - **`init`**   - Server initialization and app creation
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `AppConfig::from_env` reads the database
//!    URL and token settings from the environment
//! 2. **State Creation**: database pool, token issuer, and account service
//!    are constructed once and shared across handlers
//! 3. **Router Creation**: `routes::create_router` wires handlers and
//!    middleware

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

/// Application state management
pub mod state;

pub use init::create_app;
pub use state::AppState;
