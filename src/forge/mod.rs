//! forge
//!
//! Abstraction for the remote forge (GitHub and GitHub Enterprise Server).
//!
//! # Architecture
//!
//! The `Forge` trait defines the interface for interacting with remote
//! hosting services. Commands use the [`create_forge`] factory function
//! rather than importing specific forge implementations directly.
//!
//! # Modules
//!
//! - `traits`: Core `Forge` trait and request/response types
//! - [`github`]: GitHub implementation using GraphQL and the `gh` CLI
//! - [`mock`]: Mock implementation for deterministic testing
//! - `factory`: Forge creation
//!
//! # Example
//!
//! ```ignore
//! use gh_template::forge::{create_forge, create_token_provider, CatalogSource};
//!
//! let forge = create_forge(create_token_provider("github.com"));
//! let page = forge.repositories(&CatalogSource::Starred, None).await?;
//! println!("{} repositories", page.nodes.len());
//! ```

mod factory;
pub mod github;
pub mod mock;
mod traits;

pub use factory::{create_forge, create_token_provider};
pub use traits::*;
