//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. No other module should import
//! `git2`. Cloning is not done here; new repositories are cloned by
//! `gh repo create --clone` through the forge.
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - Remote URL lookup and parsing into [`RepoRef`](crate::core::types::RepoRef)
//! - Reading the configured user identity
//!
//! # Example
//!
//! ```ignore
//! use gh_template::git::Git;
//!
//! let identity = Git::user_identity()?;
//! println!("{} <{}>", identity.name, identity.email);
//! ```

mod interface;

pub use interface::{parse_remote_url, Git, GitError};
