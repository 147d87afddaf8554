//! forge::mock
//!
//! Mock forge implementation for deterministic testing.
//!
//! # Design
//!
//! The mock forge serves canned repository pages per source, in order, and
//! creates an empty directory for each repository it is asked to create.
//! Failures can be configured for a specific page or for creation.
//!
//! # Example
//!
//! ```
//! use gh_template::forge::mock::MockForge;
//! use gh_template::forge::{CatalogSource, Forge, RepositoryRecord};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let forge = MockForge::new().with_records(
//!     CatalogSource::Owner("octo".into()),
//!     vec![vec![RepositoryRecord {
//!         owner: "octo".into(),
//!         name: "template".into(),
//!         description: None,
//!         is_template: true,
//!     }]],
//! );
//!
//! let page = forge
//!     .repositories(&CatalogSource::Owner("octo".into()), None)
//!     .await
//!     .unwrap();
//! assert_eq!(page.nodes.len(), 1);
//! assert!(!page.cursor.has_next_page);
//! # });
//! ```

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use super::traits::{
    CatalogSource, CreateRepoRequest, Forge, ForgeError, PageCursor, RepositoryPage,
    RepositoryRecord,
};

/// Mock forge for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone)]
pub struct MockForge {
    host: String,
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockForgeInner>>,
}

/// Internal mutable state.
#[derive(Debug)]
struct MockForgeInner {
    /// Pages per source, served in order.
    pages: Vec<(CatalogSource, Vec<RepositoryPage>)>,
    /// Operation to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail the listing of `source` at zero-based `page`.
    Repositories {
        source: CatalogSource,
        page: usize,
        error: ForgeError,
    },
    /// Fail create_repository with the given error.
    CreateRepository(ForgeError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    Repositories {
        source: CatalogSource,
        after: Option<String>,
    },
    CreateRepository {
        name: String,
        template: String,
        args: Vec<String>,
        workdir: PathBuf,
    },
}

impl MockForge {
    /// Create a mock forge for `github.com` with no repositories.
    pub fn new() -> Self {
        Self {
            host: "github.com".to_string(),
            inner: Arc::new(Mutex::new(MockForgeInner {
                pages: Vec::new(),
                fail_on: None,
                operations: Vec::new(),
            })),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Serve `pages` for `source`, in order.
    pub fn with_pages(self, source: CatalogSource, pages: Vec<RepositoryPage>) -> Self {
        {
            let mut inner = self.state();
            inner.pages.retain(|(s, _)| *s != source);
            inner.pages.push((source, pages));
        }
        self
    }

    /// Serve each inner `Vec` as one page, chaining cursors `PAGE_1`, `PAGE_2`, ...
    pub fn with_records(self, source: CatalogSource, pages: Vec<Vec<RepositoryRecord>>) -> Self {
        let count = pages.len();
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(i, nodes)| RepositoryPage {
                nodes,
                cursor: PageCursor {
                    end_cursor: Some(format!("PAGE_{}", i + 1)),
                    has_next_page: i + 1 < count,
                },
            })
            .collect();
        self.with_pages(source, pages)
    }

    /// Configure the mock to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use gh_template::forge::mock::{MockForge, FailOn};
    /// use gh_template::forge::ForgeError;
    ///
    /// let forge = MockForge::new()
    ///     .fail_on(FailOn::CreateRepository(ForgeError::RateLimited));
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.state().fail_on = Some(fail_on);
        self
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.state().operations.clone()
    }

    /// The `after` values passed for `source`, in call order.
    pub fn cursors_for(&self, source: &CatalogSource) -> Vec<Option<String>> {
        self.state()
            .operations
            .iter()
            .filter_map(|op| match op {
                MockOperation::Repositories { source: s, after } if s == source => {
                    Some(after.clone())
                }
                _ => None,
            })
            .collect()
    }

    fn state(&self) -> MutexGuard<'_, MockForgeInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, op: MockOperation) {
        self.state().operations.push(op);
    }
}

impl Default for MockForge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn host(&self) -> &str {
        &self.host
    }

    async fn repositories(
        &self,
        source: &CatalogSource,
        after: Option<&str>,
    ) -> Result<RepositoryPage, ForgeError> {
        self.record(MockOperation::Repositories {
            source: source.clone(),
            after: after.map(str::to_string),
        });

        let inner = self.state();
        let index = inner
            .operations
            .iter()
            .filter(|op| matches!(op, MockOperation::Repositories { source: s, .. } if s == source))
            .count()
            - 1;

        if let Some(FailOn::Repositories {
            source: failing,
            page,
            error,
        }) = &inner.fail_on
        {
            if failing == source && *page == index {
                return Err(error.clone());
            }
        }

        let pages = inner
            .pages
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, pages)| pages);

        match (pages, source) {
            (Some(pages), _) => Ok(pages.get(index).cloned().unwrap_or_default()),
            (None, CatalogSource::Owner(owner)) => {
                Err(ForgeError::NotFound(format!("owner '{}'", owner)))
            }
            (None, CatalogSource::Starred) => Ok(RepositoryPage::default()),
        }
    }

    async fn create_repository(
        &self,
        request: &CreateRepoRequest,
    ) -> Result<PathBuf, ForgeError> {
        self.record(MockOperation::CreateRepository {
            name: request.name.clone(),
            template: request.template.clone(),
            args: request.options.to_args(),
            workdir: request.workdir.clone(),
        });

        if let Some(FailOn::CreateRepository(error)) = &self.state().fail_on {
            return Err(error.clone());
        }

        let path = request.clone_dir();
        std::fs::create_dir_all(&path).map_err(|e| ForgeError::CommandFailed {
            command: format!("repo create {}", request.name),
            stderr: e.to_string(),
        })?;
        Ok(path)
    }
}
