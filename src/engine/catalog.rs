//! engine::catalog
//!
//! Aggregates template repositories across paginated forge queries.
//!
//! # Algorithm
//!
//! For each source (the owner's repositories, then optionally the viewer's
//! starred repositories):
//!
//! 1. Request the first page without a cursor
//! 2. Keep nodes flagged as templates, in page order
//! 3. While the page reports more results, request the next page with the
//!    previous end cursor (an empty string if the forge sent none)
//!
//! Each source keeps its own cursor state. The merged records are then
//! stable-sorted by `owner/name` using byte-wise comparison, so `Z/z` sorts
//! before `a/c`.
//!
//! # Duplicates
//!
//! A repository that is both owned and starred appears twice. Nothing here
//! deduplicates across sources.
//!
//! # Errors
//!
//! The first forge error aborts collection; no partial catalog is returned.

use crate::forge::{CatalogSource, Forge, ForgeError, RepositoryRecord};

/// Sorted template repositories from one or more sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    records: Vec<RepositoryRecord>,
}

impl Catalog {
    /// Build a catalog, sorting the records by key.
    pub fn from_records(mut records: Vec<RepositoryRecord>) -> Self {
        records.sort_by(|a, b| a.key().as_bytes().cmp(b.key().as_bytes()));
        Self { records }
    }

    pub fn records(&self) -> &[RepositoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `(owner/name, description)` pairs for display.
    pub fn rows(&self) -> Vec<(String, String)> {
        self.records
            .iter()
            .map(|r| (r.key(), r.description.clone().unwrap_or_default()))
            .collect()
    }
}

/// Collect template repositories owned by `owner`, and starred ones if asked.
///
/// # Errors
///
/// Returns the first error from the forge.
pub async fn collect(
    forge: &dyn Forge,
    owner: &str,
    include_starred: bool,
) -> Result<Catalog, ForgeError> {
    let mut records = Vec::new();

    collect_source(forge, &CatalogSource::Owner(owner.to_string()), &mut records).await?;
    if include_starred {
        collect_source(forge, &CatalogSource::Starred, &mut records).await?;
    }

    Ok(Catalog::from_records(records))
}

/// Page through one source, appending templates to `records`.
async fn collect_source(
    forge: &dyn Forge,
    source: &CatalogSource,
    records: &mut Vec<RepositoryRecord>,
) -> Result<(), ForgeError> {
    let mut after: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = forge.repositories(source, after.as_deref()).await?;
        pages += 1;

        let before = records.len();
        records.extend(page.nodes.into_iter().filter(|r| r.is_template));
        tracing::debug!(
            ?source,
            page = pages,
            templates = records.len() - before,
            has_next = page.cursor.has_next_page,
            "fetched repositories"
        );

        if !page.cursor.has_next_page {
            break;
        }
        after = Some(page.cursor.end_cursor.unwrap_or_default());
    }

    Ok(())
}
