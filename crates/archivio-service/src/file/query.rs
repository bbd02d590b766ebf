//! The file query engine: role-scoped, filtered, paginated listings.
//!
//! Scoping happens here, before the store is consulted: a USER-role caller
//! has the department criterion overwritten with their own department, so
//! row visibility is enforced server-side rather than hidden in the UI.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use archivio_core::presentation::{Density, PresentationHints};
use archivio_core::result::AppResult;
use archivio_core::types::{Page, PageRequest};
use archivio_database::store::{FileStore, UserStore};
use archivio_entity::file::{FileFilter, FileSort, StoredFile};
use archivio_entity::user::UserRole;

use crate::context::RequestContext;

/// Label shown when an uploader cannot be resolved.
const UNKNOWN_UPLOADER: &str = "Unknown";

/// A stored file enriched with its uploader's display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileWithUploader {
    /// The file record.
    #[serde(flatten)]
    pub file: StoredFile,
    /// Display name of the uploading user, or a fallback label.
    #[serde(rename = "uploaderName")]
    pub uploader_name: String,
}

/// Parsed listing parameters, already validated by the API layer.
#[derive(Debug, Clone, Default)]
pub struct ListFilesParams {
    /// Filter criteria.
    pub filter: FileFilter,
    /// Sort specification.
    pub sort: FileSort,
    /// Page number and size.
    pub page: PageRequest,
    /// The density the client is currently rendering at.
    pub current_density: Option<Density>,
}

/// A page of enriched files plus presentation hints for the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileListing {
    /// The page of files.
    #[serde(flatten)]
    pub page: Page<FileWithUploader>,
    /// Rendering hints derived from the total count.
    pub presentation: PresentationHints,
}

/// Composes filters, scoping, sorting, and pagination over the file store.
#[derive(Clone)]
pub struct FileQueryEngine {
    files: Arc<dyn FileStore>,
    users: Arc<dyn UserStore>,
}

impl FileQueryEngine {
    /// Create a new query engine over the given stores.
    pub fn new(files: Arc<dyn FileStore>, users: Arc<dyn UserStore>) -> Self {
        Self { files, users }
    }

    /// Narrow a filter to what the caller is allowed to see.
    ///
    /// USER-role callers only ever see their own department; a user with
    /// no department sees nothing (`None`). Elevated roles keep the filter
    /// as-is.
    fn scope_filter(ctx: &RequestContext, filter: FileFilter) -> Option<FileFilter> {
        if ctx.role != UserRole::User {
            return Some(filter);
        }
        ctx.department
            .as_deref()
            .map(|department| filter.scoped_to_department(department))
    }

    /// Run a role-scoped, filtered, paginated listing.
    pub async fn list(&self, ctx: &RequestContext, params: ListFilesParams) -> AppResult<FileListing> {
        let Some(filter) = Self::scope_filter(ctx, params.filter) else {
            // A USER without a department has nothing visible.
            return Ok(FileListing {
                page: Page::empty(&params.page),
                presentation: PresentationHints::for_listing(
                    0,
                    params.current_density.unwrap_or(Density::Cards),
                ),
            });
        };
        let page = self.files.query(&filter, params.sort, &params.page).await?;
        let total = page.total;

        let enriched = self.enrich(page).await;
        let presentation = PresentationHints::for_listing(
            total,
            params.current_density.unwrap_or(Density::Cards),
        );

        Ok(FileListing {
            page: enriched,
            presentation,
        })
    }

    /// List the files uploaded by a specific user, unscoped by department.
    ///
    /// Callers are checked by the file service before this runs.
    pub async fn list_by_owner(
        &self,
        owner_id: Uuid,
        sort: FileSort,
        page: &PageRequest,
    ) -> AppResult<Page<FileWithUploader>> {
        let filter = FileFilter {
            uploaded_by: Some(owner_id),
            ..Default::default()
        };
        let result = self.files.query(&filter, sort, page).await?;
        Ok(self.enrich(result).await)
    }

    /// Attach uploader display names with one batched user lookup.
    ///
    /// Resolution failures degrade to the fallback label; they never fail
    /// the listing itself.
    async fn enrich(&self, page: Page<StoredFile>) -> Page<FileWithUploader> {
        let mut uploader_ids: Vec<Uuid> = page
            .data
            .iter()
            .filter_map(|f| f.uploaded_by)
            .collect();
        uploader_ids.sort();
        uploader_ids.dedup();

        let names: HashMap<Uuid, String> = match self.users.find_many(&uploader_ids).await {
            Ok(users) => users
                .into_iter()
                .map(|u| (u.id, u.display_name()))
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Uploader lookup failed; using fallback labels");
                HashMap::new()
            }
        };

        page.map(|file| {
            let uploader_name = file
                .uploaded_by
                .and_then(|id| names.get(&id).cloned())
                .unwrap_or_else(|| UNKNOWN_UPLOADER.to_string());
            FileWithUploader {
                file,
                uploader_name,
            }
        })
    }
}
