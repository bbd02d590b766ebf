//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use archivio_auth::jwt::{JwtDecoder, JwtEncoder};
use archivio_auth::password::{PasswordHasher, PasswordValidator};
use archivio_core::config::AppConfig;
use archivio_database::store::{ActivityStore, DepartmentStore, FileStore, UserStore};
use archivio_service::activity::ActivityService;
use archivio_service::department::DepartmentService;
use archivio_service::file::{FileQueryEngine, FileService, UploadService};
use archivio_service::stats::StatsService;
use archivio_service::user::UserService;
use archivio_storage::LocalBlobStore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// cheaply cloneable (`Arc`-backed).
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// JWT token decoder and validator.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// File listing engine.
    pub query_engine: Arc<FileQueryEngine>,
    /// File lifecycle service.
    pub file_service: Arc<FileService>,
    /// Upload service.
    pub upload_service: Arc<UploadService>,
    /// User management and authentication service.
    pub user_service: Arc<UserService>,
    /// Department management service.
    pub department_service: Arc<DepartmentService>,
    /// Statistics service.
    pub stats_service: Arc<StatsService>,
    /// Activity feed service.
    pub activity_service: Arc<ActivityService>,
}

/// The store implementations the state is built over.
#[derive(Clone)]
pub struct Stores {
    /// User store.
    pub users: Arc<dyn UserStore>,
    /// Department store.
    pub departments: Arc<dyn DepartmentStore>,
    /// File store.
    pub files: Arc<dyn FileStore>,
    /// Activity store.
    pub activity: Arc<dyn ActivityStore>,
}

impl AppState {
    /// Wire the full service graph over the given stores and blob store.
    pub fn new(config: AppConfig, stores: Stores, blobs: LocalBlobStore) -> Self {
        let config = Arc::new(config);

        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let jwt_encoder = JwtEncoder::new(&config.auth);
        let hasher = PasswordHasher::new();
        let password_policy = PasswordValidator::new(&config.auth);

        let query_engine = FileQueryEngine::new(stores.files.clone(), stores.users.clone());

        let file_service = Arc::new(FileService::new(
            stores.files.clone(),
            stores.activity.clone(),
            query_engine.clone(),
            blobs.clone(),
        ));
        let upload_service = Arc::new(UploadService::new(
            stores.files.clone(),
            stores.users.clone(),
            stores.activity.clone(),
            blobs,
            config.storage.clone(),
        ));
        let user_service = Arc::new(UserService::new(
            stores.users.clone(),
            stores.activity.clone(),
            hasher,
            password_policy,
            jwt_encoder,
        ));
        let department_service = Arc::new(DepartmentService::new(
            stores.departments.clone(),
            stores.users.clone(),
            stores.files.clone(),
            stores.activity.clone(),
        ));
        let stats_service = Arc::new(StatsService::new(
            stores.files.clone(),
            stores.users.clone(),
            stores.departments.clone(),
        ));
        let activity_service = Arc::new(ActivityService::new(stores.activity));

        Self {
            config,
            jwt_decoder,
            query_engine: Arc::new(query_engine),
            file_service,
            upload_service,
            user_service,
            department_service,
            stats_service,
            activity_service,
        }
    }
}
