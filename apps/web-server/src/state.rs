//! Application state - shared across all handlers.

use std::sync::Arc;

use scribe_core::ports::{
    Cache, Clock, CommentRepository, FollowRepository, GroupRepository, MediaStorage,
    PasswordService, PostRepository, TokenService, UserRepository,
};
use scribe_core::services::{FeedService, FollowService};
use scribe_infra::{
    Argon2PasswordService, InMemoryCache, InMemoryCommentRepository, InMemoryFollowRepository,
    InMemoryGroupRepository, InMemoryMediaStorage, InMemoryPostRepository,
    InMemoryUserRepository, JwtConfig, JwtTokenService, LocalMediaStorage, MemoryStore,
    SystemClock,
};

#[cfg(feature = "postgres")]
use scribe_infra::{
    PostgresCommentRepository, PostgresFollowRepository, PostgresGroupRepository,
    PostgresPostRepository, PostgresUserRepository, database,
};

use crate::config::{AppConfig, Settings};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub feed: FeedService,
    pub follows: FollowService,
    pub cache: Arc<dyn Cache>,
    pub media: Arc<dyn MediaStorage>,
    pub clock: Arc<dyn Clock>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub settings: Settings,
}

/// One repository per entity, all over the same backing store.
struct Repositories {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    follows: Arc<dyn FollowRepository>,
}

impl Repositories {
    fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: Arc::new(InMemoryUserRepository::new(store.clone())),
            groups: Arc::new(InMemoryGroupRepository::new(store.clone())),
            posts: Arc::new(InMemoryPostRepository::new(store.clone())),
            comments: Arc::new(InMemoryCommentRepository::new(store.clone())),
            follows: Arc::new(InMemoryFollowRepository::new(store)),
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(db: sea_orm::DbConn) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            groups: Arc::new(PostgresGroupRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db.clone())),
            follows: Arc::new(PostgresFollowRepository::new(db)),
        }
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let repos = match &config.database {
            Some(db_config) => match database::connect(db_config).await {
                Ok(db) => Repositories::postgres(db),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Repositories::in_memory()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Repositories::in_memory()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let repos = {
            tracing::info!("Running without postgres feature - using in-memory repositories");
            Repositories::in_memory()
        };

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let state = Self::assemble(
            repos,
            clock,
            Arc::new(LocalMediaStorage::new(config.media_root.clone())),
            config.jwt.clone(),
            config.settings.clone(),
        );

        tracing::info!("Application state initialized");
        state
    }

    /// Fully in-memory state around the given clock.
    pub fn in_memory(clock: Arc<dyn Clock>, settings: Settings) -> Self {
        Self::assemble(
            Repositories::in_memory(),
            clock,
            Arc::new(InMemoryMediaStorage::new()),
            JwtConfig::default(),
            settings,
        )
    }

    fn assemble(
        repos: Repositories,
        clock: Arc<dyn Clock>,
        media: Arc<dyn MediaStorage>,
        jwt: JwtConfig,
        settings: Settings,
    ) -> Self {
        Self {
            feed: FeedService::new(repos.posts.clone()),
            follows: FollowService::new(repos.follows),
            users: repos.users,
            groups: repos.groups,
            posts: repos.posts,
            comments: repos.comments,
            cache: Arc::new(InMemoryCache::with_clock(clock.clone())),
            media,
            clock,
            tokens: Arc::new(JwtTokenService::new(jwt)),
            passwords: Arc::new(Argon2PasswordService::new()),
            settings,
        }
    }
}
