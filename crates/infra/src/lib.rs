//! Infrastructure layer: storage adapters and data bootstrap.

pub mod seed;
pub mod store;

pub use seed::{SeedError, SeedReport, seed_demo_data};
pub use store::{
    ArticleStore, IdentityStore, InMemoryStore, Page, ResourceAccessor, StoreError, UserStore,
};
