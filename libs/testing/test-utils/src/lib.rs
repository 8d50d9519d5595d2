//! Shared test utilities for the domain crates.
//!
//! - `TestMongo`: throwaway MongoDB container (feature: "mongo", default)
//! - `TestDataBuilder`: deterministic names and emails per test
//!
//! ```rust,ignore
//! use test_utils::{TestDataBuilder, TestMongo};
//!
//! #[tokio::test]
//! #[ignore = "requires Docker"]
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let db = mongo.database("my_mongo_test");
//!     let data = TestDataBuilder::from_test_name("my_mongo_test");
//!     let email = data.email("host");
//! }
//! ```

#[cfg(feature = "mongo")]
mod mongo;

#[cfg(feature = "mongo")]
pub use mongo::TestMongo;

/// Seeded generator so repeated runs of a test produce the same data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed derived from the test name.
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_event");
    /// assert!(builder.email("host").ends_with("@example.com"));
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// `test-{prefix}-{seed}-{suffix}`
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Lowercase address unique to this seed and suffix.
    pub fn email(&self, suffix: &str) -> String {
        format!("{}.{}@example.com", suffix.to_lowercase(), self.seed)
    }

    /// Collection-safe database name for isolating one test.
    pub fn database_name(&self) -> String {
        format!("airdnd_test_{}", self.seed)
    }
}
