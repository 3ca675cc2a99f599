// storage/mod.rs
// Database operations module

pub mod insert;
pub mod migrations;
pub mod models;
pub mod pool;
pub mod query;
pub mod reset;
#[cfg(test)]
pub mod test_helpers;

// Re-export commonly used items
pub use insert::{add_monitored_domain, insert_query_record, replace_domain_stats};
pub use migrations::run_migrations;
pub use models::{DomainStats, MonitoredDomain, QueryRecord};
pub use pool::init_db_pool_with_path;
pub use query::{
    fetch_all_domain_stats, fetch_domain_stats, fetch_monitored_domains, fetch_query_records,
};
pub use reset::{reset_database, seed_default_domains};
