//! Shared fixtures for the store contract tests
//!
//! Every helper works inside a fresh temporary directory so tests never see
//! each other's files.

#![allow(dead_code)]

use domwatch_core::{Domain, DomainStore, StoreConfig};
use tempfile::TempDir;

/// A temporary base directory and the config pointing at it
pub struct Workspace {
    pub dir: TempDir,
    pub config: StoreConfig,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = StoreConfig::new(dir.path());
        Self { dir, config }
    }

    /// Raw bytes of a file under the base directory
    pub async fn read(&self, path: &std::path::Path) -> Vec<u8> {
        tokio::fs::read(path).await.expect("file readable")
    }
}

/// Domain with both flags set
pub fn monitored(name: &str, fqdn: &str) -> Domain {
    Domain::new(name, fqdn).with_alerts(true).with_enabled(true)
}

/// A few distinct starting collections for property-style checks
pub fn starting_collections() -> Vec<Vec<Domain>> {
    vec![
        vec![],
        vec![monitored("Example", "example.com")],
        vec![
            monitored("A", "a.example"),
            Domain::new("B", "b.example"),
            monitored("C", "c.example").with_alerts(false),
        ],
    ]
}

/// Open a fresh domain store seeded with `domains`
pub async fn seeded_store(domains: &[Domain]) -> (Workspace, DomainStore) {
    let ws = Workspace::new();
    let store = DomainStore::load(&ws.config).await.expect("store opens");
    for domain in domains {
        store.add_domain(domain.clone()).await.expect("seed domain");
    }
    (ws, store)
}

/// FQDNs in stored order
pub async fn fqdns(store: &DomainStore) -> Vec<String> {
    store.domains().await.into_iter().map(|d| d.fqdn).collect()
}
