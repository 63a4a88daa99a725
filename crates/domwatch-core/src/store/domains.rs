// # Domain Store
//
// The ordered list of monitored domains, kept in `domain.yaml`.
//
// ## Identity
//
// A record is identified by its FQDN alone. The list holds at most one record
// per FQDN; the mutation methods keep it that way by scanning before they
// insert. There is no index: operator-curated lists are small.
//
// ## File Format
//
// ```yaml
// domains:
//   - name: Example
//     fqdn: example.com
//     alerts: true
//     enabled: true
// ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use super::document::{self, Document, LoadOutcome};
use crate::Result;
use crate::config::StoreConfig;

/// A monitored domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Display name
    #[serde(default)]
    pub name: String,

    /// Fully qualified domain name, the identity key
    #[serde(default)]
    pub fqdn: String,

    /// Send alerts for this domain
    #[serde(default)]
    pub alerts: bool,

    /// Monitoring enabled for this domain
    #[serde(default)]
    pub enabled: bool,
}

impl Domain {
    /// Create a domain with alerts and monitoring switched off
    pub fn new(name: impl Into<String>, fqdn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fqdn: fqdn.into(),
            alerts: false,
            enabled: false,
        }
    }

    /// Enable or disable alerting
    pub fn with_alerts(mut self, alerts: bool) -> Self {
        self.alerts = alerts;
        self
    }

    /// Enable or disable monitoring
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// On-disk shape of the domain table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainFile {
    #[serde(default)]
    pub domains: Vec<Domain>,
}

impl Document for DomainFile {
    const KIND: &'static str = "domain table";

    fn is_blank(&self) -> bool {
        self.domains.is_empty()
    }
}

/// Result of an add or update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No record had this FQDN; the domain was appended
    Created,
    /// An existing record was replaced in its slot
    Updated,
}

/// File-backed list of monitored domains
#[derive(Debug)]
pub struct DomainStore {
    path: PathBuf,
    table: RwLock<DomainFile>,
    outcome: LoadOutcome,
}

impl DomainStore {
    /// Open the domain file named by `config`
    pub async fn load(config: &StoreConfig) -> Result<Self> {
        Self::open(config.domains_path()).await
    }

    /// Open the domain file at an explicit path
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let (table, outcome) = document::load_or_init::<DomainFile>(&path).await?;
        tracing::debug!("Domain table holds {} domain(s)", table.domains.len());

        Ok(Self {
            path,
            table: RwLock::new(table),
            outcome,
        })
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file was synthesized by this open
    pub fn load_outcome(&self) -> LoadOutcome {
        self.outcome
    }

    /// Add a domain, or replace the record that has the same FQDN
    ///
    /// A replacement overwrites the whole record at its current position;
    /// fields are not merged. A new domain goes to the end of the list.
    pub async fn add_domain(&self, domain: Domain) -> Result<UpsertOutcome> {
        let mut table = self.table.write().await;
        let mut next = table.clone();

        let index = next.domains.iter().position(|d| d.fqdn == domain.fqdn);
        let fqdn = domain.fqdn.clone();
        let outcome = match index {
            Some(index) => {
                next.domains[index] = domain;
                UpsertOutcome::Updated
            }
            None => {
                next.domains.push(domain);
                UpsertOutcome::Created
            }
        };

        // Memory only changes once the file holds the new table
        document::write(&self.path, &next).await?;
        *table = next;

        match outcome {
            UpsertOutcome::Updated => tracing::info!("Updated domain {}", fqdn),
            UpsertOutcome::Created => tracing::info!("Added domain {}", fqdn),
        }
        Ok(outcome)
    }

    /// Update a domain, adding it when no record has its FQDN
    ///
    /// Identical to [`DomainStore::add_domain`]; callers never need to check
    /// for existence first.
    pub async fn update_domain(&self, domain: Domain) -> Result<UpsertOutcome> {
        self.add_domain(domain).await
    }

    /// Remove the record whose FQDN matches `domain.fqdn`
    ///
    /// Only the FQDN is compared. Returns the removed record, or `None` when
    /// nothing matched; that case is not an error and the table is still
    /// flushed (the rewritten file is identical).
    pub async fn remove_domain(&self, domain: &Domain) -> Result<Option<Domain>> {
        let mut table = self.table.write().await;
        let mut next = table.clone();

        let index = next.domains.iter().position(|d| d.fqdn == domain.fqdn);
        let removed = index.map(|index| next.domains.remove(index));

        document::write(&self.path, &next).await?;
        *table = next;

        match &removed {
            Some(_) => tracing::info!("Removed domain {}", domain.fqdn),
            None => tracing::debug!("Domain {} not present, nothing removed", domain.fqdn),
        }
        Ok(removed)
    }

    /// Look up a domain by FQDN
    pub async fn get(&self, fqdn: &str) -> Option<Domain> {
        let table = self.table.read().await;
        table.domains.iter().find(|d| d.fqdn == fqdn).cloned()
    }

    /// All domains in stored order
    pub async fn domains(&self) -> Vec<Domain> {
        self.table.read().await.domains.clone()
    }

    /// Domains with monitoring switched on
    pub async fn enabled_domains(&self) -> Vec<Domain> {
        let table = self.table.read().await;
        table.domains.iter().filter(|d| d.enabled).cloned().collect()
    }

    /// Monitored domains that should raise alerts
    pub async fn alerting_domains(&self) -> Vec<Domain> {
        let table = self.table.read().await;
        table
            .domains
            .iter()
            .filter(|d| d.enabled && d.alerts)
            .cloned()
            .collect()
    }

    /// Number of domains in the table
    pub async fn len(&self) -> usize {
        self.table.read().await.domains.len()
    }

    /// Check if the table is empty
    pub async fn is_empty(&self) -> bool {
        self.table.read().await.domains.is_empty()
    }

    /// Write the in-memory table to disk
    pub async fn flush(&self) -> Result<()> {
        let table = self.table.read().await;
        document::write(&self.path, &*table).await
    }
}
