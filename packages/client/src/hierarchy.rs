//! Disk → partition → filesystem path navigation.
//!
//! All three listings share the same response envelope, `{"result": [...]}`,
//! where the result field may be absent or null for an empty set. Decoding
//! treats both as an empty sequence, never an error; transport and status
//! failures still propagate so the caller can alert before degrading to an
//! empty display.

use serde::Deserialize;
use tracing::debug;

use fruitpunch_api::ApiClient;

use crate::error::Error;
use crate::inflight::Gate;
use crate::session::Session;

/// Top-level addressable storage unit.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Disk {
    pub id: String,
    pub name: String,
}

/// A subdivision of a disk with its own filesystem type. The parent disk id
/// is not on the wire; it is attached client-side from the request scope.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Partition {
    pub id: String,
    pub name: String,
    #[serde(rename = "fileSystem", default)]
    pub file_system: String,
    #[serde(skip)]
    pub disk_id: String,
}

/// Kind of a filesystem entry.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
}

/// One entry in a filesystem listing. Names are unique per query only by
/// service-side contract; duplicates are kept in arrival order rather than
/// keyed by name.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FsEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub name: String,
}

/// The shared listing envelope. The Go-style backend marshals empty sets as
/// null, so the field must tolerate both null and absence.
#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    result: Option<Vec<T>>,
}

impl<T> ListResponse<T> {
    fn into_entries(self) -> Vec<T> {
        self.result.unwrap_or_default()
    }
}

/// Listing and search operations over the storage hierarchy.
///
/// Stateless apart from in-flight tracking: every call is a fresh fetch, no
/// results are cached across navigations. All operations require an
/// authenticated [`Session`] and are safe to call with any id; existence
/// validation is the service's responsibility.
#[derive(Default)]
pub struct Navigator {
    gate: Gate,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// List all disks. An absent or null result set is an empty sequence.
    pub fn list_disks(&self, client: &ApiClient, session: &Session) -> Result<Vec<Disk>, Error> {
        session.require_authenticated()?;
        let _token = self.gate.begin("disks")?;

        let response: ListResponse<Disk> = client.get("disks")?;
        let disks = response.into_entries();
        debug!(count = disks.len(), "listed disks");
        Ok(disks)
    }

    /// List the partitions of one disk, each tagged with its parent disk id.
    pub fn list_partitions(
        &self,
        client: &ApiClient,
        session: &Session,
        disk_id: &str,
    ) -> Result<Vec<Partition>, Error> {
        session.require_authenticated()?;
        let _token = self.gate.begin("partitions")?;

        let response: ListResponse<Partition> =
            client.get(&format!("partitions/{}", disk_id))?;
        let mut partitions = response.into_entries();
        for partition in &mut partitions {
            partition.disk_id = disk_id.to_string();
        }
        debug!(disk_id, count = partitions.len(), "listed partitions");
        Ok(partitions)
    }

    /// List the named path within a partition's filesystem.
    ///
    /// The path is an opaque string scoped per partition; no client-side
    /// normalization is performed; whatever the operator supplies is the
    /// query.
    pub fn search(
        &self,
        client: &ApiClient,
        session: &Session,
        partition_id: &str,
        path: &str,
    ) -> Result<Vec<FsEntry>, Error> {
        session.require_authenticated()?;
        let _token = self.gate.begin("search")?;

        let response: ListResponse<FsEntry> = client.get_with_query(
            &format!("filesystem/{}", partition_id),
            &[("path", path)],
        )?;
        let entries = response.into_entries();
        debug!(partition_id, path, count = entries.len(), "searched path");
        Ok(entries)
    }
}

/// The view context for one partition's filesystem.
///
/// Opening the view issues the initial `"/"` search exactly once without
/// operator interaction; every explicit search afterwards re-queries the
/// service. Only the last fetched entries are held.
pub struct FilesystemView {
    partition_id: String,
    path: String,
    entries: Vec<FsEntry>,
}

impl FilesystemView {
    /// Open the filesystem view for a partition, running the initial
    /// search at `"/"`.
    pub fn open(
        navigator: &Navigator,
        client: &ApiClient,
        session: &Session,
        partition_id: impl Into<String>,
    ) -> Result<Self, Error> {
        let partition_id = partition_id.into();
        let entries = navigator.search(client, session, &partition_id, "/")?;

        Ok(Self {
            partition_id,
            path: "/".to_string(),
            entries,
        })
    }

    /// Re-run the search at an operator-supplied path and keep the results.
    pub fn search(
        &mut self,
        navigator: &Navigator,
        client: &ApiClient,
        session: &Session,
        path: &str,
    ) -> Result<&[FsEntry], Error> {
        let entries = navigator.search(client, session, &self.partition_id, path)?;
        self.path = path.to_string();
        self.entries = entries;
        Ok(&self.entries)
    }

    pub fn partition_id(&self) -> &str {
        &self.partition_id
    }

    /// The path of the last search.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Entries from the last search, in arrival order.
    pub fn entries(&self) -> &[FsEntry] {
        &self.entries
    }
}
