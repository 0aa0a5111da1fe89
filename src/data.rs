// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Orchestrates the cluster mirror and the relational store for one resource kind.
//!
//! The cluster is always written first. There is no distributed transaction: if the
//! store write fails on `add`, the freshly created cluster object is deleted again;
//! on `delete` and `update` a late store failure leaves the two sides out of sync.

use crate::error::{PaasError, Result};
use crate::kubernetes::ClusterAdapter;
use crate::store::{PodStore, ResourceStore, SvcStore};
use crate::types::{ManagedResource, Pod, Svc};
use kube::Client;
use tracing::{error, info, instrument, warn};

pub struct ResourceDataService<R, S> {
    adapter: ClusterAdapter<R>,
    store: S,
}

pub type SvcDataService = ResourceDataService<Svc, SvcStore>;
pub type PodDataService = ResourceDataService<Pod, PodStore>;

impl<R, S> ResourceDataService<R, S>
where
    R: ManagedResource,
    S: ResourceStore<Resource = R>,
{
    pub fn new(client: Client, store: S) -> Self {
        Self {
            adapter: ClusterAdapter::new(client),
            store,
        }
    }

    /// Create the cluster object, then persist the resource; returns the new row id
    #[instrument(skip(self, resource), fields(kind = R::KIND, name = %resource.name(), namespace = %resource.namespace()))]
    pub async fn add(&self, resource: &R) -> Result<i64> {
        self.adapter.create_in_cluster(resource).await?;

        match self.store.create(resource).await {
            Ok(id) => {
                info!("{} {} added with id {}", R::KIND, resource.name(), id);
                Ok(id)
            }
            Err(e) => {
                error!(
                    "Persisting {} {} failed, removing it from the cluster again: {}",
                    R::KIND,
                    resource.name(),
                    e
                );
                if let Err(cleanup) = self.adapter.delete_from_cluster(resource).await {
                    warn!(
                        "{} {}/{} is left in the cluster without a row: {}",
                        R::KIND,
                        resource.namespace(),
                        resource.name(),
                        cleanup
                    );
                }
                Err(e)
            }
        }
    }

    /// Delete the cluster object, then the row and its children.
    /// A missing row fails before the cluster is contacted.
    #[instrument(skip(self), fields(kind = R::KIND))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        let Some(resource) = self.store.find_by_id(id).await? else {
            return Err(PaasError::NotExist { kind: R::KIND, id });
        };

        self.adapter.delete_from_cluster(&resource).await?;
        self.store.delete_by_id(id).await?;

        info!("{} {} (id {}) deleted", R::KIND, resource.name(), id);
        Ok(())
    }

    /// Replace the cluster object with one built from the stored row merged with `resource`,
    /// then apply the same merge to the row.
    ///
    /// Without a stored row the cluster object is built from `resource` alone and the
    /// update still reaches the cluster before failing with `NotExist`.
    #[instrument(skip(self, resource), fields(kind = R::KIND, id = resource.id()))]
    pub async fn update(&self, resource: &R) -> Result<()> {
        let stored = self.store.find_by_id(resource.id()).await?;
        let target = match &stored {
            Some(stored) => {
                let mut merged = stored.clone();
                merged.merge_from(resource);
                merged
            }
            None => resource.clone(),
        };

        self.adapter.update_in_cluster(&target).await?;

        if stored.is_none() {
            return Err(PaasError::NotExist {
                kind: R::KIND,
                id: resource.id(),
            });
        }
        // The store re-reads and merges inside its own transaction
        self.store.update(resource).await?;

        info!("{} {} (id {}) updated", R::KIND, target.name(), target.id());
        Ok(())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<R>> {
        self.store.find_by_id(id).await
    }

    pub async fn find_all(&self) -> Result<Vec<R>> {
        self.store.find_all().await
    }
}
