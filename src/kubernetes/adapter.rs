// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster sync adapter: mirrors create/update/delete of a managed resource into the cluster.

use crate::error::{PaasError, Result};
use crate::types::ManagedResource;
use kube::{
    api::{DeleteParams, PostParams},
    Api, Client,
};
use std::marker::PhantomData;
use tracing::{debug, error, info, instrument};

/// Issues one synchronous cluster API call per operation; nothing is watched or retried.
pub struct ClusterAdapter<R> {
    client: Client,
    _kind: PhantomData<fn() -> R>,
}

impl<R: ManagedResource> ClusterAdapter<R> {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            _kind: PhantomData,
        }
    }

    fn api(&self, namespace: &str) -> Api<R::Object> {
        Api::namespaced(self.client.clone(), namespace)
    }

    /// Create the cluster object, failing if one with the same name already exists
    #[instrument(skip(self, resource), fields(kind = R::KIND, name = %resource.name(), namespace = %resource.namespace()))]
    pub async fn create_in_cluster(&self, resource: &R) -> Result<()> {
        let api = self.api(resource.namespace());

        if exists(&api, resource.name()).await {
            error!(
                "{} {}/{} already exists in cluster",
                R::KIND,
                resource.namespace(),
                resource.name()
            );
            return Err(PaasError::AlreadyExists {
                kind: R::KIND,
                namespace: resource.namespace().to_string(),
                name: resource.name().to_string(),
            });
        }

        api.create(&PostParams::default(), &resource.to_cluster_object())
            .await?;

        info!(
            "Created {} {}/{} in cluster",
            R::KIND,
            resource.namespace(),
            resource.name()
        );
        Ok(())
    }

    /// Replace the cluster object with a freshly built one.
    ///
    /// The existing object is only used as an existence check; whatever else it carries
    /// (labels, ports or settings edited outside this service) is overwritten.
    #[instrument(skip(self, resource), fields(kind = R::KIND, name = %resource.name(), namespace = %resource.namespace()))]
    pub async fn update_in_cluster(&self, resource: &R) -> Result<()> {
        let api = self.api(resource.namespace());

        if !exists(&api, resource.name()).await {
            error!(
                "{} {}/{} does not exist in cluster, create it first",
                R::KIND,
                resource.namespace(),
                resource.name()
            );
            return Err(PaasError::NotFound {
                kind: R::KIND,
                namespace: resource.namespace().to_string(),
                name: resource.name().to_string(),
            });
        }

        api.replace(
            resource.name(),
            &PostParams::default(),
            &resource.to_cluster_object(),
        )
        .await?;

        info!(
            "Updated {} {}/{} in cluster",
            R::KIND,
            resource.namespace(),
            resource.name()
        );
        Ok(())
    }

    #[instrument(skip(self, resource), fields(kind = R::KIND, name = %resource.name(), namespace = %resource.namespace()))]
    pub async fn delete_from_cluster(&self, resource: &R) -> Result<()> {
        self.api(resource.namespace())
            .delete(resource.name(), &DeleteParams::default())
            .await?;

        info!(
            "Deleted {} {}/{} from cluster",
            R::KIND,
            resource.namespace(),
            resource.name()
        );
        Ok(())
    }
}

/// Any failed lookup counts as absence, not only a 404.
async fn exists<K>(api: &Api<K>, name: &str) -> bool
where
    K: Clone + serde::de::DeserializeOwned + std::fmt::Debug,
{
    match api.get(name).await {
        Ok(_) => true,
        Err(e) => {
            debug!("Lookup of {} failed, treating as absent: {}", name, e);
            false
        }
    }
}
