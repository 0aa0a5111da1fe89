// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Domain models for the resource kinds mirrored into the cluster.

pub mod pod;
pub mod svc;

pub use pod::{Pod, PodEnv, PodPort};
pub use svc::{Svc, SvcPort};

use k8s_openapi::NamespaceResourceScope;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

/// A resource kind that lives both in the relational store and in the cluster.
pub trait ManagedResource: Clone + Debug + Send + Sync + 'static {
    /// Human readable kind, used in logs and error messages
    const KIND: &'static str;

    /// The cluster object this resource is mirrored as
    type Object: kube::Resource<Scope = NamespaceResourceScope, DynamicType = ()>
        + Clone
        + Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    fn id(&self) -> i64;

    /// Name of the cluster object
    fn name(&self) -> &str;

    /// Namespace of the cluster object
    fn namespace(&self) -> &str;

    /// Overwrite fields of `self` with the non-default fields of `incoming`.
    /// A non-empty child list replaces the stored one, an empty one keeps it.
    fn merge_from(&mut self, incoming: &Self);

    /// Build the cluster object from scratch
    fn to_cluster_object(&self) -> Self::Object;
}

pub(crate) fn merge_string(target: &mut String, incoming: &str) {
    if !incoming.is_empty() {
        *target = incoming.to_string();
    }
}

pub(crate) fn merge_value<T: Copy + PartialEq + Default>(target: &mut T, incoming: T) {
    if incoming != T::default() {
        *target = incoming;
    }
}

pub(crate) fn merge_children<T: Clone>(target: &mut Vec<T>, incoming: &[T]) {
    if !incoming.is_empty() {
        *target = incoming.to_vec();
    }
}
