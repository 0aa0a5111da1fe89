// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities: client creation, cluster object builders and the sync adapter.

pub mod adapter;
pub mod client;
pub mod deployment;
pub mod service;

pub use adapter::ClusterAdapter;
pub use client::create_client;

use crate::constants::{annotations, labels, PORT_NAME_PREFIX};
use std::collections::BTreeMap;

/// Labels shared by every object we create, keyed on the workload name
pub(crate) fn managed_labels(app_name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (labels::APP_NAME.to_string(), app_name.to_string()),
        (labels::AUTHOR.to_string(), labels::AUTHOR_VALUE.to_string()),
    ])
}

pub(crate) fn managed_annotations() -> BTreeMap<String, String> {
    BTreeMap::from([(
        annotations::GENERATED_BY.to_string(),
        annotations::GENERATED_BY_VALUE.to_string(),
    )])
}

/// Port names are derived from the number so two ports sharing a protocol never collide
pub(crate) fn port_name(port: i32) -> String {
    format!("{}{}", PORT_NAME_PREFIX, port)
}
