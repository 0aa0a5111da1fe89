// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Labels put on every object this service creates in the cluster
pub mod labels {
    /// Ties a Service selector to the Deployment pods it fronts
    pub const APP_NAME: &str = "app-name";
    pub const AUTHOR: &str = "author";
    pub const AUTHOR_VALUE: &str = "paas-resources";
}

/// Annotations put on every object this service creates in the cluster
pub mod annotations {
    pub const GENERATED_BY: &str = "paas.io/generated-by";
    pub const GENERATED_BY_VALUE: &str = "paas-resources";
}

/// Defaults applied when a request leaves a field empty
pub mod defaults {
    pub const SERVICE_TYPE: &str = "ClusterIP";
    pub const PORT_PROTOCOL: &str = "TCP";
    pub const PULL_POLICY: &str = "IfNotPresent";
    pub const REPLICAS: i32 = 1;
}

/// Prefix of the generated cluster port names, followed by the port number
pub const PORT_NAME_PREFIX: &str = "port-";
