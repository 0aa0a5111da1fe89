// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client creation from an explicit kubeconfig file or the ambient environment

use crate::error::{PaasError, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Client;
use std::path::Path;
use tracing::{info, instrument};

/// Create a Kubernetes client, reading `kubeconfig_path` when given and inferring the
/// configuration (in-cluster or `$KUBECONFIG`) otherwise
#[instrument]
pub async fn create_client(kubeconfig_path: Option<&Path>) -> Result<Client> {
    let Some(path) = kubeconfig_path else {
        info!("No kubeconfig path configured, inferring cluster configuration");
        return Client::try_default().await.map_err(PaasError::Kube);
    };

    let kubeconfig = std::fs::read_to_string(path).map_err(|e| {
        PaasError::Kubeconfig(format!("Failed to read {}: {}", path.display(), e))
    })?;
    info!("Using kubeconfig from {}", path.display());
    create_client_from_kubeconfig(&kubeconfig).await
}

/// Create a Kubernetes client from a kubeconfig string
async fn create_client_from_kubeconfig(kubeconfig: &str) -> Result<Client> {
    let kubeconfig_parsed: Kubeconfig = serde_yaml::from_str(kubeconfig)
        .map_err(|e| PaasError::Kubeconfig(format!("Failed to parse kubeconfig: {}", e)))?;

    let client_config =
        kube::Config::from_custom_kubeconfig(kubeconfig_parsed, &KubeConfigOptions::default())
            .await
            .map_err(|e| PaasError::Kubeconfig(format!("Failed to create config: {}", e)))?;

    Client::try_from(client_config)
        .map_err(|e| PaasError::Kubeconfig(format!("Failed to create client: {}", e)))
}
