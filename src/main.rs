// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use tonic::transport::Server;
use tracing::info;
use tracing_subscriber::EnvFilter;

use paas_resources::config::{Config, ResourceKind};
use paas_resources::data::{PodDataService, SvcDataService};
use paas_resources::kubernetes::create_client;
use paas_resources::rpc::proto::pod_service_server::PodServiceServer;
use paas_resources::rpc::proto::svc_service_server::SvcServiceServer;
use paas_resources::rpc::proto::FILE_DESCRIPTOR_SET;
use paas_resources::rpc::{PodHandler, SvcHandler};
use paas_resources::store::{self, PodStore, ResourceStore, SvcStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Starting {} service", config.kind);

    let pool = store::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    // Create Kubernetes client
    let client = create_client(config.kubeconfig_path.as_deref())
        .await
        .context("Failed to create Kubernetes client")?;
    info!("Connected to Kubernetes cluster");

    let reflection = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
        .build_v1()
        .context("Failed to build reflection service")?;

    let router = match config.kind {
        ResourceKind::Pod => {
            let store = PodStore::new(pool);
            store.init_tables().await.context("Failed to create pod tables")?;
            let handler = PodHandler::new(PodDataService::new(client, store));
            Server::builder()
                .add_service(reflection)
                .add_service(PodServiceServer::new(handler))
        }
        ResourceKind::Svc => {
            let store = SvcStore::new(pool);
            store.init_tables().await.context("Failed to create svc tables")?;
            let handler = SvcHandler::new(SvcDataService::new(client, store));
            Server::builder()
                .add_service(reflection)
                .add_service(SvcServiceServer::new(handler))
        }
    };

    info!(
        "{} service listening on {}, advertised as {} to registry {}",
        config.kind, config.listen_addr, config.advertise_addr, config.registry_address
    );

    router
        .serve_with_shutdown(config.listen_addr, async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .context("gRPC server failed")?;

    info!("{} service stopped", config.kind);
    Ok(())
}
