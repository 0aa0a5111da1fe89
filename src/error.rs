// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaasError {
    #[error("{kind} {namespace}/{name} already exists")]
    AlreadyExists {
        kind: &'static str,
        namespace: String,
        name: String,
    },

    #[error("{kind} {namespace}/{name} not found in cluster, it must be created first")]
    NotFound {
        kind: &'static str,
        namespace: String,
        name: String,
    },

    #[error("{kind} Not Exist: id {id}")]
    NotExist { kind: &'static str, id: i64 },

    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Kubeconfig error: {0}")]
    Kubeconfig(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PaasError>;

impl From<PaasError> for tonic::Status {
    fn from(err: PaasError) -> Self {
        let msg = err.to_string();
        match err {
            PaasError::AlreadyExists { .. } => tonic::Status::already_exists(msg),
            PaasError::NotFound { .. } => tonic::Status::failed_precondition(msg),
            PaasError::NotExist { .. } => tonic::Status::not_found(msg),
            PaasError::Kube(_) => tonic::Status::unavailable(msg),
            PaasError::Database(_) | PaasError::Kubeconfig(_) | PaasError::Config(_) => {
                tonic::Status::internal(msg)
            }
        }
    }
}
