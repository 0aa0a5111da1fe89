// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! gRPC surface: generated protobuf code and the per-kind handlers.

pub mod pod;
pub mod svc;

pub use pod::PodHandler;
pub use svc::SvcHandler;

pub mod proto {
    tonic::include_proto!("paas");

    /// File descriptor set for gRPC reflection
    pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("paas_descriptor");
}

pub(crate) fn response(msg: &str) -> tonic::Response<proto::Response> {
    tonic::Response::new(proto::Response {
        msg: msg.to_string(),
    })
}
