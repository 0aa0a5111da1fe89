// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::proto::{self, svc_service_server::SvcService};
use super::response;
use crate::data::SvcDataService;
use crate::error::PaasError;
use crate::types::{ManagedResource, Svc, SvcPort};
use tonic::{Request, Response, Status};
use tracing::{error, info};

impl From<proto::SvcInfo> for Svc {
    fn from(info: proto::SvcInfo) -> Self {
        Svc {
            id: info.id,
            name: info.svc_name,
            namespace: info.svc_namespace,
            pod_name: info.svc_pod_name,
            svc_type: info.svc_type,
            external_name: info.svc_external_name,
            team_id: info.svc_team_id,
            ports: info.svc_port.into_iter().map(SvcPort::from).collect(),
        }
    }
}

impl From<proto::SvcPort> for SvcPort {
    fn from(port: proto::SvcPort) -> Self {
        SvcPort {
            id: port.id,
            svc_id: port.svc_id,
            port: port.svc_port,
            target_port: port.svc_target_port,
            node_port: port.svc_node_port,
            protocol: port.svc_port_protocol,
        }
    }
}

impl From<Svc> for proto::SvcInfo {
    fn from(svc: Svc) -> Self {
        proto::SvcInfo {
            id: svc.id,
            svc_name: svc.name,
            svc_namespace: svc.namespace,
            svc_pod_name: svc.pod_name,
            svc_type: svc.svc_type,
            svc_external_name: svc.external_name,
            svc_team_id: svc.team_id,
            svc_port: svc.ports.into_iter().map(proto::SvcPort::from).collect(),
        }
    }
}

impl From<SvcPort> for proto::SvcPort {
    fn from(port: SvcPort) -> Self {
        proto::SvcPort {
            id: port.id,
            svc_id: port.svc_id,
            svc_port: port.port,
            svc_target_port: port.target_port,
            svc_node_port: port.node_port,
            svc_port_protocol: port.protocol,
        }
    }
}

pub struct SvcHandler {
    data: SvcDataService,
}

impl SvcHandler {
    pub fn new(data: SvcDataService) -> Self {
        Self { data }
    }
}

fn failed(err: PaasError) -> Status {
    error!("{}", err);
    Status::from(err)
}

#[tonic::async_trait]
impl SvcService for SvcHandler {
    async fn add_svc(
        &self,
        request: Request<proto::SvcInfo>,
    ) -> Result<Response<proto::Response>, Status> {
        info!("Add Svc");
        let svc = Svc::from(request.into_inner());

        self.data.add(&svc).await.map_err(failed)?;
        Ok(response("Add success"))
    }

    async fn delete_svc(
        &self,
        request: Request<proto::SvcId>,
    ) -> Result<Response<proto::Response>, Status> {
        info!("Del Svc");
        let id = request.into_inner().id;

        self.data.delete(id).await.map_err(failed)?;
        Ok(response("Del success"))
    }

    async fn update_svc(
        &self,
        request: Request<proto::SvcInfo>,
    ) -> Result<Response<proto::Response>, Status> {
        info!("Update Svc");
        let svc = Svc::from(request.into_inner());

        if self.data.find_by_id(svc.id).await.map_err(failed)?.is_none() {
            return Err(failed(PaasError::NotExist {
                kind: Svc::KIND,
                id: svc.id,
            }));
        }

        self.data.update(&svc).await.map_err(failed)?;
        Ok(response("Update success"))
    }

    async fn find_svc_by_id(
        &self,
        request: Request<proto::SvcId>,
    ) -> Result<Response<proto::SvcInfo>, Status> {
        let id = request.into_inner().id;

        match self.data.find_by_id(id).await.map_err(failed)? {
            Some(svc) => Ok(Response::new(svc.into())),
            None => Err(failed(PaasError::NotExist { kind: Svc::KIND, id })),
        }
    }

    async fn find_all_svc(
        &self,
        _request: Request<proto::FindAll>,
    ) -> Result<Response<proto::AllSvc>, Status> {
        let all = self.data.find_all().await.map_err(failed)?;

        Ok(Response::new(proto::AllSvc {
            svc_info: all.into_iter().map(proto::SvcInfo::from).collect(),
        }))
    }
}
