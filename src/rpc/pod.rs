// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::proto::{self, pod_service_server::PodService};
use super::response;
use crate::data::PodDataService;
use crate::error::PaasError;
use crate::types::{ManagedResource, Pod, PodEnv, PodPort};
use tonic::{Request, Response, Status};
use tracing::{error, info};

impl From<proto::PodInfo> for Pod {
    fn from(info: proto::PodInfo) -> Self {
        Pod {
            id: info.id,
            name: info.pod_name,
            namespace: info.pod_namespace,
            team_id: info.pod_team_id,
            cpu_max: info.pod_cpu_max,
            memory_max: info.pod_memory_max,
            replicas: info.pod_replicas,
            image: info.pod_image,
            pull_policy: info.pod_pull_policy,
            restart: info.pod_restart,
            pod_type: info.pod_type,
            ports: info.pod_port.into_iter().map(PodPort::from).collect(),
            envs: info.pod_env.into_iter().map(PodEnv::from).collect(),
        }
    }
}

impl From<proto::PodPort> for PodPort {
    fn from(port: proto::PodPort) -> Self {
        PodPort {
            id: port.id,
            pod_id: port.pod_id,
            container_port: port.container_port,
            protocol: port.protocol,
        }
    }
}

impl From<proto::PodEnv> for PodEnv {
    fn from(env: proto::PodEnv) -> Self {
        PodEnv {
            id: env.id,
            pod_id: env.pod_id,
            key: env.env_key,
            value: env.env_value,
        }
    }
}

impl From<Pod> for proto::PodInfo {
    fn from(pod: Pod) -> Self {
        proto::PodInfo {
            id: pod.id,
            pod_name: pod.name,
            pod_namespace: pod.namespace,
            pod_team_id: pod.team_id,
            pod_cpu_max: pod.cpu_max,
            pod_memory_max: pod.memory_max,
            pod_replicas: pod.replicas,
            pod_image: pod.image,
            pod_pull_policy: pod.pull_policy,
            pod_restart: pod.restart,
            pod_type: pod.pod_type,
            pod_port: pod.ports.into_iter().map(proto::PodPort::from).collect(),
            pod_env: pod.envs.into_iter().map(proto::PodEnv::from).collect(),
        }
    }
}

impl From<PodPort> for proto::PodPort {
    fn from(port: PodPort) -> Self {
        proto::PodPort {
            id: port.id,
            pod_id: port.pod_id,
            container_port: port.container_port,
            protocol: port.protocol,
        }
    }
}

impl From<PodEnv> for proto::PodEnv {
    fn from(env: PodEnv) -> Self {
        proto::PodEnv {
            id: env.id,
            pod_id: env.pod_id,
            env_key: env.key,
            env_value: env.value,
        }
    }
}

pub struct PodHandler {
    data: PodDataService,
}

impl PodHandler {
    pub fn new(data: PodDataService) -> Self {
        Self { data }
    }
}

fn failed(err: PaasError) -> Status {
    error!("{}", err);
    Status::from(err)
}

#[tonic::async_trait]
impl PodService for PodHandler {
    async fn add_pod(
        &self,
        request: Request<proto::PodInfo>,
    ) -> Result<Response<proto::Response>, Status> {
        info!("Add Pod");
        let pod = Pod::from(request.into_inner());

        self.data.add(&pod).await.map_err(failed)?;
        Ok(response("Add success"))
    }

    async fn delete_pod(
        &self,
        request: Request<proto::PodId>,
    ) -> Result<Response<proto::Response>, Status> {
        info!("Del Pod");
        let id = request.into_inner().id;

        self.data.delete(id).await.map_err(failed)?;
        Ok(response("Del success"))
    }

    async fn update_pod(
        &self,
        request: Request<proto::PodInfo>,
    ) -> Result<Response<proto::Response>, Status> {
        info!("Update Pod");
        let pod = Pod::from(request.into_inner());

        if self.data.find_by_id(pod.id).await.map_err(failed)?.is_none() {
            return Err(failed(PaasError::NotExist {
                kind: Pod::KIND,
                id: pod.id,
            }));
        }

        self.data.update(&pod).await.map_err(failed)?;
        Ok(response("Update success"))
    }

    async fn find_pod_by_id(
        &self,
        request: Request<proto::PodId>,
    ) -> Result<Response<proto::PodInfo>, Status> {
        let id = request.into_inner().id;

        match self.data.find_by_id(id).await.map_err(failed)? {
            Some(pod) => Ok(Response::new(pod.into())),
            None => Err(failed(PaasError::NotExist { kind: Pod::KIND, id })),
        }
    }

    async fn find_all_pod(
        &self,
        _request: Request<proto::FindAll>,
    ) -> Result<Response<proto::AllPod>, Status> {
        let all = self.data.find_all().await.map_err(failed)?;

        Ok(Response::new(proto::AllPod {
            pod_info: all.into_iter().map(proto::PodInfo::from).collect(),
        }))
    }
}
