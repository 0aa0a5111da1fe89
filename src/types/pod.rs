// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{merge_children, merge_string, merge_value, ManagedResource};
use crate::kubernetes::deployment::build_deployment;
use k8s_openapi::api::apps::v1::Deployment;

/// A workload, mirrored into the cluster as a single-container Deployment
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pod {
    pub id: i64,
    pub name: String,
    pub namespace: String,
    pub team_id: String,
    /// CPU limit in cores, 0 means unlimited
    pub cpu_max: f64,
    /// Memory limit in MiB, 0 means unlimited
    pub memory_max: f64,
    pub replicas: i32,
    pub image: String,
    pub pull_policy: String,
    pub restart: String,
    pub pod_type: String,
    pub ports: Vec<PodPort>,
    pub envs: Vec<PodEnv>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PodPort {
    pub id: i64,
    pub pod_id: i64,
    pub container_port: i32,
    pub protocol: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PodEnv {
    pub id: i64,
    pub pod_id: i64,
    pub key: String,
    pub value: String,
}

impl ManagedResource for Pod {
    const KIND: &'static str = "Pod";
    type Object = Deployment;

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn merge_from(&mut self, incoming: &Self) {
        merge_string(&mut self.name, &incoming.name);
        merge_string(&mut self.namespace, &incoming.namespace);
        merge_string(&mut self.team_id, &incoming.team_id);
        merge_value(&mut self.cpu_max, incoming.cpu_max);
        merge_value(&mut self.memory_max, incoming.memory_max);
        merge_value(&mut self.replicas, incoming.replicas);
        merge_string(&mut self.image, &incoming.image);
        merge_string(&mut self.pull_policy, &incoming.pull_policy);
        merge_string(&mut self.restart, &incoming.restart);
        merge_string(&mut self.pod_type, &incoming.pod_type);
        merge_children(&mut self.ports, &incoming.ports);
        merge_children(&mut self.envs, &incoming.envs);
    }

    fn to_cluster_object(&self) -> Deployment {
        build_deployment(self)
    }
}
