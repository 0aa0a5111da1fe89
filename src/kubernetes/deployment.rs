// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Builds the apps/v1 Deployment mirrored for a [`Pod`].

use super::{managed_annotations, managed_labels, port_name};
use crate::constants::{defaults, labels};
use crate::types::Pod;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EnvVar, PodSpec, PodTemplateSpec, ResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::api::ObjectMeta;
use std::collections::BTreeMap;

pub fn build_deployment(pod: &Pod) -> Deployment {
    let selector = BTreeMap::from([(labels::APP_NAME.to_string(), pod.name.clone())]);
    let replicas = if pod.replicas > 0 {
        pod.replicas
    } else {
        defaults::REPLICAS
    };

    Deployment {
        metadata: ObjectMeta {
            name: Some(pod.name.clone()),
            namespace: Some(pod.namespace.clone()),
            labels: Some(managed_labels(&pod.name)),
            annotations: Some(managed_annotations()),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(replicas),
            selector: LabelSelector {
                match_labels: Some(selector),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(managed_labels(&pod.name)),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![container(pod)],
                    restart_policy: (!pod.restart.is_empty()).then(|| pod.restart.clone()),
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        status: None,
    }
}

fn container(pod: &Pod) -> Container {
    let pull_policy = if pod.pull_policy.is_empty() {
        defaults::PULL_POLICY.to_string()
    } else {
        pod.pull_policy.clone()
    };

    let ports = pod
        .ports
        .iter()
        .map(|p| ContainerPort {
            name: Some(port_name(p.container_port)),
            container_port: p.container_port,
            protocol: Some(if p.protocol.is_empty() {
                defaults::PORT_PROTOCOL.to_string()
            } else {
                p.protocol.clone()
            }),
            ..Default::default()
        })
        .collect();

    let env = pod
        .envs
        .iter()
        .map(|e| EnvVar {
            name: e.key.clone(),
            value: Some(e.value.clone()),
            ..Default::default()
        })
        .collect();

    Container {
        name: pod.name.clone(),
        image: Some(pod.image.clone()),
        image_pull_policy: Some(pull_policy),
        ports: Some(ports),
        env: Some(env),
        resources: resources(pod),
        ..Default::default()
    }
}

/// Limits and requests are set to the same values; zero leaves the dimension unbounded
fn resources(pod: &Pod) -> Option<ResourceRequirements> {
    let mut quantities = BTreeMap::new();
    if pod.cpu_max > 0.0 {
        quantities.insert("cpu".to_string(), Quantity(format!("{}", pod.cpu_max)));
    }
    if pod.memory_max > 0.0 {
        quantities.insert("memory".to_string(), Quantity(format!("{}Mi", pod.memory_max)));
    }

    if quantities.is_empty() {
        return None;
    }

    Some(ResourceRequirements {
        limits: Some(quantities.clone()),
        requests: Some(quantities),
        ..Default::default()
    })
}
