// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Builds the core/v1 Service mirrored for a [`Svc`].

use super::{managed_annotations, managed_labels, port_name};
use crate::constants::{defaults, labels};
use crate::types::{Svc, SvcPort};
use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::api::ObjectMeta;
use std::collections::BTreeMap;

pub fn build_service(svc: &Svc) -> Service {
    let selector = BTreeMap::from([(labels::APP_NAME.to_string(), svc.pod_name.clone())]);
    let svc_type = if svc.svc_type.is_empty() {
        defaults::SERVICE_TYPE.to_string()
    } else {
        svc.svc_type.clone()
    };
    let external_name = (!svc.external_name.is_empty()).then(|| svc.external_name.clone());

    Service {
        metadata: ObjectMeta {
            name: Some(svc.name.clone()),
            namespace: Some(svc.namespace.clone()),
            labels: Some(managed_labels(&svc.pod_name)),
            annotations: Some(managed_annotations()),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            ports: Some(svc.ports.iter().map(service_port).collect()),
            selector: Some(selector),
            type_: Some(svc_type),
            external_name,
            ..Default::default()
        }),
        status: None,
    }
}

fn service_port(port: &SvcPort) -> ServicePort {
    let protocol = if port.protocol.is_empty() {
        defaults::PORT_PROTOCOL.to_string()
    } else {
        port.protocol.clone()
    };

    ServicePort {
        name: Some(port_name(port.port)),
        protocol: Some(protocol),
        port: port.port,
        target_port: Some(IntOrString::Int(port.target_port)),
        node_port: (port.node_port > 0).then_some(port.node_port),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_svc(ports: Vec<SvcPort>) -> Svc {
        Svc {
            name: "web".to_string(),
            namespace: "default".to_string(),
            pod_name: "web-pod".to_string(),
            ports,
            ..Default::default()
        }
    }

    fn tcp(port: i32, target: i32) -> SvcPort {
        SvcPort {
            port,
            target_port: target,
            protocol: "TCP".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_service_sets_identity() {
        let service = build_service(&make_svc(vec![tcp(80, 8080)]));

        assert_eq!(service.metadata.name.as_deref(), Some("web"));
        assert_eq!(service.metadata.namespace.as_deref(), Some("default"));
        assert!(service.status.is_none());
    }

    #[test]
    fn test_build_service_selects_workload_by_name() {
        let service = build_service(&make_svc(vec![]));

        let spec = service.spec.unwrap();
        let selector = spec.selector.unwrap();
        assert_eq!(selector.get(labels::APP_NAME).unwrap(), "web-pod");
        assert_eq!(
            service.metadata.labels.unwrap().get(labels::APP_NAME).unwrap(),
            "web-pod"
        );
    }

    #[test]
    fn test_build_service_defaults_to_cluster_ip() {
        let service = build_service(&make_svc(vec![]));
        assert_eq!(service.spec.unwrap().type_.as_deref(), Some("ClusterIP"));
    }

    #[test]
    fn test_build_service_keeps_requested_type() {
        let mut svc = make_svc(vec![SvcPort {
            node_port: 30080,
            ..tcp(80, 8080)
        }]);
        svc.svc_type = "NodePort".to_string();

        let spec = build_service(&svc).spec.unwrap();

        assert_eq!(spec.type_.as_deref(), Some("NodePort"));
        assert_eq!(spec.ports.unwrap()[0].node_port, Some(30080));
    }

    #[test]
    fn test_build_service_translates_ports_one_to_one() {
        let service = build_service(&make_svc(vec![tcp(80, 8080), tcp(443, 8443)]));

        let ports = service.spec.unwrap().ports.unwrap();
        assert_eq!(ports.len(), 2);
        assert_eq!(ports[0].name.as_deref(), Some("port-80"));
        assert_eq!(ports[0].port, 80);
        assert_eq!(ports[0].target_port, Some(IntOrString::Int(8080)));
        assert_eq!(ports[0].protocol.as_deref(), Some("TCP"));
        assert_eq!(ports[0].node_port, None);
        assert_eq!(ports[1].name.as_deref(), Some("port-443"));
    }

    #[test]
    fn test_build_service_defaults_empty_protocol_to_tcp() {
        let service = build_service(&make_svc(vec![SvcPort {
            port: 53,
            target_port: 53,
            ..Default::default()
        }]));

        let ports = service.spec.unwrap().ports.unwrap();
        assert_eq!(ports[0].protocol.as_deref(), Some("TCP"));
    }
}
