// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{merge_children, merge_string, ManagedResource};
use crate::kubernetes::service::build_service;
use k8s_openapi::api::core::v1::Service;

/// A network service fronting the pods of one workload
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Svc {
    pub id: i64,
    pub name: String,
    pub namespace: String,
    /// Name of the workload the service selector targets
    pub pod_name: String,
    /// `ClusterIP`, `NodePort`, `LoadBalancer` or `ExternalName`
    pub svc_type: String,
    pub external_name: String,
    pub team_id: String,
    pub ports: Vec<SvcPort>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SvcPort {
    pub id: i64,
    pub svc_id: i64,
    pub port: i32,
    pub target_port: i32,
    pub node_port: i32,
    pub protocol: String,
}

impl ManagedResource for Svc {
    const KIND: &'static str = "Svc";
    type Object = Service;

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
        merge_string(&mut self.pod_name, &incoming.pod_name);
        merge_string(&mut self.svc_type, &incoming.svc_type);
        merge_string(&mut self.external_name, &incoming.external_name);
        merge_string(&mut self.team_id, &incoming.team_id);
        merge_children(&mut self.ports, &incoming.ports);
    }

    fn to_cluster_object(&self) -> Service {
        build_service(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Svc {
        Svc {
            id: 3,
            name: "web".to_string(),
            namespace: "default".to_string(),
            pod_name: "web-pod".to_string(),
            svc_type: "ClusterIP".to_string(),
            team_id: "team-a".to_string(),
            ports: vec![SvcPort {
                svc_id: 3,
                port: 80,
                target_port: 8080,
                protocol: "TCP".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_keeps_fields_left_empty() {
        let mut svc = stored();
        let incoming = Svc {
            id: 3,
            team_id: "team-b".to_string(),
            ..Default::default()
        };

        svc.merge_from(&incoming);

        assert_eq!(svc.team_id, "team-b");
        assert_eq!(svc.name, "web");
        assert_eq!(svc.pod_name, "web-pod");
        assert_eq!(svc.ports.len(), 1);
    }

    #[test]
    fn test_merge_replaces_non_empty_port_list() {
        let mut svc = stored();
        let incoming = Svc {
            ports: vec![
                SvcPort {
                    port: 443,
                    target_port: 8443,
                    protocol: "TCP".to_string(),
                    ..Default::default()
                },
                SvcPort {
                    port: 53,
                    target_port: 53,
                    protocol: "UDP".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        svc.merge_from(&incoming);

        let ports: Vec<i32> = svc.ports.iter().map(|p| p.port).collect();
        assert_eq!(ports, vec![443, 53]);
    }
}
