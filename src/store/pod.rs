// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{create_tables, delete_cascade, inserted_id, narrow, ResourceStore};
use crate::error::{PaasError, Result};
use crate::types::{ManagedResource, Pod, PodEnv, PodPort};
use sqlx::AnyConnection;
use sqlx::AnyPool;
use std::collections::HashMap;
use tracing::{debug, instrument};

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS pod (
        {id},
        pod_name VARCHAR(255) NOT NULL DEFAULT '',
        pod_namespace VARCHAR(255) NOT NULL DEFAULT '',
        pod_team_id VARCHAR(255) NOT NULL DEFAULT '',
        pod_cpu_max DOUBLE NOT NULL DEFAULT 0,
        pod_memory_max DOUBLE NOT NULL DEFAULT 0,
        pod_replicas BIGINT NOT NULL DEFAULT 0,
        pod_image VARCHAR(255) NOT NULL DEFAULT '',
        pod_pull_policy VARCHAR(32) NOT NULL DEFAULT '',
        pod_restart VARCHAR(32) NOT NULL DEFAULT '',
        pod_type VARCHAR(64) NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pod_port (
        {id},
        pod_id BIGINT NOT NULL,
        container_port BIGINT NOT NULL DEFAULT 0,
        protocol VARCHAR(16) NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pod_env (
        {id},
        pod_id BIGINT NOT NULL,
        env_key VARCHAR(255) NOT NULL DEFAULT '',
        env_value VARCHAR(1024) NOT NULL DEFAULT ''
    )
    "#,
];

const POD_COLUMNS: &str = "id, pod_name, pod_namespace, pod_team_id, pod_cpu_max, pod_memory_max, \
     pod_replicas, pod_image, pod_pull_policy, pod_restart, pod_type";

#[derive(sqlx::FromRow)]
struct PodRow {
    id: i64,
    pod_name: String,
    pod_namespace: String,
    pod_team_id: String,
    pod_cpu_max: f64,
    pod_memory_max: f64,
    pod_replicas: i64,
    pod_image: String,
    pod_pull_policy: String,
    pod_restart: String,
    pod_type: String,
}

#[derive(sqlx::FromRow)]
struct PodPortRow {
    id: i64,
    pod_id: i64,
    container_port: i64,
    protocol: String,
}

#[derive(sqlx::FromRow)]
struct PodEnvRow {
    id: i64,
    pod_id: i64,
    env_key: String,
    env_value: String,
}

impl PodRow {
    fn into_pod(self, ports: Vec<PodPort>, envs: Vec<PodEnv>) -> Result<Pod> {
        Ok(Pod {
            id: self.id,
            name: self.pod_name,
            namespace: self.pod_namespace,
            team_id: self.pod_team_id,
            cpu_max: self.pod_cpu_max,
            memory_max: self.pod_memory_max,
            replicas: narrow(self.pod_replicas, "pod_replicas")?,
            image: self.pod_image,
            pull_policy: self.pod_pull_policy,
            restart: self.pod_restart,
            pod_type: self.pod_type,
            ports,
            envs,
        })
    }
}

impl TryFrom<PodPortRow> for PodPort {
    type Error = PaasError;

    fn try_from(row: PodPortRow) -> Result<Self> {
        Ok(PodPort {
            id: row.id,
            pod_id: row.pod_id,
            container_port: narrow(row.container_port, "container_port")?,
            protocol: row.protocol,
        })
    }
}

impl From<PodEnvRow> for PodEnv {
    fn from(row: PodEnvRow) -> Self {
        PodEnv {
            id: row.id,
            pod_id: row.pod_id,
            key: row.env_key,
            value: row.env_value,
        }
    }
}

/// `pod` rows with their `pod_port` and `pod_env` children
#[derive(Clone)]
pub struct PodStore {
    pool: AnyPool,
}

impl PodStore {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }
}

async fn fetch_children(
    conn: &mut AnyConnection,
    pod_id: Option<i64>,
) -> Result<(Vec<PodPort>, Vec<PodEnv>)> {
    let filter = if pod_id.is_some() { "where pod_id = ?" } else { "" };

    let ports_sql = format!(
        "select id, pod_id, container_port, protocol from pod_port {} order by id",
        filter
    );
    let envs_sql = format!(
        "select id, pod_id, env_key, env_value from pod_env {} order by id",
        filter
    );

    let mut ports_query = sqlx::query_as::<_, PodPortRow>(&ports_sql);
    let mut envs_query = sqlx::query_as::<_, PodEnvRow>(&envs_sql);
    if let Some(id) = pod_id {
        ports_query = ports_query.bind(id);
        envs_query = envs_query.bind(id);
    }

    let ports = ports_query
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(PodPort::try_from)
        .collect::<Result<Vec<_>>>()?;
    let envs = envs_query
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(PodEnv::from)
        .collect();

    Ok((ports, envs))
}

async fn fetch_pod(conn: &mut AnyConnection, id: i64) -> Result<Option<Pod>> {
    let row = sqlx::query_as::<_, PodRow>(&format!("select {} from pod where id = ?", POD_COLUMNS))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let (ports, envs) = fetch_children(conn, Some(id)).await?;
    row.into_pod(ports, envs).map(Some)
}

async fn insert_ports(conn: &mut AnyConnection, pod_id: i64, ports: &[PodPort]) -> Result<()> {
    for port in ports {
        sqlx::query("insert into pod_port (pod_id, container_port, protocol) values (?, ?, ?)")
            .bind(pod_id)
            .bind(i64::from(port.container_port))
            .bind(port.protocol.clone())
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn insert_envs(conn: &mut AnyConnection, pod_id: i64, envs: &[PodEnv]) -> Result<()> {
    for env in envs {
        sqlx::query("insert into pod_env (pod_id, env_key, env_value) values (?, ?, ?)")
            .bind(pod_id)
            .bind(env.key.clone())
            .bind(env.value.clone())
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

impl ResourceStore for PodStore {
    type Resource = Pod;

    async fn init_tables(&self) -> Result<()> {
        create_tables(&self.pool, Pod::KIND, &SCHEMA).await
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<Option<Pod>> {
        let mut conn = self.pool.acquire().await?;
        fetch_pod(&mut conn, id).await
    }

    #[instrument(skip(self, pod), fields(name = %pod.name, namespace = %pod.namespace))]
    async fn create(&self, pod: &Pod) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            insert into pod (pod_name, pod_namespace, pod_team_id, pod_cpu_max, pod_memory_max,
                             pod_replicas, pod_image, pod_pull_policy, pod_restart, pod_type)
            values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(pod.name.clone())
        .bind(pod.namespace.clone())
        .bind(pod.team_id.clone())
        .bind(pod.cpu_max)
        .bind(pod.memory_max)
        .bind(i64::from(pod.replicas))
        .bind(pod.image.clone())
        .bind(pod.pull_policy.clone())
        .bind(pod.restart.clone())
        .bind(pod.pod_type.clone())
        .execute(&mut *tx)
        .await?;
        let id = inserted_id(&mut tx, &result).await?;

        insert_ports(&mut tx, id, &pod.ports).await?;
        insert_envs(&mut tx, id, &pod.envs).await?;
        tx.commit().await?;

        debug!(
            "Inserted pod row {} with {} ports and {} envs",
            id,
            pod.ports.len(),
            pod.envs.len()
        );
        Ok(id)
    }

    #[instrument(skip(self, pod), fields(id = pod.id))]
    async fn update(&self, pod: &Pod) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let Some(mut stored) = fetch_pod(&mut tx, pod.id).await? else {
            return Err(PaasError::NotExist {
                kind: Pod::KIND,
                id: pod.id,
            });
        };
        stored.merge_from(pod);

        sqlx::query(
            r#"
            update pod
            set pod_name = ?, pod_namespace = ?, pod_team_id = ?, pod_cpu_max = ?,
                pod_memory_max = ?, pod_replicas = ?, pod_image = ?, pod_pull_policy = ?,
                pod_restart = ?, pod_type = ?
            where id = ?
            "#,
        )
        .bind(stored.name.clone())
        .bind(stored.namespace.clone())
        .bind(stored.team_id.clone())
        .bind(stored.cpu_max)
        .bind(stored.memory_max)
        .bind(i64::from(stored.replicas))
        .bind(stored.image.clone())
        .bind(stored.pull_policy.clone())
        .bind(stored.restart.clone())
        .bind(stored.pod_type.clone())
        .bind(stored.id)
        .execute(&mut *tx)
        .await?;

        if !pod.ports.is_empty() {
            sqlx::query("delete from pod_port where pod_id = ?")
                .bind(stored.id)
                .execute(&mut *tx)
                .await?;
            insert_ports(&mut tx, stored.id, &stored.ports).await?;
        }
        if !pod.envs.is_empty() {
            sqlx::query("delete from pod_env where pod_id = ?")
                .bind(stored.id)
                .execute(&mut *tx)
                .await?;
            insert_envs(&mut tx, stored.id, &stored.envs).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        delete_cascade(
            &self.pool,
            "pod",
            &[("pod_port", "pod_id"), ("pod_env", "pod_id")],
            id,
        )
        .await
    }

    async fn find_all(&self) -> Result<Vec<Pod>> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query_as::<_, PodRow>(&format!("select {} from pod order by id", POD_COLUMNS))
            .fetch_all(&mut *conn)
            .await?;
        let (ports, envs) = fetch_children(&mut conn, None).await?;

        let mut ports_by_pod: HashMap<i64, Vec<PodPort>> = HashMap::new();
        for port in ports {
            ports_by_pod.entry(port.pod_id).or_default().push(port);
        }
        let mut envs_by_pod: HashMap<i64, Vec<PodEnv>> = HashMap::new();
        for env in envs {
            envs_by_pod.entry(env.pod_id).or_default().push(env);
        }

        rows.into_iter()
            .map(|row| {
                let ports = ports_by_pod.remove(&row.id).unwrap_or_default();
                let envs = envs_by_pod.remove(&row.id).unwrap_or_default();
                row.into_pod(ports, envs)
            })
            .collect()
    }
}
