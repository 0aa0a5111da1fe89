// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{create_tables, delete_cascade, inserted_id, narrow, ResourceStore};
use crate::error::{PaasError, Result};
use crate::types::{ManagedResource, Svc, SvcPort};
use sqlx::AnyConnection;
use sqlx::AnyPool;
use std::collections::HashMap;
use tracing::{debug, instrument};

const SCHEMA: [&str; 2] = [
    r#"
    CREATE TABLE IF NOT EXISTS svc (
        {id},
        svc_name VARCHAR(255) NOT NULL DEFAULT '',
        svc_namespace VARCHAR(255) NOT NULL DEFAULT '',
        svc_pod_name VARCHAR(255) NOT NULL DEFAULT '',
        svc_type VARCHAR(64) NOT NULL DEFAULT '',
        svc_external_name VARCHAR(255) NOT NULL DEFAULT '',
        svc_team_id VARCHAR(255) NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS svc_port (
        {id},
        svc_id BIGINT NOT NULL,
        svc_port BIGINT NOT NULL DEFAULT 0,
        svc_target_port BIGINT NOT NULL DEFAULT 0,
        svc_node_port BIGINT NOT NULL DEFAULT 0,
        svc_port_protocol VARCHAR(16) NOT NULL DEFAULT ''
    )
    "#,
];

#[derive(sqlx::FromRow)]
struct SvcRow {
    id: i64,
    svc_name: String,
    svc_namespace: String,
    svc_pod_name: String,
    svc_type: String,
    svc_external_name: String,
    svc_team_id: String,
}

#[derive(sqlx::FromRow)]
struct SvcPortRow {
    id: i64,
    svc_id: i64,
    svc_port: i64,
    svc_target_port: i64,
    svc_node_port: i64,
    svc_port_protocol: String,
}

impl SvcRow {
    fn into_svc(self, ports: Vec<SvcPort>) -> Svc {
        Svc {
            id: self.id,
            name: self.svc_name,
            namespace: self.svc_namespace,
            pod_name: self.svc_pod_name,
            svc_type: self.svc_type,
            external_name: self.svc_external_name,
            team_id: self.svc_team_id,
            ports,
        }
    }
}

impl TryFrom<SvcPortRow> for SvcPort {
    type Error = PaasError;

    fn try_from(row: SvcPortRow) -> Result<Self> {
        Ok(SvcPort {
            id: row.id,
            svc_id: row.svc_id,
            port: narrow(row.svc_port, "svc_port")?,
            target_port: narrow(row.svc_target_port, "svc_target_port")?,
            node_port: narrow(row.svc_node_port, "svc_node_port")?,
            protocol: row.svc_port_protocol,
        })
    }
}

/// `svc` rows with their `svc_port` children
#[derive(Clone)]
pub struct SvcStore {
    pool: AnyPool,
}

impl SvcStore {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }
}

async fn fetch_svc(conn: &mut AnyConnection, id: i64) -> Result<Option<Svc>> {
    let row = sqlx::query_as::<_, SvcRow>(
        r#"
        select id, svc_name, svc_namespace, svc_pod_name, svc_type, svc_external_name, svc_team_id
        from svc
        where id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let ports = sqlx::query_as::<_, SvcPortRow>(
        r#"
        select id, svc_id, svc_port, svc_target_port, svc_node_port, svc_port_protocol
        from svc_port
        where svc_id = ?
        order by id
        "#,
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?
    .into_iter()
    .map(SvcPort::try_from)
    .collect::<Result<Vec<_>>>()?;

    Ok(Some(row.into_svc(ports)))
}

async fn insert_ports(conn: &mut AnyConnection, svc_id: i64, ports: &[SvcPort]) -> Result<()> {
    for port in ports {
        sqlx::query(
            r#"
            insert into svc_port (svc_id, svc_port, svc_target_port, svc_node_port, svc_port_protocol)
            values (?, ?, ?, ?, ?)
            "#,
        )
        .bind(svc_id)
        .bind(i64::from(port.port))
        .bind(i64::from(port.target_port))
        .bind(i64::from(port.node_port))
        .bind(port.protocol.clone())
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

impl ResourceStore for SvcStore {
    type Resource = Svc;

    async fn init_tables(&self) -> Result<()> {
        create_tables(&self.pool, Svc::KIND, &SCHEMA).await
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<Option<Svc>> {
        let mut conn = self.pool.acquire().await?;
        fetch_svc(&mut conn, id).await
    }

    #[instrument(skip(self, svc), fields(name = %svc.name, namespace = %svc.namespace))]
    async fn create(&self, svc: &Svc) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            insert into svc (svc_name, svc_namespace, svc_pod_name, svc_type, svc_external_name, svc_team_id)
            values (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(svc.name.clone())
        .bind(svc.namespace.clone())
        .bind(svc.pod_name.clone())
        .bind(svc.svc_type.clone())
        .bind(svc.external_name.clone())
        .bind(svc.team_id.clone())
        .execute(&mut *tx)
        .await?;
        let id = inserted_id(&mut tx, &result).await?;

        insert_ports(&mut tx, id, &svc.ports).await?;
        tx.commit().await?;

        debug!("Inserted svc row {} with {} ports", id, svc.ports.len());
        Ok(id)
    }

    #[instrument(skip(self, svc), fields(id = svc.id))]
    async fn update(&self, svc: &Svc) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let Some(mut stored) = fetch_svc(&mut tx, svc.id).await? else {
            return Err(PaasError::NotExist {
                kind: Svc::KIND,
                id: svc.id,
            });
        };
        stored.merge_from(svc);

        sqlx::query(
            r#"
            update svc
            set svc_name = ?, svc_namespace = ?, svc_pod_name = ?, svc_type = ?,
                svc_external_name = ?, svc_team_id = ?
            where id = ?
            "#,
        )
        .bind(stored.name.clone())
        .bind(stored.namespace.clone())
        .bind(stored.pod_name.clone())
        .bind(stored.svc_type.clone())
        .bind(stored.external_name.clone())
        .bind(stored.team_id.clone())
        .bind(stored.id)
        .execute(&mut *tx)
        .await?;

        if !svc.ports.is_empty() {
            sqlx::query("delete from svc_port where svc_id = ?")
                .bind(stored.id)
                .execute(&mut *tx)
                .await?;
            insert_ports(&mut tx, stored.id, &stored.ports).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        delete_cascade(&self.pool, "svc", &[("svc_port", "svc_id")], id).await
    }

    async fn find_all(&self) -> Result<Vec<Svc>> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query_as::<_, SvcRow>(
            r#"
            select id, svc_name, svc_namespace, svc_pod_name, svc_type, svc_external_name, svc_team_id
            from svc
            order by id
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        let mut ports_by_svc: HashMap<i64, Vec<SvcPort>> = HashMap::new();
        let port_rows = sqlx::query_as::<_, SvcPortRow>(
            r#"
            select id, svc_id, svc_port, svc_target_port, svc_node_port, svc_port_protocol
            from svc_port
            order by id
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;
        for row in port_rows {
            let port = SvcPort::try_from(row)?;
            ports_by_svc.entry(port.svc_id).or_default().push(port);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let ports = ports_by_svc.remove(&row.id).unwrap_or_default();
                row.into_svc(ports)
            })
            .collect())
    }
}
