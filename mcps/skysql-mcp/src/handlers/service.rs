//! Service (database instance) handler implementations

use tracing::{debug, info};

use super::{ToolContext, ToolError};
use crate::db::ConnectTarget;
use crate::skysql::{AllowlistRequest, LaunchRequest, Service};

const LAUNCH_DB: &str = "launch DB";
const DELETE_DB: &str = "delete DB";
const LIST_SERVICES: &str = "list services";
const FETCH_CREDENTIALS: &str = "fetch credentials";
const UPDATE_ALLOWLIST: &str = "update IP allowlist";

/// A service accepted by the provisioning API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchedDb {
    /// Name as transmitted (lowercased)
    pub name: String,
    pub service_id: String,
}

/// A service the provisioning API accepted for deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedDb {
    pub service_id: String,
}

/// Connection details resolved for one invocation; never stored
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceCredentials {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for ServiceCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceCredentials")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ServiceCredentials {
    /// Names of the fields needed to connect that are absent
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.host.is_none() {
            missing.push("host");
        }
        if self.port.is_none() {
            missing.push("port");
        }
        if self.username.is_none() {
            missing.push("username");
        }
        if self.password.is_none() {
            missing.push("password");
        }
        missing
    }

    /// Connection target, or the list of missing fields
    pub fn connect_target(&self) -> Result<ConnectTarget, Vec<&'static str>> {
        match (&self.host, self.port, &self.username, &self.password) {
            (Some(host), Some(port), Some(username), Some(password)) => Ok(ConnectTarget {
                host: host.clone(),
                port,
                username: username.clone(),
                password: password.clone(),
            }),
            _ => Err(self.missing_fields()),
        }
    }
}

/// An allowlist entry that was added
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowlistEntry {
    pub ip: String,
    pub service_id: String,
}

/// Launch a serverless database
pub async fn launch_serverless_db(
    ctx: &ToolContext,
    name: &str,
    region: &str,
    provider: &str,
) -> Result<LaunchedDb, ToolError> {
    let client = ctx.client().map_err(|e| ToolError::api(LAUNCH_DB, e))?;
    let request = LaunchRequest::serverless(name, region, provider);

    let launched = client
        .launch_service(&request)
        .await
        .map_err(|e| ToolError::api(LAUNCH_DB, e))?;

    info!(service_id = %launched.id, name = %request.name, "serverless DB launched");
    Ok(LaunchedDb {
        name: request.name,
        service_id: launched.id,
    })
}

/// Delete a database service
pub async fn delete_db(ctx: &ToolContext, service_id: &str) -> Result<DeletedDb, ToolError> {
    let client = ctx.client().map_err(|e| ToolError::api(DELETE_DB, e))?;
    debug!(service_id, "deleting DB");

    client
        .delete_service(service_id)
        .await
        .map_err(|e| ToolError::api(DELETE_DB, e))?;

    info!(service_id, "DB deleted");
    Ok(DeletedDb {
        service_id: service_id.to_string(),
    })
}

/// List all database services in server order
pub async fn list_services(ctx: &ToolContext) -> Result<Vec<Service>, ToolError> {
    let client = ctx.client().map_err(|e| ToolError::api(LIST_SERVICES, e))?;
    client
        .list_services()
        .await
        .map_err(|e| ToolError::api(LIST_SERVICES, e))
}

/// Resolve host, port and credentials for a service
///
/// Two sequential reads: the service listing locates the service and its
/// endpoint, then the credentials sub-resource supplies the login. A service
/// missing from the listing ends the lookup before the second call.
pub async fn resolve_credentials(
    ctx: &ToolContext,
    service_id: &str,
) -> Result<ServiceCredentials, ToolError> {
    let client = ctx.client().map_err(|e| ToolError::api(FETCH_CREDENTIALS, e))?;

    debug!(service_id, "fetching service details");
    let services = client
        .list_services()
        .await
        .map_err(|e| ToolError::api(FETCH_CREDENTIALS, e))?;

    let service = services
        .into_iter()
        .find(|s| s.id == service_id)
        .ok_or_else(|| ToolError::NotFound(format!("Service with ID {} not found", service_id)))?;

    debug!(service_id, "fetching credentials");
    let creds = client
        .service_credentials(service_id)
        .await
        .map_err(|e| ToolError::api(FETCH_CREDENTIALS, e))?;

    Ok(ServiceCredentials {
        port: service.first_port(),
        host: service.fqdn,
        username: creds.username,
        password: creds.password,
    })
}

/// Allowlist this process's public IP on a service
pub async fn update_ip_allowlist(
    ctx: &ToolContext,
    service_id: &str,
) -> Result<AllowlistEntry, ToolError> {
    let client = ctx.client().map_err(|e| ToolError::api(UPDATE_ALLOWLIST, e))?;

    let ip = client
        .public_ip()
        .await
        .map_err(|e| ToolError::api(UPDATE_ALLOWLIST, e))?;

    client
        .add_allowlist_entry(service_id, &AllowlistRequest::single_host(&ip))
        .await
        .map_err(|e| ToolError::api(UPDATE_ALLOWLIST, e))?;

    info!(service_id, ip = %ip, "IP added to allowlist");
    Ok(AllowlistEntry {
        ip,
        service_id: service_id.to_string(),
    })
}
