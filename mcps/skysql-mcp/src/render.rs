//! Text rendering of tool outcomes
//!
//! Every tool answers with a single human-readable string. The formats here
//! are what callers (and the agents driving them) read, so field labels are
//! stable.

use crate::db::{ResultTable, SqlOutcome};
use crate::handlers::{AllowlistEntry, DeletedDb, LaunchedDb, ServiceCredentials};
use crate::skysql::{Agent, ChatReply, Service};

const NOT_AVAILABLE: &str = "N/A";
const BLOCK_SEPARATOR: &str = "\n\n";

pub fn agents(agents: &[Agent]) -> String {
    agents
        .iter()
        .map(agent_block)
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

fn agent_block(agent: &Agent) -> String {
    let mut block = format!(
        "Name: {}\nID: {}\nType: {}\nDatasource ID: {}\n",
        agent.name,
        agent.id,
        agent.agent_type,
        agent.datasource_id.as_deref().unwrap_or("None"),
    );
    if let Some(description) = &agent.description {
        block.push_str(&format!("Description: {}\n", description));
    }
    block.push_str("---");
    block
}

pub fn launched(db: &LaunchedDb) -> String {
    format!(
        "Successfully launched serverless DB '{}' with ID: {}",
        db.name, db.service_id
    )
}

pub fn deleted(db: &DeletedDb) -> String {
    format!("Successfully deleted DB with ID: {}", db.service_id)
}

/// Analysis, SQL and errors as separate sections, skipping empty parts
pub fn chat_reply(reply: &ChatReply) -> String {
    let present = |part: &Option<String>| {
        part.as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    };

    let mut sections = Vec::new();
    if let Some(content) = present(&reply.content) {
        sections.push(format!("Analysis: {}", content));
    }
    if let Some(sql) = present(&reply.sql_text) {
        sections.push(format!("Generated SQL:\n```sql\n{}\n```", sql));
    }
    if let Some(errors) = present(&reply.error_text) {
        sections.push(format!("Errors: {}", errors));
    }

    if sections.is_empty() {
        return "The agent returned an empty response".to_string();
    }
    sections.join(BLOCK_SEPARATOR)
}

pub fn credentials(creds: &ServiceCredentials) -> String {
    format!(
        "Database Credentials:\nHost: {}\nPort: {}\nUsername: {}\nPassword: {}",
        creds.host.as_deref().unwrap_or(NOT_AVAILABLE),
        creds
            .port
            .map(|p| p.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        creds.username.as_deref().unwrap_or(NOT_AVAILABLE),
        creds.password.as_deref().unwrap_or(NOT_AVAILABLE),
    )
}

pub fn allowlist_entry(entry: &AllowlistEntry) -> String {
    format!(
        "Successfully added IP {} to the allowlist for service {}",
        entry.ip, entry.service_id
    )
}

pub fn services(services: &[Service]) -> String {
    if services.is_empty() {
        return "No database services found".to_string();
    }
    services
        .iter()
        .map(service_block)
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

fn service_block(service: &Service) -> String {
    let port = service
        .first_port()
        .map(|p| p.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    [
        format!("Service: {}", service.name),
        format!("ID: {}", service.id),
        format!("Status: {}", service.status),
        format!("Type: {}", service.service_type),
        format!("Provider: {}", service.provider),
        format!("Region: {}", service.region),
        format!("Version: {}", service.version.as_deref().unwrap_or(NOT_AVAILABLE)),
        format!("FQDN: {}", service.fqdn.as_deref().unwrap_or(NOT_AVAILABLE)),
        format!("Port: {}", port),
        format!(
            "Created: {}",
            service
                .created_display()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        ),
        "---".to_string(),
    ]
    .join("\n")
}

pub fn sql_outcome(outcome: &SqlOutcome) -> String {
    match outcome {
        SqlOutcome::Rows(table) => result_table(table),
        SqlOutcome::Affected(count) => format!("Query OK, {} rows affected", count),
    }
}

/// Header row, separator row, then one line per row, columns padded to width
fn result_table(table: &ResultTable) -> String {
    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.chars().count()).collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let separator = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-");

    let mut lines = Vec::with_capacity(table.rows.len() + 2);
    lines.push(line(&table.columns));
    lines.push(separator);
    for row in &table.rows {
        lines.push(line(row));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(id: &str, datasource: Option<&str>, description: Option<&str>) -> Agent {
        Agent {
            id: id.to_string(),
            name: format!("Agent {id}"),
            agent_type: "dba".to_string(),
            description: description.map(str::to_string),
            status: None,
            datasource_id: datasource.map(str::to_string),
        }
    }

    #[test]
    fn test_agent_blocks() {
        let text = agents(&[
            agent("a1", Some("ds-1"), Some("Tunes queries")),
            agent("a2", None, None),
        ]);
        assert_eq!(
            text,
            "Name: Agent a1\nID: a1\nType: dba\nDatasource ID: ds-1\nDescription: Tunes queries\n---\n\n\
             Name: Agent a2\nID: a2\nType: dba\nDatasource ID: None\n---"
        );
    }

    #[test]
    fn test_services_empty() {
        assert_eq!(services(&[]), "No database services found");
    }

    #[test]
    fn test_service_blocks_one_per_entry_in_order() {
        let listing: Vec<Service> = serde_json::from_str(
            r#"[
                {"id": "s1", "name": "one", "status": "ready", "service_type": "transactional",
                 "provider": "gcp", "region": "us-central1", "version": "11.4",
                 "fqdn": "one.example", "created_on": "2024-05-01T10:00:00Z",
                 "endpoints": [{"ports": [{"port": 3306}]}]},
                {"id": "s2", "name": "two", "status": "ready", "service_type": "transactional",
                 "provider": "aws", "region": "us-east-1"}
            ]"#,
        )
        .unwrap();

        let text = services(&listing);
        let blocks: Vec<&str> = text.split("\n\n").collect();

        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("Service: one\nID: s1\n"));
        assert!(blocks[0].contains("Port: 3306"));
        assert!(blocks[0].contains("Created: 2024-05-01T10:00:00Z"));
        assert!(blocks[1].starts_with("Service: two\nID: s2\n"));
        assert!(blocks[1].contains("Version: N/A\nFQDN: N/A\nPort: N/A\nCreated: N/A\n---"));
    }

    #[test]
    fn test_chat_reply_sections() {
        let reply = ChatReply {
            content: Some("Looks fine".to_string()),
            sql_text: Some("SELECT 1".to_string()),
            error_text: Some(String::new()),
        };
        assert_eq!(
            chat_reply(&reply),
            "Analysis: Looks fine\n\nGenerated SQL:\n```sql\nSELECT 1\n```"
        );

        let only_error = ChatReply {
            content: None,
            sql_text: None,
            error_text: Some("no datasource".to_string()),
        };
        assert_eq!(chat_reply(&only_error), "Errors: no datasource");
        assert_eq!(
            chat_reply(&ChatReply::default()),
            "The agent returned an empty response"
        );
    }

    #[test]
    fn test_credentials_block() {
        let creds = ServiceCredentials {
            host: Some("h".to_string()),
            port: Some(4000),
            username: Some("u".to_string()),
            password: None,
        };
        assert_eq!(
            credentials(&creds),
            "Database Credentials:\nHost: h\nPort: 4000\nUsername: u\nPassword: N/A"
        );
    }

    #[test]
    fn test_result_table() {
        let table = ResultTable {
            columns: vec!["id".to_string(), "name".to_string()],
            rows: vec![
                vec!["1".to_string(), "alice".to_string()],
                vec!["22".to_string(), "NULL".to_string()],
            ],
        };
        let text = sql_outcome(&SqlOutcome::Rows(table));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "id | name");
        assert_eq!(lines[1], "---+------");
        assert_eq!(lines[2], "1  | alice");
        assert_eq!(lines[3], "22 | NULL");
    }

    #[test]
    fn test_empty_result_table_keeps_header() {
        let table = ResultTable {
            columns: vec!["n".to_string()],
            rows: vec![],
        };
        assert_eq!(sql_outcome(&SqlOutcome::Rows(table)), "n\n-");
    }

    #[test]
    fn test_affected_rows() {
        assert_eq!(
            sql_outcome(&SqlOutcome::Affected(7)),
            "Query OK, 7 rows affected"
        );
    }
}
