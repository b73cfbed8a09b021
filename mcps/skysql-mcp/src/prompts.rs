//! Static prompt templates
//!
//! Parameterless prompts telling a caller what to gather before invoking the
//! launch, delete and ask-agent tools. The delete prompt asks for explicit
//! confirmation, since `delete_db` itself never confirms.

use rmcp::model::{
    GetPromptResult, ListPromptsResult, Prompt, PromptMessage, PromptMessageRole,
};

struct PromptTemplate {
    name: &'static str,
    description: &'static str,
    text: &'static str,
}

const TEMPLATES: &[PromptTemplate] = &[
    PromptTemplate {
        name: "launch_db_prompt",
        description: "Create a prompt for launching a new serverless DB",
        text: "Please help me launch a new serverless database with the following specifications:
1. Name for the database (must be lowercase)
2. Region (optional, defaults to eastus)
3. Cloud provider (optional, one of: azure, aws, gcp. Defaults to azure)
",
    },
    PromptTemplate {
        name: "delete_db_prompt",
        description: "Create a prompt for deleting a DB",
        text: "Please help me delete a database by providing:
1. The service ID of the database to delete.
2. Always confirm the deletion with me.
",
    },
    PromptTemplate {
        name: "ask_agent_prompt",
        description: "Create a prompt for asking questions to DB agents",
        text: "I'd like to ask a question to a DB agent. Please provide:
1. The agent ID (use list_agents to see available agents)
2. Your question about database management
",
    },
];

pub fn list_prompts() -> ListPromptsResult {
    let prompts = TEMPLATES
        .iter()
        .map(|t| Prompt::new(t.name, Some(t.description), None))
        .collect();
    ListPromptsResult::with_all_items(prompts)
}

/// Text of a template by name
pub fn prompt_text(name: &str) -> Option<&'static str> {
    TEMPLATES.iter().find(|t| t.name == name).map(|t| t.text)
}

pub fn get_prompt(name: &str) -> Option<GetPromptResult> {
    let template = TEMPLATES.iter().find(|t| t.name == name)?;
    Some(GetPromptResult {
        description: Some(template.description.to_string()),
        messages: vec![PromptMessage::new_text(
            PromptMessageRole::User,
            template.text,
        )],
    })
}
