//! Prompt templates for SQL generation
//!
//! A template is plain text with two placeholders, `{schema}` and `{request}`. Substitution
//! is a single left-to-right pass, so placeholder-looking text inside the schema or the
//! user's request is copied through untouched.

use sqlpilot_tools::SchemaDescription;

pub const SCHEMA_PLACEHOLDER: &str = "{schema}";
pub const REQUEST_PLACEHOLDER: &str = "{request}";

pub const DEFAULT_PRESET: &str = "strict";

const STRICT: &str = r#"[INST]
You are a professional MySQL query generator.

Below is the exact database schema with all tables, columns, and relationships.

SCHEMA:
{schema}

TASK:
Write one valid MySQL query that fulfills the user's request.

RULES:
1. Use only the tables and columns listed in the schema above.
2. Never invent or assume any table, column, or relationship that does not exist.
3. Choose the correct SQL command type:
   - "create" or "add" → INSERT
   - "get", "list", or "show" → SELECT
   - "update" or "modify" → UPDATE
   - "remove" or "delete" → DELETE
4. Use JOINs or subqueries only if the schema shows a real relationship.
5. Output only the SQL query. No markdown, no explanations, no comments.
6. Use MySQL syntax only.
7. If something is ambiguous, make no assumption; use only relations the schema shows.

USER REQUEST:
{request}
[/INST]"#;

const GUIDED: &str = r#"[INST]
You are a professional MySQL query generator working strictly within a given database schema.

Below is the complete database schema with all tables, columns, and foreign key relationships:
{schema}

Generate ONE valid, executable MySQL statement that fulfills the user's request.

Guidelines:
1. Use ONLY the tables, columns, and relationships defined in the schema above.
2. No placeholders, assumptions, or commentary.
3. If JOINs are needed, follow the foreign key relationships.
4. SELECT, INSERT, UPDATE and DELETE are all allowed, as the request requires.
5. Quote strings and use MySQL date formats.
6. When data must be looked up by name (a project, a user), use a subquery.
7. Wrap the statement in <SQL> and </SQL> and write nothing outside the tags.

User Request:
{request}
[/INST]"#;

const MYSQL_EXPERT: &str = r#"[INST]
You are an expert SQL generator specialized in MySQL databases.

Convert the question below into a syntactically correct and semantically accurate MySQL query.
Use the schema to reason about joins and key mappings.

{schema}

### Rules
1. Use only the tables and columns present in the schema.
2. Use MySQL syntax:
   - LIKE, never ILIKE.
   - Backticks around identifiers when needed.
   - No PostgreSQL operators or casts (`::text`, `ILIKE`, `LIMIT ALL`).
3. Join on the relationships the schema lists.
4. Pick the statement type (SELECT, INSERT, UPDATE, DELETE) the request calls for.
5. Output a single SQL query and nothing else.

Request:
{request}
[/INST]"#;

const COMPACT: &str = r#"[INST]
You are an expert in MySQL. Generate only a valid SQL command (no text, markdown, or explanation) based strictly on this database schema:

{schema}

Rules:
- Use only tables/columns from the schema.
- Use correct MySQL syntax.
- Choose the statement type (SELECT, INSERT, UPDATE, DELETE) from the request.

User request:
{request}
[/INST]"#;

/// Built-in presets as `(name, template)` pairs
pub const PRESETS: &[(&str, &str)] = &[
    ("strict", STRICT),
    ("guided", GUIDED),
    ("mysql-expert", MYSQL_EXPERT),
    ("compact", COMPACT),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("Prompt template is missing the {0} placeholder")]
    MissingPlaceholder(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    name: String,
    body: String,
}

impl PromptTemplate {
    pub fn preset(name: &str) -> Option<Self> {
        PRESETS
            .iter()
            .find(|(preset, _)| *preset == name)
            .map(|(preset, body)| Self {
                name: preset.to_string(),
                body: body.to_string(),
            })
    }

    pub fn custom(body: impl Into<String>) -> Result<Self, TemplateError> {
        let body = body.into();
        for placeholder in [SCHEMA_PLACEHOLDER, REQUEST_PLACEHOLDER] {
            if !body.contains(placeholder) {
                return Err(TemplateError::MissingPlaceholder(placeholder));
            }
        }

        Ok(Self {
            name: "custom".to_string(),
            body,
        })
    }

    /// A preset name, or else a custom template body
    pub fn resolve(value: &str) -> Result<Self, TemplateError> {
        match Self::preset(value.trim()) {
            Some(template) => Ok(template),
            None => Self::custom(value),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn render(&self, schema: &str, request: &str) -> String {
        let mut out = String::with_capacity(self.body.len() + schema.len() + request.len());
        let mut rest = self.body.as_str();

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];

            if let Some(after) = tail.strip_prefix(SCHEMA_PLACEHOLDER) {
                out.push_str(schema);
                rest = after;
            } else if let Some(after) = tail.strip_prefix(REQUEST_PLACEHOLDER) {
                out.push_str(request);
                rest = after;
            } else {
                out.push('{');
                rest = &tail[1..];
            }
        }

        out.push_str(rest);
        out
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            name: DEFAULT_PRESET.to_string(),
            body: STRICT.to_string(),
        }
    }
}

pub fn build_prompt(template: &PromptTemplate, schema: &SchemaDescription, request: &str) -> String {
    template.render(schema.as_text(), request)
}
