use actix_web::{test, web, App};
use serde_json::{json, Map, Value};
use sqlpilot_agents::{GenerationSettings, PromptTemplate, SqlGenerationAgent};
use sqlpilot_api::handlers::configure;
use sqlpilot_llm_sdk::client::LlmClient;
use sqlpilot_llm_sdk::error::LlmError;
use sqlpilot_llm_sdk::types::{CompletionRequest, CompletionResponse, Usage};
use sqlpilot_tools::{
    ColumnSchema, DatabaseConnection, DatabaseConnector, ForeignKeyRef, ResultSet,
    SchemaDescription, TableSchema, ToolError,
};
use std::sync::{Arc, Mutex};

pub struct TestApp<S> {
    pub mock_llm_client: Arc<MockLlmClient>,
    pub connector: Arc<FakeConnector>,
    pub app: S,
}

pub struct MockLlmClient {
    pub responses: Arc<Mutex<Vec<Result<CompletionResponse, LlmError>>>>,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        MockLlmClient {
            responses: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn push_response(&self, response: CompletionResponse) {
        self.responses.lock().unwrap().push(Ok(response));
    }

    pub fn push_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push(Err(error));
    }

    pub fn get_call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.prompts.lock().unwrap().push(request.prompt);

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(create_completion_response_with_text("SELECT 1;"))
        } else {
            responses.remove(0)
        }
    }

    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// In-memory stand-in for the MySQL database. `users` holds two rows; statements containing
/// `FORM` or `missing_table` fail the way MySQL would report them.
#[derive(Default)]
pub struct FakeConnector {
    pub connects: Mutex<usize>,
    pub closes: Arc<Mutex<usize>>,
}

impl FakeConnector {
    pub fn open_connections(&self) -> usize {
        *self.connects.lock().unwrap() - *self.closes.lock().unwrap()
    }

    pub fn connect_count(&self) -> usize {
        *self.connects.lock().unwrap()
    }
}

pub struct FakeConnection {
    closes: Arc<Mutex<usize>>,
}

#[async_trait::async_trait]
impl DatabaseConnector for FakeConnector {
    async fn connect(&self) -> Result<Box<dyn DatabaseConnection>, ToolError> {
        *self.connects.lock().unwrap() += 1;
        Ok(Box::new(FakeConnection {
            closes: self.closes.clone(),
        }))
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for FakeConnection {
    async fn fetch_all(&mut self, statement: &str) -> Result<ResultSet, ToolError> {
        if statement.contains("FORM") {
            return Err(ToolError::ExecutionError(
                "1064 (42000): You have an error in your SQL syntax".to_string(),
            ));
        }
        if statement.contains("1 = 0") {
            return Ok(ResultSet::default());
        }

        let rows = vec![
            object(json!({"id": 1, "name": "Alice", "email": "alice@example.com"})),
            object(json!({"id": 2, "name": "Bob", "email": null})),
        ];
        Ok(ResultSet {
            columns: vec!["id".to_string(), "name".to_string(), "email".to_string()],
            rows,
        })
    }

    async fn execute_committed(&mut self, statement: &str) -> Result<u64, ToolError> {
        if statement.contains("missing_table") {
            return Err(ToolError::ExecutionError(
                "1146 (42S02): Table 'creative_it_park.missing_table' doesn't exist".to_string(),
            ));
        }
        Ok(2)
    }

    async fn close(&mut self) -> Result<(), ToolError> {
        *self.closes.lock().unwrap() += 1;
        Ok(())
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

fn column(name: &str, data_type: &str, nullable: bool) -> ColumnSchema {
    ColumnSchema {
        name: name.to_string(),
        data_type: data_type.to_string(),
        nullable,
        default: None,
    }
}

pub fn create_test_schema() -> SchemaDescription {
    SchemaDescription::new(vec![
        TableSchema {
            name: "users".to_string(),
            columns: vec![
                column("id", "BIGINT UNSIGNED", false),
                column("name", "VARCHAR(255)", false),
                column("email", "VARCHAR(255)", true),
            ],
            foreign_keys: vec![],
        },
        TableSchema {
            name: "projects".to_string(),
            columns: vec![
                column("id", "BIGINT UNSIGNED", false),
                column("user_id", "BIGINT UNSIGNED", false),
                column("title", "VARCHAR(255)", false),
            ],
            foreign_keys: vec![ForeignKeyRef::Explicit {
                table: "projects".to_string(),
                columns: vec!["user_id".to_string()],
                referred_table: "users".to_string(),
                referred_columns: vec!["id".to_string()],
            }],
        },
    ])
}

pub fn create_completion_response_with_text(text: &str) -> CompletionResponse {
    CompletionResponse {
        text: text.to_string(),
        usage: Usage {
            input_tokens: 120,
            output_tokens: 20,
        },
        stop_reason: Some("stop".to_string()),
    }
}

pub async fn setup_test_app() -> TestApp<
    impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
> {
    let mock_llm_client = Arc::new(MockLlmClient::new());
    let connector = Arc::new(FakeConnector::default());

    let agent = Arc::new(SqlGenerationAgent::new(
        mock_llm_client.clone() as Arc<dyn LlmClient>,
        Arc::new(create_test_schema()),
        PromptTemplate::default(),
        GenerationSettings::default(),
    ));
    let db_connector = connector.clone() as Arc<dyn DatabaseConnector>;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(agent))
            .app_data(web::Data::new(db_connector))
            .configure(configure),
    )
    .await;

    TestApp {
        mock_llm_client,
        connector,
        app,
    }
}
