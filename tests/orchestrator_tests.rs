use async_trait::async_trait;
use rmcp::model::Tool;
use serde_json::{json, Map, Value};
use std::sync::{Arc, Mutex};
use tpl_assist::client::{Client, ClientError};
use tpl_assist::model::{FinishReason, Message, Part, Response, Usage};
use tpl_assist::options::{ModelOptions, TransportOptions};
use tpl_assist::orchestrator::Orchestrator;
use tpl_assist::tools::{ToolError, ToolLauncher, ToolService};

#[derive(Clone)]
struct MockClient {
    responses: Arc<Mutex<Vec<Response>>>,
    requests: Arc<Mutex<Vec<(Vec<Message>, Vec<Tool>)>>>,
    model_options: ModelOptions<()>,
    transport_options: TransportOptions,
}

impl MockClient {
    fn new(responses: Vec<Response>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requests: Arc::new(Mutex::new(Vec::new())),
            model_options: ModelOptions::new("mock"),
            transport_options: TransportOptions::default(),
        }
    }
}

#[async_trait]
impl Client for MockClient {
    type ModelProvider = ();

    async fn request(&self, messages: Vec<Message>, tools: Vec<Tool>) -> Result<Response, ClientError> {
        self.requests.lock().unwrap().push((messages, tools));
        let mut responses = self.responses.lock().unwrap();
        if !responses.is_empty() {
            Ok(responses.remove(0))
        } else {
            Err(ClientError::ProviderError("No more mock responses".to_string()))
        }
    }

    fn model_options(&self) -> &ModelOptions<Self::ModelProvider> {
        &self.model_options
    }

    fn transport_options(&self) -> &TransportOptions {
        &self.transport_options
    }
}

#[derive(Clone, Default)]
struct MockLauncher {
    launches: Arc<Mutex<usize>>,
    calls: Arc<Mutex<Vec<(String, Value)>>>,
    result: Option<Value>,
}

struct MockService {
    calls: Arc<Mutex<Vec<(String, Value)>>>,
    result: Option<Value>,
}

#[async_trait]
impl ToolService for MockService {
    async fn list_tools(&self) -> Result<Vec<Tool>, ToolError> {
        Ok(vec![bus_lines_tool()])
    }

    async fn call_tool(&self, name: String, args: Value) -> Result<Value, ToolError> {
        self.calls.lock().unwrap().push((name, args));
        self.result
            .clone()
            .ok_or_else(|| ToolError::Protocol("invalid params".to_string()))
    }
}

#[async_trait]
impl ToolLauncher for MockLauncher {
    async fn launch(&self) -> Result<Box<dyn ToolService>, ToolError> {
        *self.launches.lock().unwrap() += 1;
        Ok(Box::new(MockService {
            calls: self.calls.clone(),
            result: self.result.clone(),
        }))
    }
}

fn bus_lines_tool() -> Tool {
    let schema: Map<String, Value> = json!({
        "type": "object",
        "properties": { "area": { "type": "string" } }
    })
    .as_object()
    .cloned()
    .unwrap();
    Tool::new("get_bus_lines", "Bus lines of an agency", schema)
}

fn text_response(text: &str) -> Response {
    Response {
        data: vec![Message::assistant(text)],
        usage: Some(Usage {
            prompt_tokens: Some(10),
            completion_tokens: Some(5),
        }),
        finish: FinishReason::Stop,
    }
}

fn tool_call_response(calls: &[(&str, Value)]) -> Response {
    Response {
        data: vec![Message::Assistant(
            calls
                .iter()
                .enumerate()
                .map(|(i, (name, args))| Part::FunctionCall {
                    id: Some(format!("call_{}", i)),
                    name: name.to_string(),
                    arguments: args.clone(),
                })
                .collect(),
        )],
        usage: Some(Usage {
            prompt_tokens: Some(20),
            completion_tokens: Some(7),
        }),
        finish: FinishReason::ToolCalls,
    }
}

#[tokio::test]
async fn test_answer_without_tool_call_is_returned_directly() {
    let client = MockClient::new(vec![text_response("Ciao!")]);
    let launcher = MockLauncher::default();
    let orchestrator = Orchestrator::new(client.clone(), launcher.clone()).with_tool(bus_lines_tool());

    let answer = orchestrator.answer("system", "Hi").await.unwrap();

    assert_eq!(answer.text, "Ciao!");
    assert_eq!(answer.tool_called, None);
    assert_eq!(*launcher.launches.lock().unwrap(), 0);

    let requests = client.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, vec![Message::system("system"), Message::user("Hi")]);
    assert_eq!(requests[0].1.len(), 1);
}

#[tokio::test]
async fn test_single_tool_call_runs_once_and_asks_once_more() {
    let client = MockClient::new(vec![
        tool_call_response(&[("get_bus_lines", json!({"area": "Firenze"}))]),
        text_response("There are 42 lines."),
    ]);
    let launcher = MockLauncher {
        result: Some(json!({"lines": ["1", "6", "14"]})),
        ..Default::default()
    };
    let orchestrator = Orchestrator::new(client.clone(), launcher.clone()).with_tool(bus_lines_tool());

    let answer = orchestrator.answer("system", "Linee bus a Firenze?").await.unwrap();

    assert_eq!(answer.text, "There are 42 lines.");
    assert_eq!(answer.tool_called.as_deref(), Some("get_bus_lines"));
    assert_eq!(answer.usage.prompt_tokens, Some(30));
    assert_eq!(answer.usage.completion_tokens, Some(12));

    assert_eq!(*launcher.launches.lock().unwrap(), 1);
    let calls = launcher.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], ("get_bus_lines".to_string(), json!({"area": "Firenze"})));

    let requests = client.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);

    // Follow-up carries the assistant call and the tool result, without tools.
    let (follow_up, tools) = &requests[1];
    assert!(tools.is_empty());
    assert_eq!(follow_up.len(), 4);
    assert_eq!(
        follow_up[3],
        Message::User(vec![Part::FunctionResponse {
            id: Some("call_0".to_string()),
            name: "get_bus_lines".to_string(),
            response: json!({"lines": ["1", "6", "14"]}),
        }])
    );
}

#[tokio::test]
async fn test_only_first_of_several_tool_calls_is_executed() {
    let client = MockClient::new(vec![
        tool_call_response(&[
            ("get_bus_lines", json!({"area": "Firenze"})),
            ("get_events", json!({"range": "day"})),
        ]),
        text_response("Done."),
    ]);
    let launcher = MockLauncher {
        result: Some(Value::Null),
        ..Default::default()
    };
    let orchestrator = Orchestrator::new(client.clone(), launcher.clone());

    let answer = orchestrator.answer("system", "question").await.unwrap();

    assert_eq!(answer.text, "Done.");
    let calls = launcher.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "get_bus_lines");

    let requests = client.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    let echoed = &requests[1].0[2];
    assert_eq!(echoed.function_calls().count(), 1);
}

#[tokio::test]
async fn test_tool_failure_is_reported_to_the_model() {
    let client = MockClient::new(vec![
        tool_call_response(&[("get_bus_lines", json!({"area": 7}))]),
        text_response("Sorry, I could not fetch the lines."),
    ]);
    let launcher = MockLauncher::default();
    let orchestrator = Orchestrator::new(client.clone(), launcher.clone());

    let answer = orchestrator.answer("system", "question").await.unwrap();
    assert_eq!(answer.text, "Sorry, I could not fetch the lines.");

    let requests = client.requests.lock().unwrap();
    match &requests[1].0[3] {
        Message::User(parts) => match &parts[0] {
            Part::FunctionResponse { response, .. } => {
                assert!(response["error"].as_str().unwrap().contains("invalid params"));
            }
            other => panic!("Expected function response, got {:?}", other),
        },
        other => panic!("Expected user message, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_completion_is_an_error() {
    let client = MockClient::new(vec![Response {
        data: vec![],
        usage: None,
        finish: FinishReason::Stop,
    }]);
    let orchestrator = Orchestrator::new(client, MockLauncher::default());

    let err = orchestrator.answer("system", "question").await.unwrap_err();
    assert!(matches!(err, ClientError::ProviderError(_)));
}
