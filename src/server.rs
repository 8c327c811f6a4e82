//! MCP tool host exposing the transit lookups.
//!
//! Tools return the upstream JSON as a single text content block; a failed
//! lookup is the JSON literal `null`.

use rmcp::handler::server::router::prompt::PromptRouter;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    AnnotateAble, CallToolResult, Content, GetPromptRequestParam, GetPromptResult,
    Implementation, ListPromptsResult, ListResourcesResult, PaginatedRequestParam,
    PromptMessage, PromptMessageRole, RawResource, ReadResourceRequestParam,
    ReadResourceResult, ResourceContents, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{prompt, prompt_handler, prompt_router, tool, tool_handler, tool_router};
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::resolver::{extract_agencies, resolve};
use crate::transit::{EventQuery, TransitClient};

pub const SERVER_NAME: &str = "snap4";
pub const AGENCIES_URI: &str = "file://documents/agencies";

pub const BUS_LINES_TOOL: &str = "get_bus_lines";

/// Arguments of the `get_bus_lines` tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct BusLinesArgs {
    /// Name of a specific zone: a city or a region. If unclear, look for clues
    /// in the previous conversation.
    #[serde(default)]
    pub area: Option<String>,
    /// Name of the agency whose lines are wanted.
    #[serde(default)]
    pub agency_name: Option<String>,
}

/// Arguments of the `get_events` tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct EventsArgs {
    /// Time window: `day`, `week` or `month`.
    #[serde(default)]
    pub range: Option<String>,
    /// Spatial selection, `lat;lng` or a bounding box `lat1;lng1;lat2;lng2`.
    #[serde(default)]
    pub selection: Option<String>,
    /// Maximum distance in kilometres from the selection.
    #[serde(default)]
    pub max_dists: Option<f64>,
    /// Maximum number of events to return.
    #[serde(default)]
    pub max_results: Option<u32>,
}

impl From<EventsArgs> for EventQuery {
    fn from(args: EventsArgs) -> Self {
        EventQuery {
            range: args.range,
            selection: args.selection,
            max_dists: args.max_dists,
            max_results: args.max_results,
        }
    }
}

/// Arguments of the `explain_bus_lines` prompt.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExplainBusLinesArgs {
    /// The JSON returned by `get_bus_lines`.
    pub bus_data: String,
    /// Area used to contextualise the answer.
    #[serde(default)]
    pub area: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TplServer {
    transit: TransitClient,
    tool_router: ToolRouter<Self>,
    prompt_router: PromptRouter<Self>,
}

impl Default for TplServer {
    fn default() -> Self {
        Self::new(TransitClient::default())
    }
}

#[tool_router]
impl TplServer {
    pub fn new(transit: TransitClient) -> Self {
        Self {
            transit,
            tool_router: Self::tool_router(),
            prompt_router: Self::prompt_router(),
        }
    }

    /// Definition of the named tool, as advertised to MCP clients.
    pub fn tool_definition(&self, name: &str) -> Option<Tool> {
        self.tool_router
            .list_all()
            .into_iter()
            .find(|t| t.name == name)
    }

    /// Resolve an agency locally, then fetch its bus lines.
    pub async fn bus_lines(&self, args: &BusLinesArgs) -> Value {
        let doc = self.transit.agencies().await;
        let agencies = extract_agencies(&doc);

        match resolve(&agencies, args.area.as_deref(), args.agency_name.as_deref()) {
            Some(agency) => {
                info!("Resolved agency {} ({})", agency.name, agency.url);
                self.transit.bus_lines(&agency.url).await
            }
            None => {
                warn!(
                    "No agency matches area={:?} agency_name={:?} among {} candidates",
                    args.area,
                    args.agency_name,
                    agencies.len()
                );
                Value::Null
            }
        }
    }

    #[tool(description = "Returns the public transport agencies with their URLs. \
        If the user asks for a specific city or area, look for a correspondence here.")]
    async fn get_agencies(&self) -> Result<CallToolResult, McpError> {
        info!("Tool called: get_agencies");
        json_result(self.transit.agencies().await)
    }

    #[tool(name = "get_bus_lines", description = "Returns the BUS LINES that one specific agency operates. \
        The arguments can be either an area (city or region) or the agency name.")]
    async fn get_bus_lines(
        &self,
        Parameters(args): Parameters<BusLinesArgs>,
    ) -> Result<CallToolResult, McpError> {
        info!("Tool called: get_bus_lines({:?}, {:?})", args.area, args.agency_name);
        json_result(self.bus_lines(&args).await)
    }

    #[tool(description = "Returns events (traffic, cultural, public) filtered by time range, \
        spatial selection, distance and maximum number of results.")]
    async fn get_events(
        &self,
        Parameters(args): Parameters<EventsArgs>,
    ) -> Result<CallToolResult, McpError> {
        info!("Tool called: get_events({:?})", args);
        json_result(self.transit.events(&args.into()).await)
    }
}

#[prompt_router]
impl TplServer {
    #[prompt(
        name = "explain_bus_lines",
        description = "Explain a bus-line document in clear, friendly language"
    )]
    async fn explain_bus_lines(
        &self,
        Parameters(args): Parameters<ExplainBusLinesArgs>,
    ) -> Vec<PromptMessage> {
        vec![PromptMessage::new_text(
            PromptMessageRole::User,
            explain_bus_lines_text(&args.bus_data, args.area.as_deref()),
        )]
    }
}

/// Instructions asking the model to summarise `bus_data` for a person.
pub fn explain_bus_lines_text(bus_data: &str, area: Option<&str>) -> String {
    let intro = match area {
        Some(area) => format!("The following is the list of bus lines operating in {}:", area),
        None => "Here are some bus lines:".to_string(),
    };

    format!(
        "{intro}\n\n{bus_data}\n\n\
         Please explain to the user in a clear and friendly way:\n\
         - How many lines there are,\n\
         - Which ones seem to be the main routes (based on names or codes),\n\
         - And any pattern you can infer (e.g. which cover the city center or suburbs).\n\
         Avoid restating the raw JSON; focus on clarity and usefulness."
    )
}

fn json_result(value: Value) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::json(value)?]))
}

#[tool_handler]
#[prompt_handler]
impl ServerHandler for TplServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            instructions: Some(
                "Public transport data from Snap4City: agencies, bus lines and events.".into(),
            ),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let mut agencies = RawResource::new(AGENCIES_URI, "agencies");
        agencies.description = Some(
            "The bus agencies. Look here for the agency serving a given city or area.".into(),
        );
        agencies.mime_type = Some("application/json".into());
        Ok(ListResourcesResult::with_all_items(vec![
            agencies.no_annotation(),
        ]))
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParam { uri }: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        match uri.as_str() {
            AGENCIES_URI => {
                let doc = self.transit.agencies().await;
                Ok(ReadResourceResult {
                    contents: vec![ResourceContents::text(doc.to_string(), uri)],
                })
            }
            _ => Err(McpError::resource_not_found(
                "resource_not_found",
                Some(json!({ "uri": uri })),
            )),
        }
    }
}
