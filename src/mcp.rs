use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_router,
};
use serde::{Deserialize, Serialize};

use crate::commands::split::split_to_dir;
use pdfsplit::{LoadOptions, PageSource, PdfDocument, SplitError};

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfSplitRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Pages to extract (e.g., '1,3-5,8'). Omit to split every page.")]
    #[serde(default)]
    pub pages: Option<String>,
    #[schemars(description = "Directory to write one PDF per page into")]
    pub output_dir: String,
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for PdfServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Request-level failures carry their symbolic kind so clients can react to it.
fn format_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<SplitError>() {
        Some(split_err) => format!("Error: {:?}: {}", split_err.kind(), split_err),
        None => format!("Error: {:#}", err),
    }
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Get the number of pages in a PDF, to check a page selection before splitting")]
    fn pdf_page_count(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        match PdfDocument::open(&path, LoadOptions::default()) {
            Ok(doc) => {
                let result = PageCountResult {
                    page_count: doc.page_count(),
                    path,
                };
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format_error(&e.into()),
        }
    }

    #[tool(description = "Split a PDF into one file per page. Optionally restrict to a page selection like '1,3-5,8'. Pages that fail are reported individually; the rest are still written.")]
    fn pdf_split(&self, Parameters(req): Parameters<PdfSplitRequest>) -> String {
        match split_to_dir(
            &req.path,
            &req.output_dir,
            req.pages.as_deref(),
            LoadOptions::default(),
        ) {
            Ok(reports) => {
                serde_json::to_string_pretty(&reports).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format_error(&e),
        }
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PageCountResult {
    pub path: String,
    pub page_count: u32,
}

impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF page splitting tools. Use pdf_page_count to see how many pages a document \
                 has, and pdf_split to write each selected page to its own PDF file."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = PdfServer::new();

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
