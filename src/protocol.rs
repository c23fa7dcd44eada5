//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{GeneratedProblem, ProblemRequest};
use crate::render::{problem_view, ProblemView};
use crate::workspace::Workspace;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Generate {
        #[serde(default)]
        request: ProblemRequest,
    },
    LoadWorkspace {
        #[serde(rename = "problemId")]
        problem_id: String,
        #[serde(default)]
        language: Option<String>,
    },
    SwitchLanguage {
        #[serde(rename = "problemId")]
        problem_id: String,
        language: String,
    },
    EditCode {
        #[serde(rename = "problemId")]
        problem_id: String,
        language: String,
        code: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Problem {
        problem: ProblemOut,
    },
    Workspace {
        workspace: WorkspaceOut,
    },
    CodeSaved {
        #[serde(rename = "problemId")]
        problem_id: String,
        language: String,
    },
    Error {
        message: String,
    },
}

/// DTO used by both WS and HTTP for problem delivery: the rendered view next
/// to the raw payload the editor still needs (templates, hidden limits).
#[derive(Debug, Serialize)]
pub struct ProblemOut {
    pub view: ProblemView,
    pub raw: GeneratedProblem,
}

/// Convert a full `GeneratedProblem` (internal) to the public DTO.
pub fn to_out(p: &GeneratedProblem) -> ProblemOut {
    ProblemOut { view: problem_view(p), raw: p.clone() }
}

/// DTO for resolved workspace state.
#[derive(Debug, Serialize)]
pub struct WorkspaceOut {
    #[serde(rename = "problemId")]
    pub problem_id: String,
    pub language: String,
    pub code: String,
}

impl From<Workspace> for WorkspaceOut {
    fn from(w: Workspace) -> Self {
        Self { problem_id: w.problem_id, language: w.language, code: w.code }
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct WorkspaceQuery {
    #[serde(rename = "problemId")]
    pub problem_id: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Deserialize)]
pub struct SwitchLanguageIn {
    #[serde(rename = "problemId")]
    pub problem_id: String,
    pub language: String,
}

#[derive(Deserialize)]
pub struct EditCodeIn {
    #[serde(rename = "problemId")]
    pub problem_id: String,
    pub language: String,
    pub code: String,
}

#[derive(Serialize)]
pub struct SavedOut {
    pub saved: bool,
    #[serde(rename = "problemId")]
    pub problem_id: String,
    pub language: String,
}

/// Catalogs the generation form is built from.
#[derive(Serialize)]
pub struct CatalogOut {
    pub languages: Vec<String>,
    pub topics: Vec<String>,
    pub difficulties: Vec<String>,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
