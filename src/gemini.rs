//! Gemini API client: generates terminal log lines and the celebration
//! identity, with curated fallbacks so callers never see an error.

use std::sync::LazyLock;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::log::{self, DiagLog, Level};
use crate::model::UserIdentity;

fn gemini_api_key() -> String {
    std::env::var("GEMINI_API_KEY").unwrap_or_default()
}

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const GENERATION_MODEL: &str = "gemini-3-flash-preview";

const LOG_PROMPT: &str = "Generate a single, short, witty, retro-terminal style system log entry \
about wrapping up the closing year. Mix technical system commands (DELETE, ARCHIVE, UNMOUNT, \
PURGE, COMPRESS) with imaginary memes of the year, major fictional or realistic events, and \
relatable human struggles. Keep it cryptic, nostalgic, or funny. Examples: \
'OFFLOADING: Mental_Load_2025.dump', 'PURGING: Failed_Resolutions_List.txt', \
'ARCHIVING: The_Global_Glitch_Event'. Strictly no timestamps. Just the message.";

const IDENTITY_PROMPT: &str = "Generate a mystical, futuristic, and inspiring user identity \
for the new year. Return valid JSON only.";

// ---------------------------------------------------------------------------
// Curated fallbacks for when the API is busy or quota is exhausted
// ---------------------------------------------------------------------------

pub const FALLBACK_LOGS: [&str; 13] = [
    "OFFLOADING: Mental_Load_2025.dump",
    "COMPRESSING: Viral_Sneeze_Remix.mp4",
    "PURGING: Failed_Resolutions_List.txt",
    "SAVING: That_One_Good_Day_In_August.mem",
    "UNMOUNTING: Reality_Show_Obsession.drv",
    "ARCHIVING: The_Global_Glitch_Event",
    "DELETING: Procrastination_Protocols.exe",
    "SCANNING: 2025_Meme_Database.db",
    "ENCRYPTING: Late_Night_Thoughts.log",
    "BUFFERING: 2026_Hope_Module.pkg",
    "SYNCING: Nostalgia_Circuits_v25.0",
    "REFORMATTING: Social_Battery_Partition",
    "DETECTED: Cringe_Compilation_2025.zip",
];

pub static FALLBACK_IDENTITIES: LazyLock<Vec<UserIdentity>> = LazyLock::new(|| {
    [
        ("Pilot of the Morning Star", "To find beauty in chaos.", "Stardust"),
        ("Architect of Horizons", "To build bridges where walls once stood.", "Glass"),
        ("Weaver of Light", "To illuminate the shadows of the unknown.", "Neon"),
        ("Quantum Dreamer", "To manifest the impossible into reality.", "Aether"),
        ("Digital Nomad", "To traverse the boundaries of the new world.", "Data"),
        ("Echo of Tomorrow", "To resonate with the frequency of change.", "Resonance"),
    ]
    .into_iter()
    .map(|(title, mission, element)| UserIdentity {
        title: title.to_string(),
        mission: mission.to_string(),
        element: Some(element.to_string()),
    })
    .collect()
});

fn random_log_fallback() -> String {
    FALLBACK_LOGS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(FALLBACK_LOGS[0])
        .to_string()
}

fn random_identity_fallback() -> UserIdentity {
    FALLBACK_IDENTITIES
        .choose(&mut rand::thread_rng())
        .cloned()
        .unwrap_or_else(|| FALLBACK_IDENTITIES[0].clone())
}

// ---------------------------------------------------------------------------
// Gemini wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

fn response_text(response: GenerateResponse) -> Option<String> {
    let text = response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .find_map(|part| part.text)?;
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn request_generation(
    api_key: &str,
    prompt: &str,
    generation_config: Option<GenerationConfig>,
) -> Result<String, String> {
    if api_key.is_empty() {
        return Err("GEMINI_API_KEY not set".to_string());
    }
    let url = format!("{}/models/{}:generateContent", API_BASE, GENERATION_MODEL);
    let body = GenerateRequest {
        contents: vec![RequestContent {
            parts: vec![RequestPart {
                text: prompt.to_string(),
            }],
        }],
        generation_config,
    };

    let response = reqwest::Client::new()
        .post(&url)
        .header("x-goog-api-key", api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| format!("Gemini request failed: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(format!("Gemini API error: {} - {}", status, body));
    }

    let parsed: GenerateResponse = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse Gemini response: {}", e))?;
    response_text(parsed).ok_or_else(|| "Gemini returned an empty response".to_string())
}

fn identity_generation_config() -> GenerationConfig {
    GenerationConfig {
        response_mime_type: "application/json",
        response_schema: json!({
            "type": "OBJECT",
            "properties": {
                "title": {
                    "type": "STRING",
                    "description": "A cool futuristic title, e.g. 'Pilot of the Morning Star'."
                },
                "mission": {
                    "type": "STRING",
                    "description": "A short, poetic mission statement for the new year."
                },
                "element": {
                    "type": "STRING",
                    "description": "A visual element or theme, e.g. 'Neon', 'Glass', 'Stardust'."
                }
            },
            "required": ["title", "mission"]
        }),
    }
}

fn parse_identity(text: &str) -> Result<UserIdentity, String> {
    let identity: UserIdentity =
        serde_json::from_str(text).map_err(|e| format!("Failed to parse identity JSON: {}", e))?;
    if identity.title.trim().is_empty() || identity.mission.trim().is_empty() {
        return Err("Identity response is missing title or mission".to_string());
    }
    Ok(identity)
}

async fn request_identity(api_key: &str) -> Result<UserIdentity, String> {
    let text =
        request_generation(api_key, IDENTITY_PROMPT, Some(identity_generation_config())).await?;
    parse_identity(&text)
}

/// Quota exhaustion is expected and frequent; keep it out of diagnostics.
fn is_quota_error(err: &str) -> bool {
    err.contains("429")
        || err.contains("RESOURCE_EXHAUSTED")
        || err.to_lowercase().contains("quota")
}

fn report_error(diag: &DiagLog, context: &str, err: &str) {
    if is_quota_error(err) {
        return;
    }
    diag.push(Level::Error, format!("{}: {}", context, err));
}

fn resolve_log_line(result: Result<String, String>, diag: &DiagLog) -> String {
    match result {
        Ok(text) => text,
        Err(err) => {
            report_error(diag, "Log generation", &err);
            random_log_fallback()
        }
    }
}

fn resolve_identity(result: Result<UserIdentity, String>, diag: &DiagLog) -> UserIdentity {
    match result {
        Ok(identity) => identity,
        Err(err) => {
            report_error(diag, "Identity generation", &err);
            random_identity_fallback()
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Fetch one retro log line. Always resolves: any failure is converted to a
/// curated fallback.
pub async fn generate_log_line() -> String {
    let result = request_generation(&gemini_api_key(), LOG_PROMPT, None).await;
    resolve_log_line(result, log::diagnostics())
}

/// Fetch the celebration identity. Always resolves, same fallback contract.
pub async fn generate_identity() -> UserIdentity {
    let result = request_identity(&gemini_api_key()).await;
    resolve_identity(result, log::diagnostics())
}
