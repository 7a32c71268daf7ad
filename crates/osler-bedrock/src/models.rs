//! Chat model discovery.
//!
//! Bedrock exposes two overlapping registries: foundation models (the
//! canonical list, with lifecycle status) and inference profiles
//! (cross-region routing wrappers like `us.anthropic.claude-sonnet-4-6`).
//! The Converse API wants an inference profile ID, but newly launched
//! models may not have profiles yet, so discovery starts from the ACTIVE
//! foundation model list and attaches a `us.` profile to each entry,
//! constructing `us.{model_id}` when the API did not return one.

use std::collections::HashMap;

use aws_sdk_bedrock::types::{
    FoundationModelLifecycleStatus, InferenceProfileStatus, InferenceProfileType,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::BedrockError;

/// An invokable chat model (Bedrock inference profile).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatModel {
    /// Inference profile ID, e.g. `us.anthropic.claude-sonnet-4-20250514-v1:0`.
    pub model_id: String,
    /// Human-readable name, e.g. `"US Anthropic Claude Sonnet 4"`.
    pub name: String,
}

/// List the Anthropic Claude models available for patient simulation,
/// sorted by name.
///
/// Starting from ACTIVE foundation models (rather than the profile list)
/// excludes legacy models automatically: AWS marks superseded models
/// `LEGACY` in the registry but keeps their inference profiles listed as
/// active.
pub async fn list_chat_models(
    config: &aws_config::SdkConfig,
) -> Result<Vec<ChatModel>, BedrockError> {
    let client = aws_sdk_bedrock::Client::new(config);

    let active = fetch_active_claude_models(&client).await?;
    let profiles = fetch_us_profiles(&client).await?;

    let mut models: Vec<ChatModel> = active
        .into_iter()
        .map(|(model_id, name)| match profiles.get(&model_id) {
            Some((profile_id, profile_name)) => ChatModel {
                model_id: profile_id.clone(),
                name: profile_name.clone(),
            },
            None => ChatModel {
                model_id: format!("us.{model_id}"),
                name,
            },
        })
        .collect();

    models.sort_by(|a, b| a.name.cmp(&b.name));

    info!(count = models.len(), "discovered chat models");

    Ok(models)
}

/// ACTIVE Claude foundation models as (model_id, name), skipping
/// context-window variants (`:48k`, `:200k`, ...).
async fn fetch_active_claude_models(
    client: &aws_sdk_bedrock::Client,
) -> Result<Vec<(String, String)>, BedrockError> {
    let response = client
        .list_foundation_models()
        .by_provider("anthropic")
        .send()
        .await
        .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

    Ok(response
        .model_summaries()
        .iter()
        .filter(|m| {
            let id = m.model_id();
            let is_active = m
                .model_lifecycle()
                .map(|lc| *lc.status() == FoundationModelLifecycleStatus::Active)
                .unwrap_or(false);
            let is_variant = id.rsplit_once(':').is_some_and(|(_, suffix)| {
                suffix.chars().next().is_some_and(|c| c.is_ascii_digit()) && suffix != "0"
            });
            id.contains("claude") && is_active && !is_variant
        })
        .map(|m| {
            let name = m.model_name().unwrap_or(m.model_id()).to_string();
            (m.model_id().to_string(), name)
        })
        .collect())
}

/// Active US-scoped Claude inference profiles, keyed by bare foundation
/// model ID.
async fn fetch_us_profiles(
    client: &aws_sdk_bedrock::Client,
) -> Result<HashMap<String, (String, String)>, BedrockError> {
    let response = client
        .list_inference_profiles()
        .type_equals(InferenceProfileType::SystemDefined)
        .max_results(100)
        .send()
        .await
        .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

    let mut map = HashMap::new();

    for p in response.inference_profile_summaries() {
        let id = p.inference_profile_id();
        if !id.starts_with("us.") || !id.contains("anthropic.claude") {
            continue;
        }
        if *p.status() != InferenceProfileStatus::Active {
            continue;
        }
        map.insert(
            id["us.".len()..].to_string(),
            (id.to_string(), p.inference_profile_name().to_string()),
        );
    }

    Ok(map)
}
