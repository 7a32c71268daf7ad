//! The Converse-API text generator.

use async_trait::async_trait;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ContentBlockDelta, ConversationRole, ConverseStreamOutput,
    InferenceConfiguration, Message, SystemContentBlock,
};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use osler_llm::{FragmentReceiver, GenerateError, PromptMessage, PromptRole, TextGenerator};

use crate::error::BedrockError;

/// Generates patient replies through Bedrock's Converse API.
///
/// `model_id` must be an inference profile ID (e.g.
/// `us.anthropic.claude-sonnet-4-20250514-v1:0`) — bare foundation model IDs
/// fail with "on-demand throughput isn't supported". Use
/// [`crate::models::list_chat_models`] to discover valid IDs.
pub struct BedrockGenerator {
    config: aws_config::SdkConfig,
    model_id: String,
}

impl BedrockGenerator {
    pub fn new(config: aws_config::SdkConfig, model_id: impl Into<String>) -> Self {
        Self {
            config,
            model_id: model_id.into(),
        }
    }

    /// Build a generator from the ambient AWS environment (env vars,
    /// `~/.aws/credentials`, instance metadata).
    pub async fn from_env(model_id: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(config, model_id)
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Split prompt messages into Converse system blocks and conversation
/// messages. System entries can appear anywhere in the input; Converse
/// carries them out-of-band.
fn build_request(
    messages: &[PromptMessage],
) -> Result<(Vec<SystemContentBlock>, Vec<Message>), BedrockError> {
    let mut system = Vec::new();
    let mut conversation = Vec::new();

    for msg in messages {
        let role = match msg.role {
            PromptRole::System => {
                system.push(SystemContentBlock::Text(msg.content.clone()));
                continue;
            }
            PromptRole::User => ConversationRole::User,
            PromptRole::Assistant => ConversationRole::Assistant,
        };
        let message = Message::builder()
            .role(role)
            .content(ContentBlock::Text(msg.content.clone()))
            .build()
            .map_err(|e| BedrockError::Invocation(e.to_string()))?;
        conversation.push(message);
    }

    Ok((system, conversation))
}

fn inference_config(temperature: f32) -> InferenceConfiguration {
    InferenceConfiguration::builder()
        .temperature(temperature)
        .build()
}

impl BedrockGenerator {
    async fn converse(
        &self,
        messages: &[PromptMessage],
        temperature: f32,
    ) -> Result<String, BedrockError> {
        let client = aws_sdk_bedrockruntime::Client::new(&self.config);
        let (system, conversation) = build_request(messages)?;

        let response = client
            .converse()
            .model_id(&self.model_id)
            .set_system(Some(system))
            .set_messages(Some(conversation))
            .inference_config(inference_config(temperature))
            .send()
            .await
            .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| BedrockError::ResponseParse("no message in response".to_string()))?;

        let text = output_message
            .content()
            .iter()
            .filter_map(|block| {
                if let ContentBlock::Text(text) = block {
                    Some(text.as_str())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        debug!(model_id = %self.model_id, chars = text.len(), "converse reply received");

        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for BedrockGenerator {
    async fn generate(
        &self,
        messages: &[PromptMessage],
        temperature: f32,
    ) -> Result<String, GenerateError> {
        self.converse(messages, temperature)
            .await
            .map_err(|e| GenerateError::Generation(e.to_string()))
    }

    async fn generate_stream(
        &self,
        messages: &[PromptMessage],
        temperature: f32,
    ) -> FragmentReceiver {
        let (tx, rx) = mpsc::channel(32);

        let (system, conversation) = match build_request(messages) {
            Ok(parts) => parts,
            Err(e) => {
                let _ = tx.send(Err(GenerateError::Generation(e.to_string()))).await;
                return rx;
            }
        };

        let config = self.config.clone();
        let model_id = self.model_id.clone();

        tokio::spawn(async move {
            let client = aws_sdk_bedrockruntime::Client::new(&config);

            let response = client
                .converse_stream()
                .model_id(&model_id)
                .set_system(Some(system))
                .set_messages(Some(conversation))
                .inference_config(inference_config(temperature))
                .send()
                .await;

            let mut stream = match response {
                Ok(output) => output.stream,
                Err(e) => {
                    let _ = tx
                        .send(Err(GenerateError::Generation(
                            e.into_service_error().to_string(),
                        )))
                        .await;
                    return;
                }
            };

            loop {
                match stream.recv().await {
                    Ok(Some(ConverseStreamOutput::ContentBlockDelta(event))) => {
                        if let Some(ContentBlockDelta::Text(text)) = event.delta() {
                            // Dropped receiver means the caller stopped
                            // listening; abandon the stream.
                            if tx.send(Ok(text.clone())).await.is_err() {
                                return;
                            }
                        }
                    }
                    Ok(Some(_)) => {
                        // Message/content framing events carry no text.
                    }
                    Ok(None) => break,
                    Err(e) => {
                        warn!(model_id = %model_id, error = %e, "converse stream failed");
                        let _ = tx.send(Err(GenerateError::Generation(e.to_string()))).await;
                        return;
                    }
                }
            }
        });

        rx
    }
}
