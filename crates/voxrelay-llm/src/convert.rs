//! Conversion between internal types and the `OpenAI` wire format

use crate::protocol::{OpenAiChoice, OpenAiMessage, OpenAiRequest, OpenAiResponse, OpenAiUsage};
use crate::types::{Choice, ChoiceMessage, CompletionRequest, CompletionResponse, FinishReason, Message, Usage};

impl From<&CompletionRequest> for OpenAiRequest {
    fn from(req: &CompletionRequest) -> Self {
        Self {
            model: req.model.clone(),
            messages: req.messages.iter().map(Into::into).collect(),
        }
    }
}

impl From<&Message> for OpenAiMessage {
    fn from(msg: &Message) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: Some(msg.content.clone()),
        }
    }
}

impl From<OpenAiResponse> for CompletionResponse {
    fn from(resp: OpenAiResponse) -> Self {
        Self {
            id: resp.id,
            model: resp.model,
            choices: resp.choices.into_iter().map(Into::into).collect(),
            usage: resp.usage.map(Into::into),
        }
    }
}

impl From<OpenAiChoice> for Choice {
    fn from(choice: OpenAiChoice) -> Self {
        Self {
            index: choice.index,
            message: ChoiceMessage {
                role: choice.message.role,
                content: choice.message.content,
            },
            finish_reason: choice.finish_reason.as_deref().and_then(parse_finish_reason),
        }
    }
}

impl From<OpenAiUsage> for Usage {
    fn from(usage: OpenAiUsage) -> Self {
        Self {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        }
    }
}

fn parse_finish_reason(reason: &str) -> Option<FinishReason> {
    match reason {
        "stop" => Some(FinishReason::Stop),
        "length" => Some(FinishReason::Length),
        "tool_calls" | "function_call" => Some(FinishReason::ToolCalls),
        "content_filter" => Some(FinishReason::ContentFilter),
        _ => None,
    }
}
