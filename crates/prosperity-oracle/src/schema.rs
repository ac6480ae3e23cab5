//! JSON Schema for the structured turn response.
//!
//! Sent to `OpenAI`-compatible backends as a `json_schema` response format
//! and embedded in the system prompt for backends without constrained
//! decoding. Field descriptions double as instructions to the model.

use prosperity_types::{IntelligenceLevel, Sentiment};
use serde_json::{Value, json};

/// Name under which the schema is registered with the backend.
pub const SCHEMA_NAME: &str = "simulation_response";

fn string_list(description: &str) -> Value {
    json!({
        "type": "array",
        "items": { "type": "string" },
        "description": description,
    })
}

/// The schema every turn response must satisfy.
pub fn simulation_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "narrativeOutcome": {
                "type": "string",
                "description": "总统法令的具体结果。描述宏观影响：股市、边境冲突、能源网波动或劳工骚乱。使用简体中文。",
            },
            "visualChanges": {
                "type": "string",
                "description": "首都办公室氛围的抽象描述。使用简体中文。",
            },
            "deltaFog": {
                "type": "integer",
                "description": "社会迷雾变化量 (-5 到 +5)。",
            },
            "deltaClarity": {
                "type": "integer",
                "description": "社会清晰度变化量 (-5 到 +5)。",
            },
            "windows": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "warRoom": {
                        "type": "object",
                        "additionalProperties": false,
                        "properties": {
                            "status": { "type": "string", "description": "例如：红色警戒、能源过载、边境冲突" },
                            "activeThreats": string_list("当前威胁"),
                            "resourceAllocation": { "type": "integer", "description": "民生与聚变研发的资源分配比例 (0-100)。" },
                        },
                        "required": ["status", "activeThreats", "resourceAllocation"],
                    },
                    "media": {
                        "type": "object",
                        "additionalProperties": false,
                        "properties": {
                            "headlines": string_list("新闻头条，最重要的在前"),
                            "sentiment": { "type": "string", "enum": Sentiment::WIRE_VALUES },
                            "trendingTopic": { "type": "string" },
                        },
                        "required": ["headlines", "sentiment", "trendingTopic"],
                    },
                    "streetView": {
                        "type": "object",
                        "additionalProperties": false,
                        "properties": {
                            "description": { "type": "string", "description": "联邦某处（港口、边境、首都、贫民窟）的画面描述。聚焦机器人、气候与工业。必须使用简体中文。" },
                            "weather": { "type": "string", "description": "必须使用中文（如：酸雨、热浪）" },
                            "crowdMood": { "type": "string", "description": "必须使用中文" },
                            "visualDetails": string_list("必须使用中文"),
                        },
                        "required": ["description", "weather", "crowdMood", "visualDetails"],
                    },
                    "internalReport": {
                        "type": "object",
                        "additionalProperties": false,
                        "properties": {
                            "title": { "type": "string" },
                            "content": { "type": "string", "description": "联邦情报或科研报告全文。主题：聚变进度、疫情传播、机器人效率。可以带有偏见。使用简体中文。" },
                            "intelligenceLevel": { "type": "string", "enum": IntelligenceLevel::WIRE_VALUES },
                            "veracityScore": { "type": "integer", "description": "0-100 的真实度评分。" },
                        },
                        "required": ["title", "content", "intelligenceLevel", "veracityScore"],
                    },
                },
                "required": ["warRoom", "media", "streetView", "internalReport"],
            },
            "nextSceneContext": {
                "type": "string",
                "description": "下一场景的情境说明，聚焦【百年转型】的紧张感。使用简体中文。",
            },
            "newClauses": string_list("6 条政策条款（联邦法律、军事命令、经济制裁）。使用简体中文。"),
            "newQuickReplies": string_list("4 个快捷回复选项，至少包含一个消极的“观察”选项。使用简体中文。"),
        },
        "required": [
            "narrativeOutcome",
            "visualChanges",
            "deltaFog",
            "deltaClarity",
            "windows",
            "nextSceneContext",
            "newClauses",
            "newQuickReplies",
        ],
    })
}
