//! Relevance-gated prompt assembly

use serde_json::Value;

use crate::domain::knowledge_base::RetrievedCandidate;

/// Fixed sentence the model must answer with when no relevant document exists
pub const STANDARD_REFUSAL: &str = "未在现有运维知识库中找到标准处置方案，请联系后台支撑。";

/// Context placeholder used when retrieval returned nothing
pub const NO_CONTEXT_MARKER: &str = "（未检索到相关文档）";

/// System policy: small talk answered naturally, technical questions gated on
/// topical relevance of the retrieved context, refusal otherwise, no fabrication
pub const SYSTEM_PROMPT: &str = r#"你是一名资深运维工程师助手，需要结合用户问题和【参考文档】作答。

请遵守以下规则：

1. 闲聊或通用问题（问候、夸奖、天气、常识等）：
   - 忽略参考文档，用自然、友好的语气直接回答。
   - 不要提及知识库或文档，也不要输出“属于闲聊”之类的分类标签。

2. 专业运维或业务问题（设备、流程、故障、指标等）：
   - 只能依据【参考文档】作答。
   - 先判断【参考文档】是否与问题（或图片中的报错）真正对口。检索结果可能不相关，例如问题是“数据库连接失败”，文档却是“服务器登录指南”。
   - 如果文档与问题无关、无法解决问题，或没有检索到文档，请忽略文档并只输出：“未在现有运维知识库中找到标准处置方案，请联系后台支撑。”
   - 禁止强行关联无关文档，禁止编造文档中不存在的内容。
   - 文档相关时按此格式引用：根据《[文档名称]》[章节]（上传时间：YYYY-MM-DD），标准处理流程如下：...

请直接按上述规则输出回答。"#;

/// Render candidates as numbered context blocks in retrieval order
pub fn build_context(candidates: &[RetrievedCandidate]) -> String {
    if candidates.is_empty() {
        return NO_CONTEXT_MARKER.to_string();
    }

    candidates
        .iter()
        .enumerate()
        .map(|(i, candidate)| {
            let metadata = serde_json::to_string(&Value::Object(candidate.metadata.clone()))
                .unwrap_or_else(|_| "{}".to_string());

            format!(
                "【文档 {}】\n内容：\n{}\n\n元数据：\n{}\n",
                i + 1,
                candidate.content,
                metadata
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// User block pairing the context with the question
pub fn build_user_prompt(question: &str, context: &str) -> String {
    format!(
        "\n【参考文档】\n{}\n\n【用户问题】\n{}\n",
        context, question
    )
}

/// System policy followed by the user block, sent as a single message
pub fn build_full_prompt(question: &str, context: &str) -> String {
    format!("{}\n\n{}", SYSTEM_PROMPT, build_user_prompt(question, context))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_context_uses_marker() {
        assert_eq!(build_context(&[]), NO_CONTEXT_MARKER);
    }

    #[test]
    fn test_context_blocks_are_numbered_in_order() {
        let candidates = vec![
            RetrievedCandidate::new("a", "重启 nginx", 0.1)
                .with_metadata("filename", json!("nginx.md")),
            RetrievedCandidate::new("b", "清理磁盘", 0.2),
        ];

        let context = build_context(&candidates);

        let first = context.find("【文档 1】").unwrap();
        let second = context.find("【文档 2】").unwrap();
        assert!(first < second);
        assert!(context.contains("内容：\n重启 nginx"));
        assert!(context.contains(r#"{"filename":"nginx.md"}"#));
        assert!(context.contains("内容：\n清理磁盘"));
    }

    #[test]
    fn test_full_prompt_layout() {
        let prompt = build_full_prompt("系统A无法登录", NO_CONTEXT_MARKER);

        assert!(prompt.starts_with(SYSTEM_PROMPT));
        assert!(prompt.contains("【参考文档】\n（未检索到相关文档）"));
        assert!(prompt.ends_with("【用户问题】\n系统A无法登录\n"));
    }

    #[test]
    fn test_policy_contains_refusal_sentence() {
        assert!(SYSTEM_PROMPT.contains(STANDARD_REFUSAL));
    }
}
