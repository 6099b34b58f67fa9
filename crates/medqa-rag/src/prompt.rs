/// Streamed verbatim when retrieval finds nothing; the model is not called.
pub const NO_CONTEXT_APOLOGY: &str = "抱歉，在我的知识库中找不到与您问题相关的信息。";

const INSTRUCTIONS: &str = "你是一名专业、耐心的医疗问答助手，需要把医学信息讲得通俗易懂。\
回答必须以下面的背景知识为主要依据：先提炼背景知识中的要点，再找准用户问题的核心，\
最后用清晰连贯的中文分点作答。背景知识不足时可以补充可靠的医学常识，但要注明是补充内容，\
不得猜测或编造。不要复述背景知识原文。涉及个人诊疗时，提醒用户咨询专业医生。";

/// Grounded prompt: instructions, retrieved facts (one per line), then the question.
pub fn build_prompt(query: &str, facts: &[String]) -> String {
    format!(
        "{}\n\n[背景知识]\n{}\n\n[问题]\n{}\n\n[你的回答]：\n",
        INSTRUCTIONS,
        facts.join("\n"),
        query
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_sections_in_order() {
        let facts = vec!["感冒多由病毒引起。".to_string(), "多休息有助于恢复。".to_string()];
        let prompt = build_prompt("感冒怎么办？", &facts);

        let ctx = prompt.find("[背景知识]\n感冒多由病毒引起。\n多休息有助于恢复。").unwrap();
        let q = prompt.find("[问题]\n感冒怎么办？").unwrap();
        let a = prompt.find("[你的回答]").unwrap();
        assert!(ctx < q && q < a);
    }
}
