//! Keyword extraction: turns the user's utterance into a 1–2 word news query
//! by asking the completion model, then normalising its answer.

use newsbot_core::completion::CompletionBackend;
use newsbot_core::text::format_keywords;

use crate::stage::Stage;

/// Instruction prompt; `{utterance}` is substituted verbatim.
const KEYWORD_PROMPT: &str = "다음 문장에서 뉴스 검색에 사용할 핵심 키워드를 1개 또는 2개만 추출해 주세요.

규칙:
- 반드시 문장에 실제로 등장하는 단어만 사용하세요.
- 회사명, 인물명, 지명 같은 고유명사를 우선하세요.
- 조사, 어미, 그리고 '오늘', '뉴스', '요즘', '알려줘', '어때' 같은 일반적인 단어는 제외하세요.
- 설명 없이 키워드만 출력하세요.

출력 형식: \"단어\" 또는 \"단어1 단어2\"

문장: {utterance}";

pub fn build_prompt(utterance: &str) -> String {
    KEYWORD_PROMPT.replace("{utterance}", utterance)
}

/// Extract at most two keywords. Provider failures degrade to an empty string.
pub async fn extract_keywords(backend: &dyn CompletionBackend, utterance: &str) -> String {
    let prompt = build_prompt(utterance);
    let raw = Stage::Keywords.degrade(backend.complete(&prompt).await);
    let keywords = format_keywords(&raw);

    tracing::info!(
        backend = backend.name(),
        keywords = %keywords,
        "Extracted search keywords"
    );
    keywords
}
