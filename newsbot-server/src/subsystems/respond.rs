use newsbot_core::models::{ReplyEnvelope, SimilarityResult};

pub const RESULTS_HEADER: &str = "관련 뉴스를 찾았어요! 🔎";
pub const NO_RESULTS_MESSAGE: &str = "관련된 뉴스를 찾지 못했어요. 다른 키워드로 다시 물어봐 주세요.";
pub const APOLOGY_MESSAGE: &str = "죄송합니다. 뉴스를 검색하는 중에 문제가 발생했어요. 잠시 후 다시 시도해 주세요.";
pub const MALFORMED_REQUEST_MESSAGE: &str = "요청을 이해하지 못했어요. 궁금한 뉴스를 문장으로 말씀해 주세요.";

/// Header line followed by one link per line, or the fallback message when empty.
pub fn format_reply(results: &[SimilarityResult]) -> ReplyEnvelope {
    if results.is_empty() {
        return ReplyEnvelope::simple_text(NO_RESULTS_MESSAGE);
    }

    let links: Vec<&str> = results.iter().map(|r| r.link.as_str()).collect();
    ReplyEnvelope::simple_text(format!("{}\n{}", RESULTS_HEADER, links.join("\n")))
}

pub fn apology_reply() -> ReplyEnvelope {
    ReplyEnvelope::simple_text(APOLOGY_MESSAGE)
}

pub fn malformed_request_reply() -> ReplyEnvelope {
    ReplyEnvelope::simple_text(MALFORMED_REQUEST_MESSAGE)
}
