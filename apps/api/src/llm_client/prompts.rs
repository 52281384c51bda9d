// Cross-cutting prompt fragments shared by every service that calls the LLM.
// Each service defines its own prompts.rs with its task-specific templates.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt for the free-text secondary analyses, which are read by
/// recruiters verbatim.
pub const PLAIN_TEXT_SYSTEM: &str = "You are a concise recruiting analyst. \
    Respond with a short plain-text answer of at most three sentences. \
    Do NOT use markdown, headings, or bullet lists.";
