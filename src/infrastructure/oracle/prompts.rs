//! Prompt construction for the decision and relevance calls.
//!
//! Both prompts demand strict JSON so the response parses straight into the
//! domain types; anything else is a typed oracle error upstream.

use crate::domain::models::{Candidate, SearchRequest};

/// Verification only ever sees the head of the converted text.
pub const RELEVANCE_CONTENT_LIMIT: usize = 2000;

/// Prompt for one navigation decision over the current candidate listing.
pub fn decision_prompt(
    request: &SearchRequest,
    current_path: &str,
    candidates: &[Candidate],
    attempt: u32,
    depth: u32,
) -> String {
    let items = candidates
        .iter()
        .map(|c| {
            serde_json::json!({
                "id": c.id,
                "name": c.name,
                "type": c.kind,
                "content_type": c.content_type,
                "parent_path": c.parent_path,
            })
        })
        .collect::<Vec<_>>();

    format!(
        r#"You are a file navigation agent exploring a drive folder tree.

User query:
"{query}"

Drive description:
"{description}"

Current path:
"{path}"

Items in this folder:
{items}

Attempt: {attempt}
Depth: {depth}

Your task:
- Decide which ONE item is most relevant to explore next
- Choose a folder if it narrows the search
- Choose a file if it likely satisfies the query
- Stop if nothing here is relevant

Return STRICT JSON:
{{
  "action": "<enter_folder|select_file|stop>",
  "id": "<item id>",
  "name": "<item name>",
  "reason": "<why>"
}}"#,
        query = request.query,
        description = request.drive_description.as_deref().unwrap_or("(none)"),
        path = if current_path.is_empty() {
            "/"
        } else {
            current_path
        },
        items = serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string()),
        attempt = attempt,
        depth = depth,
    )
}

/// Prompt for judging a selected file's content against the query.
pub fn relevance_prompt(request: &SearchRequest, file_name: &str, text: &str) -> String {
    let head: String = text.chars().take(RELEVANCE_CONTENT_LIMIT).collect();
    format!(
        r#"You are evaluating whether a file satisfies a search query.

User query: "{query}"
File name: "{file_name}"

Content:
{head}

Return STRICT JSON:
{{
  "score": 0.0 | 0.5 | 1.0,
  "reason": "...",
  "is_match": true | false
}}"#,
        query = request.query,
        file_name = file_name,
        head = head,
    )
}
