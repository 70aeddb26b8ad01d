use serde::{Deserialize, Deserializer};

/// Pull the first JSON value out of a model reply that may be wrapped in
/// prose or Markdown fences.
///
/// Takes the span from the first `{` to the last `}`. When that span does not
/// parse, probes fenced blocks tagged `json`, `JSON`, then untagged. Returns
/// an empty string when nothing valid is found.
pub fn extract_json(reply: &str) -> String {
    let s = reply.trim();
    let (Some(start), Some(end)) = (s.find('{'), s.rfind('}')) else {
        tracing::debug!(preview = %crate::io::truncate_chars(s, 200), "no JSON object in reply");
        return String::new();
    };
    if end <= start {
        return String::new();
    }

    let candidate = &s[start..=end];
    if is_json(candidate) {
        return candidate.to_string();
    }
    tracing::debug!("braced span is not valid JSON, probing fenced blocks");
    from_fences(s).unwrap_or_default()
}

fn from_fences(s: &str) -> Option<String> {
    for fence in ["```json", "```JSON", "```"] {
        let Some(idx) = s.find(fence) else { continue };
        let body_start = idx + fence.len();
        let Some(len) = s[body_start..].find("```") else { continue };
        let body = s[body_start..body_start + len].trim();
        if is_json(body) {
            return Some(body.to_string());
        }
    }
    None
}

fn is_json(s: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(s).is_ok()
}

/// Field deserializer for model replies: an explicit `null` reads as the
/// type's default. Field presence is still governed by `#[serde(default)]`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn braced_span_inside_prose() {
        assert_eq!(extract_json(r#"prefix {"k":"v"} suffix"#), r#"{"k":"v"}"#);
    }

    #[test]
    fn fenced_block() {
        assert_eq!(extract_json("```json\n{\"k\":\"v\"}\n```"), r#"{"k":"v"}"#);
    }

    #[test]
    fn nothing_to_find() {
        assert_eq!(extract_json("no json here"), "");
        assert_eq!(extract_json(r#"{"k":"v""#), "");
        assert_eq!(extract_json("} backwards {"), "");
    }

    #[test]
    fn fence_rescues_noisy_braces() {
        let reply = "Use {placeholders} like this:\n```json\n{\"agents\": [\"tester\"]}\n```\nDone {.}";
        assert_eq!(extract_json(reply), r#"{"agents": ["tester"]}"#);
    }

    #[test]
    fn nested_objects_are_kept_whole() {
        let reply = r#"Here: {"a": {"b": [1, 2]}, "c": "}"}"#;
        assert_eq!(extract_json(reply), r#"{"a": {"b": [1, 2]}, "c": "}"}"#);
    }
}
