//! Prompt model, JSON persistence, and filtering.
//!
//! Prompts live in a single JSON document (`{"prompts": [...]}`) under
//! ~/.climpt/. Loading never destroys user data: a corrupt file is logged
//! and left on disk untouched. Saving always rewrites the whole document
//! after validating it; there are no partial writes.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::error::{ClimptError, Result, ResultExt};

/// Pseudo-tag shown for prompts without tags, usable as `#No tags` in search.
pub const NO_TAGS_LABEL: &str = "No tags";

/// A named, tagged block of reusable text the user can copy to the clipboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: u64,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// On-disk document shape: a single top-level `"prompts"` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PromptsDocument {
    prompts: Vec<Prompt>,
}

/// Path of the prompts file (~/.climpt/prompts.json).
pub fn default_prompts_path() -> PathBuf {
    crate::config::climpt_dir().join("prompts.json")
}

fn default_document() -> PromptsDocument {
    PromptsDocument {
        prompts: vec![Prompt {
            id: 1,
            name: "Example Prompt".to_string(),
            content: "This is an example prompt content".to_string(),
            tags: vec!["example".to_string(), "test".to_string()],
        }],
    }
}

/// Load prompts from `path`.
///
/// - Missing file: a default document with a single example prompt is
///   written and returned.
/// - Unreadable or corrupt file: the error is logged and an empty list is
///   returned; the file is left untouched so user data is never destroyed.
pub fn load_prompts(path: &Path) -> Vec<Prompt> {
    if !path.exists() {
        let doc = default_document();
        info!(path = %path.display(), "Prompt file not found, writing defaults");
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).warn_on_err();
        }
        match serde_json::to_string_pretty(&doc) {
            Ok(json) => {
                std::fs::write(path, json).warn_on_err();
            }
            Err(e) => warn!(error = %e, "Failed to serialize default prompts"),
        }
        return doc.prompts;
    }

    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to read prompt file");
            return Vec::new();
        }
    };

    match serde_json::from_str::<PromptsDocument>(&raw) {
        Ok(doc) => {
            debug!(count = doc.prompts.len(), "Loaded prompts");
            doc.prompts
        }
        Err(e) => {
            // Do not overwrite: the user may be able to repair the file by hand.
            error!(path = %path.display(), error = %e, "Prompt file is corrupt, leaving it untouched");
            Vec::new()
        }
    }
}

/// Validate prompts before saving.
///
/// The typed model already guarantees every entry has id/name/content;
/// what remains representable is an empty name or a duplicated id.
pub fn validate_prompts(prompts: &[Prompt]) -> Result<()> {
    let mut seen = HashSet::new();
    for prompt in prompts {
        if prompt.name.trim().is_empty() {
            return Err(ClimptError::StorageValidation(format!(
                "prompt {} has an empty name",
                prompt.id
            )));
        }
        if !seen.insert(prompt.id) {
            return Err(ClimptError::StorageValidation(format!(
                "duplicate prompt id {}",
                prompt.id
            )));
        }
    }
    Ok(())
}

/// Save the full prompt list to `path`, overwriting the previous document.
///
/// Validation failures and I/O errors are reported to the caller; nothing
/// is written in either case.
pub fn save_prompts(path: &Path, prompts: &[Prompt]) -> Result<()> {
    validate_prompts(prompts)?;

    let doc = PromptsDocument {
        prompts: prompts.to_vec(),
    };
    let json = serde_json::to_string_pretty(&doc)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ClimptError::Storage {
            path: path.display().to_string(),
            source: e,
        })?;
    }
    std::fs::write(path, json).map_err(|e| ClimptError::Storage {
        path: path.display().to_string(),
        source: e,
    })?;

    debug!(count = prompts.len(), path = %path.display(), "Saved prompts");
    Ok(())
}

/// Next free prompt id: `max(existing, default 0) + 1`.
pub fn next_prompt_id(prompts: &[Prompt]) -> u64 {
    prompts.iter().map(|p| p.id).max().unwrap_or(0) + 1
}

/// Filter prompts by a search query, returning indices into `prompts` in
/// their original order.
///
/// - Empty query: everything.
/// - `#tag` (more than just `#`): exact, case-sensitive tag membership.
///   The reserved literal `No tags` (case-insensitive) selects untagged
///   prompts.
/// - Anything else (including a lone `#`): case-insensitive substring match
///   against name, content, and tags.
pub fn filter_prompts(prompts: &[Prompt], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..prompts.len()).collect();
    }

    if let Some(tag) = query.strip_prefix('#') {
        if !tag.is_empty() {
            if tag.eq_ignore_ascii_case(NO_TAGS_LABEL) {
                return prompts
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.tags.is_empty())
                    .map(|(i, _)| i)
                    .collect();
            }
            return prompts
                .iter()
                .enumerate()
                .filter(|(_, p)| p.tags.iter().any(|t| t == tag))
                .map(|(i, _)| i)
                .collect();
        }
        // A lone '#' is too short for tag mode; fall through to substring.
    }

    let needle = query.to_lowercase();
    prompts
        .iter()
        .enumerate()
        .filter(|(_, p)| {
            p.name.to_lowercase().contains(&needle)
                || p.content.to_lowercase().contains(&needle)
                || p.tags.iter().any(|t| t.to_lowercase().contains(&needle))
        })
        .map(|(i, _)| i)
        .collect()
}

/// Tag usage counts for the tag panel: real tags sorted by count descending
/// (name ascending on ties), with the `No tags` pseudo-entry last when any
/// prompt is untagged.
pub fn tag_counts(prompts: &[Prompt]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut untagged = 0usize;
    for prompt in prompts {
        if prompt.tags.is_empty() {
            untagged += 1;
        } else {
            for tag in &prompt.tags {
                *counts.entry(tag.as_str()).or_insert(0) += 1;
            }
        }
    }

    let mut result: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(tag, count)| (tag.to_string(), count))
        .collect();
    result.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    if untagged > 0 {
        result.push((NO_TAGS_LABEL.to_string(), untagged));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(id: u64, name: &str, content: &str, tags: &[&str]) -> Prompt {
        Prompt {
            id,
            name: name.to_string(),
            content: content.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn sample() -> Vec<Prompt> {
        vec![
            prompt(1, "Greet", "Hello there", &["chat"]),
            prompt(2, "Review", "Please review this diff", &["code", "work"]),
            prompt(3, "Untagged", "No tags here", &[]),
        ]
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompts.json");
        let prompts = sample();

        save_prompts(&path, &prompts).unwrap();
        let loaded = load_prompts(&path);

        assert_eq!(loaded, prompts);
    }

    #[test]
    fn load_missing_file_writes_default_example() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompts.json");

        let loaded = load_prompts(&path);

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, 1);
        assert_eq!(loaded[0].name, "Example Prompt");
        assert!(path.exists(), "default document should be written to disk");

        // A second load reads the same document back.
        assert_eq!(load_prompts(&path), loaded);
    }

    #[test]
    fn load_corrupt_file_returns_empty_without_overwriting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompts.json");
        std::fs::write(&path, "{not json at all").unwrap();

        let loaded = load_prompts(&path);

        assert!(loaded.is_empty());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{not json at all",
            "corrupt file must not be overwritten"
        );
    }

    #[test]
    fn load_tolerates_missing_tags_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompts.json");
        std::fs::write(
            &path,
            r#"{"prompts": [{"id": 7, "name": "Bare", "content": "text"}]}"#,
        )
        .unwrap();

        let loaded = load_prompts(&path);
        assert_eq!(loaded.len(), 1);
        assert!(loaded[0].tags.is_empty());
    }

    #[test]
    fn save_rejects_empty_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompts.json");
        let prompts = vec![prompt(1, "   ", "content", &[])];

        assert!(save_prompts(&path, &prompts).is_err());
        assert!(!path.exists(), "nothing should be written on validation failure");
    }

    #[test]
    fn save_rejects_duplicate_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompts.json");
        let prompts = vec![prompt(1, "A", "a", &[]), prompt(1, "B", "b", &[])];

        let err = save_prompts(&path, &prompts).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn saved_document_has_prompts_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompts.json");
        save_prompts(&path, &sample()).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.get("prompts").unwrap().is_array());
    }

    // ------------------------------------------------------------------
    // Id assignment
    // ------------------------------------------------------------------

    #[test]
    fn next_id_is_max_plus_one() {
        assert_eq!(next_prompt_id(&sample()), 4);
    }

    #[test]
    fn next_id_handles_non_contiguous_ids() {
        let prompts = vec![prompt(1, "A", "a", &[]), prompt(3, "B", "b", &[])];
        assert_eq!(next_prompt_id(&prompts), 4);
    }

    #[test]
    fn next_id_for_empty_list_is_one() {
        assert_eq!(next_prompt_id(&[]), 1);
    }

    // ------------------------------------------------------------------
    // Filtering
    // ------------------------------------------------------------------

    #[test]
    fn empty_query_returns_all_in_order() {
        let prompts = sample();
        assert_eq!(filter_prompts(&prompts, ""), vec![0, 1, 2]);
    }

    #[test]
    fn substring_matches_content_case_insensitively() {
        let prompts = sample();
        assert_eq!(filter_prompts(&prompts, "hello"), vec![0]);
        assert_eq!(filter_prompts(&prompts, "HELLO"), vec![0]);
    }

    #[test]
    fn substring_matches_name_and_tags() {
        let prompts = sample();
        assert_eq!(filter_prompts(&prompts, "greet"), vec![0]);
        assert_eq!(filter_prompts(&prompts, "work"), vec![1]);
    }

    #[test]
    fn tag_query_matches_membership_exactly() {
        let prompts = sample();
        assert_eq!(filter_prompts(&prompts, "#chat"), vec![0]);
        assert_eq!(filter_prompts(&prompts, "#code"), vec![1]);
    }

    #[test]
    fn tag_query_is_case_sensitive() {
        let prompts = sample();
        assert!(filter_prompts(&prompts, "#Chat").is_empty());
    }

    #[test]
    fn tag_query_requires_full_tag() {
        let prompts = sample();
        assert!(filter_prompts(&prompts, "#cha").is_empty());
    }

    #[test]
    fn no_tags_query_selects_untagged() {
        let prompts = sample();
        assert_eq!(filter_prompts(&prompts, "#No tags"), vec![2]);
        // The reserved literal is recognized regardless of case.
        assert_eq!(filter_prompts(&prompts, "#no tags"), vec![2]);
    }

    #[test]
    fn lone_hash_falls_through_to_substring_mode() {
        let mut prompts = sample();
        prompts.push(prompt(4, "C# notes", "generics", &[]));
        assert_eq!(filter_prompts(&prompts, "#"), vec![3]);
    }

    #[test]
    fn filtering_preserves_input_order() {
        let prompts = vec![
            prompt(5, "b hello", "", &[]),
            prompt(2, "a hello", "", &[]),
            prompt(9, "c hello", "", &[]),
        ];
        assert_eq!(filter_prompts(&prompts, "hello"), vec![0, 1, 2]);
    }

    // ------------------------------------------------------------------
    // Tag counts
    // ------------------------------------------------------------------

    #[test]
    fn tag_counts_sorted_by_count_then_name() {
        let prompts = vec![
            prompt(1, "A", "", &["rust", "chat"]),
            prompt(2, "B", "", &["rust"]),
            prompt(3, "C", "", &["chat", "rust"]),
        ];
        let counts = tag_counts(&prompts);
        assert_eq!(
            counts,
            vec![("rust".to_string(), 3), ("chat".to_string(), 2)]
        );
    }

    #[test]
    fn tag_counts_appends_no_tags_last() {
        let counts = tag_counts(&sample());
        assert_eq!(counts.last().unwrap(), &(NO_TAGS_LABEL.to_string(), 1));
        // Real tags come first, each with count 1, sorted by name.
        assert_eq!(counts[0].0, "chat");
    }

    #[test]
    fn tag_counts_empty_for_no_prompts() {
        assert!(tag_counts(&[]).is_empty());
    }
}
