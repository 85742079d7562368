//! Workspace record and collaborative project naming.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{UserId, WorkspaceId};
use super::style::WorkspaceStyle;

/// Maximum length (in chars) of a collaborative project name.
pub const MAX_PROJECT_NAME_LEN: usize = 30;

const MIN_SLUG_LEN: usize = 5;

/// Slug used when a title has no letters or digits left after transliteration.
const FALLBACK_SLUG: &str = "workspace";

/// Binding to the collaborative-document project backing a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBinding {
    pub project_id: String,
    pub public_key: String,
    pub secret_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: WorkspaceId,
    pub title: String,
    pub style: WorkspaceStyle,
    pub user_id: UserId,
    pub project: Option<ProjectBinding>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update applied through the owner filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspacePatch {
    pub title: Option<String>,
    pub style: Option<WorkspaceStyle>,
}

impl WorkspacePatch {
    pub fn style(style: WorkspaceStyle) -> Self {
        Self {
            title: None,
            style: Some(style),
        }
    }
}

impl Workspace {
    /// Apply `patch`; returns whether any field actually changed.
    pub fn apply(&mut self, patch: &WorkspacePatch, now: DateTime<Utc>) -> bool {
        let mut changed = false;
        if let Some(title) = &patch.title
            && *title != self.title
        {
            self.title = title.clone();
            changed = true;
        }
        if let Some(style) = patch.style
            && style != self.style
        {
            self.style = style;
            changed = true;
        }
        self.updated_at = now;
        changed
    }
}

/// Project name for a workspace: `<user prefix>-<title slug>`, at most 30 chars.
///
/// The user part keeps at most half of the budget; the slug gets the rest
/// (never less than 5 chars).
pub fn project_name(user_id: &UserId, title: &str) -> String {
    let user_part: String = user_id
        .as_str()
        .chars()
        .take(MAX_PROJECT_NAME_LEN / 2)
        .collect();
    let slug_budget = MAX_PROJECT_NAME_LEN
        .saturating_sub(user_part.chars().count() + 1)
        .max(MIN_SLUG_LEN);

    let mut slug = slugify(title, slug_budget);
    if slug.is_empty() {
        slug = FALLBACK_SLUG.chars().take(slug_budget).collect();
    }
    format!("{user_part}-{slug}")
}

/// Lowercase, transliterate to ASCII, replace runs outside `[a-z0-9-]` with one `-`,
/// trim `-`, cut to `max_len`.
pub fn slugify(raw: &str, max_len: usize) -> String {
    let ascii = deunicode::deunicode(&raw.to_lowercase()).to_lowercase();
    let mut slug = String::with_capacity(ascii.len());
    for ch in ascii.chars() {
        let mapped = if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            ch
        } else {
            '-'
        };
        if mapped == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(mapped);
    }

    let trimmed = slug.trim_matches('-');
    let cut: String = trimmed.chars().take(max_len).collect();
    cut.trim_end_matches('-').to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn user(raw: &str) -> UserId {
        UserId::parse(raw).unwrap()
    }

    #[rstest]
    #[case::punctuation("Hello World!", 30, "hello-world")]
    #[case::symbols("Special & Characters ** Test", 30, "special-characters-test")]
    #[case::hyphen_runs("a -- b", 30, "a-b")]
    #[case::cut_then_trim("hello world", 6, "hello")]
    #[case::latin_accents("Café Ñandú", 30, "cafe-nandu")]
    #[case::only_symbols("*** ---", 30, "")]
    fn slugify_cases(#[case] raw: &str, #[case] max_len: usize, #[case] expected: &str) {
        assert_eq!(slugify(raw, max_len), expected);
    }

    #[rstest]
    #[case("google-sub-12345", "안녕하세요 월드")]
    #[case("u1", "Hello World!")]
    #[case("user12345678901234567888080808080808090", "테스트 프로젝트 이름이 길어요")]
    #[case("abc", "Special & Characters ** Test")]
    fn project_name_fits_budget(#[case] user_id: &str, #[case] title: &str) {
        let name = project_name(&user(user_id), title);
        assert!(name.chars().count() <= MAX_PROJECT_NAME_LEN, "{name}");
        assert!(!name.ends_with('-'), "{name}");
    }

    #[test]
    fn project_name_combines_user_and_slug() {
        assert_eq!(project_name(&user("u1"), "Hello World!"), "u1-hello-world");
    }

    #[test]
    fn project_name_truncates_long_user_ids() {
        let name = project_name(&user("user12345678901234567888080808080808090"), "Notes");
        assert_eq!(name, "user12345678901-notes");
    }

    #[test]
    fn project_name_falls_back_when_slug_is_empty() {
        assert_eq!(project_name(&user("u1"), "*** ---"), "u1-workspace");
    }

    #[test]
    fn slugify_romanizes_hangul() {
        let slug = slugify("안녕하세요", 30);
        assert_eq!(slug.replace('-', ""), "annyeonghaseyo");
    }

    #[test]
    fn project_name_keeps_non_ascii_titles_apart() {
        let reading = project_name(&user("u1"), "독서 노트");
        let planning = project_name(&user("u1"), "프로젝트 계획");
        assert_ne!(reading, planning);
        for name in [&reading, &planning] {
            assert!(name.is_ascii(), "{name}");
            assert_ne!(name, "u1-workspace");
        }
    }

    #[test]
    fn apply_reports_changes() {
        let now = Utc::now();
        let mut ws = Workspace {
            id: WorkspaceId::parse("ws").unwrap(),
            title: "Notes".into(),
            style: WorkspaceStyle::Generic,
            user_id: user("u1"),
            project: None,
            created_at: now,
            updated_at: now,
        };
        assert!(!ws.apply(&WorkspacePatch::style(WorkspaceStyle::Generic), now));
        assert!(ws.apply(&WorkspacePatch::style(WorkspaceStyle::Zettel), now));
        assert_eq!(ws.style, WorkspaceStyle::Zettel);
    }
}
