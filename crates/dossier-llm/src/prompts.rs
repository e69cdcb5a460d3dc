//! Prompt configuration: lookup by slug with built-in fallbacks.
//!
//! Prompt wording and model choice are configuration data. The pipeline asks
//! a [`PromptSource`] for a slug and renders `{{name}}` placeholders; it never
//! embeds wording itself.
//!
//! Sources:
//! - [`BuiltinPrompts`] - default wording for every slug the pipeline uses.
//! - [`TomlPromptDirectory`] - operator overrides, one `<slug>.toml` file each.
//! - [`CachedPromptSource`] - TTL cache over another source, falling back to
//!   the built-ins when the inner source has no entry or fails.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;

/// Slugs looked up by the pipeline.
pub mod slugs {
    pub const EXTRACTION: &str = "extraction";
    pub const BACKGROUND: &str = "background";
    pub const STRENGTH_EVALUATION: &str = "strength_evaluation";
    pub const GAP_ANALYSIS: &str = "gap_analysis";
    pub const CASE_STRATEGY: &str = "case_strategy";
    pub const CONSOLIDATION: &str = "consolidation";
    pub const RISK_FINDINGS: &str = "risk_findings";
    pub const PROBABILITY_DRAFT: &str = "probability_draft";
    pub const RELEVANCE_HINT: &str = "relevance_hint";
    pub const CRITERION_REEVALUATION: &str = "criterion_reevaluation";
    pub const DOCUMENT_VERIFICATION: &str = "document_verification";
    pub const AGENT_TURN: &str = "agent_turn";

    pub const ALL: [&str; 12] = [
        EXTRACTION,
        BACKGROUND,
        STRENGTH_EVALUATION,
        GAP_ANALYSIS,
        CASE_STRATEGY,
        CONSOLIDATION,
        RISK_FINDINGS,
        PROBABILITY_DRAFT,
        RELEVANCE_HINT,
        CRITERION_REEVALUATION,
        DOCUMENT_VERIFICATION,
        AGENT_TURN,
    ];
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// A prompt with `{{name}}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub system: String,
    pub user: String,
    #[serde(default)]
    pub model: Option<String>,
}

/// A template with every known placeholder substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub system: String,
    pub user: String,
    pub model: Option<String>,
}

impl PromptTemplate {
    fn new(system: &str, user: &str) -> Self {
        Self {
            system: system.to_string(),
            user: user.to_string(),
            model: None,
        }
    }

    /// Substitute `{{name}}` for each `(name, value)` pair in both the system
    /// and user text. Unknown placeholders are left as written.
    #[must_use]
    pub fn render(&self, vars: &[(&str, &str)]) -> RenderedPrompt {
        RenderedPrompt {
            system: substitute(&self.system, vars),
            user: substitute(&self.user, vars),
            model: self.model.clone(),
        }
    }
}

/// Single left-to-right pass over the template. Substituted values are
/// emitted verbatim and never rescanned for placeholders.
fn substitute(text: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match vars.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Lookup of prompt templates by slug.
#[async_trait]
pub trait PromptSource: Send + Sync {
    /// `Ok(None)` when this source has no entry for `slug`.
    async fn prompt(&self, slug: &str) -> Result<Option<PromptTemplate>, LlmError>;
}

/// Default wording shipped with the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinPrompts;

impl BuiltinPrompts {
    #[must_use]
    pub fn get(slug: &str) -> Option<PromptTemplate> {
        let template = match slug {
            slugs::EXTRACTION => PromptTemplate::new(
                "You extract evidence for one evaluation criterion of an extraordinary-ability \
                 petition. Only record items that the case text states; never infer awards, \
                 publications, or roles that are not written down. Tag each item with every \
                 criterion it supports. Rate strength as None, Weak, or Strong.",
                "Criterion {{criterion_code}}: {{criterion_label}}\n\n\
                 Survey answers:\n{{survey}}\n\nCase text:\n{{case_text}}",
            ),
            slugs::BACKGROUND => PromptTemplate::new(
                "You extract the applicant's personal details, education, and work history \
                 exactly as stated. Leave fields empty when the text does not say.",
                "Case text:\n{{case_text}}",
            ),
            slugs::STRENGTH_EVALUATION => PromptTemplate::new(
                "You evaluate how strongly the extracted evidence satisfies each of the ten \
                 criteria. Score each criterion from 1 to 10 and cite the key evidence.",
                "{{context}}",
            ),
            slugs::GAP_ANALYSIS => PromptTemplate::new(
                "You identify evidence gaps per criterion given a strength evaluation. \
                 Recommend concrete documents that would close each gap.",
                "{{context}}",
            ),
            slugs::CASE_STRATEGY => PromptTemplate::new(
                "You plan a filing strategy: which criteria to target and the prioritized \
                 actions that strengthen them.",
                "{{context}}",
            ),
            slugs::CONSOLIDATION => PromptTemplate::new(
                "You consolidate the strength evaluation, gap analysis, and strategy into an \
                 executive summary and action plan.",
                "{{context}}",
            ),
            slugs::RISK_FINDINGS => PromptTemplate::new(
                "You assess petition risk qualitatively. Classify each criterion's risk, list \
                 red flags and strengths, and assess the recommendation letters. Give no \
                 numeric probabilities. Any missing documents, recommenders, or extraction \
                 in the inventory is a critical red flag. Do not claim strengths the \
                 inventory does not support.",
                "Evidence inventory:\n{{inventory}}\n\n{{context}}",
            ),
            slugs::PROBABILITY_DRAFT => PromptTemplate::new(
                "You translate qualitative risk findings into a denial probability. Give a \
                 base rate and named adjustments in whole percentage points. Do not compute \
                 the total.",
                "Evidence inventory:\n{{inventory}}\n\nFindings:\n{{findings}}",
            ),
            slugs::RELEVANCE_HINT => PromptTemplate::new(
                "You decide which of the ten criteria a newly added document could affect. \
                 Return only criteria the document plausibly bears on.",
                "Current analysis:\n{{analysis}}\n\nNew document:\n{{document_text}}",
            ),
            slugs::CRITERION_REEVALUATION => PromptTemplate::new(
                "You re-evaluate one criterion in light of a new document. Propose a \
                 strength, a reason, and short verbatim evidence excerpts.",
                "Criterion {{criterion_code}}: {{criterion_label}}\n\n\
                 Current assessment:\n{{current}}\n\nNew document:\n{{document_text}}",
            ),
            slugs::DOCUMENT_VERIFICATION => PromptTemplate::new(
                "You verify whether an uploaded document supports one criterion. Rate the \
                 support as None, Weak, or Strong and quote the supporting passages.",
                "Criterion {{criterion_code}}: {{criterion_label}}\n\n\
                 Document {{document_name}}:\n{{document_text}}",
            ),
            slugs::AGENT_TURN => PromptTemplate::new(
                "You are a case assistant. Reply with a message and, when needed, actions: \
                 update_profile, update_analysis, or create_document. Return no actions \
                 once the request is complete.",
                "Profile:\n{{profile}}\n\nCurrent analysis:\n{{analysis}}\n\n\
                 Conversation:\n{{transcript}}",
            ),
            _ => return None,
        };
        Some(template)
    }
}

#[async_trait]
impl PromptSource for BuiltinPrompts {
    async fn prompt(&self, slug: &str) -> Result<Option<PromptTemplate>, LlmError> {
        Ok(Self::get(slug))
    }
}

/// Operator overrides read from `<directory>/<slug>.toml`.
///
/// ```toml
/// system = "..."
/// user = "Case text:\n{{case_text}}"
/// model = "gpt-4.1"   # optional
/// ```
#[derive(Debug, Clone)]
pub struct TomlPromptDirectory {
    directory: PathBuf,
}

impl TomlPromptDirectory {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

#[async_trait]
impl PromptSource for TomlPromptDirectory {
    async fn prompt(&self, slug: &str) -> Result<Option<PromptTemplate>, LlmError> {
        if slug.is_empty()
            || !slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(LlmError::Prompt(format!("invalid prompt slug '{slug}'")));
        }
        let path = self.directory.join(format!("{slug}.toml"));
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(LlmError::Prompt(format!("{}: {e}", path.display())));
            }
        };
        toml::from_str(&text)
            .map(Some)
            .map_err(|e| LlmError::Prompt(format!("{}: {e}", path.display())))
    }
}

/// TTL cache over an inner source, with built-in fallback.
///
/// Entries are keyed by slug. A lookup that misses (or fails) in the inner
/// source resolves to the built-in template, and that resolution is cached
/// too.
pub struct CachedPromptSource<S> {
    inner: S,
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, PromptTemplate)>>,
}

impl<S: PromptSource> CachedPromptSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Drop one cached slug, or every entry when `slug` is `None`.
    pub fn invalidate(&self, slug: Option<&str>) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match slug {
            Some(slug) => {
                entries.remove(slug);
            }
            None => entries.clear(),
        }
    }

    fn fresh(&self, slug: &str) -> Option<PromptTemplate> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(slug)
            .filter(|(stored, _)| stored.elapsed() < self.ttl)
            .map(|(_, template)| template.clone())
    }

    fn store(&self, slug: &str, template: &PromptTemplate) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(slug.to_string(), (Instant::now(), template.clone()));
    }
}

#[async_trait]
impl<S: PromptSource> PromptSource for CachedPromptSource<S> {
    async fn prompt(&self, slug: &str) -> Result<Option<PromptTemplate>, LlmError> {
        if let Some(template) = self.fresh(slug) {
            return Ok(Some(template));
        }
        let resolved = match self.inner.prompt(slug).await {
            Ok(Some(template)) => Some(template),
            Ok(None) => BuiltinPrompts::get(slug),
            Err(e) => {
                tracing::warn!(slug, %e, "prompt lookup failed, using built-in");
                BuiltinPrompts::get(slug)
            }
        };
        if let Some(template) = &resolved {
            self.store(slug, template);
        }
        Ok(resolved)
    }
}
