use dossier_config::DossierConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &DossierConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &DossierConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.completion.is_configured() && has_env_prefix(&env_keys, "DOSSIER_COMPLETION") {
        warnings.push(
            "Completion config appears default while DOSSIER_COMPLETION* env vars exist. Use double underscores (example: DOSSIER_COMPLETION__API_KEY)."
                .to_string(),
        );
    }

    if !config.prompts.has_directory() && has_env_prefix(&env_keys, "DOSSIER_PROMPTS") {
        warnings.push(
            "Prompt directory is unset while DOSSIER_PROMPTS* env vars exist. Use double underscores (example: DOSSIER_PROMPTS__DIRECTORY)."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use dossier_config::{CompletionConfig, DossierConfig, PromptsConfig};

    use super::collect_unconfigured_warnings;

    #[test]
    fn warns_for_single_underscore_keys() {
        let config = DossierConfig::default();
        let warnings = collect_unconfigured_warnings(
            &config,
            vec![
                ("DOSSIER_COMPLETION_API_KEY".to_string(), "sk-test".to_string()),
                ("DOSSIER_PROMPTS_DIRECTORY".to_string(), "prompts".to_string()),
            ],
        );

        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn does_not_warn_when_sections_are_configured() {
        let config = DossierConfig {
            completion: CompletionConfig {
                api_key: "sk-test".to_string(),
                model: "gpt-4o-mini".to_string(),
                ..Default::default()
            },
            prompts: PromptsConfig {
                directory: "prompts".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let warnings = collect_unconfigured_warnings(
            &config,
            vec![
                ("DOSSIER_COMPLETION__API_KEY".to_string(), "sk-test".to_string()),
                ("DOSSIER_PROMPTS__DIRECTORY".to_string(), "prompts".to_string()),
            ],
        );

        assert!(warnings.is_empty());
    }
}
