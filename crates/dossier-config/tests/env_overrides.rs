use figment::Jail;
use dossier_config::DossierConfig;

#[test]
fn env_vars_override_defaults() {
    Jail::expect_with(|jail| {
        jail.set_env("DOSSIER_COMPLETION__API_KEY", "sk-from-env");
        jail.set_env("DOSSIER_COMPLETION__MODEL", "gpt-4o");
        jail.set_env("DOSSIER_DATABASE__PATH", ":memory:");

        let config = DossierConfig::load().expect("config loads");
        assert_eq!(config.completion.api_key, "sk-from-env");
        assert!(config.completion.is_configured());
        assert!(config.database.is_in_memory());
        Ok(())
    });
}

#[test]
fn env_beats_project_toml() {
    Jail::expect_with(|jail| {
        jail.create_dir(".dossier")?;
        jail.create_file(
            ".dossier/config.toml",
            "[general]\ndefault_limit = 50\n",
        )?;
        jail.set_env("DOSSIER_GENERAL__DEFAULT_LIMIT", "5");

        let config = DossierConfig::load().expect("config loads");
        assert_eq!(config.general.default_limit, 5);
        Ok(())
    });
}
