use figment::Jail;
use heat_config::HeatConfig;
use heat_core::enums::SeedingCriteria;

#[test]
fn env_overrides_nested_values() {
    Jail::expect_with(|jail| {
        jail.set_env("HEATS_DATABASE__PATH", ":memory:");
        jail.set_env("HEATS_SEEDING__DEFAULT_MAX_LANES", "9");
        jail.set_env("HEATS_SEEDING__DEFAULT_CRITERIA", "season_best");

        let config = HeatConfig::load().expect("config loads");
        assert!(config.database.is_in_memory());
        assert_eq!(config.seeding.default_max_lanes, 9);
        assert_eq!(config.seeding.default_criteria, SeedingCriteria::SeasonBest);
        Ok(())
    });
}

#[test]
fn env_beats_project_toml() {
    Jail::expect_with(|jail| {
        jail.create_dir(".heats")?;
        jail.create_file(
            ".heats/config.toml",
            r#"
[general]
default_format = "raw"
"#,
        )?;
        jail.set_env("HEATS_GENERAL__DEFAULT_FORMAT", "json");

        let config = HeatConfig::load().expect("config loads");
        assert_eq!(config.general.default_format, "json");
        Ok(())
    });
}

#[test]
fn dotenv_file_feeds_env_layer() {
    Jail::expect_with(|jail| {
        jail.create_file(".env", "HEATS_SEEDING__DEFAULT_MAX_LANES_INDOOR=5\n")?;

        let config = HeatConfig::load_with_dotenv().expect("config loads");
        assert_eq!(config.seeding.default_max_lanes_indoor, 5);
        Ok(())
    });
}
