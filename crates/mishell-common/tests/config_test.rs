use mishell_common::config::MishellConfig;

#[test]
fn test_parse_full_config() {
    let toml_str = r#"
[prompt]
template = "mishell> "

[completion]
search_cwd = false

[history]
max_entries = 50
"#;
    let config: MishellConfig = toml::from_str(toml_str).unwrap();
    assert_eq!(config.prompt.template, "mishell> ");
    assert!(!config.completion.search_cwd);
    assert_eq!(config.history.max_entries, 50);
}

#[test]
fn test_empty_config_uses_defaults() {
    let config: MishellConfig = toml::from_str("").unwrap();
    assert_eq!(config.prompt.template, "$ ");
    assert!(config.completion.search_cwd);
    assert_eq!(config.history.max_entries, 1000);
}

#[test]
fn test_partial_config_fills_remaining_defaults() {
    let toml_str = r#"
[prompt]
template = "> "
"#;
    let config: MishellConfig = toml::from_str(toml_str).unwrap();
    assert_eq!(config.prompt.template, "> ");
    assert!(config.completion.search_cwd);
}
