use super::*;
use tempfile::tempdir;

#[test]
fn test_default_config_is_valid() {
    let config = BinomenConfig::default();
    assert!(config.validate().is_ok());

    assert_eq!(config.grammar.profile, GrammarProfile::Permissive);
    assert_eq!(config.constraint.delimiter, "Name:");
    assert!(!config.constraint.require_suffix);
    assert_eq!(config.evaluation.family_policy, FamilyPolicy::CountAsFailure);
    assert!(config.evaluation.parallel);
    assert!(config.reference.taxonomy_path.is_none());
}

#[test]
fn test_default_suffix_lists() {
    let config = BinomenConfig::default();
    assert!(config.grammar.epithet_suffixes.contains(&"ensis".to_string()));
    assert!(config.grammar.epithet_suffixes.contains(&"i".to_string()));
    assert!(config.grammar.genus_suffixes.contains(&"ops".to_string()));
    assert_eq!(
        config.constraint.epithet_suffixes,
        vec!["us", "a", "um", "is", "ensis", "ii"]
    );
}

#[test]
fn test_rejects_uppercase_suffix() {
    let mut config = BinomenConfig::default();
    config.grammar.epithet_suffixes.push("US".to_string());

    let err = config.validate().unwrap_err();
    if let BinomenError::Config { field, .. } = err {
        assert_eq!(field.as_deref(), Some("grammar.epithet_suffixes"));
    } else {
        panic!("Expected Config error");
    }
}

#[test]
fn test_strict_profile_needs_suffixes() {
    let mut config = BinomenConfig::default();
    config.grammar.profile = GrammarProfile::Strict;
    config.grammar.epithet_suffixes.clear();
    assert!(config.grammar.validate().is_err());

    let mut config = BinomenConfig::default();
    config.grammar.profile = GrammarProfile::Strict;
    config.grammar.strict_genus = true;
    config.grammar.genus_suffixes.clear();
    assert!(config.grammar.validate().is_err());
}

#[test]
fn test_rejects_alphanumeric_markup() {
    let mut config = BinomenConfig::default();
    config.grammar.markup_chars.push('a');
    assert!(config.validate().is_err());
}

#[test]
fn test_rejects_blank_delimiter() {
    let mut config = BinomenConfig::default();
    config.constraint.delimiter = "   ".to_string();

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("delimiter"));
}

#[test]
fn test_description_limits() {
    let mut config = BinomenConfig::default();
    config.description.retries = 0;
    assert!(config.validate().is_err());

    let mut config = BinomenConfig::default();
    config.description.save_every = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_family_policy_serde_names() {
    let yaml = serde_yaml::to_string(&FamilyPolicy::ExcludeUnknown).unwrap();
    assert_eq!(yaml.trim(), "exclude_unknown");

    let profile: GrammarProfile = serde_yaml::from_str("strict").unwrap();
    assert_eq!(profile, GrammarProfile::Strict);
}

#[test]
fn test_partial_yaml_fills_defaults() {
    let yaml = r#"
evaluation:
  family_policy: exclude_unknown
  parallel: false
"#;
    let config: BinomenConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.evaluation.family_policy, FamilyPolicy::ExcludeUnknown);
    assert!(!config.evaluation.parallel);
    assert_eq!(config.constraint.delimiter, "Name:");
    assert_eq!(config.grammar.profile, GrammarProfile::Permissive);
}

#[test]
fn test_yaml_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("binomen.yml");

    let mut config = BinomenConfig::default();
    config.grammar.profile = GrammarProfile::Strict;
    config.constraint.delimiter = "Binomial:".to_string();
    config.to_yaml_file(&path).unwrap();

    let loaded = BinomenConfig::from_yaml_file(&path).unwrap();
    assert_eq!(loaded.grammar.profile, GrammarProfile::Strict);
    assert_eq!(loaded.constraint.delimiter, "Binomial:");
    assert_eq!(
        loaded.description.family_nouns.get("Felidae").map(String::as_str),
        Some("cat")
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = BinomenConfig::from_yaml_file(dir.path().join("absent.yml")).unwrap_err();
    assert!(matches!(err, BinomenError::Io { .. }));
}
