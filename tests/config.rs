// ABOUTME: Integration tests for configuration parsing and sources.
// ABOUTME: Tests YAML parsing, action inputs, env interpolation, and overrides.

use registry_prune::config::*;
use registry_prune::error::Error;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let yaml = r#"
repository: team/app
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.repository.as_str(), "team/app");
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.max_attempts, 3);
        assert!(config.credentials.is_none());
        assert!(config.timeout.is_none());
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
repository: team/app
region: us-west-2
credentials:
  access_key_id:
    env: AWS_ACCESS_KEY_ID
  secret_access_key:
    env: AWS_SECRET_ACCESS_KEY
timeout: 30s
max_attempts: 5
summary_file: /tmp/summary.md
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.region, "us-west-2");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.summary_file, Some(PathBuf::from("/tmp/summary.md")));
        assert_eq!(
            config.credentials.unwrap().access_key_id,
            EnvValue::FromEnv {
                var: "AWS_ACCESS_KEY_ID".to_string(),
                default: None
            }
        );
    }

    #[test]
    fn missing_repository_returns_error() {
        let err = Config::from_yaml("region: us-east-1\n").unwrap_err();
        assert!(err.to_string().contains("repository"));
    }

    #[test]
    fn invalid_repository_returns_error() {
        let err = Config::from_yaml("repository: \"Team App\"\n").unwrap_err();
        assert!(err.to_string().contains("repository name"));
    }
}

mod discovery {
    use super::*;

    #[test]
    fn finds_config_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "repository: team/app\n").unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.repository.as_str(), "team/app");
    }

    #[test]
    fn finds_config_in_dot_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".registry-prune")).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME_DIR), "repository: other\n").unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.repository.as_str(), "other");
    }

    #[test]
    fn reports_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::discover(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
    }
}

mod action_inputs {
    use super::*;

    fn inputs(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn reads_all_inputs() {
        let config = Config::from_inputs(inputs(&[
            (INPUT_REPOSITORY, "team/app"),
            (INPUT_REGION, "us-east-1"),
            (INPUT_ACCESS_KEY_ID, "AKIDEXAMPLE"),
            (INPUT_SECRET_ACCESS_KEY, "secret"),
        ]))
        .unwrap();

        assert_eq!(config.repository.as_str(), "team/app");
        let settings = config.registry_settings().unwrap();
        let creds = settings.credentials.unwrap();
        assert_eq!(creds.access_key_id, "AKIDEXAMPLE");
        assert_eq!(creds.secret_access_key, "secret");
    }

    #[test]
    fn blank_inputs_are_unset() {
        let config = Config::from_inputs(inputs(&[
            (INPUT_REPOSITORY, "team/app"),
            (INPUT_REGION, "  "),
            (INPUT_ACCESS_KEY_ID, ""),
            (INPUT_SECRET_ACCESS_KEY, ""),
        ]))
        .unwrap();

        assert_eq!(config.region, "us-east-1");
        assert!(config.credentials.is_none());
    }

    #[test]
    fn missing_repository_is_reported() {
        let err = Config::from_inputs(inputs(&[])).unwrap_err();
        assert!(matches!(err, Error::MissingInput(ref name) if name == INPUT_REPOSITORY));
    }

    #[test]
    fn half_credentials_are_rejected() {
        let err = Config::from_inputs(inputs(&[
            (INPUT_REPOSITORY, "team/app"),
            (INPUT_ACCESS_KEY_ID, "AKIDEXAMPLE"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn input_variable_names_follow_runner_convention() {
        assert_eq!(action_input_var("repository-name"), "INPUT_REPOSITORY-NAME");
        assert_eq!(action_input_var("aws region"), "INPUT_AWS_REGION");
    }

    #[test]
    fn reads_runner_environment() {
        temp_env::with_vars(
            [
                ("INPUT_REPOSITORY-NAME", Some("team/app")),
                ("INPUT_AWS-REGION", Some("us-east-1")),
                ("INPUT_AWS-ACCESS-KEY-ID", None),
                ("INPUT_AWS-SECRET-ACCESS-KEY", None),
            ],
            || {
                let config = Config::from_action_inputs().unwrap();
                assert_eq!(config.repository.as_str(), "team/app");
                assert!(config.credentials.is_none());
            },
        );
    }
}

mod settings {
    use super::*;

    #[test]
    fn resolves_credentials_from_env() {
        let yaml = r#"
repository: team/app
credentials:
  access_key_id:
    env: PRUNE_TEST_ACCESS_KEY
  secret_access_key:
    env: PRUNE_TEST_SECRET_KEY
    default: fallback-secret
timeout: 10s
"#;
        temp_env::with_vars(
            [
                ("PRUNE_TEST_ACCESS_KEY", Some("AKIDEXAMPLE")),
                ("PRUNE_TEST_SECRET_KEY", None),
            ],
            || {
                let settings = Config::from_yaml(yaml).unwrap().registry_settings().unwrap();
                let creds = settings.credentials.unwrap();
                assert_eq!(creds.access_key_id, "AKIDEXAMPLE");
                assert_eq!(creds.secret_access_key, "fallback-secret");
                assert_eq!(settings.timeout, Some(Duration::from_secs(10)));
            },
        );
    }

    #[test]
    fn missing_env_credential_is_an_error() {
        let yaml = r#"
repository: team/app
credentials:
  access_key_id:
    env: PRUNE_TEST_UNSET_KEY
  secret_access_key: literal
"#;
        temp_env::with_var_unset("PRUNE_TEST_UNSET_KEY", || {
            let err = Config::from_yaml(yaml)
                .unwrap()
                .registry_settings()
                .unwrap_err();
            assert!(matches!(err, Error::MissingEnvVar(_)));
        });
    }

    #[test]
    fn overrides_win() {
        let config = Config::from_yaml("repository: team/app\n")
            .unwrap()
            .with_overrides(Overrides {
                repository: Some("team/other".to_string()),
                region: Some("eu-west-1".to_string()),
                summary_file: Some(PathBuf::from("summary.md")),
            })
            .unwrap();

        assert_eq!(config.repository.as_str(), "team/other");
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.summary_file, Some(PathBuf::from("summary.md")));
    }

    #[test]
    fn invalid_override_is_rejected() {
        let err = Config::from_yaml("repository: team/app\n")
            .unwrap()
            .with_overrides(Overrides {
                repository: Some("Bad Name".to_string()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
