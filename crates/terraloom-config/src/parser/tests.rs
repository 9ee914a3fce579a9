use super::*;
use std::path::PathBuf;
use terraloom_alicloud::{GroupingMode, ImageOwnership, KeyMaterial};

const DEMO_STACK: &str = r#"
    stack "alicloud-demo"

    account {
        region "cn-hangzhou"
        resource-group "rg-123"
        credentials "literal" {
            access-key "AK"
            secret-key "SK"
            public-key "ssh-rsa AAAA"
        }
        image "^debian-10$" "self"
        key-pair "test"
    }

    network "vpc1" {
        cidr "172.16.0.0/12"
        vswitch "cn-hangzhou-h" "172.16.0.0/21"
    }

    instance "instance1" {
        network "vpc1"
        zone "cn-hangzhou-h"
    }
"#;

#[test]
fn test_parse_demo_stack() {
    let stack = parse_stack_string(DEMO_STACK, "default".to_string()).unwrap();

    assert_eq!(stack.name, "alicloud-demo");
    assert_eq!(stack.account.region, "cn-hangzhou");
    assert_eq!(
        stack.account.grouping,
        GroupingMode::ExplicitGroup {
            resource_group_id: "rg-123".to_string()
        }
    );
    assert_eq!(stack.account.key_pair_name, "test");
    assert_eq!(stack.account.image.name_regex, "^debian-10$");
    assert_eq!(stack.account.image.owners, ImageOwnership::SelfOwned);

    match &stack.account.credentials {
        CredentialSource::Literal(credentials) => {
            assert_eq!(credentials.access_key, "AK");
            assert_eq!(credentials.secret_key, "SK");
            assert_eq!(
                credentials.key,
                KeyMaterial::PublicKey("ssh-rsa AAAA".to_string())
            );
        }
        other => panic!("unexpected credentials: {:?}", other),
    }

    assert_eq!(stack.operations.len(), 2);
    let network = stack.networks().next().unwrap();
    assert_eq!(network.name, "vpc1");
    assert_eq!(network.cidr_block, "172.16.0.0/12");
    assert_eq!(
        network.vswitches,
        vec![("cn-hangzhou-h".to_string(), "172.16.0.0/21".to_string())]
    );

    let instance = stack.instances().next().unwrap();
    assert_eq!(instance.network, "vpc1");
    assert_eq!(instance.zone, "cn-hangzhou-h");
    assert_eq!(instance.instance_type, None);
}

#[test]
fn test_parsed_stack_builds() {
    let stack = parse_stack_string(DEMO_STACK, "default".to_string()).unwrap();
    let builder = stack.build().unwrap();

    assert!(builder.subnet("vpc1", "cn-hangzhou-h").is_some());
    assert!(builder.instance("instance1").is_some());
}

#[test]
fn test_default_stack_name() {
    let kdl = r#"
        account {
            region "cn-hangzhou"
            resource-group "rg-123"
            credentials "env"
        }
    "#;

    let stack = parse_stack_string(kdl, "fallback".to_string()).unwrap();
    assert_eq!(stack.name, "fallback");
    assert!(stack.operations.is_empty());
    assert_eq!(
        stack.account.credentials,
        CredentialSource::External(ExternalCredentials::Environment)
    );
}

#[test]
fn test_delegated_role_with_others_images() {
    let kdl = r#"
        account {
            region "cn-shanghai"
            assume-role "deployer"
            credentials "file" "secret.json"
            image "^ubuntu_22" "others"
        }
    "#;

    let stack = parse_stack_string(kdl, "demo".to_string()).unwrap();
    assert_eq!(
        stack.account.grouping,
        GroupingMode::DelegatedRole {
            role_name: "deployer".to_string()
        }
    );
    assert_eq!(stack.account.image.owners, ImageOwnership::Others);
    assert_eq!(
        stack.account.credentials,
        CredentialSource::External(ExternalCredentials::File(PathBuf::from("secret.json")))
    );
}

#[test]
fn test_instance_type_override() {
    let kdl = r#"
        account {
            region "cn-hangzhou"
            resource-group "rg-123"
            credentials "env"
        }
        instance "big" {
            network "vpc1"
            zone "cn-hangzhou-h"
            type "ecs.g6.large"
        }
    "#;

    let stack = parse_stack_string(kdl, "demo".to_string()).unwrap();
    let instance = stack.instances().next().unwrap();
    assert_eq!(instance.instance_type.as_deref(), Some("ecs.g6.large"));
}

#[test]
fn test_operations_keep_file_order() {
    let kdl = r#"
        account {
            region "cn-hangzhou"
            resource-group "rg-123"
            credentials "env"
        }
        instance "early" {
            network "vpc1"
            zone "a"
        }
        network "vpc1" {
            cidr "10.0.0.0/8"
        }
    "#;

    let stack = parse_stack_string(kdl, "demo".to_string()).unwrap();
    assert!(matches!(stack.operations[0], StackOperation::Instance(_)));
    assert!(matches!(stack.operations[1], StackOperation::Network(_)));
}

#[test]
fn test_missing_account() {
    let result = parse_stack_string(r#"stack "demo""#, "demo".to_string());
    assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
}

#[test]
fn test_grouping_is_exclusive() {
    let kdl = r#"
        account {
            region "cn-hangzhou"
            resource-group "rg-123"
            assume-role "deployer"
            credentials "env"
        }
    "#;
    assert!(matches!(
        parse_stack_string(kdl, "demo".to_string()),
        Err(ConfigError::InvalidConfig(_))
    ));
}

#[test]
fn test_literal_credentials_need_one_key() {
    let kdl = r#"
        account {
            region "cn-hangzhou"
            resource-group "rg-123"
            credentials "literal" {
                access-key "AK"
                secret-key "SK"
            }
        }
    "#;
    assert!(matches!(
        parse_stack_string(kdl, "demo".to_string()),
        Err(ConfigError::InvalidConfig(_))
    ));
}

#[test]
fn test_vswitch_requires_zone_and_cidr() {
    let kdl = r#"
        account {
            region "cn-hangzhou"
            resource-group "rg-123"
            credentials "env"
        }
        network "vpc1" {
            cidr "10.0.0.0/8"
            vswitch "cn-hangzhou-h"
        }
    "#;
    assert!(matches!(
        parse_stack_string(kdl, "demo".to_string()),
        Err(ConfigError::InvalidConfig(_))
    ));
}

#[test]
fn test_invalid_kdl() {
    let result = parse_stack_string("account {", "demo".to_string());
    assert!(matches!(result, Err(ConfigError::KdlParse(_))));
}

#[test]
fn test_parse_stack_file_resolves_secrets_path() {
    let temp_dir = tempfile::tempdir().unwrap();
    let project = temp_dir.path().join("my-project");
    fs::create_dir(&project).unwrap();
    let path = project.join("stack.kdl");
    fs::write(
        &path,
        r#"
        account {
            region "cn-hangzhou"
            resource-group "rg-123"
            credentials "file" "secret.json"
        }
        "#,
    )
    .unwrap();

    let stack = parse_stack_file(&path).unwrap();
    assert_eq!(stack.name, "my-project");
    assert_eq!(
        stack.account.credentials,
        CredentialSource::External(ExternalCredentials::File(project.join("secret.json")))
    );
}

#[test]
fn test_stack_name_must_be_an_identifier() {
    for name in ["../../escaped", "", "nested/stack", ".hidden"] {
        let kdl = DEMO_STACK.replace(r#"stack "alicloud-demo""#, &format!("stack {:?}", name));
        let result = parse_stack_string(&kdl, "default".to_string());
        assert!(
            matches!(&result, Err(ConfigError::InvalidConfig(msg)) if msg.contains("stack name")),
            "{name:?}: {result:?}"
        );
    }
}

#[test]
fn test_default_stack_name_is_validated() {
    let kdl = DEMO_STACK.replace(r#"stack "alicloud-demo""#, "");
    let result = parse_stack_string(&kdl, "my.project".to_string());
    assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
}

#[test]
fn test_literal_credentials_reject_blank_values() {
    let blank_keys = DEMO_STACK
        .replace(r#"access-key "AK""#, r#"access-key """#)
        .replace(r#"secret-key "SK""#, r#"secret-key """#);
    let result = parse_stack_string(&blank_keys, "default".to_string());
    assert!(
        matches!(&result, Err(ConfigError::InvalidConfig(msg)) if msg.contains("access key")),
        "{result:?}"
    );

    let blank_public_key = DEMO_STACK.replace(r#"public-key "ssh-rsa AAAA""#, r#"public-key """#);
    let result = parse_stack_string(&blank_public_key, "default".to_string());
    assert!(
        matches!(&result, Err(ConfigError::InvalidConfig(msg)) if msg.contains("public-key")),
        "{result:?}"
    );
}
