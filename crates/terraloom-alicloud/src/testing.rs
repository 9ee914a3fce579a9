//! Shared fixtures for unit tests

use crate::account::{AccountSettings, GroupingMode};
use crate::builder::TopologyBuilder;
use crate::credentials::{CredentialSource, Credentials, KeyMaterial};
use crate::images::StaticImages;

/// Explicit-group account with a public key, looking images up via the provider
pub(crate) fn literal_settings() -> AccountSettings {
    AccountSettings::new(
        "cn-hangzhou",
        GroupingMode::ExplicitGroup {
            resource_group_id: "rg-test".to_string(),
        },
        CredentialSource::Literal(Credentials {
            account_id: None,
            access_key: "AK".to_string(),
            secret_key: "SK".to_string(),
            key: KeyMaterial::PublicKey("ssh-rsa AAAA".to_string()),
        }),
    )
    .with_key_pair_name("test")
}

/// Builder whose bootstrap only declares the provider
pub(crate) fn static_builder() -> TopologyBuilder {
    let mut settings = literal_settings();
    settings.credentials = CredentialSource::Literal(Credentials {
        account_id: None,
        access_key: "AK".to_string(),
        secret_key: "SK".to_string(),
        key: KeyMaterial::ExistingKeyPair("ops".to_string()),
    });
    TopologyBuilder::with_image_lookup(
        "test-stack",
        &settings,
        &StaticImages(vec!["m-debian".to_string()]),
    )
    .unwrap()
}
