//! Account settings and the account context resolved at bootstrap

use crate::credentials::{CredentialSource, KeyMaterial};
use crate::error::{Result, TopologyError};
use crate::images::{ImageFilter, ImageLookup, slugify};
use crate::kinds;
use terraloom_graph::{Attributes, ResourceGraph, ResourceHandle, Value};

/// How resources are scoped inside the account
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupingMode {
    /// Every resource carries an explicit resource group id
    ExplicitGroup { resource_group_id: String },
    /// The provider assumes a RAM role; resources carry no group id
    DelegatedRole { role_name: String },
}

/// Account-level settings a builder is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSettings {
    /// Region (e.g. "cn-hangzhou")
    pub region: String,

    pub grouping: GroupingMode,

    pub credentials: CredentialSource,

    /// Base image search
    pub image: ImageFilter,

    /// Name of the key pair registered when the credentials carry a public key
    pub key_pair_name: String,
}

impl AccountSettings {
    pub fn new(
        region: impl Into<String>,
        grouping: GroupingMode,
        credentials: CredentialSource,
    ) -> Self {
        Self {
            region: region.into(),
            grouping,
            credentials,
            image: ImageFilter::default(),
            key_pair_name: "terraloom".to_string(),
        }
    }

    pub fn with_image(mut self, image: ImageFilter) -> Self {
        self.image = image;
        self
    }

    pub fn with_key_pair_name(mut self, name: impl Into<String>) -> Self {
        self.key_pair_name = name.into();
        self
    }
}

/// Provider connection material
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderAuth {
    pub access_key: String,
    pub secret_key: String,
    /// ARN of the assumed role in delegated-role mode
    pub assume_role: Option<String>,
}

impl std::fmt::Debug for ProviderAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderAuth")
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .field("assume_role", &self.assume_role)
            .finish()
    }
}

/// Values shared by every topology operation, fixed at bootstrap
#[derive(Debug, Clone)]
pub struct AccountContext {
    region: String,
    resource_group_id: Option<String>,
    auth: ProviderAuth,
    provider: ResourceHandle,
    image_id: Value,
    key_name: Value,
    key_pair: Option<ResourceHandle>,
}

impl AccountContext {
    /// Resolve credentials and declare the provider, image lookup and key pair
    ///
    /// All declarations happen as one unit; a failure leaves `graph` untouched.
    pub fn bootstrap(
        graph: &mut ResourceGraph,
        settings: &AccountSettings,
        images: &dyn ImageLookup,
    ) -> Result<Self> {
        let credentials = settings.credentials.resolve()?;

        let (resource_group_id, assume_role) = match &settings.grouping {
            GroupingMode::ExplicitGroup { resource_group_id } => {
                (Some(resource_group_id.clone()), None)
            }
            GroupingMode::DelegatedRole { role_name } => {
                let account_id = credentials.account_id.as_deref().ok_or_else(|| {
                    TopologyError::Credentials(
                        "an account id is required to assume a delegated role".to_string(),
                    )
                })?;
                (None, Some(role_arn(account_id, role_name)))
            }
        };

        let auth = ProviderAuth {
            access_key: credentials.access_key.clone(),
            secret_key: credentials.secret_key.clone(),
            assume_role,
        };

        graph.atomically(|graph| -> Result<Self> {
            let mut provider_attrs = Attributes::new()
                .with("region", settings.region.as_str())
                .with("access_key", auth.access_key.as_str())
                .with("secret_key", auth.secret_key.as_str());
            if let Some(arn) = &auth.assume_role {
                provider_attrs.set("assume_role", Attributes::new().with("role_arn", arn));
            }
            let provider = graph.declare(kinds::PROVIDER, "alicloud", provider_attrs)?;

            let image_id = images.find_images(graph, &settings.image)?.first()?;

            let (key_name, key_pair) = match &credentials.key {
                KeyMaterial::PublicKey(public_key) => {
                    let slug = slugify(&settings.key_pair_name);
                    if slug.is_empty() {
                        return Err(TopologyError::Credentials(format!(
                            "key pair name '{}' has no usable characters",
                            settings.key_pair_name
                        )));
                    }
                    let handle = graph.declare(
                        kinds::KEY_PAIR,
                        format!("key-pair-{}", slug),
                        Attributes::new()
                            .with_opt("resource_group_id", resource_group_id.as_deref())
                            .with("key_name", settings.key_pair_name.as_str())
                            .with("public_key", public_key.as_str()),
                    )?;
                    (Value::from(handle.output("key_name")?), Some(handle))
                }
                KeyMaterial::ExistingKeyPair(name) => (Value::from(name), None),
            };

            tracing::info!(
                "Bootstrapped account in {} ({})",
                settings.region,
                match &resource_group_id {
                    Some(group) => format!("resource group {}", group),
                    None => "delegated role".to_string(),
                }
            );

            Ok(Self {
                region: settings.region.clone(),
                resource_group_id,
                auth,
                provider,
                image_id,
                key_name,
                key_pair,
            })
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Resource group id in explicit-group mode
    pub fn resource_group_id(&self) -> Option<&str> {
        self.resource_group_id.as_deref()
    }

    pub fn auth(&self) -> &ProviderAuth {
        &self.auth
    }

    pub fn provider(&self) -> &ResourceHandle {
        &self.provider
    }

    /// Base image id, literal or deferred
    pub fn image_id(&self) -> &Value {
        &self.image_id
    }

    /// Key pair name, literal or deferred
    pub fn key_name(&self) -> &Value {
        &self.key_name
    }

    /// The key pair declared at bootstrap, if one was generated
    pub fn key_pair(&self) -> Option<&ResourceHandle> {
        self.key_pair.as_ref()
    }

    /// Add the resource group id when the account uses explicit groups
    pub fn grouped(&self, attrs: Attributes) -> Attributes {
        attrs.with_opt("resource_group_id", self.resource_group_id.as_deref())
    }
}

fn role_arn(account_id: &str, role_name: &str) -> String {
    format!("acs:ram::{}:role/{}", account_id, role_name)
}
