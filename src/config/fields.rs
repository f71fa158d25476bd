//! Field and generator tables.
//!
//! Every input a generator understands is described once here: its canonical
//! merge key, environment variable, config-file key, prompt label, and
//! whether it is required. The loader, resolver, and CLI all read these tables,
//! so adding a field to a generator is a single-entry change.

/// Prefix shared by every environment variable the loader reads.
pub const ENV_PREFIX: &str = "GEMSECRETS_";

/// Sample `gem-overrides.json`, shown in help text and when there is nothing to do.
pub const SAMPLE_OVERRIDES_JSON: &str = r#"Sample gem-overrides.json:

{
  "admin_bucket": "my-admin-bucket",
  "ruler_bucket": "my-ruler-bucket",
  "blocks_bucket": "my-blocks-bucket",
  "access_key": "${AWS_ACCESS_KEY_ID}",
  "secret_key": "${AWS_SECRET_ACCESS_KEY}",
  "endpoint": "s3.amazonaws.com"
}"#;

/// A single named input value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Kubernetes namespace for the generated secrets.
    Namespace,
    /// Kubernetes secret name.
    Name,
    /// GEM admin username.
    AdminUser,
    /// GEM admin password.
    AdminPassword,
    /// Contents of `license.jwt`.
    License,
    /// Path to a `license.jwt` file.
    LicenseFile,
    /// S3 access key ID.
    AccessKey,
    /// S3 secret access key.
    SecretKey,
    /// Bucket for the admin client.
    AdminBucket,
    /// Bucket for ruler storage.
    RulerBucket,
    /// Bucket for alertmanager storage.
    AlertmanagerBucket,
    /// Bucket for blocks storage.
    BlocksBucket,
    /// S3 endpoint host.
    Endpoint,
    /// Value of the rollout annotation on GEM pods.
    SecretVersion,
}

impl Field {
    /// Every field, in declaration order.
    pub const ALL: &'static [Self] = &[
        Self::Namespace,
        Self::Name,
        Self::AdminUser,
        Self::AdminPassword,
        Self::License,
        Self::LicenseFile,
        Self::AccessKey,
        Self::SecretKey,
        Self::AdminBucket,
        Self::RulerBucket,
        Self::AlertmanagerBucket,
        Self::BlocksBucket,
        Self::Endpoint,
        Self::SecretVersion,
    ];

    /// Canonical key used in merge layers and in `ManifestInputs`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Namespace => "namespace",
            Self::Name => "name",
            Self::AdminUser => "admin_user",
            Self::AdminPassword => "admin_password",
            Self::License => "license",
            Self::LicenseFile => "license_file",
            Self::AccessKey => "access_key",
            Self::SecretKey => "secret_key",
            Self::AdminBucket => "admin_bucket",
            Self::RulerBucket => "ruler_bucket",
            Self::AlertmanagerBucket => "alertmanager_bucket",
            Self::BlocksBucket => "blocks_bucket",
            Self::Endpoint => "endpoint",
            Self::SecretVersion => "secret_version",
        }
    }

    /// Environment variable consulted for this field.
    #[must_use]
    pub const fn env_var(self) -> &'static str {
        match self {
            Self::Namespace => "GEMSECRETS_NAMESPACE",
            Self::Name => "GEMSECRETS_NAME",
            Self::AdminUser => "GEMSECRETS_ADMIN_USER",
            Self::AdminPassword => "GEMSECRETS_ADMIN_PASSWORD",
            Self::License => "GEMSECRETS_LICENSE",
            Self::LicenseFile => "GEMSECRETS_LICENSE_FILE",
            Self::AccessKey => "GEMSECRETS_ACCESS_KEY",
            Self::SecretKey => "GEMSECRETS_SECRET_KEY",
            Self::AdminBucket => "GEMSECRETS_ADMIN_BUCKET",
            Self::RulerBucket => "GEMSECRETS_RULER_BUCKET",
            Self::AlertmanagerBucket => "GEMSECRETS_ALERTMANAGER_BUCKET",
            Self::BlocksBucket => "GEMSECRETS_BLOCKS_BUCKET",
            Self::Endpoint => "GEMSECRETS_ENDPOINT",
            Self::SecretVersion => "GEMSECRETS_SECRET_VERSION",
        }
    }
}

/// How one generator treats one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// The field described.
    pub field: Field,
    /// User-facing name, used in error messages.
    pub name: &'static str,
    /// Key in the JSON config file, if the field may come from a file.
    pub file_key: Option<&'static str>,
    /// Label shown when prompting.
    pub prompt: &'static str,
    /// Hide the answer while typing.
    pub sensitive: bool,
    /// Resolution fails when the field is still empty.
    pub required: bool,
}

impl FieldSpec {
    const fn required(
        field: Field,
        name: &'static str,
        file_key: Option<&'static str>,
        prompt: &'static str,
    ) -> Self {
        Self {
            field,
            name,
            file_key,
            prompt,
            sensitive: false,
            required: true,
        }
    }

    const fn optional(field: Field, name: &'static str, file_key: Option<&'static str>) -> Self {
        Self {
            field,
            name,
            file_key,
            prompt: name,
            sensitive: false,
            required: false,
        }
    }

    const fn hidden(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

/// What to do when a required field is absent from every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Ask the user interactively.
    Prompt,
    /// Fail with `MissingRequired`.
    Fail,
}

/// The five generators this tool provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    /// Admin credentials secret with a user-chosen name.
    Admin,
    /// License secret with a user-chosen name.
    License,
    /// `mimir-bucket-secret` with S3 credentials.
    Bucket,
    /// The three GEM secrets in one run.
    Metrics,
    /// Helm values overrides for GEM object storage.
    Overrides,
}

impl GeneratorKind {
    /// The field table and policies for this generator.
    #[must_use]
    pub fn spec(self) -> &'static GeneratorSpec {
        match self {
            Self::Admin => &ADMIN,
            Self::License => &LICENSE,
            Self::Bucket => &BUCKET,
            Self::Metrics => &METRICS,
            Self::Overrides => &OVERRIDES,
        }
    }
}

/// Everything the resolver needs to know about a generator.
#[derive(Debug)]
pub struct GeneratorSpec {
    /// Which generator this is.
    pub kind: GeneratorKind,
    /// Fields in resolution and prompt order.
    pub fields: &'static [FieldSpec],
    /// Behaviour for absent required fields.
    pub missing: MissingPolicy,
    /// Fail before validation when no source supplied anything.
    pub requires_input: bool,
    /// Config file consulted when `--config` is not given.
    pub default_config: Option<&'static str>,
}

impl GeneratorSpec {
    /// Looks up the entry for `field`, if this generator uses it.
    #[must_use]
    pub fn field(&self, field: Field) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.field == field)
    }

    /// Whether this generator reads `field` at all.
    #[must_use]
    pub fn uses(&self, field: Field) -> bool {
        self.field(field).is_some()
    }
}

static ADMIN: GeneratorSpec = GeneratorSpec {
    kind: GeneratorKind::Admin,
    fields: &[
        FieldSpec::required(
            Field::Namespace,
            "namespace",
            Some("namespace"),
            "Enter the Kubernetes namespace",
        ),
        FieldSpec::required(Field::Name, "name", Some("name"), "Enter the secret name"),
        FieldSpec::required(
            Field::AdminUser,
            "adminUser",
            Some("adminUser"),
            "Enter admin username",
        ),
        FieldSpec::required(
            Field::AdminPassword,
            "adminPassword",
            Some("adminPassword"),
            "Enter admin password",
        )
        .hidden(),
    ],
    missing: MissingPolicy::Prompt,
    requires_input: false,
    default_config: None,
};

static LICENSE: GeneratorSpec = GeneratorSpec {
    kind: GeneratorKind::License,
    fields: &[
        FieldSpec::required(Field::Namespace, "namespace", None, "namespace"),
        FieldSpec::required(Field::Name, "name", None, "name"),
        FieldSpec::optional(Field::LicenseFile, "file", None),
        FieldSpec::required(Field::License, "file", None, "file"),
    ],
    missing: MissingPolicy::Fail,
    requires_input: false,
    default_config: None,
};

static BUCKET: GeneratorSpec = GeneratorSpec {
    kind: GeneratorKind::Bucket,
    fields: &[
        FieldSpec::optional(Field::Namespace, "namespace", None),
        FieldSpec::required(
            Field::AccessKey,
            "AWS_ACCESS_KEY_ID",
            None,
            "AWS_ACCESS_KEY_ID",
        ),
        FieldSpec::required(
            Field::SecretKey,
            "AWS_SECRET_ACCESS_KEY",
            None,
            "AWS_SECRET_ACCESS_KEY",
        ),
    ],
    missing: MissingPolicy::Fail,
    requires_input: false,
    default_config: None,
};

static METRICS: GeneratorSpec = GeneratorSpec {
    kind: GeneratorKind::Metrics,
    fields: &[
        FieldSpec::optional(Field::Namespace, "namespace", Some("namespace")),
        FieldSpec::required(
            Field::AdminUser,
            "adminUser",
            Some("adminUser"),
            "Enter adminUser",
        ),
        FieldSpec::required(
            Field::AdminPassword,
            "adminPassword",
            Some("adminPassword"),
            "Enter adminPassword",
        )
        .hidden(),
        FieldSpec::required(
            Field::AccessKey,
            "AWS_ACCESS_KEY",
            Some("AWS_ACCESS_KEY"),
            "Enter AWS_ACCESS_KEY",
        ),
        FieldSpec::required(
            Field::SecretKey,
            "AWS_SECRET_ACCESS_KEY",
            Some("AWS_SECRET_ACCESS_KEY"),
            "Enter AWS_SECRET_ACCESS_KEY",
        )
        .hidden(),
        FieldSpec::optional(Field::LicenseFile, "licensefile", Some("licenseFile")),
        FieldSpec::required(
            Field::License,
            "license",
            None,
            "Enter contents of license.jwt",
        )
        .hidden(),
    ],
    missing: MissingPolicy::Prompt,
    requires_input: false,
    default_config: Some("config.json"),
};

static OVERRIDES: GeneratorSpec = GeneratorSpec {
    kind: GeneratorKind::Overrides,
    fields: &[
        FieldSpec::required(
            Field::AdminBucket,
            "admin_bucket",
            Some("admin_bucket"),
            "admin_bucket",
        ),
        FieldSpec::required(
            Field::RulerBucket,
            "ruler_bucket",
            Some("ruler_bucket"),
            "ruler_bucket",
        ),
        FieldSpec::optional(
            Field::AlertmanagerBucket,
            "alertmanager_bucket",
            Some("alertmanager_bucket"),
        ),
        FieldSpec::required(
            Field::BlocksBucket,
            "blocks_bucket",
            Some("blocks_bucket"),
            "blocks_bucket",
        ),
        FieldSpec::required(
            Field::AccessKey,
            "access_key",
            Some("access_key"),
            "access_key",
        ),
        FieldSpec::required(
            Field::SecretKey,
            "secret_key",
            Some("secret_key"),
            "secret_key",
        ),
        FieldSpec::required(Field::Endpoint, "endpoint", Some("endpoint"), "endpoint"),
        FieldSpec::optional(Field::SecretVersion, "secret_version", Some("secret_version")),
    ],
    missing: MissingPolicy::Fail,
    requires_input: true,
    default_config: Some("gem-overrides.json"),
};
