use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use edgepush::domain::value_objects::D1Location;

/// edgepush - push edge workers to Cloudflare Workers and Deno Deploy
#[derive(Parser, Debug)]
#[command(name = "edgepush")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit NDJSON events instead of terminal output
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// When to use colors
    #[arg(long, value_enum, default_value_t = ColorWhen::Auto, global = true)]
    pub color: ColorWhen,

    /// Config file (defaults to ./.edgepush.toml, then the user config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a worker script to Cloudflare Workers
    Push(PushArgs),

    /// Upload a module worker to Deno Deploy
    PushDeploy(PushDeployArgs),

    /// Manage D1 databases
    #[command(subcommand)]
    D1(D1Command),
}

/// Cloudflare account selection shared by `push` and `d1`
#[derive(Args, Debug, Clone, Default)]
pub struct CredentialArgs {
    /// Named profile from the config
    #[arg(long)]
    pub profile: Option<String>,

    /// Cloudflare account id (requires --api-token)
    #[arg(long, alias = "accountId", requires = "api_token")]
    pub account_id: Option<String>,

    /// Cloudflare api token (requires --account-id)
    #[arg(long, alias = "apiToken", requires = "account_id")]
    pub api_token: Option<String>,
}

/// Bindings given on the command line, each `name:value`
#[derive(Args, Debug, Clone, Default)]
pub struct BindingArgs {
    /// Plain text binding
    #[arg(long = "text-binding", alias = "textBinding", value_name = "NAME:VALUE")]
    pub text: Vec<String>,

    /// Secret text binding
    #[arg(long = "secret-binding", alias = "secretBinding", value_name = "NAME:SECRET")]
    pub secret: Vec<String>,

    /// KV namespace binding
    #[arg(long = "kv-namespace-binding", alias = "kvNamespaceBinding", value_name = "NAME:ID")]
    pub kv_namespace: Vec<String>,

    /// Durable object namespace binding, created on demand
    #[arg(long = "do-namespace-binding", alias = "doNamespaceBinding", value_name = "NAME:NS:CLASS")]
    pub do_namespace: Vec<String>,

    /// Wasm module binding from a local file
    #[arg(long = "wasm-module-binding", alias = "wasmModuleBinding", value_name = "NAME:PATH")]
    pub wasm_module: Vec<String>,

    /// Service binding
    #[arg(long = "service-binding", alias = "serviceBinding", value_name = "NAME:SERVICE:ENV")]
    pub service: Vec<String>,

    /// R2 bucket binding
    #[arg(long = "r2-bucket-binding", alias = "r2BucketBinding", value_name = "NAME:BUCKET")]
    pub r2_bucket: Vec<String>,

    /// Analytics Engine dataset binding
    #[arg(long = "ae-dataset-binding", alias = "aeDatasetBinding", value_name = "NAME:DATASET")]
    pub ae_dataset: Vec<String>,

    /// D1 database binding
    #[arg(long = "d1-database-binding", alias = "d1DatabaseBinding", value_name = "NAME:UUID")]
    pub d1_database: Vec<String>,

    /// Queue producer binding
    #[arg(long = "queue-binding", alias = "queueBinding", value_name = "NAME:QUEUE")]
    pub queue: Vec<String>,

    /// Secret key binding from a JSON descriptor
    #[arg(long = "secret-key-binding", alias = "secretKeyBinding", value_name = "NAME:JSON")]
    pub secret_key: Vec<String>,

    /// Browser rendering binding
    #[arg(long = "browser-binding", alias = "browserBinding", value_name = "NAME")]
    pub browser: Vec<String>,
}

/// Watch flags shared by both push commands
#[derive(Args, Debug, Clone, Default)]
pub struct WatchArgs {
    /// Push again whenever the sources change
    #[arg(long)]
    pub watch: bool,

    /// Extra path to watch (repeatable)
    #[arg(long, alias = "watchInclude", requires = "watch")]
    pub watch_include: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub struct PushArgs {
    /// Config script name, local file, or https url of the root module
    pub script_spec: String,

    /// Worker name (defaults to the config key or the file name)
    #[arg(long)]
    pub name: Option<String>,

    #[command(flatten)]
    pub watch: WatchArgs,

    /// Bind the worker to a custom domain (repeatable)
    #[arg(long, alias = "customDomain")]
    pub custom_domain: Vec<String>,

    /// Enable or disable the workers.dev route
    #[arg(long, alias = "workersDev")]
    pub workers_dev: Option<bool>,

    /// Enable or disable Logpush for the worker
    #[arg(long)]
    pub logpush: Option<bool>,

    /// Compatibility date (YYYY-MM-DD)
    #[arg(long, alias = "compatibilityDate")]
    pub compatibility_date: Option<String>,

    /// Compatibility flag (repeatable)
    #[arg(long, alias = "compatibilityFlag")]
    pub compatibility_flag: Vec<String>,

    /// Durable object class to delete with a migration (repeatable)
    #[arg(long, alias = "deleteClass")]
    pub delete_class: Vec<String>,

    #[command(flatten)]
    pub bindings: BindingArgs,

    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Bundler options, e.g. backend=esbuild
    #[arg(long)]
    pub bundle: Option<String>,
}

#[derive(Args, Debug)]
pub struct PushDeployArgs {
    /// Config script name, local file, or https url of the root module
    pub script_spec: String,

    /// Deploy project name (defaults to the config key or the file name)
    #[arg(long)]
    pub name: Option<String>,

    /// Deno Deploy access token
    #[arg(long, alias = "accessToken")]
    pub access_token: Option<String>,

    #[command(flatten)]
    pub watch: WatchArgs,

    /// Stream live logs of the production deployment instead of pushing
    #[arg(long, alias = "getLogs", conflicts_with_all = ["query_logs", "watch"])]
    pub get_logs: bool,

    /// Print recent logs of the production deployment instead of pushing
    #[arg(long, alias = "queryLogs", conflicts_with = "watch")]
    pub query_logs: bool,

    #[command(flatten)]
    pub bindings: BindingArgs,

    /// Bundler options, e.g. backend=esbuild
    #[arg(long)]
    pub bundle: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum D1Command {
    /// List databases
    List {
        #[command(flatten)]
        credentials: CredentialArgs,
    },

    /// Delete a database
    Drop {
        name: String,

        #[command(flatten)]
        credentials: CredentialArgs,
    },

    /// Create a database
    Create {
        name: String,

        /// Primary location hint
        #[arg(long, value_enum)]
        location: Option<D1Location>,

        /// Create the database on the experimental backend
        #[arg(long, alias = "experimentalBackend")]
        experimental_backend: bool,

        #[command(flatten)]
        credentials: CredentialArgs,
    },

    /// Run a SQL query
    Query {
        name: String,

        /// Statement to run
        #[arg(long)]
        sql: String,

        /// Ordinal parameter (repeatable)
        #[arg(long)]
        param: Vec<String>,

        #[command(flatten)]
        credentials: CredentialArgs,
    },

    /// Take a backup
    Backup {
        name: String,

        #[command(flatten)]
        credentials: CredentialArgs,
    },

    /// List backups, oldest first
    ListBackups {
        name: String,

        #[command(flatten)]
        credentials: CredentialArgs,
    },

    /// Restore a backup
    Restore {
        name: String,

        /// Backup to restore
        #[arg(long, alias = "backupId")]
        backup_id: String,

        #[command(flatten)]
        credentials: CredentialArgs,
    },

    /// Download a backup as a sqlite file
    Download {
        name: String,

        /// Where to write the sqlite file
        #[arg(long)]
        file: PathBuf,

        /// Backup to download (a new backup is taken when omitted)
        #[arg(long, alias = "backupId")]
        backup_id: Option<String>,

        #[command(flatten)]
        credentials: CredentialArgs,
    },
}
