use crate::types::LogLevel;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "paramsync")]
#[command(
    about = "Move configuration between AWS Parameter Store, the shared-config table, and env files",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Config file (default: PARAMSYNC_CONFIG, then the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    /// AWS region, overriding the config file and the AWS profile
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Endpoint override for both SSM and DynamoDB (e.g. LocalStack)
    #[arg(long, global = true)]
    pub endpoint_url: Option<String>,

    /// Named AWS profile
    #[arg(long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        name = "remapKeysInEnv",
        about = "Rename env vars by prefix (DEV_AWS_KEY -> AWS_KEY) and save them to a file"
    )]
    RemapKeysInEnv {
        /// File to write the remapped variables to
        #[arg(short, long)]
        outfile: Option<String>,

        /// Prefix to be replaced
        #[arg(long)]
        oldprefix: Option<String>,

        /// Prefix to replace it with (can be blank)
        #[arg(long)]
        newprefix: Option<String>,
    },

    #[command(
        name = "saveParamsFile",
        about = "Save one service's parameters from Parameter Store into an env file"
    )]
    SaveParamsFile {
        #[arg(short, long)]
        outfile: Option<String>,

        #[arg(short, long)]
        env: Option<String>,

        #[arg(short, long)]
        service: Option<String>,
    },

    #[command(
        name = "putToAWSFromFile",
        about = "Save the entries of an env file into Parameter Store"
    )]
    PutToAwsFromFile {
        #[arg(short, long)]
        infile: Option<String>,

        #[arg(short, long)]
        env: Option<String>,

        #[arg(short, long)]
        service: Option<String>,

        /// Replace parameters that already exist
        #[arg(long)]
        overwrite: bool,

        /// Store the values as SecureString
        #[arg(long)]
        encrypt: bool,
    },

    #[command(
        name = "exportAllParams",
        about = "Export every parameter as <folder>/<env>/<service>.env"
    )]
    ExportAllParams {
        #[arg(short, long)]
        folder: Option<String>,

        /// Keep SecureString values encrypted
        #[arg(long)]
        no_decrypt: bool,
    },

    #[command(
        name = "getSharedConfigByService",
        about = "Save one service's shared config as a JSON object"
    )]
    GetSharedConfigByService {
        #[arg(short, long)]
        outfile: Option<String>,

        #[arg(short, long)]
        env: Option<String>,

        #[arg(short, long)]
        service: Option<String>,
    },

    #[command(
        name = "putSharedConfigFromFile",
        about = "Write a JSON object of name/value pairs into the shared-config table"
    )]
    PutSharedConfigFromFile {
        #[arg(short, long)]
        infile: Option<String>,

        #[arg(short, long)]
        env: Option<String>,

        #[arg(short, long)]
        service: Option<String>,
    },

    #[command(name = "getParameter", about = "Print a single parameter")]
    GetParameter {
        #[arg(short, long)]
        env: Option<String>,

        #[arg(short, long)]
        service: Option<String>,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(long)]
        no_decrypt: bool,
    },

    #[command(
        name = "listEnvironments",
        about = "List environments with their parameter counts"
    )]
    ListEnvironments,

    #[command(
        name = "listServices",
        about = "List the services of an environment with their parameter counts"
    )]
    ListServices {
        #[arg(short, long)]
        env: Option<String>,
    },
}
