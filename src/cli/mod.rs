//! Command-line interface
//!
//! Argument definitions live here; [`commands`] executes them and
//! [`output`] renders the results.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::config::Settings;
use crate::i18n::I18n;
use crate::models::{PostStatus, RecruitmentStatus, RegistrationStatus};
use crate::search::DEFAULT_PER_PAGE;
use crate::services::ServiceFactory;
use crate::utils::errors::SiormaError;

pub use commands::run;

#[derive(Parser, Debug)]
#[command(name = "siorma", author, version, about = "Client for the SIORMA student organization platform", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./siorma.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Message language (id or en); defaults to the configured language
    #[arg(long, global = true, env = "SIORMA_LANG")]
    pub lang: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the session token
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "SIORMA_PASSWORD", hide_env_values = true)]
        password: String,
        /// Keep the token across restarts
        #[arg(short, long)]
        remember: bool,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "SIORMA_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        password_confirmation: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Me,
    /// Latest posts and organizations
    Home {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Check the backend connection and local session
    Status,
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommand,
    },
    /// Student organizations
    Ormawa {
        #[command(subcommand)]
        cmd: OrmawaCommand,
    },
    /// Events and recruitment posts
    Posts {
        #[command(subcommand)]
        cmd: PostCommand,
    },
    /// Membership registrations
    Registrations {
        #[command(subcommand)]
        cmd: RegistrationCommand,
    },
    /// User administration
    Users {
        #[command(subcommand)]
        cmd: UserCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective settings as TOML
    Show,
}

/// Search and paging options shared by list commands
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[arg(short, long)]
    pub search: Option<String>,
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,
    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    pub per_page: usize,
}

#[derive(Args, Debug, Clone)]
pub struct OrmawaFields {
    #[arg(short, long)]
    pub name: Option<String>,
    #[arg(long = "type")]
    pub type_ormawa: Option<String>,
    #[arg(long = "category")]
    pub category_ormawa: Option<String>,
    #[arg(long = "oprec")]
    pub status_oprec: Option<RecruitmentStatus>,
    #[arg(short, long)]
    pub description: Option<String>,
    /// Logo or photo file
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum OrmawaCommand {
    List(ListArgs),
    Show { id: i64 },
    Create(OrmawaFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: OrmawaFields,
    },
    Delete { id: i64 },
}

#[derive(Args, Debug, Clone)]
pub struct PostFields {
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(long)]
    pub status: Option<PostStatus>,
    /// Owning organization id
    #[arg(long = "ormawa")]
    pub ormawa_id: Option<i64>,
    /// Poster image file
    #[arg(long)]
    pub poster: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum PostCommand {
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Include drafts (admin only)
        #[arg(long)]
        admin: bool,
        /// Only posts of this organization (admin only)
        #[arg(long = "ormawa")]
        ormawa_id: Option<i64>,
    },
    Create(PostFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: PostFields,
    },
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum RegistrationCommand {
    /// Apply to a post
    Submit {
        post_id: i64,
        /// Defaults to the signed-in account's name
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        nim: String,
        /// Defaults to the signed-in account's email
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        organization: Option<String>,
        #[arg(long)]
        reason: Option<String>,
        /// CV file to attach
        #[arg(long)]
        cv: Option<PathBuf>,
    },
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        status: Option<RegistrationStatus>,
    },
    /// Approve, reject or reset a registration
    Status {
        id: i64,
        status: RegistrationStatus,
    },
    /// Fetch the CV into a temporary file and print its path
    ViewCv { id: i64 },
    /// Save the CV under its server-provided name
    DownloadCv {
        id: i64,
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
        /// Name used when the server sends none
        #[arg(long, default_value = "CV")]
        fallback_name: String,
    },
    Delete { id: i64 },
    /// Counts per status
    Stats,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    List(ListArgs),
    Create {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        role: String,
        #[arg(short, long, env = "SIORMA_NEW_USER_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        password_confirmation: Option<String>,
    },
    Update {
        id: i64,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long)]
        role: Option<String>,
    },
    Delete { id: i64 },
}

/// Why a command stopped
#[derive(Error, Debug)]
pub enum CliError {
    #[error("login required")]
    LoginRequired,

    #[error("admin access required")]
    AdminOnly,

    #[error(transparent)]
    Siorma(#[from] SiormaError),
}

/// Everything a command needs
#[derive(Debug)]
pub struct App {
    pub settings: Settings,
    pub services: ServiceFactory,
    pub i18n: I18n,
    pub lang: String,
}

impl App {
    pub fn new(settings: Settings, services: ServiceFactory, i18n: I18n, lang: String) -> Self {
        Self {
            settings,
            services,
            i18n,
            lang,
        }
    }

    /// Translate a key in the active language
    pub fn t(&self, key: &str) -> String {
        self.i18n.t(key, &self.lang, None)
    }

    pub fn tr(&self, key: &str, params: &crate::i18n::TranslationParams) -> String {
        self.i18n.t(key, &self.lang, Some(params))
    }

    /// Text printed when a command fails
    pub fn describe_error(&self, error: &CliError) -> String {
        match error {
            CliError::LoginRequired => self.t("guard.login_required"),
            CliError::AdminOnly => self.t("guard.admin_only"),
            CliError::Siorma(e) => self.i18n.error_message(e, &self.lang),
        }
    }
}
