//! Command execution

use tracing::debug;

use crate::client::Attachment;
use crate::i18n::params;
use crate::models::{
    NewUser, OrmawaForm, PostForm, RegisterRequest, RegistrationRequest, User, UserUpdate,
};
use crate::search::{filter_by_term, paginate, Searchable};
use crate::services::{Access, GuardOutcome, Landing};
use crate::utils::errors::{ApiError, SiormaError};
use crate::utils::helpers::format_bytes;

use super::output;
use super::{
    App, Cli, CliError, Command, ConfigCommand, ListArgs, OrmawaCommand, OrmawaFields,
    PostCommand, PostFields, RegistrationCommand, UserCommand,
};

type CommandResult = std::result::Result<(), CliError>;

/// Execute a parsed command line
pub async fn run(cli: Cli, app: &App) -> CommandResult {
    match cli.command {
        Command::Login { email, password, remember } => login(app, &email, &password, remember).await,
        Command::Register {
            name,
            username,
            email,
            password,
            password_confirmation,
        } => {
            let password_confirmation = password_confirmation.unwrap_or_else(|| password.clone());
            register(app, RegisterRequest { name, username, email, password, password_confirmation }).await
        }
        Command::Logout => {
            app.services.auth_service.logout().await?;
            println!("{}", app.t("auth.logout_success"));
            Ok(())
        }
        Command::Me => {
            let user = require(app, Access::Authenticated).await?;
            println!("{}", whoami(app, &user));
            Ok(())
        }
        Command::Home { search } => home(app, search.as_deref()).await,
        Command::Status => status(app).await,
        Command::Config { cmd: ConfigCommand::Show } => {
            let rendered = toml::to_string_pretty(&app.settings)
                .map_err(|e| SiormaError::Config(format!("Cannot render settings: {}", e)))?;
            print!("{}", rendered);
            Ok(())
        }
        Command::Ormawa { cmd } => ormawa(app, cmd).await,
        Command::Posts { cmd } => posts(app, cmd).await,
        Command::Registrations { cmd } => registrations(app, cmd).await,
        Command::Users { cmd } => users(app, cmd).await,
    }
}

/// Run the guard and turn redirects into command errors
async fn require(app: &App, access: Access) -> std::result::Result<User, CliError> {
    match app.services.auth_service.guard(access).await? {
        GuardOutcome::Granted(user) => Ok(user),
        GuardOutcome::RedirectLogin => Err(CliError::LoginRequired),
        GuardOutcome::RedirectHome => Err(CliError::AdminOnly),
    }
}

fn whoami(app: &App, user: &User) -> String {
    app.tr(
        "auth.whoami",
        &params([
            ("name", user.display_name().to_string()),
            ("email", user.email.clone()),
            ("role", user.role.clone()),
        ]),
    )
}

/// Filter, paginate and print a list, followed by a page footer
fn print_page<T: Searchable>(app: &App, items: Vec<T>, list: &ListArgs, render: impl Fn(&[T]) -> String) {
    let page = paginate(filter_by_term(items, list.search.as_deref()), list.page, list.per_page);
    if page.total_items == 0 {
        println!("{}", app.t("list.empty"));
        return;
    }

    print!("{}", render(&page.items));
    println!(
        "{} | {}",
        app.tr(
            "list.page",
            &params([
                ("page", page.page.to_string()),
                ("pages", page.total_pages.to_string()),
            ]),
        ),
        app.i18n.tp("list.count", &app.lang, page.total_items as i64, None)
    );
}

async fn attachment(path: Option<std::path::PathBuf>) -> std::result::Result<Option<Attachment>, CliError> {
    match path {
        Some(path) => {
            let file = Attachment::from_path(&path).await?;
            debug!(file = %file.file_name, size = %format_bytes(file.bytes.len() as u64), "Attaching file");
            Ok(Some(file))
        }
        None => Ok(None),
    }
}

async fn login(app: &App, email: &str, password: &str, remember: bool) -> CommandResult {
    let outcome = app.services.auth_service.login(email, password, remember).await?;
    println!(
        "{}",
        app.tr("auth.login_success", &params([("name", outcome.user.display_name().to_string())]))
    );
    let hint = match outcome.landing {
        Landing::Dashboard => "auth.landing_dashboard",
        Landing::Home => "auth.landing_home",
    };
    println!("{}", app.t(hint));
    Ok(())
}

async fn register(app: &App, request: RegisterRequest) -> CommandResult {
    let fallback_name = request.name.clone();
    let user = app.services.auth_service.register(request).await?;
    let name = user
        .as_ref()
        .map(|u| u.display_name().to_string())
        .unwrap_or(fallback_name);
    println!("{}", app.tr("auth.register_success", &params([("name", name)])));
    Ok(())
}

async fn home(app: &App, search: Option<&str>) -> CommandResult {
    let user = require(app, Access::Authenticated).await?;
    let feed = app.services.post_service.home_feed().await?;
    let origin = app.services.client().origin();

    println!("{}\n", app.tr("home.greeting", &params([("name", user.display_name().to_string())])));

    println!("== {} ==", app.t("home.posts"));
    let posts = filter_by_term(feed.posts, search);
    if posts.is_empty() {
        println!("{}", app.t("list.empty"));
    } else {
        print!("{}", output::post_table(&posts, &origin));
    }

    println!("\n== {} ==", app.t("home.organizations"));
    let organizations = filter_by_term(feed.organizations, search);
    if organizations.is_empty() {
        println!("{}", app.t("list.empty"));
    } else {
        print!("{}", output::ormawa_table(&organizations));
    }
    Ok(())
}

async fn status(app: &App) -> CommandResult {
    let health = app.services.health_check().await;
    println!("API      : {}", health.base_url);
    println!("Session  : {}", health.session_store);
    let languages: Vec<String> = app
        .i18n
        .get_stats()
        .languages
        .iter()
        .map(|l| format!("{} ({})", l.code, l.key_count))
        .collect();
    println!("Bahasa   : {}", languages.join(", "));
    if health.is_healthy() && health.authenticated {
        println!("OK");
        return Ok(());
    }
    for issue in health.get_issues() {
        println!("- {}", issue);
    }
    Ok(())
}

fn ormawa_form(base: OrmawaForm, fields: OrmawaFields) -> OrmawaForm {
    OrmawaForm {
        name: fields.name.unwrap_or(base.name),
        type_ormawa: fields.type_ormawa.unwrap_or(base.type_ormawa),
        category_ormawa: fields.category_ormawa.unwrap_or(base.category_ormawa),
        status_oprec: fields.status_oprec.unwrap_or(base.status_oprec),
        description: fields.description.unwrap_or(base.description),
        photo: base.photo,
    }
}

async fn ormawa(app: &App, cmd: OrmawaCommand) -> CommandResult {
    let service = &app.services.ormawa_service;
    match cmd {
        OrmawaCommand::List(list) => {
            require(app, Access::Authenticated).await?;
            let items = service.list().await?;
            print_page(app, items, &list, output::ormawa_table);
        }
        OrmawaCommand::Show { id } => {
            require(app, Access::Authenticated).await?;
            let profile = app.services.post_service.ormawa_profile(id).await?;
            let origin = app.services.client().origin();
            print!("{}", output::ormawa_detail(&profile.ormawa, &origin));

            println!("\n== {} ==", app.t("ormawa.posts"));
            match profile.posts {
                Ok(posts) if posts.is_empty() => println!("{}", app.t("list.empty")),
                Ok(posts) => print!("{}", output::post_table(&posts, &origin)),
                Err(e) => println!(
                    "{}",
                    app.tr(
                        "ormawa.posts_failed",
                        &params([("detail", app.i18n.error_message(&e, &app.lang))]),
                    )
                ),
            }
        }
        OrmawaCommand::Create(mut fields) => {
            require(app, Access::Admin).await?;
            let photo = attachment(fields.photo.take()).await?;
            let form = ormawa_form(OrmawaForm { photo, ..OrmawaForm::default() }, fields);
            service.create(form).await?;
            println!("{}", app.t("ormawa.created"));
        }
        OrmawaCommand::Update { id, mut fields } => {
            require(app, Access::Admin).await?;
            let existing = service.get(id).await?;
            let photo = attachment(fields.photo.take()).await?;
            let form = ormawa_form(OrmawaForm { photo, ..OrmawaForm::from_existing(&existing) }, fields);
            service.update(id, form).await?;
            println!("{}", app.t("ormawa.updated"));
        }
        OrmawaCommand::Delete { id } => {
            require(app, Access::Admin).await?;
            service.delete(id).await?;
            println!("{}", app.t("ormawa.deleted"));
        }
    }
    Ok(())
}

fn post_form(base: PostForm, fields: PostFields) -> PostForm {
    PostForm {
        title: fields.title.unwrap_or(base.title),
        description: fields.description.unwrap_or(base.description),
        status: fields.status.unwrap_or(base.status),
        ormawa_id: fields.ormawa_id.or(base.ormawa_id),
        poster: base.poster,
    }
}

async fn posts(app: &App, cmd: PostCommand) -> CommandResult {
    let service = &app.services.post_service;
    let origin = app.services.client().origin();
    match cmd {
        PostCommand::List { list, admin, ormawa_id } => {
            let items = if admin || ormawa_id.is_some() {
                require(app, Access::Admin).await?;
                match ormawa_id {
                    Some(id) => service.list_for_ormawa(id).await?,
                    None => service.list_admin().await?,
                }
            } else {
                require(app, Access::Authenticated).await?;
                service.list_public().await?
            };
            print_page(app, items, &list, |page| output::post_table(page, &origin));
        }
        PostCommand::Create(mut fields) => {
            require(app, Access::Admin).await?;
            let poster = attachment(fields.poster.take()).await?;
            let form = post_form(PostForm { poster, ..PostForm::default() }, fields);
            service.create(form).await?;
            println!("{}", app.t("posts.created"));
        }
        PostCommand::Update { id, mut fields } => {
            require(app, Access::Admin).await?;
            let existing = service
                .list_admin()
                .await?
                .into_iter()
                .find(|post| post.key() == Some(id))
                .ok_or_else(|| SiormaError::from(ApiError::NotFound { message: Some(format!("post {} not found", id)) }))?;
            let poster = attachment(fields.poster.take()).await?;
            let form = post_form(PostForm { poster, ..PostForm::from_existing(&existing) }, fields);
            service.update(id, form).await?;
            println!("{}", app.t("posts.updated"));
        }
        PostCommand::Delete { id } => {
            require(app, Access::Admin).await?;
            service.delete(id).await?;
            println!("{}", app.t("posts.deleted"));
        }
    }
    Ok(())
}

async fn registrations(app: &App, cmd: RegistrationCommand) -> CommandResult {
    let service = &app.services.registration_service;
    match cmd {
        RegistrationCommand::Submit {
            post_id,
            full_name,
            nim,
            email,
            phone,
            organization,
            reason,
            cv,
        } => {
            let user = require(app, Access::Authenticated).await?;
            let prefill = RegistrationRequest::prefilled(&user);
            let request = RegistrationRequest {
                full_name: full_name.unwrap_or(prefill.full_name),
                nim,
                email: email.unwrap_or(prefill.email),
                phone,
                organization,
                reason,
                cv: attachment(cv).await?,
            };
            service.submit(post_id, request).await?;
            println!("{}", app.t("registrations.submitted"));
        }
        RegistrationCommand::List { list, status } => {
            require(app, Access::Admin).await?;
            let items = service.list(status).await?;
            print_page(app, items, &list, output::registration_table);
        }
        RegistrationCommand::Status { id, status } => {
            require(app, Access::Admin).await?;
            service.update_status(id, status).await?;
            println!(
                "{}",
                app.tr("registrations.status_updated", &params([("status", status.to_string())]))
            );
        }
        RegistrationCommand::ViewCv { id } => {
            require(app, Access::Admin).await?;
            let blob = service.view_cv(id).await?;
            let dir = std::env::temp_dir().join("siorma-cv");
            let path = blob.save_in(&dir, &format!("CV_{}.pdf", id)).await?;
            println!(
                "{}",
                app.tr("registrations.cv_saved", &params([("path", path.display().to_string())]))
            );
        }
        RegistrationCommand::DownloadCv { id, out, fallback_name } => {
            require(app, Access::Admin).await?;
            let blob = service.download_cv(id, &fallback_name).await?;
            let path = blob.save_in(&out, &format!("{}_{}", fallback_name, id)).await?;
            println!(
                "{}",
                app.tr("registrations.cv_saved", &params([("path", path.display().to_string())]))
            );
        }
        RegistrationCommand::Delete { id } => {
            require(app, Access::Admin).await?;
            service.delete(id).await?;
            println!("{}", app.t("registrations.deleted"));
        }
        RegistrationCommand::Stats => {
            require(app, Access::Admin).await?;
            let items = service.list(None).await?;
            let stats = service.stats(&items);
            println!(
                "{}",
                app.tr(
                    "registrations.stats",
                    &params([
                        ("total", stats.total.to_string()),
                        ("pending", stats.pending.to_string()),
                        ("approved", stats.approved.to_string()),
                        ("rejected", stats.rejected.to_string()),
                    ]),
                )
            );
        }
    }
    Ok(())
}

async fn users(app: &App, cmd: UserCommand) -> CommandResult {
    require(app, Access::Admin).await?;
    let service = &app.services.user_service;
    match cmd {
        UserCommand::List(list) => {
            let directory = service.list().await?;
            let roles = directory.role_names();
            print_page(app, directory.users, &list, output::user_table);
            if !roles.is_empty() {
                println!("{}", app.tr("users.roles", &params([("roles", roles.join(", "))])));
            }
        }
        UserCommand::Create {
            name,
            email,
            role,
            password,
            password_confirmation,
        } => {
            let user = NewUser::new(&name, &email, &role, &password, password_confirmation.as_deref())?;
            service.create(user).await?;
            println!("{}", app.t("users.created"));
        }
        UserCommand::Update { id, name, email, role } => {
            let existing = service
                .list()
                .await?
                .users
                .into_iter()
                .find(|user| user.id == Some(id))
                .ok_or_else(|| SiormaError::from(ApiError::NotFound { message: Some(format!("user {} not found", id)) }))?;
            let update = UserUpdate {
                name: name.unwrap_or(existing.name),
                email: email.unwrap_or(existing.email),
                role: role.unwrap_or(existing.role),
            };
            service.update(id, update).await?;
            println!("{}", app.t("users.updated"));
        }
        UserCommand::Delete { id } => {
            service.delete(id).await?;
            println!("{}", app.t("users.deleted"));
        }
    }
    Ok(())
}
