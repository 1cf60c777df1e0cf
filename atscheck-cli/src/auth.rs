//! Account commands and on-disk session storage for the ATS check CLI.

use crate::CliResult;
use crate::api::{ApiError, AuthResponse, LoginRequest, RegisterRequest, ResumeApi};
use atscheck_core::{Session, SessionUser, View};
use clap::Args;
use log::warn;
use std::path::{Path, PathBuf};

/// CLI arguments for the login command.
#[derive(Args, Clone, Debug)]
pub struct LoginArgs {
    /// Account email.
    #[arg(long)]
    pub email: String,
    /// Account password.
    #[arg(long, env = "ATSCHECK_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// CLI arguments for the register command.
#[derive(Args, Clone, Debug)]
pub struct RegisterArgs {
    /// Account email.
    #[arg(long)]
    pub email: String,
    /// Account password.
    #[arg(long, env = "ATSCHECK_PASSWORD", hide_env_values = true)]
    pub password: String,
    /// Given name.
    #[arg(long)]
    pub first_name: String,
    /// Family name.
    #[arg(long)]
    pub last_name: String,
}

/// Log in and store the session token.
pub(crate) async fn run_login<A: ResumeApi>(
    api: &A,
    args: LoginArgs,
    session_path: &Path,
) -> CliResult<()> {
    let request = LoginRequest {
        email: args.email.trim().to_string(),
        password: args.password,
    };
    let response = api.login(&request).await?;
    let session = store_auth_response(session_path, response).await?;
    print_authenticated(&session, session_path);
    Ok(())
}

/// Create an account and store the session token.
pub(crate) async fn run_register<A: ResumeApi>(
    api: &A,
    args: RegisterArgs,
    session_path: &Path,
) -> CliResult<()> {
    let request = RegisterRequest {
        email: args.email.trim().to_string(),
        password: args.password,
        first_name: args.first_name.trim().to_string(),
        last_name: args.last_name.trim().to_string(),
    };
    let response = api.register(&request).await?;
    let session = store_auth_response(session_path, response).await?;
    print_authenticated(&session, session_path);
    Ok(())
}

/// Clear the stored credentials.
pub(crate) async fn run_logout(session_path: &Path) -> CliResult<()> {
    let mut session = read_session(session_path).await?;
    session.logout();
    write_session(session_path, &session).await?;
    println!("Logged out.");
    Ok(())
}

/// Print who is logged in and the last visited view.
pub(crate) async fn run_whoami(session_path: &Path) -> CliResult<()> {
    let session = read_session(session_path).await?;
    println!("{}", describe_session(&session));
    Ok(())
}

fn describe_session(session: &Session) -> String {
    match (&session.user, session.is_authenticated()) {
        (Some(user), true) => format!(
            "Logged in as {} <{}>. Current view: {}.",
            user.display_name(),
            user.email,
            describe_view(&session.current_view)
        ),
        _ => "Not logged in.".to_string(),
    }
}

fn describe_view(view: &View) -> String {
    match view {
        View::Landing => "landing".to_string(),
        View::Login => "login".to_string(),
        View::Register => "register".to_string(),
        View::Dashboard => "dashboard".to_string(),
        View::Results(id) => format!("results for resume {id}"),
    }
}

fn print_authenticated(session: &Session, session_path: &Path) {
    if let Some(user) = session.user.as_ref() {
        println!(
            "Authenticated as {}. Session stored at {}.",
            user.display_name(),
            session_path.display()
        );
    }
}

async fn store_auth_response(session_path: &Path, response: AuthResponse) -> CliResult<Session> {
    let mut session = read_session(session_path).await?;
    let user = SessionUser {
        email: response.email,
        first_name: response.first_name.unwrap_or_default(),
        last_name: response.last_name.unwrap_or_default(),
    };
    session.login(response.token, user);
    write_session(session_path, &session).await?;
    Ok(session)
}

/// Clear the stored session when the backend rejected its token.
pub(crate) async fn expire_on_unauthorized<T>(
    result: CliResult<T>,
    session: &mut Session,
    session_path: &Path,
) -> CliResult<T> {
    if let Err(err) = &result {
        if matches!(err.downcast_ref::<ApiError>(), Some(ApiError::Unauthorized)) {
            warn!("session token rejected; clearing {}", session_path.display());
            session.logout();
            session.navigate(View::Login);
            write_session(session_path, session).await?;
        }
    }
    result
}

/// Resolve the local path where the session is stored.
pub(crate) fn session_store_path(session_path: Option<PathBuf>) -> CliResult<PathBuf> {
    if let Some(path) = session_path {
        return Ok(path);
    }
    if let Ok(path) = std::env::var("ATSCHECK_SESSION_PATH") {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    if let Ok(base) = std::env::var("XDG_CONFIG_HOME") {
        if !base.trim().is_empty() {
            return Ok(PathBuf::from(base).join("atscheck").join("session.json"));
        }
    }
    if let Ok(home) = std::env::var("HOME") {
        if !home.trim().is_empty() {
            return Ok(PathBuf::from(home).join(".config/atscheck/session.json"));
        }
    }
    Err("unable to resolve session storage path".into())
}

/// Load the session, or an anonymous one when none is stored.
pub(crate) async fn read_session(path: &Path) -> CliResult<Session> {
    match tokio::fs::read(path).await {
        Ok(contents) => Ok(serde_json::from_slice(&contents)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Session::default()),
        Err(err) => Err(err.into()),
    }
}

/// Persist the session JSON to disk.
pub(crate) async fn write_session(path: &Path, session: &Session) -> CliResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let payload = serde_json::to_vec_pretty(session)?;
    tokio::fs::write(path, payload).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ReqwestResumeApi;
    use crate::tests::unique_dir_name;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::sync::{Mutex, OnceLock};

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
            .lock()
            .expect("env lock")
    }

    struct EnvGuard {
        key: &'static str,
        prev: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: Option<&str>) -> Self {
            let prev = std::env::var(key).ok();
            match value {
                Some(value) => unsafe { std::env::set_var(key, value) },
                None => unsafe { std::env::remove_var(key) },
            }
            Self { key, prev }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(prev) = self.prev.take() {
                unsafe { std::env::set_var(self.key, prev) };
            } else {
                unsafe { std::env::remove_var(self.key) };
            }
        }
    }

    fn temp_session_path() -> PathBuf {
        std::env::temp_dir()
            .join(unique_dir_name())
            .join("session.json")
    }

    fn cleanup(path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn session_store_path_prefers_explicit_path() {
        let path = session_store_path(Some(PathBuf::from("/tmp/custom.json"))).expect("path");
        assert_eq!(path, PathBuf::from("/tmp/custom.json"));
    }

    #[test]
    fn session_store_path_uses_env_then_xdg_then_home() {
        let _lock = env_lock();
        let _session = EnvGuard::set("ATSCHECK_SESSION_PATH", Some("/tmp/env-session.json"));
        let _xdg = EnvGuard::set("XDG_CONFIG_HOME", Some("/tmp/xdg"));
        let _home = EnvGuard::set("HOME", Some("/tmp/home"));
        assert_eq!(
            session_store_path(None).expect("env path"),
            PathBuf::from("/tmp/env-session.json")
        );

        let _session = EnvGuard::set("ATSCHECK_SESSION_PATH", None);
        assert_eq!(
            session_store_path(None).expect("xdg path"),
            PathBuf::from("/tmp/xdg/atscheck/session.json")
        );

        let _xdg = EnvGuard::set("XDG_CONFIG_HOME", None);
        assert_eq!(
            session_store_path(None).expect("home path"),
            PathBuf::from("/tmp/home/.config/atscheck/session.json")
        );

        let _home = EnvGuard::set("HOME", None);
        assert!(session_store_path(None).is_err());
    }

    #[tokio::test]
    async fn read_session_defaults_when_missing() {
        let path = temp_session_path();
        let session = read_session(&path).await.expect("session");
        assert_eq!(session, Session::default());
    }

    #[tokio::test]
    async fn write_then_read_session() {
        let path = temp_session_path();
        let mut session = Session::default();
        session.login(
            "token-1",
            SessionUser {
                email: "jane@example.com".to_string(),
                ..SessionUser::default()
            },
        );
        session.navigate(View::Results(3));
        write_session(&path, &session).await.expect("write");

        let loaded = read_session(&path).await.expect("read");
        assert_eq!(loaded, session);
        cleanup(&path);
    }

    #[tokio::test]
    async fn login_stores_session_and_logout_clears_it() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/auth/login");
                then.status(200).json_body(json!({
                    "token": "token-1",
                    "email": "jane@example.com",
                    "firstName": "Jane",
                    "lastName": "Doe"
                }));
            })
            .await;
        let api = ReqwestResumeApi::new(&server.url("/api")).expect("client");
        let path = temp_session_path();

        run_login(
            &api,
            LoginArgs {
                email: " jane@example.com ".to_string(),
                password: "secret".to_string(),
            },
            &path,
        )
        .await
        .expect("login");

        let session = read_session(&path).await.expect("session");
        assert_eq!(session.require_token().expect("token"), "token-1");
        assert_eq!(session.current_view, View::Dashboard);
        assert_eq!(
            describe_session(&session),
            "Logged in as Jane Doe <jane@example.com>. Current view: dashboard."
        );

        run_logout(&path).await.expect("logout");
        let session = read_session(&path).await.expect("session");
        assert!(!session.is_authenticated());
        assert_eq!(describe_session(&session), "Not logged in.");
        cleanup(&path);
    }

    #[tokio::test]
    async fn register_posts_profile_and_stores_session() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/auth/register").json_body(json!({
                    "email": "sam@example.com",
                    "password": "pw",
                    "firstName": "Sam",
                    "lastName": "Lee"
                }));
                then.status(200).json_body(json!({
                    "token": "token-2",
                    "email": "sam@example.com",
                    "firstName": "Sam",
                    "lastName": "Lee"
                }));
            })
            .await;
        let api = ReqwestResumeApi::new(&server.url("/api")).expect("client");
        let path = temp_session_path();

        run_register(
            &api,
            RegisterArgs {
                email: "sam@example.com".to_string(),
                password: "pw".to_string(),
                first_name: "Sam".to_string(),
                last_name: "Lee".to_string(),
            },
            &path,
        )
        .await
        .expect("register");

        mock.assert_async().await;
        let session = read_session(&path).await.expect("session");
        assert_eq!(
            session.user.map(|user| user.display_name()).as_deref(),
            Some("Sam Lee")
        );
        cleanup(&path);
    }

    #[tokio::test]
    async fn failed_login_leaves_session_untouched() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/auth/login");
                then.status(400).body("Invalid credentials");
            })
            .await;
        let api = ReqwestResumeApi::new(&server.url("/api")).expect("client");
        let path = temp_session_path();

        let err = run_login(
            &api,
            LoginArgs {
                email: "jane@example.com".to_string(),
                password: "bad".to_string(),
            },
            &path,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("Invalid credentials"));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn unauthorized_result_clears_session() {
        let path = temp_session_path();
        let mut session = Session::default();
        session.login("stale", SessionUser::default());
        write_session(&path, &session).await.expect("write");

        let result: CliResult<()> = Err(ApiError::Unauthorized.into());
        let err = expire_on_unauthorized(result, &mut session, &path)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("authentication required"));
        let stored = read_session(&path).await.expect("read");
        assert!(!stored.is_authenticated());
        assert_eq!(stored.current_view, View::Login);
        cleanup(&path);
    }

    #[tokio::test]
    async fn other_errors_keep_session() {
        let path = temp_session_path();
        let mut session = Session::default();
        session.login("token", SessionUser::default());

        let result: CliResult<()> = Err("network down".into());
        assert!(expire_on_unauthorized(result, &mut session, &path).await.is_err());
        assert!(session.is_authenticated());
        assert!(!path.exists());
    }
}
