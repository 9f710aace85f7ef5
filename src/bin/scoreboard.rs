//! Scoreboard HTTP service
//!
//! Env:
//! - `SCOREBOARD_ADDR`        full socket address (wins over `PORT`)
//! - `PORT`                   port on 0.0.0.0, default 3000
//! - `SCOREBOARD_FILE`        JSON file to persist scores to (memory only if unset)
//! - `SCOREBOARD_STATIC_DIR`  static files, default `public`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::env;
    use std::net::SocketAddr;
    use std::path::PathBuf;

    use anyhow::Context;

    use alitu_runner::leaderboard::LeaderboardStore;
    use alitu_runner::server::{AppState, router};

    const DEFAULT_PORT: u16 = 3000;

    pub fn resolve_addr(get_env: impl Fn(&str) -> Option<String>) -> SocketAddr {
        if let Some(addr) = get_env("SCOREBOARD_ADDR").and_then(|v| v.parse().ok()) {
            return addr;
        }
        let port = get_env("PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        SocketAddr::from(([0, 0, 0, 0], port))
    }

    pub fn resolve_static_dir(get_env: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
        let dir = PathBuf::from(get_env("SCOREBOARD_STATIC_DIR").unwrap_or_else(|| "public".into()));
        dir.is_dir().then_some(dir)
    }

    pub async fn run() -> anyhow::Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let get_env = |k: &str| env::var(k).ok();
        let store = match get_env("SCOREBOARD_FILE") {
            Some(path) => LeaderboardStore::open(path),
            None => LeaderboardStore::in_memory(),
        };
        let static_dir = resolve_static_dir(get_env);
        if static_dir.is_none() {
            log::info!("No static directory, serving API only");
        }
        let app = router(AppState::new(store), static_dir);

        let addr = resolve_addr(get_env);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("binding {addr}"))?;
        log::info!("Server running at http://{addr}");

        axum::serve(listener, app).await.context("serving scoreboard")?;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    native::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::native::*;
    use std::net::SocketAddr;

    #[test]
    fn resolve_addr_defaults_to_3000() {
        let addr = resolve_addr(|_| None);
        assert_eq!(addr, SocketAddr::from(([0, 0, 0, 0], 3000)));
    }

    #[test]
    fn resolve_addr_prefers_explicit_addr() {
        let addr = resolve_addr(|k| match k {
            "SCOREBOARD_ADDR" => Some("127.0.0.1:4555".to_string()),
            "PORT" => Some("9999".to_string()),
            _ => None,
        });
        assert_eq!(addr, "127.0.0.1:4555".parse().unwrap());
    }

    #[test]
    fn resolve_addr_accepts_port_env() {
        let addr = resolve_addr(|k| match k {
            "PORT" => Some("8080".to_string()),
            _ => None,
        });
        assert_eq!(addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
    }

    #[test]
    fn resolve_addr_ignores_invalid_values() {
        let addr = resolve_addr(|k| match k {
            "SCOREBOARD_ADDR" => Some("not-an-addr".to_string()),
            "PORT" => Some("nope".to_string()),
            _ => None,
        });
        assert_eq!(addr, SocketAddr::from(([0, 0, 0, 0], 3000)));
    }

    #[test]
    fn resolve_static_dir_skips_missing_directory() {
        let dir = resolve_static_dir(|_| Some("/definitely/not/a/dir".to_string()));
        assert_eq!(dir, None);
    }
}
