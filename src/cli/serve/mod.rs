//! Edge preview server.
//!
//! Serves the output tree behind the same decisions the production edge
//! makes: every request goes through [`EdgeRouter::decide`] with the locale
//! cookie and `Accept-Language` as hints.
//!
//! | Decision  | Response                                                |
//! |-----------|---------------------------------------------------------|
//! | redirect  | `308` with `Location`                                   |
//! | rewrite   | the rewritten file                                      |
//! | allow     | the file (directories resolve to `index.html`)          |
//! | no file   | admin SPA fallback, else `404.html` or the embedded 404 |

mod hints;
mod lifecycle;
mod path;
mod response;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use tiny_http::{Request, Server};

use crate::config::SiteConfig;
use crate::core::{LocaleHints, UrlPath, is_shutdown};
use crate::router::{EdgeRouter, RouteAction, RouteRules};
use crate::utils::path::relative_display;
use crate::{debug, log};
use hints::RequestHints;

/// Everything a request handler needs, shared across workers.
struct ServeContext {
    edge: EdgeRouter,
    root: PathBuf,
    cookie_name: String,
    /// Default locale home, linked from the embedded 404 page.
    home: String,
}

impl ServeContext {
    fn new(config: &SiteConfig) -> Self {
        Self {
            edge: EdgeRouter::new(RouteRules::from_config(config)),
            root: config.output_dir().to_path_buf(),
            cookie_name: config.site.locale_cookie.clone(),
            home: format!("/{}/", config.site.default_locale),
        }
    }
}

/// Run the `serve` command (blocking until Ctrl+C).
pub fn serve_site(config: &SiteConfig) -> Result<()> {
    let output = config.output_dir();
    if !output.is_dir() {
        bail!(
            "output directory `{}` does not exist, run `build` first",
            relative_display(output, config.get_root())
        );
    }

    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    lifecycle::register_server_for_shutdown(&server);

    log!("serve"; "http://{}", addr);
    log!("serve"; "serving {}", relative_display(output, config.get_root()));

    let ctx = Arc::new(ServeContext::new(config));
    run_request_loop(&server, &ctx)?;

    log!("serve"; "stopped");
    Ok(())
}

fn run_request_loop(server: &Server, ctx: &Arc<ServeContext>) -> Result<()> {
    let pool = lifecycle::request_pool()?;

    for request in server.incoming_requests() {
        let ctx = Arc::clone(ctx);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &ctx) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, ctx: &ServeContext) -> Result<()> {
    if is_shutdown() {
        return response::respond_unavailable(request);
    }

    let url = request.url().to_string();
    let hints = RequestHints::from_request(&request, &ctx.cookie_name);
    let decision = ctx.edge.decide(
        &url,
        LocaleHints {
            cookie: hints.cookie.as_deref(),
            accept_language: hints.accept_language.as_deref(),
        },
    );
    debug!("serve"; "{} {}", url, decision);

    match (decision.action, decision.target.as_deref()) {
        (RouteAction::Redirect, Some(target)) => response::respond_redirect(request, target),
        (RouteAction::Rewrite, Some(target)) => {
            let rewritten = UrlPath::from_browser(target);
            match path::resolve_path(&rewritten, &ctx.root) {
                Some(file) => response::respond_file(request, &file),
                None => response::respond_not_found(request, &ctx.root, &rewritten, &ctx.home),
            }
        }
        _ => serve_allowed(request, &url, ctx),
    }
}

fn serve_allowed(request: Request, url: &str, ctx: &ServeContext) -> Result<()> {
    let requested = UrlPath::from_browser(url);
    if let Some(file) = path::resolve_path(&requested, &ctx.root) {
        return response::respond_file(request, &file);
    }

    let fallback = ctx
        .edge
        .rewrite_missing(url)
        .and_then(|d| d.target)
        .and_then(|target| path::resolve_path(&UrlPath::from_browser(&target), &ctx.root));
    match fallback {
        Some(file) => response::respond_file(request, &file),
        None => response::respond_not_found(request, &ctx.root, &requested, &ctx.home),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config_at;
    use std::fs;
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpStream};
    use std::thread;
    use tempfile::TempDir;

    /// Serve exactly `count` requests on an ephemeral port.
    fn start(config: &SiteConfig, count: usize) -> (SocketAddr, thread::JoinHandle<()>) {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let ctx = ServeContext::new(config);
        let handle = thread::spawn(move || {
            for _ in 0..count {
                let request = server.recv().unwrap();
                handle_request(request, &ctx).unwrap();
            }
        });
        (addr, handle)
    }

    fn get(addr: SocketAddr, target: &str, headers: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        write!(
            stream,
            "GET {target} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n{headers}\r\n"
        )
        .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    fn site() -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        for (rel, body) in [
            ("index.html", "root"),
            ("en/index.html", "english home"),
            ("zh-CN/brands/cree/products/55555/index.html", "product page"),
            ("studio/index.html", "studio app"),
        ] {
            let path = out.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, body).unwrap();
        }
        let config = test_config_at(dir.path(), "");
        (dir, config)
    }

    #[test]
    fn test_locale_redirect_uses_hints() {
        let (_dir, config) = site();
        let (addr, handle) = start(&config, 3);

        let plain = get(addr, "/brands/cree/products?x=1", "");
        assert!(plain.starts_with("HTTP/1.1 308"), "{plain}");
        assert!(plain.contains("Location: /zh-CN/brands/cree/products/?x=1"));

        let by_cookie = get(addr, "/about", "Cookie: NEXT_LOCALE=en\r\n");
        assert!(by_cookie.contains("Location: /en/about"));

        let by_header = get(addr, "/about", "Accept-Language: en-US,en;q=0.9\r\n");
        assert!(by_header.contains("Location: /en/about"));

        handle.join().unwrap();
    }

    #[test]
    fn test_serves_files_and_fallbacks() {
        let (_dir, config) = site();
        let (addr, handle) = start(&config, 4);

        let page = get(addr, "/zh-CN/brands/cree/products/55555/", "");
        assert!(page.starts_with("HTTP/1.1 200"));
        assert!(page.ends_with("product page"));

        let admin = get(addr, "/studio/desk/product", "");
        assert!(admin.starts_with("HTTP/1.1 200"));
        assert!(admin.ends_with("studio app"));

        let missing = get(addr, "/en/brands/nope/", "");
        assert!(missing.starts_with("HTTP/1.1 404"));
        assert!(missing.contains("/en/brands/nope/"));

        let admin_root = get(addr, "/studio", "");
        assert!(admin_root.contains("Location: /studio/"));

        handle.join().unwrap();
    }

    #[test]
    fn test_custom_not_found() {
        let (_dir, config) = site();
        fs::write(config.output_dir().join("404.html"), "custom 404").unwrap();
        let (addr, handle) = start(&config, 1);

        let missing = get(addr, "/en/nope/", "");
        assert!(missing.starts_with("HTTP/1.1 404"));
        assert!(missing.ends_with("custom 404"));

        handle.join().unwrap();
    }
}
