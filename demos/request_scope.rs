//! Serves simulated requests on worker threads, one injector clone each.
//!
//! Shared services are registered once on the root injector. Every request
//! clones it and registers its own request and response writer, so the
//! per-request values never leak between workers.

use katana_di::{Injector, Lifetime};
use std::error::Error;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

trait ResponseWriter: Send + Sync {
    fn write(&self, status: u16, body: String);
}

#[derive(Default)]
struct BufferedResponse {
    written: Mutex<Option<(u16, String)>>,
}

impl ResponseWriter for BufferedResponse {
    fn write(&self, status: u16, body: String) {
        *self.written.lock().unwrap() = Some((status, body));
    }
}

struct Request {
    path: String,
}

struct User {
    id: &'static str,
    name: &'static str,
}

struct Database {
    users: Vec<User>,
}

impl Database {
    fn new() -> Self {
        Self {
            users: vec![
                User { id: "1", name: "borges" },
                User { id: "2", name: "diego" },
            ],
        }
    }
}

struct Renderer {
    writer: Arc<dyn ResponseWriter>,
}

impl Renderer {
    fn json(&self, status: u16, users: &[User]) {
        let items: Vec<String> = users
            .iter()
            .map(|u| format!(r#"{{"id":"{}","name":"{}"}}"#, u.id, u.name))
            .collect();
        self.writer.write(status, format!("[{}]", items.join(",")));
    }

    fn not_found(&self, path: &str) {
        self.writer.write(404, format!("no route for {path}"));
    }
}

fn handle(root: &Injector, path: &str) -> Result<(u16, String), Box<dyn Error + Send + Sync>> {
    let response = Arc::new(BufferedResponse::default());

    let mut injector = root.clone();
    injector
        .provide_value_as::<dyn ResponseWriter>(response.clone())?
        .provide_value(Request {
            path: path.to_string(),
        })?;

    let mut request: Option<Arc<Request>> = None;
    let mut renderer: Option<Arc<Renderer>> = None;
    let mut database: Option<Arc<Database>> = None;
    injector.resolve(&mut [&mut request, &mut renderer, &mut database])?;

    let (request, renderer, database) = match (request, renderer, database) {
        (Some(r), Some(w), Some(d)) => (r, w, d),
        _ => return Err("resolution left a slot empty".into()),
    };

    match request.path.as_str() {
        "/users" => renderer.json(200, &database.users),
        other => renderer.not_found(other),
    }

    let written = response.written.lock().unwrap().take();
    written.ok_or_else(|| "handler wrote no response".into())
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_thread_names(true)
        .init();

    let mut root = Injector::new();
    root.provide(Lifetime::Singleton, Database::new)?
        .provide_new(|writer: Arc<dyn ResponseWriter>| Renderer { writer })?;

    let paths = ["/users", "/admin", "/users", "/users"];
    let results = Mutex::new(Vec::new());

    std::thread::scope(|s| {
        for (worker, path) in paths.iter().enumerate() {
            let root = &root;
            let results = &results;
            std::thread::Builder::new()
                .name(format!("worker-{worker}"))
                .spawn_scoped(s, move || {
                    let outcome = handle(root, path).map_err(|e| e.to_string());
                    results.lock().unwrap().push((worker, *path, outcome));
                })
                .map(|_| ())
                .unwrap_or_else(|e| tracing::error!(error = %e, "failed to spawn worker"));
        }
    });

    let mut results = results.into_inner().unwrap_or_default();
    results.sort_by_key(|(worker, _, _)| *worker);
    for (worker, path, outcome) in results {
        match outcome {
            Ok((status, body)) => println!("worker-{worker} {path} -> {status} {body}"),
            Err(error) => println!("worker-{worker} {path} -> error: {error}"),
        }
    }

    // The root injector never saw any request
    println!("root knows requests: {}", root.contains::<Request>());
    Ok(())
}
