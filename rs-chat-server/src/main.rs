use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, put, web};

use serde::Deserialize;
use rs_chat_core::io::{get_filename, list_files};
use rs_chat_core::model::generator::Generator;

/// Directory scanned for lexicon files.
const DATA_DIR: &str = "./data";
/// Lexicon loaded at startup.
const DEFAULT_LEXICON: &str = "./data/lexicon.csv";

/// Struct representing query parameters for the `/v1/respond` endpoint
#[derive(Deserialize)]
struct RespondParams {
	prompt: Option<String>,
}

#[derive(Deserialize)]
struct LexiconQuery {
	name: Option<String>,
}

struct SharedData {
	generator: Generator,
	lexicon: String,
}

/// HTTP GET endpoint `/v1/respond`
///
/// Runs one full boost → generate → reset exchange for the given prompt
/// and returns the reply as the response body. The lock is held for the
/// whole exchange, so concurrent requests cannot interleave boosts and
/// resets.
#[get("/v1/respond")]
async fn get_response(data: web::Data<Mutex<SharedData>>, query: web::Query<RespondParams>) -> impl Responder {
	let prompt = match &query.prompt {
		Some(p) if !p.trim().is_empty() => p.trim().to_owned(),
		_ => return HttpResponse::BadRequest().body("Missing or empty prompt"),
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};

	HttpResponse::Ok().body(shared_data.generator.respond(&prompt))
}

/// HTTP GET endpoint `/v1/lexicons`
///
/// Lists the lexicon files available in the data directory.
#[get("/v1/lexicons")]
async fn get_lexicons() -> impl Responder {
	match list_files(DATA_DIR, "csv") {
		Ok(files) => HttpResponse::Ok().body(files.join("\n").replace(".csv", "")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list lexicons")
	}
}

/// HTTP GET endpoint `/v1/loaded_lexicon`
///
/// Returns the name of the lexicon currently backing the generator.
#[get("/v1/loaded_lexicon")]
async fn get_loaded_lexicon(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};
	HttpResponse::Ok().body(shared_data.lexicon.clone())
}

/// HTTP PUT endpoint `/v1/load_lexicon`
///
/// Parses the named lexicon, builds a fresh transition graph and swaps
/// it in. On failure the previous generator stays in place.
#[put("/v1/load_lexicon")]
async fn put_lexicon(data: web::Data<Mutex<SharedData>>, query: web::Query<LexiconQuery>) -> impl Responder {
	let name = match &query.name {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty lexicon name"),
	};

	let lexicon_path = format!("{}/{}.csv", DATA_DIR, name);
	let generator = match Generator::from_lexicon(&lexicon_path) {
		Ok(g) => g,
		Err(e) => return HttpResponse::InternalServerError().body(format!("Failed to load lexicon: {e}"))
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Generator lock failed"),
	};
	shared_data.generator = generator;
	shared_data.lexicon = name.to_owned();

	HttpResponse::Ok().body("Lexicon loaded successfully")
}

/// Main entry point for the server.
///
/// Loads the default lexicon, wraps the generator in a `Mutex` for
/// thread safety, and starts an Actix-web HTTP server.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - A default lexicon that fails to load is fatal: the system cannot
///   operate without a vocabulary.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let generator = Generator::from_lexicon(DEFAULT_LEXICON)
		.map_err(|e| std::io::Error::other(format!("Failed to load {}: {}", DEFAULT_LEXICON, e)))?;

	let shared_data = SharedData {
		generator,
		lexicon: get_filename(DEFAULT_LEXICON)?,
	};
	let shared_generator = web::Data::new(Mutex::new(shared_data));

	HttpServer::new(move || {
		App::new()
			.app_data(shared_generator.clone())
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.service(get_response)
			.service(get_lexicons)
			.service(get_loaded_lexicon)
			.service(put_lexicon)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}
