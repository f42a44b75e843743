use std::io;

use actix_cors::Cors;
use actix_web::{
    middleware::{self, Condition},
    web::Data,
    App, HttpServer,
};
use clap::Parser;
use person_service::runtime::runtime::Runtime;

use crate::config::Cli;

mod api;
mod config;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Cli::parse();

    let options = args
        .service_options()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let runtime = Runtime::start(options)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let service = runtime.service();
    let log_http = args.log_http;

    log::info!("starting HTTP server on {}:{}.", args.address, args.port);

    // Actix handles ctrl-c, once the server has stopped the listener is stopped too
    let result = HttpServer::new(move || {
        App::new()
            .app_data(Data::new(service.clone()))
            .configure(api::configure)
            .wrap(Cors::permissive())
            .wrap(Condition::new(log_http, middleware::Logger::default()))
    })
    .workers(args.http_workers)
    .bind((args.address.clone(), args.port))?
    .run()
    .await;

    let processed = runtime.shutdown().await;

    log::info!("Shut down [Persisted this run: {}]", processed);

    result
}
