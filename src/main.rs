// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cushion CLI - CouchDB from the command line
//!
//! Server and credentials come from `CUSHION_*` environment variables.

use std::env;
use std::process::ExitCode;

use anyhow::{bail, Context};
use cushion::{ClientConfig, CouchClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cushion=info")),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    let Some(command) = args.first() else {
        print_usage();
        return ExitCode::from(1);
    };

    match command.as_str() {
        "--help" | "-h" | "help" => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        "--version" | "-v" | "version" => {
            println!("cushion {}", cushion::VERSION);
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    match run(command, &args[1..]).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"Cushion - CouchDB client

USAGE:
    cushion <COMMAND> [ARGS]

COMMANDS:
    create-db <db>                                       Create a database
    delete-db <db>                                       Delete a database
    put-doc <db> <id> <json>                             Create or update a document
    get-doc <db> <id>                                    Print a document
    delete-doc <db> <id> <rev>                           Delete a document revision
    put-attachment <db> <id> <rev> <name> <type> <file>  Upload a file as an attachment
    read-attachment <db> <id> <name> [file]              Download an attachment
    help                                                 Show this help message
    version                                              Show version information

ENVIRONMENT:
    CUSHION_URL               Server URL (default http://localhost:5984)
    CUSHION_USERNAME          Username for session authentication
    CUSHION_PASSWORD          Password for session authentication
    CUSHION_MAX_CONCURRENT    Concurrent operations (default 4)
    CUSHION_TIMEOUT_SECS      Request timeout in seconds (default 30)
    RUST_LOG                  Log filter (default cushion=info)

EXAMPLES:
    cushion create-db animals
    cushion put-doc animals aardvark '{{"legs": 4}}'
    cushion put-attachment animals aardvark 1-abc photo.jpg image/jpeg ./photo.jpg
"#
    );
}

fn expect_args<'a>(args: &'a [String], names: &[&str], usage: &str) -> anyhow::Result<&'a [String]> {
    if args.len() < names.len() {
        bail!("missing <{}>\nUsage: cushion {}", names[args.len()], usage);
    }
    Ok(args)
}

async fn run(command: &str, args: &[String]) -> anyhow::Result<()> {
    let config = ClientConfig::from_env().context("invalid configuration")?;
    let client = CouchClient::with_config(config).context("failed to create client")?;

    match command {
        "create-db" => {
            let args = expect_args(args, &["db"], "create-db <db>")?;
            client.create_database(&args[0]).await?;
            println!("Created database {}", args[0]);
        }
        "delete-db" => {
            let args = expect_args(args, &["db"], "delete-db <db>")?;
            client.delete_database(&args[0]).await?;
            println!("Deleted database {}", args[0]);
        }
        "put-doc" => {
            let args = expect_args(args, &["db", "id", "json"], "put-doc <db> <id> <json>")?;
            let body: serde_json::Value =
                serde_json::from_str(&args[2]).context("document is not valid JSON")?;
            let rev = client.put_document(&args[0], &args[1], &body).await?;
            println!("{} {}", rev.id, rev.rev);
        }
        "get-doc" => {
            let args = expect_args(args, &["db", "id"], "get-doc <db> <id>")?;
            let doc: serde_json::Value = client.get_document(&args[0], &args[1]).await?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        "delete-doc" => {
            let args = expect_args(args, &["db", "id", "rev"], "delete-doc <db> <id> <rev>")?;
            let rev = client.delete_document(&args[0], &args[1], &args[2]).await?;
            println!("{} {}", rev.id, rev.rev);
        }
        "put-attachment" => {
            let args = expect_args(
                args,
                &["db", "id", "rev", "name", "type", "file"],
                "put-attachment <db> <id> <rev> <name> <type> <file>",
            )?;
            let data = tokio::fs::read(&args[5])
                .await
                .with_context(|| format!("failed to read {}", args[5]))?;
            let rev = client
                .put_attachment(&args[0], &args[1], &args[2], &args[3], &args[4], data)
                .await?;
            println!("{} {}", rev.id, rev.rev);
        }
        "read-attachment" => {
            let args = expect_args(
                args,
                &["db", "id", "name"],
                "read-attachment <db> <id> <name> [file]",
            )?;
            let data = client.read_attachment(&args[0], &args[1], &args[2]).await?;
            match args.get(3) {
                Some(path) => {
                    tokio::fs::write(path, &data)
                        .await
                        .with_context(|| format!("failed to write {}", path))?;
                    println!("Wrote {} bytes to {}", data.len(), path);
                }
                None => {
                    use tokio::io::AsyncWriteExt;
                    tokio::io::stdout().write_all(&data).await?;
                }
            }
        }
        cmd => {
            print_usage();
            bail!("unknown command: {}", cmd);
        }
    }

    let report = client.metrics();
    tracing::debug!(
        exchanges = report.exchanges,
        retries = report.retries,
        session_requests = report.session_requests,
        "Done"
    );

    Ok(())
}
