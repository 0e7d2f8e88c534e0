//! Echo remoting gateway example
//!
//! Run with: cargo run --example echo_gateway [BIND_ADDR] [--payload] [--log FILE]
//!
//! Examples:
//!   cargo run --example echo_gateway                         # binds to 0.0.0.0:1234
//!   cargo run --example echo_gateway localhost               # binds to 127.0.0.1:1234
//!   cargo run --example echo_gateway 127.0.0.1:5080 --payload
//!   cargo run --example echo_gateway --log gateway-test.log
//!
//! By default every addressed call is answered with a description of how
//! the gateway saw it (method, request id, first argument type, argument
//! count, hex dump). With `--payload` a single argument is echoed back
//! verbatim, like the Red5 echo test expects.
//!
//! Point a NetConnection at http://localhost:1234/gateway and call any
//! method; call `fail` to get an onStatus reply instead of onResult.

use std::net::SocketAddr;

use amf_gateway::server::config::DEFAULT_PORT;
use amf_gateway::{EchoResponder, GatewayServer, PayloadEcho, Responder, ServerConfig};

/// Parse bind address from command line argument
///
/// Accepts formats:
/// - "localhost" -> 127.0.0.1:1234
/// - "localhost:5080" -> 127.0.0.1:5080
/// - "127.0.0.1" -> 127.0.0.1:1234
/// - "0.0.0.0:5080" -> 0.0.0.0:5080
fn parse_bind_addr(arg: &str) -> Result<SocketAddr, String> {
    let normalized = arg.replace("localhost", "127.0.0.1");

    if let Ok(addr) = normalized.parse::<SocketAddr>() {
        return Ok(addr);
    }

    if let Ok(ip) = normalized.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    Err(format!(
        "Invalid bind address: '{}'. Expected format: IP:PORT or IP or 'localhost'",
        arg
    ))
}

fn print_usage() {
    eprintln!("Usage: echo_gateway [BIND_ADDR] [--payload] [--log FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  BIND_ADDR    Address to bind to (default: 0.0.0.0:{})", DEFAULT_PORT);
    eprintln!("  --payload    Echo the single argument instead of the diagnostic record");
    eprintln!("  --log FILE   Append one line per call to FILE");
}

async fn serve<R: Responder>(config: ServerConfig, responder: R) -> Result<(), Box<dyn std::error::Error>> {
    let server = GatewayServer::new(config, responder)?;
    server
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
            println!("\nShutting down...");
        })
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let mut config = ServerConfig::default();
    let mut echo_payload = false;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--payload" => echo_payload = true,
            "--log" => match iter.next() {
                Some(path) => config = config.result_log(path),
                None => {
                    eprintln!("Error: --log needs a file name");
                    print_usage();
                    std::process::exit(1);
                }
            },
            addr => match parse_bind_addr(addr) {
                Ok(addr) => config = config.bind(addr),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    eprintln!();
                    print_usage();
                    std::process::exit(1);
                }
            },
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("amf_gateway=debug".parse()?)
                .add_directive("echo_gateway=debug".parse()?),
        )
        .init();

    println!("Starting remoting gateway on http://{}/gateway", config.bind_addr);
    if let Some(path) = &config.result_log {
        println!("Logging calls to {}", path.display());
    }

    if echo_payload {
        serve(config, PayloadEcho).await
    } else {
        serve(config, EchoResponder).await
    }
}
