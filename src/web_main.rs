//! Web 服务器主程序入口

use glacier::web::config::proxy_options_from_env;
use glacier::web::{WebConfig, WebServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // 环境变量提供基础配置，命令行参数可以覆盖
    let mut config = WebConfig::from_env()?;
    let options = proxy_options_from_env()?;

    // 简单的命令行参数解析
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" | "-b" => {
                if i + 1 < args.len() {
                    config.bind_addr = args[i + 1].clone();
                    i += 2;
                } else {
                    eprintln!("Error: --bind requires an address");
                    std::process::exit(1);
                }
            }
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    config.port = args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("Error: Invalid port number");
                        std::process::exit(1);
                    });
                    i += 2;
                } else {
                    eprintln!("Error: --port requires a port number");
                    std::process::exit(1);
                }
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("Error: Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    let server = WebServer::new(config, options);
    server.start().await?;

    Ok(())
}

fn print_help() {
    println!("Glacier Web Proxy");
    println!();
    println!("USAGE:");
    println!("    glacier-web [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -b, --bind <ADDRESS>     Bind address [default: 127.0.0.1]");
    println!("    -p, --port <PORT>        Port number [default: 7080]");
    println!("    -h, --help               Print help information");
    println!();
    println!("ENVIRONMENT:");
    println!("    GLACIER_BIND             Bind address");
    println!("    GLACIER_PORT             Listen port");
    println!("    GLACIER_FETCH_TIMEOUT    Outbound fetch timeout in seconds [default: 30]");
    println!("    GLACIER_INSECURE_TLS     Disable outbound TLS verification [default: true]");
    println!("    GLACIER_DEBUG_TOOLS      Inject eruda debug console [default: true]");
    println!();
    println!("EXAMPLES:");
    println!("    glacier-web");
    println!("    glacier-web --bind 0.0.0.0 --port 3000");
}
