mod cli;
use cli::{CliMode, parse_cli_mode, run_plan_mode, run_templates_mode, usage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();

    let mode = match parse_cli_mode() {
        Ok(mode) => mode,
        Err(err) => {
            eprintln!("Error: {}", err);
            println!("{}", usage());
            return Ok(());
        }
    };

    match mode {
        CliMode::Plan(args) => run_plan_mode(args).await,
        CliMode::Templates { employee } => run_templates_mode(employee).await,
    }
}

fn setup_logging() {
    let log_dir = dirs::config_dir()
        .map(|d| d.join("rotaplan"))
        .unwrap_or_else(|| std::path::PathBuf::from("."));

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(log_dir, "rotaplan.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .init();

    std::mem::forget(_guard);

    tracing::info!("rotaplan started");
}
