use aqi_advisor::{
    AgentConfig, AqiAgent, run_repl,
    telemetry::{LogFormat, LogTarget, init_tracing},
};
use std::process::ExitCode;
use tokio::io::{BufReader, stdin, stdout};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = init_tracing(LogFormat::from_env(), LogTarget::Stderr, "warn") {
        eprintln!("Failed to initialize logging: {e}");
    }

    let config = AgentConfig::from_env();
    let agent = match AqiAgent::new(&config) {
        Ok(agent) => agent,
        Err(e) => {
            eprintln!("❌ {e}");
            return ExitCode::FAILURE;
        }
    };

    match run_repl(&agent, BufReader::new(stdin()), stdout()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ Terminal error: {e}");
            ExitCode::FAILURE
        }
    }
}
